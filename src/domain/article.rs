use serde::{Deserialize, Deserializer};

/// An article returned by the tag search API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub likes_count: u64,
    #[serde(rename = "user", default, deserialize_with = "deserialize_user_id")]
    pub author_id: String,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>, likes_count: u64) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            likes_count,
            author_id: String::new(),
        }
    }

    pub fn with_author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = author_id.into();
        self
    }
}

#[derive(Deserialize)]
struct User {
    #[serde(default)]
    id: String,
}

fn deserialize_user_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let user = Option::<User>::deserialize(deserializer)?;
    Ok(user.map(|u| u.id).unwrap_or_default())
}

/// Like totals for one tag, built from a completed set of articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeSummary {
    pub tag: String,
    pub total_likes: u64,
    pub total_items: usize,
    /// Most liked first, at most [`LikeSummary::TOP_N`] entries.
    pub top_articles: Vec<Article>,
}

impl LikeSummary {
    pub const TOP_N: usize = 10;

    /// Build a summary from every fetched article, in fetch order.
    pub fn from_articles(tag: impl Into<String>, mut articles: Vec<Article>) -> Self {
        let total_likes = articles.iter().map(|a| a.likes_count).sum();
        let total_items = articles.len();

        // Vec::sort_by is stable: equal likes keep their fetch order.
        articles.sort_by(|a, b| b.likes_count.cmp(&a.likes_count));
        articles.truncate(Self::TOP_N);

        Self {
            tag: tag.into(),
            total_likes,
            total_items,
            top_articles: articles,
        }
    }
}
