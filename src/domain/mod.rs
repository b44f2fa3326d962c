pub mod article;
pub mod entry;
pub mod payload;

pub use article::{Article, LikeSummary};
pub use entry::FeedEntry;
pub use payload::Payload;
