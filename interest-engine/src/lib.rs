pub mod ranker;
pub mod registry;
pub mod scorer;

pub use ranker::{rank_stories, RankedStory};
pub use registry::TopicRegistry;
pub use scorer::score_story;
