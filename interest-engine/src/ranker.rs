use crate::registry::TopicRegistry;
use crate::scorer::score_story;
use pixelfeed_core::Story;
use tracing::debug;

/// A story paired with its interest score for a given selection.
#[derive(Debug, Clone)]
pub struct RankedStory {
    pub story: Story,
    pub score: u32,
}

/// Order a fetched page of stories by interest score.
///
/// With no topics selected the input order is returned untouched. Otherwise
/// stories are sorted descending by score; equal scores keep their relative
/// input order (`sort_by` is stable), so the upstream feed order acts as
/// the tie-break.
pub fn rank_stories(
    registry: &TopicRegistry,
    selected_topics: &[String],
    stories: Vec<Story>,
) -> Vec<RankedStory> {
    if selected_topics.is_empty() {
        return stories
            .into_iter()
            .map(|story| RankedStory { story, score: 0 })
            .collect();
    }

    let mut ranked: Vec<RankedStory> = stories
        .into_iter()
        .map(|story| {
            let score = score_story(registry, selected_topics, &story.title, story.url.as_deref());
            RankedStory { story, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    debug!(
        "Ranked {} stories against {} selected topics",
        ranked.len(),
        selected_topics.len()
    );
    ranked
}
