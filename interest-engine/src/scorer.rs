use crate::registry::TopicRegistry;

/// Count keyword matches for one story against the selected topics.
///
/// The comparison text is the lowercased title plus URL. Matching is plain
/// substring containment, so short keywords can match inside longer words
/// ("ai" in "aircraft"); that looseness is part of the contract.
///
/// An empty selection scores 0, as do topic ids that are no longer in the
/// registry. Never fails.
pub fn score_story(
    registry: &TopicRegistry,
    selected_topics: &[String],
    title: &str,
    url: Option<&str>,
) -> u32 {
    if selected_topics.is_empty() {
        return 0;
    }

    let text = format!("{} {}", title, url.unwrap_or("")).to_lowercase();
    let mut score = 0;

    for topic_id in selected_topics {
        if let Some(topic) = registry.get(topic_id) {
            for keyword in &topic.keywords {
                if text.contains(&keyword.to_lowercase()) {
                    score += 1;
                }
            }
        }
    }

    score
}
