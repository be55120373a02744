use pixelfeed_core::{ArticleContext, CoreError};

const DEFAULT_PERSONA: &str = "You are Patch, a witty and sarcastic AI chatbot with a glitchy \
personality. You help developers and tech enthusiasts with news, coding questions, and general \
tech discussions. Keep responses concise but engaging, with a touch of humor and personality. \
When someone drops an article on you, respond with something like \"Mmm... tasty read. Let's \
talk about it!\" or similar engaging responses.";

/// Patch's system prompt for a chat request, specialized by the attached
/// context: none (general chat), one article (speak as the article), or the
/// whole shelf (analyze it).
pub fn system_prompt(context: Option<&ArticleContext>) -> Result<String, CoreError> {
    let Some(context) = context else {
        return Ok(DEFAULT_PERSONA.to_string());
    };

    match context {
        ArticleContext::ShelfAnalysis { articles } => {
            let listing = serde_json::to_string_pretty(articles)?;
            Ok(format!(
                "You are Patch, an AI assistant analyzing a user's saved article shelf. You have \
access to {count} saved articles. \n\nArticles in shelf: {listing}\n\nYou can help with:\n\
- Summarizing the shelf contents\n\
- Grouping articles by topic/theme\n\
- Identifying trending or popular articles\n\
- Recommending reading order\n\
- Finding patterns in saved content\n\n\
Be conversational, witty, and helpful. Reference specific articles when relevant. If asked to \
group by topic, create clear categories. If asked about trends, mention scores and engagement. \
Keep responses concise but insightful.",
                count = articles.len(),
            ))
        }
        ArticleContext::Article { title, url } => {
            let source = match url {
                Some(url) => format!("From {}", url),
                None => "No URL provided".to_string(),
            };
            Ok(format!(
                "You are Patch, but right now you're pretending to BE the following news article: \
\"{title}\". \n\nArticle summary: {source}\n\nSpeak in first-person as if you ARE this \
article/story. Be witty, sarcastic, or insightful depending on the topic. Reference your content \
naturally in conversation. If asked about yourself, talk about your subject matter, your \
significance, or your impact on the tech world. Start conversations with engaging responses like \
\"Mmm... tasty read. Let's talk about it!\" or \"I've been absorbed into Patch's circuits. Ask me \
anything!\"",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelfeed_core::Story;

    fn story(id: u64, title: &str) -> Story {
        Story {
            id,
            title: title.to_string(),
            by: "tester".to_string(),
            time: 0,
            score: 42,
            url: None,
            descendants: Some(3),
        }
    }

    #[test]
    fn test_default_persona_without_context() {
        let prompt = system_prompt(None).unwrap();
        assert!(prompt.contains("You are Patch"));
        assert!(!prompt.contains("article shelf"));
    }

    #[test]
    fn test_article_context_embeds_title_and_url() {
        let context = ArticleContext::Article {
            title: "Rust 2.0 announced".to_string(),
            url: Some("https://blog.rust-lang.org".to_string()),
        };
        let prompt = system_prompt(Some(&context)).unwrap();
        assert!(prompt.contains("Rust 2.0 announced"));
        assert!(prompt.contains("From https://blog.rust-lang.org"));
    }

    #[test]
    fn test_article_context_without_url() {
        let context = ArticleContext::Article {
            title: "Ask HN: how do you test?".to_string(),
            url: None,
        };
        let prompt = system_prompt(Some(&context)).unwrap();
        assert!(prompt.contains("No URL provided"));
    }

    #[test]
    fn test_shelf_analysis_lists_articles_and_count() {
        let context = ArticleContext::ShelfAnalysis {
            articles: vec![story(1, "First saved"), story(2, "Second saved")],
        };
        let prompt = system_prompt(Some(&context)).unwrap();
        assert!(prompt.contains("2 saved articles"));
        assert!(prompt.contains("First saved"));
        assert!(prompt.contains("Second saved"));
    }
}
