use clap::{Parser, Subcommand};
use hn_client::{Feed, HnApiClient, StoryFeed};
use interest_engine::{rank_stories, TopicRegistry};
use llm_interface::{ChatProvider, OpenAiProvider};
use pixelfeed_core::{
    AppConfig, ArticleContext, ChatMessage, ConfigError, CoreError, Story, OPENAI_API_KEY_VAR,
};
use std::path::PathBuf;
use storage::{Database, Preferences, Shelf};

const USER_AGENT: &str = "pixelfeed/0.1 (terminal Hacker News client)";

#[derive(Parser)]
#[command(name = "pixelfeed", about = "A Hacker News reader with interests, a shelf, and Patch")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path of the local database (overrides config)
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a page of stories, ranked by your selected interests
    Feed {
        /// Which feed to read: top, new, or best
        #[arg(long, default_value = "top")]
        feed: Feed,

        /// Zero-based page number (20 stories per page)
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Keep the feed's native order even with interests selected
        #[arg(long)]
        no_rank: bool,
    },
    /// Manage interest topics
    Topics {
        #[command(subcommand)]
        action: TopicsAction,
    },
    /// Manage the reading shelf
    Shelf {
        #[command(subcommand)]
        action: ShelfAction,
    },
    /// Talk to Patch, optionally about a story or your shelf
    Chat {
        /// The message to send
        message: Vec<String>,

        /// Chat with a specific story (Patch speaks as the article)
        #[arg(long, conflicts_with = "shelf")]
        story: Option<u64>,

        /// Let Patch analyze your shelf
        #[arg(long)]
        shelf: bool,
    },
    /// Toggle the meme-mode flag
    Meme {
        #[command(subcommand)]
        action: MemeAction,
    },
}

#[derive(Subcommand)]
enum TopicsAction {
    /// List all topics and the current selection
    List,
    /// Toggle one or more topic ids in or out of the selection
    Toggle { topic_ids: Vec<String> },
}

#[derive(Subcommand)]
enum ShelfAction {
    /// List saved stories
    List,
    /// Fetch a story by id and save it
    Add { story_id: u64 },
    /// Remove a saved story
    Remove { story_id: u64 },
}

#[derive(Subcommand)]
enum MemeAction {
    On,
    Off,
    Status,
}

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelfeed=info,hn_client=warn,storage=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::from_env(),
    };
    if let Some(db) = cli.db {
        config.database_path = Some(db);
    }

    let db = Database::connect(&config.database_path()).await?;
    db.run_migrations().await?;

    match cli.command {
        Command::Feed {
            feed,
            page,
            no_rank,
        } => show_feed(&db, feed, page, no_rank).await,
        Command::Topics { action } => handle_topics(&db, action).await,
        Command::Shelf { action } => handle_shelf(&db, action).await,
        Command::Chat {
            message,
            story,
            shelf,
        } => handle_chat(&config, &db, message, story, shelf).await,
        Command::Meme { action } => handle_meme(&db, action).await,
    }
}

async fn show_feed(db: &Database, feed: Feed, page: usize, no_rank: bool) -> Result<(), CoreError> {
    let prefs = Preferences::new(db);
    let selected = prefs.selected_topics().await?;

    let story_feed = StoryFeed::new(HnApiClient::new(USER_AGENT.to_string()));
    let fetched = story_feed.fetch_page(feed, page).await?;

    let registry = TopicRegistry::builtin();
    let ranking_applied = !no_rank && !selected.is_empty();
    let ranked = if ranking_applied {
        rank_stories(&registry, &selected, fetched.stories)
    } else {
        rank_stories(&registry, &[], fetched.stories)
    };

    if ranked.is_empty() {
        println!("No stories found on page {}.", page);
        return Ok(());
    }

    let offset = page * hn_client::STORIES_PER_PAGE;
    for (index, entry) in ranked.iter().enumerate() {
        let marker = if ranking_applied && entry.score > 0 {
            format!(" [+{}]", entry.score)
        } else {
            String::new()
        };
        println!(
            "{:>3}.{} {}{}",
            offset + index + 1,
            marker,
            entry.story.title,
            site_suffix(&entry.story)
        );
        println!("      {}", story_byline(&entry.story));
    }
    println!(
        "\nPage {} of {} ({})",
        page + 1,
        fetched.total_pages.max(1),
        feed.label()
    );
    if ranking_applied {
        println!("Ranked by interests: {}", selected.join(", "));
    }

    Ok(())
}

async fn handle_topics(db: &Database, action: TopicsAction) -> Result<(), CoreError> {
    let prefs = Preferences::new(db);
    let registry = TopicRegistry::builtin();

    match action {
        TopicsAction::List => {
            let selected = prefs.selected_topics().await?;
            for topic in registry.iter() {
                let mark = if selected.iter().any(|id| id == &topic.id) {
                    "x"
                } else {
                    " "
                };
                println!("[{}] {:<10} {}", mark, topic.id, topic.name);
                println!("    keywords: {}", topic.keywords.join(", "));
            }
        }
        TopicsAction::Toggle { topic_ids } => {
            if topic_ids.is_empty() {
                return Err(CoreError::InvalidInput {
                    message: "no topic ids given".to_string(),
                });
            }
            for id in topic_ids {
                if !registry.contains(&id) {
                    return Err(CoreError::InvalidInput {
                        message: format!("unknown topic id: {}", id),
                    });
                }
                let now_selected = prefs.toggle_topic(&id).await?;
                println!(
                    "{} {}",
                    if now_selected { "Selected" } else { "Deselected" },
                    id
                );
            }
        }
    }

    Ok(())
}

async fn handle_shelf(db: &Database, action: ShelfAction) -> Result<(), CoreError> {
    let shelf = Shelf::new(db);

    match action {
        ShelfAction::List => {
            let articles = shelf.list().await?;
            if articles.is_empty() {
                println!("Your shelf is empty.");
                return Ok(());
            }
            for article in &articles {
                println!("{:>10}  {}{}", article.id, article.title, site_suffix(article));
            }
            println!("\n{} saved", articles.len());
        }
        ShelfAction::Add { story_id } => {
            let story_feed = StoryFeed::new(HnApiClient::new(USER_AGENT.to_string()));
            let story = story_feed.fetch_story(story_id).await?;
            let title = story.title.clone();
            if shelf.add(story).await? {
                println!("Added to shelf: {}", title);
            } else {
                println!("Already on the shelf: {}", title);
            }
        }
        ShelfAction::Remove { story_id } => {
            if shelf.remove(story_id).await? {
                println!("Removed story {} from the shelf.", story_id);
            } else {
                println!("Story {} was not on the shelf.", story_id);
            }
        }
    }

    Ok(())
}

async fn handle_chat(
    config: &AppConfig,
    db: &Database,
    message: Vec<String>,
    story: Option<u64>,
    shelf: bool,
) -> Result<(), CoreError> {
    let message = message.join(" ");
    if message.trim().is_empty() {
        return Err(CoreError::InvalidInput {
            message: "chat message is empty".to_string(),
        });
    }

    let api_key = config.openai_api_key.clone().ok_or(CoreError::Config(
        ConfigError::MissingEnvironmentVariable {
            var_name: OPENAI_API_KEY_VAR.to_string(),
        },
    ))?;

    let context = if let Some(story_id) = story {
        let story_feed = StoryFeed::new(HnApiClient::new(USER_AGENT.to_string()));
        let story = story_feed.fetch_story(story_id).await?;
        Some(ArticleContext::Article {
            title: story.title,
            url: story.url,
        })
    } else if shelf {
        let articles = Shelf::new(db).list().await?;
        Some(ArticleContext::ShelfAnalysis { articles })
    } else {
        None
    };

    let provider = OpenAiProvider::new(api_key);
    let reply = provider
        .chat(&[ChatMessage::user(message)], context.as_ref())
        .await?;

    println!("{}", reply);
    Ok(())
}

async fn handle_meme(db: &Database, action: MemeAction) -> Result<(), CoreError> {
    let prefs = Preferences::new(db);

    match action {
        MemeAction::On => {
            prefs.set_meme_mode(true).await?;
            println!("Meme mode on.");
        }
        MemeAction::Off => {
            prefs.set_meme_mode(false).await?;
            println!("Meme mode off.");
        }
        MemeAction::Status => {
            let enabled = prefs.meme_mode().await?;
            println!("Meme mode is {}.", if enabled { "on" } else { "off" });
        }
    }

    Ok(())
}

fn site_suffix(story: &Story) -> String {
    story
        .url
        .as_deref()
        .and_then(site_host)
        .map(|host| format!(" ({})", host))
        .unwrap_or_default()
}

fn site_host(raw_url: &str) -> Option<String> {
    let parsed = url::Url::parse(raw_url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

fn story_byline(story: &Story) -> String {
    let when = chrono::DateTime::from_timestamp(story.time, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown time".to_string());
    let comments = story.descendants.unwrap_or(0);

    format!(
        "{} points by {} | {} | {} comments",
        story.score, story.by, when, comments
    )
}
