use crate::prefs::{Preferences, INTERESTS_KEY};
use crate::shelf::{Shelf, SHELF_KEY};
use crate::Database;
use pixelfeed_core::Story;
use std::env;

async fn setup_test_db() -> Database {
    let db_path = env::temp_dir().join(format!("test_pixelfeed_{}.db", uuid::Uuid::new_v4()));

    let db = Database::connect(&db_path)
        .await
        .expect("Failed to connect to test database");
    db.run_migrations().await.expect("Failed to run migrations");

    db
}

fn story(id: u64, title: &str) -> Story {
    Story {
        id,
        title: title.to_string(),
        by: "tester".to_string(),
        time: 1175714200,
        score: 10,
        url: None,
        descendants: Some(0),
    }
}

#[tokio::test]
async fn test_setting_round_trip() {
    let db = setup_test_db().await;

    db.save_setting("test_key", "test_value")
        .await
        .expect("Failed to save setting");
    let value = db
        .get_setting("test_key")
        .await
        .expect("Failed to get setting");
    assert_eq!(value, Some("test_value".to_string()));

    db.save_setting("test_key", "updated")
        .await
        .expect("Failed to overwrite setting");
    let value = db.get_setting("test_key").await.unwrap();
    assert_eq!(value, Some("updated".to_string()));
}

#[tokio::test]
async fn test_missing_setting_is_none() {
    let db = setup_test_db().await;
    let value = db.get_setting("never_written").await.unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_delete_setting() {
    let db = setup_test_db().await;
    db.save_setting("doomed", "x").await.unwrap();
    db.delete_setting("doomed").await.unwrap();
    assert_eq!(db.get_setting("doomed").await.unwrap(), None);
}

#[tokio::test]
async fn test_shelf_add_and_dedup() {
    let db = setup_test_db().await;
    let shelf = Shelf::new(&db);

    assert!(shelf.add(story(1, "First")).await.unwrap());
    assert!(shelf.add(story(2, "Second")).await.unwrap());
    // Same id again is a no-op.
    assert!(!shelf.add(story(1, "First again")).await.unwrap());

    let articles = shelf.list().await.unwrap();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "First");
    assert!(shelf.contains(2).await.unwrap());
    assert_eq!(shelf.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_shelf_remove() {
    let db = setup_test_db().await;
    let shelf = Shelf::new(&db);

    shelf.add(story(1, "First")).await.unwrap();
    shelf.add(story(2, "Second")).await.unwrap();

    assert!(shelf.remove(1).await.unwrap());
    assert!(!shelf.remove(1).await.unwrap());

    let articles = shelf.list().await.unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].id, 2);
}

#[tokio::test]
async fn test_corrupt_shelf_loads_empty() {
    let db = setup_test_db().await;
    db.save_setting(SHELF_KEY, "{not json").await.unwrap();

    let shelf = Shelf::new(&db);
    assert!(shelf.list().await.unwrap().is_empty());

    // A fresh add works and replaces the corrupt blob.
    assert!(shelf.add(story(1, "Recovered")).await.unwrap());
    assert_eq!(shelf.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_selected_topics_round_trip() {
    let db = setup_test_db().await;
    let prefs = Preferences::new(&db);

    assert!(prefs.selected_topics().await.unwrap().is_empty());

    let topics = vec!["ai".to_string(), "devops".to_string()];
    prefs.set_selected_topics(&topics).await.unwrap();
    assert_eq!(prefs.selected_topics().await.unwrap(), topics);
}

#[tokio::test]
async fn test_toggle_topic() {
    let db = setup_test_db().await;
    let prefs = Preferences::new(&db);

    assert!(prefs.toggle_topic("ai").await.unwrap());
    assert!(prefs.toggle_topic("crypto").await.unwrap());
    assert_eq!(
        prefs.selected_topics().await.unwrap(),
        vec!["ai".to_string(), "crypto".to_string()]
    );

    assert!(!prefs.toggle_topic("ai").await.unwrap());
    assert_eq!(
        prefs.selected_topics().await.unwrap(),
        vec!["crypto".to_string()]
    );
}

#[tokio::test]
async fn test_corrupt_interests_load_as_empty_selection() {
    let db = setup_test_db().await;
    db.save_setting(INTERESTS_KEY, "not an array").await.unwrap();

    let prefs = Preferences::new(&db);
    assert!(prefs.selected_topics().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_meme_mode_flag() {
    let db = setup_test_db().await;
    let prefs = Preferences::new(&db);

    assert!(!prefs.meme_mode().await.unwrap());
    prefs.set_meme_mode(true).await.unwrap();
    assert!(prefs.meme_mode().await.unwrap());
    prefs.set_meme_mode(false).await.unwrap();
    assert!(!prefs.meme_mode().await.unwrap());
}
