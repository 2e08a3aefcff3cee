//! End-to-end runs through the public API: configure, compose, render, save.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use nameglow::prelude::*;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
}

/// Answers virtue prompts with a fixed word and nickname prompts with JSON.
struct Scripted;

impl TextGenerator for Scripted {
    fn complete(&self, prompt: Prompt) -> nameglow::llm::TextFuture<'_> {
        Box::pin(async move {
            if prompt.json_output {
                Ok(r#"{"nicknames": [
                    {"nickname": "Sunny", "meaning": "Bright like the morning"},
                    {"nickname": "Sol", "meaning": "Steady warmth"},
                    {"nickname": "Extra", "meaning": "Dropped"}
                ]}"#
                .to_string())
            } else {
                Ok("\"Radiance.\"".to_string())
            }
        })
    }
}

struct Failing;

impl TextGenerator for Failing {
    fn complete(&self, _prompt: Prompt) -> nameglow::llm::TextFuture<'_> {
        Box::pin(async { Err("HTTP 503: upstream unavailable".to_string()) })
    }
}

#[tokio::test]
async fn generate_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let config = NameGlowConfig::default()
        .with_seed(11)
        .with_history_path(dir.path().join("nameglow_data.json"));
    let composer = config.build_composer().unwrap();
    let store = config.history_store();

    let first = composer.compose_on("Mary Jane", day()).await.unwrap();
    let second = composer.compose_on("Mary Jane", day()).await.unwrap();
    store.save(&user_id_for(&first.name), &first).unwrap();
    store.save(&user_id_for(&second.name), &second).unwrap();

    let history = store.history("mary_jane");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], first);
    assert_eq!(history.last(), Some(&second));
}

#[tokio::test]
async fn seeded_configs_agree() {
    let a = NameGlowConfig::default()
        .with_seed(5)
        .build_composer()
        .unwrap();
    let b = NameGlowConfig::default()
        .with_seed(5)
        .build_composer()
        .unwrap();
    for name in ["Michael", "Sophia", "Robert", "Emma", "William"] {
        let left = a.compose_on(name, day()).await.unwrap();
        let right = b.compose_on(name, day()).await.unwrap();
        assert_eq!(left, right);
        assert_eq!(left.alternative_anagrams.len(), 2);
        assert_ne!(left.anagram, Name::parse(name).unwrap().normalized());
    }
}

#[tokio::test]
async fn scripted_service_answers_are_used() {
    let composer = ContentComposer::external(
        Arc::new(Scripted),
        Arc::new(Catalogs::default()),
        SharedRng::seeded(1),
        Duration::from_secs(1),
    );
    let content = composer.compose_on("Sophia", day()).await.unwrap();
    assert_eq!(content.virtue, "Radiance");
    assert_eq!(
        content.nicknames,
        vec![
            Nickname::new("Sunny", "Bright like the morning"),
            Nickname::new("Sol", "Steady warmth"),
        ]
    );

    let html = render_html(&content);
    assert!(html.contains("<strong>Radiance</strong>"));
    assert!(html.contains("<strong>Sunny</strong>"));
}

#[tokio::test]
async fn failing_service_falls_back_to_catalogs() {
    let catalogs = Catalogs::default();
    let composer = ContentComposer::external(
        Arc::new(Failing),
        Arc::new(catalogs.clone()),
        SharedRng::seeded(9),
        Duration::from_secs(1),
    );
    let content = composer.compose_on("Alexander", day()).await.unwrap();
    assert!(catalogs.virtues.contains(&content.virtue));
    assert_eq!(content.nicknames.len(), 2);
    assert!(content.nicknames[0].nickname.starts_with('A'));
    assert!(catalogs.reflections.contains(&content.reflection_prompt));
}

#[tokio::test]
async fn invalid_name_leaves_history_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = NameGlowConfig::default().with_history_path(dir.path().join("h.json"));
    let composer = config.build_composer().unwrap();
    assert!(matches!(
        composer.compose_on("   ", day()).await,
        Err(NameGlowError::InvalidName(_))
    ));
    assert!(!config.history_store().path().exists());
}

#[tokio::test]
async fn json_rendering_round_trips_through_history() {
    let composer = NameGlowConfig::default()
        .with_seed(2)
        .build_composer()
        .unwrap();
    let content = composer.compose_on("Emma", day()).await.unwrap();
    let json = render_json(&content).unwrap();
    let parsed: DailyContent = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, content);
}
