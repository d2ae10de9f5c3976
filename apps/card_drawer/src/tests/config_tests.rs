use super::*;

use std::{collections::HashMap, io::Write};

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_point_at_public_deck_api_without_timeout() {
    let settings = Settings::default();
    assert_eq!(settings.api_base_url, "https://deckofcardsapi.com/api/deck");
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn strips_trailing_slashes_and_whitespace() {
    assert_eq!(
        normalize_api_base_url("  http://127.0.0.1:9000/api/deck//  ").expect("url"),
        "http://127.0.0.1:9000/api/deck"
    );
}

#[test]
fn empty_url_falls_back_to_default() {
    assert_eq!(
        normalize_api_base_url("   ").expect("url"),
        DEFAULT_API_BASE_URL
    );
}

#[test]
fn rejects_non_http_schemes_and_garbage() {
    assert!(normalize_api_base_url("ftp://cards.example.com/deck").is_err());
    assert!(normalize_api_base_url("deckofcardsapi.com/api/deck").is_err());
}

#[test]
fn later_env_names_win() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_of(&[
            ("DECK_API_BASE_URL", "http://first.test/api/deck"),
            ("APP__API_BASE_URL", "http://second.test/api/deck"),
            ("APP__REQUEST_TIMEOUT_SECONDS", "7"),
        ]),
    );
    assert_eq!(settings.api_base_url, "http://second.test/api/deck");
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(7)));
}

#[test]
fn invalid_timeout_env_is_ignored() {
    let mut settings = Settings {
        request_timeout_seconds: 3,
        ..Settings::default()
    };
    apply_env(&mut settings, env_of(&[("APP__REQUEST_TIMEOUT_SECONDS", "soon")]));
    assert_eq!(settings.request_timeout_seconds, 3);
}

#[test]
fn reads_toml_file_and_tolerates_missing_or_malformed_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("card_drawer.toml");
    let mut file = fs::File::create(&path).expect("create");
    writeln!(
        file,
        "api_base_url = \"http://file.test/api/deck\"\nrequest_timeout_seconds = 12"
    )
    .expect("write");

    let raw = fs::read_to_string(&path).expect("read");
    let mut settings = Settings::default();
    apply_file(&mut settings, toml::from_str(&raw).expect("toml"));
    assert_eq!(settings.api_base_url, "http://file.test/api/deck");
    assert_eq!(settings.request_timeout_seconds, 12);

    assert!(toml::from_str::<FileSettings>("api_base_url = [").is_err());
    let missing = load_settings(&dir.path().join("absent.toml"));
    assert!(missing.api_base_url.starts_with("http"));
}

#[test]
fn cli_overrides_beat_loaded_values() {
    let settings = Settings {
        api_base_url: "http://file.test/api/deck".into(),
        request_timeout_seconds: 12,
    }
    .finish(Some("http://cli.test/api/deck/".into()), Some(0))
    .expect("finish");

    assert_eq!(settings.api_base_url, "http://cli.test/api/deck");
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn finish_rejects_invalid_override() {
    assert!(Settings::default()
        .finish(Some("not a url".into()), None)
        .is_err());
}
