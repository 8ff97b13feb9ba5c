use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use forklift_favourites::config::Config;
use forklift_favourites::runtime::{dist_name, execute, script_filter, CliOptions, Mode, RuntimeError};
use forklift_favourites::update::{now_secs, save_state, UpdateError, UpdateState};

fn test_config(label: &str) -> Config {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let root = std::env::temp_dir().join(format!("forklift-runtime-{label}-{unique}"));
    std::fs::create_dir_all(&root).unwrap();
    Config {
        name: "ForkLift".to_string(),
        version: "1.0.0".to_string(),
        data_dir: root.join("data"),
        cache_dir: root.join("cache"),
        favourites_path: root.join("Favorites.json"),
        ..Default::default()
    }
}

fn root_of(cfg: &Config) -> PathBuf {
    cfg.cache_dir.parent().unwrap().to_path_buf()
}

fn mark_checked(cfg: &Config, latest: Option<&str>) {
    let state = UpdateState {
        last_check_epoch_secs: now_secs(),
        latest_version: latest.map(str::to_string),
        download_url: None,
    };
    save_state(cfg, &state).unwrap();
}

fn run(cfg: &Config, mode: Mode, query: &str, demo: bool) -> String {
    let options = CliOptions {
        mode,
        demo,
        query: query.to_string(),
    };
    let mut out = Vec::new();
    execute(&options, cfg, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn demo_query_returns_matching_items() {
    let cfg = test_config("demo");
    mark_checked(&cfg, None);

    let feedback = script_filter(&cfg, "warez", true).unwrap();
    assert_eq!(feedback.items.len(), 1);
    assert_eq!(feedback.items[0].title, "Warez");
    assert_eq!(feedback.items[0].subtitle, "www.warez.ru");
    assert!(feedback.items[0]
        .icon
        .as_ref()
        .unwrap()
        .path
        .ends_with("ConnectionFTP.icns"));

    std::fs::remove_dir_all(root_of(&cfg)).unwrap();
}

#[test]
fn no_match_emits_single_warning_item() {
    let cfg = test_config("empty");
    mark_checked(&cfg, None);

    let feedback = script_filter(&cfg, "qqqqqq", true).unwrap();
    assert_eq!(feedback.items.len(), 1);
    assert_eq!(feedback.items[0].title, "No favourites found");
    assert!(!feedback.items[0].valid);

    std::fs::remove_dir_all(root_of(&cfg)).unwrap();
}

#[test]
fn update_item_is_pinned_for_empty_query() {
    let cfg = test_config("update-item");
    mark_checked(&cfg, Some("9.0.0"));

    let feedback = script_filter(&cfg, "", true).unwrap();
    assert_eq!(feedback.items.len(), 13);
    assert_eq!(feedback.items[0].title, "An update is available");
    assert_eq!(feedback.items[0].autocomplete.as_deref(), Some("workflow:update"));

    let encoded = feedback.to_json().unwrap();
    assert!(!encoded.contains("\"uid\""));

    let filtered = script_filter(&cfg, "nas", true).unwrap();
    assert_eq!(filtered.items[0].title, "NAS");

    std::fs::remove_dir_all(root_of(&cfg)).unwrap();
}

#[test]
fn loads_real_favourites_file_and_writes_json() {
    let cfg = test_config("real");
    mark_checked(&cfg, None);
    std::fs::write(
        &cfg.favourites_path,
        r#"{"favorites": [{"attributes": {"Name": "Main"}, "childItems": [
            {"UUID": "u-1", "attributes": {"Name": "Builds", "Server": "ci.example.com"}, "type": "SFTP"}
        ]}]}"#,
    )
    .unwrap();

    let output = run(&cfg, Mode::ScriptFilter, "", false);
    let parsed: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
    let item = &parsed["items"][0];
    assert_eq!(item["uid"], "u-1");
    assert_eq!(item["arg"], "u-1");
    assert_eq!(item["title"], "Builds");
    assert_eq!(item["subtitle"], "ci.example.com");
    assert_eq!(item["valid"], true);
    assert_eq!(item["variables"]["UUID"], "u-1");

    std::fs::remove_dir_all(root_of(&cfg)).unwrap();
}

#[test]
fn missing_favourites_file_is_fatal() {
    let cfg = test_config("fatal");
    mark_checked(&cfg, None);

    let result = script_filter(&cfg, "", false);
    assert!(matches!(result, Err(RuntimeError::Load(_))));

    std::fs::remove_dir_all(root_of(&cfg)).unwrap();
}

#[test]
fn alternate_modes_print_and_exit() {
    let cfg = Config {
        name: "ForkLift Favourites".to_string(),
        version: "2.0.0".to_string(),
        ..Default::default()
    };
    assert_eq!(dist_name(&cfg), "ForkLift-Favourites-2.0.0.alfredworkflow");
    assert_eq!(
        run(&cfg, Mode::DistName, "", false).trim(),
        "ForkLift-Favourites-2.0.0.alfredworkflow"
    );
    assert!(run(&cfg, Mode::LogFile, "", false)
        .trim()
        .ends_with("net.deanishe.alfred.forklift.log"));
    assert_eq!(run(&cfg, Mode::Version, "", false).trim(), "ForkLift Favourites/2.0.0");
    assert!(run(&cfg, Mode::Help, "", false).contains("--distname"));
}

#[test]
fn update_query_without_download_reports_failure() {
    let cfg = test_config("install-missing");
    mark_checked(&cfg, Some("9.0.0"));

    let output = run(&cfg, Mode::ScriptFilter, "workflow:update", false);
    let parsed: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
    let items = parsed["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Update failed");
    assert_eq!(items[0]["valid"], false);
    assert_eq!(items[0]["subtitle"], UpdateError::NoDownload.to_string());

    std::fs::remove_dir_all(root_of(&cfg)).unwrap();
}
