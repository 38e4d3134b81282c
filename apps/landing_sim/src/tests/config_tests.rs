use super::*;

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

fn temp_path(name: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("landing_sim_test_{suffix}_{name}"))
}

#[test]
fn env_overrides_replace_file_values() {
    let mut config = ControllerConfig::default();
    apply_overrides(
        &mut config,
        lookup(&[
            ("LANDING__DESKTOP_BREAKPOINT_PX", "1024"),
            ("LANDING__RESIZE_DEBOUNCE_MS", " 100 "),
            ("LANDING__VALIDATION_POLICY", "ALL_ERRORS"),
            ("LANDING__SCROLL_EASING", "quad"),
            ("LANDING__SCROLL_DURATION_MS", "800"),
            ("LANDING__EXTERNAL_FORM_URL", "https://example.com/join"),
        ]),
    );

    assert_eq!(config.desktop_breakpoint_px, 1024.0);
    assert_eq!(config.resize_debounce_ms, 100);
    assert_eq!(config.validation_policy, ValidationPolicy::AllErrors);
    assert_eq!(config.scroll_easing, Easing::Quad);
    assert_eq!(config.scroll_duration, DurationPolicy::FixedMs(800));
    assert_eq!(config.external_form_url, "https://example.com/join");
}

#[test]
fn invalid_numeric_overrides_are_ignored() {
    let mut config = ControllerConfig::default();
    apply_overrides(
        &mut config,
        lookup(&[
            ("LANDING__SUBMIT_LATENCY_MS", "soon"),
            ("LANDING__REVEAL_THRESHOLD", "-"),
            ("LANDING__SCROLL_EASING", "bouncy"),
        ]),
    );

    assert_eq!(config, ControllerConfig::default());
}

#[test]
fn unprefixed_variables_are_not_read() {
    let mut config = ControllerConfig::default();
    apply_overrides(&mut config, lookup(&[("SUBMIT_LATENCY_MS", "10")]));
    assert_eq!(config.submit_latency_ms, 1500);
}

#[test]
fn missing_file_means_defaults() {
    let config = load_config(&temp_path("absent.toml")).expect("defaults");
    assert_eq!(config.scroll_gutter_px, 20.0);
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let path = temp_path("partial.toml");
    fs::write(
        &path,
        "submit_latency_ms = 10\nvalidation_policy = \"all_errors\"\n\n[scroll_duration]\nfixed_ms = 800\n\n[labels]\nbusy = \"Sending\"\n",
    )
    .expect("write config");

    let config = load_config(&path).expect("load");
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(config.submit_latency_ms, 10);
    assert_eq!(config.validation_policy, ValidationPolicy::AllErrors);
    assert_eq!(config.scroll_duration, DurationPolicy::FixedMs(800));
    assert_eq!(config.labels.busy, "Sending");
    assert_eq!(config.labels.idle, "Join the Waitlist");
    assert_eq!(config.success_reset_ms, 2000);
}

#[test]
fn malformed_or_invalid_file_is_an_error() {
    let malformed = temp_path("malformed.toml");
    fs::write(&malformed, "submit_latency_ms = \"fast\"").expect("write config");
    let err = load_config(&malformed).expect_err("type mismatch");
    fs::remove_file(&malformed).expect("cleanup");
    assert!(err.to_string().contains("failed to parse"));

    let invalid = temp_path("invalid.toml");
    fs::write(&invalid, "reveal_threshold = 2.0").expect("write config");
    let err = load_config(&invalid).expect_err("threshold out of range");
    fs::remove_file(&invalid).expect("cleanup");
    assert!(err.to_string().contains("invalid configuration"));
}
