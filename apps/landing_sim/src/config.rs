use std::{fs, io, path::Path, str::FromStr};

use anyhow::Context;
use landing_core::{
    form::ValidationPolicy,
    smooth_scroll::{DurationPolicy, Easing},
    ControllerConfig,
};
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_PATH: &str = "landing.toml";
pub const ENV_PREFIX: &str = "LANDING__";

/// Reads the config file at `path` (a missing file means defaults), then
/// applies `LANDING__*` environment overrides.
pub fn load_config(path: &Path) -> anyhow::Result<ControllerConfig> {
    let mut config = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<ControllerConfig>(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config: file not found, using defaults");
            ControllerConfig::default()
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    config
        .validate()
        .with_context(|| format!("invalid configuration from {}", path.display()))?;
    Ok(config)
}

/// Applies `LANDING__<FIELD>` overrides found through `lookup`. Values that do
/// not parse are logged and ignored.
pub fn apply_overrides(config: &mut ControllerConfig, lookup: impl Fn(&str) -> Option<String>) {
    let var = |field: &str| lookup(&format!("{ENV_PREFIX}{field}"));

    if let Some(v) = var("DESKTOP_BREAKPOINT_PX") {
        set_parsed(&mut config.desktop_breakpoint_px, "DESKTOP_BREAKPOINT_PX", &v);
    }
    if let Some(v) = var("RESIZE_DEBOUNCE_MS") {
        set_parsed(&mut config.resize_debounce_ms, "RESIZE_DEBOUNCE_MS", &v);
    }
    if let Some(v) = var("SCROLL_GUTTER_PX") {
        set_parsed(&mut config.scroll_gutter_px, "SCROLL_GUTTER_PX", &v);
    }
    if let Some(v) = var("SUBMIT_LATENCY_MS") {
        set_parsed(&mut config.submit_latency_ms, "SUBMIT_LATENCY_MS", &v);
    }
    if let Some(v) = var("SUCCESS_RESET_MS") {
        set_parsed(&mut config.success_reset_ms, "SUCCESS_RESET_MS", &v);
    }
    if let Some(v) = var("ERROR_DISMISS_MS") {
        set_parsed(&mut config.error_dismiss_ms, "ERROR_DISMISS_MS", &v);
    }
    if let Some(v) = var("REVEAL_THRESHOLD") {
        set_parsed(&mut config.reveal_threshold, "REVEAL_THRESHOLD", &v);
    }
    if let Some(v) = var("SCROLL_DURATION_MS") {
        if let Ok(ms) = v.trim().parse::<u64>() {
            config.scroll_duration = DurationPolicy::FixedMs(ms);
        } else {
            warn!(value = %v, "config: ignoring invalid SCROLL_DURATION_MS");
        }
    }
    if let Some(v) = var("SCROLL_EASING") {
        match v.trim().to_ascii_lowercase().as_str() {
            "quad" => config.scroll_easing = Easing::Quad,
            "cubic" => config.scroll_easing = Easing::Cubic,
            _ => warn!(value = %v, "config: ignoring invalid SCROLL_EASING"),
        }
    }
    if let Some(v) = var("VALIDATION_POLICY") {
        match v.trim().to_ascii_lowercase().as_str() {
            "first_error" => config.validation_policy = ValidationPolicy::FirstError,
            "all_errors" => config.validation_policy = ValidationPolicy::AllErrors,
            _ => warn!(value = %v, "config: ignoring invalid VALIDATION_POLICY"),
        }
    }
    if let Some(v) = var("EXTERNAL_FORM_URL") {
        config.external_form_url = v;
    }
}

fn set_parsed<T: FromStr>(slot: &mut T, field: &str, raw: &str) {
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(_) => warn!(field, value = raw, "config: ignoring invalid override"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
