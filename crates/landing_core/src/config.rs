use serde::{Deserialize, Serialize};
use shared::error::ControllerError;

use crate::{
    form::ValidationPolicy,
    smooth_scroll::{DurationPolicy, Easing},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonLabels {
    pub idle: String,
    pub busy: String,
    pub success: String,
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self {
            idle: "Join the Waitlist".into(),
            busy: "Processing...".into(),
            success: "You're on the list!".into(),
        }
    }
}

/// Tunables for the page controller. Every field has a default, so partial
/// config files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub desktop_breakpoint_px: f64,
    pub resize_debounce_ms: u64,
    pub scroll_gutter_px: f64,
    pub scroll_easing: Easing,
    pub scroll_duration: DurationPolicy,
    pub submit_latency_ms: u64,
    pub success_reset_ms: u64,
    pub error_dismiss_ms: u64,
    pub backdrop_fade_ms: u64,
    pub loading_overlay_ms: u64,
    pub ripple_ms: u64,
    pub orientation_settle_ms: u64,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub header_root_margin: String,
    pub validation_policy: ValidationPolicy,
    pub external_form_url: String,
    pub popup_width: u32,
    pub popup_height: u32,
    pub labels: ButtonLabels,
    pub ripple_classes: Vec<String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            desktop_breakpoint_px: 768.0,
            resize_debounce_ms: 250,
            scroll_gutter_px: 20.0,
            scroll_easing: Easing::Cubic,
            scroll_duration: DurationPolicy::Proportional {
                factor: 0.5,
                max_ms: 1000,
            },
            submit_latency_ms: 1500,
            success_reset_ms: 2000,
            error_dismiss_ms: 5000,
            backdrop_fade_ms: 300,
            loading_overlay_ms: 500,
            ripple_ms: 300,
            orientation_settle_ms: 100,
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -100px 0px".into(),
            header_root_margin: "0px 0px -60px 0px".into(),
            validation_policy: ValidationPolicy::FirstError,
            // Placeholder endpoint; deployments replace it with the real form.
            external_form_url: "https://forms.google.com/".into(),
            popup_width: 600,
            popup_height: 700,
            labels: ButtonLabels::default(),
            ripple_classes: vec!["trust-strip__item".into(), "pricing__feature".into()],
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ControllerError> {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(ControllerError::Config(format!(
                "reveal_threshold must be within 0..=1, got {}",
                self.reveal_threshold
            )));
        }
        if self.desktop_breakpoint_px <= 0.0 {
            return Err(ControllerError::Config(
                "desktop_breakpoint_px must be positive".into(),
            ));
        }
        if self.scroll_gutter_px < 0.0 {
            return Err(ControllerError::Config(
                "scroll_gutter_px must not be negative".into(),
            ));
        }
        if let DurationPolicy::Proportional { factor, .. } = self.scroll_duration {
            if factor < 0.0 {
                return Err(ControllerError::Config(
                    "scroll_duration factor must not be negative".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn popup_features(&self) -> String {
        format!(
            "width={},height={},scrollbars=yes,resizable=yes",
            self.popup_width, self.popup_height
        )
    }

    pub fn is_desktop_width(&self, width: f64) -> bool {
        width > self.desktop_breakpoint_px
    }
}
