use serde::{Deserialize, Serialize};

/// Scroll destination for an in-page anchor: the target's top edge minus the
/// rendered header and a visual gutter, never above the top of the page.
pub fn destination(target_top: f64, header_height: f64, gutter: f64) -> f64 {
    (target_top - header_height - gutter).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Quad,
    Cubic,
}

impl Easing {
    /// Ease-in-out curve over normalized progress `0..=1`.
    pub fn apply(self, progress: f64) -> f64 {
        let p = progress.clamp(0.0, 1.0);
        match self {
            Easing::Quad => {
                if p < 0.5 {
                    2.0 * p * p
                } else {
                    -1.0 + (4.0 - 2.0 * p) * p
                }
            }
            Easing::Cubic => {
                if p < 0.5 {
                    4.0 * p * p * p
                } else {
                    (p - 1.0) * (2.0 * p - 2.0) * (2.0 * p - 2.0) + 1.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPolicy {
    FixedMs(u64),
    /// `|distance| * factor`, capped at `max_ms`.
    Proportional { factor: f64, max_ms: u64 },
}

impl DurationPolicy {
    pub fn duration_ms(self, distance: f64) -> f64 {
        match self {
            DurationPolicy::FixedMs(ms) => ms as f64,
            DurationPolicy::Proportional { factor, max_ms } => {
                (distance.abs() * factor).min(max_ms as f64)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollStep {
    pub position: f64,
    pub finished: bool,
}

/// Manually driven scroll for hosts without native smooth scrolling. The
/// first frame timestamp becomes the animation origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimation {
    start: f64,
    distance: f64,
    duration_ms: f64,
    easing: Easing,
    started_at: Option<f64>,
}

impl ScrollAnimation {
    pub fn new(start: f64, target: f64, easing: Easing, policy: DurationPolicy) -> Self {
        let distance = target - start;
        Self {
            start,
            distance,
            duration_ms: policy.duration_ms(distance),
            easing,
            started_at: None,
        }
    }

    pub fn target(&self) -> f64 {
        self.start + self.distance
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn step(&mut self, timestamp_ms: f64) -> ScrollStep {
        let started_at = *self.started_at.get_or_insert(timestamp_ms);
        let elapsed = timestamp_ms - started_at;
        if self.duration_ms <= 0.0 || elapsed >= self.duration_ms {
            return ScrollStep {
                position: self.target(),
                finished: true,
            };
        }
        let progress = elapsed / self.duration_ms;
        ScrollStep {
            position: self.start + self.distance * self.easing.apply(progress),
            finished: false,
        }
    }
}

#[cfg(test)]
#[path = "tests/smooth_scroll_tests.rs"]
mod tests;
