//! Inputs the host feeds into the controller, and what the host must do with
//! the originating DOM event afterwards.

use shared::domain::{ElementId, Key, TimerToken};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Click {
        target: ElementId,
    },
    KeyDown {
        key: Key,
        shift: bool,
        target: Option<ElementId>,
    },
    Submit,
    Resize {
        width: f64,
    },
    OrientationChange,
    Intersection {
        target: ElementId,
        is_intersecting: bool,
    },
    TransitionEnd {
        target: ElementId,
    },
    TouchStart {
        target: ElementId,
    },
    TouchEnd {
        target: ElementId,
    },
    TimerFired(TimerToken),
    AnimationFrame {
        timestamp_ms: f64,
    },
    VisibilityChanged {
        hidden: bool,
    },
    RuntimeError {
        message: String,
    },
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Click { .. } => "click",
            UiEvent::KeyDown { .. } => "key_down",
            UiEvent::Submit => "submit",
            UiEvent::Resize { .. } => "resize",
            UiEvent::OrientationChange => "orientation_change",
            UiEvent::Intersection { .. } => "intersection",
            UiEvent::TransitionEnd { .. } => "transition_end",
            UiEvent::TouchStart { .. } => "touch_start",
            UiEvent::TouchEnd { .. } => "touch_end",
            UiEvent::TimerFired(_) => "timer_fired",
            UiEvent::AnimationFrame { .. } => "animation_frame",
            UiEvent::VisibilityChanged { .. } => "visibility_changed",
            UiEvent::RuntimeError { .. } => "runtime_error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl EventOutcome {
    pub fn handled() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: true,
        }
    }

    pub fn prevent_default() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: false,
        }
    }

    pub fn stop_propagation() -> Self {
        Self {
            prevent_default: false,
            stop_propagation: true,
        }
    }
}
