use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(ElementId);
id_newtype!(TimerToken);

/// Named page regions the controller looks up at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Root,
    Body,
    Header,
    NavToggle,
    NavMenu,
    Modal,
    ModalOverlay,
    ModalClose,
    ModalContent,
    JoinForm,
    JoinButton,
    NameInput,
    EmailInput,
    IntentSelect,
    Hero,
    LoadingOverlay,
}

impl Region {
    pub const ALL: [Region; 16] = [
        Region::Root,
        Region::Body,
        Region::Header,
        Region::NavToggle,
        Region::NavMenu,
        Region::Modal,
        Region::ModalOverlay,
        Region::ModalClose,
        Region::ModalContent,
        Region::JoinForm,
        Region::JoinButton,
        Region::NameInput,
        Region::EmailInput,
        Region::IntentSelect,
        Region::Hero,
        Region::LoadingOverlay,
    ];

    /// CSS selector used by browser hosts to resolve the region.
    pub fn selector(self) -> &'static str {
        match self {
            Region::Root => "html",
            Region::Body => "body",
            Region::Header => "#header",
            Region::NavToggle => "#nav-toggle",
            Region::NavMenu => "#nav-menu",
            Region::Modal => "#google-form-modal",
            Region::ModalOverlay => "#modal-overlay",
            Region::ModalClose => "#modal-close",
            Region::ModalContent => "#google-form-modal .modal__container",
            Region::JoinForm => "#join-form",
            Region::JoinButton => "#join-btn",
            Region::NameInput => "#user-name",
            Region::EmailInput => "#user-email",
            Region::IntentSelect => "#user-intent",
            Region::Hero => "#hero",
            Region::LoadingOverlay => "#loading-overlay",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Region::Root => "document root",
            Region::Body => "page body",
            Region::Header => "header",
            Region::NavToggle => "navigation toggle",
            Region::NavMenu => "navigation menu",
            Region::Modal => "modal",
            Region::ModalOverlay => "modal overlay",
            Region::ModalClose => "modal close control",
            Region::ModalContent => "modal content",
            Region::JoinForm => "join form",
            Region::JoinButton => "join button",
            Region::NameInput => "name input",
            Region::EmailInput => "email input",
            Region::IntentSelect => "intent select",
            Region::Hero => "hero section",
            Region::LoadingOverlay => "loading overlay",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Animation style named by an element's `data-animate` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnimationKind {
    FadeUp,
    FadeIn,
    FadeLeft,
    FadeRight,
    ScaleIn,
    SlideUp,
    Custom(String),
}

impl AnimationKind {
    pub fn tag(&self) -> &str {
        match self {
            AnimationKind::FadeUp => "fade-up",
            AnimationKind::FadeIn => "fade-in",
            AnimationKind::FadeLeft => "fade-left",
            AnimationKind::FadeRight => "fade-right",
            AnimationKind::ScaleIn => "scale-in",
            AnimationKind::SlideUp => "slide-up",
            AnimationKind::Custom(tag) => tag,
        }
    }

    pub fn class_name(&self) -> String {
        format!("animate-{}", self.tag())
    }
}

impl From<&str> for AnimationKind {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "fade-up" => AnimationKind::FadeUp,
            "fade-in" => AnimationKind::FadeIn,
            "fade-left" => AnimationKind::FadeLeft,
            "fade-right" => AnimationKind::FadeRight,
            "scale-in" => AnimationKind::ScaleIn,
            "slide-up" => AnimationKind::SlideUp,
            other => AnimationKind::Custom(other.to_string()),
        }
    }
}

impl From<String> for AnimationKind {
    fn from(raw: String) -> Self {
        AnimationKind::from(raw.as_str())
    }
}

impl From<AnimationKind> for String {
    fn from(kind: AnimationKind) -> Self {
        kind.tag().to_string()
    }
}

/// What a visitor selected in the signup form's intent control. Any
/// non-empty option value is accepted; the common ones get their own variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Intent {
    Buy,
    Rent,
    Sell,
    Invest,
    Other(String),
}

impl Intent {
    pub fn as_str(&self) -> &str {
        match self {
            Intent::Buy => "buy",
            Intent::Rent => "rent",
            Intent::Sell => "sell",
            Intent::Invest => "invest",
            Intent::Other(value) => value,
        }
    }
}

impl FromStr for Intent {
    type Err = &'static str;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        if value.is_empty() {
            return Err("no intent selected");
        }
        Ok(match value.to_ascii_lowercase().as_str() {
            "buy" => Intent::Buy,
            "rent" => Intent::Rent,
            "sell" => Intent::Sell,
            "invest" => Intent::Invest,
            _ => Intent::Other(value.to_string()),
        })
    }
}

impl TryFrom<String> for Intent {
    type Error = &'static str;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        intent.as_str().to_string()
    }
}

/// Call-to-action controls, keyed by the element id suffix `-cta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaAction {
    Hero,
    Map,
    Pricing,
    Generic,
}

impl CtaAction {
    pub const ALL: [CtaAction; 4] = [
        CtaAction::Hero,
        CtaAction::Map,
        CtaAction::Pricing,
        CtaAction::Generic,
    ];

    pub fn from_element_id(id: &str) -> Self {
        match id {
            "hero-cta" => CtaAction::Hero,
            "map-cta" => CtaAction::Map,
            "pricing-cta" => CtaAction::Pricing,
            _ => CtaAction::Generic,
        }
    }

    pub fn event_name(self) -> &'static str {
        match self {
            CtaAction::Hero => "cta_hero",
            CtaAction::Map => "cta_map",
            CtaAction::Pricing => "cta_pricing",
            CtaAction::Generic => "cta_generic",
        }
    }
}

/// Keys the controller reacts to; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Escape,
    Enter,
    Space,
    Tab,
    Other,
}

impl Key {
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Tab" => Key::Tab,
            _ => Key::Other,
        }
    }
}
