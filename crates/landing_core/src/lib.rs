//! Interaction controller for the landing page: navigation menu, signup
//! modal, smooth anchor scrolling, the join form, scroll reveal and the
//! header presentation.
//!
//! Everything here is host-agnostic. A browser host implements
//! [`port::PresentationPort`] and [`port::Scheduler`] over the DOM; tests and
//! the simulator use [`headless::HeadlessPage`] and
//! [`headless::VirtualClock`].

pub mod config;
pub mod controller;
pub mod cta;
pub mod events;
pub mod focus_trap;
pub mod form;
pub mod headless;
pub mod menu;
pub mod modal;
pub mod port;
pub mod reveal;
pub mod scroll_lock;
pub mod smooth_scroll;
mod surface;
pub mod timers;

pub use config::ControllerConfig;
pub use controller::{ControllerMode, InitReport, LandingController};
pub use events::{EventOutcome, UiEvent};
pub use port::{PortError, PresentationPort, Scheduler};
