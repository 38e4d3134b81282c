//! The mounted controller and the single entry point every DOM callback goes
//! through.

use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::Rc,
};

use landing_core::{
    events::{EventOutcome, UiEvent},
    ControllerConfig, InitReport, LandingController, PresentationPort,
};
use shared::domain::{Key, TimerToken};
use tracing::debug;
use web_sys::Element;

use crate::{bindings::Bindings, dom_port::DomPort, scheduler::BrowserScheduler};

pub(crate) type BrowserController = LandingController<DomPort, BrowserScheduler>;

/// A DOM callback, before its elements are mapped to ids.
pub(crate) enum DomInput {
    Click(Element),
    KeyDown {
        key: String,
        shift: bool,
        target: Option<Element>,
    },
    Submit,
    Resize,
    OrientationChange,
    Intersection {
        target: Element,
        is_intersecting: bool,
    },
    TransitionEnd(Element),
    TouchStart(Element),
    TouchEnd(Element),
    Timer(TimerToken),
    Frame(f64),
    Visibility {
        hidden: bool,
    },
    RuntimeError(String),
}

pub(crate) struct App {
    controller: RefCell<BrowserController>,
    backlog: RefCell<VecDeque<DomInput>>,
    bindings: RefCell<Option<Bindings>>,
}

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

/// Installs `app` as the page's controller, replacing any previous one.
pub(crate) fn install(app: Rc<App>) -> Option<Rc<App>> {
    APP.with(|slot| slot.replace(Some(app)))
}

pub(crate) fn current() -> Option<Rc<App>> {
    APP.with(|slot| slot.borrow().clone())
}

pub(crate) fn uninstall() -> Option<Rc<App>> {
    APP.with(|slot| slot.borrow_mut().take())
}

/// Routes one DOM callback into the mounted controller. Callbacks that arrive
/// while the controller is busy are queued and run before this call returns
/// to the outer one.
pub(crate) fn dispatch(input: DomInput) -> EventOutcome {
    match current() {
        Some(app) => app.dispatch(input),
        None => EventOutcome::default(),
    }
}

impl App {
    pub(crate) fn new(port: DomPort, scheduler: BrowserScheduler, config: ControllerConfig) -> Self {
        Self {
            controller: RefCell::new(LandingController::new(port, scheduler, config)),
            backlog: RefCell::new(VecDeque::new()),
            bindings: RefCell::new(None),
        }
    }

    pub(crate) fn initialize(&self) -> InitReport {
        self.controller.borrow_mut().initialize()
    }

    pub(crate) fn refresh(&self) -> InitReport {
        self.controller.borrow_mut().refresh()
    }

    pub(crate) fn teardown(&self) {
        if let Some(bindings) = self.bindings.borrow_mut().take() {
            bindings.detach();
        }
        self.backlog.borrow_mut().clear();
        self.controller.borrow_mut().teardown();
    }

    pub(crate) fn attach(&self, bindings: Bindings) {
        if let Some(previous) = self.bindings.borrow_mut().replace(bindings) {
            previous.detach();
        }
    }

    fn dispatch(&self, input: DomInput) -> EventOutcome {
        let Ok(mut controller) = self.controller.try_borrow_mut() else {
            debug!("app: controller busy, queueing callback");
            self.backlog.borrow_mut().push_back(input);
            return EventOutcome::default();
        };
        let outcome = Self::apply(&mut controller, input);
        loop {
            let next = self.backlog.borrow_mut().pop_front();
            let Some(queued) = next else {
                break;
            };
            Self::apply(&mut controller, queued);
        }
        outcome
    }

    fn apply(controller: &mut BrowserController, input: DomInput) -> EventOutcome {
        let event = match input {
            DomInput::Click(element) => UiEvent::Click {
                target: controller.port().intern(&element),
            },
            DomInput::KeyDown { key, shift, target } => UiEvent::KeyDown {
                key: Key::from_dom_key(&key),
                shift,
                target: target.map(|element| controller.port().intern(&element)),
            },
            DomInput::Submit => UiEvent::Submit,
            DomInput::Resize => UiEvent::Resize {
                width: controller.port().viewport_width(),
            },
            DomInput::OrientationChange => UiEvent::OrientationChange,
            DomInput::Intersection {
                target,
                is_intersecting,
            } => UiEvent::Intersection {
                target: controller.port().intern(&target),
                is_intersecting,
            },
            DomInput::TransitionEnd(element) => UiEvent::TransitionEnd {
                target: controller.port().intern(&element),
            },
            DomInput::TouchStart(element) => UiEvent::TouchStart {
                target: controller.port().intern(&element),
            },
            DomInput::TouchEnd(element) => UiEvent::TouchEnd {
                target: controller.port().intern(&element),
            },
            DomInput::Timer(token) => {
                controller.scheduler_mut().forget(token);
                UiEvent::TimerFired(token)
            }
            DomInput::Frame(timestamp_ms) => {
                controller.scheduler_mut().frame_fired();
                UiEvent::AnimationFrame { timestamp_ms }
            }
            DomInput::Visibility { hidden } => UiEvent::VisibilityChanged { hidden },
            DomInput::RuntimeError(message) => UiEvent::RuntimeError { message },
        };
        controller.handle(event)
    }
}
