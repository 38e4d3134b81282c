//! In-memory host: a tiny element tree that records every mutation, plus a
//! virtual clock. Used by the simulator and the tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use serde::Serialize;
use shared::domain::{AnimationKind, CtaAction, ElementId, Key, Region, TimerToken};

use crate::{
    config::ControllerConfig,
    controller::LandingController,
    events::{EventOutcome, UiEvent},
    port::{
        AnimatedMarkup, ObserverKind, PortError, PortResult, PresentationPort, ScrollBehavior,
        Scheduler,
    },
};

pub const FRAME_MS: u64 = 16;

/// One mutation the controller asked the host to perform.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PresentationCommand {
    SetClass {
        element: ElementId,
        class: String,
        on: bool,
    },
    SetStyle {
        element: ElementId,
        property: String,
        value: Option<String>,
    },
    SetAttribute {
        element: ElementId,
        name: String,
        value: Option<String>,
    },
    SetText {
        element: ElementId,
        text: String,
    },
    Focus {
        element: ElementId,
    },
    ScrollTo {
        top: f64,
        behavior: ScrollBehavior,
    },
    ResetForm {
        form: ElementId,
    },
    InsertBackdrop {
        element: ElementId,
    },
    InsertFormError {
        element: ElementId,
        anchor: ElementId,
        message: String,
    },
    Remove {
        element: ElementId,
    },
    OpenExternal {
        url: String,
        features: String,
    },
    Observe {
        observer: ObserverKind,
        element: ElementId,
    },
    Unobserve {
        observer: ObserverKind,
        element: ElementId,
    },
    Disconnect {
        observer: ObserverKind,
    },
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessNode {
    pub parent: Option<ElementId>,
    pub tag: String,
    pub dom_id: Option<String>,
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub value: String,
    pub focusable: bool,
    pub href: Option<String>,
    pub animate: Option<AnimationKind>,
    pub delay_ms: Option<u32>,
    pub top: f64,
    pub height: f64,
    pub attached: bool,
}

#[derive(Debug)]
pub struct HeadlessPage {
    nodes: BTreeMap<ElementId, HeadlessNode>,
    next_id: u64,
    regions: BTreeMap<Region, ElementId>,
    focused: Option<ElementId>,
    scroll_offset: f64,
    viewport_width: f64,
    viewport_height: f64,
    smooth_scroll: bool,
    popups_blocked: bool,
    failing_observer: Option<ObserverKind>,
    observed: BTreeSet<(ObserverKind, ElementId)>,
    log: Vec<PresentationCommand>,
}

impl HeadlessPage {
    /// An empty document: just the root and the body.
    pub fn blank() -> Self {
        let mut page = Self {
            nodes: BTreeMap::new(),
            next_id: 0,
            regions: BTreeMap::new(),
            focused: None,
            scroll_offset: 0.0,
            viewport_width: 375.0,
            viewport_height: 800.0,
            smooth_scroll: true,
            popups_blocked: false,
            failing_observer: None,
            observed: BTreeSet::new(),
            log: Vec::new(),
        };
        let root = page.insert(None, "html");
        let body = page.insert(Some(root), "body");
        page.bind(Region::Root, root);
        page.bind(Region::Body, body);
        page
    }

    /// The full landing page markup at a mobile viewport.
    pub fn landing() -> Self {
        let mut page = Self::blank();
        let body = page.body();

        let header = page.element(body, "header", "header");
        page.node_mut(header).height = 80.0;
        page.bind(Region::Header, header);

        let toggle = page.element(header, "button", "nav-toggle");
        page.node_mut(toggle).focusable = true;
        page.bind(Region::NavToggle, toggle);

        let nav = page.element(header, "nav", "nav-menu");
        page.bind(Region::NavMenu, nav);
        for href in ["#features", "#pricing", "#join", "/blog"] {
            let link = page.insert(Some(nav), "a");
            let node = page.node_mut(link);
            node.classes.insert("nav__link".into());
            node.href = Some(href.into());
            node.focusable = true;
        }

        let hero = page.section(body, "hero", 0.0, 700.0);
        page.bind(Region::Hero, hero);
        page.cta(hero, "hero-cta");

        let features = page.section(body, "features", 1000.0, 800.0);
        page.animated(features, "fade-up", None, None);
        page.animated(features, "fade-in", Some(200), None);
        page.animated(features, "scale-in", Some(100), Some("trust-strip__item"));

        let pricing = page.section(body, "pricing", 2000.0, 800.0);
        page.animated(pricing, "slide-up", None, Some("pricing__feature"));
        page.cta(pricing, "pricing-cta");
        page.cta(pricing, "map-cta");

        let join = page.section(body, "join", 3000.0, 600.0);
        let form = page.element(join, "form", "join-form");
        page.bind(Region::JoinForm, form);
        for (dom_id, tag, region) in [
            ("user-name", "input", Region::NameInput),
            ("user-email", "input", Region::EmailInput),
            ("user-intent", "select", Region::IntentSelect),
            ("join-btn", "button", Region::JoinButton),
        ] {
            let field = page.element(form, tag, dom_id);
            page.node_mut(field).focusable = true;
            page.bind(region, field);
        }
        let button = page.region_element(Region::JoinButton);
        page.node_mut(button).text = "Join the Waitlist".into();

        let modal = page.element(body, "div", "google-form-modal");
        page.bind(Region::Modal, modal);
        let overlay = page.element(modal, "div", "modal-overlay");
        page.bind(Region::ModalOverlay, overlay);
        let container = page.insert(Some(modal), "div");
        page.node_mut(container)
            .classes
            .insert("modal__container".into());
        page.bind(Region::ModalContent, container);
        let close = page.element(container, "button", "modal-close");
        page.node_mut(close).focusable = true;
        page.bind(Region::ModalClose, close);
        let form_link = page.insert(Some(container), "a");
        let node = page.node_mut(form_link);
        node.href = Some("https://forms.google.com/".into());
        node.focusable = true;

        let loading = page.element(body, "div", "loading-overlay");
        page.bind(Region::LoadingOverlay, loading);

        page
    }

    /// Removes a region's element (and its subtree) from the page.
    pub fn without(mut self, region: Region) -> Self {
        if let Some(element) = self.regions.remove(&region) {
            let doomed: Vec<ElementId> = self
                .nodes
                .keys()
                .copied()
                .filter(|id| self.is_within(element, *id))
                .collect();
            for id in doomed {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.attached = false;
                }
            }
            self.regions.retain(|_, bound| self.nodes[bound].attached);
        }
        self
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn without_smooth_scroll(mut self) -> Self {
        self.smooth_scroll = false;
        self
    }

    pub fn with_popups_blocked(mut self) -> Self {
        self.popups_blocked = true;
        self
    }

    /// Makes every `observe` call for `observer` fail.
    pub fn with_failing_observer(mut self, observer: ObserverKind) -> Self {
        self.failing_observer = Some(observer);
        self
    }

    pub fn set_field(&mut self, region: Region, value: &str) {
        if let Some(element) = self.regions.get(&region).copied() {
            self.node_mut(element).value = value.to_string();
        }
    }

    pub fn fill_signup(&mut self, name: &str, email: &str, intent: &str) {
        self.set_field(Region::NameInput, name);
        self.set_field(Region::EmailInput, email);
        self.set_field(Region::IntentSelect, intent);
    }

    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = offset;
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    pub fn node(&self, element: ElementId) -> Option<&HeadlessNode> {
        self.nodes.get(&element)
    }

    pub fn is_attached(&self, element: ElementId) -> bool {
        self.nodes.get(&element).is_some_and(|node| node.attached)
    }

    pub fn style(&self, element: ElementId, property: &str) -> Option<&str> {
        self.nodes
            .get(&element)
            .and_then(|node| node.styles.get(property))
            .map(String::as_str)
    }

    pub fn attribute(&self, element: ElementId, name: &str) -> Option<&str> {
        self.nodes
            .get(&element)
            .and_then(|node| node.attributes.get(name))
            .map(String::as_str)
    }

    pub fn text(&self, element: ElementId) -> Option<&str> {
        self.nodes.get(&element).map(|node| node.text.as_str())
    }

    /// Attached elements carrying `class`, in document order.
    pub fn with_class(&self, class: &str) -> Vec<ElementId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.attached && node.classes.contains(class))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    pub fn current_scroll(&self) -> f64 {
        self.scroll_offset
    }

    pub fn observed(&self, observer: ObserverKind) -> Vec<ElementId> {
        self.observed
            .iter()
            .filter(|(kind, _)| *kind == observer)
            .map(|(_, element)| *element)
            .collect()
    }

    pub fn log(&self) -> &[PresentationCommand] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<PresentationCommand> {
        std::mem::take(&mut self.log)
    }

    pub fn external_opens(&self) -> Vec<(String, String)> {
        self.log
            .iter()
            .filter_map(|command| match command {
                PresentationCommand::OpenExternal { url, features } => {
                    Some((url.clone(), features.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Scroll targets requested so far, in order.
    pub fn scroll_requests(&self) -> Vec<(f64, ScrollBehavior)> {
        self.log
            .iter()
            .filter_map(|command| match command {
                PresentationCommand::ScrollTo { top, behavior } => Some((*top, *behavior)),
                _ => None,
            })
            .collect()
    }

    fn body(&self) -> ElementId {
        self.region_element(Region::Body)
    }

    fn region_element(&self, region: Region) -> ElementId {
        self.regions[&region]
    }

    fn bind(&mut self, region: Region, element: ElementId) {
        self.regions.insert(region, element);
    }

    fn node_mut(&mut self, element: ElementId) -> &mut HeadlessNode {
        self.nodes.entry(element).or_default()
    }

    fn insert(&mut self, parent: Option<ElementId>, tag: &str) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        let top = parent
            .and_then(|parent| self.nodes.get(&parent))
            .map_or(0.0, |node| node.top);
        self.nodes.insert(
            id,
            HeadlessNode {
                parent,
                tag: tag.to_string(),
                top,
                attached: true,
                ..HeadlessNode::default()
            },
        );
        id
    }

    fn element(&mut self, parent: ElementId, tag: &str, dom_id: &str) -> ElementId {
        let id = self.insert(Some(parent), tag);
        self.node_mut(id).dom_id = Some(dom_id.to_string());
        id
    }

    fn section(&mut self, parent: ElementId, dom_id: &str, top: f64, height: f64) -> ElementId {
        let id = self.element(parent, "section", dom_id);
        let node = self.node_mut(id);
        node.top = top;
        node.height = height;
        id
    }

    fn cta(&mut self, parent: ElementId, dom_id: &str) -> ElementId {
        let id = self.element(parent, "a", dom_id);
        let node = self.node_mut(id);
        node.href = Some("#join".into());
        node.focusable = true;
        id
    }

    fn animated(
        &mut self,
        parent: ElementId,
        kind: &str,
        delay_ms: Option<u32>,
        class: Option<&str>,
    ) -> ElementId {
        let id = self.insert(Some(parent), "div");
        let node = self.node_mut(id);
        node.animate = Some(AnimationKind::from(kind));
        node.delay_ms = delay_ms;
        if let Some(class) = class {
            node.classes.insert(class.to_string());
        }
        id
    }

    fn live(&self, element: ElementId) -> Option<&HeadlessNode> {
        self.nodes.get(&element).filter(|node| node.attached)
    }

    fn is_within(&self, container: ElementId, target: ElementId) -> bool {
        let mut current = Some(target);
        while let Some(id) = current {
            if id == container {
                return true;
            }
            current = self.nodes.get(&id).and_then(|node| node.parent);
        }
        false
    }

    fn closest<T>(
        &self,
        target: ElementId,
        mut pick: impl FnMut(ElementId, &HeadlessNode) -> Option<T>,
    ) -> Option<T> {
        let mut current = Some(target);
        while let Some(id) = current {
            let node = self.live(id)?;
            if let Some(found) = pick(id, node) {
                return Some(found);
            }
            current = node.parent;
        }
        None
    }

    fn attach(&mut self, parent: ElementId, tag: &str, class: &str) -> ElementId {
        let id = self.insert(Some(parent), tag);
        self.node_mut(id).classes.insert(class.to_string());
        id
    }
}

impl PresentationPort for HeadlessPage {
    fn region(&self, region: Region) -> Option<ElementId> {
        self.regions
            .get(&region)
            .copied()
            .filter(|element| self.is_attached(*element))
    }

    fn element_by_dom_id(&self, dom_id: &str) -> Option<ElementId> {
        if dom_id.is_empty() {
            return None;
        }
        self.nodes
            .iter()
            .find(|(_, node)| node.attached && node.dom_id.as_deref() == Some(dom_id))
            .map(|(id, _)| *id)
    }

    fn animated_elements(&self) -> Vec<AnimatedMarkup> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.attached)
            .filter_map(|(id, node)| {
                node.animate.clone().map(|kind| AnimatedMarkup {
                    element: *id,
                    kind,
                    delay_ms: node.delay_ms,
                })
            })
            .collect()
    }

    fn menu_links(&self, menu: ElementId) -> Vec<ElementId> {
        self.nodes
            .iter()
            .filter(|(id, node)| {
                node.attached && node.classes.contains("nav__link") && self.is_within(menu, **id)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn focusable_within(&self, container: ElementId) -> Vec<ElementId> {
        self.nodes
            .iter()
            .filter(|(id, node)| {
                **id != container
                    && node.attached
                    && node.focusable
                    && self.is_within(container, **id)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn contains(&self, container: ElementId, target: ElementId) -> bool {
        self.is_within(container, target)
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.live(element)
            .is_some_and(|node| node.classes.contains(class))
    }

    fn anchor_href(&self, target: ElementId) -> Option<String> {
        self.closest(target, |_, node| node.href.clone())
    }

    fn cta_action(&self, target: ElementId) -> Option<CtaAction> {
        self.closest(target, |_, node| {
            node.dom_id
                .as_deref()
                .filter(|dom_id| dom_id.ends_with("-cta"))
                .map(CtaAction::from_element_id)
        })
    }

    fn active_element(&self) -> Option<ElementId> {
        self.focused.filter(|element| self.is_attached(*element))
    }

    fn field_value(&self, element: ElementId) -> String {
        self.live(element)
            .map(|node| node.value.clone())
            .unwrap_or_default()
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn offset_top(&self, element: ElementId) -> f64 {
        self.live(element).map_or(0.0, |node| node.top)
    }

    fn offset_height(&self, element: ElementId) -> f64 {
        self.live(element).map_or(0.0, |node| node.height)
    }

    fn supports_smooth_scroll(&self) -> bool {
        self.smooth_scroll
    }

    fn set_class(&mut self, element: ElementId, class: &str, on: bool) {
        if let Some(node) = self.nodes.get_mut(&element) {
            if on {
                node.classes.insert(class.to_string());
            } else {
                node.classes.remove(class);
            }
        }
        self.log.push(PresentationCommand::SetClass {
            element,
            class: class.to_string(),
            on,
        });
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: Option<&str>) {
        if let Some(node) = self.nodes.get_mut(&element) {
            match value {
                Some(value) => {
                    node.styles.insert(property.to_string(), value.to_string());
                }
                None => {
                    node.styles.remove(property);
                }
            }
        }
        self.log.push(PresentationCommand::SetStyle {
            element,
            property: property.to_string(),
            value: value.map(str::to_string),
        });
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: Option<&str>) {
        if let Some(node) = self.nodes.get_mut(&element) {
            match value {
                Some(value) => {
                    node.attributes.insert(name.to_string(), value.to_string());
                }
                None => {
                    node.attributes.remove(name);
                }
            }
        }
        self.log.push(PresentationCommand::SetAttribute {
            element,
            name: name.to_string(),
            value: value.map(str::to_string),
        });
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.text = text.to_string();
        }
        self.log.push(PresentationCommand::SetText {
            element,
            text: text.to_string(),
        });
    }

    fn focus(&mut self, element: ElementId) {
        if self.is_attached(element) {
            self.focused = Some(element);
        }
        self.log.push(PresentationCommand::Focus { element });
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scroll_offset = top.max(0.0);
        self.log.push(PresentationCommand::ScrollTo { top, behavior });
    }

    fn reset_form(&mut self, form: ElementId) {
        let fields: Vec<ElementId> = self
            .nodes
            .keys()
            .copied()
            .filter(|id| self.is_within(form, *id))
            .collect();
        for field in fields {
            self.node_mut(field).value.clear();
        }
        self.log.push(PresentationCommand::ResetForm { form });
    }

    fn insert_backdrop(&mut self) -> PortResult<ElementId> {
        let body = self
            .region(Region::Body)
            .ok_or_else(|| PortError::new("page body is missing"))?;
        let element = self.attach(body, "div", "mobile-menu-backdrop");
        self.log.push(PresentationCommand::InsertBackdrop { element });
        Ok(element)
    }

    fn insert_form_error(&mut self, anchor: ElementId, message: &str) -> PortResult<ElementId> {
        let parent = self
            .live(anchor)
            .ok_or_else(|| PortError::new(format!("anchor {} is not attached", anchor.0)))?
            .parent
            .unwrap_or(anchor);
        let element = self.attach(parent, "div", "form-error");
        self.node_mut(element).text = message.to_string();
        self.log.push(PresentationCommand::InsertFormError {
            element,
            anchor,
            message: message.to_string(),
        });
        Ok(element)
    }

    fn remove_element(&mut self, element: ElementId) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.attached = false;
        }
        self.log.push(PresentationCommand::Remove { element });
    }

    fn open_external(&mut self, url: &str, features: &str) -> bool {
        self.log.push(PresentationCommand::OpenExternal {
            url: url.to_string(),
            features: features.to_string(),
        });
        !self.popups_blocked
    }

    fn observe(&mut self, observer: ObserverKind, element: ElementId) -> PortResult<()> {
        if self.failing_observer == Some(observer) {
            return Err(PortError::new(format!(
                "{observer:?} observer is unavailable"
            )));
        }
        self.observed.insert((observer, element));
        self.log
            .push(PresentationCommand::Observe { observer, element });
        Ok(())
    }

    fn unobserve(&mut self, observer: ObserverKind, element: ElementId) {
        self.observed.remove(&(observer, element));
        self.log
            .push(PresentationCommand::Unobserve { observer, element });
    }

    fn disconnect(&mut self, observer: ObserverKind) {
        self.observed.retain(|(kind, _)| *kind != observer);
        self.log.push(PresentationCommand::Disconnect { observer });
    }
}

/// Deterministic scheduler. Time only moves through
/// [`LandingController::advance`].
#[derive(Debug, Default)]
pub struct VirtualClock {
    now_ms: u64,
    sequence: u64,
    pending: BTreeMap<(u64, u64), TimerToken>,
    frame_requested: bool,
}

impl VirtualClock {
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_timers(&self) -> usize {
        self.pending.len()
    }

    fn next_deadline(&self) -> Option<u64> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    fn pop_next(&mut self) -> Option<(u64, TimerToken)> {
        let key = *self.pending.keys().next()?;
        self.pending.remove(&key).map(|token| (key.0, token))
    }
}

impl Scheduler for VirtualClock {
    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.sequence += 1;
        self.pending
            .insert((self.now_ms.saturating_add(delay_ms), self.sequence), token);
    }

    fn cancel(&mut self, token: TimerToken) {
        self.pending.retain(|_, pending| *pending != token);
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
    }
}

pub type HeadlessController = LandingController<HeadlessPage, VirtualClock>;

impl HeadlessController {
    pub fn headless(page: HeadlessPage, config: ControllerConfig) -> Self {
        LandingController::new(page, VirtualClock::default(), config)
    }

    /// Moves virtual time forward by `ms`, firing due timers and requested
    /// animation frames (one every [`FRAME_MS`]) in time order.
    pub fn advance(&mut self, ms: u64) {
        let until = self.scheduler().now_ms().saturating_add(ms);
        loop {
            let clock = self.scheduler();
            let timer_at = clock.next_deadline().filter(|at| *at <= until);
            let frame_at = clock
                .frame_requested
                .then_some(clock.now_ms + FRAME_MS)
                .filter(|at| *at <= until);

            match (timer_at, frame_at) {
                (Some(timer), frame) if frame.map_or(true, |frame| timer <= frame) => {
                    let clock = self.scheduler_mut();
                    let Some((at, token)) = clock.pop_next() else {
                        break;
                    };
                    clock.now_ms = clock.now_ms.max(at);
                    self.handle(UiEvent::TimerFired(token));
                }
                (_, Some(frame)) => {
                    let clock = self.scheduler_mut();
                    clock.now_ms = frame;
                    clock.frame_requested = false;
                    self.handle(UiEvent::AnimationFrame {
                        timestamp_ms: frame as f64,
                    });
                }
                _ => break,
            }
        }
        self.scheduler_mut().now_ms = until;
    }

    /// Clicks the element bound to `region`, if the page has one.
    pub fn click(&mut self, region: Region) -> EventOutcome {
        match self.port().region(region) {
            Some(target) => self.handle(UiEvent::Click { target }),
            None => EventOutcome::default(),
        }
    }

    pub fn click_element(&mut self, target: ElementId) -> EventOutcome {
        self.handle(UiEvent::Click { target })
    }

    pub fn press(&mut self, key: Key, shift: bool) -> EventOutcome {
        let target = self.port().active_element();
        self.handle(UiEvent::KeyDown { key, shift, target })
    }

    pub fn resize(&mut self, width: f64) -> EventOutcome {
        let height = self.port().viewport_height();
        self.port_mut().set_viewport(width, height);
        self.handle(UiEvent::Resize { width })
    }

    pub fn intersect(&mut self, target: ElementId, is_intersecting: bool) -> EventOutcome {
        self.handle(UiEvent::Intersection {
            target,
            is_intersecting,
        })
    }
}
