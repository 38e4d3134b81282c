//! The page controller: owns every sub-behavior and routes host events to
//! them.

use std::collections::BTreeMap;

use serde::Serialize;
use shared::{
    domain::{CtaAction, ElementId, Key, Region},
    error::ControllerError,
};
use tracing::{debug, error, info, warn};

use crate::{
    config::ControllerConfig,
    cta::{self, CtaRoute},
    events::{EventOutcome, UiEvent},
    form::{FormState, JoinForm, SubmitOutcome},
    menu::{MenuState, NavMenu},
    modal::{ModalClick, ModalDialog, ModalOpen, ModalState},
    port::{ObserverKind, PresentationPort, ScrollBehavior, Scheduler},
    reveal::{AnimatedElement, HeaderShrink, RevealRegistry},
    scroll_lock::ScrollLock,
    smooth_scroll::{destination, ScrollAnimation},
    surface::Surface,
    timers::TimerKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerMode {
    Uninitialized,
    Ready,
    /// Setup failed; only the bare menu toggle works.
    Degraded,
    TornDown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    pub missing: Vec<Region>,
    pub animated: usize,
    pub failure: Option<ControllerError>,
}

impl InitReport {
    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

pub struct LandingController<P, S> {
    surface: Surface<P, S>,
    mode: ControllerMode,
    menu: Option<NavMenu>,
    modal: ModalDialog,
    form: Option<JoinForm>,
    reveal: RevealRegistry,
    header_shrink: Option<HeaderShrink>,
    header: Option<ElementId>,
    root: Option<ElementId>,
    loading_overlay: Option<ElementId>,
    fallback_toggle: Option<(ElementId, ElementId)>,
    resize_completions: u64,
}

impl<P: PresentationPort, S: Scheduler> LandingController<P, S> {
    pub fn new(port: P, scheduler: S, config: ControllerConfig) -> Self {
        Self {
            surface: Surface::new(port, scheduler, config),
            mode: ControllerMode::Uninitialized,
            menu: None,
            modal: ModalDialog::default(),
            form: None,
            reveal: RevealRegistry::default(),
            header_shrink: None,
            header: None,
            root: None,
            loading_overlay: None,
            fallback_toggle: None,
            resize_completions: 0,
        }
    }

    /// Looks up every region and wires the sub-behaviors. Missing regions
    /// degrade their behavior; a setup failure leaves only the fallback menu
    /// toggle installed.
    pub fn initialize(&mut self) -> InitReport {
        let mut report = InitReport::default();
        if self.mode == ControllerMode::Ready {
            debug!("landing: already initialized");
            return report;
        }
        self.reset_behaviors();

        match self.setup(&mut report) {
            Ok(()) => {
                self.mode = ControllerMode::Ready;
                report.animated = self.reveal.items().len();
                info!(
                    missing = report.missing.len(),
                    animated = report.animated,
                    "landing: initialized"
                );
            }
            Err(err) => {
                error!("landing: initialization failed: {err}");
                self.abandon_setup();
                self.install_fallback_toggle();
                self.mode = ControllerMode::Degraded;
                report.failure = Some(err);
            }
        }
        report
    }

    pub fn teardown(&mut self) {
        if matches!(
            self.mode,
            ControllerMode::Uninitialized | ControllerMode::TornDown
        ) {
            return;
        }
        self.surface.scroll_animation = None;
        if let Some(form) = self.form.as_mut() {
            form.abort(&mut self.surface);
        }
        self.modal.close(&mut self.surface);
        if let Some(menu) = self.menu.as_mut() {
            menu.close(&mut self.surface);
            menu.discard_backdrops(&mut self.surface);
        }
        if let Some(overlay) = self.loading_overlay {
            self.surface.port.set_class(overlay, "active", false);
        }
        self.abandon_setup();
        self.fallback_toggle = None;
        self.mode = ControllerMode::TornDown;
        info!("landing: torn down");
    }

    pub fn refresh(&mut self) -> InitReport {
        self.teardown();
        self.initialize()
    }

    pub fn handle(&mut self, event: UiEvent) -> EventOutcome {
        match &event {
            UiEvent::VisibilityChanged { hidden } => {
                let name = if *hidden { "page_hidden" } else { "page_visible" };
                info!(event = name, "landing: visibility changed");
                return EventOutcome::default();
            }
            UiEvent::RuntimeError { message } => {
                error!(event = "javascript_error", "landing: uncaught error: {message}");
                return EventOutcome::default();
            }
            _ => {}
        }

        match self.mode {
            ControllerMode::Ready => {}
            ControllerMode::Degraded => return self.handle_degraded(&event),
            ControllerMode::Uninitialized | ControllerMode::TornDown => {
                debug!(event = event.name(), mode = ?self.mode, "landing: event ignored");
                return EventOutcome::default();
            }
        }

        match event {
            UiEvent::Click { target } => self.on_click(target),
            UiEvent::KeyDown { key, shift, target } => self.on_key(key, shift, target),
            UiEvent::Submit => {
                self.submit_form();
                EventOutcome::prevent_default()
            }
            UiEvent::Resize { width } => {
                self.on_resize(width);
                EventOutcome::default()
            }
            UiEvent::OrientationChange => {
                let settle_ms = self.surface.config.orientation_settle_ms;
                self.surface.arm(TimerKind::OrientationSettle, settle_ms);
                EventOutcome::default()
            }
            UiEvent::Intersection {
                target,
                is_intersecting,
            } => {
                self.on_intersection(target, is_intersecting);
                EventOutcome::default()
            }
            UiEvent::TransitionEnd { target } => {
                self.reveal.on_transition_end(&mut self.surface, target);
                EventOutcome::default()
            }
            UiEvent::TouchStart { target } => self.on_touch(target, true),
            UiEvent::TouchEnd { target } => self.on_touch(target, false),
            UiEvent::TimerFired(token) => {
                match self.surface.timers.claim(token) {
                    Some(kind) => self.on_timer(kind),
                    None => debug!(token = token.0, "timers: stale timer ignored"),
                }
                EventOutcome::default()
            }
            UiEvent::AnimationFrame { timestamp_ms } => {
                self.on_frame(timestamp_ms);
                EventOutcome::default()
            }
            UiEvent::VisibilityChanged { .. } | UiEvent::RuntimeError { .. } => {
                EventOutcome::default()
            }
        }
    }

    pub fn toggle_menu(&mut self) -> bool {
        let Some(menu) = self.menu.as_mut() else {
            warn!("menu: navigation elements not found");
            return false;
        };
        menu.toggle(&mut self.surface);
        menu.is_open()
    }

    pub fn open_menu(&mut self) -> bool {
        self.menu
            .as_mut()
            .is_some_and(|menu| menu.open(&mut self.surface))
    }

    pub fn close_menu(&mut self) -> bool {
        self.menu
            .as_mut()
            .is_some_and(|menu| menu.close(&mut self.surface))
    }

    pub fn open_modal(&mut self) -> ModalOpen {
        self.modal.open(&mut self.surface)
    }

    pub fn close_modal(&mut self) -> bool {
        self.modal.close(&mut self.surface)
    }

    pub fn submit_form(&mut self) -> Option<SubmitOutcome> {
        let Some(form) = self.form.as_mut() else {
            warn!("form: join form not found");
            return None;
        };
        Some(form.submit(&mut self.surface))
    }

    pub fn activate_cta(&mut self, action: CtaAction) {
        info!(event = action.event_name(), "cta: activated");
        match cta::route(action) {
            CtaRoute::OpenSignup => {
                if let Some(overlay) = self.loading_overlay {
                    self.surface.port.set_class(overlay, "active", true);
                    let overlay_ms = self.surface.config.loading_overlay_ms;
                    self.surface.arm(TimerKind::LoadingOverlayHide, overlay_ms);
                }
                self.open_modal();
            }
        }
    }

    /// Scrolls to the element with `dom_id`, closing the menu first so the
    /// header height is measured collapsed. Returns the destination offset.
    pub fn scroll_to_anchor(&mut self, dom_id: &str) -> Option<f64> {
        let Some(target) = self.surface.port.element_by_dom_id(dom_id) else {
            debug!(dom_id, "scroll: anchor target not found");
            return None;
        };
        if let Some(menu) = self.menu.as_mut() {
            menu.close(&mut self.surface);
        }

        let port = &self.surface.port;
        let header_height = self
            .header
            .map(|header| port.offset_height(header))
            .unwrap_or(0.0);
        let top = destination(
            port.offset_top(target),
            header_height,
            self.surface.config.scroll_gutter_px,
        );

        if self.surface.port.supports_smooth_scroll() {
            self.surface.scroll_animation = None;
            self.surface.port.scroll_to(top, ScrollBehavior::Smooth);
        } else {
            let animation = ScrollAnimation::new(
                self.surface.port.scroll_offset(),
                top,
                self.surface.config.scroll_easing,
                self.surface.config.scroll_duration,
            );
            debug!(
                top,
                duration_ms = animation.duration_ms(),
                "scroll: manual animation started"
            );
            self.surface.scroll_animation = Some(animation);
            self.surface.scheduler.request_frame();
        }
        Some(top)
    }

    pub fn mode(&self) -> ControllerMode {
        self.mode
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.surface.config
    }

    pub fn menu_state(&self) -> Option<MenuState> {
        self.menu.as_ref().map(|menu| *menu.state())
    }

    pub fn menu_backdrop(&self) -> Option<ElementId> {
        self.menu.as_ref().and_then(NavMenu::backdrop)
    }

    pub fn modal_state(&self) -> ModalState {
        *self.modal.state()
    }

    pub fn form_state(&self) -> Option<&FormState> {
        self.form.as_ref().map(JoinForm::state)
    }

    pub fn animated(&self) -> &[AnimatedElement] {
        self.reveal.items()
    }

    /// Elements in the order they were revealed.
    pub fn reveal_order(&self) -> &[ElementId] {
        self.reveal.reveal_order()
    }

    pub fn header_scrolled(&self) -> Option<bool> {
        self.header_shrink.as_ref().map(HeaderShrink::is_scrolled)
    }

    pub fn scroll_lock(&self) -> &ScrollLock {
        &self.surface.lock
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.surface.lock.is_locked()
    }

    pub fn is_scroll_animating(&self) -> bool {
        self.surface.scroll_animation.is_some()
    }

    pub fn resize_completions(&self) -> u64 {
        self.resize_completions
    }

    pub fn is_timer_armed(&self, kind: TimerKind) -> bool {
        self.surface.timers.is_armed(kind)
    }

    pub fn pending_timers(&self) -> usize {
        self.surface.timers.pending()
    }

    pub fn port(&self) -> &P {
        &self.surface.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.surface.port
    }

    pub fn scheduler(&self) -> &S {
        &self.surface.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.surface.scheduler
    }

    fn setup(&mut self, report: &mut InitReport) -> Result<(), ControllerError> {
        self.surface.config.validate()?;

        let mut found = BTreeMap::new();
        for region in Region::ALL {
            match self.surface.port.region(region) {
                Some(element) => {
                    found.insert(region, element);
                }
                None => {
                    let missing = ControllerError::MissingRegion(region);
                    warn!(
                        code = ?missing.code(),
                        "landing: {missing}; some functionality may not work"
                    );
                    report.missing.push(region);
                }
            }
        }
        let lookup = |region: Region| found.get(&region).copied();

        self.header = lookup(Region::Header);
        self.root = lookup(Region::Root);
        self.loading_overlay = lookup(Region::LoadingOverlay);

        let is_mobile = !self
            .surface
            .config
            .is_desktop_width(self.surface.port.viewport_width());
        self.menu = match (lookup(Region::NavToggle), lookup(Region::NavMenu)) {
            (Some(toggle), Some(menu)) => {
                let links = self.surface.port.menu_links(menu);
                self.surface
                    .port
                    .set_attribute(toggle, "aria-expanded", Some("false"));
                Some(NavMenu::new(toggle, menu, links, is_mobile))
            }
            _ => None,
        };

        self.modal = ModalDialog::new(
            lookup(Region::Modal),
            lookup(Region::ModalOverlay),
            lookup(Region::ModalClose),
            lookup(Region::ModalContent),
        );

        self.form = lookup(Region::JoinForm).map(|form| {
            JoinForm::new(
                form,
                lookup(Region::JoinButton),
                lookup(Region::NameInput),
                lookup(Region::EmailInput),
                lookup(Region::IntentSelect),
            )
        });

        for markup in self.surface.port.animated_elements() {
            self.reveal
                .register(&mut self.surface, markup)
                .map_err(|err| ControllerError::Port(err.to_string()))?;
        }

        if let (Some(header), Some(hero)) = (self.header, lookup(Region::Hero)) {
            self.surface
                .port
                .observe(ObserverKind::Landmark, hero)
                .map_err(|err| ControllerError::Port(err.to_string()))?;
            self.header_shrink = Some(HeaderShrink::new(header, hero));
        }

        if let Some(overlay) = self.loading_overlay {
            self.surface.port.set_class(overlay, "active", false);
        }
        Ok(())
    }

    fn reset_behaviors(&mut self) {
        self.menu = None;
        self.modal = ModalDialog::default();
        self.form = None;
        self.reveal.clear();
        self.header_shrink = None;
        self.fallback_toggle = None;
        self.surface.scroll_animation = None;
    }

    fn abandon_setup(&mut self) {
        self.surface.timers.cancel_all(&mut self.surface.scheduler);
        self.reveal.release_unplayed(&mut self.surface);
        self.surface.port.disconnect(ObserverKind::Reveal);
        self.surface.port.disconnect(ObserverKind::Landmark);
        self.reset_behaviors();
    }

    fn install_fallback_toggle(&mut self) {
        let port = &self.surface.port;
        match (port.region(Region::NavToggle), port.region(Region::NavMenu)) {
            (Some(toggle), Some(menu)) => {
                self.fallback_toggle = Some((toggle, menu));
                info!("landing: fallback menu toggle installed");
            }
            _ => warn!("landing: no navigation elements for the fallback toggle"),
        }
    }

    fn handle_degraded(&mut self, event: &UiEvent) -> EventOutcome {
        let (UiEvent::Click { target }, Some((toggle, menu))) = (event, self.fallback_toggle)
        else {
            return EventOutcome::default();
        };
        if !self.surface.port.contains(toggle, *target) {
            return EventOutcome::default();
        }
        NavMenu::toggle_classes_only(&mut self.surface.port, toggle, menu);
        EventOutcome::handled()
    }

    fn on_click(&mut self, target: ElementId) -> EventOutcome {
        match self.modal.classify_click(&self.surface.port, target) {
            ModalClick::Dismiss => {
                self.modal.close(&mut self.surface);
                return EventOutcome::handled();
            }
            ModalClick::Content => return EventOutcome::stop_propagation(),
            ModalClick::Elsewhere => {}
        }

        if let Some(menu) = self.menu.as_mut() {
            if menu.is_on_toggle(&self.surface.port, target) {
                menu.toggle(&mut self.surface);
                return EventOutcome::handled();
            }
        }

        if let Some(action) = self.surface.port.cta_action(target) {
            self.activate_cta(action);
            return EventOutcome::prevent_default();
        }

        if let Some(href) = self.surface.port.anchor_href(target) {
            if let Some(fragment) = href.strip_prefix('#') {
                self.scroll_to_anchor(fragment);
                return EventOutcome::prevent_default();
            }
        }

        if let Some(menu) = self.menu.as_mut() {
            if menu.is_open() {
                let port = &self.surface.port;
                let inside = menu.is_inside(port, target);
                let dismiss = if inside {
                    menu.is_menu_link(port, target)
                } else {
                    !menu.is_on_toggle(port, target)
                };
                if dismiss {
                    menu.close(&mut self.surface);
                }
            }
        }
        EventOutcome::default()
    }

    fn on_key(&mut self, key: Key, shift: bool, target: Option<ElementId>) -> EventOutcome {
        match key {
            Key::Escape => {
                let closed_modal = self.modal.close(&mut self.surface);
                let closed_menu = self.close_menu();
                if closed_modal || closed_menu {
                    debug!(closed_modal, closed_menu, "landing: escape dismissed overlays");
                }
                EventOutcome::default()
            }
            Key::Enter | Key::Space => {
                let Some(menu) = self.menu.as_mut() else {
                    return EventOutcome::default();
                };
                let on_toggle =
                    target.is_some_and(|target| menu.is_on_toggle(&self.surface.port, target));
                if !on_toggle {
                    return EventOutcome::default();
                }
                menu.toggle(&mut self.surface);
                EventOutcome::prevent_default()
            }
            Key::Tab => {
                let active = self.surface.port.active_element();
                let next = if self.modal.is_open() {
                    self.modal.trap_tab(active, shift)
                } else {
                    self.menu
                        .as_ref()
                        .filter(|menu| menu.is_open())
                        .and_then(|menu| menu.trap_tab(active, shift))
                };
                match next {
                    Some(element) => {
                        self.surface.port.focus(element);
                        EventOutcome::prevent_default()
                    }
                    None => EventOutcome::default(),
                }
            }
            Key::Other => EventOutcome::default(),
        }
    }

    fn on_resize(&mut self, width: f64) {
        if let Some(menu) = self.menu.as_mut() {
            menu.on_resize(&mut self.surface, width);
        }
        let debounce_ms = self.surface.config.resize_debounce_ms;
        self.surface.arm(TimerKind::ResizeSettled, debounce_ms);
    }

    fn on_touch(&mut self, target: ElementId, pressed: bool) -> EventOutcome {
        let Some(toggle) = self.menu.as_ref().map(NavMenu::toggle_element) else {
            return EventOutcome::default();
        };
        if self.surface.port.contains(toggle, target) {
            let scale = if pressed { "scale(0.95)" } else { "scale(1)" };
            self.surface.port.set_style(toggle, "transform", Some(scale));
        }
        EventOutcome::default()
    }

    fn on_intersection(&mut self, target: ElementId, is_intersecting: bool) {
        if let Some(header) = self.header_shrink.as_mut() {
            if header.landmark() == target {
                header.on_intersection(&mut self.surface, is_intersecting);
            }
        }
        if self.reveal.is_registered(target) {
            self.reveal
                .on_intersection(&mut self.surface, target, is_intersecting);
        }
    }

    fn on_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::ResizeSettled => {
                self.resize_completions += 1;
                debug!(
                    completions = self.resize_completions,
                    "viewport: resize settled"
                );
            }
            TimerKind::BackdropRemoval => {
                if let Some(menu) = self.menu.as_mut() {
                    menu.on_backdrop_removal(&mut self.surface);
                }
            }
            TimerKind::SubmitLatency => {
                if let Some(form) = self.form.as_mut() {
                    form.on_latency_elapsed(&mut self.surface);
                }
            }
            TimerKind::SuccessReset => {
                let open_modal = self
                    .form
                    .as_mut()
                    .is_some_and(|form| form.on_success_reset(&mut self.surface));
                if open_modal {
                    self.open_modal();
                }
            }
            TimerKind::FormErrorDismiss => {
                if let Some(form) = self.form.as_mut() {
                    form.clear_errors(&mut self.surface);
                }
            }
            TimerKind::LoadingOverlayHide => {
                if let Some(overlay) = self.loading_overlay {
                    self.surface.port.set_class(overlay, "active", false);
                }
            }
            TimerKind::OrientationSettle => {
                if let Some(root) = self.root {
                    let vh = format!("{}px", self.surface.port.viewport_height() / 100.0);
                    self.surface.port.set_style(root, "--vh", Some(&vh));
                }
                let saved = self
                    .menu
                    .as_ref()
                    .and_then(|menu| menu.state().saved_scroll_offset);
                if let Some(offset) = saved {
                    self.surface.port.scroll_to(offset, ScrollBehavior::Instant);
                }
            }
            TimerKind::RippleSettle(element) => {
                self.reveal.on_ripple_settle(&mut self.surface, element);
            }
        }
    }

    fn on_frame(&mut self, timestamp_ms: f64) {
        if let Some(backdrop) = self.menu.as_mut().and_then(NavMenu::take_backdrop_fade_in) {
            self.surface.port.set_style(backdrop, "opacity", Some("1"));
        }
        if let Some(animation) = self.surface.scroll_animation.as_mut() {
            let step = animation.step(timestamp_ms);
            self.surface
                .port
                .scroll_to(step.position, ScrollBehavior::Instant);
            if step.finished {
                self.surface.scroll_animation = None;
                debug!(top = step.position, "scroll: manual animation finished");
            } else {
                self.surface.scheduler.request_frame();
            }
        }
    }
}
