use landing_core::{
    headless::{HeadlessController, HeadlessPage},
    port::ObserverKind,
    ControllerConfig, ControllerMode, EventOutcome, PresentationPort, UiEvent,
};
use shared::{
    domain::{Region, TimerToken},
    error::{ControllerError, ErrorCode},
};

#[test]
fn events_before_initialization_are_ignored() {
    let mut controller =
        HeadlessController::headless(HeadlessPage::landing(), ControllerConfig::default());

    let outcome = controller.click(Region::NavToggle);

    assert_eq!(controller.mode(), ControllerMode::Uninitialized);
    assert!(!outcome.prevent_default);
    assert!(controller.menu_state().is_none());
    assert!(controller.port().log().is_empty());
}

#[test]
fn missing_regions_are_reported_and_the_rest_keeps_working() {
    let mut controller = HeadlessController::headless(
        HeadlessPage::landing().without(Region::NavToggle),
        ControllerConfig::default(),
    );

    let report = controller.initialize();

    assert_eq!(controller.mode(), ControllerMode::Ready);
    assert_eq!(report.missing, vec![Region::NavToggle]);
    assert_eq!(report.animated, 4);
    assert!(!report.is_degraded());
    assert!(!controller.toggle_menu());
    controller.open_modal();
    assert!(controller.modal_state().is_open);
}

#[test]
fn observer_failure_degrades_to_fallback_toggle() {
    let mut controller = HeadlessController::headless(
        HeadlessPage::landing().with_failing_observer(ObserverKind::Reveal),
        ControllerConfig::default(),
    );
    let menu = controller.port().region(Region::NavMenu).expect("menu");
    let toggle = controller.port().region(Region::NavToggle).expect("toggle");

    let report = controller.initialize();
    assert!(report.is_degraded());
    assert!(matches!(report.failure, Some(ControllerError::Port(_))));
    assert_eq!(controller.mode(), ControllerMode::Degraded);
    assert!(controller.menu_state().is_none());

    let outcome = controller.click(Region::NavToggle);
    assert!(outcome.prevent_default);
    assert!(controller.port().has_class(menu, "active"));
    assert!(controller.port().has_class(toggle, "active"));
    assert!(!controller.is_scroll_locked());

    controller.click(Region::NavToggle);
    assert!(!controller.port().has_class(menu, "active"));

    controller.click(Region::Hero);
    controller.handle(UiEvent::Submit);
    assert!(controller.form_state().is_none());
}

#[test]
fn invalid_config_degrades_with_config_error() {
    let config = ControllerConfig {
        reveal_threshold: 1.5,
        ..ControllerConfig::default()
    };
    let mut controller = HeadlessController::headless(HeadlessPage::landing(), config);

    let report = controller.initialize();

    let failure = report.failure.expect("config rejected");
    assert_eq!(failure.code(), ErrorCode::Config);
    assert_eq!(controller.mode(), ControllerMode::Degraded);
    assert!(controller.port().observed(ObserverKind::Reveal).is_empty());
}

#[test]
fn stale_timer_tokens_are_ignored() {
    let mut controller =
        HeadlessController::headless(HeadlessPage::landing(), ControllerConfig::default());
    controller.initialize();

    controller.handle(UiEvent::TimerFired(TimerToken(9_999)));

    assert_eq!(controller.resize_completions(), 0);
    assert_eq!(controller.pending_timers(), 0);
}

#[test]
fn teardown_cancels_timers_and_releases_everything() {
    let mut controller =
        HeadlessController::headless(HeadlessPage::landing(), ControllerConfig::default());
    controller.initialize();
    controller.open_menu();
    controller.open_modal();
    controller.resize(500.0);
    controller
        .port_mut()
        .fill_signup("Jo Smith", "jo@example.com", "sell");
    controller.submit_form();
    assert!(controller.pending_timers() > 0);

    controller.teardown();

    assert_eq!(controller.mode(), ControllerMode::TornDown);
    assert_eq!(controller.pending_timers(), 0);
    assert_eq!(controller.scheduler().pending_timers(), 0);
    assert!(!controller.is_scroll_locked());
    assert!(controller.port().with_class("mobile-menu-backdrop").is_empty());
    assert!(controller.port().observed(ObserverKind::Reveal).is_empty());
    assert!(controller.port().observed(ObserverKind::Landmark).is_empty());

    let button = controller.port().region(Region::JoinButton).expect("button");
    assert_eq!(controller.port().text(button), Some("Join the Waitlist"));

    controller.advance(5000);
    controller.click(Region::NavToggle);
    assert!(controller.menu_state().is_none());
    assert_eq!(controller.resize_completions(), 0);
}

#[test]
fn refresh_rebuilds_the_controller() {
    let mut controller =
        HeadlessController::headless(HeadlessPage::landing(), ControllerConfig::default());
    controller.initialize();
    let first = controller.animated()[0].element;
    controller.intersect(first, true);
    assert_eq!(controller.reveal_order(), &[first]);

    let report = controller.refresh();

    assert!(report.failure.is_none());
    assert_eq!(controller.mode(), ControllerMode::Ready);
    assert!(controller.reveal_order().is_empty());
    assert_eq!(controller.animated().len(), 4);
    assert!(controller.animated().iter().all(|item| !item.has_played));
    assert_eq!(controller.port().observed(ObserverKind::Reveal).len(), 4);

    controller.click(Region::NavToggle);
    assert!(controller.menu_state().expect("menu").is_open);
}

#[test]
fn visibility_and_runtime_errors_are_accepted_in_any_mode() {
    let mut controller =
        HeadlessController::headless(HeadlessPage::landing(), ControllerConfig::default());

    let hidden = controller.handle(UiEvent::VisibilityChanged { hidden: true });
    let failure = controller.handle(UiEvent::RuntimeError {
        message: "boom".into(),
    });

    assert_eq!(hidden, EventOutcome::default());
    assert_eq!(failure, EventOutcome::default());
}

fn hidden_for_reveal(controller: &HeadlessController) -> Vec<shared::domain::ElementId> {
    let port = controller.port();
    port.animated_elements()
        .into_iter()
        .filter(|markup| {
            port.has_class(markup.element, &markup.kind.class_name())
                && !port.has_class(markup.element, "visible")
        })
        .map(|markup| markup.element)
        .collect()
}

#[test]
fn degraded_setup_leaves_animated_content_readable() {
    for failing in [ObserverKind::Landmark, ObserverKind::Reveal] {
        let mut controller = HeadlessController::headless(
            HeadlessPage::landing().with_failing_observer(failing),
            ControllerConfig::default(),
        );

        let report = controller.initialize();

        assert!(report.is_degraded(), "{failing:?}");
        assert!(hidden_for_reveal(&controller).is_empty(), "{failing:?}");
        for markup in controller.port().animated_elements() {
            assert_eq!(controller.port().style(markup.element, "transition-delay"), None);
            assert_eq!(controller.port().style(markup.element, "animation-delay"), None);
        }
    }
}

#[test]
fn teardown_releases_unrevealed_items_and_keeps_revealed_ones() {
    let mut controller =
        HeadlessController::headless(HeadlessPage::landing(), ControllerConfig::default());
    controller.initialize();
    assert_eq!(hidden_for_reveal(&controller).len(), 4);

    let first = controller.animated()[0].element;
    controller.intersect(first, true);
    controller.teardown();

    assert!(hidden_for_reveal(&controller).is_empty());
    assert!(controller.port().has_class(first, "visible"));

    controller.refresh();
    assert_eq!(controller.mode(), ControllerMode::Ready);
    assert_eq!(hidden_for_reveal(&controller).len(), 3);
}
