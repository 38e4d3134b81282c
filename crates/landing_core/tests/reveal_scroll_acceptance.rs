use landing_core::{
    headless::{HeadlessController, HeadlessPage},
    port::{ObserverKind, ScrollBehavior},
    smooth_scroll::{DurationPolicy, Easing},
    ControllerConfig, PresentationPort, UiEvent,
};
use shared::domain::{AnimationKind, ElementId, Region};

fn ready_with(page: HeadlessPage, config: ControllerConfig) -> HeadlessController {
    let mut controller = HeadlessController::headless(page, config);
    let report = controller.initialize();
    assert!(report.failure.is_none());
    controller
}

fn ready(page: HeadlessPage) -> HeadlessController {
    ready_with(page, ControllerConfig::default())
}

fn animated(controller: &HeadlessController, kind: AnimationKind) -> ElementId {
    controller
        .animated()
        .iter()
        .find(|item| item.kind == kind)
        .map(|item| item.element)
        .expect("animated element")
}

fn nav_link(controller: &HeadlessController, href: &str) -> ElementId {
    let menu = controller.port().region(Region::NavMenu).expect("menu");
    controller
        .port()
        .menu_links(menu)
        .into_iter()
        .find(|link| controller.port().anchor_href(*link).as_deref() == Some(href))
        .expect("nav link")
}

#[test]
fn initialization_prepares_and_observes_animated_elements() {
    let controller = ready(HeadlessPage::landing());

    let items = controller.animated();
    assert_eq!(items.len(), 4);
    let observed = controller.port().observed(ObserverKind::Reveal);
    for item in items {
        assert!(observed.contains(&item.element));
        assert!(controller
            .port()
            .has_class(item.element, &item.kind.class_name()));
        assert!(!item.has_played);
    }

    let delayed = animated(&controller, AnimationKind::FadeIn);
    assert_eq!(
        controller.port().style(delayed, "transition-delay"),
        Some("200ms")
    );
    let immediate = animated(&controller, AnimationKind::FadeUp);
    assert_eq!(controller.port().style(immediate, "transition-delay"), None);
}

#[test]
fn each_element_reveals_exactly_once() {
    let mut controller = ready(HeadlessPage::landing());
    let fade_up = animated(&controller, AnimationKind::FadeUp);
    let fade_in = animated(&controller, AnimationKind::FadeIn);

    controller.intersect(fade_up, false);
    assert!(controller.reveal_order().is_empty());

    controller.intersect(fade_in, true);
    controller.intersect(fade_up, true);
    controller.intersect(fade_up, false);
    controller.intersect(fade_up, true);
    controller.intersect(fade_in, true);

    assert_eq!(controller.reveal_order(), &[fade_in, fade_up]);
    assert!(controller.port().has_class(fade_up, "visible"));
    assert!(!controller
        .port()
        .observed(ObserverKind::Reveal)
        .contains(&fade_up));
    assert!(controller
        .animated()
        .iter()
        .filter(|item| item.element == fade_up || item.element == fade_in)
        .all(|item| item.has_played));
}

#[test]
fn transition_end_marks_completion_only_after_reveal() {
    let mut controller = ready(HeadlessPage::landing());
    let element = animated(&controller, AnimationKind::FadeUp);

    controller.handle(UiEvent::TransitionEnd { target: element });
    assert!(!controller.port().has_class(element, "animation-complete"));

    controller.intersect(element, true);
    controller.handle(UiEvent::TransitionEnd { target: element });
    assert!(controller.port().has_class(element, "animation-complete"));
}

#[test]
fn trust_items_ripple_then_settle() {
    let mut controller = ready(HeadlessPage::landing());
    let item = animated(&controller, AnimationKind::ScaleIn);
    let plain = animated(&controller, AnimationKind::FadeUp);

    controller.intersect(item, true);
    controller.intersect(plain, true);
    assert_eq!(controller.port().style(item, "transform"), Some("scale(1.02)"));
    assert_eq!(controller.port().style(plain, "transform"), None);

    controller.advance(300);
    assert_eq!(controller.port().style(item, "transform"), Some("scale(1)"));
}

#[test]
fn header_tracks_hero_visibility() {
    let mut controller = ready(HeadlessPage::landing());
    let header = controller.port().region(Region::Header).expect("header");
    let hero = controller.port().region(Region::Hero).expect("hero");
    assert!(controller
        .port()
        .observed(ObserverKind::Landmark)
        .contains(&hero));
    assert_eq!(controller.header_scrolled(), Some(false));

    controller.intersect(hero, false);
    assert!(controller.port().has_class(header, "scrolled"));
    assert_eq!(controller.header_scrolled(), Some(true));

    controller.intersect(hero, true);
    assert!(!controller.port().has_class(header, "scrolled"));
}

#[test]
fn anchor_scroll_offsets_by_header_and_gutter() {
    let mut controller = ready(HeadlessPage::landing());
    let link = nav_link(&controller, "#features");

    let outcome = controller.click_element(link);

    assert!(outcome.prevent_default);
    assert_eq!(
        controller.port().scroll_requests().last(),
        Some(&(900.0, ScrollBehavior::Smooth))
    );
}

#[test]
fn anchor_from_open_menu_closes_it_before_scrolling() {
    let mut controller = ready(HeadlessPage::landing());
    let link = nav_link(&controller, "#pricing");

    controller.click(Region::NavToggle);
    controller.click_element(link);

    assert!(!controller.menu_state().expect("menu").is_open);
    assert!(!controller.is_scroll_locked());
    assert_eq!(
        controller.port().scroll_requests().last(),
        Some(&(1900.0, ScrollBehavior::Smooth))
    );
}

#[test]
fn unknown_anchor_target_is_ignored() {
    let mut controller = ready(HeadlessPage::landing());
    assert_eq!(controller.scroll_to_anchor("nowhere"), None);
    assert_eq!(controller.scroll_to_anchor(""), None);
    assert!(controller.port().scroll_requests().is_empty());
}

#[test]
fn manual_animation_reaches_target_when_smooth_scroll_is_unsupported() {
    let mut controller = ready(HeadlessPage::landing().without_smooth_scroll());
    let link = nav_link(&controller, "#features");

    controller.click_element(link);
    assert!(controller.is_scroll_animating());

    controller.advance(200);
    let midway = controller.port().current_scroll();
    assert!(midway > 0.0 && midway < 900.0, "midway was {midway}");

    controller.advance(1000);
    assert!(!controller.is_scroll_animating());
    assert_eq!(controller.port().current_scroll(), 900.0);
    assert!(controller
        .port()
        .scroll_requests()
        .iter()
        .all(|(_, behavior)| *behavior == ScrollBehavior::Instant));
}

#[test]
fn fixed_duration_quad_animation_takes_eight_hundred_ms() {
    let config = ControllerConfig {
        scroll_easing: Easing::Quad,
        scroll_duration: DurationPolicy::FixedMs(800),
        ..ControllerConfig::default()
    };
    let mut controller = ready_with(HeadlessPage::landing().without_smooth_scroll(), config);

    assert_eq!(controller.scroll_to_anchor("join"), Some(2900.0));
    controller.advance(16 + 784);
    assert!(controller.is_scroll_animating());
    controller.advance(16);
    assert!(!controller.is_scroll_animating());
    assert_eq!(controller.port().current_scroll(), 2900.0);
}

#[test]
fn resize_burst_settles_once() {
    let mut controller = ready(HeadlessPage::landing());

    for step in 0..10 {
        controller.resize(400.0 + f64::from(step));
        controller.advance(5);
    }
    assert_eq!(controller.resize_completions(), 0);

    controller.advance(250);
    assert_eq!(controller.resize_completions(), 1);
}

#[test]
fn orientation_change_sets_viewport_unit_after_settling() {
    let mut page = HeadlessPage::landing();
    page.set_viewport(375.0, 640.0);
    let mut controller = ready(page);
    let root = controller.port().region(Region::Root).expect("root");

    controller.handle(UiEvent::OrientationChange);
    assert_eq!(controller.port().style(root, "--vh"), None);

    controller.advance(100);
    assert_eq!(controller.port().style(root, "--vh"), Some("6.4px"));
}

#[test]
fn touch_feedback_scales_the_toggle() {
    let mut controller = ready(HeadlessPage::landing());
    let toggle = controller.port().region(Region::NavToggle).expect("toggle");

    controller.handle(UiEvent::TouchStart { target: toggle });
    assert_eq!(controller.port().style(toggle, "transform"), Some("scale(0.95)"));
    controller.handle(UiEvent::TouchEnd { target: toggle });
    assert_eq!(controller.port().style(toggle, "transform"), Some("scale(1)"));
}

#[test]
fn opening_the_modal_stops_a_manual_scroll_where_it_is() {
    let mut controller = ready(HeadlessPage::landing().without_smooth_scroll());
    controller.scroll_to_anchor("join");
    controller.advance(200);
    let pinned_at = controller.port().current_scroll();
    assert!(pinned_at > 0.0 && pinned_at < 2900.0, "pinned at {pinned_at}");

    controller.open_modal();
    assert!(!controller.is_scroll_animating());
    let requests = controller.port().scroll_requests().len();

    controller.advance(2000);
    assert_eq!(controller.port().scroll_requests().len(), requests);

    controller.close_modal();
    assert_eq!(
        controller.port().scroll_requests().last(),
        Some(&(pinned_at, ScrollBehavior::Instant))
    );
    assert_eq!(controller.port().current_scroll(), pinned_at);
}

#[test]
fn anchor_near_the_top_scrolls_to_zero() {
    let mut controller = ready(HeadlessPage::landing());
    assert_eq!(controller.scroll_to_anchor("hero"), Some(0.0));
    assert_eq!(
        controller.port().scroll_requests().last(),
        Some(&(0.0, ScrollBehavior::Smooth))
    );
}
