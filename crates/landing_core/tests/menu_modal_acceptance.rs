use landing_core::{
    headless::{HeadlessController, HeadlessPage},
    modal::ModalOpen,
    port::ScrollBehavior,
    ControllerConfig, PresentationPort,
};
use shared::domain::{Key, Region};

fn ready(page: HeadlessPage) -> HeadlessController {
    let mut controller = HeadlessController::headless(page, ControllerConfig::default());
    let report = controller.initialize();
    assert!(report.failure.is_none(), "init failed: {:?}", report.failure);
    controller
}

fn region(controller: &HeadlessController, region: Region) -> shared::domain::ElementId {
    controller.port().region(region).expect("region present")
}

fn menu_links(controller: &HeadlessController) -> Vec<shared::domain::ElementId> {
    let menu = region(controller, Region::NavMenu);
    controller.port().menu_links(menu)
}

#[test]
fn toggle_parity_matches_open_state() {
    let mut controller = ready(HeadlessPage::landing());
    let menu = region(&controller, Region::NavMenu);
    let toggle = region(&controller, Region::NavToggle);

    for presses in 1..=7 {
        controller.click(Region::NavToggle);
        let expected = presses % 2 == 1;
        assert_eq!(controller.menu_state().expect("menu").is_open, expected);
        assert_eq!(controller.port().has_class(menu, "active"), expected);
        assert_eq!(
            controller.port().attribute(toggle, "aria-expanded"),
            Some(if expected { "true" } else { "false" })
        );
        assert_eq!(controller.is_scroll_locked(), expected);
    }
}

#[test]
fn open_menu_pins_body_and_close_restores_offset() {
    let mut page = HeadlessPage::landing();
    page.set_scroll_offset(450.0);
    let mut controller = ready(page);
    let body = region(&controller, Region::Body);

    controller.click(Region::NavToggle);
    assert_eq!(controller.port().style(body, "position"), Some("fixed"));
    assert_eq!(controller.port().style(body, "top"), Some("-450px"));
    assert_eq!(
        controller.menu_state().expect("menu").saved_scroll_offset,
        Some(450.0)
    );

    controller.click(Region::NavToggle);
    assert_eq!(controller.port().style(body, "position"), None);
    assert_eq!(controller.port().style(body, "overflow"), None);
    assert_eq!(
        controller.port().scroll_requests().last(),
        Some(&(450.0, ScrollBehavior::Instant))
    );
    assert_eq!(controller.menu_state().expect("menu").saved_scroll_offset, None);
}

#[test]
fn backdrop_fades_in_on_next_frame_and_is_removed_after_fade_out() {
    let mut controller = ready(HeadlessPage::landing());

    controller.click(Region::NavToggle);
    let backdrop = controller.menu_backdrop().expect("backdrop inserted");
    assert_eq!(controller.port().style(backdrop, "opacity"), Some("0"));

    controller.advance(16);
    assert_eq!(controller.port().style(backdrop, "opacity"), Some("1"));

    controller.click(Region::NavToggle);
    assert!(controller.port().is_attached(backdrop));
    controller.advance(299);
    assert!(controller.port().is_attached(backdrop));
    controller.advance(1);
    assert!(!controller.port().is_attached(backdrop));
}

#[test]
fn rapid_toggling_never_leaves_more_than_one_backdrop() {
    let mut controller = ready(HeadlessPage::landing());

    for _ in 0..5 {
        controller.click(Region::NavToggle);
        controller.advance(100);
        assert!(controller.port().with_class("mobile-menu-backdrop").len() <= 1);
    }
    // Five presses leave the menu open with its live backdrop.
    let live = controller.menu_backdrop().expect("live backdrop");
    controller.advance(1000);
    assert_eq!(controller.port().with_class("mobile-menu-backdrop"), vec![live]);

    controller.click(Region::NavToggle);
    controller.advance(300);
    assert!(controller.port().with_class("mobile-menu-backdrop").is_empty());
}

#[test]
fn menu_links_slide_in_with_staggered_delays() {
    let mut controller = ready(HeadlessPage::landing());
    let links = menu_links(&controller);
    assert_eq!(links.len(), 4);

    controller.click(Region::NavToggle);
    for (index, link) in links.iter().enumerate() {
        let delay = format!("{}ms", index * 50);
        assert!(controller.port().has_class(*link, "slide-in"));
        assert_eq!(
            controller.port().style(*link, "animation-delay"),
            Some(delay.as_str())
        );
    }
    assert_eq!(controller.port().focused(), Some(links[0]));

    controller.click(Region::NavToggle);
    assert!(links
        .iter()
        .all(|link| !controller.port().has_class(*link, "slide-in")));
}

#[test]
fn outside_click_and_plain_link_close_the_menu_but_inner_click_does_not() {
    let mut controller = ready(HeadlessPage::landing());
    let links = menu_links(&controller);

    controller.click(Region::NavToggle);
    controller.click(Region::NavMenu);
    assert!(controller.menu_state().expect("menu").is_open);

    controller.click(Region::Hero);
    assert!(!controller.menu_state().expect("menu").is_open);

    controller.click(Region::NavToggle);
    let outcome = controller.click_element(links[3]);
    assert!(!outcome.prevent_default);
    assert!(!controller.menu_state().expect("menu").is_open);
}

#[test]
fn crossing_to_desktop_width_closes_the_menu() {
    let mut controller = ready(HeadlessPage::landing());

    controller.click(Region::NavToggle);
    controller.resize(600.0);
    assert!(controller.menu_state().expect("menu").is_open);

    controller.resize(1024.0);
    assert!(!controller.menu_state().expect("menu").is_open);
    assert!(!controller.is_scroll_locked());
}

#[test]
fn keyboard_opens_menu_and_tab_wraps_inside_it() {
    let mut controller = ready(HeadlessPage::landing());
    let toggle = region(&controller, Region::NavToggle);
    let links = menu_links(&controller);

    controller.port_mut().focus(toggle);
    let outcome = controller.press(Key::Enter, false);
    assert!(outcome.prevent_default);
    assert!(controller.menu_state().expect("menu").is_open);
    assert_eq!(controller.port().focused(), Some(links[0]));

    let outcome = controller.press(Key::Tab, true);
    assert!(outcome.prevent_default);
    assert_eq!(controller.port().focused(), Some(links[3]));

    let outcome = controller.press(Key::Tab, false);
    assert!(outcome.prevent_default);
    assert_eq!(controller.port().focused(), Some(links[0]));

    controller.port_mut().focus(links[1]);
    let outcome = controller.press(Key::Tab, false);
    assert!(!outcome.prevent_default);

    controller.press(Key::Escape, false);
    assert!(!controller.menu_state().expect("menu").is_open);
}

#[test]
fn space_on_another_element_does_not_toggle() {
    let mut controller = ready(HeadlessPage::landing());
    let button = region(&controller, Region::JoinButton);

    controller.port_mut().focus(button);
    let outcome = controller.press(Key::Space, false);
    assert!(!outcome.prevent_default);
    assert!(!controller.menu_state().expect("menu").is_open);
}

#[test]
fn cta_shows_loading_overlay_and_opens_modal_with_focus_on_close() {
    let mut controller = ready(HeadlessPage::landing());
    let overlay = region(&controller, Region::LoadingOverlay);
    let close = region(&controller, Region::ModalClose);
    let cta = controller
        .port()
        .element_by_dom_id("hero-cta")
        .expect("hero cta");

    controller.port_mut().focus(cta);
    let outcome = controller.click_element(cta);
    assert!(outcome.prevent_default);
    assert!(controller.modal_state().is_open);
    assert_eq!(controller.modal_state().last_focused, Some(cta));
    assert_eq!(controller.port().focused(), Some(close));
    assert!(controller.port().has_class(overlay, "active"));
    assert!(controller.is_scroll_locked());

    controller.advance(500);
    assert!(!controller.port().has_class(overlay, "active"));

    controller.click(Region::ModalOverlay);
    assert!(!controller.modal_state().is_open);
    assert_eq!(controller.port().focused(), Some(cta));
    assert!(!controller.is_scroll_locked());
}

#[test]
fn clicks_inside_modal_content_do_not_dismiss() {
    let mut controller = ready(HeadlessPage::landing());
    controller.open_modal();

    let outcome = controller.click(Region::ModalContent);
    assert!(outcome.stop_propagation);
    assert!(!outcome.prevent_default);
    assert!(controller.modal_state().is_open);

    controller.click(Region::ModalClose);
    assert!(!controller.modal_state().is_open);
}

#[test]
fn opening_an_open_modal_is_a_no_op() {
    let mut controller = ready(HeadlessPage::landing());
    assert_eq!(controller.open_modal(), ModalOpen::Opened);
    assert_eq!(controller.open_modal(), ModalOpen::AlreadyOpen);
    assert!(controller.close_modal());
    assert!(!controller.close_modal());
}

#[test]
fn tab_wraps_inside_the_modal() {
    let mut controller = ready(HeadlessPage::landing());
    let close = region(&controller, Region::ModalClose);
    let content = region(&controller, Region::ModalContent);
    let form_link = controller
        .port()
        .focusable_within(content)
        .into_iter()
        .find(|element| *element != close)
        .expect("form link");

    controller.open_modal();
    controller.press(Key::Tab, true);
    assert_eq!(controller.port().focused(), Some(form_link));
    controller.press(Key::Tab, false);
    assert_eq!(controller.port().focused(), Some(close));
}

#[test]
fn scroll_lock_is_held_while_either_overlay_is_open() {
    let mut page = HeadlessPage::landing();
    page.set_scroll_offset(300.0);
    let mut controller = ready(page);
    let body = region(&controller, Region::Body);

    assert!(controller.open_menu());
    controller.open_modal();
    assert!(controller.close_menu());
    assert!(controller.is_scroll_locked());
    assert_eq!(controller.port().style(body, "overflow"), Some("hidden"));

    assert!(controller.close_modal());
    assert!(!controller.is_scroll_locked());
    assert_eq!(controller.port().style(body, "overflow"), None);
    assert_eq!(controller.port().current_scroll(), 300.0);
}

#[test]
fn closing_modal_first_keeps_menu_lock() {
    let mut controller = ready(HeadlessPage::landing());

    controller.open_modal();
    controller.open_menu();
    controller.close_modal();
    assert!(controller.is_scroll_locked());
    controller.close_menu();
    assert!(!controller.is_scroll_locked());
}

#[test]
fn escape_closes_menu_and_modal_together() {
    let mut controller = ready(HeadlessPage::landing());

    controller.open_menu();
    controller.open_modal();
    controller.press(Key::Escape, false);

    assert!(!controller.menu_state().expect("menu").is_open);
    assert!(!controller.modal_state().is_open);
    assert!(!controller.is_scroll_locked());
}

#[test]
fn missing_modal_falls_back_to_external_window() {
    let mut controller = ready(HeadlessPage::landing().without(Region::Modal));

    let cta = controller
        .port()
        .element_by_dom_id("pricing-cta")
        .expect("pricing cta");
    controller.click_element(cta);

    assert_eq!(
        controller.port().external_opens(),
        vec![(
            "https://forms.google.com/".to_string(),
            "width=600,height=700,scrollbars=yes,resizable=yes".to_string()
        )]
    );
    assert!(!controller.modal_state().is_open);
    assert!(!controller.is_scroll_locked());
}

#[test]
fn blocked_popup_is_reported() {
    let mut controller = ready(
        HeadlessPage::landing()
            .without(Region::Modal)
            .with_popups_blocked(),
    );
    assert_eq!(
        controller.open_modal(),
        ModalOpen::External { opened: false }
    );
}
