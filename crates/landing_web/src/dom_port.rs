//! [`PresentationPort`] over the live document.

use std::{cell::RefCell, collections::BTreeMap};

use landing_core::{
    config::ControllerConfig,
    port::{
        AnimatedMarkup, ObserverKind, PortError, PortResult, PresentationPort, ScrollBehavior,
    },
};
use shared::domain::{AnimationKind, CtaAction, ElementId, Region};
use tracing::debug;
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollToOptions, Window,
};

use crate::{
    app::{self, DomInput},
    registry::ElementRegistry,
};

const FOCUSABLE: &str =
    "button, [href], input, select, textarea, [tabindex]:not([tabindex=\"-1\"])";

struct ObserverHandle {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

struct ObserverSettings {
    threshold: f64,
    reveal_margin: String,
    landmark_margin: String,
}

pub struct DomPort {
    window: Window,
    document: Document,
    registry: RefCell<ElementRegistry<Element>>,
    observers: BTreeMap<ObserverKind, ObserverHandle>,
    settings: ObserverSettings,
}

impl DomPort {
    pub fn new(window: Window, document: Document, config: &ControllerConfig) -> Self {
        Self {
            window,
            document,
            registry: RefCell::new(ElementRegistry::default()),
            observers: BTreeMap::new(),
            settings: ObserverSettings {
                threshold: config.reveal_threshold,
                reveal_margin: config.reveal_root_margin.clone(),
                landmark_margin: config.header_root_margin.clone(),
            },
        }
    }

    pub fn intern(&self, element: &Element) -> ElementId {
        self.registry.borrow_mut().intern(element)
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.registry.borrow().get(id)
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn query_all(&self, scope: &Element, selector: &str) -> Vec<ElementId> {
        let Ok(nodes) = scope.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.intern(&element))
            .collect()
    }

    fn observer(&mut self, kind: ObserverKind) -> PortResult<&IntersectionObserver> {
        if !self.observers.contains_key(&kind) {
            let handle = self.create_observer(kind)?;
            self.observers.insert(kind, handle);
        }
        self.observers
            .get(&kind)
            .map(|handle| &handle.observer)
            .ok_or_else(|| PortError::new("observer missing after creation"))
    }

    fn create_observer(&self, kind: ObserverKind) -> PortResult<ObserverHandle> {
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    app::dispatch(DomInput::Intersection {
                        target: entry.target(),
                        is_intersecting: entry.is_intersecting(),
                    });
                }
            },
        );

        let init = IntersectionObserverInit::new();
        match kind {
            ObserverKind::Reveal => {
                init.set_root_margin(&self.settings.reveal_margin);
                init.set_threshold(&JsValue::from_f64(self.settings.threshold));
            }
            ObserverKind::Landmark => {
                init.set_root_margin(&self.settings.landmark_margin);
                init.set_threshold(&JsValue::from_f64(0.0));
            }
        }

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|err| PortError::new(format!("IntersectionObserver unavailable: {err:?}")))?;
        debug!(?kind, "dom: observer created");
        Ok(ObserverHandle {
            observer,
            _callback: callback,
        })
    }
}

impl PresentationPort for DomPort {
    fn region(&self, region: Region) -> Option<ElementId> {
        let element = self
            .document
            .query_selector(region.selector())
            .ok()
            .flatten()?;
        Some(self.intern(&element))
    }

    fn element_by_dom_id(&self, dom_id: &str) -> Option<ElementId> {
        if dom_id.is_empty() {
            return None;
        }
        let element = self.document.get_element_by_id(dom_id)?;
        Some(self.intern(&element))
    }

    fn animated_elements(&self) -> Vec<AnimatedMarkup> {
        let Some(root) = self.document.document_element() else {
            return Vec::new();
        };
        self.query_all(&root, "[data-animate]")
            .into_iter()
            .filter_map(|id| {
                let element = self.element(id)?;
                let kind = AnimationKind::from(element.get_attribute("data-animate")?);
                let delay_ms = element
                    .get_attribute("data-delay")
                    .and_then(|raw| raw.trim().parse::<u32>().ok());
                Some(AnimatedMarkup {
                    element: id,
                    kind,
                    delay_ms,
                })
            })
            .collect()
    }

    fn menu_links(&self, menu: ElementId) -> Vec<ElementId> {
        self.element(menu)
            .map(|menu| self.query_all(&menu, ".nav__link"))
            .unwrap_or_default()
    }

    fn focusable_within(&self, container: ElementId) -> Vec<ElementId> {
        self.element(container)
            .map(|container| self.query_all(&container, FOCUSABLE))
            .unwrap_or_default()
    }

    fn contains(&self, container: ElementId, target: ElementId) -> bool {
        match (self.element(container), self.element(target)) {
            (Some(container), Some(target)) => container.contains(Some(target.as_ref())),
            _ => false,
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.element(element)
            .is_some_and(|element| element.class_list().contains(class))
    }

    fn anchor_href(&self, target: ElementId) -> Option<String> {
        self.element(target)?
            .closest("a[href]")
            .ok()
            .flatten()?
            .get_attribute("href")
    }

    fn cta_action(&self, target: ElementId) -> Option<CtaAction> {
        let control = self.element(target)?.closest("[id$=\"-cta\"]").ok().flatten()?;
        Some(CtaAction::from_element_id(&control.id()))
    }

    fn active_element(&self) -> Option<ElementId> {
        let element = self.document.active_element()?;
        Some(self.intern(&element))
    }

    fn field_value(&self, element: ElementId) -> String {
        let Some(element) = self.element(element) else {
            return String::new();
        };
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0)
    }

    fn offset_top(&self, element: ElementId) -> f64 {
        self.html(element)
            .map_or(0.0, |element| f64::from(element.offset_top()))
    }

    fn offset_height(&self, element: ElementId) -> f64 {
        self.html(element)
            .map_or(0.0, |element| f64::from(element.offset_height()))
    }

    fn supports_smooth_scroll(&self) -> bool {
        self.document
            .document_element()
            .and_then(|root| root.dyn_into::<HtmlElement>().ok())
            .and_then(|root| js_sys::Reflect::has(&root.style(), &"scrollBehavior".into()).ok())
            .unwrap_or(false)
    }

    fn set_class(&mut self, element: ElementId, class: &str, on: bool) {
        if let Some(element) = self.element(element) {
            if let Err(err) = element.class_list().toggle_with_force(class, on) {
                debug!(?err, class, "dom: class update failed");
            }
        }
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: Option<&str>) {
        let Some(element) = self.html(element) else {
            return;
        };
        let style = element.style();
        let result = match value {
            Some(value) => style.set_property(property, value),
            None => style.remove_property(property).map(|_| ()),
        };
        if let Err(err) = result {
            debug!(?err, property, "dom: style update failed");
        }
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: Option<&str>) {
        let Some(element) = self.element(element) else {
            return;
        };
        let result = match value {
            Some(value) => element.set_attribute(name, value),
            None => element.remove_attribute(name),
        };
        if let Err(err) = result {
            debug!(?err, name, "dom: attribute update failed");
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(element) = self.element(element) {
            element.set_text_content(Some(text));
        }
    }

    fn focus(&mut self, element: ElementId) {
        if let Some(element) = self.html(element) {
            if let Err(err) = element.focus() {
                debug!(?err, "dom: focus failed");
            }
        }
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn reset_form(&mut self, form: ElementId) {
        if let Some(form) = self
            .element(form)
            .and_then(|form| form.dyn_into::<HtmlFormElement>().ok())
        {
            form.reset();
        }
    }

    fn insert_backdrop(&mut self) -> PortResult<ElementId> {
        let body = self
            .document
            .body()
            .ok_or_else(|| PortError::new("document has no body"))?;
        let backdrop = self
            .document
            .create_element("div")
            .map_err(|err| PortError::new(format!("create backdrop: {err:?}")))?;
        backdrop.set_class_name("mobile-menu-backdrop");
        body.append_child(&backdrop)
            .map_err(|err| PortError::new(format!("append backdrop: {err:?}")))?;
        Ok(self.intern(&backdrop))
    }

    fn insert_form_error(&mut self, anchor: ElementId, message: &str) -> PortResult<ElementId> {
        let anchor = self
            .element(anchor)
            .ok_or_else(|| PortError::new("form error anchor is gone"))?;
        let node = self
            .document
            .create_element("div")
            .map_err(|err| PortError::new(format!("create form error: {err:?}")))?;
        node.set_class_name("form-error");
        node.set_text_content(Some(message));
        anchor
            .after_with_node_1(&node)
            .map_err(|err| PortError::new(format!("insert form error: {err:?}")))?;
        Ok(self.intern(&node))
    }

    fn remove_element(&mut self, element: ElementId) {
        if let Some(node) = self.element(element) {
            node.remove();
        }
        self.registry.borrow_mut().forget(element);
    }

    fn open_external(&mut self, url: &str, features: &str) -> bool {
        matches!(
            self.window
                .open_with_url_and_target_and_features(url, "_blank", features),
            Ok(Some(_))
        )
    }

    fn observe(&mut self, observer: ObserverKind, element: ElementId) -> PortResult<()> {
        let target = self
            .element(element)
            .ok_or_else(|| PortError::new(format!("element {} is not registered", element.0)))?;
        self.observer(observer)?.observe(&target);
        Ok(())
    }

    fn unobserve(&mut self, observer: ObserverKind, element: ElementId) {
        if let (Some(handle), Some(target)) = (self.observers.get(&observer), self.element(element))
        {
            handle.observer.unobserve(&target);
        }
    }

    fn disconnect(&mut self, observer: ObserverKind) {
        if let Some(handle) = self.observers.remove(&observer) {
            handle.observer.disconnect();
        }
    }
}
