//! Browser host for the landing page controller.
//!
//! Mounts on `DOMContentLoaded` (or immediately when the document is already
//! parsed). Settings come from an optional
//! `<script id="landing-config" type="application/json">` block holding a
//! partial `ControllerConfig` plus an optional `"log"` filter.

mod app;
mod bindings;
mod dom_port;
mod logging;
mod registry;
mod scheduler;

use std::rc::Rc;

use landing_core::ControllerConfig;
use serde_json::Value;
use shared::error::{ControllerError, ErrorReport};
use tracing::{error, info, warn};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{Document, Window};

use crate::{app::App, bindings::Bindings, dom_port::DomPort, scheduler::BrowserScheduler};

const CONFIG_ELEMENT_ID: &str = "landing-config";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let (config, filter) = read_config(&document);
    logging::init(&filter);

    if document.ready_state() == "loading" {
        let ready_target = document.clone();
        let on_ready = Closure::once_into_js(move || {
            if let Err(err) = mount(window, document, config) {
                error!(?err, "landing: mount failed");
            }
        });
        ready_target
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
        return Ok(());
    }
    mount(window, document, config)
}

/// Tears the controller down and re-runs setup against the current
/// document. Listeners stay attached.
#[wasm_bindgen(js_name = refreshLanding)]
pub fn refresh_landing() -> Result<(), JsValue> {
    let app = app::current().ok_or_else(|| report_error(ControllerError::NotInitialized))?;
    let report = app.refresh();
    match report.failure {
        Some(failure) => Err(report_error(failure)),
        None => Ok(()),
    }
}

/// Removes every listener, timer and observer the controller installed.
#[wasm_bindgen(js_name = destroyLanding)]
pub fn destroy_landing() {
    match app::uninstall() {
        Some(app) => {
            app.teardown();
            info!("landing: destroyed");
        }
        None => warn!("landing: destroy called before mount"),
    }
}

fn mount(window: Window, document: Document, config: ControllerConfig) -> Result<(), JsValue> {
    let port = DomPort::new(window.clone(), document.clone(), &config);
    let scheduler = BrowserScheduler::new(window.clone());
    let app = Rc::new(App::new(port, scheduler, config));
    if let Some(previous) = app::install(Rc::clone(&app)) {
        previous.teardown();
    }

    let report = app.initialize();
    if let Some(failure) = &report.failure {
        warn!(code = ?failure.code(), "landing: running with the fallback menu toggle");
    }
    app.attach(Bindings::install(&window, &document)?);
    info!(
        missing = report.missing.len(),
        animated = report.animated,
        "landing: mounted"
    );
    Ok(())
}

fn read_config(document: &Document) -> (ControllerConfig, String) {
    let default_filter = logging::DEFAULT_FILTER.to_string();
    let Some(raw) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return (ControllerConfig::default(), default_filter);
    };

    let mut value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            gloo_console::warn!(format!("landing: ignoring malformed config: {err}"));
            return (ControllerConfig::default(), default_filter);
        }
    };
    let filter = value
        .as_object_mut()
        .and_then(|object| object.remove("log"))
        .and_then(|log| log.as_str().map(str::to_string))
        .unwrap_or(default_filter);
    let config = serde_json::from_value(value).unwrap_or_else(|err| {
        gloo_console::warn!(format!("landing: ignoring invalid config: {err}"));
        ControllerConfig::default()
    });
    (config, filter)
}

fn report_error(err: ControllerError) -> JsValue {
    let report = ErrorReport::from(err);
    JsValue::from_str(&format!("{:?}: {}", report.code, report.message))
}
