use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Event, HtmlElement, Window};

mod components;
mod dom;
mod model;
mod state;
mod util;

use components::{ZoomOverlay, ZoomOverlayProps};
use model::{CONFIG_ELEMENT_ID, ZoomConfig};
use util::clog;

fn load_config(document: &Document) -> ZoomConfig {
    let Some(raw) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return ZoomConfig::default();
    };
    match ZoomConfig::from_json(&raw) {
        Ok(cfg) => cfg,
        Err(err) => {
            clog(&format!("ignoring invalid #{CONFIG_ELEMENT_ID}: {err}"));
            ZoomConfig::default()
        }
    }
}

// Mounts the controls into the viewer container; silently skipped when the viewer is absent.
fn initialize(document: &Document, config: Rc<ZoomConfig>) {
    let Some(container) = document
        .get_element_by_id(&config.container_id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        clog(&format!("#{} not found, zoom disabled", config.container_id));
        return;
    };
    dom::inject_styles(document, &config.container_id);
    let config_json = config.to_json();
    let Some(root) = dom::create_controls_root(document, &container) else {
        return;
    };
    yew::Renderer::<ZoomOverlay>::with_root_and_props(root, ZoomOverlayProps { container, config })
        .render();
    clog(&format!("zoom controls mounted: {}", config_json));
}

// Config is read once the page has loaded so a trailing config script is seen.
fn schedule_initialize(window: &Window, document: Document) {
    let config = Rc::new(load_config(&document));
    let delay = config.init_delay_ms;
    dom::defer(window, delay, move || initialize(&document, config));
}

fn main() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    if document.ready_state() == "complete" {
        schedule_initialize(&window, document);
        return;
    }
    let on_load = {
        let window = window.clone();
        Closure::once_into_js(move |_e: Event| schedule_initialize(&window, document))
    };
    let _ = window.add_event_listener_with_callback("load", on_load.unchecked_ref());
}
