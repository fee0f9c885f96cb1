// DOM helpers shared by the bootstrap and the overlay component
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, MouseEvent,
    MutationObserver, MutationObserverInit, MutationRecord, TouchEvent, Window,
};

use crate::state::ZoomState;

pub const CONTROLS_CLASS: &str = "ksxr-zoom-controls";
const STYLE_ELEMENT_ID: &str = "ksxr-zoom-style";
const LOADING_ICON_ID: &str = "loadingIcon";

fn style_rules(container_id: &str) -> String {
    format!(
        r#"
.ksxr-zoom-controls {{
    position: absolute;
    top: 10px;
    right: 10px;
    z-index: 10000;
    display: flex;
    flex-direction: column;
    gap: 5px;
}}
.ksxr-zoom-btn {{
    width: 40px;
    height: 40px;
    border: none;
    border-radius: 4px;
    background-color: #0d5f63;
    color: white;
    font-size: 20px;
    font-weight: bold;
    cursor: pointer;
    display: flex;
    align-items: center;
    justify-content: center;
}}
.ksxr-zoom-reset {{
    background-color: #666;
}}
.ksxr-zoom-indicator {{
    background-color: rgba(255,255,255,0.7);
    border-radius: 4px;
    text-align: center;
    padding: 4px;
    font-size: 12px;
}}
#{container_id} {{
    overflow: hidden !important;
    position: relative !important;
}}
"#
    )
}

/// Adds the control styles to `<head>` unless they are already present.
pub fn inject_styles(document: &Document, container_id: &str) {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return;
    }
    let Some(head) = document.head() else {
        return;
    };
    let Ok(style) = document.create_element("style") else {
        return;
    };
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(&style_rules(container_id)));
    let _ = head.append_child(&style);
}

/// Creates the element the controls are rendered into and appends it to the container.
pub fn create_controls_root(document: &Document, container: &HtmlElement) -> Option<Element> {
    let root = document.create_element("div").ok()?;
    root.set_class_name(CONTROLS_CLASS);
    container.append_child(&root).ok()?;
    Some(root)
}

/// Whether an image is one the widget is showing rather than a hidden frame,
/// the loading spinner, or part of our own controls.
pub fn is_candidate(display: &str, id: &str, in_controls: bool) -> bool {
    display != "none" && id != LOADING_ICON_ID && !in_controls
}

/// Index of the first candidate among `(display, id, in_controls)` triples, in document order.
pub fn first_candidate<'a>(
    images: impl IntoIterator<Item = (&'a str, &'a str, bool)>,
) -> Option<usize> {
    images
        .into_iter()
        .position(|(display, id, in_controls)| is_candidate(display, id, in_controls))
}

/// First image under the container that the widget is currently showing.
pub fn find_visible_image(container: &HtmlElement) -> Option<HtmlElement> {
    let list = container.query_selector_all("img").ok()?;
    let images: Vec<HtmlElement> = (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect();
    let traits: Vec<(String, String, bool)> = images
        .iter()
        .map(|img| {
            let display = img.style().get_property_value("display").unwrap_or_default();
            let in_controls = matches!(
                img.closest(&format!(".{CONTROLS_CLASS}")),
                Ok(Some(_))
            );
            (display, img.id(), in_controls)
        })
        .collect();
    let idx = first_candidate(
        traits
            .iter()
            .map(|(display, id, in_controls)| (display.as_str(), id.as_str(), *in_controls)),
    )?;
    images.into_iter().nth(idx)
}

/// Writes the current transform onto the visible image. No-op mid-transition.
pub fn apply_zoom(container: &HtmlElement, zoom: &ZoomState) {
    let Some(img) = find_visible_image(container) else {
        return;
    };
    let style = img.style();
    let _ = style.set_property("transform-origin", "center");
    let _ = style.set_property("transform", &zoom.transform_css());
    let _ = container.style().set_property("cursor", zoom.cursor());
}

/// Pointer position relative to the container center.
pub fn offset_from_center(container: &HtmlElement, client_x: f64, client_y: f64) -> (f64, f64) {
    let rect = container.get_bounding_client_rect();
    let cx = container.offset_width() as f64 / 2.0;
    let cy = container.offset_height() as f64 / 2.0;
    (client_x - rect.left() - cx, client_y - rect.top() - cy)
}

/// Client coordinates of a mouse event or of the first touch point.
pub fn client_point(e: &Event) -> Option<(f64, f64)> {
    if let Some(t) = e.dyn_ref::<TouchEvent>() {
        let t0 = t.touches().item(0)?;
        return Some((t0.client_x() as f64, t0.client_y() as f64));
    }
    let m = e.dyn_ref::<MouseEvent>()?;
    Some((m.client_x() as f64, m.client_y() as f64))
}

/// Runs `f` once after `ms` milliseconds. Pending timers are never cancelled.
pub fn defer(window: &Window, ms: i32, f: impl FnOnce() + 'static) {
    let cb = Closure::once_into_js(f);
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms);
}

pub type EventClosure = Closure<dyn FnMut(Event)>;

pub fn event_closure(f: impl FnMut(Event) + 'static) -> EventClosure {
    Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>)
}

/// Registers a listener that may call `preventDefault` (touch listeners default to passive).
pub fn listen_active(target: &EventTarget, kind: &str, cb: &EventClosure) {
    let opts = AddEventListenerOptions::new();
    opts.set_passive(false);
    let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        cb.as_ref().unchecked_ref(),
        &opts,
    );
}

pub fn listen(target: &EventTarget, kind: &str, cb: &EventClosure) {
    let _ = target.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref());
}

pub fn unlisten(target: &EventTarget, kind: &str, cb: &EventClosure) {
    let _ = target.remove_event_listener_with_callback(kind, cb.as_ref().unchecked_ref());
}

/// Listener that stays registered until dropped.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: EventClosure,
}

impl Listener {
    pub fn new(target: &EventTarget, kind: &'static str, f: impl FnMut(Event) + 'static) -> Self {
        let callback = event_closure(f);
        listen(target, kind, &callback);
        Self {
            target: target.clone(),
            kind,
            callback,
        }
    }

    pub fn new_active(
        target: &EventTarget,
        kind: &'static str,
        f: impl FnMut(Event) + 'static,
    ) -> Self {
        let callback = event_closure(f);
        listen_active(target, kind, &callback);
        Self {
            target: target.clone(),
            kind,
            callback,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        unlisten(&self.target, self.kind, &self.callback);
    }
}

/// Whether a mutation record reflects the widget redrawing its image.
pub fn is_redraw(kind: &str, attribute: Option<&str>) -> bool {
    kind == "childList" || (kind == "attributes" && attribute == Some("style"))
}

/// Watches the container subtree for the widget swapping or restyling images.
pub struct ViewerObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl ViewerObserver {
    /// Calls `on_redraw` once per relevant record.
    pub fn watch(container: &HtmlElement, on_redraw: Rc<dyn Fn()>) -> Option<Self> {
        let callback = Closure::wrap(Box::new(move |records: Array, _obs: MutationObserver| {
            for record in records.iter() {
                let Ok(record) = record.dyn_into::<MutationRecord>() else {
                    continue;
                };
                if is_redraw(&record.type_(), record.attribute_name().as_deref()) {
                    on_redraw();
                }
            }
        }) as Box<dyn FnMut(Array, MutationObserver)>);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).ok()?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        init.set_attributes(true);
        init.set_attribute_filter(&Array::of1(&"style".into()));
        observer.observe_with_options(container, &init).ok()?;
        Some(Self {
            observer,
            _callback: callback,
        })
    }

    /// Drops queued records, used right after our own style writes so they don't echo back.
    pub fn discard_pending(&self) {
        let _ = self.observer.take_records();
    }
}

impl Drop for ViewerObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
