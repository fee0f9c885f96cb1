use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlElement, WheelEvent};
use yew::prelude::*;

use super::zoom_controls::ZoomControls;
use crate::dom::{self, EventClosure, Listener, ViewerObserver};
use crate::model::ZoomConfig;
use crate::state::{ZoomDirection, ZoomState};

#[derive(Properties, PartialEq, Clone)]
pub struct ZoomOverlayProps {
    /// Element the viewer widget draws its images into.
    pub container: HtmlElement,
    pub config: Rc<ZoomConfig>,
}

type Reapply = Rc<dyn Fn()>;
type Step = Rc<dyn Fn(ZoomDirection, Option<(f64, f64)>)>;

// Document-level move/end handlers, registered only while a drag is in progress
struct DragHandlers {
    document: EventTarget,
    on_move: EventClosure,
    on_end: EventClosure,
}

impl DragHandlers {
    fn attach(&self, touch: bool) {
        if touch {
            dom::listen_active(&self.document, "touchmove", &self.on_move);
            dom::listen(&self.document, "touchend", &self.on_end);
        } else {
            dom::listen(&self.document, "mousemove", &self.on_move);
            dom::listen(&self.document, "mouseup", &self.on_end);
        }
    }

    fn detach(&self) {
        for kind in ["mousemove", "touchmove"] {
            dom::unlisten(&self.document, kind, &self.on_move);
        }
        for kind in ["mouseup", "touchend"] {
            dom::unlisten(&self.document, kind, &self.on_end);
        }
    }
}

// Everything registered on mount; dropping it unregisters and breaks the Rc cycles.
struct Installed {
    _listeners: Vec<Listener>,
    drag: Rc<RefCell<Option<DragHandlers>>>,
    observer: Rc<RefCell<Option<ViewerObserver>>>,
}

impl Drop for Installed {
    fn drop(&mut self) {
        if let Some(h) = self.drag.borrow_mut().take() {
            h.detach();
        }
        self.observer.borrow_mut().take();
    }
}

fn install(
    container: &HtmlElement,
    config: &ZoomConfig,
    zoom: &Rc<RefCell<ZoomState>>,
    observer: &Rc<RefCell<Option<ViewerObserver>>>,
    reapply: &Reapply,
    step: &Step,
) -> Option<Installed> {
    let window = web_sys::window()?;
    let document: EventTarget = window.document()?.into();
    let target: &EventTarget = container.as_ref();

    // Drag: move/end live on the document so the pan survives leaving the container
    let drag: Rc<RefCell<Option<DragHandlers>>> = Rc::new(RefCell::new(None));
    let on_move = {
        let zoom = zoom.clone();
        let reapply = reapply.clone();
        dom::event_closure(move |e: Event| {
            let Some((x, y)) = dom::client_point(&e) else {
                return;
            };
            let moved = zoom.borrow_mut().drag_to(x, y);
            if moved {
                reapply();
                e.prevent_default();
            }
        })
    };
    let on_end = {
        let zoom = zoom.clone();
        let drag = drag.clone();
        dom::event_closure(move |_e: Event| {
            zoom.borrow_mut().end_drag();
            if let Some(h) = &*drag.borrow() {
                h.detach();
            }
        })
    };
    *drag.borrow_mut() = Some(DragHandlers {
        document,
        on_move,
        on_end,
    });

    let start_drag: Rc<dyn Fn(Event)> = {
        let zoom = zoom.clone();
        let drag = drag.clone();
        Rc::new(move |e: Event| {
            let Some((x, y)) = dom::client_point(&e) else {
                return;
            };
            if !zoom.borrow_mut().begin_drag(x, y) {
                return;
            }
            if let Some(h) = &*drag.borrow() {
                h.attach(e.type_() == "touchstart");
            }
            e.prevent_default();
        })
    };
    let mousedown = {
        let start_drag = start_drag.clone();
        Listener::new(target, "mousedown", move |e: Event| start_drag(e))
    };
    let touchstart = {
        let start_drag = start_drag.clone();
        Listener::new_active(target, "touchstart", move |e: Event| start_drag(e))
    };

    // Wheel
    let wheel = {
        let container = container.clone();
        let step = step.clone();
        Listener::new_active(target, "wheel", move |e: Event| {
            let Some(we) = e.dyn_ref::<WheelEvent>() else {
                return;
            };
            e.prevent_default();
            let focus =
                dom::offset_from_center(&container, we.client_x() as f64, we.client_y() as f64);
            step(ZoomDirection::from_wheel_delta(we.delta_y()), Some(focus));
        })
    };

    // Resize: wait for the container to settle before the center-relative math
    let resize = {
        let window_cb = window.clone();
        let reapply = reapply.clone();
        let delay = config.resize_delay_ms;
        Listener::new(window.as_ref(), "resize", move |_e: Event| {
            let reapply = reapply.clone();
            dom::defer(&window_cb, delay, move || reapply());
        })
    };

    // Widget redraws: reapply after a short settling delay, once per record
    let settle: Rc<dyn Fn()> = {
        let window = window.clone();
        let reapply = reapply.clone();
        let delay = config.settle_delay_ms;
        Rc::new(move || {
            let reapply = reapply.clone();
            dom::defer(&window, delay, move || reapply());
        })
    };
    *observer.borrow_mut() = ViewerObserver::watch(container, settle);

    Some(Installed {
        _listeners: vec![mousedown, touchstart, wheel, resize],
        drag,
        observer: observer.clone(),
    })
}

#[function_component(ZoomOverlay)]
pub fn zoom_overlay(props: &ZoomOverlayProps) -> Html {
    let zoom = use_mut_ref(|| ZoomState::new(&props.config));
    // Starts from the configured label, not the initial scale, until the first zoom or reset
    let label = use_state(|| props.config.initial_label.clone());
    let observer = use_mut_ref(|| None::<ViewerObserver>);

    let reapply: Reapply = {
        let container = props.container.clone();
        let zoom = zoom.clone();
        let observer = observer.clone();
        Rc::new(move || {
            dom::apply_zoom(&container, &zoom.borrow());
            // our own style write would otherwise come back as a redraw
            if let Some(obs) = &*observer.borrow() {
                obs.discard_pending();
            }
        })
    };

    let step: Step = {
        let zoom = zoom.clone();
        let label = label.clone();
        let reapply = reapply.clone();
        Rc::new(move |dir: ZoomDirection, focus: Option<(f64, f64)>| {
            let changed = zoom.borrow_mut().zoom(dir, focus);
            if changed {
                reapply();
                label.set(zoom.borrow().indicator_text());
            }
        })
    };

    {
        let container = props.container.clone();
        let config = props.config.clone();
        let zoom = zoom.clone();
        let observer = observer.clone();
        let reapply = reapply.clone();
        let step = step.clone();
        use_effect_with((), move |_| {
            let installed = install(&container, &config, &zoom, &observer, &reapply, &step);
            reapply();
            move || drop(installed)
        });
    }

    let on_zoom_in = {
        let step = step.clone();
        Callback::from(move |_| step(ZoomDirection::In, None))
    };
    let on_zoom_out = {
        let step = step.clone();
        Callback::from(move |_| step(ZoomDirection::Out, None))
    };
    let on_reset = {
        let zoom = zoom.clone();
        let label = label.clone();
        let reapply = reapply.clone();
        Callback::from(move |_| {
            zoom.borrow_mut().reset();
            reapply();
            label.set(zoom.borrow().indicator_text());
        })
    };

    html! {
        <ZoomControls {on_zoom_in} {on_zoom_out} {on_reset} label={(*label).clone()} />
    }
}
