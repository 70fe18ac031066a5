use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::{EventListener, EventListenerOptions};
use gloo_render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, Event, EventTarget, HtmlElement};

use crate::cursor::{Bounds, CursorCapability};
use crate::subscriptions::{SubscriptionKind, Subscriptions};

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn viewport_size() -> (f64, f64) {
    let Some(win) = window() else {
        return (1280.0, 720.0);
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    (width, height)
}

pub fn scroll_offset() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

pub fn scroll_window_to(offset: f64) {
    if let Some(win) = window() {
        win.scroll_to_with_x_and_y(0.0, offset);
    }
}

pub fn document_height() -> f64 {
    document()
        .and_then(|d| d.document_element())
        .map(|root| f64::from(root.scroll_height()))
        .unwrap_or(0.0)
}

pub fn is_hidden() -> bool {
    document().map(|d| d.hidden()).unwrap_or(false)
}

/// Milliseconds on the same clock animation frames are stamped with.
pub fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub fn bounds_of(element: &Element) -> Bounds {
    let rect = element.get_bounding_client_rect();
    Bounds::new(rect.left(), rect.top(), rect.width(), rect.height())
}

pub fn document_top(element: &Element) -> f64 {
    element.get_bounding_client_rect().top() + scroll_offset()
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

/// Computed pixel value of a CSS length property, 0 when unavailable.
pub fn computed_px(element: &Element, property: &str) -> f64 {
    window()
        .and_then(|w| w.get_computed_style(element).ok().flatten())
        .and_then(|style| style.get_property_value(property).ok())
        .and_then(|value| value.trim_end_matches("px").trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn media_matches(query: &str) -> bool {
    window()
        .and_then(|w| w.match_media(query).ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

pub fn prefers_reduced_motion() -> bool {
    media_matches("(prefers-reduced-motion: reduce)")
}

pub fn is_coarse_pointer() -> bool {
    media_matches("(pointer: coarse)")
}

/// Nearest ancestor-or-self of the event target carrying `capability`.
pub fn closest_with(target: Option<EventTarget>, capability: CursorCapability) -> Option<Element> {
    let element = target?.dyn_into::<Element>().ok()?;
    element.closest(&capability.selector()).ok().flatten()
}

pub fn listen<F>(
    subscriptions: &mut Subscriptions,
    kind: SubscriptionKind,
    target: &EventTarget,
    event_type: &'static str,
    callback: F,
) where
    F: FnMut(&Event) + 'static,
{
    subscriptions.push(kind, EventListener::new(target, event_type, callback));
}

pub fn listen_capture<F>(
    subscriptions: &mut Subscriptions,
    kind: SubscriptionKind,
    target: &EventTarget,
    event_type: &'static str,
    callback: F,
) where
    F: FnMut(&Event) + 'static,
{
    let listener = EventListener::new_with_options(
        target,
        event_type,
        EventListenerOptions::run_in_capture_phase(),
        callback,
    );
    subscriptions.push(kind, listener);
}

/// A `requestAnimationFrame` chain. The step gets the frame timestamp and
/// returns whether to keep going. Dropping the loop cancels the pending frame.
pub struct FrameLoop {
    state: Rc<FrameState>,
}

struct FrameState {
    pending: RefCell<Option<AnimationFrame>>,
    step: RefCell<Box<dyn FnMut(f64) -> bool>>,
}

impl FrameLoop {
    pub fn start(step: impl FnMut(f64) -> bool + 'static) -> Self {
        let state = Rc::new(FrameState {
            pending: RefCell::new(None),
            step: RefCell::new(Box::new(step)),
        });
        schedule(Rc::downgrade(&state));
        Self { state }
    }
}

fn schedule(weak: Weak<FrameState>) {
    let Some(state) = weak.upgrade() else {
        return;
    };

    let handle = request_animation_frame(move |timestamp| {
        let Some(state) = weak.upgrade() else {
            return;
        };
        state.pending.borrow_mut().take();

        let keep_going = match state.step.try_borrow_mut() {
            Ok(mut step) => step(timestamp),
            Err(_) => true,
        };
        if keep_going {
            schedule(Rc::downgrade(&state));
        }
    });
    *state.pending.borrow_mut() = Some(handle);
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.state.pending.borrow_mut().take();
    }
}
