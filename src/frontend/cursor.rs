use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use serde_json::json;
use wasm_bindgen::JsCast;
use web_sys::{window, Element, Event, HtmlElement, MouseEvent};
use yew::prelude::*;

use super::dom::{self, FrameLoop};
use super::use_motion;
use crate::cursor::{
    CursorCapability, CursorEffect, CursorEvent, CursorMachine, HoverBinding, TargetId,
};
use crate::logging::Logger;
use crate::pointer::{PointerPosition, PointerTracker};
use crate::subscriptions::{SubscriptionKind, Subscriptions};

#[derive(Properties, PartialEq)]
pub struct CursorZoneProps {
    pub capability: CursorCapability,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub children: Html,
}

/// Marks a subtree with a cursor capability.
#[function_component(CursorZone)]
pub fn cursor_zone(props: &CursorZoneProps) -> Html {
    html! {
        <div class={props.class.clone()} data-cursor={props.capability.as_attr()}>
            {props.children.clone()}
        </div>
    }
}

struct CursorRuntime {
    tracker: PointerTracker,
    hover: HoverBinding<EventListener, Element>,
    logger: Logger,
}

type SharedRuntime = Rc<RefCell<CursorRuntime>>;

impl CursorRuntime {
    fn dispatch(
        &mut self,
        event: CursorEvent,
        now_ms: f64,
        candidate: Option<&Element>,
        weak: &Weak<RefCell<CursorRuntime>>,
    ) {
        let applied = self.hover.handle(event, now_ms, candidate, |element, id| {
            leave_listener(element, id, weak.clone())
        });
        self.log(&applied);
    }

    fn log(&self, applied: &[CursorEffect]) {
        let mode = self.hover.machine().mode().label();
        for effect in applied {
            match effect {
                CursorEffect::AttachLeaveListener(id) => self
                    .logger
                    .debug("cursor_hover_enter", json!({ "target": id, "mode": mode })),
                CursorEffect::DetachLeaveListener(id) => self
                    .logger
                    .debug("cursor_hover_release", json!({ "target": id, "mode": mode })),
            }
        }
    }

    fn teardown(&mut self) {
        let applied = self.hover.teardown(dom::now_ms());
        self.log(&applied);
    }
}

fn client_position(event: &Event) -> Option<PointerPosition> {
    let event = event.dyn_ref::<MouseEvent>()?;
    Some(PointerPosition::new(
        f64::from(event.client_x()),
        f64::from(event.client_y()),
    ))
}

fn leave_listener(element: &Element, id: TargetId, weak: Weak<RefCell<CursorRuntime>>) -> EventListener {
    EventListener::new(element, "pointerleave", move |event| {
        let Some(position) = client_position(event) else {
            return;
        };
        let Some(runtime) = weak.upgrade() else {
            return;
        };
        let Ok(mut state) = runtime.try_borrow_mut() else {
            return;
        };
        state.dispatch(
            CursorEvent::LeaveIcon {
                target: id,
                position,
            },
            dom::now_ms(),
            None,
            &weak,
        );
    })
}

fn install(runtime: &SharedRuntime, indicator: HtmlElement) -> Subscriptions {
    let mut subscriptions = Subscriptions::new();
    let (Some(win), Some(document)) = (window(), dom::document()) else {
        return subscriptions;
    };

    {
        let weak = Rc::downgrade(runtime);
        dom::listen(
            &mut subscriptions,
            SubscriptionKind::PointerMove,
            &win,
            "pointermove",
            move |event| {
                if !event.is_trusted() {
                    return;
                }
                let Some(position) = client_position(event) else {
                    return;
                };
                let Some(runtime) = weak.upgrade() else {
                    return;
                };
                let Ok(mut state) = runtime.try_borrow_mut() else {
                    return;
                };
                state.tracker.record(position.x, position.y);
                state.dispatch(CursorEvent::PointerMoved(position), dom::now_ms(), None, &weak);
            },
        );
    }

    {
        let weak = Rc::downgrade(runtime);
        dom::listen_capture(
            &mut subscriptions,
            SubscriptionKind::PointerOver,
            &document,
            "pointerover",
            move |event| {
                let Some(runtime) = weak.upgrade() else {
                    return;
                };
                let Ok(mut state) = runtime.try_borrow_mut() else {
                    return;
                };
                let now = dom::now_ms();
                // Entering fires before the matching move.
                if event.is_trusted() {
                    if let Some(position) = client_position(event) {
                        state.tracker.record(position.x, position.y);
                    }
                }

                if dom::closest_with(event.target(), CursorCapability::DisableCursor).is_some() {
                    state.dispatch(CursorEvent::EnterDisabled, now, None, &weak);
                    return;
                }

                if let Some(icon) = dom::closest_with(event.target(), CursorCapability::IconHover) {
                    if state.hover.target() == Some(&icon) {
                        return;
                    }
                    let target = state.hover.next_id();
                    let bounds = dom::bounds_of(&icon);
                    state.dispatch(CursorEvent::EnterIcon { target, bounds }, now, Some(&icon), &weak);
                }
            },
        );
    }

    {
        let weak = Rc::downgrade(runtime);
        dom::listen_capture(
            &mut subscriptions,
            SubscriptionKind::PointerOut,
            &document,
            "pointerout",
            move |event| {
                let Some(from) = dom::closest_with(event.target(), CursorCapability::DisableCursor) else {
                    return;
                };
                let related = event
                    .dyn_ref::<MouseEvent>()
                    .and_then(MouseEvent::related_target);
                let to = dom::closest_with(related, CursorCapability::DisableCursor);
                if to.as_ref() == Some(&from) {
                    return;
                }
                let Some(runtime) = weak.upgrade() else {
                    return;
                };
                let Ok(mut state) = runtime.try_borrow_mut() else {
                    return;
                };
                state.dispatch(CursorEvent::LeaveDisabled, dom::now_ms(), None, &weak);
            },
        );
    }

    {
        let weak = Rc::downgrade(runtime);
        dom::listen(
            &mut subscriptions,
            SubscriptionKind::Visibility,
            &document,
            "visibilitychange",
            move |_| {
                let Some(runtime) = weak.upgrade() else {
                    return;
                };
                if let Ok(mut state) = runtime.try_borrow_mut() {
                    state.tracker.set_visible(!dom::is_hidden());
                };
            },
        );
    }

    let weak = Rc::downgrade(runtime);
    let frames = FrameLoop::start(move |now| {
        let Some(runtime) = weak.upgrade() else {
            return false;
        };
        let Ok(mut state) = runtime.try_borrow_mut() else {
            return true;
        };
        if state.tracker.is_paused() {
            return true;
        }

        let active = state.hover.machine().active_target();
        if let (Some(target), Some(element)) = (active, state.hover.target().cloned()) {
            let bounds = dom::bounds_of(&element);
            let position = state.tracker.raw();
            state.dispatch(
                CursorEvent::TargetMoved {
                    target,
                    bounds,
                    position,
                },
                now,
                None,
                &weak,
            );
        }
        if state.hover.machine().follows_pointer() {
            state.tracker.tick();
        }

        let frame = state.hover.machine().frame(now, state.tracker.smoothed());
        dom::set_style(
            &indicator,
            "transform",
            &format!(
                "translate3d({:.2}px, {:.2}px, 0)",
                frame.x - frame.width / 2.0,
                frame.y - frame.height / 2.0
            ),
        );
        dom::set_style(&indicator, "width", &format!("{:.2}px", frame.width));
        dom::set_style(&indicator, "height", &format!("{:.2}px", frame.height));
        let class_name = match frame.class.css_class() {
            Some(extra) => format!("cursor-main {extra}"),
            None => "cursor-main".to_string(),
        };
        if indicator.class_name() != class_name {
            indicator.set_class_name(&class_name);
        }
        true
    });
    subscriptions.push(SubscriptionKind::AnimationFrame, frames);

    subscriptions
}

/// The trailing on-screen pointer. Not mounted on coarse pointers.
#[function_component(CustomCursor)]
pub fn custom_cursor() -> Html {
    let motion = use_motion();
    let indicator = use_node_ref();

    {
        let indicator = indicator.clone();
        use_effect_with((), move |_| {
            let runtime: SharedRuntime = Rc::new(RefCell::new(CursorRuntime {
                tracker: PointerTracker::new(motion.config.cursor_delay),
                hover: HoverBinding::new(CursorMachine::new(motion.config.hover_release_margin)),
                logger: motion.logger,
            }));

            let subscriptions = match indicator.cast::<HtmlElement>() {
                Some(element) if !dom::is_coarse_pointer() => install(&runtime, element),
                _ => Subscriptions::new(),
            };

            move || {
                if let Ok(mut state) = runtime.try_borrow_mut() {
                    state.teardown();
                }
                drop(subscriptions);
            }
        });
    }

    html! { <div class="cursor-main" ref={indicator} aria-hidden="true"></div> }
}
