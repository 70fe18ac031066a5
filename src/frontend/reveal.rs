use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Array;
use serde_json::json;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::prelude::*;

use super::dom::{self, FrameLoop};
use super::use_motion;
use crate::logging::Logger;
use crate::reveal::{RevealAction, RevealAnimation, RevealOptions, RevealStyle, RevealTrigger};
use crate::subscriptions::{Slot, SubscriptionKind};

/// Keeps an observer and its callback alive together; dropping disconnects.
struct ObserverHandle {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

struct RevealRuntime {
    element: HtmlElement,
    trigger: RevealTrigger,
    observer: Slot<ObserverHandle>,
    playback: Slot<FrameLoop>,
    label: AttrValue,
    logger: Logger,
}

impl RevealRuntime {
    fn on_entry(&mut self, is_intersecting: bool) {
        match self.trigger.on_intersection(is_intersecting) {
            RevealAction::Play => {
                self.logger.debug(
                    "section_revealed",
                    json!({ "label": self.label.to_string(), "plays": self.trigger.plays() }),
                );
                self.play();
            }
            RevealAction::Reset => {
                self.playback.clear();
                apply_style(&self.element, &self.trigger.options().animation.initial_style());
            }
            RevealAction::None => {}
        }

        if !self.trigger.wants_observation() {
            self.observer.clear();
        }
    }

    fn play(&mut self) {
        let playback = self.trigger.options().playback();
        if dom::prefers_reduced_motion() {
            apply_style(&self.element, &RevealStyle::NEUTRAL);
            return;
        }

        let element = self.element.clone();
        let mut started: Option<f64> = None;
        let frames = FrameLoop::start(move |now| {
            let elapsed = now - *started.get_or_insert(now);
            apply_style(&element, &playback.style_at(elapsed));
            !playback.is_finished(elapsed)
        });
        self.playback.replace(SubscriptionKind::AnimationFrame, frames);
    }

    fn unmount(&mut self) {
        self.trigger.unmount();
        self.observer.clear();
        self.playback.clear();
    }
}

fn apply_style(element: &HtmlElement, style: &RevealStyle) {
    element.style().set_css_text(&style.to_css());
}

fn observe(runtime: &Rc<RefCell<RevealRuntime>>, threshold: f64) -> Option<ObserverHandle> {
    let weak: Weak<RefCell<RevealRuntime>> = Rc::downgrade(runtime);
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, _observer: IntersectionObserver| {
            let Some(runtime) = weak.upgrade() else {
                return;
            };
            let Ok(mut state) = runtime.try_borrow_mut() else {
                return;
            };
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                    state.on_entry(entry.is_intersecting());
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options).ok()?;
    observer.observe(&runtime.borrow().element);

    Some(ObserverHandle {
        observer,
        _callback: callback,
    })
}

#[derive(Properties, PartialEq)]
pub struct ScrollRevealProps {
    #[prop_or_default]
    pub children: Html,
    #[prop_or(RevealAnimation::Fade)]
    pub animation: RevealAnimation,
    #[prop_or(0.0)]
    pub delay_ms: f64,
    #[prop_or(800.0)]
    pub duration_ms: f64,
    /// Falls back to the configured reveal threshold.
    #[prop_or_default]
    pub threshold: Option<f64>,
    #[prop_or(true)]
    pub once: bool,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub label: AttrValue,
}

#[function_component(ScrollReveal)]
pub fn scroll_reveal(props: &ScrollRevealProps) -> Html {
    let motion = use_motion();
    let node = use_node_ref();

    let options = RevealOptions {
        animation: props.animation,
        delay_ms: props.delay_ms,
        duration_ms: props.duration_ms,
        threshold: props.threshold.unwrap_or(motion.config.reveal_threshold),
        once: props.once,
    };

    {
        let node = node.clone();
        let label = props.label.clone();
        use_effect_with(options, move |options| {
            let runtime = node.cast::<HtmlElement>().map(|element| {
                Rc::new(RefCell::new(RevealRuntime {
                    element,
                    trigger: RevealTrigger::new(*options),
                    observer: Slot::empty(),
                    playback: Slot::empty(),
                    label,
                    logger: motion.logger,
                }))
            });

            if let Some(runtime) = runtime.as_ref() {
                let handle = observe(runtime, options.threshold);
                let mut state = runtime.borrow_mut();
                apply_style(&state.element, &options.animation.resting_style(handle.is_some()));
                match handle {
                    Some(handle) => state.observer.replace(SubscriptionKind::Intersection, handle),
                    None => state.logger.warn(
                        "reveal_observer_unavailable",
                        json!({ "label": state.label.to_string() }),
                    ),
                }
            }

            move || {
                if let Some(runtime) = runtime {
                    if let Ok(mut state) = runtime.try_borrow_mut() {
                        state.unmount();
                    }
                }
            }
        });
    }

    html! {
        <div class={classes!("reveal", props.class.clone())} ref={node}>
            {props.children.clone()}
        </div>
    }
}
