use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Function, Promise, Reflect};
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{window, HtmlCanvasElement, HtmlElement, PointerEvent, PointerEventInit};
use yew::prelude::*;

use super::dom::{self, FrameLoop};
use super::{use_motion, Motion};
use crate::cursor::CursorCapability;
use crate::scene::{await_scene_load, AmbientHover, SceneError, SceneState, Viewport};
use crate::subscriptions::{SubscriptionKind, Subscriptions};

const RUNTIME_GLOBAL: &str = "SplineRuntime";

fn describe(error: &JsValue) -> String {
    error
        .as_string()
        .or_else(|| {
            error
                .dyn_ref::<js_sys::Error>()
                .map(|error| String::from(error.message()))
        })
        .unwrap_or_else(|| format!("{error:?}"))
}

fn lookup(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

/// Hands the canvas to the page's scene runtime and waits for `load(url)`.
async fn load_scene(canvas: HtmlCanvasElement, url: &'static str) -> Result<(), SceneError> {
    let window: JsValue = window().ok_or(SceneError::RuntimeMissing)?.into();
    let runtime = lookup(&window, RUNTIME_GLOBAL).ok_or(SceneError::RuntimeMissing)?;
    let application = lookup(&runtime, "Application").ok_or(SceneError::RuntimeMissing)?;
    let constructor = application
        .dyn_ref::<Function>()
        .ok_or(SceneError::RuntimeMissing)?;

    let app = Reflect::construct(constructor, &Array::of1(&canvas))
        .map_err(|error| SceneError::LoadRejected(describe(&error)))?;
    let load = lookup(&app, "load")
        .and_then(|load| load.dyn_into::<Function>().ok())
        .ok_or_else(|| SceneError::LoadRejected("runtime has no load()".to_string()))?;
    let promise = load
        .call1(&app, &JsValue::from_str(url))
        .map_err(|error| SceneError::LoadRejected(describe(&error)))?
        .dyn_into::<Promise>()
        .map_err(|_| SceneError::LoadRejected("load() did not return a promise".to_string()))?;

    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|error| SceneError::LoadRejected(describe(&error)))
}

fn dispatch_synthetic_move(canvas: &HtmlCanvasElement, x: f64, y: f64) {
    let init = PointerEventInit::new();
    init.set_bubbles(true);
    init.set_client_x(x.round() as i32);
    init.set_client_y(y.round() as i32);
    if let Ok(event) = PointerEvent::new_with_event_init_dict("pointermove", &init) {
        let _ = canvas.dispatch_event(&event);
    }
}

/// Drifts a synthetic pointer over the canvas until real input arrives.
fn start_ambient(canvas: &HtmlCanvasElement, viewport: Viewport, motion: &Motion) -> Subscriptions {
    let mut subscriptions = Subscriptions::new();
    let ambient = Rc::new(RefCell::new(AmbientHover::new(
        viewport,
        dom::bounds_of(canvas),
        dom::now_ms(),
        motion.config.ambient_interval_ms,
        motion.config.ambient_suppress_ms,
    )));

    for event_type in ["pointermove", "pointerdown"] {
        let ambient = ambient.clone();
        let logger = motion.logger;
        dom::listen(
            &mut subscriptions,
            SubscriptionKind::PointerMove,
            canvas,
            event_type,
            move |event| {
                if !event.is_trusted() {
                    return;
                }
                let Ok(mut ambient) = ambient.try_borrow_mut() else {
                    return;
                };
                let now = dom::now_ms();
                if !ambient.is_suppressed(now) {
                    logger.debug("scene_ambient_suppressed", json!({ "trigger": event.type_() }));
                }
                ambient.note_real_input(now);
            },
        );
    }

    let canvas = canvas.clone();
    let frames = FrameLoop::start(move |now| {
        let rect = dom::bounds_of(&canvas);
        let next = match ambient.try_borrow_mut() {
            Ok(mut ambient) => ambient.frame(now, &rect),
            Err(_) => None,
        };
        if let Some(position) = next {
            dispatch_synthetic_move(&canvas, position.x, position.y);
        }
        true
    });
    subscriptions.push(SubscriptionKind::AnimationFrame, frames);

    subscriptions
}

#[derive(Properties, PartialEq)]
pub struct SplineSceneProps {
    pub viewport: Viewport,
}

#[function_component(SplineScene)]
pub fn spline_scene(props: &SplineSceneProps) -> Html {
    let motion = use_motion();
    let host = use_node_ref();
    let state = use_state(|| SceneState::Loading);

    {
        let host = host.clone();
        let state = state.clone();
        use_effect_with(props.viewport, move |viewport| {
            let viewport = *viewport;
            let alive = Rc::new(Cell::new(true));
            let ambient = Rc::new(RefCell::new(Subscriptions::new()));
            state.set(SceneState::Loading);

            let canvas = host.cast::<HtmlElement>().and_then(|host| {
                let canvas = dom::document()?
                    .create_element("canvas")
                    .ok()?
                    .dyn_into::<HtmlCanvasElement>()
                    .ok()?;
                canvas.set_class_name("scene-canvas");
                host.append_child(&canvas).ok()?;
                Some(canvas)
            });

            match canvas.clone() {
                None => {
                    let error = SceneError::CanvasUnavailable;
                    motion.logger.warn(
                        "scene_load_failed",
                        json!({ "error_class": error.error_class(), "error": error.to_string() }),
                    );
                    state.set(SceneState::Failed(error));
                }
                Some(canvas) => {
                    let alive = alive.clone();
                    let ambient = ambient.clone();
                    let timeout_ms = motion.config.scene_load_timeout_ms;
                    let url = viewport.scene_url();
                    spawn_local(async move {
                        let timer = TimeoutFuture::new(u32::try_from(timeout_ms).unwrap_or(u32::MAX));
                        let result =
                            await_scene_load(load_scene(canvas.clone(), url), timer, timeout_ms).await;
                        if !alive.get() {
                            return;
                        }

                        match &result {
                            Ok(()) => {
                                motion
                                    .logger
                                    .info("scene_loaded", json!({ "url": url, "timeout_ms": timeout_ms }));
                                if !dom::prefers_reduced_motion() {
                                    *ambient.borrow_mut() = start_ambient(&canvas, viewport, &motion);
                                }
                            }
                            Err(error) => motion.logger.warn(
                                "scene_load_failed",
                                json!({
                                    "url": url,
                                    "error_class": error.error_class(),
                                    "error": error.to_string(),
                                }),
                            ),
                        }
                        state.set(SceneState::from_result(result));
                    });
                }
            }

            move || {
                alive.set(false);
                if let Ok(mut ambient) = ambient.try_borrow_mut() {
                    ambient.release();
                }
                if let Some(canvas) = canvas {
                    canvas.remove();
                }
            }
        });
    }

    let overlay = match &*state {
        SceneState::Loading => html! { <div class="scene-loading" aria-hidden="true"></div> },
        SceneState::Ready => html! {},
        SceneState::Failed(_) => html! { <div class="scene-fallback" aria-hidden="true"></div> },
    };

    html! {
        <div
            class={classes!("spline-scene", state.is_ready().then_some("scene-ready"))}
            data-cursor={CursorCapability::DisableCursor.as_attr()}
        >
            <div class="scene-host" ref={host}></div>
            {overlay}
        </div>
    }
}
