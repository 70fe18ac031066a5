use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Interval;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlElement, MouseEvent};
use yew::prelude::*;

use super::cursor::CursorZone;
use super::dom::{self, FrameLoop};
use super::scene::SplineScene;
use crate::content::{Owner, SocialLink, SwapPair};
use crate::cursor::CursorCapability;
use crate::interactions::{swap_letter_style, Magnet, SwapPhase, SWAP_INTERVAL_MS};
use crate::pointer::PointerSource;
use crate::scene::Viewport;
use crate::subscriptions::{SubscriptionKind, Subscriptions};

/// Current viewport class, kept in sync with window resizes.
#[hook]
fn use_viewport() -> Viewport {
    let viewport = use_state(|| Viewport::from_width(dom::viewport_size().0));

    {
        let viewport = viewport.clone();
        use_effect_with((), move |_| {
            let mut subscriptions = Subscriptions::new();
            if let Some(win) = window() {
                let last = Cell::new(*viewport);
                dom::listen(
                    &mut subscriptions,
                    SubscriptionKind::Resize,
                    &win,
                    "resize",
                    move |_| {
                        let next = Viewport::from_width(dom::viewport_size().0);
                        if last.replace(next) != next {
                            viewport.set(next);
                        }
                    },
                );
            }
            move || drop(subscriptions)
        });
    }

    *viewport
}

#[derive(Properties, PartialEq)]
pub struct HeroProps {
    pub owner: Owner,
    pub socials: Vec<SocialLink>,
}

#[function_component(Hero)]
pub fn hero(props: &HeroProps) -> Html {
    let viewport = use_viewport();
    let layout = match viewport {
        Viewport::Desktop => "hero-desktop",
        Viewport::Mobile => "hero-mobile",
    };

    html! {
        <section class={classes!("landing-section", layout)} id="landingDiv">
            <div class="landing-container">
                <div class="landing-intro">
                    <h2>{props.owner.greeting.clone()}</h2>
                    <h1>
                        {props.owner.first_name.clone()}
                        <br />
                        <span>{props.owner.last_name.clone()}</span>
                    </h1>
                </div>
                <LandingInfo headline={props.owner.headline.clone()} pairs={props.owner.swap_pairs.clone()} />
                <SocialIcons socials={props.socials.clone()} />
            </div>
            <SplineScene {viewport} />
        </section>
    }
}

fn letters(word: &str) -> Html {
    word.chars()
        .enumerate()
        .map(|(index, letter)| {
            html! { <span class="swap-letter" style={swap_letter_style(index)}>{letter.to_string()}</span> }
        })
        .collect()
}

#[derive(Properties, PartialEq)]
pub struct LandingInfoProps {
    pub headline: AttrValue,
    pub pairs: Vec<SwapPair>,
}

/// Headline whose words flip between two spellings on a timer.
#[function_component(LandingInfo)]
pub fn landing_info(props: &LandingInfoProps) -> Html {
    let phase = use_state(|| SwapPhase::Initial);

    {
        let phase = phase.clone();
        use_effect_with((), move |_| {
            let mut subscriptions = Subscriptions::new();
            if !dom::prefers_reduced_motion() {
                let current = Cell::new(*phase);
                let interval = Interval::new(SWAP_INTERVAL_MS, move || {
                    let next = current.get().next();
                    current.set(next);
                    phase.set(next);
                });
                subscriptions.push(SubscriptionKind::Timer, interval);
            }
            move || drop(subscriptions)
        });
    }

    html! {
        <div class={classes!("landing-info", phase.css_class())}>
            <h3>{props.headline.clone()}</h3>
            { for props.pairs.iter().enumerate().map(|(index, pair)| html! {
                <h2 class="landing-swap" key={index} aria-label={pair.top.clone()}>
                    <span class="swap-sizer" aria-hidden="true">{pair.widest().to_string()}</span>
                    <span class="swap-word swap-top" aria-hidden="true">{letters(&pair.top)}</span>
                    <span class="swap-word swap-bottom" aria-hidden="true">{letters(&pair.bottom)}</span>
                </h2>
            }) }
        </div>
    }
}

struct MagneticIcon {
    icon: HtmlElement,
    link: HtmlElement,
    magnet: Magnet,
}

fn collect_icons(row: &HtmlElement) -> Vec<MagneticIcon> {
    let children = row.children();
    (0..children.length())
        .filter_map(|index| children.item(index))
        .filter_map(|icon| icon.dyn_into::<HtmlElement>().ok())
        .filter_map(|icon| {
            let link = icon.first_element_child()?.dyn_into::<HtmlElement>().ok()?;
            let magnet = Magnet::centered(
                f64::from(icon.offset_width()),
                f64::from(icon.offset_height()),
            );
            Some(MagneticIcon { icon, link, magnet })
        })
        .collect()
}

#[derive(Properties, PartialEq)]
pub struct SocialIconsProps {
    pub socials: Vec<SocialLink>,
}

/// Social links whose glyphs lean toward the pointer.
#[function_component(SocialIcons)]
pub fn social_icons(props: &SocialIconsProps) -> Html {
    let row = use_node_ref();

    {
        let row = row.clone();
        use_effect_with(props.socials.len(), move |_| {
            let mut subscriptions = Subscriptions::new();
            let icons = row
                .cast::<HtmlElement>()
                .map(|row| collect_icons(&row))
                .unwrap_or_default();

            if !icons.is_empty() {
                if let Some(win) = window() {
                    let icons = Rc::new(RefCell::new(icons));

                    {
                        let icons = icons.clone();
                        dom::listen(
                            &mut subscriptions,
                            SubscriptionKind::PointerMove,
                            &win,
                            "pointermove",
                            move |event| {
                                let source = PointerSource::from_trusted(event.is_trusted());
                                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                                    return;
                                };
                                let Ok(mut icons) = icons.try_borrow_mut() else {
                                    return;
                                };
                                for icon in icons.iter_mut() {
                                    let rect = icon.icon.get_bounding_client_rect();
                                    icon.magnet.aim(
                                        source,
                                        f64::from(event.client_x()) - rect.left(),
                                        f64::from(event.client_y()) - rect.top(),
                                        rect.width(),
                                        rect.height(),
                                    );
                                }
                            },
                        );
                    }

                    let frames = FrameLoop::start(move |_| {
                        if let Ok(mut icons) = icons.try_borrow_mut() {
                            for icon in icons.iter_mut() {
                                icon.magnet.step();
                                dom::set_style(&icon.link, "left", &format!("{:.2}px", icon.magnet.x));
                                dom::set_style(&icon.link, "top", &format!("{:.2}px", icon.magnet.y));
                            }
                        }
                        true
                    });
                    subscriptions.push(SubscriptionKind::AnimationFrame, frames);
                }
            }

            move || drop(subscriptions)
        });
    }

    html! {
        <CursorZone capability={CursorCapability::IconHover} class="icons-section">
            <div class="social-icons" ref={row}>
                { for props.socials.iter().map(|social| html! {
                    <span class="social-icon" key={social.href.clone()}>
                        <a
                            href={social.href.clone()}
                            target="_blank"
                            rel="noopener noreferrer"
                            aria-label={social.kind.aria_label()}
                        >
                            {social.kind.glyph()}
                        </a>
                    </span>
                }) }
            </div>
        </CursorZone>
    }
}
