use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::json;
use web_sys::{window, HtmlElement, MouseEvent};
use yew::prelude::*;

use super::dom;
use super::{use_motion, AnchorScroller};
use crate::cursor::CursorCapability;
use crate::scroll::{
    progress_width_css, scroll_progress, HeaderChrome, ScrollClassifier, ScrollSection,
    SectionAnchor,
};
use crate::subscriptions::{SubscriptionKind, Subscriptions};

fn read_anchors() -> Vec<SectionAnchor> {
    let document = dom::document();
    ScrollSection::ALL
        .into_iter()
        .map(|section| {
            let top = document
                .as_ref()
                .and_then(|d| d.get_element_by_id(section.anchor_id()))
                .map(|anchor| anchor.get_bounding_client_rect().top());
            SectionAnchor::new(section, top)
        })
        .collect()
}

/// Click handler for `#anchor` hrefs. Other hrefs navigate normally.
pub fn anchor_click(scroller: &AnchorScroller, href: &AttrValue) -> Callback<MouseEvent> {
    let scroller = scroller.clone();
    let anchor_id = href.strip_prefix('#').map(str::to_string);
    Callback::from(move |event: MouseEvent| {
        if let Some(anchor_id) = anchor_id.as_deref() {
            event.prevent_default();
            scroller.scroll_to(anchor_id);
        }
    })
}

#[derive(Properties, PartialEq)]
pub struct HoverLinkProps {
    pub href: AttrValue,
    pub label: AttrValue,
    #[prop_or(Some(CursorCapability::DisableCursor))]
    pub cursor: Option<CursorCapability>,
    #[prop_or_default]
    pub external: bool,
    #[prop_or_default]
    pub onnavigate: Callback<()>,
}

/// Text link whose label rolls up to a duplicate on hover.
#[function_component(HoverLink)]
pub fn hover_link(props: &HoverLinkProps) -> Html {
    let motion = use_motion();
    let onclick = {
        let scroll = anchor_click(&motion.scroller, &props.href);
        let onnavigate = props.onnavigate.clone();
        Callback::from(move |event: MouseEvent| {
            scroll.emit(event);
            onnavigate.emit(());
        })
    };

    let (target, rel) = if props.external {
        (Some("_blank"), Some("noopener noreferrer"))
    } else {
        (None, None)
    };

    html! {
        <a
            class="hover-link"
            href={props.href.clone()}
            data-cursor={props.cursor.map(CursorCapability::as_attr)}
            target={target}
            rel={rel}
            {onclick}
        >
            <span class="hover-in">
                {props.label.clone()}
                <span class="hover-dup" aria-hidden="true">{props.label.clone()}</span>
            </span>
        </a>
    }
}

#[function_component(Header)]
pub fn header() -> Html {
    let motion = use_motion();
    let chrome = use_state(|| HeaderChrome::new(0.0, motion.config.header_scrolled_offset, ScrollSection::About));
    let menu_open = use_state(|| false);

    {
        let chrome = chrome.clone();
        let motion = motion.clone();
        use_effect_with((), move |_| {
            let mut subscriptions = Subscriptions::new();
            let classifier = Rc::new(RefCell::new(ScrollClassifier::new(motion.config.section_threshold)));
            let last = Rc::new(Cell::new(*chrome));

            let refresh = {
                let classifier = classifier.clone();
                move || {
                    let offset = dom::scroll_offset();
                    let Ok(mut classifier) = classifier.try_borrow_mut() else {
                        return;
                    };
                    if let Some(previous) = classifier.update(&read_anchors()) {
                        motion.logger.info(
                            "section_changed",
                            json!({
                                "from": previous.anchor_id(),
                                "to": classifier.current().anchor_id(),
                                "offset": offset,
                            }),
                        );
                    }

                    let next = HeaderChrome::new(
                        offset,
                        motion.config.header_scrolled_offset,
                        classifier.current(),
                    );
                    if last.get() != next {
                        last.set(next);
                        chrome.set(next);
                    }
                }
            };

            refresh();
            if let Some(win) = window() {
                dom::listen(
                    &mut subscriptions,
                    SubscriptionKind::Scroll,
                    &win,
                    "scroll",
                    move |_| refresh(),
                );
            }

            move || drop(subscriptions)
        });
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(!*menu_open))
    };
    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: ()| menu_open.set(false))
    };

    html! {
        <header class={classes!("header", chrome.scrolled.then_some("header-scrolled"))}>
            <a href="/" class="navbar-title" data-cursor={CursorCapability::DisableCursor.as_attr()}>
                {"Portfolio"}
            </a>
            <p class="header-breadcrumb" aria-live="polite">{chrome.breadcrumb()}</p>
            <button
                class={classes!("menu-toggle", menu_open.then_some("menu-open"))}
                type="button"
                aria-label={if *menu_open { "Close menu" } else { "Open menu" }}
                aria-expanded={menu_open.to_string()}
                onclick={toggle_menu}
            >
                <span></span>
                <span></span>
            </button>
            <nav class={classes!("header-nav", menu_open.then_some("nav-open"))}>
                <ul>
                    { for ScrollSection::ALL.into_iter().map(|section| html! {
                        <li key={section.anchor_id()}>
                            <HoverLink
                                href={AttrValue::from(section.href())}
                                label={section.label()}
                                onnavigate={close_menu.clone()}
                            />
                        </li>
                    }) }
                </ul>
            </nav>
        </header>
    }
}

/// Owns the progress bar's listeners between `init` and `teardown`.
pub struct ProgressBarController {
    bar: HtmlElement,
    subscriptions: Subscriptions,
}

impl ProgressBarController {
    pub fn init(bar: HtmlElement) -> Self {
        let mut subscriptions = Subscriptions::new();
        update_progress(&bar);

        if let Some(win) = window() {
            for (kind, event_type) in [
                (SubscriptionKind::Scroll, "scroll"),
                (SubscriptionKind::Resize, "resize"),
            ] {
                let bar = bar.clone();
                dom::listen(&mut subscriptions, kind, &win, event_type, move |_| {
                    update_progress(&bar);
                });
            }
        }

        Self { bar, subscriptions }
    }

    pub fn teardown(mut self) {
        self.subscriptions.release();
        dom::set_style(&self.bar, "width", "0%");
    }
}

fn update_progress(bar: &HtmlElement) {
    let (_, viewport_height) = dom::viewport_size();
    let progress = scroll_progress(dom::scroll_offset(), dom::document_height(), viewport_height);
    dom::set_style(bar, "width", &progress_width_css(progress));
}

#[function_component(ScrollProgressBar)]
pub fn scroll_progress_bar() -> Html {
    let bar = use_node_ref();

    {
        let bar = bar.clone();
        use_effect_with((), move |_| {
            let controller = bar.cast::<HtmlElement>().map(ProgressBarController::init);
            move || {
                if let Some(controller) = controller {
                    controller.teardown();
                }
            }
        });
    }

    html! {
        <div class="scroll-progress" aria-hidden="true">
            <div class="scroll-progress-bar" ref={bar}></div>
        </div>
    }
}
