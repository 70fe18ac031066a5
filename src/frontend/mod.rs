mod cursor;
mod dom;
mod header;
mod hero;
mod reveal;
mod scene;
mod sections;

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use yew::prelude::*;

use crate::config::MotionConfig;
use crate::content::Content;
use crate::logging::Logger;
use crate::scroll::AnchorScroll;
use crate::subscriptions::{Slot, SubscriptionKind};

use self::cursor::CustomCursor;
use self::dom::FrameLoop;
use self::header::{Header, ScrollProgressBar};
use self::hero::Hero;
use self::sections::{AboutSection, BacklightEffect, ContactSection, WorkSection};

/// Shared by every component through context.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    pub config: Rc<MotionConfig>,
    pub logger: Logger,
    pub scroller: AnchorScroller,
}

impl Motion {
    fn new(config: MotionConfig) -> Self {
        Self {
            logger: Logger::new(config.log_level),
            config: Rc::new(config),
            scroller: AnchorScroller::default(),
        }
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

#[hook]
pub fn use_motion() -> Motion {
    use_context::<Motion>().unwrap_or_default()
}

/// Drives in-page anchor scrolls. Starting one cancels the one in flight.
#[derive(Clone, Default)]
pub struct AnchorScroller {
    active: Rc<RefCell<Slot<FrameLoop>>>,
}

impl AnchorScroller {
    pub fn scroll_to(&self, anchor_id: &str) {
        let Some(anchor) = dom::document().and_then(|d| d.get_element_by_id(anchor_id)) else {
            return;
        };

        let scroll = AnchorScroll::new(
            dom::scroll_offset(),
            dom::document_top(&anchor),
            dom::now_ms(),
        );

        if dom::prefers_reduced_motion() {
            self.active.borrow_mut().clear();
            dom::scroll_window_to(scroll.target());
            return;
        }

        let frames = FrameLoop::start(move |now| {
            dom::scroll_window_to(scroll.offset_at(now));
            !scroll.is_finished(now)
        });
        self.active
            .borrow_mut()
            .replace(SubscriptionKind::AnimationFrame, frames);
    }
}

impl PartialEq for AnchorScroller {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.active, &other.active)
    }
}

impl std::fmt::Debug for AnchorScroller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnchorScroller")
            .field("active", &self.active.borrow().is_occupied())
            .finish()
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    motion: Motion,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let content = use_memo((), |_| Content::embedded());

    {
        let motion = props.motion.clone();
        let content = content.clone();
        use_effect_with((), move |_| {
            match &*content {
                Ok(content) => motion.logger.info(
                    "app_mounted",
                    json!({
                        "projects": content.projects.len(),
                        "cursor_delay": motion.config.cursor_delay,
                        "scene_load_timeout_ms": motion.config.scene_load_timeout_ms,
                    }),
                ),
                Err(error) => motion.logger.warn(
                    "content_invalid",
                    json!({ "error": error.to_string() }),
                ),
            }
            || ()
        });
    }

    let body = match &*content {
        Ok(content) => html! {
            <>
                <Hero owner={content.owner.clone()} socials={content.socials.clone()} />
                <AboutSection about={content.about.clone()} expertise={content.expertise.clone()} />
                <WorkSection career={content.career.clone()} projects={content.projects.clone()} />
                <ContactSection contact={content.contact.clone()} socials={content.socials.clone()} />
            </>
        },
        Err(_) => html! {
            <section class="content-unavailable">
                <p>{"This page could not load its content."}</p>
            </section>
        },
    };

    html! {
        <ContextProvider<Motion> context={props.motion.clone()}>
            <a class="skip-link" href="#content">{"Skip to main content"}</a>
            <BacklightEffect />
            <ScrollProgressBar />
            <CustomCursor />
            <Header />
            <main id="content" class="container-main">
                {body}
            </main>
        </ContextProvider<Motion>>
    }
}

pub fn run() {
    let Some(root) = dom::document().and_then(|d| d.get_element_by_id("app")) else {
        Logger::default().warn("app_mount_failed", json!({ "reason": "missing #app mount point" }));
        return;
    };

    let config = MotionConfig::from_lookup(|key| root.get_attribute(&format!("data-{key}")));
    let motion = Motion::new(config);

    yew::Renderer::<App>::with_root_and_props(root, AppProps { motion }).render();
}
