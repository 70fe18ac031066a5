use std::cell::Cell;
use std::rc::Rc;

use web_sys::{window, HtmlElement, MouseEvent};
use yew::prelude::*;

use super::dom;
use super::header::HoverLink;
use super::reveal::ScrollReveal;
use crate::content::{About, CareerEntry, Contact, ExpertiseCard, Project, SocialLink};
use crate::cursor::CursorCapability;
use crate::interactions::ExpertiseDeck;
use crate::reveal::{
    RevealAnimation, EXPERTISE_CARD_BASE_MS, EXPERTISE_CARD_STEP_MS, PARAGRAPH_STAGGER_MS,
    SKILL_TAG_STEP_MS,
};
use crate::scroll::{carousel_distance, carousel_progress, carousel_translate, ScrollSection};
use crate::subscriptions::{SubscriptionKind, Subscriptions};
use crate::tween::stagger_delay;

const BACKLIGHTS: [&str; 5] = [
    "light-top-left",
    "light-top-right",
    "light-bottom-left",
    "light-bottom-right",
    "light-center-right",
];

#[function_component(BacklightEffect)]
pub fn backlight_effect() -> Html {
    html! {
        <div class="backlight" aria-hidden="true">
            { for BACKLIGHTS.iter().map(|position| html! {
                <div key={*position} class={classes!("light", *position)}></div>
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AboutSectionProps {
    pub about: About,
    pub expertise: Vec<ExpertiseCard>,
}

#[function_component(AboutSection)]
pub fn about_section(props: &AboutSectionProps) -> Html {
    html! {
        <section class="about-section" id={ScrollSection::About.anchor_id()}>
            <div class="about-me">
                <ScrollReveal animation={RevealAnimation::Slide} label="about-title">
                    <h2 class="about-title">
                        { for props.about.title_lines.iter().map(|line| html! {
                            <span class="title-line">
                                {line.lead.clone()}{" "}<em>{line.accent.clone()}</em>
                            </span>
                        }) }
                    </h2>
                </ScrollReveal>
                { for props.about.paragraphs.iter().enumerate().map(|(index, paragraph)| html! {
                    <ScrollReveal
                        key={index}
                        delay_ms={stagger_delay(0.0, index, PARAGRAPH_STAGGER_MS)}
                        label="about-paragraph"
                    >
                        <p class="para">{paragraph.clone()}</p>
                    </ScrollReveal>
                }) }
            </div>
            <WhatIDo cards={props.expertise.clone()} />
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct WhatIDoProps {
    pub cards: Vec<ExpertiseCard>,
}

/// Expertise cards. Touch devices open them by tapping instead of hovering.
#[function_component(WhatIDo)]
pub fn what_i_do(props: &WhatIDoProps) -> Html {
    let deck = use_state(|| ExpertiseDeck::new(props.cards.len()));

    html! {
        <div class="whatIDO">
            <h2 class="what-title">{"W"}<span class="hat-h2">{"HAT"}</span><br />{"I"}<span class="do-h2">{" DO"}</span></h2>
            <div class="what-box">
                { for props.cards.iter().enumerate().map(|(index, card)| {
                    let flags = deck.cards().get(index).copied().unwrap_or_default();
                    let onclick = {
                        let deck = deck.clone();
                        Callback::from(move |_: MouseEvent| {
                            if dom::is_coarse_pointer() {
                                let mut next = (*deck).clone();
                                next.tap(index);
                                deck.set(next);
                            }
                        })
                    };
                    html! {
                        <ScrollReveal
                            key={index}
                            animation={RevealAnimation::Scale}
                            delay_ms={stagger_delay(EXPERTISE_CARD_BASE_MS, index, EXPERTISE_CARD_STEP_MS)}
                            label="expertise-card"
                        >
                            <div
                                class={classes!(
                                    "what-content",
                                    flags.active.then_some("what-content-active"),
                                    flags.sibling.then_some("what-sibling")
                                )}
                                {onclick}
                            >
                                <div class="what-content-in">
                                    <h3>{card.title.clone()}</h3>
                                    <p>{card.description.clone()}</p>
                                    <h5>{"Skillset & tools"}</h5>
                                    <div class="what-content-flex">
                                        { for card.tags.iter().enumerate().map(|(tag_index, tag)| html! {
                                            <ScrollReveal
                                                key={tag_index}
                                                delay_ms={stagger_delay(0.0, tag_index, SKILL_TAG_STEP_MS)}
                                                duration_ms={400.0}
                                                label="skill-tag"
                                            >
                                                <div class="what-tags">{tag.clone()}</div>
                                            </ScrollReveal>
                                        }) }
                                    </div>
                                </div>
                            </div>
                        </ScrollReveal>
                    }
                }) }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct WorkSectionProps {
    pub career: Vec<CareerEntry>,
    pub projects: Vec<Project>,
}

#[function_component(WorkSection)]
pub fn work_section(props: &WorkSectionProps) -> Html {
    html! {
        <section class="work-section" id={ScrollSection::Work.anchor_id()}>
            <CareerTimeline entries={props.career.clone()} />
            <ProjectsCarousel projects={props.projects.clone()} />
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct CareerTimelineProps {
    pub entries: Vec<CareerEntry>,
}

#[function_component(CareerTimeline)]
pub fn career_timeline(props: &CareerTimelineProps) -> Html {
    html! {
        <div class="career-section">
            <h2>{"My career "}<span>{"&"}</span><br />{"experience"}</h2>
            <div class="career-info">
                <div class="career-timeline" aria-hidden="true"><div class="career-dot"></div></div>
                { for props.entries.iter().enumerate().map(|(index, entry)| html! {
                    <ScrollReveal key={index} animation={RevealAnimation::Slide} label="career-entry">
                        <div class="career-info-box">
                            <div class="career-info-in">
                                <div class="career-role">
                                    <h4>{entry.role.clone()}</h4>
                                    <h5>{entry.company.clone()}</h5>
                                </div>
                                <h3>{entry.year.clone()}</h3>
                            </div>
                            <p>{entry.summary.clone()}</p>
                        </div>
                    </ScrollReveal>
                }) }
            </div>
        </div>
    }
}

/// Measures the strip and returns its horizontal travel.
fn measure_carousel(strip: &HtmlElement) -> f64 {
    let cards = strip.children();
    let Some(first) = cards.item(0) else {
        return 0.0;
    };
    let parent_width = strip
        .parent_element()
        .map(|parent| parent.get_bounding_client_rect().width())
        .unwrap_or(0.0);

    carousel_distance(
        first.get_bounding_client_rect().width(),
        cards.length() as usize,
        strip.get_bounding_client_rect().left(),
        parent_width,
        dom::computed_px(&first, "padding-left"),
    )
}

#[derive(Properties, PartialEq)]
pub struct ProjectsCarouselProps {
    pub projects: Vec<Project>,
}

/// Pinned strip that scrolls sideways while the page scrolls down.
#[function_component(ProjectsCarousel)]
pub fn projects_carousel(props: &ProjectsCarouselProps) -> Html {
    let pin = use_node_ref();
    let strip = use_node_ref();

    {
        let pin = pin.clone();
        let strip = strip.clone();
        use_effect_with(props.projects.len(), move |_| {
            let mut subscriptions = Subscriptions::new();

            if let (Some(pin), Some(strip), Some(win)) =
                (pin.cast::<HtmlElement>(), strip.cast::<HtmlElement>(), window())
            {
                let distance = Rc::new(Cell::new(0.0));

                let place = {
                    let distance = distance.clone();
                    let pin = pin.clone();
                    let strip = strip.clone();
                    move || {
                        let progress =
                            carousel_progress(dom::scroll_offset(), dom::document_top(&pin), distance.get());
                        dom::set_style(
                            &strip,
                            "transform",
                            &format!("translate3d({:.2}px, 0, 0)", carousel_translate(progress, distance.get())),
                        );
                    }
                };
                let place = Rc::new(place);

                let measure = {
                    let place = place.clone();
                    move || {
                        dom::set_style(&strip, "transform", "none");
                        let travel = measure_carousel(&strip);
                        distance.set(travel);
                        let (_, viewport_height) = dom::viewport_size();
                        dom::set_style(&pin, "height", &format!("{:.0}px", viewport_height + travel));
                        place();
                    }
                };

                measure();
                dom::listen(&mut subscriptions, SubscriptionKind::Resize, &win, "resize", move |_| {
                    measure();
                });
                dom::listen(&mut subscriptions, SubscriptionKind::Scroll, &win, "scroll", move |_| {
                    place();
                });
            }

            move || drop(subscriptions)
        });
    }

    html! {
        <div class="work-pin" ref={pin}>
            <div class="work-sticky">
                <h2 class="work-title">{"My "}<span>{"Work"}</span></h2>
                <div class="work-flex" ref={strip}>
                    { for props.projects.iter().map(|project| html! {
                        <article class="work-box" key={project.id}>
                            <div class="work-info">
                                <div class="work-title-row">
                                    <h3>{project.ordinal()}</h3>
                                    <div>
                                        <h4>{project.title.clone()}</h4>
                                        <p>{project.role.clone()}</p>
                                    </div>
                                </div>
                                <h4>{"Tools and features"}</h4>
                                <p>{project.technologies_line()}</p>
                                <p class="work-period">{project.period.clone()}</p>
                            </div>
                            <img class="work-image" src={project.image.clone()} alt={project.title.clone()} loading="lazy" />
                            <p class="work-description">{project.description.clone()}</p>
                        </article>
                    }) }
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ContactSectionProps {
    pub contact: Contact,
    pub socials: Vec<SocialLink>,
}

#[function_component(ContactSection)]
pub fn contact_section(props: &ContactSectionProps) -> Html {
    html! {
        <section class="contact-section" id={ScrollSection::Contact.anchor_id()}>
            <ScrollReveal animation={RevealAnimation::Blur} label="contact">
                <div class="contact-container">
                    <h3>{"Contact"}</h3>
                    <div class="contact-flex">
                        <div class="contact-box">
                            <h4>{"Email"}</h4>
                            <p>
                                <a
                                    href={props.contact.mailto()}
                                    data-cursor={CursorCapability::DisableCursor.as_attr()}
                                >
                                    {props.contact.email.clone()}
                                </a>
                            </p>
                            <h4>{"Location"}</h4>
                            <p>{props.contact.location.clone()}</p>
                        </div>
                        <div class="contact-box">
                            <h4>{"Social"}</h4>
                            { for props.socials.iter().map(|social| html! {
                                <HoverLink
                                    key={social.href.clone()}
                                    href={social.href.clone()}
                                    label={social.label.clone()}
                                    external={true}
                                />
                            }) }
                        </div>
                        <div class="contact-box">
                            <h2>
                                {"Designed and Developed "}<br />{"by "}
                                <span>{props.contact.credit_name.clone()}</span>
                            </h2>
                            <h5>{format!("© {}", props.contact.credit_year)}</h5>
                        </div>
                    </div>
                </div>
            </ScrollReveal>
        </section>
    }
}
