//! Scroll-offset derived state: current section, header chrome, progress,
//! anchor scrolling and the pinned projects strip.

use crate::tween::{Ease, Tween};

const ANCHOR_SCROLL_OFFSET_PX: f64 = 50.0;
const ANCHOR_SCROLL_DURATION_MS: f64 = 1_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollSection {
    About,
    Work,
    Contact,
}

impl ScrollSection {
    /// Document order.
    pub const ALL: [Self; 3] = [Self::About, Self::Work, Self::Contact];

    pub fn anchor_id(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Work => "work",
            Self::Contact => "contact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::About => "About",
            Self::Work => "Work/Projects",
            Self::Contact => "Contact",
        }
    }

    pub fn href(self) -> String {
        format!("#{}", self.anchor_id())
    }
}

/// A section anchor's top edge relative to the viewport, if it exists.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionAnchor {
    pub section: ScrollSection,
    pub top: Option<f64>,
}

impl SectionAnchor {
    pub fn new(section: ScrollSection, top: Option<f64>) -> Self {
        Self { section, top }
    }

    /// Anchor placed at `document_top`, seen from scroll `offset`.
    pub fn at_document_top(section: ScrollSection, document_top: f64, offset: f64) -> Self {
        Self::new(section, Some(document_top - offset))
    }
}

/// Picks the last anchor in document order whose top has crossed `threshold`.
/// Missing anchors are skipped. Falls back to [`ScrollSection::About`].
pub fn classify(anchors: &[SectionAnchor], threshold: f64) -> ScrollSection {
    anchors
        .iter()
        .rev()
        .find(|anchor| anchor.top.is_some_and(|top| top <= threshold))
        .map(|anchor| anchor.section)
        .unwrap_or(ScrollSection::About)
}

/// Remembers the last classification so callers can react to changes only.
#[derive(Clone, Debug)]
pub struct ScrollClassifier {
    threshold: f64,
    current: ScrollSection,
}

impl ScrollClassifier {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            current: ScrollSection::About,
        }
    }

    pub fn current(&self) -> ScrollSection {
        self.current
    }

    /// Returns the previous section when the classification changed.
    pub fn update(&mut self, anchors: &[SectionAnchor]) -> Option<ScrollSection> {
        let next = classify(anchors, self.threshold);
        if next == self.current {
            return None;
        }

        let previous = self.current;
        self.current = next;
        Some(previous)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderChrome {
    pub scrolled: bool,
    pub section: ScrollSection,
}

impl HeaderChrome {
    pub fn new(offset: f64, scrolled_after: f64, section: ScrollSection) -> Self {
        Self {
            scrolled: offset > scrolled_after,
            section,
        }
    }

    pub fn breadcrumb(&self) -> &'static str {
        self.section.label()
    }
}

/// Fraction of the page scrolled, clamped and rounded to three decimals.
pub fn scroll_progress(offset: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }

    let progress = (offset / scrollable).clamp(0.0, 1.0);
    (progress * 1_000.0).round() / 1_000.0
}

pub fn progress_width_css(progress: f64) -> String {
    format!("{:.1}%", progress * 100.0)
}

/// An in-flight scroll toward an in-page anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorScroll {
    tween: Tween,
    started_ms: f64,
}

impl AnchorScroll {
    pub fn new(current_offset: f64, anchor_document_top: f64, now_ms: f64) -> Self {
        let target = (anchor_document_top - ANCHOR_SCROLL_OFFSET_PX).max(0.0);
        Self {
            tween: Tween::new(
                current_offset,
                target,
                ANCHOR_SCROLL_DURATION_MS,
                Ease::Power3InOut,
            ),
            started_ms: now_ms,
        }
    }

    pub fn target(&self) -> f64 {
        self.tween.to
    }

    pub fn offset_at(&self, now_ms: f64) -> f64 {
        self.tween.sample(now_ms - self.started_ms)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.tween.is_finished(now_ms - self.started_ms)
    }
}

/// Horizontal travel of the pinned projects strip.
pub fn carousel_distance(
    card_width: f64,
    card_count: usize,
    container_left: f64,
    parent_width: f64,
    card_padding: f64,
) -> f64 {
    let distance =
        card_width * card_count as f64 - (container_left + parent_width) + card_padding / 2.0;
    distance.max(0.0)
}

/// How far the pin has been scrolled through, in `0..=1`.
pub fn carousel_progress(offset: f64, section_document_top: f64, distance: f64) -> f64 {
    if distance <= 0.0 {
        return 0.0;
    }
    ((offset - section_document_top) / distance).clamp(0.0, 1.0)
}

pub fn carousel_translate(progress: f64, distance: f64) -> f64 {
    -progress.clamp(0.0, 1.0) * distance
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 200.0;

    fn anchors_at(offset: f64) -> Vec<SectionAnchor> {
        [
            (ScrollSection::About, 0.0),
            (ScrollSection::Work, 450.0),
            (ScrollSection::Contact, 850.0),
        ]
        .into_iter()
        .map(|(section, top)| SectionAnchor::at_document_top(section, top, offset))
        .collect()
    }

    #[test]
    fn increasing_offset_walks_sections_in_order_once_each() {
        let mut classifier = ScrollClassifier::new(THRESHOLD);
        let mut seen = vec![classifier.current()];

        for offset in (0..=900).step_by(10) {
            if classifier.update(&anchors_at(offset as f64)).is_some() {
                seen.push(classifier.current());
            }
        }

        assert_eq!(
            seen,
            vec![ScrollSection::About, ScrollSection::Work, ScrollSection::Contact]
        );
    }

    #[test]
    fn documented_offsets_map_to_sections() {
        assert_eq!(classify(&anchors_at(0.0), THRESHOLD), ScrollSection::About);
        assert_eq!(classify(&anchors_at(250.0), THRESHOLD), ScrollSection::Work);
        assert_eq!(classify(&anchors_at(650.0), THRESHOLD), ScrollSection::Contact);
    }

    #[test]
    fn classification_is_a_pure_function_of_offset() {
        let mut classifier = ScrollClassifier::new(THRESHOLD);

        classifier.update(&anchors_at(0.0));
        assert_eq!(classifier.current(), ScrollSection::About);

        assert_eq!(
            classifier.update(&anchors_at(700.0)),
            Some(ScrollSection::About)
        );
        assert_eq!(classifier.current(), ScrollSection::Contact);

        assert_eq!(
            classifier.update(&anchors_at(100.0)),
            Some(ScrollSection::Contact)
        );
        assert_eq!(classifier.current(), ScrollSection::About);
        assert_eq!(classifier.update(&anchors_at(100.0)), None);
    }

    #[test]
    fn missing_anchor_is_skipped() {
        let anchors = vec![
            SectionAnchor::new(ScrollSection::About, Some(-600.0)),
            SectionAnchor::new(ScrollSection::Work, None),
            SectionAnchor::new(ScrollSection::Contact, Some(500.0)),
        ];
        assert_eq!(classify(&anchors, THRESHOLD), ScrollSection::About);

        let none_present: Vec<SectionAnchor> = ScrollSection::ALL
            .into_iter()
            .map(|section| SectionAnchor::new(section, None))
            .collect();
        assert_eq!(classify(&none_present, THRESHOLD), ScrollSection::About);
    }

    #[test]
    fn header_turns_translucent_past_fifty_pixels() {
        let top = HeaderChrome::new(50.0, 50.0, ScrollSection::About);
        let below = HeaderChrome::new(51.0, 50.0, ScrollSection::Work);

        assert!(!top.scrolled);
        assert!(below.scrolled);
        assert_eq!(below.breadcrumb(), "Work/Projects");
    }

    #[test]
    fn progress_is_clamped_and_rounded() {
        assert_eq!(scroll_progress(0.0, 3_000.0, 1_000.0), 0.0);
        assert_eq!(scroll_progress(1_000.0, 3_000.0, 1_000.0), 0.5);
        assert_eq!(scroll_progress(2.0, 3_000.0, 1_000.0), 0.001);
        assert_eq!(scroll_progress(5_000.0, 3_000.0, 1_000.0), 1.0);
        assert_eq!(scroll_progress(10.0, 800.0, 1_000.0), 0.0);
        assert_eq!(progress_width_css(0.5), "50.0%");
    }

    #[test]
    fn anchor_scroll_lands_fifty_pixels_above_target() {
        let scroll = AnchorScroll::new(0.0, 1_250.0, 2_000.0);

        assert_eq!(scroll.target(), 1_200.0);
        assert_eq!(scroll.offset_at(2_000.0), 0.0);
        assert_eq!(scroll.offset_at(2_500.0), 600.0);
        assert_eq!(scroll.offset_at(3_000.0), 1_200.0);
        assert!(scroll.is_finished(3_000.0));
        assert_eq!(AnchorScroll::new(300.0, 20.0, 0.0).target(), 0.0);
    }

    #[test]
    fn carousel_travel_covers_overflowing_cards() {
        let distance = carousel_distance(600.0, 4, 100.0, 1_200.0, 40.0);
        assert_eq!(distance, 1_120.0);
        assert_eq!(carousel_distance(300.0, 2, 0.0, 1_200.0, 0.0), 0.0);

        assert_eq!(carousel_progress(2_000.0, 2_000.0, distance), 0.0);
        assert_eq!(carousel_progress(2_560.0, 2_000.0, distance), 0.5);
        assert_eq!(carousel_progress(9_000.0, 2_000.0, distance), 1.0);
        assert_eq!(carousel_progress(10.0, 0.0, 0.0), 0.0);
        assert_eq!(carousel_translate(0.5, distance), -560.0);
    }
}
