//! One-shot (or repeating) entrance animations for elements scrolled into view.

use crate::tween::{stagger_delay, Ease, Tween};

pub const PARAGRAPH_STAGGER_MS: f64 = 200.0;
pub const EXPERTISE_CARD_BASE_MS: f64 = 700.0;
pub const EXPERTISE_CARD_STEP_MS: f64 = 150.0;
pub const SKILL_TAG_STEP_MS: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealAnimation {
    Fade,
    Slide,
    Scale,
    Blur,
}

impl RevealAnimation {
    pub fn initial_style(self) -> RevealStyle {
        let hidden = RevealStyle {
            opacity: 0.0,
            ..RevealStyle::NEUTRAL
        };
        match self {
            Self::Fade => RevealStyle {
                translate_y: 30.0,
                ..hidden
            },
            Self::Slide => RevealStyle {
                translate_x: -50.0,
                ..hidden
            },
            Self::Scale => RevealStyle {
                scale: 0.8,
                ..hidden
            },
            Self::Blur => RevealStyle {
                blur_px: 10.0,
                ..hidden
            },
        }
    }

    /// Style before the first reveal. Elements nothing observes stay visible.
    pub fn resting_style(self, observed: bool) -> RevealStyle {
        if observed {
            self.initial_style()
        } else {
            self.final_style()
        }
    }

    pub fn final_style(self) -> RevealStyle {
        RevealStyle::NEUTRAL
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealStyle {
    pub opacity: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub blur_px: f64,
}

impl RevealStyle {
    pub const NEUTRAL: Self = Self {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        blur_px: 0.0,
    };

    pub fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            opacity: mix(from.opacity, to.opacity),
            translate_x: mix(from.translate_x, to.translate_x),
            translate_y: mix(from.translate_y, to.translate_y),
            scale: mix(from.scale, to.scale),
            blur_px: mix(from.blur_px, to.blur_px),
        }
    }

    /// Inline style declarations for the element.
    pub fn to_css(&self) -> String {
        format!(
            "opacity: {:.3}; transform: translate3d({:.2}px, {:.2}px, 0) scale({:.3}); filter: blur({:.2}px);",
            self.opacity, self.translate_x, self.translate_y, self.scale, self.blur_px
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
    NotRevealed,
    Revealed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealOptions {
    pub animation: RevealAnimation,
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub threshold: f64,
    pub once: bool,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            animation: RevealAnimation::Fade,
            delay_ms: 0.0,
            duration_ms: 800.0,
            threshold: 0.1,
            once: true,
        }
    }
}

impl RevealOptions {
    /// Copy of these options delayed for item `index` of a staggered group.
    pub fn staggered(self, index: usize, step_ms: f64) -> Self {
        Self {
            delay_ms: stagger_delay(self.delay_ms, index, step_ms),
            ..self
        }
    }

    pub fn playback(&self) -> RevealPlayback {
        RevealPlayback {
            from: self.animation.initial_style(),
            to: self.animation.final_style(),
            tween: Tween::new(0.0, 1.0, self.duration_ms, Ease::Power2Out).with_delay(self.delay_ms),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevealAction {
    None,
    Play,
    Reset,
}

/// Decides what an intersection change means for one observed element.
#[derive(Clone, Debug)]
pub struct RevealTrigger {
    options: RevealOptions,
    state: RevealState,
    plays: u32,
    observing: bool,
}

impl RevealTrigger {
    pub fn new(options: RevealOptions) -> Self {
        Self {
            options,
            state: RevealState::NotRevealed,
            plays: 0,
            observing: true,
        }
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn plays(&self) -> u32 {
        self.plays
    }

    /// False once a one-shot trigger has fired or the element unmounted.
    pub fn wants_observation(&self) -> bool {
        self.observing
    }

    pub fn on_intersection(&mut self, is_intersecting: bool) -> RevealAction {
        if !self.observing {
            return RevealAction::None;
        }

        match (is_intersecting, self.state) {
            (true, RevealState::NotRevealed) => {
                self.state = RevealState::Revealed;
                self.plays += 1;
                if self.options.once {
                    self.observing = false;
                }
                RevealAction::Play
            }
            (false, RevealState::Revealed) if !self.options.once => {
                self.state = RevealState::NotRevealed;
                RevealAction::Reset
            }
            _ => RevealAction::None,
        }
    }

    pub fn unmount(&mut self) {
        self.observing = false;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealPlayback {
    from: RevealStyle,
    to: RevealStyle,
    tween: Tween,
}

impl RevealPlayback {
    pub fn style_at(&self, elapsed_ms: f64) -> RevealStyle {
        RevealStyle::lerp(&self.from, &self.to, self.tween.sample(elapsed_ms))
    }

    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        self.tween.is_finished(elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unobserved_element_rests_visible() {
        for animation in [
            RevealAnimation::Fade,
            RevealAnimation::Slide,
            RevealAnimation::Scale,
            RevealAnimation::Blur,
        ] {
            assert_eq!(animation.resting_style(false), RevealStyle::NEUTRAL);
            assert_eq!(animation.resting_style(true).opacity, 0.0);
        }
    }

    #[test]
    fn once_trigger_plays_exactly_one_time() {
        let mut trigger = RevealTrigger::new(RevealOptions::default());

        assert_eq!(trigger.on_intersection(false), RevealAction::None);
        assert_eq!(trigger.on_intersection(true), RevealAction::Play);
        for _ in 0..5 {
            assert_eq!(trigger.on_intersection(false), RevealAction::None);
            assert_eq!(trigger.on_intersection(true), RevealAction::None);
        }

        assert_eq!(trigger.plays(), 1);
        assert_eq!(trigger.state(), RevealState::Revealed);
        assert!(!trigger.wants_observation());
    }

    #[test]
    fn repeat_trigger_resets_and_replays() {
        let mut trigger = RevealTrigger::new(RevealOptions {
            once: false,
            ..RevealOptions::default()
        });

        assert_eq!(trigger.on_intersection(true), RevealAction::Play);
        assert_eq!(trigger.on_intersection(true), RevealAction::None);
        assert_eq!(trigger.on_intersection(false), RevealAction::Reset);
        assert_eq!(trigger.on_intersection(true), RevealAction::Play);
        assert_eq!(trigger.plays(), 2);
        assert!(trigger.wants_observation());
    }

    #[test]
    fn unmount_before_reveal_never_plays() {
        let mut trigger = RevealTrigger::new(RevealOptions::default());
        trigger.unmount();

        assert_eq!(trigger.on_intersection(true), RevealAction::None);
        assert_eq!(trigger.plays(), 0);
        assert_eq!(trigger.state(), RevealState::NotRevealed);
    }

    #[test]
    fn playback_runs_from_preset_to_neutral() {
        let playback = RevealOptions {
            animation: RevealAnimation::Slide,
            delay_ms: 100.0,
            ..RevealOptions::default()
        }
        .playback();

        assert_eq!(playback.style_at(50.0), RevealAnimation::Slide.initial_style());
        let halfway = playback.style_at(500.0);
        assert!(halfway.opacity > 0.0 && halfway.opacity < 1.0);
        assert!(halfway.translate_x < 0.0 && halfway.translate_x > -50.0);
        assert_eq!(playback.style_at(900.0), RevealStyle::NEUTRAL);
        assert!(playback.is_finished(900.0));
    }

    #[test]
    fn presets_hide_along_their_own_axis() {
        assert_eq!(RevealAnimation::Fade.initial_style().translate_y, 30.0);
        assert_eq!(RevealAnimation::Scale.initial_style().scale, 0.8);
        assert_eq!(RevealAnimation::Blur.initial_style().blur_px, 10.0);
        for animation in [
            RevealAnimation::Fade,
            RevealAnimation::Slide,
            RevealAnimation::Scale,
            RevealAnimation::Blur,
        ] {
            assert_eq!(animation.initial_style().opacity, 0.0);
        }
    }

    #[test]
    fn staggered_options_offset_each_item() {
        let base = RevealOptions {
            delay_ms: EXPERTISE_CARD_BASE_MS,
            ..RevealOptions::default()
        };
        assert_eq!(base.staggered(2, EXPERTISE_CARD_STEP_MS).delay_ms, 1_000.0);
    }

    #[test]
    fn css_includes_every_channel() {
        let css = RevealAnimation::Blur.initial_style().to_css();
        assert!(css.contains("opacity: 0.000"));
        assert!(css.contains("blur(10.00px)"));
        assert!(css.contains("scale(1.000)"));
    }
}
