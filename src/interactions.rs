//! Small per-component interactions: the landing word swap, magnetic social
//! icons and the tap-to-open expertise cards.

use crate::pointer::PointerSource;
use crate::tween::approach;

pub const SWAP_INTERVAL_MS: u32 = 2_000;
pub const SWAP_LETTER_STAGGER_MS: f64 = 50.0;
pub const SWAP_LETTER_DURATION_MS: f64 = 400.0;

const MAGNET_FACTOR: f64 = 0.1;
const MAGNET_INNER_MIN: f64 = 5.0;
const MAGNET_INNER_MAX: f64 = 45.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapPhase {
    Initial,
    Swapped,
}

impl SwapPhase {
    pub fn next(self) -> Self {
        match self {
            Self::Initial => Self::Swapped,
            Self::Swapped => Self::Initial,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Initial => "swap-initial",
            Self::Swapped => "swap-animate",
        }
    }
}

/// Inline style for letter `index` of a swapping word.
pub fn swap_letter_style(index: usize) -> String {
    format!(
        "transition-delay: {:.0}ms; transition-duration: {:.0}ms;",
        index as f64 * SWAP_LETTER_STAGGER_MS,
        SWAP_LETTER_DURATION_MS
    )
}

/// Where a magnetic icon's inner link wants to sit, in icon-local pixels.
pub fn magnetic_target(local_x: f64, local_y: f64, width: f64, height: f64) -> (f64, f64) {
    let inside = |value: f64| value > MAGNET_INNER_MIN && value < MAGNET_INNER_MAX;
    if inside(local_x) && inside(local_y) {
        (local_x, local_y)
    } else {
        (width / 2.0, height / 2.0)
    }
}

/// Eases a magnetic icon one frame toward its target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Magnet {
    pub x: f64,
    pub y: f64,
    target_x: f64,
    target_y: f64,
}

impl Magnet {
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            target_x: width / 2.0,
            target_y: height / 2.0,
        }
    }

    /// Script-dispatched moves never re-aim the magnet.
    pub fn aim(&mut self, source: PointerSource, local_x: f64, local_y: f64, width: f64, height: f64) {
        if !source.is_real() {
            return;
        }
        let (x, y) = magnetic_target(local_x, local_y, width, height);
        self.target_x = x;
        self.target_y = y;
    }

    pub fn step(&mut self) {
        self.x = approach(self.x, self.target_x, MAGNET_FACTOR);
        self.y = approach(self.y, self.target_y, MAGNET_FACTOR);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CardFlags {
    pub active: bool,
    pub sibling: bool,
}

/// Tap state of the expertise cards on coarse pointers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpertiseDeck {
    cards: Vec<CardFlags>,
}

impl ExpertiseDeck {
    pub fn new(count: usize) -> Self {
        Self {
            cards: vec![CardFlags::default(); count],
        }
    }

    pub fn cards(&self) -> &[CardFlags] {
        &self.cards
    }

    /// Toggles the tapped card; every other card closes and flips its
    /// sibling styling.
    pub fn tap(&mut self, index: usize) {
        if index >= self.cards.len() {
            return;
        }

        for (position, card) in self.cards.iter_mut().enumerate() {
            if position == index {
                card.active = !card.active;
                card.sibling = false;
            } else {
                card.active = false;
                card.sibling = !card.sibling;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_phase_alternates() {
        assert_eq!(SwapPhase::Initial.next(), SwapPhase::Swapped);
        assert_eq!(SwapPhase::Initial.next().next(), SwapPhase::Initial);
        assert_eq!(
            swap_letter_style(3),
            "transition-delay: 150ms; transition-duration: 400ms;"
        );
    }

    #[test]
    fn magnet_follows_only_inside_inner_box() {
        assert_eq!(magnetic_target(20.0, 30.0, 50.0, 50.0), (20.0, 30.0));
        assert_eq!(magnetic_target(5.0, 30.0, 50.0, 50.0), (25.0, 25.0));
        assert_eq!(magnetic_target(20.0, 45.0, 50.0, 50.0), (25.0, 25.0));
    }

    #[test]
    fn magnet_eases_a_tenth_per_frame() {
        let mut magnet = Magnet::centered(50.0, 50.0);
        magnet.step();
        assert_eq!((magnet.x, magnet.y), (2.5, 2.5));

        magnet.aim(PointerSource::Real, 40.0, 10.0, 50.0, 50.0);
        magnet.step();
        assert!((magnet.x - 6.25).abs() < 1e-9);
        assert!((magnet.y - 3.25).abs() < 1e-9);
    }

    #[test]
    fn synthetic_moves_do_not_pull_the_magnet_back() {
        let mut magnet = Magnet::centered(50.0, 50.0);
        magnet.aim(PointerSource::Real, 40.0, 40.0, 50.0, 50.0);

        // Scene drift lands far outside the icon every frame.
        for _ in 0..100 {
            magnet.aim(PointerSource::Synthetic, -600.0, 300.0, 50.0, 50.0);
            magnet.step();
        }
        assert!((magnet.x - 40.0).abs() < 0.01);
        assert!((magnet.y - 40.0).abs() < 0.01);
    }

    #[test]
    fn tapping_a_card_closes_the_others() {
        let mut deck = ExpertiseDeck::new(3);
        deck.tap(1);
        assert_eq!(
            deck.cards(),
            &[
                CardFlags { active: false, sibling: true },
                CardFlags { active: true, sibling: false },
                CardFlags { active: false, sibling: true },
            ]
        );

        deck.tap(0);
        assert_eq!(
            deck.cards(),
            &[
                CardFlags { active: true, sibling: false },
                CardFlags { active: false, sibling: true },
                CardFlags { active: false, sibling: false },
            ]
        );

        deck.tap(7);
        assert!(deck.cards()[0].active);
    }
}
