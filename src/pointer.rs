//! Raw pointer tracking and per-frame smoothing.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Whether a pointer event came from the user or was dispatched by script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSource {
    Real,
    Synthetic,
}

impl PointerSource {
    pub fn from_trusted(is_trusted: bool) -> Self {
        if is_trusted {
            Self::Real
        } else {
            Self::Synthetic
        }
    }

    pub fn is_real(self) -> bool {
        self == Self::Real
    }
}

/// Lagged copy of [`PointerPosition`]. Only [`PointerTracker::tick`] writes it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SmoothedPosition {
    pub x: f64,
    pub y: f64,
}

/// Holds the latest raw coordinates and the smoothed trail.
///
/// Moves overwrite each other between frames; the next tick reads only the
/// last one. While the page is hidden ticks do nothing, but moves are still
/// recorded so the trail resumes from the right target.
#[derive(Clone, Debug)]
pub struct PointerTracker {
    raw: PointerPosition,
    smoothed: SmoothedPosition,
    delay: f64,
    visible: bool,
}

impl PointerTracker {
    /// `delay` is the follow divisor: each tick covers `1/delay` of the gap.
    pub fn new(delay: f64) -> Self {
        Self {
            raw: PointerPosition::default(),
            smoothed: SmoothedPosition::default(),
            delay: delay.max(1.0),
            visible: true,
        }
    }

    pub fn record(&mut self, x: f64, y: f64) {
        self.raw = PointerPosition::new(x, y);
    }

    pub fn raw(&self) -> PointerPosition {
        self.raw
    }

    pub fn smoothed(&self) -> SmoothedPosition {
        self.smoothed
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_paused(&self) -> bool {
        !self.visible
    }

    /// Advances the trail by one frame. Returns `None` while paused.
    pub fn tick(&mut self) -> Option<SmoothedPosition> {
        if !self.visible {
            return None;
        }

        self.smoothed.x += (self.raw.x - self.smoothed.x) / self.delay;
        self.smoothed.y += (self.raw.y - self.smoothed.y) / self.delay;
        Some(self.smoothed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_covers_one_sixth_of_the_gap() {
        let mut tracker = PointerTracker::new(6.0);
        tracker.record(60.0, 120.0);

        let smoothed = tracker.tick().expect("visible tracker ticks");
        assert_eq!(smoothed, SmoothedPosition { x: 10.0, y: 20.0 });
    }

    #[test]
    fn only_the_last_move_before_a_tick_counts() {
        let mut tracker = PointerTracker::new(2.0);
        tracker.record(400.0, 400.0);
        tracker.record(-80.0, 10.0);
        tracker.record(100.0, 50.0);

        assert_eq!(
            tracker.tick(),
            Some(SmoothedPosition { x: 50.0, y: 25.0 })
        );
    }

    #[test]
    fn trail_converges_on_target() {
        let mut tracker = PointerTracker::new(6.0);
        tracker.record(500.0, 300.0);
        for _ in 0..200 {
            tracker.tick();
        }

        let smoothed = tracker.smoothed();
        assert!((smoothed.x - 500.0).abs() < 0.01);
        assert!((smoothed.y - 300.0).abs() < 0.01);
    }

    #[test]
    fn hidden_page_pauses_smoothing_but_keeps_recording() {
        let mut tracker = PointerTracker::new(4.0);
        tracker.set_visible(false);
        tracker.record(40.0, 40.0);

        assert!(tracker.is_paused());
        assert_eq!(tracker.tick(), None);
        assert_eq!(tracker.smoothed(), SmoothedPosition::default());
        assert_eq!(tracker.raw(), PointerPosition::new(40.0, 40.0));

        tracker.set_visible(true);
        assert_eq!(
            tracker.tick(),
            Some(SmoothedPosition { x: 10.0, y: 10.0 })
        );
    }

    #[test]
    fn untrusted_events_are_synthetic() {
        assert!(PointerSource::from_trusted(true).is_real());
        assert_eq!(PointerSource::from_trusted(false), PointerSource::Synthetic);
    }

    #[test]
    fn delay_below_one_is_clamped() {
        let mut tracker = PointerTracker::new(0.2);
        tracker.record(10.0, 10.0);

        assert_eq!(
            tracker.tick(),
            Some(SmoothedPosition { x: 10.0, y: 10.0 })
        );
    }
}
