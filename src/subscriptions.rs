//! Ownership of DOM subscriptions.
//!
//! Every event listener, animation frame request, observer and timer the site
//! registers is wrapped in a [`Tracked`] guard. Dropping the guard drops the
//! handle, which is what unregisters it. The guards also keep a per-thread
//! tally so teardown can be checked against the count taken before mount.

use std::any::Any;
use std::cell::Cell;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionKind {
    PointerMove,
    PointerOver,
    PointerOut,
    HoverLeave,
    Scroll,
    Resize,
    Visibility,
    Intersection,
    AnimationFrame,
    Timer,
}

impl SubscriptionKind {
    const COUNT: usize = 10;

    fn index(self) -> usize {
        match self {
            Self::PointerMove => 0,
            Self::PointerOver => 1,
            Self::PointerOut => 2,
            Self::HoverLeave => 3,
            Self::Scroll => 4,
            Self::Resize => 5,
            Self::Visibility => 6,
            Self::Intersection => 7,
            Self::AnimationFrame => 8,
            Self::Timer => 9,
        }
    }
}

thread_local! {
    static LIVE: [Cell<usize>; SubscriptionKind::COUNT] = const {
        [
            Cell::new(0), Cell::new(0), Cell::new(0), Cell::new(0),
            Cell::new(0), Cell::new(0), Cell::new(0), Cell::new(0),
            Cell::new(0), Cell::new(0),
        ]
    };
}

/// Number of tracked subscriptions alive on this thread.
pub fn live_count() -> usize {
    LIVE.with(|counts| counts.iter().map(Cell::get).sum())
}

pub fn live_count_of(kind: SubscriptionKind) -> usize {
    LIVE.with(|counts| counts[kind.index()].get())
}

fn adjust(kind: SubscriptionKind, up: bool) {
    LIVE.with(|counts| {
        let cell = &counts[kind.index()];
        if up {
            cell.set(cell.get() + 1);
        } else {
            cell.set(cell.get().saturating_sub(1));
        }
    });
}

pub struct Tracked<H> {
    kind: SubscriptionKind,
    _handle: H,
}

impl<H> Tracked<H> {
    pub fn new(kind: SubscriptionKind, handle: H) -> Self {
        adjust(kind, true);
        Self {
            kind,
            _handle: handle,
        }
    }
}

impl<H> Drop for Tracked<H> {
    fn drop(&mut self) {
        adjust(self.kind, false);
    }
}

impl<H> fmt::Debug for Tracked<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked").field("kind", &self.kind).finish()
    }
}

/// A bag of subscriptions released together, typically on component teardown.
#[derive(Default)]
pub struct Subscriptions {
    held: Vec<Tracked<Box<dyn Any>>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<H: 'static>(&mut self, kind: SubscriptionKind, handle: H) {
        self.held.push(Tracked::new(kind, Box::new(handle)));
    }

    pub fn release(&mut self) {
        self.held.clear();
    }
}

impl fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions")
            .field("held", &self.held.len())
            .finish()
    }
}

/// Holds at most one subscription; storing a new one drops the old one first.
pub struct Slot<H> {
    current: Option<Tracked<H>>,
}

impl<H> Slot<H> {
    pub fn empty() -> Self {
        Self { current: None }
    }

    pub fn replace(&mut self, kind: SubscriptionKind, handle: H) {
        self.current = None;
        self.current = Some(Tracked::new(kind, handle));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_occupied(&self) -> bool {
        self.current.is_some()
    }
}

impl<H> Default for Slot<H> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{Bounds, CursorEvent, CursorMachine, HoverBinding};
    use crate::pointer::PointerPosition;
    use crate::reveal::{RevealOptions, RevealTrigger};

    struct FakeListener;

    /// The cursor component's hover binding plus the global listeners its
    /// install step registers. The list of globals must track `install`.
    struct MountedCursor {
        hover: HoverBinding<FakeListener, u32>,
        globals: Subscriptions,
    }

    impl MountedCursor {
        fn mount() -> Self {
            let mut globals = Subscriptions::new();
            globals.push(SubscriptionKind::PointerMove, FakeListener);
            globals.push(SubscriptionKind::PointerOver, FakeListener);
            globals.push(SubscriptionKind::PointerOut, FakeListener);
            globals.push(SubscriptionKind::Visibility, FakeListener);
            globals.push(SubscriptionKind::AnimationFrame, FakeListener);
            Self {
                hover: HoverBinding::new(CursorMachine::new(0.0)),
                globals,
            }
        }

        fn feed(&mut self, event: CursorEvent, element: u32) {
            self.hover
                .handle(event, 0.0, Some(&element), |_, _| FakeListener);
        }

        fn unmount(mut self) {
            self.hover.teardown(0.0);
            self.globals.release();
        }
    }

    #[test]
    fn dropping_guards_returns_to_baseline() {
        let baseline = live_count();
        {
            let mut subscriptions = Subscriptions::new();
            subscriptions.push(SubscriptionKind::Scroll, FakeListener);
            subscriptions.push(SubscriptionKind::Resize, FakeListener);
            assert_eq!(live_count(), baseline + 2);
        }
        assert_eq!(live_count(), baseline);
    }

    #[test]
    fn slot_never_holds_two_subscriptions() {
        let mut slot = Slot::empty();
        slot.replace(SubscriptionKind::HoverLeave, FakeListener);
        slot.replace(SubscriptionKind::HoverLeave, FakeListener);

        assert_eq!(live_count_of(SubscriptionKind::HoverLeave), 1);
        slot.clear();
        assert_eq!(live_count_of(SubscriptionKind::HoverLeave), 0);
        assert!(!slot.is_occupied());
    }

    #[test]
    fn cursor_mount_unmount_cycles_leave_no_listeners() {
        let baseline = live_count();
        let icon = Bounds::new(100.0, 100.0, 40.0, 40.0);

        for _ in 0..3 {
            let mut cursor = MountedCursor::mount();
            let first = cursor.hover.next_id();
            cursor.feed(CursorEvent::EnterIcon { target: first, bounds: icon }, 1);
            cursor.feed(CursorEvent::EnterIcon { target: first + 1, bounds: icon }, 2);
            assert_eq!(live_count_of(SubscriptionKind::HoverLeave), 1);
            assert_eq!(cursor.hover.target(), Some(&1));

            cursor.feed(CursorEvent::PointerMoved(PointerPosition::new(500.0, 500.0)), 0);
            assert_eq!(live_count_of(SubscriptionKind::HoverLeave), 0);
            assert_eq!(cursor.hover.target(), None);

            let next = cursor.hover.next_id();
            cursor.feed(CursorEvent::EnterIcon { target: next, bounds: icon }, 3);
            assert_eq!(cursor.hover.target(), Some(&3));
            assert_eq!(live_count(), baseline + 6);
            cursor.unmount();
            assert_eq!(live_count(), baseline);
        }
    }

    #[test]
    fn hover_scrolled_away_drops_its_leave_listener() {
        let mut hover: HoverBinding<FakeListener, u32> = HoverBinding::new(CursorMachine::new(0.0));
        let still = PointerPosition::new(120.0, 120.0);
        let target = hover.next_id();
        hover.handle(
            CursorEvent::EnterIcon {
                target,
                bounds: Bounds::new(100.0, 100.0, 40.0, 40.0),
            },
            0.0,
            Some(&7),
            |_, _| FakeListener,
        );
        assert_eq!(live_count_of(SubscriptionKind::HoverLeave), 1);

        hover.handle(
            CursorEvent::TargetMoved {
                target,
                bounds: Bounds::new(100.0, -300.0, 40.0, 40.0),
                position: still,
            },
            16.0,
            None,
            |_, _| FakeListener,
        );
        assert_eq!(live_count_of(SubscriptionKind::HoverLeave), 0);
        assert_eq!(hover.target(), None);
    }

    #[test]
    fn once_reveal_disconnects_its_observer() {
        let baseline = live_count();
        let mut observer = Slot::empty();
        observer.replace(SubscriptionKind::Intersection, FakeListener);

        let mut trigger = RevealTrigger::new(RevealOptions::default());
        trigger.on_intersection(true);
        if !trigger.wants_observation() {
            observer.clear();
        }

        assert_eq!(live_count(), baseline);
    }
}
