//! Custom cursor presence state machine.
//!
//! The machine is fed pointer events and decides which mode the on-screen
//! indicator is in. It reports listener side effects as [`CursorEffect`]s
//! for the DOM layer to carry out. A leave listener is attached only while
//! a hover target is active, and the machine never holds more than one.

use crate::pointer::{PointerPosition, SmoothedPosition};
use crate::subscriptions::{Slot, SubscriptionKind};
use crate::tween::{Ease, Tween};

const DEFAULT_INDICATOR_SIZE: f64 = 30.0;
const HOVER_RESIZE_MS: f64 = 100.0;
const RELEASE_RESIZE_MS: f64 = 300.0;

/// Cursor behaviour a content component asks for on its subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorCapability {
    /// The indicator snaps onto the whole subtree's box.
    IconHover,
    /// The indicator hides while the pointer is inside.
    DisableCursor,
}

impl CursorCapability {
    pub const ATTRIBUTE: &'static str = "data-cursor";

    pub fn as_attr(self) -> &'static str {
        match self {
            Self::IconHover => "icons",
            Self::DisableCursor => "disable",
        }
    }

    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "icons" => Some(Self::IconHover),
            "disable" => Some(Self::DisableCursor),
            _ => None,
        }
    }

    /// CSS selector matching elements that carry this capability.
    pub fn selector(self) -> String {
        format!("[{}=\"{}\"]", Self::ATTRIBUTE, self.as_attr())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> PointerPosition {
        PointerPosition::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Half-open box: the left and top edges are inside, the right and
    /// bottom edges are not. `margin` grows the box on every side.
    pub fn contains(&self, position: PointerPosition, margin: f64) -> bool {
        position.x >= self.left - margin
            && position.x < self.left + self.width + margin
            && position.y >= self.top - margin
            && position.y < self.top + self.height + margin
    }
}

/// Opaque identity for a hover target element, assigned by the DOM layer.
pub type TargetId = u64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CursorMode {
    Default,
    HoverTarget(Bounds),
    Disabled,
}

impl CursorMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::HoverTarget(_) => "hover_target",
            Self::Disabled => "disabled",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CursorEvent {
    EnterIcon { target: TargetId, bounds: Bounds },
    LeaveIcon { target: TargetId, position: PointerPosition },
    /// Per-frame refresh of the hovered box, with the last known pointer.
    TargetMoved {
        target: TargetId,
        bounds: Bounds,
        position: PointerPosition,
    },
    PointerMoved(PointerPosition),
    EnterDisabled,
    LeaveDisabled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorEffect {
    AttachLeaveListener(TargetId),
    DetachLeaveListener(TargetId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndicatorClass {
    Free,
    Icons,
    Hidden,
}

impl IndicatorClass {
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Self::Free => None,
            Self::Icons => Some("cursor-icons"),
            Self::Hidden => Some("cursor-disable"),
        }
    }
}

/// Where and how big the indicator should be drawn this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub class: IndicatorClass,
}

#[derive(Clone, Debug)]
pub struct CursorMachine {
    mode: CursorMode,
    target: Option<TargetId>,
    release_margin: f64,
    default_size: f64,
    width: Tween,
    height: Tween,
    resize_started_ms: f64,
}

impl CursorMachine {
    pub fn new(release_margin: f64) -> Self {
        Self::with_default_size(release_margin, DEFAULT_INDICATOR_SIZE)
    }

    pub fn with_default_size(release_margin: f64, default_size: f64) -> Self {
        let rest = Tween::new(default_size, default_size, 0.0, Ease::Linear);
        Self {
            mode: CursorMode::Default,
            target: None,
            release_margin: release_margin.max(0.0),
            default_size,
            width: rest,
            height: rest,
            resize_started_ms: 0.0,
        }
    }

    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    pub fn active_target(&self) -> Option<TargetId> {
        self.target
    }

    /// The free-following trail only advances outside a hover target.
    pub fn follows_pointer(&self) -> bool {
        !matches!(self.mode, CursorMode::HoverTarget(_))
    }

    pub fn handle(&mut self, event: CursorEvent, now_ms: f64) -> Vec<CursorEffect> {
        match event {
            CursorEvent::EnterIcon { target, bounds } => self.enter_icon(target, bounds, now_ms),
            CursorEvent::LeaveIcon { target, position } => {
                if self.target != Some(target) {
                    return Vec::new();
                }
                self.release_if_outside(position, now_ms)
            }
            CursorEvent::TargetMoved {
                target,
                bounds,
                position,
            } => {
                if self.target != Some(target) {
                    return Vec::new();
                }
                self.mode = CursorMode::HoverTarget(bounds);
                self.release_if_outside(position, now_ms)
            }
            CursorEvent::PointerMoved(position) => self.release_if_outside(position, now_ms),
            CursorEvent::EnterDisabled => {
                let effects = self.release(now_ms);
                self.mode = CursorMode::Disabled;
                effects
            }
            CursorEvent::LeaveDisabled => {
                if self.mode == CursorMode::Disabled {
                    self.mode = CursorMode::Default;
                }
                Vec::new()
            }
        }
    }

    /// Drops any active hover target, reporting the listener to detach.
    pub fn teardown(&mut self, now_ms: f64) -> Vec<CursorEffect> {
        let effects = self.release(now_ms);
        self.mode = CursorMode::Default;
        effects
    }

    pub fn frame(&self, now_ms: f64, smoothed: SmoothedPosition) -> IndicatorFrame {
        let elapsed = now_ms - self.resize_started_ms;
        let width = self.width.sample(elapsed);
        let height = self.height.sample(elapsed);

        match self.mode {
            CursorMode::HoverTarget(bounds) => {
                let center = bounds.center();
                IndicatorFrame {
                    x: center.x,
                    y: center.y,
                    width,
                    height,
                    class: IndicatorClass::Icons,
                }
            }
            CursorMode::Default => IndicatorFrame {
                x: smoothed.x,
                y: smoothed.y,
                width,
                height,
                // Icon styling stays on until the shrink back finishes.
                class: if self.width.is_finished(elapsed) && self.height.is_finished(elapsed) {
                    IndicatorClass::Free
                } else {
                    IndicatorClass::Icons
                },
            },
            CursorMode::Disabled => IndicatorFrame {
                x: smoothed.x,
                y: smoothed.y,
                width,
                height,
                class: IndicatorClass::Hidden,
            },
        }
    }

    fn enter_icon(&mut self, target: TargetId, bounds: Bounds, now_ms: f64) -> Vec<CursorEffect> {
        match self.mode {
            CursorMode::Default => {
                self.mode = CursorMode::HoverTarget(bounds);
                self.target = Some(target);
                self.resize_to(bounds.width, bounds.height, HOVER_RESIZE_MS, now_ms);
                vec![CursorEffect::AttachLeaveListener(target)]
            }
            CursorMode::HoverTarget(_) | CursorMode::Disabled => Vec::new(),
        }
    }

    fn release_if_outside(&mut self, position: PointerPosition, now_ms: f64) -> Vec<CursorEffect> {
        match self.mode {
            CursorMode::HoverTarget(bounds) if is_outside(&bounds, position, self.release_margin) => {
                self.release(now_ms)
            }
            _ => Vec::new(),
        }
    }

    fn release(&mut self, now_ms: f64) -> Vec<CursorEffect> {
        let Some(target) = self.target.take() else {
            return Vec::new();
        };

        self.mode = CursorMode::Default;
        let size = self.default_size;
        self.resize_to(size, size, RELEASE_RESIZE_MS, now_ms);
        vec![CursorEffect::DetachLeaveListener(target)]
    }

    fn resize_to(&mut self, width: f64, height: f64, duration_ms: f64, now_ms: f64) {
        let elapsed = now_ms - self.resize_started_ms;
        let current_width = self.width.sample(elapsed);
        let current_height = self.height.sample(elapsed);

        self.width = Tween::new(current_width, width, duration_ms, Ease::Power2Out);
        self.height = Tween::new(current_height, height, duration_ms, Ease::Power2Out);
        self.resize_started_ms = now_ms;
    }
}

/// The one boundary test used by both leave events and move polling.
pub fn is_outside(bounds: &Bounds, position: PointerPosition, margin: f64) -> bool {
    !bounds.contains(position, margin)
}

/// A [`CursorMachine`] wired to the leave listener its effects ask for.
///
/// `H` is the listener handle and `T` the hovered element. The DOM layer
/// supplies both; tests use plain values.
pub struct HoverBinding<H, T> {
    machine: CursorMachine,
    leave: Slot<H>,
    target: Option<T>,
    next_id: TargetId,
}

impl<H, T: Clone> HoverBinding<H, T> {
    pub fn new(machine: CursorMachine) -> Self {
        Self {
            machine,
            leave: Slot::empty(),
            target: None,
            next_id: 1,
        }
    }

    pub fn machine(&self) -> &CursorMachine {
        &self.machine
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    /// Id the next hover target will be entered under.
    pub fn next_id(&self) -> TargetId {
        self.next_id
    }

    /// Feeds one event and carries out its effects. `attach` builds the leave
    /// listener for `candidate`. Returns the effects that were applied.
    pub fn handle<F>(
        &mut self,
        event: CursorEvent,
        now_ms: f64,
        candidate: Option<&T>,
        attach: F,
    ) -> Vec<CursorEffect>
    where
        F: FnOnce(&T, TargetId) -> H,
    {
        let effects = self.machine.handle(event, now_ms);
        self.apply(effects, candidate, Some(attach))
    }

    /// Releases any hover and drops the leave listener.
    pub fn teardown(&mut self, now_ms: f64) -> Vec<CursorEffect> {
        let effects = self.machine.teardown(now_ms);
        let applied = self.apply::<fn(&T, TargetId) -> H>(effects, None, None);
        self.leave.clear();
        self.target = None;
        applied
    }

    fn apply<F>(
        &mut self,
        effects: Vec<CursorEffect>,
        candidate: Option<&T>,
        mut attach: Option<F>,
    ) -> Vec<CursorEffect>
    where
        F: FnOnce(&T, TargetId) -> H,
    {
        let mut applied = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                CursorEffect::AttachLeaveListener(id) => {
                    let (Some(element), Some(attach)) = (candidate, attach.take()) else {
                        continue;
                    };
                    self.leave.replace(SubscriptionKind::HoverLeave, attach(element, id));
                    self.target = Some(element.clone());
                    self.next_id += 1;
                }
                CursorEffect::DetachLeaveListener(_) => {
                    self.leave.clear();
                    self.target = None;
                }
            }
            applied.push(effect);
        }
        applied
    }
}
