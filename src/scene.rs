//! Embedded 3D scene: load bookkeeping and synthetic "ambient" hover motion.
//!
//! The renderer itself is a third-party runtime. This module only decides
//! which scene to load, how long to wait for it, and where to inject fake
//! pointer moves while the visitor is not touching the canvas.

use std::future::Future;

use futures_util::future::{select, Either};
use futures_util::pin_mut;
use thiserror::Error;

use crate::cursor::Bounds;
use crate::pointer::PointerPosition;

pub const DESKTOP_SCENE_URL: &str = "https://prod.spline.design/Lbl3OvwVu2mrjYxX/scene.splinecode";
pub const MOBILE_SCENE_URL: &str = "https://prod.spline.design/zIZ6xCkhjLKsODNW/scene.splinecode";
pub const DESKTOP_BREAKPOINT_PX: f64 = 1024.0;

const AMBIENT_STEP: f64 = 0.02;

const MOBILE_WAYPOINTS: &[(f64, f64)] = &[(0.2, 0.2), (0.9, 0.6), (0.1, 0.6)];
const DESKTOP_WAYPOINTS: &[(f64, f64)] = &[
    (0.4, 0.2),
    (0.6, 0.4),
    (0.5, 0.5),
    (0.7, 0.5),
    (0.4, 0.6),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Viewport {
    Mobile,
    Desktop,
}

impl Viewport {
    pub fn from_width(width: f64) -> Self {
        if width < DESKTOP_BREAKPOINT_PX {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn scene_url(self) -> &'static str {
        match self {
            Self::Mobile => MOBILE_SCENE_URL,
            Self::Desktop => DESKTOP_SCENE_URL,
        }
    }

    fn waypoints(self) -> &'static [(f64, f64)] {
        match self {
            Self::Mobile => MOBILE_WAYPOINTS,
            Self::Desktop => DESKTOP_WAYPOINTS,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene runtime is not installed on the page")]
    RuntimeMissing,
    #[error("could not create a canvas for the scene")]
    CanvasUnavailable,
    #[error("scene runtime rejected the load: {0}")]
    LoadRejected(String),
    #[error("scene did not load within {after_ms} ms")]
    TimedOut { after_ms: u64 },
}

impl SceneError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::RuntimeMissing => "runtime_missing",
            Self::CanvasUnavailable => "canvas_unavailable",
            Self::LoadRejected(_) => "load_rejected",
            Self::TimedOut { .. } => "timed_out",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneState {
    Loading,
    Ready,
    Failed(SceneError),
}

impl SceneState {
    pub fn from_result(result: Result<(), SceneError>) -> Self {
        match result {
            Ok(()) => Self::Ready,
            Err(error) => Self::Failed(error),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Races `load` against `timer`. The timer firing first is a timeout.
pub async fn await_scene_load<L, T>(load: L, timer: T, timeout_ms: u64) -> Result<(), SceneError>
where
    L: Future<Output = Result<(), SceneError>>,
    T: Future<Output = ()>,
{
    pin_mut!(load);
    pin_mut!(timer);

    match select(load, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(SceneError::TimedOut {
            after_ms: timeout_ms,
        }),
    }
}

/// Drifts a fake pointer between waypoints on the scene canvas.
#[derive(Clone, Debug)]
pub struct AmbientHover {
    waypoints: &'static [(f64, f64)],
    index: usize,
    current: PointerPosition,
    last_change_ms: f64,
    interval_ms: f64,
    suppress_ms: f64,
    suppressed_until_ms: f64,
}

impl AmbientHover {
    pub fn new(
        viewport: Viewport,
        rect: Bounds,
        now_ms: f64,
        interval_ms: u64,
        suppress_ms: u64,
    ) -> Self {
        let waypoints = viewport.waypoints();
        Self {
            waypoints,
            index: 0,
            current: waypoint_position(waypoints[0], &rect),
            last_change_ms: now_ms,
            interval_ms: interval_ms.max(1) as f64,
            suppress_ms: suppress_ms as f64,
            suppressed_until_ms: f64::MIN,
        }
    }

    /// A trusted pointer event on the canvas pauses the drift for a while.
    pub fn note_real_input(&mut self, now_ms: f64) {
        self.suppressed_until_ms = now_ms + self.suppress_ms;
    }

    pub fn is_suppressed(&self, now_ms: f64) -> bool {
        now_ms < self.suppressed_until_ms
    }

    pub fn target_index(&self) -> usize {
        self.index
    }

    /// Position for this frame's synthetic pointer move, if one is due.
    pub fn frame(&mut self, now_ms: f64, rect: &Bounds) -> Option<PointerPosition> {
        if self.is_suppressed(now_ms) {
            self.last_change_ms = now_ms;
            return None;
        }

        if now_ms - self.last_change_ms >= self.interval_ms {
            self.index = (self.index + 1) % self.waypoints.len();
            self.last_change_ms = now_ms;
        }

        let t = ((now_ms - self.last_change_ms) / self.interval_ms).min(1.0);
        let target = waypoint_position(self.waypoints[self.index], rect);
        self.current.x += (target.x - self.current.x) * t * AMBIENT_STEP;
        self.current.y += (target.y - self.current.y) * t * AMBIENT_STEP;
        Some(self.current)
    }
}

fn waypoint_position((fx, fy): (f64, f64), rect: &Bounds) -> PointerPosition {
    PointerPosition::new(rect.left + fx * rect.width, rect.top + fy * rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn canvas() -> Bounds {
        Bounds::new(0.0, 0.0, 1_000.0, 500.0)
    }

    #[test]
    fn breakpoint_selects_scene() {
        assert_eq!(Viewport::from_width(1_023.0), Viewport::Mobile);
        assert_eq!(Viewport::from_width(1_024.0), Viewport::Desktop);
        assert_eq!(Viewport::Mobile.scene_url(), MOBILE_SCENE_URL);
    }

    #[test]
    fn drift_starts_on_first_waypoint_and_moves_toward_it() {
        let mut ambient = AmbientHover::new(Viewport::Desktop, canvas(), 0.0, 5_000, 2_000);

        let first = ambient.frame(2_500.0, &canvas()).expect("not suppressed");
        assert_eq!(first, PointerPosition::new(400.0, 100.0));

        let next = ambient.frame(5_000.0, &canvas()).expect("not suppressed");
        assert_eq!(ambient.target_index(), 1);
        assert_eq!(next, PointerPosition::new(400.0, 100.0));

        let moving = ambient.frame(7_500.0, &canvas()).expect("not suppressed");
        assert!(moving.x > 400.0 && moving.x < 600.0);
        assert!(moving.y > 100.0 && moving.y < 200.0);
    }

    #[test]
    fn waypoints_cycle() {
        let mut ambient = AmbientHover::new(Viewport::Mobile, canvas(), 0.0, 1_000, 0);
        let mut seen = Vec::new();
        for step in 1..=4 {
            ambient.frame(step as f64 * 1_000.0, &canvas());
            seen.push(ambient.target_index());
        }
        assert_eq!(seen, vec![1, 2, 0, 1]);
    }

    #[test]
    fn real_input_suppresses_and_restarts_interval() {
        let mut ambient = AmbientHover::new(Viewport::Desktop, canvas(), 0.0, 5_000, 2_000);
        ambient.note_real_input(4_000.0);

        assert_eq!(ambient.frame(4_500.0, &canvas()), None);
        assert_eq!(ambient.frame(5_999.0, &canvas()), None);
        assert!(ambient.frame(6_000.0, &canvas()).is_some());
        assert_eq!(ambient.target_index(), 0);
        assert!(ambient.frame(10_998.0, &canvas()).is_some());
        assert_eq!(ambient.target_index(), 0);
        ambient.frame(11_000.0, &canvas());
        assert_eq!(ambient.target_index(), 1);
    }

    #[tokio::test]
    async fn load_finishing_first_wins() {
        let result = await_scene_load(
            async { Ok(()) },
            tokio::time::sleep(Duration::from_millis(50)),
            50,
        )
        .await;
        assert_eq!(SceneState::from_result(result), SceneState::Ready);
    }

    #[tokio::test]
    async fn hung_load_times_out_into_fallback() {
        let result = await_scene_load(
            std::future::pending::<Result<(), SceneError>>(),
            tokio::time::sleep(Duration::from_millis(10)),
            10,
        )
        .await;

        assert_eq!(result, Err(SceneError::TimedOut { after_ms: 10 }));
        let state = SceneState::from_result(result);
        assert!(!state.is_ready());
    }

    #[tokio::test]
    async fn rejection_is_surfaced() {
        let result = await_scene_load(
            async { Err(SceneError::LoadRejected("404".to_string())) },
            std::future::pending::<()>(),
            10_000,
        )
        .await;

        let error = result.expect_err("rejection passes through");
        assert_eq!(error.error_class(), "load_rejected");
        assert_eq!(error.to_string(), "scene runtime rejected the load: 404");
    }
}
