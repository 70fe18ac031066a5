use crate::logging::LogLevel;

const DEFAULT_CURSOR_DELAY: f64 = 6.0;
const DEFAULT_HOVER_RELEASE_MARGIN_PX: f64 = 0.0;
const DEFAULT_SECTION_THRESHOLD_PX: f64 = 200.0;
const DEFAULT_HEADER_SCROLLED_OFFSET_PX: f64 = 50.0;
const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
const DEFAULT_SCENE_LOAD_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_AMBIENT_INTERVAL_MS: u64 = 5_000;
const DEFAULT_AMBIENT_SUPPRESS_MS: u64 = 2_000;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const CURSOR_DELAY_BOUNDS: (f64, f64) = (1.0, 30.0);
const HOVER_RELEASE_MARGIN_PX_BOUNDS: (f64, f64) = (0.0, 64.0);
const SECTION_THRESHOLD_PX_BOUNDS: (f64, f64) = (0.0, 2_000.0);
const HEADER_SCROLLED_OFFSET_PX_BOUNDS: (f64, f64) = (0.0, 1_000.0);
const REVEAL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);
const SCENE_LOAD_TIMEOUT_MS_BOUNDS: (u64, u64) = (1_000, 60_000);
const AMBIENT_INTERVAL_MS_BOUNDS: (u64, u64) = (500, 60_000);
const AMBIENT_SUPPRESS_MS_BOUNDS: (u64, u64) = (0, 30_000);

/// Tunables for the motion layer, read from `data-*` attributes on the
/// mount element.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionConfig {
    pub cursor_delay: f64,
    pub hover_release_margin: f64,
    pub section_threshold: f64,
    pub header_scrolled_offset: f64,
    pub reveal_threshold: f64,
    pub scene_load_timeout_ms: u64,
    pub ambient_interval_ms: u64,
    pub ambient_suppress_ms: u64,
    pub log_level: LogLevel,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            cursor_delay: DEFAULT_CURSOR_DELAY,
            hover_release_margin: DEFAULT_HOVER_RELEASE_MARGIN_PX,
            section_threshold: DEFAULT_SECTION_THRESHOLD_PX,
            header_scrolled_offset: DEFAULT_HEADER_SCROLLED_OFFSET_PX,
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            scene_load_timeout_ms: DEFAULT_SCENE_LOAD_TIMEOUT_MS,
            ambient_interval_ms: DEFAULT_AMBIENT_INTERVAL_MS,
            ambient_suppress_ms: DEFAULT_AMBIENT_SUPPRESS_MS,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl MotionConfig {
    /// Builds the config from a key lookup. Keys are the attribute names
    /// without the `data-` prefix, e.g. `cursor-delay`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let cursor_delay = parse_f64_with_bounds(
            &lookup,
            "cursor-delay",
            DEFAULT_CURSOR_DELAY,
            CURSOR_DELAY_BOUNDS,
        );
        let hover_release_margin = parse_f64_with_bounds(
            &lookup,
            "hover-release-margin",
            DEFAULT_HOVER_RELEASE_MARGIN_PX,
            HOVER_RELEASE_MARGIN_PX_BOUNDS,
        );
        let section_threshold = parse_f64_with_bounds(
            &lookup,
            "section-threshold",
            DEFAULT_SECTION_THRESHOLD_PX,
            SECTION_THRESHOLD_PX_BOUNDS,
        );
        let header_scrolled_offset = parse_f64_with_bounds(
            &lookup,
            "header-scrolled-offset",
            DEFAULT_HEADER_SCROLLED_OFFSET_PX,
            HEADER_SCROLLED_OFFSET_PX_BOUNDS,
        );
        let reveal_threshold = parse_f64_with_bounds(
            &lookup,
            "reveal-threshold",
            DEFAULT_REVEAL_THRESHOLD,
            REVEAL_THRESHOLD_BOUNDS,
        );
        let scene_load_timeout_ms = parse_u64_with_bounds(
            &lookup,
            "scene-load-timeout-ms",
            DEFAULT_SCENE_LOAD_TIMEOUT_MS,
            SCENE_LOAD_TIMEOUT_MS_BOUNDS,
        );
        let ambient_interval_ms = parse_u64_with_bounds(
            &lookup,
            "ambient-interval-ms",
            DEFAULT_AMBIENT_INTERVAL_MS,
            AMBIENT_INTERVAL_MS_BOUNDS,
        );
        let ambient_suppress_ms = parse_u64_with_bounds(
            &lookup,
            "ambient-suppress-ms",
            DEFAULT_AMBIENT_SUPPRESS_MS,
            AMBIENT_SUPPRESS_MS_BOUNDS,
        );
        let log_level = parse_log_level(&lookup, "log-level", DEFAULT_LOG_LEVEL);

        Self {
            cursor_delay,
            hover_release_margin,
            section_threshold,
            header_scrolled_offset,
            reveal_threshold,
            scene_load_timeout_ms,
            ambient_interval_ms,
            ambient_suppress_ms,
            log_level,
        }
    }
}

fn parse_non_empty_string(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_f64_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: f64,
    bounds: (f64, f64),
) -> f64 {
    parse_non_empty_string(lookup, name)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite() && (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_u64_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
    bounds: (u64, u64),
) -> u64 {
    parse_non_empty_string(lookup, name)
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_log_level(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: LogLevel,
) -> LogLevel {
    parse_non_empty_string(lookup, name)
        .and_then(|value| LogLevel::from_str(&value.to_ascii_lowercase()))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn empty_lookup_yields_defaults() {
        assert_eq!(MotionConfig::from_lookup(|_| None), MotionConfig::default());
    }

    #[test]
    fn in_bounds_values_are_applied() {
        let config = MotionConfig::from_lookup(lookup_from(&[
            ("cursor-delay", "8"),
            ("section-threshold", " 240 "),
            ("scene-load-timeout-ms", "4000"),
            ("log-level", "DEBUG"),
        ]));

        assert_eq!(config.cursor_delay, 8.0);
        assert_eq!(config.section_threshold, 240.0);
        assert_eq!(config.scene_load_timeout_ms, 4_000);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn out_of_bounds_or_garbage_falls_back_to_default() {
        let config = MotionConfig::from_lookup(lookup_from(&[
            ("cursor-delay", "0.5"),
            ("reveal-threshold", "1.5"),
            ("scene-load-timeout-ms", "-3"),
            ("ambient-interval-ms", "soon"),
            ("hover-release-margin", "NaN"),
            ("log-level", "verbose"),
        ]));

        assert_eq!(config.cursor_delay, DEFAULT_CURSOR_DELAY);
        assert_eq!(config.reveal_threshold, DEFAULT_REVEAL_THRESHOLD);
        assert_eq!(config.scene_load_timeout_ms, DEFAULT_SCENE_LOAD_TIMEOUT_MS);
        assert_eq!(config.ambient_interval_ms, DEFAULT_AMBIENT_INTERVAL_MS);
        assert_eq!(config.hover_release_margin, DEFAULT_HOVER_RELEASE_MARGIN_PX);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }
}
