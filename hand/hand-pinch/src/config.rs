//! Pinch detection thresholds.
//!
//! Distances are in meters. Two threshold sets exist: the default one, and a
//! tighter one used while the hand is seen edge-on from the head, where
//! tracking of the finger tips is most reliable.

use serde::{Deserialize, Serialize};

use hand_types::{HandError, Result};

/// Hysteresis thresholds for one tracking quality level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinchThresholds {
    /// A released finger starts pinching below this distance.
    pub start: f32,
    /// A pinching finger always releases above this distance.
    pub stop_max: f32,
    /// A pinching finger releases once it opens this far past the closest
    /// distance reached during the pinch.
    pub stop_offset: f32,
}

impl Default for PinchThresholds {
    fn default() -> Self {
        Self {
            start: 0.02,
            stop_max: 0.10,
            stop_offset: 0.04,
        }
    }
}

impl PinchThresholds {
    /// Creates a threshold set.
    #[must_use]
    pub const fn new(start: f32, stop_max: f32, stop_offset: f32) -> Self {
        Self {
            start,
            stop_max,
            stop_offset,
        }
    }

    /// Thresholds used when the hand is seen edge-on.
    #[must_use]
    pub const fn high_quality() -> Self {
        Self::new(0.016, 0.10, 0.016)
    }

    /// Pinch strength for `distance`: `1` at or below `start`, `0` at or
    /// above `stop_max`, linear in between.
    #[must_use]
    pub fn strength(&self, distance: f32) -> f32 {
        if !distance.is_finite() {
            return 0.0;
        }
        let span = self.stop_max - self.start;
        if span <= 0.0 {
            return if distance <= self.start { 1.0 } else { 0.0 };
        }
        1.0 - ((distance - self.start) / span).clamp(0.0, 1.0)
    }

    /// Validate the thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::InvalidConfig`] if a threshold is not a positive
    /// finite number or `start` is not below `stop_max`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("start", self.start),
            ("stop_max", self.stop_max),
            ("stop_offset", self.stop_offset),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(HandError::invalid_config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.start >= self.stop_max {
            return Err(HandError::invalid_config(format!(
                "start ({}) must be below stop_max ({})",
                self.start, self.stop_max
            )));
        }
        Ok(())
    }
}

/// Configuration for a [`PinchDetector`](crate::PinchDetector).
///
/// # Example
///
/// ```
/// use hand_pinch::{PinchConfig, PinchThresholds};
///
/// let config = PinchConfig::default()
///     .high_quality_view_angle_deg(30.0)
///     .default_thresholds(PinchThresholds::new(0.025, 0.1, 0.05));
/// assert!(config.validate().is_ok());
///
/// let json = serde_json::to_string(&config).unwrap();
/// assert_eq!(PinchConfig::from_json(&json).unwrap(), config);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinchConfig {
    /// Thresholds in normal tracking conditions.
    pub default: PinchThresholds,
    /// Thresholds when the hand is seen edge-on.
    pub high_quality: PinchThresholds,
    /// Largest angle (degrees) between the hand's little-finger side and the
    /// view direction that still counts as edge-on.
    pub high_quality_view_angle_deg: f32,
    /// The thumb is only tested against the index finger while its tip lies
    /// within this distance of the index finger, on the thumb side.
    pub thumb_near_distance: f32,
    /// Thumb and index segments whose directions have a larger absolute dot
    /// product are skipped.
    pub parallel_dot_cutoff: f32,
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self {
            default: PinchThresholds::default(),
            high_quality: PinchThresholds::high_quality(),
            high_quality_view_angle_deg: 40.0,
            thumb_near_distance: 0.04,
            parallel_dot_cutoff: 0.95,
        }
    }
}

impl PinchConfig {
    /// Uses the default thresholds in every condition.
    #[must_use]
    pub fn without_quality_mode() -> Self {
        let defaults = PinchThresholds::default();
        Self {
            high_quality: defaults,
            high_quality_view_angle_deg: 0.0,
            ..Default::default()
        }
    }

    /// Loads a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::Parse`] for malformed JSON and
    /// [`HandError::InvalidConfig`] if validation fails.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the default thresholds.
    #[must_use]
    pub fn default_thresholds(mut self, thresholds: PinchThresholds) -> Self {
        self.default = thresholds;
        self
    }

    /// Set the edge-on thresholds.
    #[must_use]
    pub fn high_quality_thresholds(mut self, thresholds: PinchThresholds) -> Self {
        self.high_quality = thresholds;
        self
    }

    /// Set the edge-on view angle in degrees.
    #[must_use]
    pub fn high_quality_view_angle_deg(mut self, degrees: f32) -> Self {
        self.high_quality_view_angle_deg = degrees;
        self
    }

    /// Set the thumb near-plane distance.
    #[must_use]
    pub fn thumb_near_distance(mut self, distance: f32) -> Self {
        self.thumb_near_distance = distance;
        self
    }

    /// Set the parallel-segment cutoff.
    #[must_use]
    pub fn parallel_dot_cutoff(mut self, cutoff: f32) -> Self {
        self.parallel_dot_cutoff = cutoff;
        self
    }

    /// Thresholds for a quality level.
    #[must_use]
    pub fn thresholds(&self, high_quality: bool) -> &PinchThresholds {
        if high_quality {
            &self.high_quality
        } else {
            &self.default
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::InvalidConfig`] if either threshold set is
    /// invalid or a field is outside its range.
    pub fn validate(&self) -> Result<()> {
        self.default.validate()?;
        self.high_quality.validate()?;

        if !(0.0..=180.0).contains(&self.high_quality_view_angle_deg) {
            return Err(HandError::invalid_config(
                "high_quality_view_angle_deg must be within [0, 180]",
            ));
        }
        if !self.thumb_near_distance.is_finite() || self.thumb_near_distance < 0.0 {
            return Err(HandError::invalid_config(
                "thumb_near_distance must be non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.parallel_dot_cutoff) {
            return Err(HandError::invalid_config(
                "parallel_dot_cutoff must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults() {
        let config = PinchConfig::default();
        assert_eq!(config.default, PinchThresholds::new(0.02, 0.10, 0.04));
        assert_eq!(config.high_quality, PinchThresholds::new(0.016, 0.10, 0.016));
        assert_eq!(config.high_quality_view_angle_deg, 40.0);
        assert_eq!(config.thumb_near_distance, 0.04);
        assert_eq!(config.parallel_dot_cutoff, 0.95);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn strength_ramp() {
        let t = PinchThresholds::default();
        assert_eq!(t.strength(0.0), 1.0);
        assert_eq!(t.strength(0.02), 1.0);
        assert_relative_eq!(t.strength(0.06), 0.5, epsilon = 1e-6);
        assert_eq!(t.strength(0.10), 0.0);
        assert_eq!(t.strength(0.5), 0.0);
        assert_eq!(t.strength(f32::INFINITY), 0.0);
        assert_eq!(t.strength(f32::NAN), 0.0);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let config = PinchConfig::default()
            .default_thresholds(PinchThresholds::new(0.1, 0.05, 0.01));
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());

        let config = PinchConfig::default()
            .high_quality_thresholds(PinchThresholds::new(0.1, 0.1, 0.01));
        assert!(config.validate().is_err());
    }

    #[test]
    fn thresholds_reject_non_finite_values() {
        assert!(PinchThresholds::default().validate().is_ok());
        let err = PinchThresholds::new(f32::INFINITY, 0.1, 0.01).validate().unwrap_err();
        assert!(err.is_config_error());
        assert!(PinchThresholds::new(0.02, f32::NAN, 0.01).validate().is_err());
        assert!(PinchThresholds::new(-0.02, 0.1, 0.01).validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(PinchConfig::default().parallel_dot_cutoff(1.5).validate().is_err());
        assert!(PinchConfig::default().high_quality_view_angle_deg(-1.0).validate().is_err());
        assert!(PinchConfig::default().thumb_near_distance(f32::NAN).validate().is_err());
        assert!(
            PinchConfig::default()
                .default_thresholds(PinchThresholds::new(0.02, 0.1, 0.0))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn json_roundtrip() {
        let config = PinchConfig::default().thumb_near_distance(0.03);
        let json = config.to_json().unwrap();
        assert_eq!(PinchConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn json_fills_missing_fields() {
        let config = PinchConfig::from_json(r#"{ "default": { "start": 0.03 } }"#).unwrap();
        assert_eq!(config.default.start, 0.03);
        assert_eq!(config.default.stop_max, 0.10);
        assert_eq!(config.high_quality, PinchThresholds::high_quality());
    }

    #[test]
    fn json_errors() {
        assert!(matches!(
            PinchConfig::from_json("{ not json"),
            Err(HandError::Parse(_))
        ));
        let err = PinchConfig::from_json(r#"{ "parallel_dot_cutoff": 2.0 }"#).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn without_quality_mode_uses_defaults() {
        let config = PinchConfig::without_quality_mode();
        assert_eq!(config.thresholds(true), config.thresholds(false));
        assert!(config.validate().is_ok());
    }
}
