//! Per-finger pinch state.

use glam::Vec3;
use tracing::debug;

use hand_types::HandFinger;

use crate::config::PinchThresholds;

/// Pinch state of one finger.
///
/// A finger is either released or pinching. It enters the pinch below
/// [`PinchThresholds::start`] and leaves it above
/// [`PinchThresholds::stop_max`], or once it opens
/// [`PinchThresholds::stop_offset`] past the closest distance reached during
/// the pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerPinchData {
    finger: HandFinger,
    pinching: bool,
    changed: bool,
    strength: f32,
    distance: f32,
    min_distance: f32,
    tip_position: Vec3,
}

impl FingerPinchData {
    /// Released state for `finger`.
    #[must_use]
    pub const fn new(finger: HandFinger) -> Self {
        Self {
            finger,
            pinching: false,
            changed: false,
            strength: 0.0,
            distance: f32::INFINITY,
            min_distance: f32::INFINITY,
            tip_position: Vec3::ZERO,
        }
    }

    /// Which finger.
    #[must_use]
    pub fn finger(&self) -> HandFinger {
        self.finger
    }

    /// True while pinching.
    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinching
    }

    /// True if the last update started or ended a pinch.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Pinch strength in `[0, 1]` from the last update.
    #[must_use]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Distance measured in the last update; `+∞` when not measurable.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Closest distance reached during the current pinch; `+∞` while
    /// released.
    #[must_use]
    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// World position of the fingertip from the last update.
    #[must_use]
    pub fn tip_position(&self) -> Vec3 {
        self.tip_position
    }

    /// Clears the change flag and records the fingertip for a new frame.
    pub fn begin_frame(&mut self, tip_position: Vec3) {
        self.changed = false;
        self.tip_position = tip_position;
    }

    /// Feeds one distance sample. Returns true if this sample started or
    /// ended a pinch.
    pub fn update(&mut self, distance: f32, thresholds: &PinchThresholds) -> bool {
        self.distance = distance;
        let mut transitioned = false;

        if self.pinching {
            self.min_distance = self.min_distance.min(distance);
            if distance > thresholds.stop_max
                || distance > self.min_distance + thresholds.stop_offset
            {
                debug!(
                    finger = %self.finger,
                    distance,
                    min_distance = self.min_distance,
                    "pinch released"
                );
                self.pinching = false;
                self.min_distance = f32::INFINITY;
                transitioned = true;
            }
        } else if distance < thresholds.start {
            debug!(finger = %self.finger, distance, "pinch started");
            self.pinching = true;
            self.min_distance = distance;
            transitioned = true;
        }

        self.changed |= transitioned;
        self.strength = thresholds.strength(distance);
        transitioned
    }

    /// Returns to the released state, keeping the finger and tip position.
    pub fn reset(&mut self) {
        *self = Self {
            tip_position: self.tip_position,
            ..Self::new(self.finger)
        };
    }
}
