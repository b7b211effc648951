//! Handedness and per-convention joint axis definitions.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{HandError, Result};
use crate::joint::Convention;
use crate::pose::vec3_serde;

/// Which hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    /// Left hand.
    Left,
    /// Right hand.
    Right,
}

impl Handedness {
    /// Both hands, left first.
    pub const BOTH: [Self; 2] = [Self::Left, Self::Right];

    /// The opposite hand.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for Handedness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The meaning of a joint's local axes in a given convention.
///
/// Every joint frame of a hand shares the same axis semantics: `distal`
/// points along the bone toward the fingertip, `dorsal` out of the back of
/// the hand, and `thumb_side` across the hand toward the thumb. The triple
/// is mirrored between hands, so left and right carry opposite chirality.
///
/// # Example
///
/// ```
/// use hand_types::{Convention, HandSpace, Handedness};
/// use glam::Vec3;
///
/// let space = HandSpace::for_hand(Convention::Current, Handedness::Left);
/// assert_eq!(space.distal, Vec3::NEG_Z);
/// assert_eq!(space.pinky_side(), Vec3::NEG_X);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandSpace {
    /// Local direction toward the fingertip.
    #[serde(with = "vec3_serde")]
    pub distal: Vec3,
    /// Local direction out of the back of the hand.
    #[serde(with = "vec3_serde")]
    pub dorsal: Vec3,
    /// Local direction toward the thumb.
    #[serde(with = "vec3_serde")]
    pub thumb_side: Vec3,
}

impl HandSpace {
    /// Legacy convention, left hand.
    pub const LEGACY_LEFT: Self = Self::new(Vec3::X, Vec3::NEG_Y, Vec3::NEG_Z);
    /// Legacy convention, right hand.
    pub const LEGACY_RIGHT: Self = Self::new(Vec3::NEG_X, Vec3::Y, Vec3::Z);
    /// Current convention, left hand.
    pub const CURRENT_LEFT: Self = Self::new(Vec3::NEG_Z, Vec3::Y, Vec3::X);
    /// Current convention, right hand.
    pub const CURRENT_RIGHT: Self = Self::new(Vec3::NEG_Z, Vec3::Y, Vec3::NEG_X);

    /// Creates an axis triple.
    #[must_use]
    pub const fn new(distal: Vec3, dorsal: Vec3, thumb_side: Vec3) -> Self {
        Self {
            distal,
            dorsal,
            thumb_side,
        }
    }

    /// Axis triple of `convention` for `handedness`.
    #[must_use]
    pub const fn for_hand(convention: Convention, handedness: Handedness) -> Self {
        match (convention, handedness) {
            (Convention::Legacy, Handedness::Left) => Self::LEGACY_LEFT,
            (Convention::Legacy, Handedness::Right) => Self::LEGACY_RIGHT,
            (Convention::Current, Handedness::Left) => Self::CURRENT_LEFT,
            (Convention::Current, Handedness::Right) => Self::CURRENT_RIGHT,
        }
    }

    /// Local direction toward the little finger.
    #[must_use]
    pub fn pinky_side(&self) -> Vec3 {
        -self.thumb_side
    }

    /// Local direction out of the palm.
    #[must_use]
    pub fn palmar(&self) -> Vec3 {
        -self.dorsal
    }

    /// Basis matrix with `(distal, dorsal, thumb_side)` as columns.
    #[must_use]
    pub fn basis(&self) -> Mat3 {
        Mat3::from_cols(self.distal, self.dorsal, self.thumb_side)
    }

    /// Sign of the triple's chirality (`+1` or `-1`).
    #[must_use]
    pub fn chirality(&self) -> f32 {
        self.basis().determinant().signum()
    }

    /// Check that the axes are orthogonal unit vectors.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::InvalidHandSpace`] if an axis is not unit length
    /// or two axes are not orthogonal.
    pub fn validate(&self) -> Result<()> {
        const EPS: f32 = 1e-4;
        for (name, axis) in [
            ("distal", self.distal),
            ("dorsal", self.dorsal),
            ("thumb_side", self.thumb_side),
        ] {
            if (axis.length() - 1.0).abs() > EPS {
                return Err(HandError::invalid_hand_space(format!(
                    "{name} axis is not unit length"
                )));
            }
        }
        if self.distal.dot(self.dorsal).abs() > EPS
            || self.distal.dot(self.thumb_side).abs() > EPS
            || self.dorsal.dot(self.thumb_side).abs() > EPS
        {
            return Err(HandError::invalid_hand_space("axes are not orthogonal"));
        }
        Ok(())
    }
}
