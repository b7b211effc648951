//! Rigid joint poses.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A rigid pose (rotation + translation) of a joint or of the hand root.
///
/// A pose maps points from its local frame into the frame it is expressed
/// in: `world = rotation * local + position`.
///
/// # Example
///
/// ```
/// use hand_types::Pose;
/// use glam::{Quat, Vec3};
///
/// let wrist = Pose::from_position(Vec3::new(0.0, 1.2, 0.0));
/// let knuckle = Pose::from_position(Vec3::new(0.0, 0.0, -0.08));
///
/// let world = wrist.compose(&knuckle);
/// assert!((world.position - Vec3::new(0.0, 1.2, -0.08)).length() < 1e-6);
/// assert_eq!(world.rotation, Quat::IDENTITY);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Translation component, in meters.
    #[serde(with = "vec3_serde")]
    pub position: Vec3,

    /// Rotation component (unit quaternion).
    #[serde(with = "quat_serde")]
    pub rotation: Quat,
}

pub(crate) mod quat_serde {
    use glam::Quat;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct QuatData {
        x: f32,
        y: f32,
        z: f32,
        w: f32,
    }

    pub fn serialize<S: Serializer>(q: &Quat, s: S) -> std::result::Result<S::Ok, S::Error> {
        QuatData {
            x: q.x,
            y: q.y,
            z: q.z,
            w: q.w,
        }
        .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Quat, D::Error> {
        let data = QuatData::deserialize(d)?;
        Ok(Quat::from_xyzw(data.x, data.y, data.z, data.w))
    }
}

pub(crate) mod vec3_serde {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Vec3Data {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S: Serializer>(v: &Vec3, s: S) -> std::result::Result<S::Ok, S::Error> {
        Vec3Data {
            x: v.x,
            y: v.y,
            z: v.z,
        }
        .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec3, D::Error> {
        let data = Vec3Data::deserialize(d)?;
        Ok(Vec3::new(data.x, data.y, data.z))
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// The identity pose.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Creates a pose from a position and rotation.
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Creates a pose with only translation.
    #[must_use]
    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Creates a pose with only rotation.
    #[must_use]
    pub const fn from_rotation(rotation: Quat) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation,
        }
    }

    /// Builds a pose from raw `[x, y, z]` and `[x, y, z, w]` arrays.
    ///
    /// Used by the static rest-pose tables.
    #[must_use]
    pub const fn from_arrays(position: [f32; 3], rotation: [f32; 4]) -> Self {
        Self {
            position: Vec3::new(position[0], position[1], position[2]),
            rotation: Quat::from_xyzw(rotation[0], rotation[1], rotation[2], rotation[3]),
        }
    }

    /// Applies the pose to a point.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.position
    }

    /// Applies only the rotation to a direction.
    #[must_use]
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation * direction
    }

    /// Maps a point expressed in the outer frame into this pose's local frame.
    #[must_use]
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.position)
    }

    /// Returns the inverse pose.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            position: inv_rotation * (-self.position),
            rotation: inv_rotation,
        }
    }

    /// Composes this pose with a child pose (`self ∘ child`).
    ///
    /// The result applies `child` first, then `self`.
    #[must_use]
    pub fn compose(&self, child: &Self) -> Self {
        Self {
            position: self.rotation * child.position + self.position,
            rotation: self.rotation * child.rotation,
        }
    }

    /// Expresses `other` relative to this pose (`self⁻¹ ∘ other`).
    #[must_use]
    pub fn relative(&self, other: &Self) -> Self {
        self.inverse().compose(other)
    }

    /// Returns a copy with the translation multiplied by `scale`.
    #[must_use]
    pub fn scaled(&self, scale: f32) -> Self {
        Self {
            position: self.position * scale,
            rotation: self.rotation,
        }
    }

    /// Returns true if this is approximately the identity pose.
    #[must_use]
    pub fn is_identity(&self, epsilon: f32) -> bool {
        self.position.length() < epsilon && self.rotation.abs_diff_eq(Quat::IDENTITY, epsilon)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn default_is_identity() {
        assert!(Pose::default().is_identity(1e-6));
    }

    #[test]
    fn rotation_then_translation() {
        let pose = Pose::new(Vec3::new(1.0, 0.0, 0.0), Quat::from_rotation_z(FRAC_PI_2));
        let world = pose.transform_point(Vec3::X);

        assert_relative_eq!(world.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(world.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn direction_ignores_translation() {
        let pose = Pose::from_position(Vec3::new(100.0, 0.0, 0.0));
        let dir = pose.transform_direction(Vec3::Y);
        assert!((dir - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn inverse_composes_to_identity() {
        let pose = Pose::new(Vec3::new(0.1, -0.2, 0.3), Quat::from_rotation_y(0.7));
        assert!(pose.compose(&pose.inverse()).is_identity(1e-5));
        assert!(pose.inverse().compose(&pose).is_identity(1e-5));
    }

    #[test]
    fn relative_recovers_child() {
        let parent = Pose::new(Vec3::new(0.0, 1.0, 0.0), Quat::from_rotation_x(0.4));
        let child = Pose::new(Vec3::new(0.0, 0.0, -0.05), Quat::from_rotation_z(-0.2));
        let world = parent.compose(&child);
        let back = parent.relative(&world);

        assert!((back.position - child.position).length() < 1e-6);
        assert!(back.rotation.dot(child.rotation).abs() > 1.0 - 1e-6);
    }

    #[test]
    fn inverse_transform_point_roundtrip() {
        let pose = Pose::new(Vec3::new(0.3, 0.2, 0.1), Quat::from_rotation_y(1.1));
        let p = Vec3::new(-0.4, 0.5, 0.9);
        let local = pose.inverse_transform_point(pose.transform_point(p));
        assert!((local - p).length() < 1e-5);
    }

    #[test]
    fn scaled_only_touches_translation() {
        let pose = Pose::new(Vec3::new(0.1, 0.2, 0.3), Quat::from_rotation_x(0.3));
        let scaled = pose.scaled(2.0);
        assert_relative_eq!(scaled.position.z, 0.6, epsilon = 1e-6);
        assert_eq!(scaled.rotation, pose.rotation);
    }

    #[test]
    fn serialization_uses_named_fields() {
        let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
        let json = serde_json::to_string(&pose).unwrap();
        assert!(json.contains("\"w\":1.0"));

        let parsed: Pose = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pose);
    }
}
