//! Interfaces to the tracking runtime.

use glam::{Quat, Vec3};

use hand_types::{Convention, Handedness, Pose};

/// Per-joint data as delivered by a tracking runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointData<'a> {
    /// Local rotations only; bone offsets come from the rest skeleton.
    LocalRotations(&'a [Quat]),
    /// Full local poses.
    LocalPoses(&'a [Pose]),
}

impl JointData<'_> {
    /// Number of joints delivered.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::LocalRotations(r) => r.len(),
            Self::LocalPoses(p) => p.len(),
        }
    }

    /// True if no joints were delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A tracked hand, sampled once per frame.
pub trait HandPoseSource {
    /// Which hand this is.
    fn handedness(&self) -> Handedness;

    /// Joint convention of [`Self::joint_data`].
    fn convention(&self) -> Convention;

    /// Uniform hand scale; `1.0` for the rest-pose hand size.
    fn scale(&self) -> f32;

    /// Pose of the hand root in world space.
    fn root_pose(&self) -> Pose;

    /// Per-joint data for this frame.
    fn joint_data(&self) -> JointData<'_>;
}

/// Head (viewer) pose used to pick detection thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPose {
    /// Head position in world space.
    pub position: Vec3,
    /// Unit view direction in world space.
    pub forward: Vec3,
}

impl HeadPose {
    /// Creates a head pose; `forward` is normalized.
    #[must_use]
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.normalize_or_zero(),
        }
    }

    /// Head pose from a world pose looking down its local `-Z`.
    #[must_use]
    pub fn from_pose(pose: &Pose) -> Self {
        Self::new(pose.position, pose.transform_direction(Vec3::NEG_Z))
    }
}

/// Provides the head pose, if tracked.
pub trait HeadPoseSource {
    /// Current head pose; `None` when not tracked.
    fn head_pose(&self) -> Option<HeadPose>;
}

impl HeadPoseSource for HeadPose {
    fn head_pose(&self) -> Option<HeadPose> {
        Some(*self)
    }
}

impl HeadPoseSource for Option<HeadPose> {
    fn head_pose(&self) -> Option<HeadPose> {
        *self
    }
}

/// Owned per-joint data.
#[derive(Debug, Clone, PartialEq)]
pub enum JointBuffer {
    /// Local rotations only.
    LocalRotations(Vec<Quat>),
    /// Full local poses.
    LocalPoses(Vec<Pose>),
}

/// A captured hand sample that can be replayed as a [`HandPoseSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct HandSample {
    /// Which hand.
    pub handedness: Handedness,
    /// Joint convention of `joints`.
    pub convention: Convention,
    /// Uniform hand scale.
    pub scale: f32,
    /// Hand root pose in world space.
    pub root: Pose,
    /// Per-joint data.
    pub joints: JointBuffer,
}

impl HandSample {
    /// A sample holding local rotations.
    #[must_use]
    pub fn from_rotations(
        handedness: Handedness,
        convention: Convention,
        root: Pose,
        rotations: Vec<Quat>,
    ) -> Self {
        Self {
            handedness,
            convention,
            scale: 1.0,
            root,
            joints: JointBuffer::LocalRotations(rotations),
        }
    }

    /// A sample holding full local poses.
    #[must_use]
    pub fn from_poses(
        handedness: Handedness,
        convention: Convention,
        root: Pose,
        poses: Vec<Pose>,
    ) -> Self {
        Self {
            handedness,
            convention,
            scale: 1.0,
            root,
            joints: JointBuffer::LocalPoses(poses),
        }
    }

    /// Sets the hand scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl HandPoseSource for HandSample {
    fn handedness(&self) -> Handedness {
        self.handedness
    }

    fn convention(&self) -> Convention {
        self.convention
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn root_pose(&self) -> Pose {
        self.root
    }

    fn joint_data(&self) -> JointData<'_> {
        match &self.joints {
            JointBuffer::LocalRotations(r) => JointData::LocalRotations(r),
            JointBuffer::LocalPoses(p) => JointData::LocalPoses(p),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn head_forward_is_normalized() {
        let head = HeadPose::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0));
        assert_relative_eq!(head.forward.length(), 1.0);
    }

    #[test]
    fn head_from_pose_looks_down_neg_z() {
        let pose = Pose::from_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let head = HeadPose::from_pose(&pose);
        assert_relative_eq!(head.forward.x, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn optional_head_source() {
        let none: Option<HeadPose> = None;
        assert!(none.head_pose().is_none());
        let head = HeadPose::new(Vec3::Y, Vec3::NEG_Z);
        assert_eq!(Some(head).head_pose(), Some(head));
        assert_eq!(head.head_pose(), Some(head));
    }

    #[test]
    fn sample_exposes_its_data() {
        let sample = HandSample::from_rotations(
            Handedness::Left,
            Convention::Legacy,
            Pose::IDENTITY,
            vec![Quat::IDENTITY; 24],
        )
        .with_scale(1.1);
        assert_eq!(sample.joint_data().len(), 24);
        assert!(matches!(sample.joint_data(), JointData::LocalRotations(_)));
        assert_eq!(HandPoseSource::scale(&sample), 1.1);
    }
}
