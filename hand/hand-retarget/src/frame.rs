//! World-space hand frame in the current convention.

use glam::{Quat, Vec3};
use tracing::trace;

use hand_types::{
    Convention, HandError, HandJointId, HandSkeleton, HandSpace, Handedness, JointId, Pose,
    Result,
};

use crate::adapter::Retargeter;
use crate::reconstruct::{PoseSpace, reconstruct_from_poses, reconstruct_from_rotations};
use crate::source::{HandPoseSource, JointData};

const JOINTS: usize = HandJointId::COUNT;

/// World poses of all current-convention joints for one tracking frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    handedness: Handedness,
    joints: [Pose; JOINTS],
}

impl HandFrame {
    /// Builds a frame from a tracked hand.
    ///
    /// Legacy data is retargeted to the current convention first.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::InsufficientJoints`] if the source delivers fewer
    /// joints than its convention needs.
    pub fn from_source<S: HandPoseSource + ?Sized>(source: &S) -> Result<Self> {
        let handedness = source.handedness();
        let convention = source.convention();
        let root = source.root_pose();
        let scale = source.scale();
        let skeleton = HandSkeleton::default_for(Convention::Current, handedness);

        let world = match (convention, source.joint_data()) {
            (Convention::Current, JointData::LocalPoses(poses)) => {
                reconstruct_from_poses(skeleton, poses, &root, scale, PoseSpace::World)?
            }
            (Convention::Current, JointData::LocalRotations(rotations)) => {
                reconstruct_from_rotations(skeleton, rotations, &root, scale, PoseSpace::World)?
            }
            (Convention::Legacy, JointData::LocalRotations(rotations)) => {
                let retargeter = Retargeter::new(convention, Convention::Current, handedness);
                let mut converted = vec![Quat::IDENTITY; JOINTS];
                retargeter.convert_local_rotations(rotations, &mut converted)?;
                let root = retargeter.convert_root(&root);
                reconstruct_from_rotations(skeleton, &converted, &root, scale, PoseSpace::World)?
            }
            (Convention::Legacy, JointData::LocalPoses(poses)) => {
                let retargeter = Retargeter::new(convention, Convention::Current, handedness);
                let mut converted = vec![Pose::IDENTITY; JOINTS];
                retargeter.convert_local_poses(poses, scale, &mut converted)?;
                let root = retargeter.convert_root(&root);
                reconstruct_from_poses(skeleton, &converted, &root, 1.0, PoseSpace::World)?
            }
        };

        trace!(hand = %handedness, %convention, "hand frame reconstructed");
        Self::from_world_poses(handedness, &world)
    }

    /// Builds a frame from current-convention world poses.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::InsufficientJoints`] if `world` holds fewer than
    /// 26 poses.
    pub fn from_world_poses(handedness: Handedness, world: &[Pose]) -> Result<Self> {
        let Some(poses) = world.get(..JOINTS) else {
            return Err(HandError::insufficient_joints(JOINTS, world.len()));
        };
        let mut joints = [Pose::IDENTITY; JOINTS];
        joints.copy_from_slice(poses);
        Ok(Self { handedness, joints })
    }

    /// Which hand.
    #[must_use]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// All joint poses, indexed by [`HandJointId::index`].
    #[must_use]
    pub fn joints(&self) -> &[Pose; JOINTS] {
        &self.joints
    }

    /// World pose of `joint`.
    #[must_use]
    pub fn joint(&self, joint: HandJointId) -> &Pose {
        &self.joints[joint.index()]
    }

    /// World position of `joint`.
    #[must_use]
    pub fn position(&self, joint: HandJointId) -> Vec3 {
        self.joint(joint).position
    }

    /// World pose of the wrist.
    #[must_use]
    pub fn wrist(&self) -> &Pose {
        self.joint(HandJointId::Wrist)
    }

    /// Axis semantics of this hand's joint frames.
    #[must_use]
    pub fn space(&self) -> HandSpace {
        HandSpace::for_hand(Convention::Current, self.handedness)
    }

    /// Direction toward the thumb across the hand, in world space.
    #[must_use]
    pub fn thumb_side(&self) -> Vec3 {
        self.wrist().transform_direction(self.space().thumb_side)
    }

    /// Direction toward the little finger across the hand, in world space.
    #[must_use]
    pub fn pinky_side(&self) -> Vec3 {
        self.wrist().transform_direction(self.space().pinky_side())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::source::HandSample;
    use approx::assert_relative_eq;
    use hand_types::LegacyJointId;

    fn rest_rotations(convention: Convention, hand: Handedness) -> Vec<Quat> {
        HandSkeleton::default_for(convention, hand)
            .joints()
            .iter()
            .map(|j| j.local_pose.rotation)
            .collect()
    }

    #[test]
    fn current_poses_pass_through() {
        let hand = Handedness::Right;
        let root = Pose::new(Vec3::new(0.2, 1.0, -0.4), Quat::from_rotation_y(-0.5));
        let poses = HandSkeleton::default_for(Convention::Current, hand)
            .joints()
            .iter()
            .map(|j| j.local_pose)
            .collect();
        let frame =
            HandFrame::from_source(&HandSample::from_poses(hand, Convention::Current, root, poses))
                .unwrap();
        let expected = HandSkeleton::default_for(Convention::Current, hand).world_poses(&root);
        let tip = HandJointId::IndexTip;
        assert!((frame.position(tip) - expected[tip.index()].position).length() < 1e-6);
        assert_eq!(frame.wrist().position, root.position);
    }

    #[test]
    fn legacy_rest_lands_on_current_rest() {
        for hand in Handedness::BOTH {
            let root = Pose::new(Vec3::new(0.0, 1.1, -0.3), Quat::from_rotation_x(0.4));
            let sample = HandSample::from_rotations(
                hand,
                Convention::Legacy,
                root,
                rest_rotations(Convention::Legacy, hand),
            );
            let frame = HandFrame::from_source(&sample).unwrap();

            // The legacy tables placed in the world directly.
            let legacy_world =
                HandSkeleton::default_for(Convention::Legacy, hand).world_poses(&root);
            for (legacy, current) in [
                (LegacyJointId::IndexTip, HandJointId::IndexTip),
                (LegacyJointId::ThumbTip, HandJointId::ThumbTip),
                (LegacyJointId::Pinky1, HandJointId::LittleProximal),
            ] {
                let a = legacy_world[legacy.index()].position;
                let b = frame.position(current);
                assert!((a - b).length() < 1e-4, "{legacy:?}: {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn turned_wrist_root_moves_every_finger() {
        for hand in Handedness::BOTH {
            let mut rotations = rest_rotations(Convention::Legacy, hand);
            rotations[LegacyJointId::WristRoot.index()] = Quat::from_rotation_y(0.8);
            let skeleton = HandSkeleton::default_for(Convention::Legacy, hand);
            let posed = HandSkeleton::new(
                Convention::Legacy,
                skeleton
                    .joints()
                    .iter()
                    .zip(&rotations)
                    .map(|(j, q)| {
                        hand_types::Joint::new(j.parent, Pose::new(j.local_pose.position, *q))
                    })
                    .collect(),
            )
            .unwrap();
            let legacy_world = posed.world_poses(&Pose::IDENTITY);

            let sample =
                HandSample::from_rotations(hand, Convention::Legacy, Pose::IDENTITY, rotations);
            let frame = HandFrame::from_source(&sample).unwrap();

            for (legacy, current) in [
                (LegacyJointId::Index1, HandJointId::IndexProximal),
                (LegacyJointId::IndexTip, HandJointId::IndexTip),
                (LegacyJointId::Middle2, HandJointId::MiddleIntermediate),
                (LegacyJointId::RingTip, HandJointId::RingTip),
                (LegacyJointId::ThumbTip, HandJointId::ThumbTip),
            ] {
                let a = legacy_world[legacy.index()].position;
                let b = frame.position(current);
                assert!((a - b).length() < 1e-3, "{legacy:?}: {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn side_axes_follow_wrist() {
        let frame = HandFrame::from_world_poses(Handedness::Left, &[Pose::IDENTITY; 26]).unwrap();
        assert_eq!(frame.thumb_side(), Vec3::X);
        assert_eq!(frame.pinky_side(), Vec3::NEG_X);

        let turned = [Pose::from_rotation(Quat::from_rotation_y(std::f32::consts::PI)); 26];
        let frame = HandFrame::from_world_poses(Handedness::Left, &turned).unwrap();
        assert_relative_eq!(frame.thumb_side().x, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn short_sources_fail() {
        let sample = HandSample::from_rotations(
            Handedness::Left,
            Convention::Legacy,
            Pose::IDENTITY,
            vec![Quat::IDENTITY; 12],
        );
        assert!(HandFrame::from_source(&sample).unwrap_err().is_insufficient_joints());
        assert!(HandFrame::from_world_poses(Handedness::Left, &[Pose::IDENTITY; 25]).is_err());
    }

    #[test]
    fn scale_grows_the_hand() {
        let hand = Handedness::Left;
        let rotations = rest_rotations(Convention::Legacy, hand);
        let small = HandSample::from_rotations(hand, Convention::Legacy, Pose::IDENTITY, rotations);
        let large = small.clone().with_scale(1.5);
        let a = HandFrame::from_source(&small).unwrap();
        let b = HandFrame::from_source(&large).unwrap();
        let tip = HandJointId::MiddleTip;
        assert_relative_eq!(
            b.position(tip).length(),
            a.position(tip).length() * 1.5,
            epsilon = 1e-5
        );
    }
}
