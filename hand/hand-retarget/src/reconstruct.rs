//! Pose reconstruction from per-joint tracking data.

use glam::Quat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use hand_types::{HandError, HandSkeleton, Pose, Result};

use crate::thumb::accumulate_chain;

/// Frame in which reconstructed poses are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PoseSpace {
    /// World space: every pose composed onto the hand root pose.
    #[default]
    World,
    /// Relative to the hand root.
    Wrist,
    /// Relative to each joint's parent.
    Local,
}

fn check_len(skeleton: &HandSkeleton, actual: usize) -> Result<()> {
    if actual < skeleton.len() {
        warn!(
            convention = %skeleton.convention(),
            expected = skeleton.len(),
            actual,
            "joint data too short for skeleton"
        );
        return Err(HandError::insufficient_joints(skeleton.len(), actual));
    }
    Ok(())
}

fn compose_down(skeleton: &HandSkeleton, locals: &[Pose], root: &Pose) -> Vec<Pose> {
    let mut out: Vec<Pose> = Vec::with_capacity(skeleton.len());
    for (joint, local) in skeleton.joints().iter().zip(locals) {
        let parent = joint
            .parent
            .and_then(|p| out.get(p).copied())
            .unwrap_or(*root);
        out.push(parent.compose(local));
    }
    out
}

fn finish(skeleton: &HandSkeleton, locals: Vec<Pose>, root: &Pose, space: PoseSpace) -> Vec<Pose> {
    match space {
        PoseSpace::Local => locals,
        PoseSpace::Wrist => compose_down(skeleton, &locals, &Pose::IDENTITY),
        PoseSpace::World => compose_down(skeleton, &locals, root),
    }
}

/// Poses of every joint from local rotations alone.
///
/// Bone offsets come from the skeleton's rest positions multiplied by
/// `scale`. Joints are processed in index order so parents are always
/// resolved first.
///
/// # Errors
///
/// Returns [`HandError::InsufficientJoints`] if `rotations` is shorter than
/// the skeleton.
pub fn reconstruct_from_rotations(
    skeleton: &HandSkeleton,
    rotations: &[Quat],
    root: &Pose,
    scale: f32,
    space: PoseSpace,
) -> Result<Vec<Pose>> {
    check_len(skeleton, rotations.len())?;
    let locals = skeleton
        .joints()
        .iter()
        .zip(rotations)
        .map(|(joint, rotation)| Pose::new(joint.local_pose.position * scale, *rotation))
        .collect();
    Ok(finish(skeleton, locals, root, space))
}

/// Poses of every joint from full local poses.
///
/// Input translations are multiplied by `scale`.
///
/// # Errors
///
/// Returns [`HandError::InsufficientJoints`] if `poses` is shorter than the
/// skeleton.
pub fn reconstruct_from_poses(
    skeleton: &HandSkeleton,
    poses: &[Pose],
    root: &Pose,
    scale: f32,
    space: PoseSpace,
) -> Result<Vec<Pose>> {
    check_len(skeleton, poses.len())?;
    let locals = poses
        .iter()
        .take(skeleton.len())
        .map(|pose| pose.scaled(scale))
        .collect();
    Ok(finish(skeleton, locals, root, space))
}

/// Rotations relative to the hand root from local rotations.
///
/// Thumb joints go through [`accumulate_chain`]; the rest are composed
/// forward from their parent.
///
/// # Errors
///
/// Returns [`HandError::InsufficientJoints`] if `locals` is shorter than the
/// skeleton.
pub fn wrist_rotations_from_local(skeleton: &HandSkeleton, locals: &[Quat]) -> Result<Vec<Quat>> {
    check_len(skeleton, locals.len())?;
    let thumb = skeleton.convention().info().thumb_chain;

    let mut wrist: Vec<Quat> = Vec::with_capacity(skeleton.len());
    for (index, joint) in skeleton.joints().iter().enumerate() {
        let rotation = if thumb.contains(&index) {
            accumulate_chain(locals, skeleton, index)
        } else {
            match joint.parent.and_then(|p| wrist.get(p)) {
                Some(parent) => *parent * locals[index],
                None => locals[index],
            }
        };
        wrist.push(rotation);
    }
    Ok(wrist)
}

/// Local rotations from rotations relative to the hand root.
///
/// `local[j] = inverse(wrist[parent]) · wrist[j]`; root joints keep their
/// wrist-space rotation.
///
/// # Errors
///
/// Returns [`HandError::InsufficientJoints`] if `wrist` is shorter than the
/// skeleton.
pub fn local_rotations_from_wrist(skeleton: &HandSkeleton, wrist: &[Quat]) -> Result<Vec<Quat>> {
    check_len(skeleton, wrist.len())?;
    Ok(skeleton
        .joints()
        .iter()
        .zip(wrist)
        .map(|(joint, rotation)| match joint.parent.and_then(|p| wrist.get(p)) {
            Some(parent) => (parent.inverse() * *rotation).normalize(),
            None => *rotation,
        })
        .collect())
}
