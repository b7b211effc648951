//! Thumb chain accumulation.
//!
//! The thumb bases of the two conventions do not line up one to one: the
//! legacy trapezium and first thumb joint together span what the current
//! layout models as a single metacarpal. Thumb joints are therefore carried
//! across conventions as cumulative rotations relative to the hand root
//! rather than as individual local rotations.

use glam::Quat;

use hand_types::HandSkeleton;

/// Rotation of `joint` relative to the hand root.
///
/// Walks from `joint` toward the root, applying each parent rotation on the
/// left of the accumulator, and normalizes once at the end. Indices missing
/// from `locals` end the walk.
#[must_use]
pub fn accumulate_chain(locals: &[Quat], skeleton: &HandSkeleton, joint: usize) -> Quat {
    accumulate_until(locals, skeleton, joint, None)
}

/// Rotation of `joint` relative to `ancestor`.
///
/// Same walk as [`accumulate_chain`] but stops before `ancestor`. With
/// `ancestor = None`, or an ancestor not on the path, accumulates up to the
/// hand root.
///
/// ```
/// use hand_retarget::thumb::accumulate_until;
/// use hand_types::{Convention, HandSkeleton, Handedness, JointId, LegacyJointId, Quat};
///
/// let skeleton = HandSkeleton::default_for(Convention::Legacy, Handedness::Left);
/// let mut locals = vec![Quat::IDENTITY; skeleton.len()];
/// locals[LegacyJointId::Thumb0.index()] = Quat::from_rotation_y(0.5);
/// locals[LegacyJointId::Thumb1.index()] = Quat::from_rotation_y(0.25);
///
/// // Trapezium and first thumb joint collapse into one base rotation.
/// let base = accumulate_until(
///     &locals,
///     skeleton,
///     LegacyJointId::Thumb1.index(),
///     Some(LegacyJointId::WristRoot.index()),
/// );
/// assert!(base.dot(Quat::from_rotation_y(0.75)).abs() > 0.9999);
/// ```
#[must_use]
pub fn accumulate_until(
    locals: &[Quat],
    skeleton: &HandSkeleton,
    joint: usize,
    ancestor: Option<usize>,
) -> Quat {
    let mut accumulated = Quat::IDENTITY;
    let mut current = Some(joint);
    let mut steps = 0;
    while let Some(index) = current {
        if Some(index) == ancestor || steps > skeleton.len() {
            break;
        }
        let Some(local) = locals.get(index) else {
            break;
        };
        accumulated = *local * accumulated;
        current = skeleton.parent_index(index);
        steps += 1;
    }
    accumulated.normalize()
}

/// Root-relative rotations of every joint in the convention's thumb chain.
///
/// Pairs are `(joint index, rotation)` from the root-most thumb joint to the
/// tip.
#[must_use]
pub fn thumb_chain_rotations(locals: &[Quat], skeleton: &HandSkeleton) -> Vec<(usize, Quat)> {
    skeleton
        .convention()
        .info()
        .thumb_chain
        .iter()
        .map(|&joint| (joint, accumulate_chain(locals, skeleton, joint)))
        .collect()
}
