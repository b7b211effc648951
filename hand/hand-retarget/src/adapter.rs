//! Joint-id and orientation translation between conventions.

use glam::{Quat, Vec3};
use tracing::warn;

use hand_types::{
    Convention, HandError, HandJointId, HandSkeleton, HandSpace, Handedness, JointId,
    LegacyJointId, Pose, Result,
};

use crate::reconstruct::{local_rotations_from_wrist, wrist_rotations_from_local};

/// Legacy index of each current-convention joint; `-1` where none exists.
pub const CURRENT_TO_LEGACY: [i8; 26] = [
    -1, 0, 3, 4, 5, 19, -1, 6, 7, 8, 20, -1, 9, 10, 11, 21, -1, 12, 13, 14, 22, 15, 16, 17, 18, 23,
];

/// Current-convention index of each legacy joint; `-1` where none exists.
pub const LEGACY_TO_CURRENT: [i8; 24] = [
    1, -1, -1, 2, 3, 4, 7, 8, 9, 12, 13, 14, 17, 18, 19, 21, 22, 23, 24, 5, 10, 15, 20, 25,
];

/// Index in the other convention of joint `index` of `source`.
///
/// Returns `None` for joints without a counterpart and for out-of-range
/// indices.
#[must_use]
pub fn translate_joint_id(source: Convention, index: usize) -> Option<usize> {
    let table: &[i8] = match source {
        Convention::Legacy => &LEGACY_TO_CURRENT,
        Convention::Current => &CURRENT_TO_LEGACY,
    };
    table
        .get(index)
        .and_then(|&mapped| usize::try_from(mapped).ok())
}

/// Current-convention counterpart of a legacy joint.
#[must_use]
pub fn to_current(joint: LegacyJointId) -> Option<HandJointId> {
    translate_joint_id(Convention::Legacy, joint.index()).and_then(HandJointId::from_index)
}

/// Legacy counterpart of a current-convention joint.
#[must_use]
pub fn to_legacy(joint: HandJointId) -> Option<LegacyJointId> {
    translate_joint_id(Convention::Current, joint.index()).and_then(LegacyJointId::from_index)
}

/// Rotation `C` relating two axis conventions of the same hand.
///
/// `C = M_source · M_targetᵀ`, with each `M` holding the axis triple as
/// columns. A joint orientation `q` under `source` axes becomes `q · C`
/// under `target` axes.
#[must_use]
pub fn change_of_basis(source: &HandSpace, target: &HandSpace) -> Quat {
    Quat::from_mat3(&(source.basis() * target.basis().transpose())).normalize()
}

/// Re-bases a joint orientation from `source` axes to `target` axes.
///
/// The result points the target's distal, dorsal and thumb-side axes where
/// `rotation` pointed the source's.
#[must_use]
pub fn translate_rotation(rotation: Quat, source: &HandSpace, target: &HandSpace) -> Quat {
    (rotation * change_of_basis(source, target)).normalize()
}

/// Re-bases a rotation expressed relative to another joint of the same hand.
#[must_use]
pub fn translate_local_rotation(rotation: Quat, source: &HandSpace, target: &HandSpace) -> Quat {
    let basis = change_of_basis(source, target);
    (basis.inverse() * rotation * basis).normalize()
}

/// Re-bases an offset expressed in another joint's frame of the same hand.
#[must_use]
pub fn translate_local_position(position: Vec3, source: &HandSpace, target: &HandSpace) -> Vec3 {
    change_of_basis(source, target).inverse() * position
}

/// Converts hand data from one convention to another for a given hand.
///
/// Chosen once when the source and target conventions are known, then
/// reused every frame.
///
/// # Example
///
/// ```
/// use hand_retarget::Retargeter;
/// use hand_types::{Convention, Handedness, Quat};
///
/// let retargeter = Retargeter::new(Convention::Legacy, Convention::Current, Handedness::Left);
/// let legacy = vec![Quat::IDENTITY; 24];
/// let mut current = vec![Quat::IDENTITY; 26];
/// assert!(retargeter.convert_local_rotations(&legacy, &mut current).is_ok());
///
/// // Too short: nothing is written.
/// let mut untouched = vec![Quat::IDENTITY; 26];
/// assert!(retargeter.convert_local_rotations(&legacy[..10], &mut untouched).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Retargeter {
    source: Convention,
    target: Convention,
    handedness: Handedness,
    basis: Quat,
}

impl Retargeter {
    /// Creates a retargeter from `source` to `target` for one hand.
    #[must_use]
    pub fn new(source: Convention, target: Convention, handedness: Handedness) -> Self {
        let basis = change_of_basis(
            &HandSpace::for_hand(source, handedness),
            &HandSpace::for_hand(target, handedness),
        );
        Self {
            source,
            target,
            handedness,
            basis,
        }
    }

    /// Source convention.
    #[must_use]
    pub fn source(&self) -> Convention {
        self.source
    }

    /// Target convention.
    #[must_use]
    pub fn target(&self) -> Convention {
        self.target
    }

    /// Hand this retargeter was built for.
    #[must_use]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// The change-of-basis rotation between the two axis conventions.
    #[must_use]
    pub fn basis(&self) -> Quat {
        self.basis
    }

    /// Source joint feeding target joint `target_index`.
    #[must_use]
    pub fn source_joint(&self, target_index: usize) -> Option<usize> {
        if self.source == self.target {
            (target_index < self.target.joint_count()).then_some(target_index)
        } else {
            translate_joint_id(self.target, target_index)
        }
    }

    /// Re-bases the hand root pose.
    #[must_use]
    pub fn convert_root(&self, root: &Pose) -> Pose {
        Pose::new(root.position, (root.rotation * self.basis).normalize())
    }

    fn check_lengths(&self, src: usize, dst: usize) -> Result<()> {
        let needed_src = self.source.joint_count();
        if src < needed_src {
            warn!(
                source = %self.source,
                expected = needed_src,
                actual = src,
                "retarget source too short"
            );
            return Err(HandError::insufficient_joints(needed_src, src));
        }
        let needed_dst = self.target.joint_count();
        if dst < needed_dst {
            warn!(
                target = %self.target,
                expected = needed_dst,
                actual = dst,
                "retarget destination too short"
            );
            return Err(HandError::insufficient_joints(needed_dst, dst));
        }
        Ok(())
    }

    /// Completes wrist-relative target rotations for joints with no source.
    ///
    /// Joints are visited in index order, so a parent is always resolved
    /// before its children.
    fn fill_unmapped(&self, skeleton: &HandSkeleton, mapped: &[Option<Quat>]) -> Vec<Quat> {
        let rest = skeleton.world_poses(&Pose::IDENTITY);
        let root = self.target.info().root_index;
        let anchor = mapped
            .get(root)
            .copied()
            .flatten()
            .zip(rest.get(root))
            .map(|(wrist, rest_wrist)| wrist * rest_wrist.rotation.inverse());

        let mut wrist: Vec<Quat> = Vec::with_capacity(skeleton.len());
        for ((joint, slot), rest_pose) in skeleton.joints().iter().zip(mapped).zip(&rest) {
            let rotation = match (*slot, joint.parent.and_then(|p| wrist.get(p))) {
                (Some(rotation), _) => rotation,
                (None, Some(parent)) => (*parent * joint.local_pose.rotation).normalize(),
                (None, None) => match anchor {
                    Some(anchor) => (anchor * rest_pose.rotation).normalize(),
                    None => rest_pose.rotation,
                },
            };
            wrist.push(rotation);
        }
        wrist
    }

    /// Converts per-joint local rotations from the source to the target
    /// convention.
    ///
    /// Target joints without a source counterpart keep their rest rotation
    /// relative to their parent, so they follow a rotated wrist. Unmapped
    /// root joints keep their rest offset from the convention's wrist joint.
    /// `dst` is only written once the whole conversion succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::InsufficientJoints`] if `src` or `dst` is shorter
    /// than its convention's joint count.
    pub fn convert_local_rotations(&self, src: &[Quat], dst: &mut [Quat]) -> Result<()> {
        self.check_lengths(src.len(), dst.len())?;

        let source_skeleton = HandSkeleton::default_for(self.source, self.handedness);
        let target_skeleton = HandSkeleton::default_for(self.target, self.handedness);

        let source_wrist = wrist_rotations_from_local(source_skeleton, src)?;
        let mapped: Vec<Option<Quat>> = (0..target_skeleton.len())
            .map(|t| {
                self.source_joint(t)
                    .and_then(|s| source_wrist.get(s))
                    .map(|q| (self.basis.inverse() * *q * self.basis).normalize())
            })
            .collect();

        let target_wrist = self.fill_unmapped(target_skeleton, &mapped);
        let locals = local_rotations_from_wrist(target_skeleton, &target_wrist)?;
        dst[..locals.len()].copy_from_slice(&locals);
        Ok(())
    }

    /// Converts per-joint local poses from the source to the target
    /// convention.
    ///
    /// Rotations follow [`Self::convert_local_rotations`]. Positions come from
    /// the target rest skeleton scaled by `scale`, since bone offsets are not
    /// comparable across hierarchies.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::InsufficientJoints`] if `src` or `dst` is shorter
    /// than its convention's joint count.
    pub fn convert_local_poses(&self, src: &[Pose], scale: f32, dst: &mut [Pose]) -> Result<()> {
        self.check_lengths(src.len(), dst.len())?;

        let target_skeleton = HandSkeleton::default_for(self.target, self.handedness);
        let rotations: Vec<Quat> = src.iter().map(|pose| pose.rotation).collect();
        let mut locals = vec![Quat::IDENTITY; target_skeleton.len()];
        self.convert_local_rotations(&rotations, &mut locals)?;

        for ((slot, joint), rotation) in dst.iter_mut().zip(target_skeleton.joints()).zip(locals) {
            *slot = Pose::new(joint.local_pose.position * scale, rotation);
        }
        Ok(())
    }
}
