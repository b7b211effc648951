//! Indexed joint hierarchies with canonical rest poses.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HandError, Result};
use crate::joint::{Convention, HandFinger, JointId};
use crate::pose::Pose;
use crate::space::Handedness;
use crate::tables::{
    CURRENT_LEFT_REST, CURRENT_PARENTS, CURRENT_RIGHT_REST, LEGACY_LEFT_REST, LEGACY_PARENTS,
    LEGACY_RIGHT_REST, joint_tables,
};

/// One entry of a skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    /// Index of the parent joint; `None` for a hierarchy root.
    pub parent: Option<usize>,
    /// Pose relative to the parent, or to the hand root for root joints.
    pub local_pose: Pose,
}

impl Joint {
    /// Creates a joint.
    #[must_use]
    pub const fn new(parent: Option<usize>, local_pose: Pose) -> Self {
        Self { parent, local_pose }
    }
}

/// A node of a live transform hierarchy that can seed a [`HandSkeleton`].
pub trait LiveJoint {
    /// Identity used to match a node against another node's parent.
    type Key: PartialEq;

    /// This node's identity.
    fn key(&self) -> Self::Key;

    /// Identity of this node's hierarchy parent, if any.
    fn parent_key(&self) -> Option<Self::Key>;

    /// Pose relative to the hierarchy parent.
    fn local_pose(&self) -> Pose;
}

/// A fixed-length hand joint hierarchy.
///
/// Joint `i` only ever references a parent with a smaller index, so a single
/// pass in index order visits every parent before its children.
///
/// # Example
///
/// ```
/// use hand_types::{Convention, HandJointId, HandSkeleton, Handedness};
///
/// let skeleton = HandSkeleton::default_for(Convention::Current, Handedness::Left);
/// assert_eq!(skeleton.len(), 26);
/// assert_eq!(
///     skeleton.parent_of(HandJointId::IndexTip),
///     Some(HandJointId::IndexDistal)
/// );
/// assert!(skeleton.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SkeletonData")]
pub struct HandSkeleton {
    convention: Convention,
    joints: Vec<Joint>,
    #[serde(skip)]
    children: Vec<Vec<usize>>,
}

/// Serialized form; child lists are rebuilt on load.
#[derive(Deserialize)]
struct SkeletonData {
    convention: Convention,
    joints: Vec<Joint>,
}

impl From<SkeletonData> for HandSkeleton {
    fn from(data: SkeletonData) -> Self {
        Self::assemble(data.convention, data.joints)
    }
}

impl HandSkeleton {
    /// Shared rest-pose skeleton for a convention and hand.
    #[must_use]
    pub fn default_for(convention: Convention, handedness: Handedness) -> &'static Self {
        static LEGACY_LEFT: OnceLock<HandSkeleton> = OnceLock::new();
        static LEGACY_RIGHT: OnceLock<HandSkeleton> = OnceLock::new();
        static CURRENT_LEFT: OnceLock<HandSkeleton> = OnceLock::new();
        static CURRENT_RIGHT: OnceLock<HandSkeleton> = OnceLock::new();

        match (convention, handedness) {
            (Convention::Legacy, Handedness::Left) => LEGACY_LEFT
                .get_or_init(|| Self::from_table(convention, &LEGACY_PARENTS, &LEGACY_LEFT_REST)),
            (Convention::Legacy, Handedness::Right) => LEGACY_RIGHT
                .get_or_init(|| Self::from_table(convention, &LEGACY_PARENTS, &LEGACY_RIGHT_REST)),
            (Convention::Current, Handedness::Left) => CURRENT_LEFT.get_or_init(|| {
                Self::from_table(convention, &CURRENT_PARENTS, &CURRENT_LEFT_REST)
            }),
            (Convention::Current, Handedness::Right) => CURRENT_RIGHT.get_or_init(|| {
                Self::from_table(convention, &CURRENT_PARENTS, &CURRENT_RIGHT_REST)
            }),
        }
    }

    fn from_table(
        convention: Convention,
        parents: &[Option<usize>],
        rest: &[([f32; 3], [f32; 4])],
    ) -> Self {
        let joints = parents
            .iter()
            .zip(rest)
            .map(|(parent, (position, rotation))| {
                let mut pose = Pose::from_arrays(*position, *rotation);
                pose.rotation = pose.rotation.normalize();
                Joint::new(*parent, pose)
            })
            .collect();
        Self::assemble(convention, joints)
    }

    fn assemble(convention: Convention, joints: Vec<Joint>) -> Self {
        let mut children = vec![Vec::new(); joints.len()];
        for (joint, entry) in joints.iter().enumerate() {
            if let Some(list) = entry.parent.and_then(|p| children.get_mut(p)) {
                list.push(joint);
            }
        }
        Self {
            convention,
            joints,
            children,
        }
    }

    /// Creates a skeleton from explicit joints.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::InsufficientJoints`] if fewer joints than the
    /// convention requires are given, or [`HandError::InvalidHierarchy`] if a
    /// parent index is not smaller than its child's.
    pub fn new(convention: Convention, joints: Vec<Joint>) -> Result<Self> {
        let expected = convention.joint_count();
        if joints.len() < expected {
            return Err(HandError::insufficient_joints(expected, joints.len()));
        }
        let skeleton = Self::assemble(convention, joints);
        skeleton.validate()?;
        Ok(skeleton)
    }

    /// Builds a skeleton from nodes of a live hierarchy given in joint order.
    ///
    /// Each node's parent index is the nearest earlier node whose key equals
    /// the node's parent key. A node whose parent is not among the earlier
    /// nodes becomes a root. The input order is trusted, never re-sorted.
    #[must_use]
    pub fn from_live_joints<N: LiveJoint>(convention: Convention, nodes: &[N]) -> Self {
        let joints = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let parent = node.parent_key().and_then(|parent_key| {
                    (0..i).rev().find(|&candidate| nodes[candidate].key() == parent_key)
                });
                if parent.is_none() {
                    debug!(joint = i, "live joint has no earlier parent, treating as root");
                }
                Joint::new(parent, node.local_pose())
            })
            .collect();
        Self::assemble(convention, joints)
    }

    /// Convention of the joint indices.
    #[must_use]
    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// Number of joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// True if the skeleton has no joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// All joints in index order.
    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Joint at `index`.
    #[must_use]
    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    /// Rest pose of the joint at `index`, relative to its parent.
    #[must_use]
    pub fn local_pose(&self, index: usize) -> Option<Pose> {
        self.joints.get(index).map(|j| j.local_pose)
    }

    /// Parent index of `index`; `None` for roots and out-of-range indices.
    #[must_use]
    pub fn parent_index(&self, index: usize) -> Option<usize> {
        self.joints.get(index).and_then(|j| j.parent)
    }

    /// Child indices of `index`; empty for leaves and out-of-range indices.
    #[must_use]
    pub fn children_indices(&self, index: usize) -> &[usize] {
        self.children.get(index).map_or(&[], Vec::as_slice)
    }

    /// Finger owning the joint at `index`.
    #[must_use]
    pub fn finger_of_index(&self, index: usize) -> Option<HandFinger> {
        joint_tables(self.convention).finger(index)
    }

    /// Parent of `joint`.
    #[must_use]
    pub fn parent_of<J: JointId>(&self, joint: J) -> Option<J> {
        self.parent_index(joint.index()).and_then(J::from_index)
    }

    /// Whether the skeleton's hierarchy is sound.
    ///
    /// Every parent index must be smaller than its child's, which also rules
    /// out cycles; the walk to a root is bounded by the joint count.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::InvalidHierarchy`] for the first offending joint.
    pub fn validate(&self) -> Result<()> {
        for (joint, entry) in self.joints.iter().enumerate() {
            if let Some(parent) = entry.parent {
                if parent >= joint {
                    return Err(HandError::InvalidHierarchy { joint, parent });
                }
            }
            if self.depth(joint).is_none() {
                return Err(HandError::InvalidHierarchy {
                    joint,
                    parent: entry.parent.unwrap_or(joint),
                });
            }
        }
        Ok(())
    }

    /// Number of ancestors of `index`, or `None` if the walk does not reach a
    /// root within `len()` steps.
    #[must_use]
    pub fn depth(&self, index: usize) -> Option<usize> {
        let mut current = self.joints.get(index)?;
        for steps in 0..=self.joints.len() {
            match current.parent {
                None => return Some(steps),
                Some(parent) => current = self.joints.get(parent)?,
            }
        }
        None
    }

    /// Rest poses of every joint, composed down from `root`.
    #[must_use]
    pub fn world_poses(&self, root: &Pose) -> Vec<Pose> {
        let mut world: Vec<Pose> = Vec::with_capacity(self.joints.len());
        for joint in &self.joints {
            let parent = joint
                .parent
                .and_then(|p| world.get(p).copied())
                .unwrap_or(*root);
            world.push(parent.compose(&joint.local_pose));
        }
        world
    }
}

/// Typed lookups over the static tables of a joint enumeration.
///
/// These do not need a skeleton instance: the topology is a property of the
/// convention.
pub mod lookup {
    use super::joint_tables;
    use crate::joint::{HandFinger, JointId};

    /// Parent of `joint`.
    #[must_use]
    pub fn parent_of<J: JointId>(joint: J) -> Option<J> {
        joint_tables(J::CONVENTION)
            .parent(joint.index())
            .and_then(J::from_index)
    }

    /// Direct children of `joint`.
    #[must_use]
    pub fn children_of<J: JointId>(joint: J) -> Vec<J> {
        joint_tables(J::CONVENTION)
            .children(joint.index())
            .iter()
            .filter_map(|&i| J::from_index(i))
            .collect()
    }

    /// Finger owning `joint`; `None` for wrist, palm and forearm joints.
    #[must_use]
    pub fn finger_of<J: JointId>(joint: J) -> Option<HandFinger> {
        joint_tables(J::CONVENTION).finger(joint.index())
    }

    /// Distal-most joint of `finger`.
    #[must_use]
    pub fn tip_of<J: JointId>(finger: HandFinger) -> Option<J> {
        J::from_index(joint_tables(J::CONVENTION).tip(finger))
    }

    /// Joints of `finger`, root-most first.
    #[must_use]
    pub fn finger_joints<J: JointId>(finger: HandFinger) -> Vec<J> {
        joint_tables(J::CONVENTION)
            .finger_chain(finger)
            .iter()
            .filter_map(|&i| J::from_index(i))
            .collect()
    }

    /// True for fingertips.
    #[must_use]
    pub fn is_tip<J: JointId>(joint: J) -> bool {
        joint_tables(J::CONVENTION).is_tip(joint.index())
    }

    /// True for metacarpals.
    #[must_use]
    pub fn is_metacarpal<J: JointId>(joint: J) -> bool {
        joint_tables(J::CONVENTION).is_metacarpal(joint.index())
    }
}
