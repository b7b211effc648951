//! Static joint topology, finger membership and measured rest poses.
//!
//! Rest poses are local to the parent joint (or to the hand root for root
//! joints), in meters, with rotations as `[x, y, z, w]`. Right-hand tables
//! mirror the left ones: the legacy convention mirrors through the origin,
//! the current convention across its X axis.

use std::sync::OnceLock;

use crate::joint::HandFinger::{Index, Middle, Pinky, Ring, Thumb};
use crate::joint::{Convention, HandFinger};

type Rest = ([f32; 3], [f32; 4]);

const I: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
/// 40° about +Y: swings the legacy thumb toward the thumb side.
const LEGACY_THUMB: [f32; 4] = [0.0, 0.342_020_14, 0.0, 0.939_692_6];
const CURRENT_THUMB_LEFT: [f32; 4] = [0.0, -0.342_020_14, 0.0, 0.939_692_6];
const CURRENT_THUMB_RIGHT: [f32; 4] = [0.0, 0.342_020_14, 0.0, 0.939_692_6];

pub(crate) const LEGACY_PARENTS: [Option<usize>; 24] = [
    None,     // wrist root
    Some(0),  // forearm stub
    Some(0),  // thumb 0
    Some(2),
    Some(3),
    Some(4),
    Some(0),  // index 1
    Some(6),
    Some(7),
    Some(0),  // middle 1
    Some(9),
    Some(10),
    Some(0),  // ring 1
    Some(12),
    Some(13),
    Some(0),  // pinky 0
    Some(15),
    Some(16),
    Some(17),
    Some(5),  // thumb tip
    Some(8),
    Some(11),
    Some(14),
    Some(18),
];

pub(crate) const CURRENT_PARENTS: [Option<usize>; 26] = [
    None,     // palm
    None,     // wrist
    Some(1),  // thumb metacarpal
    Some(2),
    Some(3),
    Some(4),
    Some(1),  // index metacarpal
    Some(6),
    Some(7),
    Some(8),
    Some(9),
    Some(1),  // middle metacarpal
    Some(11),
    Some(12),
    Some(13),
    Some(14),
    Some(1),  // ring metacarpal
    Some(16),
    Some(17),
    Some(18),
    Some(19),
    Some(1),  // little metacarpal
    Some(21),
    Some(22),
    Some(23),
    Some(24),
];

pub(crate) const LEGACY_FINGERS: [Option<HandFinger>; 24] = [
    None,
    None,
    Some(Thumb),
    Some(Thumb),
    Some(Thumb),
    Some(Thumb),
    Some(Index),
    Some(Index),
    Some(Index),
    Some(Middle),
    Some(Middle),
    Some(Middle),
    Some(Ring),
    Some(Ring),
    Some(Ring),
    Some(Pinky),
    Some(Pinky),
    Some(Pinky),
    Some(Pinky),
    Some(Thumb),
    Some(Index),
    Some(Middle),
    Some(Ring),
    Some(Pinky),
];

pub(crate) const CURRENT_FINGERS: [Option<HandFinger>; 26] = [
    None,
    None,
    Some(Thumb),
    Some(Thumb),
    Some(Thumb),
    Some(Thumb),
    Some(Index),
    Some(Index),
    Some(Index),
    Some(Index),
    Some(Index),
    Some(Middle),
    Some(Middle),
    Some(Middle),
    Some(Middle),
    Some(Middle),
    Some(Ring),
    Some(Ring),
    Some(Ring),
    Some(Ring),
    Some(Ring),
    Some(Pinky),
    Some(Pinky),
    Some(Pinky),
    Some(Pinky),
    Some(Pinky),
];

const LEGACY_METACARPALS: &[usize] = &[3, 15];
const CURRENT_METACARPALS: &[usize] = &[2, 6, 11, 16, 21];

pub(crate) const LEGACY_LEFT_REST: [Rest; 24] = [
    ([0.0, 0.0, 0.0], I),
    ([-0.04, 0.0, 0.0], I),
    ([0.02, 0.01, -0.015], LEGACY_THUMB),
    ([0.03, 0.0, 0.0], I),
    ([0.045, 0.0, 0.0], I),
    ([0.032, 0.0, 0.0], I),
    ([0.075, 0.0, -0.022], I),
    ([0.04, 0.0, 0.0], I),
    ([0.025, 0.0, 0.0], I),
    ([0.078, 0.0, 0.0], I),
    ([0.043, 0.0, 0.0], I),
    ([0.028, 0.0, 0.0], I),
    ([0.072, 0.0, 0.02], I),
    ([0.039, 0.0, 0.0], I),
    ([0.026, 0.0, 0.0], I),
    ([0.012, 0.0, 0.012], I),
    ([0.055, 0.0, 0.022], I),
    ([0.031, 0.0, 0.0], I),
    ([0.02, 0.0, 0.0], I),
    ([0.025, 0.0, 0.0], I),
    ([0.022, 0.0, 0.0], I),
    ([0.024, 0.0, 0.0], I),
    ([0.023, 0.0, 0.0], I),
    ([0.021, 0.0, 0.0], I),
];

pub(crate) const LEGACY_RIGHT_REST: [Rest; 24] = [
    ([0.0, 0.0, 0.0], I),
    ([0.04, 0.0, 0.0], I),
    ([-0.02, -0.01, 0.015], LEGACY_THUMB),
    ([-0.03, 0.0, 0.0], I),
    ([-0.045, 0.0, 0.0], I),
    ([-0.032, 0.0, 0.0], I),
    ([-0.075, 0.0, 0.022], I),
    ([-0.04, 0.0, 0.0], I),
    ([-0.025, 0.0, 0.0], I),
    ([-0.078, 0.0, 0.0], I),
    ([-0.043, 0.0, 0.0], I),
    ([-0.028, 0.0, 0.0], I),
    ([-0.072, 0.0, -0.02], I),
    ([-0.039, 0.0, 0.0], I),
    ([-0.026, 0.0, 0.0], I),
    ([-0.012, 0.0, -0.012], I),
    ([-0.055, 0.0, -0.022], I),
    ([-0.031, 0.0, 0.0], I),
    ([-0.02, 0.0, 0.0], I),
    ([-0.025, 0.0, 0.0], I),
    ([-0.022, 0.0, 0.0], I),
    ([-0.024, 0.0, 0.0], I),
    ([-0.023, 0.0, 0.0], I),
    ([-0.021, 0.0, 0.0], I),
];

pub(crate) const CURRENT_LEFT_REST: [Rest; 26] = [
    ([0.0, 0.0, -0.045], I),
    ([0.0, 0.0, 0.0], I),
    ([0.0343, -0.01, -0.043], CURRENT_THUMB_LEFT),
    ([0.0, 0.0, -0.045], I),
    ([0.0, 0.0, -0.032], I),
    ([0.0, 0.0, -0.025], I),
    ([0.01, 0.0, -0.01], I),
    ([0.012, 0.0, -0.065], I),
    ([0.0, 0.0, -0.04], I),
    ([0.0, 0.0, -0.025], I),
    ([0.0, 0.0, -0.022], I),
    ([0.0, 0.0, -0.01], I),
    ([0.0, 0.0, -0.068], I),
    ([0.0, 0.0, -0.043], I),
    ([0.0, 0.0, -0.028], I),
    ([0.0, 0.0, -0.024], I),
    ([-0.008, 0.0, -0.01], I),
    ([-0.012, 0.0, -0.062], I),
    ([0.0, 0.0, -0.039], I),
    ([0.0, 0.0, -0.026], I),
    ([0.0, 0.0, -0.023], I),
    ([-0.012, 0.0, -0.012], I),
    ([-0.022, 0.0, -0.055], I),
    ([0.0, 0.0, -0.031], I),
    ([0.0, 0.0, -0.02], I),
    ([0.0, 0.0, -0.021], I),
];

pub(crate) const CURRENT_RIGHT_REST: [Rest; 26] = [
    ([0.0, 0.0, -0.045], I),
    ([0.0, 0.0, 0.0], I),
    ([-0.0343, -0.01, -0.043], CURRENT_THUMB_RIGHT),
    ([0.0, 0.0, -0.045], I),
    ([0.0, 0.0, -0.032], I),
    ([0.0, 0.0, -0.025], I),
    ([-0.01, 0.0, -0.01], I),
    ([-0.012, 0.0, -0.065], I),
    ([0.0, 0.0, -0.04], I),
    ([0.0, 0.0, -0.025], I),
    ([0.0, 0.0, -0.022], I),
    ([0.0, 0.0, -0.01], I),
    ([0.0, 0.0, -0.068], I),
    ([0.0, 0.0, -0.043], I),
    ([0.0, 0.0, -0.028], I),
    ([0.0, 0.0, -0.024], I),
    ([0.008, 0.0, -0.01], I),
    ([0.012, 0.0, -0.062], I),
    ([0.0, 0.0, -0.039], I),
    ([0.0, 0.0, -0.026], I),
    ([0.0, 0.0, -0.023], I),
    ([0.012, 0.0, -0.012], I),
    ([0.022, 0.0, -0.055], I),
    ([0.0, 0.0, -0.031], I),
    ([0.0, 0.0, -0.02], I),
    ([0.0, 0.0, -0.021], I),
];

/// Precomputed lookups for one convention.
#[derive(Debug)]
pub struct JointTables {
    parents: &'static [Option<usize>],
    fingers: &'static [Option<HandFinger>],
    metacarpals: &'static [usize],
    children: Vec<Vec<usize>>,
    finger_chains: [Vec<usize>; 5],
}

impl JointTables {
    fn build(
        parents: &'static [Option<usize>],
        fingers: &'static [Option<HandFinger>],
        metacarpals: &'static [usize],
    ) -> Self {
        let mut children = vec![Vec::new(); parents.len()];
        for (joint, parent) in parents.iter().enumerate() {
            if let Some(parent) = *parent {
                children[parent].push(joint);
            }
        }

        // Parents precede children, so index order walks each chain root to tip.
        let finger_chains = HandFinger::ALL.map(|finger| {
            fingers
                .iter()
                .enumerate()
                .filter(|(_, f)| **f == Some(finger))
                .map(|(joint, _)| joint)
                .collect()
        });

        Self {
            parents,
            fingers,
            metacarpals,
            children,
            finger_chains,
        }
    }

    /// Number of joints described.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// True when the table describes no joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Parent of `joint`; `None` for roots and out-of-range indices.
    #[must_use]
    pub fn parent(&self, joint: usize) -> Option<usize> {
        self.parents.get(joint).copied().flatten()
    }

    /// Direct children of `joint`; empty when out of range.
    #[must_use]
    pub fn children(&self, joint: usize) -> &[usize] {
        self.children.get(joint).map_or(&[], Vec::as_slice)
    }

    /// Finger owning `joint`.
    #[must_use]
    pub fn finger(&self, joint: usize) -> Option<HandFinger> {
        self.fingers.get(joint).copied().flatten()
    }

    /// Joints of `finger`, root-most first.
    #[must_use]
    pub fn finger_chain(&self, finger: HandFinger) -> &[usize] {
        &self.finger_chains[finger.index()]
    }

    /// Distal-most joint of `finger`.
    #[must_use]
    pub fn tip(&self, finger: HandFinger) -> usize {
        self.finger_chain(finger).last().copied().unwrap_or_default()
    }

    /// True for fingertip joints.
    #[must_use]
    pub fn is_tip(&self, joint: usize) -> bool {
        self.finger(joint).is_some() && self.children(joint).is_empty()
    }

    /// True for metacarpal joints.
    #[must_use]
    pub fn is_metacarpal(&self, joint: usize) -> bool {
        self.metacarpals.contains(&joint)
    }
}

/// Shared lookups for `convention`, built on first use.
#[must_use]
pub fn joint_tables(convention: Convention) -> &'static JointTables {
    static LEGACY: OnceLock<JointTables> = OnceLock::new();
    static CURRENT: OnceLock<JointTables> = OnceLock::new();

    match convention {
        Convention::Legacy => LEGACY.get_or_init(|| {
            JointTables::build(&LEGACY_PARENTS, &LEGACY_FINGERS, LEGACY_METACARPALS)
        }),
        Convention::Current => CURRENT.get_or_init(|| {
            JointTables::build(&CURRENT_PARENTS, &CURRENT_FINGERS, CURRENT_METACARPALS)
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::joint::{HandJointId, JointId, LegacyJointId};

    #[test]
    fn parents_never_forward_reference() {
        for (i, parent) in LEGACY_PARENTS.iter().enumerate() {
            if let Some(p) = parent {
                assert!(*p < i, "legacy joint {i} has parent {p}");
            }
        }
        for (i, parent) in CURRENT_PARENTS.iter().enumerate() {
            if let Some(p) = parent {
                assert!(*p < i, "current joint {i} has parent {p}");
            }
        }
    }

    #[test]
    fn children_invert_parents() {
        for convention in [Convention::Legacy, Convention::Current] {
            let tables = joint_tables(convention);
            for joint in 0..tables.len() {
                for &child in tables.children(joint) {
                    assert_eq!(tables.parent(child), Some(joint));
                }
            }
        }
    }

    #[test]
    fn tips_match_enumerations() {
        let legacy = joint_tables(Convention::Legacy);
        assert_eq!(legacy.tip(HandFinger::Thumb), LegacyJointId::ThumbTip.index());
        assert_eq!(legacy.tip(HandFinger::Pinky), LegacyJointId::PinkyTip.index());

        let current = joint_tables(Convention::Current);
        for (finger, tip) in HandFinger::ALL.iter().zip(HandJointId::TIPS) {
            assert_eq!(current.tip(*finger), tip.index());
            assert!(current.is_tip(tip.index()));
        }
    }

    #[test]
    fn legacy_thumb_chain_matches_info() {
        let legacy = joint_tables(Convention::Legacy);
        assert_eq!(
            legacy.finger_chain(HandFinger::Thumb),
            Convention::Legacy.info().thumb_chain
        );
        assert_eq!(legacy.finger_chain(HandFinger::Index), &[6, 7, 8, 20]);
    }

    #[test]
    fn out_of_range_lookups() {
        let tables = joint_tables(Convention::Current);
        assert_eq!(tables.parent(99), None);
        assert!(tables.children(99).is_empty());
        assert_eq!(tables.finger(99), None);
        assert!(!tables.is_tip(99));
    }

    #[test]
    fn wrist_and_palm_have_no_finger() {
        let tables = joint_tables(Convention::Current);
        assert_eq!(tables.finger(HandJointId::Palm.index()), None);
        assert_eq!(tables.finger(HandJointId::Wrist.index()), None);
        assert!(tables.is_metacarpal(HandJointId::RingMetacarpal.index()));
        assert!(!tables.is_metacarpal(HandJointId::RingProximal.index()));
    }
}
