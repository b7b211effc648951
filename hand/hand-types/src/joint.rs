//! Joint identifiers for the two hand skeleton conventions.
//!
//! The legacy convention drives 24 joints by local rotation from a wrist
//! root. The current convention carries full poses for 26 joints, adds a
//! palm joint and gives every finger a metacarpal. The enumerations are not
//! interchangeable; use `hand_retarget` to translate between them.

use serde::{Deserialize, Serialize};

/// The five fingers of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandFinger {
    /// Thumb.
    Thumb,
    /// Index finger.
    Index,
    /// Middle finger.
    Middle,
    /// Ring finger.
    Ring,
    /// Little finger.
    Pinky,
}

impl HandFinger {
    /// All fingers, thumb first.
    pub const ALL: [Self; 5] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Pinky,
    ];

    /// Position of the finger in [`HandFinger::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Finger at `index`, if any.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Thumb),
            1 => Some(Self::Index),
            2 => Some(Self::Middle),
            3 => Some(Self::Ring),
            4 => Some(Self::Pinky),
            _ => None,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }
}

impl std::fmt::Display for HandFinger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hand skeleton convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Convention {
    /// Rotation-driven skeleton rooted at the wrist (24 joints).
    Legacy,
    /// Full-pose skeleton with palm and metacarpals (26 joints).
    Current,
}

impl Convention {
    /// Static description of this convention's layout.
    #[must_use]
    pub const fn info(self) -> &'static ConventionInfo {
        match self {
            Self::Legacy => &LEGACY_INFO,
            Self::Current => &CURRENT_INFO,
        }
    }

    /// Total joint count.
    #[must_use]
    pub const fn joint_count(self) -> usize {
        self.info().joint_count
    }

    /// The other convention.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Legacy => Self::Current,
            Self::Current => Self::Legacy,
        }
    }
}

impl std::fmt::Display for Convention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Current => write!(f, "current"),
        }
    }
}

/// Per-convention layout constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConventionInfo {
    /// Which convention this describes.
    pub convention: Convention,
    /// Total number of joints, tips included.
    pub joint_count: usize,
    /// Index of the wrist joint.
    pub root_index: usize,
    /// Index of the palm joint, if the convention has one.
    pub palm_index: Option<usize>,
    /// Thumb joints from the root-most one to the tip.
    pub thumb_chain: &'static [usize],
    /// Number of joints that carry skin weights (tips excluded).
    pub skinned_count: usize,
}

impl ConventionInfo {
    /// Number of joints in the thumb chain, tip included.
    #[must_use]
    pub const fn thumb_chain_len(&self) -> usize {
        self.thumb_chain.len()
    }
}

const LEGACY_INFO: ConventionInfo = ConventionInfo {
    convention: Convention::Legacy,
    joint_count: LegacyJointId::COUNT,
    root_index: LegacyJointId::WristRoot as usize,
    palm_index: None,
    thumb_chain: &[2, 3, 4, 5, 19],
    skinned_count: 19,
};

const CURRENT_INFO: ConventionInfo = ConventionInfo {
    convention: Convention::Current,
    joint_count: HandJointId::COUNT,
    root_index: HandJointId::Wrist as usize,
    palm_index: Some(HandJointId::Palm as usize),
    thumb_chain: &[2, 3, 4, 5],
    skinned_count: 26,
};

/// Common interface of the per-convention joint enumerations.
pub trait JointId: Copy + Eq + std::fmt::Debug + 'static {
    /// Convention the identifier belongs to.
    const CONVENTION: Convention;
    /// Number of joints in the convention.
    const COUNT: usize;
    /// Every joint in index order.
    const ALL: &'static [Self];

    /// Array index of the joint.
    fn index(self) -> usize;

    /// Joint at `index`, or `None` when out of range.
    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Kebab-case name.
    fn as_str(self) -> &'static str;

    /// Parses a kebab-case name.
    fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|j| j.as_str() == name)
    }
}

/// Joints of the legacy convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum LegacyJointId {
    WristRoot,
    ForearmStub,
    Thumb0,
    Thumb1,
    Thumb2,
    Thumb3,
    Index1,
    Index2,
    Index3,
    Middle1,
    Middle2,
    Middle3,
    Ring1,
    Ring2,
    Ring3,
    Pinky0,
    Pinky1,
    Pinky2,
    Pinky3,
    ThumbTip,
    IndexTip,
    MiddleTip,
    RingTip,
    PinkyTip,
}

impl JointId for LegacyJointId {
    const CONVENTION: Convention = Convention::Legacy;
    const COUNT: usize = 24;
    const ALL: &'static [Self] = &[
        Self::WristRoot,
        Self::ForearmStub,
        Self::Thumb0,
        Self::Thumb1,
        Self::Thumb2,
        Self::Thumb3,
        Self::Index1,
        Self::Index2,
        Self::Index3,
        Self::Middle1,
        Self::Middle2,
        Self::Middle3,
        Self::Ring1,
        Self::Ring2,
        Self::Ring3,
        Self::Pinky0,
        Self::Pinky1,
        Self::Pinky2,
        Self::Pinky3,
        Self::ThumbTip,
        Self::IndexTip,
        Self::MiddleTip,
        Self::RingTip,
        Self::PinkyTip,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::WristRoot => "wrist-root",
            Self::ForearmStub => "forearm-stub",
            Self::Thumb0 => "thumb-0",
            Self::Thumb1 => "thumb-1",
            Self::Thumb2 => "thumb-2",
            Self::Thumb3 => "thumb-3",
            Self::Index1 => "index-1",
            Self::Index2 => "index-2",
            Self::Index3 => "index-3",
            Self::Middle1 => "middle-1",
            Self::Middle2 => "middle-2",
            Self::Middle3 => "middle-3",
            Self::Ring1 => "ring-1",
            Self::Ring2 => "ring-2",
            Self::Ring3 => "ring-3",
            Self::Pinky0 => "pinky-0",
            Self::Pinky1 => "pinky-1",
            Self::Pinky2 => "pinky-2",
            Self::Pinky3 => "pinky-3",
            Self::ThumbTip => "thumb-tip",
            Self::IndexTip => "index-tip",
            Self::MiddleTip => "middle-tip",
            Self::RingTip => "ring-tip",
            Self::PinkyTip => "pinky-tip",
        }
    }
}

/// Joints of the current convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum HandJointId {
    Palm,
    Wrist,
    ThumbMetacarpal,
    ThumbProximal,
    ThumbDistal,
    ThumbTip,
    IndexMetacarpal,
    IndexProximal,
    IndexIntermediate,
    IndexDistal,
    IndexTip,
    MiddleMetacarpal,
    MiddleProximal,
    MiddleIntermediate,
    MiddleDistal,
    MiddleTip,
    RingMetacarpal,
    RingProximal,
    RingIntermediate,
    RingDistal,
    RingTip,
    LittleMetacarpal,
    LittleProximal,
    LittleIntermediate,
    LittleDistal,
    LittleTip,
}

impl JointId for HandJointId {
    const CONVENTION: Convention = Convention::Current;
    const COUNT: usize = 26;
    const ALL: &'static [Self] = &[
        Self::Palm,
        Self::Wrist,
        Self::ThumbMetacarpal,
        Self::ThumbProximal,
        Self::ThumbDistal,
        Self::ThumbTip,
        Self::IndexMetacarpal,
        Self::IndexProximal,
        Self::IndexIntermediate,
        Self::IndexDistal,
        Self::IndexTip,
        Self::MiddleMetacarpal,
        Self::MiddleProximal,
        Self::MiddleIntermediate,
        Self::MiddleDistal,
        Self::MiddleTip,
        Self::RingMetacarpal,
        Self::RingProximal,
        Self::RingIntermediate,
        Self::RingDistal,
        Self::RingTip,
        Self::LittleMetacarpal,
        Self::LittleProximal,
        Self::LittleIntermediate,
        Self::LittleDistal,
        Self::LittleTip,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Palm => "palm",
            Self::Wrist => "wrist",
            Self::ThumbMetacarpal => "thumb-metacarpal",
            Self::ThumbProximal => "thumb-proximal",
            Self::ThumbDistal => "thumb-distal",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMetacarpal => "index-metacarpal",
            Self::IndexProximal => "index-proximal",
            Self::IndexIntermediate => "index-intermediate",
            Self::IndexDistal => "index-distal",
            Self::IndexTip => "index-tip",
            Self::MiddleMetacarpal => "middle-metacarpal",
            Self::MiddleProximal => "middle-proximal",
            Self::MiddleIntermediate => "middle-intermediate",
            Self::MiddleDistal => "middle-distal",
            Self::MiddleTip => "middle-tip",
            Self::RingMetacarpal => "ring-metacarpal",
            Self::RingProximal => "ring-proximal",
            Self::RingIntermediate => "ring-intermediate",
            Self::RingDistal => "ring-distal",
            Self::RingTip => "ring-tip",
            Self::LittleMetacarpal => "little-metacarpal",
            Self::LittleProximal => "little-proximal",
            Self::LittleIntermediate => "little-intermediate",
            Self::LittleDistal => "little-distal",
            Self::LittleTip => "little-tip",
        }
    }
}

impl HandJointId {
    /// Fingertip joints, thumb first.
    pub const TIPS: [Self; 5] = [
        Self::ThumbTip,
        Self::IndexTip,
        Self::MiddleTip,
        Self::RingTip,
        Self::LittleTip,
    ];
}
