//! Hand skeleton types.
//!
//! This crate provides the data model shared by the hand crates:
//!
//! - [`HandJointId`] / [`LegacyJointId`] - Joint enumerations of the two conventions
//! - [`Convention`] and [`ConventionInfo`] - Joint counts, roots and thumb chains
//! - [`HandSpace`] - What distal, dorsal and thumb-side mean for a joint frame
//! - [`HandSkeleton`] - Indexed hierarchy with canonical left/right rest poses
//! - [`Pose`] - Rigid joint pose
//! - [`lookup`] - Parent, children, finger and tip tables
//!
//! # Conventions
//!
//! Two incompatible joint layouts are in use. The **legacy** layout drives 24
//! joints by local rotation from a wrist root, has a trapezium joint at the
//! base of the thumb and a metacarpal only on the little finger. The
//! **current** layout carries full poses for 26 joints, adds a palm joint and
//! gives every finger a metacarpal. Local axes differ too; see [`HandSpace`].
//!
//! # Layer 0
//!
//! Pure data and table lookups. No frame loop, no I/O. Static tables are
//! built once on first use and are safe to share across threads.
//!
//! # Example
//!
//! ```
//! use hand_types::{lookup, HandFinger, HandJointId, LegacyJointId};
//!
//! assert_eq!(lookup::tip_of::<HandJointId>(HandFinger::Index), Some(HandJointId::IndexTip));
//! assert_eq!(lookup::finger_of(LegacyJointId::Thumb0), Some(HandFinger::Thumb));
//! assert_eq!(lookup::parent_of(HandJointId::Wrist), None);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod joint;
mod pose;
mod skeleton;
mod space;
mod tables;

pub use error::{HandError, Result};
pub use joint::{Convention, ConventionInfo, HandFinger, HandJointId, JointId, LegacyJointId};
pub use pose::Pose;
pub use skeleton::{HandSkeleton, Joint, LiveJoint, lookup};
pub use space::{HandSpace, Handedness};
pub use tables::{JointTables, joint_tables};

// Re-export math types for convenience
pub use glam::{Mat3, Quat, Vec3};
