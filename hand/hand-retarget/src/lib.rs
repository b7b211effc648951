//! Convention retargeting and pose reconstruction for tracked hands.
//!
//! Tracking runtimes deliver hands in one of two joint conventions (see
//! [`hand_types::Convention`]). This crate turns either into world-space
//! poses of the current convention:
//!
//! - [`adapter`] - Joint-id tables, change of basis and the [`Retargeter`]
//! - [`thumb`] - Cumulative thumb rotations across mismatched thumb bases
//! - [`reconstruct`] - Local, wrist-relative and world poses from joint data
//! - [`HandPoseSource`] / [`HeadPoseSource`] - What a tracking runtime provides
//! - [`HandFrame`] - One frame of world poses, ready for gesture detection
//!
//! # Example
//!
//! ```
//! use hand_retarget::{HandFrame, HandSample};
//! use hand_types::{Convention, HandJointId, Handedness, Pose, Quat};
//!
//! let sample = HandSample::from_rotations(
//!     Handedness::Right,
//!     Convention::Legacy,
//!     Pose::IDENTITY,
//!     vec![Quat::IDENTITY; 24],
//! );
//! let frame = HandFrame::from_source(&sample).unwrap();
//! assert!(frame.position(HandJointId::IndexTip).length() > 0.1);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod adapter;
mod frame;
pub mod reconstruct;
mod source;
pub mod thumb;

pub use adapter::{Retargeter, change_of_basis, to_current, to_legacy, translate_joint_id};
pub use frame::HandFrame;
pub use reconstruct::{PoseSpace, reconstruct_from_poses, reconstruct_from_rotations};
pub use source::{HandPoseSource, HandSample, HeadPose, HeadPoseSource, JointBuffer, JointData};
pub use thumb::accumulate_chain;
