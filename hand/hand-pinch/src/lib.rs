//! Per-finger pinch detection with hysteresis for tracked hands.
//!
//! Each finger is measured against the thumb every frame and moves between
//! released and pinching:
//!
//! - [`PinchDetector`] - Per-hand detector fed one [`hand_retarget::HandFrame`] per tick
//! - [`FingerPinchData`] - Pinch state, strength and tip position of one finger
//! - [`PinchConfig`] / [`PinchThresholds`] - Hysteresis distances and quality mode
//! - [`geometry`] - Point and segment distance queries
//!
//! # Quality mode
//!
//! Fingertip tracking is most reliable when the hand is seen edge-on from the
//! thumb side, little finger pointing away from the viewer. While the
//! little-finger side stays close to the view direction (see
//! [`PinchConfig::high_quality_view_angle_deg`]) the detector switches to
//! [`PinchConfig::high_quality`] thresholds.
//!
//! # Example
//!
//! ```
//! use hand_pinch::{PinchConfig, PinchDetector};
//! use hand_retarget::{HandSample, HeadPose};
//! use hand_types::{Convention, HandFinger, HandSkeleton, Handedness, Pose, Vec3};
//!
//! let config = PinchConfig::from_json(r#"{ "thumb_near_distance": 0.03 }"#).unwrap();
//! let mut detector = PinchDetector::new(config).unwrap();
//!
//! let rest = HandSkeleton::default_for(Convention::Current, Handedness::Right);
//! let poses = rest.joints().iter().map(|j| j.local_pose).collect();
//! let hand = HandSample::from_poses(
//!     Handedness::Right,
//!     Convention::Current,
//!     Pose::IDENTITY,
//!     poses,
//! );
//! let head = HeadPose::new(Vec3::new(0.0, 0.3, 0.3), Vec3::NEG_Z);
//!
//! detector.update_from(&hand, &head).unwrap();
//! assert!(!detector.is_pinching(HandFinger::Middle));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod detector;
mod finger;
pub mod geometry;

pub use config::{PinchConfig, PinchThresholds};
pub use detector::{PinchDetector, QualityMode};
pub use finger::FingerPinchData;
pub use geometry::{
    Segment, closest_point_on_segment, point_segment_distance, segment_segment_distance,
};
