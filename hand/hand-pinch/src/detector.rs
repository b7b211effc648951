//! Per-frame pinch detection for one hand.

use glam::Vec3;
use tracing::{debug, trace};

use hand_retarget::{HandFrame, HandPoseSource, HeadPose, HeadPoseSource};
use hand_types::{HandFinger, HandJointId, JointId, Pose, Result};

use crate::config::{PinchConfig, PinchThresholds};
use crate::finger::FingerPinchData;
use crate::geometry::Segment;

/// Which threshold set is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QualityMode {
    /// Normal tracking conditions.
    #[default]
    Default,
    /// The hand is seen edge-on from the head.
    HighQuality,
}

impl QualityMode {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::HighQuality => "high-quality",
        }
    }
}

impl std::fmt::Display for QualityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const INDEX_CHAIN: [HandJointId; 4] = [
    HandJointId::IndexProximal,
    HandJointId::IndexIntermediate,
    HandJointId::IndexDistal,
    HandJointId::IndexTip,
];

/// Detects thumb pinches for each finger of one hand.
///
/// Feed one [`HandFrame`] per tracking tick to [`PinchDetector::update`].
/// Every non-thumb finger is measured against the thumb; the thumb itself
/// is measured against the side of the index finger.
///
/// # Example
///
/// ```
/// use hand_pinch::{PinchConfig, PinchDetector};
/// use hand_retarget::{HandFrame, HandSample};
/// use hand_types::{Convention, HandFinger, HandSkeleton, Handedness, Pose};
///
/// let mut detector = PinchDetector::new(PinchConfig::default()).unwrap();
/// // Open hand in its rest pose.
/// let rest = HandSkeleton::default_for(Convention::Legacy, Handedness::Left);
/// let rotations = rest.joints().iter().map(|j| j.local_pose.rotation).collect();
/// let sample = HandSample::from_rotations(
///     Handedness::Left,
///     Convention::Legacy,
///     Pose::IDENTITY,
///     rotations,
/// );
/// detector.update(&HandFrame::from_source(&sample).unwrap(), None);
/// assert!(!detector.is_pinching(HandFinger::Index));
/// ```
#[derive(Debug, Clone)]
pub struct PinchDetector {
    config: PinchConfig,
    fingers: [FingerPinchData; 5],
    quality: QualityMode,
    wrist: Pose,
    thumb_tip: Vec3,
}

impl PinchDetector {
    /// Creates a detector with every finger released.
    ///
    /// # Errors
    ///
    /// Returns [`hand_types::HandError::InvalidConfig`] if `config` does not
    /// validate.
    pub fn new(config: PinchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fingers: HandFinger::ALL.map(FingerPinchData::new),
            quality: QualityMode::Default,
            wrist: Pose::IDENTITY,
            thumb_tip: Vec3::ZERO,
        })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &PinchConfig {
        &self.config
    }

    /// Threshold set chosen by the last update.
    #[must_use]
    pub fn quality_mode(&self) -> QualityMode {
        self.quality
    }

    /// Processes one frame.
    pub fn update(&mut self, frame: &HandFrame, head: Option<&HeadPose>) {
        for data in &mut self.fingers {
            let tip = frame.position(HandJointId::TIPS[data.finger().index()]);
            data.begin_frame(tip);
        }
        self.wrist = *frame.wrist();
        self.thumb_tip = frame.position(HandJointId::ThumbTip);

        let quality = self.select_quality(frame, head);
        if quality != self.quality {
            debug!(
                hand = %frame.handedness(),
                from = %self.quality,
                to = %quality,
                "pinch quality mode changed"
            );
            self.quality = quality;
        }
        let thresholds = *self.config.thresholds(quality == QualityMode::HighQuality);

        let thumb_distance = self.thumb_distance(frame);
        self.feed(HandFinger::Thumb, thumb_distance, &thresholds);

        for finger in &HandFinger::ALL[1..] {
            let finger = *finger;
            let pinching = self.fingers[finger.index()].is_pinching();
            let distance = finger_distance(frame, finger, pinching);
            self.feed(finger, distance, &thresholds);
        }
    }

    /// Builds a frame from `hand` and processes it.
    ///
    /// # Errors
    ///
    /// Returns the reconstruction error if `hand` delivers too few joints;
    /// the detector state is left untouched.
    pub fn update_from<S, H>(&mut self, hand: &S, head: &H) -> Result<()>
    where
        S: HandPoseSource + ?Sized,
        H: HeadPoseSource + ?Sized,
    {
        let frame = HandFrame::from_source(hand)?;
        let head = head.head_pose();
        self.update(&frame, head.as_ref());
        Ok(())
    }

    fn feed(&mut self, finger: HandFinger, distance: f32, thresholds: &PinchThresholds) {
        trace!(%finger, distance, "pinch distance");
        self.fingers[finger.index()].update(distance, thresholds);
    }

    fn select_quality(&self, frame: &HandFrame, head: Option<&HeadPose>) -> QualityMode {
        let Some(head) = head else {
            return QualityMode::Default;
        };
        let cos = frame.pinky_side().dot(head.forward).clamp(-1.0, 1.0);
        if cos.acos().to_degrees() <= self.config.high_quality_view_angle_deg {
            QualityMode::HighQuality
        } else {
            QualityMode::Default
        }
    }

    /// Thumb tip against the side of the index finger.
    ///
    /// Only measured while the thumb tip lies on the thumb side of the index
    /// intermediate joint and within `thumb_near_distance` of it.
    fn thumb_distance(&self, frame: &HandFrame) -> f32 {
        let thumb_tip = frame.position(HandJointId::ThumbTip);
        let offset =
            (thumb_tip - frame.position(HandJointId::IndexIntermediate)).dot(frame.thumb_side());
        if !(0.0..=self.config.thumb_near_distance).contains(&offset) {
            return f32::INFINITY;
        }

        let thumb = Segment::new(frame.position(HandJointId::ThumbDistal), thumb_tip);
        let thumb_dir = thumb.direction();
        INDEX_CHAIN
            .windows(2)
            .map(|pair| Segment::new(frame.position(pair[0]), frame.position(pair[1])))
            .filter(|segment| {
                thumb_dir.dot(segment.direction()).abs() <= self.config.parallel_dot_cutoff
            })
            .map(|segment| thumb.distance_to_segment(&segment))
            .fold(f32::INFINITY, f32::min)
    }

    /// State of `finger`.
    #[must_use]
    pub fn finger(&self, finger: HandFinger) -> &FingerPinchData {
        &self.fingers[finger.index()]
    }

    /// State of every finger, thumb first.
    #[must_use]
    pub fn fingers(&self) -> &[FingerPinchData; 5] {
        &self.fingers
    }

    /// True while `finger` is pinching.
    #[must_use]
    pub fn is_pinching(&self, finger: HandFinger) -> bool {
        self.finger(finger).is_pinching()
    }

    /// Pinch strength of `finger` in `[0, 1]`.
    #[must_use]
    pub fn strength(&self, finger: HandFinger) -> f32 {
        self.finger(finger).strength()
    }

    /// True if the last update started or ended a pinch of `finger`.
    #[must_use]
    pub fn is_changed(&self, finger: HandFinger) -> bool {
        self.finger(finger).is_changed()
    }

    /// World position of the tip of `finger`.
    #[must_use]
    pub fn tip_position(&self, finger: HandFinger) -> Vec3 {
        self.finger(finger).tip_position()
    }

    /// True if any finger is pinching.
    #[must_use]
    pub fn any_pinching(&self) -> bool {
        self.fingers.iter().any(FingerPinchData::is_pinching)
    }

    /// Finger with the highest nonzero strength; ties go to the lower finger.
    #[must_use]
    pub fn strongest_finger(&self) -> Option<HandFinger> {
        strongest(&self.fingers)
            .filter(|data| data.strength() > 0.0)
            .map(FingerPinchData::finger)
    }

    /// Midpoint between the thumb tip and the tip of the strongest non-thumb
    /// finger.
    #[must_use]
    pub fn pinch_center(&self) -> Vec3 {
        let partner = strongest(&self.fingers[1..])
            .map_or(self.thumb_tip, FingerPinchData::tip_position);
        (self.thumb_tip + partner) * 0.5
    }

    /// [`Self::pinch_center`] in the wrist frame.
    #[must_use]
    pub fn wrist_offset(&self) -> Vec3 {
        self.wrist.inverse_transform_point(self.pinch_center())
    }

    /// Average tip position of the two strongest fingers.
    #[must_use]
    pub fn grab_point(&self) -> Vec3 {
        let mut order: Vec<&FingerPinchData> = self.fingers.iter().collect();
        // Stable: equal strengths keep finger order.
        order.sort_by(|a, b| b.strength().total_cmp(&a.strength()));
        (order[0].tip_position() + order[1].tip_position()) * 0.5
    }

    /// Releases every finger.
    pub fn reset(&mut self) {
        for data in &mut self.fingers {
            data.reset();
        }
        self.quality = QualityMode::Default;
    }
}

fn strongest(fingers: &[FingerPinchData]) -> Option<&FingerPinchData> {
    fingers.iter().fold(None, |best: Option<&FingerPinchData>, data| match best {
        Some(b) if b.strength() >= data.strength() => Some(b),
        _ => Some(data),
    })
}

/// Fingertip of a non-thumb `finger` against the thumb.
///
/// A released finger is measured against the thumb's last bone only. A
/// pinching finger may slide down to the thumb's proximal bone, unless its
/// tip is already past the start of the last bone.
fn finger_distance(frame: &HandFrame, finger: HandFinger, pinching: bool) -> f32 {
    let tip = frame.position(HandJointId::TIPS[finger.index()]);
    let select = Segment::new(
        frame.position(HandJointId::ThumbDistal),
        frame.position(HandJointId::ThumbTip),
    );
    if !pinching || (tip - select.start).dot(select.direction()) > 0.0 {
        return select.distance_to_point(tip);
    }
    let proximal = Segment::new(
        frame.position(HandJointId::ThumbProximal),
        frame.position(HandJointId::ThumbDistal),
    );
    proximal.distance_to_point(tip).min(select.distance_to_point(tip))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hand_types::{Handedness, Pose};

    const THUMB_TIP: Vec3 = Vec3::new(0.05, -0.01, -0.125);

    /// Left hand at the origin, wrist axes aligned with the world: distal
    /// `-Z`, dorsal `+Y`, thumb side `+X`.
    fn frame(index_tip: Vec3) -> HandFrame {
        frame_with_index(Vec3::ZERO, index_tip)
    }

    /// Same hand as `frame` with the index knuckles moved by `shift`.
    fn frame_with_index(shift: Vec3, index_tip: Vec3) -> HandFrame {
        let shifted = |p: [f32; 3]| (Vec3::from_array(p) + shift).to_array();
        let mut poses = [Pose::IDENTITY; 26];
        let mut place = |joint: HandJointId, p: [f32; 3]| {
            poses[joint.index()] = Pose::from_position(Vec3::from_array(p));
        };
        place(HandJointId::Palm, [0.0, 0.0, -0.045]);
        place(HandJointId::ThumbMetacarpal, [0.035, -0.01, -0.04]);
        place(HandJointId::ThumbProximal, [0.05, -0.01, -0.07]);
        place(HandJointId::ThumbDistal, [0.05, -0.01, -0.10]);
        place(HandJointId::ThumbTip, THUMB_TIP.to_array());
        place(HandJointId::IndexMetacarpal, [0.01, 0.0, -0.01]);
        place(HandJointId::IndexProximal, shifted([0.02, 0.0, -0.075]));
        place(HandJointId::IndexIntermediate, shifted([0.02, 0.0, -0.115]));
        place(HandJointId::IndexDistal, shifted([0.02, 0.0, -0.14]));
        place(HandJointId::IndexTip, index_tip.to_array());
        // Remaining fingers straight, side by side toward the little finger.
        for (first, x) in [(11, -0.02), (16, -0.04), (21, -0.06)] {
            for k in 0..5 {
                let joint = HandJointId::from_index(first + k).unwrap();
                place(joint, [x, 0.0, -0.01 - 0.04 * k as f32]);
            }
        }
        HandFrame::from_world_poses(Handedness::Left, &poses).unwrap()
    }

    fn detector() -> PinchDetector {
        PinchDetector::new(PinchConfig::default()).unwrap()
    }

    #[test]
    fn close_tips_pinch() {
        let mut d = detector();
        d.update(&frame(THUMB_TIP + Vec3::new(0.0, -0.015, 0.0)), None);
        assert!(d.is_pinching(HandFinger::Index));
        assert!(d.is_changed(HandFinger::Index));
        assert_eq!(d.strength(HandFinger::Index), 1.0);
        assert!(d.any_pinching());
        assert!(!d.is_pinching(HandFinger::Ring));
        assert_eq!(d.strength(HandFinger::Pinky), 0.0);
    }

    #[test]
    fn far_tips_do_not_pinch() {
        let mut d = detector();
        d.update(&frame(THUMB_TIP + Vec3::new(0.0, -0.12, 0.0)), None);
        assert!(!d.is_pinching(HandFinger::Index));
        assert_eq!(d.strength(HandFinger::Index), 0.0);
    }

    #[test]
    fn changed_is_cleared_next_frame() {
        let mut d = detector();
        let pinch = frame(THUMB_TIP + Vec3::new(0.0, -0.01, 0.0));
        d.update(&pinch, None);
        assert!(d.is_changed(HandFinger::Index));
        d.update(&pinch, None);
        assert!(!d.is_changed(HandFinger::Index));
        assert!(d.is_pinching(HandFinger::Index));
    }

    #[test]
    fn pinching_finger_may_slide_down_the_thumb() {
        // Beside the thumb's proximal bone, 0.015 away from it but
        // 0.015·√2 ≈ 0.021 from the last bone.
        let beside_proximal = Vec3::new(0.05, -0.025, -0.085);

        let mut released = detector();
        released.update(&frame(beside_proximal), None);
        assert!(!released.is_pinching(HandFinger::Index));

        let mut pinching = detector();
        pinching.update(&frame(THUMB_TIP + Vec3::new(0.0, -0.01, 0.0)), None);
        pinching.update(&frame(beside_proximal), None);
        assert!(pinching.is_pinching(HandFinger::Index));
        assert_relative_eq!(pinching.finger(HandFinger::Index).distance(), 0.015, epsilon = 1e-6);
    }

    #[test]
    fn thumb_pinches_against_index_side() {
        let mut d = detector();
        d.update(&frame(THUMB_TIP + Vec3::new(0.0, -0.01, 0.0)), None);
        assert!(d.is_pinching(HandFinger::Thumb));
    }

    #[test]
    fn thumb_pinches_then_releases_when_index_leaves() {
        let mut d = detector();
        d.update(&frame(THUMB_TIP + Vec3::new(0.0, -0.015, 0.0)), None);
        assert!(d.is_pinching(HandFinger::Thumb));
        assert!(d.is_changed(HandFinger::Thumb));
        assert_eq!(d.strength(HandFinger::Thumb), 1.0);

        let away = Vec3::new(0.0, -0.12, 0.0);
        d.update(&frame_with_index(away, THUMB_TIP + away), None);
        assert!(!d.is_pinching(HandFinger::Thumb));
        assert!(d.is_changed(HandFinger::Thumb));
        assert_eq!(d.strength(HandFinger::Thumb), 0.0);
        assert!(!d.is_pinching(HandFinger::Index));
        assert_eq!(d.strength(HandFinger::Index), 0.0);
    }

    #[test]
    fn thumb_beyond_near_plane_is_unmeasured() {
        let config = PinchConfig::default().thumb_near_distance(0.02);
        let mut d = PinchDetector::new(config).unwrap();
        // Thumb tip sits 0.03 to the thumb side of the index intermediate joint.
        d.update(&frame(THUMB_TIP + Vec3::new(0.0, -0.01, 0.0)), None);
        assert_eq!(d.finger(HandFinger::Thumb).distance(), f32::INFINITY);
        assert!(!d.is_pinching(HandFinger::Thumb));
        assert!(d.is_pinching(HandFinger::Index));
    }

    #[test]
    fn parallel_index_segments_are_skipped() {
        // Straight index finger: every index bone is parallel to the thumb's
        // last bone.
        let mut d = detector();
        d.update(&frame(Vec3::new(0.02, 0.0, -0.165)), None);
        assert_eq!(d.finger(HandFinger::Thumb).distance(), f32::INFINITY);
    }

    #[test]
    fn hysteresis_through_frames() {
        let mut d = detector();
        let at = |gap: f32| frame(THUMB_TIP + Vec3::new(0.0, -gap, 0.0));
        d.update(&at(0.019), None);
        assert!(d.is_pinching(HandFinger::Index));
        d.update(&at(0.05), None);
        assert!(d.is_pinching(HandFinger::Index));
        d.update(&at(0.07), None);
        assert!(!d.is_pinching(HandFinger::Index));
        assert!(d.is_changed(HandFinger::Index));
    }

    #[test]
    fn quality_mode_follows_head_angle() {
        let mut d = detector();
        let gap = frame(THUMB_TIP + Vec3::new(0.0, -0.018, 0.0));

        // Seen from the thumb side, little finger pointing away.
        let edge_on = HeadPose::new(Vec3::new(0.5, 0.0, 0.0), Vec3::NEG_X);
        d.update(&gap, Some(&edge_on));
        assert_eq!(d.quality_mode(), QualityMode::HighQuality);
        assert!(!d.is_pinching(HandFinger::Index));

        // Seen from the little-finger side.
        let from_pinky = HeadPose::new(Vec3::new(-0.5, 0.0, 0.0), Vec3::X);
        d.update(&gap, Some(&from_pinky));
        assert_eq!(d.quality_mode(), QualityMode::Default);
        d.reset();

        let facing = HeadPose::new(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Y);
        d.update(&gap, Some(&facing));
        assert_eq!(d.quality_mode(), QualityMode::Default);
        assert!(d.is_pinching(HandFinger::Index));

        d.update(&gap, None);
        assert_eq!(d.quality_mode(), QualityMode::Default);
    }

    #[test]
    fn aggregates() {
        let mut d = detector();
        let index_tip = THUMB_TIP + Vec3::new(0.0, -0.01, 0.0);
        d.update(&frame(index_tip), None);

        let center = d.pinch_center();
        assert!((center - (THUMB_TIP + index_tip) * 0.5).length() < 1e-6);
        // Wrist at the origin with identity rotation.
        assert!((d.wrist_offset() - center).length() < 1e-6);
        assert_eq!(d.strongest_finger(), Some(HandFinger::Thumb));
        // Thumb and index are both at full strength.
        assert!((d.grab_point() - (THUMB_TIP + index_tip) * 0.5).length() < 1e-6);
    }

    #[test]
    fn fresh_detector_is_open() {
        let d = detector();
        assert!(!d.any_pinching());
        assert_eq!(d.strongest_finger(), None);
        assert_eq!(d.quality_mode(), QualityMode::Default);
    }

    #[test]
    fn reset_releases_everything() {
        let mut d = detector();
        d.update(&frame(THUMB_TIP + Vec3::new(0.0, -0.01, 0.0)), None);
        d.reset();
        assert!(!d.any_pinching());
        assert_eq!(d.finger(HandFinger::Index).min_distance(), f32::INFINITY);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PinchConfig::default()
            .default_thresholds(PinchThresholds::new(0.2, 0.1, 0.01));
        assert!(PinchDetector::new(config).unwrap_err().is_config_error());
    }

    #[test]
    fn short_source_leaves_state_alone() {
        use hand_retarget::HandSample;
        use hand_types::{Convention, Quat};

        let mut d = detector();
        d.update(&frame(THUMB_TIP + Vec3::new(0.0, -0.01, 0.0)), None);
        let short = HandSample::from_rotations(
            Handedness::Left,
            Convention::Legacy,
            Pose::IDENTITY,
            vec![Quat::IDENTITY; 5],
        );
        assert!(d.update_from(&short, &None::<HeadPose>).is_err());
        assert!(d.is_pinching(HandFinger::Index));
        assert!(d.is_changed(HandFinger::Index));
    }
}
