// src/gesture.rs - Closed-fist detection from a single frame's landmarks
use crate::landmarks::{index, HandObservation};

/// Tip / middle-phalanx landmark pairs for the four non-thumb fingers.
const FINGER_PAIRS: [(usize, usize); 4] = [
    (index::INDEX_FINGER_TIP, index::INDEX_FINGER_PIP),
    (index::MIDDLE_FINGER_TIP, index::MIDDLE_FINGER_PIP),
    (index::RING_FINGER_TIP, index::RING_FINGER_PIP),
    (index::PINKY_TIP, index::PINKY_PIP),
];

/// True iff the hand is a closed fist: every fingertip sits strictly below
/// its middle phalanx in image coordinates (larger y = lower on screen =
/// finger curled down).
///
/// Deliberately unsmoothed; the hold gesture flips frame-to-frame.
pub fn is_fist(hand: &HandObservation) -> bool {
    FINGER_PAIRS
        .iter()
        .all(|&(tip, mid)| hand.landmark(tip).y > hand.landmark(mid).y)
}
