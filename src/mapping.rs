// src/mapping.rs - Landmark heights to raw pitch / velocity values
use crate::landmarks::{index, HandObservation};

/// Lowest velocity produced by the thumb mapping; keeps quiet notes audible.
pub const VELOCITY_FLOOR: i32 = 30;
pub const VELOCITY_CEIL: i32 = 127;

/// Map one hand observation to raw (unsmoothed) pitch and velocity.
///
/// Index-fingertip height drives pitch, thumb-tip height drives velocity.
/// Both mappings are inverted: y = 0.0 (top of frame) yields the high end
/// of the range, so raising the hand raises the note.
///
/// Outputs are only as constrained as the target ranges; callers clamp to
/// 0..=127 before building MIDI events if the configured note range allows
/// values outside it.
pub fn map_raw(hand: &HandObservation, min_note: i32, max_note: i32) -> (i32, i32) {
    let raw_pitch = interp(
        hand.landmark(index::INDEX_FINGER_TIP).y,
        max_note as f64,
        min_note as f64,
    );
    let raw_velocity = interp(
        hand.landmark(index::THUMB_TIP).y,
        VELOCITY_CEIL as f64,
        VELOCITY_FLOOR as f64,
    );
    (raw_pitch, raw_velocity)
}

/// Linear interpolation of `t` in 0..=1 onto `at_zero`..`at_one`, rounded
/// to the nearest integer. Inputs outside 0..=1 clamp to the endpoints,
/// matching how the pose oracle's occasional out-of-frame coordinates are
/// treated.
fn interp(t: f64, at_zero: f64, at_one: f64) -> i32 {
    let t = t.clamp(0.0, 1.0);
    (at_zero + (at_one - at_zero) * t).round() as i32
}
