// src/source.rs - Synchronous frame sources feeding the pipeline
use std::time::Instant;

use crate::landmarks::{index, Frame, HandObservation, Landmark};

/// Pull-based supplier of per-frame observations.
///
/// Camera capture and pose inference live behind this boundary; the
/// pipeline only ever sees ready-made landmark sets. `None` means the
/// source is exhausted and the session should shut down.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Frame>;
}

/// Synthetic hand driven by sine waves, for running the full pipeline with
/// no camera or pose model attached.
///
/// The index fingertip sweeps up and down the frame (pitch), the thumb
/// drifts on a slower cycle (velocity), and once per period the hand curls
/// into a fist for a while to exercise the hold gesture. Periodically the
/// hand "leaves the frame" so the idle timeout fires too.
pub struct SimHandSource {
    t: f64,
    dt: f64,
    frames_left: usize,
    paced: bool,
}

impl SimHandSource {
    /// A source producing `frames` frames at the given frame rate, as fast
    /// as the caller pulls them.
    pub fn new(frames: usize, fps: f64) -> Self {
        Self {
            t: 0.0,
            dt: 1.0 / fps.max(1.0),
            frames_left: frames,
            paced: false,
        }
    }

    /// Like [`new`](Self::new), but `next_frame` sleeps out the frame
    /// interval, mimicking a blocking camera read.
    pub fn paced(frames: usize, fps: f64) -> Self {
        Self {
            paced: true,
            ..Self::new(frames, fps)
        }
    }

    fn synthetic_hand(t: f64) -> Option<HandObservation> {
        // Vanish for half a second out of every six.
        if (t % 6.0) > 5.5 {
            return None;
        }

        let index_y = 0.5 + 0.4 * (t * 0.7).sin();
        let thumb_y = 0.5 + 0.3 * (t * 0.23).cos();
        // Fist for one second out of every four.
        let fist = (t % 4.0) < 1.0;

        Some(HandObservation::from_fn(|i| match i {
            index::INDEX_FINGER_TIP => Landmark::new(0.5, index_y),
            index::THUMB_TIP => Landmark::new(0.42, thumb_y),
            index::MIDDLE_FINGER_TIP | index::RING_FINGER_TIP | index::PINKY_TIP => {
                if fist {
                    Landmark::new(0.5, 0.85)
                } else {
                    Landmark::new(0.5, 0.25)
                }
            }
            index::INDEX_FINGER_PIP => {
                if fist {
                    Landmark::new(0.5, index_y - 0.1)
                } else {
                    Landmark::new(0.5, index_y + 0.1)
                }
            }
            _ => Landmark::new(0.5, 0.5),
        }))
    }
}

impl FrameSource for SimHandSource {
    fn next_frame(&mut self) -> Option<Frame> {
        if self.frames_left == 0 {
            return None;
        }
        self.frames_left -= 1;

        if self.paced {
            std::thread::sleep(std::time::Duration::from_secs_f64(self.dt));
        }
        let hands = Self::synthetic_hand(self.t).into_iter().collect();
        self.t += self.dt;
        Some(Frame::new(hands, Instant::now()))
    }
}

/// Replays a pre-built frame sequence. Used by the integration tests and
/// for reproducing recorded sessions offline.
pub struct ScriptedSource {
    frames: std::vec::IntoIter<Frame>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Option<Frame> {
        self.frames.next()
    }
}
