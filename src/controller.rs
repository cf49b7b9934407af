// src/controller.rs - Note lifecycle state machine
use std::time::Instant;

use tracing::debug;

use crate::config::SynthConfig;
use crate::gesture::is_fist;
use crate::landmarks::HandObservation;
use crate::mapping::map_raw;
use crate::midi::{MidiEvent, CHANNEL_COUNT};
use crate::smoothing::SmoothingBuffer;

/// The sounding-note state carried across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    Idle,
    Active { pitch: i32, velocity: i32 },
}

/// Per-frame decision engine: consumes hand observations, produces the MIDI
/// events for that frame.
///
/// Owns the only mutable state in the pipeline: the note state, the hold
/// flag, the last-change timestamp, and the two smoothing buffers. All
/// history lives here, never in ambient globals, so independent controllers
/// can coexist and tests can drive one deterministically.
pub struct NoteController {
    config: SynthConfig,
    state: NoteState,
    holding: bool,
    last_change: Option<Instant>,
    pitch_smoother: SmoothingBuffer,
    velocity_smoother: SmoothingBuffer,
}

impl NoteController {
    /// `config` must already be validated (see [`SynthConfig::validate`]).
    pub fn new(config: SynthConfig) -> Self {
        let window = config.smoothing_window;
        Self {
            config,
            state: NoteState::Idle,
            holding: false,
            last_change: None,
            pitch_smoother: SmoothingBuffer::new(window),
            velocity_smoother: SmoothingBuffer::new(window),
        }
    }

    pub fn state(&self) -> NoteState {
        self.state
    }

    /// Pitch and velocity of the sounding note, if any.
    pub fn active_note(&self) -> Option<(i32, i32)> {
        match self.state {
            NoteState::Active { pitch, velocity } => Some((pitch, velocity)),
            NoteState::Idle => None,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    /// Process one frame's observations and return the events to emit, in
    /// order.
    ///
    /// When several hands are observed in one frame each is processed in
    /// sequence and each can independently trigger a note change; the state
    /// reflects whichever hand came last in the frame's hand list. There is
    /// no per-hand note ownership (inherited ambiguity, see DESIGN.md).
    pub fn process_frame(&mut self, hands: &[HandObservation], now: Instant) -> Vec<MidiEvent> {
        let mut events = Vec::new();

        if hands.is_empty() {
            self.on_hand_absent(now, &mut events);
        } else {
            for hand in hands {
                self.on_hand(hand, now, &mut events);
            }
        }

        events
    }

    /// Stop any sounding note. Call on shutdown so tracking loss at exit
    /// cannot leave a stuck note on the synth.
    pub fn flush(&mut self) -> Vec<MidiEvent> {
        let mut events = Vec::new();
        if let NoteState::Active { pitch, .. } = self.state {
            debug!("Flushing active note {}", pitch);
            broadcast_note_off(pitch, &mut events);
            self.state = NoteState::Idle;
            self.last_change = None;
        }
        events
    }

    fn on_hand(&mut self, hand: &HandObservation, now: Instant, events: &mut Vec<MidiEvent>) {
        self.holding = is_fist(hand);

        let (raw_pitch, raw_velocity) = map_raw(hand, self.config.min_note, self.config.max_note);
        let pitch = self.pitch_smoother.push(raw_pitch);
        let velocity = self.velocity_smoother.push(raw_velocity);
        debug!(
            raw_pitch,
            raw_velocity, pitch, velocity, holding = self.holding, "hand observed"
        );

        if self.holding {
            // Fist freezes the sounding note regardless of pitch movement.
            return;
        }

        let change = match self.state {
            NoteState::Idle => true,
            NoteState::Active {
                pitch: prev_pitch, ..
            } => (pitch - prev_pitch).abs() >= self.config.note_change_threshold,
        };
        if !change {
            return;
        }

        if let NoteState::Active {
            pitch: prev_pitch, ..
        } = self.state
        {
            broadcast_note_off(prev_pitch, events);
        }
        broadcast_note_on(pitch, velocity, events);
        debug!(pitch, velocity, "note changed");
        self.state = NoteState::Active { pitch, velocity };
        self.last_change = Some(now);
    }

    fn on_hand_absent(&mut self, now: Instant, events: &mut Vec<MidiEvent>) {
        let NoteState::Active { pitch, .. } = self.state else {
            return;
        };
        let Some(last_change) = self.last_change else {
            return;
        };
        if now.duration_since(last_change) > self.config.idle_timeout() {
            debug!(pitch, "hand lost, stopping note");
            broadcast_note_off(pitch, events);
            self.state = NoteState::Idle;
            self.last_change = None;
        }
    }
}

/// Note-on across every channel; downstream channel routing is unknown, so
/// the same note goes out on all sixteen.
fn broadcast_note_on(pitch: i32, velocity: i32, events: &mut Vec<MidiEvent>) {
    let pitch = pitch.clamp(0, 127) as u8;
    let velocity = velocity.clamp(0, 127) as u8;
    for channel in 0..CHANNEL_COUNT {
        events.push(MidiEvent::NoteOn {
            pitch,
            velocity,
            channel,
        });
    }
}

fn broadcast_note_off(pitch: i32, events: &mut Vec<MidiEvent>) {
    let pitch = pitch.clamp(0, 127) as u8;
    for channel in 0..CHANNEL_COUNT {
        events.push(MidiEvent::NoteOff { pitch, channel });
    }
}
