//! # hand_synth
//!
//! Turns a stream of hand-pose observations (21 landmarks per hand, one set
//! per video frame) into note-on/note-off MIDI events.
//!
//! ## Pipeline
//!
//! Each frame flows through one synchronous pass:
//!
//! 1. [`gesture::is_fist`] classifies the hand as held (fist) or open.
//! 2. [`mapping::map_raw`] turns index-fingertip height into a raw pitch
//!    and thumb-tip height into a raw velocity.
//! 3. Two [`smoothing::SmoothingBuffer`]s average the raw streams to
//!    suppress landmark jitter.
//! 4. [`controller::NoteController`] decides whether to replace the
//!    sounding note (hysteresis via the note-change threshold), hold it
//!    (fist), or stop it (hand lost past the idle timeout), and emits the
//!    frame's MIDI events.
//!
//! Camera capture and pose inference sit behind the [`source::FrameSource`]
//! trait; MIDI transport sits behind [`midi::MidiSink`]. The shipped binary
//! drives the pipeline from a synthetic hand simulator, so no hardware is
//! required to hear it play.

pub mod config;
pub mod controller;
pub mod data;
pub mod gesture;
pub mod landmarks;
pub mod mapping;
pub mod midi;
pub mod session;
pub mod smoothing;
pub mod source;
