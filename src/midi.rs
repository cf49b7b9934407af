// src/midi.rs - MIDI event type and output sinks
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Channels a note event is broadcast on. Downstream channel filters are
/// unknown, so every note goes out on all sixteen.
pub const CHANNEL_COUNT: u8 = 16;

/// One immutable MIDI event, emitted once and handed straight to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { pitch: u8, velocity: u8, channel: u8 },
    NoteOff { pitch: u8, channel: u8 },
}

impl MidiEvent {
    pub fn pitch(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { pitch, .. } | MidiEvent::NoteOff { pitch, .. } => pitch,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. } | MidiEvent::NoteOff { channel, .. } => channel,
        }
    }

    /// Raw channel-voice message bytes.
    pub fn to_bytes(&self) -> [u8; 3] {
        match *self {
            MidiEvent::NoteOn {
                pitch,
                velocity,
                channel,
            } => [0x90 | (channel & 0x0F), pitch & 0x7F, velocity & 0x7F],
            MidiEvent::NoteOff { pitch, channel } => {
                [0x80 | (channel & 0x0F), pitch & 0x7F, 0]
            }
        }
    }
}

/// Where emitted events go. Transport failures stay on this side of the
/// boundary; the pipeline never sees them.
pub trait MidiSink {
    fn send(&mut self, event: MidiEvent);
}

impl MidiSink for Box<dyn MidiSink> {
    fn send(&mut self, event: MidiEvent) {
        (**self).send(event)
    }
}

// ── midir backend ─────────────────────────────────────────────────────────

pub struct MidirSink {
    conn: midir::MidiOutputConnection,
}

impl MidiSink for MidirSink {
    fn send(&mut self, event: MidiEvent) {
        if let Err(e) = self.conn.send(&event.to_bytes()) {
            warn!("MIDI send failed: {}", e);
        }
    }
}

// ── null backend (dry runs, missing hardware) ─────────────────────────────

pub struct NullSink;

impl MidiSink for NullSink {
    fn send(&mut self, _event: MidiEvent) {}
}

// ── collecting backend (tests, offline analysis) ──────────────────────────

/// Buffers every event it receives.
#[derive(Default)]
pub struct CollectSink {
    pub events: Vec<MidiEvent>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MidiSink for CollectSink {
    fn send(&mut self, event: MidiEvent) {
        self.events.push(event);
    }
}

// ── port enumeration / opening ────────────────────────────────────────────

/// Names of the available MIDI output ports, in port order.
pub fn list_output_ports() -> Result<Vec<String>> {
    let midi_out = midir::MidiOutput::new("hand_synth").context("Failed to initialize MIDI")?;
    Ok(midi_out
        .ports()
        .iter()
        .map(|p| {
            midi_out
                .port_name(p)
                .unwrap_or_else(|_| "Unknown".to_string())
        })
        .collect())
}

/// Open the output port at `index` (as reported by [`list_output_ports`]).
pub fn open_output_port(index: usize) -> Result<MidirSink> {
    let midi_out = midir::MidiOutput::new("hand_synth").context("Failed to initialize MIDI")?;
    let ports = midi_out.ports();
    let port = ports
        .get(index)
        .with_context(|| format!("No MIDI output port at index {}", index))?;
    let name = midi_out
        .port_name(port)
        .unwrap_or_else(|_| "Unknown".to_string());
    let conn = midi_out
        .connect(port, "hand_synth-out")
        .map_err(|e| anyhow::anyhow!("Failed to connect to MIDI port {}: {}", name, e))?;
    info!("Connected to MIDI port: {}", name);
    Ok(MidirSink { conn })
}
