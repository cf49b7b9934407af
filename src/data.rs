// src/data.rs - Session recording and export
use crate::midi::MidiEvent;
use anyhow::Result;
use chrono::Local;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// One emitted MIDI event, annotated with when in the session it happened.
#[derive(Debug, Serialize)]
struct EventRecord {
    frame: u64,
    elapsed_secs: f64,
    kind: &'static str,
    pitch: u8,
    velocity: Option<u8>,
    channel: u8,
}

/// Per-frame pipeline summary used for the session report.
#[derive(Debug, Clone, Copy)]
struct FrameStats {
    hands: usize,
    holding: bool,
}

/// Accumulates everything a session emits and writes it out on demand as a
/// CSV event log plus an HTML summary report.
pub struct SessionExporter {
    output_dir: PathBuf,
    session_name: String,
    events: Vec<EventRecord>,
    frames: Vec<FrameStats>,
}

impl SessionExporter {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name
            .unwrap_or_else(|| format!("session_{}", Local::now().format("%Y%m%d_%H%M%S")));

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            events: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn add_frame(&mut self, hands: usize, holding: bool) {
        self.frames.push(FrameStats { hands, holding });
    }

    pub fn add_event(&mut self, event: &MidiEvent, elapsed_secs: f64) {
        let frame = self.frames.len().saturating_sub(1) as u64;
        let record = match *event {
            MidiEvent::NoteOn {
                pitch,
                velocity,
                channel,
            } => EventRecord {
                frame,
                elapsed_secs,
                kind: "note_on",
                pitch,
                velocity: Some(velocity),
                channel,
            },
            MidiEvent::NoteOff { pitch, channel } => EventRecord {
                frame,
                elapsed_secs,
                kind: "note_off",
                pitch,
                velocity: None,
                channel,
            },
        };
        self.events.push(record);
    }

    pub fn export_csv(&self) -> Result<PathBuf> {
        let csv_path = self
            .output_dir
            .join(&self.session_name)
            .join("midi_events.csv");

        if let Some(parent) = csv_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&csv_path)?;
        let mut writer = Writer::from_writer(file);
        for record in &self.events {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(csv_path)
    }

    pub fn generate_report(&self) -> Result<PathBuf> {
        let report_path = self
            .output_dir
            .join(&self.session_name)
            .join("report.html");

        if let Some(parent) = report_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&report_path, self.create_html_report())?;
        Ok(report_path)
    }

    fn create_html_report(&self) -> String {
        let total_frames = self.frames.len();
        let frames_with_hands = self.frames.iter().filter(|f| f.hands > 0).count();
        let frames_holding = self.frames.iter().filter(|f| f.holding).count();
        let note_ons = self.events.iter().filter(|e| e.kind == "note_on").count();
        let note_offs = self.events.iter().filter(|e| e.kind == "note_off").count();
        let visibility = if total_frames == 0 {
            0.0
        } else {
            frames_with_hands as f64 / total_frames as f64 * 100.0
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Hand Synth Report - {}</title>
    <style>
        body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 40px; background: #f5f5f5; }}
        h1 {{ color: #333; }}
        .stats {{ background: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        .stat-item {{ margin: 10px 0; }}
        .stat-label {{ font-weight: bold; color: #666; }}
        .stat-value {{ color: #4682EA; font-size: 1.2em; }}
    </style>
</head>
<body>
    <h1>Hand Synth Session Report</h1>
    <div class="stats">
        <h2>Session: {}</h2>
        <div class="stat-item">
            <span class="stat-label">Total Frames:</span>
            <span class="stat-value">{}</span>
        </div>
        <div class="stat-item">
            <span class="stat-label">Hand Visibility:</span>
            <span class="stat-value">{:.1}%</span>
        </div>
        <div class="stat-item">
            <span class="stat-label">Frames Holding (fist):</span>
            <span class="stat-value">{}</span>
        </div>
        <div class="stat-item">
            <span class="stat-label">Notes Started:</span>
            <span class="stat-value">{}</span>
        </div>
        <div class="stat-item">
            <span class="stat-label">Notes Stopped:</span>
            <span class="stat-value">{}</span>
        </div>
    </div>
</body>
</html>
"#,
            self.session_name, self.session_name, total_frames, visibility, frames_holding,
            note_ons, note_offs
        )
    }
}
