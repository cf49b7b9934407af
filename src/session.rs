// src/session.rs - Per-frame wiring of source, controller, and sink
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::SynthConfig;
use crate::controller::NoteController;
use crate::data::SessionExporter;
use crate::landmarks::Frame;
use crate::midi::MidiSink;
use crate::source::FrameSource;

/// One run of the pipeline: pulls frames, feeds the controller, forwards
/// events to the MIDI sink, and optionally records everything for export.
///
/// Frames are processed strictly one at a time; the controller's state is
/// touched by nothing else.
pub struct Session<S: MidiSink> {
    controller: NoteController,
    sink: S,
    exporter: Option<SessionExporter>,
    started: Option<Instant>,
    frame_count: u64,
}

impl<S: MidiSink> Session<S> {
    /// `config` must already be validated.
    pub fn new(config: SynthConfig, sink: S, exporter: Option<SessionExporter>) -> Self {
        Self {
            controller: NoteController::new(config),
            sink,
            exporter,
            started: None,
            frame_count: 0,
        }
    }

    /// Drain a frame source to exhaustion, then flush.
    pub fn run(&mut self, source: &mut dyn FrameSource) -> Result<()> {
        while let Some(frame) = source.next_frame() {
            self.process(&frame);
        }
        self.finish()
    }

    /// Process one frame: classify, map, smooth, transition, emit.
    pub fn process(&mut self, frame: &Frame) {
        let started = *self.started.get_or_insert(frame.timestamp);
        let elapsed = frame.timestamp.duration_since(started).as_secs_f64();
        self.frame_count += 1;

        let events = self.controller.process_frame(&frame.hands, frame.timestamp);

        if let Some(exporter) = &mut self.exporter {
            exporter.add_frame(frame.hands.len(), self.controller.is_holding());
            for event in &events {
                exporter.add_event(event, elapsed);
            }
        }
        if !events.is_empty() {
            debug!(frame = self.frame_count, count = events.len(), "emitting events");
        }
        for event in events {
            self.sink.send(event);
        }
    }

    /// Stop any sounding note and write out the session exports. Must run
    /// before the sink is dropped or a lost hand at shutdown leaves the
    /// last note ringing.
    pub fn finish(&mut self) -> Result<()> {
        for event in self.controller.flush() {
            if let Some(exporter) = &mut self.exporter {
                let elapsed = self
                    .started
                    .map(|t| t.elapsed().as_secs_f64())
                    .unwrap_or(0.0);
                exporter.add_event(&event, elapsed);
            }
            self.sink.send(event);
        }

        if let Some(exporter) = &self.exporter {
            let csv_path = exporter.export_csv()?;
            let report_path = exporter.generate_report()?;
            info!("Session data written to {}", csv_path.display());
            info!("Session report written to {}", report_path.display());
        }
        info!(frames = self.frame_count, "session finished");
        Ok(())
    }

    pub fn controller(&self) -> &NoteController {
        &self.controller
    }

    /// Hand the sink back, e.g. to inspect collected events in tests.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NoteState;
    use crate::landmarks::{index, HandObservation, Landmark};
    use crate::midi::{CollectSink, MidiEvent};
    use crate::source::ScriptedSource;
    use std::time::Duration;

    fn open_hand(index_y: f64) -> HandObservation {
        HandObservation::from_fn(|i| match i {
            index::INDEX_FINGER_TIP => Landmark::new(0.5, index_y),
            index::MIDDLE_FINGER_TIP | index::RING_FINGER_TIP | index::PINKY_TIP => {
                Landmark::new(0.5, 0.2)
            }
            _ => Landmark::new(0.5, 0.5),
        })
    }

    #[test]
    fn run_flushes_the_final_note() {
        let t0 = Instant::now();
        let mut source = ScriptedSource::new(vec![Frame::new(
            vec![open_hand(0.3)],
            t0,
        )]);
        let mut session = Session::new(SynthConfig::default(), CollectSink::new(), None);
        session.run(&mut source).unwrap();

        assert_eq!(session.controller().state(), NoteState::Idle);
        let events = session.into_sink().events;
        // 16 note-ons from the frame, 16 note-offs from the flush.
        assert_eq!(events.len(), 32);
        assert!(matches!(events[0], MidiEvent::NoteOn { .. }));
        assert!(matches!(events[16], MidiEvent::NoteOff { .. }));
    }

    #[test]
    fn empty_source_emits_nothing() {
        let mut source = ScriptedSource::new(Vec::new());
        let mut session = Session::new(SynthConfig::default(), CollectSink::new(), None);
        session.run(&mut source).unwrap();
        assert!(session.into_sink().events.is_empty());
    }

    #[test]
    fn hand_loss_mid_script_stops_the_note() {
        let t0 = Instant::now();
        let frames = vec![
            Frame::new(vec![open_hand(0.3)], t0),
            Frame::empty(t0 + Duration::from_millis(200)),
            Frame::empty(t0 + Duration::from_millis(233)),
        ];
        let mut source = ScriptedSource::new(frames);
        let mut session = Session::new(SynthConfig::default(), CollectSink::new(), None);
        session.run(&mut source).unwrap();

        let events = session.into_sink().events;
        let offs = events
            .iter()
            .filter(|e| matches!(e, MidiEvent::NoteOff { .. }))
            .count();
        // One timeout note-off broadcast; the flush finds nothing left.
        assert_eq!(offs, 16);
    }
}
