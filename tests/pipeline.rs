//! End-to-end pipeline tests: scripted frame sequences in, MIDI events out.

use std::time::{Duration, Instant};

use hand_synth::config::SynthConfig;
use hand_synth::landmarks::{index, Frame, HandObservation, Landmark};
use hand_synth::midi::{CollectSink, MidiEvent};
use hand_synth::session::Session;
use hand_synth::source::ScriptedSource;

/// Full-range config with no smoothing so scripted pitches land exactly.
fn test_config() -> SynthConfig {
    SynthConfig {
        min_note: 0,
        max_note: 127,
        smoothing_window: 1,
        note_change_threshold: 6,
        idle_timeout_secs: 0.1,
    }
}

fn open_hand_at(pitch: i32) -> HandObservation {
    let y = (127 - pitch) as f64 / 127.0;
    HandObservation::from_fn(|i| match i {
        index::INDEX_FINGER_TIP => Landmark::new(0.5, y),
        index::THUMB_TIP => Landmark::new(0.4, 0.3),
        index::MIDDLE_FINGER_TIP | index::RING_FINGER_TIP | index::PINKY_TIP => {
            Landmark::new(0.5, 0.2)
        }
        _ => Landmark::new(0.5, 0.5),
    })
}

fn fist_at(pitch: i32) -> HandObservation {
    let y = (127 - pitch) as f64 / 127.0;
    HandObservation::from_fn(|i| match i {
        index::INDEX_FINGER_TIP => Landmark::new(0.5, y),
        index::INDEX_FINGER_PIP => Landmark::new(0.5, y - 0.2),
        index::THUMB_TIP => Landmark::new(0.4, 0.3),
        index::MIDDLE_FINGER_TIP | index::RING_FINGER_TIP | index::PINKY_TIP => {
            Landmark::new(0.5, 0.9)
        }
        _ => Landmark::new(0.5, 0.5),
    })
}

fn run_script(frames: Vec<Frame>) -> Vec<MidiEvent> {
    let mut source = ScriptedSource::new(frames);
    let mut session = Session::new(test_config(), CollectSink::new(), None);
    session.run(&mut source).expect("session run failed");
    session.into_sink().events
}

fn channel0(events: &[MidiEvent]) -> Vec<MidiEvent> {
    events
        .iter()
        .copied()
        .filter(|e| e.channel() == 0)
        .collect()
}

#[test]
fn glide_retriggers_only_past_the_threshold() {
    let t0 = Instant::now();
    // Pitch climbs to 65 (all diffs below the threshold of 6), then
    // reaches 67 where 67 - 60 = 7 finally crosses it.
    let frames: Vec<Frame> = [60, 61, 62, 63, 64, 65, 67]
        .iter()
        .enumerate()
        .map(|(i, &pitch)| {
            Frame::new(
                vec![open_hand_at(pitch)],
                t0 + Duration::from_millis(33 * i as u64),
            )
        })
        .collect();

    let events = run_script(frames);
    let ch0 = channel0(&events);

    // Note-on at 60, nothing until 67 (diff 7 >= 6), then the flush.
    assert_eq!(
        ch0,
        vec![
            MidiEvent::NoteOn {
                pitch: 60,
                velocity: 98,
                channel: 0
            },
            MidiEvent::NoteOff {
                pitch: 60,
                channel: 0
            },
            MidiEvent::NoteOn {
                pitch: 67,
                velocity: 98,
                channel: 0
            },
            MidiEvent::NoteOff {
                pitch: 67,
                channel: 0
            },
        ]
    );
}

#[test]
fn fist_freezes_the_glide() {
    let t0 = Instant::now();
    let frames = vec![
        Frame::new(vec![open_hand_at(60)], t0),
        Frame::new(vec![fist_at(80)], t0 + Duration::from_millis(33)),
        Frame::new(vec![fist_at(110)], t0 + Duration::from_millis(66)),
        Frame::new(vec![open_hand_at(110)], t0 + Duration::from_millis(99)),
    ];

    let events = run_script(frames);
    let ons: Vec<u8> = channel0(&events)
        .iter()
        .filter_map(|e| match e {
            MidiEvent::NoteOn { pitch, .. } => Some(*pitch),
            _ => None,
        })
        .collect();

    // The fist frames emit nothing; the note jumps 60 -> 110 only on release.
    assert_eq!(ons, vec![60, 110]);
}

#[test]
fn tracking_loss_respects_the_grace_period() {
    let t0 = Instant::now();

    // Hand gone for 90 ms: within the grace period, note keeps sounding.
    let events = run_script(vec![
        Frame::new(vec![open_hand_at(60)], t0),
        Frame::empty(t0 + Duration::from_millis(90)),
    ]);
    let ch0 = channel0(&events);
    // On at 60, then only the shutdown flush off.
    assert_eq!(ch0.len(), 2);
    assert!(matches!(ch0[1], MidiEvent::NoteOff { pitch: 60, .. }));

    // Hand gone for 150 ms: the timeout fires inside the script.
    let events = run_script(vec![
        Frame::new(vec![open_hand_at(60)], t0),
        Frame::empty(t0 + Duration::from_millis(150)),
        Frame::empty(t0 + Duration::from_millis(183)),
    ]);
    let offs = events
        .iter()
        .filter(|e| matches!(e, MidiEvent::NoteOff { .. }))
        .count();
    // Exactly one broadcast note-off; the flush has nothing left to stop.
    assert_eq!(offs, 16);
}

#[test]
fn every_event_is_broadcast_on_all_sixteen_channels() {
    let t0 = Instant::now();
    let events = run_script(vec![Frame::new(vec![open_hand_at(60)], t0)]);

    let on_channels: Vec<u8> = events
        .iter()
        .filter(|e| matches!(e, MidiEvent::NoteOn { .. }))
        .map(|e| e.channel())
        .collect();
    assert_eq!(on_channels, (0..16).collect::<Vec<u8>>());
}

#[test]
fn note_off_always_precedes_replacement_note_on() {
    let t0 = Instant::now();
    let frames = vec![
        Frame::new(vec![open_hand_at(60)], t0),
        Frame::new(vec![open_hand_at(90)], t0 + Duration::from_millis(33)),
        Frame::new(vec![open_hand_at(40)], t0 + Duration::from_millis(66)),
    ];
    let events = run_script(frames);

    // Scan for the invariant: a note-on may only appear when no other note
    // is active, i.e. each replacement's offs come before its ons.
    let mut active: Option<u8> = None;
    for event in channel0(&events) {
        match event {
            MidiEvent::NoteOn { pitch, .. } => {
                assert!(active.is_none(), "note-on for {} while {:?} active", pitch, active);
                active = Some(pitch);
            }
            MidiEvent::NoteOff { pitch, .. } => {
                assert_eq!(active, Some(pitch));
                active = None;
            }
        }
    }
    assert_eq!(active, None, "session must end with no sounding note");
}
