// src/main.rs
use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::warn;

use hand_synth::config::SynthConfig;
use hand_synth::data::SessionExporter;
use hand_synth::midi::{self, MidiSink, NullSink};
use hand_synth::session::Session;
use hand_synth::source::SimHandSource;

const SIM_FPS: f64 = 30.0;
const SIM_SECONDS: usize = 30;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    let dry_run = args.iter().any(|a| a == "--dry-run");
    let no_export = args.iter().any(|a| a == "--no-export");
    let config_path = args.iter().find(|a| !a.starts_with("--"));

    let config = match config_path {
        Some(path) => SynthConfig::load(path)?,
        None => SynthConfig::default(),
    };
    config.validate().context("Invalid session configuration")?;

    let sink = if dry_run {
        println!("Dry run: MIDI events will be discarded.");
        Box::new(NullSink) as Box<dyn MidiSink>
    } else {
        select_midi_sink()?
    };

    let exporter = if no_export {
        None
    } else {
        let output_dir = directories::UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(|p| p.join("HandSynth")))
            .unwrap_or_else(|| std::path::PathBuf::from("./output"));
        Some(SessionExporter::new(output_dir, None))
    };

    // No camera attached in this build: a synthetic hand sweeps the frame,
    // closing into a fist and dropping out of view on a fixed cycle.
    let mut source = SimHandSource::paced((SIM_SECONDS as f64 * SIM_FPS) as usize, SIM_FPS);

    let mut session = Session::new(config, sink, exporter);
    session.run(&mut source)?;

    println!("Program ended.");
    Ok(())
}

/// List the available MIDI output ports and let the user pick one. Falls
/// back to a null sink when nothing is connected.
fn select_midi_sink() -> Result<Box<dyn MidiSink>> {
    println!("=== MIDI Port Detection ===");
    let ports = match midi::list_output_ports() {
        Ok(ports) => ports,
        Err(e) => {
            warn!("MIDI init failed: {} - events will be discarded", e);
            return Ok(Box::new(NullSink));
        }
    };

    if ports.is_empty() {
        println!("No MIDI ports available. Connect a MIDI device or start a softsynth");
        println!("(e.g. `timidity -iA` or `fluidsynth` on Linux). Continuing silently.");
        return Ok(Box::new(NullSink));
    }

    println!("Available MIDI ports:");
    for (i, name) in ports.iter().enumerate() {
        println!("  [{}] {}", i, name);
    }
    print!("Enter the number of the MIDI port you want to use: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let index: usize = line
        .trim()
        .parse()
        .context("Expected a MIDI port number")?;

    let sink = midi::open_output_port(index)?;
    Ok(Box::new(sink))
}

fn print_usage() {
    println!("hand_synth [CONFIG.json] [--dry-run] [--no-export]");
    println!();
    println!("  CONFIG.json   optional session config (note range, smoothing window,");
    println!("                note-change threshold, idle timeout)");
    println!("  --dry-run     run without opening a MIDI port");
    println!("  --no-export   skip the CSV / report session export");
}
