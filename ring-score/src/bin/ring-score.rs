use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use ring_score::{convert, midi::MidiFile, render::RenderSettings};

/// Convert note-event timeline (`MIDIFile` as XML or JSON) to ringtone voices.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Input file, `.xml` or JSON.
    input: PathBuf,
    /// JSON file with render settings.
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// Overrides delimiter between tokens.
    #[arg(short, long)]
    delimiter: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let mut settings = match &args.settings {
        None => RenderSettings::default(),
        Some(path) => match RenderSettings::from_path(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        },
    };
    if let Some(delimiter) = args.delimiter {
        settings.delimiter = delimiter;
    }
    let file = match MidiFile::from_path(&args.input) {
        Ok(file) => file,
        Err(err) => {
            log::error!("{}: {}", args.input.display(), err);
            return ExitCode::FAILURE;
        }
    };
    let score = convert(&file, &settings);
    print!("{}", score);
    match score.has_errors() {
        true => ExitCode::FAILURE,
        false => ExitCode::SUCCESS,
    }
}
