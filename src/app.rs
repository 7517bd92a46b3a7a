//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands::{self, logs::DEFAULT_LINES, SampleRequest};
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

/// An audio-driven waveform visualizer for the terminal
#[derive(Parser)]
#[command(name = "siriwave")]
#[command(version)]
#[command(about = "An audio-driven waveform visualizer for the terminal")]
#[command(long_about = "An audio-driven waveform visualizer for the terminal.\n\nSeveral phase-shifted sine waves follow the microphone level, fading\ntoward the back.\n\nDEFAULT COMMAND:\n    If no command is specified, 'listen' is used by default.\n\nKEYS:\n    Space   pause/resume listening\n    o       toggle oscillation\n    q/Esc   quit\n\nSIGNALS:\n    SIGUSR1 toggles oscillation, e.g. `pkill -USR1 siriwave`\n\nEXAMPLES:\n    $ siriwave\n    $ siriwave --device 2\n    $ siriwave demo\n    $ siriwave sample --width 600 --amplitude 0.8 > frame.tsv")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/siriwave/siriwave.toml\n    Logs:               ~/.local/state/siriwave/siriwave.log.*"
)]
struct Cli {
    /// Input device name or ID, overrides the config file (listen)
    #[arg(short, long, value_name = "DEVICE", global = true)]
    device: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the waveform driven by the microphone (default)
    ///
    /// Space pauses listening, 'o' toggles oscillation, Escape/q quits.
    /// `--device` overrides the configured input device.
    #[command(visible_alias = "l")]
    Listen,

    /// Show the waveform driven by a synthetic speech-like level
    ///
    /// Needs no microphone. Space pauses the generator.
    Demo,

    /// Print the points of one frame as tab-separated values
    ///
    /// Columns: wave, depth, x, y. Wave 0 is the foreground wave.
    Sample {
        /// Width of the drawing area
        #[arg(long, default_value_t = 300.0)]
        width: f64,

        /// Height of the drawing area
        #[arg(long, default_value_t = 100.0)]
        height: f64,

        /// Input level in [0, 1]
        #[arg(short, long, default_value_t = 0.5)]
        amplitude: f64,

        /// Frames to advance before sampling
        #[arg(short, long, default_value_t = 0)]
        frames: u32,

        /// Only print this wave
        #[arg(short, long, value_name = "N")]
        wave: Option<u32>,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// List available audio input devices
    ///
    /// Shows device IDs and names for --device or the [audio] table.
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries from the application
    Logs {
        /// Number of lines to show
        #[arg(short = 'n', long, default_value_t = DEFAULT_LINES)]
        lines: usize,
    },

    /// Generate shell completion script
    ///
    /// Examples:
    ///   siriwave completions bash > siriwave.bash
    ///   siriwave completions zsh > _siriwave
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails (config, audio device, terminal)
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that print to the terminal and need no logging
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "siriwave", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => return commands::handle_list_devices(),
        Some(Commands::Logs { lines }) => return commands::handle_logs(*lines),
        _ => {}
    }

    logging::init_logging()?;

    match cli.command {
        None | Some(Commands::Listen) => commands::handle_listen(cli.device).await,
        Some(Commands::Demo) => commands::handle_demo().await,
        Some(Commands::Sample {
            width,
            height,
            amplitude,
            frames,
            wave,
        }) => commands::handle_sample(SampleRequest {
            width,
            height,
            amplitude,
            frames,
            wave,
        }),
        Some(Commands::Config) => commands::handle_config(),
        Some(Commands::Completions { .. } | Commands::ListDevices | Commands::Logs { .. }) => {
            unreachable!("These commands are handled earlier")
        }
    }
}
