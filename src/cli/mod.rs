//! CLI argument definitions and command dispatch.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Stickmap - render HOTAS profile bindings onto SVG device diagrams.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "stickmap", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "STICKMAP_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Template store database path (defaults to the config directory)
    #[arg(long, global = true, env = "STICKMAP_DB")]
    pub db: Option<PathBuf>,

    /// Settings file path (defaults to the config directory)
    #[arg(long, global = true, env = "STICKMAP_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Profile Inspection ===
    /// List device names in a profile, in document order
    Devices(DevicesArgs),

    /// List the document-wide mode names of a profile
    Modes(ModesArgs),

    /// Parse a profile and print its button-to-function dictionary
    Show(ShowArgs),

    // === Template Store ===
    /// Associate an SVG template with a device
    SetTemplate(SetTemplateArgs),

    /// List stored device/template associations
    Templates,

    /// Remove a stored template association
    RemoveTemplate(RemoveTemplateArgs),

    // === Export ===
    /// Parse profiles and render their bindings onto SVG diagrams
    Export(ExportArgs),

    // === Meta ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(clap::Args, Debug)]
pub struct DevicesArgs {
    /// Profile file (Joystick Gremlin XML)
    pub profile: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ModesArgs {
    /// Profile file (Joystick Gremlin XML)
    pub profile: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Profile file (Joystick Gremlin XML)
    pub profile: PathBuf,

    /// Only include the named modes (repeatable)
    #[arg(long = "mode", value_name = "NAME")]
    pub modes: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct SetTemplateArgs {
    /// Device identifier (device name, or a GUID for formats that carry one)
    pub device_id: String,

    /// SVG template file
    pub svg: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct RemoveTemplateArgs {
    /// Device identifier
    pub device_id: String,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Profile files to process
    #[arg(required = true)]
    pub profiles: Vec<PathBuf>,

    /// Only include the named modes (repeatable)
    #[arg(long = "mode", value_name = "NAME")]
    pub modes: Vec<String>,

    /// Output directory for rendered diagrams
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
