//! Stickmap CLI - render HOTAS profile bindings onto SVG device diagrams.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use tracing::{info, warn};

use stickmap::adaptor::JoystickGremlin;
use stickmap::cli::{Cli, Commands, ExportArgs, ShowArgs};
use stickmap::error::{Result, StickmapError};
use stickmap::export::Exporter;
use stickmap::output::{self, Output, VersionInfo};
use stickmap::settings::{self, Settings};
use stickmap::template::TemplateDb;
use stickmap::{logging, state};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> &'static str {
        option_env!("VERGEN_GIT_DIRTY").unwrap_or("false")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();

    logging::init_logging(cli.use_json(), cli.verbose, cli.quiet);

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }

    let out = output::for_cli(&cli);
    if let Err(e) = run(&cli, out.as_ref()) {
        out.error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, out: &dyn Output) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Devices(args)) => cmd_devices(out, &args.profile),
        Some(Commands::Modes(args)) => cmd_modes(out, &args.profile),
        Some(Commands::Show(args)) => cmd_show(cli, out, args),
        Some(Commands::SetTemplate(args)) => {
            cmd_set_template(cli, out, &args.device_id, &args.svg)
        }
        Some(Commands::Templates) => cmd_templates(cli, out),
        Some(Commands::RemoveTemplate(args)) => cmd_remove_template(cli, out, &args.device_id),
        Some(Commands::Export(args)) => cmd_export(cli, out, args),
        Some(Commands::Version) => cmd_version(out),
        Some(Commands::Completions(args)) => {
            cmd_completions(args.shell);
            Ok(())
        }
    }
}

// === Shared helpers ===

fn load_settings(cli: &Cli) -> Result<Settings> {
    match &cli.settings {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
}

/// Open the template store, honoring `--db` over the settings override.
fn open_template_db(cli: &Cli, settings: &Settings) -> Result<TemplateDb> {
    let path = match &cli.db {
        Some(path) => path.clone(),
        None => {
            let path = settings.template_db_path()?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            path
        }
    };
    TemplateDb::open(path)
}

fn profile_id(path: &Path) -> String {
    path.display().to_string()
}

fn mode_filter(modes: &[String]) -> HashSet<String> {
    modes.iter().cloned().collect()
}

// === Commands ===

fn cmd_devices(out: &dyn Output, profile: &Path) -> Result<()> {
    let gremlin = JoystickGremlin::open(profile)?;
    if !gremlin.has_devices() {
        out.warning("Profile contains no devices");
    }
    out.device_list(&profile_id(profile), &gremlin.device_names());
    Ok(())
}

fn cmd_modes(out: &dyn Output, profile: &Path) -> Result<()> {
    let gremlin = JoystickGremlin::open(profile)?;
    out.mode_list(&profile_id(profile), &gremlin.mode_names());
    Ok(())
}

fn cmd_show(cli: &Cli, out: &dyn Output, args: &ShowArgs) -> Result<()> {
    let settings = load_settings(cli)?;
    let dictionary = JoystickGremlin::open(&args.profile)?
        .with_no_bind_text(settings.no_bind_text)
        .create_dictionary(&mode_filter(&args.modes))?;

    let id = profile_id(&args.profile);
    state::record::profile(id.clone(), dictionary.clone());
    out.dictionary(&id, &dictionary);
    Ok(())
}

fn cmd_set_template(cli: &Cli, out: &dyn Output, device_id: &str, svg: &Path) -> Result<()> {
    if !svg.is_file() {
        return Err(StickmapError::TemplateFileNotFound {
            path: svg.display().to_string(),
        });
    }

    let settings = load_settings(cli)?;
    let db = open_template_db(cli, &settings)?;
    let path = svg.display().to_string();
    let inserted = db.add_or_update(device_id, &path)?;
    out.template_saved(device_id, &path, inserted);
    Ok(())
}

fn cmd_templates(cli: &Cli, out: &dyn Output) -> Result<()> {
    let settings = load_settings(cli)?;
    let db = open_template_db(cli, &settings)?;
    out.templates(&db.list()?);
    Ok(())
}

fn cmd_remove_template(cli: &Cli, out: &dyn Output, device_id: &str) -> Result<()> {
    let settings = load_settings(cli)?;
    let db = open_template_db(cli, &settings)?;
    let removed = db.remove(device_id)?;
    out.template_removed(device_id, removed);
    Ok(())
}

fn cmd_export(cli: &Cli, out: &dyn Output, args: &ExportArgs) -> Result<()> {
    let settings = load_settings(cli)?;
    let db = open_template_db(cli, &settings)?;
    let filter = mode_filter(&args.modes);

    // Each profile is processed independently; one bad file is logged and
    // skipped rather than aborting the run.
    for profile in &args.profiles {
        match JoystickGremlin::open(profile)
            .map(|g| g.with_no_bind_text(settings.no_bind_text.clone()))
            .and_then(|g| g.create_dictionary(&filter))
        {
            Ok(dictionary) => {
                if dictionary.is_empty() {
                    out.warning(&format!("{}: no devices found", profile.display()));
                }
                state::record::profile(profile_id(profile), dictionary);
            }
            Err(e) => {
                warn!(profile = %profile.display(), error = %e, "Skipping profile");
                out.warning(&format!("{}: {e}", profile.display()));
            }
        }
    }

    let out_dir: PathBuf = match &args.out {
        Some(path) => path.clone(),
        None => settings::resolve_path(&settings.export_dir, Path::new("."))?,
    };
    let exporter = Exporter::new(&db, out_dir);
    let summary = exporter.export_all(&state::app_state())?;

    info!(files = summary.files_written(), "Export finished");
    out.export_summary(&summary);
    Ok(())
}

fn cmd_version(out: &dyn Output) -> Result<()> {
    out.version(&VersionInfo {
        version: build_info::VERSION,
        git_sha: build_info::git_sha(),
        git_dirty: build_info::git_dirty(),
        build_timestamp: build_info::build_timestamp(),
        rustc: build_info::rustc_semver(),
    });
    Ok(())
}

fn cmd_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "stickmap", &mut io::stdout());
}

// === Quick Start ===

/// Prints quick-start help for humans and agents alike.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        let help = serde_json::json!({
            "tool": "stickmap",
            "version": build_info::VERSION,
            "description": "Render HOTAS profile bindings onto SVG device diagrams",
            "inspect": {
                "list_devices": "stickmap devices <PROFILE.xml> --robot",
                "list_modes": "stickmap modes <PROFILE.xml> --robot",
                "show_bindings": "stickmap show <PROFILE.xml> --robot",
            },
            "templates": {
                "store": "stickmap set-template <DEVICE_ID> <SVG>",
                "list": "stickmap templates --robot",
            },
            "export": "stickmap export <PROFILE.xml>... --out <DIR>",
        });
        println!("{}", serde_json::to_string_pretty(&help).expect("serialization failed"));
    } else {
        println!("stickmap {}", build_info::VERSION);
        println!("Render HOTAS profile bindings onto SVG device diagrams.\n");
        println!("Common commands:");
        println!("  stickmap devices <PROFILE.xml>            list devices in a profile");
        println!("  stickmap show <PROFILE.xml>               show button bindings");
        println!("  stickmap set-template <DEVICE_ID> <SVG>   store a device template");
        println!("  stickmap export <PROFILE.xml> --out out/  render annotated diagrams");
        println!("\nRun 'stickmap --help' for the full command list.");
    }
    Ok(())
}
