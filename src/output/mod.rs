//! Output mode abstraction for robot and human output.

use console::style;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::adaptor::ProfileDictionary;
use crate::cli::Cli;
use crate::error::StickmapError;
use crate::export::ExportSummary;
use crate::template::TemplateRow;

/// Version and build information for the `version` command.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: &'static str,
    pub build_timestamp: &'static str,
    pub rustc: &'static str,
}

/// Rendering surface shared by all commands.
pub trait Output {
    fn error(&self, error: &StickmapError);
    fn warning(&self, message: &str);
    fn device_list(&self, profile: &str, names: &[String]);
    fn mode_list(&self, profile: &str, names: &[String]);
    fn dictionary(&self, profile: &str, dictionary: &ProfileDictionary);
    fn templates(&self, rows: &[TemplateRow]);
    fn template_saved(&self, device_id: &str, path: &str, inserted: bool);
    fn template_removed(&self, device_id: &str, removed: bool);
    fn export_summary(&self, summary: &ExportSummary);
    fn version(&self, info: &VersionInfo);
}

/// Pick the output implementation for the parsed CLI flags.
#[must_use]
pub fn for_cli(cli: &Cli) -> Box<dyn Output> {
    if cli.use_json() {
        Box::new(RobotOutput {
            compact: cli.use_compact_json(),
        })
    } else {
        Box::new(HumanOutput)
    }
}

// === Robot mode ===

/// JSON output for agents and scripting.
pub struct RobotOutput {
    compact: bool,
}

impl RobotOutput {
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = if self.compact {
            serde_json::to_string(data).expect("serialization failed")
        } else {
            serde_json::to_string_pretty(data).expect("serialization failed")
        };
        println!("{json}");
    }

    fn output_json_stderr<T: Serialize>(&self, data: &T) {
        let json = serde_json::to_string_pretty(data).expect("serialization failed");
        eprintln!("{json}");
    }
}

impl Output for RobotOutput {
    fn error(&self, error: &StickmapError) {
        debug!(error = %error, "Robot: error");
        self.output_json_stderr(&json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        }));
    }

    fn warning(&self, message: &str) {
        self.output_json(&json!({ "warning": true, "message": message }));
    }

    fn device_list(&self, profile: &str, names: &[String]) {
        self.output_json(&json!({
            "profile": profile,
            "devices": names,
            "count": names.len(),
        }));
    }

    fn mode_list(&self, profile: &str, names: &[String]) {
        self.output_json(&json!({
            "profile": profile,
            "modes": names,
            "count": names.len(),
        }));
    }

    fn dictionary(&self, profile: &str, dictionary: &ProfileDictionary) {
        self.output_json(&json!({
            "profile": profile,
            "devices": dictionary.devices,
        }));
    }

    fn templates(&self, rows: &[TemplateRow]) {
        self.output_json(&json!({
            "templates": rows,
            "count": rows.len(),
        }));
    }

    fn template_saved(&self, device_id: &str, path: &str, inserted: bool) {
        self.output_json(&json!({
            "success": true,
            "device_id": device_id,
            "template_path": path,
            "inserted": inserted,
        }));
    }

    fn template_removed(&self, device_id: &str, removed: bool) {
        self.output_json(&json!({
            "success": removed,
            "device_id": device_id,
            "removed": removed,
        }));
    }

    fn export_summary(&self, summary: &ExportSummary) {
        self.output_json(summary);
    }

    fn version(&self, info: &VersionInfo) {
        self.output_json(info);
    }
}

// === Human mode ===

/// Styled terminal output for interactive use.
pub struct HumanOutput;

impl Output for HumanOutput {
    fn error(&self, error: &StickmapError) {
        eprintln!("{} {error}", style("error:").red().bold());
        if let Some(suggestion) = error.suggestion() {
            eprintln!("  {} {suggestion}", style("hint:").yellow());
        }
    }

    fn warning(&self, message: &str) {
        eprintln!("{} {message}", style("warning:").yellow().bold());
    }

    fn device_list(&self, profile: &str, names: &[String]) {
        println!("{} {profile}", style("Profile:").bold());
        if names.is_empty() {
            println!("  (no devices)");
            return;
        }
        for name in names {
            println!("  {name}");
        }
    }

    fn mode_list(&self, profile: &str, names: &[String]) {
        println!("{} {profile}", style("Profile:").bold());
        if names.is_empty() {
            println!("  (no modes)");
            return;
        }
        for name in names {
            println!("  {name}");
        }
    }

    fn dictionary(&self, profile: &str, dictionary: &ProfileDictionary) {
        println!("{} {profile}", style("Profile:").bold());
        if dictionary.is_empty() {
            println!("  (no devices)");
            return;
        }
        for device in &dictionary.devices {
            println!("\n{}", style(&device.name).cyan().bold());
            for mode in &device.modes {
                println!("  {} ({} bindings)", style(&mode.name).green(), mode.buttons.len());
                let width = mode.buttons.keys().map(String::len).max().unwrap_or(0);
                for (key, label) in &mode.buttons {
                    println!("    {key:width$}  {label}");
                }
            }
        }
    }

    fn templates(&self, rows: &[TemplateRow]) {
        if rows.is_empty() {
            println!("No templates stored. Run: stickmap set-template <DEVICE_ID> <SVG>");
            return;
        }
        let width = rows.iter().map(|r| r.device_id.len()).max().unwrap_or(0);
        for row in rows {
            // Pad before styling so ANSI codes do not skew the column width.
            let id = format!("{:width$}", row.device_id);
            println!("{}  {}", style(id).cyan(), row.template_path);
        }
    }

    fn template_saved(&self, device_id: &str, path: &str, inserted: bool) {
        let verb = if inserted { "Stored" } else { "Updated" };
        println!("{} template for {device_id}: {path}", style(verb).green().bold());
    }

    fn template_removed(&self, device_id: &str, removed: bool) {
        if removed {
            println!("{} template for {device_id}", style("Removed").green().bold());
        } else {
            println!("No template stored for {device_id}");
        }
    }

    fn export_summary(&self, summary: &ExportSummary) {
        for diagram in &summary.rendered {
            println!(
                "{} {} / {} -> {} ({} bindings placed)",
                style("Rendered").green().bold(),
                diagram.device,
                diagram.mode,
                diagram.output_path,
                diagram.replaced,
            );
        }
        for skipped in &summary.skipped {
            println!(
                "{} {} ({})",
                style("Skipped").yellow().bold(),
                skipped.device,
                skipped.reason,
            );
        }
        println!(
            "\n{} file(s) written, {} device(s) skipped",
            summary.files_written(),
            summary.skipped.len(),
        );
    }

    fn version(&self, info: &VersionInfo) {
        println!("{} {}", style("stickmap").bold(), info.version);
        println!("  commit:    {} (dirty: {})", info.git_sha, info.git_dirty);
        println!("  built:     {}", info.build_timestamp);
        println!("  rustc:     {}", info.rustc);
    }
}
