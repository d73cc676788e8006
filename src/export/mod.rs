//! Export of parsed profiles onto SVG device diagrams.
//!
//! For every device in a dictionary with a stored template, each mode is
//! rendered to one annotated SVG in the export directory. A device without a
//! template, or with a template missing on disk, is skipped and reported;
//! per-profile failures never abort the run.

pub mod svg;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adaptor::{DeviceBindings, ProfileDictionary};
use crate::error::{Result, ResultExt};
use crate::state::AppState;
use crate::template::TemplateDb;

/// One rendered diagram file.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDiagram {
    pub device: String,
    pub mode: String,
    pub output_path: String,
    pub replaced: usize,
}

/// A device that could not be exported, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDevice {
    pub device: String,
    pub reason: String,
}

/// Outcome of an export run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportSummary {
    pub rendered: Vec<RenderedDiagram>,
    pub skipped: Vec<SkippedDevice>,
}

impl ExportSummary {
    #[must_use]
    pub fn files_written(&self) -> usize {
        self.rendered.len()
    }

    fn merge(&mut self, other: Self) {
        self.rendered.extend(other.rendered);
        self.skipped.extend(other.skipped);
    }
}

/// Renders accumulated profile dictionaries onto stored SVG templates.
pub struct Exporter<'a> {
    templates: &'a TemplateDb,
    out_dir: PathBuf,
}

impl<'a> Exporter<'a> {
    #[must_use]
    pub fn new(templates: &'a TemplateDb, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates,
            out_dir: out_dir.into(),
        }
    }

    /// Export every processed profile held in the application state.
    pub fn export_all(&self, state: &AppState) -> Result<ExportSummary> {
        let mut summary = ExportSummary::default();
        for (profile_id, dictionary) in &state.profiles {
            debug!(profile = %profile_id, "Exporting profile");
            summary.merge(self.export_dictionary(dictionary)?);
        }
        info!(
            files = summary.files_written(),
            skipped = summary.skipped.len(),
            "Export complete"
        );
        Ok(summary)
    }

    /// Export one dictionary: a diagram per device/mode pair.
    pub fn export_dictionary(&self, dictionary: &ProfileDictionary) -> Result<ExportSummary> {
        fs::create_dir_all(&self.out_dir)?;

        let mut summary = ExportSummary::default();
        for device in &dictionary.devices {
            self.export_device(device, &mut summary)?;
        }
        Ok(summary)
    }

    fn export_device(&self, device: &DeviceBindings, summary: &mut ExportSummary) -> Result<()> {
        let Some(row) = self.templates.get(&device.name)? else {
            warn!(device = %device.name, "No template stored, skipping device");
            summary.skipped.push(SkippedDevice {
                device: device.name.clone(),
                reason: "no template stored".to_string(),
            });
            return Ok(());
        };

        let template_path = Path::new(&row.template_path);
        let template = match fs::read_to_string(template_path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(
                    device = %device.name,
                    template = %row.template_path,
                    error = %e,
                    "Template unreadable, skipping device"
                );
                summary.skipped.push(SkippedDevice {
                    device: device.name.clone(),
                    reason: format!("template unreadable: {e}"),
                });
                return Ok(());
            }
        };

        for mode in &device.modes {
            let (rendered, stats) = svg::render(&template, &mode.buttons);
            let file_name = format!(
                "{}_{}.svg",
                sanitize_file_stem(&device.name),
                sanitize_file_stem(&mode.name)
            );
            let output_path = self.out_dir.join(file_name);
            fs::write(&output_path, rendered)
                .with_context(|| format!("writing {}", output_path.display()))?;

            debug!(
                device = %device.name,
                mode = %mode.name,
                output = %output_path.display(),
                replaced = stats.replaced,
                unmatched = stats.unmatched,
                "Rendered diagram"
            );
            summary.rendered.push(RenderedDiagram {
                device: device.name.clone(),
                mode: mode.name.clone(),
                output_path: output_path.display().to_string(),
                replaced: stats.replaced,
            });
        }

        Ok(())
    }
}

/// Replace characters unsafe in file names.
fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
