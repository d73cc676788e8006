//! Joystick Gremlin (~v13) XML profile adaptor.
//!
//! Parses one vendor profile document into a [`ProfileDictionary`]. The whole
//! document is read into memory up front (profile files are small), devices and
//! modes are extracted in document order, and inheritance is resolved in a
//! second pass over the completed structure.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

use crate::error::{Result, StickmapError};

use super::dictionary::{
    DEFAULT_NO_BIND_TEXT, DeviceBindings, ModeBindings, ProfileDictionary, button_key,
};

/// A raw button as it appears in the document: id plus optional description.
#[derive(Debug, Clone)]
struct RawButton {
    id: String,
    description: String,
}

/// A mode as extracted from the document, bindings not yet resolved.
#[derive(Debug, Clone)]
struct RawMode {
    name: String,
    inherit: Option<String>,
    buttons: Vec<RawButton>,
}

/// A device and its modes in document order.
#[derive(Debug, Clone)]
struct RawDevice {
    name: String,
    modes: Vec<RawMode>,
}

/// Parser for a single Joystick Gremlin profile document.
///
/// Each instance owns its own extracted tree; concurrent parses of different
/// files need only construct separate instances.
#[derive(Debug)]
pub struct JoystickGremlin {
    path: PathBuf,
    devices: Vec<RawDevice>,
    no_bind_text: String,
}

impl JoystickGremlin {
    /// Load and extract a profile document.
    ///
    /// # Errors
    ///
    /// [`StickmapError::ProfileNotFound`] when the file cannot be opened and
    /// [`StickmapError::MalformedDocument`] when it is not well-formed XML.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StickmapError::ProfileNotFound {
                path: path.display().to_string(),
            },
            _ => StickmapError::Io(e),
        })?;

        let devices = extract_devices(&path, BufReader::new(file))?;
        debug!(path = %path.display(), devices = devices.len(), "Extracted profile document");

        if devices.is_empty() {
            warn!(path = %path.display(), "Profile contains no devices");
        }

        Ok(Self {
            path,
            devices,
            no_bind_text: DEFAULT_NO_BIND_TEXT.to_string(),
        })
    }

    /// Override the label used for buttons with no description.
    #[must_use]
    pub fn with_no_bind_text(mut self, text: impl Into<String>) -> Self {
        self.no_bind_text = text.into();
        self
    }

    /// Path of the source document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Device names in document order.
    #[must_use]
    pub fn device_names(&self) -> Vec<String> {
        self.devices.iter().map(|d| d.name.clone()).collect()
    }

    /// Mode names of the first device.
    ///
    /// The format treats mode sets as common across devices within one file,
    /// so the first device serves as the document-wide proxy. Malformed inputs
    /// with heterogeneous mode sets per device break that assumption; callers
    /// must not rely on it for such files.
    #[must_use]
    pub fn mode_names(&self) -> Vec<String> {
        self.devices
            .first()
            .map(|d| d.modes.iter().map(|m| m.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of devices in the document.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Whether the document contains any devices.
    #[must_use]
    pub fn has_devices(&self) -> bool {
        !self.devices.is_empty()
    }

    /// Build the device -> mode -> button -> label dictionary.
    ///
    /// Inheritance is resolved after all devices and modes are recorded, then
    /// the profile filter is applied unconditionally as the final pass (a
    /// no-op when empty). A document with zero devices yields an empty
    /// dictionary rather than an error.
    pub fn create_dictionary(&self, profile_filter: &HashSet<String>) -> Result<ProfileDictionary> {
        let mut dict = ProfileDictionary::new();

        for raw_device in &self.devices {
            let mut device = DeviceBindings::new(raw_device.name.clone());

            for raw_mode in &raw_device.modes {
                let mut mode = ModeBindings::new(raw_mode.name.clone(), raw_mode.inherit.clone());
                for button in &raw_mode.buttons {
                    let label = if button.description.is_empty() {
                        self.no_bind_text.clone()
                    } else {
                        button.description.clone()
                    };
                    // Keyed by id: duplicate ids in the source overwrite, last wins.
                    mode.bind(button_key(&button.id), label);
                }
                device.modes.push(mode);
            }

            dict.devices.push(device);
        }

        dict.resolve_inheritance()?;
        dict.filter_modes(profile_filter);

        debug!(
            path = %self.path.display(),
            devices = dict.device_count(),
            bindings = dict.binding_count(),
            "Built profile dictionary"
        );
        Ok(dict)
    }
}

/// One-shot parse with the default sentinel label.
pub fn parse<P: AsRef<Path>>(path: P, profile_filter: &HashSet<String>) -> Result<ProfileDictionary> {
    JoystickGremlin::open(path)?.create_dictionary(profile_filter)
}

/// Read the attribute value for `key`, if present.
fn attribute(element: &BytesStart<'_>, key: &str) -> Option<String> {
    element.attributes().flatten().find_map(|attr| {
        (attr.key.as_ref() == key.as_bytes())
            .then(|| String::from_utf8_lossy(&attr.value).into_owned())
    })
}

/// Walk the document and collect raw devices, modes, and buttons.
///
/// Structure expected: `device` elements (attribute `name`) containing `mode`
/// elements (`name`, optional `inherit`) containing `button` elements (`id`,
/// optional `description`). Button elements anywhere below a mode are
/// collected; elements outside that nesting are ignored.
fn extract_devices<R: std::io::BufRead>(path: &Path, reader: R) -> Result<Vec<RawDevice>> {
    let malformed = |reason: String| StickmapError::MalformedDocument {
        path: path.display().to_string(),
        reason,
    };

    let mut xml = Reader::from_reader(reader);
    let mut buf = Vec::new();

    let mut devices: Vec<RawDevice> = Vec::new();
    let mut in_device = false;
    let mut in_mode = false;
    // Open-element depth; nonzero at EOF means the document was cut off.
    let mut depth: usize = 0;

    // Handles both `<device>...</device>` and self-closing `<device/>` forms;
    // self-closing elements never produce an End event, so the nesting flags
    // are only raised for the Start form.
    fn open_element(
        e: &BytesStart<'_>,
        self_closing: bool,
        devices: &mut Vec<RawDevice>,
        in_device: &mut bool,
        in_mode: &mut bool,
    ) {
        match e.name().as_ref() {
            b"device" => {
                devices.push(RawDevice {
                    name: attribute(e, "name").unwrap_or_default(),
                    modes: Vec::new(),
                });
                if !self_closing {
                    *in_device = true;
                }
            }
            b"mode" if *in_device => {
                // Empty inherit attribute counts as no inheritance.
                let inherit = attribute(e, "inherit").filter(|v| !v.is_empty());
                if let Some(device) = devices.last_mut() {
                    device.modes.push(RawMode {
                        name: attribute(e, "name").unwrap_or_default(),
                        inherit,
                        buttons: Vec::new(),
                    });
                }
                if !self_closing {
                    *in_mode = true;
                }
            }
            b"button" if *in_mode => {
                if let Some(mode) = devices.last_mut().and_then(|d| d.modes.last_mut()) {
                    mode.buttons.push(RawButton {
                        id: attribute(e, "id").unwrap_or_default(),
                        description: attribute(e, "description").unwrap_or_default(),
                    });
                }
            }
            _ => {}
        }
    }

    loop {
        match xml.read_event_into(&mut buf) {
            // quick-xml reports Eof without error even when elements are
            // still open, so a truncated file must be caught here.
            Ok(Event::Eof) => {
                if depth > 0 {
                    return Err(malformed("unexpected end of file".to_string()));
                }
                break;
            }
            Ok(Event::Start(ref e)) => {
                depth += 1;
                open_element(e, false, &mut devices, &mut in_device, &mut in_mode);
            }
            Ok(Event::Empty(ref e)) => {
                open_element(e, true, &mut devices, &mut in_device, &mut in_mode);
            }
            Ok(Event::End(ref e)) => {
                depth = depth.saturating_sub(1);
                match e.name().as_ref() {
                    b"device" => in_device = false,
                    b"mode" => in_mode = false,
                    _ => {}
                }
            }
            Ok(_) => {}
            Err(e) => return Err(malformed(e.to_string())),
        }
        buf.clear();
    }

    Ok(devices)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const STICK_PROFILE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<profile version="9">
    <devices>
        <device name="Stick" type="joystick">
            <mode name="Base">
                <button id="1" description="Fire"/>
            </mode>
            <mode name="Combat" inherit="Base">
                <button id="2" description="Lock"/>
            </mode>
        </device>
    </devices>
</profile>
"#;

    fn write_profile(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write profile");
        file
    }

    #[test]
    fn test_worked_example_with_inheritance() {
        let file = write_profile(STICK_PROFILE);
        let dict = parse(file.path(), &HashSet::new()).unwrap();

        assert_eq!(dict.device_names(), vec!["Stick"]);
        let stick = dict.device("Stick").unwrap();
        assert_eq!(stick.mode_names(), vec!["Base", "Combat"]);

        let base = stick.mode("Base").unwrap();
        assert_eq!(base.label("BUTTON_1"), Some("Fire"));
        assert_eq!(base.buttons.len(), 1);

        let combat = stick.mode("Combat").unwrap();
        assert_eq!(combat.label("BUTTON_1"), Some("Fire"));
        assert_eq!(combat.label("BUTTON_2"), Some("Lock"));
    }

    #[test]
    fn test_filter_worked_example() {
        let file = write_profile(STICK_PROFILE);
        let filter: HashSet<String> = ["Combat".to_string()].into();
        let dict = parse(file.path(), &filter).unwrap();

        let stick = dict.device("Stick").unwrap();
        assert_eq!(stick.mode_names(), vec!["Combat"]);
        let combat = stick.mode("Combat").unwrap();
        assert_eq!(combat.label("BUTTON_1"), Some("Fire"));
        assert_eq!(combat.label("BUTTON_2"), Some("Lock"));
    }

    #[test]
    fn test_devices_in_document_order() {
        let file = write_profile(
            r#"<profile>
                <device name="Throttle"><mode name="Base"/></device>
                <device name="Stick"><mode name="Base"/></device>
                <device name="Pedals"><mode name="Base"/></device>
            </profile>"#,
        );
        let gremlin = JoystickGremlin::open(file.path()).unwrap();
        assert_eq!(gremlin.device_count(), 3);
        assert_eq!(gremlin.device_names(), vec!["Throttle", "Stick", "Pedals"]);

        let dict = gremlin.create_dictionary(&HashSet::new()).unwrap();
        assert_eq!(dict.device_names(), vec!["Throttle", "Stick", "Pedals"]);
    }

    #[test]
    fn test_empty_description_gets_sentinel() {
        let file = write_profile(
            r#"<profile><device name="Stick">
                <mode name="Base">
                    <button id="1" description=""/>
                    <button id="2"/>
                </mode>
            </device></profile>"#,
        );
        let dict = parse(file.path(), &HashSet::new()).unwrap();
        let base = dict.device("Stick").unwrap().mode("Base").unwrap();
        assert_eq!(base.label("BUTTON_1"), Some(DEFAULT_NO_BIND_TEXT));
        assert_eq!(base.label("BUTTON_2"), Some(DEFAULT_NO_BIND_TEXT));
    }

    #[test]
    fn test_custom_no_bind_text() {
        let file = write_profile(
            r#"<profile><device name="Stick">
                <mode name="Base"><button id="1"/></mode>
            </device></profile>"#,
        );
        let dict = JoystickGremlin::open(file.path())
            .unwrap()
            .with_no_bind_text("Unassigned")
            .create_dictionary(&HashSet::new())
            .unwrap();
        let base = dict.device("Stick").unwrap().mode("Base").unwrap();
        assert_eq!(base.label("BUTTON_1"), Some("Unassigned"));
    }

    #[test]
    fn test_duplicate_button_ids_last_wins() {
        let file = write_profile(
            r#"<profile><device name="Stick">
                <mode name="Base">
                    <button id="1" description="First"/>
                    <button id="1" description="Second"/>
                </mode>
            </device></profile>"#,
        );
        let dict = parse(file.path(), &HashSet::new()).unwrap();
        let base = dict.device("Stick").unwrap().mode("Base").unwrap();
        assert_eq!(base.buttons.len(), 1);
        assert_eq!(base.label("BUTTON_1"), Some("Second"));
    }

    #[test]
    fn test_zero_devices_yields_empty_dictionary() {
        let file = write_profile(r#"<profile version="9"></profile>"#);
        let gremlin = JoystickGremlin::open(file.path()).unwrap();
        assert!(!gremlin.has_devices());
        assert_eq!(gremlin.device_count(), 0);
        assert!(gremlin.mode_names().is_empty());

        let dict = gremlin.create_dictionary(&HashSet::new()).unwrap();
        assert!(dict.is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let file = write_profile(STICK_PROFILE);
        let first = parse(file.path(), &HashSet::new()).unwrap();
        let second = parse(file.path(), &HashSet::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mode_names_use_first_device() {
        let file = write_profile(
            r#"<profile>
                <device name="Stick">
                    <mode name="Base"/><mode name="Combat"/>
                </device>
                <device name="Throttle">
                    <mode name="Base"/><mode name="Combat"/>
                </device>
            </profile>"#,
        );
        let gremlin = JoystickGremlin::open(file.path()).unwrap();
        assert_eq!(gremlin.mode_names(), vec!["Base", "Combat"]);
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        let file = write_profile("<profile><device name=\"Stick\"></profile>");
        let err = JoystickGremlin::open(file.path()).unwrap_err();
        assert!(matches!(err, StickmapError::MalformedDocument { .. }));
    }

    #[test]
    fn test_truncated_document_is_rejected() {
        // Cut off mid-document: well-formed prefix, but tags never close.
        let file =
            write_profile(r#"<profile><device name="Stick"><mode name="Base">"#);
        let err = JoystickGremlin::open(file.path()).unwrap_err();
        assert!(matches!(err, StickmapError::MalformedDocument { .. }));
    }

    #[test]
    fn test_missing_file_is_profile_not_found() {
        let err = JoystickGremlin::open("/nonexistent/profile.xml").unwrap_err();
        assert!(matches!(err, StickmapError::ProfileNotFound { .. }));
    }

    #[test]
    fn test_missing_inherit_target_surfaces() {
        let file = write_profile(
            r#"<profile><device name="Stick">
                <mode name="Combat" inherit="Nowhere">
                    <button id="1" description="Fire"/>
                </mode>
            </device></profile>"#,
        );
        let gremlin = JoystickGremlin::open(file.path()).unwrap();
        let err = gremlin.create_dictionary(&HashSet::new()).unwrap_err();
        assert!(matches!(err, StickmapError::MissingInheritTarget { .. }));
    }

    #[test]
    fn test_empty_inherit_attribute_means_no_inheritance() {
        let file = write_profile(
            r#"<profile><device name="Stick">
                <mode name="Base" inherit="">
                    <button id="1" description="Fire"/>
                </mode>
            </device></profile>"#,
        );
        let dict = parse(file.path(), &HashSet::new()).unwrap();
        let base = dict.device("Stick").unwrap().mode("Base").unwrap();
        assert_eq!(base.inherit, None);
        assert_eq!(base.label("BUTTON_1"), Some("Fire"));
    }
}
