//! Shared fixtures for integration tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// A profile with one device, a base mode, and an inheriting combat mode.
pub const STICK_PROFILE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<profile version="9">
    <device name="Stick" type="joystick">
        <mode name="Base">
            <button id="1" description="Fire"/>
            <button id="2" description=""/>
        </mode>
        <mode name="Combat" inherit="Base">
            <button id="2" description="Lock Target"/>
        </mode>
    </device>
</profile>
"#;

/// A profile with two devices sharing the same mode set.
pub const DUAL_DEVICE_PROFILE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<profile version="9">
    <device name="Stick">
        <mode name="Base"><button id="1" description="Fire"/></mode>
    </device>
    <device name="Throttle">
        <mode name="Base"><button id="1" description="Boost"/></mode>
    </device>
</profile>
"#;

/// A well-formed document with zero devices.
pub const EMPTY_PROFILE: &str = r#"<profile version="9"></profile>"#;

/// Not well-formed: unclosed device element.
pub const MALFORMED_PROFILE: &str = r#"<profile><device name="Stick"></profile>"#;

/// An SVG template with placeholders for buttons 1 and 2.
pub const STICK_TEMPLATE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
    <text x="10" y="10">BUTTON_1</text>
    <text x="10" y="30">BUTTON_2</text>
</svg>
"#;

/// Temporary workspace holding profiles, templates, and an output directory.
pub struct TestWorkspace {
    pub dir: TempDir,
}

impl TestWorkspace {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write a profile file and return its path.
    pub fn write_profile(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write profile");
        path
    }

    /// Write an SVG template file and return its path.
    pub fn write_template(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, STICK_TEMPLATE).expect("Failed to write template");
        path
    }

    /// Path for the template store database.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("templates.db")
    }

    /// Path for rendered output.
    #[must_use]
    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
