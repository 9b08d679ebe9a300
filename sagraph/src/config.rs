//! Report configuration loaded from TOML.
//!
//! ```toml
//! [display]
//! skip_empty = true
//! palette = "bw"
//! time = "local"
//!
//! [selection]
//! cpus = "all"
//! devices = ["sda", "eth0"]
//!
//! [logging]
//! level = "debug"
//! ```

use crate::error::Result;
use crate::registry::Selection;
pub use crate::svg::clock::TimeBasis;
pub use crate::svg::palette::Palette;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Display flags handed to the layout engine. Immutable for a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Omit views whose values never leave zero.
    pub skip_empty: bool,
    /// Views of one activity side by side instead of stacked.
    pub pack: bool,
    /// Time axis spans the whole day of the first sample.
    pub one_day: bool,
    pub autoscale: bool,
    /// Draw %idle on CPU views.
    pub show_idle: bool,
    /// Emit marker comments in the SVG.
    pub debug: bool,
    /// Node name and date in each view.
    pub show_info: bool,
    pub time: TimeBasis,
    pub palette: Palette,
    /// Full CPU breakdown (irq, soft, guest, gnice).
    pub cpu_all_fields: bool,
    /// Add the kernel memory view (anonpg, slab, kstack, pgtbl, vmused).
    pub mem_all: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            skip_empty: false,
            pack: false,
            one_day: false,
            autoscale: false,
            show_idle: false,
            debug: false,
            show_info: true,
            time: TimeBasis::Utc,
            palette: Palette::Default,
            cpu_all_fields: false,
            mem_all: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// `all` or a CPU list such as `0,2-3`. CPU "all" only when unset.
    pub cpus: Option<String>,
    /// Disk, interface, FC host and filesystem names to keep.
    pub devices: Vec<String>,
    /// Activity names (`A_CPU`, `DISK`, ...) to draw.
    pub activities: Vec<String>,
}

impl SelectionConfig {
    pub fn to_selection(&self) -> Result<Selection> {
        let mut selection = Selection::default().with_items(self.devices.iter().cloned());
        if let Some(cpus) = &self.cpus {
            selection = selection.with_cpus(cpus)?;
        }
        Ok(selection)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayOptions,
    pub selection: SelectionConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg, Config::default());
        assert!(cfg.display.show_info);
        assert!(!cfg.display.autoscale);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn test_partial_tables() {
        let cfg = Config::from_toml(
            r#"
            [display]
            skip_empty = true
            palette = "bw"
            time = "true"

            [selection]
            cpus = "0-1"
            devices = ["sda"]
            "#,
        )
        .unwrap();
        assert!(cfg.display.skip_empty);
        assert_eq!(cfg.display.palette, Palette::Bw);
        assert_eq!(cfg.display.time, TimeBasis::True);
        assert!(cfg.display.show_info);

        let sel = cfg.selection.to_selection().unwrap();
        assert!(sel.cpu_selected(1));
        assert!(!sel.cpu_selected(0));
        assert!(sel.item_selected("sda"));
        assert!(!sel.item_selected("sdb"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_toml("[display]\npalette = \"neon\"").is_err());
        let cfg = Config::from_toml("[selection]\ncpus = \"x\"").unwrap();
        assert!(cfg.selection.to_selection().is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();
        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.logging.level, "debug");
    }
}
