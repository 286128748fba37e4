use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub conversion: Conversion,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.conversion.width == Some(0) {
            bail!("conversion.width must be a positive pixel count");
        }
        if self.conversion.dpi == Some(0) {
            bail!("conversion.dpi must be positive");
        }
        if self.conversion.jpeg_quality == 0 || self.conversion.jpeg_quality > 100 {
            bail!(
                "conversion.jpeg_quality must be 1-100, got {}",
                self.conversion.jpeg_quality
            );
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: Default::default(),
            conversion: Default::default(),
            output: Default::default(),
            logging: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    pub source_dir: String,
    pub out_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            source_dir: ".".into(),
            out_dir: ".".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversion {
    /// Fixed page width in pixels. Omit to derive the minimum width per directory.
    pub width: Option<u32>,
    /// Fixed DPI tag. Omit to derive the maximum DPI per directory.
    pub dpi: Option<u32>,
    pub delete_sources: bool,
    pub jpeg_quality: u8,
}
impl Default for Conversion {
    fn default() -> Self {
        Self {
            width: None,
            dpi: None,
            delete_sources: false,
            jpeg_quality: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub write_report_json: bool,
    pub report_filename: String,
    pub print_summary: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            write_report_json: true,
            report_filename: "report.json".into(),
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
