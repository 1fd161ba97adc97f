//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. Stock defaults are
//! serialized to a TOML value, the user file is layered on top, and the merged
//! value is deserialized with unknown keys rejected.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output_dir = "."          # Where assembled pages are written
//! bits_dir = "bits"         # bits/<lang>/head.html, bits/<lang>/foot.html
//! pages_dir = "pages"       # pages/<lang>/<page files>
//!
//! [[languages]]
//! code = "en"
//! label = "English"
//! default = true
//!
//! [gallery]
//! url_prefix = "gallery/0.3.0/"
//! thumb_size = [128, 96]
//! program = "convert"
//! resize_flag = "-adaptive-resize"
//! script_markers = [".php", ".sh"]
//! fragment_file = "frag.html"
//! ```
//!
//! Declaring `[[languages]]` in a user file replaces the whole stock list;
//! tables such as `[gallery]` are merged key by key.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the site root when `--config` is not given.
pub const CONFIG_FILE: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
///
/// Passed explicitly into the page assembler and the gallery builder; nothing
/// reads paths or languages from global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory assembled pages are written into, relative to the site root.
    pub output_dir: String,
    /// Directory holding `<lang>/head.html` and `<lang>/foot.html`.
    pub bits_dir: String,
    /// Directory holding one content directory per language.
    pub pages_dir: String,
    /// Supported languages, in processing order.
    pub languages: Vec<Language>,
    /// Screenshot gallery settings.
    pub gallery: GalleryConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            bits_dir: "bits".to_string(),
            pages_dir: "pages".to_string(),
            languages: vec![Language {
                code: "en".to_string(),
                label: Some("English".to_string()),
                is_default: true,
            }],
            gallery: GalleryConfig::default(),
        }
    }
}

/// A supported site language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Language {
    /// Short code, e.g. `"fr"`. Used for directory names and file infixes.
    pub code: String,
    /// Label shown in the language switcher. Absent labels render as `[MISSING]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// The default language keeps untranslated output file names.
    #[serde(default, rename = "default")]
    pub is_default: bool,
}

impl Language {
    pub fn new(code: &str, label: Option<&str>, is_default: bool) -> Self {
        Self {
            code: code.to_string(),
            label: label.map(str::to_string),
            is_default,
        }
    }
}

/// Gallery builder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Prefix prepended to every generated file name in the fragment markup.
    pub url_prefix: String,
    /// Thumbnail bounding box as `[width, height]`.
    pub thumb_size: [u32; 2],
    /// External image conversion program.
    pub program: String,
    /// Resize mode flag passed to the program before the geometry.
    pub resize_flag: String,
    /// Entries whose names contain any of these substrings are never touched.
    pub script_markers: Vec<String>,
    /// Fragment file written after all images are processed.
    pub fragment_file: String,
    /// File name of the config this run was loaded from; never renamed.
    /// Filled in by [`load_config`], not read from TOML.
    #[serde(skip)]
    pub config_file: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            url_prefix: "gallery/0.3.0/".to_string(),
            thumb_size: [128, 96],
            program: "convert".to_string(),
            resize_flag: "-adaptive-resize".to_string(),
            script_markers: vec![".php".to_string(), ".sh".to_string()],
            fragment_file: "frag.html".to_string(),
            config_file: CONFIG_FILE.to_string(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.is_empty() {
            return Err(ConfigError::Validation(
                "at least one language must be configured".into(),
            ));
        }
        let mut seen = HashSet::new();
        for lang in &self.languages {
            if lang.code.is_empty() {
                return Err(ConfigError::Validation(
                    "languages.code must not be empty".into(),
                ));
            }
            if !lang
                .code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(ConfigError::Validation(format!(
                    "language code '{}' may only contain letters, digits, '-' and '_'",
                    lang.code
                )));
            }
            if !seen.insert(lang.code.to_ascii_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "language '{}' is configured twice",
                    lang.code
                )));
            }
        }
        let defaults = self.languages.iter().filter(|l| l.is_default).count();
        if defaults != 1 {
            return Err(ConfigError::Validation(format!(
                "exactly one language must be marked default (found {defaults})"
            )));
        }
        if self.gallery.thumb_size[0] == 0 || self.gallery.thumb_size[1] == 0 {
            return Err(ConfigError::Validation(
                "gallery.thumb_size values must be non-zero".into(),
            ));
        }
        if self.gallery.program.trim().is_empty() {
            return Err(ConfigError::Validation(
                "gallery.program must not be empty".into(),
            ));
        }
        if self.gallery.fragment_file.is_empty() {
            return Err(ConfigError::Validation(
                "gallery.fragment_file must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the site config from `config_path`, falling back to stock defaults
/// when the file is absent.
pub fn load_config(config_path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(config_path)?;
    let mut config = resolve_config(base, overlay)?;
    if let Some(name) = config_path.file_name().and_then(|n| n.to_str()) {
        config.gallery.config_file = name.to_string();
    }
    Ok(config)
}

/// Returns a fully-commented stock `site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Site Assembler Configuration
# ============================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory assembled pages are written into (relative to the site root).
output_dir = "."

# Header and footer bits: <bits_dir>/<lang>/head.html and foot.html
bits_dir = "bits"

# Content pages: <pages_dir>/<lang>/<file>
pages_dir = "pages"

# ---------------------------------------------------------------------------
# Languages
# ---------------------------------------------------------------------------
# Declaring any [[languages]] entry replaces this whole list.
# Exactly one language must be the default; its pages keep their file names.
# Other languages get a ".<code>." infix: about.html -> about.fr.html
#
# Header bits may contain <CODE>_URL and <CODE>_TXT placeholders for every
# language (EN_URL, FR_TXT, ...). A language without a label renders
# its _TXT placeholder as [MISSING].
[[languages]]
code = "en"
label = "English"
default = true

# [[languages]]
# code = "fr"
# label = "Français"

# ---------------------------------------------------------------------------
# Screenshot gallery
# ---------------------------------------------------------------------------
[gallery]
# Prefix for image and thumbnail links in the generated fragment.
url_prefix = "gallery/0.3.0/"

# Thumbnail bounding box as [width, height].
thumb_size = [128, 96]

# Conversion command: <program> <image> <resize_flag> <WxH> <thumbnail>
program = "convert"
resize_flag = "-adaptive-resize"

# Entries whose names contain any of these are left alone.
script_markers = [".php", ".sh"]

# Fragment file written into the gallery directory.
fragment_file = "frag.html"
"##
}
