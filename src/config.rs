//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the source directory next to `content.json`; stock defaults are overridden
//! by whatever keys the user sets.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_title = "Portfolio"
//! lang = "en"
//! manifest = "content.json"        # Manifest path, relative to the source dir
//! default_hero = "images/cover/cover.jpg"
//! # site_url = "https://example.com/portfolio/"   # Public URL (else output dir)
//! # base_href = "/portfolio/"                     # Emitted as <base href>
//!
//! [fetch]
//! timeout_secs = 10                # Manifest fetch timeout, 0 disables it
//!
//! [labels]
//! open = "Open"                    # aria-label prefix on series entries
//! click_to_open = "Click to open"
//! content_unavailable = "Content unavailable"
//! close = "Close"
//! next = "Next"
//! prev = "Previous"
//! home = "Home"
//! series = "Series"
//! not_found = "Page not found"
//!
//! [colors]
//! background = "#0b0b0b"
//! text = "#f2f2f2"
//! text_muted = "#9a9a9a"
//! accent = "#e0c48c"
//! overlay = "rgba(0, 0, 0, 0.92)"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Title used in `<title>` and the site header.
    pub site_title: String,
    /// `lang` attribute of generated pages.
    pub lang: String,
    /// Path of the content manifest, relative to the source directory.
    pub manifest: String,
    /// Hero image used when the manifest does not name one.
    pub default_hero: String,
    /// Public URL of the site. Generated image URLs are absolute against it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Optional `<base href>` written into every page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_href: Option<String>,
    pub fetch: FetchConfig,
    pub labels: Labels,
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: "Portfolio".to_string(),
            lang: "en".to_string(),
            manifest: "content.json".to_string(),
            default_hero: "images/cover/cover.jpg".to_string(),
            site_url: None,
            base_href: None,
            fetch: FetchConfig::default(),
            labels: Labels::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.manifest.trim().is_empty() {
            return Err(ConfigError::Validation("manifest must not be empty".into()));
        }
        if let Some(url) = &self.site_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "site_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.fetch.timeout_secs > 600 {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be at most 600".into(),
            ));
        }
        Ok(())
    }
}

/// Manifest fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Request timeout in seconds. `0` waits forever.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// User-visible strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    /// Prefix of the series entry aria-label ("Open River").
    pub open: String,
    /// Hint under each series entry.
    pub click_to_open: String,
    /// Shown in place of the content areas when the manifest fails to load.
    pub content_unavailable: String,
    pub close: String,
    pub next: String,
    pub prev: String,
    /// Navigation links.
    pub home: String,
    pub series: String,
    /// Heading of `404.html`.
    pub not_found: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            open: "Open".to_string(),
            click_to_open: "Click to open".to_string(),
            content_unavailable: "Content unavailable".to_string(),
            close: "Close".to_string(),
            next: "Next".to_string(),
            prev: "Previous".to_string(),
            home: "Home".to_string(),
            series: "Series".to_string(),
            not_found: "Page not found".to_string(),
        }
    }
}

/// Page colors, emitted as CSS custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    pub text: String,
    /// Subtitles, years, the lightbox counter.
    pub text_muted: String,
    /// Links and focus rings.
    pub accent: String,
    /// Lightbox backdrop.
    pub overlay: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#0b0b0b".to_string(),
            text: "#f2f2f2".to_string(),
            text_muted: "#9a9a9a".to_string(),
            accent: "#e0c48c".to_string(),
            overlay: "rgba(0, 0, 0, 0.92)".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match load_raw_config(dir)? {
        Some(overlay) => merge_toml(stock_defaults_value()?, overlay),
        None => stock_defaults_value()?,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Shown in the page <title> and header.
site_title = "Portfolio"

# lang attribute of every generated page.
lang = "en"

# Content manifest, relative to the source directory.
manifest = "content.json"

# Hero image for the home page when content.json has no site.heroImage.
default_hero = "images/cover/cover.jpg"

# Public URL of the published site. Image URLs are made absolute against it.
# When unset, the output directory (file://) is used instead.
# site_url = "https://example.com/portfolio/"

# Written as <base href> into every page; also changes URL resolution.
# base_href = "/portfolio/"

# ---------------------------------------------------------------------------
# Manifest fetching
# ---------------------------------------------------------------------------
[fetch]
# Request timeout in seconds. 0 disables the timeout.
timeout_secs = 10

# ---------------------------------------------------------------------------
# Labels
# ---------------------------------------------------------------------------
[labels]
open = "Open"
click_to_open = "Click to open"
content_unavailable = "Content unavailable"
close = "Close"
next = "Next"
prev = "Previous"
home = "Home"
series = "Series"
not_found = "Page not found"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#0b0b0b"
text = "#f2f2f2"
text_muted = "#9a9a9a"    # Subtitles, years, lightbox counter
accent = "#e0c48c"
overlay = "rgba(0, 0, 0, 0.92)"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-accent: {accent};
    --color-overlay: {overlay};
}}"#,
        background = colors.background,
        text = colors.text,
        text_muted = colors.text_muted,
        accent = colors.accent,
        overlay = colors.overlay,
    )
}
