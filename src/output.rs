//! CLI output formatting for all commands.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (featured item, series, page) is its semantic identity,
//! title and positional index, with slugs, image paths and output paths shown
//! as secondary context on indented lines.
//!
//! # Entity Display Contract
//!
//! 1. **Header line**: positional index + title (+ photo count for series)
//! 2. **Context lines**: indented `Slug:`, `Year:`, image paths, etc.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Featured
//! 001 River
//!     Slug: river
//!
//! Series
//! 001 River (2 photos)
//!     Slug: river
//!     Year: 2021
//!     001 images/river/01.jpg
//!     002 images/river/02.jpg
//!
//! Warnings
//!     series 'empty' has no images and cannot be opened
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Series → series.html
//! 001 River (2 photos) → series/1/
//! Page not found → 404.html
//!
//! Copied 12 assets, 1 manifest fetch
//! ```
//!
//! ## Browse
//!
//! ```text
//! [1 / 2] River
//!     https://example.com/images/river/01.jpg
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::document::PageKind;
use crate::generate::BuildReport;
use crate::lightbox::{Key, LightboxEvent, LightboxView};
use crate::manifest::{ContentManifest, ManifestIssue};
use std::io::{self, Write};
use tracing::warn;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// ```text
/// 001 River (2 photos)
/// 001 River
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(1) => format!("{} {} (1 photo)", format_index(index), title),
        Some(n) => format!("{} {} ({} photos)", format_index(index), title, n),
        None => format!("{} {}", format_index(index), title),
    }
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the manifest inventory and its validation warnings.
pub fn format_check_output(manifest: &ContentManifest, issues: &[ManifestIssue]) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(hero) = manifest.hero_image() {
        lines.push(format!("Hero: {hero}"));
        lines.push(String::new());
    }

    if !manifest.featured.is_empty() {
        lines.push("Featured".to_string());
        for (i, item) in manifest.featured.iter().enumerate() {
            lines.push(entity_header(i + 1, &item.title, None));
            lines.push(format!("{}Slug: {}", indent(1), item.slug));
            if let Some(subtitle) = &item.subtitle {
                lines.push(format!("{}Subtitle: {}", indent(1), subtitle));
            }
        }
        lines.push(String::new());
    }

    lines.push("Series".to_string());
    if manifest.series.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, series) in manifest.series.iter().enumerate() {
        lines.push(entity_header(i + 1, &series.title, Some(series.images.len())));
        lines.push(format!("{}Slug: {}", indent(1), series.slug));
        if let Some(year) = &series.year {
            lines.push(format!("{}Year: {}", indent(1), year));
        }
        for (j, image) in series.images.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(j + 1), image));
        }
    }

    if !issues.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for issue in issues {
            lines.push(format!("{}{}", indent(1), issue));
        }
    }

    lines
}

pub fn print_check_output(manifest: &ContentManifest, issues: &[ManifestIssue]) {
    for line in format_check_output(manifest, issues) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut position = 0;

    for page in &report.pages {
        match page.kind {
            PageKind::Viewer => {
                position += 1;
                lines.push(format!(
                    "{} → {}",
                    entity_header(position, &page.title, Some(page.images)),
                    page.path
                ));
            }
            _ => lines.push(format!("{} → {}", page.title, page.path)),
        }
    }

    if !report.issues.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for issue in &report.issues {
            lines.push(format!("{}{}", indent(1), issue));
        }
    }

    if let Some(base) = &report.preview_base {
        lines.push(String::new());
        lines.push(format!("Preview build: links point at {base}"));
        lines.push(format!("{}Set site_url in config.toml to publish", indent(1)));
    }

    lines.push(String::new());
    lines.push(format!(
        "Copied {}, {}",
        plural(report.assets_copied, "asset", "assets"),
        plural(report.fetches, "manifest fetch", "manifest fetches"),
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Browse
// ============================================================================

/// ```text
/// [1 / 2] River
///     https://example.com/images/river/01.jpg
/// ```
pub fn format_lightbox_frame(counter: &str, title: &str, url: &str) -> Vec<String> {
    vec![format!("[{counter}] {title}"), format!("{}{url}", indent(1))]
}

pub fn format_browse_help() -> String {
    "n: next, p: previous, q: close".to_string()
}

/// Map a line typed in `folio browse` to a lightbox event. DOM key names
/// (`ArrowRight`, `Escape`, ...) are accepted as well as short commands.
pub fn parse_browse_command(input: &str) -> Option<LightboxEvent> {
    let input = input.trim();
    let key = match Key::from_name(input) {
        Key::Other => match input.to_ascii_lowercase().as_str() {
            "n" | "next" | "right" | "" => Key::ArrowRight,
            "p" | "prev" | "previous" | "left" => Key::ArrowLeft,
            "q" | "quit" | "esc" | "escape" | "close" => Key::Escape,
            _ => return None,
        },
        key => key,
    };
    Some(LightboxEvent::Key(key))
}

/// Lightbox overlay drawn as text. A frame is written once the counter, the
/// last output of a render, arrives.
pub struct TerminalView<W = io::Stdout> {
    out: W,
    url: String,
    title: String,
}

impl TerminalView {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            url: String::new(),
            title: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines(&mut self, lines: &[String]) {
        for line in lines {
            if let Err(e) = writeln!(self.out, "{}", line) {
                warn!(error = %e, "could not write lightbox frame");
                return;
            }
        }
    }
}

impl<W: Write> LightboxView for TerminalView<W> {
    fn set_visible(&mut self, visible: bool) {
        if !visible {
            self.write_lines(&["Closed".to_string()]);
        }
    }

    fn render_image(&mut self, url: &str, _alt: &str) {
        self.url = url.to_string();
    }

    fn render_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn render_counter(&mut self, text: &str) {
        let frame = format_lightbox_frame(text, &self.title, &self.url);
        self.write_lines(&frame);
    }
}
