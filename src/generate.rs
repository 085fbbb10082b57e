//! Static site build.
//!
//! Runs the page initializers against [`StaticDocument`]s and writes the
//! result as plain HTML. One manifest fetch serves every page.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): hero image and featured cards
//! - **Series list** (`/series.html`): every series, with a hidden lightbox
//! - **Viewer pages** (`/series/{n}/{i}.html`): the lightbox opened on image
//!   `i` of the `n`-th series, one page per image, produced by deep-linking
//!   into the series and stepping the controller with `next`
//! - **Not found** (`/404.html`)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── series.html
//! ├── 404.html
//! ├── series/
//! │   ├── 1/
//! │   │   ├── 1.html
//! │   │   └── 2.html
//! │   └── 2/
//! │       └── 1.html
//! └── images/                  # copied from the source directory
//!     └── ...
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: base styles (colors injected from config)
//! - `static/site.js`: keyboard navigation between viewer pages and the
//!   `#<slug>` deep link on the series list
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Fragments produced by [`crate::render`] are inserted pre-escaped; every
//! other interpolation is escaped by maud.

use crate::config::{self, SiteConfig};
use crate::document::{OverlaySnapshot, PageKind, StaticDocument};
use crate::lightbox::LightboxEvent;
use crate::loader::{ContentLoader, Fetch, HttpFetch, LoadError};
use crate::location::{Location, LocationError, encode_component};
use crate::manifest::ManifestIssue;
use crate::page::{Session, current_year};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not walk source directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("path error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

/// One generated page, or for viewer pages, one series worth of them.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub kind: PageKind,
    pub title: String,
    /// File for single pages, directory for a series' viewer pages.
    pub path: String,
    /// Viewer pages written (0 for single pages).
    pub images: usize,
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: Vec<GeneratedPage>,
    pub assets_copied: usize,
    pub issues: Vec<ManifestIssue>,
    /// Manifest requests issued during the build.
    pub fetches: usize,
    /// Set when no `site_url` was configured: links point at the output
    /// directory on this machine and the site is for local preview only.
    pub preview_base: Option<String>,
}

/// Build the site from `source` (manifest, `config.toml`, images) into `output`.
#[instrument(skip_all, fields(source = %source.display()))]
pub fn build(source: &Path, output: &Path, config: &SiteConfig) -> Result<BuildReport, BuildError> {
    let source = std::path::absolute(source)?;
    let output = std::path::absolute(output)?;

    let manifest_location = Location::in_directory(&source, "index.html")?;
    let fetcher = HttpFetch::new(config.fetch.timeout())?;
    let loader = ContentLoader::for_location(fetcher, &manifest_location, &config.manifest)?;
    let home = site_location(config, &output)?;

    fs::create_dir_all(&output)?;
    let assets_copied = copy_assets(&source, &output, config)?;
    let mut report = render_site(&loader, &home, &output, config, current_year())?;
    report.assets_copied = assets_copied;
    if config.site_url.is_none() {
        let base = home.base().to_string();
        warn!(%base, "site_url is not set, building a local preview");
        report.preview_base = Some(base);
    }
    Ok(report)
}

/// Location of `index.html` on the published site: `site_url` when set,
/// otherwise the output directory as a `file://` URL (local preview).
pub fn site_location(config: &SiteConfig, output: &Path) -> Result<Location, LocationError> {
    let location = match &config.site_url {
        Some(url) if url.ends_with('/') => Location::parse(url)?.sibling("index.html")?,
        Some(url) => Location::parse(&format!("{url}/"))?.sibling("index.html")?,
        None => Location::in_directory(output, "index.html")?,
    };
    Ok(location.with_base_override(config.base_href.clone()))
}

/// Render every page into `output`.
pub fn render_site<F: Fetch>(
    loader: &ContentLoader<F>,
    home: &Location,
    output: &Path,
    config: &SiteConfig,
    year: i32,
) -> Result<BuildReport, BuildError> {
    let css = format!("{}\n\n{}", config::generate_color_css(&config.colors), CSS_STATIC);
    let ctx = PageContext { config, css, home };
    let session = |location: Location| Session::configured(loader, location, config).with_year(year);
    let mut report = BuildReport::default();

    fs::create_dir_all(output)?;

    // Home
    let mut doc = StaticDocument::new(PageKind::Home);
    session(home.clone()).init_home(&mut doc)?;
    write_page(output, "index.html", render_home_page(&ctx, &doc))?;
    report.pages.push(GeneratedPage {
        kind: PageKind::Home,
        title: config.labels.home.clone(),
        path: "index.html".to_string(),
        images: 0,
    });

    let manifest = loader.load()?;
    report.issues = manifest.validate();
    for issue in &report.issues {
        warn!(%issue, "manifest issue");
    }

    // Series list
    let series_location = home.sibling("series.html")?;
    let mut doc = StaticDocument::new(PageKind::Series);
    let page = session(series_location.clone()).init_series(&mut doc)?;
    let overlay = page
        .lightbox()
        .map(|lb| lb.view().clone())
        .unwrap_or_default();
    write_page(output, "series.html", render_series_page(&ctx, &doc, &overlay))?;
    report.pages.push(GeneratedPage {
        kind: PageKind::Series,
        title: config.labels.series.clone(),
        path: "series.html".to_string(),
        images: 0,
    });

    // Viewer pages
    for (position, series) in manifest.series.iter().enumerate() {
        if series.images.is_empty() {
            continue;
        }
        let is_first = manifest
            .find_series(&series.slug)
            .is_some_and(|first| std::ptr::eq(first, series));
        if !is_first {
            continue;
        }

        let deep_link = series_location.with_fragment(Some(&encode_component(&series.slug)));
        let mut doc = StaticDocument::new(PageKind::Viewer);
        let mut page = session(deep_link).init_series(&mut doc)?;

        let len = series.images.len();
        let mut written = 0;
        for _ in 0..len {
            let Some(lightbox) = page.lightbox() else {
                break;
            };
            let Some(index) = lightbox.index() else {
                break;
            };
            let targets = ViewerTargets {
                close: ctx.series_url(),
                prev: ctx.viewer_url(position, (index + len - 1) % len),
                next: ctx.viewer_url(position, (index + 1) % len),
            };
            let html = render_viewer_page(&ctx, &doc, lightbox.view(), &targets);
            write_page(output, &viewer_path(position, index), html)?;
            written += 1;
            page.handle(LightboxEvent::NextClicked);
        }

        report.pages.push(GeneratedPage {
            kind: PageKind::Viewer,
            title: series.title.clone(),
            path: format!("series/{}/", position + 1),
            images: written,
        });
    }

    // Not found
    let mut doc = StaticDocument::new(PageKind::Plain);
    session(home.sibling("404.html")?).init_common(&mut doc);
    write_page(output, "404.html", render_not_found_page(&ctx, &doc))?;
    report.pages.push(GeneratedPage {
        kind: PageKind::Plain,
        title: config.labels.not_found.clone(),
        path: "404.html".to_string(),
        images: 0,
    });

    report.fetches = loader.fetch_count();
    info!(pages = report.pages.len(), output = %output.display(), "site rendered");
    Ok(report)
}

/// Relative path of the viewer page for image `index` of the series at `position`.
fn viewer_path(position: usize, index: usize) -> String {
    format!("series/{}/{}.html", position + 1, index + 1)
}

fn write_page(output: &Path, relative: &str, markup: Markup) -> Result<(), BuildError> {
    let path = output.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, markup.into_string())?;
    Ok(())
}

/// Copy everything in `source` except the manifest and `config.toml`.
/// An output directory nested inside the source is skipped.
fn copy_assets(source: &Path, output: &Path, config: &SiteConfig) -> Result<usize, BuildError> {
    if source == output {
        return Ok(0);
    }
    let manifest = source.join(&config.manifest);
    let config_file = source.join("config.toml");

    let mut copied = 0;
    let walker = walkdir::WalkDir::new(source)
        .into_iter()
        .filter_entry(|e| e.path() != output);
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path == manifest || path == config_file {
            continue;
        }
        let dest = output.join(path.strip_prefix(source)?);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)?;
        copied += 1;
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

struct PageContext<'a> {
    config: &'a SiteConfig,
    css: String,
    home: &'a Location,
}

impl PageContext<'_> {
    fn home_url(&self) -> String {
        self.home.resolve("index.html")
    }

    fn series_url(&self) -> String {
        self.home.resolve("series.html")
    }

    fn viewer_base(&self) -> String {
        self.home.resolve("series/")
    }

    fn viewer_url(&self, position: usize, index: usize) -> String {
        self.home.resolve(&viewer_path(position, index))
    }
}

/// Where the viewer page controls lead.
struct ViewerTargets {
    close: String,
    prev: String,
    next: String,
}

/// Renders the base HTML document structure
fn base_document(ctx: &PageContext, title: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(ctx.config.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if let Some(href) = ctx.home.base_override() {
                    base href=(href);
                }
                style { (PreEscaped(&ctx.css)) }
            }
            body class=[body_class] {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Renders the site header with the home/series navigation
fn site_header(ctx: &PageContext, current: PageKind) -> Markup {
    let labels = &ctx.config.labels;
    html! {
        header.site-header {
            a.site-title href=(ctx.home_url()) { (ctx.config.site_title) }
            nav.site-nav {
                a href=(ctx.home_url()) class=[(current == PageKind::Home).then_some("current")] {
                    (labels.home)
                }
                a href=(ctx.series_url()) class=[(current == PageKind::Series).then_some("current")] {
                    (labels.series)
                }
            }
        }
    }
}

fn site_footer(ctx: &PageContext, doc: &StaticDocument) -> Markup {
    html! {
        footer.site-footer {
            "© "
            span #year { @if let Some(year) = doc.year() { (year) } }
            " " (ctx.config.site_title)
        }
    }
}

fn status_message(doc: &StaticDocument) -> Markup {
    html! {
        @if let Some(message) = doc.status() {
            p #status.status role="alert" { (message) }
        }
    }
}

/// `background-image` declaration for the hero; quotes in the URL are
/// percent-encoded so they cannot end the CSS string.
fn hero_style(url: &str) -> String {
    format!(
        "background-image: url(\"{}\")",
        url.replace('"', "%22").replace('\\', "%5C")
    )
}

/// The lightbox overlay. Viewer pages get link controls and `data-*`
/// targets, the series list gets inert buttons.
fn lightbox_overlay(ctx: &PageContext, snapshot: &OverlaySnapshot, targets: Option<&ViewerTargets>) -> Markup {
    let labels = &ctx.config.labels;
    html! {
        div #lightbox.lightbox.is-open[snapshot.visible]
            aria-hidden=(if snapshot.visible { "false" } else { "true" })
            data-close=[targets.map(|t| t.close.as_str())]
            data-prev=[targets.map(|t| t.prev.as_str())]
            data-next=[targets.map(|t| t.next.as_str())] {
            @if let Some(t) = targets {
                a #lb-close.lightbox__close href=(t.close) aria-label=(labels.close) { "×" }
                a #lb-prev.lightbox__nav.lightbox__nav--prev href=(t.prev) aria-label=(labels.prev) { "‹" }
                a #lb-next.lightbox__nav.lightbox__nav--next href=(t.next) aria-label=(labels.next) { "›" }
            } @else {
                button #lb-close.lightbox__close type="button" aria-label=(labels.close) { "×" }
                button #lb-prev.lightbox__nav.lightbox__nav--prev type="button" aria-label=(labels.prev) { "‹" }
                button #lb-next.lightbox__nav.lightbox__nav--next type="button" aria-label=(labels.next) { "›" }
            }
            figure.lightbox__figure {
                img #lb-img src=(snapshot.image_url) alt=(snapshot.image_alt);
                figcaption.lightbox__caption {
                    span #lb-title { (snapshot.title) }
                    span #lb-count { (snapshot.counter) }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_home_page(ctx: &PageContext, doc: &StaticDocument) -> Markup {
    let content = html! {
        (site_header(ctx, PageKind::Home))
        main.home-page {
            section #hero.hero style=[doc.hero_image().map(hero_style)] {
                h1.hero__title { (ctx.config.site_title) }
            }
            (status_message(doc))
            div #featured-grid.featured-grid {
                (PreEscaped(doc.featured_grid().unwrap_or("")))
            }
        }
        (site_footer(ctx, doc))
    };

    base_document(ctx, &ctx.config.site_title, None, content)
}

fn render_series_page(ctx: &PageContext, doc: &StaticDocument, overlay: &OverlaySnapshot) -> Markup {
    let labels = &ctx.config.labels;
    let content = html! {
        (site_header(ctx, PageKind::Series))
        main.series-page {
            h1 { (labels.series) }
            (status_message(doc))
            div #series-list.series-list data-viewer-base=(ctx.viewer_base()) {
                (PreEscaped(doc.series_list().unwrap_or("")))
            }
        }
        (lightbox_overlay(ctx, overlay, None))
        (site_footer(ctx, doc))
    };

    let title = format!("{} - {}", labels.series, ctx.config.site_title);
    base_document(ctx, &title, None, content)
}

fn render_viewer_page(
    ctx: &PageContext,
    doc: &StaticDocument,
    overlay: &OverlaySnapshot,
    targets: &ViewerTargets,
) -> Markup {
    let content = html! {
        (site_header(ctx, PageKind::Viewer))
        (lightbox_overlay(ctx, overlay, Some(targets)))
        (site_footer(ctx, doc))
    };

    let title = format!("{} ({}) - {}", overlay.title, overlay.counter, ctx.config.site_title);
    base_document(ctx, &title, Some("viewer"), content)
}

fn render_not_found_page(ctx: &PageContext, doc: &StaticDocument) -> Markup {
    let labels = &ctx.config.labels;
    let content = html! {
        (site_header(ctx, PageKind::Plain))
        main.not-found-page {
            h1 { (labels.not_found) }
            p { a href=(ctx.home_url()) { (labels.home) } }
        }
        (site_footer(ctx, doc))
    };

    base_document(ctx, &labels.not_found, None, content)
}

// ============================================================================
// Tests
// ============================================================================
