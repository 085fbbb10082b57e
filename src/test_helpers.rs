//! Shared test utilities for the folio test suite.
//!
//! Provides a sample manifest, small constructors for manifest records, and
//! in-memory stand-ins for the three seams the runtime talks through: the
//! transport ([`StubFetch`]), the lightbox overlay ([`RecordingView`]) and the
//! page ([`FakeDocument`]).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let stub = StubFetch::ok(SAMPLE_MANIFEST);
//! let loader = ContentLoader::new(&stub, url);
//! let session = Session::new(&loader, location);
//! let mut doc = FakeDocument::full();
//! session.init_home(&mut doc).unwrap();
//! assert_eq!(stub.calls(), 1);
//! ```

use std::cell::Cell;

use crate::lightbox::LightboxView;
use crate::loader::{Fetch, FetchResponse, LoadError};
use crate::manifest::{ContentManifest, Item, Series};
use crate::page::Document;
use maud::Markup;
use reqwest::Url;

// =========================================================================
// Manifest fixtures
// =========================================================================

pub const SAMPLE_MANIFEST: &str = r#"{
  "site": { "heroImage": "images/cover/hero.jpg" },
  "featured": [
    { "slug": "river", "title": "River", "subtitle": "Loire, 2021", "cover": "images/river/cover.jpg" },
    { "slug": "fog", "title": "Fog & Light", "cover": "images/fog/cover.jpg" }
  ],
  "series": [
    {
      "slug": "river",
      "title": "River",
      "year": 2021,
      "description": "Along the Loire.",
      "images": ["images/river/01.jpg", "images/river/02.jpg"]
    },
    {
      "slug": "fog",
      "title": "Fog & Light",
      "year": "2019",
      "images": ["images/fog/01.jpg", "images/fog/02.jpg", "images/fog/03.jpg"]
    },
    {
      "slug": "night walks",
      "title": "Night Walks",
      "images": ["images/night/01.jpg"]
    }
  ]
}"#;

pub fn sample_manifest() -> ContentManifest {
    serde_json::from_str(SAMPLE_MANIFEST).unwrap()
}

/// Capitalize the first letter: `"river"` → `"River"`.
fn title_from_slug(slug: &str) -> String {
    let mut chars = slug.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Series titled after its slug, no year or description.
pub fn series(slug: &str, images: &[&str]) -> Series {
    Series {
        slug: slug.to_string(),
        title: title_from_slug(slug),
        year: None,
        description: None,
        images: images.iter().map(|s| s.to_string()).collect(),
    }
}

/// Featured item with cover `images/<slug>/cover.jpg`.
pub fn item(slug: &str, title: &str) -> Item {
    Item {
        slug: slug.to_string(),
        title: title.to_string(),
        subtitle: None,
        cover: format!("images/{slug}/cover.jpg"),
    }
}

// =========================================================================
// Transport
// =========================================================================

/// Returns the same response for every request and counts requests.
pub struct StubFetch {
    status: u16,
    body: String,
    calls: Cell<usize>,
}

impl StubFetch {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            calls: Cell::new(0),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Fetch for StubFetch {
    fn fetch(&self, _url: &Url) -> Result<FetchResponse, LoadError> {
        self.calls.set(self.calls.get() + 1);
        Ok(FetchResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

// =========================================================================
// Views and documents
// =========================================================================

/// Keeps the last value of every lightbox output.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub visible: bool,
    /// `(url, alt)`
    pub image: Option<(String, String)>,
    pub title: Option<String>,
    pub counter: Option<String>,
    /// Number of `render_image` calls.
    pub renders: usize,
}

impl LightboxView for RecordingView {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn render_image(&mut self, url: &str, alt: &str) {
        self.image = Some((url.to_string(), alt.to_string()));
        self.renders += 1;
    }

    fn render_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn render_counter(&mut self, text: &str) {
        self.counter = Some(text.to_string());
    }
}

/// Page with every element present; records what was written.
#[derive(Debug, Default)]
pub struct FakeDocument {
    pub year: Option<i32>,
    pub hero: Option<String>,
    pub featured: Option<String>,
    pub series_list: Option<String>,
    pub unavailable: Option<String>,
    overlay: Option<RecordingView>,
}

impl FakeDocument {
    pub fn full() -> Self {
        Self {
            overlay: Some(RecordingView::default()),
            ..Self::default()
        }
    }

    pub fn without_overlay() -> Self {
        Self::default()
    }
}

impl Document for FakeDocument {
    type Overlay = RecordingView;

    fn set_year(&mut self, year: i32) {
        self.year = Some(year);
    }

    fn set_hero_image(&mut self, url: &str) {
        self.hero = Some(url.to_string());
    }

    fn set_featured_grid(&mut self, markup: Markup) {
        self.featured = Some(markup.into_string());
    }

    fn set_series_list(&mut self, markup: Markup) {
        self.series_list = Some(markup.into_string());
    }

    fn show_unavailable(&mut self, message: &str) {
        self.unavailable = Some(message.to_string());
    }

    fn take_overlay(&mut self) -> Option<RecordingView> {
        self.overlay.take()
    }
}
