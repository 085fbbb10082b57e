//! Per-page initialization: what runs when a page loads.
//!
//! A [`Session`] is one page load. It borrows the [`ContentLoader`] (so several
//! pages can share one fetched manifest), knows the page [`Location`], and
//! wires the manifest, the markup renderer and the lightbox into a
//! [`Document`].
//!
//! | Initializer | Elements touched |
//! |-------------|------------------|
//! | [`Session::init_common`] | year |
//! | [`Session::init_home`] | year, hero, featured grid |
//! | [`Session::init_series`] | year, series list, lightbox overlay |
//!
//! When the manifest cannot be loaded the page keeps its static shell, shows
//! the "content unavailable" message, and the error is returned to the caller.

use crate::config::{Labels, SiteConfig};
use crate::lightbox::{Lightbox, LightboxEvent, LightboxView};
use crate::loader::{ContentLoader, Fetch, HttpFetch, LoadError};
use crate::location::Location;
use crate::manifest::ContentManifest;
use crate::render::{render_featured_grid, render_series_list};
use chrono::Datelike;
use maud::Markup;
use tracing::{debug, warn};

/// The DOM contract. Every element is optional: writes to an element the page
/// does not have are silently dropped.
pub trait Document {
    type Overlay: LightboxView;

    fn set_year(&mut self, year: i32);
    /// `url` is already absolute.
    fn set_hero_image(&mut self, url: &str);
    fn set_featured_grid(&mut self, markup: Markup);
    fn set_series_list(&mut self, markup: Markup);
    /// Visible fallback when the content cannot be loaded.
    fn show_unavailable(&mut self, message: &str);
    /// Hand the lightbox overlay to its controller. `None` when the page has
    /// no overlay (or it was already taken).
    fn take_overlay(&mut self) -> Option<Self::Overlay>;
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub struct Session<'a, F = HttpFetch> {
    loader: &'a ContentLoader<F>,
    location: Location,
    year: i32,
    default_hero: String,
    labels: Labels,
}

impl<'a, F: Fetch> Session<'a, F> {
    pub fn new(loader: &'a ContentLoader<F>, location: Location) -> Self {
        let defaults = SiteConfig::default();
        Self {
            loader,
            location,
            year: current_year(),
            default_hero: defaults.default_hero,
            labels: defaults.labels,
        }
    }

    /// Session using the hero fallback and labels from `config`.
    pub fn configured(loader: &'a ContentLoader<F>, location: Location, config: &SiteConfig) -> Self {
        Self::new(loader, location)
            .with_default_hero(config.default_hero.clone())
            .with_labels(config.labels.clone())
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn with_default_hero(mut self, path: impl Into<String>) -> Self {
        self.default_hero = path.into();
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Pages without galleries only get the year.
    pub fn init_common<D: Document>(&self, doc: &mut D) {
        doc.set_year(self.year);
    }

    pub fn init_home<D: Document>(&self, doc: &mut D) -> Result<(), LoadError> {
        self.init_common(doc);
        let manifest = self.load_or_report(doc)?;

        let hero = manifest.hero_image().unwrap_or(&self.default_hero);
        doc.set_hero_image(&self.location.resolve(hero));
        doc.set_featured_grid(render_featured_grid(&manifest.featured, &self.location));
        Ok(())
    }

    /// Render the series list, bind the lightbox, and follow a `#<slug>` deep
    /// link if the location has one.
    pub fn init_series<D: Document>(&self, doc: &mut D) -> Result<SeriesPage<'a, D::Overlay>, LoadError> {
        self.init_common(doc);
        let manifest = self.load_or_report(doc)?;

        let lightbox = Lightbox::bind(doc.take_overlay(), self.location.clone());
        doc.set_series_list(render_series_list(
            &manifest.series,
            &self.location,
            &self.labels,
        ));

        let mut page = SeriesPage { manifest, lightbox };
        if let Some(slug) = self.location.fragment_slug() {
            debug!(%slug, "following deep link");
            page.activate(&slug);
        }
        Ok(page)
    }

    fn load_or_report<D: Document>(&self, doc: &mut D) -> Result<&'a ContentManifest, LoadError> {
        let loader: &'a ContentLoader<F> = self.loader;
        loader.load().inspect_err(|e| {
            warn!(error = %e, "content unavailable");
            doc.show_unavailable(&self.labels.content_unavailable);
        })
    }
}

/// A loaded series-listing page: the manifest plus the bound lightbox.
pub struct SeriesPage<'a, V> {
    manifest: &'a ContentManifest,
    lightbox: Option<Lightbox<V>>,
}

impl<'a, V: LightboxView> SeriesPage<'a, V> {
    /// Click on the entry with this slug: open its series at the first image.
    ///
    /// Unknown slugs, a missing overlay and empty series are ignored. Returns
    /// whether the lightbox opened.
    pub fn activate(&mut self, slug: &str) -> bool {
        let Some(series) = self.manifest.find_series(slug) else {
            debug!(slug, "no series with this slug");
            return false;
        };
        let Some(lightbox) = self.lightbox.as_mut() else {
            return false;
        };
        match lightbox.open(series, 0) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "cannot open series");
                false
            }
        }
    }

    /// Forward a lightbox event. No-op without an overlay.
    pub fn handle(&mut self, event: LightboxEvent) -> bool {
        self.lightbox.as_mut().is_some_and(|lb| lb.handle(event))
    }

    pub fn lightbox(&self) -> Option<&Lightbox<V>> {
        self.lightbox.as_ref()
    }
}
