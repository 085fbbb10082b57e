//! In-memory page used by the static build.
//!
//! A [`StaticDocument`] has the elements its [`PageKind`] declares and records
//! what the initializers write into them. The lightbox overlay is handed out
//! as an [`OverlaySnapshot`], which the controller updates and the page
//! templates later read back.

use crate::lightbox::LightboxView;
use crate::page::Document;
use maud::Markup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Year,
    Hero,
    FeaturedGrid,
    SeriesList,
    Status,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// `index.html`
    Home,
    /// `series.html`
    Series,
    /// One lightbox snapshot per image.
    Viewer,
    /// Static pages without galleries (`404.html`).
    Plain,
}

impl PageKind {
    pub fn elements(self) -> &'static [Element] {
        match self {
            Self::Home => &[Element::Year, Element::Hero, Element::FeaturedGrid, Element::Status],
            Self::Series => &[Element::Year, Element::SeriesList, Element::Status, Element::Overlay],
            Self::Viewer => &[Element::Year, Element::Overlay],
            Self::Plain => &[Element::Year],
        }
    }

    pub fn has(self, element: Element) -> bool {
        self.elements().contains(&element)
    }
}

/// Last state pushed to the overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlaySnapshot {
    pub visible: bool,
    pub image_url: String,
    pub image_alt: String,
    pub title: String,
    pub counter: String,
}

impl LightboxView for OverlaySnapshot {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn render_image(&mut self, url: &str, alt: &str) {
        self.image_url = url.to_string();
        self.image_alt = alt.to_string();
    }

    fn render_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn render_counter(&mut self, text: &str) {
        self.counter = text.to_string();
    }
}

#[derive(Debug)]
pub struct StaticDocument {
    kind: PageKind,
    year: Option<i32>,
    hero_image: Option<String>,
    featured_grid: Option<String>,
    series_list: Option<String>,
    status: Option<String>,
    overlay_taken: bool,
}

impl StaticDocument {
    pub fn new(kind: PageKind) -> Self {
        Self {
            kind,
            year: None,
            hero_image: None,
            featured_grid: None,
            series_list: None,
            status: None,
            overlay_taken: false,
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn hero_image(&self) -> Option<&str> {
        self.hero_image.as_deref()
    }

    pub fn featured_grid(&self) -> Option<&str> {
        self.featured_grid.as_deref()
    }

    pub fn series_list(&self) -> Option<&str> {
        self.series_list.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn has(&self, element: Element) -> bool {
        self.kind.has(element)
    }
}

impl Document for StaticDocument {
    type Overlay = OverlaySnapshot;

    fn set_year(&mut self, year: i32) {
        if self.has(Element::Year) {
            self.year = Some(year);
        }
    }

    fn set_hero_image(&mut self, url: &str) {
        if self.has(Element::Hero) {
            self.hero_image = Some(url.to_string());
        }
    }

    fn set_featured_grid(&mut self, markup: Markup) {
        if self.has(Element::FeaturedGrid) {
            self.featured_grid = Some(markup.into_string());
        }
    }

    fn set_series_list(&mut self, markup: Markup) {
        if self.has(Element::SeriesList) {
            self.series_list = Some(markup.into_string());
        }
    }

    fn show_unavailable(&mut self, message: &str) {
        if self.has(Element::Status) {
            self.status = Some(message.to_string());
        }
    }

    fn take_overlay(&mut self) -> Option<OverlaySnapshot> {
        if !self.has(Element::Overlay) || self.overlay_taken {
            return None;
        }
        self.overlay_taken = true;
        Some(OverlaySnapshot::default())
    }
}
