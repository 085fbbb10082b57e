//! HTML fragments for featured cards and series entries.
//!
//! Fragments are built with [maud](https://maud.lambda.xyz/), so every
//! interpolation is escaped unless it is explicitly wrapped in `PreEscaped`.
//! Text that comes from the manifest (titles, subtitles, years, descriptions,
//! slugs) additionally goes through [`Escaped`], which also replaces the single
//! quote. Image paths are resolved to absolute URLs against the page location.

use crate::config::Labels;
use crate::location::{Location, encode_component};
use crate::manifest::{Item, Series};
use maud::{Markup, Render, html};

/// Manifest text, escaped for both element content and quoted attributes:
/// `&`, `<`, `>`, `"` and `'`.
pub struct Escaped<'a>(pub &'a str);

impl Render for Escaped<'_> {
    fn render_to(&self, buffer: &mut String) {
        for c in self.0.chars() {
            match c {
                '&' => buffer.push_str("&amp;"),
                '<' => buffer.push_str("&lt;"),
                '>' => buffer.push_str("&gt;"),
                '"' => buffer.push_str("&quot;"),
                '\'' => buffer.push_str("&#039;"),
                _ => buffer.push(c),
            }
        }
    }
}

/// Link target of a featured card: the series page, deep-linked by slug.
pub fn series_href(slug: &str) -> String {
    format!("series.html#{}", encode_component(slug))
}

/// A featured card on the home page.
pub fn render_card(item: &Item, location: &Location) -> Markup {
    html! {
        a.card href=(series_href(&item.slug)) aria-label=(Escaped(&item.title)) {
            img.card__img src=(location.resolve(&item.cover)) alt=(Escaped(&item.title)) loading="lazy";
            div.card__body {
                h3.card__title { (Escaped(&item.title)) }
                p.card__sub { (Escaped(item.subtitle.as_deref().unwrap_or(""))) }
            }
        }
    }
}

/// A clickable entry in the series list. The first image is the thumbnail;
/// a series without images gets an empty `src`.
pub fn render_series_entry(series: &Series, location: &Location, labels: &Labels) -> Markup {
    let thumbnail = series
        .thumbnail()
        .map(|path| location.resolve(path))
        .unwrap_or_default();

    html! {
        button.series-item type="button"
            data-slug=(Escaped(&series.slug))
            aria-label={ (Escaped(&labels.open)) " " (Escaped(&series.title)) } {
            img src=(thumbnail) alt=(Escaped(&series.title)) loading="lazy";
            div.series-item__body {
                h2.series-item__title { (Escaped(&series.title)) }
                div.series-item__meta { (Escaped(series.year.as_deref().unwrap_or(""))) }
                p.series-item__desc { (Escaped(series.description.as_deref().unwrap_or(""))) }
                div.series-item__meta.series-item__hint { (Escaped(&labels.click_to_open)) }
            }
        }
    }
}

pub fn render_featured_grid(items: &[Item], location: &Location) -> Markup {
    html! {
        @for item in items {
            (render_card(item, location))
        }
    }
}

pub fn render_series_list(series: &[Series], location: &Location, labels: &Labels) -> Markup {
    html! {
        @for s in series {
            (render_series_entry(s, location, labels))
        }
    }
}
