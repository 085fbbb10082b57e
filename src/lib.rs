//! # Folio
//!
//! A photography portfolio site: a home page with a hero image and featured
//! cards, and a series page whose entries open a full-screen lightbox. All
//! content comes from one JSON manifest fetched once per session.
//!
//! # Architecture
//!
//! The page runtime is modeled without a browser. Each page load is a
//! [`page::Session`] that borrows a [`loader::ContentLoader`], renders markup
//! with [`render`], and drives a [`lightbox::Lightbox`] through the
//! [`page::Document`] and [`lightbox::LightboxView`] traits. The static build
//! runs the same initializers against in-memory pages and writes the result:
//!
//! ```text
//! content.json ──fetch once──▶ ContentManifest
//!                                   │
//!        ┌──────────────┬───────────┴────────────┬───────────────────┐
//!   init_home      init_series            init_series + #slug     init_common
//!        │              │                  (+ next, per image)         │
//!   index.html     series.html          series/<n>/<i>.html        404.html
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`location`] | Page URL, `<base href>` override, path resolution, fragment decoding |
//! | [`manifest`] | `content.json` types, lookups, validation warnings |
//! | [`loader`] | Memoized manifest fetch over HTTP or `file://` |
//! | [`render`] | HTML-escaped featured cards and series entries |
//! | [`lightbox`] | Open/closed state machine for the series viewer |
//! | [`page`] | Page initializers and the DOM contract |
//! | [`document`] | In-memory pages used by the static build |
//! | [`generate`] | Static site build with Maud templates |
//! | [`config`] | `config.toml` loading, validation, CSS color generation |
//! | [`output`] | CLI output formatting and the terminal lightbox |
//!
//! # Design Decisions
//!
//! ## One Fetch Per Session
//!
//! The loader caches the first successful result and every page initializer
//! asks the loader rather than holding its own copy. Failures are not cached,
//! so a later call retries.
//!
//! ## Absolute URLs Everywhere
//!
//! Image paths in the manifest are relative to the site root. They are
//! resolved against the page's base (the `<base href>` override when set,
//! else the page's directory) before they reach the markup, so the same
//! manifest works from any page depth.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a build error and every interpolation is escaped. Manifest text goes
//! through [`render::Escaped`], which also escapes single quotes.
//!
//! ## Static Viewer Pages
//!
//! The lightbox is a state machine, so the build can walk it: deep-link into a
//! series, then step with `next` and snapshot the overlay for every image.
//! The embedded script only maps keys and clicks to links between those pages.

pub mod config;
pub mod document;
pub mod generate;
pub mod lightbox;
pub mod loader;
pub mod location;
pub mod manifest;
pub mod output;
pub mod page;
pub mod render;

#[cfg(test)]
pub(crate) mod test_helpers;
