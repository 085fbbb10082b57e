//! Lightbox: the full-screen viewer for one series at a time.
//!
//! The controller is a two-state machine, `Closed` and `Open(series, index)`.
//! It never touches a page directly; everything visible goes through a
//! [`LightboxView`], so the same controller drives a browser overlay, a static
//! snapshot, or a terminal.
//!
//! ```text
//!            open(s, i)                 next / prev (index wraps)
//! Closed ───────────────▶ Open(s, i) ◀──────────────┐
//!   ▲                        │  │                   │
//!   └──────── close ─────────┘  └───────────────────┘
//! ```
//!
//! Navigation wraps: `next` from the last image shows the first, `prev` from
//! the first shows the last. Keyboard events are delivered at all times and
//! ignored while closed.

use crate::location::Location;
use crate::manifest::Series;
use thiserror::Error;
use tracing::{debug, trace};

/// Rendering surface for the overlay.
pub trait LightboxView {
    /// Show or hide the overlay, including its `aria-hidden` state.
    fn set_visible(&mut self, visible: bool);
    fn render_image(&mut self, url: &str, alt: &str);
    fn render_title(&mut self, title: &str);
    /// `"3 / 12"`
    fn render_counter(&mut self, text: &str);
}

impl<V: LightboxView + ?Sized> LightboxView for &mut V {
    fn set_visible(&mut self, visible: bool) {
        (**self).set_visible(visible);
    }
    fn render_image(&mut self, url: &str, alt: &str) {
        (**self).render_image(url, alt);
    }
    fn render_title(&mut self, title: &str) {
        (**self).render_title(title);
    }
    fn render_counter(&mut self, text: &str) {
        (**self).render_counter(text);
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum LightboxError {
    #[error("series '{slug}' has no images")]
    EmptySeries { slug: String },
    #[error("image {index} is out of range for series '{slug}' ({len} images)")]
    IndexOutOfRange {
        slug: String,
        index: usize,
        len: usize,
    },
}

/// While `Open`, `index < series.images.len()` and the series is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub enum LightboxState {
    Closed,
    Open { series: Series, index: usize },
}

/// Keys the lightbox reacts to, by DOM `KeyboardEvent.key` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowRight,
    ArrowLeft,
    Other,
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Self::Escape,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxEvent {
    CloseClicked,
    NextClicked,
    PrevClicked,
    /// A click inside the overlay. `on_backdrop` is true when the overlay
    /// element itself was the target, false for clicks on its content.
    OverlayClicked { on_backdrop: bool },
    Key(Key),
}

pub struct Lightbox<V> {
    view: V,
    location: Location,
    state: LightboxState,
}

impl<V: LightboxView> Lightbox<V> {
    /// Bind the controller to an overlay. Without an overlay there is no
    /// lightbox at all.
    pub fn bind(view: Option<V>, location: Location) -> Option<Self> {
        let Some(view) = view else {
            debug!("no lightbox overlay on this page");
            return None;
        };
        Some(Self {
            view,
            location,
            state: LightboxState::Closed,
        })
    }

    pub fn state(&self) -> &LightboxState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open { .. })
    }

    pub fn current_series(&self) -> Option<&Series> {
        match &self.state {
            LightboxState::Open { series, .. } => Some(series),
            LightboxState::Closed => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self.state {
            LightboxState::Open { index, .. } => Some(index),
            LightboxState::Closed => None,
        }
    }

    /// `"position / total"`, 1-indexed.
    pub fn counter(&self) -> Option<String> {
        match &self.state {
            LightboxState::Open { series, index } => {
                Some(format!("{} / {}", index + 1, series.images.len()))
            }
            LightboxState::Closed => None,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Show `series` starting at `start`. Works from either state.
    ///
    /// An empty series or an out-of-range start is rejected and the current
    /// state is kept.
    pub fn open(&mut self, series: &Series, start: usize) -> Result<(), LightboxError> {
        let len = series.images.len();
        if len == 0 {
            return Err(LightboxError::EmptySeries {
                slug: series.slug.clone(),
            });
        }
        if start >= len {
            return Err(LightboxError::IndexOutOfRange {
                slug: series.slug.clone(),
                index: start,
                len,
            });
        }

        debug!(slug = %series.slug, index = start, "lightbox open");
        self.state = LightboxState::Open {
            series: series.clone(),
            index: start,
        };
        self.view.set_visible(true);
        self.render();
        Ok(())
    }

    pub fn next(&mut self) {
        if let LightboxState::Open { series, index } = &mut self.state {
            *index = (*index + 1) % series.images.len();
            self.render();
        }
    }

    pub fn prev(&mut self) {
        if let LightboxState::Open { series, index } = &mut self.state {
            let len = series.images.len();
            *index = (*index + len - 1) % len;
            self.render();
        }
    }

    /// Hide the overlay. Safe to call when already closed.
    pub fn close(&mut self) {
        if self.is_open() {
            debug!("lightbox close");
        }
        self.state = LightboxState::Closed;
        self.view.set_visible(false);
    }

    /// Dispatch a DOM-level event. Returns whether the event was acted on.
    pub fn handle(&mut self, event: LightboxEvent) -> bool {
        trace!(?event, open = self.is_open(), "lightbox event");
        match event {
            LightboxEvent::CloseClicked | LightboxEvent::OverlayClicked { on_backdrop: true } => {
                self.close();
                true
            }
            LightboxEvent::OverlayClicked { on_backdrop: false } => false,
            LightboxEvent::NextClicked => {
                self.next();
                self.is_open()
            }
            LightboxEvent::PrevClicked => {
                self.prev();
                self.is_open()
            }
            LightboxEvent::Key(_) if !self.is_open() => false,
            LightboxEvent::Key(Key::Escape) => {
                self.close();
                true
            }
            LightboxEvent::Key(Key::ArrowRight) => {
                self.next();
                true
            }
            LightboxEvent::Key(Key::ArrowLeft) => {
                self.prev();
                true
            }
            LightboxEvent::Key(Key::Other) => false,
        }
    }

    fn render(&mut self) {
        let LightboxState::Open { series, index } = &self.state else {
            return;
        };
        let url = self.location.resolve(&series.images[*index]);
        let counter = format!("{} / {}", index + 1, series.images.len());
        self.view.render_image(&url, &series.title);
        self.view.render_title(&series.title);
        self.view.render_counter(&counter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn location() -> Location {
        Location::parse("https://example.com/site/series.html").unwrap()
    }

    fn bound() -> Lightbox<RecordingView> {
        Lightbox::bind(Some(RecordingView::default()), location()).unwrap()
    }

    fn images(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{i}.jpg")).collect()
    }

    fn series_of(n: usize) -> Series {
        let paths = images(n);
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        series("s", &refs)
    }

    #[test]
    fn bind_without_overlay_is_none() {
        assert!(Lightbox::<RecordingView>::bind(None, location()).is_none());
    }

    #[test]
    fn starts_closed_without_rendering() {
        let lb = bound();
        assert_eq!(lb.state(), &LightboxState::Closed);
        assert_eq!(lb.view().renders, 0);
        assert_eq!(lb.counter(), None);
    }

    #[test]
    fn open_shows_and_renders() {
        let mut lb = bound();
        lb.open(&series("river", &["a.jpg", "b.jpg"]), 0).unwrap();

        let view = lb.view();
        assert!(view.visible);
        assert_eq!(
            view.image,
            Some((
                "https://example.com/site/a.jpg".to_string(),
                "River".to_string()
            ))
        );
        assert_eq!(view.title.as_deref(), Some("River"));
        assert_eq!(view.counter.as_deref(), Some("1 / 2"));
    }

    #[test]
    fn river_walkthrough() {
        let mut lb = bound();
        lb.open(&series("river", &["a.jpg", "b.jpg"]), 0).unwrap();
        assert_eq!(lb.counter().as_deref(), Some("1 / 2"));
        lb.next();
        assert_eq!(lb.view().counter.as_deref(), Some("2 / 2"));
        lb.next();
        assert_eq!(lb.view().counter.as_deref(), Some("1 / 2"));
    }

    #[test]
    fn next_n_times_is_identity() {
        for n in 1..=6 {
            for start in 0..n {
                let mut lb = bound();
                lb.open(&series_of(n), start).unwrap();
                for _ in 0..n {
                    lb.next();
                }
                assert_eq!(lb.index(), Some(start), "n={n} start={start}");
            }
        }
    }

    #[test]
    fn prev_n_times_is_identity() {
        for n in 1..=6 {
            for start in 0..n {
                let mut lb = bound();
                lb.open(&series_of(n), start).unwrap();
                for _ in 0..n {
                    lb.prev();
                }
                assert_eq!(lb.index(), Some(start), "n={n} start={start}");
            }
        }
    }

    #[test]
    fn next_then_prev_returns_to_start() {
        for n in 1..=5 {
            for start in 0..n {
                let mut lb = bound();
                lb.open(&series_of(n), start).unwrap();
                lb.next();
                lb.prev();
                assert_eq!(lb.index(), Some(start));
                lb.prev();
                lb.next();
                assert_eq!(lb.index(), Some(start));
            }
        }
    }

    #[test]
    fn prev_wraps_from_first_to_last() {
        let mut lb = bound();
        lb.open(&series_of(4), 0).unwrap();
        lb.prev();
        assert_eq!(lb.index(), Some(3));
        assert_eq!(lb.view().image.as_ref().unwrap().0, "https://example.com/site/3.jpg");
    }

    #[test]
    fn close_is_idempotent() {
        let mut lb = bound();
        lb.open(&series_of(2), 1).unwrap();
        lb.close();
        assert_eq!(lb.state(), &LightboxState::Closed);
        assert!(!lb.view().visible);
        lb.close();
        assert_eq!(lb.state(), &LightboxState::Closed);
        assert!(!lb.view().visible);
    }

    #[test]
    fn navigation_while_closed_is_noop() {
        let mut lb = bound();
        lb.next();
        lb.prev();
        assert_eq!(lb.state(), &LightboxState::Closed);
        assert_eq!(lb.view().renders, 0);
    }

    #[test]
    fn open_replaces_current_series() {
        let mut lb = bound();
        lb.open(&series("a", &["1.jpg", "2.jpg"]), 1).unwrap();
        lb.open(&series("b", &["x.jpg", "y.jpg", "z.jpg"]), 2).unwrap();
        assert_eq!(lb.current_series().unwrap().slug, "b");
        assert_eq!(lb.counter().as_deref(), Some("3 / 3"));
    }

    #[test]
    fn empty_series_is_rejected() {
        let mut lb = bound();
        let err = lb.open(&series("empty", &[]), 0).unwrap_err();
        assert_eq!(
            err,
            LightboxError::EmptySeries {
                slug: "empty".to_string()
            }
        );
        assert_eq!(lb.state(), &LightboxState::Closed);
        assert!(!lb.view().visible);
    }

    #[test]
    fn failed_open_keeps_current_state() {
        let mut lb = bound();
        lb.open(&series("a", &["1.jpg", "2.jpg"]), 1).unwrap();
        let err = lb.open(&series("b", &["x.jpg"]), 5).unwrap_err();
        assert!(matches!(err, LightboxError::IndexOutOfRange { index: 5, len: 1, .. }));
        assert_eq!(lb.current_series().unwrap().slug, "a");
        assert_eq!(lb.index(), Some(1));
    }

    #[test]
    fn keys_are_ignored_while_closed() {
        let mut lb = bound();
        assert!(!lb.handle(LightboxEvent::Key(Key::ArrowRight)));
        assert!(!lb.handle(LightboxEvent::Key(Key::Escape)));
        assert_eq!(lb.view().renders, 0);
    }

    #[test]
    fn keys_drive_open_lightbox() {
        let mut lb = bound();
        lb.open(&series_of(3), 0).unwrap();
        assert!(lb.handle(LightboxEvent::Key(Key::ArrowRight)));
        assert_eq!(lb.index(), Some(1));
        assert!(lb.handle(LightboxEvent::Key(Key::ArrowLeft)));
        assert!(lb.handle(LightboxEvent::Key(Key::ArrowLeft)));
        assert_eq!(lb.index(), Some(2));
        assert!(!lb.handle(LightboxEvent::Key(Key::Other)));
        assert!(lb.handle(LightboxEvent::Key(Key::Escape)));
        assert!(!lb.is_open());
    }

    #[test]
    fn buttons_drive_lightbox() {
        let mut lb = bound();
        lb.open(&series_of(3), 0).unwrap();
        assert!(lb.handle(LightboxEvent::NextClicked));
        assert!(lb.handle(LightboxEvent::NextClicked));
        assert!(lb.handle(LightboxEvent::PrevClicked));
        assert_eq!(lb.index(), Some(1));
        assert!(lb.handle(LightboxEvent::CloseClicked));
        assert!(!lb.is_open());
        assert!(!lb.handle(LightboxEvent::NextClicked));
    }

    #[test]
    fn only_backdrop_clicks_close() {
        let mut lb = bound();
        lb.open(&series_of(2), 0).unwrap();
        assert!(!lb.handle(LightboxEvent::OverlayClicked { on_backdrop: false }));
        assert!(lb.is_open());
        assert!(lb.handle(LightboxEvent::OverlayClicked { on_backdrop: true }));
        assert!(!lb.is_open());
    }

    #[test]
    fn key_names_follow_dom() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_name("Left"), Key::ArrowLeft);
        assert_eq!(Key::from_name("Enter"), Key::Other);
    }

    #[test]
    fn view_can_be_borrowed() {
        let mut view = RecordingView::default();
        {
            let mut lb = Lightbox::bind(Some(&mut view), location()).unwrap();
            lb.open(&series_of(2), 1).unwrap();
        }
        assert_eq!(view.counter.as_deref(), Some("2 / 2"));
    }
}
