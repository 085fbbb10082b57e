//! Page location: document URL, `<base href>` override, fragment handling.
//!
//! Every URL the site emits is resolved here. Image paths in the manifest are
//! relative (`images/river/01.jpg`), and the browser would resolve them against
//! the page's *effective base*:
//!
//! - the `<base href>` value, itself resolved against the document URL, when
//!   the page declares one;
//! - otherwise the directory of the document URL
//!   (`https://host/portfolio/series.html` → `https://host/portfolio/`).
//!
//! The fragment (`series.html#river`) is the only piece of URL state the site
//! reads. It is percent-decoded with `decodeURIComponent` semantics; links are
//! built with the matching [`encode_component`].

use reqwest::Url;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocationError {
    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("not an absolute directory path: {0}")]
    NotAbsolute(String),
}

/// Where the current page lives.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    document_url: Url,
    base_override: Option<String>,
}

impl Location {
    /// Parse an absolute document URL such as `https://host/series.html#river`.
    pub fn parse(document_url: &str) -> Result<Self, LocationError> {
        let document_url = Url::parse(document_url).map_err(|e| LocationError::InvalidUrl {
            url: document_url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            document_url,
            base_override: None,
        })
    }

    /// Location of `page` inside a local directory, as a `file://` URL.
    pub fn in_directory(dir: &Path, page: &str) -> Result<Self, LocationError> {
        let dir_url = Url::from_directory_path(dir)
            .map_err(|()| LocationError::NotAbsolute(dir.display().to_string()))?;
        let document_url = dir_url.join(page).map_err(|e| LocationError::InvalidUrl {
            url: page.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            document_url,
            base_override: None,
        })
    }

    /// Attach a `<base href>` override. Empty values are ignored, like a
    /// `<base>` tag without an `href`.
    pub fn with_base_override(mut self, href: Option<String>) -> Self {
        self.base_override = href.filter(|h| !h.trim().is_empty());
        self
    }

    /// Another page sharing this location's base override, e.g. `series.html`
    /// next to `index.html`. `page` is resolved against the effective base.
    pub fn sibling(&self, page: &str) -> Result<Self, LocationError> {
        let document_url = self.base().join(page).map_err(|e| LocationError::InvalidUrl {
            url: page.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            document_url,
            base_override: self.base_override.clone(),
        })
    }

    /// Same page with a different fragment (`None` clears it).
    pub fn with_fragment(&self, fragment: Option<&str>) -> Self {
        let mut document_url = self.document_url.clone();
        document_url.set_fragment(fragment);
        Self {
            document_url,
            base_override: self.base_override.clone(),
        }
    }

    pub fn document_url(&self) -> &Url {
        &self.document_url
    }

    pub fn base_override(&self) -> Option<&str> {
        self.base_override.as_deref()
    }

    /// The effective base URL used to resolve relative paths.
    pub fn base(&self) -> Url {
        if let Some(href) = &self.base_override
            && let Ok(url) = self.document_url.join(href)
        {
            return url;
        }
        // "./" drops the last path segment, query and fragment
        self.document_url
            .join("./")
            .unwrap_or_else(|_| self.document_url.clone())
    }

    /// Resolve a manifest path to an absolute URL.
    ///
    /// Empty input stays empty (an `<img src="">`), and input the URL parser
    /// rejects is passed through unchanged.
    pub fn resolve(&self, path: &str) -> String {
        if path.is_empty() {
            return String::new();
        }
        match self.base().join(path) {
            Ok(url) => url.to_string(),
            Err(_) => path.to_string(),
        }
    }

    /// Resolve a manifest path to a [`Url`], for fetching.
    pub fn resolve_url(&self, path: &str) -> Result<Url, LocationError> {
        self.base().join(path).map_err(|e| LocationError::InvalidUrl {
            url: path.to_string(),
            message: e.to_string(),
        })
    }

    /// The decoded fragment, if any. Fragments that do not decode to valid
    /// UTF-8 are treated as absent.
    pub fn fragment_slug(&self) -> Option<String> {
        let raw = self.document_url.fragment()?;
        if raw.is_empty() {
            return None;
        }
        decode_component(raw).ok().filter(|s| !s.is_empty())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error("malformed percent escape at byte {0}")]
    Malformed(usize),
    #[error("decoded bytes are not valid UTF-8")]
    Utf8,
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
}

/// Percent-encode with `encodeURIComponent` semantics.
pub fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// Value of one hex digit. Signs and other characters are rejected.
fn hex_value(b: u8) -> Option<u8> {
    char::from(b).to_digit(16).map(|d| d as u8)
}

/// Inverse of [`encode_component`]. Also accepts unescaped non-ASCII input.
pub fn decode_component(input: &str) -> Result<String, DecodeError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let value = match bytes.get(i + 1..i + 3) {
                Some(&[hi, lo]) => hex_value(hi).zip(hex_value(lo)).map(|(hi, lo)| hi << 4 | lo),
                _ => None,
            };
            out.push(value.ok_or(DecodeError::Malformed(i))?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| DecodeError::Utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_is_document_directory() {
        let loc = Location::parse("https://example.com/portfolio/series.html#river").unwrap();
        assert_eq!(loc.base().as_str(), "https://example.com/portfolio/");
    }

    #[test]
    fn base_of_directory_url_is_itself() {
        let loc = Location::parse("https://example.com/portfolio/").unwrap();
        assert_eq!(loc.base().as_str(), "https://example.com/portfolio/");
    }

    #[test]
    fn base_override_wins() {
        let loc = Location::parse("https://example.com/a/b/index.html")
            .unwrap()
            .with_base_override(Some("/static/".to_string()));
        assert_eq!(loc.base().as_str(), "https://example.com/static/");
        assert_eq!(loc.resolve("x.jpg"), "https://example.com/static/x.jpg");
    }

    #[test]
    fn blank_base_override_is_ignored() {
        let loc = Location::parse("https://example.com/a/index.html")
            .unwrap()
            .with_base_override(Some("  ".to_string()));
        assert_eq!(loc.base_override(), None);
        assert_eq!(loc.base().as_str(), "https://example.com/a/");
    }

    #[test]
    fn resolve_relative_and_absolute() {
        let loc = Location::parse("https://example.com/site/index.html").unwrap();
        assert_eq!(
            loc.resolve("images/cover/cover.jpg"),
            "https://example.com/site/images/cover/cover.jpg"
        );
        assert_eq!(
            loc.resolve("https://cdn.example.net/a.jpg"),
            "https://cdn.example.net/a.jpg"
        );
        assert_eq!(loc.resolve(""), "");
    }

    #[test]
    fn sibling_page_keeps_base_override() {
        let loc = Location::parse("https://example.com/site/index.html")
            .unwrap()
            .with_base_override(Some("https://cdn.example.net/".to_string()));
        let series = loc.sibling("series.html").unwrap();
        assert_eq!(series.document_url().as_str(), "https://cdn.example.net/series.html");
        assert_eq!(series.base_override(), Some("https://cdn.example.net/"));
    }

    #[test]
    fn in_directory_builds_file_url() {
        let tmp = tempfile::TempDir::new().unwrap();
        let loc = Location::in_directory(tmp.path(), "index.html").unwrap();
        assert_eq!(loc.document_url().scheme(), "file");
        assert!(loc.document_url().path().ends_with("/index.html"));
    }

    #[test]
    fn in_directory_rejects_relative_path() {
        let result = Location::in_directory(Path::new("relative/dir"), "index.html");
        assert!(matches!(result, Err(LocationError::NotAbsolute(_))));
    }

    #[test]
    fn parse_rejects_relative_url() {
        assert!(matches!(
            Location::parse("series.html"),
            Err(LocationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn fragment_is_decoded() {
        let loc = Location::parse("https://example.com/series.html#ba%C3%AFe%20nord").unwrap();
        assert_eq!(loc.fragment_slug().as_deref(), Some("baïe nord"));
    }

    #[test]
    fn empty_or_missing_fragment_is_none() {
        let loc = Location::parse("https://example.com/series.html#").unwrap();
        assert_eq!(loc.fragment_slug(), None);
        let loc = Location::parse("https://example.com/series.html").unwrap();
        assert_eq!(loc.fragment_slug(), None);
    }

    #[test]
    fn undecodable_fragment_is_none() {
        let loc = Location::parse("https://example.com/series.html#%E0%A4").unwrap();
        assert_eq!(loc.fragment_slug(), None);
    }

    #[test]
    fn with_fragment_sets_and_clears() {
        let loc = Location::parse("https://example.com/series.html").unwrap();
        let linked = loc.with_fragment(Some("river"));
        assert_eq!(linked.fragment_slug().as_deref(), Some("river"));
        assert_eq!(linked.with_fragment(None).fragment_slug(), None);
    }

    #[test]
    fn encode_matches_encode_uri_component() {
        assert_eq!(encode_component("river"), "river");
        assert_eq!(encode_component("a b/c?d"), "a%20b%2Fc%3Fd");
        assert_eq!(encode_component("it's (new)!"), "it's%20(new)!");
        assert_eq!(encode_component("été"), "%C3%A9t%C3%A9");
    }

    #[test]
    fn decode_inverts_encode() {
        for s in ["river", "a b/c?d", "été & co", "100%"] {
            assert_eq!(decode_component(&encode_component(s)).unwrap(), s);
        }
    }

    #[test]
    fn decode_rejects_malformed_escapes() {
        assert_eq!(decode_component("abc%"), Err(DecodeError::Malformed(3)));
        assert_eq!(decode_component("%zz"), Err(DecodeError::Malformed(0)));
        assert_eq!(decode_component("%FF"), Err(DecodeError::Utf8));
    }

    #[test]
    fn decode_rejects_signed_escapes() {
        assert_eq!(decode_component("%+F"), Err(DecodeError::Malformed(0)));
        assert_eq!(decode_component("a%-1"), Err(DecodeError::Malformed(1)));
        let loc = Location::parse("https://example.com/series.html#%+F").unwrap();
        assert_eq!(loc.fragment_slug(), None);
    }
}
