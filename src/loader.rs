//! Content loading: fetch `content.json` once per session and keep it.
//!
//! The transport sits behind the [`Fetch`] trait. [`HttpFetch`] is the real
//! one: a blocking reqwest client that asks every cache along the way not to
//! serve a stored copy, and reads `file://` URLs straight from disk so a site
//! can be built from a local directory.
//!
//! [`ContentLoader`] memoizes the parsed manifest. The first successful
//! [`ContentLoader::load`] performs one request; every later call returns the
//! same value without touching the transport. Failures are not memoized, so a
//! later call tries again.

use crate::location::{Location, LocationError};
use crate::manifest::ContentManifest;
use reqwest::Url;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use std::cell::{Cell, OnceCell};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to fetch {url}: {message}")]
    Transport { url: String, message: String },
    #[error("malformed manifest at {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not create HTTP client: {0}")]
    Client(String),
}

/// Raw response from a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single GET. Implementations must not cache.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> Result<FetchResponse, LoadError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn fetch(&self, url: &Url) -> Result<FetchResponse, LoadError> {
        (**self).fetch(url)
    }
}

/// HTTP(S) via reqwest, `file://` via the filesystem.
pub struct HttpFetch {
    client: reqwest::blocking::Client,
}

impl HttpFetch {
    /// `timeout: None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, LoadError> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    fn fetch_file(url: &Url) -> Result<FetchResponse, LoadError> {
        let path = url.to_file_path().map_err(|()| LoadError::Transport {
            url: url.to_string(),
            message: "not a local file path".to_string(),
        })?;
        match std::fs::read_to_string(&path) {
            Ok(body) => Ok(FetchResponse { status: 200, body }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FetchResponse {
                status: 404,
                body: String::new(),
            }),
            Err(e) => Err(LoadError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

impl Fetch for HttpFetch {
    fn fetch(&self, url: &Url) -> Result<FetchResponse, LoadError> {
        if url.scheme() == "file" {
            return Self::fetch_file(url);
        }

        let transport = |e: reqwest::Error| LoadError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self.client.get(url.clone()).send().map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport)?;
        Ok(FetchResponse { status, body })
    }
}

/// Session-scoped manifest cache.
pub struct ContentLoader<F = HttpFetch> {
    fetcher: F,
    url: Url,
    cache: OnceCell<ContentManifest>,
    fetches: Cell<usize>,
}

impl<F: Fetch> ContentLoader<F> {
    pub fn new(fetcher: F, url: Url) -> Self {
        Self {
            fetcher,
            url,
            cache: OnceCell::new(),
            fetches: Cell::new(0),
        }
    }

    /// Loader for `path` resolved against the page's effective base URL.
    pub fn for_location(fetcher: F, location: &Location, path: &str) -> Result<Self, LocationError> {
        Ok(Self::new(fetcher, location.resolve_url(path)?))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Number of transport requests issued so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn load(&self) -> Result<&ContentManifest, LoadError> {
        if let Some(manifest) = self.cache.get() {
            debug!(url = %self.url, "manifest cache hit");
            return Ok(manifest);
        }

        self.fetches.set(self.fetches.get() + 1);
        debug!(url = %self.url, "fetching manifest");
        let response = self.fetcher.fetch(&self.url)?;
        if !response.is_success() {
            return Err(LoadError::Status {
                url: self.url.to_string(),
                status: response.status,
            });
        }

        let manifest: ContentManifest =
            serde_json::from_str(&response.body).map_err(|source| LoadError::Parse {
                url: self.url.to_string(),
                source,
            })?;
        info!(
            url = %self.url,
            featured = manifest.featured.len(),
            series = manifest.series.len(),
            "manifest loaded"
        );
        Ok(self.cache.get_or_init(|| manifest))
    }
}
