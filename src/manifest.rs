//! The content manifest (`content.json`) and its lookups.
//!
//! ```json
//! {
//!   "site": { "heroImage": "images/cover/cover.jpg" },
//!   "featured": [
//!     { "slug": "river", "title": "River", "subtitle": "2021", "cover": "images/river/01.jpg" }
//!   ],
//!   "series": [
//!     { "slug": "river", "title": "River", "year": 2021,
//!       "description": "Along the Loire.", "images": ["images/river/01.jpg"] }
//!   ]
//! }
//! ```
//!
//! Every top-level key is optional. The manifest is loaded once per session and
//! never mutated afterwards.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentManifest {
    pub site: SiteInfo,
    pub featured: Vec<Item>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
}

/// A featured card on the home page, pointing at a series by slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub cover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub slug: String,
    pub title: String,
    /// Written as either `"2021"` or `2021` in the wild.
    #[serde(
        default,
        deserialize_with = "deserialize_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Year>::deserialize(deserializer)?.map(|y| match y {
        Year::Text(s) => s,
        Year::Number(n) => n.to_string(),
    }))
}

impl ContentManifest {
    /// Find a series by slug. `None` is a lookup miss, which callers ignore.
    pub fn find_series(&self, slug: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.slug == slug)
    }

    /// Hero image path, treating an empty string as missing.
    pub fn hero_image(&self) -> Option<&str> {
        self.site.hero_image.as_deref().filter(|h| !h.is_empty())
    }

    /// Report structural problems. None of them stop the site from rendering:
    /// a duplicate slug shadows the later series, an empty series simply
    /// cannot be opened in the lightbox.
    pub fn validate(&self) -> Vec<ManifestIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for (index, series) in self.series.iter().enumerate() {
            if series.slug.is_empty() {
                issues.push(ManifestIssue::EmptySlug { index });
            } else if !seen.insert(series.slug.as_str()) {
                issues.push(ManifestIssue::DuplicateSlug {
                    slug: series.slug.clone(),
                });
            }
            if series.images.is_empty() {
                issues.push(ManifestIssue::EmptySeries {
                    slug: series.slug.clone(),
                });
            }
        }

        for item in &self.featured {
            if self.find_series(&item.slug).is_none() {
                issues.push(ManifestIssue::DanglingFeatured {
                    slug: item.slug.clone(),
                });
            }
        }

        issues
    }
}

impl Series {
    /// Thumbnail shown in the series list: the first image, if any.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ManifestIssue {
    EmptySlug { index: usize },
    DuplicateSlug { slug: String },
    EmptySeries { slug: String },
    DanglingFeatured { slug: String },
}

impl fmt::Display for ManifestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySlug { index } => write!(f, "series #{} has an empty slug", index + 1),
            Self::DuplicateSlug { slug } => {
                write!(f, "series slug '{slug}' is used more than once")
            }
            Self::EmptySeries { slug } => {
                write!(f, "series '{slug}' has no images and cannot be opened")
            }
            Self::DanglingFeatured { slug } => {
                write!(f, "featured item links to unknown series '{slug}'")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn parses_full_manifest() {
        let manifest: ContentManifest = serde_json::from_str(SAMPLE_MANIFEST).unwrap();
        assert_eq!(manifest.hero_image(), Some("images/cover/hero.jpg"));
        assert_eq!(manifest.featured.len(), 2);
        assert_eq!(manifest.series.len(), 3);
        assert_eq!(manifest.series[0].images.len(), 2);
    }

    #[test]
    fn missing_top_level_keys_default() {
        let manifest: ContentManifest = serde_json::from_str("{}").unwrap();
        assert_eq!(manifest, ContentManifest::default());
        assert_eq!(manifest.hero_image(), None);
    }

    #[test]
    fn empty_hero_counts_as_missing() {
        let manifest: ContentManifest =
            serde_json::from_str(r#"{"site": {"heroImage": ""}}"#).unwrap();
        assert_eq!(manifest.hero_image(), None);
    }

    #[test]
    fn year_accepts_string_or_number() {
        let manifest: ContentManifest = serde_json::from_str(
            r#"{"series": [
                {"slug": "a", "title": "A", "year": 2021, "images": []},
                {"slug": "b", "title": "B", "year": "2019-2020", "images": []},
                {"slug": "c", "title": "C", "images": []}
            ]}"#,
        )
        .unwrap();
        let years: Vec<_> = manifest.series.iter().map(|s| s.year.as_deref()).collect();
        assert_eq!(years, vec![Some("2021"), Some("2019-2020"), None]);
    }

    #[test]
    fn find_series_by_slug() {
        let manifest = sample_manifest();
        assert_eq!(manifest.find_series("river").unwrap().title, "River");
        assert!(manifest.find_series("nope").is_none());
    }

    #[test]
    fn find_series_returns_first_on_duplicates() {
        let mut manifest = sample_manifest();
        let mut dup = series("river", &["x.jpg"]);
        dup.title = "Shadowed".to_string();
        manifest.series.push(dup);
        assert_eq!(manifest.find_series("river").unwrap().title, "River");
    }

    #[test]
    fn thumbnail_is_first_image() {
        assert_eq!(series("a", &["1.jpg", "2.jpg"]).thumbnail(), Some("1.jpg"));
        assert_eq!(series("a", &[]).thumbnail(), None);
    }

    #[test]
    fn sample_manifest_is_valid() {
        let issues = sample_manifest().validate();
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn validate_reports_every_issue_kind() {
        let manifest = ContentManifest {
            site: SiteInfo::default(),
            featured: vec![item("ghost", "Ghost")],
            series: vec![
                series("river", &["a.jpg"]),
                series("river", &["b.jpg"]),
                series("", &["c.jpg"]),
                series("empty", &[]),
            ],
        };
        let issues = manifest.validate();
        assert_eq!(
            issues,
            vec![
                ManifestIssue::DuplicateSlug {
                    slug: "river".to_string()
                },
                ManifestIssue::EmptySlug { index: 2 },
                ManifestIssue::EmptySeries {
                    slug: "empty".to_string()
                },
                ManifestIssue::DanglingFeatured {
                    slug: "ghost".to_string()
                },
            ]
        );
    }

    #[test]
    fn issue_messages_name_the_slug() {
        let msg = ManifestIssue::EmptySeries {
            slug: "fog".to_string(),
        }
        .to_string();
        assert!(msg.contains("'fog'"));
        assert_eq!(
            ManifestIssue::EmptySlug { index: 0 }.to_string(),
            "series #1 has an empty slug"
        );
    }
}
