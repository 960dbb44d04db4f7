// src/sites/hots.rs
// =============================================================================
// Heroes of the Storm site policy.
//
// The hero roster comes from a static text file (one hero slug per line);
// each hero maps to a page under /en-us/heroes/ that the engine crawls for
// ability icons. The site serves icons in hexagon and square variants -
// we always take the square one.
//
// A missing or unreadable hero file is a configuration error: this site's
// run can't start without it, so list_endpoints returns Err.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;

use super::SitePolicy;

pub struct HotsPolicy {
    seed: String,
    heroes_file: PathBuf,
}

impl HotsPolicy {
    pub fn new(seed: impl Into<String>, heroes_file: impl Into<PathBuf>) -> Self {
        HotsPolicy {
            seed: seed.into(),
            heroes_file: heroes_file.into(),
        }
    }
}

#[async_trait]
impl SitePolicy for HotsPolicy {
    fn name(&self) -> &str {
        "Heroes of the Storm"
    }

    fn seed_url(&self) -> &str {
        &self.seed
    }

    async fn list_endpoints(&self, _client: &Client) -> Result<Vec<String>> {
        let contents = std::fs::read_to_string(&self.heroes_file).with_context(|| {
            format!(
                "Failed to read heroes file {}",
                self.heroes_file.display()
            )
        })?;

        // One hero slug per line; surrounding whitespace and blank lines
        // are tolerated so the file can be hand-edited
        let endpoints = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|hero| format!("/en-us/heroes/{}/", hero))
            .collect();

        Ok(endpoints)
    }

    // Ability icons (and only those) have 'abilities' in their CDN path
    fn accepts_image_url(&self, url: &str) -> bool {
        url.contains("abilities")
    }

    fn rewrite_image_url(&self, url: &str) -> String {
        url.replace("hexagon", "square")
    }

    fn accepts_link(&self, url: &str) -> bool {
        !url.is_empty()
    }
}
