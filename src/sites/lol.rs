// src/sites/lol.rs
// =============================================================================
// League of Legends site policy.
//
// No enumerable endpoint list here: the champion index page links to every
// champion page, so we rely entirely on the recursive crawl. The policy's
// job is filtering - champion pages mix spell icons with splash art,
// ability explainer illustrations and site chrome.
// =============================================================================

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use super::SitePolicy;

pub struct LolPolicy {
    seed: String,
}

impl LolPolicy {
    pub fn new(seed: impl Into<String>) -> Self {
        LolPolicy { seed: seed.into() }
    }
}

#[async_trait]
impl SitePolicy for LolPolicy {
    fn name(&self) -> &str {
        "League of Legends"
    }

    fn seed_url(&self) -> &str {
        &self.seed
    }

    async fn list_endpoints(&self, _client: &Client) -> Result<Vec<String>> {
        // Everything is discovered by following champion links
        Ok(Vec::new())
    }

    fn accepts_image_url(&self, url: &str) -> bool {
        // Spell icons DON'T have 'ability' in their URL (illustrations of
        // how abilities work do, hence the filter). 'assets' and champion
        // splash art are site chrome we don't want either.
        let no_ability = !url.contains("ability");
        let no_assets = !url.contains("assets");
        let no_hero_imgs = !url.contains("/champion/splash");

        no_ability && no_assets && no_hero_imgs
    }

    fn accepts_link(&self, url: &str) -> bool {
        url.contains("champions")
    }

    fn rewrite_link(&self, endpoint: &str) -> String {
        // Champion hrefs repeat the index prefix the seed already carries
        endpoint.replace("/en-us/champions", "")
    }
}
