// src/sites/hon.rs
// =============================================================================
// Heroes of Newerth site policy.
//
// No API and no crawlable index survived the site's retirement, but the
// icon URLs follow a strictly numeric scheme: hero id and ability slot.
// So we brute-force the full cross product of ids and slots into direct
// download URLs. Ids that never existed just come back 404 and the image
// fetcher skips them quietly.
// =============================================================================

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use crate::crawl::join_url;

use super::SitePolicy;

// Hero ids were assigned sequentially; the roster topped out around 260
const FIRST_HERO_ID: u32 = 1;
const LAST_HERO_ID: u32 = 260;

// Every hero has four ability slots
const ABILITY_SLOTS: u32 = 4;

pub struct HonPolicy {
    seed: String,
}

impl HonPolicy {
    pub fn new(seed: impl Into<String>) -> Self {
        HonPolicy { seed: seed.into() }
    }
}

#[async_trait]
impl SitePolicy for HonPolicy {
    fn name(&self) -> &str {
        "Heroes of Newerth"
    }

    fn seed_url(&self) -> &str {
        &self.seed
    }

    async fn list_endpoints(&self, _client: &Client) -> Result<Vec<String>> {
        let mut endpoints = Vec::new();
        for hero_id in FIRST_HERO_ID..=LAST_HERO_ID {
            for slot in 1..=ABILITY_SLOTS {
                endpoints.push(join_url(
                    &self.seed,
                    &format!("images/heroes/{}/ability_{}.jpg", hero_id, slot),
                ));
            }
        }
        Ok(endpoints)
    }

    fn accepts_image_url(&self, _url: &str) -> bool {
        true
    }

    fn accepts_link(&self, _url: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cross_product_of_ids_and_slots() {
        let policy = HonPolicy::new("https://www.heroesofnewerth.com");
        let client = Client::new();
        let endpoints = policy.list_endpoints(&client).await.unwrap();

        assert_eq!(endpoints.len(), 260 * 4);
        assert_eq!(
            endpoints[0],
            "https://www.heroesofnewerth.com/images/heroes/1/ability_1.jpg"
        );
        assert_eq!(
            endpoints[endpoints.len() - 1],
            "https://www.heroesofnewerth.com/images/heroes/260/ability_4.jpg"
        );
    }
}
