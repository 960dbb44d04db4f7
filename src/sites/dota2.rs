// src/sites/dota2.rs
// =============================================================================
// Dota 2 site policy.
//
// Dota 2 exposes a per-hero JSON datafeed:
//   https://www.dota2.com/datafeed/herodata?language=english&hero_id=N
//
// Each response lists the hero's abilities by internal name, and every
// ability icon lives at a predictable CDN path. So instead of crawling
// pages we enumerate all hero ids, collect ability names, and turn them
// straight into downloadable image URLs (direct mode).
//
// Heroes whose response is missing the expected JSON fields are logged and
// skipped - one odd hero must never sink the other 136.
// =============================================================================

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::crawl::join_url;

use super::SitePolicy;

// Where the ability icons actually live (not on dota2.com itself)
const ABILITY_CDN: &str =
    "https://cdn.cloudflare.steamstatic.com/apps/dota2/images/dota_react/abilities";

// Hero ids are assigned sequentially; this range covers the full roster
const FIRST_HERO_ID: u32 = 1;
const LAST_HERO_ID: u32 = 137;

pub struct Dota2Policy {
    seed: String,
}

impl Dota2Policy {
    pub fn new(seed: impl Into<String>) -> Self {
        Dota2Policy { seed: seed.into() }
    }

    // Pulls every ability name out of one hero's datafeed response
    //
    // Returns None when the JSON doesn't have the result.data.heroes[]
    // shape we expect - the caller logs and moves on.
    fn ability_names(json: &Value) -> Option<Vec<String>> {
        let heroes = json.get("result")?.get("data")?.get("heroes")?.as_array()?;

        let mut names = Vec::new();
        for hero in heroes {
            let abilities = hero.get("abilities")?.as_array()?;
            for ability in abilities {
                names.push(ability.get("name")?.as_str()?.to_string());
            }
        }
        Some(names)
    }
}

#[async_trait]
impl SitePolicy for Dota2Policy {
    fn name(&self) -> &str {
        "Dota 2"
    }

    fn seed_url(&self) -> &str {
        &self.seed
    }

    async fn list_endpoints(&self, client: &Client) -> Result<Vec<String>> {
        let mut endpoints = Vec::new();
        let datafeed = join_url(&self.seed, "datafeed/herodata");

        for hero_id in FIRST_HERO_ID..=LAST_HERO_ID {
            let hero_url = format!("{}?language=english&hero_id={}", datafeed, hero_id);

            // Any per-hero failure (network, bad JSON, missing fields) is
            // logged and skipped; the listing as a whole keeps going
            let json: Value = match client.get(&hero_url).send().await {
                Ok(response) => match response.json().await {
                    Ok(json) => json,
                    Err(e) => {
                        eprintln!("  Warning: Skipping {}: invalid JSON ({})", hero_url, e);
                        continue;
                    }
                },
                Err(e) => {
                    eprintln!("  Warning: Skipping {}: {}", hero_url, e);
                    continue;
                }
            };

            let Some(ability_names) = Self::ability_names(&json) else {
                eprintln!(
                    "  Warning: Skipping {}: missing JSON fields required for ability lookup",
                    hero_url
                );
                continue;
            };

            for ability_name in ability_names {
                let ability_url = format!("{}/{}.png", ABILITY_CDN, ability_name);
                if self.accepts_image_url(&ability_url) {
                    endpoints.push(self.rewrite_image_url(&ability_url));
                }
            }
        }

        Ok(endpoints)
    }

    // The CDN path is already exactly what we want: no filtering, no rewriting
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
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hero_json(ability_names: &[&str]) -> serde_json::Value {
        serde_json::json!({
            "result": {
                "data": {
                    "heroes": [{
                        "abilities": ability_names
                            .iter()
                            .map(|name| serde_json::json!({ "name": name }))
                            .collect::<Vec<_>>()
                    }]
                }
            }
        })
    }

    #[tokio::test]
    async fn test_lists_ability_icons_from_datafeed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/datafeed/herodata"))
            .and(query_param("hero_id", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(hero_json(&["antimage_mana_break", "antimage_blink"])),
            )
            .mount(&server)
            .await;

        // Hero 2 drifted: no abilities key. Must be skipped, not fatal.
        Mock::given(method("GET"))
            .and(path("/datafeed/herodata"))
            .and(query_param("hero_id", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "result": { "data": { "heroes": [{}] } } })),
            )
            .mount(&server)
            .await;

        // Every other hero id: empty object, also just skipped
        Mock::given(method("GET"))
            .and(path("/datafeed/herodata"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let policy = Dota2Policy::new(server.uri());
        let client = Client::new();
        let endpoints = policy.list_endpoints(&client).await.unwrap();

        assert_eq!(
            endpoints,
            vec![
                format!("{}/antimage_mana_break.png", ABILITY_CDN),
                format!("{}/antimage_blink.png", ABILITY_CDN),
            ]
        );
    }

    #[test]
    fn test_accepts_everything() {
        let policy = Dota2Policy::new("https://www.dota2.com");
        assert!(policy.accepts_image_url("anything"));
        assert_eq!(policy.rewrite_image_url("anything"), "anything");
    }
}
