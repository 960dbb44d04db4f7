// src/sites/smite.rs
// =============================================================================
// Smite site policy.
//
// The Smite CMS exposes an all-gods JSON blob. We don't bother with its
// full schema - a regex over the body text pulls out every god name, and
// each name becomes an endpoint under the /gods/ seed for the recursive
// crawl to visit.
//
// Unlike the per-hero Dota feed, this is ONE request the whole listing
// depends on, so a bad response here is fatal to the Smite run (the run
// table still carries on with the other sites).
// =============================================================================

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use super::SitePolicy;

const DEFAULT_GODS_API: &str = "https://cms.smitegame.com/wp-json/smite-api/all-gods/1";

// God names as they appear in the CMS blob: "name":"Achilles"
static GOD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""name":"([-_'a-zA-Z]+)""#).unwrap());

pub struct SmitePolicy {
    seed: String,
    gods_api_url: String,
}

impl SmitePolicy {
    pub fn new(seed: impl Into<String>) -> Self {
        SmitePolicy {
            seed: seed.into(),
            gods_api_url: DEFAULT_GODS_API.to_string(),
        }
    }

    /// Point the god listing at a different CMS URL
    pub fn with_gods_api(mut self, url: impl Into<String>) -> Self {
        self.gods_api_url = url.into();
        self
    }
}

#[async_trait]
impl SitePolicy for SmitePolicy {
    fn name(&self) -> &str {
        "Smite"
    }

    fn seed_url(&self) -> &str {
        &self.seed
    }

    async fn list_endpoints(&self, client: &Client) -> Result<Vec<String>> {
        let response = client
            .get(&self.gods_api_url)
            .send()
            .await
            .with_context(|| format!("Failed to reach \"{}\"", self.gods_api_url))?;

        if !response.status().is_success() {
            bail!(
                "Invalid response from \"{}\" (HTTP {})",
                self.gods_api_url,
                response.status()
            );
        }

        let body = response.text().await?;

        let gods = GOD_NAME_RE
            .captures_iter(&body)
            .map(|caps| caps[1].to_string())
            .collect();

        Ok(gods)
    }

    fn accepts_image_url(&self, url: &str) -> bool {
        url.contains("god-abilities")
    }

    fn accepts_link(&self, url: &str) -> bool {
        url.contains("gods")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_extracts_god_names_from_cms_blob() {
        let server = MockServer::start().await;
        let body = r#"[{"name":"Achilles","pantheon":"Greek"},
                       {"name":"Ah-Muzen-Cab"},{"name":"Chang'e"}]"#;
        Mock::given(method("GET"))
            .and(path("/all-gods/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let policy = SmitePolicy::new("https://www.smitegame.com/gods/")
            .with_gods_api(format!("{}/all-gods/1", server.uri()));
        let client = Client::new();
        let endpoints = policy.list_endpoints(&client).await.unwrap();

        assert_eq!(endpoints, vec!["Achilles", "Ah-Muzen-Cab", "Chang'e"]);
    }

    #[tokio::test]
    async fn test_bad_status_is_fatal_for_this_site() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/all-gods/1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let policy = SmitePolicy::new("https://www.smitegame.com/gods/")
            .with_gods_api(format!("{}/all-gods/1", server.uri()));
        let client = Client::new();
        let err = policy.list_endpoints(&client).await.unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_filters() {
        let policy = SmitePolicy::new("https://www.smitegame.com/gods/");
        assert!(policy.accepts_image_url("https://webcdn.example.com/god-abilities/spear.jpg"));
        assert!(!policy.accepts_image_url("https://webcdn.example.com/god-cards/achilles.jpg"));
        assert!(policy.accepts_link("/gods/achilles"));
        assert!(!policy.accepts_link("/esports/"));
    }
}
