// src/sites/mod.rs
// =============================================================================
// This module defines the per-site policy interface and its implementations.
//
// Each game site needs its own little bit of logic:
// - Which extra endpoints to visit beyond the seed URL
// - Which candidate image URLs are actually ability icons
// - How to rewrite image URLs / page links before using them
//
// The crawl engine itself knows nothing about any specific game - it only
// talks to the SitePolicy trait. Adding a new game means adding one file
// here and a line to the registry below.
//
// Submodules (one per game):
// - dota2: Dota 2 (hero datafeed JSON API -> CDN ability icons)
// - hots: Heroes of the Storm (static hero-name file -> hero pages)
// - lol: League of Legends (pure recursive crawl of champion pages)
// - smite: Smite (god names scraped out of a CMS JSON blob)
// - hon: Heroes of Newerth (brute-forced hero id x ability slot URLs)
//
// Rust concepts:
// - Traits: Shared interface with per-type implementations
// - async-trait: Async methods in traits (endpoint discovery does I/O)
// - Trait objects (Box<dyn SitePolicy>): Pick the implementation at runtime
// =============================================================================

mod dota2;
mod hon;
mod hots;
mod lol;
mod smite;

pub use dota2::Dota2Policy;
pub use hon::HonPolicy;
pub use hots::HotsPolicy;
pub use lol::LolPolicy;
pub use smite::SmitePolicy;

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};

// The per-site capability set the crawl engine plugs into
//
// Send + Sync because policies are shared with concurrent download tasks.
// Stateless where possible; at most they hold read-only configuration
// (seed URL, a path to a hero-name file) supplied at construction.
#[async_trait]
pub trait SitePolicy: Send + Sync {
    /// Human-readable site name for progress output
    fn name(&self) -> &str;

    /// The URL the crawl starts from
    fn seed_url(&self) -> &str;

    /// Additional endpoints to visit (or, in direct mode, to download)
    /// beyond the seed URL, computed eagerly before crawling begins.
    ///
    /// May hit the network (Dota 2 queries a JSON API per hero, Smite
    /// scrapes a CMS page). Failures reading ONE sub-resource are logged
    /// and skipped; only failures that make the whole listing meaningless
    /// (missing config file, unreachable API) return Err.
    ///
    /// Sites with nothing enumerable return an empty list and rely on
    /// recursive crawling instead.
    async fn list_endpoints(&self, client: &Client) -> Result<Vec<String>>;

    /// Should this candidate image URL be downloaded?
    fn accepts_image_url(&self, url: &str) -> bool;

    /// Transform an accepted image URL before downloading (default: keep it)
    fn rewrite_image_url(&self, url: &str) -> String {
        url.to_string()
    }

    /// Should this page link be followed?
    fn accepts_link(&self, url: &str) -> bool;

    /// Transform an accepted link before resolving it (default: keep it)
    fn rewrite_link(&self, endpoint: &str) -> String {
        endpoint.to_string()
    }
}

// How a site is meant to be crawled: some sites enumerate all their image
// URLs up front (direct download), the rest get a recursive page crawl.
pub struct SiteSpec {
    pub policy: Box<dyn SitePolicy>,
    pub direct: bool,
}

// Looks up a site by its CLI name and builds its policy
//
// Parameters:
//   name: one of "dota2", "hots", "lol", "smite", "hon"
//   seed: optional seed URL override (each site has a sensible default)
//   heroes_file: hero-name file, only used by the hots site
pub fn by_name(name: &str, seed: Option<&str>, heroes_file: Option<&Path>) -> Result<SiteSpec> {
    let spec = match name {
        "dota2" => SiteSpec {
            policy: Box::new(Dota2Policy::new(seed.unwrap_or("https://www.dota2.com"))),
            direct: true,
        },
        "hots" => {
            let heroes_file: PathBuf = heroes_file
                .unwrap_or_else(|| Path::new("misc/hots_heroes.txt"))
                .to_path_buf();
            SiteSpec {
                policy: Box::new(HotsPolicy::new(
                    seed.unwrap_or("https://heroesofthestorm.com"),
                    heroes_file,
                )),
                direct: false,
            }
        }
        "lol" => SiteSpec {
            policy: Box::new(LolPolicy::new(
                seed.unwrap_or("https://www.leagueoflegends.com/en-us/champions/"),
            )),
            direct: false,
        },
        "smite" => SiteSpec {
            policy: Box::new(SmitePolicy::new(seed.unwrap_or("https://www.smitegame.com/gods/"))),
            direct: false,
        },
        "hon" => SiteSpec {
            policy: Box::new(HonPolicy::new(seed.unwrap_or("https://www.heroesofnewerth.com"))),
            direct: true,
        },
        other => bail!(
            "Unknown site '{}' (expected one of: dota2, hots, lol, smite, hon)",
            other
        ),
    };
    Ok(spec)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait instead of an enum of sites?
//    - The engine never needs to know which site it's crawling
//    - Each implementation lives in its own file with its own tests
//    - Downstream code can add sites without touching the engine
//
// 2. What does #[async_trait] do?
//    - Plain Rust traits can't (portably) have async methods in trait
//      objects, so the macro rewrites them to return boxed futures
//    - The implementations still read like normal async fns
//
// 3. Why Box<dyn SitePolicy>?
//    - The CLI picks the site at runtime from a string
//    - dyn = dynamic dispatch, Box = owned heap allocation
//    - The alternative (generics) would force the choice at compile time
// -----------------------------------------------------------------------------
