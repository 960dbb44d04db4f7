// src/run.rs
// =============================================================================
// The run table: which sites get scraped, in what order, into which folder.
//
// Each entry pairs a site policy with a destination folder and the crawl
// mode that suits the site. Runs execute strictly in order; a site that
// fails (unreachable API, missing config file) is reported and the list
// keeps going - one broken game must not cost us the other four.
// =============================================================================

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::crawl::{CrawlReport, CrawlTarget, Crawler, Progress};
use crate::sites::{self, SitePolicy};

// One scheduled site scrape
pub struct RunSpec {
    pub policy: Box<dyn SitePolicy>,
    pub dest: PathBuf,
    pub direct: bool,
    pub recursive: bool,
}

// What one scheduled run produced: its report, or why it failed
pub struct RunResult {
    pub site: String,
    pub outcome: Result<CrawlReport>,
}

// The built-in table: every supported game, each under its own subfolder
//
// Dota 2 and Heroes of Newerth enumerate their icon URLs up front and
// download directly; the other three crawl pages recursively.
pub fn default_runs(dest_root: &Path, heroes_file: &Path) -> Vec<RunSpec> {
    ["dota2", "hots", "lol", "smite", "hon"]
        .into_iter()
        .map(|name| {
            // The registry knows every name in the table
            let spec = sites::by_name(name, None, Some(heroes_file))
                .expect("built-in site table references an unknown site");
            RunSpec {
                policy: spec.policy,
                dest: dest_root.join(name),
                direct: spec.direct,
                recursive: true,
            }
        })
        .collect()
}

// Executes every run in order and collects per-site results
//
// A failing run is logged and recorded; later runs still execute.
pub async fn execute(runs: Vec<RunSpec>, overwrite: bool, progress: &dyn Progress) -> Vec<RunResult> {
    let mut results = Vec::with_capacity(runs.len());

    for run in runs {
        let site = run.policy.name().to_string();
        progress.site_started(&site);

        let target = CrawlTarget {
            dest: run.dest,
            direct: run.direct,
            overwrite,
            recursive: run.recursive,
        };

        let outcome = match Crawler::new(run.policy.as_ref(), progress) {
            Ok(crawler) => crawler.scrape(&target).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            eprintln!("❌ {} failed: {:#}", site, e);
        }

        results.push(RunResult { site, outcome });
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::SilentProgress;

    #[test]
    fn test_default_table_covers_all_sites() {
        let runs = default_runs(Path::new("data"), Path::new("misc/hots_heroes.txt"));

        assert_eq!(runs.len(), 5);
        assert_eq!(runs[0].dest, Path::new("data/dota2"));
        assert_eq!(runs[4].dest, Path::new("data/hon"));
        // The two enumerable sites download directly
        assert!(runs[0].direct);
        assert!(runs[4].direct);
        assert!(!runs[2].direct);
    }

    #[tokio::test]
    async fn test_failed_run_does_not_stop_later_runs() {
        let dir = tempfile::tempdir().unwrap();

        // First run fails at endpoint discovery (heroes file missing);
        // second run succeeds trivially (empty endpoint list, direct mode)
        let runs = vec![
            RunSpec {
                policy: sites::by_name("hots", None, Some(Path::new("no/such/file.txt")))
                    .unwrap()
                    .policy,
                dest: dir.path().join("hots"),
                direct: false,
                recursive: true,
            },
            RunSpec {
                policy: sites::by_name("lol", None, None).unwrap().policy,
                dest: dir.path().join("lol"),
                direct: true,
                recursive: true,
            },
        ];

        let results = execute(runs, false, &SilentProgress).await;

        assert_eq!(results.len(), 2);
        assert!(results[0].outcome.is_err());
        assert!(results[1].outcome.is_ok());
    }
}
