// src/crawl/progress.rs
// =============================================================================
// Pluggable progress reporting for crawls.
//
// The engine announces what it's doing through this trait instead of
// printing directly. That keeps control flow identical whether output goes
// to the console, nowhere (tests), or somewhere fancier later.
// =============================================================================

use crate::images::SaveOutcome;

// Side-effecting observer of crawl progress
//
// Every method has a no-op default, so implementations only override what
// they care about. Send + Sync because the engine may report from
// concurrent download tasks' results.
pub trait Progress: Send + Sync {
    /// A site run is starting
    fn site_started(&self, _name: &str) {}

    /// A page was dequeued and is about to be fetched
    fn page_visited(&self, _url: &str) {}

    /// An image download finished (one way or another)
    fn image_outcome(&self, _url: &str, _outcome: &SaveOutcome) {}

    /// The crawl finished
    fn done(&self) {}
}

// Prints human-readable progress lines to the terminal
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn site_started(&self, name: &str) {
        println!("🎮 {}:", name);
        println!("{}", "-".repeat(58));
    }

    fn page_visited(&self, url: &str) {
        println!("  🔍 Scraping {}...", url);
    }

    fn image_outcome(&self, url: &str, outcome: &SaveOutcome) {
        match outcome {
            SaveOutcome::Saved { path } => {
                println!("  🖼️  Saved {}", path.display());
            }
            SaveOutcome::TransportFailed { reason } => {
                eprintln!("  ⚠️  Download failed for {}: {}", url, reason);
            }
            // Collisions and dead links are routine - stay quiet
            SaveOutcome::SkippedExisting | SaveOutcome::SkippedNotFound => {}
        }
    }

    fn done(&self) {
        println!("\n✅ Done.\n");
    }
}

// Reports nothing - used by tests and --quiet runs
pub struct SilentProgress;

impl Progress for SilentProgress {}
