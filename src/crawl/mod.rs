// src/crawl/mod.rs
// =============================================================================
// This module is the crawl engine - the part that actually visits things.
//
// Submodules:
// - engine: Breadth-first page crawl + direct endpoint-list download
// - progress: Pluggable progress reporting (console or silent)
//
// Two crawl strategies live behind one entry point:
// - Recursive mode walks the site's link graph breadth-first, harvesting
//   image tags as it goes
// - Direct mode treats the policy's endpoint list as the complete set of
//   downloads and never parses a page
//
// Rust concepts:
// - Async programming: For concurrent network requests
// - Collections: HashSet for tracking visited URLs, VecDeque for the queue
// =============================================================================

mod engine;
mod progress;

// Re-export the engine's public surface
pub use engine::{join_url, CrawlReport, CrawlTarget, Crawler};
pub use progress::{ConsoleProgress, Progress, SilentProgress};
