// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Dispatch to the appropriate subcommand handler
// 3. Run the scheduled site scrapes and collect their reports
// 4. Exit with proper code (0 = success, 1 = a site run failed, 2 = error)
//
// Rust concepts used:
// - async/await: Because crawling is network I/O all the way down
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;           // src/cli.rs - command-line parsing
mod crawl;         // src/crawl/ - the crawl engine
mod images;        // src/images/ - image classification and saving
mod run;           // src/run.rs - the run table and sequential dispatch
mod sites;         // src/sites/ - per-game site policies

// Import items we need from our modules
use clap::Parser;  // Parser trait enables the parse() method
use cli::{Cli, Commands};
use crawl::{ConsoleProgress, CrawlReport, Progress, SilentProgress};
use run::{RunResult, RunSpec};
use serde::Serialize;
use std::path::{Path, PathBuf};

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

// The #[tokio::main] attribute transforms our async main into a real main
// function. It creates a tokio runtime and runs our async code inside it.
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    // std::process::exit() terminates the program with the given code
    let exit_code = match run_app().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = every site run completed
//   Ok(1) = at least one site run failed
//   Err = unexpected error (becomes exit code 2)
async fn run_app() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Match on which subcommand was used
    match cli.command {
        Commands::All {
            dest_root,
            heroes_file,
            overwrite,
            quiet,
            json,
        } => handle_all(&dest_root, &heroes_file, overwrite, quiet, json).await,
        Commands::Site {
            name,
            dest,
            seed,
            heroes_file,
            direct,
            no_recursive,
            overwrite,
            quiet,
            json,
        } => {
            handle_site(
                &name,
                dest,
                seed.as_deref(),
                heroes_file.as_deref(),
                direct,
                no_recursive,
                overwrite,
                quiet,
                json,
            )
            .await
        }
    }
}

// Handles the 'all' subcommand: the whole built-in run table
async fn handle_all(
    dest_root: &Path,
    heroes_file: &Path,
    overwrite: bool,
    quiet: bool,
    json: bool,
) -> Result<i32> {
    let runs = run::default_runs(dest_root, heroes_file);

    if !json {
        println!(
            "🔍 Scraping {} game sites into {}\n",
            runs.len(),
            dest_root.display()
        );
    }

    execute_and_summarize(runs, overwrite, quiet, json).await
}

// Handles the 'site' subcommand: one site by name
async fn handle_site(
    name: &str,
    dest: PathBuf,
    seed: Option<&str>,
    heroes_file: Option<&Path>,
    direct: bool,
    no_recursive: bool,
    overwrite: bool,
    quiet: bool,
    json: bool,
) -> Result<i32> {
    let spec = sites::by_name(name, seed, heroes_file)?;

    if !json {
        println!("🔍 Scraping {} into {}\n", spec.policy.name(), dest.display());
    }

    let runs = vec![RunSpec {
        policy: spec.policy,
        dest,
        // --direct forces direct mode; otherwise the site's default applies
        direct: direct || spec.direct,
        recursive: !no_recursive,
    }];

    execute_and_summarize(runs, overwrite, quiet, json).await
}

// Runs the scheduled scrapes, prints the summary, picks the exit code
async fn execute_and_summarize(
    runs: Vec<RunSpec>,
    overwrite: bool,
    quiet: bool,
    json: bool,
) -> Result<i32> {
    // Progress is a pluggable sink: console output normally, nothing with
    // --quiet (and nothing for --json, to keep stdout parseable)
    let progress: Box<dyn Progress> = if quiet || json {
        Box::new(SilentProgress)
    } else {
        Box::new(ConsoleProgress)
    };

    let results = run::execute(runs, overwrite, progress.as_ref()).await;

    print_summary(&results, json)?;

    // Count failed site runs to determine the exit code
    let failed_count = results.iter().filter(|r| r.outcome.is_err()).count();

    if failed_count > 0 {
        Ok(1)  // Exit code 1 = at least one site run failed
    } else {
        Ok(0)  // Exit code 0 = all good
    }
}

// One row of the final summary, JSON-friendly
#[derive(Serialize)]
struct RunSummary<'a> {
    site: &'a str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a CrawlReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// Prints the results either as a table or JSON
fn print_summary(results: &[RunResult], json: bool) -> Result<()> {
    let summaries: Vec<RunSummary> = results
        .iter()
        .map(|result| match &result.outcome {
            Ok(report) => RunSummary {
                site: &result.site,
                ok: true,
                report: Some(report),
                error: None,
            },
            Err(e) => RunSummary {
                site: &result.site,
                ok: false,
                report: None,
                error: Some(format!("{:#}", e)),
            },
        })
        .collect();

    if json {
        // Serialize results to JSON and print
        let json_output = serde_json::to_string_pretty(&summaries)?;
        println!("{}", json_output);
    } else {
        // Print human-readable table
        print_table(&summaries);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(summaries: &[RunSummary]) {
    // Print table header
    println!(
        "{:<22} {:<8} {:<8} {:<9} {:<8} {:<10}",
        "SITE", "PAGES", "SAVED", "SKIPPED", "FAILED", "STATUS"
    );
    println!("{}", "=".repeat(70));

    // Print each result
    for summary in summaries {
        match summary.report {
            Some(report) => {
                println!(
                    "{:<22} {:<8} {:<8} {:<9} {:<8} {:<10}",
                    summary.site,
                    report.pages_visited,
                    report.images_saved,
                    report.images_skipped,
                    report.fetch_failures,
                    "✅ OK"
                );
            }
            None => {
                println!(
                    "{:<22} {:<8} {:<8} {:<9} {:<8} {:<10}",
                    summary.site, "-", "-", "-", "-", "❌ FAILED"
                );
            }
        }
    }

    println!();

    // Print totals
    let saved_total: usize = summaries
        .iter()
        .filter_map(|s| s.report)
        .map(|r| r.images_saved)
        .sum();
    let ok_count = summaries.iter().filter(|s| s.ok).count();
    let failed_count = summaries.len() - ok_count;

    println!("📊 Summary:");
    println!("   🖼️  Images saved: {}", saved_total);
    println!("   ✅ Sites OK: {}", ok_count);
    println!("   ❌ Sites failed: {}", failed_count);
}
