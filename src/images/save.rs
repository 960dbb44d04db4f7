// src/images/save.rs
// =============================================================================
// This module downloads a single image and writes it into a folder.
//
// Key functionality:
// - HTTP GET the image bytes
// - Derive the local filename from the URL
// - Apply the collision policy (skip existing files unless overwriting)
// - Write the bytes, creating the destination folder if needed
//
// A crawler meets dead links all the time, so "the image wasn't there" is a
// normal outcome, not an error. We return a SaveOutcome enum that spells out
// exactly what happened; only filesystem problems (can't create the folder,
// can't write the file) surface as real errors.
//
// Rust concepts:
// - Enums with data: SaveOutcome carries the written path / failure reason
// - Result<T, E> vs. outcome enums: errors are for things callers must
//   handle, outcomes are for things they merely observe
// =============================================================================

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};

use super::ext::img_name_from_url;

// What happened when we tried to save an image
//
// The crawl treats every non-Saved variant the same way (move on), but
// callers and tests can tell "no image at this URL" apart from "network
// broken" apart from "we already had it".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The image was downloaded and written to this path
    Saved { path: PathBuf },
    /// A file with the derived name already exists and overwrite is off
    SkippedExisting,
    /// The server answered, but not with a 2xx (dead link, 404, ...)
    SkippedNotFound,
    /// The request itself failed (connection error, timeout, ...)
    TransportFailed { reason: String },
}

// Downloads an image from a URL and saves it under dest
//
// Parameters:
//   client: shared reqwest client (connection pooling, timeouts)
//   url: absolute image URL
//   dest: destination folder (created if missing)
//   overwrite: write even if a file with the derived name already exists
//
// Returns: Ok(SaveOutcome) describing what happened, or Err for
// filesystem failures only.
pub async fn save_image_from_url(
    client: &Client,
    url: &str,
    dest: &Path,
    overwrite: bool,
) -> Result<SaveOutcome> {
    // Fetch first, then decide what to do with the body.
    // Transport failures are an outcome, not an error - the crawl goes on.
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return Ok(SaveOutcome::TransportFailed {
                reason: e.to_string(),
            })
        }
    };

    if !response.status().is_success() {
        return Ok(SaveOutcome::SkippedNotFound);
    }

    let img_name = img_name_from_url(url).to_string();
    let path = dest.join(&img_name);

    // Collision policy: an existing file wins unless overwrite is on
    if !overwrite && path.exists() {
        return Ok(SaveOutcome::SkippedExisting);
    }

    // Reading the body can still fail mid-stream (connection reset)
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            return Ok(SaveOutcome::TransportFailed {
                reason: e.to_string(),
            })
        }
    };

    // Filesystem problems DO propagate as errors - the caller decides
    // whether a failing destination should abort the whole run
    tokio::fs::create_dir_all(dest)
        .await
        .with_context(|| format!("Failed to create destination folder {}", dest.display()))?;
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("Failed to write image to {}", path.display()))?;

    Ok(SaveOutcome::Saved { path })
}
