// src/images/mod.rs
// =============================================================================
// This module handles everything image-related.
//
// Submodules:
// - ext: Decides whether a name/URL is a supported image type
// - save: Downloads an image and writes it into a destination folder
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
//
// Rust concepts:
// - Modules: Organize code into namespaces
// - pub use: Re-export items to simplify imports for users of this module
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod ext;
mod save;

// Re-export public items from submodules
// This lets users write `images::img_name_from_url()` instead of
// `images::ext::img_name_from_url()`
pub use ext::{img_name_from_url, trim_img_ext, ImageExt};
pub use save::{save_image_from_url, SaveOutcome};
