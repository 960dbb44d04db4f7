// src/images/ext.rs
// =============================================================================
// This module decides whether a filename or URL refers to a supported image.
//
// Key functionality:
// - ImageExt: the fixed set of image types we download (png, jpg, tiff, bmp)
// - Classify a name/URL by its last '.'-delimited suffix
// - Trim a trailing image extension off a filename
// - Derive a local filename from an image URL (query strings stripped)
//
// One convention everywhere: extensions are stored lowercase and WITHOUT the
// leading dot ("png", never ".png"). Every comparison and every append goes
// through this module, so the two representations can never drift apart.
//
// Rust concepts:
// - Enums: A closed set of variants for the supported types
// - Option<T>: "not an image" is a value, not an error
// - Lazy statics: Compile the filename regex once, reuse it forever
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;

// Matches a trailing path segment that looks like an image file:
// a '/' followed by an identifier, a dot, and a supported extension,
// optionally followed by a query string. (?i) makes it case-insensitive
// so "fire.PNG" is recognized just like "fire.png".
static IMG_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)/([-_A-Za-z0-9]+\.(?:png|jpg|tiff|bmp))\??").unwrap()
});

// The image types we support downloading
//
// #[derive(PartialEq, Eq)] lets tests compare variants with assert_eq!
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageExt {
    Png,
    Jpg,
    Tiff,
    Bmp,
}

impl ImageExt {
    /// Classifies a bare extension string (no leading dot)
    ///
    /// Comparison is case-insensitive: "PNG" and "png" both classify.
    /// Anything outside the supported set returns None.
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageExt::Png),
            "jpg" => Some(ImageExt::Jpg),
            "tiff" => Some(ImageExt::Tiff),
            "bmp" => Some(ImageExt::Bmp),
            _ => None,
        }
    }

    /// Classifies a filename or URL by its last '.'-delimited suffix
    ///
    /// Examples:
    ///   "fire.png"  -> Some(Png)
    ///   "fire.exe"  -> None
    ///   "fire"      -> None (no dot at all)
    ///
    /// Note: query strings are NOT handled here. Run URLs through
    /// img_name_from_url() first if they might carry "?x=1" suffixes.
    pub fn from_name_or_url(src: &str) -> Option<Self> {
        let dot_idx = src.rfind('.')?;
        Self::from_ext(&src[dot_idx + 1..])
    }

    /// The canonical lowercase extension, without the leading dot
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageExt::Png => "png",
            ImageExt::Jpg => "jpg",
            ImageExt::Tiff => "tiff",
            ImageExt::Bmp => "bmp",
        }
    }
}

// Returns the filename without its image extension, if it has one
//
// Non-image extensions are left alone ("archive.tar" stays "archive.tar"),
// and so are names with no dot at all.
pub fn trim_img_ext(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot_idx) if ImageExt::from_ext(&name[dot_idx + 1..]).is_some() => &name[..dot_idx],
        _ => name,
    }
}

// Derives a local filename from an image URL
//
// Looks for the last path segment shaped like "<identifier>.<image ext>",
// ignoring any query string after it.
//
// Example:
//   "https://cdn.example.com/a/b/fire.png?x=1" -> "fire.png"
//
// If nothing matches that pattern we fall back to whatever follows the
// last '/' (the whole input when there is no '/'), so callers always get
// SOME name to write under.
pub fn img_name_from_url(url: &str) -> &str {
    match IMG_NAME_RE.captures(url).and_then(|caps| caps.get(1)) {
        Some(name) => name.as_str(),
        None => &url[url.rfind('/').map_or(0, |idx| idx + 1)..],
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why an enum instead of a list of strings?
//    - The compiler knows every possible variant
//    - match statements must handle all of them (no forgotten cases)
//    - Invalid extensions simply cannot be represented
//
// 2. What is once_cell::sync::Lazy?
//    - A value initialized the first time it's used, then cached
//    - Compiling a regex is expensive; doing it once is much cheaper
//    - Like a global 'static' but with runtime initialization
//
// 3. Why return &str instead of String?
//    - img_name_from_url and trim_img_ext return slices of their input
//    - No allocation needed, the borrow checker guarantees validity
//
// 4. What does the ? in src.rfind('.')? do?
//    - rfind returns Option<usize>
//    - ? returns None early from the function if there was no dot
//    - Same operator as error propagation, but for Option
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_supported_extension() {
        assert_eq!(ImageExt::from_name_or_url("fire.png"), Some(ImageExt::Png));
        assert_eq!(ImageExt::from_name_or_url("fire.jpg"), Some(ImageExt::Jpg));
        assert_eq!(ImageExt::from_name_or_url("fire.tiff"), Some(ImageExt::Tiff));
        assert_eq!(ImageExt::from_name_or_url("fire.bmp"), Some(ImageExt::Bmp));
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(ImageExt::from_name_or_url("fire.PNG"), Some(ImageExt::Png));
        assert_eq!(ImageExt::from_name_or_url("FIRE.Jpg"), Some(ImageExt::Jpg));
    }

    #[test]
    fn test_classify_rejects_non_images() {
        assert_eq!(ImageExt::from_name_or_url("fire.exe"), None);
        assert_eq!(ImageExt::from_name_or_url("fire"), None);
        assert_eq!(ImageExt::from_name_or_url("archive.tar"), None);
    }

    #[test]
    fn test_classify_url_with_query_via_name_derivation() {
        // Query strings are stripped by img_name_from_url, after which
        // classification succeeds even with uppercase extensions
        let name = img_name_from_url("https://cdn.example.com/a/fire.PNG?x=1");
        assert_eq!(name, "fire.PNG");
        assert_eq!(ImageExt::from_name_or_url(name), Some(ImageExt::Png));
    }

    #[test]
    fn test_img_name_from_url() {
        assert_eq!(
            img_name_from_url("https://cdn.example.com/a/b/fire.png?x=1"),
            "fire.png"
        );
        assert_eq!(
            img_name_from_url("https://cdn.example.com/a/b/fire.png"),
            "fire.png"
        );
    }

    #[test]
    fn test_img_name_fallback_after_last_slash() {
        // No "<identifier>.<image ext>" pattern: fall back to the last segment
        assert_eq!(img_name_from_url("https://example.com/weird"), "weird");
        assert_eq!(img_name_from_url("plain-name"), "plain-name");
    }

    #[test]
    fn test_trim_img_ext() {
        assert_eq!(trim_img_ext("fire.png"), "fire");
        assert_eq!(trim_img_ext("fire.PNG"), "fire");
        assert_eq!(trim_img_ext("fire.exe"), "fire.exe");
        assert_eq!(trim_img_ext("fire"), "fire");
    }

    #[test]
    fn test_ext_as_str_has_no_dot() {
        assert_eq!(ImageExt::Png.as_str(), "png");
        assert_eq!(ImageExt::Tiff.as_str(), "tiff");
    }
}
