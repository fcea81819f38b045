//! Text normalization
//!
//! Page text is canonicalized before address extraction so the extractor sees a stable,
//! line-oriented string: no blank lines, no padding, no characters outside a fixed whitelist.

mod normalize;

pub use normalize::{normalize, normalize_text, ALLOWED_PUNCTUATION};
