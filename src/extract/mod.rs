//! Expiry date extraction from unstructured (usually OCR) text.
//!
//! - [`patterns`]: the ordered, immutable table of label patterns and their scoring hints.
//! - [`extractor`]: runs the table over collapsed text, normalizes and validates the
//!   captured date, and scores confidence.

pub mod extractor;
pub mod patterns;
