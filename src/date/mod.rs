//! Date string normalization.
//!
//! - [`normalizer`]: parses the date layouts found on certificates, invoices and
//!   subscription notices into a UTC instant, returning `None` instead of erroring.

pub mod normalizer;
