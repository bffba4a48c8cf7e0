//! URL handling module for Sitemap-Ripple
//!
//! This module provides syntactic URL validation, same-domain scoping of
//! extracted links, fragment stripping, and crawl scope derivation from the
//! seed URL. Everything here is a pure function: a rejected URL is `None` or
//! `false`, never an error.

mod canonical;
mod domain;
mod validate;

// Re-export main functions
pub use canonical::canonicalize;
pub use domain::{netloc_of, seed_scope, SeedScope};
pub use validate::is_valid_url;
