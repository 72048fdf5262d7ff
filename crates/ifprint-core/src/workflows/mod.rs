//! # Workflows Module
//!
//! User-facing entry points that tie the registry and detectors together.
//!
//! - **Fingerprint** ([`fingerprint`]) - Name-addressed interaction calls and
//!   per-pair interaction bit vectors.

pub mod fingerprint;
