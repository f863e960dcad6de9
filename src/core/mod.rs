//! Core data types for rom verification.
//!
//! - [`Hashes`](hashes::Hashes): CRC32, MD5 and SHA1 digests, each optional
//! - [`Rom`](rom::Rom), [`Game`](rom::Game): reference definitions and found files
//! - [`Quality`](types::Quality), [`DumpStatus`](types::DumpStatus): result and provenance types
//!
//! Digests are compared only over the kinds present on both sides. A kind
//! missing on either side never counts as a mismatch.

pub mod hashes;
pub mod rom;
pub mod types;
