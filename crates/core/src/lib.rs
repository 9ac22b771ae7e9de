//! Rigline domain logic.
//!
//! Pure, storage-agnostic building blocks shared by the database,
//! payments, and API crates: variant generation, name matching, the
//! order status state machine, slug derivation, and webhook signature
//! verification. This crate has no internal dependencies so it can be
//! used from any layer (including future CLI tooling).

pub mod error;
pub mod matching;
pub mod orders;
pub mod signature;
pub mod slug;
pub mod types;
pub mod variants;
