//! Agora Types - Identity types shared by the Agora governance crates.
//!
//! This crate provides:
//! - `Address`, the 20-byte identity of administrators, voters and delegates
//!   (Bech32m `agora1...` or `0x` hex encoded)
//! - `TypesError` for parse failures

pub mod address;
pub mod error;

#[cfg(any(feature = "serde", feature = "borsh"))]
mod serialization;

pub use address::Address;
pub use error::TypesError;
