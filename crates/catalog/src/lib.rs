//! Catalog domain module (the coffee product entity).
//!
//! This crate contains the coffee record type and its patch shape, as pure
//! domain data (no IO, no HTTP, no storage).

pub mod coffee;

pub use coffee::{Coffee, CoffeePatch};
