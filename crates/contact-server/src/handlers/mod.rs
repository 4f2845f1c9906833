//! HTTP handlers

pub mod contacts;
pub mod health;

pub use health::{health, root};

#[cfg(test)]
pub(crate) mod testing;
