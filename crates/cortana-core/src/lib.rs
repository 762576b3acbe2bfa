//! # cortana-core
//!
//! Core types, traits, configuration, and error handling for the Cortana bot.

pub mod config;
pub mod error;
pub mod message;
pub mod traits;
