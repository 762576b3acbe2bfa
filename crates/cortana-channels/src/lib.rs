//! # cortana-channels
//!
//! Chat transport integrations for Cortana.

pub mod irc;
