//! Shared pieces of the dashstyle engine.
//!
//! - [`warning`]: theme and style warnings, reported once per message until
//!   the active theme changes

pub mod warning;
