//! # Rendering Module
//!
//! Read-only views of a finished dungeon: plain text for headless runs and a
//! macroquad window for interactive viewing.

pub mod ascii;
pub mod display;

pub use display::*;
