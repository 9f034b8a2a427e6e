// src/lib.rs
//! Warble - a terminal player for a single audio track.
//!
//! Playback control, an optional analysis graph tapping the output, and a
//! live spectrum drawn in the terminal.

pub mod app;
pub mod audio;
pub mod config;
pub mod fs;
pub mod logging;
pub mod player;
pub mod ui;
