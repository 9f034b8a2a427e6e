// src/app/mod.rs
//! Application module - hosts the player and routes input to it.

pub mod state;

// Re-export the App struct
pub use state::App;
