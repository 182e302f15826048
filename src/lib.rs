//! Olympic medal browser: load a medals spreadsheet once, filter it with
//! per-column predicates and summarize it as medal counts per group.
//!
//! The engine lives in [`data`]; [`app`], [`state`] and [`ui`] are the egui
//! front end built on top of it.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
