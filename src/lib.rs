//! Clipman - terminal picker for the cliphist clipboard history
//!
//! This library exports the core modules for testing and potential reuse.

pub mod app;
pub mod clipboard;
pub mod controller;
pub mod exit;
pub mod history;
pub mod image;
pub mod instance;
pub mod locale;
pub mod logging;
pub mod models;
pub mod storage;
pub mod ui;
