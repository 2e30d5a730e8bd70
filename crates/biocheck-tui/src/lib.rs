//! biocheck TUI library
//!
//! Terminal presentation layer for the biocheck harness: one screen showing
//! device capability, enrollment, the last authentication result and the
//! activity log.

pub mod app;
pub mod ui;

pub use app::App;
