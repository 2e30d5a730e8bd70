//! Reusable UI components

pub mod header;
pub mod notice;
pub mod status_bar;
