//! Screen implementations

pub mod harness;
