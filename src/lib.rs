// Main library entry point for Wirecraft.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
