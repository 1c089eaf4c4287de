//! Browser configuration module

pub mod browser_config;

pub use browser_config::*;
