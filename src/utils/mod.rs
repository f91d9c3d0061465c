//! Utility modules for the site exporter.

pub mod html;
pub mod log;
pub mod minify;
