//! Utility functions shared by the pipeline stages

pub mod logging;
pub mod text;
