//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the benchmark:
//! - Math types and operations
//! - Time sources for the render loop
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
