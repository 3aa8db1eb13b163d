//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the text engine:
//! - Math types for pens, advances and bounding boxes
//! - Logging utilities

pub mod math;
pub mod logging;
