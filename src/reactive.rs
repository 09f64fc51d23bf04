//! Reactive primitives
//!
//! This module provides access to waymark-reactive: signals whose writes notify
//! subscribers synchronously, and guarded signals whose writes may be rejected.

pub use waymark_reactive::*;
