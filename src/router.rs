//! Typed routing
//!
//! This module provides access to waymark-router.
//!
//! ## Architecture
//!
//! - **Route Tree**: branches and typed parameters, validated at construction
//! - **Endpoints**: the flattened path patterns registered with the engine
//! - **Parameter State**: observable parameter values guarded by the active route
//! - **Descriptors**: `is`, `to`, `switch` and `sub` without hand-written paths
//! - **Constraints**: declarative blocks and redirects checked before entry

pub use waymark_router::*;
