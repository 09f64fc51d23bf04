//! # Waymark Router
//!
//! Typed client-side routing on top of [`waymark_reactive`].
//!
//! Routes are authored as a tree of literal segments and typed parameters.
//! The router flattens the tree into path patterns for a navigation engine,
//! turns the parameters of the active route into reactive state, and lets
//! callers describe paths by walking the tree instead of writing strings.
//!
//! ## Components
//!
//! - [`RouteTree`], [`Branch`], [`param`]: route authoring and validation
//! - [`flatten`] / [`Endpoint`]: the concrete patterns a tree produces
//! - [`ParamState`]: observable parameter values, guarded against writes that
//!   do not belong to the active route
//! - [`ParamMap`]: per-parameter setters used when a route is entered
//! - [`NavigationEngine`]: the location-owning seam; [`MemoryHistory`] is the
//!   bundled in-memory engine
//! - [`Router`] / [`SubRouter`]: `is`, `to`, `switch` and `sub`
//! - [`ConstraintBuilder`]: declarative blocks and redirects
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use waymark_router::{Branch, MemoryHistory, Router, RouteTree, param};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let tree = RouteTree::new(
//! 	Branch::new()
//! 		.route("users", param("id", |b| b.number(true)))
//! 		.route("tab", Branch::new().route("info", Branch::new()).route("history", Branch::new())),
//! )
//! .unwrap();
//!
//! let history = Rc::new(MemoryHistory::new("/"));
//! let router = Router::builder(tree).engine(Rc::clone(&history)).build().unwrap();
//! router.start().await.unwrap();
//!
//! router.to(|t| t.step("users").step(42)).unwrap();
//! assert_eq!(router.state().child("users").unwrap().get::<f64>("id"), Some(42.0));
//!
//! router.to(|t| t.step("tab").step("history")).unwrap();
//! let tab = router.switch(|p| p.step("tab"), |child| child.map(str::to_string));
//! assert_eq!(tab.as_deref(), Some("history"));
//! # });
//! ```

mod config;
mod constraint;
mod controller;
mod descriptor;
mod endpoint;
mod error;
mod history;
mod navigation;
mod params;
mod pattern;
mod router;
mod state;
mod tree;
mod value;

pub use config::RouterConfig;
pub use constraint::{Condition, ConstraintBuilder};
pub use descriptor::{PathDescriptor, TargetDescriptor};
pub use endpoint::{Endpoint, Segment, flatten};
pub use error::{RejectionReason, RouterError, RouterResult};
pub use history::MemoryHistory;
pub use navigation::{EnterContext, EnterHook, NavigationEngine, Redirect, RouteEntry, RoutePattern};
pub use params::{ParamMap, ParamSetter};
pub use pattern::PathPattern;
pub use router::{Router, RouterBuilder, SubRouter};
pub use state::ParamState;
pub use tree::{Branch, ParamKind, ParamNode, ParamSpec, ParamTypeBuilder, RouteNode, RouteTree, param};
pub use value::{FromParamValue, IntoParamValue, ParamValue, parse_raw};
