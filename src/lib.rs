//! # vorocell
//!
//! `vorocell` builds bounded 3D Voronoi diagrams. Every site gets a convex polyhedral cell,
//! obtained by clipping the bounding box against the perpendicular bisectors between the
//! site and all other sites. The library is usable from Rust as well as compiled to
//! WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Exact half-space clipping**: cells are clipped face by face and closed with a cap
//!   polygon on every cut plane, so the polyhedron always matches the border half-spaces.
//! - **Per-cell parallelism**: cells are independent and are built on the rayon thread pool.
//! - **Queries**: point membership, point location, volumes, centroids and face areas.
//! - **WASM-ready**: `wasm-bindgen` wrappers for use from JavaScript and TypeScript.
//!
//! ## Example
//!
//! ```
//! use vorocell::VoronoiDiagram;
//!
//! let sites = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]];
//! let diagram = VoronoiDiagram::new(&sites, [-5.0, -5.0, -5.0], [15.0, 5.0, 5.0]).unwrap();
//!
//! assert_eq!(diagram.locate([1.0, 0.0, 0.0]), Some(0));
//! assert_eq!(diagram.locate([9.0, 0.0, 0.0]), Some(1));
//! ```
//!
//! ## Main Interface
//!
//! The primary entry point is the [`VoronoiDiagram`] struct, which owns one [`ConvexCell`]
//! per site.

mod bisector;
mod bounds;
mod cell;
mod config;
mod diagram;
mod error;
mod plane;
pub mod sites;
pub mod vector;
mod wasm;

pub use bisector::bisector;
pub use bounds::BoundingBox;
pub use bounds::box_side;
pub use cell::BorderOutcome;
pub use cell::CellState;
pub use cell::ClipScratch;
pub use cell::ConvexCell;
pub use config::DiagramConfig;
pub use config::OutOfBoundsPolicy;
pub use diagram::VoronoiDiagram;
pub use error::{Result, VoronoiError};
pub use plane::{Plane, Ray};
pub use vector::Vec3;

/// Numerical tolerance shared by every geometric decision in the crate: vertex side
/// classification, coincident sites, plane equality, degenerate edges and membership.
pub const EPSILON: f64 = 1e-9;
