//! Gravure - declare architecture diagrams in Rust, render them through
//! Graphviz.
//!
//! A diagram is built with a [`Diagram`] context: nodes register into the
//! active scope, [`Diagram::cluster`] opens nested, visually bounded
//! groupings, and [`Diagram::connect`] fans out edges between nodes, node
//! sequences, and styled [`Link`]s. The finished model is serialized to the
//! DOT graph-description language and handed to the external Graphviz engine
//! for layout and rendering.
//!
//! # Examples
//!
//! ```no_run
//! use gravure::{Diagram, config::DiagramConfig, options::Direction};
//!
//! let config = DiagramConfig::new().with_direction(Direction::LeftRight);
//! let mut diagram = Diagram::with_config("Event Pipeline", config);
//!
//! let source = diagram.node("onprem.queue.kafka", "Events");
//! let workers = diagram.cluster("Workers", |d| {
//!     Ok(vec![
//!         d.node("onprem.compute.server", "Worker 1"),
//!         d.node("onprem.compute.server", "Worker 2"),
//!     ])
//! })?;
//! let sink = diagram.node("onprem.database.postgresql", "Store");
//!
//! // Fan out: one edge per worker, then fan in to the sink.
//! let workers = diagram.connect(source, workers)?;
//! diagram.connect(workers, sink)?;
//!
//! let artifact = diagram.render()?;
//! # Ok::<(), gravure::GravureError>(())
//! ```
//!
//! Construction is strictly sequential and the model is exclusively owned by
//! the `Diagram` until [`Diagram::render`] consumes it; the engine
//! subprocess is the only blocking operation in the pipeline.

pub mod config;

mod connect;
mod diagram;
mod error;
mod export;
#[cfg(feature = "graphviz")]
mod render;

pub use gravure_core::{graph, identifier, options};

pub use connect::{Link, Operand};
pub use diagram::Diagram;
pub use error::GravureError;

pub use gravure_core::graph::EdgeStyle;
pub use gravure_core::identifier::Id;
