//! Gravure Core Types and Definitions
//!
//! This crate provides the foundational types for the gravure diagram
//! builder. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//!   and label slugging for deterministic, readable graph identifiers
//! - **Graph**: The hierarchical graph model ([`graph::GraphModel`]) holding
//!   clusters, nodes, and the flat edge list
//! - **Options**: Render options shared between configuration and the
//!   Graphviz boundary ([`options`] module)

pub mod graph;
pub mod identifier;
pub mod options;
