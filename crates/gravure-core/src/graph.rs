//! The hierarchical graph model.
//!
//! A [`GraphModel`] is an arena: nodes and clusters are stored by [`Id`] in
//! insertion-ordered maps, and parent/child links are plain `Id`s rather than
//! owning references. Clusters form the nesting hierarchy; edges live in a
//! single flat list and reference their endpoints by identity, which is what
//! allows connections to cross cluster boundaries.
//!
//! Identifier minting lives here too: registration slugs the display label
//! into a readable identifier and disambiguates collisions with a monotonic
//! suffix, so identifiers are deterministic for a fixed construction order.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::identifier::{Id, slug};

/// Construction errors. All of these are programmer errors: they are never
/// retried, and any of them aborts diagram production.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("edge endpoint `{0}` is not registered in this graph")]
    DanglingEndpoint(Id),

    #[error("cluster `{0}` is not registered in this graph")]
    UnknownCluster(Id),

    #[error("link operand has no bound source node")]
    UnboundLink,

    #[error("cannot connect a link operand to another link operand")]
    LinkToLink,

    #[error("cannot connect a node sequence to a link sequence")]
    SequenceToLinks,
}

/// An atomic, labeled diagram element.
///
/// Nodes are immutable after registration; the parent is fixed at creation
/// time (`None` means the root scope).
#[derive(Debug, Clone)]
pub struct Node {
    id: Id,
    label: String,
    kind: String,
    icon: Option<PathBuf>,
    parent: Option<Id>,
}

impl Node {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Category tag, e.g. `"onprem.database.postgresql"` or `"custom"`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Icon image path for nodes rendered with a pictogram.
    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent
    }
}

/// A named, nestable grouping of nodes and sub-clusters.
///
/// The children list is append-only during construction and preserves
/// registration order.
#[derive(Debug, Clone)]
pub struct Cluster {
    id: Id,
    label: String,
    parent: Option<Id>,
    children: Vec<Member>,
}

impl Cluster {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    /// Direct children in registration order.
    pub fn children(&self) -> &[Member] {
        &self.children
    }
}

/// An entry in a cluster's (or the root's) ordered child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Node(Id),
    Cluster(Id),
}

/// Visual attributes of an edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeStyle {
    label: Option<String>,
    color: Option<String>,
    style: Option<String>,
}

impl EdgeStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Line style, e.g. `"dashed"` or `"dotted"`.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }
}

/// A directed connection between two registered nodes.
#[derive(Debug, Clone)]
pub struct Edge {
    from: Id,
    to: Id,
    style: EdgeStyle,
}

impl Edge {
    pub fn from(&self) -> Id {
        self.from
    }

    pub fn to(&self) -> Id {
        self.to
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }
}

/// The in-memory hierarchical graph.
///
/// Invariants:
/// - every node and cluster has exactly one parent, except root members;
/// - node and cluster identifiers are unique within one model;
/// - every edge endpoint references an already registered node;
/// - children lists and the edge list preserve insertion order, which is
///   observable in serialized output.
#[derive(Debug, Default)]
pub struct GraphModel {
    nodes: IndexMap<Id, Node>,
    clusters: IndexMap<Id, Cluster>,
    root: Vec<Member>,
    edges: Vec<Edge>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node under `parent` (root when `None`) and returns its
    /// freshly minted identifier.
    ///
    /// # Panics
    /// Panics if `parent` is not a registered cluster. The scope stack is the
    /// only intended source of parent identifiers, so an unknown parent is a
    /// programming error, not a user error.
    pub fn add_node(
        &mut self,
        label: &str,
        kind: &str,
        icon: Option<PathBuf>,
        parent: Option<Id>,
    ) -> Id {
        let id = self.mint(label, kind, "node");
        self.attach(Member::Node(id), parent);
        debug!(node:% = id, kind = kind; "Registered node");
        self.nodes.insert(
            id,
            Node {
                id,
                label: label.to_string(),
                kind: kind.to_string(),
                icon,
                parent,
            },
        );
        id
    }

    /// Registers a cluster under `parent` and returns its identifier.
    ///
    /// Cluster identifiers carry the `cluster_` prefix Graphviz requires for
    /// visually bounded sub-graphs.
    ///
    /// # Panics
    /// Panics if `parent` is not a registered cluster, as for [`add_node`].
    ///
    /// [`add_node`]: GraphModel::add_node
    pub fn add_cluster(&mut self, label: &str, parent: Option<Id>) -> Id {
        let seed = {
            let base = slug(label);
            if base.is_empty() {
                "cluster_group".to_string()
            } else {
                format!("cluster_{base}")
            }
        };
        let id = self.mint_raw(&seed);
        self.attach(Member::Cluster(id), parent);
        debug!(cluster:% = id; "Registered cluster");
        self.clusters.insert(
            id,
            Cluster {
                id,
                label: label.to_string(),
                parent,
                children: Vec::new(),
            },
        );
        id
    }

    /// Appends an edge to the flat edge list.
    ///
    /// Both endpoints must already be registered in this model; a stale or
    /// foreign identifier is a fatal construction error.
    pub fn add_edge(&mut self, from: Id, to: Id, style: EdgeStyle) -> Result<(), ModelError> {
        if !self.nodes.contains_key(&from) {
            return Err(ModelError::DanglingEndpoint(from));
        }
        if !self.nodes.contains_key(&to) {
            return Err(ModelError::DanglingEndpoint(to));
        }
        self.edges.push(Edge { from, to, style });
        Ok(())
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn cluster(&self, id: Id) -> Option<&Cluster> {
        self.clusters.get(&id)
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Direct members of the implicit top-level container, in registration
    /// order.
    pub fn root_children(&self) -> &[Member] {
        &self.root
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Mints an identifier from the label slug, falling back to the kind
    /// slug and then to `fallback`, disambiguating with a monotonic suffix.
    fn mint(&self, label: &str, kind: &str, fallback: &str) -> Id {
        let base = {
            let from_label = slug(label);
            if !from_label.is_empty() {
                from_label
            } else {
                let from_kind = slug(kind);
                if !from_kind.is_empty() {
                    from_kind
                } else {
                    fallback.to_string()
                }
            }
        };
        self.mint_raw(&base)
    }

    fn mint_raw(&self, base: &str) -> Id {
        let mut candidate = Id::new(base);
        let mut suffix = 2usize;
        while self.is_taken(candidate) {
            candidate = Id::new(&format!("{base}_{suffix}"));
            suffix += 1;
        }
        candidate
    }

    fn is_taken(&self, id: Id) -> bool {
        self.nodes.contains_key(&id) || self.clusters.contains_key(&id)
    }

    fn attach(&mut self, member: Member, parent: Option<Id>) {
        match parent {
            Some(parent_id) => self
                .clusters
                .get_mut(&parent_id)
                .unwrap_or_else(|| panic!("{}", ModelError::UnknownCluster(parent_id)))
                .children
                .push(member),
            None => self.root.push(member),
        }
    }
}
