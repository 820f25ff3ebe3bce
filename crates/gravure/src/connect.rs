//! The fan-out connector.
//!
//! [`fan_out`] is the chaining operation between connector operands: given a
//! left operand (node, nodes, or bound links) and a right operand (node,
//! nodes, or links), it appends the cross product of edges to the model and
//! returns the right operand so that repeated calls read left to right.
//!
//! Pair generation is left-major, right-minor, and edge insertion order
//! equals generation order; both are observable in rendered output.

use gravure_core::{
    graph::{EdgeStyle, GraphModel, ModelError},
    identifier::Id,
};

/// A styled, partially bound edge operand.
///
/// A `Link` starts with no source; connecting a node *into* it binds the
/// source, and connecting it to a node emits the edge carrying its style:
///
/// ```
/// use gravure::{Diagram, Link, graph::EdgeStyle};
///
/// let mut diagram = Diagram::new("Flow");
/// let api = diagram.node("custom", "API");
/// let db = diagram.node("custom", "Database");
///
/// let bound = diagram.connect(api, Link::styled(EdgeStyle::new().with_label("SQL")))?;
/// diagram.connect(bound, db)?;
/// # Ok::<(), gravure::GravureError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    source: Option<Id>,
    style: EdgeStyle,
}

impl Link {
    /// An unstyled, unbound link.
    pub fn new() -> Self {
        Self::default()
    }

    /// An unbound link carrying the given style.
    pub fn styled(style: EdgeStyle) -> Self {
        Self {
            source: None,
            style,
        }
    }

    pub fn source(&self) -> Option<Id> {
        self.source
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }

    fn bind(mut self, source: Id) -> Self {
        self.source = Some(source);
        self
    }
}

/// A connector operand: a node, an ordered node sequence, or styled links.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Node(Id),
    Nodes(Vec<Id>),
    Link(Link),
    Links(Vec<Link>),
}

impl From<Id> for Operand {
    fn from(id: Id) -> Self {
        Self::Node(id)
    }
}

impl From<Vec<Id>> for Operand {
    fn from(ids: Vec<Id>) -> Self {
        Self::Nodes(ids)
    }
}

impl From<&[Id]> for Operand {
    fn from(ids: &[Id]) -> Self {
        Self::Nodes(ids.to_vec())
    }
}

impl<const N: usize> From<[Id; N]> for Operand {
    fn from(ids: [Id; N]) -> Self {
        Self::Nodes(ids.to_vec())
    }
}

impl From<Link> for Operand {
    fn from(link: Link) -> Self {
        Self::Link(link)
    }
}

impl From<Vec<Link>> for Operand {
    fn from(links: Vec<Link>) -> Self {
        Self::Links(links)
    }
}

/// Appends the fan-out edges for `lhs` connected to `rhs` and returns the
/// right operand unchanged (shape and order preserved) for chaining.
///
/// Every endpoint in both operands is validated before the first edge is
/// appended, so a failed call leaves the model untouched.
pub(crate) fn fan_out(
    model: &mut GraphModel,
    lhs: Operand,
    rhs: Operand,
) -> Result<Operand, ModelError> {
    use Operand::{Link as LinkOp, Links, Node, Nodes};

    validate_operand(model, &lhs)?;
    validate_operand(model, &rhs)?;

    match (lhs, rhs) {
        (Node(l), Node(r)) => {
            model.add_edge(l, r, EdgeStyle::new())?;
            Ok(Node(r))
        }
        (Node(l), Nodes(rs)) => {
            for &r in &rs {
                model.add_edge(l, r, EdgeStyle::new())?;
            }
            Ok(Nodes(rs))
        }
        (Nodes(ls), Node(r)) => {
            for &l in &ls {
                model.add_edge(l, r, EdgeStyle::new())?;
            }
            Ok(Node(r))
        }
        (Nodes(ls), Nodes(rs)) => {
            for &l in &ls {
                for &r in &rs {
                    model.add_edge(l, r, EdgeStyle::new())?;
                }
            }
            Ok(Nodes(rs))
        }

        // Binding a source into links appends nothing yet; edges are emitted
        // when the bound links meet their targets.
        (Node(l), LinkOp(link)) => Ok(LinkOp(link.bind(l))),
        (Node(l), Links(links)) => Ok(Links(
            links
                .into_iter()
                .map(|link| if link.source.is_none() { link.bind(l) } else { link })
                .collect(),
        )),
        (Nodes(ls), LinkOp(link)) => {
            Ok(Links(ls.iter().map(|&l| link.clone().bind(l)).collect()))
        }

        (LinkOp(link), Node(r)) => {
            let source = link.source.ok_or(ModelError::UnboundLink)?;
            model.add_edge(source, r, link.style)?;
            Ok(Node(r))
        }
        (LinkOp(link), Nodes(rs)) => {
            let source = link.source.ok_or(ModelError::UnboundLink)?;
            for &r in &rs {
                model.add_edge(source, r, link.style.clone())?;
            }
            Ok(Nodes(rs))
        }
        (Links(links), Node(r)) => {
            if links.iter().any(|link| link.source.is_none()) {
                return Err(ModelError::UnboundLink);
            }
            for link in links {
                let source = link.source.ok_or(ModelError::UnboundLink)?;
                model.add_edge(source, r, link.style)?;
            }
            Ok(Node(r))
        }
        (Links(links), Nodes(rs)) => {
            if links.iter().any(|link| link.source.is_none()) {
                return Err(ModelError::UnboundLink);
            }
            for link in &links {
                let source = link.source.ok_or(ModelError::UnboundLink)?;
                for &r in &rs {
                    model.add_edge(source, r, link.style.clone())?;
                }
            }
            Ok(Nodes(rs))
        }

        // Which link would bind to which source is ambiguous.
        (Nodes(_), Links(_)) => Err(ModelError::SequenceToLinks),

        (LinkOp(_) | Links(_), LinkOp(_) | Links(_)) => Err(ModelError::LinkToLink),
    }
}

/// Checks every node id an operand references, including bound link sources.
fn validate_operand(model: &GraphModel, operand: &Operand) -> Result<(), ModelError> {
    match operand {
        Operand::Node(id) => ensure_registered(model, *id),
        Operand::Nodes(ids) => ids
            .iter()
            .try_for_each(|&id| ensure_registered(model, id)),
        Operand::Link(link) => link
            .source
            .map_or(Ok(()), |id| ensure_registered(model, id)),
        Operand::Links(links) => links
            .iter()
            .filter_map(|link| link.source)
            .try_for_each(|id| ensure_registered(model, id)),
    }
}

fn ensure_registered(model: &GraphModel, id: Id) -> Result<(), ModelError> {
    if model.contains_node(id) {
        Ok(())
    } else {
        Err(ModelError::DanglingEndpoint(id))
    }
}
