//! The diagram construction context.
//!
//! [`Diagram`] owns the graph model and a scope stack. Nodes register into
//! whatever scope is active when they are constructed; [`Diagram::cluster`]
//! enters a nested scope for the duration of a closure and restores the
//! enclosing scope on every exit path. All state is carried by the `Diagram`
//! value itself; there is no ambient "current diagram".

use std::path::PathBuf;

use log::{debug, info};

use gravure_core::{
    graph::{EdgeStyle, GraphModel},
    identifier::Id,
};

use crate::{
    config::DiagramConfig,
    connect::{self, Link, Operand},
    error::GravureError,
    export,
};

/// Tracks the currently active container during construction.
///
/// An empty stack means the root graph is active. `pop` on an empty stack is
/// an unbalanced scope exit, a programming error; [`Diagram::cluster`] is the
/// only caller and always pairs its pushes and pops.
#[derive(Debug, Default)]
struct ScopeStack {
    stack: Vec<Id>,
}

impl ScopeStack {
    /// The active scope, or `None` for the root graph.
    fn current(&self) -> Option<Id> {
        self.stack.last().copied()
    }

    fn push(&mut self, cluster: Id) {
        self.stack.push(cluster);
    }

    fn pop(&mut self) -> Id {
        self.stack
            .pop()
            .expect("scope stack underflow: pop without a matching push")
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Pops the active scope on drop, so [`Diagram::cluster`] restores the
/// enclosing scope even when the closure unwinds.
struct ScopeGuard<'a>(&'a mut Diagram);

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.0.scopes.pop();
    }
}

/// Builder for declaring and rendering an architecture diagram.
///
/// # Examples
///
/// ```no_run
/// use gravure::Diagram;
///
/// let mut diagram = Diagram::new("Web Service");
///
/// let user = diagram.node("generic.device.mobile", "User");
/// let (app, db) = diagram.cluster("Backend", |d| {
///     let app = d.node("programming.framework.flutter", "App");
///     let db = d.node("onprem.database.postgresql", "Database");
///     Ok((app, db))
/// })?;
///
/// diagram.connect(user, app)?;
/// diagram.connect(app, db)?;
///
/// let artifact = diagram.render()?;
/// println!("rendered to {}", artifact.display());
/// # Ok::<(), gravure::GravureError>(())
/// ```
#[derive(Debug, Default)]
pub struct Diagram {
    title: String,
    config: DiagramConfig,
    model: GraphModel,
    scopes: ScopeStack,
}

impl Diagram {
    /// Opens a top-level diagram context with default render options.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_config(title, DiagramConfig::default())
    }

    /// Opens a top-level diagram context with the given render options.
    pub fn with_config(title: impl Into<String>, config: DiagramConfig) -> Self {
        let title = title.into();
        info!(title = title.as_str(); "Opening diagram");
        Self {
            title,
            config,
            model: GraphModel::new(),
            scopes: ScopeStack::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// Registers a node of the given category in the active scope and
    /// returns its identifier.
    pub fn node(&mut self, kind: &str, label: &str) -> Id {
        self.model.add_node(label, kind, None, self.scopes.current())
    }

    /// Registers a node rendered with a custom icon image.
    pub fn custom(&mut self, label: &str, icon: impl Into<PathBuf>) -> Id {
        self.model
            .add_node(label, "custom", Some(icon.into()), self.scopes.current())
    }

    /// Opens a named nested grouping, runs `f` inside it, and restores the
    /// enclosing scope whether `f` succeeds, fails, or panics.
    ///
    /// Nodes and sub-clusters created inside `f` attach to the new cluster.
    pub fn cluster<T>(
        &mut self,
        label: &str,
        f: impl FnOnce(&mut Self) -> Result<T, GravureError>,
    ) -> Result<T, GravureError> {
        let cluster = self.model.add_cluster(label, self.scopes.current());
        debug!(cluster:% = cluster, depth = self.scopes.depth() + 1; "Entering cluster scope");

        self.scopes.push(cluster);
        let result = {
            let mut guard = ScopeGuard(self);
            f(&mut *guard.0)
        };

        debug!(cluster:% = cluster; "Left cluster scope");
        result
    }

    /// A styled, unbound [`Link`] for use as a connector operand.
    ///
    /// Connecting a node into the returned link binds its source; connecting
    /// the bound link onward emits the styled edge.
    pub fn edge(&self, style: EdgeStyle) -> Link {
        Link::styled(style)
    }

    /// Connects `lhs` to `rhs` with the fan-out rules and returns the right
    /// operand for chaining. See [`Operand`] for the accepted shapes.
    pub fn connect(
        &mut self,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Result<Operand, GravureError> {
        connect::fan_out(&mut self.model, lhs.into(), rhs.into()).map_err(GravureError::from)
    }

    /// The serialized DOT form of the current model.
    pub fn dot_source(&self) -> String {
        export::dot_source(&self.model, &self.title, self.config.direction())
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    /// Finishes construction and hands the model to the caller. The model is
    /// read-only from the caller's perspective once rendering begins.
    pub fn into_model(self) -> GraphModel {
        self.model
    }

    /// Finishes construction and renders through the external layout engine.
    ///
    /// Consumes the diagram: the model is frozen at this point. Returns the
    /// artifact path on success.
    ///
    /// # Errors
    ///
    /// [`GravureError::Render`] when the engine is missing or fails; the
    /// engine's diagnostics are attached and no partial artifact remains.
    #[cfg(feature = "graphviz")]
    pub fn render(self) -> Result<PathBuf, GravureError> {
        let output = self.config.output_path(&self.title);
        info!(
            title = self.title.as_str(),
            nodes = self.model.node_count(),
            edges = self.model.edge_count(),
            output:% = output.display();
            "Rendering diagram"
        );

        let dot = self.dot_source();
        crate::render::render_to_file(&dot, self.config.format(), self.config.engine(), &output)?;

        if self.config.show() {
            crate::render::open_viewer(&output);
        }

        info!(output:% = output.display(); "Diagram rendered");
        Ok(output)
    }
}
