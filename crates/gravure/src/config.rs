//! Configuration for diagram rendering.
//!
//! [`DiagramConfig`] collects the options recognized by the renderer:
//! layout direction, output format, layout engine, the auto-open toggle, and
//! an optional output path override. None of these affect the graph model
//! itself. All fields implement [`serde::Deserialize`] with defaults, so a
//! config can come from any serde source or be built in code.
//!
//! # Example
//!
//! ```
//! use gravure::config::DiagramConfig;
//! use gravure::options::{Direction, OutputFormat};
//!
//! let config = DiagramConfig::new()
//!     .with_direction(Direction::TopBottom)
//!     .with_format(OutputFormat::Svg);
//! assert_eq!(config.format(), OutputFormat::Svg);
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use gravure_core::{
    identifier::slug,
    options::{Direction, LayoutEngine, OutputFormat},
};

/// Render options for one diagram.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagramConfig {
    /// Rank direction passed to the engine.
    #[serde(default)]
    direction: Direction,

    /// Output artifact format.
    #[serde(default)]
    format: OutputFormat,

    /// External layout engine to invoke.
    #[serde(default)]
    engine: LayoutEngine,

    /// Open the artifact with the platform viewer after rendering.
    #[serde(default)]
    show: bool,

    /// Output path override. When unset, the path is derived from the
    /// diagram title and the format extension.
    #[serde(default)]
    output: Option<PathBuf>,
}

impl DiagramConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_engine(mut self, engine: LayoutEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }

    pub fn show(&self) -> bool {
        self.show
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// The artifact path: the override when set, otherwise the slugged
    /// diagram title plus the format extension.
    pub fn output_path(&self, title: &str) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => {
                let stem = {
                    let s = slug(title);
                    if s.is_empty() { "diagram".to_string() } else { s }
                };
                PathBuf::from(format!("{stem}.{}", self.format.extension()))
            }
        }
    }
}
