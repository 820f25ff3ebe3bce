//! Error types for gravure operations.
//!
//! [`GravureError`] is the single error type crossing the crate boundary. It
//! separates construction errors (programmer errors, never retried) from
//! rendering failures (the external engine said no; the caller may retry).

use std::io;

use thiserror::Error;

use gravure_core::graph::ModelError;

/// The main error type for gravure operations.
#[derive(Debug, Error)]
pub enum GravureError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A construction error: dangling edge endpoint, foreign identifier, or
    /// an unsupported connector operand shape.
    #[error("construction error: {0}")]
    Model(#[from] ModelError),

    /// The external layout engine failed; `diagnostics` carries its captured
    /// output. No partial artifact is left behind.
    #[error("rendering failed: {diagnostics}")]
    Render { diagnostics: String },
}

impl GravureError {
    /// Create a `Render` error from the engine's diagnostic output.
    pub fn new_render_error(diagnostics: impl Into<String>) -> Self {
        Self::Render {
            diagnostics: diagnostics.into(),
        }
    }
}
