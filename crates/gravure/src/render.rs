//! External layout engine invocation.
//!
//! This is the single blocking point in the pipeline: the serialized graph
//! is handed to the Graphviz engine as a subprocess and we wait for its exit
//! status. The engine writes into a temporary sibling of the requested
//! output path, which is persisted only on success, so a failed run never
//! leaves a partial artifact behind.

use std::{
    fs,
    path::Path,
    process::{Command, Stdio},
};

use graphviz_rust::cmd::{CommandArg, Format, Layout};
use log::{debug, warn};

use gravure_core::options::{LayoutEngine, OutputFormat};

use crate::error::GravureError;

/// Renders `dot_source` to `output` in the given format.
///
/// For [`OutputFormat::Dot`] the source is written directly; every other
/// format goes through the engine subprocess. The engine missing, a non-zero
/// exit status, or a missing artifact all surface as
/// [`GravureError::Render`] with the engine's diagnostics.
pub(crate) fn render_to_file(
    dot_source: &str,
    format: OutputFormat,
    engine: LayoutEngine,
    output: &Path,
) -> Result<(), GravureError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = tempfile::Builder::new()
        .prefix(".gravure-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile_in(dir)?;

    if format == OutputFormat::Dot {
        fs::write(staging.path(), dot_source)?;
    } else {
        let staging_path = staging.path().to_string_lossy().to_string();
        debug!(engine:% = engine, format:% = format, output:% = output.display(); "Invoking layout engine");
        graphviz_rust::exec_dot(
            dot_source.to_string(),
            vec![
                CommandArg::Layout(engine_layout(engine)),
                CommandArg::Format(engine_format(format)),
                CommandArg::Output(staging_path),
            ],
        )
        .map_err(|err| GravureError::new_render_error(err.to_string()))?;

        let artifact = fs::metadata(staging.path())
            .map_err(|_| GravureError::new_render_error("engine reported success but produced no artifact"))?;
        if artifact.len() == 0 {
            return Err(GravureError::new_render_error(
                "engine reported success but the artifact is empty",
            ));
        }
    }

    staging
        .persist(output)
        .map_err(|err| GravureError::Io(err.error))?;
    Ok(())
}

/// Opens the artifact with the platform viewer. Best effort: a missing
/// opener is logged, never fatal, and has no effect on the model or the
/// artifact.
pub(crate) fn open_viewer(path: &Path) {
    #[cfg(target_os = "macos")]
    const OPENER: &str = "open";
    #[cfg(not(target_os = "macos"))]
    const OPENER: &str = "xdg-open";

    let spawned = Command::new(OPENER)
        .arg(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    if let Err(err) = spawned {
        warn!(viewer = OPENER; "Could not open artifact viewer: {err}");
    }
}

fn engine_layout(engine: LayoutEngine) -> Layout {
    match engine {
        LayoutEngine::Dot => Layout::Dot,
        LayoutEngine::Neato => Layout::Neato,
        LayoutEngine::Fdp => Layout::Fdp,
        LayoutEngine::Sfdp => Layout::Sfdp,
        LayoutEngine::Circo => Layout::Circo,
        LayoutEngine::Twopi => Layout::Twopi,
        // graphviz-rust spells this variant `Asage`; it still runs `osage`.
        LayoutEngine::Osage => Layout::Asage,
        LayoutEngine::Patchwork => Layout::Patchwork,
    }
}

fn engine_format(format: OutputFormat) -> Format {
    match format {
        OutputFormat::Png => Format::Png,
        OutputFormat::Svg => Format::Svg,
        OutputFormat::Pdf => Format::Pdf,
        OutputFormat::Dot => Format::Dot,
    }
}

#[cfg(test)]
mod tests {
    use gravure_core::options::{LayoutEngine, OutputFormat};

    use super::*;

    #[test]
    fn test_every_engine_maps_to_a_layout() {
        for engine in [
            LayoutEngine::Dot,
            LayoutEngine::Neato,
            LayoutEngine::Fdp,
            LayoutEngine::Sfdp,
            LayoutEngine::Circo,
            LayoutEngine::Twopi,
            LayoutEngine::Osage,
            LayoutEngine::Patchwork,
        ] {
            let _ = engine_layout(engine);
        }
        assert!(matches!(engine_layout(LayoutEngine::Osage), Layout::Asage));
    }

    #[test]
    fn test_dot_format_skips_the_engine() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("graph.dot");

        render_to_file("digraph g {}", OutputFormat::Dot, LayoutEngine::Dot, &output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, "digraph g {}");
        // The staging file was persisted, not copied alongside.
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("graph.dot")]);
    }

    #[test]
    fn test_staging_lands_in_the_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("graph.dot");
        fs::create_dir_all(output.parent().unwrap()).unwrap();

        render_to_file("digraph g {}", OutputFormat::Dot, LayoutEngine::Dot, &output).unwrap();
        assert!(output.exists());
    }
}
