//! Graph description files and the external Graphviz renderer.

use crate::config::RenderConfig;
use crate::error::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// `<output>.dot`, next to the requested image
pub fn dot_path(output: &Path) -> PathBuf {
    with_suffix(output, ".dot")
}

/// `<output>.json`, next to the requested image
pub fn json_path(output: &Path) -> PathBuf {
    with_suffix(output, ".json")
}

fn with_suffix(output: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Write the graph description, returning where it went
pub fn write_dot(output: &Path, dot: &str) -> Result<PathBuf> {
    let path = dot_path(output);
    std::fs::write(&path, dot)?;
    log::info!("Graph description written to {}", path.display());
    Ok(path)
}

/// Renderer command line for turning `dot_file` into `output`
pub fn render_command(config: &RenderConfig, dot_file: &Path, output: &Path) -> Command {
    let mut output_arg = OsString::from("-o");
    output_arg.push(output.as_os_str());

    let mut command = Command::new(&config.command);
    command
        .arg(format!("-T{}", config.format))
        .arg(output_arg)
        .arg(dot_file);
    command
}

/// Run the renderer once, without retries.
///
/// The exit status is reported as is; only a renderer that cannot be
/// started at all is an error.
pub fn render(config: &RenderConfig, dot_file: &Path, output: &Path) -> Result<ExitStatus> {
    let status = render_command(config, dot_file, output).status()?;
    if status.success() {
        log::info!("Rendered {}", output.display());
    } else {
        log::warn!("{} exited with {} while rendering {}", config.command, status, output.display());
    }
    Ok(status)
}
