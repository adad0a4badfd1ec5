pub mod init;
pub mod inspect;
pub mod render;

pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use render::{render, RenderArgs};

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Input argument meaning standard input.
pub const STDIN: &str = "-";

/// Collect `*.html` files under `input` (or `input` itself when it is a
/// file), skipping anything below `exclude`.
pub fn find_html_files(input: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(anyhow!("Input path does not exist: {}", input.display()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(input)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| exclude.map_or(true, |dir| !e.path().starts_with(dir)))
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().and_then(|s| s.to_str()) == Some("html")
        {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
