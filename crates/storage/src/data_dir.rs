//! Resolution of artifact file names against the data directory.

use std::path::{Path, PathBuf};

use grid_common::{GridError, GridResult};
use tracing::debug;

/// The directory holding pre-processed artifacts (`metadata.json`, the
/// NetCDF layers, the hotspot extract, the habitat GeoJSON).
///
/// A relative directory is looked up in several roots; the first root that
/// contains the requested file wins.
#[derive(Debug, Clone)]
pub struct DataDirectory {
    root: PathBuf,
    candidates: Vec<PathBuf>,
}

impl DataDirectory {
    /// Create a data directory.
    ///
    /// Absolute paths are used as-is. Relative paths are tried against the
    /// current working directory, then next to the running executable.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut candidates = vec![root.clone()];

        if root.is_relative() {
            if let Ok(cwd) = std::env::current_dir() {
                push_unique(&mut candidates, cwd.join(&root));
            }
            if let Some(exe_dir) = std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
            {
                push_unique(&mut candidates, exe_dir.join(&root));
                if let Some(parent) = exe_dir.parent() {
                    push_unique(&mut candidates, parent.join(&root));
                }
            }
        }

        Self { root, candidates }
    }

    /// The directory as configured.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directories searched, in order.
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Find a file in the first candidate directory that contains it.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        let found = self
            .candidates
            .iter()
            .map(|dir| dir.join(filename))
            .find(|path| path.is_file());
        if let Some(path) = &found {
            debug!(filename, path = %path.display(), "Resolved data file");
        }
        found
    }

    /// Like [`resolve`](Self::resolve), but a missing file is a NotFound error.
    pub fn require(&self, filename: &str) -> GridResult<PathBuf> {
        self.resolve(filename).ok_or_else(|| {
            GridError::not_found(format!(
                "File {} not found in {}/",
                filename,
                self.root.display()
            ))
        })
    }
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}
