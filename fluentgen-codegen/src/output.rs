//! Writing generated files.
//!
//! Both files are staged as temporary files in the target directory and only
//! renamed into place once every byte has been written and synced. If a
//! rename fails, files already replaced in that run are restored to their
//! previous contents.

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::generator::GeneratedSources;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

impl GeneratedSources {
    /// Pairs each configured file name with its contents.
    fn files<'s>(&'s self, config: &'s GeneratorConfig) -> [(&'s str, &'s str); 2] {
        [
            (config.properties_file_name.as_str(), self.properties.as_str()),
            (config.extensions_file_name.as_str(), self.extensions.as_str()),
        ]
    }

    /// Writes both files into `dir` and returns their paths.
    ///
    /// # Errors
    /// Returns `CodegenError` if a file cannot be staged or moved into place.
    pub fn write_to(
        &self,
        dir: &Path,
        config: &GeneratorConfig,
    ) -> Result<Vec<PathBuf>, CodegenError> {
        let mut staged = Vec::with_capacity(2);
        for (file_name, contents) in self.files(config) {
            let path = dir.join(file_name);
            let previous = if path.is_file() {
                Some(std::fs::read(&path)?)
            } else {
                None
            };
            staged.push((stage(dir, contents.as_bytes())?, path, previous));
        }

        let mut replaced: Vec<(PathBuf, Option<Vec<u8>>)> = Vec::with_capacity(staged.len());
        for (file, path, previous) in staged {
            if let Err(e) = file.persist(&path) {
                restore(dir, &replaced);
                return Err(e.into());
            }
            tracing::info!(path = %path.display(), "wrote generated file");
            replaced.push((path, previous));
        }

        Ok(replaced.into_iter().map(|(path, _)| path).collect())
    }

    /// Compares both files against what is on disk in `dir` and returns the
    /// paths that are missing or differ.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if an existing file cannot be read.
    pub fn check_against(
        &self,
        dir: &Path,
        config: &GeneratorConfig,
    ) -> Result<Vec<PathBuf>, CodegenError> {
        let mut stale = Vec::new();
        for (file_name, contents) in self.files(config) {
            let path = dir.join(file_name);
            let up_to_date = match std::fs::read_to_string(&path) {
                Ok(existing) => existing == contents,
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => return Err(e.into()),
            };
            if !up_to_date {
                tracing::debug!(path = %path.display(), "generated file is stale");
                stale.push(path);
            }
        }
        Ok(stale)
    }
}

fn stage(dir: &Path, contents: &[u8]) -> Result<NamedTempFile, CodegenError> {
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.flush()?;
    file.as_file().sync_all()?;
    Ok(file)
}

/// Puts back what was on disk before this run replaced `replaced`.
fn restore(dir: &Path, replaced: &[(PathBuf, Option<Vec<u8>>)]) {
    for (path, previous) in replaced {
        let result = match previous {
            Some(contents) => stage(dir, contents)
                .and_then(|file| file.persist(path).map(|_| ()).map_err(CodegenError::from)),
            None => std::fs::remove_file(path).map_err(CodegenError::from),
        };
        match result {
            Ok(()) => tracing::warn!(path = %path.display(), "restored previous file"),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to restore file");
            }
        }
    }
}
