//! Writing a [`PackDescriptor`] to disk as a zip archive or a plain folder.
//!
//! Output names are `<name>[ v<build version>][(<n>)][.zip]`. When
//! overwriting, an existing artifact of the same name is replaced. Otherwise
//! the first free `(n)` suffix is taken by probing `n = 1, 2, ...` in order.
//! The probe does not lock anything, so two builds racing for the same output
//! folder can pick the same name.

use std::{
    cmp::Reverse,
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    error::{PackError, Result},
    util::walk,
};

use super::PackDescriptor;

/// How to materialize a pack.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Write a `.zip` archive instead of a folder.
    pub zipped: bool,
    /// Replace an existing artifact instead of picking a new name.
    pub overwrite: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            zipped: true,
            overwrite: false,
        }
    }
}

impl PackDescriptor {
    /// Build the pack into `output_root` as described by `options`.
    ///
    /// Returns the path of the written archive or folder.
    ///
    /// # Errors
    /// - See [`PackDescriptor::build_as_zip`] and [`PackDescriptor::build_as_folder`]
    #[cfg(feature = "zip")]
    pub fn build(&self, output_root: &Path, options: BuildOptions) -> Result<PathBuf> {
        if options.zipped {
            self.build_as_zip(output_root, options.overwrite)
        } else {
            self.build_as_folder(output_root, options.overwrite)
        }
    }

    /// Build the pack as a zip archive in `output_root`.
    ///
    /// The archive is assembled in memory and written in one go once it is
    /// complete. Content files that disappeared since the pack was described
    /// are left out.
    ///
    /// # Errors
    /// - If an auxiliary file cannot be read
    /// - If `output_root` cannot be created
    /// - If an existing archive cannot be removed when overwriting
    /// - If the archive cannot be written
    #[cfg(feature = "zip")]
    #[tracing::instrument(level = "debug", skip_all, fields(pack = %self.name))]
    pub fn build_as_zip(&self, output_root: &Path, overwrite: bool) -> Result<PathBuf> {
        let archive = self.layout().zip()?;

        ensure_output_root(output_root)?;
        let zip_path = resolve_output_path(output_root, &self.base_name(), Some("zip"), overwrite);
        if overwrite && zip_path.exists() {
            fs::remove_file(&zip_path).map_err(|source| PackError::RemoveExisting {
                path: zip_path.clone(),
                source,
            })?;
        }

        fs::write(&zip_path, archive).map_err(|source| PackError::Write {
            path: zip_path.clone(),
            source,
        })?;

        tracing::debug!(
            "{} created at {}",
            self.pack_type.display_name(),
            zip_path.display()
        );
        Ok(zip_path)
    }

    /// Build the pack as a folder in `output_root`.
    ///
    /// The target folder is claimed (and emptied, when overwriting) before
    /// anything is written. A content file that cannot be copied aborts the
    /// build and leaves the folder partially filled.
    ///
    /// # Errors
    /// - If `output_root` or the pack folder cannot be created
    /// - If the existing folder cannot be emptied when overwriting
    /// - If any file cannot be read or written
    #[tracing::instrument(level = "debug", skip_all, fields(pack = %self.name))]
    pub fn build_as_folder(&self, output_root: &Path, overwrite: bool) -> Result<PathBuf> {
        ensure_output_root(output_root)?;
        let folder_path = resolve_output_path(output_root, &self.base_name(), None, overwrite);

        if overwrite && folder_path.exists() {
            clear_folder(&folder_path)?;
        } else {
            fs::create_dir(&folder_path).map_err(|source| PackError::CreateOutputDirectory {
                path: folder_path.clone(),
                source,
            })?;
        }

        self.layout().place(&folder_path)?;

        tracing::debug!(
            "{} created at {}",
            self.pack_type.display_name(),
            folder_path.display()
        );
        Ok(folder_path)
    }
}

/// Pick the output path for `base_name` inside `output_root`.
///
/// With `overwrite` this is always `output_root/base_name[.extension]`.
/// Otherwise `(1)`, `(2)`, ... is appended to `base_name` until the path does
/// not exist yet.
#[must_use]
pub fn resolve_output_path(
    output_root: &Path,
    base_name: &str,
    extension: Option<&str>,
    overwrite: bool,
) -> PathBuf {
    let candidate = |iteration: usize| {
        let suffix = if iteration == 0 {
            String::new()
        } else {
            format!("({iteration})")
        };
        let extension = extension.map(|ext| format!(".{ext}")).unwrap_or_default();
        output_root.join(format!("{base_name}{suffix}{extension}"))
    };

    if overwrite {
        return candidate(0);
    }

    let mut iteration = 0;
    loop {
        let path = candidate(iteration);
        if !path.exists() {
            return path;
        }
        iteration += 1;
    }
}

fn ensure_output_root(output_root: &Path) -> Result<()> {
    if output_root.exists() {
        return Ok(());
    }
    fs::create_dir_all(output_root).map_err(|source| PackError::CreateOutputDirectory {
        path: output_root.to_path_buf(),
        source,
    })
}

/// Remove everything inside `folder`, keeping `folder` itself.
///
/// Symbolic links are removed as links and never followed, including the
/// links to directories and the dangling ones the walker leaves out.
fn clear_folder(folder: &Path) -> Result<()> {
    let mut subfolders = walk::list_directories(folder, true);
    for parent in std::iter::once(folder).chain(subfolders.iter().map(PathBuf::as_path)) {
        remove_links(parent)?;
    }

    for file in walk::list_files(folder, true) {
        ignore_missing(fs::remove_file(&file), &file)?;
    }

    subfolders.sort_by_key(|subfolder| Reverse(subfolder.components().count()));
    for subfolder in subfolders {
        ignore_missing(fs::remove_dir(&subfolder), &subfolder)?;
    }

    Ok(())
}

fn remove_links(parent: &Path) -> Result<()> {
    let entries = fs::read_dir(parent).map_err(|source| PackError::RemoveExisting {
        path: parent.to_path_buf(),
        source,
    })?;

    for entry in entries.flatten() {
        if entry.file_type().is_ok_and(|file_type| file_type.is_symlink()) {
            let link = entry.path();
            ignore_missing(fs::remove_file(&link), &link)?;
        }
    }

    Ok(())
}

fn ignore_missing(result: io::Result<()>, path: &Path) -> Result<()> {
    match result {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(PackError::RemoveExisting {
            path: path.to_path_buf(),
            source: err,
        }),
        _ => Ok(()),
    }
}
