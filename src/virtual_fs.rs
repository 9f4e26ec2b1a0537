//! Virtual file system describing a pack before it is written out.
//!
//! A [`VFolder`] is an ordered list of files keyed by their `/`-separated path
//! inside the pack. Generated files are held in memory, copied files only by
//! their source path, so describing a large pack is cheap and the bytes are
//! read once, while writing.

use std::{
    borrow::Cow,
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

#[cfg(feature = "zip")]
use zip::{write::SimpleFileOptions, ZipWriter};

use crate::error::{PackError, Result};

/// Ordered collection of files making up a pack.
#[derive(Debug, Default, Clone)]
pub struct VFolder {
    files: Vec<(String, VFile)>,
    index: HashMap<String, usize>,
}

impl VFolder {
    /// Create a new, empty virtual folder.
    #[must_use]
    pub fn new() -> VFolder {
        VFolder::default()
    }

    /// Get all files in insertion order.
    #[must_use]
    pub fn get_files(&self) -> &[(String, VFile)] {
        &self.files
    }

    /// Number of files in the folder.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the folder holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Add a file at `path`, replacing (in place) a file already stored there.
    pub fn add_file(&mut self, path: &str, file: VFile) {
        if let Some(existing) = self.get_file_mut(path) {
            *existing = file;
        } else {
            self.index.insert(path.to_string(), self.files.len());
            self.files.push((path.to_string(), file));
        }
    }

    /// Get a file by path.
    #[must_use]
    pub fn get_file(&self, path: &str) -> Option<&VFile> {
        let position = *self.index.get(path)?;
        self.files.get(position).map(|(_, file)| file)
    }

    /// Mutably get a file by path.
    pub fn get_file_mut(&mut self, path: &str) -> Option<&mut VFile> {
        let position = *self.index.get(path)?;
        self.files.get_mut(position).map(|(_, file)| file)
    }

    /// Place the folder and its contents on the file system below `path`.
    ///
    /// Parent folders are created as needed. Any file that cannot be read or
    /// written aborts placement, leaving whatever was written so far.
    ///
    /// # Errors
    /// - If a folder cannot be created
    /// - If a source file cannot be read or a target file cannot be written
    pub fn place(&self, path: &Path) -> Result<()> {
        create_dir_all(path)?;

        for (name, file) in &self.files {
            let target = path.join(name);
            if let Some(parent) = target.parent() {
                if !parent.exists() {
                    create_dir_all(parent)?;
                }
            }
            let data = file.load()?;
            fs::write(&target, data).map_err(|source| PackError::Write {
                path: target,
                source,
            })?;
        }

        Ok(())
    }

    /// Zip the folder and its contents into an in-memory archive.
    ///
    /// [`VFile::Payload`] entries whose source no longer exists are left out.
    ///
    /// # Errors
    /// - If any other file cannot be read
    /// - If the archive cannot be written
    #[cfg(feature = "zip")]
    pub fn zip(&self) -> Result<Vec<u8>> {
        use std::io::{Cursor, Write};

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for (path, file) in &self.files {
            let data = match file.load() {
                Ok(data) => data,
                Err(PackError::Read { path: source, .. })
                    if file.is_payload() && !source.exists() =>
                {
                    tracing::debug!("{} vanished, leaving it out", source.display());
                    continue;
                }
                Err(err) => return Err(err),
            };

            writer.start_file(path.as_str(), SimpleFileOptions::default())?;
            writer
                .write_all(&data)
                .map_err(|source| PackError::Write {
                    path: PathBuf::from(path),
                    source,
                })?;
        }

        Ok(writer.finish()?.into_inner())
    }
}

fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| PackError::CreateOutputDirectory {
        path: path.to_path_buf(),
        source,
    })
}

/// File representation in virtual file system
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VFile {
    /// Text file
    Text(String),
    /// Copy of a file on disk that must exist when the pack is written.
    Linked(PathBuf),
    /// Copy of a content file on disk. Archives tolerate it disappearing.
    Payload(PathBuf),
}

impl VFile {
    /// Check whether this is a [`VFile::Payload`].
    #[must_use]
    pub fn is_payload(&self) -> bool {
        matches!(self, VFile::Payload(_))
    }

    /// Get the bytes of the file, reading them from disk if needed.
    ///
    /// # Errors
    /// - If a linked file cannot be read
    pub fn load(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            VFile::Text(text) => Ok(Cow::Borrowed(text.as_bytes())),
            VFile::Linked(source) | VFile::Payload(source) => fs::read(source)
                .map(Cow::Owned)
                .map_err(|err| PackError::Read {
                    path: source.clone(),
                    source: err,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(content: &str) -> VFile {
        VFile::Text(content.to_string())
    }

    #[test]
    fn test_vfolder_keeps_insertion_order() {
        let mut v_folder = VFolder::new();
        v_folder.add_file("pack.mcmeta", text("{}"));
        v_folder.add_file("data/b.json", text("b"));
        v_folder.add_file("data/a.json", text("a"));
        v_folder.add_file("pack.mcmeta", text("{\"pack\":{}}"));

        let names = v_folder
            .get_files()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["pack.mcmeta", "data/b.json", "data/a.json"]);
        assert_eq!(
            v_folder.get_file("pack.mcmeta"),
            Some(&text("{\"pack\":{}}"))
        );
        assert!(v_folder.get_file("data").is_none());
    }

    #[test]
    fn test_vfolder_many_files_keep_order_and_lookup() {
        let mut v_folder = VFolder::new();
        let names = (0..5000)
            .map(|i| format!("assets/minecraft/textures/block/{i:05}.png"))
            .collect::<Vec<_>>();
        for name in &names {
            v_folder.add_file(name, VFile::Payload(PathBuf::from(name)));
        }
        v_folder.add_file(&names[2500], text("replaced"));

        assert_eq!(v_folder.len(), names.len());
        let stored = v_folder
            .get_files()
            .iter()
            .map(|(name, _)| name)
            .collect::<Vec<_>>();
        assert_eq!(stored, names.iter().collect::<Vec<_>>());
        assert_eq!(v_folder.get_file(&names[2500]), Some(&text("replaced")));
        assert_eq!(
            v_folder.get_file(&names[4999]),
            Some(&VFile::Payload(PathBuf::from(&names[4999])))
        );
    }

    #[test]
    fn test_place_creates_nested_folders() {
        let source_dir = tempfile::tempdir().expect("error creating tempdir");
        let source = source_dir.path().join("tick.mcfunction");
        fs::write(&source, "say hi").expect("error writing source");
        let icon = source_dir.path().join("icon.png");
        fs::write(&icon, [0x89, 0x50]).expect("error writing icon");

        let mut v_folder = VFolder::new();
        v_folder.add_file("pack.mcmeta", text("meta"));
        v_folder.add_file("pack.png", VFile::Linked(icon));
        v_folder.add_file("data/ns/function/tick.mcfunction", VFile::Payload(source));

        let out_dir = tempfile::tempdir().expect("error creating tempdir");
        let out = out_dir.path().join("pack");
        v_folder.place(&out).expect("error placing folder");

        assert_eq!(fs::read_to_string(out.join("pack.mcmeta")).unwrap(), "meta");
        assert_eq!(fs::read(out.join("pack.png")).unwrap(), vec![0x89, 0x50]);
        assert_eq!(
            fs::read_to_string(out.join("data/ns/function/tick.mcfunction")).unwrap(),
            "say hi"
        );
    }

    #[test]
    fn test_place_fails_on_vanished_payload() {
        let source_dir = tempfile::tempdir().expect("error creating tempdir");
        let mut v_folder = VFolder::new();
        v_folder.add_file("pack.mcmeta", text("meta"));
        v_folder.add_file(
            "data/gone.json",
            VFile::Payload(source_dir.path().join("gone.json")),
        );
        v_folder.add_file("data/after.json", text("{}"));

        let out_dir = tempfile::tempdir().expect("error creating tempdir");
        let err = v_folder.place(out_dir.path()).unwrap_err();

        assert!(matches!(err, PackError::Read { .. }));
        assert!(out_dir.path().join("pack.mcmeta").exists());
        assert!(!out_dir.path().join("data/after.json").exists());
    }

    #[cfg(feature = "zip")]
    #[test]
    fn test_zip_skips_vanished_payload() {
        use std::io::Read;

        let source_dir = tempfile::tempdir().expect("error creating tempdir");
        let kept = source_dir.path().join("kept.json");
        fs::write(&kept, "{\"kept\":true}").expect("error writing source");

        let mut v_folder = VFolder::new();
        v_folder.add_file("pack.mcmeta", text("meta"));
        v_folder.add_file(
            "data/gone.json",
            VFile::Payload(source_dir.path().join("gone.json")),
        );
        v_folder.add_file("data/kept.json", VFile::Payload(kept));

        let bytes = v_folder.zip().expect("error zipping folder");
        let mut archive =
            zip::ZipArchive::new(std::io::Cursor::new(bytes)).expect("error reading archive");

        let names = archive.file_names().map(str::to_string).collect::<Vec<_>>();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"pack.mcmeta".to_string()));
        assert!(names.contains(&"data/kept.json".to_string()));

        let mut kept_content = String::new();
        archive
            .by_name("data/kept.json")
            .expect("missing entry")
            .read_to_string(&mut kept_content)
            .expect("error reading entry");
        assert_eq!(kept_content, "{\"kept\":true}");
    }

    #[cfg(feature = "zip")]
    #[test]
    fn test_zip_fails_on_missing_linked_file() {
        let source_dir = tempfile::tempdir().expect("error creating tempdir");
        let mut v_folder = VFolder::new();
        v_folder.add_file(
            "pack.png",
            VFile::Linked(source_dir.path().join("pack.png")),
        );

        assert!(matches!(v_folder.zip(), Err(PackError::Read { .. })));
    }
}
