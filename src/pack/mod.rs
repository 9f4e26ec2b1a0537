//! Pack descriptors: what goes into a datapack or resource pack.

mod assembler;

pub use assembler::{resolve_output_path, BuildOptions};

use std::path::{Path, PathBuf};

use getset::{CopyGetters, Getters};
use semver::Version;

use crate::{
    util::{
        extension::{file_extension, ExtensionFilter},
        pack_format::{FormatTable, DATAPACK_FORMATS, RESOURCE_PACK_FORMATS},
        walk,
    },
    virtual_fs::{VFile, VFolder},
};

/// Content extensions copied into datapacks.
pub const DATAPACK_EXTENSIONS: ExtensionFilter =
    ExtensionFilter::new(&["mcfunction", "json", "mcmeta"]);

/// Content extensions copied into resource packs.
pub const RESOURCE_PACK_EXTENSIONS: ExtensionFilter = ExtensionFilter::new(&[
    "json", "mcmeta", "png", "obj", "ogg", "fsh", "vsh", "nbt", "ttf", "glsl",
]);

/// The two kinds of packs the game loads.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackType {
    /// Server-side data: functions, tags, loot tables, ...
    Datapack,
    /// Client-side assets: models, textures, sounds, shaders, ...
    ResourcePack,
}

impl PackType {
    /// Version table used to pick the `pack_format`.
    #[must_use]
    pub const fn formats(self) -> FormatTable {
        match self {
            Self::Datapack => DATAPACK_FORMATS,
            Self::ResourcePack => RESOURCE_PACK_FORMATS,
        }
    }

    /// Filter deciding which source files are copied.
    #[must_use]
    pub const fn extensions(self) -> ExtensionFilter {
        match self {
            Self::Datapack => DATAPACK_EXTENSIONS,
            Self::ResourcePack => RESOURCE_PACK_EXTENSIONS,
        }
    }

    /// Top-level folder the source tree is placed under.
    #[must_use]
    pub const fn content_folder(self) -> &'static str {
        match self {
            Self::Datapack => "data",
            Self::ResourcePack => "assets",
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Datapack => "Datapack",
            Self::ResourcePack => "Resource pack",
        }
    }
}

/// Optional files copied next to `pack.mcmeta`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuxFiles {
    /// Pack icon, written as `pack.png`.
    pub icon: Option<PathBuf>,
    /// Readme, written as `README` with its original extension.
    pub readme: Option<PathBuf>,
    /// License, written as `LICENSE` with its original extension.
    pub license: Option<PathBuf>,
}

/// A pack ready to be built: metadata, resolved format and the filtered content files.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct PackDescriptor {
    /// Kind of pack.
    #[get_copy = "pub"]
    pack_type: PackType,
    /// Name, used for the output file or folder.
    #[get = "pub"]
    name: String,
    /// Description written to `pack.mcmeta`.
    #[get = "pub"]
    description: String,
    /// Resolved `pack_format`.
    #[get_copy = "pub"]
    format: u8,
    /// Version of the pack itself, appended to the output name.
    #[get = "pub"]
    build_version: Option<Version>,
    /// Folder the content files were collected from.
    #[get = "pub"]
    source_root: PathBuf,
    /// Content files, sorted.
    #[get = "pub"]
    content_files: Vec<PathBuf>,
    /// Icon, readme and license.
    #[get = "pub"]
    aux_files: AuxFiles,
}

impl PackDescriptor {
    /// Describe the pack built from `source_root` for the game version `target_version`.
    ///
    /// Collects every file below `source_root` whose extension is allowed for
    /// `pack_type` and resolves the `pack_format`. A missing or unreadable
    /// `source_root` results in a pack without content, not in an error.
    #[must_use]
    #[tracing::instrument(level = "debug", skip(source_root), fields(source_root = %source_root.display()))]
    pub fn create(pack_type: PackType, source_root: &Path, target_version: &Version) -> Self {
        let filter = pack_type.extensions();
        let mut content_files = walk::list_files(source_root, true)
            .into_iter()
            .filter(|file| {
                let allowed = filter.is_allowed(file);
                if !allowed {
                    tracing::debug!("excluding {}", file.display());
                }
                allowed
            })
            .collect::<Vec<_>>();
        content_files.sort();

        let format = pack_type.formats().resolve(target_version);
        tracing::debug!(
            "{} files, pack format {format}",
            content_files.len()
        );

        Self {
            pack_type,
            name: pack_type.display_name().to_string(),
            description: String::new(),
            format,
            build_version: None,
            source_root: source_root.to_path_buf(),
            content_files,
            aux_files: AuxFiles::default(),
        }
    }

    /// Set the name of the pack.
    #[must_use]
    pub fn with_name(self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self
        }
    }

    /// Set the description of the pack.
    #[must_use]
    pub fn with_description(self, description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..self
        }
    }

    /// Set the version of the pack itself.
    #[must_use]
    pub fn with_build_version(self, build_version: Option<Version>) -> Self {
        Self {
            build_version,
            ..self
        }
    }

    /// Set the icon, readme and license files.
    #[must_use]
    pub fn with_aux_files(self, aux_files: AuxFiles) -> Self {
        Self { aux_files, ..self }
    }

    /// Name of the output without collision suffix or extension.
    #[must_use]
    pub fn base_name(&self) -> String {
        match &self.build_version {
            Some(version) => format!("{} v{version}", self.name),
            None => self.name.clone(),
        }
    }

    /// Content of `pack.mcmeta`.
    #[must_use]
    pub fn manifest(&self) -> String {
        let content = serde_json::json!({
            "pack": {
                "pack_format": self.format,
                "description": self.description
            }
        });

        format!("{content:#}")
    }

    /// Lay the pack out as it will be written: manifest, auxiliary files, then content.
    #[must_use]
    pub fn layout(&self) -> VFolder {
        let mut root_folder = VFolder::new();
        root_folder.add_file("pack.mcmeta", VFile::Text(self.manifest()));

        if let Some(icon) = &self.aux_files.icon {
            root_folder.add_file("pack.png", VFile::Linked(icon.clone()));
        }
        if let Some(readme) = &self.aux_files.readme {
            root_folder.add_file(&aux_file_name("README", readme), VFile::Linked(readme.clone()));
        }
        if let Some(license) = &self.aux_files.license {
            root_folder.add_file(&aux_file_name("LICENSE", license), VFile::Linked(license.clone()));
        }

        for file in &self.content_files {
            match self.entry_name(file) {
                Some(entry) => root_folder.add_file(&entry, VFile::Payload(file.clone())),
                None => tracing::warn!(
                    "{} is not inside {}",
                    file.display(),
                    self.source_root.display()
                ),
            }
        }

        root_folder
    }

    /// Path of `file` inside the pack, `/`-separated and below the content folder.
    fn entry_name(&self, file: &Path) -> Option<String> {
        let relative = file.strip_prefix(&self.source_root).ok()?;
        let mut entry = self.pack_type.content_folder().to_string();
        for component in relative.components() {
            entry.push('/');
            entry.push_str(&component.as_os_str().to_string_lossy());
        }
        Some(entry)
    }
}

/// `stem` plus the extension of `source`, if it has one.
fn aux_file_name(stem: &str, source: &Path) -> String {
    match file_extension(source) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}
