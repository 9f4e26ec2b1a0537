//! Build configuration read from INI files.
//!
//! A configuration is the embedded default file overlaid with the user's file.
//! Empty values count as unset, and so do paths that do not exist. A pack
//! whose source folder is unset is skipped.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ini::{Ini, ParseOption, Properties};
use semver::Version;

use crate::{
    error::{PackError, Result},
    pack::{AuxFiles, BuildOptions, PackDescriptor, PackType},
    util::pack_format::parse_version,
};

/// Configuration written for first-time users and used as the base layer.
pub const DEFAULT_CONFIG: &str = include_str!("../dprpbuilder.ini");

const GENERAL: &str = "General";
const DATAPACK: &str = "Datapack";
const RESOURCE_PACK: &str = "ResourcePack";

/// Settings of one pack type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackConfig {
    /// Pack name.
    pub name: Option<String>,
    /// Pack description.
    pub description: Option<String>,
    /// Folder holding the pack content.
    pub source_folder: Option<PathBuf>,
    /// Pack-specific icon, readme and license.
    pub aux_files: AuxFiles,
    /// Output mode.
    pub options: BuildOptions,
}

/// Complete build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    /// Game version the packs target.
    pub target_version: Option<Version>,
    /// Version of the packs themselves.
    pub build_version: Option<Version>,
    /// Folder the packs are written to.
    pub output_path: Option<PathBuf>,
    /// Icon, readme and license shared by both packs.
    pub general_aux_files: AuxFiles,
    /// Datapack settings.
    pub datapack: PackConfig,
    /// Resource pack settings.
    pub resource_pack: PackConfig,
    origin: String,
}

impl BuildConfig {
    /// Load the embedded default configuration.
    ///
    /// # Errors
    /// - If the embedded configuration is invalid
    pub fn defaults() -> Result<Self> {
        Self::from_ini_str(DEFAULT_CONFIG, "default configuration")
    }

    /// Load a configuration file.
    ///
    /// # Errors
    /// - If the file cannot be read
    /// - If it is not valid INI or misses a section
    /// - If a version value is malformed
    pub fn from_ini_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| PackError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini_str(&content, &path.display().to_string())
    }

    /// Parse a configuration from INI text. `origin` names the source in errors.
    ///
    /// # Errors
    /// - If the text is not valid INI or misses a section
    /// - If a version value is malformed
    pub fn from_ini_str(content: &str, origin: &str) -> Result<Self> {
        let options = ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, options).map_err(|source| {
            PackError::ConfigParse {
                origin: origin.to_string(),
                source,
            }
        })?;

        let general = section(&ini, GENERAL, origin)?;
        let datapack = section(&ini, DATAPACK, origin)?;
        let resource_pack = section(&ini, RESOURCE_PACK, origin)?;

        Ok(Self {
            target_version: version_value(general, "targetVersion")?,
            build_version: version_value(general, "buildVersion")?,
            output_path: non_empty(general, "outputPath").map(PathBuf::from),
            general_aux_files: aux_files(general),
            datapack: pack_config(datapack, "dataFolderPath"),
            resource_pack: pack_config(resource_pack, "assetsFolderPath"),
            origin: origin.to_string(),
        })
    }

    /// Overlay `other` on top of this configuration.
    ///
    /// Values set in `other` win. Output flags are always taken from `other`,
    /// since a parsed file always carries them.
    pub fn replace_with(&mut self, other: BuildConfig) {
        overlay(&mut self.target_version, other.target_version);
        overlay(&mut self.build_version, other.build_version);
        overlay(&mut self.output_path, other.output_path);
        overlay_aux(&mut self.general_aux_files, other.general_aux_files);
        overlay_pack(&mut self.datapack, other.datapack);
        overlay_pack(&mut self.resource_pack, other.resource_pack);
        self.origin = other.origin;
    }

    /// Settings of `pack_type`.
    #[must_use]
    pub fn pack(&self, pack_type: PackType) -> &PackConfig {
        match pack_type {
            PackType::Datapack => &self.datapack,
            PackType::ResourcePack => &self.resource_pack,
        }
    }

    /// Resolve everything needed to build `pack_type`.
    ///
    /// Returns `None` if the pack has no (existing) source folder and should
    /// be skipped. Auxiliary files fall back to the general ones.
    ///
    /// # Errors
    /// - If the target version or output path is not configured
    pub fn request(&self, pack_type: PackType) -> Result<Option<PackRequest>> {
        let pack = self.pack(pack_type);
        let Some(source_folder) = pack.source_folder.clone() else {
            return Ok(None);
        };

        let target_version = self
            .target_version
            .clone()
            .ok_or_else(|| self.missing(GENERAL, "targetVersion"))?;
        let output_path = self
            .output_path
            .clone()
            .ok_or_else(|| self.missing(GENERAL, "outputPath"))?;

        let general = &self.general_aux_files;
        let aux_files = AuxFiles {
            icon: pack.aux_files.icon.clone().or_else(|| general.icon.clone()),
            readme: pack.aux_files.readme.clone().or_else(|| general.readme.clone()),
            license: pack.aux_files.license.clone().or_else(|| general.license.clone()),
        };

        Ok(Some(PackRequest {
            pack_type,
            name: pack
                .name
                .clone()
                .unwrap_or_else(|| pack_type.display_name().to_string()),
            description: pack.description.clone().unwrap_or_default(),
            source_folder,
            target_version,
            build_version: self.build_version.clone(),
            output_path,
            aux_files,
            options: pack.options,
        }))
    }

    fn missing(&self, section: &'static str, key: &'static str) -> PackError {
        PackError::MissingKey {
            origin: self.origin.clone(),
            section,
            key,
        }
    }
}

/// Fully resolved settings for building one pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackRequest {
    /// Kind of pack.
    pub pack_type: PackType,
    /// Pack name.
    pub name: String,
    /// Pack description.
    pub description: String,
    /// Folder holding the pack content.
    pub source_folder: PathBuf,
    /// Game version the pack targets.
    pub target_version: Version,
    /// Version of the pack itself.
    pub build_version: Option<Version>,
    /// Folder the pack is written to.
    pub output_path: PathBuf,
    /// Icon, readme and license after fallback.
    pub aux_files: AuxFiles,
    /// Output mode.
    pub options: BuildOptions,
}

impl PackRequest {
    /// Collect the pack content and metadata.
    #[must_use]
    pub fn describe(&self) -> PackDescriptor {
        PackDescriptor::create(self.pack_type, &self.source_folder, &self.target_version)
            .with_name(&self.name)
            .with_description(&self.description)
            .with_build_version(self.build_version.clone())
            .with_aux_files(self.aux_files.clone())
    }

    /// Describe and build the pack, returning the path of the artifact.
    ///
    /// # Errors
    /// - If building fails, see [`PackDescriptor::build`]
    #[cfg(feature = "zip")]
    pub fn build(&self) -> Result<PathBuf> {
        self.describe().build(&self.output_path, self.options)
    }
}

fn section<'a>(ini: &'a Ini, name: &'static str, origin: &str) -> Result<&'a Properties> {
    ini.section(Some(name))
        .ok_or_else(|| PackError::MissingSection {
            origin: origin.to_string(),
            section: name,
        })
}

fn non_empty<'a>(props: &'a Properties, key: &str) -> Option<&'a str> {
    props.get(key).map(str::trim).filter(|value| !value.is_empty())
}

/// A path value, unset unless it exists.
fn existing_path(props: &Properties, key: &str) -> Option<PathBuf> {
    non_empty(props, key)
        .map(PathBuf::from)
        .filter(|path| path.exists())
}

fn flag(props: &Properties, key: &str, default: bool) -> bool {
    props
        .get(key)
        .map_or(default, |value| value.trim().eq_ignore_ascii_case("true"))
}

fn version_value(props: &Properties, key: &str) -> Result<Option<Version>> {
    non_empty(props, key).map(parse_version).transpose()
}

fn aux_files(props: &Properties) -> AuxFiles {
    AuxFiles {
        icon: existing_path(props, "packpngPath"),
        readme: existing_path(props, "readmePath"),
        license: existing_path(props, "licensePath"),
    }
}

fn pack_config(props: &Properties, source_key: &str) -> PackConfig {
    PackConfig {
        name: props.get("name").map(str::to_string),
        description: props.get("description").map(str::to_string),
        source_folder: existing_path(props, source_key),
        aux_files: aux_files(props),
        options: BuildOptions {
            zipped: flag(props, "buildZipped", true),
            overwrite: flag(props, "overwrite", false),
        },
    }
}

fn overlay<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

fn overlay_aux(target: &mut AuxFiles, other: AuxFiles) {
    overlay(&mut target.icon, other.icon);
    overlay(&mut target.readme, other.readme);
    overlay(&mut target.license, other.license);
}

fn overlay_pack(target: &mut PackConfig, other: PackConfig) {
    overlay(&mut target.name, other.name);
    overlay(&mut target.description, other.description);
    overlay(&mut target.source_folder, other.source_folder);
    overlay_aux(&mut target.aux_files, other.aux_files);
    target.options = other.options;
}
