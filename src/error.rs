//! Errors raised while configuring and assembling packs.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PackError>;

/// Everything that can abort a pack build.
#[derive(Debug, Error)]
pub enum PackError {
    /// The output directory (or the pack folder inside it) could not be created.
    #[error("could not create output directory {}: {source}", path.display())]
    CreateOutputDirectory {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A previous artifact in the way of an overwriting build could not be removed.
    #[error("could not remove existing output {}: {source}", path.display())]
    RemoveExisting {
        /// Path that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing part of the output failed.
    #[error("could not write {}: {source}", path.display())]
    Write {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Reading a source file failed.
    #[error("could not read {}: {source}", path.display())]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The in-memory archive could not be assembled.
    #[cfg(feature = "zip")]
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A game or build version string is not a dotted version.
    #[error("invalid version '{input}': {reason}")]
    InvalidVersion {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A version range expression could not be parsed.
    #[error("invalid version range '{input}'")]
    InvalidVersionRange {
        /// The rejected expression.
        input: String,
    },

    /// The configuration text is not valid INI.
    #[error("could not parse {origin}: {source}")]
    ConfigParse {
        /// File name or other label of the configuration source.
        origin: String,
        /// Parser error.
        source: ini::ParseError,
    },

    /// A required configuration section is missing.
    #[error("could not find a required section in {origin}: missing [{section}]")]
    MissingSection {
        /// File name or other label of the configuration source.
        origin: String,
        /// Name of the missing section.
        section: &'static str,
    },

    /// A value the build cannot do without is not configured.
    #[error("{origin} does not set {key} in [{section}]")]
    MissingKey {
        /// File name or other label of the configuration source.
        origin: String,
        /// Section the key belongs to.
        section: &'static str,
        /// Name of the missing key.
        key: &'static str,
    },
}
