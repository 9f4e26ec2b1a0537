//! Mapping of game versions to `pack_format` numbers.

use std::{fmt::Display, str::FromStr};

use semver::{BuildMetadata, Version, VersionReq};

use crate::error::{PackError, Result};

/// Pack formats for datapacks, in ascending order.
pub const DATAPACK_FORMATS: FormatTable = FormatTable::new(
    &[
        PackFormatEntry::new(4, "1.13 - 1.14.4"),
        PackFormatEntry::new(5, "1.15 - 1.16.1"),
        PackFormatEntry::new(6, "1.16.2 - 1.16.5"),
        PackFormatEntry::new(7, "1.17 - 1.17.1"),
        PackFormatEntry::new(8, "1.18 - 1.18.1"),
        PackFormatEntry::new(9, "1.18.2"),
        PackFormatEntry::new(10, "1.19 - 1.19.2"),
    ],
    10,
);

/// Pack formats for resource packs, in ascending order.
pub const RESOURCE_PACK_FORMATS: FormatTable = FormatTable::new(
    &[
        PackFormatEntry::new(1, "1.6.1 - 1.8.9"),
        PackFormatEntry::new(2, "1.9 - 1.10.2"),
        PackFormatEntry::new(3, "1.11 - 1.12.2"),
        PackFormatEntry::new(4, "1.13 - 1.14.4"),
        PackFormatEntry::new(5, "1.15 - 1.16.1"),
        PackFormatEntry::new(6, "1.16.2 - 1.16.5"),
        PackFormatEntry::new(7, "1.17.x"),
        PackFormatEntry::new(8, "1.18.x"),
        PackFormatEntry::new(9, "1.19.x"),
    ],
    9,
);

/// Parse a game or build version.
///
/// Accepts full semantic versions as well as the shortened `1.19` and `1`
/// forms the game uses; missing components are zero.
///
/// # Errors
/// - If the input is neither a semantic version nor one to three dotted numbers
pub fn parse_version(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    let semver_err = match Version::parse(trimmed) {
        Ok(version) => return Ok(version),
        Err(err) => err,
    };

    let numbers = trimmed
        .split('.')
        .map(str::parse::<u64>)
        .collect::<std::result::Result<Vec<_>, _>>();
    match numbers.as_deref() {
        Ok([major]) => Ok(Version::new(*major, 0, 0)),
        Ok([major, minor]) => Ok(Version::new(*major, *minor, 0)),
        _ => Err(PackError::InvalidVersion {
            input: input.to_string(),
            reason: semver_err.to_string(),
        }),
    }
}

/// A set of game versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRange {
    /// Exactly one release, e.g. `1.18.2`.
    Exact(Version),
    /// Inclusive band, e.g. `1.13 - 1.14.4`.
    Between(Version, Version),
    /// Every release sharing the fixed components, e.g. `1.17.x`.
    Wildcard {
        /// Required major version, if any.
        major: Option<u64>,
        /// Required minor version, if any.
        minor: Option<u64>,
    },
    /// Comparator list such as `>=1.13, <1.15`.
    Requirement(VersionReq),
}

impl VersionRange {
    /// Check whether `version` lies in this range.
    #[must_use]
    pub fn contains(&self, version: &Version) -> bool {
        match self {
            Self::Exact(exact) => release(exact) == release(version),
            Self::Between(low, high) => {
                let version = release(version);
                release(low) <= version && version <= release(high)
            }
            Self::Wildcard { major, minor } => {
                major.map_or(true, |major| version.major == major)
                    && minor.map_or(true, |minor| version.minor == minor)
            }
            Self::Requirement(req) => req.matches(version),
        }
    }
}

/// `version` without build metadata, which does not take part in comparisons.
fn release(version: &Version) -> Version {
    Version {
        build: BuildMetadata::EMPTY,
        ..version.clone()
    }
}

impl FromStr for VersionRange {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || PackError::InvalidVersionRange {
            input: s.to_string(),
        };

        if s.starts_with(['>', '<', '=', '~', '^']) {
            return VersionReq::parse(s)
                .map(Self::Requirement)
                .map_err(|_| invalid());
        }
        if let Some((low, high)) = s.split_once(" - ") {
            let low = parse_version(low).map_err(|_| invalid())?;
            let high = parse_version(high).map_err(|_| invalid())?;
            return Ok(Self::Between(low, high));
        }
        if s.contains(['x', 'X', '*']) {
            return parse_wildcard(s)
                .map(|(major, minor)| Self::Wildcard { major, minor })
                .ok_or_else(invalid);
        }
        parse_version(s).map(Self::Exact).map_err(|_| invalid())
    }
}

fn parse_wildcard(s: &str) -> Option<(Option<u64>, Option<u64>)> {
    let mut fixed = Vec::new();
    let mut wild = false;
    for part in s.split('.') {
        if matches!(part, "x" | "X" | "*") {
            wild = true;
        } else if wild {
            return None;
        } else {
            fixed.push(part.parse::<u64>().ok()?);
        }
    }

    match fixed.as_slice() {
        [] => Some((None, None)),
        [major] => Some((Some(*major), None)),
        [major, minor] => Some((Some(*major), Some(*minor))),
        _ => None,
    }
}

/// One row of a format table: a `pack_format` and the versions it covers.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackFormatEntry {
    format: u8,
    versions: &'static str,
}

impl PackFormatEntry {
    /// Create a new entry.
    #[must_use]
    pub const fn new(format: u8, versions: &'static str) -> Self {
        Self { format, versions }
    }

    /// The `pack_format` number.
    #[must_use]
    pub const fn format(&self) -> u8 {
        self.format
    }

    /// The version range expression.
    #[must_use]
    pub const fn versions(&self) -> &'static str {
        self.versions
    }

    /// Check whether `version` is covered by this entry.
    ///
    /// # Errors
    /// - If the entry's range expression is malformed
    pub fn includes(&self, version: &Version) -> Result<bool> {
        Ok(self.versions.parse::<VersionRange>()?.contains(version))
    }
}

impl Display for PackFormatEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.format, self.versions)
    }
}

/// Resolve the `pack_format` for `target`.
///
/// Every entry is checked in order and the last one containing `target` wins.
/// Without any match, `fallback` is returned, so versions newer than the
/// table still build against the newest known format. Malformed entries are
/// skipped with a warning.
#[must_use]
pub fn resolve_format(target: &Version, table: &[PackFormatEntry], fallback: u8) -> u8 {
    let mut format = fallback;
    for entry in table {
        match entry.includes(target) {
            Ok(true) => format = entry.format,
            Ok(false) => {}
            Err(err) => tracing::warn!("ignoring pack format {entry}: {err}"),
        }
    }
    format
}

/// Ordered format table together with the format used when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatTable {
    entries: &'static [PackFormatEntry],
    latest: u8,
}

impl FormatTable {
    /// Create a new table. Entries must be sorted by ascending format.
    #[must_use]
    pub const fn new(entries: &'static [PackFormatEntry], latest: u8) -> Self {
        Self { entries, latest }
    }

    /// The entries of the table.
    #[must_use]
    pub const fn entries(&self) -> &'static [PackFormatEntry] {
        self.entries
    }

    /// Newest known format, used as fallback.
    #[must_use]
    pub const fn latest(&self) -> u8 {
        self.latest
    }

    /// Resolve the format for `target`, see [`resolve_format`].
    #[must_use]
    pub fn resolve(&self, target: &Version) -> u8 {
        resolve_format(target, self.entries, self.latest)
    }
}
