//! Version labels for migration folders.
//!
//! A version folder is either the literal `init` sentinel or a semantic
//! version like `1.2.0`. `init` sorts before every release and is exempt
//! from the version-ceiling check; any other folder name that is not valid
//! semver is rejected outright rather than silently mis-ordered.

use crate::error::{CoreError, CoreResult};
use std::cmp::Ordering;
use std::fmt;

/// The folder name of the initialization version.
pub const INIT: &str = "init";

/// A parsed migration-folder label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionLabel {
    /// The `init` sentinel, always first.
    Init,
    /// A semantic-version release folder.
    Release(semver::Version),
}

impl VersionLabel {
    /// Parse a folder name into a label.
    pub fn parse(name: &str) -> CoreResult<Self> {
        if name == INIT {
            return Ok(VersionLabel::Init);
        }

        let version = semver::Version::parse(name).map_err(|_| CoreError::InvalidVersion {
            name: name.to_string(),
        })?;

        Ok(VersionLabel::Release(version))
    }

    /// True when this label is a release strictly above `ceiling`.
    ///
    /// `init` never exceeds any ceiling.
    pub fn exceeds_ceiling(&self, ceiling: &semver::Version) -> bool {
        match self {
            VersionLabel::Init => false,
            VersionLabel::Release(version) => version > ceiling,
        }
    }

    /// True for the `init` sentinel.
    pub fn is_init(&self) -> bool {
        matches!(self, VersionLabel::Init)
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionLabel::Init => write!(f, "{INIT}"),
            VersionLabel::Release(version) => write!(f, "{version}"),
        }
    }
}

impl Ord for VersionLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (VersionLabel::Init, VersionLabel::Init) => Ordering::Equal,
            (VersionLabel::Init, VersionLabel::Release(_)) => Ordering::Less,
            (VersionLabel::Release(_), VersionLabel::Init) => Ordering::Greater,
            (VersionLabel::Release(a), VersionLabel::Release(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for VersionLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
