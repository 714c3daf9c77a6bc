//! # Spec Versions
//!
//! NGFF versions are short dotted strings ("0.1" .. "0.5") plus, for
//! unreleased drafts, a pre-release tag ("0.6.dev2", "0.5-rc1").
//!
//! ## Ordering
//!
//! Release components compare numerically with trailing zeros ignored, so
//! "0.4" and "0.4.0" sort together. A pre-release sorts before the release
//! it precedes, and pre-release tags compare lexically ("dev1" < "dev2" <
//! "rc1"). The raw string is the final tiebreaker, which keeps `Ord`
//! consistent with `Eq`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VersionParseError;

/// Version assumed for legacy documents that declare none. 0.4 is the last
/// version in which declaring a version was optional.
pub const DEFAULT_LEGACY_VERSION: &str = "0.4";

/// First version that nests attributes under an `ome` key.
pub const NAMESPACED_SINCE: &str = "0.5";

/// Newest released version. Anything newer is treated as a draft.
pub const LATEST_RELEASE: &str = "0.5";

// Release components of the constants above, kept next to them.
const DEFAULT_LEGACY_RELEASE: &[u32] = &[0, 4];
const NAMESPACED_SINCE_RELEASE: &[u32] = &[0, 5];
const LATEST_RELEASE_COMPONENTS: &[u32] = &[0, 5];

/// An NGFF specification version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpecVersion {
    raw: String,
    release: Vec<u32>,
    pre: Option<String>,
}

impl SpecVersion {
    /// Parse a version string.
    ///
    /// # Errors
    ///
    /// Returns [`VersionParseError`] if the string is empty or does not
    /// start with a numeric component.
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(VersionParseError {
                input: input.to_string(),
                reason: "empty version".to_string(),
            });
        }

        let mut release = Vec::new();
        let mut pre = None;
        let mut rest = raw;

        while !rest.is_empty() {
            let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if digits == 0 {
                pre = Some(rest.to_string());
                break;
            }
            let component = rest[..digits].parse::<u32>().map_err(|e| VersionParseError {
                input: input.to_string(),
                reason: e.to_string(),
            })?;
            release.push(component);
            rest = &rest[digits..];

            match rest.chars().next() {
                None => break,
                Some('.') if rest[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                    rest = &rest[1..];
                }
                Some('.' | '-' | '+' | '_') => {
                    let tag = &rest[1..];
                    if tag.is_empty() {
                        return Err(VersionParseError {
                            input: input.to_string(),
                            reason: "trailing separator".to_string(),
                        });
                    }
                    pre = Some(tag.to_string());
                    break;
                }
                Some(_) => {
                    pre = Some(rest.to_string());
                    break;
                }
            }
        }

        if release.is_empty() {
            return Err(VersionParseError {
                input: input.to_string(),
                reason: "version must start with a numeric component".to_string(),
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            release,
            pre,
        })
    }

    /// The fallback version for legacy documents ("0.4").
    pub fn default_legacy() -> Self {
        Self::known(DEFAULT_LEGACY_VERSION, DEFAULT_LEGACY_RELEASE)
    }

    /// The newest released version ("0.5").
    pub fn latest_release() -> Self {
        Self::known(LATEST_RELEASE, LATEST_RELEASE_COMPONENTS)
    }

    fn known(raw: &str, release: &[u32]) -> Self {
        Self {
            raw: raw.to_string(),
            release: release.to_vec(),
            pre: None,
        }
    }

    /// The version exactly as declared (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric release components.
    pub fn release(&self) -> &[u32] {
        &self.release
    }

    /// Pre-release tag, if any ("dev2" for "0.6.dev2").
    pub fn pre_release(&self) -> Option<&str> {
        self.pre.as_deref()
    }

    /// True for drafts: tagged pre-releases and anything newer than the
    /// latest published release.
    pub fn is_development(&self) -> bool {
        self.pre.is_some()
            || compare_release(&self.release, LATEST_RELEASE_COMPONENTS) == Ordering::Greater
    }

    /// True if documents of this version nest attributes under `ome`.
    pub fn is_namespaced(&self) -> bool {
        compare_release(&self.release, NAMESPACED_SINCE_RELEASE) != Ordering::Less
    }
}

fn compare_release(a: &[u32], b: &[u32]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

impl Ord for SpecVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_release(&self.release, &other.release)
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for SpecVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for SpecVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SpecVersion {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SpecVersion> for String {
    fn from(value: SpecVersion) -> Self {
        value.raw
    }
}
