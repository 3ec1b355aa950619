//! Block identifier validation and URL extraction
//!
//! Notion addresses every page, sub-page and database by a 32-hex-digit block
//! id, usually displayed in 8-4-4-4-12 dashed grouping and embedded as the
//! trailing path segment of share URLs. Notion issues ids whose UUID
//! version/variant nibbles are not RFC 4122 conformant, so validation here
//! checks shape only (length, hex charset, dash positions), never the version.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Hostname suffixes of URLs recognized as Notion links
const NOTION_HOST_SUFFIXES: [&str; 2] = ["notion.site", "notion.so"];

/// A Notion block identifier in canonical dashed form
///
/// Construct via [`BlockId::parse`] (strict shape validation) or
/// [`BlockId::from_url_or_id`] (accepts share URLs as well).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Validate a candidate id and bring it into canonical dashed form.
    ///
    /// A dashed 8-4-4-4-12 hex string is returned unchanged; a bare 32-hex
    /// string gains dashes at positions 8/12/16/20. Hex digits are matched
    /// case-insensitively and input case is preserved. Anything else is
    /// rejected with [`Error::InvalidBlockId`].
    pub fn parse(candidate: &str) -> Result<Self> {
        if is_dashed_id(candidate) {
            return Ok(Self(candidate.to_string()));
        }
        if is_bare_id(candidate) {
            return Ok(Self(format!(
                "{}-{}-{}-{}-{}",
                &candidate[..8],
                &candidate[8..12],
                &candidate[12..16],
                &candidate[16..20],
                &candidate[20..],
            )));
        }
        Err(Error::InvalidBlockId {
            input: candidate.to_string(),
        })
    }

    /// Resolve user input that may be a bare id or a Notion share URL.
    ///
    /// Bare ids are canonicalized via [`BlockId::parse`]. For URLs the
    /// trailing path segment is extracted with [`extract_candidate`] and
    /// canonicalized when shape-valid; a shape-invalid segment is kept as-is
    /// and the remote API decides whether to accept it.
    pub fn from_url_or_id(input: &str) -> Result<Self> {
        let candidate = extract_candidate(input)?;
        match Self::parse(&candidate) {
            Ok(id) => Ok(id),
            Err(_) => Ok(Self(candidate)),
        }
    }

    /// View the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BlockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<BlockId> for String {
    fn from(id: BlockId) -> Self {
        id.0
    }
}

impl std::str::FromStr for BlockId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Pull the block id candidate out of user input.
///
/// A shape-valid bare id is returned unchanged (no dashes added). Otherwise
/// the input must parse as a URL whose hostname ends in `notion.site` or
/// `notion.so`; its path is stripped of the leading slash and split on `-`,
/// and the last segment is returned without further validation. A dashed id
/// inside a URL path splits on its own dashes, so only the trailing hex group
/// survives extraction; the undashed form Notion puts in share links is
/// unaffected.
pub fn extract_candidate(input: &str) -> Result<String> {
    if BlockId::parse(input).is_ok() {
        return Ok(input.to_string());
    }

    let parsed = Url::parse(input).map_err(|_| Error::InvalidBlockId {
        input: input.to_string(),
    })?;
    let host = parsed.host_str().unwrap_or_default();
    if !NOTION_HOST_SUFFIXES
        .iter()
        .any(|suffix| host.ends_with(suffix))
    {
        return Err(Error::InvalidBlockId {
            input: input.to_string(),
        });
    }

    let path = parsed.path().trim_start_matches('/');
    let segment = path.rsplit('-').next().unwrap_or(path);
    if segment.is_empty() {
        return Err(Error::InvalidBlockId {
            input: input.to_string(),
        });
    }
    Ok(segment.to_string())
}

/// Dashed 8-4-4-4-12 hex shape, case-insensitive
fn is_dashed_id(s: &str) -> bool {
    if s.len() != 36 {
        return false;
    }
    let parts: Vec<&str> = s.split('-').collect();
    parts.len() == 5
        && parts[0].len() == 8
        && parts[1].len() == 4
        && parts[2].len() == 4
        && parts[3].len() == 4
        && parts[4].len() == 12
        && parts
            .iter()
            .all(|p| p.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Bare 32-hex shape, case-insensitive
fn is_bare_id(s: &str) -> bool {
    s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit())
}
