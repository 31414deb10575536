//! Semantic version strings for compiler profiles

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons a version string is not a semantic version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemVerError {
    #[error("version string is empty")]
    Empty,

    #[error("expected MAJOR.MINOR.PATCH, found {0} numeric component(s)")]
    ComponentCount(usize),

    #[error("{component} version {value:?} is not a number")]
    NotANumber { component: &'static str, value: String },

    #[error("{component} version {value:?} has a leading zero")]
    LeadingZero { component: &'static str, value: String },

    #[error("invalid {part} identifier {value:?}")]
    InvalidIdentifier { part: &'static str, value: String },
}

/// A `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]` version
///
/// Displays back to exactly the text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
    pub build: Option<String>,
}

impl SemVer {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: None,
            build: None,
        }
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }
}

impl FromStr for SemVer {
    type Err = SemVerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(SemVerError::Empty);
        }

        let (rest, build) = match s.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (s, None),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        let components: Vec<&str> = core.split('.').collect();
        if components.len() != 3 {
            return Err(SemVerError::ComponentCount(components.len()));
        }

        let major = parse_numeric("major", components[0])?;
        let minor = parse_numeric("minor", components[1])?;
        let patch = parse_numeric("patch", components[2])?;

        if let Some(pre) = pre {
            validate_identifiers("pre-release", pre, true)?;
        }
        if let Some(build) = build {
            validate_identifiers("build", build, false)?;
        }

        Ok(Self {
            major,
            minor,
            patch,
            pre: pre.map(str::to_string),
            build: build.map(str::to_string),
        })
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ref pre) = self.pre {
            write!(f, "-{}", pre)?;
        }
        if let Some(ref build) = self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

fn parse_numeric(component: &'static str, value: &str) -> Result<u64, SemVerError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(SemVerError::NotANumber {
            component,
            value: value.to_string(),
        });
    }

    if value.len() > 1 && value.starts_with('0') {
        return Err(SemVerError::LeadingZero {
            component,
            value: value.to_string(),
        });
    }

    value.parse().map_err(|_| SemVerError::NotANumber {
        component,
        value: value.to_string(),
    })
}

fn validate_identifiers(
    part: &'static str,
    value: &str,
    reject_leading_zero: bool,
) -> Result<(), SemVerError> {
    for identifier in value.split('.') {
        let well_formed = !identifier.is_empty()
            && identifier
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');

        // Numeric pre-release identifiers must not carry leading zeros
        let numeric = identifier.chars().all(|c| c.is_ascii_digit());
        let leading_zero =
            reject_leading_zero && numeric && identifier.len() > 1 && identifier.starts_with('0');

        if !well_formed || leading_zero {
            return Err(SemVerError::InvalidIdentifier {
                part,
                value: identifier.to_string(),
            });
        }
    }
    Ok(())
}
