//! Kloudless API version definitions.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Kloudless API version.
///
/// The API is versioned by a path prefix (`/v1/`). `V1` is the only version
/// the client is tested against; `Custom` allows pointing at a newer prefix
/// without a crate release.
///
/// # Example
///
/// ```rust
/// use kloudless::ApiVersion;
///
/// let version: ApiVersion = "v1".parse().unwrap();
/// assert_eq!(version, ApiVersion::V1);
/// assert_eq!(version.to_string(), "v1");
/// assert_eq!(ApiVersion::default(), ApiVersion::V1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// API version 1.
    #[default]
    V1,
    /// Any other `vN` prefix.
    Custom(String),
}

impl ApiVersion {
    /// Returns the latest version known to this crate.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V1
    }

    /// Returns `true` if this is a version the crate knows about.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::V1)
    }

    fn is_valid_version_format(s: &str) -> bool {
        s.strip_prefix('v').is_some_and(|digits| {
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("v1"),
            Self::Custom(s) => f.write_str(s),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "v1" | "1" => Ok(Self::V1),
            _ if Self::is_valid_version_format(&s) => Ok(Self::Custom(s)),
            _ => Err(ConfigError::InvalidApiVersion { version: s }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_parses_known_versions() {
        assert_eq!("v1".parse::<ApiVersion>().unwrap(), ApiVersion::V1);
        assert_eq!(" V1 ".parse::<ApiVersion>().unwrap(), ApiVersion::V1);
        assert_eq!("1".parse::<ApiVersion>().unwrap(), ApiVersion::V1);
    }

    #[test]
    fn test_api_version_parses_future_versions() {
        let version: ApiVersion = "v2".parse().unwrap();
        assert_eq!(version, ApiVersion::Custom("v2".to_string()));
        assert!(!version.is_known());
        assert_eq!(version.to_string(), "v2");
    }

    #[test]
    fn test_api_version_rejects_invalid() {
        assert!("".parse::<ApiVersion>().is_err());
        assert!("v".parse::<ApiVersion>().is_err());
        assert!("version1".parse::<ApiVersion>().is_err());
        assert!("2024-01".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_latest_is_default() {
        assert_eq!(ApiVersion::latest(), ApiVersion::default());
        assert!(ApiVersion::latest().is_known());
    }
}
