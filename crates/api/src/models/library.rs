use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Maven-style library coordinate, `group:artifact[:version]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
pub struct LibraryCoordinate {
    pub group: String,
    pub artifact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl LibraryCoordinate {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The platform library (`java.*`, `javax.*`).
    pub fn jdk() -> Self {
        Self::new("jdk", "java.base")
    }

    /// Coordinate for a foreign package that no configured library claims.
    /// Keyed on the first two package segments so sibling packages collapse.
    pub fn inferred(package: &str) -> Self {
        let group = package.split('.').take(2).collect::<Vec<_>>().join(".");
        Self::new(group, "unknown")
    }

    pub fn is_jdk(&self) -> bool {
        self.group == "jdk"
    }
}

impl fmt::Display for LibraryCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}:{}:{}", self.group, self.artifact, v),
            None => write!(f, "{}:{}", self.group, self.artifact),
        }
    }
}

impl FromStr for LibraryCoordinate {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [group, artifact] if !group.is_empty() && !artifact.is_empty() => {
                Ok(Self::new(*group, *artifact))
            }
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(*group, *artifact).with_version(*version))
            }
            _ => Err(ApiError::InvalidArgument(format!(
                "invalid library coordinate '{}', expected group:artifact[:version]",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_coordinates() {
        let c: LibraryCoordinate = "org.springframework:spring-context:5.3.30".parse().unwrap();
        assert_eq!(c.group, "org.springframework");
        assert_eq!(c.version.as_deref(), Some("5.3.30"));
        assert_eq!(c.to_string(), "org.springframework:spring-context:5.3.30");

        let bare: LibraryCoordinate = "com.google.code.gson:gson".parse().unwrap();
        assert_eq!(bare.version, None);
        assert!("gson".parse::<LibraryCoordinate>().is_err());
        assert!("a::b".parse::<LibraryCoordinate>().is_err());
    }

    #[test]
    fn inferred_coordinate_uses_package_root() {
        let c = LibraryCoordinate::inferred("org.apache.commons.lang3");
        assert_eq!(c.to_string(), "org.apache:unknown");
        assert!(LibraryCoordinate::jdk().is_jdk());
    }
}
