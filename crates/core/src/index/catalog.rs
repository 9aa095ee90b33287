use crate::config::LibraryEntry;
use crate::error::Result;
use liteworkspace_api::models::LibraryCoordinate;

/// Maps foreign packages to the library that provides them.
#[derive(Debug, Clone, Default)]
pub struct LibraryCatalog {
    entries: Vec<(String, LibraryCoordinate)>,
}

impl LibraryCatalog {
    pub fn from_config(libraries: &[LibraryEntry]) -> Result<Self> {
        let mut catalog = Self::default();
        for entry in libraries {
            let coordinate = entry.parsed_coordinate()?;
            for package in &entry.packages {
                catalog.insert(package.trim_end_matches(".*"), coordinate.clone());
            }
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, package_prefix: &str, coordinate: LibraryCoordinate) {
        self.entries.push((package_prefix.to_string(), coordinate));
        // Longest prefix first so the most specific entry wins.
        self.entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Configured owner of `package`; platform packages map to the JDK.
    pub fn lookup(&self, package: &str) -> Option<LibraryCoordinate> {
        self.entries
            .iter()
            .find(|(prefix, _)| {
                package == prefix
                    || (package.starts_with(prefix.as_str())
                        && package.as_bytes().get(prefix.len()) == Some(&b'.'))
            })
            .map(|(_, coordinate)| coordinate.clone())
            .or_else(|| is_platform_package(package).then(LibraryCoordinate::jdk))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_platform_package(package: &str) -> bool {
    ["java", "javax"]
        .iter()
        .any(|root| package == *root || package.starts_with(&format!("{}.", root)))
}
