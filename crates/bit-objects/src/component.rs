//! Interfaces to the collaborators that feed a [`Version`].

use std::collections::BTreeMap;
use std::path::Path;

use bit_types::BitId;
use serde::{Deserialize, Serialize};

use crate::error::{ObjectError, Result};
use crate::reference::Ref;
use crate::version::Version;

/// A component as seen by [`Version::from_component`].
pub trait Component {
    /// Name of the implementation entry point.
    fn impl_file_name(&self) -> &str;

    /// Name of the spec entry point, if the component has specs.
    fn specs_file_name(&self) -> Option<&str>;

    /// Package-manager dependencies: package name to semver range.
    fn package_dependencies(&self) -> &BTreeMap<String, String>;
}

/// Component description as written in a JSON manifest.
///
/// ```json
/// { "impl": "index.js", "spec": "index.spec.js",
///   "packageDependencies": { "lodash": "^4.0.0" } }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentManifest {
    #[serde(rename = "impl")]
    pub impl_file: String,
    #[serde(rename = "spec", default, skip_serializing_if = "Option::is_none")]
    pub specs_file: Option<String>,
    #[serde(rename = "packageDependencies", default)]
    pub package_dependencies: BTreeMap<String, String>,
}

impl ComponentManifest {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| ObjectError::InvalidManifest(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ObjectError::InvalidManifest(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }
}

impl Component for ComponentManifest {
    fn impl_file_name(&self) -> &str {
        &self.impl_file
    }

    fn specs_file_name(&self) -> Option<&str> {
        self.specs_file.as_deref()
    }

    fn package_dependencies(&self) -> &BTreeMap<String, String> {
        &self.package_dependencies
    }
}

/// Dependency lists computed for a version.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedDependencies {
    /// Direct dependencies, in the order the resolver chose.
    pub dependencies: Vec<BitId>,
    /// Transitive closure of the dependency graph.
    pub flattened: Vec<Ref>,
}

/// Computes the dependencies of a version before it is stored.
///
/// The resolution algorithm lives outside this crate; versions only carry
/// its result.
pub trait DependencyResolver {
    fn resolve(&self, version: &Version) -> Result<ResolvedDependencies>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_from_json() {
        let manifest = ComponentManifest::from_json(
            r#"{"impl":"index.js","spec":"index.spec.js","packageDependencies":{"lodash":"^4.0.0"}}"#,
        )
        .unwrap();
        assert_eq!(manifest.impl_file_name(), "index.js");
        assert_eq!(manifest.specs_file_name(), Some("index.spec.js"));
        assert_eq!(
            manifest.package_dependencies().get("lodash").map(String::as_str),
            Some("^4.0.0")
        );
    }

    #[test]
    fn manifest_optional_keys_default() {
        let manifest = ComponentManifest::from_json(r#"{"impl":"index.js"}"#).unwrap();
        assert_eq!(manifest.specs_file_name(), None);
        assert!(manifest.package_dependencies().is_empty());
    }

    #[test]
    fn manifest_without_impl_is_invalid() {
        let err = ComponentManifest::from_json(r#"{"spec":"x.spec.js"}"#).unwrap_err();
        assert!(matches!(err, ObjectError::InvalidManifest(_)));
    }

    #[test]
    fn manifest_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bit.json");
        std::fs::write(&path, r#"{"impl":"main.js"}"#).unwrap();
        assert_eq!(
            ComponentManifest::from_path(&path).unwrap().impl_file,
            "main.js"
        );
        assert!(ComponentManifest::from_path(&dir.path().join("missing.json")).is_err());
    }
}
