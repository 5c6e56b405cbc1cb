//! Component version snapshots.
//!
//! A [`Version`] records one released state of a component. It never holds
//! file content, only [`Ref`]s to [`Source`] objects, so the version's hash
//! changes whenever any referenced content changes.
//!
//! # Canonical encoding
//!
//! Compact UTF-8 JSON with this fixed field order:
//!
//! ```text
//! impl, specs, compiler, tester, dependencies, [flattenedDependencies],
//! packageDependencies, buildStatus, testStatus
//! ```
//!
//! Absent `specs`/`compiler`/`tester` encode as `null`. `flattenedDependencies`
//! is written only when non-empty. `packageDependencies` keys are sorted.
//! The order is part of the storage format: reordering fields changes hashes.

use std::collections::BTreeMap;

use bit_store::ObjectKind;
use bit_types::BitId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::component::{Component, DependencyResolver};
use crate::error::{ObjectError, Result};
use crate::object::BitObject;
use crate::reference::Ref;
use crate::source::Source;

/// Outcome of an externally run build or test step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    #[default]
    Unknown,
    Passed,
    Failed,
}

/// A named file and the content it had in this version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileRef {
    pub file: Ref,
    pub name: String,
}

impl FileRef {
    pub fn new(name: impl Into<String>, source: &Source) -> Self {
        Self {
            file: Ref::of(source.hash()),
            name: name.into(),
        }
    }
}

/// Immutable snapshot of a component.
///
/// Built by [`Version::from_component`] or [`Version::parse`]. The `with_*`
/// methods consume the version and return a new one; nothing mutates a
/// version in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Version {
    impl_file: FileRef,
    specs: Option<FileRef>,
    compiler: Option<Ref>,
    tester: Option<Ref>,
    dependencies: Vec<BitId>,
    flattened_dependencies: Vec<Ref>,
    package_dependencies: BTreeMap<String, String>,
    build_status: CheckStatus,
    test_status: CheckStatus,
}

/// Decoding shape of the canonical encoding. Only `flattenedDependencies`
/// may be missing; `parse` then checks the bytes are exactly canonical.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct VersionDoc {
    #[serde(rename = "impl")]
    impl_file: FileRef,
    specs: Option<FileRef>,
    compiler: Option<Ref>,
    tester: Option<Ref>,
    dependencies: Vec<BitId>,
    #[serde(default)]
    flattened_dependencies: Vec<Ref>,
    package_dependencies: BTreeMap<String, String>,
    build_status: CheckStatus,
    test_status: CheckStatus,
}

impl Version {
    /// Snapshot a component from its implementation and (optional) spec content.
    ///
    /// Dependencies start empty and tools absent; both are filled in later by
    /// the dependency resolver and the `with_*` methods.
    pub fn from_component(
        component: &dyn Component,
        impl_source: Option<&Source>,
        specs_source: Option<&Source>,
    ) -> Result<Self> {
        let impl_source = impl_source.ok_or_else(|| {
            ObjectError::IncompleteComponent("implementation source is required".into())
        })?;
        let impl_name = component.impl_file_name();
        if impl_name.is_empty() {
            return Err(ObjectError::IncompleteComponent(
                "implementation file name is empty".into(),
            ));
        }

        let specs = match specs_source {
            Some(source) => match component.specs_file_name() {
                Some(name) if !name.is_empty() => Some(FileRef::new(name, source)),
                _ => {
                    return Err(ObjectError::IncompleteComponent(
                        "specs source supplied without a specs file name".into(),
                    ))
                }
            },
            None => None,
        };

        let version = Self {
            impl_file: FileRef::new(impl_name, impl_source),
            specs,
            compiler: None,
            tester: None,
            dependencies: Vec::new(),
            flattened_dependencies: Vec::new(),
            package_dependencies: component.package_dependencies().clone(),
            build_status: CheckStatus::Unknown,
            test_status: CheckStatus::Unknown,
        };
        debug!(impl_name, has_specs = version.specs.is_some(), "built version from component");
        Ok(version)
    }

    pub fn with_compiler(self, compiler: Ref) -> Self {
        Self {
            compiler: Some(compiler),
            ..self
        }
    }

    pub fn with_tester(self, tester: Ref) -> Self {
        Self {
            tester: Some(tester),
            ..self
        }
    }

    /// Replace both dependency lists. Order is kept exactly as given.
    pub fn with_dependencies(self, dependencies: Vec<BitId>, flattened: Vec<Ref>) -> Self {
        Self {
            dependencies,
            flattened_dependencies: flattened,
            ..self
        }
    }

    pub fn with_build_status(self, status: CheckStatus) -> Self {
        Self {
            build_status: status,
            ..self
        }
    }

    pub fn with_test_status(self, status: CheckStatus) -> Self {
        Self {
            test_status: status,
            ..self
        }
    }

    /// Ask `resolver` for this version's dependencies and return the
    /// populated version.
    pub fn resolve_dependencies(self, resolver: &dyn DependencyResolver) -> Result<Self> {
        let resolved = resolver.resolve(&self)?;
        debug!(
            direct = resolved.dependencies.len(),
            flattened = resolved.flattened.len(),
            "resolved version dependencies"
        );
        Ok(self.with_dependencies(resolved.dependencies, resolved.flattened))
    }

    pub fn impl_file(&self) -> &FileRef {
        &self.impl_file
    }

    pub fn specs(&self) -> Option<&FileRef> {
        self.specs.as_ref()
    }

    pub fn compiler(&self) -> Option<&Ref> {
        self.compiler.as_ref()
    }

    pub fn tester(&self) -> Option<&Ref> {
        self.tester.as_ref()
    }

    pub fn dependencies(&self) -> &[BitId] {
        &self.dependencies
    }

    pub fn flattened_dependencies(&self) -> &[Ref] {
        &self.flattened_dependencies
    }

    pub fn package_dependencies(&self) -> &BTreeMap<String, String> {
        &self.package_dependencies
    }

    pub fn build_status(&self) -> CheckStatus {
        self.build_status
    }

    pub fn test_status(&self) -> CheckStatus {
        self.test_status
    }

    /// Every object this version points at, in encoding order.
    pub fn refs(&self) -> Vec<&Ref> {
        let mut refs = vec![&self.impl_file.file];
        refs.extend(self.specs.as_ref().map(|s| &s.file));
        refs.extend(self.compiler.as_ref());
        refs.extend(self.tester.as_ref());
        refs.extend(self.flattened_dependencies.iter());
        refs
    }

    /// Project into a JSON object with the canonical field order.
    pub fn to_object(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("impl".into(), json!(self.impl_file));
        obj.insert("specs".into(), json!(self.specs));
        obj.insert("compiler".into(), json!(self.compiler));
        obj.insert("tester".into(), json!(self.tester));
        obj.insert("dependencies".into(), json!(self.dependencies));
        if !self.flattened_dependencies.is_empty() {
            obj.insert(
                "flattenedDependencies".into(),
                json!(self.flattened_dependencies),
            );
        }
        obj.insert(
            "packageDependencies".into(),
            json!(self.package_dependencies),
        );
        obj.insert("buildStatus".into(), json!(self.build_status));
        obj.insert("testStatus".into(), json!(self.test_status));
        Value::Object(obj)
    }
}

impl BitObject for Version {
    const KIND: ObjectKind = ObjectKind::Version;

    fn to_buffer(&self) -> Vec<u8> {
        self.to_object().to_string().into_bytes()
    }

    fn parse(bytes: &[u8]) -> Result<Self> {
        let doc: VersionDoc = serde_json::from_slice(bytes)
            .map_err(|e| ObjectError::malformed(ObjectKind::Version, e.to_string()))?;

        for (field, entry) in [("impl", Some(&doc.impl_file)), ("specs", doc.specs.as_ref())] {
            if entry.is_some_and(|e| e.name.is_empty()) {
                return Err(ObjectError::malformed(
                    ObjectKind::Version,
                    format!("{field}.name is empty"),
                ));
            }
        }

        let version = Self {
            impl_file: doc.impl_file,
            specs: doc.specs,
            compiler: doc.compiler,
            tester: doc.tester,
            dependencies: doc.dependencies,
            flattened_dependencies: doc.flattened_dependencies,
            package_dependencies: doc.package_dependencies,
            build_status: doc.build_status,
            test_status: doc.test_status,
        };
        // One version, one byte string: anything else would be a second key.
        if version.to_buffer() != bytes {
            return Err(ObjectError::malformed(
                ObjectKind::Version,
                "bytes are not the canonical encoding",
            ));
        }
        Ok(version)
    }

    fn id(&self) -> String {
        self.to_object().to_string()
    }
}
