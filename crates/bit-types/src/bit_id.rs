use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Box name used when an id names only the component.
pub const DEFAULT_BOX: &str = "global";

/// Identity of a component: `[scope/]box/name[@version]`.
///
/// A `BitId` has exactly one canonical textual form, produced by `Display`
/// and written by serde. Parsing a canonical string and displaying it again
/// yields the same string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitId {
    scope: Option<String>,
    box_name: String,
    name: String,
    version: Option<String>,
}

impl BitId {
    /// Build an id from its parts, validating each segment.
    pub fn new(
        scope: Option<&str>,
        box_name: &str,
        name: &str,
        version: Option<&str>,
    ) -> Result<Self, TypeError> {
        let id = Self {
            scope: scope.map(str::to_owned),
            box_name: box_name.to_owned(),
            name: name.to_owned(),
            version: version.map(str::to_owned),
        };
        let text = id.to_string();
        if let Some(scope) = &id.scope {
            validate_segment(&text, "scope", scope)?;
        }
        validate_segment(&text, "box", &id.box_name)?;
        validate_segment(&text, "name", &id.name)?;
        if let Some(version) = &id.version {
            validate_segment(&text, "version", version)?;
        }
        Ok(id)
    }

    /// The owning scope, if the id is remote.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// The box (namespace) the component lives in.
    pub fn box_name(&self) -> &str {
        &self.box_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

fn validate_segment(id: &str, what: &str, segment: &str) -> Result<(), TypeError> {
    let reason = if segment.is_empty() {
        format!("empty {what}")
    } else if segment.chars().any(|c| c.is_whitespace() || c == '/' || c == '@') {
        format!("{what} {segment:?} contains a reserved character")
    } else {
        return Ok(());
    };
    Err(TypeError::InvalidBitId {
        id: id.to_owned(),
        reason,
    })
}

impl fmt::Display for BitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            write!(f, "{scope}/")?;
        }
        write!(f, "{}/{}", self.box_name, self.name)?;
        if let Some(version) = &self.version {
            write!(f, "@{version}")?;
        }
        Ok(())
    }
}

impl FromStr for BitId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TypeError::InvalidBitId {
            id: s.to_owned(),
            reason: reason.to_owned(),
        };

        let (path, version) = match s.split_once('@') {
            Some((path, version)) => (path, Some(version)),
            None => (s, None),
        };
        let segments: Vec<&str> = path.split('/').collect();
        let (scope, box_name, name) = match segments.as_slice() {
            [name] => (None, DEFAULT_BOX, *name),
            [box_name, name] => (None, *box_name, *name),
            [scope, box_name, name] => (Some(*scope), *box_name, *name),
            _ => return Err(invalid("expected [scope/]box/name[@version]")),
        };
        Self::new(scope, box_name, name, version).map_err(|e| match e {
            TypeError::InvalidBitId { reason, .. } => invalid(&reason),
            other => other,
        })
    }
}

impl Serialize for BitId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BitId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
