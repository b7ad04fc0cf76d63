use crate::{error::ConfigurationError, value::Value};

///
/// FieldPath
///
/// Parsed value-extraction path for one sort column. Segments are separated
/// by `.` and are either object keys or numeric indexes, e.g.
/// `profile.emails.0.address`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

///
/// PathSegment
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl FieldPath {
    /// Parse a dotted/indexed path. Empty paths and empty segments fail.
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        if raw.is_empty() {
            return Err(ConfigurationError::InvalidPath {
                path: raw.to_string(),
            });
        }

        let mut segments = Vec::new();
        for part in raw.split('.') {
            if part.is_empty() {
                return Err(ConfigurationError::InvalidPath {
                    path: raw.to_string(),
                });
            }

            match part.parse::<usize>() {
                Ok(index) => segments.push(PathSegment::Index(index)),
                Err(_) => segments.push(PathSegment::Key(part.to_string())),
            }
        }

        Ok(Self { segments })
    }

    /// Build a single-key path from a bare column name.
    #[must_use]
    pub fn from_key(key: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(key.into())],
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Key(key) => f.write_str(key)?,
                PathSegment::Index(index) => write!(f, "{index}")?,
            }
        }

        Ok(())
    }
}

///
/// FieldAccess
///
/// Row capability consumed by boundary extraction. Implementations resolve a
/// path to a scalar, or `None` when any step is absent; absence is
/// normalized to null by the caller.
///

pub trait FieldAccess {
    fn value_at(&self, path: &FieldPath) -> Option<Value>;
}

impl FieldAccess for serde_json::Value {
    fn value_at(&self, path: &FieldPath) -> Option<Value> {
        let mut node = self;
        for segment in path.segments() {
            node = match segment {
                PathSegment::Key(key) => node.get(key.as_str())?,
                PathSegment::Index(index) => node.get(*index)?,
            };
        }

        json_scalar(node)
    }
}

// Terminal JSON nodes map onto boundary scalars; arrays and objects have no
// scalar projection and resolve as absent.
fn json_scalar(node: &serde_json::Value) -> Option<Value> {
    match node {
        serde_json::Value::Null => Some(Value::Null),
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_f64().map(Value::from)),
        serde_json::Value::String(s) => Some(Value::Text(s.clone())),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    }
}

///
/// TESTS
///
