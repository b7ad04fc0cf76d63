use crate::{
    cursor::{
        armor::{decode_armor, encode_armor},
        boundary::BoundaryValues,
    },
    error::{ConfigurationError, InvalidCursorError},
    obs::{self, PageEvent},
    value::Value,
};
use serde::{Deserialize, Serialize};
use serde_cbor::Value as CborValue;
use std::panic::{AssertUnwindSafe, catch_unwind};

const MAX_CURSOR_PAYLOAD_BYTES: usize = 8 * 1024;

///
/// Cursor
///
/// Immutable continuation value object: query identity, sort identity,
/// optional argument fingerprint, optional boundary values. Encodes to an
/// opaque URL-safe token; callers must treat the token contents as an
/// implementation detail.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cursor {
    query_id: String,
    sort_id: String,
    args_fingerprint: Option<String>,
    values: Option<BoundaryValues>,
}

impl Cursor {
    #[must_use]
    pub fn new(query_id: impl Into<String>, sort_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            sort_id: sort_id.into(),
            args_fingerprint: None,
            values: None,
        }
    }

    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.args_fingerprint = Some(fingerprint.into());
        self
    }

    #[must_use]
    pub fn with_values(mut self, values: BoundaryValues) -> Self {
        self.values = Some(values);
        self
    }

    #[must_use]
    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    #[must_use]
    pub fn sort_id(&self) -> &str {
        &self.sort_id
    }

    #[must_use]
    pub fn args_fingerprint(&self) -> Option<&str> {
        self.args_fingerprint.as_deref()
    }

    #[must_use]
    pub const fn values(&self) -> Option<&BoundaryValues> {
        self.values.as_ref()
    }

    #[must_use]
    pub fn into_values(self) -> Option<BoundaryValues> {
        self.values
    }

    /// Serialize to the opaque token form.
    pub fn encode(&self) -> Result<String, ConfigurationError> {
        let wire = CursorWire {
            version: CursorVersion::V1.encode(),
            q: self.query_id.clone(),
            s: self.sort_id.clone(),
            a: self.args_fingerprint.clone(),
            v: self.values.as_ref().map(|values| values.values().to_vec()),
        };

        let bytes = serde_cbor::to_vec(&wire)
            .map_err(|err| ConfigurationError::CursorEncode {
                reason: err.to_string(),
            })?;

        Ok(encode_armor(&bytes))
    }

    /// Parse and structurally validate an incoming token.
    ///
    /// Identity and consistency checks against the receiving paginator are
    /// the orchestrator's responsibility, not the codec's.
    pub fn decode(token: &str) -> Result<Self, InvalidCursorError> {
        match Self::decode_structural(token) {
            Ok(cursor) => {
                obs::record(PageEvent::CursorDecoded);
                Ok(cursor)
            }
            Err(err) => {
                obs::record(PageEvent::CursorRejected);
                Err(err)
            }
        }
    }

    fn decode_structural(token: &str) -> Result<Self, InvalidCursorError> {
        let bytes = decode_armor(token).map_err(|source| InvalidCursorError::Armor {
            token: token.to_string(),
            source,
        })?;

        let payload = decode_payload(&bytes, token)?;
        let CborValue::Map(map) = &payload else {
            return Err(InvalidCursorError::PayloadShape {
                found: format!("{payload:?}"),
            });
        };

        let version = match require_field(map, "version")? {
            CborValue::Integer(raw) => u8::try_from(*raw)
                .map_err(|_| field_shape("version", &CborValue::Integer(*raw)))?,
            other => return Err(field_shape("version", other)),
        };
        CursorVersion::decode(version)?;

        let query_id = require_text(map, "q")?;
        let sort_id = require_text(map, "s")?;
        let args_fingerprint = optional_text(map, "a")?;
        let values = optional_values(map)?;

        Ok(Self {
            query_id,
            sort_id,
            args_fingerprint,
            values,
        })
    }
}

///
/// CursorWire
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
struct CursorWire {
    version: u8,
    q: String,
    s: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v: Option<Vec<Value>>,
}

///
/// CursorVersion
///
/// Wire-level token version owned by the codec boundary, keeping version
/// parsing and compatibility behavior centralized.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CursorVersion {
    V1,
}

impl CursorVersion {
    const V1_TAG: u8 = 1;

    const fn decode(raw: u8) -> Result<Self, InvalidCursorError> {
        match raw {
            Self::V1_TAG => Ok(Self::V1),
            version => Err(InvalidCursorError::UnsupportedVersion { version }),
        }
    }

    const fn encode(self) -> u8 {
        match self {
            Self::V1 => Self::V1_TAG,
        }
    }
}

// Bounded, panic-safe CBOR decode of untrusted payload bytes.
fn decode_payload(bytes: &[u8], token: &str) -> Result<CborValue, InvalidCursorError> {
    if bytes.len() > MAX_CURSOR_PAYLOAD_BYTES {
        return Err(InvalidCursorError::Malformed {
            token: token.to_string(),
            reason: "payload exceeds maximum allowed size".to_string(),
        });
    }

    let result = catch_unwind(AssertUnwindSafe(|| {
        serde_cbor::from_slice::<CborValue>(bytes)
    }));

    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(InvalidCursorError::Malformed {
            token: token.to_string(),
            reason: err.to_string(),
        }),
        Err(_) => Err(InvalidCursorError::Malformed {
            token: token.to_string(),
            reason: "panic during CBOR deserialization".to_string(),
        }),
    }
}

type CborMap = std::collections::BTreeMap<CborValue, CborValue>;

fn lookup<'a>(map: &'a CborMap, name: &str) -> Option<&'a CborValue> {
    map.get(&CborValue::Text(name.to_string()))
}

fn require_field<'a>(map: &'a CborMap, name: &'static str) -> Result<&'a CborValue, InvalidCursorError> {
    lookup(map, name).ok_or(InvalidCursorError::MissingField { field: name })
}

fn require_text(map: &CborMap, name: &'static str) -> Result<String, InvalidCursorError> {
    match require_field(map, name)? {
        CborValue::Text(text) => Ok(text.clone()),
        other => Err(field_shape(name, other)),
    }
}

fn optional_text(map: &CborMap, name: &'static str) -> Result<Option<String>, InvalidCursorError> {
    match lookup(map, name) {
        None => Ok(None),
        Some(CborValue::Text(text)) => Ok(Some(text.clone())),
        Some(other) => Err(field_shape(name, other)),
    }
}

fn optional_values(map: &CborMap) -> Result<Option<BoundaryValues>, InvalidCursorError> {
    match lookup(map, "v") {
        None => Ok(None),
        Some(CborValue::Array(items)) => {
            let values = items
                .iter()
                .map(|item| {
                    serde_cbor::value::from_value::<Value>(item.clone())
                        .map_err(|_| field_shape("v", item))
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Some(BoundaryValues::new(values)))
        }
        Some(other) => Err(field_shape("v", other)),
    }
}

fn field_shape(field: &'static str, found: &CborValue) -> InvalidCursorError {
    InvalidCursorError::FieldShape {
        field,
        found: format!("{found:?}"),
    }
}

///
/// TESTS
///
