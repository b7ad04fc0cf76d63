use crate::{
    error::{ConfigurationError, InvalidCursorError},
    order::OrderDirection,
    predicate::CompareOp,
    sort::{
        path::{FieldAccess, FieldPath},
        rule::ValueRule,
        validate::{ValidationError, ValueContext, ValueFault},
    },
    value::Value,
};
use chrono::NaiveDate;
use std::{fmt, str::FromStr, sync::Arc};

///
/// SortKind
///
/// Recognized boundary value kinds for sort columns. Declared by tag
/// (`string`, `integer`, `float`, `boolean`, `date`).
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortKind {
    Bool,
    Date,
    Float,
    Int,
    #[default]
    Text,
}

impl SortKind {
    /// Canonical declaration tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Date => "date",
            Self::Float => "float",
            Self::Int => "integer",
            Self::Text => "string",
        }
    }

    /// Shape predicate; never fails.
    ///
    /// `Float` accepts integers (lossless widening). `Date` is date-like: a
    /// date value, or text in ISO `%Y-%m-%d` form, which orders
    /// chronologically under plain lexicographic text comparison.
    #[must_use]
    pub fn check(self, value: &Value) -> bool {
        match self {
            Self::Bool => matches!(value, Value::Bool(_)),
            Self::Date => match value {
                Value::Date(_) => true,
                Value::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
                _ => false,
            },
            Self::Float => matches!(value, Value::Float(_) | Value::Int(_)),
            Self::Int => matches!(value, Value::Int(_)),
            Self::Text => matches!(value, Value::Text(_)),
        }
    }
}

impl FromStr for SortKind {
    type Err = ConfigurationError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "string" => Ok(Self::Text),
            "integer" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "boolean" => Ok(Self::Bool),
            "date" => Ok(Self::Date),
            _ => Err(ConfigurationError::UnknownKind {
                tag: tag.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

///
/// SortDirection
///
/// Declared per-column direction. `DescNullsLast` orders values exactly like
/// `Desc` and differs only in null placement.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
    DescNullsLast,
}

impl SortDirection {
    /// Canonical declaration tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::DescNullsLast => "desc-nulls-last",
        }
    }

    /// Direction used for value comparison; the nulls-last variant collapses
    /// to plain descending.
    #[must_use]
    pub const fn order(self) -> OrderDirection {
        match self {
            Self::Asc => OrderDirection::Asc,
            Self::Desc | Self::DescNullsLast => OrderDirection::Desc,
        }
    }

    /// Whether the null equivalence class sorts before all non-null rows.
    #[must_use]
    pub const fn nulls_first(self) -> bool {
        !matches!(self, Self::DescNullsLast)
    }

    /// Direction used only for placing nulls: the ordering applied to the
    /// `column IS NULL` flag term (ascending = false before true).
    #[must_use]
    pub const fn null_order(self) -> OrderDirection {
        if self.nulls_first() {
            OrderDirection::Desc
        } else {
            OrderDirection::Asc
        }
    }

    /// Boundary comparison operator: rows strictly past a non-null boundary.
    #[must_use]
    pub const fn operator(self) -> CompareOp {
        match self {
            Self::Asc => CompareOp::Gt,
            Self::Desc | Self::DescNullsLast => CompareOp::Lt,
        }
    }
}

impl FromStr for SortDirection {
    type Err = ConfigurationError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            "desc-nulls-last" => Ok(Self::DescNullsLast),
            _ => Err(ConfigurationError::UnknownDirection {
                tag: tag.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

///
/// SortDescriptor
///
/// Raw, user-declared sort column. Everything except the column identifier
/// is optional; a bare column name is valid shorthand. Tags are validated at
/// normalization, not construction.
///

#[derive(Clone, Default)]
pub struct SortDescriptor {
    column: String,
    kind: Option<String>,
    nullable: Option<bool>,
    direction: Option<String>,
    path: Option<String>,
    rule: Option<Arc<dyn ValueRule>>,
}

impl SortDescriptor {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn kind(mut self, tag: impl Into<String>) -> Self {
        self.kind = Some(tag.into());
        self
    }

    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    #[must_use]
    pub fn direction(mut self, tag: impl Into<String>) -> Self {
        self.direction = Some(tag.into());
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn rule(mut self, rule: impl ValueRule + 'static) -> Self {
        self.rule = Some(Arc::new(rule));
        self
    }

    /// Apply defaults and validate every declared tag, producing the
    /// fully-defaulted descriptor.
    pub fn normalize(&self) -> Result<NormalizedSortDescriptor, ConfigurationError> {
        let bare_column = validate_column_identifier(&self.column)?;

        let kind = match self.kind.as_deref() {
            Some(tag) => tag.parse::<SortKind>()?,
            None => SortKind::default(),
        };
        let direction = match self.direction.as_deref() {
            Some(tag) => tag.parse::<SortDirection>()?,
            None => SortDirection::default(),
        };
        let path = match self.path.as_deref() {
            Some(raw) => FieldPath::parse(raw)?,
            None => FieldPath::from_key(bare_column),
        };

        Ok(NormalizedSortDescriptor {
            column: self.column.clone(),
            kind,
            nullable: self.nullable.unwrap_or(false),
            direction,
            path,
            rule: self.rule.clone(),
        })
    }
}

impl From<&str> for SortDescriptor {
    fn from(column: &str) -> Self {
        Self::new(column)
    }
}

impl From<String> for SortDescriptor {
    fn from(column: String) -> Self {
        Self::new(column)
    }
}

impl fmt::Debug for SortDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortDescriptor")
            .field("column", &self.column)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .field("direction", &self.direction)
            .field("path", &self.path)
            .field("rule", &self.rule.as_ref().map(|_| "<rule>"))
            .finish()
    }
}

// Column identifiers allow one optional qualifier: `column` or
// `table.column`. More separators or empty segments are invalid. Returns the
// bare column segment, which doubles as the default extraction path.
fn validate_column_identifier(identifier: &str) -> Result<&str, ConfigurationError> {
    let parts: Vec<&str> = identifier.split('.').collect();

    match parts.as_slice() {
        [column] if !column.is_empty() => Ok(column),
        [table, column] if !table.is_empty() && !column.is_empty() => Ok(column),
        _ => Err(ConfigurationError::InvalidColumnIdentifier {
            identifier: identifier.to_string(),
        }),
    }
}

///
/// NormalizedSortDescriptor
///
/// Fully-defaulted, internally consistent sort column. Immutable once built.
///

#[derive(Clone)]
pub struct NormalizedSortDescriptor {
    column: String,
    kind: SortKind,
    nullable: bool,
    direction: SortDirection,
    path: FieldPath,
    rule: Option<Arc<dyn ValueRule>>,
}

impl NormalizedSortDescriptor {
    /// Column identifier as declared, qualifier included.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub const fn kind(&self) -> SortKind {
        self.kind
    }

    #[must_use]
    pub const fn nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    #[must_use]
    pub const fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Direction used for value comparison.
    #[must_use]
    pub const fn order(&self) -> OrderDirection {
        self.direction.order()
    }

    /// Direction used only for placing nulls.
    #[must_use]
    pub const fn null_order(&self) -> OrderDirection {
        self.direction.null_order()
    }

    /// Boundary comparison operator for this column.
    #[must_use]
    pub const fn operator(&self) -> CompareOp {
        self.direction.operator()
    }

    /// Validate one boundary value in the given context. Null requires the
    /// nullable flag; non-null values must pass the kind check and then the
    /// optional custom rule.
    pub fn validate(&self, value: &Value, context: ValueContext) -> Result<(), ValidationError> {
        self.check_value(value)
            .map_err(|fault| fault.into_error(&self.column, context))
    }

    // Cursor-context validation with the taxonomy already applied; used on
    // the boundary recursion where the data origin is fixed.
    pub(crate) fn validate_cursor(&self, value: &Value) -> Result<(), InvalidCursorError> {
        self.check_value(value)
            .map_err(|fault| fault.into_cursor(&self.column))
    }

    /// Read this column's value from a row; absence normalizes to null. The
    /// result is validated in Configuration context.
    pub fn extract<R: FieldAccess>(&self, row: &R) -> Result<Value, ConfigurationError> {
        let value = row.value_at(&self.path).unwrap_or(Value::Null);

        self.check_value(&value)
            .map_err(|fault| fault.into_configuration(&self.column))?;

        Ok(value)
    }

    // Context-free validation shared by both error taxonomies.
    fn check_value(&self, value: &Value) -> Result<(), ValueFault> {
        if value.is_null() {
            if self.nullable {
                return Ok(());
            }

            return Err(ValueFault::Null);
        }

        if !self.kind.check(value) {
            return Err(ValueFault::Kind {
                expected: self.kind.tag(),
                value: value.clone(),
            });
        }

        if let Some(rule) = &self.rule
            && let Some(message) = rule.evaluate(value).into_message()
        {
            return Err(ValueFault::Rule { message });
        }

        Ok(())
    }
}

impl fmt::Debug for NormalizedSortDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedSortDescriptor")
            .field("column", &self.column)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .field("direction", &self.direction)
            .field("path", &self.path)
            .field("rule", &self.rule.as_ref().map(|_| "<rule>"))
            .finish()
    }
}

///
/// TESTS
///
