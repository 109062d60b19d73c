//! Record contracts for schema reflection and partial updates.
//!
//! A [`Record`] exposes its table name and the declared shape of its
//! fields. The builder's SET/INSERT assemblers and the migrator both walk
//! [`FieldMeta`] lists; only the former looks at per-field values.

use crate::value::{SqlValue, ToSqlValue};

/// Declared SQL type of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlType {
    /// BOOLEAN.
    Boolean,
    /// 16-bit integer.
    SmallInt,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInt,
    /// 32-bit float.
    Real,
    /// 64-bit float.
    Double,
    /// Fixed-point decimal with precision and scale.
    Decimal(u8, u8),
    /// Bounded variable-length text.
    Varchar(u32),
    /// Unbounded text.
    Text,
    /// Binary blob.
    Blob,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
    /// Verbatim dialect-specific type name.
    Custom(String),
}

/// Declared shape and current state of one record field.
#[derive(Debug, Clone)]
pub struct FieldMeta {
    /// Column name as it appears in SQL.
    pub column: String,
    /// Declared SQL type.
    pub sql_type: SqlType,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Whether this column is the primary key.
    pub primary_key: bool,
    /// Whether the primary key auto-increments.
    pub auto_increment: bool,
    /// Raw SQL default expression, if any.
    pub default_expr: Option<String>,
    /// Current value, when the record instance carries one.
    pub value: Option<SqlValue>,
    /// Whether the field was explicitly set on this instance.
    pub is_set: bool,
}

impl FieldMeta {
    /// Creates field metadata with default flags (NOT NULL, no key).
    #[must_use]
    pub fn new(column: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            column: column.into(),
            sql_type,
            nullable: false,
            primary_key: false,
            auto_increment: false,
            default_expr: None,
            value: None,
            is_set: false,
        }
    }

    /// Marks the column as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the primary key as auto-incrementing.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets a raw SQL default expression.
    #[must_use]
    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.default_expr = Some(expr.into());
        self
    }

    /// Attaches the instance's current value, marking the field as set.
    #[must_use]
    pub fn with_value(mut self, value: Option<SqlValue>) -> Self {
        self.value = value;
        self.is_set = true;
        self
    }
}

/// A structural record type that maps to one table.
///
/// Object-safe so heterogeneous record sets can be migrated in one batch.
/// Usually implemented via `#[derive(Record)]`; hand-written impls only
/// need these two methods.
pub trait Record {
    /// Returns the SQL table name for this record type.
    fn table_name(&self) -> String;

    /// Returns per-field metadata in struct declaration order.
    fn fields(&self) -> Vec<FieldMeta>;
}

/// A per-column wrapper distinguishing "never touched" from "set".
///
/// Fields that were never set are excluded from SET and INSERT lists,
/// which is what makes partial updates possible: an unset field is not
/// the same as a field set to its zero value. Setting `Option::None`
/// through a `Settable<Option<T>>` writes an explicit NULL.
#[derive(Debug, Clone, Default)]
pub struct Settable<T> {
    value: Option<T>,
}

impl<T> Settable<T> {
    /// Creates a set wrapper holding `value`.
    #[must_use]
    pub fn set(value: T) -> Self {
        Self { value: Some(value) }
    }

    /// Creates an unset wrapper.
    #[must_use]
    pub const fn unset() -> Self {
        Self { value: None }
    }

    /// Assigns a value in place, marking the field as set.
    pub fn assign(&mut self, value: T) {
        self.value = Some(value);
    }

    /// Returns the value, if set.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns whether the field was explicitly set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Takes the value out, leaving the field unset.
    #[must_use]
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }
}

impl<T: ToSqlValue + Clone> Settable<T> {
    /// Returns the current value as a [`SqlValue`], if set.
    #[must_use]
    pub fn sql_value(&self) -> Option<SqlValue> {
        self.value.clone().map(ToSqlValue::to_sql_value)
    }
}

impl<T> From<T> for Settable<T> {
    fn from(value: T) -> Self {
        Self::set(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settable_default_is_unset() {
        let s: Settable<i64> = Settable::default();
        assert!(!s.is_set());
        assert_eq!(s.sql_value(), None);
    }

    #[test]
    fn test_settable_set_and_take() {
        let mut s = Settable::set(5_i64);
        assert!(s.is_set());
        assert_eq!(s.sql_value(), Some(SqlValue::Int(5)));
        assert_eq!(s.take(), Some(5));
        assert!(!s.is_set());
    }

    #[test]
    fn test_settable_explicit_null() {
        let s: Settable<Option<String>> = Settable::set(None);
        assert!(s.is_set());
        assert_eq!(s.sql_value(), Some(SqlValue::Null));
    }

    #[test]
    fn test_field_meta_builder() {
        let meta = FieldMeta::new("id", SqlType::BigInt)
            .primary_key()
            .auto_increment();
        assert!(meta.primary_key);
        assert!(meta.auto_increment);
        assert!(!meta.nullable);
        assert!(!meta.is_set);
    }
}
