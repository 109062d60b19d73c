//! Column and table name resolution.
//!
//! A [`Field`] is a resolved reference to one column, optionally carrying
//! its own table qualifier. Clause renderers pass a *scope* prefix when a
//! qualified context (joins, HAVING) requires one; an explicit per-field
//! qualifier always wins, and an unqualified field in an unscoped clause
//! renders bare. No clause ever emits a dangling `.`.

/// Creates an unqualified column reference.
#[must_use]
pub fn col(name: &str) -> Field {
    Field {
        table: None,
        name: String::from(name),
    }
}

/// A reference to one column, optionally table-qualified.
#[derive(Debug, Clone)]
pub struct Field {
    /// Optional table qualifier.
    pub table: Option<String>,
    /// Column name as it appears in SQL.
    pub name: String,
}

impl Field {
    /// Creates a table-qualified column reference.
    #[must_use]
    pub fn qualified(table: &str, name: &str) -> Self {
        Self {
            table: Some(String::from(table)),
            name: String::from(name),
        }
    }

    /// Renders the reference under an optional scope prefix.
    ///
    /// Precedence: explicit qualifier on the field, then the scope, then
    /// the bare column name.
    #[must_use]
    pub fn render(&self, scope: Option<&str>) -> String {
        match (self.table.as_deref(), scope) {
            (Some(table), _) => format!("{table}.{}", self.name),
            (None, Some(scope)) => format!("{scope}.{}", self.name),
            (None, None) => self.name.clone(),
        }
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        col(name)
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field { table: None, name }
    }
}

/// Converts a CamelCase or PascalCase identifier to snake_case.
///
/// Used as the naming fallback wherever no explicit `name` metadata is
/// declared, for table names derived from type names as well as column
/// names derived from field identifiers.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
