//! Condition trees for WHERE, HAVING and JOIN ... ON clauses.
//!
//! A [`Cond`] is either a predicate atom or a boolean group over child
//! conditions. Rendering walks the tree depth-first, left-to-right,
//! appending each atom's values to the running parameter list so that
//! placeholder order in the fragment matches parameter order exactly.
//! Groups render fully parenthesized; the author's nesting is preserved
//! as written, never flattened or reordered.

use std::fmt;

use crate::field::Field;
use crate::value::{SqlValue, ToSqlValue};

/// Comparison operators for predicate atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "!="),
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
        }
    }
}

/// One node of a predicate tree.
#[derive(Debug, Clone)]
pub enum Cond {
    /// Comparison against a bound value: `field op ?`.
    Compare {
        /// Column being compared.
        field: Field,
        /// Comparison operator.
        op: CmpOp,
        /// Bound right-hand value.
        value: SqlValue,
    },
    /// Comparison between two columns: `left op right` (no parameters).
    CompareField {
        /// Left-hand column.
        left: Field,
        /// Comparison operator.
        op: CmpOp,
        /// Right-hand column.
        right: Field,
    },
    /// IS NULL check.
    IsNull {
        /// Column being checked.
        field: Field,
    },
    /// IS NOT NULL check.
    IsNotNull {
        /// Column being checked.
        field: Field,
    },
    /// `[NOT] IN` over a value sequence, one placeholder per element.
    InList {
        /// Column being checked.
        field: Field,
        /// Candidate values.
        values: Vec<SqlValue>,
        /// Renders as NOT IN when set.
        negated: bool,
    },
    /// `[NOT] LIKE` pattern match.
    Like {
        /// Column being matched.
        field: Field,
        /// Pattern, bound as a parameter.
        pattern: String,
        /// Renders as NOT LIKE when set.
        negated: bool,
    },
    /// BETWEEN range check (`low <= field <= high`).
    Between {
        /// Column being checked.
        field: Field,
        /// Lower bound.
        low: SqlValue,
        /// Upper bound.
        high: SqlValue,
    },
    /// AND over child conditions, in construction order.
    All(Vec<Cond>),
    /// OR over child conditions, in construction order.
    Any(Vec<Cond>),
    /// NOT negation of a child condition.
    Not(Box<Cond>),
    /// Raw SQL fragment with its own parameters.
    ///
    /// **Warning**: the fragment is emitted verbatim; never splice user
    /// input into it.
    Raw {
        /// SQL fragment.
        sql: String,
        /// Parameters bound by the fragment's placeholders.
        params: Vec<SqlValue>,
    },
}

impl Cond {
    /// Creates an equality condition (field = value).
    pub fn eq<V: ToSqlValue>(field: impl Into<Field>, value: V) -> Self {
        Self::cmp(field, CmpOp::Eq, value)
    }

    /// Creates an inequality condition (field != value).
    pub fn ne<V: ToSqlValue>(field: impl Into<Field>, value: V) -> Self {
        Self::cmp(field, CmpOp::Ne, value)
    }

    /// Creates a greater-than condition (field > value).
    pub fn gt<V: ToSqlValue>(field: impl Into<Field>, value: V) -> Self {
        Self::cmp(field, CmpOp::Gt, value)
    }

    /// Creates a greater-than-or-equal condition (field >= value).
    pub fn gte<V: ToSqlValue>(field: impl Into<Field>, value: V) -> Self {
        Self::cmp(field, CmpOp::Gte, value)
    }

    /// Creates a less-than condition (field < value).
    pub fn lt<V: ToSqlValue>(field: impl Into<Field>, value: V) -> Self {
        Self::cmp(field, CmpOp::Lt, value)
    }

    /// Creates a less-than-or-equal condition (field <= value).
    pub fn lte<V: ToSqlValue>(field: impl Into<Field>, value: V) -> Self {
        Self::cmp(field, CmpOp::Lte, value)
    }

    /// Creates a comparison condition with an explicit operator.
    pub fn cmp<V: ToSqlValue>(field: impl Into<Field>, op: CmpOp, value: V) -> Self {
        Self::Compare {
            field: field.into(),
            op,
            value: value.to_sql_value(),
        }
    }

    /// Creates a column-to-column comparison (left op right).
    ///
    /// This is the atom used in JOIN conditions.
    pub fn col_cmp(left: impl Into<Field>, op: CmpOp, right: impl Into<Field>) -> Self {
        Self::CompareField {
            left: left.into(),
            op,
            right: right.into(),
        }
    }

    /// Creates a column equality comparison (left = right).
    pub fn col_eq(left: impl Into<Field>, right: impl Into<Field>) -> Self {
        Self::col_cmp(left, CmpOp::Eq, right)
    }

    /// Creates an IS NULL condition.
    pub fn is_null(field: impl Into<Field>) -> Self {
        Self::IsNull {
            field: field.into(),
        }
    }

    /// Creates an IS NOT NULL condition.
    pub fn is_not_null(field: impl Into<Field>) -> Self {
        Self::IsNotNull {
            field: field.into(),
        }
    }

    /// Creates an IN condition over a value sequence.
    pub fn in_list<V: ToSqlValue>(field: impl Into<Field>, values: Vec<V>) -> Self {
        Self::InList {
            field: field.into(),
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            negated: false,
        }
    }

    /// Creates a NOT IN condition over a value sequence.
    pub fn not_in_list<V: ToSqlValue>(field: impl Into<Field>, values: Vec<V>) -> Self {
        Self::InList {
            field: field.into(),
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            negated: true,
        }
    }

    /// Creates a LIKE condition.
    pub fn like(field: impl Into<Field>, pattern: &str) -> Self {
        Self::Like {
            field: field.into(),
            pattern: String::from(pattern),
            negated: false,
        }
    }

    /// Creates a NOT LIKE condition.
    pub fn not_like(field: impl Into<Field>, pattern: &str) -> Self {
        Self::Like {
            field: field.into(),
            pattern: String::from(pattern),
            negated: true,
        }
    }

    /// Creates a BETWEEN condition (low <= field <= high).
    pub fn between<V: ToSqlValue>(field: impl Into<Field>, low: V, high: V) -> Self {
        Self::Between {
            field: field.into(),
            low: low.to_sql_value(),
            high: high.to_sql_value(),
        }
    }

    /// Creates a raw SQL condition with its own parameters.
    pub fn raw(sql: &str, params: Vec<SqlValue>) -> Self {
        Self::Raw {
            sql: String::from(sql),
            params,
        }
    }

    /// Creates an AND group over child conditions.
    #[must_use]
    pub fn all(children: Vec<Cond>) -> Self {
        Self::All(children)
    }

    /// Creates an OR group over child conditions.
    #[must_use]
    pub fn any(children: Vec<Cond>) -> Self {
        Self::Any(children)
    }

    /// Combines this condition with another using AND.
    #[must_use]
    pub fn and(self, other: Cond) -> Cond {
        Cond::All(vec![self, other])
    }

    /// Combines this condition with another using OR.
    #[must_use]
    pub fn or(self, other: Cond) -> Cond {
        Cond::Any(vec![self, other])
    }

    /// Negates this condition with NOT.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Cond {
        Cond::Not(Box::new(self))
    }

    /// Renders this condition under an optional scope prefix, appending
    /// its parameters to `params` in placeholder order.
    ///
    /// Atoms render bare; groups render parenthesized, mirroring the
    /// tree's nesting exactly.
    pub fn render(&self, scope: Option<&str>, params: &mut Vec<SqlValue>) -> String {
        match self {
            Self::Compare { field, op, value } => {
                params.push(value.clone());
                format!("{} {op} ?", field.render(scope))
            }
            Self::CompareField { left, op, right } => {
                format!("{} {op} {}", left.render(scope), right.render(scope))
            }
            Self::IsNull { field } => format!("{} IS NULL", field.render(scope)),
            Self::IsNotNull { field } => format!("{} IS NOT NULL", field.render(scope)),
            Self::InList {
                field,
                values,
                negated,
            } => {
                let keyword = if *negated { "NOT IN" } else { "IN" };
                if values.is_empty() {
                    // An empty candidate set can never match (or always
                    // matches, negated); `IN ()` is not valid SQL.
                    return if *negated {
                        String::from("1 = 1")
                    } else {
                        String::from("1 = 0")
                    };
                }
                let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
                params.extend(values.iter().cloned());
                format!(
                    "{} {keyword} ({})",
                    field.render(scope),
                    placeholders.join(", ")
                )
            }
            Self::Like {
                field,
                pattern,
                negated,
            } => {
                let keyword = if *negated { "NOT LIKE" } else { "LIKE" };
                params.push(SqlValue::Text(pattern.clone()));
                format!("{} {keyword} ?", field.render(scope))
            }
            Self::Between { field, low, high } => {
                params.push(low.clone());
                params.push(high.clone());
                format!("{} BETWEEN ? AND ?", field.render(scope))
            }
            Self::All(children) => Self::render_group(children, " AND ", scope, params),
            Self::Any(children) => Self::render_group(children, " OR ", scope, params),
            Self::Not(inner) => format!("NOT ({})", inner.render(scope, params)),
            Self::Raw {
                sql,
                params: own_params,
            } => {
                params.extend(own_params.iter().cloned());
                sql.clone()
            }
        }
    }

    fn render_group(
        children: &[Cond],
        joiner: &str,
        scope: Option<&str>,
        params: &mut Vec<SqlValue>,
    ) -> String {
        let fragments: Vec<String> = children.iter().map(|c| c.render(scope, params)).collect();
        format!("({})", fragments.join(joiner))
    }
}

/// Renders a slice of top-level conditions joined with ` AND `.
///
/// Shared by the WHERE and HAVING assemblers; only the keyword and the
/// scope policy differ between the two call sites.
pub(crate) fn render_top_level(
    conds: &[Cond],
    scope: Option<&str>,
    params: &mut Vec<SqlValue>,
) -> String {
    let fragments: Vec<String> = conds.iter().map(|c| c.render(scope, params)).collect();
    fragments.join(" AND ")
}
