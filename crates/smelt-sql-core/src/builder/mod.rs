//! Chained query builder.
//!
//! A [`QueryBuilder`] accumulates clause state through chained calls and
//! finalizes into `(sql, params)` once. Finalize methods take `&self` and
//! never mutate, so repeated finalization is deterministic. A builder is a
//! single-owner value; it is not meant to be shared across threads.
//!
//! # Example
//!
//! ```rust
//! use smelt_sql_core::builder::QueryBuilder;
//! use smelt_sql_core::cond::Cond;
//! use smelt_sql_core::dialect::Dialect;
//! use smelt_sql_core::field::col;
//!
//! let (sql, params) = QueryBuilder::new(Dialect::Postgres)
//!     .table("article")
//!     .select(col("id"))
//!     .select_count(col("id"), col("total"))
//!     .filter(Cond::gt(col("score"), 10))
//!     .build_select()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT id, COUNT(id) AS total FROM article WHERE score > ?"
//! );
//! assert_eq!(params.len(), 1);
//! ```

mod render;

use crate::cond::Cond;
use crate::dialect::Dialect;
use crate::field::Field;
use crate::link::Link;
use crate::schema::Record;

/// Aggregate functions usable in the select list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// COUNT(field)
    Count,
    /// SUM(field)
    Sum,
    /// MIN(field)
    Min,
    /// MAX(field)
    Max,
    /// AVG(field)
    Avg,
}

impl Aggregate {
    /// Returns the SQL function name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Avg => "AVG",
        }
    }
}

/// One projected column, optionally aggregated and aliased.
#[derive(Debug, Clone)]
pub(crate) struct SelectItem {
    pub(crate) func: Option<Aggregate>,
    pub(crate) field: Field,
    pub(crate) alias: Option<Field>,
}

/// A scalar subquery projected as a column.
#[derive(Debug, Clone)]
pub(crate) struct SelectSubquery {
    pub(crate) builder: QueryBuilder,
    pub(crate) alias: Field,
}

/// Join variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN
    Inner,
    /// LEFT JOIN
    Left,
    /// RIGHT JOIN
    Right,
    /// CROSS JOIN
    Cross,
    /// FULL JOIN
    Full,
}

impl JoinType {
    /// Returns the SQL join keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Cross => "CROSS JOIN",
            Self::Full => "FULL JOIN",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct JoinItem {
    pub(crate) join_type: JoinType,
    pub(crate) table: String,
    pub(crate) alias: Option<String>,
    pub(crate) on: Cond,
}

/// Sort direction. The renderer never assumes a default; callers choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDir {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl OrderDir {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OrderItem {
    pub(crate) field: Field,
    pub(crate) dir: OrderDir,
}

/// A dialect-aware SQL statement builder.
///
/// Created fresh per logical query, configured through chained calls, and
/// finalized into a statement string plus an ordered parameter list.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    pub(crate) dialect: Dialect,
    pub(crate) table: Option<String>,
    pub(crate) select_items: Vec<SelectItem>,
    pub(crate) select_subqueries: Vec<SelectSubquery>,
    pub(crate) where_conds: Vec<Cond>,
    pub(crate) joins: Vec<JoinItem>,
    pub(crate) group_items: Vec<Field>,
    pub(crate) having_conds: Vec<Cond>,
    pub(crate) order_items: Vec<OrderItem>,
    pub(crate) page_size: u64,
    pub(crate) page_offset: u64,
    pub(crate) distinct: bool,
    pub(crate) lock_for_update: bool,
}

impl QueryBuilder {
    /// Creates a builder targeting the given dialect.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            table: None,
            select_items: Vec::new(),
            select_subqueries: Vec::new(),
            where_conds: Vec::new(),
            joins: Vec::new(),
            group_items: Vec::new(),
            having_conds: Vec::new(),
            order_items: Vec::new(),
            page_size: 0,
            page_offset: 0,
            distinct: false,
            lock_for_update: false,
        }
    }

    /// Creates a builder targeting the dialect a link speaks.
    #[must_use]
    pub fn for_link<L: Link + ?Sized>(link: &L) -> Self {
        Self::new(link.driver_name())
    }

    /// Returns the builder's dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Sets the table to query.
    #[must_use]
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(name.into());
        self
    }

    /// Sets the table from a record type's resolved name.
    #[must_use]
    pub fn table_of(mut self, record: &dyn Record) -> Self {
        self.table = Some(record.table_name());
        self
    }

    /// Adds a plain column to the select list.
    #[must_use]
    pub fn select(mut self, field: impl Into<Field>) -> Self {
        self.select_items.push(SelectItem {
            func: None,
            field: field.into(),
            alias: None,
        });
        self
    }

    /// Adds an aliased column to the select list.
    #[must_use]
    pub fn select_as(mut self, field: impl Into<Field>, alias: impl Into<Field>) -> Self {
        self.select_items.push(SelectItem {
            func: None,
            field: field.into(),
            alias: Some(alias.into()),
        });
        self
    }

    /// Adds an aggregated, aliased column to the select list.
    #[must_use]
    pub fn select_fn(
        mut self,
        func: Aggregate,
        field: impl Into<Field>,
        alias: impl Into<Field>,
    ) -> Self {
        self.select_items.push(SelectItem {
            func: Some(func),
            field: field.into(),
            alias: Some(alias.into()),
        });
        self
    }

    /// Adds `COUNT(field) AS alias` to the select list.
    #[must_use]
    pub fn select_count(self, field: impl Into<Field>, alias: impl Into<Field>) -> Self {
        self.select_fn(Aggregate::Count, field, alias)
    }

    /// Adds `SUM(field) AS alias` to the select list.
    #[must_use]
    pub fn select_sum(self, field: impl Into<Field>, alias: impl Into<Field>) -> Self {
        self.select_fn(Aggregate::Sum, field, alias)
    }

    /// Adds `MIN(field) AS alias` to the select list.
    #[must_use]
    pub fn select_min(self, field: impl Into<Field>, alias: impl Into<Field>) -> Self {
        self.select_fn(Aggregate::Min, field, alias)
    }

    /// Adds `MAX(field) AS alias` to the select list.
    #[must_use]
    pub fn select_max(self, field: impl Into<Field>, alias: impl Into<Field>) -> Self {
        self.select_fn(Aggregate::Max, field, alias)
    }

    /// Adds `AVG(field) AS alias` to the select list.
    #[must_use]
    pub fn select_avg(self, field: impl Into<Field>, alias: impl Into<Field>) -> Self {
        self.select_fn(Aggregate::Avg, field, alias)
    }

    /// Adds a scalar subquery projected as `(sub_sql) AS alias`.
    ///
    /// The sub-builder is owned by this builder, forced onto its dialect,
    /// and finalized during the parent's finalize. Its parameters are
    /// spliced into the parent list at the point of appearance. Subquery
    /// columns always render after all simple select items, each group in
    /// configuration order.
    #[must_use]
    pub fn select_sub(mut self, mut sub: QueryBuilder, alias: impl Into<Field>) -> Self {
        sub.dialect = self.dialect;
        self.select_subqueries.push(SelectSubquery {
            builder: sub,
            alias: alias.into(),
        });
        self
    }

    /// Emits DISTINCT before the select list.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds a top-level WHERE condition. Multiple calls combine with AND.
    #[must_use]
    pub fn filter(mut self, cond: Cond) -> Self {
        self.where_conds.push(cond);
        self
    }

    /// Adds a join. The ON condition renders scoped to the join's alias
    /// (or table name when no alias is given).
    #[must_use]
    pub fn join(
        mut self,
        join_type: JoinType,
        table: impl Into<String>,
        alias: Option<&str>,
        on: Cond,
    ) -> Self {
        self.joins.push(JoinItem {
            join_type,
            table: table.into(),
            alias: alias.map(String::from),
            on,
        });
        self
    }

    /// Adds an INNER JOIN.
    #[must_use]
    pub fn inner_join(self, table: impl Into<String>, alias: Option<&str>, on: Cond) -> Self {
        self.join(JoinType::Inner, table, alias, on)
    }

    /// Adds a LEFT JOIN.
    #[must_use]
    pub fn left_join(self, table: impl Into<String>, alias: Option<&str>, on: Cond) -> Self {
        self.join(JoinType::Left, table, alias, on)
    }

    /// Adds a RIGHT JOIN.
    #[must_use]
    pub fn right_join(self, table: impl Into<String>, alias: Option<&str>, on: Cond) -> Self {
        self.join(JoinType::Right, table, alias, on)
    }

    /// Adds a GROUP BY field.
    #[must_use]
    pub fn group_by(mut self, field: impl Into<Field>) -> Self {
        self.group_items.push(field.into());
        self
    }

    /// Adds a top-level HAVING condition. Multiple calls combine with AND.
    #[must_use]
    pub fn having(mut self, cond: Cond) -> Self {
        self.having_conds.push(cond);
        self
    }

    /// Adds an ORDER BY field with an explicit direction.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<Field>, dir: OrderDir) -> Self {
        self.order_items.push(OrderItem {
            field: field.into(),
            dir,
        });
        self
    }

    /// Adds an ascending ORDER BY field.
    #[must_use]
    pub fn order_asc(self, field: impl Into<Field>) -> Self {
        self.order_by(field, OrderDir::Asc)
    }

    /// Adds a descending ORDER BY field.
    #[must_use]
    pub fn order_desc(self, field: impl Into<Field>) -> Self {
        self.order_by(field, OrderDir::Desc)
    }

    /// Sets the page size. A page size of zero (the default) suppresses
    /// the pagination clause entirely.
    #[must_use]
    pub fn limit(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the pagination offset. Only emitted together with a non-zero
    /// page size.
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.page_offset = offset;
        self
    }

    /// Requests a row lock (`FOR UPDATE`) on the selected rows.
    #[must_use]
    pub fn lock_for_update(mut self) -> Self {
        self.lock_for_update = true;
        self
    }
}
