//! # smelt-sql-core
//!
//! A dialect-aware SQL statement builder that turns a chain of query
//! intentions into a syntactically correct, parameterized SQL string plus
//! an ordered parameter list.
//!
//! Placeholders in the generated string always correspond 1:1,
//! left-to-right, with entries in the returned parameter list.
//!
//! Generated keywords are always uppercase (`LIMIT`, `HAVING`, ...),
//! whatever the dialect; only fragment structure and parameter order vary
//! per dialect, never spelling.
//!
//! ## Building a query
//!
//! ```rust
//! use smelt_sql_core::builder::QueryBuilder;
//! use smelt_sql_core::cond::Cond;
//! use smelt_sql_core::dialect::Dialect;
//! use smelt_sql_core::field::col;
//!
//! let (sql, params) = QueryBuilder::new(Dialect::MySql)
//!     .table("user")
//!     .select(col("id"))
//!     .filter(Cond::eq(col("status"), "active"))
//!     .limit(10)
//!     .offset(20)
//!     .build_select()
//!     .unwrap();
//!
//! assert_eq!(sql, "SELECT id FROM user WHERE status = ? LIMIT ?,?");
//! assert_eq!(params.len(), 3);
//! ```
//!
//! ## SQL injection prevention
//!
//! Values never appear inline; every value becomes a `?` placeholder and a
//! [`value::SqlValue`] entry bound at execution time:
//!
//! ```rust
//! use smelt_sql_core::builder::QueryBuilder;
//! use smelt_sql_core::cond::Cond;
//! use smelt_sql_core::dialect::Dialect;
//! use smelt_sql_core::field::col;
//!
//! let user_input = "'; DROP TABLE user; --";
//! let (sql, _params) = QueryBuilder::new(Dialect::Sqlite)
//!     .table("user")
//!     .filter(Cond::eq(col("name"), user_input))
//!     .build_select()
//!     .unwrap();
//!
//! assert_eq!(sql, "SELECT * FROM user WHERE name = ?");
//! ```

pub mod builder;
pub mod cond;
pub mod dialect;
pub mod error;
pub mod field;
pub mod link;
pub mod schema;
pub mod value;

pub use builder::{Aggregate, JoinType, OrderDir, QueryBuilder};
pub use cond::{CmpOp, Cond};
pub use dialect::Dialect;
pub use error::Error;
pub use field::{col, Field};
pub use link::{Link, LinkError, Row};
pub use schema::{FieldMeta, Record, Settable, SqlType};
pub use value::{SqlValue, ToSqlValue};
