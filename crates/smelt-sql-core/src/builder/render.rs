//! Clause assembly and statement finalization.
//!
//! Each assembler renders one clause fragment and appends its parameters
//! to the single running list, so placeholder order in the final string
//! always matches parameter order. Finalize walks the assemblers in the
//! canonical sequence: select, from, join, where, group, having, order,
//! limit, lock.

use crate::cond::render_top_level;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::schema::Record;
use crate::value::SqlValue;

use super::QueryBuilder;

impl QueryBuilder {
    /// Finalizes the builder into a SELECT statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTable`] when no table was configured.
    pub fn build_select(&self) -> Result<(String, Vec<SqlValue>)> {
        let table = self.table.clone().ok_or(Error::MissingTable)?;
        let mut params = Vec::new();

        let mut sql = String::from("SELECT ");
        sql.push_str(&self.select_fragment(&mut params)?);
        sql.push_str(" FROM ");
        sql.push_str(&table);

        let join_frag = self.join_fragment(&mut params);
        if !join_frag.is_empty() {
            sql.push(' ');
            sql.push_str(&join_frag);
        }

        if !self.where_conds.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&render_top_level(
                &self.where_conds,
                self.scope(),
                &mut params,
            ));
        }

        if !self.group_items.is_empty() {
            sql.push_str(" GROUP BY ");
            let fields: Vec<String> = self
                .group_items
                .iter()
                .map(|f| f.render(self.scope()))
                .collect();
            sql.push_str(&fields.join(","));
        }

        if !self.having_conds.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&render_top_level(
                &self.having_conds,
                Some(table.as_str()),
                &mut params,
            ));
        }

        if !self.order_items.is_empty() {
            sql.push_str(" ORDER BY ");
            let fields: Vec<String> = self
                .order_items
                .iter()
                .map(|o| format!("{} {}", o.field.render(self.scope()), o.dir.as_str()))
                .collect();
            sql.push_str(&fields.join(","));
        }

        let limit_frag = self.limit_fragment(&mut params);
        if !limit_frag.is_empty() {
            sql.push(' ');
            sql.push_str(limit_frag);
        }

        if self.lock_for_update {
            sql.push_str(" FOR UPDATE");
        }

        Ok((sql, params))
    }

    /// Finalizes an UPDATE statement from a record's set fields.
    ///
    /// Only fields explicitly set on the record appear in the SET list,
    /// in declaration order. The table name falls back to the record's
    /// resolved name when the builder has none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSetFields`] when the record has nothing to
    /// write.
    pub fn build_update(&self, record: &dyn Record) -> Result<(String, Vec<SqlValue>)> {
        let table = self
            .table
            .clone()
            .unwrap_or_else(|| record.table_name());
        let mut params = Vec::new();

        let assignments = set_assignments(record, &mut params);
        if assignments.is_empty() {
            return Err(Error::NoSetFields(table));
        }

        let mut sql = format!("UPDATE {table} SET ");
        sql.push_str(&assignments.join(","));

        if !self.where_conds.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&render_top_level(&self.where_conds, None, &mut params));
        }

        Ok((sql, params))
    }

    /// Finalizes an INSERT statement from a record's set fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSetFields`] when the record has nothing to
    /// write.
    pub fn build_insert(&self, record: &dyn Record) -> Result<(String, Vec<SqlValue>)> {
        let table = self
            .table
            .clone()
            .unwrap_or_else(|| record.table_name());
        let mut params = Vec::new();

        let mut columns = Vec::new();
        for meta in record.fields() {
            if !meta.is_set {
                continue;
            }
            columns.push(meta.column);
            params.push(meta.value.unwrap_or(SqlValue::Null));
        }
        if columns.is_empty() {
            return Err(Error::NoSetFields(table));
        }

        let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            columns.join(","),
            placeholders.join(",")
        );
        Ok((sql, params))
    }

    /// Finalizes a DELETE statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTable`] when no table was configured.
    pub fn build_delete(&self) -> Result<(String, Vec<SqlValue>)> {
        let table = self.table.clone().ok_or(Error::MissingTable)?;
        let mut params = Vec::new();

        let mut sql = format!("DELETE FROM {table}");
        if !self.where_conds.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&render_top_level(&self.where_conds, None, &mut params));
        }
        Ok((sql, params))
    }

    /// The automatic qualifier prefix: the main table once joins make the
    /// query multi-table, nothing otherwise.
    fn scope(&self) -> Option<&str> {
        if self.joins.is_empty() {
            None
        } else {
            self.table.as_deref()
        }
    }

    fn select_fragment(&self, params: &mut Vec<SqlValue>) -> Result<String> {
        let mut fragment = String::new();
        if self.distinct {
            fragment.push_str("DISTINCT ");
        }

        if self.select_items.is_empty() && self.select_subqueries.is_empty() {
            fragment.push('*');
            return Ok(fragment);
        }

        let mut parts = Vec::new();

        // Simple items first, in configuration order.
        for item in &self.select_items {
            let mut part = String::new();
            if let Some(func) = item.func {
                part.push_str(func.as_str());
                part.push('(');
            }
            part.push_str(&item.field.render(self.scope()));
            if item.func.is_some() {
                part.push(')');
            }
            if let Some(alias) = &item.alias {
                part.push_str(" AS ");
                part.push_str(&alias.name);
            }
            parts.push(part);
        }

        // Then subquery items, each finalized before concatenation so its
        // parameters land at the position its placeholders occupy.
        for sub in &self.select_subqueries {
            let (sub_sql, sub_params) = sub.builder.build_select()?;
            parts.push(format!("({sub_sql}) AS {}", sub.alias.name));
            params.extend(sub_params);
        }

        fragment.push_str(&parts.join(", "));
        Ok(fragment)
    }

    fn join_fragment(&self, params: &mut Vec<SqlValue>) -> String {
        let mut parts = Vec::new();
        for join in &self.joins {
            let join_scope = join.alias.as_deref().unwrap_or(join.table.as_str());
            let on = join.on.render(Some(join_scope), params);
            let mut part = format!("{} {}", join.join_type.as_str(), join.table);
            if let Some(alias) = &join.alias {
                part.push(' ');
                part.push_str(alias);
            }
            part.push_str(" ON ");
            part.push_str(&on);
            parts.push(part);
        }
        parts.join(" ")
    }

    /// Pagination is the clearest dialect divergence point; every dialect
    /// declares its row here explicitly.
    fn limit_fragment(&self, params: &mut Vec<SqlValue>) -> &'static str {
        if self.page_size == 0 {
            return "";
        }
        let page_size = SqlValue::Int(i64::try_from(self.page_size).unwrap_or(i64::MAX));
        let offset = SqlValue::Int(i64::try_from(self.page_offset).unwrap_or(i64::MAX));
        match self.dialect {
            Dialect::Postgres => {
                params.push(page_size);
                params.push(offset);
                "LIMIT ? OFFSET ?"
            }
            Dialect::Mssql => {
                params.push(offset);
                params.push(page_size);
                "OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
            }
            Dialect::MySql | Dialect::Sqlite => {
                params.push(offset);
                params.push(page_size);
                "LIMIT ?,?"
            }
        }
    }
}

/// Renders `col = ?` assignments for every explicitly set field, in
/// declaration order, appending each value to `params`.
fn set_assignments(record: &dyn Record, params: &mut Vec<SqlValue>) -> Vec<String> {
    let mut assignments = Vec::new();
    for meta in record.fields() {
        if !meta.is_set {
            continue;
        }
        assignments.push(format!("{} = ?", meta.column));
        params.push(meta.value.unwrap_or(SqlValue::Null));
    }
    assignments
}
