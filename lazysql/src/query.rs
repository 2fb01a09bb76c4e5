///
/// # Select descriptors
///
/// `SelectQuery` is the immutable description of what a cursor will run:
/// the distinct flag, the result expressions, the source tables, and a few
/// optional trailing clauses. Rendering to SQL is a pure function; nothing
/// here touches a connection.
///
/// Expressions and table names are opaque SQL fragments and are emitted
/// as given, without quoting.
///
/// ## Example
///
/// ```rust
/// use lazysql::SelectQuery;
///
/// let query = SelectQuery::new(true, vec!["name".into()], vec!["users".into()])
///     .with_filter("age > 21")
///     .order_by(["name"])
///     .limit(10);
/// assert_eq!(
///     query.to_sql(),
///     "SELECT DISTINCT name FROM users WHERE age > 21 ORDER BY name LIMIT 10"
/// );
/// ```
///

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    distinct: bool,
    columns: Vec<String>,
    tables: Vec<String>,
    filter: Option<String>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQuery {
    pub fn new(distinct: bool, columns: Vec<String>, tables: Vec<String>) -> Self {
        Self {
            distinct,
            columns,
            tables,
            filter: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn order_by<I, S>(mut self, exprs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by.extend(exprs.into_iter().map(Into::into));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Only rendered when a limit is also set.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn to_sql(&self) -> String {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.columns.join(", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(&self.tables.join(", "));

        if let Some(ref filter) = self.filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
            if let Some(offset) = self.offset {
                sql.push_str(&format!(" OFFSET {}", offset));
            }
        }
        sql
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
