//! Named placeholders (`:name`) on top of MySQL's positional `?`
//!
//! SQL is written with `:make`, `:id`, ... and compiled once into the
//! positional form plus the order in which values must be bound. Text
//! inside quotes or backticks is left alone, as is `::`.

use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;

use super::DbError;

/// A value bound to a named placeholder. `None` binds SQL NULL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Int(Option<i64>),
    Text(Option<String>),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(Some(v))
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(v: Option<i64>) -> Self {
        Self::Int(v)
    }
}

impl From<Option<i8>> for SqlValue {
    fn from(v: Option<i8>) -> Self {
        Self::Int(v.map(i64::from))
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(Some(v.to_owned()))
    }
}

impl From<Option<&str>> for SqlValue {
    fn from(v: Option<&str>) -> Self {
        Self::Text(v.map(str::to_owned))
    }
}

/// SQL compiled from named to positional placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedQuery {
    sql: String,
    names: Vec<String>,
}

impl NamedQuery {
    pub fn compile(sql: &str) -> Self {
        let mut out = String::with_capacity(sql.len());
        let mut names = Vec::new();
        let mut quote: Option<char> = None;
        let mut chars = sql.chars().peekable();

        while let Some(c) = chars.next() {
            if let Some(q) = quote {
                out.push(c);
                if c == '\\' && q != '`' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == q {
                    quote = None;
                }
                continue;
            }

            match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    out.push(c);
                }
                ':' if chars.peek() == Some(&':') => {
                    out.push_str("::");
                    chars.next();
                }
                ':' if chars.peek().is_some_and(|n| n.is_ascii_alphabetic() || *n == '_') => {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n.is_ascii_alphanumeric() || n == '_' {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    names.push(name);
                    out.push('?');
                }
                _ => out.push(c),
            }
        }

        Self { sql: out, names }
    }

    /// Positional SQL handed to the driver.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Placeholder names in binding order (repeats included).
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Build a sqlx query with every placeholder bound from `params`.
    pub fn bind<'q>(
        &'q self,
        params: &[(&str, SqlValue)],
    ) -> Result<Query<'q, MySql, MySqlArguments>, DbError> {
        let mut query = sqlx::query(&self.sql);
        for name in &self.names {
            let value = params
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| DbError::MissingParam(name.clone()))?;

            query = match value {
                SqlValue::Int(v) => query.bind(v),
                SqlValue::Text(v) => query.bind(v),
            };
        }
        Ok(query)
    }
}
