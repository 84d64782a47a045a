//! SQL fragments: placeholder text plus its ordered bindings.
//!
//! Fragment text uses `?` for a bound value and `??` for a bound identifier,
//! the convention of the query layer that consumes them. Identifiers are
//! resolved into quoted text only when a fragment is compiled for a
//! [`SqlDialect`].

use std::fmt::{self, Display};

use serde::Serialize;

use crate::dialect::SqlDialect;
use crate::value::{Binding, SqlValue};

/// Value placeholder.
pub const VALUE_PLACEHOLDER: &str = "?";
/// Identifier placeholder.
pub const IDENTIFIER_PLACEHOLDER: &str = "??";

#[derive(Debug, Clone, PartialEq)]
struct AliasClause {
    name: String,
    // Length of the SQL text before the alias clause was appended.
    offset: usize,
}

/// A SQL expression with positional placeholders and the values bound to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    sql: String,
    bindings: Vec<Binding>,
    alias: Option<AliasClause>,
}

impl Fragment {
    /// Builds a fragment from text that is trusted as-is and its bindings.
    ///
    /// The number of `?` and `??` placeholders in `sql` must match `bindings`.
    pub fn raw(sql: impl Into<String>, bindings: Vec<Binding>) -> Self {
        Self {
            sql: sql.into(),
            bindings,
            alias: None,
        }
    }

    /// The fragment text, including any alias clause.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_ref().map(|a| a.name.as_str())
    }

    /// Text and bindings without the alias clause, for nesting inside
    /// another expression.
    pub(crate) fn expression_parts(&self) -> (&str, &[Binding]) {
        match &self.alias {
            Some(alias) => (
                &self.sql[..alias.offset],
                &self.bindings[..self.bindings.len() - 1],
            ),
            None => (&self.sql, &self.bindings),
        }
    }

    /// Attaches `name` as the result alias, replacing any previous alias.
    pub fn with_alias(self, name: impl Into<String>) -> Self {
        let mut fragment = self.without_alias();
        let name = name.into();
        let offset = fragment.sql.len();
        fragment.sql.push_str(" as ");
        fragment.sql.push_str(IDENTIFIER_PLACEHOLDER);
        fragment.bindings.push(Binding::Identifier(name.clone()));
        fragment.alias = Some(AliasClause { name, offset });
        fragment
    }

    /// Drops the alias clause, if any.
    pub fn without_alias(mut self) -> Self {
        if let Some(alias) = self.alias.take() {
            self.sql.truncate(alias.offset);
            self.bindings.pop();
        }
        self
    }

    /// Resolves identifiers and renders value placeholders for `dialect`.
    pub fn compile<D: SqlDialect + ?Sized>(&self, dialect: &D) -> CompiledSql {
        let mut sql = String::with_capacity(self.sql.len() + 16);
        let mut values = Vec::new();
        let mut bindings = self.bindings.iter();
        let mut rest = self.sql.as_str();

        while let Some(pos) = rest.find('?') {
            sql.push_str(&rest[..pos]);
            let is_identifier = rest[pos..].starts_with(IDENTIFIER_PLACEHOLDER);
            rest = if is_identifier {
                &rest[pos + 2..]
            } else {
                &rest[pos + 1..]
            };

            match bindings.next() {
                Some(Binding::Identifier(name)) if is_identifier => {
                    sql.push_str(&dialect.quote_identifier(name));
                }
                Some(Binding::Value(value)) if !is_identifier => {
                    values.push(value.clone());
                    sql.push_str(&dialect.placeholder(values.len()));
                }
                Some(Binding::Identifier(name)) => {
                    // `?` holding an identifier: quote it rather than bind it.
                    sql.push_str(&dialect.quote_identifier(name));
                }
                Some(Binding::Value(value)) => {
                    log::warn!("value bound to identifier placeholder in `{}`", self.sql);
                    values.push(value.clone());
                    sql.push_str(&dialect.placeholder(values.len()));
                }
                None => {
                    log::warn!("placeholder without binding in `{}`", self.sql);
                    sql.push_str(if is_identifier {
                        IDENTIFIER_PLACEHOLDER
                    } else {
                        VALUE_PLACEHOLDER
                    });
                }
            }
        }
        sql.push_str(rest);

        CompiledSql {
            sql,
            bindings: values,
        }
    }
}

impl Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// A fragment rendered for one dialect: identifiers are quoted in the text
/// and only value bindings remain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSql {
    pub sql: String,
    pub bindings: Vec<SqlValue>,
}
