//! Assembly of classified arguments into fragments.

use crate::classifier::{self, Argument};
use crate::config::{PostgisConfig, WktMode};
use crate::errors::PostgisResult;
use crate::fragment::{Fragment, IDENTIFIER_PLACEHOLDER, VALUE_PLACEHOLDER};
use crate::value::{Binding, SqlValue, Value};

/// Classification and assembly primitives, bound to one configuration.
///
/// Custom operations receive a `FragmentBuilder` so they classify and emit
/// arguments exactly like the built-in ones.
#[derive(Debug, Clone, Default)]
pub struct FragmentBuilder {
    config: PostgisConfig,
}

impl FragmentBuilder {
    pub fn new(config: PostgisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PostgisConfig {
        &self.config
    }

    pub fn classify(&self, value: &Value) -> PostgisResult<Argument> {
        classifier::classify(value)
    }

    pub fn classify_number(&self, value: &Value) -> PostgisResult<Argument> {
        classifier::classify_number(value)
    }

    pub fn classify_boolean(&self, value: &Value) -> PostgisResult<Argument> {
        classifier::classify_boolean(value)
    }

    pub fn classify_geojson(&self, value: &Value) -> PostgisResult<Argument> {
        classifier::classify_geojson(value)
    }

    /// Emits `function_name(arg, ...)`.
    ///
    /// Trailing absent arguments are dropped. An absent argument followed by
    /// a present one is emitted as `NULL`.
    pub fn build_call(&self, function_name: &str, args: Vec<Argument>) -> Fragment {
        let mut args = args;
        while args.last().is_some_and(Argument::is_absent) {
            args.pop();
        }

        let mut bindings = Vec::new();
        let rendered: Vec<String> = args
            .iter()
            .map(|arg| self.emit(arg, &mut bindings))
            .collect();
        let sql = format!("{}({})", function_name, rendered.join(", "));
        Fragment::raw(sql, bindings)
    }

    /// Emits `left <operator> right`. Nested compound expressions are
    /// parenthesized.
    pub fn build_operator(&self, operator: &str, left: Argument, right: Argument) -> Fragment {
        let mut bindings = Vec::new();
        let left = self.emit_operand(&left, &mut bindings);
        let right = self.emit_operand(&right, &mut bindings);
        Fragment::raw(format!("{} {} {}", left, operator, right), bindings)
    }

    /// Emits `arg::type_name`. A nested compound expression is parenthesized.
    pub fn build_cast(&self, arg: Argument, type_name: &str) -> Fragment {
        let mut bindings = Vec::new();
        let expression = self.emit_operand(&arg, &mut bindings);
        Fragment::raw(format!("{}::{}", expression, type_name), bindings)
    }

    /// Attaches `alias` to `fragment`, replacing any earlier alias.
    pub fn with_alias(&self, fragment: Fragment, alias: &str) -> Fragment {
        fragment.with_alias(alias)
    }

    /// Aliases `fragment` with the column name when `source` is a bare
    /// column reference and auto-aliasing is enabled.
    pub fn auto_alias(&self, fragment: Fragment, source: &Argument) -> Fragment {
        match source.column_name() {
            Some(column) if self.config.auto_alias() => fragment.with_alias(column),
            _ => fragment,
        }
    }

    fn emit_operand(&self, arg: &Argument, bindings: &mut Vec<Binding>) -> String {
        let sql = self.emit(arg, bindings);
        match arg {
            Argument::RawExpression(_) if !is_single_term(&sql) => format!("({})", sql),
            _ => sql,
        }
    }

    fn emit(&self, arg: &Argument, bindings: &mut Vec<Binding>) -> String {
        match arg {
            Argument::RawExpression(fragment) => {
                let (sql, nested) = fragment.expression_parts();
                bindings.extend_from_slice(nested);
                sql.to_string()
            }
            Argument::Literal(literal) => match self.config.wkt_mode() {
                WktMode::Inline => literal.to_sql_literal(),
                WktMode::Bound => {
                    bindings.push(Binding::Value(SqlValue::Text(literal.to_string())));
                    VALUE_PLACEHOLDER.to_string()
                }
            },
            Argument::ColumnRef(name) => {
                bindings.push(Binding::Identifier(name.clone()));
                IDENTIFIER_PLACEHOLDER.to_string()
            }
            Argument::Number(value) => {
                bindings.push(Binding::Value(value.clone()));
                VALUE_PLACEHOLDER.to_string()
            }
            Argument::Boolean(b) => {
                bindings.push(Binding::Value(SqlValue::Bool(*b)));
                VALUE_PLACEHOLDER.to_string()
            }
            Argument::GeoJson(text) => {
                bindings.push(Binding::Value(SqlValue::Text(text.clone())));
                VALUE_PLACEHOLDER.to_string()
            }
            Argument::Absent => "NULL".to_string(),
        }
    }
}

// A placeholder, a quoted literal, a function call or a parenthesized group,
// optionally followed by `::type` casts.
fn is_single_term(sql: &str) -> bool {
    let mut term = sql.trim();
    while let Some(pos) = term.rfind("::") {
        let type_name = &term[pos + 2..];
        if type_name.is_empty()
            || !type_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            break;
        }
        term = term[..pos].trim_end();
    }

    if term == VALUE_PLACEHOLDER || term == IDENTIFIER_PLACEHOLDER {
        return true;
    }
    if term.len() >= 2 && term.starts_with('\'') && term.ends_with('\'') {
        return !term[1..term.len() - 1].replace("''", "").contains('\'');
    }

    let name_len = term
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(term.len());
    term[name_len..].starts_with('(') && closing_paren(term, name_len) == Some(term.len() - 1)
}

// Byte index of the parenthesis closing the one at `open`, skipping quoted text.
fn closing_paren(sql: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in sql.char_indices().skip_while(|(i, _)| *i < open) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
    }
    None
}
