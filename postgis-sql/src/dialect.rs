//! Identifier quoting and placeholder rendering per target database.

/// Rules a target database imposes on compiled fragments.
pub trait SqlDialect: Send + Sync {
    /// Character used to open and close a quoted identifier.
    fn quote_char(&self) -> char;

    /// Placeholder text for the `index`-th bound value (1-based).
    fn placeholder(&self, index: usize) -> String;

    /// Quotes an identifier. Dotted names are quoted segment by segment,
    /// `*` stays bare, and embedded quote characters are doubled.
    fn quote_identifier(&self, identifier: &str) -> String {
        let quote = self.quote_char();
        identifier
            .split('.')
            .map(|segment| {
                if segment == "*" {
                    segment.to_string()
                } else {
                    let escaped = segment.replace(quote, &format!("{0}{0}", quote));
                    format!("{0}{1}{0}", quote, escaped)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// PostgreSQL: `"ident"` and numbered `$n` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn quote_char(&self) -> char {
        '"'
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }
}

/// Standard SQL quoting with positional `?` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDialect;

impl SqlDialect for AnsiDialect {
    fn quote_char(&self) -> char {
        '"'
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}

/// MySQL: backtick-quoted identifiers and `?` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl SqlDialect for MySqlDialect {
    fn quote_char(&self) -> char {
        '`'
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}
