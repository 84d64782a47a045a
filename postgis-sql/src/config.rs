//! Fragment construction settings.

/// How recognized WKT literals reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WktMode {
    /// Spliced into the SQL text as a quoted string literal.
    #[default]
    Inline,
    /// Bound as a text value like any other parameter.
    Bound,
}

/// Settings shared by every operation of a [`Postgis`](crate::Postgis) handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgisConfig {
    wkt_mode: WktMode,
    auto_alias: bool,
}

impl Default for PostgisConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PostgisConfig {
    /// Inline WKT literals and auto-aliasing of column-shaped results.
    pub fn new() -> Self {
        Self {
            wkt_mode: WktMode::Inline,
            auto_alias: true,
        }
    }

    pub fn wkt_mode(&self) -> WktMode {
        self.wkt_mode
    }

    pub fn set_wkt_mode(&mut self, mode: WktMode) {
        self.wkt_mode = mode;
    }

    /// Whether `as_text("geom")` style calls are aliased back to the column name.
    pub fn auto_alias(&self) -> bool {
        self.auto_alias
    }

    pub fn set_auto_alias(&mut self, enabled: bool) {
        self.auto_alias = enabled;
    }
}
