//! Parser configuration.

/// Options controlling a parse.
///
/// ```
/// use pickbasic::ParseOptions;
///
/// let options = ParseOptions::default().max_diagnostics(10).keep_comments(false);
/// assert_eq!(options.max_diagnostics, 10);
/// assert!(!options.keep_comments);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Diagnostics reported before the rest are dropped.
    pub max_diagnostics: usize,
    /// Emit statement-position comments as `Item::Comment` nodes.
    pub keep_comments: bool,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DIAGNOSTICS: usize = 100;

    pub fn max_diagnostics(mut self, limit: usize) -> Self {
        self.max_diagnostics = limit;
        self
    }

    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_diagnostics: Self::DEFAULT_MAX_DIAGNOSTICS,
            keep_comments: true,
        }
    }
}
