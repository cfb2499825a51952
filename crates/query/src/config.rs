use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// If true, reading a top-level variable that does not exist is an
    /// `UnknownVariable` error instead of an undefined value.
    ///
    /// Defaults to `false`.
    pub strict: bool,

    /// If true, an error raised while evaluating a `where` predicate against one
    /// candidate only excludes that candidate. Heterogeneous sibling data makes
    /// such errors routine, so disabling this is mostly a debugging aid.
    ///
    /// Defaults to `true`.
    pub where_errors_as_false: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            strict: false,
            where_errors_as_false: true,
        }
    }
}
