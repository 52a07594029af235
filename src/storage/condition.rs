//! Predicate assembly with positional parameters.

use super::sql::QueryArg;

/// Accumulates `AND`-ed predicate fragments and their arguments.
///
/// The ownership clause `e.user_id = $1` is always the first fragment. Every
/// later fragment gets its placeholder number (`args.len() + 1`) before its
/// value is pushed, so `$N` always binds `args[N - 1]`.
#[derive(Debug, Clone)]
pub(crate) struct ConditionAssembler {
    conditions: Vec<String>,
    args: Vec<QueryArg>,
}

impl ConditionAssembler {
    /// Start a predicate owned by `user_id`.
    pub(crate) fn new(user_id: i64) -> Self {
        Self {
            conditions: vec!["e.user_id = $1".to_string()],
            args: vec![QueryArg::Int(user_id)],
        }
    }

    /// Append a fragment. `render` receives the placeholder (`$N`) for `value`.
    pub(crate) fn push<F>(&mut self, render: F, value: impl Into<QueryArg>)
    where
        F: FnOnce(&str) -> String,
    {
        let placeholder = format!("${}", self.args.len() + 1);
        self.conditions.push(render(&placeholder));
        self.args.push(value.into());
    }

    /// Append a fragment only when `value` is non-zero.
    pub(crate) fn push_id<F>(&mut self, render: F, value: i64)
    where
        F: FnOnce(&str) -> String,
    {
        if value != 0 {
            self.push(render, value);
        }
    }

    /// Consume the assembler, returning the conjunction and aligned arguments.
    pub(crate) fn finish(self) -> (String, Vec<QueryArg>) {
        (self.conditions.join(" AND "), self.args)
    }
}
