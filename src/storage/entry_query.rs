//! User-scoped entry query configuration and statement rendering.

use chrono_tz::Tz;

use super::condition::ConditionAssembler;
use super::sorting::Sorting;
use super::sql::{resolve_timezone, Dialect, Operator, QueryArg, Statement};
use crate::model::{Direction, EntryStatus, SortOrder};

/// Extra `column operator value` predicate supplied by internal callers.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ExtraCondition {
    column: &'static str,
    operator: Operator,
    value: QueryArg,
}

/// Filters, ordering and paging of an entry listing for one user.
///
/// The user id and timezone are fixed at construction; every rendered
/// statement starts with the `e.user_id = $1` ownership clause. Zero ids,
/// zero limit/offset and `None` status mean "not configured".
#[derive(Debug, Clone, PartialEq)]
pub struct EntryQuery {
    user_id: i64,
    timezone: Tz,
    feed_id: i64,
    category_id: i64,
    entry_id: i64,
    gt_entry_id: i64,
    lt_entry_id: i64,
    status: Option<EntryStatus>,
    sorting: Sorting,
    conditions: Vec<ExtraCondition>,
}

impl EntryQuery {
    /// Create a query for `user_id`. Unknown timezone names resolve to UTC.
    pub fn new(user_id: i64, timezone: &str) -> Self {
        Self {
            user_id,
            timezone: resolve_timezone(timezone),
            feed_id: 0,
            category_id: 0,
            entry_id: 0,
            gt_entry_id: 0,
            lt_entry_id: 0,
            status: None,
            sorting: Sorting::default(),
            conditions: Vec::new(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Timezone dates are converted into.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Append `column operator value`. Columns must be compile-time literals;
    /// adding an identical condition twice has no effect.
    pub fn with_condition(
        mut self,
        column: &'static str,
        operator: Operator,
        value: impl Into<QueryArg>,
    ) -> Self {
        let condition = ExtraCondition {
            column,
            operator,
            value: value.into(),
        };
        if !self.conditions.contains(&condition) {
            self.conditions.push(condition);
        }
        self
    }

    pub fn with_entry_id(mut self, entry_id: i64) -> Self {
        self.entry_id = entry_id;
        self
    }

    pub fn with_entry_id_greater_than(mut self, entry_id: i64) -> Self {
        self.gt_entry_id = entry_id;
        self
    }

    pub fn with_entry_id_lower_than(mut self, entry_id: i64) -> Self {
        self.lt_entry_id = entry_id;
        self
    }

    pub fn with_feed_id(mut self, feed_id: i64) -> Self {
        self.feed_id = feed_id;
        self
    }

    pub fn with_category_id(mut self, category_id: i64) -> Self {
        self.category_id = category_id;
        self
    }

    /// `None` matches any status.
    pub fn with_status(mut self, status: impl Into<Option<EntryStatus>>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.sorting.order = Some(order);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.sorting.direction = Some(direction);
        self
    }

    /// 0 removes the limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.sorting.limit = limit;
        self
    }

    /// 0 removes the offset.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.sorting.offset = offset;
        self
    }

    /// Build the `WHERE` predicate and its arguments.
    ///
    /// Extension conditions come right after the ownership clause, then the
    /// structural filters in a fixed order.
    pub fn build_condition(&self) -> (String, Vec<QueryArg>) {
        let mut assembler = ConditionAssembler::new(self.user_id);

        for condition in &self.conditions {
            assembler.push(
                |p| format!("{} {} {}", condition.column, condition.operator, p),
                condition.value.clone(),
            );
        }

        assembler.push_id(|p| format!("f.category_id={p}"), self.category_id);
        assembler.push_id(|p| format!("e.feed_id={p}"), self.feed_id);
        assembler.push_id(|p| format!("e.id={p}"), self.entry_id);
        assembler.push_id(|p| format!("e.id > {p}"), self.gt_entry_id);
        assembler.push_id(|p| format!("e.id < {p}"), self.lt_entry_id);

        if let Some(status) = self.status {
            assembler.push(|p| format!("e.status={p}"), status);
        }

        assembler.finish()
    }

    /// Build the ORDER BY / LIMIT / OFFSET tail.
    pub fn build_sorting(&self, dialect: Dialect) -> String {
        self.sorting.render(dialect)
    }

    /// SELECT statement hydrated by the entry reader.
    pub fn select_statement(&self, dialect: Dialect) -> Statement {
        let (condition, args) = self.build_condition();
        let sql = format!(
            r#"
            SELECT
            e.id AS id, e.user_id, e.feed_id, e.hash, {published_at}, e.title, e.url, e.author, e.content, e.status,
            f.title as feed_title, f.feed_url, f.site_url, f.checked_at,
            f.category_id, c.title as category_title,
            fi.icon_id
            FROM entries e
            LEFT JOIN feeds f ON f.id=e.feed_id
            LEFT JOIN categories c ON c.id=f.category_id
            LEFT JOIN feed_icons fi ON fi.feed_id=f.id
            WHERE {condition} {sorting}
            "#,
            published_at = dialect.published_at_projection(self.timezone),
            sorting = self.build_sorting(dialect),
        );
        Statement::new(sql, args)
    }

    /// COUNT statement over the same predicate. Paging is ignored.
    pub fn count_statement(&self) -> Statement {
        let (condition, args) = self.build_condition();
        let sql = format!(
            "SELECT count(*) FROM entries e LEFT JOIN feeds f ON f.id=e.feed_id WHERE {condition}"
        );
        Statement::new(sql, args)
    }

    /// Copy of this query restricted to a single row.
    pub(crate) fn single(&self) -> Self {
        self.clone().with_limit(1)
    }

    /// Short description for timing logs.
    pub(crate) fn describe(&self) -> String {
        format!(
            "userID={}, feedID={}, categoryID={}, status={}, order={}, direction={}, offset={}, limit={}",
            self.user_id,
            self.feed_id,
            self.category_id,
            self.status.map(|s| s.as_str()).unwrap_or(""),
            self.sorting.order.map(|o| o.column()).unwrap_or(""),
            self.sorting.direction.map(|d| d.keyword()).unwrap_or(""),
            self.sorting.offset,
            self.sorting.limit,
        )
    }
}
