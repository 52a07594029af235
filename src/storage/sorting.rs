//! ORDER BY / LIMIT / OFFSET tail of entry listings.

use super::sql::Dialect;
use crate::model::{Direction, SortOrder};

/// Validated sorting and paging options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Sorting {
    pub(crate) order: Option<SortOrder>,
    pub(crate) direction: Option<Direction>,
    /// 0 means no limit.
    pub(crate) limit: u32,
    /// 0 means no offset.
    pub(crate) offset: u32,
}

impl Sorting {
    /// Render the tail. A direction is only meaningful after an `ORDER BY`
    /// and is dropped otherwise.
    pub(crate) fn render(&self, dialect: Dialect) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(4);

        if let Some(order) = self.order {
            parts.push(format!(r#"ORDER BY "{}""#, order.column()));
            if let Some(direction) = self.direction {
                parts.push(direction.keyword().to_string());
            }
        }

        if self.limit != 0 {
            parts.push(format!("LIMIT {}", self.limit));
        } else if self.offset != 0 && dialect == Dialect::Sqlite {
            // SQLite only accepts OFFSET after a LIMIT clause.
            parts.push("LIMIT -1".to_string());
        }

        if self.offset != 0 {
            parts.push(format!("OFFSET {}", self.offset));
        }

        parts.join(" ")
    }
}
