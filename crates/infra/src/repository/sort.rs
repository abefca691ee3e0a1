//! Caller-specified ordering for `find_all`.
//!
//! Parsed from the `sort` query parameter (`"id,desc"`, `"demofield"`), and
//! applied either in memory or as a whitelisted `ORDER BY` clause.

use core::cmp::Ordering;
use core::str::FromStr;

use msstudy_core::{Demo, DomainError};

/// Column a caller may sort on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortProperty {
    Id,
    Demofield,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Sort {
    pub property: SortProperty,
    pub direction: Direction,
}

impl Sort {
    pub fn new(property: SortProperty, direction: Direction) -> Self {
        Self { property, direction }
    }

    /// Compare two rows. `demofield` ties fall back to ascending id; `null`
    /// sorts before any string when ascending.
    pub fn compare(&self, a: &Demo, b: &Demo) -> Ordering {
        let primary = match self.property {
            SortProperty::Id => a.id().cmp(&b.id()),
            SortProperty::Demofield => a.demofield().cmp(&b.demofield()),
        };
        let primary = match self.direction {
            Direction::Asc => primary,
            Direction::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    }

    /// `ORDER BY` body for the `demo` table. Never built from raw input.
    pub fn order_by_clause(&self) -> &'static str {
        match (self.property, self.direction) {
            (SortProperty::Id, Direction::Asc) => "id ASC",
            (SortProperty::Id, Direction::Desc) => "id DESC",
            (SortProperty::Demofield, Direction::Asc) => "demofield ASC NULLS FIRST, id ASC",
            (SortProperty::Demofield, Direction::Desc) => "demofield DESC NULLS LAST, id ASC",
        }
    }
}

/// Store-default order: ascending id.
pub fn sort_rows(rows: &mut [Demo], sort: Option<Sort>) {
    let sort = sort.unwrap_or(Sort::new(SortProperty::Id, Direction::Asc));
    rows.sort_by(|a, b| sort.compare(a, b));
}

impl FromStr for Sort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);

        let property = match parts.next().unwrap_or_default().to_lowercase().as_str() {
            "id" => SortProperty::Id,
            "demofield" => SortProperty::Demofield,
            other => {
                return Err(DomainError::validation(format!("unknown sort property '{other}'")));
            }
        };

        let direction = match parts.next().map(str::to_lowercase).as_deref() {
            None | Some("asc") => Direction::Asc,
            Some("desc") => Direction::Desc,
            Some(other) => {
                return Err(DomainError::validation(format!("unknown sort direction '{other}'")));
            }
        };

        if parts.next().is_some() {
            return Err(DomainError::validation(format!("malformed sort '{s}'")));
        }

        Ok(Self { property, direction })
    }
}
