use serde::Deserialize;

use msstudy_infra::repository::Sort;

/// Query string of `GET /api/demos`.
#[derive(Debug, Default, Deserialize)]
pub struct ListDemosQuery {
    /// `"<property>[,asc|desc]"`, e.g. `id,desc`.
    pub sort: Option<String>,
}

impl ListDemosQuery {
    pub fn parsed_sort(&self) -> Option<Result<Sort, msstudy_core::DomainError>> {
        self.sort.as_deref().map(str::parse)
    }
}
