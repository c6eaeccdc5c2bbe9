use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-table outcome of saving one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceResult {
    pub company_id: Option<Uuid>,
    pub inserted_tables: Vec<String>,
    pub errors: Vec<String>,
    pub success: bool,
}

impl PersistenceResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_insert(&mut self, table: &str) {
        self.inserted_tables.push(table.to_string());
        self.success = true;
    }

    pub fn record_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn is_partial(&self) -> bool {
        self.success && !self.errors.is_empty()
    }
}
