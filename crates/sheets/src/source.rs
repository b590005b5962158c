use async_trait::async_trait;

use crate::client::SheetsError;

/// Address of one tab within a published spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetRef {
    pub sheet_id: String,
    pub gid: String,
}

impl SheetRef {
    pub fn new(sheet_id: impl Into<String>, gid: impl Into<String>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            gid: gid.into(),
        }
    }
}

/// Anything that can produce the CSV text of a spreadsheet tab.
#[async_trait]
pub trait CsvSource: Send + Sync {
    async fn fetch_csv(&self, sheet: &SheetRef) -> Result<String, SheetsError>;
}
