//! Table listing adapter

use crate::error::Result;
use crate::http::ApiClient;
use crate::pagination::{Page, PageAdapter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub(crate) const LIST_TABLES: &str = "DynamoDB_20120810.ListTables";

/// Page size used for table listings when none is configured
pub const DEFAULT_TABLES_PAGE_SIZE: u32 = 100;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ListTablesInput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclusive_start_table_name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListTablesOutput {
    #[serde(default)]
    table_names: Vec<String>,
    #[serde(default)]
    last_evaluated_table_name: Option<String>,
}

/// Lists table names; the cursor is the last table name of the previous page
#[derive(Debug)]
pub struct TablesAdapter {
    client: ApiClient,
    page_size: Option<u32>,
    cursor: Option<String>,
}

impl TablesAdapter {
    /// Create a table listing adapter
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            page_size: None,
            cursor: None,
        }
    }
}

#[async_trait]
impl PageAdapter for TablesAdapter {
    type Item = String;

    async fn fetch_page(&mut self) -> Result<Page<String>> {
        let input = ListTablesInput {
            limit: self.page_size,
            exclusive_start_table_name: self.cursor.as_deref(),
        };

        let output: ListTablesOutput = self.client.call(LIST_TABLES, &input).await?;
        Ok(Page::new(output.table_names, output.last_evaluated_table_name))
    }

    fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    fn set_page_size(&mut self, size: u32) {
        self.page_size = Some(size);
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }
}
