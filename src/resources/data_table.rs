use reqwest::Method;
use serde_json::Value;

use crate::client::{TelerivetError, record_with};
use crate::cursor::ApiCursor;
use crate::domain::Params;
use crate::entity::{Entity, FromRecord, define_entity};
use crate::resources::single_param;

define_entity! {
    /// A data table storing rows of custom variables.
    pub struct DataTable;
    path(record) => Ok(format!(
        "/projects/{}/tables/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        num_rows: i64,
        project_id: String,
    }
    writable {
        name: String,
        show_add_row: bool,
        show_stats: bool,
        show_contact_columns: bool,
    }
}

impl DataTable {
    pub fn query_rows(&self, options: Params) -> Result<ApiCursor<DataRow>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/rows", self.api_path()?), options)
    }

    /// Add a row. `options` may carry `contact_id`, `from_number` and `vars`.
    pub async fn create_row(&self, options: Params) -> Result<DataRow, TelerivetError> {
        let path = format!("{}/rows", self.api_path()?);
        self.record
            .client()
            .request_entity(Method::POST, &path, Some(&options))
            .await
    }

    pub async fn get_row_by_id(&self, id: &str) -> Result<DataRow, TelerivetError> {
        let path = format!("{}/rows/{id}", self.api_path()?);
        self.record
            .client()
            .request_entity(Method::GET, &path, None)
            .await
    }

    /// Reference a row by id without making an API request.
    pub fn init_row_by_id(&self, id: &str) -> Result<DataRow, TelerivetError> {
        let project_id = self.record.key("project_id")?;
        let table_id = self.record.key("id")?;
        Ok(DataRow::from_record(
            self.record.client().clone(),
            record_with([
                ("project_id", project_id.as_str()),
                ("table_id", table_id.as_str()),
                ("id", id),
            ]),
            false,
        ))
    }

    /// Field metadata of every column in the table.
    pub async fn get_fields(&self) -> Result<Value, TelerivetError> {
        let path = format!("{}/fields", self.api_path()?);
        self.record.client().request(Method::GET, &path, None).await
    }

    /// Set display metadata (name, type, order, ...) of the column backing `variable`.
    pub async fn set_field_metadata(
        &self,
        variable: &str,
        options: Params,
    ) -> Result<Value, TelerivetError> {
        let path = format!("{}/fields/{variable}", self.api_path()?);
        self.record
            .client()
            .request(Method::POST, &path, Some(&options))
            .await
    }

    /// Count rows per distinct value of `variable`.
    pub async fn count_rows_by_value(&self, variable: &str) -> Result<Value, TelerivetError> {
        let path = format!("{}/count_rows_by_value", self.api_path()?);
        self.record
            .client()
            .request(Method::GET, &path, Some(&single_param("variable", variable)))
            .await
    }

    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }

    /// Delete the table and all of its rows.
    pub async fn delete(&self) -> Result<(), TelerivetError> {
        self.record.delete(&self.api_path()?).await
    }
}

define_entity! {
    /// One row of a [`DataTable`]. Cell values are its custom variables.
    pub struct DataRow;
    path(record) => Ok(format!(
        "/projects/{}/tables/{}/rows/{}",
        record.key("project_id")?,
        record.key("table_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        time_created: i64,
        time_updated: i64,
        table_id: String,
        project_id: String,
    }
    writable {
        contact_id: String,
        from_number: String,
    }
}

impl DataRow {
    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }

    pub async fn delete(&self) -> Result<(), TelerivetError> {
        self.record.delete(&self.api_path()?).await
    }
}
