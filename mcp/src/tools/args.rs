//! Typed tool arguments.
//!
//! Unknown keys are ignored. Constraints that serde cannot express live in
//! `validate` methods. The advertised input schemas are derived from these
//! structs, so doc comments on fields become schema descriptions.

use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{GatewayError, GatewayResult},
    types::{FieldSet, FieldSpec, RecordUpdate, SortSpec, ViewKind},
};

/// Largest batch accepted by `update_records`.
pub const MAX_UPDATE_BATCH: usize = 10;

/// Deserialize `args` for `tool`. A missing or null value is read as `{}`.
pub fn parse<T: DeserializeOwned>(tool: &str, args: Value) -> GatewayResult<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|e| GatewayError::validation(format!("Invalid arguments for {tool}: {e}")))
}

/// How much of each table to include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum DetailLevel {
    TableIdentifiersOnly,
    IdentifiersOnly,
    #[default]
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FetchKind {
    #[default]
    Record,
    Table,
    View,
}

impl FetchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchKind::Record => "record",
            FetchKind::Table => "table",
            FetchKind::View => "view",
        }
    }
}

/// `list_bases` takes no arguments.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoArgs {}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchArgs {
    pub query: String,
    pub base_id: Option<String>,
    pub table_id: Option<String>,
    pub view: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FetchArgs {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: FetchKind,
    pub base_id: Option<String>,
    pub table_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListRecordsArgs {
    pub base_id: String,
    pub table_id: String,
    pub view: Option<String>,
    /// Maximum number of records to return. 0 returns every record.
    pub max_records: Option<u32>,
    /// Airtable formula to filter records.
    pub filter_by_formula: Option<String>,
    #[serde(default)]
    pub sort: Vec<SortSpec>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecordsArgs {
    pub base_id: String,
    pub table_id: String,
    /// Text to search for in records.
    pub search_term: String,
    /// Text field ids to search in. Defaults to all text fields.
    #[serde(default)]
    pub field_ids: Vec<String>,
    pub max_records: Option<u32>,
    pub view: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTablesArgs {
    pub base_id: String,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DescribeTableArgs {
    pub base_id: String,
    pub table_id: String,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableArgs {
    pub base_id: String,
    pub table_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetRecordArgs {
    pub base_id: String,
    pub table_id: String,
    pub record_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordArgs {
    pub base_id: String,
    pub table_id: String,
    pub fields: FieldSet,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordsArgs {
    pub base_id: String,
    pub table_id: String,
    #[schemars(length(min = 1, max = 10))]
    pub records: Vec<RecordUpdate>,
}

impl UpdateRecordsArgs {
    pub fn validate(&self) -> GatewayResult<()> {
        match self.records.len() {
            0 => Err(GatewayError::validation("records must not be empty")),
            n if n > MAX_UPDATE_BATCH => Err(GatewayError::validation(format!(
                "At most {MAX_UPDATE_BATCH} records can be updated at once, got {n}"
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordsArgs {
    pub base_id: String,
    pub table_id: String,
    #[schemars(length(min = 1))]
    pub record_ids: Vec<String>,
}

impl DeleteRecordsArgs {
    pub fn validate(&self) -> GatewayResult<()> {
        if self.record_ids.is_empty() {
            return Err(GatewayError::validation("recordIds must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableArgs {
    pub base_id: String,
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableArgs {
    pub base_id: String,
    pub table_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NestedField {
    pub field: FieldSpec,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFieldArgs {
    pub base_id: String,
    pub table_id: String,
    pub nested: NestedField,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldArgs {
    pub base_id: String,
    pub table_id: String,
    pub field_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// `get_view_metadata` and `delete_view`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewRefArgs {
    pub base_id: String,
    /// Table ID (tbl...) or table name.
    pub table_id: String,
    /// View ID (viw...) or view name.
    pub view: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GroupBy {
    /// Field ID or name.
    pub field: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateViewArgs {
    pub base_id: String,
    pub table_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ViewKind,
    pub filter_by_formula: Option<String>,
    #[serde(default)]
    pub sorts: Vec<SortSpec>,
    pub group_by: Option<GroupBy>,
    /// Visible fields in order, by ID or name.
    #[serde(default)]
    pub fields: Vec<String>,
}
