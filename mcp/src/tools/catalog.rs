//! Tool names, descriptions and JSON input schemas, in advertised order.
//!
//! Input schemas are generated from the typed arguments in [`super::args`].

use schemars::{generate::SchemaSettings, JsonSchema};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use super::args::{
    CreateFieldArgs, CreateRecordArgs, CreateTableArgs, CreateViewArgs, DeleteRecordsArgs,
    DescribeTableArgs, FetchArgs, GetRecordArgs, ListRecordsArgs, ListTablesArgs, NoArgs,
    SearchArgs, SearchRecordsArgs, TableArgs, UpdateFieldArgs, UpdateRecordsArgs,
    UpdateTableArgs, ViewRefArgs,
};
use crate::annotations::ToolAnnotations;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ToolName {
    Search,
    Fetch,
    ListRecords,
    SearchRecords,
    ListBases,
    ListTables,
    DescribeTable,
    GetRecord,
    CreateRecord,
    UpdateRecords,
    DeleteRecords,
    CreateTable,
    UpdateTable,
    CreateField,
    UpdateField,
    ListViews,
    GetViewMetadata,
    CreateView,
    DeleteView,
}

/// Advertised shape of one tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: ToolName,
    pub description: &'static str,
    pub input_schema: Value,
    pub annotations: ToolAnnotations,
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolName::iter().map(ToolName::definition).collect()
}

/// Input schema generated from an argument type, with nested types inlined.
fn schema_of<T: JsonSchema>() -> Value {
    let generator = SchemaSettings::draft07()
        .with(|settings| settings.inline_subschemas = true)
        .into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let mut value = serde_json::to_value(&schema).unwrap_or_default();
    if let Some(map) = value.as_object_mut() {
        map.remove("$schema");
        map.remove("title");
    }
    value
}

impl ToolName {
    pub fn description(self) -> &'static str {
        match self {
            ToolName::Search => "Search baseline tool required by ChatGPT connector.",
            ToolName::Fetch => "Fetch baseline tool required by ChatGPT connector.",
            ToolName::ListRecords => "List records from a table",
            ToolName::SearchRecords => "Search for records containing specific text",
            ToolName::ListBases => "List all accessible Airtable bases",
            ToolName::ListTables => "List all tables in a specific base",
            ToolName::DescribeTable => "Get detailed information about a specific table",
            ToolName::GetRecord => "Get a specific record by ID",
            ToolName::CreateRecord => "Create a new record in a table",
            ToolName::UpdateRecords => "Update up to 10 records in a table",
            ToolName::DeleteRecords => "Delete records from a table",
            ToolName::CreateTable => "Create a new table in a base",
            ToolName::UpdateTable => "Update a table's name or description",
            ToolName::CreateField => "Create a new field in a table",
            ToolName::UpdateField => "Update a field's name or description",
            ToolName::ListViews => "List all views for a given table",
            ToolName::GetViewMetadata => "Get detailed configuration for a specific view",
            ToolName::CreateView => {
                "Create a new view (grid or kanban) with optional filters, sorts, grouping, and field visibility"
            }
            ToolName::DeleteView => "Delete an existing view by name or ID",
        }
    }

    pub fn annotations(self) -> ToolAnnotations {
        match self {
            ToolName::Search
            | ToolName::Fetch
            | ToolName::ListRecords
            | ToolName::SearchRecords
            | ToolName::ListBases
            | ToolName::ListTables
            | ToolName::DescribeTable
            | ToolName::GetRecord
            | ToolName::ListViews
            | ToolName::GetViewMetadata => ToolAnnotations::read_only(),
            ToolName::CreateRecord
            | ToolName::CreateTable
            | ToolName::CreateField
            | ToolName::CreateView => ToolAnnotations::new().with_destructive(false),
            ToolName::UpdateRecords | ToolName::UpdateTable | ToolName::UpdateField => {
                ToolAnnotations::new().with_idempotent(true)
            }
            ToolName::DeleteRecords | ToolName::DeleteView => ToolAnnotations::new(),
        }
    }

    pub fn input_schema(self) -> Value {
        match self {
            ToolName::Search => schema_of::<SearchArgs>(),
            ToolName::Fetch => schema_of::<FetchArgs>(),
            ToolName::ListRecords => schema_of::<ListRecordsArgs>(),
            ToolName::SearchRecords => schema_of::<SearchRecordsArgs>(),
            ToolName::ListBases => schema_of::<NoArgs>(),
            ToolName::ListTables => schema_of::<ListTablesArgs>(),
            ToolName::DescribeTable => schema_of::<DescribeTableArgs>(),
            ToolName::GetRecord => schema_of::<GetRecordArgs>(),
            ToolName::CreateRecord => schema_of::<CreateRecordArgs>(),
            ToolName::UpdateRecords => schema_of::<UpdateRecordsArgs>(),
            ToolName::DeleteRecords => schema_of::<DeleteRecordsArgs>(),
            ToolName::CreateTable => schema_of::<CreateTableArgs>(),
            ToolName::UpdateTable => schema_of::<UpdateTableArgs>(),
            ToolName::CreateField => schema_of::<CreateFieldArgs>(),
            ToolName::UpdateField => schema_of::<UpdateFieldArgs>(),
            ToolName::ListViews => schema_of::<TableArgs>(),
            ToolName::GetViewMetadata | ToolName::DeleteView => schema_of::<ViewRefArgs>(),
            ToolName::CreateView => schema_of::<CreateViewArgs>(),
        }
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self,
            description: self.description(),
            input_schema: self.input_schema(),
            annotations: self.annotations(),
        }
    }
}
