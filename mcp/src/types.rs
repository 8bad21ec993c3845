//! Airtable domain model.
//!
//! These are the shapes the gateway validates upstream responses against.
//! Unknown keys are dropped on deserialize; field and view order is kept as
//! returned.

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

/// Field values of a record, keyed by field name.
pub type FieldSet = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Base {
    pub id: String,
    pub name: String,
    pub permission_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseList {
    pub bases: Vec<Base>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseSchema {
    pub tables: Vec<Table>,
}

impl BaseSchema {
    pub fn table(&self, table_id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == table_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub primary_field_id: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub views: Vec<View>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub view_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: FieldSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedRecord {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedView {
    pub id: String,
}

/// Page of records as returned by the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RecordPage {
    pub records: Vec<Record>,
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RecordBatch {
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeletedBatch {
    pub records: Vec<DeletedEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeletedEntry {
    pub id: String,
}

/// Airtable field types.
///
/// Unrecognised type strings land in [`FieldType::Other`] and serialize back
/// unchanged.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "camelCase")]
pub enum FieldType {
    SingleLineText,
    Email,
    Url,
    MultilineText,
    Number,
    Percent,
    Currency,
    SingleSelect,
    MultipleSelects,
    SingleCollaborator,
    MultipleCollaborators,
    MultipleRecordLinks,
    Date,
    DateTime,
    PhoneNumber,
    MultipleAttachments,
    Checkbox,
    Formula,
    CreatedTime,
    Rollup,
    Count,
    Lookup,
    MultipleLookupValues,
    AutoNumber,
    Barcode,
    Rating,
    RichText,
    Duration,
    LastModifiedTime,
    Button,
    CreatedBy,
    LastModifiedBy,
    ExternalSyncSource,
    AiText,
    #[strum(default)]
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Other(raw) => raw,
            known => known.as_ref(),
        }
    }

    /// Types whose cell content can be matched with `FIND()`.
    pub fn is_searchable_text(&self) -> bool {
        matches!(
            self,
            FieldType::SingleLineText
                | FieldType::MultilineText
                | FieldType::RichText
                | FieldType::Email
                | FieldType::Url
                | FieldType::PhoneNumber
        )
    }

    /// Types a kanban view can be grouped by.
    pub fn is_kanban_groupable(&self) -> bool {
        matches!(self, FieldType::SingleSelect | FieldType::SingleCollaborator)
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        FieldType::from_str(&raw).unwrap_or(FieldType::Other(raw))
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        t.as_str().to_string()
    }
}

/// Field definition used when creating a table or a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    pub name: String,
    /// Airtable field type, e.g. singleLineText.
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

/// Partial update for a table or a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameDescriptionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RecordUpdate {
    pub id: String,
    pub fields: FieldSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SortSpec {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
}

/// Options for the paged record listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRecordsOptions {
    pub max_records: Option<u32>,
    pub filter_by_formula: Option<String>,
    pub view: Option<String>,
    pub sort: Vec<SortSpec>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub search_term: String,
    pub field_ids: Vec<String>,
    pub max_records: Option<u32>,
    pub view: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Grid,
    Kanban,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Grid => "grid",
            ViewKind::Kanban => "kanban",
        }
    }
}

/// Resolved view definition, all field references already canonical ids.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSpec {
    pub name: String,
    pub kind: ViewKind,
    pub filter_by_formula: Option<String>,
    pub sorts: Vec<ResolvedSort>,
    pub row_grouping_field_id: Option<String>,
    pub field_order_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSort {
    pub field_id: String,
    pub direction: SortDirection,
}
