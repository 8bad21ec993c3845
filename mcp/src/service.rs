//! The Airtable operations the dispatcher and resource layer depend on.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::GatewayResult,
    types::{
        BaseList, BaseSchema, DeletedRecord, DeletedView, Field, FieldSet, FieldSpec,
        ListRecordsOptions, NameDescriptionUpdate, Record, RecordUpdate, SearchRequest, Table,
        View, ViewSpec,
    },
    views,
};

/// One method per remote capability.
///
/// [`crate::AirtableClient`] is the production implementation. Schema reads go
/// through its cache; mutating schema operations invalidate the touched base.
#[async_trait]
pub trait AirtableService: Send + Sync {
    async fn list_bases(&self) -> GatewayResult<Arc<BaseList>>;

    async fn get_base_schema(&self, base_id: &str) -> GatewayResult<Arc<BaseSchema>>;

    /// All pages of a table, fetched sequentially.
    async fn list_records(
        &self,
        base_id: &str,
        table_id: &str,
        options: &ListRecordsOptions,
    ) -> GatewayResult<Vec<Record>>;

    async fn search_records(
        &self,
        base_id: &str,
        table_id: &str,
        request: &SearchRequest,
    ) -> GatewayResult<Vec<Record>>;

    async fn get_record(
        &self,
        base_id: &str,
        table_id: &str,
        record_id: &str,
    ) -> GatewayResult<Record>;

    async fn create_record(
        &self,
        base_id: &str,
        table_id: &str,
        fields: FieldSet,
    ) -> GatewayResult<Record>;

    async fn update_records(
        &self,
        base_id: &str,
        table_id: &str,
        records: Vec<RecordUpdate>,
    ) -> GatewayResult<Vec<Record>>;

    async fn delete_records(
        &self,
        base_id: &str,
        table_id: &str,
        record_ids: &[String],
    ) -> GatewayResult<Vec<DeletedRecord>>;

    async fn create_table(
        &self,
        base_id: &str,
        name: &str,
        description: Option<&str>,
        fields: Vec<FieldSpec>,
    ) -> GatewayResult<Table>;

    async fn update_table(
        &self,
        base_id: &str,
        table_id: &str,
        update: NameDescriptionUpdate,
    ) -> GatewayResult<Table>;

    async fn create_field(
        &self,
        base_id: &str,
        table_id: &str,
        field: FieldSpec,
    ) -> GatewayResult<Field>;

    async fn update_field(
        &self,
        base_id: &str,
        table_id: &str,
        field_id: &str,
        update: NameDescriptionUpdate,
    ) -> GatewayResult<Field>;

    async fn get_view_metadata(
        &self,
        base_id: &str,
        table_id: &str,
        view_id: &str,
    ) -> GatewayResult<Value>;

    async fn create_view(
        &self,
        base_id: &str,
        table_id: &str,
        spec: &ViewSpec,
    ) -> GatewayResult<Value>;

    async fn delete_view(
        &self,
        base_id: &str,
        table_id: &str,
        view_id: &str,
    ) -> GatewayResult<DeletedView>;

    /// Table from the cached schema. `table_ref` may be an id or a name.
    async fn table_schema(&self, base_id: &str, table_ref: &str) -> GatewayResult<Table> {
        let schema = self.get_base_schema(base_id).await?;
        views::resolve_table(&schema, base_id, table_ref).cloned()
    }

    /// Views of a table, projected from the cached schema.
    async fn list_views(&self, base_id: &str, table_ref: &str) -> GatewayResult<Vec<View>> {
        Ok(self.table_schema(base_id, table_ref).await?.views)
    }
}
