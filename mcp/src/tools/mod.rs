//! Tool dispatcher.
//!
//! [`ToolDispatcher::dispatch`] is the single entry point for tool calls. It
//! parses arguments, runs the operation against an [`AirtableService`] and
//! always returns a [`ToolResult`]; failures are classified and reported in the
//! envelope rather than raised.

pub mod args;
pub mod catalog;
pub mod envelope;
pub mod projection;

use std::{str::FromStr, sync::Arc, time::Instant};

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use self::{
    args::{
        parse, CreateFieldArgs, CreateRecordArgs, CreateTableArgs, CreateViewArgs,
        DeleteRecordsArgs, DescribeTableArgs, FetchArgs, FetchKind, GetRecordArgs,
        ListRecordsArgs, ListTablesArgs, SearchArgs, SearchRecordsArgs, TableArgs,
        UpdateFieldArgs, UpdateRecordsArgs, UpdateTableArgs, ViewRefArgs,
    },
    projection::project_table,
};
pub use self::{
    catalog::{tool_definitions, ToolDefinition, ToolName},
    envelope::{TextContent, ToolResult, JSON_MIME_TYPE},
};
use crate::{
    classify::classify,
    core::GatewayMetrics,
    error::{GatewayError, GatewayResult},
    service::AirtableService,
    types::{ListRecordsOptions, NameDescriptionUpdate, SearchRequest},
    views::{self, ViewDraft},
};

fn to_payload<T: Serialize>(value: T) -> GatewayResult<Value> {
    serde_json::to_value(value).map_err(|e| GatewayError::ResponseShape(e.to_string()))
}

pub struct ToolDispatcher {
    service: Arc<dyn AirtableService>,
    metrics: Arc<GatewayMetrics>,
}

impl ToolDispatcher {
    pub fn new(service: Arc<dyn AirtableService>) -> Self {
        Self {
            service,
            metrics: Arc::new(GatewayMetrics::new()),
        }
    }

    /// Share a metrics sink, usually the gateway's own.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<GatewayMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn service(&self) -> &Arc<dyn AirtableService> {
        &self.service
    }

    pub fn metrics(&self) -> &Arc<GatewayMetrics> {
        &self.metrics
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    /// Run tool `name` with `args`. Never fails.
    pub async fn dispatch(&self, name: &str, args: Value) -> ToolResult {
        let start = Instant::now();
        info!(tool = name, "Handling tool call");

        let (outcome, metric_name) = match ToolName::from_str(name) {
            Ok(tool) => (self.run(tool, args).await, <&'static str>::from(tool)),
            Err(_) => {
                warn!(tool = name, "Unknown tool requested");
                (Err(GatewayError::UnknownTool(name.to_string())), "unknown")
            }
        };

        let result = match outcome {
            Ok(payload) => ToolResult::success(&payload),
            Err(e) => {
                error!(tool = name, error = %e, "Error in tool execution");
                ToolResult::failure(&classify(name, &e).payload())
            }
        };

        self.metrics.record_tool_call(
            metric_name,
            !result.is_error,
            start.elapsed().as_millis() as u64,
        );
        result
    }

    async fn run(&self, tool: ToolName, args: Value) -> GatewayResult<Value> {
        let tool_name = tool.as_ref();
        match tool {
            ToolName::Search => self.search(parse(tool_name, args)?).await,
            ToolName::Fetch => self.fetch(parse(tool_name, args)?).await,
            ToolName::ListRecords => {
                let args: ListRecordsArgs = parse(tool_name, args)?;
                debug!(base_id = %args.base_id, table_id = %args.table_id, "Executing list_records");
                let options = ListRecordsOptions {
                    max_records: args.max_records,
                    filter_by_formula: args.filter_by_formula,
                    view: args.view,
                    sort: args.sort,
                };
                to_payload(
                    self.service
                        .list_records(&args.base_id, &args.table_id, &options)
                        .await?,
                )
            }
            ToolName::SearchRecords => {
                let args: SearchRecordsArgs = parse(tool_name, args)?;
                debug!(base_id = %args.base_id, table_id = %args.table_id, term = %args.search_term, "Executing search_records");
                let request = SearchRequest {
                    search_term: args.search_term,
                    field_ids: args.field_ids,
                    max_records: args.max_records,
                    view: args.view,
                };
                to_payload(
                    self.service
                        .search_records(&args.base_id, &args.table_id, &request)
                        .await?,
                )
            }
            ToolName::ListBases => {
                debug!("Executing list_bases");
                let bases = self.service.list_bases().await?;
                to_payload(&bases.bases)
            }
            ToolName::ListTables => {
                let args: ListTablesArgs = parse(tool_name, args)?;
                debug!(base_id = %args.base_id, "Executing list_tables");
                let schema = self.service.get_base_schema(&args.base_id).await?;
                Ok(Value::Array(
                    schema
                        .tables
                        .iter()
                        .map(|t| project_table(t, args.detail_level))
                        .collect(),
                ))
            }
            ToolName::DescribeTable => {
                let args: DescribeTableArgs = parse(tool_name, args)?;
                debug!(base_id = %args.base_id, table_id = %args.table_id, "Executing describe_table");
                let table = self
                    .service
                    .table_schema(&args.base_id, &args.table_id)
                    .await
                    .map_err(GatewayError::into_lookup_miss)?;
                Ok(project_table(&table, args.detail_level))
            }
            ToolName::GetRecord => {
                let args: GetRecordArgs = parse(tool_name, args)?;
                debug!(base_id = %args.base_id, table_id = %args.table_id, record_id = %args.record_id, "Executing get_record");
                to_payload(
                    self.service
                        .get_record(&args.base_id, &args.table_id, &args.record_id)
                        .await?,
                )
            }
            ToolName::CreateRecord => {
                let args: CreateRecordArgs = parse(tool_name, args)?;
                debug!(base_id = %args.base_id, table_id = %args.table_id, "Executing create_record");
                to_payload(
                    self.service
                        .create_record(&args.base_id, &args.table_id, args.fields)
                        .await?,
                )
            }
            ToolName::UpdateRecords => {
                let args: UpdateRecordsArgs = parse(tool_name, args)?;
                args.validate()?;
                debug!(base_id = %args.base_id, table_id = %args.table_id, count = args.records.len(), "Executing update_records");
                to_payload(
                    self.service
                        .update_records(&args.base_id, &args.table_id, args.records)
                        .await?,
                )
            }
            ToolName::DeleteRecords => {
                let args: DeleteRecordsArgs = parse(tool_name, args)?;
                args.validate()?;
                debug!(base_id = %args.base_id, table_id = %args.table_id, count = args.record_ids.len(), "Executing delete_records");
                to_payload(
                    self.service
                        .delete_records(&args.base_id, &args.table_id, &args.record_ids)
                        .await?,
                )
            }
            ToolName::CreateTable => {
                let args: CreateTableArgs = parse(tool_name, args)?;
                debug!(base_id = %args.base_id, table_name = %args.name, "Executing create_table");
                to_payload(
                    self.service
                        .create_table(
                            &args.base_id,
                            &args.name,
                            args.description.as_deref(),
                            args.fields,
                        )
                        .await?,
                )
            }
            ToolName::UpdateTable => {
                let args: UpdateTableArgs = parse(tool_name, args)?;
                debug!(base_id = %args.base_id, table_id = %args.table_id, "Executing update_table");
                let update = NameDescriptionUpdate {
                    name: args.name,
                    description: args.description,
                };
                to_payload(
                    self.service
                        .update_table(&args.base_id, &args.table_id, update)
                        .await?,
                )
            }
            ToolName::CreateField => {
                let args: CreateFieldArgs = parse(tool_name, args)?;
                let field = args.nested.field;
                debug!(base_id = %args.base_id, table_id = %args.table_id, field_type = %field.field_type, "Executing create_field");
                to_payload(
                    self.service
                        .create_field(&args.base_id, &args.table_id, field)
                        .await?,
                )
            }
            ToolName::UpdateField => {
                let args: UpdateFieldArgs = parse(tool_name, args)?;
                debug!(base_id = %args.base_id, table_id = %args.table_id, field_id = %args.field_id, "Executing update_field");
                let update = NameDescriptionUpdate {
                    name: args.name,
                    description: args.description,
                };
                to_payload(
                    self.service
                        .update_field(&args.base_id, &args.table_id, &args.field_id, update)
                        .await?,
                )
            }
            ToolName::ListViews => {
                let args: TableArgs = parse(tool_name, args)?;
                debug!(base_id = %args.base_id, table_id = %args.table_id, "Executing list_views");
                to_payload(
                    self.service
                        .list_views(&args.base_id, &args.table_id)
                        .await?,
                )
            }
            ToolName::GetViewMetadata => {
                let args: ViewRefArgs = parse(tool_name, args)?;
                debug!(base_id = %args.base_id, table_id = %args.table_id, view = %args.view, "Executing get_view_metadata");
                let target = views::resolve_view(
                    self.service.as_ref(),
                    &args.base_id,
                    &args.table_id,
                    &args.view,
                )
                .await
                .map_err(GatewayError::into_lookup_miss)?;
                self.service
                    .get_view_metadata(&args.base_id, &target.table_id, &target.view_id)
                    .await
            }
            ToolName::CreateView => self.create_view(parse(tool_name, args)?).await,
            ToolName::DeleteView => {
                let args: ViewRefArgs = parse(tool_name, args)?;
                debug!(base_id = %args.base_id, table_id = %args.table_id, view = %args.view, "Executing delete_view");
                let target = views::resolve_view(
                    self.service.as_ref(),
                    &args.base_id,
                    &args.table_id,
                    &args.view,
                )
                .await
                .map_err(GatewayError::into_lookup_miss)?;
                to_payload(
                    self.service
                        .delete_view(&args.base_id, &target.table_id, &target.view_id)
                        .await?,
                )
            }
        }
    }

    /// With base and table this is `search_records`; otherwise a placeholder.
    async fn search(&self, args: SearchArgs) -> GatewayResult<Value> {
        let (Some(base_id), Some(table_id)) = (args.base_id.as_deref(), args.table_id.as_deref())
        else {
            return Ok(json!({"note": "search placeholder", "query": args.query}));
        };

        debug!(base_id, table_id, query = %args.query, "Executing search");
        let request = SearchRequest {
            search_term: args.query.clone(),
            view: args.view.clone(),
            ..SearchRequest::default()
        };
        to_payload(
            self.service
                .search_records(base_id, table_id, &request)
                .await?,
        )
    }

    /// Resolve `id` as a record, table or view, falling back to a placeholder
    /// when the coordinates are insufficient.
    async fn fetch(&self, args: FetchArgs) -> GatewayResult<Value> {
        let base_id = args.base_id.as_deref();
        let table_id = args.table_id.as_deref();
        debug!(id = %args.id, kind = args.kind.as_str(), ?base_id, ?table_id, "Executing fetch");

        match (args.kind, base_id, table_id) {
            (FetchKind::Record, Some(base_id), Some(table_id)) => {
                return to_payload(self.service.get_record(base_id, table_id, &args.id).await?);
            }
            (FetchKind::Table, Some(base_id), _) => {
                let schema = self.service.get_base_schema(base_id).await?;
                if let Some(table) = schema.table(&args.id) {
                    return to_payload(table);
                }
            }
            (FetchKind::View, Some(base_id), Some(table_id)) => {
                let target =
                    views::resolve_view(self.service.as_ref(), base_id, table_id, &args.id).await?;
                return self
                    .service
                    .get_view_metadata(base_id, &target.table_id, &target.view_id)
                    .await;
            }
            _ => {}
        }

        Ok(json!({"note": "fetch placeholder", "id": args.id, "type": args.kind.as_str()}))
    }

    async fn create_view(&self, args: CreateViewArgs) -> GatewayResult<Value> {
        debug!(
            base_id = %args.base_id,
            table_id = %args.table_id,
            view_name = %args.name,
            view_type = args.kind.as_str(),
            "Executing create_view"
        );
        let table = self
            .service
            .table_schema(&args.base_id, &args.table_id)
            .await
            .map_err(GatewayError::into_lookup_miss)?;
        let spec = views::build_view_spec(
            &table,
            &ViewDraft {
                name: &args.name,
                kind: args.kind,
                filter_by_formula: args.filter_by_formula.as_deref(),
                sorts: &args.sorts,
                group_by: args.group_by.as_ref().map(|g| g.field.as_str()),
                fields: &args.fields,
            },
        )?;
        self.service
            .create_view(&args.base_id, &table.id, &spec)
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::MockService;

    fn dispatcher(service: MockService) -> (ToolDispatcher, Arc<MockService>) {
        let service = Arc::new(service);
        (
            ToolDispatcher::new(Arc::clone(&service) as Arc<dyn AirtableService>),
            service,
        )
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let (d, _) = dispatcher(MockService::with_duplicate_views());
        let result = d.dispatch("drop_everything", json!({})).await;
        assert!(result.is_error);
        assert_eq!(
            result.payload(),
            json!("Error in tool drop_everything: Unknown tool: drop_everything")
        );
        assert_eq!(d.metrics().snapshot().tool_failures, 1);
    }

    #[tokio::test]
    async fn test_invalid_arguments_become_failure_envelope() {
        let (d, service) = dispatcher(MockService::with_duplicate_views());
        let result = d.dispatch("get_record", json!({"baseId": 42})).await;
        assert!(result.is_error);
        assert!(result
            .payload()
            .as_str()
            .unwrap()
            .starts_with("Error in tool get_record: Invalid arguments for get_record"));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_record_success() {
        let (d, _) = dispatcher(MockService::with_duplicate_views());
        let result = d
            .dispatch(
                "get_record",
                json!({"baseId": "app1", "tableId": "tbl1", "recordId": "rec1"}),
            )
            .await;
        assert!(!result.is_error);
        assert_eq!(
            result.payload(),
            json!({"id": "rec1", "fields": {"Name": "First"}})
        );
        let latency = d.metrics().tool_latency("get_record").unwrap();
        assert_eq!(latency.count, 1);
    }

    #[tokio::test]
    async fn test_upstream_error_is_structured() {
        let (d, _) = dispatcher(MockService::failing(|| {
            GatewayError::api(
                403,
                r#"{"error":{"type":"INVALID_PERMISSIONS_OR_MODEL_NOT_FOUND"}}"#.to_string(),
                "patX",
            )
        }));
        let result = d
            .dispatch(
                "list_records",
                json!({"baseId": "app1", "tableId": "tbl1"}),
            )
            .await;
        assert!(result.is_error);
        let payload = result.payload();
        assert_eq!(payload["code"], "forbidden_or_not_found");
        assert!(payload["hint"].is_string());
    }

    #[tokio::test]
    async fn test_list_bases_projection() {
        let (d, _) = dispatcher(MockService::with_duplicate_views());
        let result = d.dispatch("list_bases", Value::Null).await;
        assert_eq!(
            result.payload(),
            json!([{"id": "app1", "name": "Project Tracker", "permissionLevel": "create"}])
        );
    }

    #[tokio::test]
    async fn test_list_tables_detail_level() {
        let (d, _) = dispatcher(MockService::with_duplicate_views());
        let result = d
            .dispatch(
                "list_tables",
                json!({"baseId": "app1", "detailLevel": "tableIdentifiersOnly"}),
            )
            .await;
        assert_eq!(
            result.payload(),
            json!([{"id": "tbl1", "name": "Tasks"}, {"id": "tbl2", "name": "Numbers"}])
        );
    }

    #[tokio::test]
    async fn test_describe_missing_table() {
        let (d, _) = dispatcher(MockService::with_duplicate_views());
        let result = d
            .dispatch("describe_table", json!({"baseId": "app1", "tableId": "tblX"}))
            .await;
        assert!(result.is_error);
        assert_eq!(
            result.payload(),
            json!("Table tblX not found in base app1")
        );
    }

    #[tokio::test]
    async fn test_lookup_misses_are_bare() {
        let (d, _) = dispatcher(MockService::with_duplicate_views());
        let result = d
            .dispatch(
                "get_view_metadata",
                json!({"baseId": "app1", "tableId": "tbl1", "view": "Nope"}),
            )
            .await;
        assert!(result.is_error);
        assert_eq!(result.payload(), json!("View Nope not found in table tbl1"));

        let result = d
            .dispatch(
                "delete_view",
                json!({"baseId": "app1", "tableId": "Archive", "view": "viw1"}),
            )
            .await;
        assert_eq!(result.payload(), json!("Table Archive not found in base app1"));

        let result = d
            .dispatch(
                "create_view",
                json!({"baseId": "app1", "tableId": "tbl1", "name": "X", "type": "grid", "fields": ["Ghost"]}),
            )
            .await;
        assert!(result.is_error);
        assert_eq!(
            result.payload(),
            json!("Error in tool create_view: Field Ghost not found in table tbl1")
        );
    }

    #[tokio::test]
    async fn test_get_view_metadata_ambiguous_name() {
        let (d, service) = dispatcher(MockService::with_duplicate_views());
        let result = d
            .dispatch(
                "get_view_metadata",
                json!({"baseId": "app1", "tableId": "tbl1", "view": "My View"}),
            )
            .await;
        assert!(result.is_error);
        assert_eq!(
            result.payload(),
            json!({
                "code": "ambiguous_view_name",
                "message": "Multiple views named My View in table tbl1",
                "remediation": "Use the view ID (viw...) instead of name."
            })
        );
        assert!(!service.calls().contains(&"get_view_metadata".to_string()));
    }

    #[tokio::test]
    async fn test_delete_view_by_id_skips_schema() {
        let (d, service) = dispatcher(MockService::with_duplicate_views());
        let result = d
            .dispatch(
                "delete_view",
                json!({"baseId": "app1", "tableId": "tbl1", "view": "viw1"}),
            )
            .await;
        assert!(!result.is_error);
        assert_eq!(result.payload(), json!({"id": "viw1"}));
        assert_eq!(
            service
                .schema_fetches
                .load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }

    #[tokio::test]
    async fn test_view_tools_send_table_id_for_table_name() {
        let (d, service) = dispatcher(MockService::with_duplicate_views());
        let listed = d
            .dispatch("list_views", json!({"baseId": "app1", "tableId": "Tasks"}))
            .await;
        assert!(!listed.is_error, "{}", listed.text());

        for (tool, view) in [("get_view_metadata", "Board"), ("delete_view", "viw3")] {
            let result = d
                .dispatch(
                    tool,
                    json!({"baseId": "app1", "tableId": "Tasks", "view": view}),
                )
                .await;
            assert!(!result.is_error, "{tool}: {}", result.text());
            assert_eq!(result.payload()["id"], "viw3");
        }

        let result = d
            .dispatch(
                "fetch",
                json!({"id": "Grid view", "type": "view", "baseId": "app1", "tableId": "Numbers"}),
            )
            .await;
        assert_eq!(result.payload()["id"], "viw9");

        assert_eq!(
            *service.view_requests.lock(),
            vec![
                ("tbl1".to_string(), "viw3".to_string()),
                ("tbl1".to_string(), "viw3".to_string()),
                ("tbl2".to_string(), "viw9".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_view_by_unique_name() {
        let (d, _) = dispatcher(MockService::with_duplicate_views());
        let result = d
            .dispatch(
                "delete_view",
                json!({"baseId": "app1", "tableId": "tbl1", "view": "Board"}),
            )
            .await;
        assert_eq!(result.payload(), json!({"id": "viw3"}));
    }

    #[tokio::test]
    async fn test_create_kanban_view_rejects_text_grouping() {
        let (d, service) = dispatcher(MockService::with_duplicate_views());
        let result = d
            .dispatch(
                "create_view",
                json!({
                    "baseId": "app1",
                    "tableId": "tbl1",
                    "name": "Board 2",
                    "type": "kanban",
                    "groupBy": {"field": "Name"}
                }),
            )
            .await;
        assert!(result.is_error);
        assert!(result
            .text()
            .contains("singleSelect or singleCollaborator"));
        assert!(service.created_views.lock().is_empty());
    }

    #[tokio::test]
    async fn test_create_kanban_view_with_select_grouping() {
        let (d, service) = dispatcher(MockService::with_duplicate_views());
        let result = d
            .dispatch(
                "create_view",
                json!({
                    "baseId": "app1",
                    "tableId": "tbl1",
                    "name": "Board 2",
                    "type": "kanban",
                    "groupBy": {"field": "Status"},
                    "sorts": [{"field": "Name", "direction": "desc"}],
                    "fields": ["Name", "fldStatus"]
                }),
            )
            .await;
        assert!(!result.is_error, "{}", result.text());
        assert_eq!(result.payload()["id"], "viwNEW");

        let created = service.created_views.lock();
        assert_eq!(created.len(), 1);
        assert_eq!(
            created[0].row_grouping_field_id.as_deref(),
            Some("fldStatus")
        );
        assert_eq!(created[0].sorts[0].field_id, "fldName");
        assert_eq!(created[0].field_order_ids, vec!["fldName", "fldStatus"]);
    }

    #[tokio::test]
    async fn test_search_placeholder_and_delegation() {
        let (d, service) = dispatcher(MockService::with_duplicate_views());
        let result = d.dispatch("search", json!({"query": "acme"})).await;
        assert_eq!(
            result.payload(),
            json!({"note": "search placeholder", "query": "acme"})
        );
        assert!(service.calls().is_empty());

        let result = d
            .dispatch(
                "search",
                json!({"query": "acme", "baseId": "app1", "tableId": "tbl1", "view": "Grid"}),
            )
            .await;
        assert!(!result.is_error);
        let searches = service.searches.lock();
        assert_eq!(searches[0].search_term, "acme");
        assert_eq!(searches[0].view.as_deref(), Some("Grid"));
        assert!(searches[0].field_ids.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_variants() {
        let (d, _) = dispatcher(MockService::with_duplicate_views());

        let record = d
            .dispatch(
                "fetch",
                json!({"id": "rec2", "baseId": "app1", "tableId": "tbl1"}),
            )
            .await;
        assert_eq!(record.payload()["id"], "rec2");

        let table = d
            .dispatch(
                "fetch",
                json!({"id": "tbl2", "type": "table", "baseId": "app1"}),
            )
            .await;
        assert_eq!(table.payload()["name"], "Numbers");
        assert_eq!(table.payload()["primaryFieldId"], "fldValue");

        let view = d
            .dispatch(
                "fetch",
                json!({"id": "viw9", "type": "view", "baseId": "app1", "tableId": "tbl2"}),
            )
            .await;
        assert_eq!(view.payload()["id"], "viw9");

        let missing_table = d
            .dispatch(
                "fetch",
                json!({"id": "tblX", "type": "table", "baseId": "app1"}),
            )
            .await;
        assert_eq!(
            missing_table.payload(),
            json!({"note": "fetch placeholder", "id": "tblX", "type": "table"})
        );

        let no_coords = d.dispatch("fetch", json!({"id": "rec1"})).await;
        assert_eq!(
            no_coords.payload(),
            json!({"note": "fetch placeholder", "id": "rec1", "type": "record"})
        );
    }

    #[tokio::test]
    async fn test_update_records_limit() {
        let (d, service) = dispatcher(MockService::with_duplicate_views());
        let records: Vec<Value> = (0..11)
            .map(|i| json!({"id": format!("rec{i}"), "fields": {}}))
            .collect();
        let result = d
            .dispatch(
                "update_records",
                json!({"baseId": "app1", "tableId": "tbl1", "records": records}),
            )
            .await;
        assert!(result.is_error);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_field_uses_nested_definition() {
        let (d, _) = dispatcher(MockService::with_duplicate_views());
        let result = d
            .dispatch(
                "create_field",
                json!({
                    "baseId": "app1",
                    "tableId": "tbl1",
                    "nested": {"field": {"name": "Due", "type": "date", "options": {"dateFormat": {"name": "iso"}}}}
                }),
            )
            .await;
        assert_eq!(
            result.payload(),
            json!({
                "id": "fldNEW",
                "name": "Due",
                "type": "date",
                "options": {"dateFormat": {"name": "iso"}}
            })
        );
    }

    #[tokio::test]
    async fn test_list_views() {
        let (d, _) = dispatcher(MockService::with_duplicate_views());
        let result = d
            .dispatch("list_views", json!({"baseId": "app1", "tableId": "Numbers"}))
            .await;
        assert_eq!(
            result.payload(),
            json!([{"id": "viw9", "name": "Grid view", "type": "grid"}])
        );
    }
}
