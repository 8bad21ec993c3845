//! HTTP gateway to the Airtable REST API.
//!
//! Every request goes through [`RetryPolicy::run`]; bases and schemas are read
//! through [`SchemaCache`]. Schema writes invalidate the touched base.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use url::Url;

use super::{
    cache::SchemaCache, config::GatewayConfig, metrics::GatewayMetrics, retry::RetryPolicy,
    search,
};
use crate::{
    error::{GatewayError, GatewayResult},
    service::AirtableService,
    types::{
        BaseList, BaseSchema, DeletedBatch, DeletedRecord, DeletedView, Field, FieldSet,
        FieldSpec, ListRecordsOptions, NameDescriptionUpdate, Record, RecordBatch, RecordPage,
        RecordUpdate, SearchRequest, Table, ViewKind, ViewSpec,
    },
};

fn build_request_headers(api_key: &str) -> GatewayResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut auth: HeaderValue = format!("Bearer {api_key}")
        .parse()
        .map_err(|_| GatewayError::Config("API key contains invalid characters".to_string()))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn build_http_client(config: &GatewayConfig) -> GatewayResult<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .default_headers(build_request_headers(&config.api_key)?)
        .build()
        .map_err(GatewayError::from)
}

/// Request body for view creation.
pub fn view_request_body(spec: &ViewSpec) -> Value {
    let mut configuration = Map::new();
    if let Some(formula) = &spec.filter_by_formula {
        configuration.insert("filters".to_string(), json!({ "formula": formula }));
    }
    if !spec.sorts.is_empty() {
        configuration.insert("sorts".to_string(), json!(spec.sorts));
    }
    if !spec.field_order_ids.is_empty() {
        configuration.insert(
            "fieldOrder".to_string(),
            json!({ "fieldIds": spec.field_order_ids, "lockedFields": [] }),
        );
    }
    if let Some(field_id) = &spec.row_grouping_field_id {
        configuration.insert("rowGrouping".to_string(), json!({ "fieldId": field_id }));
    }
    json!({
        "type": spec.kind.as_str(),
        "name": spec.name,
        "configuration": configuration,
    })
}

pub struct AirtableClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    retry: RetryPolicy,
    cache: SchemaCache,
    metrics: Arc<GatewayMetrics>,
}

impl AirtableClient {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        Self::with_metrics(config, Arc::new(GatewayMetrics::new()))
    }

    pub fn with_metrics(config: GatewayConfig, metrics: Arc<GatewayMetrics>) -> GatewayResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            GatewayError::Config(format!("invalid base URL {}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Config(format!(
                "base URL {} cannot carry a path",
                config.base_url
            )));
        }

        Ok(Self {
            http: build_http_client(&config)?,
            base_url,
            retry: config.retry,
            cache: SchemaCache::new(config.cache_ttl, Arc::clone(&metrics)),
            api_key: config.api_key,
            metrics,
        })
    }

    pub fn metrics(&self) -> &Arc<GatewayMetrics> {
        &self.metrics
    }

    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("v0").extend(segments);
        }
        url
    }

    fn meta_endpoint(&self, base_id: &str, rest: &[&str]) -> Url {
        let mut segments = vec!["meta", "bases", base_id, "tables"];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> GatewayResult<T> {
        let label = format!("{method} {}", url.path());
        self.retry
            .run(&label, |attempt| {
                let mut request = self.http.request(method.clone(), url.clone());
                if let Some(body) = &body {
                    request = request.json(body);
                }
                async move {
                    self.metrics.record_upstream_attempt(attempt);
                    let response = request.send().await?;
                    let status = response.status();
                    let text = response.text().await?;
                    if !status.is_success() {
                        return Err(GatewayError::api(status.as_u16(), text, &self.api_key));
                    }
                    serde_json::from_str(&text)
                        .map_err(|e| GatewayError::ResponseShape(e.to_string()))
                }
            })
            .await
            .inspect_err(|_| self.metrics.record_upstream_failure())
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> GatewayResult<T> {
        self.execute(Method::GET, url, None).await
    }

    async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> GatewayResult<T> {
        let body = serde_json::to_value(body)
            .map_err(|e| GatewayError::validation(format!("Invalid request body: {e}")))?;
        self.execute(method, url, Some(body)).await
    }

    async fn fetch_schema(&self, base_id: &str) -> GatewayResult<BaseSchema> {
        debug!(base_id, "Fetching base schema");
        self.get(self.meta_endpoint(base_id, &[])).await
    }
}

#[async_trait]
impl AirtableService for AirtableClient {
    async fn list_bases(&self) -> GatewayResult<Arc<BaseList>> {
        self.cache
            .bases_or_fetch(|| self.get::<BaseList>(self.endpoint(&["meta", "bases"])))
            .await
    }

    async fn get_base_schema(&self, base_id: &str) -> GatewayResult<Arc<BaseSchema>> {
        self.cache
            .schema_or_fetch(base_id, || self.fetch_schema(base_id))
            .await
    }

    async fn list_records(
        &self,
        base_id: &str,
        table_id: &str,
        options: &ListRecordsOptions,
    ) -> GatewayResult<Vec<Record>> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let mut url = self.endpoint(&[base_id, table_id]);
            {
                let mut query = url.query_pairs_mut();
                if let Some(max) = options.max_records.filter(|m| *m > 0) {
                    query.append_pair("maxRecords", &max.to_string());
                }
                if let Some(formula) = options.filter_by_formula.as_deref().filter(|f| !f.is_empty()) {
                    query.append_pair("filterByFormula", formula);
                }
                if let Some(view) = options.view.as_deref() {
                    query.append_pair("view", view);
                }
                if let Some(offset) = offset.as_deref() {
                    query.append_pair("offset", offset);
                }
                for (i, sort) in options.sort.iter().enumerate() {
                    query.append_pair(&format!("sort[{i}][field]"), &sort.field);
                    if let Some(direction) = sort.direction {
                        query.append_pair(&format!("sort[{i}][direction]"), direction.as_str());
                    }
                }
            }

            let page: RecordPage = self.get(url).await?;
            pages += 1;
            records.extend(page.records);
            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        debug!(base_id, table_id, pages, count = records.len(), "Listed records");
        Ok(records)
    }

    async fn search_records(
        &self,
        base_id: &str,
        table_id: &str,
        request: &SearchRequest,
    ) -> GatewayResult<Vec<Record>> {
        let table = self.table_schema(base_id, table_id).await?;
        let field_ids = search::search_field_ids(&table, &request.field_ids)?;
        let options = ListRecordsOptions {
            max_records: request.max_records,
            filter_by_formula: Some(search::search_formula(&request.search_term, &field_ids)),
            view: request.view.clone(),
            sort: Vec::new(),
        };
        self.list_records(base_id, table_id, &options).await
    }

    async fn get_record(
        &self,
        base_id: &str,
        table_id: &str,
        record_id: &str,
    ) -> GatewayResult<Record> {
        self.get(self.endpoint(&[base_id, table_id, record_id])).await
    }

    async fn create_record(
        &self,
        base_id: &str,
        table_id: &str,
        fields: FieldSet,
    ) -> GatewayResult<Record> {
        self.send(
            Method::POST,
            self.endpoint(&[base_id, table_id]),
            &json!({ "fields": fields }),
        )
        .await
    }

    async fn update_records(
        &self,
        base_id: &str,
        table_id: &str,
        records: Vec<RecordUpdate>,
    ) -> GatewayResult<Vec<Record>> {
        let batch: RecordBatch = self
            .send(
                Method::PATCH,
                self.endpoint(&[base_id, table_id]),
                &json!({ "records": records }),
            )
            .await?;
        Ok(batch.records)
    }

    async fn delete_records(
        &self,
        base_id: &str,
        table_id: &str,
        record_ids: &[String],
    ) -> GatewayResult<Vec<DeletedRecord>> {
        let mut url = self.endpoint(&[base_id, table_id]);
        url.query_pairs_mut()
            .extend_pairs(record_ids.iter().map(|id| ("records[]", id.as_str())));
        let batch: DeletedBatch = self.execute(Method::DELETE, url, None).await?;
        Ok(batch
            .records
            .into_iter()
            .map(|entry| DeletedRecord { id: entry.id })
            .collect())
    }

    async fn create_table(
        &self,
        base_id: &str,
        name: &str,
        description: Option<&str>,
        fields: Vec<FieldSpec>,
    ) -> GatewayResult<Table> {
        let mut body = json!({ "name": name, "fields": fields });
        if let Some(description) = description {
            body["description"] = json!(description);
        }
        let table: Table = self
            .send(Method::POST, self.meta_endpoint(base_id, &[]), &body)
            .await?;
        self.cache.invalidate_schema(base_id);
        info!(base_id, table_id = %table.id, "Created table");
        Ok(table)
    }

    async fn update_table(
        &self,
        base_id: &str,
        table_id: &str,
        update: NameDescriptionUpdate,
    ) -> GatewayResult<Table> {
        let table: Table = self
            .send(Method::PATCH, self.meta_endpoint(base_id, &[table_id]), &update)
            .await?;
        self.cache.invalidate_schema(base_id);
        Ok(table)
    }

    async fn create_field(
        &self,
        base_id: &str,
        table_id: &str,
        field: FieldSpec,
    ) -> GatewayResult<Field> {
        let created: Field = self
            .send(
                Method::POST,
                self.meta_endpoint(base_id, &[table_id, "fields"]),
                &field,
            )
            .await?;
        self.cache.invalidate_schema(base_id);
        Ok(created)
    }

    async fn update_field(
        &self,
        base_id: &str,
        table_id: &str,
        field_id: &str,
        update: NameDescriptionUpdate,
    ) -> GatewayResult<Field> {
        let field: Field = self
            .send(
                Method::PATCH,
                self.meta_endpoint(base_id, &[table_id, "fields", field_id]),
                &update,
            )
            .await?;
        self.cache.invalidate_schema(base_id);
        Ok(field)
    }

    async fn get_view_metadata(
        &self,
        base_id: &str,
        table_id: &str,
        view_id: &str,
    ) -> GatewayResult<Value> {
        self.get(self.meta_endpoint(base_id, &[table_id, "views", view_id]))
            .await
    }

    async fn create_view(
        &self,
        base_id: &str,
        table_id: &str,
        spec: &ViewSpec,
    ) -> GatewayResult<Value> {
        if spec.kind == ViewKind::Kanban && spec.row_grouping_field_id.is_none() {
            return Err(GatewayError::validation(
                "Kanban view requires a row grouping field",
            ));
        }
        let view: Value = self
            .send(
                Method::POST,
                self.meta_endpoint(base_id, &[table_id, "views"]),
                &view_request_body(spec),
            )
            .await?;
        self.cache.invalidate_schema(base_id);
        info!(base_id, table_id, view_id = ?view.get("id"), "Created view");
        Ok(view)
    }

    async fn delete_view(
        &self,
        base_id: &str,
        table_id: &str,
        view_id: &str,
    ) -> GatewayResult<DeletedView> {
        let response: Value = self
            .execute(
                Method::DELETE,
                self.meta_endpoint(base_id, &[table_id, "views", view_id]),
                None,
            )
            .await?;
        self.cache.invalidate_schema(base_id);
        let id = response
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or(view_id)
            .to_string();
        info!(base_id, table_id, view_id = %id, "Deleted view");
        Ok(DeletedView { id })
    }
}

impl std::fmt::Debug for AirtableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .field("cache_ttl", &self.cache.ttl())
            .finish_non_exhaustive()
    }
}
