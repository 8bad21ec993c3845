//! Table schemas exposed as readable resources.
//!
//! Each table of each accessible base is one resource at
//! `airtable://{baseId}/{tableId}/schema`.

use futures::future::try_join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::{
    error::{GatewayError, GatewayResult},
    service::AirtableService,
    tools::JSON_MIME_TYPE,
};

static SCHEMA_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^airtable://([^/]+)/([^/]+)/schema$").expect("schema URI pattern is valid")
});

pub fn schema_uri(base_id: &str, table_id: &str) -> String {
    format!("airtable://{base_id}/{table_id}/schema")
}

/// Split a schema URI into `(base_id, table_id)`.
pub fn parse_schema_uri(uri: &str) -> Option<(&str, &str)> {
    let caps = SCHEMA_URI.captures(uri)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri: String,
    pub mime_type: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// One descriptor per table across every accessible base.
///
/// Schemas of different bases are fetched concurrently.
pub async fn list_resources(
    service: &dyn AirtableService,
) -> GatewayResult<Vec<ResourceDescriptor>> {
    debug!("Handling list_resources request");
    let bases = service.list_bases().await?;
    let per_base = try_join_all(bases.bases.iter().map(|base| async move {
        let schema = service.get_base_schema(&base.id).await?;
        Ok::<_, GatewayError>(
            schema
                .tables
                .iter()
                .map(|table| ResourceDescriptor {
                    uri: schema_uri(&base.id, &table.id),
                    mime_type: JSON_MIME_TYPE.to_string(),
                    name: format!("{}: {} schema", base.name, table.name),
                })
                .collect::<Vec<_>>(),
        )
    }))
    .await?;
    Ok(per_base.into_iter().flatten().collect())
}

pub async fn read_resource(
    service: &dyn AirtableService,
    uri: &str,
) -> GatewayResult<ResourceContent> {
    debug!(uri, "Handling read_resource request");
    let (base_id, table_id) = parse_schema_uri(uri)
        .ok_or_else(|| GatewayError::validation(format!("Invalid resource URI: {uri}")))?;

    let schema = service.get_base_schema(base_id).await?;
    let table = schema.table(table_id).ok_or_else(|| {
        GatewayError::not_found(format!("Table {table_id} not found in base {base_id}"))
    })?;

    let mut text = json!({
        "baseId": base_id,
        "tableId": table.id,
        "name": table.name,
        "primaryFieldId": table.primary_field_id,
        "fields": table.fields,
        "views": table.views,
    });
    if let Some(description) = &table.description {
        text["description"] = json!(description);
    }

    Ok(ResourceContent {
        uri: uri.to_string(),
        mime_type: JSON_MIME_TYPE.to_string(),
        text: text.to_string(),
    })
}
