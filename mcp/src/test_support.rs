//! In-memory [`AirtableService`] for unit tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::{
    error::{GatewayError, GatewayResult},
    service::AirtableService,
    types::*,
};

pub(crate) struct MockService {
    bases: BaseList,
    schemas: HashMap<String, BaseSchema>,
    pub records: Vec<Record>,
    pub schema_fetches: AtomicU32,
    pub calls: Mutex<Vec<String>>,
    pub created_views: Mutex<Vec<ViewSpec>>,
    pub searches: Mutex<Vec<SearchRequest>>,
    /// `(table_id, view_id)` of each view read or delete, as sent upstream.
    pub view_requests: Mutex<Vec<(String, String)>>,
    /// When set, record operations fail with this error.
    pub failure: Option<fn() -> GatewayError>,
}

fn field(id: &str, name: &str, field_type: FieldType) -> Field {
    Field {
        id: id.to_string(),
        name: name.to_string(),
        field_type,
        description: None,
        options: None,
    }
}

fn view(id: &str, name: &str, view_type: &str) -> View {
    View {
        id: id.to_string(),
        name: name.to_string(),
        view_type: view_type.to_string(),
    }
}

fn record(id: &str, name: &str) -> Record {
    let mut fields = FieldSet::new();
    fields.insert("Name".to_string(), json!(name));
    Record {
        id: id.to_string(),
        fields,
    }
}

impl MockService {
    /// Base `app1` with table `tbl1` ("Tasks") holding two views named
    /// "My View" (`viw1`, `viw2`) and a kanban "Board" (`viw3`).
    pub fn with_duplicate_views() -> Self {
        let tasks = Table {
            id: "tbl1".to_string(),
            name: "Tasks".to_string(),
            description: Some("Things to do".to_string()),
            primary_field_id: "fldName".to_string(),
            fields: vec![
                field("fldName", "Name", FieldType::SingleLineText),
                field("fldStatus", "Status", FieldType::SingleSelect),
                field("fldCount", "Count", FieldType::Number),
            ],
            views: vec![
                view("viw1", "My View", "grid"),
                view("viw2", "My View", "grid"),
                view("viw3", "Board", "kanban"),
            ],
        };
        let numbers = Table {
            id: "tbl2".to_string(),
            name: "Numbers".to_string(),
            description: None,
            primary_field_id: "fldValue".to_string(),
            fields: vec![field("fldValue", "Value", FieldType::Number)],
            views: vec![view("viw9", "Grid view", "grid")],
        };

        Self {
            bases: BaseList {
                bases: vec![Base {
                    id: "app1".to_string(),
                    name: "Project Tracker".to_string(),
                    permission_level: "create".to_string(),
                }],
                offset: None,
            },
            schemas: HashMap::from([(
                "app1".to_string(),
                BaseSchema {
                    tables: vec![tasks, numbers],
                },
            )]),
            records: vec![record("rec1", "First"), record("rec2", "Second")],
            schema_fetches: AtomicU32::new(0),
            calls: Mutex::new(Vec::new()),
            created_views: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
            view_requests: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn failing(failure: fn() -> GatewayError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::with_duplicate_views()
        }
    }

    pub fn schema(&self, base_id: &str) -> Arc<BaseSchema> {
        Arc::new(self.schemas[base_id].clone())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn track(&self, call: &str) -> GatewayResult<()> {
        self.calls.lock().push(call.to_string());
        match self.failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}

fn missing() -> GatewayError {
    GatewayError::api(
        404,
        r#"{"error":{"type":"NOT_FOUND"}}"#.to_string(),
        "patTEST",
    )
}

#[async_trait]
impl AirtableService for MockService {
    async fn list_bases(&self) -> GatewayResult<Arc<BaseList>> {
        self.calls.lock().push("list_bases".to_string());
        Ok(Arc::new(self.bases.clone()))
    }

    async fn get_base_schema(&self, base_id: &str) -> GatewayResult<Arc<BaseSchema>> {
        self.schema_fetches.fetch_add(1, Ordering::SeqCst);
        self.schemas
            .get(base_id)
            .cloned()
            .map(Arc::new)
            .ok_or_else(missing)
    }

    async fn list_records(
        &self,
        _base_id: &str,
        _table_id: &str,
        _options: &ListRecordsOptions,
    ) -> GatewayResult<Vec<Record>> {
        self.track("list_records")?;
        Ok(self.records.clone())
    }

    async fn search_records(
        &self,
        _base_id: &str,
        _table_id: &str,
        request: &SearchRequest,
    ) -> GatewayResult<Vec<Record>> {
        self.track("search_records")?;
        self.searches.lock().push(request.clone());
        Ok(self.records.clone())
    }

    async fn get_record(
        &self,
        _base_id: &str,
        _table_id: &str,
        record_id: &str,
    ) -> GatewayResult<Record> {
        self.track("get_record")?;
        self.records
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
            .ok_or_else(missing)
    }

    async fn create_record(
        &self,
        _base_id: &str,
        _table_id: &str,
        fields: FieldSet,
    ) -> GatewayResult<Record> {
        self.track("create_record")?;
        Ok(Record {
            id: "recNEW".to_string(),
            fields,
        })
    }

    async fn update_records(
        &self,
        _base_id: &str,
        _table_id: &str,
        records: Vec<RecordUpdate>,
    ) -> GatewayResult<Vec<Record>> {
        self.track("update_records")?;
        Ok(records
            .into_iter()
            .map(|r| Record {
                id: r.id,
                fields: r.fields,
            })
            .collect())
    }

    async fn delete_records(
        &self,
        _base_id: &str,
        _table_id: &str,
        record_ids: &[String],
    ) -> GatewayResult<Vec<DeletedRecord>> {
        self.track("delete_records")?;
        Ok(record_ids
            .iter()
            .map(|id| DeletedRecord { id: id.clone() })
            .collect())
    }

    async fn create_table(
        &self,
        _base_id: &str,
        name: &str,
        description: Option<&str>,
        fields: Vec<FieldSpec>,
    ) -> GatewayResult<Table> {
        self.track("create_table")?;
        Ok(Table {
            id: "tblNEW".to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            primary_field_id: "fld0".to_string(),
            fields: fields
                .into_iter()
                .enumerate()
                .map(|(i, spec)| field(&format!("fld{i}"), &spec.name, spec.field_type))
                .collect(),
            views: vec![view("viwGRID", "Grid view", "grid")],
        })
    }

    async fn update_table(
        &self,
        base_id: &str,
        table_id: &str,
        update: NameDescriptionUpdate,
    ) -> GatewayResult<Table> {
        self.track("update_table")?;
        let mut table = self.table_schema(base_id, table_id).await?;
        if let Some(name) = update.name {
            table.name = name;
        }
        if let Some(description) = update.description {
            table.description = Some(description);
        }
        Ok(table)
    }

    async fn create_field(
        &self,
        _base_id: &str,
        _table_id: &str,
        spec: FieldSpec,
    ) -> GatewayResult<Field> {
        self.track("create_field")?;
        Ok(Field {
            id: "fldNEW".to_string(),
            name: spec.name,
            field_type: spec.field_type,
            description: spec.description,
            options: spec.options,
        })
    }

    async fn update_field(
        &self,
        _base_id: &str,
        _table_id: &str,
        field_id: &str,
        update: NameDescriptionUpdate,
    ) -> GatewayResult<Field> {
        self.track("update_field")?;
        Ok(Field {
            id: field_id.to_string(),
            name: update.name.unwrap_or_else(|| "Unchanged".to_string()),
            field_type: FieldType::SingleLineText,
            description: update.description,
            options: None,
        })
    }

    async fn get_view_metadata(
        &self,
        _base_id: &str,
        table_id: &str,
        view_id: &str,
    ) -> GatewayResult<Value> {
        self.track("get_view_metadata")?;
        self.view_requests
            .lock()
            .push((table_id.to_string(), view_id.to_string()));
        Ok(json!({"id": view_id, "name": "Resolved", "type": "grid"}))
    }

    async fn create_view(
        &self,
        _base_id: &str,
        _table_id: &str,
        spec: &ViewSpec,
    ) -> GatewayResult<Value> {
        self.track("create_view")?;
        self.created_views.lock().push(spec.clone());
        Ok(json!({"id": "viwNEW", "name": spec.name, "type": spec.kind.as_str()}))
    }

    async fn delete_view(
        &self,
        _base_id: &str,
        table_id: &str,
        view_id: &str,
    ) -> GatewayResult<DeletedView> {
        self.track("delete_view")?;
        self.view_requests
            .lock()
            .push((table_id.to_string(), view_id.to_string()));
        Ok(DeletedView {
            id: view_id.to_string(),
        })
    }
}
