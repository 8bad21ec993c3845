use serde_json::{json, Map, Value};

use super::args::DetailLevel;
use crate::types::Table;

/// Project a table at the requested detail level.
pub fn project_table(table: &Table, level: DetailLevel) -> Value {
    match level {
        DetailLevel::TableIdentifiersOnly => json!({"id": table.id, "name": table.name}),
        DetailLevel::IdentifiersOnly => json!({
            "id": table.id,
            "name": table.name,
            "fields": table.fields.iter().map(|f| json!({"id": f.id, "name": f.name})).collect::<Vec<_>>(),
            "views": table.views.iter().map(|v| json!({"id": v.id, "name": v.name})).collect::<Vec<_>>(),
        }),
        DetailLevel::Full => {
            let mut out = Map::new();
            out.insert("id".to_string(), json!(table.id));
            out.insert("name".to_string(), json!(table.name));
            if let Some(description) = &table.description {
                out.insert("description".to_string(), json!(description));
            }
            out.insert("fields".to_string(), json!(table.fields));
            out.insert("views".to_string(), json!(table.views));
            Value::Object(out)
        }
    }
}
