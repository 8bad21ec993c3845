//! Name-or-identifier resolution for tables, fields and views.
//!
//! Callers may reference any of the three entity kinds either by canonical id
//! (recognised by its prefix) or by display name. [`Reference`] makes that
//! choice explicit; one resolver per kind turns it into an id.
//!
//! Table and field names are unique within their parent, view names are not,
//! so only view resolution can be ambiguous.

use tracing::{debug, warn};

use crate::{
    error::{GatewayError, GatewayResult},
    service::AirtableService,
    types::{BaseSchema, Field, ResolvedSort, SortDirection, SortSpec, Table, ViewKind, ViewSpec},
};

pub const KANBAN_GROUPING_MESSAGE: &str =
    "Kanban group-by must be singleSelect or singleCollaborator";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Table,
    Field,
    View,
}

impl EntityKind {
    pub const fn id_prefix(self) -> &'static str {
        match self {
            EntityKind::Table => "tbl",
            EntityKind::Field => "fld",
            EntityKind::View => "viw",
        }
    }
}

/// A caller-supplied reference: canonical id or display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    Id(&'a str),
    Name(&'a str),
}

impl<'a> Reference<'a> {
    pub fn parse(kind: EntityKind, raw: &'a str) -> Self {
        if raw.starts_with(kind.id_prefix()) {
            Reference::Id(raw)
        } else {
            Reference::Name(raw)
        }
    }
}

pub fn resolve_table<'s>(
    schema: &'s BaseSchema,
    base_id: &str,
    table_ref: &str,
) -> GatewayResult<&'s Table> {
    let found = match Reference::parse(EntityKind::Table, table_ref) {
        Reference::Id(id) => schema.tables.iter().find(|t| t.id == id),
        Reference::Name(name) => schema.tables.iter().find(|t| t.name == name),
    };
    found.ok_or_else(|| {
        GatewayError::not_found(format!("Table {table_ref} not found in base {base_id}"))
    })
}

pub fn resolve_field<'t>(table: &'t Table, field_ref: &str) -> GatewayResult<&'t Field> {
    let found = match Reference::parse(EntityKind::Field, field_ref) {
        Reference::Id(id) => table.fields.iter().find(|f| f.id == id),
        Reference::Name(name) => table.fields.iter().find(|f| f.name == name),
    };
    found.ok_or_else(|| {
        GatewayError::not_found(format!("Field {field_ref} not found in table {}", table.id))
    })
}

/// Id-form references pass through unchecked; names are looked up.
pub fn resolve_field_id(table: &Table, field_ref: &str) -> GatewayResult<String> {
    match Reference::parse(EntityKind::Field, field_ref) {
        Reference::Id(id) => Ok(id.to_string()),
        Reference::Name(_) => resolve_field(table, field_ref).map(|f| f.id.clone()),
    }
}

/// Resolve a view name against an already-loaded table.
pub fn resolve_view_in_table(table: &Table, view_ref: &str) -> GatewayResult<String> {
    let name = match Reference::parse(EntityKind::View, view_ref) {
        Reference::Id(id) => return Ok(id.to_string()),
        Reference::Name(name) => name,
    };

    let mut matches = table.views.iter().filter(|v| v.name == name);
    match (matches.next(), matches.next()) {
        (None, _) => Err(GatewayError::not_found(format!(
            "View {name} not found in table {}",
            table.id
        ))),
        (Some(view), None) => {
            debug!(view_name = name, view_id = %view.id, "View name resolved to ID");
            Ok(view.id.clone())
        }
        (Some(_), Some(_)) => {
            warn!(view_name = name, table_id = %table.id, "Ambiguous view name");
            Err(GatewayError::ambiguous_view(name, table.id.clone()))
        }
    }
}

/// Canonical ids of one view and the table holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTarget {
    pub table_id: String,
    pub view_id: String,
}

/// Resolve table and view references to ids. The base schema is read unless
/// both references are already ids.
pub async fn resolve_view(
    service: &dyn AirtableService,
    base_id: &str,
    table_ref: &str,
    view_ref: &str,
) -> GatewayResult<ViewTarget> {
    if let (Reference::Id(table_id), Reference::Id(view_id)) = (
        Reference::parse(EntityKind::Table, table_ref),
        Reference::parse(EntityKind::View, view_ref),
    ) {
        return Ok(ViewTarget {
            table_id: table_id.to_string(),
            view_id: view_id.to_string(),
        });
    }
    let table = service.table_schema(base_id, table_ref).await?;
    let view_id = resolve_view_in_table(&table, view_ref)?;
    Ok(ViewTarget {
        table_id: table.id,
        view_id,
    })
}

/// A view definition as supplied by the caller, references unresolved.
#[derive(Debug, Clone)]
pub struct ViewDraft<'a> {
    pub name: &'a str,
    pub kind: ViewKind,
    pub filter_by_formula: Option<&'a str>,
    pub sorts: &'a [SortSpec],
    pub group_by: Option<&'a str>,
    pub fields: &'a [String],
}

/// Resolve every field reference in `draft` against `table` and check the
/// kanban grouping constraint.
pub fn build_view_spec(table: &Table, draft: &ViewDraft<'_>) -> GatewayResult<ViewSpec> {
    let sorts = draft
        .sorts
        .iter()
        .map(|sort| {
            Ok(ResolvedSort {
                field_id: resolve_field_id(table, &sort.field)?,
                direction: sort.direction.unwrap_or(SortDirection::Asc),
            })
        })
        .collect::<GatewayResult<Vec<_>>>()?;

    let row_grouping_field_id = match draft.group_by {
        Some(field_ref) => {
            let field = resolve_field(table, field_ref)?;
            if draft.kind == ViewKind::Kanban && !field.field_type.is_kanban_groupable() {
                return Err(GatewayError::validation(KANBAN_GROUPING_MESSAGE));
            }
            Some(field.id.clone())
        }
        None if draft.kind == ViewKind::Kanban => {
            return Err(GatewayError::validation(
                "Kanban view requires a groupBy field",
            ));
        }
        None => None,
    };

    let field_order_ids = draft
        .fields
        .iter()
        .map(|field_ref| resolve_field_id(table, field_ref))
        .collect::<GatewayResult<Vec<_>>>()?;

    Ok(ViewSpec {
        name: draft.name.to_string(),
        kind: draft.kind,
        filter_by_formula: draft
            .filter_by_formula
            .filter(|f| !f.is_empty())
            .map(str::to_string),
        sorts,
        row_grouping_field_id,
        field_order_ids,
    })
}
