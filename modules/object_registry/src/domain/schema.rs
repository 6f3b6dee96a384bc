//! Schema compiler: field map -> table DDL and index statements

use crate::contract::{
    ColumnDefinition, FieldDefinition, FieldType, RegistryError, SchemaDefinition,
};
use super::naming::{derive_table_name, to_snake_case};
use indexmap::IndexMap;

/// Column name of the implicit primary key
pub const IMPLICIT_PRIMARY_KEY: &str = "id";

/// Table and key column a foreign key points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub table: String,
    pub primary_key: String,
    /// Storage type of the key column, reused by referencing columns
    pub key_type: &'static str,
}

impl TableRef {
    /// Reference derived purely from the class name
    pub fn derived(class_name: &str) -> Self {
        Self {
            table: derive_table_name(class_name),
            primary_key: IMPLICIT_PRIMARY_KEY.to_string(),
            key_type: "INTEGER",
        }
    }

    /// Reference to the key of a known table
    pub fn to_table(table: &str, fields: &IndexMap<String, FieldDefinition>) -> Self {
        let key_type = fields
            .values()
            .find(|f| f.options.primary_key)
            .and_then(|f| sql_type(f.field_type))
            .unwrap_or("INTEGER");
        Self {
            table: table.to_string(),
            primary_key: primary_key_column(fields),
            key_type,
        }
    }
}

/// Storage type for a declared field type; `None` for virtual relations
pub fn sql_type(field_type: FieldType) -> Option<&'static str> {
    match field_type {
        FieldType::Text | FieldType::Json => Some("TEXT"),
        FieldType::Integer | FieldType::Boolean | FieldType::ForeignKey => Some("INTEGER"),
        FieldType::Decimal => Some("REAL"),
        FieldType::DateTime => Some("DATETIME"),
        FieldType::Binary => Some("BLOB"),
        FieldType::OneToMany | FieldType::ManyToMany => None,
    }
}

/// Column name of the primary key for a field map
pub fn primary_key_column(fields: &IndexMap<String, FieldDefinition>) -> String {
    fields
        .values()
        .find(|f| f.options.primary_key)
        .map(|f| to_snake_case(&f.name))
        .unwrap_or_else(|| IMPLICIT_PRIMARY_KEY.to_string())
}

/// Compile a field map into a schema definition.
///
/// `resolve` maps a related class name to the table its foreign keys reference.
pub fn compile(
    class_name: &str,
    table_name: &str,
    fields: &IndexMap<String, FieldDefinition>,
    resolve: &dyn Fn(&str) -> TableRef,
) -> Result<SchemaDefinition, RegistryError> {
    let schema_error = |reason: String| RegistryError::Schema {
        class: class_name.to_string(),
        reason,
    };

    if fields.is_empty() {
        return Err(schema_error(
            "class has no fields; register it with at least one field".to_string(),
        ));
    }

    let explicit_pk = fields.values().find(|f| f.options.primary_key).map(|f| f.name.as_str());

    let mut columns = Vec::with_capacity(fields.len() + 1);
    let mut index_statements = Vec::new();

    if explicit_pk.is_none() {
        columns.push(ColumnDefinition {
            name: IMPLICIT_PRIMARY_KEY.to_string(),
            field: None,
            sql_type: "INTEGER",
            primary_key: true,
            nullable: false,
            references: None,
        });
    }

    for field in fields.values() {
        if field.field_type.is_relational() && field.options.related.is_none() {
            return Err(schema_error(format!(
                "relational field '{}' does not name a related class",
                field.name
            )));
        }

        let Some(mut sql_type) = sql_type(field.field_type) else {
            continue;
        };

        let column = to_snake_case(&field.name);
        let primary_key = explicit_pk == Some(field.name.as_str());

        let references = match (&field.field_type, &field.options.related) {
            (FieldType::ForeignKey, Some(related)) => {
                let target = resolve(related);
                sql_type = target.key_type;
                Some(format!("{}({})", target.table, target.primary_key))
            }
            _ => None,
        };

        if !primary_key {
            if field.options.unique {
                index_statements.push(format!(
                    "CREATE UNIQUE INDEX IF NOT EXISTS uq_{table_name}_{column} ON {table_name} ({column});"
                ));
            } else if field.options.indexed || field.field_type == FieldType::ForeignKey {
                index_statements.push(format!(
                    "CREATE INDEX IF NOT EXISTS idx_{table_name}_{column} ON {table_name} ({column});"
                ));
            }
        }

        columns.push(ColumnDefinition {
            name: column,
            field: Some(field.name.clone()),
            sql_type,
            primary_key,
            nullable: !primary_key && !field.options.required,
            references,
        });
    }

    let column_lines: Vec<String> = columns
        .iter()
        .map(|column| render_column(column, fields))
        .collect();

    let create_table = format!(
        "CREATE TABLE IF NOT EXISTS {table_name} (\n  {}\n);",
        column_lines.join(",\n  ")
    );

    let mut ddl = create_table.clone();
    for statement in &index_statements {
        ddl.push('\n');
        ddl.push_str(statement);
    }

    Ok(SchemaDefinition {
        table_name: table_name.to_string(),
        columns,
        create_table,
        indexes: extract_indexes(&ddl),
        ddl,
    })
}

fn render_column(column: &ColumnDefinition, fields: &IndexMap<String, FieldDefinition>) -> String {
    let mut line = format!("{} {}", column.name, column.sql_type);

    if column.primary_key {
        line.push_str(" PRIMARY KEY");
        if column.field.is_none() {
            line.push_str(" AUTOINCREMENT");
        }
    } else if !column.nullable {
        line.push_str(" NOT NULL");
    }

    if let Some(target) = &column.references {
        line.push_str(" REFERENCES ");
        line.push_str(target);
        let on_delete = column
            .field
            .as_ref()
            .and_then(|name| fields.get(name))
            .and_then(|f| f.options.on_delete);
        if let Some(action) = on_delete {
            line.push_str(" ON DELETE ");
            line.push_str(action.as_sql());
        }
    }

    line
}

/// Index-creation statements found in DDL text, in order
pub fn extract_indexes(ddl: &str) -> Vec<String> {
    ddl.lines()
        .map(str::trim)
        .filter(|line| {
            let upper = line.to_ascii_uppercase();
            upper.starts_with("CREATE INDEX") || upper.starts_with("CREATE UNIQUE INDEX")
        })
        .map(str::to_string)
        .collect()
}
