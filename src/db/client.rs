use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tokio_postgres::{Client, NoTls, Row};
use tracing::{error, info};

use crate::db::{ColumnInfo, SchemaInfo};
use crate::models::TableData;

pub struct Database {
    client: Client,
}

// Helper function to convert PostgreSQL values to strings
fn row_value_to_string(row: &Row, idx: usize) -> String {
    // Try various types in order

    // String/text types
    if let Ok(val) = row.try_get::<_, String>(idx) {
        return val;
    }

    // Integer types
    if let Ok(val) = row.try_get::<_, i32>(idx) {
        return val.to_string();
    }
    if let Ok(val) = row.try_get::<_, i64>(idx) {
        return val.to_string();
    }
    if let Ok(val) = row.try_get::<_, i16>(idx) {
        return val.to_string();
    }

    // Floating point types
    if let Ok(val) = row.try_get::<_, f32>(idx) {
        return val.to_string();
    }
    if let Ok(val) = row.try_get::<_, f64>(idx) {
        return val.to_string();
    }

    // Boolean
    if let Ok(val) = row.try_get::<_, bool>(idx) {
        return val.to_string();
    }

    // UUID
    if let Ok(val) = row.try_get::<_, uuid::Uuid>(idx) {
        return val.to_string();
    }

    // Date and timestamp types
    if let Ok(val) = row.try_get::<_, NaiveDate>(idx) {
        return val.to_string();
    }
    if let Ok(val) = row.try_get::<_, NaiveDateTime>(idx) {
        return val.to_string();
    }
    if let Ok(val) = row.try_get::<_, DateTime<Utc>>(idx) {
        return val.to_string();
    }

    // JSON types
    if let Ok(val) = row.try_get::<_, serde_json::Value>(idx) {
        return val.to_string();
    }

    // Byte arrays
    if let Ok(val) = row.try_get::<_, Vec<u8>>(idx) {
        return format!("<{} bytes>", val.len());
    }

    "(NULL)".to_string()
}

fn rows_to_strings(rows: &[Row]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| (0..row.len()).map(|i| row_value_to_string(row, i)).collect())
        .collect()
}

/// Double-quotes an identifier for interpolation into SQL.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl Database {
    pub async fn connect(connection_string: &str, use_tls: bool) -> Result<Self> {
        let client = if use_tls {
            let connector = native_tls::TlsConnector::builder().build()?;
            let connector = postgres_native_tls::MakeTlsConnector::new(connector);
            let (client, connection) = tokio_postgres::connect(connection_string, connector).await?;
            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    error!("Database connection error: {}", e);
                }
            });
            client
        } else {
            let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;
            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    error!("Database connection error: {}", e);
                }
            });
            client
        };

        info!(tls = use_tls, "connected to database");
        Ok(Database { client })
    }

    pub async fn list_schemas_with_tables(&self) -> Result<Vec<SchemaInfo>> {
        // Get all tables grouped by schema in a single query
        let rows = self
            .client
            .query(
                "SELECT table_schema, table_name
                 FROM information_schema.tables
                 WHERE table_schema NOT IN ('pg_catalog', 'information_schema', 'pg_toast')
                 AND table_type IN ('BASE TABLE', 'VIEW')
                 ORDER BY table_schema, table_name",
                &[],
            )
            .await?;

        let mut schemas_map: std::collections::BTreeMap<String, Vec<String>> = std::collections::BTreeMap::new();

        for row in rows {
            let schema: String = row.get(0);
            let table: String = row.get(1);
            schemas_map.entry(schema).or_default().push(table);
        }

        let mut result: Vec<SchemaInfo> = schemas_map
            .into_iter()
            .map(|(name, tables)| SchemaInfo { name, tables })
            .collect();

        // If no schemas found, ensure public schema exists
        if result.is_empty() {
            result.push(SchemaInfo {
                name: "public".to_string(),
                tables: vec![],
            });
        }

        Ok(result)
    }

    pub async fn query_table(&self, schema: &str, table: &str, limit: i64) -> Result<TableData> {
        let column_rows = self
            .client
            .query(
                "SELECT c.column_name, c.udt_name
                 FROM information_schema.columns c
                 WHERE c.table_schema = $1 AND c.table_name = $2
                 ORDER BY c.ordinal_position",
                &[&schema, &table],
            )
            .await?;

        let key_rows = self
            .client
            .query(
                "SELECT kcu.column_name, tc.constraint_type
                 FROM information_schema.table_constraints tc
                 JOIN information_schema.key_column_usage kcu
                     ON tc.constraint_name = kcu.constraint_name
                     AND tc.table_schema = kcu.table_schema
                 WHERE tc.constraint_type IN ('PRIMARY KEY', 'FOREIGN KEY')
                     AND tc.table_schema = $1
                     AND tc.table_name = $2",
                &[&schema, &table],
            )
            .await?;

        let has_key = |name: &str, kind: &str| {
            key_rows.iter().any(|row| {
                row.get::<_, String>(0) == name && row.get::<_, String>(1) == kind
            })
        };

        let columns: Vec<ColumnInfo> = column_rows
            .iter()
            .map(|row| {
                let name: String = row.get(0);
                ColumnInfo {
                    is_primary_key: has_key(&name, "PRIMARY KEY"),
                    is_foreign_key: has_key(&name, "FOREIGN KEY"),
                    data_type: row.get(1),
                    name,
                }
            })
            .collect();

        let data_query = format!(
            "SELECT * FROM {}.{} LIMIT {}",
            quote_ident(schema),
            quote_ident(table),
            limit.max(0)
        );
        let rows = self.client.query(&data_query, &[]).await?;

        Ok(TableData {
            name: format!("{}.{}", schema, table),
            columns,
            rows: rows_to_strings(&rows),
        })
    }

    pub async fn execute_query(&self, query: &str) -> Result<TableData> {
        let statement = self.client.prepare(query).await?;
        let rows = self.client.query(&statement, &[]).await?;

        // For generic queries, we only have basic column info
        let columns: Vec<ColumnInfo> = statement
            .columns()
            .iter()
            .map(|col| ColumnInfo {
                name: col.name().to_string(),
                data_type: col.type_().name().to_string(),
                is_primary_key: false,
                is_foreign_key: false,
            })
            .collect();

        Ok(TableData {
            name: "Query Result".to_string(),
            columns,
            rows: rows_to_strings(&rows),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("courses"), "\"courses\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
