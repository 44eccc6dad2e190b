//! Load stage: write every table into the target Postgres schema.
//!
//! Schema reconciliation is idempotent: the fixed DDL script runs on every
//! execution with `CREATE TABLE IF NOT EXISTS` per table, so a partially
//! created schema heals instead of aborting. Each table is then reloaded by
//! truncate-and-insert inside its own transaction; the load is deliberately
//! NOT transactional across tables.

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;

use crate::config::Settings;
use crate::error::LoadResult;
use crate::frame::Frame;

/// All target tables share this prefix.
pub const TABLE_PREFIX: &str = "alk_";

/// Fixed DDL script; `{schema}` is substituted at connect time.
const CREATE_TABLES_SQL: &str = include_str!("../../sql/create_tables.sql");

/// Connection to the target database.
pub struct Database {
    pool: PgPool,
    schema: String,
}

impl Database {
    /// Connect using the environment-derived settings.
    pub async fn connect(settings: &Settings) -> LoadResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&settings.database_url())
            .await?;

        Ok(Self {
            pool,
            schema: settings.schema.clone(),
        })
    }

    /// Ensure the schema and every target table exist.
    pub async fn ensure_schema(&self) -> LoadResult<()> {
        self.pool
            .execute(format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(&self.schema)).as_str())
            .await?;

        let script = CREATE_TABLES_SQL.replace("{schema}", &quote_ident(&self.schema));
        for statement in script.split(';') {
            if statement.trim().is_empty() {
                continue;
            }
            self.pool.execute(statement).await?;
        }

        tracing::info!(schema = %self.schema, "schema ensured");
        Ok(())
    }

    /// Replace the contents of one table with the frame's rows.
    ///
    /// `name` is the dataset name without the `alk_` prefix. Truncate and
    /// inserts run in a single transaction for this table only.
    pub async fn replace_table(&self, name: &str, frame: &Frame) -> LoadResult<()> {
        let qualified = format!(
            "{}.{}",
            quote_ident(&self.schema),
            quote_ident(&table_name(name))
        );

        let mut tx = self.pool.begin().await?;
        tx.execute(format!("TRUNCATE TABLE {}", qualified).as_str())
            .await?;

        if !frame.headers.is_empty() {
            let statement = insert_statement(&qualified, &frame.headers);
            for row in &frame.rows {
                let mut query = sqlx::query(&statement);
                for column in &frame.headers {
                    query = query.bind(value_to_text(row.get(column)));
                }
                query.execute(&mut *tx).await?;
            }
        }

        tx.commit().await?;
        tracing::info!(table = %table_name(name), rows = frame.len(), "table reloaded");
        Ok(())
    }

    /// Load every table in order. A failure partway leaves earlier tables
    /// already replaced.
    pub async fn load_all(&self, tables: &[(String, Frame)]) -> LoadResult<()> {
        for (name, frame) in tables {
            self.replace_table(name, frame).await?;
        }
        Ok(())
    }
}

/// Table name for a dataset: `alk_` + dataset name.
pub fn table_name(dataset: &str) -> String {
    format!("{}{}", TABLE_PREFIX, dataset)
}

/// Double-quote an identifier. All identifiers come from our own standardized
/// vocabulary, so escaping embedded quotes is not a concern.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident)
}

/// Cast needed for a column whose parameter is bound as text.
fn column_cast(column: &str) -> Option<&'static str> {
    match column {
        "totals_cnt" | "sum_pantallas" | "sum_butacas" | "cnt_espacio_incaa" => Some("BIGINT"),
        "dt_loaded" => Some("TIMESTAMPTZ"),
        _ => None,
    }
}

/// Build the parameterized INSERT for a table. Every parameter is bound as
/// text; typed columns get an explicit cast.
fn insert_statement(qualified: &str, columns: &[String]) -> String {
    let column_list: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();

    let placeholders: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| match column_cast(column) {
            Some(cast) => format!("CAST(${} AS {})", i + 1, cast),
            None => format!("${}", i + 1),
        })
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        qualified,
        column_list.join(", "),
        placeholders.join(", ")
    )
}

/// Render a cell for binding. Missing cells and nulls bind as SQL NULL.
fn value_to_text(value: Option<&serde_json::Value>) -> Option<String> {
    match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}
