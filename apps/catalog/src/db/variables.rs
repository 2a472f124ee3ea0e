//! Variable source backed by configurable SQL queries

use crate::config::{ReaderConfig, VariableQueryConfig};
use crate::reader::{Values, VariableSource};
use crate::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

/// Loads variables by running the configured queries with `$1` bound to the
/// record identifier. Only queries feeding at least one requested variable
/// are run.
#[derive(Clone)]
pub struct PostgresVariableSource {
    pool: PgPool,
    identifier_query: String,
    queries: Vec<VariableQueryConfig>,
}

impl PostgresVariableSource {
    pub fn new(
        pool: PgPool,
        identifier_query: impl Into<String>,
        queries: Vec<VariableQueryConfig>,
    ) -> Self {
        Self {
            pool,
            identifier_query: identifier_query.into(),
            queries,
        }
    }

    pub fn from_config(pool: PgPool, config: &ReaderConfig) -> Self {
        Self::new(pool, config.identifier_query.clone(), config.queries.clone())
    }
}

#[async_trait]
impl VariableSource for PostgresVariableSource {
    async fn load_values(&self, identifier: &str, variables: &[String]) -> Result<Values> {
        let mut values = Values::new();

        for query in &self.queries {
            if !query.variables.iter().any(|v| variables.contains(v)) {
                continue;
            }

            let rows = sqlx::query(&query.sql)
                .bind(identifier)
                .fetch_all(&self.pool)
                .await
                .map_err(crate::Error::Database)?;

            for row in rows {
                for (i, variable) in query.variables.iter().enumerate() {
                    if !variables.contains(variable) {
                        continue;
                    }
                    let value: Option<String> =
                        row.try_get(i).map_err(crate::Error::Database)?;
                    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                        values.push(variable.clone(), value);
                    }
                }
            }
        }

        Ok(values)
    }

    async fn list_identifiers(&self) -> Result<Vec<String>> {
        let identifiers: Vec<String> = sqlx::query_scalar(&self.identifier_query)
            .fetch_all(&self.pool)
            .await
            .map_err(crate::Error::Database)?;
        Ok(identifiers)
    }
}
