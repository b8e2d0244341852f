//! source::mssql
//!
//! SQL Server metadata source backed by tiberius.
//!
//! # Design
//!
//! The planner is synchronous, so the client owns a small current-thread
//! runtime and bridges each catalog query with `block_on`. One instance
//! holds one connection; the engine connects per server alias and reuses
//! the connection for every table on that alias.

use tiberius::{AuthMethod, Client, Config};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::core::config::ServerEnv;

use super::{ColumnInfo, MetadataSource, SourceError};

const COLUMNS_SQL: &str = "\
SELECT
  COLUMN_NAME,
  DATA_TYPE,
  IS_NULLABLE,
  CHARACTER_MAXIMUM_LENGTH,
  NUMERIC_PRECISION,
  NUMERIC_SCALE
FROM INFORMATION_SCHEMA.COLUMNS
WHERE TABLE_SCHEMA = @P1 AND TABLE_NAME = @P2
ORDER BY ORDINAL_POSITION";

const ROW_COUNT_SQL: &str = "\
SELECT SUM(p.row_count) AS row_count
FROM sys.dm_db_partition_stats AS p
JOIN sys.tables t ON p.object_id = t.object_id
JOIN sys.schemas s ON t.schema_id = s.schema_id
WHERE p.index_id IN (0, 1)
  AND s.name = @P1
  AND t.name = @P2";

/// Metadata source reading the SQL Server catalog views.
pub struct MssqlMetadataSource {
    runtime: Runtime,
    client: Client<Compat<TcpStream>>,
}

impl MssqlMetadataSource {
    /// Connect to `database` with credentials resolved from the
    /// environment for one server alias.
    pub fn connect(database: &str, env: &ServerEnv) -> Result<Self, SourceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| SourceError::Runtime { source })?;

        let client = runtime
            .block_on(open_client(database, env))
            .map_err(|source| SourceError::Connect {
                host: env.host.clone(),
                port: env.port,
                source,
            })?;

        Ok(Self { runtime, client })
    }
}

async fn open_client(
    database: &str,
    env: &ServerEnv,
) -> Result<Client<Compat<TcpStream>>, tiberius::error::Error> {
    let mut config = Config::new();
    config.host(&env.host);
    config.port(env.port);
    config.database(database);
    config.authentication(AuthMethod::sql_server(&env.user, &env.password));
    config.trust_cert();

    let tcp = TcpStream::connect(config.get_addr()).await?;
    tcp.set_nodelay(true)?;
    Client::connect(config, tcp.compat_write()).await
}

fn query_err(schema: &str, table: &str, source: tiberius::error::Error) -> SourceError {
    SourceError::Query {
        schema: schema.to_string(),
        table: table.to_string(),
        source,
    }
}

impl MetadataSource for MssqlMetadataSource {
    fn fetch_columns(&mut self, schema: &str, table: &str) -> Result<Vec<ColumnInfo>, SourceError> {
        let client = &mut self.client;
        let rows = self
            .runtime
            .block_on(async {
                let stream = client.query(COLUMNS_SQL, &[&schema, &table]).await?;
                stream.into_first_result().await
            })
            .map_err(|e| query_err(schema, table, e))?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            let name = row
                .try_get::<&str, _>(0)
                .map_err(|e| query_err(schema, table, e))?
                .unwrap_or_default()
                .to_string();
            let data_type = row
                .try_get::<&str, _>(1)
                .map_err(|e| query_err(schema, table, e))?
                .unwrap_or_default()
                .to_string();
            let is_nullable = row
                .try_get::<&str, _>(2)
                .map_err(|e| query_err(schema, table, e))?
                .map(|v| v.eq_ignore_ascii_case("YES"))
                .unwrap_or(false);
            let char_max_length = row
                .try_get::<i32, _>(3)
                .map_err(|e| query_err(schema, table, e))?;
            let numeric_precision = row
                .try_get::<u8, _>(4)
                .map_err(|e| query_err(schema, table, e))?;
            let numeric_scale = row
                .try_get::<i32, _>(5)
                .map_err(|e| query_err(schema, table, e))?;

            columns.push(ColumnInfo {
                name,
                data_type,
                is_nullable,
                char_max_length,
                numeric_precision,
                numeric_scale,
            });
        }

        if columns.is_empty() {
            return Err(SourceError::NoColumns {
                schema: schema.to_string(),
                table: table.to_string(),
            });
        }
        Ok(columns)
    }

    fn fetch_row_count(&mut self, schema: &str, table: &str) -> Result<u64, SourceError> {
        let client = &mut self.client;
        let row = self
            .runtime
            .block_on(async {
                let stream = client.query(ROW_COUNT_SQL, &[&schema, &table]).await?;
                stream.into_row().await
            })
            .map_err(|e| query_err(schema, table, e))?;

        // No partitions (or no such table) sums to NULL.
        let count = match row {
            Some(row) => row
                .try_get::<i64, _>(0)
                .map_err(|e| query_err(schema, table, e))?
                .unwrap_or(0),
            None => 0,
        };
        Ok(count.max(0) as u64)
    }
}
