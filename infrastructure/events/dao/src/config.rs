use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;
use tracing::info;

#[derive(Debug, serde::Deserialize)]
pub struct PostgresDbConfig {
    pub uri: String,
    #[serde(default = "max_conn_default")]
    pub max_conn: usize,
}

fn max_conn_default() -> usize { 16 }

pub fn connect_postgres_db(
    config: &PostgresDbConfig,
) -> anyhow::Result<Pool> {
    let pg_config: tokio_postgres::Config = config.uri.parse()?;

    info!(postgres.connect = true, max_conn = config.max_conn);

    let manager = Manager::from_config(pg_config, NoTls, ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    let pool = Pool::builder(manager)
        .max_size(config.max_conn)
        .build()?;
    Ok(pool)
}
