//! Database reachability check

use anyhow::{bail, Result};

use tally_server::{create_pool, TransactionRepo};

use super::resolve_startup;

/// Resolve credentials and run the liveness check once.
pub async fn run_check() -> Result<()> {
    let (settings, connection) = resolve_startup().await?;
    let target = format!(
        "{}@{}:{}/{}",
        connection.user, connection.host, connection.port, connection.database
    );

    let pool = create_pool(&connection, &settings.pool);
    let reachable = TransactionRepo::new(&pool).check_database_connection().await;
    pool.close().await;

    if !reachable {
        bail!("Database unreachable at {}", target);
    }

    println!("Database reachable at {}", target);
    Ok(())
}
