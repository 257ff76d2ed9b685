//! One-time offline repair tool: infer threat classes for legacy alert rows.
//!
//! Early deployments recorded alerts without a usable threat class. This
//! tool re-derives the class from each row's label with the same substring
//! rules the live classifier uses, and rewrites only rows still marked
//! "other". It is deliberately separate from the pipeline: nothing in the
//! running system ever updates an alert row.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vigil_classify::infer_threat_from_label;
use vigil_models::ThreatClass;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true))
        .with(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VIGIL_DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite://vigil.db".to_string());

    info!(url = %url, "opening alert database");
    let options = SqliteConnectOptions::from_str(&url)?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    let rows: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, label FROM alerts WHERE threat = 'other'")
            .fetch_all(&pool)
            .await?;

    info!(candidates = rows.len(), "scanning unclassified alerts");

    let mut updated = 0u64;
    for (id, label) in rows {
        let inferred = infer_threat_from_label(&label);
        if inferred == ThreatClass::Other {
            continue;
        }
        let result = sqlx::query("UPDATE alerts SET threat = ? WHERE id = ? AND threat = 'other'")
            .bind(inferred.as_str())
            .bind(id)
            .execute(&pool)
            .await?;
        if result.rows_affected() > 0 {
            updated += 1;
        } else {
            warn!(id, "row changed underneath us; left untouched");
        }
    }

    info!(updated, "backfill complete");
    Ok(())
}
