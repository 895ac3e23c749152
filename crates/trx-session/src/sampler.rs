//! Candidate-row sampling for update and delete targets.

use crate::error::SessionError;
use rand::seq::IndexedRandom;
use rand::Rng;
use tokio_postgres::Client;
use trx_config::DmlLimits;

/// Fetch up to `max(dml_limit, row_limit)` candidate trxids owned by
/// `owner_id`. Order is whatever the store returns.
pub async fn fetch_candidates(
    client: &Client,
    owner_id: i32,
    limits: &DmlLimits,
) -> Result<Vec<i64>, SessionError> {
    let stmt = format!(
        "SELECT trxid FROM trx WHERE userid = $1 FETCH FIRST {} ROWS ONLY",
        limits.fetch_limit()
    );
    let rows = client.query(stmt.as_str(), &[&owner_id]).await?;
    Ok(rows.iter().map(|row| row.get(0)).collect())
}

/// Draw `count` trxids from the pool without replacement. A pool no
/// larger than `count` is returned whole; an empty pool stays empty.
pub fn sample_from_pool<R: Rng + ?Sized>(pool: Vec<i64>, count: usize, rng: &mut R) -> Vec<i64> {
    if pool.len() <= count {
        return pool;
    }
    pool.choose_multiple(rng, count).copied().collect()
}

/// Fetch candidates for `owner_id` and sample `count` of them.
pub async fn sample_trxids(
    client: &Client,
    owner_id: i32,
    count: usize,
    limits: &DmlLimits,
) -> Result<Vec<i64>, SessionError> {
    let pool = fetch_candidates(client, owner_id, limits).await?;
    let mut rng = rand::rng();
    Ok(sample_from_pool(pool, count, &mut rng))
}
