//! End-to-end load generation against a live PostgreSQL instance.
//!
//! NOTE: Ignored by default because it needs a provisioned instance
//! reachable as `trx/trxpw@localhost:5432/testdb`, with the `trx` and
//! `users` tables from the crate docs and users rows for userids 1..=10.
//! Run with `cargo test -- --ignored` once that is in place.

use std::collections::HashSet;
use std::sync::Arc;
use tokio_postgres::NoTls;
use trx_config::{Config, DmlLimits};
use trx_session::{sampler, Credentials, DmlPacer, TrxSession};
use trx_stress::batch;

const CREDENTIALS: &str = "trx/trxpw@localhost:5432/testdb";

async fn raw_client() -> tokio_postgres::Client {
    let conn_string = Credentials::parse(CREDENTIALS)
        .unwrap()
        .connection_string()
        .unwrap();
    let (client, connection) = tokio_postgres::connect(&conn_string, NoTls)
        .await
        .expect("live test database required");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("connection error: {e}");
        }
    });
    client
}

async fn wipe_owner(client: &tokio_postgres::Client, owner_id: i32) {
    client
        .execute("DELETE FROM trx WHERE userid = $1", &[&owner_id])
        .await
        .unwrap();
}

/// Insert rows for one owner, then sampling returns distinct trxids all
/// owned by that owner.
#[tokio::test]
#[ignore]
async fn test_sampling_returns_owned_rows() {
    tracing_subscriber::fmt()
        .with_env_filter("trx_session=info,trx_stress=info")
        .try_init()
        .ok();

    let owner_id = 7;
    let raw = raw_client().await;
    wipe_owner(&raw, owner_id).await;

    let credentials = Credentials::parse(CREDENTIALS).unwrap();
    let limits = DmlLimits::new(100, 10_000, 100);
    let session = TrxSession::connect(
        &credentials,
        owner_id,
        limits.clone(),
        DmlPacer::disabled(),
        None,
    )
    .await
    .unwrap();

    session.begin().await.unwrap();
    assert_eq!(session.insert_trx(10).await.unwrap(), 10);
    session.commit().await.unwrap();

    let ids = sampler::sample_trxids(&raw, owner_id, 3, &limits)
        .await
        .unwrap();
    assert_eq!(ids.len(), 3);
    let distinct: HashSet<i64> = ids.iter().copied().collect();
    assert_eq!(distinct.len(), 3);

    for trxid in &ids {
        let row = raw
            .query_one("SELECT userid FROM trx WHERE trxid = $1", &[trxid])
            .await
            .unwrap();
        let userid: i32 = row.get(0);
        assert_eq!(userid, owner_id);
    }

    wipe_owner(&raw, owner_id).await;
    session.close();
}

/// A full round against the live store completes with no failures.
#[tokio::test]
#[ignore]
async fn test_single_round_completes() {
    tracing_subscriber::fmt()
        .with_env_filter("trx_session=info,trx_stress=info")
        .try_init()
        .ok();

    let config = Arc::new(Config {
        workers: 3,
        max_insert: 5,
        pause: false,
        ..Config::default()
    });

    let plans = {
        let mut rng = rand::rng();
        batch::build_plans(config.workers, config.max_insert, &mut rng)
    };
    let metrics = batch::run_round(Arc::clone(&config), None, plans).await;

    assert_eq!(metrics.workers, 3);
    assert_eq!(metrics.failures, 0);
}
