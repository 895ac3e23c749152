//! One worker session: connect, run the planned DML mix, commit, close.

use crate::batch::BatchPlan;
use std::sync::Arc;
use tracing::error;
use trx_config::Config;
use trx_corpus::WordCorpus;
use trx_session::{Credentials, DmlPacer, SessionError, TrxSession};

/// Run a single session through its plan.
///
/// A connection failure aborts the session before any DML and leaves
/// sibling sessions untouched. A statement failure skips the rest of the
/// plan but still attempts the commit; nothing is rolled back, so work
/// that succeeded before the failure may persist. The connection is
/// released on every path.
pub async fn run_worker(
    config: Arc<Config>,
    corpus: Option<Arc<WordCorpus>>,
    plan: BatchPlan,
) -> Result<(), SessionError> {
    let credentials = match Credentials::parse(&config.credentials) {
        Ok(credentials) => credentials,
        Err(e) => {
            error!(owner_id = plan.owner_id, "bad credential string: {e}");
            return Err(e);
        }
    };
    let pacer = DmlPacer::new(config.sleep_std_ms, config.pause);

    let session = match TrxSession::connect(
        &credentials,
        plan.owner_id,
        config.limits.clone(),
        pacer,
        corpus,
    )
    .await
    {
        Ok(session) => session,
        Err(e) => {
            error!(owner_id = plan.owner_id, "unable to connect as {credentials}: {e}");
            return Err(e);
        }
    };

    let dml_result = run_dml(&session, &plan).await;
    if let Err(e) = &dml_result {
        error!(
            owner_id = plan.owner_id,
            "dml failed, committing what succeeded: {e}"
        );
    }

    let commit_result = session.commit().await;
    if let Err(e) = &commit_result {
        error!(owner_id = plan.owner_id, "commit failed: {e}");
    }
    session.close();

    dml_result.and(commit_result)
}

async fn run_dml(session: &TrxSession, plan: &BatchPlan) -> Result<(), SessionError> {
    session.begin().await?;
    session.insert_trx(plan.insert_cnt).await?;
    session.update_trx(plan.update_cnt).await?;
    session.delete_trx(plan.delete_cnt).await?;
    Ok(())
}
