//! A single load-generation session bound to one owner id.

use crate::credentials::Credentials;
use crate::error::SessionError;
use crate::pacer::DmlPacer;
use crate::sampler;
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error, info};
use trx_config::DmlLimits;
use trx_corpus::{WordCorpus, FALLBACK_WORD};

/// Fixed value set for `attr2`; the table carries a matching check
/// constraint.
pub const ATTR2_VALUES: [&str; 4] = ["val1", "val2", "val3", "val4"];

/// One database session issuing randomized DML on behalf of a single
/// synthetic user. Owns its connection exclusively; dropping the session
/// releases it.
pub struct TrxSession {
    owner_id: i32,
    username: String,
    client: Client,
    corpus: Option<Arc<WordCorpus>>,
    limits: DmlLimits,
    pacer: DmlPacer,
}

impl TrxSession {
    /// Connect a session for `owner_id`.
    ///
    /// The connection is probed with `SELECT 1` and the session's
    /// username is resolved from the users table before any DML runs.
    pub async fn connect(
        credentials: &Credentials,
        owner_id: i32,
        limits: DmlLimits,
        pacer: DmlPacer,
        corpus: Option<Arc<WordCorpus>>,
    ) -> Result<Self, SessionError> {
        let conn_string = credentials.connection_string()?;
        let (client, connection) = tokio_postgres::connect(&conn_string, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("postgres connection error: {e}");
            }
        });

        client.simple_query("SELECT 1").await?;

        let username = lookup_username(&client, owner_id).await?;
        debug!(owner_id, %username, "session connected");

        Ok(Self {
            owner_id,
            username,
            client,
            corpus,
            limits,
            pacer,
        })
    }

    /// Alternate constructor taking the credential parts separately.
    pub async fn from_login(
        username: &str,
        password: &str,
        datasource: &str,
        owner_id: i32,
        limits: DmlLimits,
        pacer: DmlPacer,
        corpus: Option<Arc<WordCorpus>>,
    ) -> Result<Self, SessionError> {
        let credentials = Credentials::from_parts(username, password, datasource);
        Self::connect(&credentials, owner_id, limits, pacer, corpus).await
    }

    pub fn owner_id(&self) -> i32 {
        self.owner_id
    }

    /// Name of the users row this session acts on behalf of.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Open the session transaction.
    pub async fn begin(&self) -> Result<(), SessionError> {
        self.client.batch_execute("BEGIN").await?;
        Ok(())
    }

    /// Insert up to `cnt` rows, one statement per row, pacing before
    /// each. Returns the executed count after clamping.
    pub async fn insert_trx(&self, cnt: u32) -> Result<u32, SessionError> {
        let cnt = self.limits.clamp(cnt);
        info!("{} inserting {}", self.username, cnt);

        let stmt = "INSERT INTO trx (attr1, attr2, userid, created) VALUES ($1, $2, $3, now())";
        for _ in 0..cnt {
            let (attr1, attr2) = {
                let mut rng = rand::rng();
                let attr1 = match &self.corpus {
                    Some(corpus) => corpus.choose(&mut rng).to_string(),
                    None => FALLBACK_WORD.to_string(),
                };
                (attr1, choose_attr2(&mut rng))
            };
            self.pacer.delay().await;
            self.client
                .execute(stmt, &[&attr1, &attr2, &self.owner_id])
                .await?;
        }
        Ok(cnt)
    }

    /// Update up to `cnt` rows, sampling one candidate trxid per
    /// statement. Stops early when the owner has no rows left to pick.
    /// Returns the number of updates executed.
    pub async fn update_trx(&self, cnt: u32) -> Result<u32, SessionError> {
        let cnt = self.limits.clamp(cnt);
        info!("{} updating {}", self.username, cnt);

        let stmt = "UPDATE trx SET attr2 = $1, updated = now() WHERE trxid = $2";
        let mut updated = 0;
        for _ in 0..cnt {
            let ids = sampler::sample_trxids(&self.client, self.owner_id, 1, &self.limits).await?;
            let Some(trxid) = ids.first().copied() else {
                debug!(owner_id = self.owner_id, "no candidate rows to update");
                break;
            };
            let attr2 = {
                let mut rng = rand::rng();
                choose_attr2(&mut rng)
            };
            self.pacer.delay().await;
            self.client.execute(stmt, &[&attr2, &trxid]).await?;
            updated += 1;
        }
        Ok(updated)
    }

    /// Delete up to `cnt` sampled rows in one batched statement, pacing
    /// once before it. Returns the number of trxids targeted.
    pub async fn delete_trx(&self, cnt: u32) -> Result<u32, SessionError> {
        let cnt = self.limits.clamp(cnt);
        info!("{} deleting {}", self.username, cnt);

        let trxids =
            sampler::sample_trxids(&self.client, self.owner_id, cnt as usize, &self.limits).await?;
        if trxids.is_empty() {
            debug!(owner_id = self.owner_id, "no candidate rows to delete");
            return Ok(0);
        }

        // unlike insert/update, the whole delete runs as one statement
        self.pacer.delay().await;
        self.client
            .execute("DELETE FROM trx WHERE trxid = ANY($1)", &[&trxids])
            .await?;
        Ok(trxids.len() as u32)
    }

    /// Commit the session transaction. Never paced.
    pub async fn commit(&self) -> Result<(), SessionError> {
        self.client.batch_execute("COMMIT").await?;
        Ok(())
    }

    /// Release the connection. Dropping the client ends the spawned
    /// driver task; failure paths that drop the session get the same
    /// guarantee.
    pub fn close(self) {}
}

impl fmt::Display for TrxSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trx table DML with userid={}", self.owner_id)
    }
}

async fn lookup_username(client: &Client, owner_id: i32) -> Result<String, SessionError> {
    let row = client
        .query_opt("SELECT name FROM users WHERE userid = $1", &[&owner_id])
        .await?
        .ok_or(SessionError::UnknownUser(owner_id))?;
    Ok(row.get(0))
}

fn choose_attr2<R: Rng + ?Sized>(rng: &mut R) -> String {
    ATTR2_VALUES[rng.random_range(0..ATTR2_VALUES.len())].to_string()
}
