//! One database session worth of randomized DML.
//!
//! A [`TrxSession`] owns a single PostgreSQL connection and issues a
//! bounded, randomized mix of inserts, updates and deletes against the
//! `trx` table on behalf of one synthetic user. Update and delete targets
//! are sampled from the rows that user owns; a half-normal [`DmlPacer`]
//! delay runs before every statement.
//!
//! Deliberate bulk-friendly shortcuts (multi-row inserts, prepared
//! statement reuse) are avoided: the point is to create load, not to be
//! efficient about it.

pub mod credentials;
pub mod error;
pub mod pacer;
pub mod sampler;
pub mod session;

pub use credentials::Credentials;
pub use error::SessionError;
pub use pacer::DmlPacer;
pub use session::{TrxSession, ATTR2_VALUES};
