//! trx-stress: randomized DML load against a PostgreSQL `trx` table.
//!
//! Each batch round fans out one worker session per synthetic user.
//! Every session owns its own connection and issues a bounded,
//! randomized mix of inserts, updates and deletes, with a half-normal
//! pacing delay before each statement. Rounds are separated by a strict
//! barrier and a uniform random pause.
//!
//! The target table is created out of band:
//!
//! ```text
//! create table trx (
//!     trxid bigint generated by default as identity,
//!     attr1 varchar(30),
//!     attr2 varchar(20),
//!     userid int,
//!     created timestamptz,
//!     updated timestamptz,
//!     constraint trx_pk primary key (trxid),
//!     constraint trx_nn_attr1 check (attr1 is not null),
//!     constraint trx_ck_attr2 check (attr2 in ('val1','val2','val3','val4')),
//!     constraint trx_nn_created check (created is not null),
//!     constraint trx_fk_user foreign key (userid) references users (userid)
//! );
//! ```
//!
//! Owner ids reference a `users (userid int primary key, name varchar)`
//! table; each session resolves its username from there at connect time.

pub mod batch;
pub mod worker;

pub use batch::{run_round, run_rounds, BatchPlan, RoundMetrics};
pub use worker::run_worker;
