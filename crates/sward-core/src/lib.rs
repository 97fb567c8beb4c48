//! Deterministic contract, job, and mower-SLA handlers over a versioned
//! key-value world state.
//!
//! This crate is the transactional core of a multi-organization contract
//! ledger: general service contracts, discrete jobs claimed by
//! technicians, and customer/mower service-level agreements graded by a
//! pure evaluation engine. Every handler is re-executed independently by
//! each validating party, so the whole crate is built around one rule:
//! given the same store contents and arguments, produce identical writes
//! and identical bytes, every time.
//!
//! # Architecture
//!
//! ```text
//! Adapter (external)
//!    |
//!    v
//! Gateway client (external) ----failure----> classify::classify
//!    |                                            |
//!    v                                            v
//! dispatch::invoke                        TransactionError
//!    |
//!    +--> contract::general
//!    +--> contract::job
//!    +--> contract::sla --> evaluate::EvaluationPolicy
//!    |
//!    v
//! state::StateStore (MemoryStore / SqliteStore)
//! ```
//!
//! # Key Concepts
//!
//! - **World state**: a versioned composite-key/value view; writes are
//!   durable only after network-wide commit ([`state`]).
//! - **Handlers**: create/read/update discipline per key, monotonic job
//!   lifecycle, recomputed SLA appraisals ([`contract`]).
//! - **Evaluation**: injectable pure scoring policy ([`evaluate`]).
//! - **Classification**: heterogeneous gateway failures folded into a
//!   closed taxonomy ([`classify`]).
//! - **Wire codec**: fixed-precision decimal strings decoded in exactly
//!   one place ([`codec`], [`dispatch`]).

#![forbid(unsafe_code)]

pub mod classify;
pub mod codec;
pub mod config;
pub mod contract;
pub mod dispatch;
pub mod evaluate;
pub mod state;

pub use classify::{FailureReport, TransactionError, TxStage, classify};
pub use config::{ConfigError, RoutingConfig};
pub use contract::ContractError;
pub use dispatch::{DispatchError, Invoker, invoke};
pub use evaluate::{BandPolicy, EvaluationPolicy, ServiceLevel, SlaTerms};
pub use state::{MemoryStore, SqliteStore, StateError, StateStore};
