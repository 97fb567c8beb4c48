//! Transaction result classification.
//!
//! A submitted transaction can fail at four distinct stages on its way to
//! finality: endorsement, submission to ordering, waiting on commit
//! status, and commit validation. Gateways surface these as
//! heterogeneous transport errors; every caller used to re-derive what
//! they meant at every call site. This module centralizes that mapping:
//! the gateway describes what it observed in a [`FailureReport`] and
//! [`classify`] folds it into the closed [`TransactionError`] taxonomy.
//!
//! The distinction that matters operationally: a
//! [`TransactionError::CommitStatusTimeout`] means the deadline elapsed
//! while *waiting to learn* the outcome — the transaction may well have
//! committed, so the only safe follow-up is to re-query status.
//! Resubmitting could apply the effects twice. Every other variant is a
//! definitive failure.
//!
//! Handlers never construct these errors; domain violations use
//! [`ContractError`](crate::contract::ContractError) instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stage of transaction finality at which a failure was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStage {
    /// Collecting peer endorsements.
    Endorse,
    /// Handing the endorsed transaction to the ordering service.
    Submit,
    /// Waiting to learn the commit outcome.
    CommitStatus,
    /// Commit-time validation across the network.
    Commit,
}

/// Per-endorser failure detail attached to an endorsement failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorserDetail {
    /// Network address of the failing peer.
    pub address: String,

    /// Organization (MSP) the peer belongs to.
    pub msp_id: String,

    /// The peer's own error message.
    pub message: String,
}

/// What the gateway observed when a transaction failed.
///
/// This is transport-neutral on purpose: the gateway client owns gRPC
/// and deadline mechanics and reduces them to this shape before asking
/// for classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    /// The finality stage that failed.
    pub stage: TxStage,

    /// Id of the failing transaction.
    pub transaction_id: String,

    /// gRPC status code carried by the transport error, if any.
    pub grpc_code: Option<i32>,

    /// Whether the caller's deadline elapsed before a terminal outcome.
    pub deadline_exceeded: bool,

    /// Commit validation code, present only for commit rejections.
    pub validation_code: Option<i32>,

    /// Human-readable transport message.
    pub message: String,

    /// Per-endorser details, when peers reported their own errors.
    pub details: Vec<EndorserDetail>,
}

/// Closed taxonomy of ledger-transaction failures, as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransactionError {
    /// One or more peers refused to endorse the proposal.
    #[error("endorsement failed for transaction {transaction_id}: {message}")]
    EndorsementFailure {
        /// Id of the failing transaction.
        transaction_id: String,
        /// gRPC status code, if the transport carried one.
        grpc_code: Option<i32>,
        /// Transport message.
        message: String,
        /// Per-endorser failure details.
        details: Vec<EndorserDetail>,
    },

    /// The ordering service did not accept the transaction.
    #[error("submission failed for transaction {transaction_id}: {message}")]
    SubmissionFailure {
        /// Id of the failing transaction.
        transaction_id: String,
        /// gRPC status code, if the transport carried one.
        grpc_code: Option<i32>,
        /// Transport message.
        message: String,
    },

    /// The deadline elapsed while awaiting finality. The transaction may
    /// still have committed; re-query status rather than resubmitting.
    #[error("timed out awaiting commit status of transaction {transaction_id}")]
    CommitStatusTimeout {
        /// Id of the transaction with the unknown outcome.
        transaction_id: String,
    },

    /// The network validated and rejected the transaction at commit.
    #[error("transaction {transaction_id} rejected at commit with validation code {code}")]
    CommitRejected {
        /// Id of the rejected transaction.
        transaction_id: String,
        /// Platform validation code describing the rejection.
        code: i32,
    },

    /// The failure did not match any known shape.
    #[error("unclassified failure for transaction {transaction_id}: {message}")]
    Unclassified {
        /// Id of the failing transaction.
        transaction_id: String,
        /// Transport message.
        message: String,
    },
}

impl TransactionError {
    /// Whether re-querying commit status is a safe follow-up.
    ///
    /// True only for [`TransactionError::CommitStatusTimeout`]:
    /// the outcome is unknown, not negative, and a status query cannot
    /// duplicate effects the way a resubmission could.
    #[must_use]
    pub const fn is_status_requery_safe(&self) -> bool {
        matches!(self, Self::CommitStatusTimeout { .. })
    }
}

/// Folds a gateway failure observation into the closed taxonomy.
#[must_use]
pub fn classify(report: FailureReport) -> TransactionError {
    let FailureReport {
        stage,
        transaction_id,
        grpc_code,
        deadline_exceeded,
        validation_code,
        message,
        details,
    } = report;

    match stage {
        TxStage::Endorse => TransactionError::EndorsementFailure {
            transaction_id,
            grpc_code,
            message,
            details,
        },
        TxStage::Submit => TransactionError::SubmissionFailure {
            transaction_id,
            grpc_code,
            message,
        },
        TxStage::CommitStatus if deadline_exceeded => TransactionError::CommitStatusTimeout {
            transaction_id,
        },
        TxStage::Commit => match validation_code {
            Some(code) => TransactionError::CommitRejected {
                transaction_id,
                code,
            },
            None => TransactionError::Unclassified {
                transaction_id,
                message,
            },
        },
        TxStage::CommitStatus => TransactionError::Unclassified {
            transaction_id,
            message,
        },
    }
}
