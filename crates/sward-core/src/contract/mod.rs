//! Contract handlers: general contracts, jobs, and customer/mower SLAs.
//!
//! Each handler is a deterministic, synchronous function over a
//! [`StateStore`] working view. The same invocation is re-executed
//! independently by every validating party, so handlers never touch a
//! clock, randomness, or any I/O beyond ledger keys — given the same
//! store contents and arguments they produce identical writes and
//! identical results.
//!
//! # Lifecycles
//!
//! ```text
//! GeneralContract:  (absent) --Create--> exists          never deleted
//!
//! Job:              (absent) --Create--> Open --TakeJob--> Taken --JobDone--> Done
//!                                                                            terminal
//!
//! Customer:         (absent) --CreateCustomer--> exists
//!     SLA entries:  CreateMowerSLA / Update* / RemoveMowerSLA
//! ```
//!
//! Create fails `AlreadyExists` on a populated key; reads and updates
//! fail `NotFound` on an absent one; jobs only ever move forward.

mod error;
pub mod general;
pub mod job;
pub mod sla;


pub use error::ContractError;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::state::{StateError, keys};

/// Decodes a stored JSON record, attributing failures to `key`.
pub(crate) fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T, ContractError> {
    serde_json::from_slice(bytes).map_err(|err| {
        ContractError::Storage(StateError::Corrupt {
            key: key.to_owned(),
            details: err.to_string(),
        })
    })
}

/// Encodes a record for storage, attributing failures to `key`.
pub(crate) fn encode<T: Serialize>(key: &str, record: &T) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(record).map_err(|err| {
        ContractError::Storage(StateError::Corrupt {
            key: key.to_owned(),
            details: err.to_string(),
        })
    })
}

/// Rejects ids that cannot be embedded in a composite key.
pub(crate) fn ensure_valid_id(what: &str, id: &str) -> Result<(), ContractError> {
    if keys::is_valid_id(id) {
        Ok(())
    } else {
        Err(ContractError::validation(format!(
            "{what} id must be non-empty and free of control separators, got {id:?}"
        )))
    }
}
