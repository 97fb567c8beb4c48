//! General service contracts, one record per organization.
//!
//! Existence is the only state: the record is written once under the
//! organization's key and never updated or deleted.

use serde::{Deserialize, Serialize};

use super::{ContractError, decode, encode, ensure_valid_id};
use crate::state::{StateStore, keys};

/// A general service contract record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralContract {
    /// Owning organization id (the submitter's MSP id).
    #[serde(rename = "ID")]
    pub id: String,
}

/// Creates the general contract record for `org_key`.
///
/// # Errors
///
/// Fails with [`ContractError::AlreadyExists`] if the organization
/// already holds a contract, and [`ContractError::Validation`] on a
/// malformed org key.
pub fn create(store: &mut dyn StateStore, org_key: &str) -> Result<GeneralContract, ContractError> {
    ensure_valid_id("organization", org_key)?;
    let key = keys::composite(keys::NS_GENERAL, org_key);

    if store.get(&key)?.is_some() {
        return Err(ContractError::AlreadyExists {
            key: org_key.to_owned(),
        });
    }

    let record = GeneralContract {
        id: org_key.to_owned(),
    };
    store.put(&key, &encode(&key, &record)?)?;
    Ok(record)
}

/// Reads the general contract record for `org_key`.
///
/// # Errors
///
/// Fails with [`ContractError::NotFound`] if the organization holds no
/// contract.
pub fn read(store: &dyn StateStore, org_key: &str) -> Result<GeneralContract, ContractError> {
    ensure_valid_id("organization", org_key)?;
    let key = keys::composite(keys::NS_GENERAL, org_key);

    let bytes = store.get(&key)?.ok_or_else(|| ContractError::NotFound {
        key: org_key.to_owned(),
    })?;
    decode(&key, &bytes)
}
