//! Customers and their mower service-level agreements.
//!
//! A customer record embeds its SLA list in insertion order. Mower ids
//! are globally unique: an ownership index key maps each mower id to the
//! customer that holds its SLA, which makes `ReadSLA(mowerId)` a direct
//! lookup and lets creation reject a mower id that is already bound
//! anywhere. The appraised value stored on an SLA is always the
//! evaluation engine's output for the SLA's current terms — every
//! mutation recomputes it through the injected policy.

use serde::{Deserialize, Serialize};

use super::{ContractError, decode, encode, ensure_valid_id};
use crate::evaluate::{EvaluationPolicy, ServiceLevel, SlaTerms};
use crate::state::{StateError, StateStore, keys};

/// A mower service-level agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sla {
    /// Score assigned by the evaluation engine for the current terms.
    #[serde(rename = "AppraisedValue")]
    pub appraised_value: i64,

    /// Service tier.
    #[serde(rename = "ServiceLevel")]
    pub service_level: ServiceLevel,

    /// Grass length the mower aims for.
    #[serde(rename = "TargetGrassLength")]
    pub target_grass_length: f64,

    /// Upper bound of the tolerated band.
    #[serde(rename = "MaxGrassLength")]
    pub max_grass_length: f64,

    /// Lower bound of the tolerated band.
    #[serde(rename = "MinGrassLength")]
    pub min_grass_length: f64,

    /// Mower id. Globally unique.
    #[serde(rename = "ID")]
    pub id: String,
}

impl Sla {
    /// The SLA's current terms, as the evaluation engine sees them.
    #[must_use]
    pub fn terms(&self) -> SlaTerms {
        SlaTerms {
            service_level: self.service_level,
            target_grass_length: self.target_grass_length,
            max_grass_length: self.max_grass_length,
            min_grass_length: self.min_grass_length,
        }
    }

    fn apply(&mut self, terms: SlaTerms, appraised_value: i64) {
        self.service_level = terms.service_level;
        self.target_grass_length = terms.target_grass_length;
        self.max_grass_length = terms.max_grass_length;
        self.min_grass_length = terms.min_grass_length;
        self.appraised_value = appraised_value;
    }
}

/// A customer and its SLAs, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer id.
    #[serde(rename = "ID")]
    pub id: String,

    /// Attached SLAs, at most one per mower id.
    #[serde(rename = "SLAs")]
    pub slas: Vec<Sla>,
}

fn load_customer(store: &dyn StateStore, customer_id: &str) -> Result<Customer, ContractError> {
    let key = keys::composite(keys::NS_CUSTOMER, customer_id);
    let bytes = store.get(&key)?.ok_or_else(|| ContractError::NotFound {
        key: customer_id.to_owned(),
    })?;
    decode(&key, &bytes)
}

fn save_customer(store: &mut dyn StateStore, customer: &Customer) -> Result<(), ContractError> {
    let key = keys::composite(keys::NS_CUSTOMER, &customer.id);
    store.put(&key, &encode(&key, customer)?)?;
    Ok(())
}

fn owner_of(store: &dyn StateStore, mower_id: &str) -> Result<Option<String>, ContractError> {
    let key = keys::composite(keys::NS_SLA_OWNER, mower_id);
    match store.get(&key)? {
        Some(bytes) => {
            let owner = String::from_utf8(bytes).map_err(|err| {
                ContractError::Storage(StateError::Corrupt {
                    key,
                    details: err.to_string(),
                })
            })?;
            Ok(Some(owner))
        }
        None => Ok(None),
    }
}

/// Creates a customer with an empty SLA list.
///
/// # Errors
///
/// Fails with [`ContractError::AlreadyExists`] if the id is taken.
pub fn create_customer(
    store: &mut dyn StateStore,
    customer_id: &str,
) -> Result<Customer, ContractError> {
    ensure_valid_id("customer", customer_id)?;
    let key = keys::composite(keys::NS_CUSTOMER, customer_id);

    if store.get(&key)?.is_some() {
        return Err(ContractError::AlreadyExists {
            key: customer_id.to_owned(),
        });
    }

    let customer = Customer {
        id: customer_id.to_owned(),
        slas: Vec::new(),
    };
    save_customer(store, &customer)?;
    Ok(customer)
}

/// Attaches a new mower SLA to `customer_id`.
///
/// The appraised value is computed through `policy` before the record is
/// written.
///
/// # Errors
///
/// Fails with [`ContractError::NotFound`] if the customer is absent,
/// [`ContractError::AlreadyExists`] if the mower id is already bound to
/// any customer, and [`ContractError::InvalidSla`] if the band violates
/// `min <= target <= max`.
pub fn create_mower_sla(
    store: &mut dyn StateStore,
    policy: &dyn EvaluationPolicy,
    customer_id: &str,
    mower_id: &str,
    terms: SlaTerms,
) -> Result<Sla, ContractError> {
    ensure_valid_id("customer", customer_id)?;
    ensure_valid_id("mower", mower_id)?;

    let mut customer = load_customer(store, customer_id)?;

    if owner_of(store, mower_id)?.is_some() {
        return Err(ContractError::AlreadyExists {
            key: mower_id.to_owned(),
        });
    }

    if !terms.interval_is_valid() {
        return Err(ContractError::InvalidSla {
            target: terms.target_grass_length,
            max: terms.max_grass_length,
            min: terms.min_grass_length,
        });
    }

    let sla = Sla {
        appraised_value: policy.appraise(&terms),
        service_level: terms.service_level,
        target_grass_length: terms.target_grass_length,
        max_grass_length: terms.max_grass_length,
        min_grass_length: terms.min_grass_length,
        id: mower_id.to_owned(),
    };

    customer.slas.push(sla.clone());
    save_customer(store, &customer)?;
    store.put(
        &keys::composite(keys::NS_SLA_OWNER, mower_id),
        customer_id.as_bytes(),
    )?;

    Ok(sla)
}

/// Applies `mutate` to the SLA's terms, re-validates the band, and
/// recomputes the appraised value.
///
/// On any failure the stored SLA is left exactly as it was.
fn update_terms<F>(
    store: &mut dyn StateStore,
    policy: &dyn EvaluationPolicy,
    customer_id: &str,
    mower_id: &str,
    mutate: F,
) -> Result<Sla, ContractError>
where
    F: FnOnce(&mut SlaTerms),
{
    ensure_valid_id("customer", customer_id)?;
    ensure_valid_id("mower", mower_id)?;

    let mut customer = load_customer(store, customer_id)?;
    let entry = customer
        .slas
        .iter_mut()
        .find(|sla| sla.id == mower_id)
        .ok_or_else(|| ContractError::NotFound {
            key: mower_id.to_owned(),
        })?;

    let mut terms = entry.terms();
    mutate(&mut terms);

    if !terms.interval_is_valid() {
        return Err(ContractError::InvalidSla {
            target: terms.target_grass_length,
            max: terms.max_grass_length,
            min: terms.min_grass_length,
        });
    }

    entry.apply(terms, policy.appraise(&terms));
    let updated = entry.clone();
    save_customer(store, &customer)?;
    Ok(updated)
}

/// Changes the service tier and recomputes the appraised value.
///
/// # Errors
///
/// Fails with [`ContractError::NotFound`] if the customer or its SLA
/// entry is absent.
pub fn update_service_level(
    store: &mut dyn StateStore,
    policy: &dyn EvaluationPolicy,
    customer_id: &str,
    mower_id: &str,
    service_level: ServiceLevel,
) -> Result<Sla, ContractError> {
    update_terms(store, policy, customer_id, mower_id, |terms| {
        terms.service_level = service_level;
    })
}

/// Changes the target grass length and recomputes the appraised value.
///
/// # Errors
///
/// Fails with [`ContractError::NotFound`] if the customer or its SLA
/// entry is absent, and [`ContractError::InvalidSla`] if the new target
/// leaves the tolerated band.
pub fn update_target_grass_length(
    store: &mut dyn StateStore,
    policy: &dyn EvaluationPolicy,
    customer_id: &str,
    mower_id: &str,
    target: f64,
) -> Result<Sla, ContractError> {
    update_terms(store, policy, customer_id, mower_id, |terms| {
        terms.target_grass_length = target;
    })
}

/// Changes the tolerance interval and recomputes the appraised value.
///
/// # Errors
///
/// Fails with [`ContractError::NotFound`] if the customer or its SLA
/// entry is absent, and [`ContractError::InvalidSla`] if the new band
/// no longer contains the target (or `max < min`).
pub fn update_grass_length_interval(
    store: &mut dyn StateStore,
    policy: &dyn EvaluationPolicy,
    customer_id: &str,
    mower_id: &str,
    max: f64,
    min: f64,
) -> Result<Sla, ContractError> {
    update_terms(store, policy, customer_id, mower_id, |terms| {
        terms.max_grass_length = max;
        terms.min_grass_length = min;
    })
}

/// Detaches a mower SLA from its customer.
///
/// # Errors
///
/// Fails with [`ContractError::NotFound`] if the customer or its SLA
/// entry is absent.
pub fn remove_mower_sla(
    store: &mut dyn StateStore,
    customer_id: &str,
    mower_id: &str,
) -> Result<(), ContractError> {
    ensure_valid_id("customer", customer_id)?;
    ensure_valid_id("mower", mower_id)?;

    let mut customer = load_customer(store, customer_id)?;
    let position = customer
        .slas
        .iter()
        .position(|sla| sla.id == mower_id)
        .ok_or_else(|| ContractError::NotFound {
            key: mower_id.to_owned(),
        })?;

    customer.slas.remove(position);
    save_customer(store, &customer)?;
    store.delete(&keys::composite(keys::NS_SLA_OWNER, mower_id))?;
    Ok(())
}

/// Reads an SLA by mower id alone, via the ownership index.
///
/// # Errors
///
/// Fails with [`ContractError::NotFound`] if no customer holds an SLA
/// for this mower.
pub fn read_sla(store: &dyn StateStore, mower_id: &str) -> Result<Sla, ContractError> {
    ensure_valid_id("mower", mower_id)?;

    let owner = owner_of(store, mower_id)?.ok_or_else(|| ContractError::NotFound {
        key: mower_id.to_owned(),
    })?;

    let customer = load_customer(store, &owner)?;
    customer
        .slas
        .into_iter()
        .find(|sla| sla.id == mower_id)
        .ok_or_else(|| {
            // The index said this customer owns the mower; an absent list
            // entry means the two keys have diverged.
            ContractError::Storage(StateError::Corrupt {
                key: keys::composite(keys::NS_SLA_OWNER, mower_id),
                details: format!("index points at customer {owner} which holds no such SLA"),
            })
        })
}

/// Reads a customer record.
///
/// # Errors
///
/// Fails with [`ContractError::NotFound`] if the customer is absent.
pub fn read_customer(store: &dyn StateStore, customer_id: &str) -> Result<Customer, ContractError> {
    ensure_valid_id("customer", customer_id)?;
    load_customer(store, customer_id)
}

/// Reads all SLAs attached to a customer, in insertion order.
///
/// # Errors
///
/// Fails with [`ContractError::NotFound`] if the customer is absent.
pub fn all_slas(store: &dyn StateStore, customer_id: &str) -> Result<Vec<Sla>, ContractError> {
    ensure_valid_id("customer", customer_id)?;
    Ok(load_customer(store, customer_id)?.slas)
}
