//! The ledger invocation boundary.
//!
//! Transactions arrive as a name plus positional UTF-8 string arguments
//! and leave as JSON (or empty) payload bytes. This module is the only
//! place wire strings are decoded into typed values — everything past
//! [`invoke`] works on typed numerics and enums.
//!
//! ```text
//! ("TakeJob", ["9", "tech-1"]) --> invoke --> contract::job::take_job
//!                                                 |
//!                      Ok(bytes) / DispatchError <-+
//! ```
//!
//! Malformed arguments (wrong arity, unparsable numbers, unknown service
//! levels) surface as [`ContractError::Validation`]; an unknown
//! transaction name is its own error since no handler was ever selected.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::codec;
use crate::contract::{ContractError, general, job, sla};
use crate::evaluate::{EvaluationPolicy, ServiceLevel, SlaTerms};
use crate::state::StateStore;

/// Identity of the submitting client, as attested by the platform.
///
/// Composite keys for per-organization records are derived from this,
/// never from user-supplied arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    /// The submitting organization's MSP id.
    pub msp_id: String,
}

/// Errors leaving the dispatch surface.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    /// No transaction is registered under this name.
    #[error("unknown transaction: {name}")]
    UnknownTransaction {
        /// The requested transaction name.
        name: String,
    },

    /// A response payload could not be encoded.
    #[error("response encoding failed: {details}")]
    Encoding {
        /// Details about the failure.
        details: String,
    },

    /// The handler rejected the invocation.
    #[error(transparent)]
    Contract(#[from] ContractError),
}

fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, DispatchError> {
    serde_json::to_vec(value).map_err(|err| DispatchError::Encoding {
        details: err.to_string(),
    })
}

fn expect_args<'a, const N: usize>(
    name: &str,
    args: &[&'a str],
) -> Result<[&'a str; N], ContractError> {
    args.try_into().map_err(|_| {
        ContractError::Validation {
            message: format!("{name} expects {N} argument(s), got {}", args.len()),
        }
    })
}

fn parse_level(label: &str) -> Result<ServiceLevel, ContractError> {
    label
        .parse()
        .map_err(|err: crate::evaluate::UnknownServiceLevel| ContractError::Validation {
            message: err.to_string(),
        })
}

fn parse_length(field: &str, input: &str) -> Result<f64, ContractError> {
    codec::parse_decimal(input).map_err(|err| ContractError::Validation {
        message: format!("{field}: {err}"),
    })
}

fn parse_terms(
    level: &str,
    target: &str,
    max: &str,
    min: &str,
) -> Result<SlaTerms, ContractError> {
    Ok(SlaTerms {
        service_level: parse_level(level)?,
        target_grass_length: parse_length("target grass length", target)?,
        max_grass_length: parse_length("max grass length", max)?,
        min_grass_length: parse_length("min grass length", min)?,
    })
}

/// Routes one transaction invocation to its handler.
///
/// Read transactions return the entity's JSON shape, `EvaluateSLA`
/// returns the score as a decimal string, and mutations return empty
/// bytes.
///
/// # Errors
///
/// Returns [`DispatchError::UnknownTransaction`] for an unregistered
/// name and forwards every [`ContractError`] unchanged.
pub fn invoke(
    store: &mut dyn StateStore,
    policy: &dyn EvaluationPolicy,
    invoker: &Invoker,
    name: &str,
    args: &[&str],
) -> Result<Vec<u8>, DispatchError> {
    debug!(transaction = name, argc = args.len(), "dispatching");

    match name {
        "CreateGeneralContract" => {
            expect_args::<0>(name, args)?;
            general::create(store, &invoker.msp_id)?;
            Ok(Vec::new())
        }
        "ReadGeneralContract" => {
            let [org_key] = expect_args(name, args)?;
            to_bytes(&general::read(store, org_key)?)
        }

        "CreateJob" => {
            let [owner, job_id, quantity, description, price] = expect_args(name, args)?;
            let quantity = codec::parse_count(quantity).map_err(|err| {
                ContractError::Validation {
                    message: format!("quantity: {err}"),
                }
            })?;
            let price = parse_length("price", price)?;
            job::create(store, job_id, owner, quantity, description, price)?;
            Ok(Vec::new())
        }
        "ReadJob" => {
            let [job_id] = expect_args(name, args)?;
            to_bytes(&job::read(store, job_id)?)
        }
        "TakeJob" => {
            let [job_id, technician_id] = expect_args(name, args)?;
            job::take_job(store, job_id, technician_id)?;
            Ok(Vec::new())
        }
        "JobDone" => {
            let [job_id] = expect_args(name, args)?;
            job::job_done(store, job_id)?;
            Ok(Vec::new())
        }
        "GetAllJobs" => {
            expect_args::<0>(name, args)?;
            let jobs = job::all(store).collect::<Result<Vec<_>, _>>()?;
            to_bytes(&jobs)
        }

        "CreateCustomer" => {
            let [customer_id] = expect_args(name, args)?;
            sla::create_customer(store, customer_id)?;
            Ok(Vec::new())
        }
        "CreateMower" => {
            let [customer_id, mower_id, level, target, max, min] = expect_args(name, args)?;
            let terms = parse_terms(level, target, max, min)?;
            sla::create_mower_sla(store, policy, customer_id, mower_id, terms)?;
            Ok(Vec::new())
        }
        "UpdateServiceLevel" => {
            let [customer_id, mower_id, level] = expect_args(name, args)?;
            let level = parse_level(level)?;
            sla::update_service_level(store, policy, customer_id, mower_id, level)?;
            Ok(Vec::new())
        }
        "UpdateTargetGrassLength" => {
            let [customer_id, mower_id, target] = expect_args(name, args)?;
            let target = parse_length("target grass length", target)?;
            sla::update_target_grass_length(store, policy, customer_id, mower_id, target)?;
            Ok(Vec::new())
        }
        "UpdateGrassLengthInterval" => {
            let [customer_id, mower_id, max, min] = expect_args(name, args)?;
            let max = parse_length("max grass length", max)?;
            let min = parse_length("min grass length", min)?;
            sla::update_grass_length_interval(store, policy, customer_id, mower_id, max, min)?;
            Ok(Vec::new())
        }
        "RemoveMowerSLA" => {
            let [customer_id, mower_id] = expect_args(name, args)?;
            sla::remove_mower_sla(store, customer_id, mower_id)?;
            Ok(Vec::new())
        }

        "EvaluateSLA" => {
            let [level, target, max, min] = expect_args(name, args)?;
            let terms = parse_terms(level, target, max, min)?;
            let score = policy.appraise(&terms);
            Ok(score.to_string().into_bytes())
        }
        "ReadSLA" => {
            let [mower_id] = expect_args(name, args)?;
            to_bytes(&sla::read_sla(store, mower_id)?)
        }
        "ReadCustomer" => {
            let [customer_id] = expect_args(name, args)?;
            to_bytes(&sla::read_customer(store, customer_id)?)
        }
        "GetAllSLA" => {
            let [customer_id] = expect_args(name, args)?;
            to_bytes(&sla::all_slas(store, customer_id)?)
        }

        _ => Err(DispatchError::UnknownTransaction {
            name: name.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::BandPolicy;
    use crate::state::MemoryStore;

    fn org1() -> Invoker {
        Invoker {
            msp_id: "Org1MSP".to_owned(),
        }
    }

    fn invoke_ok(store: &mut MemoryStore, name: &str, args: &[&str]) -> Vec<u8> {
        invoke(store, &BandPolicy, &org1(), name, args).unwrap()
    }

    #[test]
    fn unknown_transaction_is_rejected() {
        let mut store = MemoryStore::new();
        let result = invoke(&mut store, &BandPolicy, &org1(), "UpdateAsset", &["x"]);
        assert!(matches!(
            result,
            Err(DispatchError::UnknownTransaction { .. })
        ));
    }

    #[test]
    fn wrong_arity_is_a_validation_error() {
        let mut store = MemoryStore::new();
        let result = invoke(&mut store, &BandPolicy, &org1(), "TakeJob", &["9"]);
        assert!(matches!(
            result,
            Err(DispatchError::Contract(ContractError::Validation { .. }))
        ));
    }

    #[test]
    fn general_contract_key_comes_from_the_invoker() {
        let mut store = MemoryStore::new();
        invoke_ok(&mut store, "CreateGeneralContract", &[]);

        let bytes = invoke_ok(&mut store, "ReadGeneralContract", &["Org1MSP"]);
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["ID"], "Org1MSP");
    }

    #[test]
    fn malformed_decimal_argument_is_rejected() {
        let mut store = MemoryStore::new();
        invoke_ok(&mut store, "CreateCustomer", &["c1"]);

        let result = invoke(
            &mut store,
            &BandPolicy,
            &org1(),
            "CreateMower",
            &["c1", "m1", "Gold", "tall", "7.000000", "3.000000"],
        );
        assert!(matches!(
            result,
            Err(DispatchError::Contract(ContractError::Validation { .. }))
        ));
    }

    #[test]
    fn unknown_service_level_is_rejected() {
        let mut store = MemoryStore::new();
        invoke_ok(&mut store, "CreateCustomer", &["c1"]);

        let result = invoke(
            &mut store,
            &BandPolicy,
            &org1(),
            "CreateMower",
            &["c1", "m1", "Copper", "5.500000", "7.000000", "3.000000"],
        );
        assert!(matches!(
            result,
            Err(DispatchError::Contract(ContractError::Validation { .. }))
        ));
    }

    #[test]
    fn evaluate_sla_returns_the_score_as_decimal_text() {
        let mut store = MemoryStore::new();
        let bytes = invoke_ok(
            &mut store,
            "EvaluateSLA",
            &["Gold", "5.500000", "7.000000", "3.000000"],
        );

        let score: i64 = String::from_utf8(bytes).unwrap().parse().unwrap();
        assert_eq!(
            score,
            BandPolicy.appraise(&SlaTerms {
                service_level: ServiceLevel::Gold,
                target_grass_length: 5.5,
                max_grass_length: 7.0,
                min_grass_length: 3.0,
            })
        );
    }

    #[test]
    fn mutations_return_empty_payloads() {
        let mut store = MemoryStore::new();
        assert!(invoke_ok(&mut store, "CreateCustomer", &["c1"]).is_empty());
        assert!(
            invoke_ok(
                &mut store,
                "CreateMower",
                &["c1", "m1", "Gold", "5.500000", "7.000000", "3.000000"],
            )
            .is_empty()
        );
    }
}
