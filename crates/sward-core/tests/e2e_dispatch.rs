//! End-to-end tests driving the full transaction surface through
//! `dispatch::invoke`, against both state backends.

use serde_json::Value;
use sward_core::contract::ContractError;
use sward_core::dispatch::{self, DispatchError, Invoker};
use sward_core::evaluate::{BandPolicy, EvaluationPolicy, ServiceLevel, SlaTerms};
use sward_core::state::{MemoryStore, SqliteStore, StateStore};

fn org1() -> Invoker {
    Invoker {
        msp_id: "Org1MSP".to_owned(),
    }
}

fn invoke(store: &mut dyn StateStore, name: &str, args: &[&str]) -> Vec<u8> {
    dispatch::invoke(store, &BandPolicy, &org1(), name, args)
        .unwrap_or_else(|err| panic!("{name} failed: {err}"))
}

fn invoke_json(store: &mut dyn StateStore, name: &str, args: &[&str]) -> Value {
    serde_json::from_slice(&invoke(store, name, args)).unwrap()
}

fn gold_score() -> i64 {
    BandPolicy.appraise(&SlaTerms {
        service_level: ServiceLevel::Gold,
        target_grass_length: 5.5,
        max_grass_length: 7.0,
        min_grass_length: 3.0,
    })
}

/// The full business scenario: contract, job lifecycle, customer with a
/// mower SLA, updates, and removal.
fn full_surface(store: &mut dyn StateStore) {
    // --- general contract -------------------------------------------------
    invoke(store, "CreateGeneralContract", &[]);
    let gc = invoke_json(store, "ReadGeneralContract", &["Org1MSP"]);
    assert_eq!(gc["ID"], "Org1MSP");

    // --- job lifecycle ----------------------------------------------------
    invoke(store, "CreateJob", &["Org1MSP", "9", "5", "Tomoko", "300"]);
    let open = invoke_json(store, "ReadJob", &["9"]);
    assert_eq!(open["Status"], "Open");
    assert_eq!(open["Quantity"], 5);
    assert!(open.get("Technician").is_none());

    invoke(store, "TakeJob", &["9", "tech-1"]);
    invoke(store, "JobDone", &["9"]);

    let jobs = invoke_json(store, "GetAllJobs", &[]);
    let jobs = jobs.as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["Status"], "Done");
    assert_eq!(jobs[0]["Technician"], "tech-1");

    // --- customer and SLA -------------------------------------------------
    invoke(store, "CreateCustomer", &["c1"]);
    invoke(
        store,
        "CreateMower",
        &["c1", "m1", "Gold", "5.500000", "7.000000", "3.000000"],
    );

    let sla = invoke_json(store, "ReadSLA", &["m1"]);
    assert_eq!(
        sla,
        serde_json::json!({
            "AppraisedValue": gold_score(),
            "ServiceLevel": "Gold",
            "TargetGrassLength": 5.5,
            "MaxGrassLength": 7.0,
            "MinGrassLength": 3.0,
            "ID": "m1",
        })
    );

    // The stored appraisal equals a direct evaluation of the same terms.
    let direct = invoke(
        store,
        "EvaluateSLA",
        &["Gold", "5.500000", "7.000000", "3.000000"],
    );
    let direct: i64 = String::from_utf8(direct).unwrap().parse().unwrap();
    assert_eq!(sla["AppraisedValue"], direct);

    // --- updates recompute the appraisal ----------------------------------
    invoke(store, "UpdateServiceLevel", &["c1", "m1", "Silver"]);
    invoke(store, "UpdateTargetGrassLength", &["c1", "m1", "4.000000"]);
    invoke(
        store,
        "UpdateGrassLengthInterval",
        &["c1", "m1", "8.000000", "2.000000"],
    );

    let updated = invoke_json(store, "ReadSLA", &["m1"]);
    assert_eq!(updated["ServiceLevel"], "Silver");
    assert_eq!(updated["TargetGrassLength"], 4.0);
    assert_eq!(updated["MaxGrassLength"], 8.0);
    assert_eq!(updated["MinGrassLength"], 2.0);
    assert_eq!(
        updated["AppraisedValue"],
        BandPolicy.appraise(&SlaTerms {
            service_level: ServiceLevel::Silver,
            target_grass_length: 4.0,
            max_grass_length: 8.0,
            min_grass_length: 2.0,
        })
    );

    let customer = invoke_json(store, "ReadCustomer", &["c1"]);
    assert_eq!(customer["ID"], "c1");
    assert_eq!(customer["SLAs"].as_array().unwrap().len(), 1);

    let all = invoke_json(store, "GetAllSLA", &["c1"]);
    assert_eq!(all.as_array().unwrap().len(), 1);

    // --- removal ----------------------------------------------------------
    invoke(store, "RemoveMowerSLA", &["c1", "m1"]);
    let result = dispatch::invoke(store, &BandPolicy, &org1(), "ReadSLA", &["m1"]);
    assert!(matches!(
        result,
        Err(DispatchError::Contract(ContractError::NotFound { .. }))
    ));
}

#[test]
fn full_surface_over_memory_store() {
    full_surface(&mut MemoryStore::new());
}

#[test]
fn full_surface_over_sqlite_store() {
    full_surface(&mut SqliteStore::in_memory().unwrap());
}

#[test]
fn domain_violations_surface_through_dispatch() {
    let mut store = MemoryStore::new();

    invoke(&mut store, "CreateCustomer", &["c1"]);
    let duplicate = dispatch::invoke(&mut store, &BandPolicy, &org1(), "CreateCustomer", &["c1"]);
    assert!(matches!(
        duplicate,
        Err(DispatchError::Contract(ContractError::AlreadyExists { .. }))
    ));

    // target > max
    let bad_interval = dispatch::invoke(
        &mut store,
        &BandPolicy,
        &org1(),
        "CreateMower",
        &["c1", "m2", "Gold", "8.000000", "7.000000", "3.000000"],
    );
    assert!(matches!(
        bad_interval,
        Err(DispatchError::Contract(ContractError::InvalidSla { .. }))
    ));

    invoke(&mut store, "CreateJob", &["Org1MSP", "9", "5", "Tomoko", "300"]);
    invoke(&mut store, "TakeJob", &["9", "tech-1"]);
    let double_take = dispatch::invoke(&mut store, &BandPolicy, &org1(), "TakeJob", &["9", "t2"]);
    assert!(matches!(
        double_take,
        Err(DispatchError::Contract(ContractError::InvalidState { .. }))
    ));
}

#[test]
fn replayed_invocations_are_byte_identical() {
    let script: &[(&str, &[&str])] = &[
        ("CreateGeneralContract", &[]),
        ("CreateJob", &["Org1MSP", "9", "5", "Tomoko", "300"]),
        ("TakeJob", &["9", "tech-1"]),
        ("CreateCustomer", &["c1"]),
        (
            "CreateMower",
            &["c1", "m1", "Gold", "5.500000", "7.000000", "3.000000"],
        ),
        ("GetAllJobs", &[]),
        ("ReadSLA", &["m1"]),
        ("ReadCustomer", &["c1"]),
    ];

    let run = || {
        let mut store = MemoryStore::new();
        script
            .iter()
            .map(|&(name, args)| invoke(&mut store, name, args))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}
