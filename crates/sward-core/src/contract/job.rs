//! Job lifecycle: `Open -> Taken -> Done`.
//!
//! Jobs are created `Open`, claimed by exactly one technician, and
//! finished once. `Done` is terminal; no transition skips a step and
//! none reverses. Jobs are never deleted.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ContractError, decode, encode, ensure_valid_id};
use crate::state::{StateStore, keys};

/// Jobs pulled from the store per scan page while iterating.
const SCAN_PAGE: usize = 64;

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    /// Created, waiting for a technician.
    Open,
    /// Claimed by a technician.
    Taken,
    /// Finished. Terminal.
    Done,
}

impl JobStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    ///
    /// Only the two forward single-step moves are legal.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::Taken) | (Self::Taken, Self::Done)
        )
    }

    /// Wire label for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Taken => "Taken",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work assigned to a technician.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Job id.
    #[serde(rename = "ID")]
    pub id: String,

    /// Organization that opened the job.
    #[serde(rename = "Owner")]
    pub owner: String,

    /// Current lifecycle status.
    #[serde(rename = "Status")]
    pub status: JobStatus,

    /// Claiming technician. Present once the job is `Taken` or later.
    #[serde(rename = "Technician", default, skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,

    /// Free-form payload: unit count.
    #[serde(rename = "Quantity")]
    pub quantity: u32,

    /// Free-form payload: human description.
    #[serde(rename = "Description")]
    pub description: String,

    /// Free-form payload: agreed price, at wire precision.
    #[serde(rename = "Price")]
    pub price: f64,
}

fn load(store: &dyn StateStore, id: &str) -> Result<Job, ContractError> {
    let key = keys::composite(keys::NS_JOB, id);
    let bytes = store
        .get(&key)?
        .ok_or_else(|| ContractError::NotFound { key: id.to_owned() })?;
    decode(&key, &bytes)
}

fn save(store: &mut dyn StateStore, job: &Job) -> Result<(), ContractError> {
    let key = keys::composite(keys::NS_JOB, &job.id);
    store.put(&key, &encode(&key, job)?)?;
    Ok(())
}

/// Creates a job in the `Open` state.
///
/// # Errors
///
/// Fails with [`ContractError::AlreadyExists`] if the id is taken and
/// [`ContractError::Validation`] on malformed ids.
pub fn create(
    store: &mut dyn StateStore,
    id: &str,
    owner: &str,
    quantity: u32,
    description: &str,
    price: f64,
) -> Result<Job, ContractError> {
    ensure_valid_id("job", id)?;
    ensure_valid_id("organization", owner)?;

    let key = keys::composite(keys::NS_JOB, id);
    if store.get(&key)?.is_some() {
        return Err(ContractError::AlreadyExists { key: id.to_owned() });
    }

    let job = Job {
        id: id.to_owned(),
        owner: owner.to_owned(),
        status: JobStatus::Open,
        technician: None,
        quantity,
        description: description.to_owned(),
        price,
    };
    save(store, &job)?;
    Ok(job)
}

/// Claims an `Open` job for `technician_id`.
///
/// Not idempotent: a second claim on the same job fails, because the
/// job is no longer `Open`.
///
/// # Errors
///
/// Fails with [`ContractError::NotFound`] if the job does not exist and
/// [`ContractError::InvalidState`] if it has already been taken or
/// finished.
pub fn take_job(
    store: &mut dyn StateStore,
    id: &str,
    technician_id: &str,
) -> Result<Job, ContractError> {
    ensure_valid_id("technician", technician_id)?;

    let mut job = load(store, id)?;
    if !job.status.can_advance_to(JobStatus::Taken) {
        return Err(ContractError::InvalidState {
            job_id: id.to_owned(),
            from: job.status,
            requested: JobStatus::Taken,
        });
    }

    job.status = JobStatus::Taken;
    job.technician = Some(technician_id.to_owned());
    save(store, &job)?;
    Ok(job)
}

/// Marks a `Taken` job as finished.
///
/// # Errors
///
/// Fails with [`ContractError::NotFound`] if the job does not exist and
/// [`ContractError::InvalidState`] unless the job is currently `Taken`.
pub fn job_done(store: &mut dyn StateStore, id: &str) -> Result<Job, ContractError> {
    let mut job = load(store, id)?;
    if !job.status.can_advance_to(JobStatus::Done) {
        return Err(ContractError::InvalidState {
            job_id: id.to_owned(),
            from: job.status,
            requested: JobStatus::Done,
        });
    }

    job.status = JobStatus::Done;
    save(store, &job)?;
    Ok(job)
}

/// Reads a job by id.
///
/// # Errors
///
/// Fails with [`ContractError::NotFound`] if the job does not exist.
pub fn read(store: &dyn StateStore, id: &str) -> Result<Job, ContractError> {
    load(store, id)
}

/// Lazily enumerates every job in ledger key order.
///
/// The iterator pulls one scan page at a time, so enumeration is lazy
/// and finite; calling [`all`] again restarts from the beginning. Key
/// order is the only ordering guarantee.
#[must_use]
pub fn all(store: &dyn StateStore) -> JobIter<'_> {
    JobIter {
        store,
        cursor: None,
        buffered: VecDeque::new(),
        exhausted: false,
    }
}

/// Cursor-paged iterator over all jobs. See [`all`].
pub struct JobIter<'a> {
    store: &'a dyn StateStore,
    cursor: Option<String>,
    buffered: VecDeque<(String, Vec<u8>)>,
    exhausted: bool,
}

impl Iterator for JobIter<'_> {
    type Item = Result<Job, ContractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffered.is_empty() && !self.exhausted {
            let prefix = keys::prefix(keys::NS_JOB);
            match self
                .store
                .scan_page(&prefix, self.cursor.as_deref(), SCAN_PAGE)
            {
                Ok(page) => {
                    if page.len() < SCAN_PAGE {
                        self.exhausted = true;
                    }
                    self.cursor = page.last().map(|(key, _)| key.clone());
                    self.buffered.extend(page);
                }
                Err(err) => {
                    self.exhausted = true;
                    return Some(Err(err.into()));
                }
            }
        }

        let (key, bytes) = self.buffered.pop_front()?;
        Some(decode(&key, &bytes))
    }
}
