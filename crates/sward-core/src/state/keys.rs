//! Composite-key construction for namespaced ledger entries.
//!
//! Every entity family gets its own namespace so prefix scans enumerate
//! exactly one kind of record. The separator is an ASCII unit separator,
//! which never appears in valid entity ids (enforced by [`is_valid_id`]
//! at the service layer).

/// Separator between namespace and id inside a composite key.
pub const SEPARATOR: char = '\u{1f}';

/// Namespace for per-organization general contract records.
pub const NS_GENERAL: &str = "gc";

/// Namespace for job records.
pub const NS_JOB: &str = "job";

/// Namespace for customer records (each embedding its SLA list).
pub const NS_CUSTOMER: &str = "customer";

/// Namespace for the mower-id ownership index (`mower id -> customer id`).
pub const NS_SLA_OWNER: &str = "slaowner";

/// Builds the composite key for `id` under `namespace`.
#[must_use]
pub fn composite(namespace: &str, id: &str) -> String {
    let mut key = String::with_capacity(namespace.len() + 1 + id.len());
    key.push_str(namespace);
    key.push(SEPARATOR);
    key.push_str(id);
    key
}

/// Returns the scan prefix covering every key in `namespace`.
#[must_use]
pub fn prefix(namespace: &str) -> String {
    let mut p = String::with_capacity(namespace.len() + 1);
    p.push_str(namespace);
    p.push(SEPARATOR);
    p
}

/// Whether `id` may be embedded in a composite key.
///
/// Ids must be non-empty and must not contain the separator byte;
/// anything else would let one entity's key alias another namespace.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(SEPARATOR)
}

/// Exclusive upper bound for an ordered scan of `prefix`.
///
/// The separator is below every printable character, so bumping the
/// final byte produces the smallest string greater than every key in
/// the namespace.
#[must_use]
pub(crate) fn prefix_upper_bound(prefix: &str) -> String {
    let mut bound = String::from(prefix);
    let last = bound.pop().unwrap_or(SEPARATOR);
    bound.push(char::from_u32(last as u32 + 1).unwrap_or(' '));
    bound
}
