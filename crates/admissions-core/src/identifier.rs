//! Patient identifier generation.
//!
//! Identifiers have the form `PAT-<F><L>-<n>`: the upper-cased first
//! letters of the first and last name followed by a per-initials sequence
//! number. Sequence numbers come from a counter stored alongside the
//! patients and are compared numerically, so `PAT-AB-10` follows
//! `PAT-AB-9`.

/// Leading tag shared by every patient identifier.
pub const PATIENT_ID_TAG: &str = "PAT";

/// Identifier prefix for a name pair, e.g. `PAT-AS-` for "ana", "Santos".
///
/// Returns `None` when either name is blank.
pub fn patient_id_prefix(first_name: &str, last_name: &str) -> Option<String> {
    let first = initial(first_name)?;
    let last = initial(last_name)?;
    Some(format!("{}-{}{}-", PATIENT_ID_TAG, first, last))
}

/// Full identifier for a prefix and sequence number.
pub fn format_patient_id(prefix: &str, sequence: u64) -> String {
    format!("{}{}", prefix, sequence)
}

/// Sequence number of an identifier under a prefix.
///
/// Returns `None` when the identifier does not start with the prefix or
/// its suffix is not a plain decimal number.
pub fn parse_sequence(patient_id: &str, prefix: &str) -> Option<u64> {
    let suffix = patient_id.strip_prefix(prefix)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

fn initial(name: &str) -> Option<String> {
    name.trim().chars().next().map(|c| c.to_uppercase().collect())
}
