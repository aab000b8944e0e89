//! Golden-master hashing.
//!
//! Daily and summary records are serialized to canonical JSON (struct field
//! order, sorted map keys, no whitespace), hashed with SHA-256, and the
//! lowercase hex digest is truncated to [`DIGEST_LEN`] characters. A stored
//! [`GoldenDigest`] is compared against a fresh run with [`verify_golden`];
//! any difference is an error, never a warning.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::runner::SimulationRun;

/// Hex characters kept from each SHA-256 digest.
pub const DIGEST_LEN: usize = 16;

/// Errors from hashing or comparing digests.
#[derive(Debug, thiserror::Error)]
pub enum GoldenError {
    /// A record could not be serialized.
    #[error("canonical serialization failed: {source}")]
    Serialize {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// Output drifted from the recorded master.
    ///
    /// `day_index` is the first diverging day, or `None` when every day
    /// matched and only the summary differs.
    #[error("golden master mismatch at {}: expected {expected}, got {actual}", describe(.day_index))]
    Mismatch {
        /// First diverging day.
        day_index: Option<u64>,
        /// Recorded hash.
        expected: String,
        /// Fresh hash.
        actual: String,
    },
}

fn describe(day_index: &Option<u64>) -> String {
    day_index.map_or_else(|| "summary".to_owned(), |day| format!("day {day}"))
}

/// Hash of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDigest {
    /// Day index.
    pub day_index: u64,
    /// Truncated digest of the day's record.
    pub hash: String,
}

/// Hashes of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenDigest {
    /// One digest per sealed day.
    pub days: Vec<DayDigest>,
    /// Digest of the summary record.
    pub summary: String,
}

impl GoldenDigest {
    /// Hash every record of `run`.
    ///
    /// # Errors
    ///
    /// Returns [`GoldenError::Serialize`] if a record cannot be serialized.
    pub fn from_run(run: &SimulationRun) -> Result<Self, GoldenError> {
        let days = run
            .daily
            .iter()
            .map(|record| {
                Ok(DayDigest {
                    day_index: record.day_index,
                    hash: canonical_hash(record)?,
                })
            })
            .collect::<Result<Vec<_>, GoldenError>>()?;
        Ok(Self {
            days,
            summary: canonical_hash(&run.summary)?,
        })
    }

    /// One digest over all day digests and the summary.
    ///
    /// # Errors
    ///
    /// Returns [`GoldenError::Serialize`] if the digest cannot be serialized.
    pub fn combined(&self) -> Result<String, GoldenError> {
        canonical_hash(self)
    }
}

/// Canonical JSON bytes of `value`.
///
/// # Errors
///
/// Returns [`GoldenError::Serialize`] if serialization fails.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>, GoldenError> {
    Ok(serde_json::to_vec(value)?)
}

/// Truncated lowercase-hex SHA-256 of the canonical JSON of `value`.
///
/// # Errors
///
/// Returns [`GoldenError::Serialize`] if serialization fails.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<String, GoldenError> {
    let digest = Sha256::digest(canonical_json(value)?);
    Ok(digest
        .iter()
        .take(DIGEST_LEN / 2)
        .map(|b| format!("{b:02x}"))
        .collect())
}

/// Compare a fresh digest against the recorded master.
///
/// # Errors
///
/// Returns [`GoldenError::Mismatch`] naming the first diverging day, or the
/// summary when all days agree.
pub fn verify_golden(expected: &GoldenDigest, actual: &GoldenDigest) -> Result<(), GoldenError> {
    let longest = expected.days.len().max(actual.days.len());
    for position in 0..longest {
        let want = expected.days.get(position);
        let got = actual.days.get(position);
        if want == got {
            continue;
        }
        let day_index = want.or(got).map(|d| d.day_index);
        return Err(GoldenError::Mismatch {
            day_index,
            expected: want.map_or_else(|| "<missing>".to_owned(), |d| d.hash.clone()),
            actual: got.map_or_else(|| "<missing>".to_owned(), |d| d.hash.clone()),
        });
    }
    if expected.summary != actual.summary {
        return Err(GoldenError::Mismatch {
            day_index: None,
            expected: expected.summary.clone(),
            actual: actual.summary.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn digest(days: &[(u64, &str)], summary: &str) -> GoldenDigest {
        GoldenDigest {
            days: days
                .iter()
                .map(|(day_index, hash)| DayDigest {
                    day_index: *day_index,
                    hash: (*hash).to_owned(),
                })
                .collect(),
            summary: summary.to_owned(),
        }
    }

    #[test]
    fn hash_is_truncated_lowercase_hex() {
        let hash = canonical_hash(&"verdant").unwrap_or_default();
        assert_eq!(hash.len(), DIGEST_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn known_vector() {
        // sha256("{}") = 44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a
        let empty: BTreeMap<String, u8> = BTreeMap::new();
        assert_eq!(canonical_hash(&empty).ok().as_deref(), Some("44136fa355b3678a"));
    }

    #[test]
    fn map_key_order_does_not_matter() {
        let a: BTreeMap<&str, u8> = [("b", 2), ("a", 1)].into_iter().collect();
        let b: BTreeMap<&str, u8> = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(canonical_hash(&a).ok(), canonical_hash(&b).ok());
    }

    #[test]
    fn identical_digests_verify() {
        let a = digest(&[(0, "aa"), (1, "bb")], "ss");
        assert!(verify_golden(&a, &a.clone()).is_ok());
    }

    #[test]
    fn first_diverging_day_is_reported() {
        let expected = digest(&[(0, "aa"), (1, "bb"), (2, "cc")], "ss");
        let actual = digest(&[(0, "aa"), (1, "xx"), (2, "yy")], "tt");
        assert!(matches!(
            verify_golden(&expected, &actual),
            Err(GoldenError::Mismatch { day_index: Some(1), .. })
        ));
    }

    #[test]
    fn missing_day_is_a_mismatch() {
        let expected = digest(&[(0, "aa"), (1, "bb")], "ss");
        let actual = digest(&[(0, "aa")], "ss");
        let err = verify_golden(&expected, &actual);
        assert!(matches!(
            &err,
            Err(GoldenError::Mismatch { day_index: Some(1), actual, .. }) if actual == "<missing>"
        ));
    }

    #[test]
    fn summary_only_mismatch_has_no_day() {
        let expected = digest(&[(0, "aa")], "ss");
        let actual = digest(&[(0, "aa")], "zz");
        let err = verify_golden(&expected, &actual);
        assert!(matches!(err, Err(GoldenError::Mismatch { day_index: None, .. })));
        assert!(
            err.err()
                .is_some_and(|e| e.to_string().contains("summary"))
        );
    }
}
