//! Type-safe identifier wrappers around [`String`].
//!
//! Every entity in the simulation has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. Identifiers come from
//! blueprint data or are derived deterministically from the world seed, so
//! they are plain strings rather than random UUIDs. Ordering is lexical,
//! which is what the dispatcher's tie-break rotation relies on.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from anything string-like.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a world snapshot lineage.
    WorldId
}

define_id! {
    /// Unique identifier for a structure (building) owned by the company.
    StructureId
}

define_id! {
    /// Unique identifier for a room inside a structure.
    RoomId
}

define_id! {
    /// Unique identifier for a grow zone inside a room.
    ZoneId
}

define_id! {
    /// Unique identifier for a device installed in a zone.
    DeviceId
}

define_id! {
    /// Unique identifier for an employee on the active roster.
    EmployeeId
}

define_id! {
    /// Unique identifier for an employee role.
    RoleId
}

define_id! {
    /// Unique identifier for a queued workforce task instance.
    TaskId
}

define_id! {
    /// Unique identifier for a hiring-market candidate.
    CandidateId
}

define_id! {
    /// Per-employee RNG seed.
    ///
    /// Deliberately a separate type from [`EmployeeId`]: seeds key RNG
    /// streams and must never be confused with entity identifiers.
    EmployeeRngSeed
}

/// Namespace for deterministic employee identifiers.
const EMPLOYEE_NAMESPACE: Uuid = Uuid::from_u128(0x5f0c_7a3e_9d41_4b8e_a2f6_1c3d_8e7b_4a90);

impl EmployeeId {
    /// Derive the identifier of an employee hired from a market candidate.
    ///
    /// UUID v5 over `"<world seed>:<candidate id>"`: the same seed and
    /// candidate always yield the same employee id.
    pub fn from_candidate(world_seed: &str, candidate_id: &CandidateId) -> Self {
        let name = format!("{world_seed}:{candidate_id}");
        Self(Uuid::new_v5(&EMPLOYEE_NAMESPACE, name.as_bytes()).to_string())
    }
}

impl EmployeeRngSeed {
    /// Derive the RNG seed of an employee hired from a market candidate.
    pub fn from_candidate(world_seed: &str, candidate_id: &CandidateId) -> Self {
        Self(format!("{world_seed}:employee:{candidate_id}"))
    }
}
