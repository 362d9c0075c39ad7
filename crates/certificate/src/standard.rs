//! Certificate standards and their hashed field lists.
//!
//! A standard fixes which content fields exist and the order in which they
//! enter the content hash. The order is part of the circuit interface; a new
//! field list needs a new standard identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CertificateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificateStandard {
    /// zkKYC, identity verified by a KYC provider
    #[serde(rename = "gip1")]
    ZkKyc,
    /// zkX, ownership of an X (Twitter) account
    #[serde(rename = "gip69")]
    ZkX,
}

const KYC_FIELDS: &[&str] = &[
    "surname",
    "forename",
    "middlename",
    "yearOfBirth",
    "monthOfBirth",
    "dayOfBirth",
    "verificationLevel",
    "expirationDate",
    "streetAndNumber",
    "postcode",
    "town",
    "region",
    "country",
    "citizenship",
    "passportID",
];

const X_FIELDS: &[&str] = &[
    "accountId",
    "creationTime",
    "location",
    "verified",
    "followersCount",
    "friendsCount",
    "likesCount",
    "postsCount",
    "expirationDate",
];

impl CertificateStandard {
    pub const ALL: [CertificateStandard; 2] = [CertificateStandard::ZkKyc, CertificateStandard::ZkX];

    pub fn id(&self) -> &'static str {
        match self {
            CertificateStandard::ZkKyc => "gip1",
            CertificateStandard::ZkX => "gip69",
        }
    }

    /// Content fields in hashing order.
    pub fn hash_fields(&self) -> &'static [&'static str] {
        match self {
            CertificateStandard::ZkKyc => KYC_FIELDS,
            CertificateStandard::ZkX => X_FIELDS,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CertificateStandard::ZkKyc => "zkKYC",
            CertificateStandard::ZkX => "zkX account",
        }
    }
}

impl fmt::Display for CertificateStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CertificateStandard {
    type Err = CertificateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|standard| standard.id() == s)
            .ok_or_else(|| CertificateError::UnknownStandard(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for standard in CertificateStandard::ALL {
            assert_eq!(standard.id().parse::<CertificateStandard>().unwrap(), standard);
            let json = serde_json::to_string(&standard).unwrap();
            assert_eq!(json, format!("\"{}\"", standard.id()));
        }
        assert!("gip2".parse::<CertificateStandard>().is_err());
    }

    #[test]
    fn test_field_lists_have_no_duplicates() {
        for standard in CertificateStandard::ALL {
            let fields = standard.hash_fields();
            let unique: std::collections::HashSet<_> = fields.iter().collect();
            assert_eq!(unique.len(), fields.len());
            assert!(fields.contains(&"expirationDate"));
        }
    }
}
