//! Certificate content, one typed variant per standard.

use serde::{Deserialize, Serialize};
use zkcert_core::FieldElement;
use zkcert_crypto::poseidon_hash;

use crate::encoding::{encode_bool, hash_string};
use crate::error::CertificateResult;
use crate::standard::CertificateStandard;

/// zkKYC holder data as attested by the KYC provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycContent {
    pub surname: String,
    pub forename: String,
    #[serde(default)]
    pub middlename: String,
    pub year_of_birth: u32,
    pub month_of_birth: u32,
    pub day_of_birth: u32,
    pub verification_level: u32,
    /// Unix seconds
    pub expiration_date: u64,
    pub street_and_number: String,
    pub postcode: String,
    pub town: String,
    #[serde(default)]
    pub region: String,
    /// ISO 3166-1 alpha-3
    pub country: String,
    pub citizenship: String,
    #[serde(rename = "passportID")]
    pub passport_id: String,
}

impl KycContent {
    fn field_values(&self) -> CertificateResult<Vec<FieldElement>> {
        Ok(vec![
            hash_string(&self.surname)?,
            hash_string(&self.forename)?,
            hash_string(&self.middlename)?,
            FieldElement::from_u64(u64::from(self.year_of_birth)),
            FieldElement::from_u64(u64::from(self.month_of_birth)),
            FieldElement::from_u64(u64::from(self.day_of_birth)),
            FieldElement::from_u64(u64::from(self.verification_level)),
            FieldElement::from_u64(self.expiration_date),
            hash_string(&self.street_and_number)?,
            hash_string(&self.postcode)?,
            hash_string(&self.town)?,
            hash_string(&self.region)?,
            hash_string(&self.country)?,
            hash_string(&self.citizenship)?,
            hash_string(&self.passport_id)?,
        ])
    }
}

/// zkX account data as attested by the account-verification provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XAccountContent {
    pub account_id: String,
    /// Unix seconds
    pub creation_time: u64,
    #[serde(default)]
    pub location: String,
    pub verified: bool,
    pub followers_count: u64,
    pub friends_count: u64,
    pub likes_count: u64,
    pub posts_count: u64,
    pub expiration_date: u64,
}

impl XAccountContent {
    fn field_values(&self) -> CertificateResult<Vec<FieldElement>> {
        Ok(vec![
            hash_string(&self.account_id)?,
            FieldElement::from_u64(self.creation_time),
            hash_string(&self.location)?,
            encode_bool(self.verified),
            FieldElement::from_u64(self.followers_count),
            FieldElement::from_u64(self.friends_count),
            FieldElement::from_u64(self.likes_count),
            FieldElement::from_u64(self.posts_count),
            FieldElement::from_u64(self.expiration_date),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "standard", content = "fields")]
pub enum CertificateContent {
    #[serde(rename = "gip1")]
    Kyc(KycContent),
    #[serde(rename = "gip69")]
    XAccount(XAccountContent),
}

impl CertificateContent {
    pub fn standard(&self) -> CertificateStandard {
        match self {
            CertificateContent::Kyc(_) => CertificateStandard::ZkKyc,
            CertificateContent::XAccount(_) => CertificateStandard::ZkX,
        }
    }

    pub fn expiration_date(&self) -> u64 {
        match self {
            CertificateContent::Kyc(kyc) => kyc.expiration_date,
            CertificateContent::XAccount(account) => account.expiration_date,
        }
    }

    /// Encoded values, named and ordered by the standard's field list.
    pub fn named_fields(&self) -> CertificateResult<Vec<(&'static str, FieldElement)>> {
        let values = match self {
            CertificateContent::Kyc(kyc) => kyc.field_values()?,
            CertificateContent::XAccount(account) => account.field_values()?,
        };
        Ok(self
            .standard()
            .hash_fields()
            .iter()
            .copied()
            .zip(values)
            .collect())
    }

    /// Poseidon over the encoded fields in standard order.
    pub fn content_hash(&self) -> CertificateResult<FieldElement> {
        let values: Vec<FieldElement> = self
            .named_fields()?
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        Ok(poseidon_hash(&values)?)
    }
}
