//! Circuit input assembly.
//!
//! Circuits take a flat JSON object of named signals. Every scalar is a
//! decimal string below the modulus and every array is a list of such
//! strings; integers such as the leaf index are emitted the same way.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zkcert_core::FieldElement;

use crate::certificate::{compute_human_id_hash, ZkCertificate};
use crate::content::CertificateContent;
use crate::encoding::encode_address;
use crate::error::{CertificateError, CertificateResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Scalar(String),
    Array(Vec<String>),
}

/// Named circuit signals, serialized as one JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircuitInputs(BTreeMap<String, InputValue>);

impl CircuitInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_scalar(&mut self, name: impl Into<String>, value: FieldElement) {
        self.0
            .insert(name.into(), InputValue::Scalar(value.to_decimal_string()));
    }

    pub fn insert_array(&mut self, name: impl Into<String>, values: &[FieldElement]) {
        let values = values.iter().map(FieldElement::to_decimal_string).collect();
        self.0.insert(name.into(), InputValue::Array(values));
    }

    pub fn get(&self, name: &str) -> Option<&InputValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> CertificateResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Inputs proving ownership and registration of `certificate`: the content
/// fields, the commitments, the provider signature and the merkle path.
pub fn ownership_inputs(certificate: &ZkCertificate) -> CertificateResult<CircuitInputs> {
    let proof = certificate.proof()?;
    let mut inputs = CircuitInputs::new();

    for (name, value) in certificate.content.named_fields()? {
        inputs.insert_scalar(name, value);
    }
    inputs.insert_scalar("contentHash", certificate.content_hash);
    inputs.insert_scalar("holderCommitment", certificate.holder_commitment);
    inputs.insert_scalar("randomSalt", certificate.random_salt);

    let provider = &certificate.provider;
    inputs.insert_scalar("providerAx", provider.public_key.x);
    inputs.insert_scalar("providerAy", provider.public_key.y);
    inputs.insert_scalar("providerR8x", provider.signature.r8.x);
    inputs.insert_scalar("providerR8y", provider.signature.r8.y);
    inputs.insert_scalar("providerS", provider.signature.s);

    inputs.insert_scalar("merkleRoot", proof.root);
    inputs.insert_scalar("leafIndex", FieldElement::from_u64(proof.leaf_index));
    inputs.insert_array("pathElements", &proof.path_elements);
    Ok(inputs)
}

/// [`ownership_inputs`] plus the per-dApp human ID of a zkKYC certificate.
pub fn kyc_inputs(certificate: &ZkCertificate, dapp_address: &str) -> CertificateResult<CircuitInputs> {
    let CertificateContent::Kyc(kyc) = &certificate.content else {
        return Err(CertificateError::UnknownStandard(format!(
            "{} is not a zkKYC certificate",
            certificate.standard()
        )));
    };
    let mut inputs = ownership_inputs(certificate)?;
    inputs.insert_scalar("dAppAddress", encode_address(dapp_address)?);
    inputs.insert_scalar("humanID", compute_human_id_hash(kyc, dapp_address)?);
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::{sample_account, sample_kyc};
    use zkcert_crypto::derive_key_from_signature;
    use zkcert_registry::MerkleAccumulator;

    fn registered(content: CertificateContent) -> ZkCertificate {
        let holder = derive_key_from_signature(&[0x61; 65]).unwrap();
        let provider = derive_key_from_signature(&[0x62; 65]).unwrap();
        let mut cert = ZkCertificate::issue(
            content,
            holder.holder_commitment().unwrap(),
            &provider,
            FieldElement::from_u64(77),
        )
        .unwrap();
        let mut tree = MerkleAccumulator::new(32).unwrap();
        tree.insert_leaves(&[FieldElement::from_u64(1), FieldElement::from_u64(2)])
            .unwrap();
        cert.register(&mut tree).unwrap();
        cert
    }

    #[test]
    fn test_ownership_inputs_are_decimal_strings() {
        let cert = registered(CertificateContent::Kyc(sample_kyc()));
        let inputs = ownership_inputs(&cert).unwrap();
        assert_eq!(
            inputs.get("leafIndex"),
            Some(&InputValue::Scalar("2".to_string()))
        );
        assert_eq!(
            inputs.get("yearOfBirth"),
            Some(&InputValue::Scalar("1989".to_string()))
        );
        match inputs.get("pathElements") {
            Some(InputValue::Array(path)) => assert_eq!(path.len(), 32),
            other => panic!("unexpected pathElements {other:?}"),
        }

        let json: serde_json::Value = serde_json::from_str(&inputs.to_json().unwrap()).unwrap();
        for (_, value) in json.as_object().unwrap() {
            let strings: Vec<&serde_json::Value> = match value {
                serde_json::Value::Array(items) => items.iter().collect(),
                scalar => vec![scalar],
            };
            for s in strings {
                let digits = s.as_str().unwrap();
                assert!(digits.parse::<FieldElement>().is_ok());
            }
        }
    }

    #[test]
    fn test_missing_proof() {
        let mut cert = registered(CertificateContent::Kyc(sample_kyc()));
        cert.merkle_proof = None;
        assert!(matches!(
            ownership_inputs(&cert),
            Err(CertificateError::MissingMerkleProof)
        ));
    }

    #[test]
    fn test_kyc_inputs_carry_human_id() {
        let cert = registered(CertificateContent::Kyc(sample_kyc()));
        let dapp = "0x00000000000000000000000000000000000000aa";
        let inputs = kyc_inputs(&cert, dapp).unwrap();
        assert_eq!(
            inputs.get("dAppAddress"),
            Some(&InputValue::Scalar("170".to_string()))
        );
        assert!(inputs.get("humanID").is_some());

        let account = registered(CertificateContent::XAccount(sample_account()));
        assert!(kyc_inputs(&account, dapp).is_err());
    }
}
