//! Certificate lifecycle across the crates

use x25519_dalek::PublicKey as X25519PublicKey;
use zkcert_certificate::{
    decrypt_certificate, encrypt_certificate, kyc_inputs, ownership_inputs, InputValue,
};
use zkcert_core::Config;
use zkcert_crypto::derive_encryption_key_from_signature;
use zkcert_registry::{InMemoryRegistry, MerkleAccumulator, SyncStatus, TreeRebuilder};

use crate::test_utils::{init_tracing, issue_kyc, wallet_key, wallet_signature};

#[test]
fn test_issue_register_export_prove() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_toml_str("[merkle]\ndepth = 32\npage_size = 4\n")?;

    let holder = wallet_key(10)?;
    let provider = wallet_key(20)?;
    let mut registry = InMemoryRegistry::new(config.merkle.depth)?;
    for i in 0..6 {
        registry
            .tree_mut()
            .insert_leaf(zkcert_core::FieldElement::from_u64(1000 + i))?;
    }

    let mut certificate = issue_kyc(&holder, &provider, 555)?;
    certificate.verify_provider_signature()?;
    let index = certificate.register(registry.tree_mut())?;
    assert_eq!(index, 6);

    // The holder rebuilds its own mirror before proving.
    let rebuilder = TreeRebuilder::from_config(&registry, &config.merkle);
    let mut mirror = MerkleAccumulator::from_config(&config.merkle)?;
    let status = rebuilder.sync(&mut mirror)?;
    assert!(matches!(status, SyncStatus::Complete { leaf_count: 7, .. }));
    certificate.refresh_proof(&mirror)?;
    certificate.proof()?.ensure_fresh(registry.tree().root())?;

    let storage_secret = derive_encryption_key_from_signature(&wallet_signature(10))?;
    let exported = encrypt_certificate(
        &certificate,
        &X25519PublicKey::from(&storage_secret),
        &mut rand::thread_rng(),
    )?;
    let restored = decrypt_certificate(&exported, &storage_secret)?;
    assert_eq!(restored, certificate);

    let inputs = ownership_inputs(&restored)?;
    assert_eq!(
        inputs.get("leafIndex"),
        Some(&InputValue::Scalar("6".to_string()))
    );
    assert_eq!(
        inputs.get("holderCommitment"),
        Some(&InputValue::Scalar(
            holder.holder_commitment()?.to_decimal_string()
        ))
    );
    let with_human_id = kyc_inputs(&restored, "0x5FbDB2315678afecb367f032d93F642f64180aa3")?;
    assert_eq!(with_human_id.len(), inputs.len() + 2);
    Ok(())
}

#[test]
fn test_new_registration_makes_held_proof_stale() -> anyhow::Result<()> {
    let holder = wallet_key(11)?;
    let provider = wallet_key(21)?;
    let mut tree = MerkleAccumulator::new(32)?;

    let mut first = issue_kyc(&holder, &provider, 1)?;
    first.register(&mut tree)?;
    let mut second = issue_kyc(&holder, &provider, 2)?;
    second.register(&mut tree)?;

    let err = first.proof()?.ensure_fresh(tree.root()).unwrap_err();
    assert!(err.is_retryable());
    first.refresh_proof(&tree)?;
    first.proof()?.ensure_fresh(tree.root())?;
    assert_ne!(first.leaf_hash()?, second.leaf_hash()?);
    Ok(())
}

#[test]
fn test_revoke_and_reissue_at_same_index() -> anyhow::Result<()> {
    let holder = wallet_key(12)?;
    let provider = wallet_key(22)?;
    let mut tree = MerkleAccumulator::new(32)?;

    let mut original = issue_kyc(&holder, &provider, 7)?;
    let index = original.register(&mut tree)?;
    tree.revoke_leaf(index)?;
    assert!(tree.get_leaf_index(&original.leaf_hash()?).is_err());

    let mut replacement = issue_kyc(&holder, &provider, 8)?;
    tree.reissue_leaf(index, replacement.leaf_hash()?)?;
    replacement.refresh_proof(&tree)?;
    assert_eq!(replacement.proof()?.leaf_index, index);
    replacement.proof()?.ensure_fresh(tree.root())?;
    Ok(())
}
