//! Concrete scenarios with fixed values

use zkcert_core::FieldElement;
use zkcert_crypto::{cipher, reconstruct, ShamirShare, SharingPolynomial};
use zkcert_registry::{verify_proof, MerkleAccumulator};

use crate::test_utils::{init_tracing, wallet_key};

#[test]
fn test_two_leaf_registry_and_swapped_path() -> anyhow::Result<()> {
    init_tracing();
    let leaves: [FieldElement; 2] = [
        "19630604862894493237865119507631642105595355222686969752403793856928034143008".parse()?,
        "913338630289763938167212770624253461411251029088142596559861590717003723041".parse()?,
    ];
    let tree = MerkleAccumulator::from_leaves(32, &leaves)?;

    for index in 0..2u64 {
        let proof = tree.create_proof(index)?;
        assert_eq!(proof.leaf, leaves[index as usize]);
        assert_eq!(proof.path_elements.len(), 32);
        assert!(verify_proof(&proof));
        proof.ensure_fresh(tree.root())?;

        let mut swapped = proof.clone();
        swapped.path_elements.swap(1, 2);
        assert!(!verify_proof(&swapped));
    }
    Ok(())
}

#[test]
fn test_shamir_secret_three_threshold_three() -> anyhow::Result<()> {
    let secret = FieldElement::from_u64(3);
    let salt = FieldElement::from_u64(2024);
    let polynomial = SharingPolynomial::from_salt(secret, 3, salt)?;

    let first: Vec<ShamirShare> = zkcert_crypto::split(secret, 3, 3, salt)?;
    assert_eq!(first.iter().map(|s| s.index).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(first[0], polynomial.share(1)?);
    assert_eq!(reconstruct(3, &first)?, secret);

    let later = [polynomial.share(3)?, polynomial.share(4)?, polynomial.share(5)?];
    assert_eq!(reconstruct(3, &later)?, secret);

    let mut corrupted = later;
    corrupted[1].value = FieldElement::from_u64(345278543);
    assert_ne!(reconstruct(3, &corrupted)?, secret);
    Ok(())
}

#[test]
fn test_ecdh_and_cipher_between_wallet_keys() -> anyhow::Result<()> {
    let holder = wallet_key(1)?;
    let authority = wallet_key(2)?;
    let stranger = wallet_key(3)?;

    let holder_side = holder.ecdh(&authority.public_key())?;
    let authority_side = authority.ecdh(&holder.public_key())?;
    assert_eq!(holder_side, authority_side);
    assert_ne!(holder_side, holder.ecdh(&stranger.public_key())?);

    let message = (FieldElement::from_u64(31337), FieldElement::from_u64(4));
    let nonce = FieldElement::from_u64(1);
    let payload = cipher::encrypt(message.0, message.1, &holder_side, nonce)?;
    assert_eq!(cipher::decrypt(&payload, &authority_side)?, message);
    Ok(())
}
