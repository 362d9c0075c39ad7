//! Registry scenarios at the production depth.

use std::sync::atomic::Ordering;

use zkcert_core::FieldElement;
use zkcert_registry::{
    empty_leaf, verify_proof, AccumulatorError, InMemoryRegistry, MerkleAccumulator, MerkleProof,
    SyncStatus, TreeRebuilder,
};

const LEAF_A: &str =
    "19630604862894493237865119507631642105595355222686969752403793856928034143008";
const LEAF_B: &str =
    "913338630289763938167212770624253461411251029088142596559861590717003723041";

fn two_leaf_tree() -> anyhow::Result<MerkleAccumulator> {
    let leaves = [LEAF_A.parse()?, LEAF_B.parse()?];
    Ok(MerkleAccumulator::from_leaves(32, &leaves)?)
}

#[test]
fn test_two_leaf_depth_32_proofs() -> anyhow::Result<()> {
    let tree = two_leaf_tree()?;
    assert_eq!(tree.leaf_count(), 2);

    for index in 0..2 {
        let proof = tree.create_proof(index)?;
        assert_eq!(proof.path_elements.len(), 32);
        assert_eq!(proof.root, tree.root());
        assert!(verify_proof(&proof));
    }

    let proof_a = tree.create_proof(0)?;
    assert_eq!(proof_a.path_elements[0].to_decimal_string(), LEAF_B);
    assert_eq!(tree.get_leaf_index(&LEAF_B.parse()?)?, 1);
    Ok(())
}

#[test]
fn test_swapped_path_elements_fail() -> anyhow::Result<()> {
    let tree = two_leaf_tree()?;
    let mut proof = tree.create_proof(1)?;
    proof.path_elements.swap(1, 2);
    assert!(!verify_proof(&proof));
    assert_eq!(
        proof.ensure_fresh(tree.root()),
        Err(AccumulatorError::InvalidProof)
    );
    Ok(())
}

#[test]
fn test_proof_json_round_trip_keeps_validity() -> anyhow::Result<()> {
    let tree = two_leaf_tree()?;
    let json = serde_json::to_string(&tree.create_proof(0)?)?;
    assert!(json.contains("\"leafIndex\":0"));
    let proof: MerkleProof = serde_json::from_str(&json)?;
    proof.ensure_fresh(tree.root())?;
    Ok(())
}

#[test]
fn test_stale_proof_after_insertion_in_subtree() -> anyhow::Result<()> {
    let mut tree = two_leaf_tree()?;
    let proof = tree.create_proof(1)?;
    tree.insert_leaf(FieldElement::from_u64(3))?;
    assert!(proof.verify());
    let err = proof.ensure_fresh(tree.root()).unwrap_err();
    assert!(err.is_retryable());

    let fresh = tree.create_proof(1)?;
    fresh.ensure_fresh(tree.root())?;
    Ok(())
}

#[test]
fn test_revocation_then_rebuild_from_registry() -> anyhow::Result<()> {
    let leaves: Vec<FieldElement> = (1..=40).map(FieldElement::from_u64).collect();
    let mut remote = InMemoryRegistry::from_leaves(32, &leaves)?;
    remote.tree_mut().revoke_leaf(7)?;
    remote.tree_mut().reissue_leaf(7, FieldElement::from_u64(700))?;
    remote.tree_mut().revoke_leaf(9)?;
    assert_eq!(remote.tree().leaves()[9], empty_leaf());

    let rebuilder = TreeRebuilder::new(&remote).with_page_size(16);
    let (mut tree, status) = rebuilder.rebuild(32)?;
    assert_eq!(
        status,
        SyncStatus::Complete {
            root: remote.tree().root(),
            leaf_count: 40
        }
    );
    assert_eq!(tree.get_leaf_index(&FieldElement::from_u64(700))?, 7);
    assert!(tree.is_revoked(9));
    assert!(!tree.is_revoked(7));

    tree.reissue_leaf(9, FieldElement::from_u64(900))?;
    remote.tree_mut().reissue_leaf(9, FieldElement::from_u64(900))?;
    assert_eq!(tree.root(), remote.tree().root());
    Ok(())
}

#[test]
fn test_cancelled_rebuild_resumes() -> anyhow::Result<()> {
    let leaves: Vec<FieldElement> = (1..=12).map(FieldElement::from_u64).collect();
    let remote = InMemoryRegistry::from_leaves(32, &leaves)?;
    let rebuilder = TreeRebuilder::new(&remote).with_page_size(5);
    let flag = rebuilder.cancel_flag();

    let mut tree = MerkleAccumulator::new(32)?;
    flag.store(true, Ordering::SeqCst);
    assert_eq!(rebuilder.sync(&mut tree)?, SyncStatus::Cancelled { next_index: 0 });

    flag.store(false, Ordering::SeqCst);
    assert!(matches!(
        rebuilder.sync(&mut tree)?,
        SyncStatus::Complete { leaf_count: 12, .. }
    ));
    Ok(())
}
