//! Investigation flow from a registered certificate

use zkcert_certificate::investigation::{open_share, prepare_for_certificate, recover};
use zkcert_certificate::CertificateError;
use zkcert_crypto::{CurvePoint, KeyPair};

use crate::test_utils::{issue_kyc, wallet_key};

#[test]
fn test_any_two_of_three_authorities_recover_holder() -> anyhow::Result<()> {
    let holder = wallet_key(40)?;
    let provider = wallet_key(41)?;
    let certificate = issue_kyc(&holder, &provider, 99)?;

    let authorities: Vec<KeyPair> = (50..53).map(wallet_key).collect::<Result<_, _>>()?;
    let public_keys: Vec<CurvePoint> = authorities.iter().map(KeyPair::public_key).collect();
    let package =
        prepare_for_certificate(&certificate, &public_keys, 2, &mut rand::thread_rng())?;

    let json = serde_json::to_string(&package)?;
    let package: zkcert_certificate::InvestigationPackage = serde_json::from_str(&json)?;

    for pair in [[0, 1], [1, 2], [2, 0]] {
        let shares = pair
            .iter()
            .map(|&i| open_share(&package, &authorities[i]))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(recover(&package, &shares)?, certificate.holder_commitment);
    }

    let single = [open_share(&package, &authorities[0])?];
    assert!(matches!(
        recover(&package, &single),
        Err(CertificateError::InsufficientShares { needed: 2, got: 1 })
    ));
    Ok(())
}
