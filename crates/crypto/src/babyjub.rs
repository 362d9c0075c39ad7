//! Baby Jubjub points as exchanged with circuits.
//!
//! The curve itself comes from `ark-babyjubjub`, which uses circomlib's
//! coefficients (`a = 168700`, `d = 168696`) and `Base8` as the generator of
//! the prime-order subgroup. This module adds the decimal-coordinate
//! [`CurvePoint`] and the validation counterparties' points must pass.

use ark_babyjubjub::{EdwardsAffine, EdwardsConfig};
use ark_ec::{twisted_edwards::TECurveConfig, AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};
use zkcert_core::FieldElement;

use crate::error::{CryptoError, CryptoResult};

/// Coordinate field, identical to `ark_bn254::Fr`.
pub type Fq = ark_babyjubjub::Fq;

/// Scalar field of the prime-order subgroup, order `l`.
pub type Scalar = ark_babyjubjub::Fr;

/// An affine point as exchanged with circuits and the registry.
///
/// Construction does not validate; call [`CurvePoint::validate`] (or
/// [`is_valid_public_point`]) before using a point received from outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: FieldElement,
    pub y: FieldElement,
}

impl CurvePoint {
    pub fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y }
    }

    /// The neutral element `(0, 1)`.
    pub fn identity() -> Self {
        Self::new(FieldElement::zero(), FieldElement::one())
    }

    pub fn is_identity(&self) -> bool {
        self.x.is_zero() && self.y == FieldElement::one()
    }

    /// `a*x^2 + y^2 == 1 + d*x^2*y^2`
    pub fn is_on_curve(&self) -> bool {
        self.to_affine().is_on_curve()
    }

    /// `l * P == O`. Only meaningful for points already on the curve.
    pub fn is_in_subgroup(&self) -> bool {
        self.to_affine().is_in_correct_subgroup_assuming_on_curve()
    }

    /// Reject points a counterparty must never supply.
    pub fn validate(&self) -> CryptoResult<()> {
        if !self.is_on_curve() {
            return Err(CryptoError::InvalidCurvePoint(format!(
                "({}, {}) is not on Baby Jubjub",
                self.x, self.y
            )));
        }
        if self.is_identity() {
            return Err(CryptoError::InvalidCurvePoint(
                "point is the identity".to_string(),
            ));
        }
        if !self.is_in_subgroup() {
            return Err(CryptoError::InvalidCurvePoint(
                "point is outside the prime-order subgroup".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn to_affine(self) -> EdwardsAffine {
        EdwardsAffine::new_unchecked(self.x.into_fr(), self.y.into_fr())
    }

    pub(crate) fn from_affine(point: &EdwardsAffine) -> Self {
        Self::new(point.x.into(), point.y.into())
    }

    /// Multiply by an arbitrary integer given as little-endian limbs.
    ///
    /// Used where circuits multiply by an unreduced field value (EdDSA's
    /// `8 * hm`), which differs from reducing mod `l` for points with a
    /// torsion component.
    pub(crate) fn mul_limbs(&self, limbs: &[u64]) -> Self {
        Self::from_affine(&self.to_affine().mul_bigint(limbs).into_affine())
    }
}

/// The generator `Base8`.
pub fn base_point() -> CurvePoint {
    CurvePoint::from_affine(&EdwardsConfig::GENERATOR)
}

pub fn is_valid_public_point(point: &CurvePoint) -> bool {
    point.validate().is_ok()
}

/// `scalar * Base8`
pub fn mul_base(scalar: &Scalar) -> CurvePoint {
    let product = EdwardsConfig::GENERATOR
        .mul_bigint(scalar.into_bigint())
        .into_affine();
    CurvePoint::from_affine(&product)
}

/// `scalar * point` for a validated counterparty point.
pub fn mul_point(point: &CurvePoint, scalar: &Scalar) -> CryptoResult<CurvePoint> {
    point.validate()?;
    Ok(point.mul_limbs(scalar.into_bigint().as_ref()))
}

pub fn add_points(a: &CurvePoint, b: &CurvePoint) -> CurvePoint {
    let sum = (a.to_affine().into_group() + b.to_affine().into_group()).into_affine();
    CurvePoint::from_affine(&sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::Zero;

    #[test]
    fn test_base_point_is_valid() {
        let base = base_point();
        assert!(base.is_on_curve());
        assert!(base.is_in_subgroup());
        assert!(is_valid_public_point(&base));
    }

    #[test]
    fn test_identity_rejected() {
        let identity = CurvePoint::identity();
        assert!(identity.is_on_curve());
        assert!(matches!(
            identity.validate(),
            Err(CryptoError::InvalidCurvePoint(_))
        ));
    }

    #[test]
    fn test_order_two_point_rejected() {
        let point = CurvePoint::new(FieldElement::zero(), -FieldElement::one());
        assert!(point.is_on_curve());
        assert!(!point.is_in_subgroup());
        assert!(!is_valid_public_point(&point));
    }

    #[test]
    fn test_off_curve_rejected() {
        let point = CurvePoint::new(FieldElement::from_u64(1), FieldElement::from_u64(2));
        assert!(!point.is_on_curve());
        assert!(mul_point(&point, &Scalar::from(5u64)).is_err());
    }

    #[test]
    fn test_scalar_multiplication_is_linear() {
        let two = mul_base(&Scalar::from(2u64));
        let three = mul_base(&Scalar::from(3u64));
        let five = mul_base(&Scalar::from(5u64));
        assert_eq!(add_points(&two, &three), five);
        assert_eq!(add_points(&base_point(), &base_point()), two);
        assert_eq!(mul_point(&two, &Scalar::from(3u64)).unwrap(), mul_base(&Scalar::from(6u64)));
    }

    #[test]
    fn test_order_of_base_point() {
        assert!(mul_base(&Scalar::zero()).is_identity());
        let limbs = Scalar::MODULUS;
        assert!(base_point().mul_limbs(limbs.as_ref()).is_identity());
    }

    #[test]
    fn test_serde_uses_decimal_coordinates() {
        let json = serde_json::to_value(base_point()).unwrap();
        assert_eq!(
            json["x"],
            "5299619240641551281634865583518297030282874472190772894086521144482721001553"
        );
        let back: CurvePoint = serde_json::from_value(json).unwrap();
        assert_eq!(back, base_point());
    }
}
