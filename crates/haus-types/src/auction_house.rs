//! The marketplace configuration record.

use serde::{Deserialize, Serialize};

use crate::{constants, Address, HausError, Result};

/// One marketplace instance, derived from `(creator, currency_mint)`.
///
/// `creator` is the authority at creation time and never changes, so the
/// record's address stays stable when `authority` is rotated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionHouse {
    /// Custody point for accumulated marketplace fees.
    pub fee_account: Address,
    /// Custody point for the treasury.
    pub treasury: Address,
    pub treasury_withdrawal_destination: Address,
    pub fee_withdrawal_destination: Address,
    /// Settlement currency; [`constants::NATIVE_MINT`] for the native unit.
    pub currency_mint: Address,
    pub authority: Address,
    pub creator: Address,
    pub bump: u8,
    pub treasury_bump: u8,
    pub fee_account_bump: u8,
    pub seller_fee_basis_points: u16,
    pub requires_sign_off: bool,
    pub can_change_sale_price: bool,
}

impl AuctionHouse {
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.currency_mint.is_native_mint()
    }

    /// Marketplace cut of a sale at `price`.
    pub fn marketplace_fee(&self, price: u64) -> Result<u64> {
        marketplace_fee(price, self.seller_fee_basis_points)
    }
}

/// Reject basis points above 10 000.
pub fn validate_basis_points(basis_points: u16) -> Result<()> {
    if basis_points > constants::MAX_BASIS_POINTS {
        return Err(HausError::InvalidBasisPoints(basis_points));
    }
    Ok(())
}

/// `price * basis_points / 10_000`, rounded down.
pub fn marketplace_fee(price: u64, basis_points: u16) -> Result<u64> {
    validate_basis_points(basis_points)?;
    let fee = u128::from(price)
        .checked_mul(u128::from(basis_points))
        .ok_or(HausError::NumericalOverflow)?
        / u128::from(constants::BASIS_POINTS_DENOMINATOR);
    u64::try_from(fee).map_err(|_| HausError::NumericalOverflow)
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl AuctionHouse {
    pub fn dummy(seller_fee_basis_points: u16) -> Self {
        Self {
            fee_account: Address([1u8; 32]),
            treasury: Address([2u8; 32]),
            treasury_withdrawal_destination: Address([3u8; 32]),
            fee_withdrawal_destination: Address([3u8; 32]),
            currency_mint: constants::NATIVE_MINT,
            authority: Address([4u8; 32]),
            creator: Address([4u8; 32]),
            bump: 255,
            treasury_bump: 255,
            fee_account_bump: 255,
            seller_fee_basis_points,
            requires_sign_off: false,
            can_change_sale_price: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_basis_point_of_two_sol() {
        assert_eq!(marketplace_fee(2_000_000_000, 1).unwrap(), 200_000);
        assert_eq!(2_000_000_000 - 200_000, 1_999_800_000);
    }

    #[test]
    fn fee_rounds_down() {
        assert_eq!(marketplace_fee(9_999, 1).unwrap(), 0);
        assert_eq!(marketplace_fee(10_001, 100).unwrap(), 100);
    }

    #[test]
    fn full_fee_takes_whole_price() {
        assert_eq!(marketplace_fee(u64::MAX, 10_000).unwrap(), u64::MAX);
    }

    #[test]
    fn zero_price_zero_fee() {
        assert_eq!(marketplace_fee(0, 500).unwrap(), 0);
    }

    #[test]
    fn basis_points_bounded() {
        assert!(validate_basis_points(10_000).is_ok());
        let err = validate_basis_points(10_001).unwrap_err();
        assert!(matches!(err, HausError::InvalidBasisPoints(10_001)));
        assert!(marketplace_fee(1, 10_001).is_err());
    }

    #[test]
    fn record_uses_its_fee_rate() {
        let house = AuctionHouse::dummy(250);
        assert_eq!(house.marketplace_fee(1_000_000).unwrap(), 25_000);
        assert!(house.is_native());
    }

    #[test]
    fn serde_roundtrip() {
        let house = AuctionHouse::dummy(1);
        let json = serde_json::to_string(&house).unwrap();
        let back: AuctionHouse = serde_json::from_str(&json).unwrap();
        assert_eq!(house, back);
    }
}
