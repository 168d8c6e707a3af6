//! Escrow deposits and withdrawals, and authority payouts from the fee and
//! treasury accounts.

mod common;

use common::{Harness, SOL};
use haus_types::constants::VAULT_SIZE;
use haus_types::{ErrorKind, ReceiptKind};

#[test]
fn deposit_then_withdraw_closes_escrow() {
    let mut h = Harness::native(100, false, false);
    let buyer = h.wallet(3 * SOL);
    let escrow = h.escrow(&buyer);

    let receipt = h.deposit(&buyer, SOL).unwrap();
    assert_eq!(receipt.kind(), ReceiptKind::Deposit);
    assert_eq!(h.spendable(&escrow), SOL);
    let rent = h.engine.ledger().rent().minimum_balance(VAULT_SIZE);
    assert_eq!(h.lamports(&buyer.address()), 2 * SOL - rent);

    let withdraw = h
        .client
        .withdraw(buyer.address(), buyer.address(), h.authority.address(), SOL)
        .unwrap();
    let receipt = h.submit(withdraw, &[&buyer]).unwrap();
    assert_eq!(receipt.kind(), ReceiptKind::Withdraw);
    assert!(!h.exists(&escrow));
    assert_eq!(h.lamports(&buyer.address()), 3 * SOL);
}

#[test]
fn partial_withdraw_keeps_escrow_open() {
    let mut h = Harness::native(100, false, false);
    let buyer = h.wallet(3 * SOL);
    let escrow = h.escrow(&buyer);

    h.deposit(&buyer, SOL).unwrap();
    h.deposit(&buyer, SOL).unwrap();
    assert_eq!(h.spendable(&escrow), 2 * SOL);

    let withdraw = h
        .client
        .withdraw(buyer.address(), buyer.address(), h.authority.address(), SOL / 2)
        .unwrap();
    h.submit(withdraw, &[&buyer]).unwrap();
    assert!(h.exists(&escrow));
    assert_eq!(h.spendable(&escrow), SOL + SOL / 2);

    let too_much = h
        .client
        .withdraw(buyer.address(), buyer.address(), h.authority.address(), 2 * SOL)
        .unwrap();
    let err = h.submit(too_much, &[&buyer]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
}

#[test]
fn deposit_beyond_wallet_balance_fails() {
    let mut h = Harness::native(100, false, false);
    let buyer = h.wallet(SOL);
    let err = h.deposit(&buyer, 2 * SOL).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert!(!h.exists(&h.escrow(&buyer)));
    assert_eq!(h.lamports(&buyer.address()), SOL);
}

#[test]
fn open_bids_keep_their_collateral() {
    let mut h = Harness::native(100, false, false);
    let seller = h.wallet(SOL);
    let buyer = h.wallet(3 * SOL);
    let asset = h.mint_asset(&seller.address());
    let price = SOL * 6 / 10;

    h.deposit(&buyer, SOL).unwrap();
    h.bid(&buyer, &asset, price).unwrap();

    let withdraw = |h: &Harness, amount| {
        h.client
            .withdraw(buyer.address(), buyer.address(), h.authority.address(), amount)
            .unwrap()
    };
    let err = h
        .submit(withdraw(&h, SOL / 2), &[&buyer])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    h.submit(withdraw(&h, SOL * 4 / 10), &[&buyer]).unwrap();

    let cancel = h
        .client
        .cancel_bid(
            buyer.address(),
            h.authority.address(),
            Some(asset.token_account),
            &Harness::terms(&asset, price),
        )
        .unwrap();
    h.submit(cancel, &[&buyer]).unwrap();
    h.submit(withdraw(&h, price), &[&buyer]).unwrap();
    assert!(!h.exists(&h.escrow(&buyer)));
}

#[test]
fn authority_withdraws_to_wallet_only() {
    let mut h = Harness::native(100, false, false);
    let buyer = h.wallet(2 * SOL);
    let stranger = h.wallet(SOL);
    h.deposit(&buyer, SOL).unwrap();

    let to_stranger = h
        .client
        .withdraw(buyer.address(), stranger.address(), h.authority.address(), SOL)
        .unwrap();
    let err = h.submit_with_authority(to_stranger, &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAccount);

    let by_stranger = h
        .client
        .withdraw(buyer.address(), buyer.address(), stranger.address(), SOL)
        .unwrap();
    let err = h.submit(by_stranger, &[&stranger]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let before = h.lamports(&buyer.address());
    let by_authority = h
        .client
        .withdraw(buyer.address(), buyer.address(), h.authority.address(), SOL)
        .unwrap();
    h.submit_with_authority(by_authority, &[]).unwrap();
    let rent = h.engine.ledger().rent().minimum_balance(VAULT_SIZE);
    assert_eq!(h.lamports(&buyer.address()), before + SOL + rent);
}

#[test]
fn fee_account_pays_out_collected_fees() {
    let mut h = Harness::native(250, false, false);
    let seller = h.wallet(SOL);
    let buyer = h.wallet(3 * SOL);
    let asset = h.mint_asset(&seller.address());
    let buyer_receipt = h.token_account(asset.mint, buyer.address());

    h.list(&seller, &asset, SOL).unwrap();
    h.deposit(&buyer, SOL).unwrap();
    h.bid(&buyer, &asset, SOL).unwrap();
    let sale = h
        .client
        .execute_sale(&h.sale(&buyer, &seller, &asset, buyer_receipt, SOL))
        .unwrap();
    h.submit(sale, &[]).unwrap();

    let fee_account = h.client.fee_account();
    let authority = h.authority.address();
    assert_eq!(h.spendable(&fee_account), 25_000_000);

    let err = h
        .submit_with_authority(h.client.withdraw_from_fee(authority, authority, 25_000_001), &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

    let err = h
        .submit(
            h.client.withdraw_from_fee(authority, authority, 1),
            &[&seller],
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let err = h
        .submit_with_authority(
            h.client
                .withdraw_from_fee(authority, seller.address(), 1),
            &[],
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAccount);

    let before = h.lamports(&authority);
    let receipt = h
        .submit_with_authority(h.client.withdraw_from_fee(authority, authority, 25_000_000), &[])
        .unwrap();
    assert_eq!(receipt.kind(), ReceiptKind::FeeWithdrawal);
    assert_eq!(h.lamports(&authority), before + 25_000_000);
    assert_eq!(h.spendable(&fee_account), 0);
    // The account itself survives at its rent minimum.
    assert!(h.exists(&fee_account));
}

#[test]
fn treasury_never_drops_below_rent() {
    let mut h = Harness::native(100, false, false);
    let treasury = h.client.treasury();
    let authority = h.authority.address();
    h.engine.ledger_mut().airdrop(treasury, 5 * SOL).unwrap();
    assert_eq!(h.spendable(&treasury), 5 * SOL);

    let err = h
        .submit_with_authority(
            h.client
                .withdraw_from_treasury(authority, authority, 5 * SOL + 1),
            &[],
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

    let receipt = h
        .submit_with_authority(
            h.client.withdraw_from_treasury(authority, authority, 5 * SOL),
            &[],
        )
        .unwrap();
    assert_eq!(receipt.kind(), ReceiptKind::TreasuryWithdrawal);
    let rent = h.engine.ledger().rent().minimum_balance(VAULT_SIZE);
    assert_eq!(h.lamports(&treasury), rent);
}
