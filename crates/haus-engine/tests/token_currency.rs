//! A house settling in a fungible token rather than the native currency.

mod common;

use common::{fresh_address, Harness, SOL};
use haus_engine::Sale;
use haus_types::{Address, ErrorKind, Vault};

fn vault(h: &Harness, address: &Address) -> Option<Vault> {
    h.engine
        .ledger()
        .get(address)
        .and_then(|a| a.as_vault())
        .cloned()
}

fn currency_account(h: &mut Harness, currency: Address, owner: Address, amount: u64) -> Address {
    let account = h.token_account(currency, owner);
    if amount > 0 {
        h.engine.ledger_mut().mint_to(account, amount).unwrap();
    }
    account
}

#[test]
fn token_house_settles_in_currency_tokens() {
    let currency = fresh_address();
    let mut h = Harness::token(currency, 250, false, false);
    let seller = h.wallet(SOL);
    let buyer = h.wallet(SOL);
    let asset = h.mint_asset(&seller.address());
    let buyer_receipt = h.token_account(asset.mint, buyer.address());
    let buyer_funds = currency_account(&mut h, currency, buyer.address(), 5_000);
    let seller_funds = currency_account(&mut h, currency, seller.address(), 0);
    let supply_before = h.engine.ledger().token_supply()[&currency];

    let deposit = h
        .client
        .deposit(buyer.address(), buyer_funds, 1_000)
        .unwrap();
    h.submit(deposit, &[&buyer]).unwrap();
    let escrow = h.escrow(&buyer);
    assert_eq!(h.token_amount(&buyer_funds), 4_000);
    assert_eq!(vault(&h, &escrow).map(|v| v.token_balance), Some(1_000));

    h.list(&seller, &asset, 1_000).unwrap();
    h.bid(&buyer, &asset, 1_000).unwrap();

    let sale = h
        .client
        .execute_sale(&Sale {
            buyer: buyer.address(),
            seller: seller.address(),
            authority: h.authority.address(),
            token_account: asset.token_account,
            buyer_receipt_token_account: buyer_receipt,
            seller_payment_receipt_account: seller_funds,
            public_bid: false,
            terms: Harness::terms(&asset, 1_000),
        })
        .unwrap();
    let receipt = h.submit(sale, &[]).unwrap();
    assert_eq!(receipt.body.fee, 25);

    assert_eq!(h.token_amount(&seller_funds), 975);
    assert_eq!(
        vault(&h, &h.client.fee_account()).map(|v| v.token_balance),
        Some(25)
    );
    assert!(!h.exists(&escrow));
    assert_eq!(h.token_amount(&buyer_receipt), 1);
    assert_eq!(h.engine.ledger().token_supply()[&currency], supply_before);

    let destination = h
        .engine
        .ledger()
        .get(&h.client.auction_house())
        .and_then(|a| a.as_auction_house())
        .map(|house| house.fee_withdrawal_destination)
        .unwrap();
    let authority = h.authority.address();
    h.submit_with_authority(h.client.withdraw_from_fee(authority, destination, 25), &[])
        .unwrap();
    assert_eq!(h.token_amount(&destination), 25);
    assert_eq!(
        vault(&h, &h.client.fee_account()).map(|v| v.token_balance),
        Some(0)
    );
}

#[test]
fn token_house_rejects_foreign_currency_accounts() {
    let currency = fresh_address();
    let mut h = Harness::token(currency, 250, false, false);
    let buyer = h.wallet(SOL);
    let other_currency = currency_account(&mut h, fresh_address(), buyer.address(), 1_000);

    let deposit = h
        .client
        .deposit(buyer.address(), other_currency, 500)
        .unwrap();
    let err = h.submit(deposit, &[&buyer]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    // Paying with the wallet itself only works for native houses.
    let deposit = h
        .client
        .deposit(buyer.address(), buyer.address(), 500)
        .unwrap();
    let err = h.submit(deposit, &[&buyer]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAccount);
}

#[test]
fn token_escrow_withdraws_to_own_currency_account() {
    let currency = fresh_address();
    let mut h = Harness::token(currency, 0, false, false);
    let buyer = h.wallet(SOL);
    let funds = currency_account(&mut h, currency, buyer.address(), 800);

    let deposit = h.client.deposit(buyer.address(), funds, 800).unwrap();
    h.submit(deposit, &[&buyer]).unwrap();
    assert_eq!(h.token_amount(&funds), 0);

    let lamports_before = h.lamports(&buyer.address());
    let withdraw = h
        .client
        .withdraw(buyer.address(), funds, h.authority.address(), 800)
        .unwrap();
    h.submit(withdraw, &[&buyer]).unwrap();
    assert_eq!(h.token_amount(&funds), 800);
    assert!(!h.exists(&h.escrow(&buyer)));
    assert!(h.lamports(&buyer.address()) > lamports_before);
}
