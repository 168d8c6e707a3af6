//! Shared integration-test harness: an engine with one auction house,
//! funded wallets and minted assets.

#![allow(dead_code)]

use haus_engine::{
    AssetMetadata, AuctionHouseClient, AuctionHouseEngine, Creator, HouseSettings,
    InMemoryMetadata, Instruction, OrderTerms, Sale, SignedTransaction,
};
use haus_ledger::Keypair;
use haus_types::constants::{NATIVE_MINT, VAULT_SIZE};
use haus_types::{Address, EngineConfig, Receipt, Result};
use tracing_subscriber::EnvFilter;

pub const SOL: u64 = 1_000_000_000;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A fresh address nobody has used yet.
pub fn fresh_address() -> Address {
    Keypair::generate().address()
}

/// A listed or listable asset: its mint and the account holding it.
#[derive(Debug, Clone, Copy)]
pub struct Asset {
    pub mint: Address,
    pub token_account: Address,
}

pub struct Harness {
    pub engine: AuctionHouseEngine,
    pub client: AuctionHouseClient,
    pub authority: Keypair,
    nonce: u64,
}

impl Harness {
    /// A native-currency house.
    pub fn native(fee_bps: u16, requires_sign_off: bool, can_change_sale_price: bool) -> Self {
        Self::build(
            EngineConfig::default(),
            NATIVE_MINT,
            fee_bps,
            requires_sign_off,
            can_change_sale_price,
        )
    }

    /// A native-currency house on an engine with a custom config.
    pub fn native_with_config(config: EngineConfig, fee_bps: u16) -> Self {
        Self::build(config, NATIVE_MINT, fee_bps, false, false)
    }

    /// A house settling in `currency_mint`, with the authority's currency
    /// token accounts as withdrawal destinations.
    pub fn token(
        currency_mint: Address,
        fee_bps: u16,
        requires_sign_off: bool,
        can_change_sale_price: bool,
    ) -> Self {
        Self::build(
            EngineConfig::default(),
            currency_mint,
            fee_bps,
            requires_sign_off,
            can_change_sale_price,
        )
    }

    fn build(
        config: EngineConfig,
        currency_mint: Address,
        fee_bps: u16,
        requires_sign_off: bool,
        can_change_sale_price: bool,
    ) -> Self {
        init_tracing();
        let mut engine = AuctionHouseEngine::new(config, InMemoryMetadata::new())
            .expect("harness config is valid");
        let authority = Keypair::generate();
        engine
            .ledger_mut()
            .airdrop(authority.address(), 10 * SOL)
            .unwrap();
        let client =
            AuctionHouseClient::new(*engine.program_id(), authority.address(), currency_mint)
                .unwrap();
        let mut harness = Self {
            engine,
            client,
            authority,
            nonce: 0,
        };

        let owner = harness.authority.address();
        let (fee_destination, treasury_destination) = if currency_mint.is_native_mint() {
            (owner, owner)
        } else {
            (
                harness.token_account(currency_mint, owner),
                harness.token_account(currency_mint, owner),
            )
        };
        let create = harness.client.create(
            owner,
            &HouseSettings {
                fee_withdrawal_destination: fee_destination,
                treasury_withdrawal_destination: treasury_destination,
                treasury_withdrawal_destination_owner: owner,
                seller_fee_basis_points: fee_bps,
                requires_sign_off,
                can_change_sale_price,
            },
        );
        harness.submit_with_authority(create, &[]).unwrap();
        harness
    }

    pub fn submit(&mut self, instruction: Instruction, signers: &[&Keypair]) -> Result<Receipt> {
        let tx = self.sign(instruction, signers)?;
        self.engine.process(&tx)
    }

    /// Sign under the next nonce without submitting.
    pub fn sign(
        &mut self,
        instruction: Instruction,
        signers: &[&Keypair],
    ) -> Result<SignedTransaction> {
        self.nonce += 1;
        SignedTransaction::sign(instruction, self.nonce, signers)
    }

    /// Submit co-signed by the house authority.
    pub fn submit_with_authority(
        &mut self,
        instruction: Instruction,
        signers: &[&Keypair],
    ) -> Result<Receipt> {
        self.nonce += 1;
        let mut all = vec![&self.authority];
        all.extend_from_slice(signers);
        let tx = SignedTransaction::sign(instruction, self.nonce, &all)?;
        self.engine.process(&tx)
    }

    pub fn wallet(&mut self, lamports: u64) -> Keypair {
        let wallet = Keypair::generate();
        self.engine
            .ledger_mut()
            .airdrop(wallet.address(), lamports)
            .unwrap();
        wallet
    }

    pub fn token_account(&mut self, mint: Address, owner: Address) -> Address {
        let address = fresh_address();
        self.engine
            .ledger_mut()
            .create_token_account(address, mint, owner)
            .unwrap();
        address
    }

    /// Mint a one-of-one asset with metadata into a new account of `owner`.
    pub fn mint_asset(&mut self, owner: &Address) -> Asset {
        let mint = fresh_address();
        let token_account = self.token_account(mint, *owner);
        self.engine.ledger_mut().mint_to(token_account, 1).unwrap();
        self.engine.metadata_mut().insert(AssetMetadata {
            mint,
            name: "Haus Test Piece".into(),
            symbol: "HTP".into(),
            uri: "https://example.invalid/piece.json".into(),
            seller_fee_basis_points: 500,
            creators: vec![Creator {
                address: *owner,
                verified: true,
                share: 100,
            }],
        });
        Asset {
            mint,
            token_account,
        }
    }

    pub fn terms(asset: &Asset, price: u64) -> OrderTerms {
        OrderTerms {
            token_mint: asset.mint,
            price,
            token_size: 1,
        }
    }

    /// Native-currency sale of `asset` from `seller` to `buyer`.
    pub fn sale(
        &self,
        buyer: &Keypair,
        seller: &Keypair,
        asset: &Asset,
        buyer_receipt_token_account: Address,
        price: u64,
    ) -> Sale {
        Sale {
            buyer: buyer.address(),
            seller: seller.address(),
            authority: self.authority.address(),
            token_account: asset.token_account,
            buyer_receipt_token_account,
            seller_payment_receipt_account: seller.address(),
            public_bid: false,
            terms: Self::terms(asset, price),
        }
    }

    pub fn deposit(&mut self, wallet: &Keypair, amount: u64) -> Result<Receipt> {
        let ix = self
            .client
            .deposit(wallet.address(), wallet.address(), amount)?;
        self.submit(ix, &[wallet])
    }

    pub fn list(&mut self, seller: &Keypair, asset: &Asset, price: u64) -> Result<Receipt> {
        let ix = self.client.sell(
            seller.address(),
            asset.token_account,
            &Self::terms(asset, price),
        )?;
        self.submit(ix, &[seller])
    }

    pub fn bid(&mut self, buyer: &Keypair, asset: &Asset, price: u64) -> Result<Receipt> {
        let ix = self.client.buy(
            buyer.address(),
            asset.token_account,
            &Self::terms(asset, price),
        )?;
        self.submit(ix, &[buyer])
    }

    pub fn lamports(&self, address: &Address) -> u64 {
        self.engine.ledger().lamports(address)
    }

    pub fn exists(&self, address: &Address) -> bool {
        self.engine.ledger().exists(address)
    }

    pub fn token_amount(&self, address: &Address) -> u64 {
        self.engine.ledger().token_amount(address)
    }

    pub fn escrow(&self, wallet: &Keypair) -> Address {
        self.client.escrow(&wallet.address()).unwrap().0
    }

    /// Native balance a vault can pay out.
    pub fn spendable(&self, vault: &Address) -> u64 {
        let floor = self.engine.ledger().rent().minimum_balance(VAULT_SIZE);
        self.lamports(vault).saturating_sub(floor)
    }

    pub fn trade_state(&self, wallet: &Keypair, asset: &Asset, price: u64) -> Address {
        self.client
            .trade_state(
                wallet.address(),
                Some(asset.token_account),
                &Self::terms(asset, price),
            )
            .unwrap()
            .0
    }

    pub fn free_trade_state(&self, wallet: &Keypair, asset: &Asset, price: u64) -> Address {
        self.client
            .free_trade_state(
                wallet.address(),
                asset.token_account,
                &Self::terms(asset, price),
            )
            .unwrap()
            .0
    }
}
