//! Shared deployment harness: a fully wired router with every module
//! installed, routed through a construction-time cut, and initialized the
//! way a production deployment would be.

use dispatch_core::codec;
use dispatch_core::cut::{CutAction, CutChange, CutModule, CutRequest, InitCall};
use dispatch_core::errors::DispatchError;
use dispatch_core::events::Event;
use dispatch_core::frame::Frame;
use dispatch_core::module::{Module, PaymentSink};
use dispatch_core::ownership::OwnershipModule;
use dispatch_core::router::{Router, RouterConfig};
use module_introspect::IntrospectModule;
use module_market::messages::{BuyItemRequest, ListItemRequest};
use module_market::module as market_ops;
use module_market::MarketModule;
use module_token::messages::{ApproveRequest, InitTokenRequest, MintRequest};
use module_token::module as token_ops;
use module_token::TokenModule;
use shared_types::{Address, Bytes, Selector, TokenId, U256};
use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// WELL-KNOWN ADDRESSES
// =============================================================================

/// Contract owner for every deployment the harness builds.
pub const OWNER: Address = Address::repeat(0x01);
/// Default seller account.
pub const SELLER: Address = Address::repeat(0x0A);
/// Default buyer account.
pub const BUYER: Address = Address::repeat(0x0B);
/// Spare third-party account.
pub const STRANGER: Address = Address::repeat(0x0C);

/// The router's own address, which is also the collection address.
pub const ROUTER_ADDR: Address = Address::repeat(0xD1);
/// Cut controller code address.
pub const CUT_ADDR: Address = Address::repeat(0xC0);
/// Ownership module code address.
pub const OWNERSHIP_ADDR: Address = Address::repeat(0xB0);
/// Introspection module code address.
pub const INTROSPECT_ADDR: Address = Address::repeat(0xB1);
/// Token module code address.
pub const TOKEN_ADDR: Address = Address::repeat(0xA1);
/// Marketplace module code address.
pub const MARKET_ADDR: Address = Address::repeat(0xA2);

/// Fee the harness initializes the marketplace with, in per-mille.
pub const FEE_PER_MILLE: u16 = 25;

// =============================================================================
// TEST BED
// =============================================================================

/// A deployed system under test.
pub struct TestBed {
    pub router: Router,
}

impl TestBed {
    /// Full deployment: all modules installed and routed, token collection
    /// and marketplace initialized.
    pub fn new() -> Self {
        let mut bed = Self::core();
        bed.cut(OWNER, &Self::domain_cut()).unwrap();

        let payload = codec::encode(&InitTokenRequest {
            name: "MarketNFT".into(),
            symbol: "MNFT".into(),
            max_supply: 100,
        })
        .unwrap();
        bed.call(OWNER, token_ops::INIT_TOKEN, &payload).unwrap();
        let payload = codec::encode(&FEE_PER_MILLE).unwrap();
        bed.call(OWNER, market_ops::INIT_MARKET, &payload).unwrap();
        bed
    }

    /// A router with every module's code installed but only the cut
    /// operation routed. Upgrade tests start here and route the rest
    /// themselves.
    pub fn core() -> Self {
        let mut router = Router::new(
            RouterConfig {
                address: ROUTER_ADDR,
                owner: OWNER,
                accept_plain_transfers: false,
            },
            CUT_ADDR,
            CutModule,
        );
        router.install(OWNERSHIP_ADDR, OwnershipModule);
        router.install(INTROSPECT_ADDR, IntrospectModule);
        router.install(TOKEN_ADDR, TokenModule);
        router.install(MARKET_ADDR, MarketModule);
        Self { router }
    }

    /// The cut that routes every domain module.
    pub fn domain_cut() -> CutRequest {
        CutRequest {
            changes: vec![
                CutChange {
                    module: OWNERSHIP_ADDR,
                    action: CutAction::Add,
                    selectors: OwnershipModule.selectors(),
                },
                CutChange {
                    module: INTROSPECT_ADDR,
                    action: CutAction::Add,
                    selectors: IntrospectModule.selectors(),
                },
                CutChange {
                    module: TOKEN_ADDR,
                    action: CutAction::Add,
                    selectors: TokenModule.selectors(),
                },
                CutChange {
                    module: MARKET_ADDR,
                    action: CutAction::Add,
                    selectors: MarketModule.selectors(),
                },
            ],
            init: None,
        }
    }

    /// Selector-prefixed calldata for an operation.
    pub fn calldata<T: serde::Serialize>(signature: &str, request: &T) -> Vec<u8> {
        let mut calldata = Selector::from_signature(signature).as_bytes().to_vec();
        calldata.extend(codec::encode(request).unwrap());
        calldata
    }

    /// An `InitCall` targeting `target` with the given operation.
    pub fn init_call<T: serde::Serialize>(
        target: Address,
        signature: &str,
        request: &T,
    ) -> InitCall {
        InitCall {
            target,
            payload: Self::calldata(signature, request),
        }
    }

    // -------------------------------------------------------------------------
    // Call helpers
    // -------------------------------------------------------------------------

    /// Value-free routed call.
    pub fn call(
        &mut self,
        caller: Address,
        signature: &'static str,
        payload: &[u8],
    ) -> Result<Bytes, DispatchError> {
        self.router.invoke(
            caller,
            U256::zero(),
            Selector::from_signature(signature),
            payload,
        )
    }

    /// Routed call with attached value.
    pub fn pay_call(
        &mut self,
        caller: Address,
        value: u64,
        signature: &'static str,
        payload: &[u8],
    ) -> Result<Bytes, DispatchError> {
        self.router.invoke(
            caller,
            U256::from(value),
            Selector::from_signature(signature),
            payload,
        )
    }

    /// Routed call returning the decoded response.
    pub fn query<T: serde::de::DeserializeOwned>(
        &mut self,
        caller: Address,
        signature: &'static str,
        payload: &[u8],
    ) -> T {
        let bytes = self.call(caller, signature, payload).unwrap();
        codec::decode(&bytes).unwrap()
    }

    /// Applies a cut as `caller`.
    pub fn cut(&mut self, caller: Address, request: &CutRequest) -> Result<Bytes, DispatchError> {
        let payload = codec::encode(request).unwrap();
        self.router
            .invoke(caller, U256::zero(), CutModule::selector(), &payload)
    }

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    /// Seeds `holder` with ledger funds.
    pub fn fund(&mut self, holder: Address, amount: u64) {
        self.router
            .state_mut()
            .ledger_mut()
            .deposit(holder, U256::from(amount));
    }

    /// Ledger balance of `holder`.
    pub fn balance(&self, holder: Address) -> U256 {
        self.router.state().ledger().balance_of(holder)
    }

    /// Mints a token to `to` as the owner.
    pub fn mint(&mut self, to: Address) -> TokenId {
        let payload = codec::encode(&MintRequest {
            to,
            uri: "ipfs://fixture".into(),
        })
        .unwrap();
        let bytes = self.call(OWNER, token_ops::MINT, &payload).unwrap();
        codec::decode(&bytes).unwrap()
    }

    /// Grants the marketplace a per-token approval as `holder`.
    pub fn approve_market(&mut self, holder: Address, token_id: TokenId) {
        let payload = codec::encode(&ApproveRequest {
            spender: ROUTER_ADDR,
            token_id,
        })
        .unwrap();
        self.call(holder, token_ops::APPROVE, &payload).unwrap();
    }

    /// Lists `token_id` as `seller`, returning the listing id.
    pub fn list(&mut self, seller: Address, token_id: TokenId, price: u64) -> u64 {
        let payload = codec::encode(&ListItemRequest {
            collection: ROUTER_ADDR,
            token_id,
            price: U256::from(price),
        })
        .unwrap();
        let bytes = self.call(seller, market_ops::LIST_ITEM, &payload).unwrap();
        codec::decode(&bytes).unwrap()
    }

    /// Mint + approve + list in one step.
    pub fn listed_token(&mut self, seller: Address, price: u64) -> (u64, TokenId) {
        let token_id = self.mint(seller);
        self.approve_market(seller, token_id);
        (self.list(seller, token_id, price), token_id)
    }

    /// Attempts to buy a listing with attached value.
    pub fn buy(
        &mut self,
        buyer: Address,
        listing_id: u64,
        token_id: TokenId,
        value: u64,
    ) -> Result<Bytes, DispatchError> {
        let payload = codec::encode(&BuyItemRequest {
            listing_id,
            collection: ROUTER_ADDR,
            token_id,
        })
        .unwrap();
        self.pay_call(buyer, value, market_ops::BUY_ITEM, &payload)
    }

    /// Current owner of a token.
    pub fn token_owner(&mut self, token_id: TokenId) -> Address {
        let payload = codec::encode(&token_id).unwrap();
        self.query(STRANGER, token_ops::OWNER_OF, &payload)
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[Event] {
        self.router.state().events()
    }

    /// Names of all emitted events, in order.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events().iter().map(|e| e.name).collect()
    }
}

impl Default for TestBed {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// PAYMENT SINKS
// =============================================================================

/// A recipient that refuses every payment.
pub struct RejectingSink;

impl PaymentSink for RejectingSink {
    fn on_payment(
        &self,
        _frame: &mut Frame<'_>,
        _from: Address,
        _amount: U256,
    ) -> Result<(), DispatchError> {
        Err(DispatchError::domain("payment refused"))
    }
}

/// A recipient that re-enters the router during its payment hook and records
/// what the nested call returned. The hook itself always accepts.
pub struct ReenteringSink {
    /// Identity the nested call runs under.
    pub caller: Address,
    /// Operation the sink re-enters with.
    pub signature: &'static str,
    /// Payload of the nested call.
    pub payload: Vec<u8>,
    /// Results observed by the nested calls, in order.
    pub observed: Rc<RefCell<Vec<Result<Bytes, DispatchError>>>>,
}

impl PaymentSink for ReenteringSink {
    fn on_payment(
        &self,
        frame: &mut Frame<'_>,
        _from: Address,
        _amount: U256,
    ) -> Result<(), DispatchError> {
        let result = frame.route(
            self.caller,
            Selector::from_signature(self.signature),
            &self.payload,
        );
        self.observed.borrow_mut().push(result);
        Ok(())
    }
}
