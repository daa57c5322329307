//! Deployment flows: bootstrapping a router from nothing, discovering its
//! configuration through introspection, and handing over ownership.

use crate::harness::{
    TestBed, BUYER, CUT_ADDR, INTROSPECT_ADDR, MARKET_ADDR, OWNER, OWNERSHIP_ADDR, STRANGER,
    TOKEN_ADDR,
};
use dispatch_core::codec;
use dispatch_core::cut::CutModule;
use dispatch_core::errors::DispatchError;
use dispatch_core::module::Module;
use dispatch_core::ownership;
use module_introspect::{self as introspect_ops, ModuleSummary};
use module_token::module as token_ops;
use module_token::TokenModule;
use shared_types::{Address, Selector};

#[test]
fn test_fresh_router_routes_only_the_cut() {
    let mut bed = TestBed::core();
    let modules = bed.router.state().registry().modules().to_vec();
    assert_eq!(modules, vec![CUT_ADDR]);

    // Domain operations do not resolve until a cut routes them.
    let payload = codec::encode(&1u64).unwrap();
    let err = bed.call(OWNER, token_ops::OWNER_OF, &payload).unwrap_err();
    assert!(matches!(err, DispatchError::UnknownOperation(_)));
}

#[test]
fn test_domain_cut_routes_every_module() {
    let mut bed = TestBed::core();
    bed.cut(OWNER, &TestBed::domain_cut()).unwrap();

    let summaries: Vec<ModuleSummary> = bed.query(STRANGER, introspect_ops::MODULE_SUMMARIES, &[]);
    let modules: Vec<Address> = summaries.iter().map(|s| s.module).collect();
    assert_eq!(
        modules,
        vec![
            CUT_ADDR,
            OWNERSHIP_ADDR,
            INTROSPECT_ADDR,
            TOKEN_ADDR,
            MARKET_ADDR,
        ]
    );
    // Every selector in every summary resolves back to its module.
    for summary in &summaries {
        for selector in &summary.selectors {
            let payload = codec::encode(selector).unwrap();
            let owner: Option<Address> =
                bed.query(STRANGER, introspect_ops::OPERATION_MODULE, &payload);
            assert_eq!(owner, Some(summary.module));
        }
    }
}

#[test]
fn test_initialization_via_cut_init_call() {
    let mut bed = TestBed::core();
    let mut request = TestBed::domain_cut();
    request.init = Some(TestBed::init_call(
        TOKEN_ADDR,
        token_ops::INIT_TOKEN,
        &module_token::InitTokenRequest {
            name: "MarketNFT".into(),
            symbol: "MNFT".into(),
            max_supply: 7,
        },
    ));
    bed.cut(OWNER, &request).unwrap();

    let info: module_token::CollectionInfo =
        bed.query(STRANGER, token_ops::COLLECTION_INFO, &[]);
    assert_eq!(info.name, "MarketNFT");
    assert_eq!(info.max_supply, 7);
}

#[test]
fn test_operation_module_disagreement_is_impossible_after_deploy() {
    let mut bed = TestBed::new();
    // The registry's own invariants hold on the deployed configuration.
    assert!(dispatch_core::invariants::check_all(
        bed.router.state().registry()
    ));

    let payload = codec::encode(&TOKEN_ADDR).unwrap();
    let selectors: Vec<Selector> =
        bed.query(STRANGER, introspect_ops::MODULE_OPERATIONS, &payload);
    assert_eq!(selectors.len(), TokenModule.operations().len());
}

#[test]
fn test_ownership_handover_gates_upgrades_and_admin_ops() {
    let mut bed = TestBed::new();

    let payload = codec::encode(&BUYER).unwrap();
    bed.call(OWNER, ownership::TRANSFER_OWNERSHIP, &payload)
        .unwrap();
    let current: Address = bed.query(STRANGER, ownership::OWNER, &[]);
    assert_eq!(current, BUYER);

    // The previous owner lost the cut and the admin operations alike.
    let err = bed.cut(OWNER, &TestBed::domain_cut()).unwrap_err();
    assert_eq!(err, DispatchError::Unauthorized { caller: OWNER });
    let payload = codec::encode(&module_token::MintRequest {
        to: STRANGER,
        uri: "u".into(),
    })
    .unwrap();
    let err = bed.call(OWNER, token_ops::MINT, &payload).unwrap_err();
    assert_eq!(err, DispatchError::Unauthorized { caller: OWNER });

    // The new owner holds them now. The cut passes the guard and fails
    // later, on re-adding already-routed selectors.
    let err = bed.cut(BUYER, &TestBed::domain_cut()).unwrap_err();
    assert!(matches!(err, DispatchError::SelectorConflict { .. }));
    bed.call(BUYER, token_ops::MINT, &payload).unwrap();
}

#[test]
fn test_inert_router_rejects_even_the_cut() {
    use dispatch_core::router::{Router, RouterConfig};
    use shared_types::U256;

    // A router constructed with nothing registered can never recover: the
    // cut operation itself does not resolve.
    let mut router = Router::bare(RouterConfig {
        address: Address::repeat(0xDD),
        owner: OWNER,
        accept_plain_transfers: false,
    });
    let payload = codec::encode(&TestBed::domain_cut()).unwrap();
    let err = router
        .invoke(OWNER, U256::zero(), CutModule::selector(), &payload)
        .unwrap_err();
    assert_eq!(err, DispatchError::UnknownOperation(CutModule::selector()));
}

#[test]
fn test_cut_selector_survives_in_a_full_deployment() {
    let bed = TestBed::new();
    assert_eq!(
        bed.router.state().registry().resolve(CutModule::selector()),
        Some(CUT_ADDR)
    );
}
