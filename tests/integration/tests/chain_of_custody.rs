//! Integration test: Supersession chains and payload verification.
//!
//! Mirrors the evidence workflow: an issuer records evidence, later
//! supersedes it with updated evidence, and an auditor walks the chain and
//! checks each off-ledger payload against the ledger.

use custody_contract::{ContractError, CredentialContract};
use custody_core::{credential_hash, CredentialStatus};
use custody_integration_tests::{evidence, ALICE, BOB, CAROL, REGISTRY};
use custody_ledger::{CallContext, MemoryLedger};

#[test]
fn test_evidence_update_flow() {
    let ledger = MemoryLedger::new();
    let contract = CredentialContract::new();
    let issuer = CallContext::new(&ledger, REGISTRY);

    let payloads: [&[u8]; 3] = [b"vc-jwt-v1", b"vc-jwt-v2", b"vc-jwt-v3"];

    contract
        .create_asset(&issuer, evidence("ev-1", ALICE, payloads[0]))
        .unwrap();
    contract
        .supersede_asset(&issuer, "ev-1", evidence("ev-2", ALICE, payloads[1]))
        .unwrap();
    contract
        .transfer_ownership(&CallContext::new(&ledger, ALICE), "ev-2", CAROL)
        .unwrap();
    contract
        .supersede_asset(&issuer, "ev-2", evidence("ev-3", CAROL, payloads[2]))
        .unwrap();

    let auditor = CallContext::new(&ledger, BOB);
    let chain = contract.chain_of_custody(&auditor, "ev-3").unwrap();
    assert_eq!(chain.len(), 3);

    // Newest first; each link points at the next entry.
    for pair in chain.windows(2) {
        assert_eq!(pair[0].previous(), Some(pair[1].credential_id.as_str()));
    }
    assert!(chain.last().unwrap().previous().is_none());

    assert_eq!(chain[0].status, CredentialStatus::Active);
    assert!(chain[1..]
        .iter()
        .all(|r| r.status == CredentialStatus::Revoked && r.last_modifier_did == REGISTRY));
    assert_eq!(chain[1].owner_did, CAROL);

    for (record, payload) in chain.iter().zip(payloads.iter().rev()) {
        assert_eq!(record.credential_hash, credential_hash(payload));
        assert!(contract
            .verify_payload(&auditor, &record.credential_id, payload)
            .unwrap());
    }
    assert!(!contract.verify_payload(&auditor, "ev-3", payloads[0]).unwrap());
}

#[test]
fn test_only_the_head_of_a_chain_can_be_superseded() {
    let ledger = MemoryLedger::new();
    let contract = CredentialContract::new();
    let issuer = CallContext::new(&ledger, REGISTRY);

    contract
        .create_asset(&issuer, evidence("ev-1", ALICE, b"1"))
        .unwrap();
    contract
        .supersede_asset(&issuer, "ev-1", evidence("ev-2", ALICE, b"2"))
        .unwrap();

    let err = contract
        .supersede_asset(&issuer, "ev-1", evidence("ev-2b", ALICE, b"2b"))
        .unwrap_err();
    assert!(matches!(err, ContractError::AlreadyRevoked { .. }));
    assert!(!contract.asset_exists(&issuer, "ev-2b").unwrap());
}

#[test]
fn test_supersede_is_all_or_nothing_on_store_failure() {
    let ledger = MemoryLedger::new();
    let contract = CredentialContract::new();
    let issuer = CallContext::new(&ledger, REGISTRY);
    contract
        .create_asset(&issuer, evidence("ev-1", ALICE, b"1"))
        .unwrap();

    ledger.fail_reads(true);
    assert!(matches!(
        contract.supersede_asset(&issuer, "ev-1", evidence("ev-2", ALICE, b"2")),
        Err(ContractError::StoreUnavailable { .. })
    ));
    ledger.fail_reads(false);

    assert!(!contract.asset_exists(&issuer, "ev-2").unwrap());
    assert!(contract.read_asset(&issuer, "ev-1").unwrap().is_active());
}

#[test]
fn test_supersede_lands_nothing_when_the_write_set_is_refused() {
    let ledger = MemoryLedger::new();
    let contract = CredentialContract::new();
    let issuer = CallContext::new(&ledger, REGISTRY);
    contract
        .create_asset(&issuer, evidence("ev-1", ALICE, b"1"))
        .unwrap();
    let before = ledger.entries();

    // Room for one more put: the successor alone would fit, the pair does not.
    ledger.fail_writes_after(1);
    assert!(matches!(
        contract.supersede_asset(&issuer, "ev-1", evidence("ev-2", ALICE, b"2")),
        Err(ContractError::StoreUnavailable { .. })
    ));
    ledger.fail_writes(false);

    assert_eq!(ledger.entries(), before);
    assert!(!contract.asset_exists(&issuer, "ev-2").unwrap());
    assert!(contract.read_asset(&issuer, "ev-1").unwrap().is_active());

    contract
        .supersede_asset(&issuer, "ev-1", evidence("ev-2", ALICE, b"2"))
        .unwrap();
    assert!(!contract.read_asset(&issuer, "ev-1").unwrap().is_active());
}

#[test]
fn test_auditor_verifies_whole_chain() {
    let ledger = MemoryLedger::new();
    let contract = CredentialContract::new();
    let issuer = CallContext::new(&ledger, REGISTRY);
    contract
        .create_asset(&issuer, evidence("ev-1", ALICE, b"vc-1"))
        .unwrap();
    contract
        .supersede_asset(&issuer, "ev-1", evidence("ev-2", ALICE, b"vc-2"))
        .unwrap();

    let auditor = CallContext::new(&ledger, BOB);
    let payloads: [&[u8]; 2] = [b"vc-2", b"vc-1"];
    contract.verify_chain(&auditor, "ev-2", &payloads).unwrap();

    let tampered: [&[u8]; 2] = [b"vc-2", b"vc-1-edited"];
    let err = contract.verify_chain(&auditor, "ev-2", &tampered).unwrap_err();
    assert_eq!(err.to_string(), "hash mismatch for credential ev-1 at index 1");
}

#[test]
fn test_chain_stops_at_missing_predecessor() {
    let ledger = MemoryLedger::new();
    let contract = CredentialContract::new();
    let ctx = CallContext::new(&ledger, REGISTRY);

    let mut orphan = evidence("ev-7", ALICE, b"7");
    orphan.previous_credential_id = Some("ev-6".into());
    contract.create_asset(&ctx, orphan).unwrap();

    let err = contract.chain_of_custody(&ctx, "ev-7").unwrap_err();
    assert_eq!(
        err.to_string(),
        "chain of custody from ev-7 is broken: ev-6 does not exist"
    );
}
