//! Integration test: Credential record lifecycle against an in-memory ledger.
//!
//! Drives custody-contract through the custody-ledger context exactly as a
//! ledger platform would: one context per submitted transaction.

use chrono::{DateTime, TimeZone, Utc};
use custody_contract::{ContractError, CredentialContract};
use custody_core::{CredentialRecord, CredentialStatus, NewCredential};
use custody_integration_tests::{evidence, ALICE, BOB, CAROL, REGISTRY};
use custody_ledger::{CallContext, Ledger, MemoryLedger};

fn cred_1() -> NewCredential {
    NewCredential {
        credential_id: "cred-1".into(),
        status: CredentialStatus::Active,
        issuer_did: "did:bob".into(),
        owner_did: "did:alice".into(),
        credential_hash: "h1".into(),
        timestamp: "2024-05-01T10:00:00Z".into(),
        previous_credential_id: None,
    }
}

fn parse(ts: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
}

// =========================================================================
// Scenario: create → transfer → revoke
// =========================================================================

#[test]
fn test_transfer_then_revoke_scenario() {
    let ledger = MemoryLedger::new();
    let contract = CredentialContract::new();

    contract
        .create_asset(&CallContext::new(&ledger, "did:alice"), cred_1())
        .expect("create should succeed");

    contract
        .transfer_ownership(&CallContext::new(&ledger, "did:alice"), "cred-1", "did:carol")
        .expect("transfer should succeed");

    let after_transfer = contract
        .read_asset(&CallContext::new(&ledger, "did:carol"), "cred-1")
        .unwrap();
    assert_eq!(after_transfer.owner_did, "did:carol");
    assert_eq!(after_transfer.issuer_did, "did:bob");
    assert_eq!(after_transfer.status, CredentialStatus::Active);

    let before = parse(&after_transfer.timestamp);
    contract
        .revoke_asset(&CallContext::new(&ledger, "did:bob"), "cred-1")
        .expect("revoke should succeed");

    let after_revoke = contract
        .read_asset(&CallContext::new(&ledger, "did:carol"), "cred-1")
        .unwrap();
    assert_eq!(after_revoke.status, CredentialStatus::Revoked);
    assert!(parse(&after_revoke.timestamp) >= before);
    assert_ne!(after_revoke.timestamp, after_transfer.timestamp);
    assert_eq!(after_revoke.owner_did, "did:carol");
    assert_eq!(after_revoke.last_modifier_did, "did:bob");
}

#[test]
fn test_every_mutation_is_attributed() {
    let ledger = MemoryLedger::new();
    let contract = CredentialContract::new();

    let created = contract
        .create_asset(&CallContext::new(&ledger, REGISTRY), evidence("ev-1", ALICE, b"a"))
        .unwrap();
    assert_eq!(created.last_modifier_did, ALICE);

    let moved = contract
        .transfer_ownership(&CallContext::new(&ledger, ALICE), "ev-1", CAROL)
        .unwrap();
    assert_eq!(moved.last_modifier_did, ALICE);

    let revoked = contract
        .revoke_asset(&CallContext::new(&ledger, BOB), "ev-1")
        .unwrap();
    assert_eq!(revoked.last_modifier_did, BOB);
}

// =========================================================================
// Existence and duplicate protection
// =========================================================================

#[test]
fn test_exists_before_and_after_create() {
    let ledger = MemoryLedger::new();
    let ctx = CallContext::new(&ledger, ALICE);
    let contract = CredentialContract::new();

    for id in ["ev-1", "ev-2", "urn:uuid:0190a8f2-7c1e-7000-8000-000000000001"] {
        assert!(!contract.asset_exists(&ctx, id).unwrap());
        contract.create_asset(&ctx, evidence(id, ALICE, id.as_bytes())).unwrap();
        assert!(contract.asset_exists(&ctx, id).unwrap());
    }
    assert_eq!(ledger.len(), 3);
}

#[test]
fn test_duplicate_create_is_rejected() {
    let ledger = MemoryLedger::new();
    let ctx = CallContext::new(&ledger, ALICE);
    let contract = CredentialContract::new();

    let first = contract.create_asset(&ctx, evidence("ev-1", ALICE, b"first")).unwrap();
    let err = contract
        .create_asset(&ctx, evidence("ev-1", CAROL, b"second"))
        .unwrap_err();
    assert!(matches!(err, ContractError::AlreadyExists { .. }));
    assert_eq!(err.to_string(), "credential ev-1 already exists");

    assert_eq!(contract.read_asset(&ctx, "ev-1").unwrap(), first);
}

// =========================================================================
// Serialization through the ledger
// =========================================================================

#[test]
fn test_ledger_bytes_are_lossless() {
    let ledger = MemoryLedger::new();
    let ctx = CallContext::new(&ledger, ALICE);
    let contract = CredentialContract::new();

    let inputs = vec![
        evidence("ev-1", ALICE, b"one"),
        NewCredential {
            previous_credential_id: Some("ev-1".into()),
            timestamp: "2024-05-02T00:00:00+02:00".into(),
            ..evidence("ev-2", "did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK", b"two")
        },
        NewCredential {
            status: CredentialStatus::Revoked,
            ..evidence("ev-3", "did:ünïcødé:owner", b"three")
        },
    ];

    for input in inputs {
        let created = contract.create_asset(&ctx, input.clone()).unwrap();
        let raw = ledger.get(&input.credential_id).unwrap().unwrap();
        let decoded = CredentialRecord::from_bytes(&raw).unwrap();
        assert_eq!(decoded, created);
        assert_eq!(decoded.owner_did, input.owner_did);
        assert_eq!(decoded.timestamp, input.timestamp);
        assert_eq!(decoded.previous_credential_id, input.previous_credential_id);
        assert_eq!(decoded.status, input.status);
    }
}

#[test]
fn test_reads_records_written_by_other_writers() {
    let stored = serde_json::json!({
        "status": "active",
        "timestamp": "2024-05-01T10:00:00.000Z",
        "owner_did": ALICE,
        "issuer_did": BOB,
        "credential_id": "ev-legacy",
        "credential_hash": "deadbeef",
        "last_modifier_did": ALICE,
        "previous_credential_id": ""
    });
    let ledger = MemoryLedger::with_entries(vec![(
        "ev-legacy".to_string(),
        serde_json::to_vec(&stored).unwrap(),
    )]);
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let ctx = CallContext::new(&ledger, BOB).with_timestamp(at);
    let contract = CredentialContract::new();

    let record = contract.read_asset(&ctx, "ev-legacy").unwrap();
    assert!(record.previous().is_none());

    contract.revoke_asset(&ctx, "ev-legacy").unwrap();
    let raw: serde_json::Value =
        serde_json::from_slice(&ledger.get("ev-legacy").unwrap().unwrap()).unwrap();
    assert_eq!(raw["status"], "revoked");
    assert_eq!(raw["timestamp"], "2024-06-01T00:00:00Z");
    assert_eq!(raw["previous_credential_id"], "");
}

// =========================================================================
// Failure propagation
// =========================================================================

#[test]
fn test_failed_operations_leave_world_state_untouched() {
    let ledger = MemoryLedger::new();
    let ctx = CallContext::new(&ledger, ALICE);
    let contract = CredentialContract::new();
    contract.create_asset(&ctx, evidence("ev-1", ALICE, b"a")).unwrap();
    let snapshot = ledger.entries();

    assert!(contract.transfer_ownership(&ctx, "ev-missing", CAROL).is_err());
    assert!(contract.revoke_asset(&ctx, "ev-missing").is_err());
    assert!(contract.transfer_ownership(&ctx, "ev-1", "").is_err());

    ledger.fail_writes(true);
    assert!(matches!(
        contract.revoke_asset(&ctx, "ev-1"),
        Err(ContractError::StoreUnavailable { .. })
    ));
    ledger.fail_writes(false);

    assert_eq!(ledger.entries(), snapshot);
}
