//! End-to-end funding round against a real sled-backed ledger.
//!
//! Run with:
//!   cargo test -p sts-crowdfund --test scenario

use std::path::PathBuf;
use std::sync::{Arc, Once};

use sts_core::host::{BlockClock, EventSink, FixedClock, RecordingSink, WitnessCheck, Witnesses};
use sts_core::{Identity, LedgerEvent, ProjectId, StagePhase, StsError};
use sts_crowdfund::{StageController, StageQuery};
use sts_state::{LedgerConfig, SledStore, TokenShareManager};

// ── Harness ───────────────────────────────────────────────────────────────────

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

struct DirGuard(PathBuf);

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn temp_dir(name: &str) -> DirGuard {
    let dir = std::env::temp_dir().join(format!("sts_scenario_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    DirGuard(dir)
}

struct Ledger {
    witnesses: Arc<Witnesses>,
    sink: Arc<RecordingSink>,
    clock: Arc<FixedClock>,
    controller: StageController<SledStore>,
}

fn open_ledger(dir: &DirGuard, owner: Identity) -> Ledger {
    let cfg = LedgerConfig { flush_on_write: true, ..LedgerConfig::with_data_dir(&dir.0) };
    let store = Arc::new(SledStore::open_with(&cfg).expect("open sled store"));
    let witnesses = Arc::new(Witnesses::signed_by([owner]));
    let sink = Arc::new(RecordingSink::new());
    let clock = Arc::new(FixedClock::at(0));
    let shares = TokenShareManager::new(
        store,
        Arc::clone(&witnesses) as Arc<dyn WitnessCheck>,
        Arc::clone(&sink) as Arc<dyn EventSink>,
    );
    let controller = StageController::new(shares, Arc::clone(&clock) as Arc<dyn BlockClock>);
    Ledger { witnesses, sink, clock, controller }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn funding_round_lifecycle() {
    init_tracing();
    let dir = temp_dir("lifecycle");
    let owner = Identity::from_public_key(b"ownerA");
    let ledger = open_ledger(&dir, owner);
    let shares = ledger.controller.shares();
    let p1 = ProjectId::new("p1").unwrap();

    shares.create(&p1, "TOK", 8, owner, 1_000).unwrap();
    assert!(ledger.controller.start_new_crowdfund(&p1, 100, 200, 1_000, 2).unwrap());
    let stage = ledger.controller.stages(&p1).unwrap().remove(0);

    assert_eq!(ledger.controller.contribute(&stage, 150, 10).unwrap(), 20);
    assert_eq!(shares.get(&p1).unwrap().in_circulation, 20);

    assert_eq!(
        ledger.controller.contribute(&stage, 250, 10).unwrap_err(),
        StsError::WindowClosed { height: 250, start: 100, end: 200 }
    );
    assert_eq!(shares.get(&p1).unwrap().in_circulation, 20);

    assert!(matches!(
        shares.add_to_circulation(&p1, 2_000),
        Err(StsError::SupplyExceeded { requested: 2_000, available: 980 })
    ));
    assert_eq!(shares.get(&p1).unwrap().in_circulation, 20);

    assert_eq!(
        ledger.sink.events(),
        vec![
            LedgerEvent::Created { project_id: p1.clone(), symbol: "TOK".into(), total_supply: 1_000 },
            LedgerEvent::CrowdfundStarted {
                project_id: p1.clone(),
                start_height: 100,
                end_height: 200,
                rate: 2,
            },
            LedgerEvent::Minted { project_id: p1.clone(), amount: 20, in_circulation: 20 },
        ]
    );
}

#[test]
fn state_survives_reopen() {
    init_tracing();
    let dir = temp_dir("reopen");
    let owner = Identity::from_public_key(b"ownerA");
    let p1 = ProjectId::new("p1").unwrap();
    {
        let ledger = open_ledger(&dir, owner);
        ledger.controller.shares().create(&p1, "TOK", 8, owner, 1_000).unwrap();
        ledger.controller.start_new_crowdfund(&p1, 10, 20, 500, 3).unwrap();
        ledger.clock.advance_to(15);
        let stage = ledger.controller.active_stage(&p1, 15).unwrap().unwrap();
        assert_eq!(ledger.controller.contribute_now(&stage, 5).unwrap(), 15);
    }

    let ledger = open_ledger(&dir, owner);
    let record = ledger.controller.shares().get(&p1).unwrap();
    assert_eq!(record.in_circulation, 15);
    assert_eq!(record.symbol, "TOK");
    assert_eq!(ledger.controller.stages(&p1).unwrap().len(), 1);

    // Re-creating after restart must not reset circulation.
    ledger.controller.shares().create(&p1, "TOK", 8, owner, 1_000).unwrap();
    assert_eq!(ledger.controller.shares().get(&p1).unwrap().in_circulation, 15);
}

#[test]
fn only_the_owner_opens_rounds() {
    init_tracing();
    let dir = temp_dir("owner");
    let owner = Identity::from_public_key(b"ownerA");
    let ledger = open_ledger(&dir, owner);
    let p1 = ProjectId::new("p1").unwrap();
    ledger.controller.shares().create(&p1, "TOK", 0, owner, 100).unwrap();

    ledger.witnesses.clear();
    ledger.witnesses.add(Identity::from_public_key(b"intruder"));
    assert_eq!(
        ledger.controller.start_new_crowdfund(&p1, 1, 2, 10, 1).unwrap_err(),
        StsError::Unauthorized
    );
    assert_eq!(
        ledger.controller.shares().add_to_circulation(&p1, 1).unwrap_err(),
        StsError::Unauthorized
    );
    assert!(ledger.controller.stages(&p1).unwrap().is_empty());
}

#[test]
fn sequential_rounds_report_phases() {
    init_tracing();
    let dir = temp_dir("phases");
    let owner = Identity::from_public_key(b"ownerA");
    let ledger = open_ledger(&dir, owner);
    let p1 = ProjectId::new("p1").unwrap();
    ledger.controller.shares().create(&p1, "TOK", 2, owner, 10_000).unwrap();
    ledger.controller.start_new_crowdfund(&p1, 100, 199, 1_000, 4).unwrap();
    ledger.controller.start_new_crowdfund(&p1, 200, 299, 1_000, 2).unwrap();

    let query = StageQuery::new(&ledger.controller);
    assert_eq!(query.phase(&p1, 0).unwrap(), Some(StagePhase::Pending));
    assert_eq!(query.phase(&p1, 199).unwrap(), Some(StagePhase::Open));
    assert_eq!(query.phase(&p1, 300).unwrap(), Some(StagePhase::Closed));

    let first = ledger.controller.active_stage(&p1, 150).unwrap().unwrap();
    let second = ledger.controller.active_stage(&p1, 250).unwrap().unwrap();
    assert_eq!(ledger.controller.contribute(&first, 150, 10).unwrap(), 40);
    assert_eq!(ledger.controller.contribute(&second, 250, 10).unwrap(), 20);
    // A round's stage object does not mint outside its own window.
    assert!(matches!(
        ledger.controller.contribute(&first, 250, 10),
        Err(StsError::WindowClosed { .. })
    ));
    assert_eq!(ledger.controller.shares().get(&p1).unwrap().in_circulation, 60);
}
