//! End-to-end flows through the notary hub

use notary_runtime::{HubConfig, InMemorySeatDirectory, NotaryHub};
use notary_types::{
    Address, ClanId, DocHash, DocumentId, DocumentState, NotaryError, NotaryEvent, NotaryGrade,
    SeatId, SignerRef, UnitId,
};
use std::sync::Arc;

struct World {
    hub: Arc<NotaryHub>,
    seats: Arc<InMemorySeatDirectory>,
    admin: Address,
    notary: Address,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn world_with(config: HubConfig) -> World {
    init_tracing();
    let seats = Arc::new(InMemorySeatDirectory::new());
    let admin = Address::new("admin");
    let notary = Address::new("clan-notary");
    let hub = NotaryHub::with_config(admin.clone(), seats.clone(), config).unwrap();
    hub.grant_grade(&admin, notary.clone(), NotaryGrade::Clan)
        .unwrap();
    World {
        hub: Arc::new(hub),
        seats,
        admin,
        notary,
    }
}

fn world() -> World {
    world_with(HubConfig::default())
}

/// Form `unit` with `size` seats all held by `leader`, fully signed and finalized
fn form_unit(w: &World, unit: u64, leader: &Address, size: usize) -> Vec<SeatId> {
    let seats = w.seats.mint_many(leader, size).unwrap();
    let doc = w
        .hub
        .issue_unit_join(
            &w.notary,
            UnitId::new(unit),
            leader.clone(),
            seats.clone(),
            size as u32,
            DocHash::of(format!("unit {}", unit).as_bytes()),
        )
        .unwrap();
    for seat in &seats {
        w.hub.sign(leader, doc, SignerRef::Seat(*seat)).unwrap();
    }
    w.hub.finalize(leader, doc).unwrap();
    seats
}

fn leader(i: u64) -> Address {
    Address::new(format!("leader-{}", i))
}

#[test]
fn test_unit_join_two_seats() {
    let w = world();
    let controller = Address::new("controller");
    let seats = w.seats.mint_many(&controller, 2).unwrap();
    assert_eq!(seats, vec![SeatId::new(1), SeatId::new(2)]);

    let doc = w
        .hub
        .issue_unit_join(
            &w.notary,
            UnitId::new(1),
            controller.clone(),
            seats.clone(),
            2,
            DocHash::of(b"founding charter"),
        )
        .unwrap();
    assert_eq!(w.hub.document(doc).unwrap().state(), DocumentState::Issued);

    w.hub
        .sign(&controller, doc, SignerRef::Seat(SeatId::new(1)))
        .unwrap();
    assert_eq!(w.hub.document(doc).unwrap().state(), DocumentState::Signing);
    let outcome = w
        .hub
        .sign(&controller, doc, SignerRef::Seat(SeatId::new(2)))
        .unwrap();
    assert!(outcome.quorum_met);

    let finalized = w.hub.finalize(&Address::new("anyone"), doc).unwrap();
    assert_eq!(finalized.signed_count, 2);

    assert_eq!(w.hub.unit_of(SeatId::new(1)).unwrap(), Some(UnitId::new(1)));
    assert_eq!(w.hub.unit_of(SeatId::new(2)).unwrap(), Some(UnitId::new(1)));
    assert_eq!(
        w.hub.leader_of(UnitId::new(1)).unwrap(),
        Some(controller.clone())
    );
    assert_eq!(
        w.hub.structure_leader_of(UnitId::new(1)).unwrap(),
        Some(controller)
    );
    assert!(w.hub.is_finalized(doc).unwrap());
}

#[test]
fn test_finalize_before_quorum_changes_nothing() {
    let w = world();
    let controller = Address::new("controller");
    let seats = w.seats.mint_many(&controller, 2).unwrap();
    let doc = w
        .hub
        .issue_unit_join(
            &w.notary,
            UnitId::new(1),
            controller.clone(),
            seats.clone(),
            2,
            DocHash::of(b"founding charter"),
        )
        .unwrap();
    w.hub
        .sign(&controller, doc, SignerRef::Seat(seats[0]))
        .unwrap();
    let receipts_before = w.hub.journal().unwrap().receipt_count();

    let err = w.hub.finalize(&controller, doc).unwrap_err();
    assert_eq!(
        err,
        NotaryError::QuorumNotMet {
            required: 2,
            current: 1
        }
    );

    assert_eq!(w.hub.unit_of(seats[0]).unwrap(), None);
    assert_eq!(w.hub.leader_of(UnitId::new(1)).unwrap(), None);
    assert!(!w.hub.is_finalized(doc).unwrap());
    assert_eq!(w.hub.journal().unwrap().receipt_count(), receipts_before);
}

#[test]
fn test_clan_resolution_needs_every_leader() {
    let w = world();
    for i in 1..=10 {
        form_unit(&w, i, &leader(i), 2);
    }
    let units: Vec<_> = (1..=10).map(UnitId::new).collect();
    w.hub
        .register_clan(&w.notary, ClanId::new(1), units.clone(), leader(1))
        .unwrap();

    let complete = w
        .hub
        .issue_clan_resolution(&w.notary, ClanId::new(1), DocHash::of(b"resolution 1"))
        .unwrap();
    let partial = w
        .hub
        .issue_clan_resolution(&w.notary, ClanId::new(1), DocHash::of(b"resolution 2"))
        .unwrap();
    assert_eq!(w.hub.document(complete).unwrap().min_signatures, 10);

    for i in 1..=10 {
        w.hub
            .sign(&leader(i), complete, SignerRef::UnitLeader(UnitId::new(i)))
            .unwrap();
    }
    for i in 1..=9 {
        w.hub
            .sign(&leader(i), partial, SignerRef::UnitLeader(UnitId::new(i)))
            .unwrap();
    }

    let outcome = w.hub.finalize(&w.notary, complete).unwrap();
    assert_eq!(outcome.signed_count, 10);
    assert!(w.hub.is_finalized(complete).unwrap());
    assert_eq!(
        w.hub.clan(ClanId::new(1)).unwrap().unwrap().ratified_resolutions,
        vec![complete]
    );

    assert!(matches!(
        w.hub.finalize(&w.notary, partial).unwrap_err(),
        NotaryError::QuorumNotMet {
            required: 10,
            current: 9
        }
    ));
    assert!(!w.hub.is_finalized(partial).unwrap());
}

#[test]
fn test_clan_resolution_rejects_non_leaders() {
    let w = world();
    form_unit(&w, 1, &leader(1), 1);
    form_unit(&w, 2, &leader(2), 1);
    form_unit(&w, 3, &leader(3), 1);
    w.hub
        .register_clan(
            &w.notary,
            ClanId::new(1),
            vec![UnitId::new(1), UnitId::new(2)],
            leader(1),
        )
        .unwrap();
    let doc = w
        .hub
        .issue_clan_resolution(&w.notary, ClanId::new(1), DocHash::of(b"r"))
        .unwrap();

    // Unit 3 is not in the clan
    assert!(matches!(
        w.hub
            .sign(&leader(3), doc, SignerRef::UnitLeader(UnitId::new(3)))
            .unwrap_err(),
        NotaryError::NotEligibleSigner { .. }
    ));
    // Leader of unit 2 speaking for unit 1
    assert!(matches!(
        w.hub
            .sign(&leader(2), doc, SignerRef::UnitLeader(UnitId::new(1)))
            .unwrap_err(),
        NotaryError::NotEligibleSigner { .. }
    ));
    // Seat signers do not count on clan documents
    assert!(matches!(
        w.hub
            .sign(&leader(1), doc, SignerRef::Seat(SeatId::new(1)))
            .unwrap_err(),
        NotaryError::NotEligibleSigner { .. }
    ));
    assert_eq!(w.hub.signed_count(doc).unwrap(), 0);
}

#[test]
fn test_leader_appointment_non_members_not_eligible() {
    let w = world();
    let founder = Address::new("founder");
    let members = form_unit(&w, 1, &founder, 3);

    let outsider = Address::new("outsider");
    let outsider_seat = w.seats.mint(outsider.clone()).unwrap();

    let doc = w
        .hub
        .issue_leader_appointment(
            &w.notary,
            UnitId::new(1),
            Address::new("successor"),
            2,
            DocHash::of(b"appointment"),
        )
        .unwrap();

    let err = w
        .hub
        .sign(&outsider, doc, SignerRef::Seat(outsider_seat))
        .unwrap_err();
    assert_eq!(
        err,
        NotaryError::NotEligibleSigner {
            document: doc,
            signer: SignerRef::Seat(outsider_seat)
        }
    );

    w.hub
        .sign(&founder, doc, SignerRef::Seat(members[0]))
        .unwrap();
    w.hub
        .sign(&founder, doc, SignerRef::Seat(members[1]))
        .unwrap();
    w.hub.finalize(&outsider, doc).unwrap();

    assert_eq!(
        w.hub.leader_of(UnitId::new(1)).unwrap(),
        Some(Address::new("successor"))
    );
    assert!(w.hub.is_consistent().unwrap());
}

#[test]
fn test_leader_appointment_signer_set_is_snapshot() {
    let w = world();
    let founder = Address::new("founder");
    let members = form_unit(&w, 1, &founder, 1);

    let doc = w
        .hub
        .issue_leader_appointment(
            &w.notary,
            UnitId::new(1),
            Address::new("successor"),
            1,
            DocHash::of(b"appointment"),
        )
        .unwrap();

    assert_eq!(
        w.hub.document(doc).unwrap().payload,
        notary_types::DocumentPayload::LeaderAppointment {
            unit_id: UnitId::new(1),
            new_leader: Address::new("successor"),
            eligible_seats: members,
        }
    );
}

#[test]
fn test_clan_leader_appointment() {
    let w = world();
    form_unit(&w, 1, &leader(1), 1);
    form_unit(&w, 2, &leader(2), 1);
    form_unit(&w, 3, &leader(3), 1);
    let clan = ClanId::new(4);
    w.hub
        .register_clan(
            &w.notary,
            clan,
            vec![UnitId::new(1), UnitId::new(2), UnitId::new(3)],
            leader(1),
        )
        .unwrap();

    let doc = w
        .hub
        .issue_clan_leader_appointment(&w.notary, clan, leader(3), 2, DocHash::of(b"elder"))
        .unwrap();
    w.hub
        .sign(&leader(2), doc, SignerRef::UnitLeader(UnitId::new(2)))
        .unwrap();
    w.hub
        .sign(&leader(3), doc, SignerRef::UnitLeader(UnitId::new(3)))
        .unwrap();
    w.hub.finalize(&leader(2), doc).unwrap();

    assert_eq!(w.hub.clan_leader(clan).unwrap(), Some(leader(3)));
}

#[test]
fn test_clan_documents_need_clan_grade() {
    let w = world();
    let unit_notary = Address::new("unit-notary");
    w.hub
        .grant_grade(&w.admin, unit_notary.clone(), NotaryGrade::Unit)
        .unwrap();
    form_unit(&w, 1, &leader(1), 1);
    form_unit(&w, 2, &leader(2), 1);
    w.hub
        .register_clan(
            &w.notary,
            ClanId::new(1),
            vec![UnitId::new(1), UnitId::new(2)],
            leader(1),
        )
        .unwrap();

    let err = w
        .hub
        .issue_clan_resolution(&unit_notary, ClanId::new(1), DocHash::of(b"r"))
        .unwrap_err();
    assert_eq!(
        err,
        NotaryError::InsufficientGrade {
            caller: unit_notary,
            held: NotaryGrade::Unit,
            required: NotaryGrade::Clan
        }
    );
    assert_eq!(
        w.hub
            .issue_clan_resolution(&w.notary, ClanId::new(9), DocHash::of(b"r"))
            .unwrap_err(),
        NotaryError::ClanNotFound(ClanId::new(9))
    );
}

#[test]
fn test_register_clan_rules() {
    let w = world();
    form_unit(&w, 1, &leader(1), 1);
    form_unit(&w, 2, &leader(2), 1);

    assert_eq!(
        w.hub
            .register_clan(&w.notary, ClanId::new(1), vec![UnitId::new(1)], leader(1))
            .unwrap_err(),
        NotaryError::InsufficientClanSize {
            required: 2,
            provided: 1
        }
    );
    assert_eq!(
        w.hub
            .register_clan(
                &w.notary,
                ClanId::new(1),
                vec![UnitId::new(1), UnitId::new(5)],
                leader(1)
            )
            .unwrap_err(),
        NotaryError::UnitNotFound(UnitId::new(5))
    );

    w.hub
        .register_clan(
            &w.notary,
            ClanId::new(1),
            vec![UnitId::new(1), UnitId::new(2)],
            leader(1),
        )
        .unwrap();
    assert_eq!(
        w.hub
            .register_clan(
                &w.notary,
                ClanId::new(2),
                vec![UnitId::new(2), UnitId::new(1)],
                leader(2)
            )
            .unwrap_err(),
        NotaryError::UnitAlreadyInClan {
            unit: UnitId::new(2),
            clan: ClanId::new(1)
        }
    );
    assert_eq!(w.hub.clan_count().unwrap(), 1);
}

#[test]
fn test_unit_and_document_reads() {
    let w = world();
    let seats = form_unit(&w, 1, &leader(1), 2);

    let record = w.hub.unit(UnitId::new(1)).unwrap().unwrap();
    assert_eq!(record.leader, leader(1));
    assert_eq!(record.formed_by, Some(DocumentId::new(1)));
    assert_eq!(record.members.iter().copied().collect::<Vec<_>>(), seats);
    assert!(w.hub.unit(UnitId::new(2)).unwrap().is_none());

    let other = Address::new("unit-notary");
    w.hub
        .grant_grade(&w.admin, other.clone(), NotaryGrade::Unit)
        .unwrap();
    let appointment = w
        .hub
        .issue_leader_appointment(&other, UnitId::new(1), leader(2), 1, DocHash::of(b"next"))
        .unwrap();

    assert_eq!(w.hub.document_count().unwrap(), 2);
    assert_eq!(
        w.hub.documents_by_issuer(&w.notary).unwrap(),
        vec![DocumentId::new(1)]
    );
    assert_eq!(w.hub.documents_by_issuer(&other).unwrap(), vec![appointment]);
    assert!(w.hub.documents_by_issuer(&w.admin).unwrap().is_empty());
}

#[test]
fn test_competing_joins_first_finalize_wins() {
    let w = world();
    let holder = Address::new("holder");
    let seats = w.seats.mint_many(&holder, 2).unwrap();

    let first = w
        .hub
        .issue_unit_join(
            &w.notary,
            UnitId::new(1),
            holder.clone(),
            seats.clone(),
            1,
            DocHash::of(b"first"),
        )
        .unwrap();
    let second = w
        .hub
        .issue_unit_join(
            &w.notary,
            UnitId::new(2),
            holder.clone(),
            seats.clone(),
            1,
            DocHash::of(b"second"),
        )
        .unwrap();

    w.hub.sign(&holder, first, SignerRef::Seat(seats[0])).unwrap();
    w.hub
        .sign(&holder, second, SignerRef::Seat(seats[0]))
        .unwrap();
    w.hub.finalize(&holder, first).unwrap();

    let err = w.hub.finalize(&holder, second).unwrap_err();
    assert_eq!(
        err,
        NotaryError::SeatAlreadyAssigned {
            seat: seats[0],
            unit: UnitId::new(1)
        }
    );
    assert!(!w.hub.is_finalized(second).unwrap());
    assert_eq!(w.hub.leader_of(UnitId::new(2)).unwrap(), None);
    assert_eq!(w.hub.unit_of(seats[0]).unwrap(), Some(UnitId::new(1)));

    // Issuing against an assigned seat is refused up front
    assert!(matches!(
        w.hub
            .issue_unit_join(
                &w.notary,
                UnitId::new(3),
                holder.clone(),
                vec![seats[0]],
                1,
                DocHash::of(b"third")
            )
            .unwrap_err(),
        NotaryError::SeatAlreadyAssigned { .. }
    ));
}

#[test]
fn test_existing_unit_cannot_rejoin() {
    let w = world();
    form_unit(&w, 1, &leader(1), 1);
    let seat = w.seats.mint(leader(2)).unwrap();

    assert_eq!(
        w.hub
            .issue_unit_join(
                &w.notary,
                UnitId::new(1),
                leader(2),
                vec![seat],
                1,
                DocHash::of(b"again")
            )
            .unwrap_err(),
        NotaryError::UnitAlreadyExists(UnitId::new(1))
    );
}

#[test]
fn test_revocation_keeps_pending_documents_by_default() {
    let w = world();
    let holder = Address::new("holder");
    let seat = w.seats.mint(holder.clone()).unwrap();
    let doc = w
        .hub
        .issue_unit_join(
            &w.notary,
            UnitId::new(1),
            holder.clone(),
            vec![seat],
            1,
            DocHash::of(b"x"),
        )
        .unwrap();

    w.hub.revoke_grade(&w.admin, &w.notary).unwrap();
    w.hub.sign(&holder, doc, SignerRef::Seat(seat)).unwrap();
    w.hub.finalize(&holder, doc).unwrap();
    assert_eq!(w.hub.unit_of(seat).unwrap(), Some(UnitId::new(1)));
}

#[test]
fn test_revocation_voids_pending_when_configured() {
    let w = world_with(HubConfig {
        revocation_voids_pending: true,
        ..HubConfig::default()
    });
    let holder = Address::new("holder");
    let seats = w.seats.mint_many(&holder, 2).unwrap();
    let doc = w
        .hub
        .issue_unit_join(
            &w.notary,
            UnitId::new(1),
            holder.clone(),
            seats.clone(),
            1,
            DocHash::of(b"x"),
        )
        .unwrap();
    w.hub.sign(&holder, doc, SignerRef::Seat(seats[0])).unwrap();

    w.hub.revoke_grade(&w.admin, &w.notary).unwrap();

    assert!(matches!(
        w.hub
            .sign(&holder, doc, SignerRef::Seat(seats[1]))
            .unwrap_err(),
        NotaryError::InsufficientGrade { .. }
    ));
    assert!(matches!(
        w.hub.finalize(&holder, doc).unwrap_err(),
        NotaryError::InsufficientGrade { .. }
    ));

    // Restoring the grade revives the document
    w.hub
        .grant_grade(&w.admin, w.notary.clone(), NotaryGrade::Unit)
        .unwrap();
    w.hub.finalize(&holder, doc).unwrap();
    assert_eq!(w.hub.unit_of(seats[0]).unwrap(), Some(UnitId::new(1)));
}

#[test]
fn test_journal_tracks_document_lifecycle() {
    let w = world();
    form_unit(&w, 1, &leader(1), 2);
    let doc = DocumentId::new(1);

    let events = w.hub.events_for(doc).unwrap();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], NotaryEvent::DocumentIssued { min_signatures: 2, .. }));
    assert!(matches!(events[2], NotaryEvent::DocumentSigned { signed_count: 2, .. }));
    assert!(matches!(events[3], NotaryEvent::DocumentFinalized { signed_count: 2, .. }));

    let lines = w.hub.journal().unwrap().to_json_lines().unwrap();
    let records: Vec<serde_json::Value> = lines
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    // grant + issue + 2 signs + finalize
    assert_eq!(records.len(), 5);
    assert_eq!(records[0]["event"], "grade_granted");
    assert!(records[0].get("document").is_none());

    let lifecycle: Vec<&str> = records[1..]
        .iter()
        .map(|r| r["event"].as_str().unwrap())
        .collect();
    assert_eq!(
        lifecycle,
        vec![
            "document_issued",
            "document_signed",
            "document_signed",
            "document_finalized"
        ]
    );
    for record in &records[1..] {
        assert_eq!(record["document"], 1);
        assert_eq!(record["kind"], "unit_join");
    }
}

#[test]
fn test_capability_rotation_is_admin_only() {
    let w = world();
    let before = w.hub.capability_id().unwrap();

    assert!(w
        .hub
        .rotate_capability(&w.notary)
        .unwrap_err()
        .is_authorization());
    assert_eq!(w.hub.capability_id().unwrap(), before);

    let after = w.hub.rotate_capability(&w.admin).unwrap();
    assert_ne!(after, before);

    form_unit(&w, 1, &leader(1), 2);
    assert!(w.hub.is_consistent().unwrap());
    assert!(matches!(
        w.hub.journal().unwrap().receipts[1].event,
        NotaryEvent::CapabilityRotated { .. }
    ));
}

#[test]
fn test_config_from_toml() {
    let config = HubConfig::from_toml_str(
        r#"
        max_unit_seats = 3

        [grades]
        unit = "clan"
        "#,
    )
    .unwrap();
    let w = world_with(config);
    let holder = Address::new("holder");
    let seats = w.seats.mint_many(&holder, 4).unwrap();

    assert!(matches!(
        w.hub
            .issue_unit_join(
                &w.notary,
                UnitId::new(1),
                holder.clone(),
                seats.clone(),
                1,
                DocHash::of(b"x")
            )
            .unwrap_err(),
        NotaryError::InvalidDocument(_)
    ));

    let unit_notary = Address::new("unit-notary");
    w.hub
        .grant_grade(&w.admin, unit_notary.clone(), NotaryGrade::Unit)
        .unwrap();
    assert!(w
        .hub
        .issue_unit_join(
            &unit_notary,
            UnitId::new(1),
            holder,
            seats[..3].to_vec(),
            1,
            DocHash::of(b"x")
        )
        .unwrap_err()
        .is_authorization());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_finalize_applies_once() {
    let w = world();
    let holder = Address::new("holder");
    let seats = w.seats.mint_many(&holder, 2).unwrap();
    let doc = w
        .hub
        .issue_unit_join(
            &w.notary,
            UnitId::new(1),
            holder.clone(),
            seats.clone(),
            2,
            DocHash::of(b"race"),
        )
        .unwrap();
    for seat in &seats {
        w.hub.sign(&holder, doc, SignerRef::Seat(*seat)).unwrap();
    }

    let mut handles = Vec::new();
    for i in 0..8 {
        let hub = w.hub.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            hub.finalize(&Address::new(format!("caller-{}", i)), doc)
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => assert_eq!(err, NotaryError::AlreadyFinalized(doc)),
        }
    }

    assert_eq!(successes, 1);
    let finalized_events = w
        .hub
        .events_for(doc)
        .unwrap()
        .into_iter()
        .filter(|e| matches!(e, NotaryEvent::DocumentFinalized { .. }))
        .count();
    assert_eq!(finalized_events, 1);
    assert_eq!(w.hub.members_of(UnitId::new(1)).unwrap(), seats);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_signatures() {
    let w = world();
    let holder = Address::new("holder");
    let seats = w.seats.mint_many(&holder, 10).unwrap();
    let doc = w
        .hub
        .issue_unit_join(
            &w.notary,
            UnitId::new(1),
            holder.clone(),
            seats.clone(),
            10,
            DocHash::of(b"race"),
        )
        .unwrap();

    // Distinct seats commute
    let mut handles = Vec::new();
    for seat in seats.clone() {
        let hub = w.hub.clone();
        let holder = holder.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            hub.sign(&holder, doc, SignerRef::Seat(seat))
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(w.hub.signed_count(doc).unwrap(), 10);

    // The same seat races to a single success
    let other = w.seats.mint_many(&holder, 1).unwrap();
    let race_doc = w
        .hub
        .issue_unit_join(
            &w.notary,
            UnitId::new(2),
            holder.clone(),
            other.clone(),
            1,
            DocHash::of(b"same seat"),
        )
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let hub = w.hub.clone();
        let holder = holder.clone();
        let seat = other[0];
        handles.push(tokio::task::spawn_blocking(move || {
            hub.sign(&holder, race_doc, SignerRef::Seat(seat))
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => assert!(matches!(err, NotaryError::AlreadySigned { .. })),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(w.hub.signed_count(race_doc).unwrap(), 1);
}
