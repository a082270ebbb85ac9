mod common;

use uuid::Uuid;

use common::fixtures::{AuditHarness, CountingActor, Gadget, SessionRow, company};
use recordkeeper::audit::value::Property;
use recordkeeper::audit::{ActorId, AuditError, ChangeAction, SystemActor};
use recordkeeper::models::AuditLogEntry;
use recordkeeper::store::{CommitError, StoreError};

async fn all_entries(harness: &AuditHarness) -> Vec<AuditLogEntry> {
    harness.service.get_recent(1000).await.unwrap().data
}

// ── Attribution ──

#[tokio::test]
async fn actor_is_resolved_once_per_commit() {
    let harness = AuditHarness::new();
    let actor = CountingActor::new();

    let mut uow = harness.unit_of_work();
    for n in 0..3i64 {
        uow.add(Gadget::new(vec![Property::new("n", n)]));
    }
    let written = uow.save_changes(&actor).await.unwrap();

    assert_eq!(written, 3);
    assert_eq!(actor.calls(), 1);

    let entries = all_entries(&harness).await;
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.user_id == actor.id));
    assert!(entries.iter().all(|e| e.timestamp == entries[0].timestamp));
    assert!(entries.iter().all(|e| e.action == ChangeAction::Created));
}

#[tokio::test]
async fn commit_instant_has_microsecond_precision() {
    let harness = AuditHarness::new();

    let mut uow = harness.unit_of_work();
    uow.add(company("Acme"));
    uow.save_changes(&SystemActor).await.unwrap();

    let entries = all_entries(&harness).await;
    assert_eq!(entries[0].timestamp.timestamp_subsec_nanos() % 1_000, 0);
}

#[tokio::test]
async fn actor_is_not_consulted_when_nothing_is_audited() {
    let harness = AuditHarness::new();
    let actor = CountingActor::new();

    let mut uow = harness.unit_of_work();
    uow.add(SessionRow {
        id: Uuid::now_v7(),
        token: "abc".to_string(),
    });
    uow.save_changes(&actor).await.unwrap();

    assert_eq!(actor.calls(), 0);
    assert_eq!(harness.store.count("sessions").await, 1);
    assert_eq!(harness.audit_rows().await, 0);
}

#[tokio::test]
async fn missing_actor_is_stored_as_nil() {
    let harness = AuditHarness::new();

    let mut uow = harness.unit_of_work();
    uow.add(company("Seeded"));
    uow.save_changes(&SystemActor).await.unwrap();

    let mut uow = harness.unit_of_work();
    uow.add(company("Anonymous"));
    uow.save_changes(&Option::<ActorId>::None).await.unwrap();

    let entries = all_entries(&harness).await;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.user_id == Uuid::nil()));
}

// ── Lifecycle ──

#[tokio::test]
async fn company_rename_is_recorded_after_creation() {
    let harness = AuditHarness::new();
    let user = Uuid::now_v7();
    let actor = ActorId::User(user);

    let original = company("Old Corp");
    let mut uow = harness.unit_of_work();
    uow.add(original.clone());
    uow.save_changes(&actor).await.unwrap();

    let mut renamed = original.clone();
    renamed.name = "New Corp".to_string();
    renamed.updated_at = Some(chrono::Utc::now());

    let mut uow = harness.unit_of_work();
    uow.update(&original, renamed);
    assert_eq!(uow.save_changes(&actor).await.unwrap(), 1);

    let result = harness
        .service
        .get_by_entity("Company", original.id)
        .await
        .unwrap();
    assert_eq!(result.total_count, 2);

    let update = &result.data[0];
    assert_eq!(update.action, ChangeAction::Updated);
    assert_eq!(update.property_name.as_deref(), Some("name"));
    assert_eq!(update.old_value.as_deref(), Some("Old Corp"));
    assert_eq!(update.new_value.as_deref(), Some("New Corp"));
    assert_eq!(update.user_id, user);

    let create = &result.data[1];
    assert_eq!(create.action, ChangeAction::Created);
    assert!(create.property_name.is_none());
    assert!(create.old_value.is_none());
    assert!(create.new_value.is_none());
}

#[tokio::test]
async fn deleting_an_attached_record_writes_deleted_header() {
    let harness = AuditHarness::new();
    let acme = company("Acme");

    let mut uow = harness.unit_of_work();
    uow.add(acme.clone());
    uow.save_changes(&SystemActor).await.unwrap();

    let mut uow = harness.unit_of_work();
    uow.attach(acme.clone());
    assert!(!uow.has_changes());
    uow.remove(acme.clone());
    uow.save_changes(&SystemActor).await.unwrap();

    assert_eq!(harness.store.count("companies").await, 0);
    let entries = harness
        .service
        .get_by_entity("Company", acme.id)
        .await
        .unwrap()
        .data;
    let actions: Vec<_> = entries.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![ChangeAction::Deleted, ChangeAction::Created]);
}

#[tokio::test]
async fn update_of_added_record_stays_a_single_creation() {
    let harness = AuditHarness::new();
    let draft = company("Draft");
    let mut named = draft.clone();
    named.name = "Final".to_string();

    let mut uow = harness.unit_of_work();
    uow.add(draft.clone());
    uow.update(&draft, named);
    uow.save_changes(&SystemActor).await.unwrap();

    let entries = all_entries(&harness).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, ChangeAction::Created);
}

#[tokio::test]
async fn removing_an_added_record_writes_nothing() {
    let harness = AuditHarness::new();
    let acme = company("Acme");

    let mut uow = harness.unit_of_work();
    uow.add(acme.clone());
    uow.remove(acme);

    assert_eq!(uow.save_changes(&SystemActor).await.unwrap(), 0);
    assert_eq!(harness.store.count("companies").await, 0);
    assert_eq!(harness.audit_rows().await, 0);
}

#[tokio::test]
async fn saving_twice_does_not_duplicate_entries() {
    let harness = AuditHarness::new();

    let mut uow = harness.unit_of_work();
    uow.add(company("Acme"));
    assert_eq!(uow.save_changes(&SystemActor).await.unwrap(), 1);
    assert_eq!(uow.save_changes(&SystemActor).await.unwrap(), 0);

    assert_eq!(harness.audit_rows().await, 1);
}

// ── Atomicity ──

#[tokio::test]
async fn failed_write_leaves_no_audit_entries() {
    let harness = AuditHarness::new();

    let mut uow = harness.unit_of_work();
    uow.add(company("Acme"));
    uow.add(company("Globex"));
    harness.store.fail_next_apply();

    let err = uow.save_changes(&SystemActor).await.unwrap_err();

    assert!(matches!(err, CommitError::Store(StoreError::Injected)));
    assert_eq!(harness.store.count("companies").await, 0);
    assert_eq!(harness.audit_rows().await, 0);
    assert!(uow.has_changes());
}

#[tokio::test]
async fn duplicate_key_rolls_back_whole_batch() {
    let harness = AuditHarness::new();
    let acme = company("Acme");

    let mut uow = harness.unit_of_work();
    uow.add(acme.clone());
    uow.save_changes(&SystemActor).await.unwrap();

    let mut uow = harness.unit_of_work();
    uow.add(company("Globex"));
    uow.add(acme);
    let err = uow.save_changes(&SystemActor).await.unwrap_err();

    assert!(matches!(err, CommitError::Store(StoreError::DuplicateKey { .. })));
    assert_eq!(harness.store.count("companies").await, 1);
    assert_eq!(harness.audit_rows().await, 1);
}

#[tokio::test]
async fn extraction_failure_aborts_commit() {
    let harness = AuditHarness::new();
    let actor = CountingActor::new();
    let gadget = Gadget::new(vec![Property::new("ratio", 1.0f64)]);

    let mut uow = harness.unit_of_work();
    uow.add(gadget.clone());
    uow.save_changes(&actor).await.unwrap();

    let broken = gadget.with(vec![Property::new("ratio", f64::INFINITY)]);
    let mut uow = harness.unit_of_work();
    uow.update(&gadget, broken);
    let err = uow.save_changes(&actor).await.unwrap_err();

    assert!(matches!(err, CommitError::Audit(AuditError::NonFiniteFloat { .. })));
    assert_eq!(
        harness.store.row("gadgets", gadget.id).await,
        Some(gadget.properties.clone())
    );
    assert_eq!(harness.audit_rows().await, 1);
}
