//! End-to-end behaviour of the repository and audit log over real backends.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use appdesk_audit::DocumentAuditLog;
use appdesk_contracts::{
    admin::{Actor, RequestMeta},
    audit::{AuditEvent, ACTION_APPLICATION_DELETED, ACTION_APPLICATION_STATUS_CHANGED},
    document::DocumentKey,
    error::{AppdeskError, StoreResult},
};
use appdesk_core::{
    traits::{AuditSink, DocumentStore},
    AdminService, ApplicationRepository, StatusChange, TokenGate,
};
use appdesk_store::{FailureMode, FileStore, MemoryStore};

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Fixture {
    store: MemoryStore,
    audit: Arc<DocumentAuditLog>,
    repo: ApplicationRepository,
}

fn fixture() -> Fixture {
    let store = MemoryStore::new();
    let shared: Arc<dyn DocumentStore> = Arc::new(store.clone());
    let audit = Arc::new(DocumentAuditLog::new(Arc::clone(&shared)));
    let repo = ApplicationRepository::new(shared, audit.clone());
    Fixture { store, audit, repo }
}

fn pending(id: &str) -> Value {
    json!({
        "id": id,
        "type": "helper",
        "discordUsername": format!("user-{}", id),
        "status": "pending",
        "submittedAt": "2024-03-01T08:00:00.000Z",
        "updatedAt": "2024-03-01T08:00:00.000Z"
    })
}

fn seed_applications(store: &MemoryStore, ids: &[&str]) {
    let apps: Vec<Value> = ids.iter().map(|id| pending(id)).collect();
    store.seed(DocumentKey::Applications, json!({ "applications": apps }));
}

fn admin() -> Actor {
    Actor::default()
}

// ── Collection properties ─────────────────────────────────────────────────────

#[test]
fn test_list_is_idempotent() {
    let f = fixture();
    seed_applications(&f.store, &["a1", "a2", "a3"]);

    let first = f.repo.list_applications();
    let second = f.repo.list_applications();

    assert_eq!(first, second);
    assert_eq!(f.store.writes(), 0, "listing never writes");
}

#[test]
fn test_submit_round_trip() {
    let f = fixture();
    let payload = json!({
        "type": "helper",
        "discordUsername": "ferris",
        "age": 19,
        "availability": ["weekends"]
    });

    let id = f.repo.submit_application(payload.clone()).unwrap();
    let apps = f.repo.list_applications();

    assert_eq!(apps.len(), 1);
    let stored = serde_json::to_value(&apps[0]).unwrap();
    for (key, value) in payload.as_object().unwrap() {
        assert_eq!(&stored[key], value, "field '{}' must pass through", key);
    }
    assert_eq!(stored["id"], id.as_str());
    assert_eq!(stored["status"], "pending");
    assert!(apps[0].updated_at().unwrap() >= apps[0].submitted_at().unwrap());
}

#[test]
fn test_submitted_ids_are_unique() {
    let f = fixture();
    let ids: HashSet<String> = (0..50)
        .map(|n| f.repo.submit_application(json!({ "n": n })).unwrap())
        .collect();

    assert_eq!(ids.len(), 50);
    assert_eq!(f.repo.list_applications().len(), 50);
}

#[test]
fn test_submissions_keep_insertion_order() {
    let f = fixture();
    let ids: Vec<String> = (0..5)
        .map(|n| f.repo.submit_application(json!({ "n": n })).unwrap())
        .collect();

    let apps = f.repo.list_applications();
    let listed: Vec<&str> = apps.iter().filter_map(|a| a.id()).collect();
    assert_eq!(listed, ids);
}

#[test]
fn test_update_unknown_id_changes_nothing() {
    let f = fixture();
    seed_applications(&f.store, &["a1"]);
    let before = f.store.peek(DocumentKey::Applications);

    let change = f.repo.update_status(&admin(), "missing", "approved").unwrap();

    assert_eq!(change, StatusChange::Missing);
    assert_eq!(f.store.peek(DocumentKey::Applications), before);
    assert!(f.store.peek(DocumentKey::AuditLogs).is_none(), "no audit entry");
}

#[test]
fn test_update_effect_and_audit() {
    let f = fixture();
    seed_applications(&f.store, &["a1"]);
    let before = f.repo.list_applications()[0].updated_at().unwrap();

    f.repo.update_status(&admin(), "a1", "approved").unwrap();

    let app = &f.repo.list_applications()[0];
    assert_eq!(app.status(), Some("approved"));
    assert!(app.updated_at().unwrap() > before);

    let entries = f.audit.list(100);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, ACTION_APPLICATION_STATUS_CHANGED);
    assert_eq!(entries[0].admin_user, "admin");
    let details = entries[0].details.as_ref().unwrap();
    assert_eq!(details["oldStatus"], "pending");
    assert_eq!(details["newStatus"], "approved");
}

#[test]
fn test_delete_effect_and_audit() {
    let f = fixture();
    seed_applications(&f.store, &["a1", "a2"]);

    f.repo.delete_application(&admin(), "a1").unwrap();

    let apps = f.repo.list_applications();
    let ids: Vec<&str> = apps.iter().filter_map(|a| a.id()).collect();
    assert_eq!(ids, vec!["a2"]);

    let entries = f.audit.list(100);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, ACTION_APPLICATION_DELETED);
    assert_eq!(entries[0].target_id.as_deref(), Some("a1"));
    assert_eq!(entries[0].target_type.as_deref(), Some("application"));
}

#[test]
fn test_delete_validation_precedes_store_access() {
    let store = MemoryStore::new();
    let shared: Arc<dyn DocumentStore> = Arc::new(store.clone());
    let audit = Arc::new(DocumentAuditLog::new(Arc::clone(&shared)));
    let service = AdminService::new(
        Box::new(TokenGate::new("secret", Default::default())),
        shared,
        audit,
    );

    for id in [None, Some("")] {
        let err = service
            .delete_application(Some("secret"), RequestMeta::default(), id)
            .unwrap_err();
        assert!(matches!(err, AppdeskError::Validation { .. }), "id {:?}", id);
    }
    assert_eq!(store.accesses(), 0);

    service
        .delete_application(Some("secret"), RequestMeta::default(), Some("   "))
        .unwrap();
    assert!(store.accesses() > 0, "a blank id is looked up like any other");
}

#[test]
fn test_mutations_leave_other_records_byte_identical() {
    let f = fixture();
    let mut odd = pending("a3");
    odd["type"] = Value::Null;
    odd["discordUsername"] = Value::Null;
    odd["score"] = json!(4.5);
    f.store.seed(
        DocumentKey::Applications,
        json!({ "applications": [pending("a1"), pending("a2"), odd.clone()] }),
    );

    f.repo.delete_application(&admin(), "a2").unwrap();
    f.repo.update_status(&admin(), "a1", "approved").unwrap();

    let stored = f.store.peek(DocumentKey::Applications).unwrap();
    let apps = stored["applications"].as_array().unwrap();
    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0]["submittedAt"], "2024-03-01T08:00:00.000Z");
    let updated_at = apps[0]["updatedAt"].as_str().unwrap();
    assert!(
        updated_at.ends_with('Z') && updated_at.len() == "2024-03-01T08:00:00.000Z".len(),
        "new stamps use millisecond ISO form, got {}",
        updated_at
    );
    assert_eq!(apps[1], odd, "nulls and unknown fields survive a re-write");
}

// ── Audit bound ───────────────────────────────────────────────────────────────

#[test]
fn test_audit_log_keeps_newest_thousand() {
    let f = fixture();
    let admin = admin();
    for n in 0..1001 {
        f.audit.record(
            AuditEvent::new("TEST_EVENT", &admin.identity).target(n.to_string(), "counter"),
        );
    }

    let stored = f.store.peek(DocumentKey::AuditLogs).unwrap();
    let logs = stored["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1000);
    assert_eq!(logs[0]["targetId"], "1000", "newest first");
    assert_eq!(logs[999]["targetId"], "1");
    assert!(
        logs.iter().all(|e| e["targetId"] != "0"),
        "the single oldest entry is evicted"
    );
    assert_eq!(f.audit.list(100).len(), 100);
}

// ── Fail-open ─────────────────────────────────────────────────────────────────

#[test]
fn test_list_fails_open_on_broken_backend() {
    for mode in [FailureMode::Unconfigured, FailureMode::Unreachable] {
        let f = fixture();
        seed_applications(&f.store, &["a1"]);
        f.store.set_failure(mode);

        assert!(f.repo.list_applications().is_empty(), "mode {:?}", mode);
        assert!(f.audit.list(100).is_empty(), "mode {:?}", mode);
    }
}

#[test]
fn test_unreachable_backend_never_loses_stored_data() {
    let f = fixture();
    seed_applications(&f.store, &["a1", "a2"]);
    f.store.set_failure(FailureMode::Unreachable);

    assert!(f.repo.delete_application(&admin(), "a1").unwrap().is_none());
    assert!(f.repo.submit_application(json!({})).is_err());

    f.store.set_failure(FailureMode::Healthy);
    assert_eq!(f.repo.list_applications().len(), 2);
}

// ── Filesystem backend ────────────────────────────────────────────────────────

#[test]
fn test_file_backend_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let open = || {
        let store: Arc<dyn DocumentStore> = Arc::new(FileStore::new(dir.path()));
        let audit = Arc::new(DocumentAuditLog::new(Arc::clone(&store)));
        (ApplicationRepository::new(store, audit.clone()), audit)
    };

    let (repo, _) = open();
    let keep = repo.submit_application(json!({ "type": "helper" })).unwrap();
    let drop_me = repo.submit_application(json!({ "type": "mod" })).unwrap();
    repo.update_status(&admin(), &keep, "approved").unwrap();

    let (repo, audit) = open();
    repo.delete_application(&admin(), &drop_me).unwrap();

    let apps = repo.list_applications();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].id(), Some(keep.as_str()));
    assert_eq!(apps[0].status(), Some("approved"));

    let actions: Vec<String> = audit.list(10).into_iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![ACTION_APPLICATION_DELETED, ACTION_APPLICATION_STATUS_CHANGED]
    );
}

// ── Concurrency ───────────────────────────────────────────────────────────────

type Hook = Box<dyn FnOnce() + Send>;

/// Runs a hook right after the first `applications` read returns, which
/// reproduces the read A / read B / write B / write A interleaving.
struct InterleavingStore {
    inner: MemoryStore,
    hook: Mutex<Option<Hook>>,
}

impl DocumentStore for InterleavingStore {
    fn backend(&self) -> &'static str {
        "interleaving"
    }

    fn get(&self, key: DocumentKey) -> StoreResult<Option<Value>> {
        let value = self.inner.get(key)?;
        if key == DocumentKey::Applications {
            let hook = self.hook.lock().unwrap().take();
            if let Some(hook) = hook {
                hook();
            }
        }
        Ok(value)
    }

    fn set(&self, key: DocumentKey, value: &Value) -> StoreResult<()> {
        self.inner.set(key, value)
    }
}

#[test]
fn test_overlapping_writers_are_last_writer_wins() {
    let inner = MemoryStore::new();
    seed_applications(&inner, &["a1"]);

    let other_store: Arc<dyn DocumentStore> = Arc::new(inner.clone());
    let other = ApplicationRepository::new(
        Arc::clone(&other_store),
        Arc::new(DocumentAuditLog::new(other_store)),
    );
    let hook: Hook = Box::new(move || {
        other.submit_application(json!({ "type": "lost" })).unwrap();
    });
    let interleaved: Arc<dyn DocumentStore> = Arc::new(InterleavingStore {
        inner: inner.clone(),
        hook: Mutex::new(Some(hook)),
    });
    let repo = ApplicationRepository::new(
        Arc::clone(&interleaved),
        Arc::new(DocumentAuditLog::new(interleaved)),
    );

    let winner = repo.submit_application(json!({ "type": "kept" })).unwrap();

    let apps = repo.list_applications();
    let ids: Vec<&str> = apps.iter().filter_map(|a| a.id()).collect();
    assert_eq!(ids, vec!["a1", winner.as_str()], "the overlapping submit was overwritten");
}
