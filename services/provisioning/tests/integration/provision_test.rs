use posyandu_domain::id::HealthPostId;
use posyandu_domain::identifier::LoginSource;
use posyandu_domain::role::Role;
use posyandu_provisioning::domain::types::{AccountInput, Compensation, ConflictField};
use posyandu_provisioning::error::ProvisionError;

use crate::helpers::{
    LOGIN_DOMAIN, MockIdentityStore, MockProfileRepo, kader_input, parent_input, usecase,
    usecase_with_domain,
};

const MAWAR: &str = "Posyandu Mawar";

fn setup() -> (HealthPostId, MockIdentityStore, MockProfileRepo) {
    let post = HealthPostId::new();
    (
        post,
        MockIdentityStore::new(),
        MockProfileRepo::with_health_posts(&[(post, MAWAR)]),
    )
}

// ── success ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_profile_with_credential_id() {
    let (post, identity, profiles) = setup();

    let outcome = usecase(&identity, &profiles)
        .run(kader_input("081234567890", "3201010101010001", post))
        .await;

    let profile = outcome.result.unwrap();
    assert_eq!(outcome.compensation, Compensation::NotNeeded);
    assert_eq!(
        identity.id_of(&format!("081234567890@{LOGIN_DOMAIN}")),
        Some(profile.id)
    );
    assert_eq!(profile.role, Role::Kader);
    assert_eq!(profile.health_post_id, Some(post));
    assert_eq!(profiles.count(), 1);
}

#[tokio::test]
async fn should_flag_default_password_when_secret_omitted() {
    let (post, identity, profiles) = setup();

    let profile = usecase(&identity, &profiles)
        .execute(AccountInput {
            secret: None,
            ..parent_input("081234567891", post)
        })
        .await
        .unwrap();

    assert!(profile.uses_default_password);
    let stored = profiles.profiles();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, profile.id);
    assert!(stored[0].uses_default_password);
}

#[tokio::test]
async fn should_create_admin_without_health_post() {
    let (_, identity, profiles) = setup();

    let profile = usecase(&identity, &profiles)
        .execute(AccountInput {
            role: Role::Admin,
            health_post_id: None,
            ..parent_input("081299990000", HealthPostId::new())
        })
        .await
        .unwrap();

    assert_eq!(profile.health_post_id, None);
}

// ── identity store failures ──────────────────────────────────────────────────

#[tokio::test]
async fn should_not_compensate_when_handle_already_registered() {
    let (post, identity, profiles) = setup();
    identity.register(&format!("081234567890@{LOGIN_DOMAIN}"));

    let outcome = usecase(&identity, &profiles)
        .run(parent_input("081234567890", post))
        .await;

    match outcome.result {
        Err(ProvisionError::IdentityConflict { identifier }) => {
            assert_eq!(identifier, "081234567890")
        }
        other => panic!("expected IdentityConflict, got {other:?}"),
    }
    assert_eq!(outcome.compensation, Compensation::NotNeeded);
    assert!(identity.delete_calls().is_empty());
    assert_eq!(profiles.count(), 0);
}

#[tokio::test]
async fn should_return_identity_conflict_on_retry() {
    let (post, identity, profiles) = setup();
    let usecase = usecase(&identity, &profiles);

    usecase
        .execute(parent_input("081234567890", post))
        .await
        .unwrap();
    let retry = usecase.execute(parent_input("081234567890", post)).await;

    assert!(matches!(
        retry,
        Err(ProvisionError::IdentityConflict { .. })
    ));
    assert_eq!(profiles.count(), 1);
    assert_eq!(identity.credential_count(), 1);
}

#[tokio::test]
async fn should_map_missing_configuration() {
    let (post, _, profiles) = setup();
    let identity = MockIdentityStore::unconfigured();

    let result = usecase(&identity, &profiles)
        .execute(parent_input("081234567890", post))
        .await;

    assert!(matches!(result, Err(ProvisionError::Configuration(_))));
    assert_eq!(profiles.count(), 0);
}

#[tokio::test]
async fn should_map_identity_backend_failure() {
    let (post, _, profiles) = setup();
    let identity = MockIdentityStore::failing_create();

    let result = usecase(&identity, &profiles)
        .execute(parent_input("081234567890", post))
        .await;

    assert!(matches!(
        result,
        Err(ProvisionError::IdentityBackendFailure(_))
    ));
    assert!(identity.delete_calls().is_empty());
}

// ── profile insert failures ──────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_credential_when_phone_collides() {
    let (post, identity, profiles) = setup();
    let usecase = usecase(&identity, &profiles);
    usecase
        .execute(kader_input("081234567890", "3201010101010001", post))
        .await
        .unwrap();

    // Same phone, but logs in by NIK so the identity store accepts the handle.
    let outcome = usecase
        .run(AccountInput {
            login_source: LoginSource::NationalId,
            ..kader_input("081234567890", "3201010101010002", post)
        })
        .await;

    match outcome.result {
        Err(ProvisionError::ProfileConflict { field, owner_hint }) => {
            assert_eq!(field, ConflictField::Phone);
            assert_eq!(owner_hint, MAWAR);
        }
        other => panic!("expected ProfileConflict, got {other:?}"),
    }
    assert_eq!(outcome.compensation, Compensation::CredentialDeleted);
    assert_eq!(identity.delete_calls().len(), 1);
    assert!(!identity.contains(identity.delete_calls()[0]));
    assert_eq!(identity.credential_count(), 1);
    assert_eq!(profiles.count(), 1);
}

#[tokio::test]
async fn should_attribute_national_id_collision() {
    let (post, identity, profiles) = setup();
    let usecase = usecase(&identity, &profiles);
    usecase
        .execute(kader_input("081234567890", "3201010101010001", post))
        .await
        .unwrap();

    let result = usecase
        .execute(kader_input("081311112222", "3201010101010001", post))
        .await;

    assert!(matches!(
        result,
        Err(ProvisionError::ProfileConflict {
            field: ConflictField::NationalId,
            ..
        })
    ));
}

#[tokio::test]
async fn should_report_orphan_when_compensation_fails() {
    let (post, _, profiles) = setup();
    let identity = MockIdentityStore::failing_delete();
    let usecase = usecase(&identity, &profiles);
    usecase
        .execute(kader_input("081234567890", "3201010101010001", post))
        .await
        .unwrap();

    let outcome = usecase
        .run(AccountInput {
            login_source: LoginSource::NationalId,
            ..kader_input("081234567890", "3201010101010001", post)
        })
        .await;

    // The primary error survives the failed delete.
    assert!(matches!(
        outcome.result,
        Err(ProvisionError::ProfileConflict { .. })
    ));
    let orphan = identity
        .id_of(&format!("3201010101010001@{LOGIN_DOMAIN}"))
        .unwrap();
    assert_eq!(
        outcome.compensation,
        Compensation::Orphaned {
            credential_id: orphan
        }
    );
    assert_eq!(identity.delete_calls(), vec![orphan]);
}

#[tokio::test]
async fn should_compensate_on_backend_insert_failure() {
    let post = HealthPostId::new();
    let identity = MockIdentityStore::new();
    let profiles = MockProfileRepo::with_health_posts(&[(post, MAWAR)]).failing_insert();

    let outcome = usecase(&identity, &profiles)
        .run(parent_input("081234567890", post))
        .await;

    assert!(matches!(
        outcome.result,
        Err(ProvisionError::ProfileBackendFailure(_))
    ));
    assert_eq!(outcome.compensation, Compensation::CredentialDeleted);
    assert_eq!(identity.credential_count(), 0);
}

#[tokio::test]
async fn should_reject_unknown_health_post_after_compensating() {
    let (_, identity, profiles) = setup();

    let outcome = usecase(&identity, &profiles)
        .run(parent_input("081234567890", HealthPostId::new()))
        .await;

    assert!(matches!(
        outcome.result,
        Err(ProvisionError::Validation(ref m)) if m == "posyandu tidak ditemukan"
    ));
    assert_eq!(outcome.compensation, Compensation::CredentialDeleted);
    assert_eq!(identity.credential_count(), 0);
}

// ── scenario ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_succeed_once_then_conflict_for_identical_call() {
    let post = HealthPostId::new();
    let identity = MockIdentityStore::new();
    let profiles = MockProfileRepo::with_health_posts(&[(post, "Posyandu A")]);
    let usecase = usecase_with_domain(&identity, &profiles, "domain");
    let input = || AccountInput {
        secret: None,
        ..parent_input("081234500000", post)
    };

    let first = usecase.execute(input()).await.unwrap();
    assert_eq!(identity.id_of("081234500000@domain"), Some(first.id));
    assert_eq!(first.role, Role::OrangTua);

    let second = usecase.execute(input()).await;
    assert!(matches!(
        second,
        Err(ProvisionError::IdentityConflict { .. })
    ));
    assert_eq!(profiles.count(), 1);
}
