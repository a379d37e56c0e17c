//! CreateUser Tests

use std::sync::Arc;

use fake::faker::internet::en::{SafeEmail, Username};
use fake::Fake;
use pretty_assertions::assert_eq;

use forum_server::application::services::{CreationService, CreationServiceImpl};
use forum_server::domain::{Email, Group, User};
use forum_server::shared::error::{ForumError, StorageError, ValidationError};

use crate::common::{int, service, text, Event};

#[tokio::test]
async fn test_create_user_defaults_display_name_to_user_name() {
    let (store, service) = service();
    let mut user = User::new("dany", "pw");

    service.create_user(&mut user).await.unwrap();

    assert_eq!(
        store.events(),
        vec![Event::Begin, Event::insert("users", 1), Event::Commit]
    );
    let rows = store.rows("users");
    assert_eq!(rows.len(), 1);
    assert_eq!(text(&rows[0], "display_name"), "dany");
    assert_eq!(text(&rows[0], "user_name"), "dany");
    assert_eq!(text(&rows[0], "password"), "pw");
    assert_eq!(user.display_name, "dany");
    assert_eq!(user.id, int(&rows[0], "id"));
}

#[tokio::test]
async fn test_create_user_keeps_explicit_display_name() {
    let (store, service) = service();
    let mut user = User {
        display_name: "Daenerys".into(),
        ..User::new("dany", "pw")
    };

    service.create_user(&mut user).await.unwrap();

    assert_eq!(text(&store.rows("users")[0], "display_name"), "Daenerys");
}

#[tokio::test]
async fn test_create_user_inserts_emails_in_one_batch() {
    let (store, service) = service();
    let user_name: String = Username().fake();
    let mut user = User::new(user_name, "pw");
    for _ in 0..3 {
        user.emails.push(Email::new(SafeEmail().fake::<String>()));
    }
    // Avoid accidental duplicates from the generator.
    for (i, email) in user.emails.iter_mut().enumerate() {
        email.email = format!("{i}.{}", email.email);
    }

    service.create_user(&mut user).await.unwrap();

    assert_eq!(
        store.events(),
        vec![
            Event::Begin,
            Event::insert("users", 1),
            Event::insert("emails", 3),
            Event::Commit
        ]
    );
    let emails = store.rows("emails");
    assert_eq!(emails.len(), 3);
    assert!(emails.iter().all(|row| int(row, "user_id") == user.id));
    assert!(user.emails.iter().all(|email| email.user_id == user.id));
}

#[tokio::test]
async fn test_create_user_splits_emails_into_batches_of_ten() {
    let (store, service) = service();
    let mut user = User::new("dany", "pw");
    for i in 0..12 {
        user = user.with_email(format!("dany{i}@example.com"));
    }

    service.create_user(&mut user).await.unwrap();

    assert_eq!(
        store.events(),
        vec![
            Event::Begin,
            Event::insert("users", 1),
            Event::insert("emails", 10),
            Event::insert("emails", 2),
            Event::Commit
        ]
    );
    assert_eq!(store.count("emails"), 12);
}

#[tokio::test]
async fn test_create_user_honours_configured_batch_size() {
    let (store, _) = service();
    let service = CreationServiceImpl::new(Arc::clone(&store)).with_batch_size(2);
    let mut user = User::new("dany", "pw")
        .with_email("a@example.com")
        .with_email("b@example.com")
        .with_email("c@example.com");

    service.create_user(&mut user).await.unwrap();

    assert_eq!(service.batch_size(), 2);
    assert_eq!(store.statements_for("emails").len(), 2);
    assert_eq!(store.count("emails"), 3);
}

#[tokio::test]
async fn test_create_user_without_user_name_touches_no_storage() {
    let (store, service) = service();
    let mut user = User::new("", "pw");

    let err = service.create_user(&mut user).await.unwrap_err();

    assert_eq!(err.validation(), Some(ValidationError::EmptyUserName));
    assert!(store.events().is_empty());
}

#[tokio::test]
async fn test_create_user_without_password_touches_no_storage() {
    let (store, service) = service();
    let mut user = User::new("dany", "");

    let err = service.create_user(&mut user).await.unwrap_err();

    assert_eq!(err.validation(), Some(ValidationError::EmptyPassword));
    assert!(store.events().is_empty());
    assert!(user.display_name.is_empty());
}

#[tokio::test]
async fn test_create_user_never_inserts_referenced_groups() {
    let (store, service) = service();
    let mut user = User::new("dany", "pw");
    user.groups.push(Group {
        id: 3,
        ..Group::new("The Avengers", 10)
    });

    service.create_user(&mut user).await.unwrap();

    assert!(store.statements_for("groups").is_empty());
    assert_eq!(store.statements_for("users")[0][0].excluded, vec!["emails", "groups"]);
}

#[tokio::test]
async fn test_failed_email_batch_rolls_back_the_user() {
    let (store, service) = service();
    store.fail_inserts_into("emails");
    let mut user = User::new("dany", "pw").with_email("dany@example.com");

    let err = service.create_user(&mut user).await.unwrap_err();

    assert!(matches!(err, ForumError::Storage(StorageError::Backend(_))));
    assert_eq!(
        store.events(),
        vec![
            Event::Begin,
            Event::insert("users", 1),
            Event::insert("emails", 1),
            Event::Rollback
        ]
    );
    assert_eq!(store.count("users"), 0);
    assert_eq!(store.count("emails"), 0);
}

#[tokio::test]
async fn test_failed_user_insert_skips_emails() {
    let (store, service) = service();
    store.fail_inserts_into("users");
    let mut user = User::new("dany", "pw").with_email("dany@example.com");

    let err = service.create_user(&mut user).await.unwrap_err();

    assert!(err.is_storage());
    assert_eq!(
        store.events(),
        vec![Event::Begin, Event::insert("users", 1), Event::Rollback]
    );
}

#[tokio::test]
async fn test_duplicate_user_name_is_a_storage_error() {
    let (store, service) = service();
    service.create_user(&mut User::new("dany", "pw")).await.unwrap();

    let err = service
        .create_user(&mut User::new("dany", "other"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ForumError::Storage(StorageError::UniqueViolation { .. })
    ));
    assert_eq!(store.count("users"), 1);
}

#[tokio::test]
async fn test_closed_store_is_a_precondition_error() {
    let (store, service) = service();
    store.close();

    let err = service
        .create_user(&mut User::new("dany", "pw"))
        .await
        .unwrap_err();

    assert!(matches!(err, ForumError::NoConnection));
    assert!(store.events().is_empty());
}
