//! Behaviour of the in-memory backend through its ports.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;

/// Clock that advances one minute every time it is read.
struct SteppingClock(Mutex<DateTime<Utc>>);

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        };
        let current = *now;
        *now += TimeDelta::minutes(1);
        current
    }
}

#[fixture]
fn backend() -> MemoryBackend {
    let start = Utc
        .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp");
    MemoryBackend::seeded(Arc::new(SteppingClock(Mutex::new(start))))
}

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => panic!("row fixtures must be objects"),
    }
}

fn credentials(email: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(email, password).expect("credentials")
}

#[rstest]
#[tokio::test]
async fn seeded_backend_lists_demo_departments(backend: MemoryBackend) {
    let rows = backend
        .select(&TableQuery::new(Table::Departments))
        .await
        .expect("select");
    let names: Vec<&str> = rows
        .iter()
        .filter_map(|row| row.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, vec!["Roads", "Sanitation", "Health"]);
    assert_eq!(rows[0].get("id"), Some(&json!(1)));
}

#[rstest]
#[tokio::test]
async fn inserts_assign_sequential_ids(backend: MemoryBackend) {
    let inserted = backend
        .insert(Table::Departments, row(json!({"name": "Parks"})))
        .await
        .expect("insert");
    assert_eq!(inserted, vec![row(json!({"name": "Parks", "id": 4}))]);
}

#[rstest]
#[tokio::test]
async fn complaints_are_stamped_and_listed_newest_first(backend: MemoryBackend) {
    backend
        .insert(
            Table::Profiles,
            row(json!({"id": "u-1", "email": "a@x.com", "full_name": "Ada", "role": "citizen"})),
        )
        .await
        .expect("profile");
    for title in ["first", "second"] {
        backend
            .insert(
                Table::Complaints,
                row(json!({"user_id": "u-1", "department_id": 2, "title": title,
                           "description": "d", "status": "Pending"})),
            )
            .await
            .expect("complaint");
    }

    let query = TableQuery::new(Table::Complaints)
        .embed(Table::Departments, "department_id", &["name"])
        .embed(Table::Profiles, "user_id", &["full_name", "email"])
        .order_desc("created_at");
    let rows = backend.select(&query).await.expect("select");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("title"), Some(&json!("second")));
    assert_eq!(rows[0].get("created_at"), Some(&json!("2026-03-01T09:01:00+00:00")));
    assert_eq!(rows[0].get("departments"), Some(&json!({"name": "Sanitation"})));
    assert_eq!(
        rows[1].get("profiles"),
        Some(&json!({"full_name": "Ada", "email": "a@x.com"}))
    );
}

#[rstest]
#[tokio::test]
async fn missing_embed_target_is_null(backend: MemoryBackend) {
    backend
        .insert(
            Table::Complaints,
            row(json!({"user_id": "ghost", "department_id": 99, "title": "t",
                       "description": "d", "status": "Pending"})),
        )
        .await
        .expect("complaint");
    let query = TableQuery::new(Table::Complaints).embed(Table::Profiles, "user_id", &["email"]);
    let rows = backend.select(&query).await.expect("select");
    assert_eq!(rows[0].get("profiles"), Some(&Value::Null));
}

#[rstest]
#[tokio::test]
async fn update_and_count_respect_filters(backend: MemoryBackend) {
    for status in ["Pending", "Pending", "Resolved"] {
        backend
            .insert(
                Table::Complaints,
                row(json!({"user_id": "u-1", "department_id": 1, "title": "t",
                           "description": "d", "status": status})),
            )
            .await
            .expect("complaint");
    }

    let updated = backend
        .update(
            Table::Complaints,
            row(json!({"status": "In Progress"})),
            &[Filter::eq("id", 1)],
        )
        .await
        .expect("update");
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].get("status"), Some(&json!("In Progress")));

    let pending = backend
        .count(Table::Complaints, &[Filter::eq("status", "Pending")])
        .await
        .expect("count");
    let total = backend.count(Table::Complaints, &[]).await.expect("count");
    assert_eq!((pending, total), (1, 3));
}

#[rstest]
#[tokio::test]
async fn duplicate_profile_ids_are_rejected(backend: MemoryBackend) {
    let profile = row(json!({"id": "u-1", "email": "a@x.com", "role": "citizen"}));
    backend
        .insert(Table::Profiles, profile.clone())
        .await
        .expect("first insert");
    let err = backend
        .insert(Table::Profiles, profile)
        .await
        .expect_err("duplicate");
    assert!(matches!(err, TableStoreError::Rejected { .. }));
}

#[rstest]
#[tokio::test]
async fn sign_up_then_sign_in_round_trips_identity(backend: MemoryBackend) {
    let identity = backend
        .sign_up(&credentials("a@x.com", "pw"))
        .await
        .expect("sign up")
        .expect("identity");
    let session = backend
        .sign_in(&credentials("a@x.com", "pw"))
        .await
        .expect("sign in");
    assert_eq!(session.identity, Some(identity));
    assert!(session.access_token.is_some());
}

#[rstest]
#[tokio::test]
async fn duplicate_sign_up_is_rejected(backend: MemoryBackend) {
    backend
        .sign_up(&credentials("a@x.com", "pw"))
        .await
        .expect("first sign up");
    let err = backend
        .sign_up(&credentials("a@x.com", "other"))
        .await
        .expect_err("duplicate");
    assert_eq!(err, IdentityProviderError::rejected("User already registered"));
}

#[rstest]
#[case("a@x.com", "wrong")]
#[case("b@x.com", "pw")]
#[tokio::test]
async fn bad_credentials_are_rejected(
    backend: MemoryBackend,
    #[case] email: &str,
    #[case] password: &str,
) {
    backend
        .sign_up(&credentials("a@x.com", "pw"))
        .await
        .expect("sign up");
    let err = backend
        .sign_in(&credentials(email, password))
        .await
        .expect_err("rejected");
    assert!(matches!(err, IdentityProviderError::Rejected { .. }));
}
