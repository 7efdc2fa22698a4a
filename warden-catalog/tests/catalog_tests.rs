//! End-to-end tests for the data catalog.
//!
//! Each test builds a fresh catalog with a few users and runs routed
//! requests through it, checking status codes, error bodies and which
//! properties each role gets to see.

use serde_json::{json, Value};
use warden_catalog::{Catalog, CatalogConfig, Note, Request, Source, User};
use warden_engine::{EngineSettings, Response};
use warden_resource::Action;
use warden_roles::Role;

const BAD_API_KEY: &str = "0000000000000000";
const FAKE_ID: &str = "4b1f0000000000000000beef";

/// A catalog seeded with one user per stored role.
struct Fixture {
    catalog: Catalog,
    basic: User,
    other: User,
    curator: User,
    admin: User,
}

impl Fixture {
    fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let catalog = Catalog::new(CatalogConfig::default(), EngineSettings::default()).unwrap();
        let basic = User::new("Ann", "ann@example.org", Role::new("basic"));
        let other = User::new("Bob", "bob@example.org", Role::new("basic"));
        let curator = User::new("Cy", "cy@example.org", Role::new("curator"));
        let admin = User::new("Ada", "ada@example.org", Role::new("admin"));
        for user in [&basic, &other, &curator, &admin] {
            catalog.store().insert(user).unwrap();
        }

        Self {
            catalog,
            basic,
            other,
            curator,
            admin,
        }
    }

    fn source(&self, title: &str) -> Source {
        let source = Source::new(title, format!("http://example.gov/{}", title.len()));
        self.catalog.store().insert(&source).unwrap();
        source
    }

    fn note(&self, source: &Source, author: &User, text: &str) -> Note {
        let note = Note::new(text, source.id, author.id);
        self.catalog.store().insert(&note).unwrap();
        note
    }

    async fn send(&self, request: Request) -> Response {
        self.catalog.respond(request).await
    }
}

fn as_user(request: Request, user: &User) -> Request {
    request.with_param("api_key", user.api_key.clone())
}

fn body(response: &Response) -> Value {
    serde_json::from_str(&response.body).unwrap()
}

fn keys(value: &Value) -> Vec<String> {
    let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

// ============================================================================
// Credentials
// ============================================================================

#[tokio::test]
async fn test_missing_api_key() {
    let fx = Fixture::new();
    let response = fx
        .send(Request::new(Action::Read, "users").with_id(fx.basic.id.to_string()))
        .await;

    assert_eq!(response.status, 401);
    assert_eq!(body(&response), json!({"errors": ["missing_api_key"]}));
}

#[tokio::test]
async fn test_invalid_api_key() {
    let fx = Fixture::new();
    let response = fx
        .send(
            Request::new(Action::List, "sources")
                .with_param("filter", "title='Source 2'")
                .with_param("api_key", BAD_API_KEY),
        )
        .await;

    assert_eq!(response.status, 401);
    assert_eq!(body(&response), json!({"errors": ["invalid_api_key"]}));
}

#[tokio::test]
async fn test_insufficient_role() {
    let fx = Fixture::new();
    let response = fx
        .send(as_user(
            Request::new(Action::Create, "sources").with_param("title", "Budget"),
            &fx.basic,
        ))
        .await;

    assert_eq!(response.status, 401);
    assert_eq!(body(&response), json!({"errors": "unauthorized_api_key"}));
}

// ============================================================================
// Reading
// ============================================================================

#[tokio::test]
async fn test_get_unknown_user() {
    let fx = Fixture::new();
    let response = fx
        .send(as_user(Request::new(Action::Read, "users").with_id(FAKE_ID), &fx.basic))
        .await;

    assert_eq!(response.status, 404);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_get_user_as_basic() {
    let fx = Fixture::new();
    let response = fx
        .send(as_user(
            Request::new(Action::Read, "users").with_id(fx.other.id.to_string()),
            &fx.basic,
        ))
        .await;

    assert_eq!(response.status, 200);
    let user = body(&response);
    assert_eq!(keys(&user), vec!["id", "name"]);
    assert_eq!(user["name"], "Bob");
}

#[tokio::test]
async fn test_get_self_as_owner() {
    let fx = Fixture::new();
    let response = fx
        .send(as_user(
            Request::new(Action::Read, "users").with_id(fx.basic.id.to_string()),
            &fx.basic,
        ))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(
        keys(&body(&response)),
        vec!["created_at", "email", "id", "name", "role", "updated_at"]
    );
}

#[tokio::test]
async fn test_list_projects_each_user_by_relative_role() {
    let fx = Fixture::new();
    let response = fx
        .send(as_user(Request::new(Action::List, "users"), &fx.basic))
        .await;

    assert_eq!(response.status, 200);
    let members = body(&response);
    let members = members.as_array().unwrap();
    assert_eq!(members.len(), 4);

    for member in members {
        let is_self = member["id"] == json!(fx.basic.id.to_string());
        assert_eq!(member.get("email").is_some(), is_self, "member {member}");
        assert!(member.get("_api_key").is_none());
    }
}

#[tokio::test]
async fn test_read_rejects_params() {
    let fx = Fixture::new();
    let source = fx.source("Census");
    let response = fx
        .send(as_user(
            Request::new(Action::Read, "sources")
                .with_id(source.id.to_string())
                .with_param("title", "x"),
            &fx.basic,
        ))
        .await;

    assert_eq!(response.status, 400);
    assert_eq!(body(&response), json!({"errors": "non_empty_params"}));
}

// ============================================================================
// Filtering and search
// ============================================================================

#[tokio::test]
async fn test_list_with_filter() {
    let fx = Fixture::new();
    for i in 0..3 {
        fx.source(&format!("Source {i}"));
    }

    for user in [&fx.basic, &fx.curator, &fx.admin] {
        let response = fx
            .send(as_user(
                Request::new(Action::List, "sources").with_param("filter", "title='Source 2'"),
                user,
            ))
            .await;

        assert_eq!(response.status, 200);
        let members = body(&response);
        assert_eq!(members.as_array().unwrap().len(), 1);
        assert_eq!(members[0]["title"], "Source 2");
    }
}

#[tokio::test]
async fn test_list_with_search() {
    let fx = Fixture::new();
    fx.source("US Census 2010");
    fx.source("Federal Budget");

    let response = fx
        .send(as_user(
            Request::new(Action::List, "sources").with_param("search", "census"),
            &fx.basic,
        ))
        .await;

    let members = body(&response);
    assert_eq!(members.as_array().unwrap().len(), 1);
    assert_eq!(members[0]["title"], "US Census 2010");
}

#[tokio::test]
async fn test_list_with_partial_filter() {
    let fx = Fixture::new();
    fx.source("Source 0");
    fx.source("Budget");

    let response = fx
        .send(as_user(
            Request::new(Action::List, "sources").with_param("filter", "title:source"),
            &fx.basic,
        ))
        .await;

    assert_eq!(response.status, 200);
    let members = body(&response);
    assert_eq!(members.as_array().unwrap().len(), 1);
    assert_eq!(members[0]["title"], "Source 0");
}

#[tokio::test]
async fn test_list_rejects_malformed_filter() {
    let fx = Fixture::new();
    fx.source("Census");

    let response = fx
        .send(as_user(
            Request::new(Action::List, "sources").with_param("filter", "title"),
            &fx.basic,
        ))
        .await;

    assert_eq!(response.status, 400);
    assert_eq!(body(&response), json!({"errors": {"invalid_filter": ["title"]}}));
}

#[tokio::test]
async fn test_filter_ignores_unreadable_properties() {
    let fx = Fixture::new();
    let by_email = Request::new(Action::List, "users").with_param("filter", "email='bob@example.org'");

    let response = fx.send(as_user(by_email.clone(), &fx.basic)).await;
    assert_eq!(response.status, 200);
    assert_eq!(body(&response), json!([]));

    let by_key = Request::new(Action::List, "users")
        .with_param("filter", format!("_api_key={}", fx.other.api_key));
    let response = fx.send(as_user(by_key, &fx.basic)).await;
    assert_eq!(body(&response), json!([]));

    let response = fx
        .send(as_user(
            Request::new(Action::List, "users").with_param("search", "bob@"),
            &fx.basic,
        ))
        .await;
    assert_eq!(body(&response), json!([]));

    // Bob reads his own email, so he can filter on it.
    let response = fx.send(as_user(by_email, &fx.other)).await;
    let members = body(&response);
    assert_eq!(members.as_array().unwrap().len(), 1);
    assert_eq!(members[0]["name"], "Bob");
}

#[tokio::test]
async fn test_list_rejects_property_params() {
    let fx = Fixture::new();
    let response = fx
        .send(as_user(
            Request::new(Action::List, "sources").with_param("title", "Census"),
            &fx.basic,
        ))
        .await;

    assert_eq!(response.status, 400);
    assert_eq!(body(&response), json!({"errors": "non_empty_params"}));
}

// ============================================================================
// Writing
// ============================================================================

#[tokio::test]
async fn test_create_source_as_curator() {
    let fx = Fixture::new();
    let response = fx
        .send(as_user(
            Request::new(Action::Create, "sources")
                .with_param("title", "Census 2010")
                .with_param("url", "http://census.gov"),
            &fx.curator,
        ))
        .await;

    assert_eq!(response.status, 201);
    let source = body(&response);
    let id = source["id"].as_str().unwrap();
    assert_eq!(
        response.location.as_deref(),
        Some(format!("http://localhost:4567/sources/{id}").as_str())
    );
    assert_eq!(source["title"], "Census 2010");
    assert_eq!(source["user_id"], json!(fx.curator.id.to_string()));
    assert_eq!(source["note_count"], 0);
    assert_eq!(fx.catalog.store().count("Source"), 1);
}

#[tokio::test]
async fn test_create_reports_every_invalid_param() {
    let fx = Fixture::new();
    let response = fx
        .send(as_user(
            Request::new(Action::Create, "sources")
                .with_param("title", "Census")
                .with_param("raw", json!({"key": "value"}))
                .with_param("note_count", 3),
            &fx.curator,
        ))
        .await;

    assert_eq!(response.status, 400);
    let mut invalid: Vec<String> =
        serde_json::from_value(body(&response)["errors"]["invalid_params"].clone()).unwrap();
    invalid.sort();
    assert_eq!(invalid, vec!["note_count", "raw"]);
    assert_eq!(fx.catalog.store().count("Source"), 0);
}

#[tokio::test]
async fn test_update_requires_params() {
    let fx = Fixture::new();
    let source = fx.source("Census");
    let response = fx
        .send(as_user(
            Request::new(Action::Update, "sources").with_id(source.id.to_string()),
            &fx.curator,
        ))
        .await;

    assert_eq!(response.status, 400);
    assert_eq!(body(&response), json!({"errors": "no_params"}));
}

#[tokio::test]
async fn test_update_own_user() {
    let fx = Fixture::new();
    let request = Request::new(Action::Update, "users")
        .with_id(fx.basic.id.to_string())
        .with_param("email", "ann@new.example.org");

    let response = fx.send(as_user(request.clone(), &fx.basic)).await;
    assert_eq!(response.status, 200);
    assert_eq!(body(&response)["email"], "ann@new.example.org");

    let response = fx.send(as_user(request, &fx.other)).await;
    assert_eq!(response.status, 401);
}

#[tokio::test]
async fn test_owner_cannot_promote_self() {
    let fx = Fixture::new();
    let response = fx
        .send(as_user(
            Request::new(Action::Update, "users")
                .with_id(fx.basic.id.to_string())
                .with_param("role", "admin"),
            &fx.basic,
        ))
        .await;

    assert_eq!(response.status, 400);
    assert_eq!(
        body(&response),
        json!({"errors": {"invalid_params": ["role"]}})
    );
}

#[tokio::test]
async fn test_delete_source() {
    let fx = Fixture::new();
    let source = fx.source("Census");
    let request = Request::new(Action::Delete, "sources").with_id(source.id.to_string());

    let response = fx.send(as_user(request.clone(), &fx.curator)).await;
    assert_eq!(response.status, 401);

    let response = fx.send(as_user(request, &fx.admin)).await;
    assert_eq!(response.status, 204);
    assert!(response.body.is_empty());
    assert_eq!(fx.catalog.store().count("Source"), 0);
}

#[tokio::test]
async fn test_admin_deletes_own_source() {
    let fx = Fixture::new();
    let response = fx
        .send(as_user(
            Request::new(Action::Create, "sources")
                .with_param("title", "Census 2010")
                .with_param("url", "http://census.gov"),
            &fx.admin,
        ))
        .await;
    assert_eq!(response.status, 201);
    let source = body(&response);
    assert_eq!(source["user_id"], json!(fx.admin.id.to_string()));

    let id = source["id"].as_str().unwrap();
    let response = fx
        .send(as_user(Request::new(Action::Delete, "sources").with_id(id), &fx.admin))
        .await;
    assert_eq!(response.status, 204);
    assert_eq!(fx.catalog.store().count("Source"), 0);
}

#[tokio::test]
async fn test_curator_updates_own_source() {
    let fx = Fixture::new();
    let response = fx
        .send(as_user(
            Request::new(Action::Create, "sources").with_param("title", "Census"),
            &fx.curator,
        ))
        .await;
    assert_eq!(response.status, 201);
    let id = body(&response)["id"].as_str().unwrap().to_string();

    let response = fx
        .send(as_user(
            Request::new(Action::Update, "sources")
                .with_id(id)
                .with_param("title", "Census 2010"),
            &fx.curator,
        ))
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(body(&response)["title"], "Census 2010");
}

// ============================================================================
// Nested notes
// ============================================================================

#[tokio::test]
async fn test_create_nested_note() {
    let fx = Fixture::new();
    let source = fx.source("Census");
    let response = fx
        .send(as_user(
            Request::new(Action::Create, "notes")
                .with_parent(source.id.to_string())
                .with_param("text", "Missing 2000 data"),
            &fx.basic,
        ))
        .await;

    assert_eq!(response.status, 201);
    let note = body(&response);
    let id = note["id"].as_str().unwrap();
    assert_eq!(
        response.location.as_deref(),
        Some(format!("http://localhost:4567/sources/{}/notes/{id}", source.id).as_str())
    );
    assert_eq!(note["source_id"], json!(source.id.to_string()));
    assert_eq!(note["user_id"], json!(fx.basic.id.to_string()));
    // The author reads the note as its owner.
    assert!(note.get("updated_at").is_some());
}

#[tokio::test]
async fn test_only_author_updates_note() {
    let fx = Fixture::new();
    let source = fx.source("Census");
    let note = fx.note(&source, &fx.basic, "First draft");
    let request = Request::new(Action::Update, "notes")
        .with_parent(source.id.to_string())
        .with_id(note.id.to_string())
        .with_param("text", "Second draft");

    let response = fx.send(as_user(request.clone(), &fx.other)).await;
    assert_eq!(response.status, 401);
    assert_eq!(body(&response), json!({"errors": "unauthorized_api_key"}));

    let response = fx.send(as_user(request, &fx.basic)).await;
    assert_eq!(response.status, 200);
    assert_eq!(body(&response)["text"], "Second draft");
}

#[tokio::test]
async fn test_note_under_wrong_source() {
    let fx = Fixture::new();
    let census = fx.source("Census");
    let budget = fx.source("Budget");
    let note = fx.note(&census, &fx.basic, "On the census");

    let response = fx
        .send(as_user(
            Request::new(Action::Read, "notes")
                .with_parent(budget.id.to_string())
                .with_id(note.id.to_string()),
            &fx.basic,
        ))
        .await;
    assert_eq!(response.status, 404);

    let response = fx
        .send(as_user(
            Request::new(Action::Read, "notes")
                .with_parent(FAKE_ID)
                .with_id(note.id.to_string()),
            &fx.basic,
        ))
        .await;
    assert_eq!(response.status, 404);
}

#[tokio::test]
async fn test_missing_parent_is_checked_first() {
    let fx = Fixture::new();
    let request = Request::new(Action::Update, "notes")
        .with_parent(FAKE_ID)
        .with_id(FAKE_ID)
        .with_param("text", "Orphan");

    let response = fx.send(as_user(request.clone(), &fx.basic)).await;
    assert_eq!(response.status, 404);
    assert!(response.body.is_empty());

    // Without credentials the parent's read permission fails first.
    let response = fx.send(request).await;
    assert_eq!(response.status, 401);
    assert_eq!(body(&response), json!({"errors": ["missing_api_key"]}));
}

#[tokio::test]
async fn test_list_notes_of_source() {
    let fx = Fixture::new();
    let census = fx.source("Census");
    let budget = fx.source("Budget");
    fx.note(&census, &fx.basic, "One");
    fx.note(&census, &fx.other, "Two");
    fx.note(&budget, &fx.basic, "Three");

    let response = fx
        .send(as_user(
            Request::new(Action::List, "notes").with_parent(census.id.to_string()),
            &fx.basic,
        ))
        .await;

    assert_eq!(response.status, 200);
    let members = body(&response);
    let members = members.as_array().unwrap();
    assert_eq!(members.len(), 2);
    // Only the caller's own note shows owner-only fields.
    let with_updated_at = members
        .iter()
        .filter(|note| note.get("updated_at").is_some())
        .count();
    assert_eq!(with_updated_at, 1);
}

#[tokio::test]
async fn test_source_with_notes_cannot_be_deleted() {
    let fx = Fixture::new();
    let source = fx.source("Census");
    let note = fx.note(&source, &fx.basic, "Keep me");

    let delete_source = Request::new(Action::Delete, "sources").with_id(source.id.to_string());
    let response = fx.send(as_user(delete_source.clone(), &fx.admin)).await;
    assert_eq!(response.status, 409);
    assert!(body(&response)["errors"][0]
        .as_str()
        .unwrap()
        .contains("still has 1 notes"));

    let response = fx
        .send(as_user(
            Request::new(Action::Read, "sources").with_id(source.id.to_string()),
            &fx.basic,
        ))
        .await;
    assert_eq!(body(&response)["note_count"], 1);

    let response = fx
        .send(as_user(
            Request::new(Action::Delete, "notes")
                .with_parent(source.id.to_string())
                .with_id(note.id.to_string()),
            &fx.basic,
        ))
        .await;
    assert_eq!(response.status, 204);

    let response = fx.send(as_user(delete_source, &fx.admin)).await;
    assert_eq!(response.status, 204);
}

#[tokio::test]
async fn test_nested_request_without_parent() {
    let fx = Fixture::new();
    let response = fx
        .send(as_user(Request::new(Action::List, "notes"), &fx.basic))
        .await;

    assert_eq!(response.status, 500);
    assert_eq!(body(&response), json!({"errors": "internal_server_error"}));
}

#[tokio::test]
async fn test_unknown_resource() {
    let fx = Fixture::new();
    let result = fx
        .catalog
        .handle(as_user(Request::new(Action::List, "categories"), &fx.basic))
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.error_code(), "UNKNOWN_RESOURCE");
}
