//! Integration tests for team and CRM collections.

use kloudless::rest::{ResourceError, ResourceKind};
use kloudless::{Account, AccountId, ApiKey, BaseUrl, CrmObject, Kloudless, KloudlessConfig, ListParams};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn account(server: &MockServer) -> Account {
    let config = KloudlessConfig::builder()
        .api_key(ApiKey::new("test-key").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .account_id(AccountId::new("42").unwrap())
        .build()
        .unwrap();
    Kloudless::new(&config).unwrap().default_account().unwrap()
}

// ============================================================================
// Team
// ============================================================================

#[tokio::test]
async fn test_user_groups_and_group_members() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts/42/team/users/U1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "U1", "name": "Alice", "email": "alice@example.com"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts/42/team/users/U1/memberships"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [{"id": "G1", "name": "Engineering"}],
            "count": 1,
            "page": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts/42/team/groups/G1/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [
                {"id": "U1", "name": "Alice"},
                {"id": "U2", "name": "Bob"}
            ],
            "count": 2,
            "page": 1
        })))
        .mount(&server)
        .await;

    let user = account(&server).users().retrieve("U1").await.unwrap();
    assert_eq!(user.get_str("email"), Some("alice@example.com"));

    let groups = user
        .groups(ListParams::new())
        .await
        .unwrap()
        .collect_all()
        .await
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].kind(), ResourceKind::Group);

    let members = groups[0]
        .members(ListParams::new())
        .await
        .unwrap()
        .collect_all()
        .await
        .unwrap();
    let names: Vec<_> = members.iter().filter_map(|u| u.get_str("name")).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
    assert!(members.iter().all(|u| u.kind() == ResourceKind::User));
}

#[tokio::test]
async fn test_team_entities_are_read_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts/42/team/groups/G1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "G1", "name": "Eng"})))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut group = account(&server).groups().retrieve("G1").await.unwrap();
    group.set("name", "Engineering");

    assert!(matches!(
        group.save().await,
        Err(ResourceError::PathResolutionFailed {
            resource: "Group",
            operation: "update"
        })
    ));
}

// ============================================================================
// CRM
// ============================================================================

#[tokio::test]
async fn test_crm_campaigns_with_raw() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts/42/crm/campaigns"))
        .and(query_param("page_size", "1"))
        .and(query_param("raw", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [{
                "id": "C1",
                "name": "Spring launch",
                "type": "campaign",
                "raw": {"Id": "701000000000001", "IsActive": true}
            }],
            "count": 1,
            "page": 1,
            "next_page": 2
        })))
        .mount(&server)
        .await;

    let campaigns = account(&server)
        .crm_campaigns()
        .all(ListParams::new().page_size(1).param("raw", "true"))
        .await
        .unwrap();

    let first = &campaigns.page()[0];
    assert!(first.has_field("raw"));
    assert_eq!(first.kind(), ResourceKind::Crm(CrmObject::Campaign));
    assert_eq!(first.get("raw").unwrap()["IsActive"], true);
    assert!(campaigns.has_more());
}

#[tokio::test]
async fn test_crm_contact_crud() {
    let server = MockServer::start().await;
    let contact = json!({"id": "K1", "first_name": "Ada", "last_name": "Lovelace", "type": "contact"});
    Mock::given(method("POST"))
        .and(path("/v1/accounts/42/crm/contacts"))
        .and(body_json(json!({"first_name": "Ada", "last_name": "Lovelace"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(contact))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/v1/accounts/42/crm/contacts/K1"))
        .and(body_json(json!({"title": "Countess"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "K1", "first_name": "Ada", "last_name": "Lovelace", "title": "Countess"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/accounts/42/crm/contacts/K1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let contacts = account(&server).crm(CrmObject::Contact);
    let mut contact = contacts
        .create(&json!({"first_name": "Ada", "last_name": "Lovelace"}))
        .await
        .unwrap();
    assert_eq!(contact.id().as_deref(), Some("K1"));

    contact.set("title", "Countess");
    contact.save().await.unwrap();
    assert_eq!(contact.get_str("title"), Some("Countess"));

    contact.delete(false).await.unwrap();
    assert!(contact.is_stale());
}

#[tokio::test]
async fn test_every_crm_family_has_a_listing() {
    let server = MockServer::start().await;
    for object in CrmObject::ALL {
        Mock::given(method("GET"))
            .and(path(format!("/v1/accounts/42/crm/{}", object.path_segment())))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "objects": [{"id": format!("{}-1", object.type_name())}],
                "count": 1,
                "page": 1
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let account = account(&server);
    let collections = [
        account.crm_accounts(),
        account.crm_contacts(),
        account.crm_leads(),
        account.crm_opportunities(),
        account.crm_campaigns(),
        account.crm_tasks(),
        account.crm_events(),
    ];
    assert_eq!(collections.len(), CrmObject::ALL.len());

    for collection in collections {
        let items = collection
            .all(ListParams::new())
            .await
            .unwrap()
            .collect_all()
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind(), collection.kind());
    }
}
