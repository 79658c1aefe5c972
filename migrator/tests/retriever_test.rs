use migrator::cloudcontroller::routes;
use migrator::{MigrationError, Organization, RoleAssignment, Retriever, Space};
use std::sync::Arc;
use testing::{InMemorySource, assignment};
use tokio::sync::mpsc;

struct Collected {
    orgs: Vec<Organization>,
    spaces: Vec<Space>,
    errors: Vec<MigrationError>
}

async fn collect(source: InMemorySource) -> Collected {
    let retriever = Arc::new(Retriever::new(Arc::new(source)));
    let (org_tx, mut org_rx) = mpsc::channel(1);
    let (space_tx, mut space_rx) = mpsc::channel(1);
    let (error_tx, mut error_rx) = mpsc::channel(1);

    let producer = tokio::spawn(async move {
        retriever.fetch_resources(org_tx, space_tx, error_tx).await;
    });

    let orgs = tokio::spawn(async move {
        let mut orgs = Vec::new();
        while let Some(org) = org_rx.recv().await {
            orgs.push(org);
        }
        orgs
    });
    let spaces = tokio::spawn(async move {
        let mut spaces = Vec::new();
        while let Some(space) = space_rx.recv().await {
            spaces.push(space);
        }
        spaces
    });
    let errors = tokio::spawn(async move {
        let mut errors = Vec::new();
        while let Some(error) = error_rx.recv().await {
            errors.push(error);
        }
        errors
    });

    producer.await.unwrap();
    Collected {
        orgs: orgs.await.unwrap(),
        spaces: spaces.await.unwrap(),
        errors: errors.await.unwrap()
    }
}

fn two_orgs() -> InMemorySource {
    InMemorySource::new()
        .with_org("org-1", vec![assignment("org-1", "user-a", &["org_manager"])])
        .with_space(
            "org-1",
            "space-1",
            vec![assignment("space-1", "user-a", &["space_developer"])]
        )
        .with_org("org-2", vec![assignment("org-2", "user-b", &["org_user"])])
        .with_space(
            "org-2",
            "space-2",
            vec![assignment("space-2", "user-b", &["space_auditor"])]
        )
}

#[tokio::test]
async fn test_streams_orgs_and_spaces_with_linkage() {
    let collected = collect(two_orgs()).await;

    assert!(collected.errors.is_empty());
    let org_guids: Vec<&str> = collected.orgs.iter().map(|o| o.guid.as_str()).collect();
    assert_eq!(org_guids, vec!["org-1", "org-2"]);

    assert_eq!(collected.spaces.len(), 2);
    assert_eq!(collected.spaces[0].guid, "space-1");
    assert_eq!(collected.spaces[0].org_guid, "org-1");
    assert_eq!(collected.spaces[1].guid, "space-2");
    assert_eq!(collected.spaces[1].org_guid, "org-2");
    assert_eq!(collected.spaces[1].assignments[0].user_guid, "user-b");
}

#[tokio::test]
async fn test_failed_org_listing_ends_the_walk() {
    let collected = collect(two_orgs().fail_route(routes::ORGANIZATIONS, 500)).await;

    assert!(collected.orgs.is_empty());
    assert!(collected.spaces.is_empty());
    assert_eq!(collected.errors.len(), 1);
    assert_eq!(collected.errors[0].entity_type(), Some("/v2/organizations"));
    assert_eq!(collected.errors[0].to_string(), "HTTP bad response: 500");
}

#[tokio::test]
async fn test_failed_space_roles_keep_the_org_assignment() {
    let source = two_orgs().fail_route(&routes::space_user_roles("space-1"), 502);
    let collected = collect(source).await;

    assert_eq!(collected.orgs.len(), 2);
    assert_eq!(collected.orgs[0].assignments.len(), 1);
    assert_eq!(collected.orgs[0].assignments[0].roles, vec!["org_manager"]);

    assert_eq!(collected.spaces.len(), 2);
    assert!(collected.spaces[0].assignments.is_empty());
    assert_eq!(collected.spaces[1].assignments.len(), 1);

    assert_eq!(collected.errors.len(), 1);
    assert_eq!(
        collected.errors[0].entity_type(),
        Some("/v2/spaces/space-1/user_roles")
    );
    assert_eq!(collected.errors[0].guid(), Some("space-1"));
}

#[tokio::test]
async fn test_failed_space_listing_skips_only_that_org() {
    let source = two_orgs().fail_route(&routes::organization_spaces("org-1"), 404);
    let collected = collect(source).await;

    assert_eq!(collected.orgs.len(), 2);
    assert_eq!(collected.spaces.len(), 1);
    assert_eq!(collected.spaces[0].org_guid, "org-2");
    assert_eq!(
        collected.errors[0].entity_type(),
        Some("/v2/organizations/org-1/spaces")
    );
}

#[tokio::test]
async fn test_failed_org_roles_still_emit_the_org() {
    let source = two_orgs().fail_route(&routes::organization_user_roles("org-2"), 500);
    let collected = collect(source).await;

    assert_eq!(collected.orgs.len(), 2);
    assert!(collected.orgs[1].assignments.is_empty());
    assert_eq!(collected.spaces.len(), 2);
    assert_eq!(collected.errors.len(), 1);
}

#[tokio::test]
async fn test_fetch_assignments_flattens_orgs_and_spaces() {
    let retriever = Retriever::new(Arc::new(
        two_orgs().fail_route(&routes::space_user_roles("space-2"), 500)
    ));
    let (assignment_tx, mut assignment_rx) = mpsc::channel::<RoleAssignment>(16);
    let (error_tx, mut error_rx) = mpsc::channel(16);

    retriever.fetch_assignments(assignment_tx, error_tx).await;

    let mut resources = Vec::new();
    while let Some(assignment) = assignment_rx.recv().await {
        resources.push(assignment.resource_guid);
    }
    assert_eq!(resources, vec!["org-1", "space-1", "org-2"]);

    let error = error_rx.recv().await.unwrap();
    assert_eq!(error.entity_type(), Some("/v2/spaces/space-2/user_roles"));
    assert!(error_rx.recv().await.is_none());
}
