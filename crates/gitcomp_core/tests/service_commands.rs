use gitcomp_core::{
    read_config, CompService, ConfigKey, DuplicateField, RenderContext, RenderRequest,
    ServiceError, StaticIdentityProvider, Strictness, TemplateError,
};
use tempfile::TempDir;

fn service_in(dir: &TempDir) -> CompService<StaticIdentityProvider> {
    CompService::new(
        dir.path().join(".git-comp.yaml"),
        StaticIdentityProvider::new("Ada Lovelace", "ada@example.com"),
    )
}

#[test]
fn first_command_creates_config_and_second_load_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);

    let first = service.display_config().unwrap();
    let second = service.display_config().unwrap();

    assert_eq!(first, second);
    assert!(service.config_path().exists());
}

#[test]
fn add_author_persists_in_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);

    service.add_author("bob", "Bob", "bob@x.com").unwrap();
    service.add_author("carol", "Carol", "carol@x.com").unwrap();

    let rendered: Vec<String> = service
        .list_authors()
        .unwrap()
        .iter()
        .map(|author| author.render())
        .collect();
    assert_eq!(
        rendered,
        vec![
            "Ada Lovelace <ada@example.com>",
            "Bob <bob@x.com>",
            "Carol <carol@x.com>",
        ]
    );
}

#[test]
fn duplicate_author_is_rejected_and_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);
    service.add_author("bob", "Bob", "bob@x.com").unwrap();

    let err = service
        .add_author("carol", "Bob", "carol@x.com")
        .unwrap_err();

    match err {
        ServiceError::Duplicate(duplicate) => {
            assert_eq!(duplicate.field, DuplicateField::Name);
            assert_eq!(duplicate.value, "Bob");
        }
        other => panic!("unexpected error: {other}"),
    }
    let config = read_config(service.config_path()).unwrap();
    assert_eq!(config.authors.len(), 2);
}

#[test]
fn set_config_updates_only_known_keys() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);

    let key = service.set_config("issue_tracker", "Jira").unwrap();
    assert_eq!(key, ConfigKey::IssueTracker);

    let before = read_config(service.config_path()).unwrap();
    let err = service.set_config("bogus", "x").unwrap_err();
    assert!(matches!(err, ServiceError::UnknownKey(ref e) if e.key == "bogus"));

    let after = read_config(service.config_path()).unwrap();
    assert_eq!(after, before);
    assert_eq!(after.issue_tracker, "Jira");
}

#[test]
fn render_binds_fields_and_resolved_co_authors() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);
    service.add_author("bob", "Bob", "bob@x.com").unwrap();
    service.set_config("issue_tracker", "Jira").unwrap();
    service
        .set_config(
            "template",
            "{{Type}}: {{Subject}}\n\n{{IssueTracker}}: {{Issue}}\n{{CoAuthors}}",
        )
        .unwrap();

    let request = RenderRequest {
        context: RenderContext {
            kind: Some("fix".to_string()),
            subject: Some("handle empty registry".to_string()),
            issue: Some("PROJ-7".to_string()),
            ..RenderContext::default()
        },
        co_authors: vec!["bob".to_string()],
        strictness: Strictness::Strict,
    };
    let text = service.render(&request).unwrap();

    assert_eq!(
        text,
        "fix: handle empty registry\n\nJira: PROJ-7\nCo-authored-by: Bob <bob@x.com>"
    );
}

#[test]
fn render_strict_fails_on_unbound_fields() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);
    service
        .set_config("template", "{{Type}}: {{Subject}}")
        .unwrap();

    let err = service.render(&RenderRequest::default()).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Template(TemplateError::Unresolved { .. })
    ));
}

#[test]
fn render_rejects_unknown_co_author() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);

    let request = RenderRequest {
        co_authors: vec!["nobody".to_string()],
        strictness: Strictness::Lenient,
        ..RenderRequest::default()
    };
    let err = service.render(&request).unwrap_err();

    assert!(matches!(err, ServiceError::UnknownAuthor(ref id) if id == "nobody"));
}
