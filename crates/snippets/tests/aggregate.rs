use chunkflow_protocol::RequiredImport;
use chunkflow_snippets::{filter_by_scope, SessionConfig, WorkspaceSession};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    std::fs::write(path, content).expect("write file");
}

fn labels(found: &Option<chunkflow_protocol::SnippetCollection>) -> Vec<&str> {
    found
        .as_ref()
        .map(|c| c.snippets.iter().map(|s| s.label.as_str()).collect())
        .unwrap_or_default()
}

const UI_PACKAGE: &str = r#"{
  "name": "ui",
  "snippets": [{
    "label": "Btn",
    "description": "Primary button",
    "scope": "typescript",
    "body": "<Btn/>",
    "package": "ui",
    "requiredImports": [{ "packageName": "ui", "namedExports": ["Button"] }]
  }]
}"#;

#[tokio::test]
async fn workspace_member_snippets_are_found() {
    let temp = TempDir::new().expect("tempdir");
    write(temp.path(), "package.json", r#"{"name":"app","workspaces":["packages/*"]}"#);
    write(temp.path(), "packages/ui/package.json", UI_PACKAGE);

    let session = WorkspaceSession::open(temp.path(), SessionConfig::default()).await;
    let found = session.find_for_package(None).await;

    assert_eq!(labels(&found), vec!["Btn"]);
    let snippet = &found.expect("snippets").snippets[0];
    assert_eq!(snippet.package, "ui");
    assert_eq!(
        snippet.required_imports,
        vec![RequiredImport::named("ui", ["Button"])]
    );
}

#[tokio::test]
async fn no_snippets_anywhere_is_none() {
    let temp = TempDir::new().expect("tempdir");
    write(temp.path(), "package.json", r#"{"name":"app","workspaces":["packages/*"]}"#);
    write(temp.path(), "packages/ui/package.json", r#"{"name":"ui"}"#);

    let session = WorkspaceSession::open(temp.path(), SessionConfig::default()).await;
    assert!(session.find_for_package(None).await.is_none());
}

#[tokio::test]
async fn empty_lists_everywhere_is_none() {
    let temp = TempDir::new().expect("tempdir");
    write(temp.path(), "package.json", r#"{"name":"app","snippets":[]}"#);

    let session = WorkspaceSession::open(temp.path(), SessionConfig::default()).await;
    assert!(session.find_for_package(None).await.is_none());
}

#[tokio::test]
async fn missing_workspace_is_none() {
    let temp = TempDir::new().expect("tempdir");
    let session = WorkspaceSession::open(temp.path().join("nowhere"), SessionConfig::default()).await;
    assert!(session.store().is_empty());
    assert!(session.find_for_package(None).await.is_none());
    assert!(session.find_for_package(Some("ui")).await.is_none());
}

#[tokio::test]
async fn root_snippets_come_before_members() {
    let temp = TempDir::new().expect("tempdir");
    write(
        temp.path(),
        "package.json",
        r#"{"name":"app","workspaces":["packages/*"],"snippets":[{"label":"Root","body":"r"}]}"#,
    );
    write(temp.path(), "packages/a/package.json", r#"{"name":"a"}"#);
    write(
        temp.path(),
        "packages/a/.chunkflow.config.json",
        r#"{"snippets":[{"label":"A1","body":"1"},{"label":"A2","body":"2"}]}"#,
    );
    write(temp.path(), "packages/b/package.json", r#"{"name":"b"}"#);
    write(
        temp.path(),
        "packages/b/.chunkflow.config.js",
        "export default { snippets: [{ label: 'B', body: `b` }] };",
    );

    let session = WorkspaceSession::open(temp.path(), SessionConfig::default()).await;
    assert_eq!(
        labels(&session.find_for_package(None).await),
        vec!["Root", "A1", "A2", "B"]
    );
}

#[tokio::test]
async fn single_package_root_is_not_counted_twice() {
    let temp = TempDir::new().expect("tempdir");
    write(
        temp.path(),
        "package.json",
        r#"{"name":"solo","snippets":[{"label":"Only","body":"x"}]}"#,
    );

    let session = WorkspaceSession::open(temp.path(), SessionConfig::default()).await;
    assert_eq!(labels(&session.find_for_package(None).await), vec!["Only"]);
    assert_eq!(labels(&session.find_for_package(Some("solo")).await), vec!["Only"]);
}

#[tokio::test]
async fn named_member_and_external_package() {
    let temp = TempDir::new().expect("tempdir");
    write(temp.path(), "package.json", r#"{"name":"app","workspaces":["packages/*"]}"#);
    write(temp.path(), "packages/ui/package.json", UI_PACKAGE);
    write(
        temp.path(),
        "node_modules/@acme/forms/package.json",
        r#"{"name":"@acme/forms","snippets":[{"label":"Form","body":"<Form/>","scope":"javascriptreact"}]}"#,
    );

    let session = WorkspaceSession::open(temp.path(), SessionConfig::default()).await;
    assert_eq!(labels(&session.find_for_package(Some("ui")).await), vec!["Btn"]);
    assert_eq!(
        labels(&session.find_for_package(Some("@acme/forms")).await),
        vec!["Form"]
    );
    assert!(session.find_for_package(Some("left-pad")).await.is_none());
}

#[tokio::test]
async fn aggregator_does_not_filter_by_scope() {
    let temp = TempDir::new().expect("tempdir");
    write(
        temp.path(),
        "package.json",
        r#"{"name":"app","snippets":[
            {"label":"Ts","body":"","scope":"typescript"},
            {"label":"Py","body":"","scope":"python"}
        ]}"#,
    );

    let session = WorkspaceSession::open(temp.path(), SessionConfig::default()).await;
    let found = session.find_for_package(None).await.expect("snippets");
    assert_eq!(found.len(), 2);

    let visible = filter_by_scope(found.snippets, "typescriptreact");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].label, "Ts");
}

#[tokio::test]
async fn cache_holds_until_refresh() {
    let temp = TempDir::new().expect("tempdir");
    write(temp.path(), "package.json", r#"{"name":"app","workspaces":["packages/*"]}"#);
    write(temp.path(), "packages/ui/package.json", UI_PACKAGE);

    let mut session = WorkspaceSession::open(temp.path(), SessionConfig::cached()).await;
    assert_eq!(labels(&session.find_for_package(None).await), vec!["Btn"]);

    write(temp.path(), "packages/forms/package.json", r#"{"name":"forms","snippets":[{"label":"Form","body":""}]}"#);
    write(
        temp.path(),
        "packages/ui/.chunkflow.config.json",
        r#"{"snippets":[{"label":"Btn2","body":""}]}"#,
    );

    // Neither the new member nor the new config is visible yet.
    assert_eq!(labels(&session.find_for_package(None).await), vec!["Btn"]);
    assert!(!session.store().contains("forms"));

    session.refresh().await;
    assert!(session.store().contains("forms"));
    assert_eq!(
        labels(&session.find_for_package(None).await),
        vec!["Form", "Btn2"]
    );
}

#[tokio::test]
async fn uncached_session_rereads_sources_but_not_members() {
    let temp = TempDir::new().expect("tempdir");
    write(temp.path(), "package.json", r#"{"name":"app","workspaces":["packages/*"]}"#);
    write(temp.path(), "packages/ui/package.json", UI_PACKAGE);

    let session = WorkspaceSession::open(temp.path(), SessionConfig::default()).await;
    write(
        temp.path(),
        "packages/ui/.chunkflow.config.json",
        r#"{"snippets":[{"label":"Fresh","body":""}]}"#,
    );
    write(temp.path(), "packages/late/package.json", r#"{"name":"late","snippets":[{"label":"Late","body":""}]}"#);

    assert_eq!(labels(&session.find_for_package(None).await), vec!["Fresh"]);
}
