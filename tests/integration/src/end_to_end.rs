//! End-to-end tests: real git repositories against a wiremock GitLab API
//!
//! Exercises both workflows through `GitLabClient` and `Git2Gateway`, including
//! a push followed by a pull of the same content.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use squeeze_core::{Error, SqueezeRequest, Squeezer, WorkflowKind};
use squeeze_git::Git2Gateway;
use squeeze_gitlab::GitLabClient;
use squeeze_test_utils::archive::ZipBuilder;
use squeeze_test_utils::git::{
    branch_exists, commit_all, head_branch, init_repo_at, tree_paths,
};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BINARY: &[u8] = &[0x00, 0x9f, 0x92, 0x96, 0xff, 0x0a];

/// A committed repository at `<tmp>/demo` with text, nested, binary and vendored files.
fn demo_repo() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let repo = temp.path().join("demo");
    init_repo_at(
        &repo,
        &[
            ("a.txt", "alpha\n"),
            ("b/c.txt", "charlie\n"),
            ("vendor/dep.rs", "pub fn dep() {}\n"),
        ],
    );
    fs::write(repo.join("logo.bin"), BINARY).unwrap();
    commit_all(&repo, "Add logo");
    (temp, repo)
}

fn squeezer(server: &MockServer) -> Squeezer {
    Squeezer::new(
        Box::new(Git2Gateway::new()),
        Box::new(GitLabClient::with_base_url("e2e-token", server.uri())),
    )
}

async fn mount_search(server: &MockServer, projects: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(query_param("search", "demo"))
        .and(header("PRIVATE-TOKEN", "e2e-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects))
        .mount(server)
        .await;
}

async fn mount_create(server: &MockServer, id: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v4/projects"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": id, "name": "demo"})))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_commit(server: &MockServer, id: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/api/v4/projects/{id}/repository/commits")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "abc123"})))
        .expect(1)
        .mount(server)
        .await;
}

/// Body of the single commit request the server received.
async fn pushed_commit(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    let commits: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path().ends_with("/repository/commits"))
        .collect();
    assert_eq!(commits.len(), 1);
    commits[0].body_json().unwrap()
}

/// `(file_path, decoded content)` for every action of a commit body.
fn decoded_actions(commit: &Value) -> Vec<(String, Vec<u8>)> {
    commit["actions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|action| {
            assert_eq!(action["action"], "create");
            assert_eq!(action["encoding"], "base64");
            let content = STANDARD
                .decode(action["content"].as_str().unwrap())
                .unwrap();
            (action["file_path"].as_str().unwrap().to_string(), content)
        })
        .collect()
}

fn read(repo: &Path, file: &str) -> Vec<u8> {
    fs::read(repo.join(file)).unwrap()
}

#[tokio::test]
async fn test_local_to_remote_creates_project_and_pushes_snapshot() {
    let (_temp, repo) = demo_repo();
    let server = MockServer::start().await;
    mount_search(&server, json!([])).await;
    mount_create(&server, 42).await;
    mount_commit(&server, 42).await;

    let report = squeezer(&server)
        .run(WorkflowKind::LocalToRemote, &SqueezeRequest::new(&repo, "squeeze"))
        .await
        .unwrap();

    assert_eq!(report.files, 3);
    let commit = pushed_commit(&server).await;
    assert_eq!(commit["branch"], "squeeze");
    assert_eq!(
        commit["commit_message"],
        "Add project files to orphan branch squeeze"
    );
    let actions = decoded_actions(&commit);
    let paths: Vec<&str> = actions.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(paths, vec!["a.txt", "b/c.txt", "logo.bin"]);
    assert_eq!(actions[2].1, BINARY);

    // Local repository is back where it started
    assert_eq!(head_branch(&repo), "main");
    assert!(!branch_exists(&repo, "squeeze"));
    assert_eq!(read(&repo, "vendor/dep.rs"), b"pub fn dep() {}\n");
}

#[tokio::test]
async fn test_second_run_replaces_previous_project() {
    let (_temp, repo) = demo_repo();
    let server = MockServer::start().await;
    mount_search(&server, json!([{"id": 42, "name": "demo"}])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v4/projects/42"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    mount_create(&server, 43).await;
    mount_commit(&server, 43).await;

    let report = squeezer(&server)
        .local_to_remote(&SqueezeRequest::new(&repo, "squeeze"))
        .await
        .unwrap();

    assert_eq!(report.files, 3);
    assert_eq!(head_branch(&repo), "main");
}

#[tokio::test]
async fn test_ambiguous_project_aborts_before_any_mutation() {
    let (_temp, repo) = demo_repo();
    let server = MockServer::start().await;
    mount_search(
        &server,
        json!([{"id": 1, "name": "demo"}, {"id": 2, "name": "demo"}]),
    )
    .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = squeezer(&server)
        .local_to_remote(&SqueezeRequest::new(&repo, "squeeze"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AmbiguousProject { count: 2, .. }));
    assert_eq!(head_branch(&repo), "main");
    assert!(!branch_exists(&repo, "squeeze"));
}

#[tokio::test]
async fn test_rejected_commit_restores_local_branch() {
    let (_temp, repo) = demo_repo();
    let server = MockServer::start().await;
    mount_search(&server, json!([])).await;
    mount_create(&server, 42).await;
    Mock::given(method("POST"))
        .and(path("/api/v4/projects/42/repository/commits"))
        .respond_with(ResponseTemplate::new(400).set_body_string("{\"message\":\"bad branch\"}"))
        .mount(&server)
        .await;

    let err = squeezer(&server)
        .local_to_remote(&SqueezeRequest::new(&repo, "squeeze"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("400"));
    assert!(err.to_string().contains("bad branch"));
    assert_eq!(head_branch(&repo), "main");
    assert!(!branch_exists(&repo, "squeeze"));
    assert_eq!(read(&repo, "a.txt"), b"alpha\n");
}

#[tokio::test]
async fn test_pushed_content_round_trips_through_archive() {
    let (_source_temp, source) = demo_repo();
    let server = MockServer::start().await;
    mount_search(&server, json!([])).await;
    mount_create(&server, 42).await;
    mount_commit(&server, 42).await;

    squeezer(&server)
        .local_to_remote(&SqueezeRequest::new(&source, "squeeze"))
        .await
        .unwrap();
    let pushed = decoded_actions(&pushed_commit(&server).await);

    // Serve what was pushed back as the project's archive
    let archive = pushed
        .iter()
        .fold(ZipBuilder::new("demo-squeeze-1a2b3c"), |zip, (file, content)| {
            zip.file(file, content)
        })
        .build();
    let hosted = MockServer::start().await;
    mount_search(&hosted, json!([{"id": 42, "name": "demo"}])).await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/42/repository/archive.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive))
        .expect(1)
        .mount(&hosted)
        .await;

    let target_temp = TempDir::new().unwrap();
    let target = target_temp.path().join("demo");
    init_repo_at(&target, &[("stale.txt", "old history")]);

    let report = squeezer(&hosted)
        .run(WorkflowKind::RemoteToLocal, &SqueezeRequest::new(&target, "squeeze"))
        .await
        .unwrap();

    assert_eq!(report.files, 3);
    assert_eq!(head_branch(&target), "squeeze");
    assert_eq!(
        tree_paths(&target, "squeeze"),
        vec!["a.txt", "b/c.txt", "logo.bin"]
    );
    for file in ["a.txt", "b/c.txt", "logo.bin"] {
        assert_eq!(read(&target, file), read(&source, file), "{file}");
    }
    assert!(!target.join("stale.txt").exists());
}

#[tokio::test]
async fn test_remote_to_local_without_project_is_a_no_op() {
    let temp = TempDir::new().unwrap();
    let repo = temp.path().join("demo");
    init_repo_at(&repo, &[("a.txt", "alpha")]);
    let server = MockServer::start().await;
    mount_search(&server, json!([{"id": 9, "name": "demo-fork"}])).await;

    let report = squeezer(&server)
        .remote_to_local(&SqueezeRequest::new(&repo, "squeeze"))
        .await
        .unwrap();

    assert_eq!(report.files, 0);
    assert_eq!(head_branch(&repo), "main");
    assert!(!branch_exists(&repo, "squeeze"));
}

#[tokio::test]
async fn test_failed_download_restores_local_branch() {
    let temp = TempDir::new().unwrap();
    let repo = temp.path().join("demo");
    init_repo_at(&repo, &[("a.txt", "alpha")]);
    let server = MockServer::start().await;
    mount_search(&server, json!([{"id": 5, "name": "demo"}])).await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/5/repository/archive.zip"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 Not Found"))
        .mount(&server)
        .await;

    let err = squeezer(&server)
        .remote_to_local(&SqueezeRequest::new(&repo, "squeeze"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Hosting(_)));
    assert_eq!(head_branch(&repo), "main");
    assert!(!branch_exists(&repo, "squeeze"));
    assert_eq!(read(&repo, "a.txt"), b"alpha");
}
