use super::{registry, zlib_registry};
use conan_sync::core::SyncError;
use conan_sync::reconciler::{ReconcileOptions, ReconcileOutcome, Reconciler};
use conan_sync::registry::RegistryClient;
use conan_sync::test_utils::{MockRegistry, ProjectFixture, init_test_logging};
use serde_json::json;

const LATEST_ENTRY: &str = "zlib/1.3.1#rev131%1757090078.826";

fn stale_project() -> ProjectFixture {
    ProjectFixture::new(
        &["zlib/1.2.13", "zlibng/2.0.0", "fmt/10.2.1"],
        &["zlib/1.2.13#rev1213%1696161600.000", "zlibng/2.0.0#ng%1.000", "fmt/10.2.1#fmt%2.000"],
    )
    .unwrap()
}

#[tokio::test]
async fn test_reconcile_updates_both_files() {
    init_test_logging(None);
    let project = stale_project();
    let client = RegistryClient::with_transport(zlib_registry());

    let info = Reconciler::new(&client, project.files())
        .reconcile(&registry(), "zlib")
        .await
        .unwrap()
        .expect("files should be rewritten");

    assert_eq!(info.version, "1.3.1");
    assert_eq!(info.revision_hash, "rev131");
    assert_eq!(info.lock_entry, LATEST_ENTRY);

    let manifest = project.manifest().unwrap();
    assert!(manifest.contains("  - zlib/1.3.1\n"));
    assert!(manifest.contains("  - zlibng/2.0.0\n"), "similar names untouched");
    assert!(manifest.starts_with("# conan-sync test project\n"));

    let lock = project.lock().unwrap();
    assert!(lock.contains(&format!("\"{LATEST_ENTRY}\"")));
    assert!(lock.contains("\"zlibng/2.0.0#ng%1.000\""));
    assert!(lock.contains("\"fmt/10.2.1#fmt%2.000\""));
    let parsed: serde_json::Value = serde_json::from_str(&lock).unwrap();
    assert_eq!(parsed["requires"][0], LATEST_ENTRY);
}

#[tokio::test]
async fn test_second_reconcile_is_a_no_op() {
    let project = stale_project();
    let client = RegistryClient::with_transport(zlib_registry());
    let reconciler = Reconciler::new(&client, project.files());

    assert!(reconciler.reconcile(&registry(), "zlib").await.unwrap().is_some());
    let manifest = project.manifest().unwrap();
    let lock = project.lock().unwrap();

    assert!(reconciler.reconcile(&registry(), "zlib").await.unwrap().is_none());
    assert_eq!(project.manifest().unwrap(), manifest);
    assert_eq!(project.lock().unwrap(), lock);
}

#[tokio::test]
async fn test_missing_lock_file_fails_before_any_request() {
    let project = ProjectFixture::empty().unwrap();
    project.write("conanfile.yml", "requirements:\n  - zlib/1.2.13\n").unwrap();
    let client = RegistryClient::with_transport(zlib_registry());

    let err = Reconciler::new(&client, project.files()).reconcile(&registry(), "zlib").await.unwrap_err();

    match err.downcast_ref::<SyncError>() {
        Some(SyncError::FileNotFound {
            files,
        }) => {
            assert_eq!(files.len(), 1);
            assert!(files[0].ends_with("conan.lock"));
        }
        other => panic!("expected FileNotFound, got {other:?}"),
    }
    assert_eq!(client.transport().request_count(), 0);
    assert_eq!(project.manifest().unwrap(), "requirements:\n  - zlib/1.2.13\n");
}

#[tokio::test]
async fn test_untracked_package_is_left_alone() {
    let project = ProjectFixture::new(&["fmt/10.2.1"], &["fmt/10.2.1#fmt%2.000"]).unwrap();
    let client = RegistryClient::with_transport(zlib_registry());

    let outcome = Reconciler::new(&client, project.files())
        .run(&registry(), "zlib", ReconcileOptions::default())
        .await
        .unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Untracked(_)));
    assert!(!project.manifest().unwrap().contains("zlib"));
}

#[tokio::test]
async fn test_unpublished_package_writes_nothing() {
    let project = stale_project();
    let mock = MockRegistry::new().with_search(&registry(), "zlib", json!({ "results": [] }));
    let client = RegistryClient::with_transport(mock);
    let before = project.lock().unwrap();

    let written = Reconciler::new(&client, project.files()).reconcile(&registry(), "zlib").await.unwrap();

    assert!(written.is_none());
    assert_eq!(project.lock().unwrap(), before);
}

#[tokio::test]
async fn test_dry_run_reports_without_writing() {
    let project = stale_project();
    let client = RegistryClient::with_transport(zlib_registry());
    let before = (project.manifest().unwrap(), project.lock().unwrap());

    let outcome = Reconciler::new(&client, project.files())
        .run(
            &registry(),
            "zlib",
            ReconcileOptions {
                version: None,
                dry_run: true,
            },
        )
        .await
        .unwrap();

    match outcome {
        ReconcileOutcome::WouldUpdate {
            info,
            divergence,
        } => {
            assert_eq!(info.version, "1.3.1");
            assert!(divergence.manifest_version && divergence.revision && divergence.package_ref);
        }
        other => panic!("expected WouldUpdate, got {other:?}"),
    }
    assert_eq!((project.manifest().unwrap(), project.lock().unwrap()), before);
}

#[tokio::test]
async fn test_pinned_version() {
    let project = ProjectFixture::new(&["zlib/1.3.1"], &["zlib/1.3.1#rev131%1757090078.826"]).unwrap();
    let client = RegistryClient::with_transport(zlib_registry());
    let reconciler = Reconciler::new(&client, project.files());

    let outcome = reconciler
        .run(
            &registry(),
            "zlib",
            ReconcileOptions {
                version: Some("1.2.13"),
                dry_run: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.into_written().unwrap().lock_entry, "zlib/1.2.13#rev1213%1696161600.000");
    assert!(project.manifest().unwrap().contains("  - zlib/1.2.13\n"));

    let err = reconciler
        .run(
            &registry(),
            "zlib",
            ReconcileOptions {
                version: Some("9.9.9"),
                dry_run: false,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<SyncError>(), Some(SyncError::VersionNotFound { .. })));
}

#[tokio::test]
async fn test_revision_only_change_rewrites_lock() {
    let project =
        ProjectFixture::new(&["zlib/1.3.1"], &["zlib/1.3.1#rev131-old%1704067200.000"]).unwrap();
    let client = RegistryClient::with_transport(zlib_registry());

    let info = Reconciler::new(&client, project.files())
        .reconcile(&registry(), "zlib")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(info.revision_hash, "rev131");
    assert!(project.lock().unwrap().contains(LATEST_ENTRY));
    assert!(project.manifest().unwrap().contains("  - zlib/1.3.1\n"));
}

#[tokio::test]
async fn test_partly_tracked_package_is_not_rewritten_when_current() {
    let manifest_only =
        ProjectFixture::new(&["zlib/1.3.1", "fmt/10.2.1"], &["fmt/10.2.1#fmt%2.000"]).unwrap();
    let lock_only = ProjectFixture::new(&["fmt/10.2.1"], &[LATEST_ENTRY, "fmt/10.2.1#fmt%2.000"]).unwrap();
    let client = RegistryClient::with_transport(zlib_registry());

    for project in [&manifest_only, &lock_only] {
        let before = (project.manifest().unwrap(), project.lock().unwrap());
        let reconciler = Reconciler::new(&client, project.files());

        for _ in 0..2 {
            let outcome = reconciler.run(&registry(), "zlib", ReconcileOptions::default()).await.unwrap();
            assert!(matches!(outcome, ReconcileOutcome::UpToDate(_)), "got {outcome:?}");
            assert!(reconciler.reconcile(&registry(), "zlib").await.unwrap().is_none());
        }
        assert_eq!((project.manifest().unwrap(), project.lock().unwrap()), before);
    }
}
