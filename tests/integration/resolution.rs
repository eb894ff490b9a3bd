use super::{registry, zlib_registry};
use conan_sync::registry::RegistryClient;
use conan_sync::resolver::{PackageResolver, RevisionResolver, VersionResolver};
use conan_sync::test_utils::MockRegistry;
use serde_json::json;

#[tokio::test]
async fn test_versions_are_filtered_and_ranked() {
    let mock = MockRegistry::new().with_search(
        &registry(),
        "openssl",
        json!({
            "results": [
                "openssl/1.1.1w@_/_",
                "openssl/3.0.13@_/_",
                "openssl/3.2.1@_/_",
                "openssl/3.0.13@acme/stable",
                "openssl-fips/3.0.8@_/_",
                "openssl/broken",
            ]
        }),
    );
    let client = RegistryClient::with_transport(mock);

    let versions = VersionResolver::new(&client).all_versions(&registry(), "openssl").await;
    let names: Vec<&str> = versions.iter().map(|v| v.version.as_str()).collect();

    assert_eq!(names, ["3.2.1", "3.0.13", "1.1.1w"]);
    assert_eq!(versions[1].reference, "openssl/3.0.13@_/_", "first-seen reference kept");
    assert_eq!(versions[0].remote, "local");
    assert!(versions[0].url.ends_with("/_/openssl/3.2.1"));
}

#[tokio::test]
async fn test_unreachable_registry_yields_no_versions() {
    let mock = MockRegistry::new()
        .with_failure(registry().search_url("zlib").unwrap(), "connection refused");
    let client = RegistryClient::with_transport(mock);

    assert!(VersionResolver::new(&client).all_versions(&registry(), "zlib").await.is_empty());
    assert!(PackageResolver::new(&client).resolve_latest(&registry(), "zlib").await.unwrap().is_none());
}

#[tokio::test]
async fn test_latest_revision_of_a_version() {
    let client = RegistryClient::with_transport(zlib_registry());

    let revision = RevisionResolver::new(&client)
        .latest_revision(&registry(), "zlib", "1.3.1", None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(revision.reference, "zlib/1.3.1@_/_");
    assert_eq!(revision.revision_hash, "rev131");
    assert_eq!(revision.raw_time, "2025-09-06T00:34:38.826+0800");
    assert_eq!(revision.timestamp, "1757090078.826");
    assert_eq!(revision.lock_entry, "zlib/1.3.1#rev131%1757090078.826");
}

#[tokio::test]
async fn test_resolve_latest_end_to_end() {
    let client = RegistryClient::with_transport(zlib_registry());

    let info = PackageResolver::new(&client).resolve_latest(&registry(), "zlib").await.unwrap().unwrap();

    assert_eq!(info.package_name, "zlib");
    assert_eq!(info.version, "1.3.1");
    assert_eq!(info.package_ref(), "zlib/1.3.1");
    assert_eq!(info.lock_entry, "zlib/1.3.1#rev131%1757090078.826");
    assert_eq!(
        client.transport().requests(),
        [
            registry().search_url("zlib").unwrap(),
            registry().revisions_url("zlib/1.3.1", "_/_"),
        ]
    );
}

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let authed = registry().with_token("s3cret");
    let mock = MockRegistry::new().with_search(&authed, "zlib", json!({ "results": [] }));
    let client = RegistryClient::with_transport(mock);

    client.search(&authed, "zlib").await.unwrap();

    let headers = client.transport().last_headers().unwrap();
    assert!(headers.contains(&("Authorization".to_string(), "Bearer s3cret".to_string())));
}
