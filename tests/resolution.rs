//! End-to-end resolution scenarios
//!
//! Drives the resolver the way the synchronization servlet would: a request
//! snapshot plus a resource locator in, an immutable session configuration
//! out.

use std::fs;
use std::io::Write;

use serde_json::json;
use treesync::diag::Severity;
use treesync::mock::MockRequest;
use treesync::params;
use treesync::{
    CaptureSink, DepthConfig, NameValue, Properties, ResolveError, SessionResolver,
    StaticResources, TomlResources,
};

fn props(value: serde_json::Value) -> Properties {
    Properties::from_value(value).unwrap()
}

#[test]
fn full_session_from_inline_parameters() {
    let resources = StaticResources::new();
    let diag = CaptureSink::new();
    let resolver = SessionResolver::new(&resources, &diag);

    let request = MockRequest::new("/content/site.sync.html/sub/tree?review=yes&strategy=fast")
        .with_encoding("UTF-8")
        .with_suffix("/sub/tree")
        .with_selectors(&["sync"])
        .with_parameter(params::RP_REMOTE_HOST, "remote.example.com")
        .with_parameter(params::RP_REMOTE_PORT, "4502")
        .with_parameter(params::RP_REMOTE_USER, "admin")
        .with_parameter(params::RP_REMOTE_PASS, "secret")
        .with_parameter(params::RP_STRATEGY, "fast")
        .with_parameter(params::RP_UPDATE, "true")
        .with_parameter("review", "yes")
        .with_parameter("label", "nightly");

    let session = resolver.resolve(&request).unwrap();

    assert_eq!(session.source.host, "remote.example.com");
    assert_eq!(session.source.port, 4502);
    assert_eq!(session.source.username, Some("admin".to_string()));
    assert_eq!(session.strategy, Some("fast".to_string()));
    assert_eq!(session.suffix, Some("/sub/tree".to_string()));
    assert_eq!(session.selectors, vec!["sync"]);
    assert!(session.options.update);
    // (review, yes) arrives via both carriers and survives once, in query
    // order; the strategy pair is reserved and stripped.
    assert_eq!(
        session.parameters,
        vec![
            NameValue::new("review", "yes"),
            NameValue::new("label", "nightly"),
        ]
    );
    assert!(diag.is_empty());
}

#[test]
fn stored_resource_wins_over_inline_parameters() {
    let resources = StaticResources::new().with(
        "/etc/sync/upstream",
        props(json!({
            "host": "stored.example.com",
            "port": 8443,
            "user": "sync-user",
            "is_https": true
        })),
    );
    let diag = CaptureSink::new();
    let resolver = SessionResolver::new(&resources, &diag);

    let request = MockRequest::new("/p")
        .with_parameter(params::RP_REMOTE_CONFIG, "/etc/sync/upstream")
        .with_parameter(params::RP_REMOTE_HOST, "inline.example.com")
        .with_parameter(params::RP_REMOTE_PORT, "4502")
        .with_parameter(params::RP_REMOTE_USER, "inline-user");

    let session = resolver.resolve(&request).unwrap();

    assert_eq!(session.source.host, "stored.example.com");
    assert_eq!(session.source.port, 8443);
    assert_eq!(session.source.username, Some("sync-user".to_string()));
    assert!(session.source.https);
}

#[test]
fn toml_backed_resource_reference() {
    let dir = tempfile::tempdir().unwrap();
    let sync_dir = dir.path().join("etc").join("sync");
    fs::create_dir_all(&sync_dir).unwrap();
    let mut file = fs::File::create(sync_dir.join("upstream.toml")).unwrap();
    writeln!(file, "host = \"toml.example.com\"").unwrap();
    writeln!(file, "port = 8080").unwrap();
    writeln!(file, "user = \"reader\"").unwrap();
    writeln!(file, "context_path = \"/crx\"").unwrap();

    let resources = TomlResources::new(dir.path());
    let diag = CaptureSink::new();
    let resolver = SessionResolver::new(&resources, &diag);

    let request = MockRequest::new("/p")
        .with_parameter(params::RP_REMOTE_CONFIG, "/etc/sync/upstream");

    let session = resolver.resolve(&request).unwrap();
    assert_eq!(session.source.host, "toml.example.com");
    assert_eq!(session.source.port, 8080);
    assert_eq!(session.source.context_path, Some("/crx".to_string()));
}

#[test]
fn no_host_anywhere_is_the_only_hard_failure() {
    let resources = StaticResources::new();
    let diag = CaptureSink::new();
    let resolver = SessionResolver::new(&resources, &diag);

    // Plenty of irregular input, but a host is present: resolution succeeds.
    let degraded = MockRequest::new("http://[bad/?x=1")
        .with_parameter(params::RP_REMOTE_HOST, "remote")
        .with_parameter(params::RP_REMOTE_PORT, "not-a-port")
        .with_parameter(params::RP_BATCH_SIZE, "lots");
    assert!(resolver.resolve(&degraded).is_ok());
    assert_eq!(diag.messages(Severity::Error).len(), 3);

    // No host, no reference: the hard failure.
    let hostless = MockRequest::new("/p")
        .with_parameter(params::RP_REMOTE_CONFIG, "/etc/sync/missing")
        .with_parameter("x", "1");
    assert_eq!(resolver.resolve(&hostless), Err(ResolveError::NoRemoteHost));
}

#[test]
fn resolved_session_is_plain_data() {
    let resources = StaticResources::new();
    let diag = CaptureSink::new();
    let resolver = SessionResolver::new(&resources, &diag);

    let request = MockRequest::new("/p?a=1")
        .with_parameter(params::RP_REMOTE_HOST, "remote")
        .with_parameter(params::RP_REMOTE_PASS, "secret");

    let session = resolver.resolve(&request).unwrap();

    // Clones are independent snapshots.
    let copy = session.clone();
    assert_eq!(copy, session);

    // Debug output never leaks the password.
    let rendered = format!("{:?}", session);
    assert!(!rendered.contains("secret"));
}

#[test]
fn depth_resolution_is_total_and_layered() {
    let diag = CaptureSink::new();

    // Depth-by-path beats any depth-by-depth fallback.
    let by_path = DepthConfig::parse("/content/site=5", &diag);
    assert_eq!(by_path.resolve_depth("/content/site", 0), 5);
    assert_eq!(by_path.resolve_depth("/content/other", 0), 1);

    // Single-element depth-by-depth covers every level.
    let by_depth = DepthConfig::parse("3", &diag);
    for level in 0..64 {
        assert_eq!(by_depth.resolve_depth("/anything", level), 3);
    }

    // Garbage degrades to the default without failing.
    let garbage = DepthConfig::parse("/a=notanumber", &diag);
    assert_eq!(garbage.resolve_depth("/a", 0), 1);
    assert_eq!(diag.messages(Severity::Error).len(), 1);

    // First token only; the rest is accepted and ignored.
    let permissive = DepthConfig::parse("7 trailing junk", &diag);
    assert_eq!(permissive, DepthConfig::parse("7", &diag));
}

#[test]
fn depth_config_is_shareable_across_sessions() {
    let diag = CaptureSink::new();
    let config = std::sync::Arc::new(DepthConfig::parse("2", &diag));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let config = config.clone();
            std::thread::spawn(move || config.resolve_depth("/content", i))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2);
    }
}
