mod helpers;

use ferrous_ptr_application::services::BackendRegistry;
use ferrous_ptr_application::use_cases::ResolvePtrUseCase;
use ferrous_ptr_domain::{
    BackendKind, BackendOutcome, PolicyGroup, Resolution, ResolutionSource, SubnetRule,
};
use helpers::{MockPtrBackend, PanickingBackend};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_millis(200);

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

fn rule(s: &str) -> SubnetRule {
    s.parse().unwrap()
}

fn resolver(registry: BackendRegistry) -> ResolvePtrUseCase {
    ResolvePtrUseCase::new(Arc::new(registry))
}

// ── DefaultLast ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_default_last_prefers_store_entry_over_default() {
    let store = MockPtrBackend::new().with_entry("10.0.0.23", "printer.office");
    let registry = BackendRegistry::new(TIMEOUT).with_persistent_store(Arc::new(store));
    let group = PolicyGroup::new(vec![BackendKind::PersistentStore], vec![]);

    let resolution = resolver(registry)
        .execute(ip("10.0.0.23"), &rule("10.0.0.0/24 last office"), &group)
        .await;

    assert_eq!(
        resolution,
        Resolution::resolved(
            "printer.office",
            ResolutionSource::Backend(BackendKind::PersistentStore)
        )
    );
}

#[tokio::test]
async fn test_default_last_falls_back_to_default_without_entry() {
    let store = MockPtrBackend::new();
    let registry = BackendRegistry::new(TIMEOUT).with_persistent_store(Arc::new(store.clone()));
    let group = PolicyGroup::new(vec![BackendKind::PersistentStore], vec![]);

    let resolution = resolver(registry)
        .execute(ip("10.0.0.23"), &rule("10.0.0.0/24 last office"), &group)
        .await;

    assert_eq!(
        resolution,
        Resolution::resolved("office.", ResolutionSource::RuleDefault)
    );
    assert_eq!(store.call_count(), 1);
}

#[tokio::test]
async fn test_default_last_without_default_is_no_answer() {
    let registry =
        BackendRegistry::new(TIMEOUT).with_persistent_store(Arc::new(MockPtrBackend::new()));
    let group = PolicyGroup::new(vec![BackendKind::PersistentStore], vec![]);

    let resolution = resolver(registry)
        .execute(ip("10.0.0.23"), &rule("10.0.0.0/24 last"), &group)
        .await;

    assert_eq!(resolution, Resolution::NoAnswer);
}

// ── DefaultFirst ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_default_first_never_invokes_backends() {
    let registry = BackendRegistry::new(TIMEOUT)
        .with_persistent_store(Arc::new(PanickingBackend))
        .with_dynamic_discovery(Arc::new(PanickingBackend));
    let group = PolicyGroup::new(
        vec![BackendKind::DynamicDiscovery, BackendKind::PersistentStore],
        vec![],
    );

    let resolution = resolver(registry)
        .execute(ip("10.0.0.200"), &rule("10.0.0.128/25 first lab.example"), &group)
        .await;

    assert_eq!(
        resolution,
        Resolution::resolved("lab.example.", ResolutionSource::RuleDefault)
    );
}

#[tokio::test]
async fn test_default_first_without_default_runs_backends() {
    let store = MockPtrBackend::new().with_entry("10.0.0.200", "bench.lab");
    let registry = BackendRegistry::new(TIMEOUT).with_dynamic_discovery(Arc::new(store));
    let group = PolicyGroup::new(vec![BackendKind::DynamicDiscovery], vec![]);

    let resolution = resolver(registry)
        .execute(ip("10.0.0.200"), &rule("10.0.0.0/24 first"), &group)
        .await;

    assert_eq!(resolution.name(), Some("bench.lab"));
}

// ── Chain behaviour ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_first_found_short_circuits_chain() {
    let discovery = MockPtrBackend::new().with_entry("10.0.0.5", "from-discovery");
    let store = MockPtrBackend::new().with_entry("10.0.0.5", "from-store");
    let registry = BackendRegistry::new(TIMEOUT)
        .with_dynamic_discovery(Arc::new(discovery.clone()))
        .with_persistent_store(Arc::new(store.clone()));
    let group = PolicyGroup::new(
        vec![BackendKind::DynamicDiscovery, BackendKind::PersistentStore],
        vec![],
    );

    let resolution = resolver(registry)
        .execute(ip("10.0.0.5"), &rule("10.0.0.0/24 last"), &group)
        .await;

    assert_eq!(resolution.name(), Some("from-discovery"));
    assert_eq!(discovery.call_count(), 1);
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_unavailable_backend_is_skipped() {
    let broken = MockPtrBackend::failing();
    let store = MockPtrBackend::new().with_entry("10.0.0.5", "from-store");
    let registry = BackendRegistry::new(TIMEOUT)
        .with_dynamic_discovery(Arc::new(broken.clone()))
        .with_persistent_store(Arc::new(store));
    let group = PolicyGroup::new(
        vec![BackendKind::DynamicDiscovery, BackendKind::PersistentStore],
        vec![],
    );

    let resolution = resolver(registry)
        .execute(ip("10.0.0.5"), &rule("10.0.0.0/24 last"), &group)
        .await;

    assert_eq!(resolution.name(), Some("from-store"));
    assert_eq!(broken.call_count(), 1);
}

#[tokio::test]
async fn test_all_backends_unavailable_uses_default() {
    let registry = BackendRegistry::new(TIMEOUT)
        .with_persistent_store(Arc::new(MockPtrBackend::failing()));
    let group = PolicyGroup::new(vec![BackendKind::PersistentStore], vec![]);

    let resolution = resolver(registry)
        .execute(ip("10.0.0.5"), &rule("10.0.0.0/24 last fallback"), &group)
        .await;

    assert_eq!(resolution.name(), Some("fallback."));
}

#[tokio::test]
async fn test_hardcoded_backend_answers_inline() {
    let registry = BackendRegistry::new(TIMEOUT);
    let group = PolicyGroup::new(
        vec![BackendKind::Hardcoded("gw.example".into())],
        vec![],
    );

    let resolution = resolver(registry)
        .execute(ip("10.0.0.1"), &rule("10.0.0.1 last"), &group)
        .await;

    assert_eq!(
        resolution,
        Resolution::resolved(
            "gw.example",
            ResolutionSource::Backend(BackendKind::Hardcoded("gw.example".into()))
        )
    );
}

// ── Registry ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_registry_times_out_slow_backend() {
    let slow = MockPtrBackend::slow(Duration::from_secs(5)).with_entry("10.0.0.5", "late");
    let registry =
        BackendRegistry::new(Duration::from_millis(20)).with_persistent_store(Arc::new(slow));

    let outcome = registry
        .resolve(&BackendKind::PersistentStore, ip("10.0.0.5"))
        .await;

    assert!(matches!(outcome, BackendOutcome::Unavailable(_)));
}

#[tokio::test]
async fn test_registry_without_adapter_is_unavailable() {
    let registry = BackendRegistry::new(TIMEOUT);

    assert!(!registry.has_adapter(&BackendKind::DynamicDiscovery));
    let outcome = registry
        .resolve(&BackendKind::DynamicDiscovery, ip("10.0.0.5"))
        .await;
    assert!(matches!(outcome, BackendOutcome::Unavailable(_)));
}

#[tokio::test]
async fn test_registry_maps_missing_entry_to_empty() {
    let registry =
        BackendRegistry::new(TIMEOUT).with_persistent_store(Arc::new(MockPtrBackend::new()));

    let outcome = registry
        .resolve(&BackendKind::PersistentStore, ip("10.0.0.5"))
        .await;
    assert_eq!(outcome, BackendOutcome::Empty);
}
