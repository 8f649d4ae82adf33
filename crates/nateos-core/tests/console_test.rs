#![allow(clippy::unwrap_used)]
// End-to-end tests for `Console` against a wiremock configuration API.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nateos_api::{ApiClient, TransportConfig};
use nateos_core::{
    Console, ConsoleConfig, CoreError, DomainId, DomainState, FailureCause, FormSpec, Mutation,
    MutationKind, NotificationKind, Reachability, Shape, catalog, describe,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Console) {
    let server = MockServer::start().await;
    let console = console_for(&format!("{}/api", server.uri()));
    (server, console)
}

fn console_for(base: &str) -> Console {
    let base_url = Url::parse(base).unwrap();
    let client = ApiClient::new(base_url.clone(), &TransportConfig::default()).unwrap();
    Console::with_client(ConsoleConfig::new(base_url), client)
}

fn api_path(domain: DomainId) -> String {
    format!("/api/{}", describe(domain).resource_path)
}

fn empty_document(domain: DomainId) -> Value {
    match describe(domain).shape {
        Shape::OrderedList => json!([]),
        Shape::MapByKey | Shape::Singleton => json!({}),
    }
}

async fn mount_get(server: &MockServer, domain: DomainId, body: Value) {
    Mock::given(method("GET"))
        .and(path(api_path(domain)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Health plus an empty document for every domain except `skip`.
async fn mount_catalog(server: &MockServer, skip: &[DomainId]) {
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "service": "nateos-api" })),
        )
        .mount(server)
        .await;

    for descriptor in catalog().filter(|d| !skip.contains(&d.id)) {
        mount_get(server, descriptor.id, empty_document(descriptor.id)).await;
    }
}

fn messages(console: &Console) -> Vec<(String, NotificationKind)> {
    console
        .notifications()
        .entries()
        .into_iter()
        .map(|n| (n.message, n.kind))
        .collect()
}

// ── Startup ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_loads_every_domain() {
    let (server, console) = setup().await;
    mount_catalog(&server, &[DomainId::Interfaces, DomainId::Stp]).await;
    mount_get(
        &server,
        DomainId::Interfaces,
        json!({ "eth0": { "mode": "trunk", "vlan": 10 }, "eth1": {} }),
    )
    .await;
    mount_get(&server, DomainId::Stp, json!({ "enabled": true })).await;

    let report = console.start().await;
    assert_eq!(report.reachability, Reachability::Reachable);
    assert!(report.load.is_complete());
    assert_eq!(report.load.loaded.len(), 10);

    let interfaces = console.view(DomainId::Interfaces);
    let state = interfaces.state.as_ref().unwrap();
    assert_eq!(state.get("eth0").unwrap().get("vlan"), Some(&json!(10)));
    assert_eq!(state.get("eth1").unwrap().get("mode"), Some(&json!("access")));

    let stp = console.view(DomainId::Stp);
    let record = stp.state.as_ref().unwrap().single().unwrap().clone();
    assert_eq!(record.get("enabled"), Some(&json!(true)));
    assert_eq!(record.get("mode"), Some(&json!("rstp")));
    assert_eq!(record.get("priority"), Some(&json!(32768)));

    // Loads never notify.
    assert!(console.notifications().entries().is_empty());
}

#[tokio::test]
async fn test_failed_domain_does_not_block_others() {
    let (server, console) = setup().await;
    mount_catalog(&server, &[DomainId::Bgp, DomainId::Lldp]).await;
    Mock::given(method("GET"))
        .and(path(api_path(DomainId::Bgp)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path(DomainId::Lldp)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let report = console.start().await;
    assert_eq!(report.load.loaded.len(), 8);

    let causes: Vec<_> = report
        .load
        .failed
        .iter()
        .map(|(domain, failure)| (*domain, failure.cause))
        .collect();
    assert_eq!(
        causes,
        [
            (DomainId::Lldp, FailureCause::Decode),
            (DomainId::Bgp, FailureCause::Status(500)),
        ]
    );

    assert!(!console.view(DomainId::Bgp).is_loaded());
    assert!(console.view(DomainId::Ospf).is_loaded());
    assert!(console.notifications().entries().is_empty());
}

#[tokio::test]
async fn test_unhealthy_api_is_unreachable() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert_eq!(console.connectivity().probe().await, Reachability::Unreachable);
}

#[tokio::test]
async fn test_unreachable_host() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let console = console_for(&format!("http://127.0.0.1:{port}/api"));

    let report = console.start().await;
    assert_eq!(report.reachability, Reachability::Unreachable);
    assert_eq!(report.load.failed.len(), 10);
    assert!(report.load.failed.iter().all(|(_, f)| f.is_network()));
    assert!(console.view(DomainId::Vlans).state_or_default().is_empty());
}

// ── VLAN lifecycle ──────────────────────────────────────────────────

#[tokio::test]
async fn test_create_vlan_through_form() {
    let (server, console) = setup().await;
    mount_catalog(&server, &[]).await;
    console.start().await;
    assert!(console.view(DomainId::Vlans).state.as_ref().unwrap().is_empty());

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/l2/vlans"))
        .and(body_json(json!({ "vlan_id": 100, "name": "Eng" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "created", "vlan_id": "100" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_get(&server, DomainId::Vlans, json!({ "100": { "vlan_id": 100, "name": "Eng" } })).await;

    let mut modal = console.modal().await;
    modal.open(FormSpec::for_domain(DomainId::Vlans, MutationKind::Upsert).unwrap());
    modal.capture("vlan_id", "100").unwrap();
    modal.capture("name", "Eng").unwrap();
    let dispatch = modal.submit().unwrap();
    assert!(!modal.is_open());

    dispatch.await.unwrap().unwrap();

    let view = console.view(DomainId::Vlans);
    let record = view.state.as_ref().unwrap().get("100").unwrap().clone();
    assert_eq!(record.get("name"), Some(&json!("Eng")));
    assert_eq!(
        messages(&console),
        [("VLAN created".to_owned(), NotificationKind::Success)]
    );
}

#[tokio::test]
async fn test_failed_write_keeps_view_and_skips_reload() {
    let (server, console) = setup().await;
    mount_catalog(&server, &[DomainId::Vlans]).await;
    mount_get(&server, DomainId::Vlans, json!({ "1": { "name": "default" } })).await;
    console.start().await;
    let before = console.view(DomainId::Vlans);

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/l2/vlans"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "detail": "vlan_id required" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/l2/vlans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = console
        .mutate(Mutation::upsert(
            DomainId::Vlans,
            Some("7".into()),
            serde_json::from_value(json!({ "name": "Lab" })).unwrap(),
        ))
        .await
        .unwrap_err();
    assert!(
        matches!(err, CoreError::Remote(ref f) if f.cause == FailureCause::Status(400)),
        "expected status failure, got: {err:?}"
    );

    assert_eq!(console.view(DomainId::Vlans), before);
    assert_eq!(
        messages(&console),
        [("Failed to create VLAN".to_owned(), NotificationKind::Failure)]
    );
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let (server, console) = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/api/l2/vlans/100"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = console
        .mutate(Mutation::delete(DomainId::Vlans, "100"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ConfirmationRequired { domain: DomainId::Vlans }));

    let pending = console.request_delete(DomainId::Vlans, "100").unwrap();
    assert_eq!(pending.prompt(), "Delete VLAN 100?");
    pending.cancel();

    assert!(console.notifications().entries().is_empty());
}

#[tokio::test]
async fn test_confirmed_route_delete_reloads_list() {
    let (server, console) = setup().await;
    mount_catalog(&server, &[DomainId::StaticRoutes]).await;
    mount_get(
        &server,
        DomainId::StaticRoutes,
        json!([
            { "destination": "10.0.0.0/8", "gateway": "192.168.1.1" },
            { "destination": "172.16.0.0/12", "gateway": "192.168.1.2" },
            { "destination": "0.0.0.0/0", "gateway": "192.168.1.254" }
        ]),
    )
    .await;
    console.start().await;

    server.reset().await;
    Mock::given(method("DELETE"))
        .and(path("/api/l3/static-routes/0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "deleted" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_get(
        &server,
        DomainId::StaticRoutes,
        json!([
            { "destination": "172.16.0.0/12", "gateway": "192.168.1.2" },
            { "destination": "0.0.0.0/0", "gateway": "192.168.1.254" }
        ]),
    )
    .await;

    let pending = console.request_delete(DomainId::StaticRoutes, "0").unwrap();
    assert_eq!(pending.prompt(), "Delete static route #0?");
    pending.confirm().await.unwrap();

    let view = console.view(DomainId::StaticRoutes);
    let state = view.state.as_ref().unwrap();
    assert_eq!(state.len(), 2);
    assert_eq!(state.get("0").unwrap().get("destination"), Some(&json!("172.16.0.0/12")));
    assert_eq!(
        messages(&console),
        [("Route deleted".to_owned(), NotificationKind::Success)]
    );
}

#[tokio::test]
async fn test_append_route_grows_list() {
    let (server, console) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/l3/static-routes"))
        .and(body_json(json!({ "destination": "10.0.0.0/8", "gateway": "192.168.1.1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "added" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_get(
        &server,
        DomainId::StaticRoutes,
        json!([{ "destination": "10.0.0.0/8", "gateway": "192.168.1.1" }]),
    )
    .await;

    let mut modal = console.modal().await;
    modal.open(FormSpec::for_domain(DomainId::StaticRoutes, MutationKind::Append).unwrap());
    modal.capture("destination", "10.0.0.0/8").unwrap();
    modal.capture("gateway", "192.168.1.1").unwrap();
    modal.submit().unwrap().await.unwrap().unwrap();

    let view = console.view(DomainId::StaticRoutes);
    assert_eq!(view.state.as_ref().map(DomainState::len), Some(1));
    assert_eq!(
        messages(&console),
        [("Static route added".to_owned(), NotificationKind::Success)]
    );
}

// ── Modal behaviour ─────────────────────────────────────────────────

#[tokio::test]
async fn test_second_open_discards_first_session() {
    let (server, console) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/api/l2/interfaces/eth0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path(DomainId::System)))
        .and(body_json(json!({ "hostname": "core-sw1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "updated" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_get(&server, DomainId::System, json!({ "hostname": "core-sw1" })).await;

    let mut modal = console.modal().await;
    modal.open(
        FormSpec::for_domain(DomainId::Interfaces, MutationKind::Upsert)
            .unwrap()
            .with_key("eth0"),
    );
    modal.capture("mode", "trunk").unwrap();
    let first = modal.session().unwrap().id();

    modal.open(FormSpec::for_domain(DomainId::System, MutationKind::Upsert).unwrap());
    let session = modal.session().unwrap();
    assert_ne!(session.id(), first);
    assert_eq!(session.form().domain, DomainId::System);
    assert_eq!(session.value("mode"), None);
    assert!(matches!(
        modal.capture("mode", "trunk"),
        Err(CoreError::UnknownField(_))
    ));

    modal.capture("hostname", "core-sw1").unwrap();
    modal.submit().unwrap().await.unwrap().unwrap();
    assert!(matches!(modal.submit(), Err(CoreError::NoActiveModal)));
    assert_eq!(
        messages(&console),
        [("System configuration updated".to_owned(), NotificationKind::Success)]
    );
}

#[tokio::test]
async fn test_console_clones_share_one_form() {
    let (server, console) = setup().await;
    Mock::given(method("PUT"))
        .and(path(api_path(DomainId::Aaa)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path(DomainId::System)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_get(&server, DomainId::System, json!({})).await;

    let other = console.clone();
    console
        .modal()
        .await
        .open(FormSpec::for_domain(DomainId::Aaa, MutationKind::Upsert).unwrap());
    other
        .modal()
        .await
        .open(FormSpec::for_domain(DomainId::System, MutationKind::Upsert).unwrap());

    let dispatch = {
        let mut modal = console.modal().await;
        assert_eq!(modal.session().unwrap().form().domain, DomainId::System);
        modal.submit().unwrap()
    };
    dispatch.await.unwrap().unwrap();

    assert!(!other.modal().await.is_open());
    assert_eq!(
        messages(&console),
        [("System configuration updated".to_owned(), NotificationKind::Success)]
    );
}

#[tokio::test]
async fn test_coercion_failure_closes_without_request() {
    let (server, console) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/api/l2/interfaces/eth0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut modal = console.modal().await;
    modal.open(
        FormSpec::for_domain(DomainId::Interfaces, MutationKind::Upsert)
            .unwrap()
            .with_key("eth0"),
    );
    modal.capture("vlan", "ten").unwrap();

    assert!(matches!(modal.submit(), Err(CoreError::Coercion { .. })));
    assert!(!modal.is_open());
    assert!(matches!(modal.submit(), Err(CoreError::NoActiveModal)));
    assert_eq!(
        messages(&console),
        [("Failed to configure interface".to_owned(), NotificationKind::Failure)]
    );
}

#[tokio::test]
async fn test_cancel_sends_nothing() {
    let (server, console) = setup().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut modal = console.modal().await;
    modal.open(FormSpec::for_domain(DomainId::Aaa, MutationKind::Upsert).unwrap());
    modal.capture("auth_method", "radius").unwrap();
    assert!(modal.cancel().is_some());
    assert!(!modal.is_open());
}

#[tokio::test]
async fn test_singleton_update_puts_full_record() {
    let (server, console) = setup().await;
    mount_get(&server, DomainId::Stp, json!({ "enabled": false, "mode": "rstp", "priority": 32768 }))
        .await;
    console.reload(DomainId::Stp).await.unwrap();

    server.reset().await;
    Mock::given(method("PUT"))
        .and(path("/api/l2/stp"))
        .and(body_json(json!({ "enabled": true, "mode": "rstp", "priority": 4096 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "updated" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_get(&server, DomainId::Stp, json!({ "enabled": true, "mode": "rstp", "priority": 4096 }))
        .await;

    let current = console.view(DomainId::Stp).state_or_default();
    let mut modal = console.modal().await;
    modal.open(
        FormSpec::for_domain(DomainId::Stp, MutationKind::Upsert)
            .unwrap()
            .with_values(current.single().unwrap()),
    );
    modal.capture("enabled", "on").unwrap();
    modal.capture("priority", "4096").unwrap();
    modal.submit().unwrap().await.unwrap().unwrap();

    let view = console.view(DomainId::Stp);
    let record = view.state.as_ref().unwrap().single().unwrap().clone();
    assert_eq!(record.get("priority"), Some(&json!(4096)));
    assert_eq!(
        messages(&console),
        [("STP configuration updated".to_owned(), NotificationKind::Success)]
    );
}

#[tokio::test]
async fn test_member_upsert_lands_in_view() {
    let (server, console) = setup().await;
    mount_get(&server, DomainId::Interfaces, json!({ "eth1": { "mode": "access" } })).await;
    console.reload(DomainId::Interfaces).await.unwrap();

    server.reset().await;
    Mock::given(method("PUT"))
        .and(path("/api/l2/interfaces/eth1"))
        .and(body_json(json!({ "mode": "trunk", "vlan": 20 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "updated" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_get(
        &server,
        DomainId::Interfaces,
        json!({ "eth1": { "mode": "trunk", "vlan": 20 } }),
    )
    .await;

    let payload: nateos_core::Record =
        serde_json::from_value(json!({ "mode": "trunk", "vlan": 20 })).unwrap();
    console
        .mutate(Mutation::upsert(
            DomainId::Interfaces,
            Some("eth1".into()),
            payload.clone(),
        ))
        .await
        .unwrap();

    let view = console.view(DomainId::Interfaces);
    assert_eq!(view.state.as_ref().unwrap().get("eth1"), Some(&payload));
    assert_eq!(
        messages(&console),
        [("Interface configured".to_owned(), NotificationKind::Success)]
    );
}

// ── Connectivity and ordering ───────────────────────────────────────

fn slow_console(server: &MockServer) -> Console {
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let transport = TransportConfig {
        timeout: Duration::from_millis(200),
        ..TransportConfig::default()
    };
    let client = ApiClient::new(base_url.clone(), &transport).unwrap();
    Console::with_client(ConsoleConfig::new(base_url), client)
}

#[tokio::test]
async fn test_network_failures_flip_reachability() {
    let server = MockServer::start().await;
    let console = slow_console(&server);
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path(DomainId::Vlans)))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path(DomainId::Stp)))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    assert_eq!(console.connectivity().current(), Reachability::Unreachable);
    assert_eq!(console.connectivity().probe().await, Reachability::Reachable);

    let failure = console.sync().reload(DomainId::Vlans).await.unwrap_err();
    assert!(failure.is_network());
    assert_eq!(console.connectivity().current(), Reachability::Unreachable);

    assert_eq!(console.connectivity().probe().await, Reachability::Reachable);
    let err = console
        .mutate(Mutation::upsert(DomainId::Stp, None, nateos_core::Record::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Remote(ref f) if f.is_network()));
    assert_eq!(console.connectivity().current(), Reachability::Unreachable);
}

#[tokio::test]
async fn test_status_failure_keeps_reachability() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path(DomainId::Ospf)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    console.connectivity().probe().await;
    assert!(console.sync().reload(DomainId::Ospf).await.is_err());
    assert_eq!(console.connectivity().current(), Reachability::Reachable);
}

#[tokio::test]
async fn test_overlapping_reloads_keep_newest() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path(api_path(DomainId::Vlans)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "1": { "name": "old" } }))
                .set_delay(Duration::from_millis(400)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_get(&server, DomainId::Vlans, json!({ "2": { "name": "new" } })).await;

    let sync = console.sync();
    let (older, newer) = tokio::join!(sync.reload(DomainId::Vlans), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        sync.reload(DomainId::Vlans).await
    });

    assert!(newer.unwrap());
    assert!(!older.unwrap(), "older response should have been discarded");

    let view = console.view(DomainId::Vlans);
    let state = view.state.as_ref().unwrap();
    assert_eq!(state.len(), 1);
    assert_eq!(state.get("2").unwrap().get("name"), Some(&json!("new")));
    assert!(state.get("1").is_none());
}

#[tokio::test]
async fn test_running_config_export() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "l2": { "vlans": {} }, "l3": { "static_routes": [] }
        })))
        .mount(&server)
        .await;

    let config = console.running_config().await.unwrap();
    assert_eq!(config["l3"]["static_routes"], json!([]));
}
