//! End-to-end tests: a real lookup server on an ephemeral port, driven by the
//! HTTP client through a full verification session.

use std::sync::Arc;
use std::time::Duration;

use idcheck_client::HttpLookupClient;
use idcheck_flow::{
    FlowConfig, FlowError, RecordLookup, Resolution, SimulatedScan, Step, VerificationFlow,
};
use idcheck_registry::StaticRegistry;
use idcheck_rpc::{RpcConfig, RpcServer};
use idcheck_types::PrimaryId;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct RunningServer {
    base_url: String,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), idcheck_rpc::RpcError>>,
}

impl RunningServer {
    async fn shutdown(self) {
        let _ = self.stop.send(());
        self.handle.await.expect("join").expect("clean shutdown");
    }
}

async fn start_server(config: RpcConfig) -> RunningServer {
    let server = RpcServer::new(
        RpcConfig { port: 0, ..config },
        Arc::new(StaticRegistry::demo()),
    )
    .expect("server");
    let listener = server.bind().await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .serve(listener, async move {
                let _ = stopped.await;
            })
            .await
    });
    RunningServer {
        base_url: format!("http://{addr}"),
        stop,
        handle,
    }
}

fn client(base_url: &str, timeout: Duration) -> HttpLookupClient {
    HttpLookupClient::new(base_url, timeout).expect("client")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn client_maps_found_and_not_found() {
    let server = start_server(RpcConfig::default()).await;
    let client = client(&server.base_url, Duration::from_secs(5));

    let john = client
        .find_by_primary_id(&PrimaryId::parse("12345678901").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(john.display_name(), "John Doe");
    assert_eq!(john.secondary_id.as_str(), "10987654321");

    let missing = client
        .find_by_primary_id(&PrimaryId::parse("00000000000").unwrap())
        .await
        .unwrap();
    assert!(missing.is_none());

    server.shutdown().await;
}

#[tokio::test]
async fn full_verification_over_http() {
    let server = start_server(RpcConfig::default()).await;
    let mut flow = VerificationFlow::new(
        client(&server.base_url, Duration::from_secs(5)),
        Box::new(SimulatedScan::new(Duration::ZERO)),
        FlowConfig::default(),
    );

    assert_eq!(
        flow.submit_primary_id("00000000000").await.unwrap(),
        Resolution::Failed(FlowError::NotFound)
    );
    assert_eq!(
        flow.submit_primary_id("12345678901").await.unwrap(),
        Resolution::Advanced(Step::CollectingSecondaryId)
    );
    assert_eq!(
        flow.submit_secondary_id("10987654321").await.unwrap(),
        Resolution::Advanced(Step::BiometricCheck)
    );
    assert_eq!(
        flow.confirm_biometric().await.unwrap(),
        Resolution::Advanced(Step::Complete)
    );
    assert_eq!(flow.session().summary().unwrap().headline(), "John Doe");

    server.shutdown().await;
}

#[tokio::test]
async fn slow_server_is_a_transport_failure() {
    let server = start_server(RpcConfig {
        simulated_latency: Duration::from_secs(2),
        ..RpcConfig::default()
    })
    .await;
    let mut flow = VerificationFlow::new(
        client(&server.base_url, Duration::from_secs(10)),
        Box::new(SimulatedScan::new(Duration::ZERO)),
        FlowConfig {
            lookup_timeout: Duration::from_millis(200),
            ..FlowConfig::default()
        },
    );

    let res = flow.submit_primary_id("12345678901").await.unwrap();
    assert!(matches!(
        res,
        Resolution::Failed(FlowError::TransportFailure(_))
    ));
    assert_eq!(flow.session().step(), Step::CollectingPrimaryId);

    server.shutdown().await;
}

#[tokio::test]
async fn server_is_safe_under_concurrent_sessions() {
    let server = start_server(RpcConfig::default()).await;
    let client = client(&server.base_url, Duration::from_secs(5));

    let ids = ["12345678901", "98765432109", "11122233344", "00000000000"];
    let mut tasks = Vec::new();
    for _ in 0..8 {
        for id in ids {
            let client = client.clone();
            tasks.push(tokio::spawn(async move {
                let found = client
                    .find_by_primary_id(&PrimaryId::parse(id).unwrap())
                    .await
                    .unwrap();
                (id, found.map(|r| r.primary_id.to_string()))
            }));
        }
    }
    for task in tasks {
        let (asked, got) = task.await.unwrap();
        match got {
            Some(returned) => assert_eq!(returned, asked),
            None => assert_eq!(asked, "00000000000"),
        }
    }

    server.shutdown().await;
}
