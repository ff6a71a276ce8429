#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Failover and backoff behavior of the resilient JSON-RPC client.

mod common;

use common::{Reply, ScriptedTransport};
use pnode_aggregator::contract::RpcError;
use pnode_aggregator::infra::resilient::ResilientRpcClient;
use pnode_aggregator::infra::rpc::RpcResponse;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn endpoints() -> Vec<String> {
    vec!["seed-a".to_owned(), "seed-b".to_owned(), "seed-c".to_owned()]
}

#[tokio::test(start_paused = true)]
async fn fails_over_until_an_endpoint_answers() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .script("seed-a", vec![Reply::Timeout])
            .script("seed-b", vec![Reply::Timeout])
            .script(
                "seed-c",
                vec![Reply::Ok(RpcResponse::success(json!({"pods": [], "total_count": 0})))],
            ),
    );
    let client = ResilientRpcClient::new(transport.clone(), Duration::from_secs(1));

    let started = Instant::now();
    let result: Value = client
        .call("get-pods", Vec::new(), &endpoints(), 3)
        .await
        .unwrap();

    assert_eq!(result["total_count"], 0);
    assert_eq!(
        transport.attempted_endpoints(),
        vec!["seed-a", "seed-b", "seed-c"]
    );
    // 1s after the first failure, 2s after the second.
    assert_eq!(started.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_max_attempts_with_last_error() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = ResilientRpcClient::new(transport.clone(), Duration::from_secs(1));

    let started = Instant::now();
    let err = client
        .call::<Value>("get-pods", Vec::new(), &endpoints(), 3)
        .await
        .unwrap_err();

    assert_eq!(transport.attempted_endpoints().len(), 3);
    match err {
        RpcError::Transport { endpoint, .. } => assert_eq!(endpoint, "seed-c"),
        other => panic!("expected the final transport error, got {other:?}"),
    }
    assert_eq!(
        started.elapsed(),
        Duration::from_secs(3),
        "no sleep after the final attempt"
    );
}

#[tokio::test(start_paused = true)]
async fn remote_errors_trigger_failover() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .script(
                "seed-a",
                vec![Reply::Ok(RpcResponse::failure(-32000, "busy"))],
            )
            .script("seed-b", vec![Reply::Ok(RpcResponse::success(json!(42)))]),
    );
    let client = ResilientRpcClient::new(transport.clone(), Duration::from_millis(100));

    let result: u64 = client
        .call("get-version", Vec::new(), &endpoints(), 3)
        .await
        .unwrap();

    assert_eq!(result, 42);
    assert_eq!(transport.attempted_endpoints(), vec!["seed-a", "seed-b"]);
}

#[tokio::test(start_paused = true)]
async fn rotation_cursor_persists_across_calls() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .script("seed-a", vec![Reply::Timeout])
            .script("seed-b", vec![Reply::Ok(RpcResponse::success(json!("ok")))]),
    );
    let client = ResilientRpcClient::new(transport.clone(), Duration::from_secs(1));
    let endpoints = endpoints();

    let _: String = client.call("get-version", Vec::new(), &endpoints, 3).await.unwrap();
    let _: String = client.call("get-version", Vec::new(), &endpoints, 3).await.unwrap();

    assert_eq!(
        transport.attempted_endpoints(),
        vec!["seed-a", "seed-b", "seed-b"],
        "the second call starts at the endpoint that last answered"
    );
}

#[tokio::test(start_paused = true)]
async fn zero_attempts_still_tries_once() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = ResilientRpcClient::new(transport.clone(), Duration::from_secs(1));

    let result = client.call::<Value>("get-pods", Vec::new(), &endpoints(), 0).await;

    assert!(result.is_err());
    assert_eq!(transport.attempted_endpoints().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn request_ids_are_unique_and_params_are_forwarded() {
    let transport = Arc::new(ScriptedTransport::default().script(
        "seed-b",
        vec![Reply::Ok(RpcResponse::success(json!({"stats": {}})))],
    ));
    let client = ResilientRpcClient::new(transport.clone(), Duration::from_secs(1));

    let _: Value = client
        .call("get-stats", vec![json!("10.0.0.1:9001")], &endpoints(), 3)
        .await
        .unwrap();

    let attempts = transport.attempts.lock().unwrap();
    assert_eq!(attempts.len(), 2);
    assert_ne!(attempts[0].1.id, attempts[1].1.id);
    for (_, request) in attempts.iter() {
        assert_eq!(request.method, "get-stats");
        assert_eq!(request.params, Some(vec![json!("10.0.0.1:9001")]));
    }
}

#[tokio::test(start_paused = true)]
async fn undecodable_result_counts_as_failure() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .script("seed-a", vec![Reply::Ok(RpcResponse::success(json!("not a number")))])
            .script("seed-b", vec![Reply::Ok(RpcResponse::success(json!(7)))]),
    );
    let client = ResilientRpcClient::new(transport.clone(), Duration::from_secs(1));

    let value: u64 = client.call("get-count", Vec::new(), &endpoints(), 3).await.unwrap();
    assert_eq!(value, 7);
}
