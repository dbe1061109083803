//! Tests for the staking API client against a local stand-in service

mod common;

use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use ethers::types::U256;
use serde_json::{json, Value};

use common::*;
use stake_wallet::config::Network;
use stake_wallet::flow::{FlowOutcome, StakeFlow};
use stake_wallet::staking::{
    StakeIntentRequest, StakingApiError, StakingClient, API_KEY_HEADER, VALIDATOR_DEPOSIT_GWEI,
};

/// Requests seen by the stand-in service: (network, api key, body)
type Seen = Arc<Mutex<Vec<(String, Option<String>, Value)>>>;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(app.into_make_service());
    tokio::spawn(async move {
        server.await.unwrap();
    });

    format!("http://{}", addr)
}

async fn create_intent(
    State(seen): State<Seen>,
    Path(network): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().push((network.clone(), api_key.clone(), body));

    if api_key.as_deref() != Some("stake-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"title": "Unauthorized", "detail": "invalid api key"})),
        );
    }

    let contract = Network::lookup(&network)
        .map(|n| n.contract_address().to_string())
        .unwrap_or_default();

    (
        StatusCode::OK,
        Json(json!({
            "stake_intent_id": "stake_intent_42",
            "protocol": "ethereum",
            "network": network,
            "ethereum": {
                "unsigned_transaction": UNSIGNED_TX,
                "contract_address": contract,
                "stakes": [{"validator_public_key": "0xa1", "amount": "32000000000"}]
            }
        })),
    )
}

async fn stand_in_service() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/v1/ethereum/:network/stake-intents", post(create_intent))
        .with_state(seen.clone());
    (serve(app).await, seen)
}

fn deposit_request() -> StakeIntentRequest {
    StakeIntentRequest::single(U256::from(VALIDATOR_DEPOSIT_GWEI), TEST_ADDRESS)
}

#[tokio::test]
async fn test_create_stake_intent() {
    let (base_url, seen) = stand_in_service().await;
    let mut client = StakingClient::new(base_url);
    client.authenticate("stake-key");

    let response = client
        .create_stake_intent(Network::Holesky, &deposit_request())
        .await
        .unwrap();

    assert_eq!(response.stake_intent_id.as_deref(), Some("stake_intent_42"));
    assert_eq!(response.ethereum.unsigned_transaction, UNSIGNED_TX);
    assert_eq!(
        response.ethereum.contract_address,
        Network::Holesky.contract_address()
    );
    assert_eq!(response.extra["network"], "holesky");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "holesky");
    assert_eq!(seen[0].1.as_deref(), Some("stake-key"));
    assert_eq!(
        seen[0].2,
        json!({"stakes": [{"amount": "32000000000", "withdrawal_address": TEST_ADDRESS}]})
    );
}

#[tokio::test]
async fn test_unauthenticated_call_is_rejected() {
    let (base_url, seen) = stand_in_service().await;
    let client = StakingClient::new(base_url);

    let err = client
        .create_stake_intent(Network::Holesky, &deposit_request())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        StakingApiError::Unauthorized("Unauthorized: invalid api key".to_string())
    );
    assert_eq!(seen.lock().unwrap()[0].1, None);
}

#[tokio::test]
async fn test_error_statuses() {
    let app = Router::new()
        .route(
            "/v1/ethereum/holesky/stake-intents",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"title": "Bad Request", "detail": "stakes must not be empty"})),
                )
            }),
        )
        .route(
            "/v1/ethereum/mainnet/stake-intents",
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({"title": "Conflict", "detail": "Insufficient validators available"})),
                )
            }),
        )
        .route(
            "/v1/ethereum/mainnet/stake-intents/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable") }),
        );
    let base_url = serve(app).await;

    let mut client = StakingClient::new(base_url);
    client.authenticate("stake-key");

    let err = client
        .create_stake_intent(Network::Holesky, &StakeIntentRequest { stakes: vec![] })
        .await
        .unwrap_err();
    assert!(matches!(err, StakingApiError::InvalidRequest(ref m) if m.contains("stakes must not be empty")));

    let err = client
        .create_stake_intent(Network::Mainnet, &deposit_request())
        .await
        .unwrap_err();
    assert!(matches!(err, StakingApiError::InsufficientValidators(_)));

    let err = client
        .get_stake_intent(Network::Mainnet, "broken")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        StakingApiError::Server {
            status: 500,
            message: "database unavailable".to_string()
        }
    );
}

#[tokio::test]
async fn test_list_and_get_stake_intents() {
    let app = Router::new()
        .route(
            "/v1/ethereum/holesky/stake-intents",
            get(|| async { Json(json!({"data": [{"stake_intent_id": "a"}], "meta": {"total": 1}})) }),
        )
        .route(
            "/v1/ethereum/holesky/stake-intents/a",
            get(|| async {
                Json(json!({
                    "stake_intent_id": "a",
                    "ethereum": {"unsigned_transaction": "0x00", "contract_address": "0x01"}
                }))
            }),
        )
        .route(
            "/v1/ethereum/holesky/stake-intents/garbled",
            get(|| async { "not json" }),
        );
    let base_url = serve(app).await;
    let client = StakingClient::new(format!("{}/", base_url));

    let list = client.list_stake_intents(Network::Holesky).await.unwrap();
    assert_eq!(list["meta"]["total"], 1);

    let intent = client.get_stake_intent(Network::Holesky, "a").await.unwrap();
    assert_eq!(intent.stake_intent_id.as_deref(), Some("a"));

    let err = client
        .get_stake_intent(Network::Holesky, "garbled")
        .await
        .unwrap_err();
    assert!(matches!(err, StakingApiError::Decode(_)));
}

#[tokio::test]
async fn test_flow_against_stand_in_service() {
    let (base_url, seen) = stand_in_service().await;
    let log = EventLog::default();
    let mut config = test_config("holesky");
    config.staking_api_base_url = base_url;

    let chain = MockChain::new(log.clone(), U256::from(33u64) * U256::exp10(18));
    let mut staking = StakingClient::from_config(&config);
    let mut prompt = ScriptedPrompt::new(&[false, true, true]);
    let mut out = Vec::new();

    let report = StakeFlow::new(&config, &chain, &mut staking, &mut prompt, &mut out)
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcome, FlowOutcome::Completed);
    assert!(staking.is_authenticated());
    assert_eq!(seen.lock().unwrap().len(), 1);

    let sent = chain.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, Network::Holesky.contract_address());
    assert_eq!(sent[0].value, U256::from(32u64) * U256::exp10(18));
}

#[tokio::test]
async fn test_intent_id_stays_within_network() {
    let app = Router::new()
        .route(
            "/v1/ethereum/mainnet/stake-intents/x",
            get(|| async {
                Json(json!({
                    "stake_intent_id": "MAINNET",
                    "ethereum": {"unsigned_transaction": "0x00", "contract_address": "0x01"}
                }))
            }),
        )
        .route(
            "/v1/ethereum/holesky/stake-intents/:id",
            get(|Path(id): Path<String>| async move {
                Json(json!({
                    "stake_intent_id": id,
                    "ethereum": {"unsigned_transaction": "0x00", "contract_address": "0x02"}
                }))
            }),
        );
    let base_url = serve(app).await;
    let client = StakingClient::new(base_url);

    // The whole id reaches the holesky route as one segment
    let id = "../../mainnet/stake-intents/x";
    let intent = client.get_stake_intent(Network::Holesky, id).await.unwrap();
    assert_eq!(intent.stake_intent_id.as_deref(), Some(id));
    assert_eq!(intent.ethereum.contract_address, "0x02");

    let err = client
        .get_stake_intent(Network::Holesky, "..")
        .await
        .unwrap_err();
    assert!(matches!(err, StakingApiError::InvalidRequest(_)));
}
