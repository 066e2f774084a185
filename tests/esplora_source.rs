use mizan::FetchError;
use mizan::config::EsploraConfig;
use mizan::source::EsploraClient;
use mizan::source::TransactionSource;
use serde_json::Value;
use serde_json::json;
use test_log::test;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

const ADDRESS: &str = "bc1qqueried";

fn client_for(
    server: &MockServer,
    cache_ttl_secs: u64,
) -> EsploraClient {
    let config = EsploraConfig {
        base_url: server.uri(),
        rate_limit: 1_000,
        max_attempts: 3,
        base_retry_delay_ms: 1,
        max_retry_delay_ms: 5,
        cache_ttl_secs,
        ..EsploraConfig::default()
    };
    EsploraClient::new(config).unwrap()
}

fn confirmed_tx(
    txid: &str,
    block_time: i64,
) -> Value {
    json!({
        "txid": txid,
        "vin": [
            {"prevout": {"scriptpubkey_address": "bc1qsender", "scriptpubkey_type": "v0_p2wpkh", "value": 60000}, "is_coinbase": false}
        ],
        "vout": [
            {"scriptpubkey_address": ADDRESS, "scriptpubkey_type": "v0_p2wpkh", "value": 50000},
            {"scriptpubkey_address": "bc1qsender", "scriptpubkey_type": "v0_p2wpkh", "value": 9000}
        ],
        "fee": 1000,
        "status": {"confirmed": true, "block_height": 800000, "block_time": block_time}
    })
}

fn page(
    prefix: &str,
    count: usize,
) -> Value {
    Value::Array((0..count).map(|i| confirmed_tx(&format!("{prefix}{i}"), 1_700_000_000 - i as i64)).collect())
}

#[test(tokio::test)]
async fn follows_chain_pagination_until_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page("a", 25)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs/chain/a24")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page("b", 25)))
        .expect(1)
        .mount(&server)
        .await;

    let transactions = client_for(&server, 0).fetch_transactions(ADDRESS, 30).await.unwrap();

    assert_eq!(transactions.len(), 30);
    assert_eq!(transactions[0].id, "a0");
    assert_eq!(transactions[29].id, "b4");
    assert_eq!(transactions[0].fee, Some(1_000));
    assert!(transactions[0].is_confirmed());
}

#[test(tokio::test)]
async fn short_first_page_needs_no_more_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page("a", 3)))
        .expect(1)
        .mount(&server)
        .await;

    let transactions = client_for(&server, 0).fetch_transactions(ADDRESS, 10).await.unwrap();
    assert_eq!(transactions.len(), 3);
}

#[test(tokio::test)]
async fn unknown_address_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs")))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid Bitcoin address"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server, 0).fetch_transactions(ADDRESS, 10).await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidAddress(ref body) if body == "Invalid Bitcoin address"));
}

#[test(tokio::test)]
async fn retries_transient_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs")))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page("a", 2)))
        .mount(&server)
        .await;

    let transactions = client_for(&server, 0).fetch_transactions(ADDRESS, 10).await.unwrap();
    assert_eq!(transactions.len(), 2);
}

#[test(tokio::test)]
async fn persistent_throttling_surfaces_as_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs")))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let err = client_for(&server, 0).fetch_transactions(ADDRESS, 10).await.unwrap_err();
    assert!(matches!(err, FetchError::RateLimited { attempts: 3 }));
}

#[test(tokio::test)]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs")))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server, 0).fetch_transactions(ADDRESS, 10).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 403, .. }));
}

#[test(tokio::test)]
async fn cached_responses_skip_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page("a", 2)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 300);
    let first = client.fetch_transactions(ADDRESS, 10).await.unwrap();
    let second = client.fetch_transactions(ADDRESS, 10).await.unwrap();
    assert_eq!(first, second);
}

#[test(tokio::test)]
async fn address_summary_combines_chain_and_mempool() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": ADDRESS,
            "chain_stats": {"funded_txo_count": 2, "funded_txo_sum": 150000, "spent_txo_count": 1, "spent_txo_sum": 100000, "tx_count": 3},
            "mempool_stats": {"funded_txo_count": 1, "funded_txo_sum": 5000, "spent_txo_count": 0, "spent_txo_sum": 0, "tx_count": 1}
        })))
        .mount(&server)
        .await;

    let summary = client_for(&server, 0).fetch_address_summary(ADDRESS).await.unwrap();
    assert_eq!(summary.address, ADDRESS);
    assert_eq!(summary.tx_count, 4);
    assert_eq!(summary.balance_satoshis(), 55_000);
}

#[test(tokio::test)]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server, 0).fetch_transactions(ADDRESS, 10).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[test(tokio::test)]
async fn undecodable_transaction_is_dropped_alone() {
    let server = MockServer::start().await;
    let mut negative = confirmed_tx("bad", 1_700_000_000);
    negative["vin"][0]["prevout"]["value"] = json!(-1);
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([confirmed_tx("good", 1_700_000_100), negative])))
        .expect(1)
        .mount(&server)
        .await;

    let transactions = client_for(&server, 0).fetch_transactions(ADDRESS, 10).await.unwrap();
    let ids: Vec<_> = transactions.iter().map(|tx| tx.id.as_str()).collect();
    assert_eq!(ids, vec!["good"]);
}

#[test(tokio::test)]
async fn dropped_transaction_still_advances_pagination() {
    let server = MockServer::start().await;
    let mut first = page("a", 25);
    first[24]["vout"][0]["value"] = json!(-1);
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(first))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs/chain/a24")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page("b", 3)))
        .expect(1)
        .mount(&server)
        .await;

    let transactions = client_for(&server, 0).fetch_transactions(ADDRESS, 50).await.unwrap();
    assert_eq!(transactions.len(), 27);
    assert_eq!(transactions[23].id, "a23");
    assert_eq!(transactions[24].id, "b0");
}

#[test(tokio::test)]
async fn single_attempt_budget_never_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/address/{ADDRESS}/txs")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let config = EsploraConfig {
        base_url: server.uri(),
        rate_limit: 1_000,
        max_attempts: 1,
        base_retry_delay_ms: 1,
        max_retry_delay_ms: 5,
        cache_ttl_secs: 0,
        ..EsploraConfig::default()
    };
    let err = EsploraClient::new(config).unwrap().fetch_transactions(ADDRESS, 10).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 503, .. }));
}
