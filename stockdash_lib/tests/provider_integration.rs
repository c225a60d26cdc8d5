use stockdash_lib::{
    load_dashboard, DashboardConfig, DashboardError, LookbackPeriod, MarketDataProvider,
    ProviderError, SeriesError, YahooProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHART_AAPL: &str = include_str!("../../stockdash_api/tests/fixtures/chart_aapl.json");
const CHART_EMPTY: &str = include_str!("../../stockdash_api/tests/fixtures/chart_empty.json");
const CHART_NOT_FOUND: &str =
    include_str!("../../stockdash_api/tests/fixtures/chart_not_found.json");
const SUMMARY_AAPL: &str =
    include_str!("../../stockdash_api/tests/fixtures/quote_summary_aapl.json");

async fn mount_chart(server: &MockServer, symbol: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v8/finance/chart/{}", symbol)))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_summary(server: &MockServer, symbol: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/test/getcrumb"))
        .respond_with(ResponseTemplate::new(200).set_body_string("crumb42"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v10/finance/quoteSummary/{}", symbol)))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

// ============================================================================
// YahooProvider
// ============================================================================

#[tokio::test]
async fn fetch_history_flattens_chart() {
    let server = MockServer::start().await;
    mount_chart(&server, "AAPL", 200, CHART_AAPL).await;

    let provider = YahooProvider::with_base_url(&server.uri());
    let bars = provider
        .fetch_history("AAPL", LookbackPeriod::FiveYears)
        .await
        .unwrap();

    assert_eq!(bars.len(), 6);
    assert_eq!(bars[0].close, Some(194.03));
    assert_eq!(bars[2].close, None);
    assert_eq!(bars[5].volume, Some(97262100));
}

#[tokio::test]
async fn fetch_history_sends_lookback_as_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/AAPL"))
        .and(query_param("range", "6mo"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHART_AAPL))
        .expect(1)
        .mount(&server)
        .await;

    let provider = YahooProvider::with_base_url(&server.uri());
    let result = provider
        .fetch_history("AAPL", LookbackPeriod::SixMonths)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn fetch_history_404_is_unknown_symbol() {
    let server = MockServer::start().await;
    mount_chart(&server, "NOPE", 404, CHART_NOT_FOUND).await;

    let provider = YahooProvider::with_base_url(&server.uri());
    let err = provider
        .fetch_history("NOPE", LookbackPeriod::OneYear)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::UnknownSymbol(ref s) if s == "NOPE"));
}

#[tokio::test]
async fn fetch_history_429_is_rate_limited() {
    let server = MockServer::start().await;
    mount_chart(&server, "AAPL", 429, "Too Many Requests").await;

    let provider = YahooProvider::with_base_url(&server.uri());
    let err = provider
        .fetch_history("AAPL", LookbackPeriod::OneYear)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn fetch_history_without_rows_is_no_data() {
    let server = MockServer::start().await;
    mount_chart(&server, "NEWCO", 200, CHART_EMPTY).await;

    let provider = YahooProvider::with_base_url(&server.uri());
    let err = provider
        .fetch_history("NEWCO", LookbackPeriod::OneYear)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::NoData(_)));
}

#[tokio::test]
async fn fetch_profile_reads_all_modules() {
    let server = MockServer::start().await;
    mount_summary(&server, "AAPL", 200, SUMMARY_AAPL).await;

    let provider = YahooProvider::with_base_url(&server.uri());
    let profile = provider.fetch_profile("AAPL").await.unwrap();
    assert_eq!(profile.name.as_deref(), Some("Apple Inc."));
    assert_eq!(profile.market_cap, Some(3019137458176));
}

// ============================================================================
// load_dashboard end to end
// ============================================================================

#[tokio::test]
async fn dashboard_from_mock_server() {
    let server = MockServer::start().await;
    mount_chart(&server, "AAPL", 200, CHART_AAPL).await;
    mount_summary(&server, "AAPL", 200, SUMMARY_AAPL).await;

    let provider = YahooProvider::with_base_url(&server.uri());
    let config = DashboardConfig::parse("aapl", "5y").unwrap();
    let dash = load_dashboard(&provider, &config).await.unwrap();

    // The bar with a null close is dropped.
    assert_eq!(dash.series.len(), 5);
    assert!(dash.series.bars().iter().all(|b| b.sma20.is_none()));

    let latest = dash.latest.unwrap();
    assert_eq!(latest.last_close, 193.12);
    assert_eq!(latest.previous_close, 196.89);
    assert!((latest.delta - (193.12 - 196.89)).abs() < 1e-9);
    assert!(latest.delta_percent.unwrap() < 0.0);
    assert_eq!(dash.profile.sector.as_deref(), Some("Technology"));
}

#[tokio::test]
async fn dashboard_survives_profile_failure() {
    let server = MockServer::start().await;
    mount_chart(&server, "AAPL", 200, CHART_AAPL).await;
    mount_summary(&server, "AAPL", 500, "Internal Server Error").await;

    let provider = YahooProvider::with_base_url(&server.uri());
    let config = DashboardConfig::default();
    let dash = load_dashboard(&provider, &config).await.unwrap();
    assert!(dash.profile.is_empty());
    assert_eq!(dash.series.len(), 5);
}

#[tokio::test]
async fn fetch_profile_invalid_crumb_is_unauthorized() {
    let server = MockServer::start().await;
    mount_summary(
        &server,
        "AAPL",
        401,
        r#"{"finance":{"error":{"code":"Unauthorized","description":"Invalid Crumb"}}}"#,
    )
    .await;

    let provider = YahooProvider::with_base_url(&server.uri());
    let err = provider.fetch_profile("AAPL").await.unwrap_err();
    assert!(matches!(err, ProviderError::Unauthorized(ref m) if m.contains("Invalid Crumb")));
}

#[tokio::test]
async fn dashboard_survives_rejected_crumb() {
    let server = MockServer::start().await;
    mount_chart(&server, "AAPL", 200, CHART_AAPL).await;
    mount_summary(&server, "AAPL", 401, "Invalid Crumb").await;

    let provider = YahooProvider::with_base_url(&server.uri());
    let dash = load_dashboard(&provider, &DashboardConfig::default())
        .await
        .unwrap();
    assert!(dash.profile.is_empty());
    assert!(dash.latest.is_some());
}

#[tokio::test]
async fn dashboard_all_null_closes_is_empty_series() {
    let server = MockServer::start().await;
    let mut chart: serde_json::Value = serde_json::from_str(CHART_AAPL).unwrap();
    chart["chart"]["result"][0]["indicators"]["quote"][0]["close"] =
        serde_json::json!([null, null, null, null, null, null]);
    mount_chart(&server, "AAPL", 200, &chart.to_string()).await;

    let provider = YahooProvider::with_base_url(&server.uri());
    let err = load_dashboard(&provider, &DashboardConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::Series(SeriesError::EmptySeries)));
    assert_eq!(err.user_message(), "No data found.");
}

#[tokio::test]
async fn dashboard_unknown_symbol_message() {
    let server = MockServer::start().await;
    mount_chart(&server, "ZZZZ", 404, CHART_NOT_FOUND).await;

    let provider = YahooProvider::with_base_url(&server.uri());
    let config = DashboardConfig::parse("zzzz", "1y").unwrap();
    let err = load_dashboard(&provider, &config).await.unwrap_err();
    assert!(err.user_message().contains("ZZZZ"));
}
