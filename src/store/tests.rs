use serde_json::json;
use wiremock::matchers::{body_partial_json, header, headers, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::supabase::parse_exact_count;
use super::{Domain, QueryLogEntry, SearchOptions, StoredDocument, StoreError, SupabaseStore};

fn store(server: &MockServer) -> SupabaseStore {
    SupabaseStore::new(server.uri(), "anon".to_string(), "service".to_string())
}

fn options() -> SearchOptions {
    SearchOptions {
        match_count: 5,
        match_threshold: 0.5,
    }
}

fn document(content: &str) -> StoredDocument {
    StoredDocument {
        source_table: Domain::Facility.source_table().to_string(),
        source_id: "42-location_info".to_string(),
        content: content.to_string(),
        embedding: vec![0.1, 0.2],
    }
}

#[test]
fn content_range_totals_parse_in_both_forms() {
    assert_eq!(parse_exact_count("0-24/3573"), Some(3573));
    assert_eq!(parse_exact_count("*/0"), Some(0));
    assert_eq!(parse_exact_count("0-4/5"), Some(5));
    assert_eq!(parse_exact_count("garbage"), None);
    assert_eq!(parse_exact_count("0-24/*"), None);
}

#[test]
fn domains_map_to_their_tables() {
    assert_eq!(Domain::Facility.source_table(), "publicFacilities");
    assert_eq!(Domain::News.source_table(), "gunsan_news");
    assert_eq!(Domain::Facility.as_str(), "facility");
    assert_eq!(Domain::News.as_str(), "news");
}

#[tokio::test]
async fn upsert_keys_on_source_id_with_merge_resolution() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/chatbot_embeddings"))
        .and(query_param("on_conflict", "source_id"))
        .and(headers("Prefer", vec!["resolution=merge-duplicates", "return=minimal"]))
        .and(header("apikey", "service"))
        .and(body_partial_json(json!([{
            "source_table": "publicFacilities",
            "source_id": "42-location_info",
        }])))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let store = store(&server);
    store.upsert_document(&document("first version")).await.unwrap();
    store.upsert_document(&document("second version")).await.unwrap();
}

#[tokio::test]
async fn hybrid_search_calls_the_domain_procedure_with_the_service_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/hybrid_search_facilities"))
        .and(header("apikey", "service"))
        .and(header("authorization", "Bearer service"))
        .and(body_partial_json(json!({
            "query_text": "수영장 어디 있어?",
            "match_count": 5,
            "match_threshold": 0.5,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"content": "군산수영장의 종류는 체육시설이며, 주소는 수송로 1입니다.", "score": 0.91},
            {"content": "군산수영장의 운영 시간 정보입니다.", "score": 0.77},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let results = store(&server)
        .hybrid_search(Domain::Facility, "수영장 어디 있어?", &[0.1, 0.2], &options())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].content.contains("수송로 1"));
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn news_domain_routes_to_the_news_procedure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/hybrid_search_news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let results = store(&server)
        .hybrid_search(Domain::News, "축제 소식", &[0.3], &options())
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn place_names_read_with_the_anon_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/administrative_welfare_centers"))
        .and(query_param("select", "name"))
        .and(header("apikey", "anon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "수송동"},
            {"name": "나운동"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let names = store(&server).list_place_names().await.unwrap();
    assert_eq!(names, vec!["수송동".to_string(), "나운동".to_string()]);
}

#[tokio::test]
async fn facility_count_reads_the_content_range_header() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/rest/v1/publicFacilities"))
        .and(query_param("select", "*"))
        .and(query_param("spot", "eq.수송동"))
        .and(header("Prefer", "count=exact"))
        .and(header("apikey", "anon"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-range", "0-24/25"))
        .expect(1)
        .mount(&server)
        .await;

    let count = store(&server).count_facilities_at("수송동").await.unwrap();
    assert_eq!(count, 25);
}

#[tokio::test]
async fn missing_content_range_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/rest/v1/publicFacilities"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = store(&server).count_facilities_at("수송동").await.unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}

#[tokio::test]
async fn rejected_writes_surface_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/chatbot_embeddings"))
        .respond_with(ResponseTemplate::new(401).set_body_string("permission denied"))
        .mount(&server)
        .await;

    let err = store(&server).upsert_document(&document("x")).await.unwrap_err();
    match err {
        StoreError::Rejected { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, "permission denied");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn query_log_inserts_one_row_with_the_service_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/chatbot_query_logs"))
        .and(header("Prefer", "return=minimal"))
        .and(header("apikey", "service"))
        .and(body_partial_json(json!([{
            "query": "수영장 어디 있어?",
            "route": "facility",
            "result_count": 2,
        }])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let entry = QueryLogEntry {
        query: "수영장 어디 있어?".to_string(),
        route: "facility".to_string(),
        result_count: 2,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    store(&server).insert_query_log(&entry).await.unwrap();
}
