//! Engine-level tests: store, matcher and body templating without a socket.

use std::path::PathBuf;
use std::sync::Arc;

use httpfile_mock::config::RoutesConfig;
use httpfile_mock::store::{MemoryFileReader, RouteStore, StoreError};
use httpfile_mock::{render_body, MatchRequest, RouteMatcher};

fn store_over(reader: MemoryFileReader) -> RouteStore {
    let config = RoutesConfig {
        directory: PathBuf::from("/mocks"),
        ..RoutesConfig::default()
    };
    RouteStore::with_reader(&config, Arc::new(reader))
}

fn scenario_reader() -> MemoryFileReader {
    MemoryFileReader::new()
        .with_file(
            "/mocks/testFile1.http",
            "GET /test1?param=value\n\n###\nGET http://anyurl.com/test3/{{paramId}}?param=value\n\n{\"id\":\"{paramId}\"}\n",
        )
        .with_file(
            "/mocks/testFile2.http",
            "PUT /test4/4?param={{pv1}}\nContent-Type: application/json\nStatus-Code: 201\n\n{\"message\":\"OK\",\"test\":\"{pv1}\"}\n",
        )
        .with_file("/mocks/notes.txt", "this is not a definition")
}

async fn serve(
    store: &RouteStore,
    method: &str,
    path: &str,
    query: &str,
) -> Option<(u16, String)> {
    let routes = store.get_routes().await.unwrap();
    let matcher = RouteMatcher::new();
    let request = MatchRequest::new(method, path, query);
    let result = matcher.match_request(&routes, &request);

    let route = result.route()?;
    let variables = result.variables()?;
    Some((route.status_code, render_body(&route.body, variables).into_owned()))
}

#[tokio::test]
async fn test_only_matching_files_are_loaded() {
    let store = store_over(scenario_reader());
    let routes = store.get_routes().await.unwrap();
    assert_eq!(routes.len(), 3);
    assert!(routes.iter().all(|r| r.file_name.ends_with(".http")));
}

#[tokio::test]
async fn test_exact_route_scenario() {
    let store = store_over(scenario_reader());
    assert_eq!(
        serve(&store, "GET", "/test1", "?param=value").await,
        Some((200, String::new()))
    );
}

#[tokio::test]
async fn test_path_variable_scenario() {
    let store = store_over(scenario_reader());
    assert_eq!(
        serve(&store, "GET", "/test3/1", "param=value").await,
        Some((200, r#"{"id":"1"}"#.to_string()))
    );
}

#[tokio::test]
async fn test_query_variable_scenario() {
    let store = store_over(scenario_reader());
    assert_eq!(
        serve(&store, "PUT", "/test4/4", "?param=param1Val").await,
        Some((201, r#"{"message":"OK","test":"param1Val"}"#.to_string()))
    );
}

#[tokio::test]
async fn test_no_match_cases() {
    let store = store_over(scenario_reader());
    assert_eq!(serve(&store, "DELETE", "/test1", "?param=value").await, None);
    assert_eq!(serve(&store, "GET", "/test1", "").await, None);
    assert_eq!(serve(&store, "GET", "/test1", "?param=other").await, None);
    assert_eq!(serve(&store, "GET", "/test3/1/extra", "?param=value").await, None);
    assert_eq!(serve(&store, "PUT", "/test4/4", "?param=x&more=y").await, None);
}

#[tokio::test]
async fn test_query_order_and_key_case_do_not_matter() {
    let reader = MemoryFileReader::new().with_file(
        "/mocks/q.http",
        "GET /search?q={{term}}&page={{page}}\n\n{term}:{page}\n",
    );
    let store = store_over(reader);

    assert_eq!(
        serve(&store, "GET", "/search", "?PAGE=2&q=rust").await,
        Some((200, "rust:2".to_string()))
    );
}

#[tokio::test]
async fn test_first_definition_wins() {
    let reader = MemoryFileReader::new()
        .with_file("/mocks/a.http", "GET /items/{{id}}\n\nvariable {id}\n")
        .with_file("/mocks/b.http", "GET /items/7\n\nliteral\n");
    let store = store_over(reader);

    assert_eq!(
        serve(&store, "GET", "/items/7", "").await,
        Some((200, "variable 7".to_string()))
    );
}

#[tokio::test]
async fn test_captured_values_render_verbatim() {
    let reader = MemoryFileReader::new().with_file(
        "/mocks/v.http",
        "GET /echo/{{a}}/{{b}}\n\n[{a}] [{b}] [{missing}]\n",
    );
    let store = store_over(reader);

    let cases = [
        ("x", "y", "y"),
        ("{b}", "1", "1"),
        ("with space", "%20", " "),
        ("UPPER", "", ""),
    ];
    for (a, b, decoded_b) in cases {
        let path = format!("/echo/{}/{}", a, b);
        assert_eq!(
            serve(&store, "GET", &path, "").await,
            Some((200, format!("[{}] [{}] [{{missing}}]", a, decoded_b)))
        );
    }
}

#[tokio::test]
async fn test_format_error_reports_file_and_line() {
    let reader = scenario_reader().with_file(
        "/mocks/zz_broken.http",
        "GET /fine\n\nbody\n###\n\n# comment\n!!broken\n",
    );
    let store = store_over(reader);

    match store.get_routes().await {
        Err(StoreError::Format(e)) => {
            assert_eq!(e.file, "zz_broken.http");
            assert_eq!(e.line, 7);
        }
        other => panic!("expected a format error, got {other:?}"),
    }
}
