//! # `ExanteClient` Integration Tests
//!
//! Each test starts a throwaway HTTP server on a random local port, points
//! the client at it and checks both the request that went out (path, query,
//! bearer header) and how the canned response was turned into a value.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use percent_encoding::percent_decode_str;
use serde_json::{json, Value};

use lib_common::configs::config_exante::{ExanteConfig, MissingFieldPolicy};
use lib_common::markets::exante::{Endpoint, ExanteClient, ExanteError, OhlcBar};

const TOKEN: &str = "test-token-123";

/// Serves the given `(status, body)` pairs, one per connection, in order.
struct MockServer {
    host: String,
    handle: JoinHandle<Vec<String>>,
}

impl MockServer {
    fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().expect("accept failed");
                requests.push(read_request_head(&mut stream));

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
            requests
        });

        Self {
            host: format!("http://127.0.0.1:{}", port),
            handle,
        }
    }

    fn client(&self, policy: MissingFieldPolicy) -> ExanteClient {
        let config = ExanteConfig::new(TOKEN)
            .with_host(self.host.clone())
            .with_missing_field(policy);
        ExanteClient::new(&config).unwrap()
    }

    /// Waits for the server thread and returns the request heads it saw.
    fn finish(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

fn read_request_head(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn request_line(head: &str) -> &str {
    head.lines().next().unwrap_or_default()
}

fn request_target(head: &str) -> &str {
    request_line(head).split(' ').nth(1).unwrap_or_default()
}

fn assert_bearer(head: &str) {
    let expected = format!("authorization: bearer {}", TOKEN.to_ascii_lowercase());
    assert!(
        head.to_ascii_lowercase().contains(&expected),
        "no bearer header in:\n{}",
        head
    );
}

#[test]
fn cross_rate_returns_rate_and_sends_bearer_token() {
    let server = MockServer::start(vec![(200, r#"{"rate": 1.23, "pair": "EUR/USD"}"#)]);
    let client = server.client(MissingFieldPolicy::Error);

    let rate = client.cross_rate("EUR", "USD").unwrap();
    assert_eq!(rate, json!(1.23));

    let requests = server.finish();
    assert_eq!(request_line(&requests[0]), "GET /md/1.0/crossrates/EUR/USD HTTP/1.1");
    assert_bearer(&requests[0]);
}

#[test]
fn ohlc_field_encodes_symbol_and_reads_first_bar() {
    let server = MockServer::start(vec![(
        200,
        r#"[{"timestamp": 1481565600000, "open": 1.05, "close": 1.0633}, {"close": 9.99}]"#,
    )]);
    let client = server.client(MissingFieldPolicy::Error);

    let close = client.ohlc_field("EUR/USD.E.FX", 60, "close").unwrap();
    assert_eq!(close, json!(1.0633));

    let requests = server.finish();
    let target = request_target(&requests[0]);
    assert_eq!(target, "/md/1.0/ohlc/EUR%2FUSD.E.FX/60?size=1");

    let symbol_segment = target.split('/').nth(4).unwrap();
    assert_eq!(percent_decode_str(symbol_segment).decode_utf8().unwrap(), "EUR/USD.E.FX");
}

#[test]
fn mid_price_matches_one_minute_close() {
    let body = r#"[{"open": 101.5, "high": 102, "low": 101, "close": 101.75}]"#;
    let server = MockServer::start(vec![(200, body), (200, body)]);
    let client = server.client(MissingFieldPolicy::Error);

    let mid = client.mid_price("AAPL.NASDAQ").unwrap();
    let close = client.ohlc_field("AAPL.NASDAQ", 60, "close").unwrap();
    assert_eq!(mid, close);
    assert_eq!(mid, json!(101.75));

    let requests = server.finish();
    assert_eq!(request_line(&requests[0]), request_line(&requests[1]));
    assert_eq!(request_target(&requests[0]), "/md/1.0/ohlc/AAPL.NASDAQ/60?size=1");
}

#[test]
fn symbol_field_routes_specification_fields() {
    let server = MockServer::start(vec![
        (200, r#"{"lotSize": "1", "leverage": "0.2"}"#),
        (200, r#"{"description": "Apple Inc.", "exchange": "NASDAQ"}"#),
        (200, r#"{"units": "USD"}"#),
    ]);
    let client = server.client(MissingFieldPolicy::Error);

    assert_eq!(client.symbol_field("AAPL.NASDAQ", "lotSize").unwrap(), json!("1"));
    assert_eq!(client.symbol_field("AAPL.NASDAQ", "description").unwrap(), json!("Apple Inc."));
    assert_eq!(client.symbol_field("ES.CME.H2025", "units").unwrap(), json!("USD"));

    let requests = server.finish();
    assert_eq!(request_target(&requests[0]), "/md/1.0/symbols/AAPL.NASDAQ/specification");
    assert_eq!(request_target(&requests[1]), "/md/1.0/symbols/AAPL.NASDAQ");
    assert_eq!(request_target(&requests[2]), "/md/1.0/symbols/ES.CME.H2025/specification");
    requests.iter().for_each(|head| assert_bearer(head));
}

#[test]
fn group_lookups_hit_group_resources() {
    let server = MockServer::start(vec![
        (200, r#"{"name": "RTS-USD/RUB", "group": "Si"}"#),
        (200, r#"{"id": "Si.FORTS.H2025", "expiration": 1742515200000}"#),
    ]);
    let client = server.client(MissingFieldPolicy::Error);

    assert_eq!(client.group_field("Si", "name").unwrap(), json!("RTS-USD/RUB"));
    assert_eq!(client.nearest_group_field("Si", "id").unwrap(), json!("Si.FORTS.H2025"));

    let requests = server.finish();
    assert_eq!(request_target(&requests[0]), "/md/1.0/groups/Si");
    assert_eq!(request_target(&requests[1]), "/md/1.0/groups/Si/nearest");
    requests.iter().for_each(|head| assert_bearer(head));
}

#[test]
fn not_found_is_a_status_error_for_every_operation() {
    let body = r#"{"message": "symbol not found"}"#;
    let server = MockServer::start(vec![(404, body); 6]);
    let client = server.client(MissingFieldPolicy::Empty);

    let results = vec![
        client.cross_rate("EUR", "XXX"),
        client.group_field("nope", "name"),
        client.nearest_group_field("nope", "id"),
        client.ohlc_field("NOPE.NASDAQ", 60, "open"),
        client.symbol_field("NOPE.NASDAQ", "leverage"),
        client.mid_price("NOPE.NASDAQ"),
    ];

    for result in results {
        match result {
            Err(ExanteError::Status { status, body: text, .. }) => {
                assert_eq!(status, 404);
                assert_eq!(text, body);
            }
            other => panic!("expected 404 status error, got {:?}", other),
        }
    }
    assert_eq!(server.finish().len(), 6);
}

#[test]
fn missing_field_fails_consistently_under_error_policy() {
    let server = MockServer::start(vec![
        (200, r#"{"pair": "EUR/USD"}"#),
        (200, r#"{"name": "Si"}"#),
        (200, r#"{"id": "Si.FORTS.H2025"}"#),
        (200, r#"[{"open": 1.0}]"#),
        (200, r#"{"description": "x"}"#),
        (200, r#"[{"open": 1.0}]"#),
    ]);
    let client = server.client(MissingFieldPolicy::Error);

    let results = vec![
        client.cross_rate("EUR", "USD"),
        client.group_field("Si", "missing"),
        client.nearest_group_field("Si", "missing"),
        client.ohlc_field("EUR/USD.E.FX", 60, "close"),
        client.symbol_field("AAPL.NASDAQ", "missing"),
        client.mid_price("EUR/USD.E.FX"),
    ];

    for result in results {
        let err = result.unwrap_err();
        assert!(matches!(err, ExanteError::FieldNotFound { .. }), "got {:?}", err);
        assert!(err.is_missing_data());
    }
    server.finish();
}

#[test]
fn missing_field_is_empty_under_empty_policy() {
    let server = MockServer::start(vec![
        (200, r#"{"pair": "EUR/USD"}"#),
        (200, r#"{"name": "Si"}"#),
        (200, r#"{"id": "Si.FORTS.H2025"}"#),
        (200, r#"[{"open": 1.0}]"#),
        (200, r#"{"description": "x"}"#),
        (200, r#"[]"#),
    ]);
    let client = server.client(MissingFieldPolicy::Empty);

    let results = vec![
        client.cross_rate("EUR", "USD"),
        client.group_field("Si", "missing"),
        client.nearest_group_field("Si", "missing"),
        client.ohlc_field("EUR/USD.E.FX", 60, "close"),
        client.symbol_field("AAPL.NASDAQ", "missing"),
        client.mid_price("EUR/USD.E.FX"),
    ];

    for result in results {
        assert_eq!(result.unwrap(), Value::Null);
    }
    server.finish();
}

#[test]
fn empty_ohlc_array_is_an_empty_result() {
    let server = MockServer::start(vec![(200, "[]")]);
    let client = server.client(MissingFieldPolicy::Error);

    let err = client.ohlc_field("EUR/USD.E.FX", 3600, "high").unwrap_err();
    assert!(matches!(err, ExanteError::EmptyResult { .. }), "got {:?}", err);
    server.finish();
}

#[test]
fn ohlc_object_body_is_an_unexpected_shape() {
    let server = MockServer::start(vec![(200, r#"{"close": 1.0}"#)]);
    let client = server.client(MissingFieldPolicy::Empty);

    let err = client.ohlc_field("EUR/USD.E.FX", 60, "close").unwrap_err();
    assert!(matches!(err, ExanteError::UnexpectedShape { .. }), "got {:?}", err);
    server.finish();
}

#[test]
fn unparsable_body_is_a_parse_error() {
    let server = MockServer::start(vec![(200, "<html>maintenance</html>")]);
    let client = server.client(MissingFieldPolicy::Empty);

    match client.cross_rate("EUR", "USD") {
        Err(ExanteError::Parse { body, .. }) => assert_eq!(body, "<html>maintenance</html>"),
        other => panic!("expected parse error, got {:?}", other),
    }
    server.finish();
}

#[test]
fn closed_port_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ExanteConfig::new(TOKEN).with_host(format!("http://127.0.0.1:{}", port));
    let client = ExanteClient::new(&config).unwrap();

    let err = client.group_field("Si", "name").unwrap_err();
    assert!(matches!(err, ExanteError::Transport(_)), "got {:?}", err);
    assert_eq!(err.status(), None);
}

#[test]
fn ohlc_bar_is_typed() {
    let server = MockServer::start(vec![(
        200,
        r#"[{"timestamp": 1481565600000, "open": "1.0625", "high": "1.0640", "low": "1.0600", "close": "1.0633"}]"#,
    )]);
    let client = server.client(MissingFieldPolicy::Error);

    let bar: OhlcBar = client.ohlc_bar("EUR/USD.E.FX", 300).unwrap();
    assert_eq!(bar.timestamp, 1481565600000);
    assert_eq!(bar.open, 1.0625);
    assert_eq!(bar.close, 1.0633);

    let requests = server.finish();
    assert_eq!(request_target(&requests[0]), "/md/1.0/ohlc/EUR%2FUSD.E.FX/300?size=1");
}

#[test]
fn custom_prefix_is_respected() {
    let server = MockServer::start(vec![(200, r#"{"rate": "0.9"}"#)]);
    let config = ExanteConfig::new(TOKEN)
        .with_host(format!("{}/", server.host))
        .with_api_prefix("md/3.0");
    let client = ExanteClient::new(&config).unwrap();

    assert_eq!(client.cross_rate("USD", "EUR").unwrap(), json!("0.9"));

    let requests = server.finish();
    assert_eq!(request_target(&requests[0]), "/md/3.0/crossrates/USD/EUR");
}

#[test]
fn fetch_returns_the_whole_body() {
    let server = MockServer::start(vec![(200, r#"{"name": "Si", "exchange": "FORTS"}"#)]);
    let client = server.client(MissingFieldPolicy::Empty);
    assert_eq!(client.missing_field_policy(), MissingFieldPolicy::Empty);

    let body = client.fetch(&Endpoint::Group { group: "Si" }).unwrap();
    assert_eq!(body, json!({"name": "Si", "exchange": "FORTS"}));

    let requests = server.finish();
    assert_eq!(request_target(&requests[0]), "/md/1.0/groups/Si");
    assert_bearer(&requests[0]);
}

#[test]
fn dot_and_empty_parameters_fail_before_any_request() {
    // One canned reply; a request that slipped through would consume it.
    let server = MockServer::start(vec![(200, r#"{"rate": 1.0}"#)]);
    let client = server.client(MissingFieldPolicy::Empty);

    let results = vec![
        client.cross_rate("..", "USD"),
        client.cross_rate("EUR", "."),
        client.group_field("..", "name"),
        client.group_field("", "name"),
        client.nearest_group_field(".", "id"),
        client.ohlc_field("..", 60, "close"),
        client.symbol_field(".", "description"),
        client.symbol_field("..", "lotSize"),
        client.mid_price(""),
        client.fetch(&Endpoint::Symbol { symbol: ".." }),
    ];
    for result in results {
        assert!(matches!(result, Err(ExanteError::InvalidUrl(_))), "got {:?}", result);
    }
    assert!(matches!(client.ohlc_bar("..", 60), Err(ExanteError::InvalidUrl(_))));

    assert_eq!(client.cross_rate("EUR", "USD").unwrap(), json!(1.0));
    let requests = server.finish();
    assert_eq!(requests.len(), 1);
    assert_eq!(request_target(&requests[0]), "/md/1.0/crossrates/EUR/USD");
}
