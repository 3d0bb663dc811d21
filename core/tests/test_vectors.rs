//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and either an expected envelope or an expected API error. Comparing parsed
//! JSON (not raw strings) avoids false negatives from field-ordering
//! differences.

use account_core::{Account, AccountClient, AccountResponse, ApiError, HttpMethod, HttpRequest, HttpResponse};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080";

fn client() -> AccountClient {
    AccountClient::new(BASE_URL).unwrap()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_envelope(name: &str, envelope: &AccountResponse, expected: &Value) {
    assert_eq!(
        u64::from(envelope.status_code),
        expected["status_code"].as_u64().unwrap(),
        "{name}: status code"
    );
    assert_eq!(&serde_json::to_value(envelope).unwrap(), &expected["envelope"], "{name}: envelope");
}

/// Check a parse outcome against `expected_result` or `expected_error`.
fn assert_outcome(name: &str, case: &Value, outcome: Result<AccountResponse, ApiError>) {
    match (outcome, case.get("expected_result"), case.get("expected_error")) {
        (Ok(envelope), Some(expected), None) => assert_envelope(name, &envelope, expected),
        (Err(ApiError::ApiCall(envelope)), None, Some(expected)) => {
            assert_envelope(name, &envelope, expected)
        }
        (outcome, _, _) => panic!("{name}: unexpected outcome {outcome:?}"),
    }
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: Account = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let outcome = c.parse_create(simulated_response(&case));
        assert_outcome(name, &case, outcome);
    }
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

#[test]
fn fetch_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/fetch.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();

        let req = c.build_fetch(id).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let outcome = c.parse_fetch(simulated_response(&case));
        assert_outcome(name, &case, outcome);
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();
        let version = case["input_version"].as_i64().unwrap();

        let req = c.build_delete(id, version).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let outcome = c.parse_delete(simulated_response(&case));
        assert_outcome(name, &case, outcome);
    }
}
