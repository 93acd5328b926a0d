//! Shared fixtures for the mock-server tests.

#![allow(dead_code)]

use cloudmusic_api::{Login, Music163Api, SessionToken, Transport};
use serde_json::Value;
use std::sync::Arc;
use wiremock::{MockServer, ResponseTemplate};

/// A mock server and a transport pointed at it.
///
/// Each test builds its own `reqwest::Client` so pooled connections never
/// outlive the test's runtime.
pub async fn setup() -> (MockServer, Arc<Transport>) {
    let server = MockServer::start().await;
    let transport = Arc::new(Transport::with_client(reqwest::Client::new(), server.uri()));
    (server, transport)
}

pub fn api(transport: &Arc<Transport>, cookie: Option<&str>) -> Music163Api {
    Music163Api::with_transport(Arc::clone(transport), cookie.map(SessionToken::from))
}

pub fn login(transport: &Arc<Transport>) -> Login {
    Login::with_transport(Arc::clone(transport))
}

/// HTTP 200 with a JSON body.
pub fn json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// A song-detail entry in the current shape.
pub fn song(id: u64) -> Value {
    serde_json::json!({
        "id": id,
        "name": format!("song {id}"),
        "ar": [{ "id": 1, "name": "artist" }],
        "al": { "id": 2, "name": "album" },
        "dt": 200_000
    })
}
