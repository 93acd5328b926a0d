mod common;

use cloudmusic_api::{BROWSER_UA, Error, Form, RECONNECTION, SessionToken, Transport};
use common::{json, setup};
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, Request, ResponseTemplate};

#[tokio::test]
async fn accepted_codes_return_the_body() {
    let (server, transport) = setup().await;
    for (route, code) in [("/api/ok", 200), ("/api/step", 803)] {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(json(json!({ "code": code, "value": route })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let body = transport.post("/api/ok", &Form::new(), None).await.unwrap();
    assert_eq!(body["value"], "/api/ok");
    let body = transport.post("/api/step", &Form::new(), None).await.unwrap();
    assert_eq!(body["code"], 803);
}

#[tokio::test]
async fn unaccepted_code_is_retried_until_exhausted() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/song/detail"))
        .respond_with(json(json!({ "code": 400, "msg": "bad" })))
        .expect(u64::from(RECONNECTION) + 1)
        .mount(&server)
        .await;

    let err = transport
        .post("/api/v3/song/detail", &Form::new(), None)
        .await
        .unwrap_err();
    match &err {
        Error::ConnectionExhausted { path, source } => {
            assert_eq!(path, "/api/v3/song/detail");
            assert!(matches!(**source, Error::BadCode { code: 400, .. }));
        }
        other => panic!("expected exhaustion, got {other:?}"),
    }
    assert_eq!(err.code(), Some(400));
}

#[tokio::test]
async fn transient_failure_then_success() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/flaky"))
        .respond_with(json(json!({ "code": 200 })))
        .expect(1)
        .mount(&server)
        .await;

    let body = transport.post("/api/flaky", &Form::new(), None).await.unwrap();
    assert_eq!(body["code"], 200);
}

#[tokio::test]
async fn unreachable_host_is_exhausted() {
    let transport = Transport::with_client(reqwest::Client::new(), "http://127.0.0.1:1");
    let err = transport.post("/api/any", &Form::new(), None).await.unwrap_err();
    match err {
        Error::ConnectionExhausted { source, .. } => assert!(matches!(*source, Error::Http(_))),
        other => panic!("expected exhaustion, got {other:?}"),
    }
}

#[tokio::test]
async fn business_policy_does_not_retry_codes() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(json(json!({ "code": 502, "msg": "wrong password" })))
        .expect(1)
        .mount(&server)
        .await;

    let err = transport
        .post_login("/api/login", &Form::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BadCode { code: 502, .. }));
}

#[tokio::test]
async fn sends_cookie_real_ip_and_form_body() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/echo"))
        .and(header("cookie", "MUSIC_U=abc; __csrf=x"))
        .and(header("x-real-ip", "116.25.146.177"))
        .and(header("x-forwarded-for", "116.25.146.177"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("referer", "https://music.163.com"))
        .and(|req: &Request| {
            req.headers.get("user-agent").and_then(|v| v.to_str().ok()) == Some(BROWSER_UA)
        })
        .and(body_string("id=42&total=true"))
        .respond_with(json(json!({ "code": 200 })))
        .expect(1)
        .mount(&server)
        .await;

    transport.set_real_ip("116.25.146.177");
    let token = SessionToken::new("MUSIC_U=abc; __csrf=x");
    let form = Form::new().param("id", 42).param("total", true);
    transport.post("/api/echo", &form, Some(&token)).await.unwrap();
}

#[tokio::test]
async fn login_reply_collects_set_cookie() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            json(json!({ "code": 200 }))
                .append_header("set-cookie", "MUSIC_U=tok; Max-Age=1296000; Path=/")
                .append_header("set-cookie", "__csrf=c; Path=/"),
        )
        .mount(&server)
        .await;

    let reply = transport
        .post_login("/api/login", &Form::new(), None)
        .await
        .unwrap();
    assert_eq!(reply.token.as_str(), "MUSIC_U=tok; __csrf=c");
    assert_eq!(reply.code(), Some(200));
}
