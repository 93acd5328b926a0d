mod common;

use cloudmusic_api::{DEFAULT_COUNTRY_CODE, Error, PhoneCredential, md5_hex};
use common::{json, login, setup};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::Mock;

const POLL: Duration = Duration::from_millis(10);
const QR_PATH: &str = "/api/login/qrcode/client/login";

#[tokio::test]
async fn email_login_returns_token_and_client() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_string_contains("username=someone%40163.com"))
        .and(body_string_contains(&format!("password={}", md5_hex("secret"))))
        .and(body_string_contains("rememberLogin=true"))
        .respond_with(
            json(json!({ "code": 200, "account": { "id": 1 } }))
                .append_header("set-cookie", "MUSIC_U=u1; Path=/")
                .append_header("set-cookie", "__csrf=c1; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/w/nuser/account/get"))
        .and(header("cookie", "MUSIC_U=u1; __csrf=c1"))
        .respond_with(json(json!({
            "code": 200,
            "account": { "id": 1 },
            "profile": { "userId": 1, "nickname": "someone" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut login = login(&transport);
    let (token, api) = login.email("someone@163.com", "secret").await.unwrap();
    assert_eq!(token.get("MUSIC_U"), Some("u1"));
    assert_eq!(login.token(), Some(&token));
    assert_eq!(api.token(), Some(&token));
    assert_eq!(api.my().await.unwrap().profile.nickname, "someone");
}

#[tokio::test]
async fn rejected_email_login_is_not_retried() {
    for code in [501, 502] {
        let (server, transport) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(json(json!({ "code": code, "msg": "rejected" })))
            .expect(1)
            .mount(&server)
            .await;

        let mut login = login(&transport);
        let err = login.email("a@b.c", "x").await.unwrap_err();
        match err {
            Error::BadCode { code: got, body } => {
                assert_eq!(got, code);
                assert_eq!(body["msg"], "rejected");
            }
            other => panic!("expected BadCode, got {other:?}"),
        }
        assert!(login.token().is_none());
    }
}

#[tokio::test]
async fn captcha_rejection_is_surfaced_verbatim() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/sms/captcha/sent"))
        .and(body_string_contains("ctcode=86"))
        .and(body_string_contains("cellphone=123"))
        .respond_with(json(json!({ "code": 400, "message": "手机号格式错误" })))
        .expect(1)
        .mount(&server)
        .await;

    let err = login(&transport)
        .send_captcha("123", DEFAULT_COUNTRY_CODE)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(400));
}

#[tokio::test]
async fn captcha_is_sent_verbatim_and_password_hashed() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/login/cellphone"))
        .and(body_string_contains("captcha=4821"))
        .respond_with(json(json!({ "code": 200 })).append_header("set-cookie", "MUSIC_U=cap"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/login/cellphone"))
        .and(body_string_contains(&format!("password={}", md5_hex("pw"))))
        .respond_with(json(json!({ "code": 200 })).append_header("set-cookie", "MUSIC_U=pwd"))
        .expect(1)
        .mount(&server)
        .await;

    let mut login = login(&transport);
    let (token, _) = login
        .cellphone("13800000000", PhoneCredential::Captcha("4821"), "86")
        .await
        .unwrap();
    assert_eq!(token.as_str(), "MUSIC_U=cap");

    let (token, _) = login
        .cellphone("13800000000", PhoneCredential::Password("pw"), "86")
        .await
        .unwrap();
    assert_eq!(token.as_str(), "MUSIC_U=pwd");
}

#[tokio::test]
async fn wrong_captcha_is_a_bad_code() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/login/cellphone"))
        .respond_with(json(json!({ "code": 503 })))
        .expect(1)
        .mount(&server)
        .await;

    let err = login(&transport)
        .cellphone("13800000000", PhoneCredential::Captcha("0000"), "86")
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(503));
}

#[tokio::test]
async fn qr_key_builds_login_url() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/login/qrcode/unikey"))
        .and(body_string_contains("type=1"))
        .respond_with(json(json!({ "code": 200, "unikey": "3a1b-key" })))
        .mount(&server)
        .await;

    let (key, url) = login(&transport).qr_key().await.unwrap();
    assert_eq!(key, "3a1b-key");
    assert_eq!(url, "https://music.163.com/login?codekey=3a1b-key");
}

#[tokio::test]
async fn check_qr_reports_state_as_code() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path(QR_PATH))
        .respond_with(json(json!({ "code": 802, "message": "授权中" })))
        .expect(1)
        .mount(&server)
        .await;

    let err = login(&transport).check_qr("k").await.unwrap_err();
    assert_eq!(err.code(), Some(802));
}

#[tokio::test]
async fn qr_flow_polls_until_confirmed() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path(QR_PATH))
        .and(body_string_contains("key=k1"))
        .respond_with(json(json!({ "code": 801 })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(QR_PATH))
        .respond_with(json(json!({ "code": 802 })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(QR_PATH))
        .respond_with(json(json!({ "code": 803 })).append_header("set-cookie", "MUSIC_U=qr; Path=/"))
        .expect(1)
        .mount(&server)
        .await;

    let mut login = login(&transport);
    let (token, api) = login.qr("k1", POLL).await.unwrap();
    assert_eq!(token.as_str(), "MUSIC_U=qr");
    assert_eq!(api.token(), Some(&token));
    assert_eq!(login.token(), Some(&token));
}

#[tokio::test]
async fn qr_flow_returns_empty_token_on_expiry() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path(QR_PATH))
        .respond_with(json(json!({ "code": 801 })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(QR_PATH))
        .respond_with(json(json!({ "code": 800, "message": "二维码不存在或已过期" })))
        .expect(1)
        .mount(&server)
        .await;

    let (token, api) = login(&transport).qr("k2", POLL).await.unwrap();
    assert!(token.is_empty());
    assert_eq!(api.token(), Some(&token));
}

#[tokio::test]
async fn qr_flow_propagates_unknown_rejections() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path(QR_PATH))
        .respond_with(json(json!({ "code": 8821, "message": "risk control" })))
        .expect(1)
        .mount(&server)
        .await;

    let err = login(&transport).qr("k3", POLL).await.unwrap_err();
    assert_eq!(err.code(), Some(8821));
}

#[tokio::test]
async fn session_calls_send_current_token() {
    let (server, transport) = setup().await;
    for route in ["/api/login/token/refresh", "/api/logout", "/api/w/nuser/account/get"] {
        Mock::given(method("POST"))
            .and(path(route))
            .and(header("cookie", "MUSIC_U=old"))
            .respond_with(json(json!({ "code": 200, "route": route })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let login = cloudmusic_api::Login::with_token(transport, "MUSIC_U=old".into());
    assert_eq!(login.refresh_login().await.unwrap()["route"], "/api/login/token/refresh");
    assert_eq!(login.login_status().await.unwrap()["route"], "/api/w/nuser/account/get");
    assert_eq!(login.logout().await.unwrap()["route"], "/api/logout");
}

#[tokio::test]
async fn accepted_login_without_cookie_is_bad_data() {
    let (server, transport) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(json(json!({ "code": 200, "account": { "id": 1 } })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/login/cellphone"))
        .respond_with(json(json!({ "code": 200 })))
        .expect(1)
        .mount(&server)
        .await;

    let mut login = login(&transport);
    let err = login.email("a@b.c", "x").await.unwrap_err();
    assert!(matches!(err, Error::BadData(ref body) if body["account"]["id"] == 1));
    let err = login
        .cellphone("13800000000", PhoneCredential::Password("x"), "86")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BadData(_)));
    assert!(login.token().is_none());
}
