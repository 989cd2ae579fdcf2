//! MegaSigns operations against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port, then drives
//! `MegaSignsApi<UreqTransport>` over real HTTP. The first four tests follow
//! the form data scenarios: null and empty token, empty api user, empty and
//! null MegaSign id, and the successful fetch.

use esign_core::{
    AgreementStatus, ApiError, ClientConfig, MegaSignStatusUpdateInfo, MegaSignsApi,
    SdkErrorCode, StatusUpdateResult, UreqTransport,
};
use mock_server::{ACCESS_TOKEN, MEGASIGN_NAME, X_API_USER};

const ACCEPT: Option<&str> = Some("*/*");

/// Start a mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// A connected API handle plus the id of the seeded MegaSign.
fn setup() -> (MegaSignsApi<UreqTransport>, String) {
    let api = MegaSignsApi::from_config(&ClientConfig::new(&start_server()));
    let id = api
        .mega_sign_id_by_name(Some(ACCESS_TOKEN), MEGASIGN_NAME, Some(X_API_USER))
        .unwrap()
        .expect("fixture MegaSign present");
    (api, id)
}

fn assert_code<T: std::fmt::Debug>(result: Result<T, ApiError>, expected: SdkErrorCode) {
    let err = result.unwrap_err();
    assert_eq!(err.api_code(), Some(expected.api_code()), "{err}");
}

#[test]
fn null_and_empty_access_token() {
    let (api, id) = setup();

    assert_code(
        api.get_mega_sign_form_data(None, ACCEPT, Some(id.as_str()), Some(X_API_USER)),
        SdkErrorCode::NoAccessTokenHeader,
    );
    assert_code(
        api.get_mega_sign_form_data(Some(""), ACCEPT, Some(id.as_str()), Some(X_API_USER)),
        SdkErrorCode::InvalidAccessToken,
    );
}

#[test]
fn invalid_x_api_user() {
    let (api, id) = setup();

    assert_code(
        api.get_mega_sign_form_data(Some(ACCESS_TOKEN), ACCEPT, Some(id.as_str()), Some("")),
        SdkErrorCode::InvalidXApiUserHeader,
    );
}

#[test]
fn invalid_mega_sign_id() {
    let (api, _) = setup();

    assert_code(
        api.get_mega_sign_form_data(Some(ACCESS_TOKEN), ACCEPT, Some(""), Some(X_API_USER)),
        SdkErrorCode::InvalidMegaSignId,
    );
    assert_code(
        api.get_mega_sign_form_data(Some(ACCESS_TOKEN), ACCEPT, None, Some(X_API_USER)),
        SdkErrorCode::InvalidMegaSignId,
    );
}

#[test]
fn get_form_data() {
    let (api, id) = setup();

    let form_data = api
        .get_mega_sign_form_data(Some(ACCESS_TOKEN), ACCEPT, Some(id.as_str()), Some(X_API_USER))
        .unwrap();
    assert!(!form_data.is_empty());
    let csv = String::from_utf8(form_data).unwrap();
    assert!(csv.contains("alice@example.com"));

    // Same inputs, same outcome.
    let again = api
        .get_mega_sign_form_data(Some(ACCESS_TOKEN), ACCEPT, Some(id.as_str()), Some(X_API_USER))
        .unwrap();
    assert_eq!(again, csv.into_bytes());
}

#[test]
fn server_side_rejections_use_the_same_codes() {
    let (api, id) = setup();

    // Non-empty but unknown token passes local validation.
    let err = api
        .get_mega_sign_form_data(Some("expired"), ACCEPT, Some(id.as_str()), Some(X_API_USER))
        .unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 401, .. }));
    assert_eq!(err.sdk_code(), Some(SdkErrorCode::InvalidAccessToken));

    let err = api
        .get_mega_sign_form_data(Some(ACCESS_TOKEN), ACCEPT, Some(id.as_str()), Some("sender"))
        .unwrap_err();
    assert_eq!(err.sdk_code(), Some(SdkErrorCode::InvalidXApiUserHeader));

    let err = api
        .get_mega_sign_form_data(Some(ACCESS_TOKEN), ACCEPT, Some("unknown"), Some(X_API_USER))
        .unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 404, .. }));
    assert_eq!(err.sdk_code(), Some(SdkErrorCode::InvalidMegaSignId));
}

#[test]
fn ids_with_reserved_characters_stay_on_the_same_endpoint() {
    let (api, id) = setup();
    let nested = format!("{id}/agreements");

    for bad_id in ["MS 1", "MS1?x=", "../megaSigns", nested.as_str()] {
        let err = api
            .get_mega_sign_form_data(Some(ACCESS_TOKEN), ACCEPT, Some(bad_id), Some(X_API_USER))
            .unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 404, .. }), "{bad_id}: {err}");
        assert_eq!(err.sdk_code(), Some(SdkErrorCode::InvalidMegaSignId), "{bad_id}");
    }
}

#[test]
fn info_agreements_and_cancel() {
    let (api, id) = setup();
    let token = Some(ACCESS_TOKEN);
    let user = Some(X_API_USER);

    let info = api.get_mega_sign_info(token, Some(id.as_str()), user).unwrap();
    assert_eq!(info.mega_sign_id, id);
    assert_eq!(info.name, MEGASIGN_NAME);
    assert_eq!(info.status, AgreementStatus::OutForSignature);
    assert_eq!(info.locale.as_deref(), Some("en_US"));

    let children = api.get_mega_sign_agreements(token, Some(id.as_str()), user).unwrap();
    assert_eq!(children.mega_sign_child_agreement_list.len(), 2);

    let cancel = MegaSignStatusUpdateInfo {
        comment: Some("recalled by sender".to_string()),
        notify_signer: Some(false),
        ..MegaSignStatusUpdateInfo::cancel()
    };
    let result = api
        .update_mega_sign_status(token, Some(id.as_str()), &cancel, user)
        .unwrap();
    assert_eq!(result.result, StatusUpdateResult::Cancelled);

    let info = api.get_mega_sign_info(token, Some(id.as_str()), user).unwrap();
    assert_eq!(info.status, AgreementStatus::Cancelled);

    let result = api
        .update_mega_sign_status(token, Some(id.as_str()), &cancel, user)
        .unwrap();
    assert_eq!(result.result, StatusUpdateResult::AlreadyCancelled);
}
