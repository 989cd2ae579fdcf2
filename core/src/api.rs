//! Blocking MegaSigns API: validate, send, classify.
//!
//! `MegaSignsApi` pairs a `MegaSignsClient` with an `HttpSend` transport and
//! runs one round-trip per call. Validation failures return before the
//! transport is touched.

use tracing::debug;

use crate::client::MegaSignsClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpSend, UreqTransport};
use crate::types::{
    MegaSignChildAgreements, MegaSignInfo, MegaSignStatusUpdateInfo,
    MegaSignStatusUpdateResponse, MegaSigns,
};

#[derive(Debug, Clone)]
pub struct MegaSignsApi<T> {
    client: MegaSignsClient,
    transport: T,
}

impl MegaSignsApi<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(MegaSignsClient::new(&config.base_url), UreqTransport::new(config))
    }
}

impl<T: HttpSend> MegaSignsApi<T> {
    pub fn new(client: MegaSignsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &MegaSignsClient {
        &self.client
    }

    pub fn get_mega_signs(
        &self,
        access_token: Option<&str>,
        x_api_user: Option<&str>,
    ) -> Result<MegaSigns, ApiError> {
        let req = self.client.build_get_mega_signs(access_token, x_api_user)?;
        self.client.parse_get_mega_signs(self.transport.send(req)?)
    }

    pub fn get_mega_sign_info(
        &self,
        access_token: Option<&str>,
        mega_sign_id: Option<&str>,
        x_api_user: Option<&str>,
    ) -> Result<MegaSignInfo, ApiError> {
        let req = self
            .client
            .build_get_mega_sign_info(access_token, mega_sign_id, x_api_user)?;
        self.client.parse_get_mega_sign_info(self.transport.send(req)?)
    }

    pub fn get_mega_sign_agreements(
        &self,
        access_token: Option<&str>,
        mega_sign_id: Option<&str>,
        x_api_user: Option<&str>,
    ) -> Result<MegaSignChildAgreements, ApiError> {
        let req = self
            .client
            .build_get_mega_sign_agreements(access_token, mega_sign_id, x_api_user)?;
        self.client
            .parse_get_mega_sign_agreements(self.transport.send(req)?)
    }

    /// Fetch the data recipients entered into form fields when they signed the
    /// child agreements of a MegaSign.
    pub fn get_mega_sign_form_data(
        &self,
        access_token: Option<&str>,
        accept: Option<&str>,
        mega_sign_id: Option<&str>,
        x_api_user: Option<&str>,
    ) -> Result<Vec<u8>, ApiError> {
        let req = self.client.build_get_mega_sign_form_data(
            access_token,
            accept,
            mega_sign_id,
            x_api_user,
        )?;
        self.client
            .parse_get_mega_sign_form_data(self.transport.send(req)?)
    }

    pub fn update_mega_sign_status(
        &self,
        access_token: Option<&str>,
        mega_sign_id: Option<&str>,
        info: &MegaSignStatusUpdateInfo,
        x_api_user: Option<&str>,
    ) -> Result<MegaSignStatusUpdateResponse, ApiError> {
        let req = self.client.build_update_mega_sign_status(
            access_token,
            mega_sign_id,
            info,
            x_api_user,
        )?;
        self.client
            .parse_update_mega_sign_status(self.transport.send(req)?)
    }

    /// Look up a MegaSign id by its exact name. Returns the first match.
    pub fn mega_sign_id_by_name(
        &self,
        access_token: Option<&str>,
        name: &str,
        x_api_user: Option<&str>,
    ) -> Result<Option<String>, ApiError> {
        let list = self.get_mega_signs(access_token, x_api_user)?;
        let found = list
            .mega_sign_list
            .into_iter()
            .find(|m| m.name == name)
            .map(|m| m.mega_sign_id);
        debug!(name, found = found.is_some(), "resolved MegaSign by name");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::SdkErrorCode;
    use crate::http::{HttpRequest, HttpResponse};

    /// Records every request and replays canned responses in order.
    struct FakeTransport {
        sent: RefCell<Vec<HttpRequest>>,
        responses: RefCell<Vec<HttpResponse>>,
    }

    impl FakeTransport {
        fn replying(responses: Vec<(u16, &str)>) -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                responses: RefCell::new(
                    responses
                        .into_iter()
                        .rev()
                        .map(|(status, body)| HttpResponse {
                            status,
                            body: body.as_bytes().to_vec(),
                        })
                        .collect(),
                ),
            }
        }
    }

    impl HttpSend for FakeTransport {
        fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.sent.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop()
                .ok_or_else(|| ApiError::Transport("no canned response".to_string()))
        }
    }

    fn api(transport: &FakeTransport) -> MegaSignsApi<&FakeTransport> {
        MegaSignsApi::new(MegaSignsClient::new("http://localhost:3000"), transport)
    }

    const TOKEN: &str = "token";
    const USER: &str = "email:sender@example.com";

    #[test]
    fn rejected_calls_never_reach_transport() {
        let transport = FakeTransport::replying(Vec::new());
        let api = api(&transport);
        let calls = [
            api.get_mega_sign_form_data(None, None, Some("MS1"), Some(USER)),
            api.get_mega_sign_form_data(Some(""), None, Some("MS1"), Some(USER)),
            api.get_mega_sign_form_data(Some(TOKEN), None, Some("MS1"), Some("")),
            api.get_mega_sign_form_data(Some(TOKEN), None, Some(""), Some(USER)),
            api.get_mega_sign_form_data(Some(TOKEN), None, None, Some(USER)),
        ];
        for result in calls {
            assert!(matches!(result, Err(ApiError::Sdk(_))));
        }
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn form_data_success_returns_payload() {
        let transport = FakeTransport::replying(vec![(200, "agreementId\nA1\n")]);
        let bytes = api(&transport)
            .get_mega_sign_form_data(Some(TOKEN), Some("*/*"), Some("MS1"), Some(USER))
            .unwrap();
        assert_eq!(bytes, b"agreementId\nA1\n");
        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].path.ends_with("/megaSigns/MS1/formData"));
    }

    #[test]
    fn server_error_is_classified() {
        let transport = FakeTransport::replying(vec![(
            404,
            r#"{"code":"INVALID_MEGASIGN_ID","message":"The MegaSign ID specified is invalid"}"#,
        )]);
        let err = api(&transport)
            .get_mega_sign_form_data(Some(TOKEN), None, Some("missing"), Some(USER))
            .unwrap_err();
        assert_eq!(err.sdk_code(), Some(SdkErrorCode::InvalidMegaSignId));
    }

    #[test]
    fn transport_failure_propagates() {
        let transport = FakeTransport::replying(Vec::new());
        let err = api(&transport)
            .get_mega_sign_info(Some(TOKEN), Some("MS1"), Some(USER))
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn id_by_name_picks_matching_entry() {
        let transport = FakeTransport::replying(vec![(
            200,
            r#"{"megaSignList":[
                {"megaSignId":"A","name":"Other","status":"SIGNED","displayDate":"2016-01-01"},
                {"megaSignId":"B","name":"Quarterly NDA","status":"OUT_FOR_SIGNATURE","displayDate":"2016-01-02"}
            ]}"#,
        )]);
        let id = api(&transport)
            .mega_sign_id_by_name(Some(TOKEN), "Quarterly NDA", Some(USER))
            .unwrap();
        assert_eq!(id.as_deref(), Some("B"));
    }

    #[test]
    fn id_by_name_missing() {
        let transport = FakeTransport::replying(vec![(200, r#"{"megaSignList":[]}"#)]);
        let id = api(&transport)
            .mega_sign_id_by_name(Some(TOKEN), "Nope", Some(USER))
            .unwrap();
        assert!(id.is_none());
    }
}
