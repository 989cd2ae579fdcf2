//! Stateless request builder and response parser for the MegaSigns API.
//!
//! # Design
//! `MegaSignsClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that validates the caller's parameters and produces an
//! `HttpRequest`, and a `parse_*` method that consumes an `HttpResponse`.
//! Validation happens in `build_*`, so a rejected call never produces a
//! request and never reaches the network.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{classify, ApiError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    MegaSignChildAgreements, MegaSignInfo, MegaSignStatusUpdateInfo,
    MegaSignStatusUpdateResponse, MegaSigns,
};
use crate::validator::{self, Credentials};

pub const API_PATH: &str = "/api/rest/v5";

pub const ACCESS_TOKEN_HEADER: &str = "Access-Token";
pub const X_API_USER_HEADER: &str = "x-api-user";
pub const ACCEPT_HEADER: &str = "Accept";

/// Everything but RFC 3986 unreserved characters is escaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Synchronous, stateless client for the MegaSigns endpoints.
#[derive(Debug, Clone)]
pub struct MegaSignsClient {
    base_url: String,
}

impl MegaSignsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{API_PATH}/megaSigns{suffix}", self.base_url)
    }

    /// URL under a single MegaSign; the id always stays one path segment.
    fn mega_sign_url(&self, id: &str, tail: &str) -> String {
        let segment = utf8_percent_encode(id, PATH_SEGMENT);
        self.url(&format!("/{segment}{tail}"))
    }

    fn get(&self, operation: &str, url: String, creds: Credentials<'_>) -> HttpRequest {
        debug!(operation, url = %url, "built request");
        HttpRequest {
            method: HttpMethod::Get,
            path: url,
            headers: auth_headers(creds),
            body: None,
        }
    }

    pub fn build_get_mega_signs(
        &self,
        access_token: Option<&str>,
        x_api_user: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let creds = validator::credentials(access_token, x_api_user)?;
        Ok(self.get("getMegaSigns", self.url(""), creds))
    }

    pub fn build_get_mega_sign_info(
        &self,
        access_token: Option<&str>,
        mega_sign_id: Option<&str>,
        x_api_user: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let creds = validator::credentials(access_token, x_api_user)?;
        let id = validator::mega_sign_id(mega_sign_id)?;
        Ok(self.get("getMegaSignInfo", self.mega_sign_url(id, ""), creds))
    }

    pub fn build_get_mega_sign_agreements(
        &self,
        access_token: Option<&str>,
        mega_sign_id: Option<&str>,
        x_api_user: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let creds = validator::credentials(access_token, x_api_user)?;
        let id = validator::mega_sign_id(mega_sign_id)?;
        Ok(self.get(
            "getMegaSignAgreements",
            self.mega_sign_url(id, "/agreements"),
            creds,
        ))
    }

    /// `accept` is forwarded verbatim when present and omitted otherwise.
    pub fn build_get_mega_sign_form_data(
        &self,
        access_token: Option<&str>,
        accept: Option<&str>,
        mega_sign_id: Option<&str>,
        x_api_user: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let creds = validator::credentials(access_token, x_api_user)?;
        let id = validator::mega_sign_id(mega_sign_id)?;
        let mut req = self.get(
            "getMegaSignFormData",
            self.mega_sign_url(id, "/formData"),
            creds,
        );
        if let Some(accept) = accept {
            req.headers
                .push((ACCEPT_HEADER.to_string(), accept.to_string()));
        }
        Ok(req)
    }

    pub fn build_update_mega_sign_status(
        &self,
        access_token: Option<&str>,
        mega_sign_id: Option<&str>,
        info: &MegaSignStatusUpdateInfo,
        x_api_user: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let creds = validator::credentials(access_token, x_api_user)?;
        let id = validator::mega_sign_id(mega_sign_id)?;
        let body =
            serde_json::to_string(info).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut headers = auth_headers(creds);
        headers.push(("content-type".to_string(), "application/json".to_string()));
        let url = self.mega_sign_url(id, "/status");
        debug!(operation = "updateMegaSignStatus", url = %url, "built request");
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: url,
            headers,
            body: Some(body),
        })
    }

    pub fn parse_get_mega_signs(&self, response: HttpResponse) -> Result<MegaSigns, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_mega_sign_info(&self, response: HttpResponse) -> Result<MegaSignInfo, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_mega_sign_agreements(
        &self,
        response: HttpResponse,
    ) -> Result<MegaSignChildAgreements, ApiError> {
        parse_json(response)
    }

    /// Form data is returned as raw bytes (CSV on the wire).
    pub fn parse_get_mega_sign_form_data(&self, response: HttpResponse) -> Result<Vec<u8>, ApiError> {
        check_status(&response)?;
        Ok(response.body)
    }

    pub fn parse_update_mega_sign_status(
        &self,
        response: HttpResponse,
    ) -> Result<MegaSignStatusUpdateResponse, ApiError> {
        parse_json(response)
    }
}

fn auth_headers(creds: Credentials<'_>) -> Vec<(String, String)> {
    vec![
        (ACCESS_TOKEN_HEADER.to_string(), creds.access_token.to_string()),
        (X_API_USER_HEADER.to_string(), creds.x_api_user.to_string()),
    ]
}

/// Hand any non-2xx response to the error classifier.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(classify(response))
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_slice(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
