//! Synchronous client SDK for the e-signature service's MegaSigns API.
//!
//! # Overview
//! A MegaSign is one signature request fanned out as child agreements to many
//! recipients. This crate validates caller-supplied credentials and ids,
//! builds `HttpRequest` values, executes them through an `HttpSend`
//! transport, and turns failures into `ApiError` values carrying a stable
//! error code.
//!
//! # Design
//! - `MegaSignsClient` is stateless and does no I/O: `build_*` validates and
//!   produces a request, `parse_*` consumes a response.
//! - `MegaSignsApi` joins a client and a transport into one blocking call per
//!   operation.
//! - Local validation failures use the closed `SdkErrorCode` set; server
//!   failures keep the server's code string. `ApiError::api_code` covers both.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;
pub mod validator;

pub use api::MegaSignsApi;
pub use client::MegaSignsClient;
pub use config::ClientConfig;
pub use error::{ApiError, SdkErrorCode};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpSend, UreqTransport};
pub use types::{
    AgreementStatus, MegaSign, MegaSignChildAgreement, MegaSignChildAgreements, MegaSignInfo,
    MegaSignStatusUpdateInfo, MegaSignStatusUpdateResponse, MegaSigns, StatusUpdateResult,
    StatusUpdateValue,
};
