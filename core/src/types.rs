//! DTOs for the MegaSigns endpoints.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any drift between the two crates. Field names are
//! camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a MegaSign or one of its child agreements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementStatus {
    OutForSignature,
    WaitingForMySignature,
    Signed,
    Approved,
    Recalled,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

/// Summary row returned by the MegaSign listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MegaSign {
    pub mega_sign_id: String,
    pub name: String,
    pub status: AgreementStatus,
    pub display_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MegaSigns {
    #[serde(default)]
    pub mega_sign_list: Vec<MegaSign>,
}

/// Detailed view of a single MegaSign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MegaSignInfo {
    pub mega_sign_id: String,
    pub name: String,
    pub status: AgreementStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub created_date: String,
}

/// One child agreement sent to a single recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MegaSignChildAgreement {
    pub agreement_id: String,
    pub name: String,
    pub status: AgreementStatus,
    pub recipient_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MegaSignChildAgreements {
    #[serde(default)]
    pub mega_sign_child_agreement_list: Vec<MegaSignChildAgreement>,
}

/// Transition requested through the status endpoint. Only cancellation is
/// supported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusUpdateValue {
    Cancel,
}

/// Request payload for `PUT /megaSigns/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MegaSignStatusUpdateInfo {
    pub value: StatusUpdateValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_signer: Option<bool>,
}

impl MegaSignStatusUpdateInfo {
    pub fn cancel() -> Self {
        Self {
            value: StatusUpdateValue::Cancel,
            comment: None,
            notify_signer: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusUpdateResult {
    Cancelled,
    AlreadyCancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MegaSignStatusUpdateResponse {
    pub result: StatusUpdateResult,
}
