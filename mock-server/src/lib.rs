use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Token the mock accepts in the `Access-Token` header.
pub const ACCESS_TOKEN: &str = "mock-access-token";
/// A well-formed `x-api-user` value for the fixture sender.
pub const X_API_USER: &str = "email:sender@example.com";
/// Name of the MegaSign seeded into every fresh `app()`.
pub const MEGASIGN_NAME: &str = "Quarterly NDA";

pub const ACCESS_TOKEN_HEADER: &str = "access-token";
pub const X_API_USER_HEADER: &str = "x-api-user";

const FORM_DATA_COLUMNS: &str = "agreementId,recipientEmail,status,company,title";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MegaSign {
    pub mega_sign_id: String,
    pub name: String,
    pub status: String,
    pub display_date: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MegaSigns {
    pub mega_sign_list: Vec<MegaSign>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MegaSignInfo {
    pub mega_sign_id: String,
    pub name: String,
    pub status: String,
    pub message: String,
    pub locale: String,
    pub created_date: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildAgreement {
    pub agreement_id: String,
    pub name: String,
    pub status: String,
    pub recipient_email: String,
    #[serde(skip)]
    pub company: String,
    #[serde(skip)]
    pub title: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildAgreements {
    pub mega_sign_child_agreement_list: Vec<ChildAgreement>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub value: String,
    pub comment: Option<String>,
    pub notify_signer: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    pub result: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// A MegaSign together with its child agreements.
#[derive(Clone, Debug)]
pub struct MegaSignRecord {
    pub info: MegaSignInfo,
    pub children: Vec<ChildAgreement>,
}

impl MegaSignRecord {
    fn summary(&self) -> MegaSign {
        MegaSign {
            mega_sign_id: self.info.mega_sign_id.clone(),
            name: self.info.name.clone(),
            status: self.info.status.clone(),
            display_date: self.info.created_date.clone(),
        }
    }

    /// CSV with one row per child agreement.
    fn form_data(&self) -> String {
        let mut csv = String::from(FORM_DATA_COLUMNS);
        csv.push('\n');
        for child in &self.children {
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                child.agreement_id, child.recipient_email, child.status, child.company, child.title
            ));
        }
        csv
    }
}

pub type Db = Arc<RwLock<Vec<MegaSignRecord>>>;

type ApiFailure = (StatusCode, Json<ErrorBody>);

fn failure(status: StatusCode, code: &str, message: &str) -> ApiFailure {
    debug!(%status, code, "rejecting request");
    (
        status,
        Json(ErrorBody {
            code: code.to_string(),
            message: message.to_string(),
        }),
    )
}

/// The single MegaSign every fresh server starts with.
pub fn fixture() -> Vec<MegaSignRecord> {
    let child = |email: &str, status: &str, company: &str, title: &str| ChildAgreement {
        agreement_id: Uuid::new_v4().to_string(),
        name: MEGASIGN_NAME.to_string(),
        status: status.to_string(),
        recipient_email: email.to_string(),
        company: company.to_string(),
        title: title.to_string(),
    };
    vec![MegaSignRecord {
        info: MegaSignInfo {
            mega_sign_id: Uuid::new_v4().to_string(),
            name: MEGASIGN_NAME.to_string(),
            status: "OUT_FOR_SIGNATURE".to_string(),
            message: "Please review and sign.".to_string(),
            locale: "en_US".to_string(),
            created_date: "2016-05-02T09:30:00Z".to_string(),
        },
        children: vec![
            child("alice@example.com", "SIGNED", "Acme", "CFO"),
            child("bob@example.com", "OUT_FOR_SIGNATURE", "", ""),
        ],
    }]
}

pub fn app() -> Router {
    app_with(fixture())
}

pub fn app_with(records: Vec<MegaSignRecord>) -> Router {
    let db: Db = Arc::new(RwLock::new(records));
    let mega_signs = Router::new()
        .route("/megaSigns", get(list_mega_signs))
        .route("/megaSigns/{id}", get(get_mega_sign_info))
        .route("/megaSigns/{id}/agreements", get(get_agreements))
        .route("/megaSigns/{id}/formData", get(get_form_data))
        .route("/megaSigns/{id}/status", put(update_status));
    Router::new()
        .nest("/api/rest/v5", mega_signs)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Enforce the same header rules the SDK validates locally.
fn authorize(headers: &HeaderMap) -> Result<(), ApiFailure> {
    let token = headers.get(ACCESS_TOKEN_HEADER).ok_or_else(|| {
        failure(
            StatusCode::UNAUTHORIZED,
            "NO_ACCESS_TOKEN_HEADER",
            "Access token header not provided",
        )
    })?;
    if token.to_str().ok() != Some(ACCESS_TOKEN) {
        return Err(failure(
            StatusCode::UNAUTHORIZED,
            "INVALID_ACCESS_TOKEN",
            "Access token provided is invalid or has expired",
        ));
    }
    if let Some(user) = headers.get(X_API_USER_HEADER) {
        let user = user.to_str().unwrap_or_default();
        let well_formed = user
            .strip_prefix("email:")
            .or_else(|| user.strip_prefix("userid:"))
            .is_some_and(|rest| !rest.is_empty());
        if !well_formed {
            return Err(failure(
                StatusCode::BAD_REQUEST,
                "INVALID_X_API_USER_HEADER",
                "Value provided in x-api-user header is invalid",
            ));
        }
    }
    Ok(())
}

fn unknown_mega_sign() -> ApiFailure {
    failure(
        StatusCode::NOT_FOUND,
        "INVALID_MEGASIGN_ID",
        "The MegaSign ID specified is invalid",
    )
}

async fn find(db: &Db, id: &str) -> Result<MegaSignRecord, ApiFailure> {
    db.read()
        .await
        .iter()
        .find(|r| r.info.mega_sign_id == id)
        .cloned()
        .ok_or_else(unknown_mega_sign)
}

async fn list_mega_signs(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<MegaSigns>, ApiFailure> {
    authorize(&headers)?;
    let records = db.read().await;
    Ok(Json(MegaSigns {
        mega_sign_list: records.iter().map(MegaSignRecord::summary).collect(),
    }))
}

async fn get_mega_sign_info(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<MegaSignInfo>, ApiFailure> {
    authorize(&headers)?;
    Ok(Json(find(&db, &id).await?.info))
}

async fn get_agreements(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ChildAgreements>, ApiFailure> {
    authorize(&headers)?;
    Ok(Json(ChildAgreements {
        mega_sign_child_agreement_list: find(&db, &id).await?.children,
    }))
}

async fn get_form_data(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiFailure> {
    authorize(&headers)?;
    let record = find(&db, &id).await?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], record.form_data()))
}

async fn update_status(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<StatusUpdate>,
) -> Result<Json<StatusUpdateResponse>, ApiFailure> {
    authorize(&headers)?;
    if input.value != "CANCEL" {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "INVALID_STATUS_VALUE",
            "Only CANCEL is supported",
        ));
    }
    let mut records = db.write().await;
    let record = records
        .iter_mut()
        .find(|r| r.info.mega_sign_id == id)
        .ok_or_else(unknown_mega_sign)?;

    if record.info.status == "CANCELLED" {
        return Ok(Json(StatusUpdateResponse {
            result: "ALREADY_CANCELLED".to_string(),
        }));
    }
    record.info.status = "CANCELLED".to_string();
    for child in &mut record.children {
        if child.status == "OUT_FOR_SIGNATURE" {
            child.status = "CANCELLED".to_string();
        }
    }
    info!(
        mega_sign_id = %id,
        comment = input.comment.as_deref().unwrap_or_default(),
        notify_signer = input.notify_signer.unwrap_or(false),
        "cancelled MegaSign"
    );
    Ok(Json(StatusUpdateResponse {
        result: "CANCELLED".to_string(),
    }))
}
