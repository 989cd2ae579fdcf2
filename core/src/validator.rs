//! Client-side checks on caller-supplied request parameters.
//!
//! Each check maps an absent or blank value to exactly one `SdkErrorCode`.
//! Operations run them in a fixed order (token, api user, MegaSign id) and
//! stop at the first failure.

use tracing::warn;

use crate::error::SdkErrorCode;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn reject<T>(code: SdkErrorCode) -> Result<T, SdkErrorCode> {
    warn!(code = code.api_code(), "request rejected before dispatch");
    Err(code)
}

/// A missing token and an empty token are reported differently.
pub fn access_token(value: Option<&str>) -> Result<&str, SdkErrorCode> {
    match value {
        None => reject(SdkErrorCode::NoAccessTokenHeader),
        Some(token) if is_blank(token) => reject(SdkErrorCode::InvalidAccessToken),
        Some(token) => Ok(token),
    }
}

pub fn x_api_user(value: Option<&str>) -> Result<&str, SdkErrorCode> {
    match value {
        Some(user) if !is_blank(user) => Ok(user),
        _ => reject(SdkErrorCode::InvalidXApiUserHeader),
    }
}

/// Null and empty ids collapse to the same code.
pub fn mega_sign_id(value: Option<&str>) -> Result<&str, SdkErrorCode> {
    match value {
        Some(id) if !is_blank(id) => Ok(id),
        _ => reject(SdkErrorCode::InvalidMegaSignId),
    }
}

/// Validated credentials for a single call.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub access_token: &'a str,
    pub x_api_user: &'a str,
}

/// Token first, then api user.
pub fn credentials<'a>(
    access_token: Option<&'a str>,
    x_api_user: Option<&'a str>,
) -> Result<Credentials<'a>, SdkErrorCode> {
    let access_token = self::access_token(access_token)?;
    let x_api_user = self::x_api_user(x_api_user)?;
    Ok(Credentials {
        access_token,
        x_api_user,
    })
}
