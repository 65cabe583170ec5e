//! # Provider Session
//!
//! Provider routes sit behind an upstream session layer which authenticates
//! the provider and forwards the tenant identity as two headers:
//!
//! - `x-workspace-id`: the workspace (clinic) the provider acts for
//! - `x-provider-id`: the provider's own id
//!
//! Handlers take a [`ProviderSession`] argument; a request without both
//! headers, or with a value that is not a UUID, is rejected with 401 before
//! the handler runs. Every provider query is then scoped to the session's
//! workspace, so ids from another workspace simply do not resolve.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use clinicslot_core::{errors::BookingError, models::ProviderSession};
use uuid::Uuid;

use crate::middleware::error_handling::AppError;

pub const WORKSPACE_HEADER: &str = "x-workspace-id";
pub const PROVIDER_HEADER: &str = "x-provider-id";

/// Axum extractor for the authenticated provider.
#[derive(Debug, Clone, Copy)]
pub struct Provider(pub ProviderSession);

#[async_trait]
impl<S> FromRequestParts<S> for Provider
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_from_headers(&parts.headers).map(Provider).map_err(AppError)
    }
}

pub fn session_from_headers(headers: &HeaderMap) -> Result<ProviderSession, BookingError> {
    Ok(ProviderSession {
        workspace_id: uuid_header(headers, WORKSPACE_HEADER)?,
        provider_id: uuid_header(headers, PROVIDER_HEADER)?,
    })
}

fn uuid_header(headers: &HeaderMap, name: &str) -> Result<Uuid, BookingError> {
    let value = headers
        .get(name)
        .ok_or_else(|| BookingError::Authentication(format!("Missing {} header", name)))?;

    value
        .to_str()
        .ok()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .ok_or_else(|| BookingError::Authentication(format!("Malformed {} header", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_from_headers() {
        let workspace_id = Uuid::new_v4();
        let provider_id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(WORKSPACE_HEADER, HeaderValue::from_str(&workspace_id.to_string()).unwrap());
        headers.insert(PROVIDER_HEADER, HeaderValue::from_str(&provider_id.to_string()).unwrap());

        let session = session_from_headers(&headers).unwrap();
        assert_eq!(session.workspace_id, workspace_id);
        assert_eq!(session.provider_id, provider_id);
    }

    #[test]
    fn test_missing_provider_header() {
        let mut headers = HeaderMap::new();
        headers.insert(WORKSPACE_HEADER, HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap());

        let err = session_from_headers(&headers).unwrap_err();
        assert_eq!(err.to_string(), "Authentication error: Missing x-provider-id header");
    }

    #[test]
    fn test_malformed_workspace_header() {
        let mut headers = HeaderMap::new();
        headers.insert(WORKSPACE_HEADER, HeaderValue::from_static("clinic-42"));
        headers.insert(PROVIDER_HEADER, HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap());

        assert!(matches!(
            session_from_headers(&headers),
            Err(BookingError::Authentication(_))
        ));
    }
}
