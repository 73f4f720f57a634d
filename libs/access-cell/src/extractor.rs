use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_models::error::AppError;
use shared_models::principal::{Principal, UserRecord};
use shared_store::{Collection, DocumentStore};

/// Resolves the caller's principal from the `users` collection and makes it
/// available to handlers via request extensions.
///
/// The bearer token is the caller's user-document id; exchanging real
/// credentials for it belongs to the (out of scope) sign-in flow.
pub async fn principal_middleware(
    State(store): State<Arc<DocumentStore>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or(AppError::Auth)?;

    let auth_value = auth_header.to_str().map_err(|_| AppError::Auth)?;

    let user_id = auth_value.strip_prefix("Bearer ").ok_or(AppError::Auth)?;

    let record: UserRecord = store
        .get_as(Collection::Users, user_id)
        .await
        .map_err(|_| AppError::Auth)?;

    request.extensions_mut().insert(Principal::from_record(record));

    Ok(next.run(request).await)
}
