use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::AppState;

/// Aggregate account counts. The route is gated by `RequireAdmin`.
#[utoipa::path(
    get,
    path = "/admin/analytics",
    responses(
        (status = 200, description = "Account counts", body = AccountStats),
        (status = 401, description = "Missing or invalid access token"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn analytics(state: web::Data<AppState>) -> Result<HttpResponse> {
    let stats = state.auth.stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}
