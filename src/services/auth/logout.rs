use actix_web::{HttpResponse, Result as ActixResult};
use tracing::debug;

use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 下发过期的 refresh token Cookie；access token 自然过期
pub async fn handle_logout() -> ActixResult<HttpResponse> {
    debug!("Clearing refresh token cookie");
    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::<()>::success_empty("Logged out")))
}
