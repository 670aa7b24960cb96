use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::{AnswerService, answer_not_found, load_answer};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::questions::load_question;
use crate::services::{current_class, current_user, error_json, storage_error};

/// 软删除回答，问题的已解决状态保持不变
pub async fn delete_answer(
    service: &AnswerService,
    request: &HttpRequest,
    question_id: i64,
    answer_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));

    try_response!(load_question(&storage, class.class.id, question_id).await);
    let answer = try_response!(load_answer(&storage, question_id, answer_id).await);

    if !class.can_edit_post(&user, answer.author_id) {
        return Ok(error_json(
            StatusCode::FORBIDDEN,
            ErrorCode::AnswerPermissionDenied,
            "Only the author or a class teacher can delete this answer",
        ));
    }

    match storage.soft_delete_answer(answer_id).await {
        Ok(true) => {
            info!("Answer {} deleted by user {}", answer_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Answer deleted")))
        }
        Ok(false) => Ok(answer_not_found()),
        Err(e) => Ok(storage_error("Failed to delete answer", e)),
    }
}
