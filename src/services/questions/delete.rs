use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::{QuestionService, load_question, question_not_found};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_class, current_user, error_json, storage_error};

/// 软删除问题，作者或班级教师
pub async fn delete_question(
    service: &QuestionService,
    request: &HttpRequest,
    question_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));

    let question = try_response!(load_question(&storage, class.class.id, question_id).await);

    if !class.can_edit_post(&user, question.author_id) {
        return Ok(error_json(
            StatusCode::FORBIDDEN,
            ErrorCode::QuestionPermissionDenied,
            "Only the author or a class teacher can delete this question",
        ));
    }

    match storage.soft_delete_question(question_id).await {
        Ok(true) => {
            info!("Question {} deleted by user {}", question_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Question deleted")))
        }
        Ok(false) => Ok(question_not_found()),
        Err(e) => Ok(storage_error("Failed to delete question", e)),
    }
}
