use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::{AnswerService, answer_not_found, load_answer};
use crate::models::answers::{requests::UpdateAnswerRequest, responses::AnswerView};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::questions::load_question;
use crate::services::{current_class, current_user, error_json, storage_error};
use crate::utils::validate::validate_body;

/// 作者或班级教师修改回答内容
pub async fn update_answer(
    service: &AnswerService,
    request: &HttpRequest,
    question_id: i64,
    answer_id: i64,
    update_data: UpdateAnswerRequest,
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
            "Only the author or a class teacher can edit this answer",
        ));
    }

    if let Err(msg) = validate_body(&update_data.content) {
        return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::AnswerInvalid, msg));
    }

    match storage
        .update_answer_content(answer_id, update_data.content)
        .await
    {
        Ok(Some(updated)) => {
            info!("Answer {} updated by user {}", answer_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AnswerView::new(updated, user.id),
                "Answer updated",
            )))
        }
        Ok(None) => Ok(answer_not_found()),
        Err(e) => Ok(storage_error("Failed to update answer", e)),
    }
}
