use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::{AnswerService, answer_not_found, load_answer};
use crate::models::answers::responses::AcceptAnswerResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::questions::load_question;
use crate::services::{current_class, current_user, error_json, storage_error};

/// 问题作者或班级教师采纳回答，同一事务中取消其他回答的采纳并将问题标记为已解决
pub async fn accept_answer(
    service: &AnswerService,
    request: &HttpRequest,
    question_id: i64,
    answer_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));

    let question = try_response!(load_question(&storage, class.class.id, question_id).await);

    if !class.can_edit_post(&user, question.author_id) {
        return Ok(error_json(
            StatusCode::FORBIDDEN,
            ErrorCode::AnswerPermissionDenied,
            "Only the question author or a class teacher can accept answers",
        ));
    }

    try_response!(load_answer(&storage, question_id, answer_id).await);

    match storage.accept_answer(question_id, answer_id).await {
        Ok(true) => {
            info!(
                "Answer {} accepted on question {} by user {}",
                answer_id, question_id, user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AcceptAnswerResponse {
                    answer_id,
                    question_id,
                    is_resolved: true,
                },
                "Answer accepted",
            )))
        }
        Ok(false) => Ok(answer_not_found()),
        Err(e) => Ok(storage_error("Failed to accept answer", e)),
    }
}
