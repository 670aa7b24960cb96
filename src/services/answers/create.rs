use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::AnswerService;
use crate::models::answers::{
    requests::{CreateAnswer, CreateAnswerRequest},
    responses::AnswerView,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::files::resolve_attachments;
use crate::services::questions::load_question;
use crate::services::{current_class, current_user, error_json, storage_error};
use crate::utils::validate::validate_body;

pub async fn create_answer(
    service: &AnswerService,
    request: &HttpRequest,
    question_id: i64,
    answer_data: CreateAnswerRequest,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));
    let class_id = class.class.id;

    try_response!(load_question(&storage, class_id, question_id).await);

    if let Err(msg) = validate_body(&answer_data.content) {
        return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::AnswerInvalid, msg));
    }

    let attachments =
        try_response!(resolve_attachments(&storage, class_id, &answer_data.attachments).await);

    let create = CreateAnswer {
        question_id,
        author_id: user.id,
        content: answer_data.content,
        attachments,
    };

    match storage.create_answer(create).await {
        Ok(answer) => {
            info!(
                "Answer {} posted to question {} by user {}",
                answer.id, question_id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                AnswerView::new(answer, user.id),
                "Answer created",
            )))
        }
        Err(e) => Ok(storage_error("Failed to create answer", e)),
    }
}
