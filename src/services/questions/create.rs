use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::QuestionService;
use crate::models::questions::{
    requests::{CreateQuestion, CreateQuestionRequest},
    responses::QuestionView,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::files::resolve_attachments;
use crate::services::{current_class, current_user, error_json, storage_error};
use crate::utils::validate::{normalize_tags, validate_body, validate_question_title};

pub async fn create_question(
    service: &QuestionService,
    request: &HttpRequest,
    question_data: CreateQuestionRequest,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));
    let class_id = class.class.id;

    let title = question_data.title.trim().to_string();
    if let Err(msg) = validate_question_title(&title) {
        return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::QuestionInvalid, msg));
    }
    if let Err(msg) = validate_body(&question_data.description) {
        return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::QuestionInvalid, msg));
    }
    let tags = match normalize_tags(&question_data.tags) {
        Ok(tags) => tags,
        Err(msg) => {
            return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::QuestionInvalid, msg));
        }
    };

    let attachments =
        try_response!(resolve_attachments(&storage, class_id, &question_data.attachments).await);

    let create = CreateQuestion {
        class_id,
        author_id: user.id,
        title,
        description: question_data.description,
        tags,
        attachments,
    };

    match storage.create_question(create).await {
        Ok(question) => {
            info!(
                "Question {} created in class {} by user {}",
                question.id, class_id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                QuestionView::new(question, user.id, 0),
                "Question created",
            )))
        }
        Err(e) => Ok(storage_error("Failed to create question", e)),
    }
}
