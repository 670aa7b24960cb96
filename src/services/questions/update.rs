use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::{QuestionService, load_question, question_view};
use crate::models::questions::requests::{QuestionUpdate, UpdateQuestionRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_class, current_user, error_json, storage_error};
use crate::utils::validate::{normalize_tags, validate_body, validate_question_title};

/// 作者或班级教师可以修改，置顶只允许班级教师
pub async fn update_question(
    service: &QuestionService,
    request: &HttpRequest,
    question_id: i64,
    update_data: UpdateQuestionRequest,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));

    let question = try_response!(load_question(&storage, class.class.id, question_id).await);

    if !class.can_edit_post(&user, question.author_id) {
        return Ok(error_json(
            StatusCode::FORBIDDEN,
            ErrorCode::QuestionPermissionDenied,
            "Only the author or a class teacher can edit this question",
        ));
    }

    if update_data.is_pinned.is_some() && !class.can_administer(&user) {
        return Ok(error_json(
            StatusCode::FORBIDDEN,
            ErrorCode::QuestionPermissionDenied,
            "Only class teachers can pin questions",
        ));
    }

    let title = update_data.title.map(|t| t.trim().to_string());
    if let Some(ref title) = title
        && let Err(msg) = validate_question_title(title)
    {
        return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::QuestionInvalid, msg));
    }

    if let Some(ref description) = update_data.description
        && let Err(msg) = validate_body(description)
    {
        return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::QuestionInvalid, msg));
    }

    let tags = match update_data.tags {
        Some(ref tags) => match normalize_tags(tags) {
            Ok(tags) => Some(tags),
            Err(msg) => {
                return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::QuestionInvalid, msg));
            }
        },
        None => None,
    };

    let update = QuestionUpdate {
        title,
        description: update_data.description,
        tags,
        is_pinned: update_data.is_pinned,
    };

    match storage.update_question(question_id, update).await {
        Ok(Some(updated)) => {
            info!("Question {} updated by user {}", question_id, user.id);
            let view = try_response!(question_view(&storage, updated, user.id).await);
            Ok(HttpResponse::Ok().json(ApiResponse::success(view, "Question updated")))
        }
        Ok(None) => Ok(error_json(
            StatusCode::NOT_FOUND,
            ErrorCode::QuestionNotFound,
            "Question not found",
        )),
        Err(e) => Ok(storage_error("Failed to update question", e)),
    }
}
