use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::{QuestionService, load_question, question_not_found, question_view};
use crate::models::ApiResponse;
use crate::models::common::VoteRequest;
use crate::services::{current_class, current_user, storage_error};

pub async fn vote_question(
    service: &QuestionService,
    request: &HttpRequest,
    question_id: i64,
    vote: VoteRequest,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));

    // 确认问题属于本班级
    try_response!(load_question(&storage, class.class.id, question_id).await);

    match storage.vote_question(question_id, user.id, vote.vote).await {
        Ok(Some(question)) => {
            debug!("User {} voted {:?} on question {}", user.id, vote.vote, question_id);
            let view = try_response!(question_view(&storage, question, user.id).await);
            Ok(HttpResponse::Ok().json(ApiResponse::success(view, "Vote recorded")))
        }
        Ok(None) => Ok(question_not_found()),
        Err(e) => Ok(storage_error("Failed to record vote", e)),
    }
}
