use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::{AnswerService, answer_not_found, load_answer};
use crate::models::ApiResponse;
use crate::models::answers::responses::AnswerView;
use crate::models::common::VoteRequest;
use crate::services::questions::load_question;
use crate::services::{current_class, current_user, storage_error};

pub async fn vote_answer(
    service: &AnswerService,
    request: &HttpRequest,
    question_id: i64,
    answer_id: i64,
    vote: VoteRequest,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));

    try_response!(load_question(&storage, class.class.id, question_id).await);
    try_response!(load_answer(&storage, question_id, answer_id).await);

    match storage.vote_answer(answer_id, user.id, vote.vote).await {
        Ok(Some(answer)) => {
            debug!("User {} voted {:?} on answer {}", user.id, vote.vote, answer_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AnswerView::new(answer, user.id),
                "Vote recorded",
            )))
        }
        Ok(None) => Ok(answer_not_found()),
        Err(e) => Ok(storage_error("Failed to record vote", e)),
    }
}
