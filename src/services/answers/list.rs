use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnswerService;
use crate::models::ApiResponse;
use crate::models::answers::responses::{AnswerListResponse, AnswerView};
use crate::services::questions::load_question;
use crate::services::{current_class, current_user, storage_error};

pub async fn list_answers(
    service: &AnswerService,
    request: &HttpRequest,
    question_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));

    try_response!(load_question(&storage, class.class.id, question_id).await);

    match storage.list_answers(question_id).await {
        Ok(answers) => {
            let items = answers
                .into_iter()
                .map(|a| AnswerView::new(a, user.id))
                .collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AnswerListResponse { items },
                "Answers retrieved successfully",
            )))
        }
        Err(e) => Ok(storage_error("Failed to list answers", e)),
    }
}
