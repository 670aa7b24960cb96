use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::{QuestionService, load_question, question_view};
use crate::models::ApiResponse;
use crate::services::{current_class, current_user};

pub async fn get_question(
    service: &QuestionService,
    request: &HttpRequest,
    question_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));

    let mut question = try_response!(load_question(&storage, class.class.id, question_id).await);

    // 浏览量计数失败不影响读取
    match storage.increment_question_views(question_id).await {
        Ok(true) => question.view_count += 1,
        Ok(false) => {}
        Err(e) => warn!("Failed to increment views of question {}: {}", question_id, e),
    }

    let view = try_response!(question_view(&storage, question, user.id).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(view, "Question retrieved successfully")))
}
