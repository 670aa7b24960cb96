use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionService;
use crate::models::ApiResponse;
use crate::models::questions::{
    requests::{QuestionListParams, QuestionListQuery},
    responses::{QuestionListResponse, QuestionView},
};
use crate::services::{current_class, current_user, storage_error};

/// 置顶优先，其次按创建时间倒序
pub async fn list_questions(
    service: &QuestionService,
    request: &HttpRequest,
    query: QuestionListParams,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));

    let list_query = QuestionListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        tag: query.tag,
        resolved: query.resolved,
    };

    let page = match storage
        .list_questions_with_pagination(class.class.id, list_query)
        .await
    {
        Ok(page) => page,
        Err(e) => return Ok(storage_error("Failed to list questions", e)),
    };

    let ids: Vec<i64> = page.items.iter().map(|q| q.id).collect();
    let counts = match storage.count_answers(&ids).await {
        Ok(counts) => counts,
        Err(e) => return Ok(storage_error("Failed to count answers", e)),
    };

    let items = page
        .items
        .into_iter()
        .map(|q| {
            let count = counts.get(&q.id).copied().unwrap_or(0);
            QuestionView::new(q, user.id, count)
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuestionListResponse {
            pagination: page.pagination,
            items,
        },
        "Questions retrieved successfully",
    )))
}
