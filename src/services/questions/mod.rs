pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;
pub mod vote;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::common::VoteRequest;
use crate::models::questions::{
    entities::Question,
    requests::{CreateQuestionRequest, QuestionListParams, UpdateQuestionRequest},
    responses::QuestionView,
};
use crate::storage::Storage;

pub struct QuestionService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuestionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>, HttpResponse> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::app_storage(request),
        }
    }

    pub async fn list_questions(
        &self,
        request: &HttpRequest,
        query: QuestionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_questions(self, request, query).await
    }

    pub async fn create_question(
        &self,
        request: &HttpRequest,
        question_data: CreateQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_question(self, request, question_data).await
    }

    // 问题详情，同时增加浏览量
    pub async fn get_question(
        &self,
        request: &HttpRequest,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_question(self, request, question_id).await
    }

    pub async fn update_question(
        &self,
        request: &HttpRequest,
        question_id: i64,
        update_data: UpdateQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_question(self, request, question_id, update_data).await
    }

    pub async fn vote_question(
        &self,
        request: &HttpRequest,
        question_id: i64,
        vote: VoteRequest,
    ) -> ActixResult<HttpResponse> {
        vote::vote_question(self, request, question_id, vote).await
    }

    pub async fn delete_question(
        &self,
        request: &HttpRequest,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_question(self, request, question_id).await
    }
}

fn question_not_found() -> HttpResponse {
    super::error_json(
        StatusCode::NOT_FOUND,
        ErrorCode::QuestionNotFound,
        "Question not found",
    )
}

/// 读取班级内未删除的问题
pub(crate) async fn load_question(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    question_id: i64,
) -> Result<Question, HttpResponse> {
    match storage.get_question(class_id, question_id).await {
        Ok(Some(question)) => Ok(question),
        Ok(None) => Err(question_not_found()),
        Err(e) => Err(super::storage_error("Failed to load question", e)),
    }
}

/// 附带回答数与投票摘要
async fn question_view(
    storage: &Arc<dyn Storage>,
    question: Question,
    viewer_id: i64,
) -> Result<QuestionView, HttpResponse> {
    let counts = storage
        .count_answers(&[question.id])
        .await
        .map_err(|e| super::storage_error("Failed to count answers", e))?;
    let answer_count = counts.get(&question.id).copied().unwrap_or(0);
    Ok(QuestionView::new(question, viewer_id, answer_count))
}
