pub mod accept;
pub mod create;
pub mod delete;
pub mod list;
pub mod update;
pub mod vote;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::answers::{
    entities::Answer,
    requests::{CreateAnswerRequest, UpdateAnswerRequest},
};
use crate::models::common::VoteRequest;
use crate::storage::Storage;

pub struct AnswerService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnswerService {
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

    // 采纳的回答在前，其次按得分与时间
    pub async fn list_answers(
        &self,
        request: &HttpRequest,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_answers(self, request, question_id).await
    }

    pub async fn create_answer(
        &self,
        request: &HttpRequest,
        question_id: i64,
        answer_data: CreateAnswerRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_answer(self, request, question_id, answer_data).await
    }

    pub async fn update_answer(
        &self,
        request: &HttpRequest,
        question_id: i64,
        answer_id: i64,
        update_data: UpdateAnswerRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_answer(self, request, question_id, answer_id, update_data).await
    }

    pub async fn vote_answer(
        &self,
        request: &HttpRequest,
        question_id: i64,
        answer_id: i64,
        vote: VoteRequest,
    ) -> ActixResult<HttpResponse> {
        vote::vote_answer(self, request, question_id, answer_id, vote).await
    }

    pub async fn accept_answer(
        &self,
        request: &HttpRequest,
        question_id: i64,
        answer_id: i64,
    ) -> ActixResult<HttpResponse> {
        accept::accept_answer(self, request, question_id, answer_id).await
    }

    pub async fn delete_answer(
        &self,
        request: &HttpRequest,
        question_id: i64,
        answer_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_answer(self, request, question_id, answer_id).await
    }
}

fn answer_not_found() -> HttpResponse {
    super::error_json(StatusCode::NOT_FOUND, ErrorCode::AnswerNotFound, "Answer not found")
}

/// 读取问题下未删除的回答
async fn load_answer(
    storage: &Arc<dyn Storage>,
    question_id: i64,
    answer_id: i64,
) -> Result<Answer, HttpResponse> {
    match storage.get_answer(question_id, answer_id).await {
        Ok(Some(answer)) => Ok(answer),
        Ok(None) => Err(answer_not_found()),
        Err(e) => Err(super::storage_error("Failed to load answer", e)),
    }
}
