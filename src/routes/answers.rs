use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::answers::requests::{CreateAnswerRequest, UpdateAnswerRequest};
use crate::models::common::VoteRequest;
use crate::services::AnswerService;
use crate::utils::{SafeAnswerIdI64, SafeQuestionIdI64};

// 懒加载的全局 AnswerService 实例
static ANSWER_SERVICE: Lazy<AnswerService> = Lazy::new(AnswerService::new_lazy);

pub async fn list_answers(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
) -> ActixResult<HttpResponse> {
    ANSWER_SERVICE.list_answers(&req, question_id.0).await
}

pub async fn create_answer(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
    answer_data: web::Json<CreateAnswerRequest>,
) -> ActixResult<HttpResponse> {
    ANSWER_SERVICE
        .create_answer(&req, question_id.0, answer_data.into_inner())
        .await
}

pub async fn update_answer(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
    answer_id: SafeAnswerIdI64,
    update_data: web::Json<UpdateAnswerRequest>,
) -> ActixResult<HttpResponse> {
    ANSWER_SERVICE
        .update_answer(&req, question_id.0, answer_id.0, update_data.into_inner())
        .await
}

pub async fn vote_answer(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
    answer_id: SafeAnswerIdI64,
    vote: web::Json<VoteRequest>,
) -> ActixResult<HttpResponse> {
    ANSWER_SERVICE
        .vote_answer(&req, question_id.0, answer_id.0, vote.into_inner())
        .await
}

pub async fn accept_answer(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
    answer_id: SafeAnswerIdI64,
) -> ActixResult<HttpResponse> {
    ANSWER_SERVICE
        .accept_answer(&req, question_id.0, answer_id.0)
        .await
}

pub async fn delete_answer(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
    answer_id: SafeAnswerIdI64,
) -> ActixResult<HttpResponse> {
    ANSWER_SERVICE
        .delete_answer(&req, question_id.0, answer_id.0)
        .await
}

// 挂载在 /questions 作用域下
pub fn configure_answer_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/{question_id}/answers")
            .service(
                web::resource("")
                    .route(web::get().to(list_answers))
                    .route(web::post().to(create_answer)),
            )
            .service(
                web::resource("/{answer_id}")
                    .route(web::put().to(update_answer))
                    .route(web::delete().to(delete_answer)),
            )
            .route("/{answer_id}/vote", web::post().to(vote_answer))
            .route("/{answer_id}/accept", web::post().to(accept_answer)),
    );
}
