use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::common::VoteRequest;
use crate::models::questions::requests::{
    CreateQuestionRequest, QuestionListParams, UpdateQuestionRequest,
};
use crate::services::QuestionService;
use crate::utils::SafeQuestionIdI64;

// 懒加载的全局 QuestionService 实例
static QUESTION_SERVICE: Lazy<QuestionService> = Lazy::new(QuestionService::new_lazy);

pub async fn list_questions(
    req: HttpRequest,
    query: web::Query<QuestionListParams>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .list_questions(&req, query.into_inner())
        .await
}

pub async fn create_question(
    req: HttpRequest,
    question_data: web::Json<CreateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .create_question(&req, question_data.into_inner())
        .await
}

pub async fn get_question(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.get_question(&req, question_id.0).await
}

pub async fn update_question(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
    update_data: web::Json<UpdateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .update_question(&req, question_id.0, update_data.into_inner())
        .await
}

pub async fn vote_question(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
    vote: web::Json<VoteRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .vote_question(&req, question_id.0, vote.into_inner())
        .await
}

pub async fn delete_question(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.delete_question(&req, question_id.0).await
}

// 挂载在 /api/v1/classes/{class_id} 作用域下，成员校验由外层完成
pub fn configure_question_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/questions")
            .service(
                web::resource("")
                    .route(web::get().to(list_questions))
                    .route(web::post().to(create_question)),
            )
            .service(
                web::resource("/{question_id}")
                    .route(web::get().to(get_question))
                    .route(web::put().to(update_question))
                    .route(web::delete().to(delete_question)),
            )
            .route("/{question_id}/vote", web::post().to(vote_question))
            .configure(super::answers::configure_answer_routes),
    );
}
