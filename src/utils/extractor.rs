//! 路径参数安全提取器
//!
//! 从路由匹配信息中按名称取出参数并校验，失败时直接返回 400 JSON 响应，
//! 避免处理函数收到非法 ID。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 构造路径参数错误
pub fn invalid_path_param(param: &'static str) -> actix_web::Error {
    InternalError::from_response(
        format!("Invalid path parameter: {param}"),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Invalid path parameter: {param}"),
        )),
    )
    .into()
}

/// 定义一个从路径中提取正整数 ID 的提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = std::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                let parsed = req
                    .match_info()
                    .get($param)
                    .and_then(|s| s.parse::<i64>().ok())
                    .filter(|id| *id > 0);
                std::future::ready(match parsed {
                    Some(id) => Ok($name(id)),
                    None => Err($crate::utils::extractor::invalid_path_param($param)),
                })
            }
        }
    };
}

define_safe_i64_extractor!(SafeClassIdI64, "class_id");
define_safe_i64_extractor!(SafeQuestionIdI64, "question_id");
define_safe_i64_extractor!(SafeAnswerIdI64, "answer_id");
define_safe_i64_extractor!(SafeUserIdI64, "user_id");

/// 文件令牌（UUID 格式）
#[derive(Debug, Clone)]
pub struct SafeFileToken(pub String);

impl FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .match_info()
            .get("file_token")
            .filter(|s| uuid::Uuid::parse_str(s).is_ok())
            .map(|s| SafeFileToken(s.to_string()));
        ready(token.ok_or_else(|| invalid_path_param("file_token")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extract_valid_id() {
        let req = TestRequest::default()
            .param("class_id", "42")
            .to_http_request();
        let id = SafeClassIdI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_reject_invalid_id() {
        for raw in ["0", "-3", "abc", ""] {
            let req = TestRequest::default()
                .param("question_id", raw)
                .to_http_request();
            assert!(SafeQuestionIdI64::extract(&req).await.is_err());
        }
    }

    #[actix_web::test]
    async fn test_file_token_requires_uuid() {
        let req = TestRequest::default()
            .param("file_token", "not-a-uuid")
            .to_http_request();
        assert!(SafeFileToken::extract(&req).await.is_err());

        let token = uuid::Uuid::new_v4().to_string();
        let req = TestRequest::default()
            .param("file_token", token.clone())
            .to_http_request();
        assert_eq!(SafeFileToken::extract(&req).await.unwrap().0, token);
    }
}
