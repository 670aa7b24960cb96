/*!
 * 班级成员访问控制中间件
 *
 * 此中间件必须在 RequireJWT 中间件之后使用，作用于路径中含 `{class_id}` 的路由。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::{RequireJWT, RequireClassMember};
 *
 * web::scope("/classes/{class_id}")
 *     .wrap(RequireClassMember::new())      // 班级成员即可
 *     .wrap(RequireJWT)
 *     .route("/questions", web::get().to(list_questions));
 *
 * web::resource("/classes/{class_id}/members/{user_id}")
 *     .wrap(RequireClassMember::teacher())  // 需要班级教师身份
 *     .route(web::delete().to(remove_member));
 * ```
 *
 * ## 判定规则
 *
 * - 班级不存在返回 404
 * - 全局管理员总是放行
 * - 非成员或身份不足返回 403
 *
 * 通过后 `ClassWithMembers` 会被放入请求扩展，可用 [`RequireClassMember::extract_class`] 读取。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use crate::cache::{self, ObjectCache};
use crate::config::AppConfig;
use crate::models::{ErrorCode, classes::entities::ClassWithMembers, users::entities::User};
use crate::storage::Storage;

use super::create_error_response;

/// 访问班级所需的最低身份
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassAccess {
    Member,
    Teacher,
}

#[derive(Clone)]
pub struct RequireClassMember {
    access: ClassAccess,
}

impl Default for RequireClassMember {
    fn default() -> Self {
        Self::new()
    }
}

impl RequireClassMember {
    /// 任意班级成员
    pub fn new() -> Self {
        Self {
            access: ClassAccess::Member,
        }
    }

    /// 班级教师
    pub fn teacher() -> Self {
        Self {
            access: ClassAccess::Teacher,
        }
    }

    /// 从请求扩展中读取已加载的班级
    pub fn extract_class(req: &actix_web::HttpRequest) -> Option<ClassWithMembers> {
        req.extensions().get::<ClassWithMembers>().cloned()
    }
}

/// 先查缓存，未命中时从存储加载并写回
async fn load_class(req: &ServiceRequest, class_id: i64) -> Result<Option<ClassWithMembers>, String> {
    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or("Cache not found in app data")?;

    let key = cache::class_key(class_id);
    if let Some(class) = cache::get_json::<ClassWithMembers>(cache.as_ref(), &key).await {
        return Ok(Some(class));
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or("Storage not found in app data")?;

    let class = storage
        .get_class_with_members(class_id)
        .await
        .map_err(|e| format!("Failed to load class {class_id}: {e}"))?;

    if let Some(ref class) = class {
        cache::insert_json(cache.as_ref(), key, class, AppConfig::get().cache.default_ttl).await;
    }

    Ok(class)
}

/// 判断用户是否满足所需身份
fn has_access(class: &ClassWithMembers, user: &User, access: ClassAccess) -> bool {
    match access {
        ClassAccess::Member => class.can_view(user),
        ClassAccess::Teacher => class.can_administer(user),
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireClassMember
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireClassMemberMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireClassMemberMiddleware {
            service: Rc::new(service),
            access: self.access,
        }))
    }
}

pub struct RequireClassMemberMiddleware<S> {
    service: Rc<S>,
    access: ClassAccess,
}

impl<S, B> Service<ServiceRequest> for RequireClassMemberMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let access = self.access;

        Box::pin(async move {
            let reject = |req: ServiceRequest, response: HttpResponse| {
                Ok(req.into_response(response.map_into_right_body()))
            };

            // 1. 当前用户
            let Some(user) = req.extensions().get::<User>().cloned() else {
                return reject(
                    req,
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Unauthorized: missing user",
                    ),
                );
            };

            // 2. class_id
            let Some(class_id) = req
                .match_info()
                .get("class_id")
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|id| *id > 0)
            else {
                return reject(
                    req,
                    create_error_response(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::BadRequest,
                        "Missing or invalid class_id",
                    ),
                );
            };

            // 3. 加载班级
            let class = match load_class(&req, class_id).await {
                Ok(Some(class)) => class,
                Ok(None) => {
                    return reject(
                        req,
                        create_error_response(
                            StatusCode::NOT_FOUND,
                            ErrorCode::ClassNotFound,
                            "Class not found",
                        ),
                    );
                }
                Err(e) => {
                    error!("{}", e);
                    return reject(
                        req,
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Internal server error",
                        ),
                    );
                }
            };

            // 4. 身份判定
            if !has_access(&class, &user, access) {
                info!(
                    "User {} denied {:?} access to class {}",
                    user.id, access, class_id
                );
                return reject(
                    req,
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::ClassPermissionDenied,
                        "No permission for this class",
                    ),
                );
            }

            debug!("User {} granted {:?} access to class {}", user.id, access, class_id);
            req.extensions_mut().insert(class);
            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaObjectCache;
    use crate::models::class_members::entities::ClassMemberRole;
    use crate::models::classes::entities::sample_class;
    use crate::models::users::entities::{UserRole, sample_user};
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::{App, HttpRequest};

    async fn class_name(req: HttpRequest) -> HttpResponse {
        match RequireClassMember::extract_class(&req) {
            Some(class) => HttpResponse::Ok().body(class.class.name),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    #[test]
    fn test_has_access() {
        let class = sample_class(
            1,
            &[(1, ClassMemberRole::Teacher), (2, ClassMemberRole::Student)],
        );
        let teacher = sample_user(1, UserRole::Teacher);
        let student = sample_user(2, UserRole::Student);
        let outsider = sample_user(3, UserRole::Teacher);
        let admin = sample_user(4, UserRole::Admin);

        assert!(has_access(&class, &teacher, ClassAccess::Teacher));
        assert!(has_access(&class, &student, ClassAccess::Member));
        assert!(!has_access(&class, &student, ClassAccess::Teacher));
        assert!(!has_access(&class, &outsider, ClassAccess::Member));
        assert!(has_access(&class, &admin, ClassAccess::Teacher));
    }

    #[actix_web::test]
    async fn test_membership_gate() {
        use actix_web::test;

        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaObjectCache::with_capacity(100, 60));

        // 班级 1 预先写入缓存
        let class = sample_class(1, &[(1, ClassMemberRole::Teacher), (2, ClassMemberRole::Student)]);
        cache::insert_json(cache.as_ref(), cache::class_key(1), &class, 60).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(cache))
                .service(
                    web::resource("/classes/{class_id}")
                        .wrap(RequireClassMember::new())
                        .route(web::get().to(class_name)),
                )
                .service(
                    web::resource("/classes/{class_id}/settings")
                        .wrap(RequireClassMember::teacher())
                        .route(web::get().to(class_name)),
                ),
        )
        .await;

        let call = |uri: &str, user_id: i64, role: UserRole| {
            let req = test::TestRequest::get().uri(uri).to_request();
            req.extensions_mut().insert(sample_user(user_id, role));
            req
        };

        let resp = test::call_service(&app, call("/classes/1", 2, UserRole::Student)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "Algebra I");

        let resp = test::call_service(&app, call("/classes/1", 3, UserRole::Teacher)).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = test::call_service(&app, call("/classes/1/settings", 2, UserRole::Student)).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = test::call_service(&app, call("/classes/1/settings", 1, UserRole::Teacher)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(&app, call("/classes/1", 9, UserRole::Admin)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // 存储中不存在
        let resp = test::call_service(&app, call("/classes/42", 1, UserRole::Teacher)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(&app, call("/classes/abc", 1, UserRole::Teacher)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
