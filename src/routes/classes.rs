use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequireClassMember};
use crate::models::classes::requests::{
    ClassQueryParams, CreateClassRequest, JoinClassRequest, UpdateClassRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{ClassMemberService, ClassService};
use crate::utils::{SafeClassIdI64, SafeUserIdI64};

// 懒加载的全局服务实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);
static CLASS_MEMBER_SERVICE: Lazy<ClassMemberService> = Lazy::new(ClassMemberService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn join_class(
    req: HttpRequest,
    join_data: web::Json<JoinClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.join_class(&req, join_data.into_inner()).await
}

// class_id 已由 RequireClassMember 校验
pub async fn get_class(req: HttpRequest, _class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req).await
}

pub async fn update_class(
    req: HttpRequest,
    _class_id: SafeClassIdI64,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(&req, update_data.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest, _class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(&req).await
}

pub async fn list_members(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_MEMBER_SERVICE.list_members(&req).await
}

pub async fn remove_member(req: HttpRequest, user_id: SafeUserIdI64) -> ActixResult<HttpResponse> {
    CLASS_MEMBER_SERVICE.remove_member(&req, user_id.0).await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                // 用户查询自己的班级列表，管理员可以查询所有班级
                web::resource("").route(web::get().to(list_classes)).route(
                    web::post()
                        .to(create_class)
                        // 全局教师或管理员创建班级
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                // 必须先于 /{class_id} 注册
                web::resource("/join")
                    .wrap(RateLimit::join_class())
                    .route(web::post().to(join_class)),
            )
            .service(
                web::scope("/{class_id}")
                    .wrap(RequireClassMember::new())
                    .service(
                        web::resource("")
                            .route(web::get().to(get_class))
                            .route(
                                web::put()
                                    .to(update_class)
                                    .wrap(RequireClassMember::teacher()),
                            )
                            // 创建者或管理员，在服务中判定
                            .route(web::delete().to(delete_class)),
                    )
                    .route("/members", web::get().to(list_members))
                    .route("/members/{user_id}", web::delete().to(remove_member))
                    .configure(super::questions::configure_question_routes)
                    .configure(super::files::configure_file_routes),
            ),
    );
}
