//! 班级问答端到端流程：通过完整路由树驱动内存 SQLite 存储

use std::sync::Arc;

use actix_web::{App, body::MessageBody, dev::ServiceResponse, http::StatusCode, test, web};
use serde_json::{Value, json};

use rust_classroom_qa::cache::ObjectCache;
use rust_classroom_qa::cache::object_cache::moka::MokaObjectCache;
use rust_classroom_qa::config::AppConfig;
use rust_classroom_qa::models::ErrorCode;
use rust_classroom_qa::models::users::entities::{User, UserRole};
use rust_classroom_qa::models::users::requests::CreateUser;
use rust_classroom_qa::routes;
use rust_classroom_qa::storage::Storage;
use rust_classroom_qa::storage::sea_orm_storage::SeaOrmStorage;
use rust_classroom_qa::utils::jwt::JwtUtils;
use rust_classroom_qa::utils::{json_error_handler, query_error_handler};

async fn new_storage() -> Arc<dyn Storage> {
    Arc::new(SeaOrmStorage::new_in_memory().await.unwrap())
}

async fn create_user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUser {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password_hash: "not-used".to_string(),
            role,
            display_name: None,
        })
        .await
        .unwrap()
}

fn bearer(user: &User) -> (&'static str, String) {
    let token = JwtUtils::generate_access_token(user.id, &user.role.to_string()).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

macro_rules! init_app {
    ($storage:expr) => {{
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaObjectCache::with_capacity(1000, 60));
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($storage))
                .app_data(web::Data::new(cache))
                .configure(routes::configure_auth_routes)
                .configure(routes::configure_classes_routes),
        )
        .await
    }};
}

async fn read_json(resp: ServiceResponse<impl MessageBody>) -> Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).unwrap()
}

fn is_class_code(code: &str) -> bool {
    code.len() == 6
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

#[actix_web::test]
async fn test_create_class_makes_creator_teacher() {
    let storage = new_storage().await;
    let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
    let app = init_app!(storage.clone());

    let req = test::TestRequest::post()
        .uri("/api/v1/classes")
        .insert_header(bearer(&teacher))
        .set_json(json!({ "name": "Algebra I" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = read_json(resp).await;
    let class = &body["data"];
    assert_eq!(class["name"], "Algebra I");
    assert!(is_class_code(class["code"].as_str().unwrap()));

    let members = class["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["user_id"], teacher.id);
    assert_eq!(members[0]["role"], "teacher");
}

#[actix_web::test]
async fn test_students_cannot_create_classes() {
    let storage = new_storage().await;
    let student = create_user(&storage, "student1", UserRole::Student).await;
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/classes")
        .insert_header(bearer(&student))
        .set_json(json!({ "name": "Algebra I" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_class_codes_are_distinct() {
    let storage = new_storage().await;
    let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
    let app = init_app!(storage);

    let mut codes = Vec::new();
    for name in ["Algebra I", "Geometry", "Physics"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(bearer(&teacher))
            .set_json(json!({ "name": name }))
            .to_request();
        let body = read_json(test::call_service(&app, req).await).await;
        codes.push(body["data"]["code"].as_str().unwrap().to_string());
    }

    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), 3);
}

#[actix_web::test]
async fn test_join_and_membership_gate() {
    let storage = new_storage().await;
    let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
    let student = create_user(&storage, "student1", UserRole::Student).await;
    let outsider = create_user(&storage, "outsider", UserRole::Student).await;
    let app = init_app!(storage.clone());

    let req = test::TestRequest::post()
        .uri("/api/v1/classes")
        .insert_header(bearer(&teacher))
        .set_json(json!({ "name": "Algebra I" }))
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    let class_id = body["data"]["id"].as_i64().unwrap();
    let code = body["data"]["code"].as_str().unwrap().to_lowercase();

    // 邀请码不区分大小写
    let req = test::TestRequest::post()
        .uri("/api/v1/classes/join")
        .insert_header(bearer(&student))
        .set_json(json!({ "code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let members = storage.list_class_member_profiles(class_id).await.unwrap();
    assert_eq!(members.len(), 2);

    let req = test::TestRequest::post()
        .uri("/api/v1/classes/join")
        .insert_header(bearer(&student))
        .set_json(json!({ "code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = read_json(resp).await;
    assert_eq!(body["code"], ErrorCode::ClassAlreadyJoined as i32);

    let req = test::TestRequest::post()
        .uri("/api/v1/classes/join")
        .insert_header(bearer(&outsider))
        .set_json(json!({ "code": "ZZZZZZ" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // 新成员可以看到班级详情
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/classes/{class_id}"))
        .insert_header(bearer(&student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 非成员在读取任何问题之前就被拒绝
    for uri in [
        format!("/api/v1/classes/{class_id}"),
        format!("/api/v1/classes/{class_id}/questions"),
    ] {
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&outsider))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    // 学生不能修改班级设置
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/classes/{class_id}"))
        .insert_header(bearer(&student))
        .set_json(json!({ "name": "Renamed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/v1/classes/9999")
        .insert_header(bearer(&student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_question_votes_and_acceptance() {
    let storage = new_storage().await;
    let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
    let asker = create_user(&storage, "student1", UserRole::Student).await;
    let helper = create_user(&storage, "student2", UserRole::Student).await;
    let app = init_app!(storage.clone());

    let req = test::TestRequest::post()
        .uri("/api/v1/classes")
        .insert_header(bearer(&teacher))
        .set_json(json!({ "name": "Algebra I" }))
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    let class_id = body["data"]["id"].as_i64().unwrap();
    let code = body["data"]["code"].as_str().unwrap().to_string();

    for user in [&asker, &helper] {
        let req = test::TestRequest::post()
            .uri("/api/v1/classes/join")
            .insert_header(bearer(user))
            .set_json(json!({ "code": code }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let base = format!("/api/v1/classes/{class_id}/questions");
    let req = test::TestRequest::post()
        .uri(&base)
        .insert_header(bearer(&asker))
        .set_json(json!({
            "title": "How do I factor x^2 - 1?",
            "description": "Stuck on homework 3.",
            "tags": ["Factoring", "factoring", "homework"]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = read_json(resp).await;
    let question_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["tags"], json!(["factoring", "homework"]));

    // 先赞成后反对，只保留反对票
    for vote in ["upvote", "downvote"] {
        let req = test::TestRequest::post()
            .uri(&format!("{base}/{question_id}/vote"))
            .insert_header(bearer(&helper))
            .set_json(json!({ "vote": vote }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
    let req = test::TestRequest::get()
        .uri(&format!("{base}/{question_id}"))
        .insert_header(bearer(&helper))
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["votes"]["score"], -1);
    assert_eq!(body["data"]["votes"]["upvotes"], 0);
    assert_eq!(body["data"]["votes"]["my_vote"], "downvote");
    assert_eq!(body["data"]["view_count"], 1);

    // 两个回答
    let mut answer_ids = Vec::new();
    for (user, content) in [(&helper, "(x - 1)(x + 1)"), (&teacher, "Difference of squares.")] {
        let req = test::TestRequest::post()
            .uri(&format!("{base}/{question_id}/answers"))
            .insert_header(bearer(user))
            .set_json(json!({ "content": content }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        answer_ids.push(read_json(resp).await["data"]["id"].as_i64().unwrap());
    }

    // 回答者不能采纳
    let req = test::TestRequest::post()
        .uri(&format!("{base}/{question_id}/answers/{}/accept", answer_ids[0]))
        .insert_header(bearer(&helper))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    // 提问者先采纳第一个，再改为第二个
    for answer_id in &answer_ids {
        let req = test::TestRequest::post()
            .uri(&format!("{base}/{question_id}/answers/{answer_id}/accept"))
            .insert_header(bearer(&asker))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["is_resolved"], true);
    }

    let answers = storage.list_answers(question_id).await.unwrap();
    let accepted: Vec<i64> = answers
        .iter()
        .filter(|a| a.is_accepted)
        .map(|a| a.id)
        .collect();
    assert_eq!(accepted, vec![answer_ids[1]]);

    let question = storage.get_question(class_id, question_id).await.unwrap().unwrap();
    assert!(question.is_resolved);

    // 删除已采纳的回答后问题仍保持已解决
    let req = test::TestRequest::delete()
        .uri(&format!("{base}/{question_id}/answers/{}", answer_ids[1]))
        .insert_header(bearer(&teacher))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let question = storage.get_question(class_id, question_id).await.unwrap().unwrap();
    assert!(question.is_resolved);
}

#[actix_web::test]
async fn test_creator_cannot_leave_but_student_can() {
    let storage = new_storage().await;
    let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
    let student = create_user(&storage, "student1", UserRole::Student).await;
    let app = init_app!(storage.clone());

    let req = test::TestRequest::post()
        .uri("/api/v1/classes")
        .insert_header(bearer(&teacher))
        .set_json(json!({ "name": "Algebra I" }))
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    let class_id = body["data"]["id"].as_i64().unwrap();
    let code = body["data"]["code"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/classes/join")
        .insert_header(bearer(&student))
        .set_json(json!({ "code": code }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/classes/{class_id}/members/{}", teacher.id))
        .insert_header(bearer(&teacher))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/classes/{class_id}/members/{}", student.id))
        .insert_header(bearer(&student))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // 离开后失去访问权限
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/classes/{class_id}"))
        .insert_header(bearer(&student))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

const BOUNDARY: &str = "classqa-test-boundary";
const PDF_BYTES: &[u8] = b"%PDF-1.7\n1 0 obj << /Type /Catalog >> endobj\ntrailer\n%%EOF\n";

/// 单个 `file` 字段的 multipart 上传请求
fn upload_request(class_id: i64, user: &User, file_name: &str, data: &[u8]) -> test::TestRequest {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    test::TestRequest::post()
        .uri(&format!("/api/v1/classes/{class_id}/files"))
        .insert_header(bearer(user))
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

macro_rules! create_class {
    ($app:expr, $owner:expr, $name:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(bearer($owner))
            .set_json(json!({ "name": $name }))
            .to_request();
        let body = read_json(test::call_service(&$app, req).await).await;
        (
            body["data"]["id"].as_i64().unwrap(),
            body["data"]["code"].as_str().unwrap().to_string(),
        )
    }};
}

#[actix_web::test]
async fn test_question_update_cannot_change_resolution() {
    let storage = new_storage().await;
    let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
    let asker = create_user(&storage, "student1", UserRole::Student).await;
    let app = init_app!(storage.clone());

    let (class_id, code) = create_class!(app, &teacher, "Algebra I");
    let req = test::TestRequest::post()
        .uri("/api/v1/classes/join")
        .insert_header(bearer(&asker))
        .set_json(json!({ "code": code }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let base = format!("/api/v1/classes/{class_id}/questions");
    let req = test::TestRequest::post()
        .uri(&base)
        .insert_header(bearer(&asker))
        .set_json(json!({
            "title": "What is a prime number?",
            "description": "Is 1 prime?"
        }))
        .to_request();
    let question_id = read_json(test::call_service(&app, req).await).await["data"]["id"]
        .as_i64()
        .unwrap();

    // 没有采纳的回答时不能手动标记为已解决
    let req = test::TestRequest::put()
        .uri(&format!("{base}/{question_id}"))
        .insert_header(bearer(&asker))
        .set_json(json!({ "title": "What exactly is a prime?", "is_resolved": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["title"], "What exactly is a prime?");
    assert_eq!(body["data"]["is_resolved"], false);

    let req = test::TestRequest::post()
        .uri(&format!("{base}/{question_id}/answers"))
        .insert_header(bearer(&teacher))
        .set_json(json!({ "content": "No, primes have exactly two divisors." }))
        .to_request();
    let answer_id = read_json(test::call_service(&app, req).await).await["data"]["id"]
        .as_i64()
        .unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("{base}/{question_id}/answers/{answer_id}/accept"))
        .insert_header(bearer(&asker))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // 采纳后也不能通过编辑撤销
    let req = test::TestRequest::put()
        .uri(&format!("{base}/{question_id}"))
        .insert_header(bearer(&teacher))
        .set_json(json!({ "is_resolved": false }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let question = storage.get_question(class_id, question_id).await.unwrap().unwrap();
    assert!(question.is_resolved);
    let answers = storage.list_answers(question_id).await.unwrap();
    assert!(answers.iter().any(|a| a.id == answer_id && a.is_accepted));
}

#[actix_web::test]
async fn test_file_upload_rules_and_attachments() {
    let storage = new_storage().await;
    let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
    let app = init_app!(storage.clone());

    let (class_id, _) = create_class!(app, &teacher, "Algebra I");
    let (other_class_id, _) = create_class!(app, &teacher, "Geometry");

    let resp = test::call_service(
        &app,
        upload_request(class_id, &teacher, "notes.pdf", PDF_BYTES).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["file"]["name"], "notes.pdf");
    let token = body["data"]["file"]["token"].as_str().unwrap().to_string();

    // 成员可以下载
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/classes/{class_id}/files/{token}"))
        .insert_header(bearer(&teacher))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, PDF_BYTES);

    // 扩展名不在班级白名单
    let resp = test::call_service(
        &app,
        upload_request(class_id, &teacher, "setup.exe", b"MZ\x90\x00").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(resp).await["code"], ErrorCode::FileTypeNotAllowed as i32);

    // 内容与扩展名不符
    let resp = test::call_service(
        &app,
        upload_request(class_id, &teacher, "fake.png", PDF_BYTES).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(resp).await["code"], ErrorCode::FileTypeNotAllowed as i32);

    // 其他班级的附件不能引用
    let resp = test::call_service(
        &app,
        upload_request(other_class_id, &teacher, "other.pdf", PDF_BYTES).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let foreign_token = read_json(resp).await["data"]["file"]["token"]
        .as_str()
        .unwrap()
        .to_string();

    let base = format!("/api/v1/classes/{class_id}/questions");
    let req = test::TestRequest::post()
        .uri(&base)
        .insert_header(bearer(&teacher))
        .set_json(json!({
            "title": "Week 1 worksheet",
            "description": "See attached.",
            "attachments": [foreign_token]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(resp).await["code"], ErrorCode::AttachmentInvalid as i32);

    let req = test::TestRequest::post()
        .uri(&base)
        .insert_header(bearer(&teacher))
        .set_json(json!({
            "title": "Week 1 worksheet",
            "description": "See attached.",
            "attachments": [token]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["attachments"][0]["token"], token.as_str());
    let question_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("{base}/{question_id}/answers"))
        .insert_header(bearer(&teacher))
        .set_json(json!({ "content": "Solutions.", "attachments": [foreign_token] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 班级单文件上限
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/classes/{class_id}"))
        .insert_header(bearer(&teacher))
        .set_json(json!({ "settings": { "max_file_size": 16 } }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        upload_request(class_id, &teacher, "big.pdf", PDF_BYTES).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(read_json(resp).await["code"], ErrorCode::FileSizeExceeded as i32);

    // 关闭上传
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/classes/{class_id}"))
        .insert_header(bearer(&teacher))
        .set_json(json!({ "settings": { "allow_uploads": false } }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        upload_request(class_id, &teacher, "notes.pdf", PDF_BYTES).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(read_json(resp).await["code"], ErrorCode::UploadsDisabled as i32);

    // 删除班级时清理上传目录
    for id in [class_id, other_class_id] {
        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/classes/{id}"))
            .insert_header(bearer(&teacher))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn test_broken_multipart_leaves_no_file_behind() {
    let storage = new_storage().await;
    let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
    let app = init_app!(storage.clone());

    // 使用第三个班级，避免与其他上传用例共享目录
    create_class!(app, &teacher, "Algebra I");
    create_class!(app, &teacher, "Geometry");
    let (class_id, _) = create_class!(app, &teacher, "Physics");

    // 完整的文件字段之后紧跟一个被截断的字段头
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(PDF_BYTES);
    body.extend_from_slice(
        format!("\r\n--{BOUNDARY}\r\nContent-Disposition: form-data; na").as_bytes(),
    );

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/classes/{class_id}/files"))
        .insert_header(bearer(&teacher))
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());

    let dir = std::path::Path::new(&AppConfig::get().upload.dir).join(class_id.to_string());
    let leftover = std::fs::read_dir(&dir)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftover, 0);
    let _ = std::fs::remove_dir_all(&dir);
}
