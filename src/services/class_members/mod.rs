pub mod list;
pub mod remove;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct ClassMemberService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassMemberService {
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

    // 成员列表及其用户资料
    pub async fn list_members(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_members(self, request).await
    }

    // 移除成员或自行退出
    pub async fn remove_member(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        remove::remove_member(self, request, user_id).await
    }
}
