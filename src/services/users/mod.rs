pub mod ai_settings;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::common::{ApiResult, app_storage};
use crate::models::users::requests::{UpdateAiSettingsRequest, UserListParams};
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_storage(request),
        }
    }

    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 获取当前用户的 AI 设置
    pub async fn get_ai_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        ai_settings::get_ai_settings(request).await
    }

    // 更新当前用户的 AI 设置
    pub async fn update_ai_settings(
        &self,
        update: UpdateAiSettingsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        ai_settings::update_ai_settings(self, update, request).await
    }
}
