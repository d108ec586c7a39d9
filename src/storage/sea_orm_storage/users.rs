use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{AssessError, Result};
use crate::models::users::{
    entities::{User, UserRole},
    requests::{CreateUserRequest, UpdateAiSettingsRequest, UpdateUserRequest},
};
use crate::utils::time::now;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let user = User::from_request(0, req, now());
        let mut model = ActiveModel::from_user(&user)?;
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 列出用户
    pub async fn list_users_impl(&self, role: Option<UserRole>) -> Result<Vec<User>> {
        let mut select = Users::find();
        if let Some(role) = role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        let users = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let Some(mut user) = self.get_user_by_id_impl(id).await? else {
            return Ok(None);
        };
        user.apply_update(update, now());
        self.save_user(&user).await.map(Some)
    }

    /// 更新 AI 设置
    pub async fn update_user_ai_settings_impl(
        &self,
        id: i64,
        update: UpdateAiSettingsRequest,
    ) -> Result<Option<User>> {
        let Some(mut user) = self.get_user_by_id_impl(id).await? else {
            return Ok(None);
        };
        user.apply_ai_settings(update, now());
        self.save_user(&user).await.map(Some)
    }

    async fn save_user(&self, user: &User) -> Result<User> {
        let result = ActiveModel::from_user(user)?
            .update(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("更新用户失败: {e}")))?;
        Ok(result.into_user())
    }
}
