//! 监考违规、公开测验提交与聊天记录（仅追加）

use super::SeaOrmStorage;
use crate::entity::chat_commands::{
    ActiveModel as ChatActiveModel, Column as ChatColumn, Entity as ChatCommands,
};
use crate::entity::proctoring_violations::{
    ActiveModel as ViolationActiveModel, Column as ViolationColumn, Entity as Violations,
};
use crate::entity::public_quiz_submissions::{
    ActiveModel as PublicActiveModel, Column as PublicColumn, Entity as PublicSubmissions,
};
use crate::errors::{AssessError, Result};
use crate::models::{
    chat::{entities::ChatCommand, requests::CreateChatCommandRequest},
    proctoring::{
        entities::ProctoringViolation,
        requests::{CreateViolationRequest, UpdateViolationRequest},
    },
    public_quiz::{entities::PublicQuizSubmission, requests::CreatePublicSubmissionRequest},
};
use crate::utils::time::now;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};

impl SeaOrmStorage {
    // ============ 监考违规 ============

    pub async fn create_violation_impl(
        &self,
        req: CreateViolationRequest,
    ) -> Result<ProctoringViolation> {
        let violation = ProctoringViolation::from_request(0, req, now());
        let mut model = ViolationActiveModel::from_violation(&violation)?;
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("记录违规失败: {e}")))?;

        Ok(result.into_violation())
    }

    pub async fn list_violations_impl(
        &self,
        submission_id: Option<i64>,
    ) -> Result<Vec<ProctoringViolation>> {
        let mut select = Violations::find();
        if let Some(submission_id) = submission_id {
            select = select.filter(ViolationColumn::SubmissionId.eq(submission_id));
        }

        let violations = select
            .order_by_asc(ViolationColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询违规记录失败: {e}")))?;

        Ok(violations.into_iter().map(|m| m.into_violation()).collect())
    }

    pub async fn update_violation_impl(
        &self,
        id: i64,
        update: UpdateViolationRequest,
    ) -> Result<Option<ProctoringViolation>> {
        let existing = Violations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询违规记录失败: {e}")))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut violation = existing.into_violation();
        violation.apply_update(update);

        let result = ViolationActiveModel::from_violation(&violation)?
            .update(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("更新违规记录失败: {e}")))?;

        Ok(Some(result.into_violation()))
    }

    // ============ 公开测验提交 ============

    pub async fn create_public_submission_impl(
        &self,
        req: CreatePublicSubmissionRequest,
    ) -> Result<PublicQuizSubmission> {
        let submission = PublicQuizSubmission::from_request(0, req, now());
        let mut model = PublicActiveModel::from_public_submission(&submission)?;
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("保存公开提交失败: {e}")))?;

        Ok(result.into_public_submission())
    }

    pub async fn list_public_submissions_impl(
        &self,
        quiz_id: Option<i64>,
    ) -> Result<Vec<PublicQuizSubmission>> {
        let mut select = PublicSubmissions::find();
        if let Some(quiz_id) = quiz_id {
            select = select.filter(PublicColumn::QuizId.eq(quiz_id));
        }

        let submissions = select
            .order_by_asc(PublicColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询公开提交失败: {e}")))?;

        Ok(submissions
            .into_iter()
            .map(|m| m.into_public_submission())
            .collect())
    }

    // ============ 聊天记录 ============

    pub async fn create_chat_command_impl(
        &self,
        req: CreateChatCommandRequest,
    ) -> Result<ChatCommand> {
        let command = ChatCommand::from_request(0, req, now());
        let mut model = ChatActiveModel::from_chat_command(&command);
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("保存聊天记录失败: {e}")))?;

        Ok(result.into_chat_command())
    }

    pub async fn list_chat_commands_impl(&self, user_id: Option<i64>) -> Result<Vec<ChatCommand>> {
        let mut select = ChatCommands::find();
        if let Some(user_id) = user_id {
            select = select.filter(ChatColumn::UserId.eq(user_id));
        }

        let commands = select
            .order_by_asc(ChatColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询聊天记录失败: {e}")))?;

        Ok(commands.into_iter().map(|m| m.into_chat_command()).collect())
    }
}
