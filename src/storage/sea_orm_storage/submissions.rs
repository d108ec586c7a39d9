//! 测验提交与作业提交
//!
//! 提交记录没有删除操作；更新前先在业务实体上校验状态流转。

use super::SeaOrmStorage;
use crate::entity::assignment_submissions::{
    ActiveModel as AssignmentSubmissionActiveModel, Column as AssignmentSubmissionColumn,
    Entity as AssignmentSubmissions,
};
use crate::entity::quiz_submissions::{
    ActiveModel as QuizSubmissionActiveModel, Column as QuizSubmissionColumn,
    Entity as QuizSubmissions,
};
use crate::errors::{AssessError, Result};
use crate::models::{
    assignment_submissions::{
        entities::AssignmentSubmission,
        requests::{
            AssignmentSubmissionListQuery, CreateAssignmentSubmissionRequest,
            UpdateAssignmentSubmissionRequest,
        },
    },
    quiz_submissions::{
        entities::QuizSubmission,
        requests::{
            CreateQuizSubmissionRequest, QuizSubmissionListQuery, UpdateQuizSubmissionRequest,
        },
    },
};
use crate::utils::time::now;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};

impl SeaOrmStorage {
    // ============ 测验提交 ============

    pub async fn create_quiz_submission_impl(
        &self,
        req: CreateQuizSubmissionRequest,
    ) -> Result<QuizSubmission> {
        let submission = QuizSubmission::from_request(0, req, now());
        let mut model = QuizSubmissionActiveModel::from_quiz_submission(&submission)?;
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("创建测验提交失败: {e}")))?;

        Ok(result.into_quiz_submission())
    }

    pub async fn get_quiz_submission_by_id_impl(&self, id: i64) -> Result<Option<QuizSubmission>> {
        let result = QuizSubmissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询测验提交失败: {e}")))?;

        Ok(result.map(|m| m.into_quiz_submission()))
    }

    pub async fn list_quiz_submissions_impl(
        &self,
        query: QuizSubmissionListQuery,
    ) -> Result<Vec<QuizSubmission>> {
        let mut select = QuizSubmissions::find();
        if let Some(quiz_id) = query.quiz_id {
            select = select.filter(QuizSubmissionColumn::QuizId.eq(quiz_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(QuizSubmissionColumn::StudentId.eq(student_id));
        }

        let submissions = select
            .order_by_asc(QuizSubmissionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询测验提交列表失败: {e}")))?;

        Ok(submissions
            .into_iter()
            .map(|m| m.into_quiz_submission())
            .collect())
    }

    pub async fn update_quiz_submission_impl(
        &self,
        id: i64,
        update: UpdateQuizSubmissionRequest,
    ) -> Result<Option<QuizSubmission>> {
        let Some(mut submission) = self.get_quiz_submission_by_id_impl(id).await? else {
            return Ok(None);
        };
        submission.apply_update(update, now())?;

        let result = QuizSubmissionActiveModel::from_quiz_submission(&submission)?
            .update(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("更新测验提交失败: {e}")))?;

        Ok(Some(result.into_quiz_submission()))
    }

    // ============ 作业提交 ============

    pub async fn create_assignment_submission_impl(
        &self,
        req: CreateAssignmentSubmissionRequest,
    ) -> Result<AssignmentSubmission> {
        let submission = AssignmentSubmission::from_request(0, req, now());
        let mut model = AssignmentSubmissionActiveModel::from_assignment_submission(&submission)?;
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("创建作业提交失败: {e}")))?;

        Ok(result.into_assignment_submission())
    }

    pub async fn get_assignment_submission_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<AssignmentSubmission>> {
        let result = AssignmentSubmissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询作业提交失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment_submission()))
    }

    pub async fn list_assignment_submissions_impl(
        &self,
        query: AssignmentSubmissionListQuery,
    ) -> Result<Vec<AssignmentSubmission>> {
        let mut select = AssignmentSubmissions::find();
        if let Some(assignment_id) = query.assignment_id {
            select = select.filter(AssignmentSubmissionColumn::AssignmentId.eq(assignment_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(AssignmentSubmissionColumn::StudentId.eq(student_id));
        }

        let submissions = select
            .order_by_asc(AssignmentSubmissionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询作业提交列表失败: {e}")))?;

        Ok(submissions
            .into_iter()
            .map(|m| m.into_assignment_submission())
            .collect())
    }

    pub async fn update_assignment_submission_impl(
        &self,
        id: i64,
        update: UpdateAssignmentSubmissionRequest,
    ) -> Result<Option<AssignmentSubmission>> {
        let Some(mut submission) = self.get_assignment_submission_by_id_impl(id).await? else {
            return Ok(None);
        };
        submission.apply_update(update, now())?;

        let result = AssignmentSubmissionActiveModel::from_assignment_submission(&submission)?
            .update(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("更新作业提交失败: {e}")))?;

        Ok(Some(result.into_assignment_submission()))
    }
}
