//! 测验与测验题目关联

use super::SeaOrmStorage;
use crate::entity::quiz_questions::{
    ActiveModel as LinkActiveModel, Column as LinkColumn, Entity as QuizQuestions,
};
use crate::entity::quizzes::{ActiveModel, Column, Entity as Quizzes};
use crate::errors::{AssessError, Result};
use crate::models::quizzes::{
    entities::{PublicAccess, Quiz, QuizQuestion},
    requests::{CreateQuizQuestionRequest, CreateQuizRequest, QuizListQuery, UpdateQuizRequest},
};
use crate::utils::time::now;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_quiz_impl(&self, req: CreateQuizRequest) -> Result<Quiz> {
        let quiz = Quiz::from_request(0, req, now());
        let mut model = ActiveModel::from_quiz(&quiz)?;
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("创建测验失败: {e}")))?;

        Ok(result.into_quiz())
    }

    pub async fn get_quiz_by_id_impl(&self, id: i64) -> Result<Option<Quiz>> {
        let result = Quizzes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询测验失败: {e}")))?;

        Ok(result.map(|m| m.into_quiz()))
    }

    pub async fn get_quiz_by_public_token_impl(&self, token: &str) -> Result<Option<Quiz>> {
        let result = Quizzes::find()
            .filter(Column::PublicToken.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询测验失败: {e}")))?;

        Ok(result.map(|m| m.into_quiz()))
    }

    pub async fn list_quizzes_impl(&self, query: QuizListQuery) -> Result<Vec<Quiz>> {
        let mut select = Quizzes::find();
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        let quizzes = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询测验列表失败: {e}")))?;

        Ok(quizzes.into_iter().map(|m| m.into_quiz()).collect())
    }

    pub async fn update_quiz_impl(&self, id: i64, update: UpdateQuizRequest) -> Result<Option<Quiz>> {
        let Some(mut quiz) = self.get_quiz_by_id_impl(id).await? else {
            return Ok(None);
        };
        quiz.apply_update(update, now());
        self.save_quiz(&quiz).await.map(Some)
    }

    pub async fn set_quiz_public_access_impl(
        &self,
        id: i64,
        access: PublicAccess,
    ) -> Result<Option<Quiz>> {
        let Some(mut quiz) = self.get_quiz_by_id_impl(id).await? else {
            return Ok(None);
        };
        quiz.apply_public_access(access, now());
        self.save_quiz(&quiz).await.map(Some)
    }

    async fn save_quiz(&self, quiz: &Quiz) -> Result<Quiz> {
        let result = ActiveModel::from_quiz(quiz)?
            .update(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("更新测验失败: {e}")))?;
        Ok(result.into_quiz())
    }

    /// 删除测验及其题目关联
    pub async fn delete_quiz_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AssessError::database_operation(format!("开启事务失败: {e}")))?;

        QuizQuestions::delete_many()
            .filter(LinkColumn::QuizId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AssessError::database_operation(format!("删除测验题目关联失败: {e}")))?;

        let result = Quizzes::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AssessError::database_operation(format!("删除测验失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AssessError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // ============ 测验题目关联 ============

    pub async fn add_quiz_question_impl(
        &self,
        quiz_id: i64,
        req: CreateQuizQuestionRequest,
    ) -> Result<QuizQuestion> {
        let order_index = match req.order_index {
            Some(index) => {
                let taken = QuizQuestions::find()
                    .filter(LinkColumn::QuizId.eq(quiz_id))
                    .filter(LinkColumn::OrderIndex.eq(index))
                    .count(&self.db)
                    .await
                    .map_err(|e| {
                        AssessError::database_operation(format!("查询测验题目关联失败: {e}"))
                    })?;
                if taken > 0 {
                    return Err(AssessError::conflict(format!(
                        "Order index {index} is already used in quiz {quiz_id}"
                    )));
                }
                index
            }
            None => {
                let last = QuizQuestions::find()
                    .filter(LinkColumn::QuizId.eq(quiz_id))
                    .order_by_desc(LinkColumn::OrderIndex)
                    .one(&self.db)
                    .await
                    .map_err(|e| {
                        AssessError::database_operation(format!("查询测验题目关联失败: {e}"))
                    })?;
                last.map_or(0, |l| l.order_index + 1)
            }
        };

        let link = QuizQuestion::from_request(0, quiz_id, req, order_index);
        let mut model = LinkActiveModel::from_quiz_question(&link);
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("添加测验题目失败: {e}")))?;

        Ok(result.into_quiz_question())
    }

    pub async fn list_quiz_questions_impl(&self, quiz_id: i64) -> Result<Vec<QuizQuestion>> {
        let links = QuizQuestions::find()
            .filter(LinkColumn::QuizId.eq(quiz_id))
            .order_by_asc(LinkColumn::OrderIndex)
            .order_by_asc(LinkColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询测验题目失败: {e}")))?;

        Ok(links.into_iter().map(|m| m.into_quiz_question()).collect())
    }

    pub async fn remove_quiz_question_impl(&self, quiz_id: i64, question_id: i64) -> Result<bool> {
        let result = QuizQuestions::delete_many()
            .filter(LinkColumn::QuizId.eq(quiz_id))
            .filter(LinkColumn::QuestionId.eq(question_id))
            .exec(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("移除测验题目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
