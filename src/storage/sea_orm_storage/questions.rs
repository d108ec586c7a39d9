use super::SeaOrmStorage;
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::entity::quiz_questions::{Column as LinkColumn, Entity as QuizQuestions};
use crate::errors::{AssessError, Result};
use crate::models::questions::{
    entities::Question,
    requests::{CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest},
};
use crate::utils::time::now;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建题目
    pub async fn create_question_impl(&self, req: CreateQuestionRequest) -> Result<Question> {
        let question = Question::from_request(0, req, now());
        let mut model = ActiveModel::from_question(&question)?;
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("创建题目失败: {e}")))?;

        Ok(result.into_question())
    }

    pub async fn get_question_by_id_impl(&self, id: i64) -> Result<Option<Question>> {
        let result = Questions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询题目失败: {e}")))?;

        Ok(result.map(|m| m.into_question()))
    }

    pub async fn list_questions_impl(&self, query: QuestionListQuery) -> Result<Vec<Question>> {
        let mut select = Questions::find();
        if let Some(instructor_id) = query.instructor_id {
            select = select.filter(Column::InstructorId.eq(instructor_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        let questions = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询题目列表失败: {e}")))?;

        Ok(questions.into_iter().map(|m| m.into_question()).collect())
    }

    pub async fn update_question_impl(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>> {
        let Some(mut question) = self.get_question_by_id_impl(id).await? else {
            return Ok(None);
        };
        question.apply_update(update, now());

        let result = ActiveModel::from_question(&question)?
            .update(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("更新题目失败: {e}")))?;

        Ok(Some(result.into_question()))
    }

    /// 删除题目，并从所有测验中移除
    pub async fn delete_question_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AssessError::database_operation(format!("开启事务失败: {e}")))?;

        QuizQuestions::delete_many()
            .filter(LinkColumn::QuestionId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AssessError::database_operation(format!("删除测验题目关联失败: {e}")))?;

        let result = Questions::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AssessError::database_operation(format!("删除题目失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AssessError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
