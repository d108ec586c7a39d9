use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{AssessError, Result};
use crate::models::assignments::{
    entities::Assignment,
    requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
};
use crate::utils::time::now;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};

impl SeaOrmStorage {
    pub async fn create_assignment_impl(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        let assignment = Assignment::from_request(0, req, now());
        let mut model = ActiveModel::from_assignment(&assignment)?;
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    pub async fn list_assignments_impl(&self, query: AssignmentListQuery) -> Result<Vec<Assignment>> {
        let mut select = Assignments::find();
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        let assignments = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(assignments.into_iter().map(|m| m.into_assignment()).collect())
    }

    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let Some(mut assignment) = self.get_assignment_by_id_impl(id).await? else {
            return Ok(None);
        };
        assignment.apply_update(update, now());

        let result = ActiveModel::from_assignment(&assignment)?
            .update(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(Some(result.into_assignment()))
    }

    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
