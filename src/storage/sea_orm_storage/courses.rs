//! 课程、讲义与选课

use super::SeaOrmStorage;
use crate::entity::courses::{ActiveModel as CourseActiveModel, Column as CourseColumn, Entity as Courses};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::lectures::{
    ActiveModel as LectureActiveModel, Column as LectureColumn, Entity as Lectures,
};
use crate::errors::{AssessError, Result};
use crate::models::{
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
    },
    enrollments::{
        entities::Enrollment,
        requests::{CreateEnrollmentRequest, EnrollmentListQuery},
    },
    lectures::{
        entities::Lecture,
        requests::{CreateLectureRequest, LectureListQuery, UpdateLectureRequest},
    },
};
use crate::utils::time::now;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

impl SeaOrmStorage {
    // ============ 课程 ============

    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let course = Course::from_request(0, req, now());
        let mut model = CourseActiveModel::from_course(&course);
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn list_courses_impl(&self, query: CourseListQuery) -> Result<Vec<Course>> {
        let mut select = Courses::find();
        if let Some(instructor_id) = query.instructor_id {
            select = select.filter(CourseColumn::InstructorId.eq(instructor_id));
        }

        let courses = select
            .order_by_asc(CourseColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let Some(mut course) = self.get_course_by_id_impl(id).await? else {
            return Ok(None);
        };
        course.apply_update(update, now());

        let result = CourseActiveModel::from_course(&course)
            .update(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("更新课程失败: {e}")))?;

        Ok(Some(result.into_course()))
    }

    /// 删除课程，同一事务内删除其选课记录
    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AssessError::database_operation(format!("开启事务失败: {e}")))?;

        Enrollments::delete_many()
            .filter(EnrollmentColumn::CourseId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AssessError::database_operation(format!("删除选课记录失败: {e}")))?;

        let result = Courses::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AssessError::database_operation(format!("删除课程失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AssessError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // ============ 讲义 ============

    pub async fn create_lecture_impl(&self, req: CreateLectureRequest) -> Result<Lecture> {
        let lecture = Lecture::from_request(0, req, now());
        let mut model = LectureActiveModel::from_lecture(&lecture);
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("创建讲义失败: {e}")))?;

        Ok(result.into_lecture())
    }

    pub async fn get_lecture_by_id_impl(&self, id: i64) -> Result<Option<Lecture>> {
        let result = Lectures::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询讲义失败: {e}")))?;

        Ok(result.map(|m| m.into_lecture()))
    }

    pub async fn list_lectures_impl(&self, query: LectureListQuery) -> Result<Vec<Lecture>> {
        let mut select = Lectures::find();
        if let Some(course_id) = query.course_id {
            select = select.filter(LectureColumn::CourseId.eq(course_id));
        }

        let lectures = select
            .order_by_asc(LectureColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询讲义列表失败: {e}")))?;

        Ok(lectures.into_iter().map(|m| m.into_lecture()).collect())
    }

    pub async fn update_lecture_impl(
        &self,
        id: i64,
        update: UpdateLectureRequest,
    ) -> Result<Option<Lecture>> {
        let Some(mut lecture) = self.get_lecture_by_id_impl(id).await? else {
            return Ok(None);
        };
        lecture.apply_update(update, now());

        let result = LectureActiveModel::from_lecture(&lecture)
            .update(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("更新讲义失败: {e}")))?;

        Ok(Some(result.into_lecture()))
    }

    pub async fn delete_lecture_impl(&self, id: i64) -> Result<bool> {
        let result = Lectures::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("删除讲义失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // ============ 选课 ============

    pub async fn create_enrollment_impl(&self, req: CreateEnrollmentRequest) -> Result<Enrollment> {
        let enrollment = Enrollment::from_request(0, req, now());
        let mut model = EnrollmentActiveModel::from_enrollment(&enrollment);
        model.id = NotSet;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("创建选课记录失败: {e}")))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn list_enrollments_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<Vec<Enrollment>> {
        let mut select = Enrollments::find();
        if let Some(course_id) = query.course_id {
            select = select.filter(EnrollmentColumn::CourseId.eq(course_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(EnrollmentColumn::StudentId.eq(student_id));
        }

        let enrollments = select
            .order_by_asc(EnrollmentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("查询选课列表失败: {e}")))?;

        Ok(enrollments.into_iter().map(|m| m.into_enrollment()).collect())
    }

    pub async fn delete_enrollment_impl(&self, id: i64) -> Result<bool> {
        let result = Enrollments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AssessError::database_operation(format!("删除选课记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
