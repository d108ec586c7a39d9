//! 监考违规实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{from_json_text_opt, to_datetime, to_json_text_opt};
use crate::models::proctoring::entities::{ProctoringViolation, ViolationSeverity, ViolationType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "proctoring_violations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub violation_type: String,
    pub severity: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub metadata: Option<String>,
    pub reviewed: bool,
    pub occurred_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_violation(self) -> ProctoringViolation {
        ProctoringViolation {
            id: self.id,
            submission_id: self.submission_id,
            violation_type: self.violation_type.parse().unwrap_or(ViolationType::Other),
            severity: self.severity.parse().unwrap_or(ViolationSeverity::Medium),
            description: self.description,
            metadata: from_json_text_opt(self.metadata),
            reviewed: self.reviewed,
            occurred_at: to_datetime(self.occurred_at),
        }
    }
}

impl ActiveModel {
    pub fn from_violation(violation: &ProctoringViolation) -> crate::errors::Result<Self> {
        Ok(Self {
            id: Set(violation.id),
            submission_id: Set(violation.submission_id),
            violation_type: Set(violation.violation_type.to_string()),
            severity: Set(violation.severity.to_string()),
            description: Set(violation.description.clone()),
            metadata: Set(to_json_text_opt(violation.metadata.as_ref())?),
            reviewed: Set(violation.reviewed),
            occurred_at: Set(violation.occurred_at.timestamp()),
        })
    }
}
