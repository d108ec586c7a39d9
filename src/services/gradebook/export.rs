use crate::errors::{AssessError, Result};
use crate::models::gradebook::Gradebook;

const MISSING_CELL: &str = "—";

/// 百分比单元格："NN%"，无数据为 "—"
pub fn percentage_cell(percentage: Option<i32>) -> String {
    match percentage {
        Some(p) => format!("{p}%"),
        None => MISSING_CELL.to_string(),
    }
}

pub fn to_csv(gradebook: &Gradebook) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["Student Name".to_string(), "Email".to_string()];
    header.extend(gradebook.quizzes.iter().map(|q| q.title.clone()));
    header.extend(gradebook.assignments.iter().map(|a| a.title.clone()));
    header.push("Overall Average".to_string());
    wtr.write_record(&header)?;

    for row in &gradebook.students {
        let mut record = vec![row.student_name.clone(), row.student_email.clone()];
        record.extend(row.quiz_grades.iter().map(|g| percentage_cell(g.percentage)));
        record.extend(row.assignment_grades.iter().map(|g| percentage_cell(g.percentage)));
        record.push(percentage_cell(row.overall_average));
        wtr.write_record(&record)?;
    }

    wtr.into_inner()
        .map_err(|e| AssessError::export(format!("CSV 生成失败: {e}")))
}
