use chrono::{DateTime, SubsecRound, Utc};

/// 当前时间（秒精度），与数据库中的 Unix 秒保持一致
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
