use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;

use crate::errors::Result;

/// 单个实体的内存表：DashMap 存储行，原子序列分配 ID
pub(crate) struct Table<T> {
    rows: DashMap<i64, T>,
    seq: AtomicI64,
}

impl<T: Clone> Table<T> {
    pub(crate) fn new() -> Self {
        Self {
            rows: DashMap::new(),
            seq: AtomicI64::new(0),
        }
    }

    /// 分配新 ID 并插入由 `build` 构造的行
    pub(crate) fn insert_with(&self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    pub(crate) fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).map(|r| r.value().clone())
    }

    /// 按 ID 升序返回满足条件的行
    pub(crate) fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<(i64, T)> = self
            .rows
            .iter()
            .filter(|r| pred(r.value()))
            .map(|r| (*r.key(), r.value().clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows.into_iter().map(|(_, row)| row).collect()
    }

    pub(crate) fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.filter(pred).into_iter().next()
    }

    pub(crate) fn count(&self) -> usize {
        self.rows.len()
    }

    /// 在副本上执行修改，成功后再写回；不存在时返回 `Ok(None)`
    pub(crate) fn update(
        &self,
        id: i64,
        apply: impl FnOnce(&mut T) -> Result<()>,
    ) -> Result<Option<T>> {
        let Some(mut entry) = self.rows.get_mut(&id) else {
            return Ok(None);
        };
        let mut draft = entry.value().clone();
        apply(&mut draft)?;
        *entry.value_mut() = draft.clone();
        Ok(Some(draft))
    }

    pub(crate) fn remove(&self, id: i64) -> bool {
        self.rows.remove(&id).is_some()
    }

    pub(crate) fn retain(&self, keep: impl Fn(&T) -> bool) {
        self.rows.retain(|_, row| keep(row));
    }
}
