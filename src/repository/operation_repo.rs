// ==========================================
// 纺织工厂管理系统 - 运转台账仓储
// ==========================================
// 职责: 管理 operations 表
// 说明: 运转台账只服务于驾驶舱效率视图,不参与月度利润分摊
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::month::MonthWindow;
use crate::domain::production::OperationRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

/// 机台效率统计行（驾驶舱用）
#[derive(Debug, Clone, PartialEq)]
pub struct MachineEfficiencyRow {
    pub machine_number: String, // 机台编号
    pub machine_type: String,   // 机台类型
    pub total_hours: f64,       // 当月工作小时合计
    pub days_operated: i64,     // 当月有台账的天数
}

pub struct OperationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OperationRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS operations (
              id TEXT PRIMARY KEY,
              machine_id TEXT NOT NULL REFERENCES machines(id) ON DELETE CASCADE,
              operation_date TEXT NOT NULL,
              hours_worked REAL NOT NULL DEFAULT 0,
              notes TEXT,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              is_deleted INTEGER NOT NULL DEFAULT 0,
              deleted_at TEXT,
              deleted_by TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_operations_machine_date
              ON operations(machine_id, operation_date);
            "#,
        )?;
        Ok(())
    }

    /// 新增运转台账
    pub fn insert(&self, record: &OperationRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO operations (
              id, machine_id, operation_date, hours_worked, notes, created_at, is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)
            "#,
            params![
                record.id,
                record.machine_id,
                record.operation_date,
                record.hours_worked,
                record.notes,
                record.created_at,
            ],
        )?;
        Ok(())
    }

    /// 查询机台当月运转台账（下钻视图）
    pub fn list_for_machine_month(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<Vec<OperationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, machine_id, operation_date, hours_worked, notes,
                   created_at, is_deleted, deleted_at, deleted_by
            FROM operations
            WHERE is_deleted = 0
              AND machine_id = ?1
              AND operation_date >= ?2 AND operation_date < ?3
            ORDER BY operation_date
            "#,
        )?;
        let records = stmt
            .query_map(
                params![machine_id, window.first_day(), window.next_month_first_day()],
                Self::map_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// 软删除运转台账
    pub fn soft_delete(&self, id: &str, deleted_by: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE operations
            SET is_deleted = 1, deleted_at = datetime('now'), deleted_by = ?1
            WHERE id = ?2 AND is_deleted = 0
            "#,
            params![deleted_by, id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "OperationRecord".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 当月机台效率统计（全部未删除机台,无台账机台计 0）
    pub fn efficiency_for_month(
        &self,
        window: &MonthWindow,
    ) -> RepositoryResult<Vec<MachineEfficiencyRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT m.machine_number, m.machine_type,
                   COALESCE(SUM(o.hours_worked), 0) AS total_hours,
                   COUNT(DISTINCT o.operation_date) AS days_operated
            FROM machines m
            LEFT JOIN operations o ON m.id = o.machine_id
              AND o.operation_date >= ?1 AND o.operation_date < ?2
              AND o.is_deleted = 0
            WHERE m.is_deleted = 0
            GROUP BY m.id, m.machine_number, m.machine_type
            ORDER BY m.machine_number
            "#,
        )?;
        let rows = stmt
            .query_map(
                params![window.first_day(), window.next_month_first_day()],
                |row| {
                    Ok(MachineEfficiencyRow {
                        machine_number: row.get(0)?,
                        machine_type: row.get(1)?,
                        total_hours: row.get(2)?,
                        days_operated: row.get(3)?,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    // ===== 内部: 行映射 =====

    fn map_row(row: &Row) -> rusqlite::Result<OperationRecord> {
        Ok(OperationRecord {
            id: row.get(0)?,
            machine_id: row.get(1)?,
            operation_date: row.get(2)?,
            hours_worked: row.get(3)?,
            notes: row.get(4)?,
            created_at: row.get(5)?,
            is_deleted: row.get(6)?,
            deleted_at: row.get(7)?,
            deleted_by: row.get(8)?,
        })
    }
}
