// ==========================================
// 纺织工厂管理系统 - 维修记录仓储
// ==========================================
// 职责: 管理 maintenance 表
// 红线: 维修记录与其镜像 EXPENSE 流水（transactions.source_id 指向本表,
//       category='Maintenance'）在同一事务内创建/更新/软删除/恢复
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::month::MonthWindow;
use crate::domain::production::MaintenanceRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct MaintenanceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaintenanceRepository {
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
            CREATE TABLE IF NOT EXISTS maintenance (
              id TEXT PRIMARY KEY,
              machine_id TEXT NOT NULL REFERENCES machines(id) ON DELETE CASCADE,
              maintenance_date TEXT NOT NULL,
              maintenance_type TEXT,
              cost REAL NOT NULL DEFAULT 0,
              notes TEXT,
              next_due_date TEXT,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              is_deleted INTEGER NOT NULL DEFAULT 0,
              deleted_at TEXT,
              deleted_by TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_maintenance_machine_date
              ON maintenance(machine_id, maintenance_date);
            "#,
        )?;
        Ok(())
    }

    /// 创建维修记录并镜像 EXPENSE 流水（单事务）
    pub fn insert_with_mirror(&self, record: &MaintenanceRecord) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO maintenance (
              id, machine_id, maintenance_date, maintenance_type, cost,
              notes, next_due_date, created_at, is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0)
            "#,
            params![
                record.id,
                record.machine_id,
                record.maintenance_date,
                record.maintenance_type,
                record.cost,
                record.notes,
                record.next_due_date,
                record.created_at,
            ],
        )?;

        tx.execute(
            r#"
            INSERT INTO transactions (
              id, transaction_type, category, amount, transaction_date,
              description, machine_id, source_id, is_deleted
            ) VALUES (?1, 'EXPENSE', 'Maintenance', ?2, ?3, ?4, ?5, ?6, 0)
            "#,
            params![
                Uuid::new_v4().to_string(),
                record.cost,
                record.maintenance_date,
                format!(
                    "维修支出: {}",
                    record.maintenance_type.as_deref().unwrap_or("常规维修")
                ),
                record.machine_id,
                record.id,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// 更新维修记录并同步镜像流水（单事务）
    pub fn update_with_mirror(&self, record: &MaintenanceRecord) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let rows = tx.execute(
            r#"
            UPDATE maintenance
            SET maintenance_date = ?1, maintenance_type = ?2, cost = ?3,
                notes = ?4, next_due_date = ?5
            WHERE id = ?6 AND is_deleted = 0
            "#,
            params![
                record.maintenance_date,
                record.maintenance_type,
                record.cost,
                record.notes,
                record.next_due_date,
                record.id,
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MaintenanceRecord".to_string(),
                id: record.id.clone(),
            });
        }

        tx.execute(
            r#"
            UPDATE transactions
            SET amount = ?1, transaction_date = ?2, description = ?3
            WHERE source_id = ?4 AND category = 'Maintenance'
            "#,
            params![
                record.cost,
                record.maintenance_date,
                format!(
                    "维修支出: {}",
                    record.maintenance_type.as_deref().unwrap_or("常规维修")
                ),
                record.id,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// 软删除维修记录并级联其镜像流水（单事务）
    pub fn soft_delete_with_mirror(&self, id: &str, deleted_by: &str) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let rows = tx.execute(
            r#"
            UPDATE maintenance
            SET is_deleted = 1, deleted_at = datetime('now'), deleted_by = ?1
            WHERE id = ?2 AND is_deleted = 0
            "#,
            params![deleted_by, id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MaintenanceRecord".to_string(),
                id: id.to_string(),
            });
        }

        tx.execute(
            r#"
            UPDATE transactions
            SET is_deleted = 1, deleted_at = datetime('now'), deleted_by = ?1
            WHERE source_id = ?2
            "#,
            params![deleted_by, id],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// 恢复维修记录并级联其镜像流水（单事务）
    pub fn restore_with_mirror(&self, id: &str) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let rows = tx.execute(
            r#"
            UPDATE maintenance
            SET is_deleted = 0, deleted_at = NULL, deleted_by = NULL
            WHERE id = ?1 AND is_deleted = 1
            "#,
            params![id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MaintenanceRecord".to_string(),
                id: id.to_string(),
            });
        }

        tx.execute(
            r#"
            UPDATE transactions
            SET is_deleted = 0, deleted_at = NULL, deleted_by = NULL
            WHERE source_id = ?1
            "#,
            params![id],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// 查询单条维修记录（含已删除行,调用方自行判断）
    pub fn get(&self, id: &str) -> RepositoryResult<MaintenanceRecord> {
        let conn = self.get_conn()?;
        conn.query_row(
            &format!("{} WHERE id = ?1", Self::SELECT_BASE),
            params![id],
            Self::map_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "MaintenanceRecord".to_string(),
                id: id.to_string(),
            },
            other => other.into(),
        })
    }

    /// 查询全部维修记录（按日期倒序）
    pub fn list(&self, include_deleted: bool) -> RepositoryResult<Vec<MaintenanceRecord>> {
        let conn = self.get_conn()?;
        let sql = if include_deleted {
            format!("{} ORDER BY maintenance_date DESC", Self::SELECT_BASE)
        } else {
            format!(
                "{} WHERE is_deleted = 0 ORDER BY maintenance_date DESC",
                Self::SELECT_BASE
            )
        };
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// 查询机台当月维修记录（下钻视图）
    pub fn list_for_machine_month(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<Vec<MaintenanceRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE is_deleted = 0
               AND machine_id = ?1
               AND maintenance_date >= ?2 AND maintenance_date < ?3
             ORDER BY maintenance_date",
            Self::SELECT_BASE
        ))?;
        let records = stmt
            .query_map(
                params![machine_id, window.first_day(), window.next_month_first_day()],
                Self::map_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// 机台当月维修费用合计（无记录时为 0）
    pub fn sum_month_cost(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(cost), 0)
            FROM maintenance
            WHERE machine_id = ?1
              AND maintenance_date >= ?2 AND maintenance_date < ?3
              AND is_deleted = 0
            "#,
            params![machine_id, window.first_day(), window.next_month_first_day()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    // ===== 内部: 行映射 =====

    const SELECT_BASE: &'static str = r#"
        SELECT id, machine_id, maintenance_date, maintenance_type, cost,
               notes, next_due_date, created_at, is_deleted, deleted_at, deleted_by
        FROM maintenance
    "#;

    fn map_row(row: &Row) -> rusqlite::Result<MaintenanceRecord> {
        Ok(MaintenanceRecord {
            id: row.get(0)?,
            machine_id: row.get(1)?,
            maintenance_date: row.get(2)?,
            maintenance_type: row.get(3)?,
            cost: row.get(4)?,
            notes: row.get(5)?,
            next_due_date: row.get(6)?,
            created_at: row.get(7)?,
            is_deleted: row.get(8)?,
            deleted_at: row.get(9)?,
            deleted_by: row.get(10)?,
        })
    }
}
