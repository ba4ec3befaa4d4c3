// ==========================================
// 纺织工厂管理系统 - 机台状态流水仓储
// ==========================================
// 职责: 管理 machine_status_logs 表
// 红线: 状态切换在单事务内完成"封口旧记录 + 开启新记录 + 回写 machines.status",
//       保证同一机台最多一条 end_date 为 NULL 的记录
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::month::MonthWindow;
use crate::domain::status_log::MachineStatusLog;
use crate::domain::types::MachineStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct StatusLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StatusLogRepository {
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
            CREATE TABLE IF NOT EXISTS machine_status_logs (
              id TEXT PRIMARY KEY,
              machine_id TEXT NOT NULL REFERENCES machines(id) ON DELETE CASCADE,
              status TEXT NOT NULL
                CHECK (status IN ('ACTIVE', 'STOPPED', 'MAINTENANCE')),
              start_date TEXT NOT NULL,
              end_date TEXT,
              created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_status_logs_machine
              ON machine_status_logs(machine_id);
            CREATE INDEX IF NOT EXISTS idx_status_logs_dates
              ON machine_status_logs(start_date, end_date);
            "#,
        )?;
        Ok(())
    }

    /// 状态切换（单事务）
    ///
    /// 1. 封口该机台当前生效的状态区间（end_date = at）
    /// 2. 开启新状态区间（start_date = at, end_date = NULL）
    /// 3. 回写 machines.status
    ///
    /// # 返回
    /// - Ok(()): 切换成功
    /// - Err(NotFound): 机台不存在或已删除（事务回滚）
    pub fn record_transition(
        &self,
        machine_id: &str,
        status: MachineStatus,
        at: NaiveDateTime,
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        // 先回写机台状态: 机台不存在/已删除时直接报 NotFound,不触碰流水
        let rows = tx.execute(
            "UPDATE machines SET status = ?1 WHERE id = ?2 AND is_deleted = 0",
            params![status.to_db_str(), machine_id],
        )?;

        if rows == 0 {
            // 事务随 drop 回滚
            return Err(RepositoryError::NotFound {
                entity: "Machine".to_string(),
                id: machine_id.to_string(),
            });
        }

        tx.execute(
            r#"
            UPDATE machine_status_logs
            SET end_date = ?1
            WHERE machine_id = ?2 AND end_date IS NULL
            "#,
            params![at, machine_id],
        )?;

        tx.execute(
            r#"
            INSERT INTO machine_status_logs (id, machine_id, status, start_date, end_date)
            VALUES (?1, ?2, ?3, ?4, NULL)
            "#,
            params![
                Uuid::new_v4().to_string(),
                machine_id,
                status.to_db_str(),
                at
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// 直接写入一条状态区间（数据修补/造数用,不做封口）
    pub fn insert(&self, log: &MachineStatusLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO machine_status_logs (id, machine_id, status, start_date, end_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                log.id,
                log.machine_id,
                log.status.to_db_str(),
                log.start_date,
                log.end_date,
                log.created_at,
            ],
        )?;
        Ok(())
    }

    /// 查询单台机台的全部状态流水（按开始时刻倒序）
    pub fn list_for_machine(&self, machine_id: &str) -> RepositoryResult<Vec<MachineStatusLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, machine_id, status, start_date, end_date, created_at
            FROM machine_status_logs
            WHERE machine_id = ?1
            ORDER BY start_date DESC
            "#,
        )?;
        let logs = stmt
            .query_map(params![machine_id], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    /// 查询与月份窗口有交集的全部状态流水（只含未删除机台）
    ///
    /// 交集条件: start_date < 窗口上界 AND (end_date IS NULL OR end_date > 窗口下界)
    pub fn list_overlapping_window(
        &self,
        window: &MonthWindow,
    ) -> RepositoryResult<Vec<MachineStatusLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT sl.id, sl.machine_id, sl.status, sl.start_date, sl.end_date, sl.created_at
            FROM machine_status_logs sl
            JOIN machines m ON sl.machine_id = m.id
            WHERE sl.start_date < ?1
              AND (sl.end_date IS NULL OR sl.end_date > ?2)
              AND m.is_deleted = 0
            ORDER BY sl.machine_id, sl.start_date
            "#,
        )?;
        let logs = stmt
            .query_map(params![window.end_exclusive, window.start], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    /// 查询机台当前生效的状态区间（end_date 为 NULL）
    pub fn get_open_log(&self, machine_id: &str) -> RepositoryResult<Option<MachineStatusLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, machine_id, status, start_date, end_date, created_at
            FROM machine_status_logs
            WHERE machine_id = ?1 AND end_date IS NULL
            "#,
        )?;
        let mut logs = stmt
            .query_map(params![machine_id], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs.pop())
    }

    // ===== 内部: 行映射 =====

    fn map_row(row: &Row) -> rusqlite::Result<MachineStatusLog> {
        let status: String = row.get(2)?;
        Ok(MachineStatusLog {
            id: row.get(0)?,
            machine_id: row.get(1)?,
            status: MachineStatus::from_str(&status),
            start_date: row.get(3)?,
            end_date: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}
