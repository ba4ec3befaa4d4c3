// ==========================================
// 纺织工厂管理系统 - 生产记录仓储
// ==========================================
// 职责: 管理 production_logs 表
// 红线: 生产记录与其镜像 INCOME 流水（transactions.source_id 指向本表）
//       必须在同一事务内创建/软删除/恢复,不允许出现半写状态
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::month::MonthWindow;
use crate::domain::production::ProductionLog;
use crate::domain::types::Unit;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct ProductionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionLogRepository {
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
            CREATE TABLE IF NOT EXISTS production_logs (
              id TEXT PRIMARY KEY,
              machine_id TEXT NOT NULL REFERENCES machines(id) ON DELETE CASCADE,
              client_id TEXT REFERENCES clients(id) ON DELETE SET NULL,
              product_name TEXT NOT NULL,
              quantity REAL NOT NULL,
              unit TEXT NOT NULL DEFAULT 'kg' CHECK (unit IN ('kg', 'ton')),
              unit_price REAL NOT NULL,
              total_amount REAL NOT NULL,
              log_date TEXT NOT NULL,
              notes TEXT,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              is_deleted INTEGER NOT NULL DEFAULT 0,
              deleted_at TEXT,
              deleted_by TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_production_machine_date
              ON production_logs(machine_id, log_date);
            "#,
        )?;
        Ok(())
    }

    /// 创建生产记录并镜像 INCOME 流水（单事务）
    ///
    /// 镜像流水: type=INCOME, category='Production', source_id=生产记录ID
    pub fn insert_with_mirror(&self, log: &ProductionLog) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO production_logs (
              id, machine_id, client_id, product_name, quantity, unit,
              unit_price, total_amount, log_date, notes, created_at, is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0)
            "#,
            params![
                log.id,
                log.machine_id,
                log.client_id,
                log.product_name,
                log.quantity,
                log.unit.to_db_str(),
                log.unit_price,
                log.total_amount,
                log.log_date,
                log.notes,
                log.created_at,
            ],
        )?;

        tx.execute(
            r#"
            INSERT INTO transactions (
              id, transaction_type, category, amount, transaction_date,
              description, machine_id, client_id, source_id, is_deleted
            ) VALUES (?1, 'INCOME', 'Production', ?2, ?3, ?4, ?5, ?6, ?7, 0)
            "#,
            params![
                Uuid::new_v4().to_string(),
                log.total_amount,
                log.log_date,
                format!(
                    "生产收入: {} ({} {})",
                    log.product_name,
                    log.quantity,
                    log.unit.to_db_str()
                ),
                log.machine_id,
                log.client_id,
                log.id,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// 软删除生产记录并级联其镜像流水（单事务）
    pub fn soft_delete_with_mirror(&self, id: &str, deleted_by: &str) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let rows = tx.execute(
            r#"
            UPDATE production_logs
            SET is_deleted = 1, deleted_at = datetime('now'), deleted_by = ?1
            WHERE id = ?2 AND is_deleted = 0
            "#,
            params![deleted_by, id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ProductionLog".to_string(),
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

    /// 恢复生产记录并级联其镜像流水（单事务）
    pub fn restore_with_mirror(&self, id: &str) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let rows = tx.execute(
            r#"
            UPDATE production_logs
            SET is_deleted = 0, deleted_at = NULL, deleted_by = NULL
            WHERE id = ?1 AND is_deleted = 1
            "#,
            params![id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ProductionLog".to_string(),
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

    /// 查询全部生产记录（按日期倒序,带机台编号/客户名称）
    pub fn list(&self, include_deleted: bool) -> RepositoryResult<Vec<ProductionLog>> {
        let conn = self.get_conn()?;
        let sql = if include_deleted {
            format!("{} ORDER BY p.log_date DESC", Self::SELECT_BASE)
        } else {
            format!(
                "{} WHERE p.is_deleted = 0 ORDER BY p.log_date DESC",
                Self::SELECT_BASE
            )
        };
        let mut stmt = conn.prepare(&sql)?;
        let logs = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    /// 查询机台当月生产记录（下钻视图）
    pub fn list_for_machine_month(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<Vec<ProductionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE p.is_deleted = 0
               AND p.machine_id = ?1
               AND p.log_date >= ?2 AND p.log_date < ?3
             ORDER BY p.log_date",
            Self::SELECT_BASE
        ))?;
        let logs = stmt
            .query_map(
                params![machine_id, window.first_day(), window.next_month_first_day()],
                Self::map_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    /// 机台当月生产收入合计（无记录时为 0）
    pub fn sum_month_revenue(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM production_logs
            WHERE machine_id = ?1
              AND log_date >= ?2 AND log_date < ?3
              AND is_deleted = 0
            "#,
            params![machine_id, window.first_day(), window.next_month_first_day()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// 当月全厂生产收入合计（驾驶舱用）
    pub fn sum_month_revenue_all(&self, window: &MonthWindow) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM production_logs
            WHERE log_date >= ?1 AND log_date < ?2
              AND is_deleted = 0
            "#,
            params![window.first_day(), window.next_month_first_day()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    // ===== 内部: 行映射 =====

    const SELECT_BASE: &'static str = r#"
        SELECT p.id, p.machine_id, p.client_id, p.product_name, p.quantity,
               p.unit, p.unit_price, p.total_amount, p.log_date, p.notes,
               p.created_at, p.is_deleted, p.deleted_at, p.deleted_by,
               m.machine_number, c.name AS client_name
        FROM production_logs p
        LEFT JOIN machines m ON p.machine_id = m.id
        LEFT JOIN clients c ON p.client_id = c.id
    "#;

    fn map_row(row: &Row) -> rusqlite::Result<ProductionLog> {
        let unit: String = row.get(5)?;
        Ok(ProductionLog {
            id: row.get(0)?,
            machine_id: row.get(1)?,
            client_id: row.get(2)?,
            product_name: row.get(3)?,
            quantity: row.get(4)?,
            unit: Unit::from_str(&unit),
            unit_price: row.get(6)?,
            total_amount: row.get(7)?,
            log_date: row.get(8)?,
            notes: row.get(9)?,
            created_at: row.get(10)?,
            is_deleted: row.get(11)?,
            deleted_at: row.get(12)?,
            deleted_by: row.get(13)?,
            machine_number: row.get(14)?,
            client_name: row.get(15)?,
        })
    }
}
