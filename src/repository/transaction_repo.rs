// ==========================================
// 纺织工厂管理系统 - 财务流水仓储
// ==========================================
// 职责: 管理 transactions 表
// 口径说明（报表引擎依赖,勿改动）:
// - 机台直接支出 = EXPENSE + machine_id 匹配 + source_id IS NULL
//   （排除维修镜像流水,维修费用由 maintenance 表单独计入,避免重复计数）
// - 共同费用 = EXPENSE + machine_id IS NULL + shareholder_id IS NULL
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::finance::LedgerEntry;
use crate::domain::month::MonthWindow;
use crate::domain::types::TransactionType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

pub struct TransactionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TransactionRepository {
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
            CREATE TABLE IF NOT EXISTS transactions (
              id TEXT PRIMARY KEY,
              transaction_type TEXT NOT NULL
                CHECK (transaction_type IN ('INCOME', 'EXPENSE')),
              category TEXT NOT NULL,
              amount REAL NOT NULL,
              transaction_date TEXT NOT NULL,
              description TEXT,
              machine_id TEXT REFERENCES machines(id) ON DELETE SET NULL,
              client_id TEXT REFERENCES clients(id) ON DELETE SET NULL,
              shareholder_id TEXT REFERENCES shareholders(id) ON DELETE SET NULL,
              source_id TEXT,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              is_deleted INTEGER NOT NULL DEFAULT 0,
              deleted_at TEXT,
              deleted_by TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date
              ON transactions(transaction_date);
            CREATE INDEX IF NOT EXISTS idx_transactions_machine
              ON transactions(machine_id);
            CREATE INDEX IF NOT EXISTS idx_transactions_source
              ON transactions(source_id);
            "#,
        )?;
        Ok(())
    }

    /// 新增流水（人工录入或镜像生成均走此方法）
    pub fn insert(&self, entry: &LedgerEntry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (
              id, transaction_type, category, amount, transaction_date,
              description, machine_id, client_id, shareholder_id, source_id,
              created_at, is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0)
            "#,
            params![
                entry.id,
                entry.transaction_type.to_db_str(),
                entry.category,
                entry.amount,
                entry.transaction_date,
                entry.description,
                entry.machine_id,
                entry.client_id,
                entry.shareholder_id,
                entry.source_id,
                entry.created_at,
            ],
        )?;
        Ok(())
    }

    /// 查询指定月份的全部流水（按日期倒序）
    pub fn list_month(&self, window: &MonthWindow) -> RepositoryResult<Vec<LedgerEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE t.is_deleted = 0
               AND t.transaction_date >= ?1 AND t.transaction_date < ?2
             ORDER BY t.transaction_date DESC",
            Self::SELECT_BASE
        ))?;
        let entries = stmt
            .query_map(
                params![window.first_day(), window.next_month_first_day()],
                Self::map_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// 查询机台当月支出流水（下钻视图,包含镜像流水）
    pub fn list_machine_expenses_month(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<Vec<LedgerEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE t.is_deleted = 0
               AND t.transaction_type = 'EXPENSE'
               AND t.machine_id = ?1
               AND t.transaction_date >= ?2 AND t.transaction_date < ?3
             ORDER BY t.transaction_date",
            Self::SELECT_BASE
        ))?;
        let entries = stmt
            .query_map(
                params![machine_id, window.first_day(), window.next_month_first_day()],
                Self::map_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// 机台当月直接支出合计（排除镜像流水,见文件头口径说明）
    pub fn sum_direct_expense(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE transaction_type = 'EXPENSE'
              AND machine_id = ?1
              AND source_id IS NULL
              AND transaction_date >= ?2 AND transaction_date < ?3
              AND is_deleted = 0
            "#,
            params![machine_id, window.first_day(), window.next_month_first_day()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// 当月共同费用合计（未关联机台且未关联股东的支出）
    pub fn sum_shared_overhead(&self, window: &MonthWindow) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE transaction_type = 'EXPENSE'
              AND machine_id IS NULL
              AND shareholder_id IS NULL
              AND transaction_date >= ?1 AND transaction_date < ?2
              AND is_deleted = 0
            "#,
            params![window.first_day(), window.next_month_first_day()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// 当月某一类型流水合计（驾驶舱用）
    pub fn sum_month_by_type(
        &self,
        transaction_type: TransactionType,
        window: &MonthWindow,
    ) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE transaction_type = ?1
              AND transaction_date >= ?2 AND transaction_date < ?3
              AND is_deleted = 0
            "#,
            params![
                transaction_type.to_db_str(),
                window.first_day(),
                window.next_month_first_day()
            ],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// 软删除流水
    pub fn soft_delete(&self, id: &str, deleted_by: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE transactions
            SET is_deleted = 1, deleted_at = datetime('now'), deleted_by = ?1
            WHERE id = ?2 AND is_deleted = 0
            "#,
            params![deleted_by, id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "LedgerEntry".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 恢复已软删除的流水
    pub fn restore(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE transactions
            SET is_deleted = 0, deleted_at = NULL, deleted_by = NULL
            WHERE id = ?1 AND is_deleted = 1
            "#,
            params![id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "LedgerEntry".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 查询单条流水（含已删除行,调用方自行判断）
    pub fn get(&self, id: &str) -> RepositoryResult<LedgerEntry> {
        let conn = self.get_conn()?;
        conn.query_row(
            &format!("{} WHERE t.id = ?1", Self::SELECT_BASE),
            params![id],
            Self::map_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "LedgerEntry".to_string(),
                id: id.to_string(),
            },
            other => other.into(),
        })
    }

    /// 按来源记录查询镜像流水
    pub fn get_by_source(&self, source_id: &str) -> RepositoryResult<Option<LedgerEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE t.source_id = ?1",
            Self::SELECT_BASE
        ))?;
        let mut entries = stmt
            .query_map(params![source_id], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries.pop())
    }

    // ===== 内部: 行映射 =====

    const SELECT_BASE: &'static str = r#"
        SELECT t.id, t.transaction_type, t.category, t.amount, t.transaction_date,
               t.description, t.machine_id, t.client_id, t.shareholder_id, t.source_id,
               t.created_at, t.is_deleted, t.deleted_at, t.deleted_by
        FROM transactions t
    "#;

    fn map_row(row: &Row) -> rusqlite::Result<LedgerEntry> {
        let transaction_type: String = row.get(1)?;
        Ok(LedgerEntry {
            id: row.get(0)?,
            transaction_type: TransactionType::from_str(&transaction_type),
            category: row.get(2)?,
            amount: row.get(3)?,
            transaction_date: row.get(4)?,
            description: row.get(5)?,
            machine_id: row.get(6)?,
            client_id: row.get(7)?,
            shareholder_id: row.get(8)?,
            source_id: row.get(9)?,
            created_at: row.get(10)?,
            is_deleted: row.get(11)?,
            deleted_at: row.get(12)?,
            deleted_by: row.get(13)?,
        })
    }
}
