// ==========================================
// 纺织工厂管理系统 - 机台成本档案仓储
// ==========================================
// 职责: 管理 machine_costs 表
// 口径说明（报表引擎依赖,勿改动）:
// - FIXED 成本不看 billing_month,每个报表月份都计入
// - VARIABLE 成本仅在 billing_month 落入目标月份时计入
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::finance::MachineCost;
use crate::domain::month::MonthWindow;
use crate::domain::types::CostType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

pub struct MachineCostRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MachineCostRepository {
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
            CREATE TABLE IF NOT EXISTS machine_costs (
              id TEXT PRIMARY KEY,
              machine_id TEXT NOT NULL REFERENCES machines(id) ON DELETE CASCADE,
              cost_type TEXT NOT NULL CHECK (cost_type IN ('FIXED', 'VARIABLE')),
              category TEXT NOT NULL,
              amount REAL NOT NULL,
              billing_month TEXT,
              notes TEXT,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              is_deleted INTEGER NOT NULL DEFAULT 0,
              deleted_at TEXT,
              deleted_by TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_machine_costs_machine
              ON machine_costs(machine_id, cost_type);
            "#,
        )?;
        Ok(())
    }

    /// 新增成本档案
    pub fn insert(&self, cost: &MachineCost) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO machine_costs (
              id, machine_id, cost_type, category, amount, billing_month,
              notes, created_at, is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0)
            "#,
            params![
                cost.id,
                cost.machine_id,
                cost.cost_type.to_db_str(),
                cost.category,
                cost.amount,
                cost.billing_month,
                cost.notes,
                cost.created_at,
            ],
        )?;
        Ok(())
    }

    /// 更新成本档案（科目/金额/计费月份/备注）
    pub fn update(&self, cost: &MachineCost) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE machine_costs
            SET category = ?1, amount = ?2, billing_month = ?3, notes = ?4
            WHERE id = ?5 AND is_deleted = 0
            "#,
            params![cost.category, cost.amount, cost.billing_month, cost.notes, cost.id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MachineCost".to_string(),
                id: cost.id.clone(),
            });
        }
        Ok(())
    }

    /// 查询单条成本档案（含已删除行,调用方自行判断）
    pub fn get(&self, id: &str) -> RepositoryResult<MachineCost> {
        let conn = self.get_conn()?;
        conn.query_row(
            &format!("{} WHERE id = ?1", Self::SELECT_BASE),
            params![id],
            Self::map_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "MachineCost".to_string(),
                id: id.to_string(),
            },
            other => other.into(),
        })
    }

    /// 查询机台全部成本档案（按创建时间倒序）
    pub fn list_for_machine(
        &self,
        machine_id: &str,
        include_deleted: bool,
    ) -> RepositoryResult<Vec<MachineCost>> {
        let conn = self.get_conn()?;
        let sql = if include_deleted {
            format!(
                "{} WHERE machine_id = ?1 ORDER BY created_at DESC",
                Self::SELECT_BASE
            )
        } else {
            format!(
                "{} WHERE machine_id = ?1 AND is_deleted = 0 ORDER BY created_at DESC",
                Self::SELECT_BASE
            )
        };
        let mut stmt = conn.prepare(&sql)?;
        let costs = stmt
            .query_map(params![machine_id], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(costs)
    }

    /// 查询机台在目标月份应计入的成本档案
    ///
    /// FIXED 全部计入; VARIABLE 仅 billing_month 落入目标月份的计入
    pub fn list_applicable(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<Vec<MachineCost>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE machine_id = ?1
               AND (cost_type = 'FIXED'
                    OR (cost_type = 'VARIABLE'
                        AND billing_month >= ?2 AND billing_month < ?3))
               AND is_deleted = 0
             ORDER BY cost_type, category",
            Self::SELECT_BASE
        ))?;
        let costs = stmt
            .query_map(
                params![machine_id, window.first_day(), window.next_month_first_day()],
                Self::map_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(costs)
    }

    /// 软删除成本档案
    pub fn soft_delete(&self, id: &str, deleted_by: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE machine_costs
            SET is_deleted = 1, deleted_at = datetime('now'), deleted_by = ?1
            WHERE id = ?2 AND is_deleted = 0
            "#,
            params![deleted_by, id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MachineCost".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 恢复已软删除的成本档案
    pub fn restore(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE machine_costs
            SET is_deleted = 0, deleted_at = NULL, deleted_by = NULL
            WHERE id = ?1 AND is_deleted = 1
            "#,
            params![id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MachineCost".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ===== 内部: 行映射 =====

    const SELECT_BASE: &'static str = r#"
        SELECT id, machine_id, cost_type, category, amount, billing_month,
               notes, created_at, is_deleted, deleted_at, deleted_by
        FROM machine_costs
    "#;

    fn map_row(row: &Row) -> rusqlite::Result<MachineCost> {
        let cost_type: String = row.get(2)?;
        Ok(MachineCost {
            id: row.get(0)?,
            machine_id: row.get(1)?,
            cost_type: CostType::from_str(&cost_type),
            category: row.get(3)?,
            amount: row.get(4)?,
            billing_month: row.get(5)?,
            notes: row.get(6)?,
            created_at: row.get(7)?,
            is_deleted: row.get(8)?,
            deleted_at: row.get(9)?,
            deleted_by: row.get(10)?,
        })
    }
}
