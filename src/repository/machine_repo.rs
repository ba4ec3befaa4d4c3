// ==========================================
// 纺织工厂管理系统 - 机台仓储
// ==========================================
// 职责: 管理 machines 表
// 说明: 读取路径 LEFT JOIN shareholders 带出股东名称;
//       shareholders 表由 ShareholderRepository 负责建表
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::machine::Machine;
use crate::domain::types::{MachineStatus, OwnerType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

/// 按状态统计结果（驾驶舱用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MachineCountByStatus {
    pub total: i64,       // 机台总数
    pub active: i64,      // 运转中
    pub stopped: i64,     // 停机
    pub maintenance: i64, // 维修中
}

pub struct MachineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MachineRepository {
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
            CREATE TABLE IF NOT EXISTS machines (
              id TEXT PRIMARY KEY,
              machine_number TEXT NOT NULL UNIQUE,
              machine_type TEXT NOT NULL,
              status TEXT NOT NULL DEFAULT 'STOPPED'
                CHECK (status IN ('ACTIVE', 'STOPPED', 'MAINTENANCE')),
              owner_type TEXT NOT NULL DEFAULT 'FACTORY'
                CHECK (owner_type IN ('FACTORY', 'SHAREHOLDER')),
              shareholder_id TEXT REFERENCES shareholders(id) ON DELETE SET NULL,
              factory_profit_percentage REAL NOT NULL DEFAULT 100.0
                CHECK (factory_profit_percentage >= 0 AND factory_profit_percentage <= 100),
              start_date TEXT,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              is_deleted INTEGER NOT NULL DEFAULT 0,
              deleted_at TEXT,
              deleted_by TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_machines_number
              ON machines(machine_number);
            CREATE INDEX IF NOT EXISTS idx_machines_deleted
              ON machines(is_deleted);
            "#,
        )?;
        Ok(())
    }

    /// 新增机台
    pub fn insert(&self, machine: &Machine) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO machines (
              id, machine_number, machine_type, status, owner_type,
              shareholder_id, factory_profit_percentage, start_date,
              created_at, is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0)
            "#,
            params![
                machine.id,
                machine.machine_number,
                machine.machine_type,
                machine.status.to_db_str(),
                machine.owner_type.to_db_str(),
                machine.shareholder_id,
                machine.factory_profit_percentage,
                machine.start_date,
                machine.created_at,
            ],
        )?;
        Ok(())
    }

    /// 更新机台基础信息（不触碰软删除列）
    pub fn update(&self, machine: &Machine) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE machines
            SET machine_number = ?1, machine_type = ?2, owner_type = ?3,
                shareholder_id = ?4, status = ?5, start_date = ?6,
                factory_profit_percentage = ?7
            WHERE id = ?8 AND is_deleted = 0
            "#,
            params![
                machine.machine_number,
                machine.machine_type,
                machine.owner_type.to_db_str(),
                machine.shareholder_id,
                machine.status.to_db_str(),
                machine.start_date,
                machine.factory_profit_percentage,
                machine.id,
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Machine".to_string(),
                id: machine.id.clone(),
            });
        }
        Ok(())
    }

    /// 查询单台机台（含已删除行,调用方自行判断）
    pub fn get(&self, id: &str) -> RepositoryResult<Machine> {
        let conn = self.get_conn()?;
        let machine = conn
            .query_row(
                &format!("{} WHERE m.id = ?1", Self::SELECT_BASE),
                params![id],
                Self::map_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                    entity: "Machine".to_string(),
                    id: id.to_string(),
                },
                other => other.into(),
            })?;
        Ok(machine)
    }

    /// 查询全部机台（按机台编号排序）
    pub fn list(&self, include_deleted: bool) -> RepositoryResult<Vec<Machine>> {
        let conn = self.get_conn()?;
        let sql = if include_deleted {
            format!("{} ORDER BY m.machine_number", Self::SELECT_BASE)
        } else {
            format!(
                "{} WHERE m.is_deleted = 0 ORDER BY m.machine_number",
                Self::SELECT_BASE
            )
        };

        let mut stmt = conn.prepare(&sql)?;
        let machines = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(machines)
    }

    /// 软删除机台
    pub fn soft_delete(&self, id: &str, deleted_by: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE machines
            SET is_deleted = 1, deleted_at = datetime('now'), deleted_by = ?1
            WHERE id = ?2 AND is_deleted = 0
            "#,
            params![deleted_by, id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Machine".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 恢复已软删除的机台
    pub fn restore(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE machines
            SET is_deleted = 0, deleted_at = NULL, deleted_by = NULL
            WHERE id = ?1 AND is_deleted = 1
            "#,
            params![id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Machine".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 按当前状态统计未删除机台数（驾驶舱用）
    pub fn count_by_status(&self) -> RepositoryResult<MachineCountByStatus> {
        let conn = self.get_conn()?;
        let counts = conn.query_row(
            r#"
            SELECT
              COUNT(*),
              COALESCE(SUM(CASE WHEN status = 'ACTIVE' THEN 1 ELSE 0 END), 0),
              COALESCE(SUM(CASE WHEN status = 'STOPPED' THEN 1 ELSE 0 END), 0),
              COALESCE(SUM(CASE WHEN status = 'MAINTENANCE' THEN 1 ELSE 0 END), 0)
            FROM machines
            WHERE is_deleted = 0
            "#,
            [],
            |row| {
                Ok(MachineCountByStatus {
                    total: row.get(0)?,
                    active: row.get(1)?,
                    stopped: row.get(2)?,
                    maintenance: row.get(3)?,
                })
            },
        )?;
        Ok(counts)
    }

    // ===== 内部: 行映射 =====

    const SELECT_BASE: &'static str = r#"
        SELECT m.id, m.machine_number, m.machine_type, m.status, m.start_date,
               m.owner_type, m.shareholder_id, m.factory_profit_percentage,
               m.created_at, m.is_deleted, m.deleted_at, m.deleted_by,
               s.name AS shareholder_name
        FROM machines m
        LEFT JOIN shareholders s ON m.shareholder_id = s.id
    "#;

    fn map_row(row: &Row) -> rusqlite::Result<Machine> {
        let status: String = row.get(3)?;
        let owner_type: String = row.get(5)?;
        Ok(Machine {
            id: row.get(0)?,
            machine_number: row.get(1)?,
            machine_type: row.get(2)?,
            status: MachineStatus::from_str(&status),
            start_date: row.get(4)?,
            owner_type: OwnerType::from_str(&owner_type),
            shareholder_id: row.get(6)?,
            factory_profit_percentage: row.get(7)?,
            created_at: row.get(8)?,
            is_deleted: row.get(9)?,
            deleted_at: row.get(10)?,
            deleted_by: row.get(11)?,
            shareholder_name: row.get(12)?,
        })
    }
}
