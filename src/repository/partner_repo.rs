// ==========================================
// 纺织工厂管理系统 - 股东与客户仓储
// ==========================================
// 职责: 管理 shareholders / clients 表
// 说明: 两张表结构相近,集中在本文件维护
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::personnel::{Client, Shareholder};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ShareholderRepository - 股东仓储
// ==========================================
pub struct ShareholderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShareholderRepository {
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
            CREATE TABLE IF NOT EXISTS shareholders (
              id TEXT PRIMARY KEY,
              name TEXT NOT NULL,
              phone TEXT,
              opening_balance REAL NOT NULL DEFAULT 0,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              is_deleted INTEGER NOT NULL DEFAULT 0,
              deleted_at TEXT,
              deleted_by TEXT
            );
            "#,
        )?;
        Ok(())
    }

    /// 新增股东
    pub fn insert(&self, shareholder: &Shareholder) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO shareholders (id, name, phone, opening_balance, created_at, is_deleted)
            VALUES (?1, ?2, ?3, ?4, ?5, 0)
            "#,
            params![
                shareholder.id,
                shareholder.name,
                shareholder.phone,
                shareholder.opening_balance,
                shareholder.created_at,
            ],
        )?;
        Ok(())
    }

    /// 查询单个股东
    pub fn get(&self, id: &str) -> RepositoryResult<Shareholder> {
        let conn = self.get_conn()?;
        conn.query_row(
            r#"
            SELECT id, name, phone, opening_balance, created_at, is_deleted, deleted_at, deleted_by
            FROM shareholders WHERE id = ?1
            "#,
            params![id],
            Self::map_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Shareholder".to_string(),
                id: id.to_string(),
            },
            other => other.into(),
        })
    }

    /// 查询全部股东
    pub fn list(&self, include_deleted: bool) -> RepositoryResult<Vec<Shareholder>> {
        let conn = self.get_conn()?;
        let sql = if include_deleted {
            "SELECT id, name, phone, opening_balance, created_at, is_deleted, deleted_at, deleted_by
             FROM shareholders ORDER BY name"
        } else {
            "SELECT id, name, phone, opening_balance, created_at, is_deleted, deleted_at, deleted_by
             FROM shareholders WHERE is_deleted = 0 ORDER BY name"
        };
        let mut stmt = conn.prepare(sql)?;
        let shareholders = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(shareholders)
    }

    /// 软删除股东
    pub fn soft_delete(&self, id: &str, deleted_by: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE shareholders
            SET is_deleted = 1, deleted_at = datetime('now'), deleted_by = ?1
            WHERE id = ?2 AND is_deleted = 0
            "#,
            params![deleted_by, id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Shareholder".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 恢复已软删除的股东
    pub fn restore(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE shareholders
            SET is_deleted = 0, deleted_at = NULL, deleted_by = NULL
            WHERE id = ?1 AND is_deleted = 1
            "#,
            params![id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Shareholder".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ===== 内部: 行映射 =====

    fn map_row(row: &Row) -> rusqlite::Result<Shareholder> {
        Ok(Shareholder {
            id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            opening_balance: row.get(3)?,
            created_at: row.get(4)?,
            is_deleted: row.get(5)?,
            deleted_at: row.get(6)?,
            deleted_by: row.get(7)?,
        })
    }
}

// ==========================================
// ClientRepository - 客户仓储
// ==========================================
pub struct ClientRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ClientRepository {
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
            CREATE TABLE IF NOT EXISTS clients (
              id TEXT PRIMARY KEY,
              name TEXT NOT NULL,
              phone TEXT,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              is_deleted INTEGER NOT NULL DEFAULT 0,
              deleted_at TEXT,
              deleted_by TEXT
            );
            "#,
        )?;
        Ok(())
    }

    /// 新增客户
    pub fn insert(&self, client: &Client) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO clients (id, name, phone, created_at, is_deleted)
            VALUES (?1, ?2, ?3, ?4, 0)
            "#,
            params![client.id, client.name, client.phone, client.created_at],
        )?;
        Ok(())
    }

    /// 查询全部客户
    pub fn list(&self, include_deleted: bool) -> RepositoryResult<Vec<Client>> {
        let conn = self.get_conn()?;
        let sql = if include_deleted {
            "SELECT id, name, phone, created_at, is_deleted, deleted_at, deleted_by
             FROM clients ORDER BY name"
        } else {
            "SELECT id, name, phone, created_at, is_deleted, deleted_at, deleted_by
             FROM clients WHERE is_deleted = 0 ORDER BY name"
        };
        let mut stmt = conn.prepare(sql)?;
        let clients = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(clients)
    }

    /// 软删除客户
    pub fn soft_delete(&self, id: &str, deleted_by: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE clients
            SET is_deleted = 1, deleted_at = datetime('now'), deleted_by = ?1
            WHERE id = ?2 AND is_deleted = 0
            "#,
            params![deleted_by, id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Client".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 恢复已软删除的客户
    pub fn restore(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE clients
            SET is_deleted = 0, deleted_at = NULL, deleted_by = NULL
            WHERE id = ?1 AND is_deleted = 1
            "#,
            params![id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Client".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ===== 内部: 行映射 =====

    fn map_row(row: &Row) -> rusqlite::Result<Client> {
        Ok(Client {
            id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            created_at: row.get(3)?,
            is_deleted: row.get(4)?,
            deleted_at: row.get(5)?,
            deleted_by: row.get(6)?,
        })
    }
}
