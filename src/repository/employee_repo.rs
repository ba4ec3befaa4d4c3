// ==========================================
// 纺织工厂管理系统 - 员工仓储
// ==========================================
// 职责: 管理 employees 表
// 说明: sum_active_salaries 是共同费用分摊的工资口径
//       （当前在职花名册,与报表月份无关）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::personnel::Employee;
use crate::domain::types::EmployeeStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepository {
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
            CREATE TABLE IF NOT EXISTS employees (
              id TEXT PRIMARY KEY,
              name TEXT NOT NULL,
              monthly_salary REAL NOT NULL DEFAULT 0,
              hire_date TEXT,
              status TEXT NOT NULL DEFAULT 'ACTIVE'
                CHECK (status IN ('ACTIVE', 'INACTIVE')),
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              is_deleted INTEGER NOT NULL DEFAULT 0,
              deleted_at TEXT,
              deleted_by TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_employees_status
              ON employees(status, is_deleted);
            "#,
        )?;
        Ok(())
    }

    /// 新增员工
    pub fn insert(&self, employee: &Employee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO employees (id, name, monthly_salary, hire_date, status, created_at, is_deleted)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)
            "#,
            params![
                employee.id,
                employee.name,
                employee.monthly_salary,
                employee.hire_date,
                employee.status.to_db_str(),
                employee.created_at,
            ],
        )?;
        Ok(())
    }

    /// 更新员工（姓名/工资/入职日期/在职状态）
    pub fn update(&self, employee: &Employee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE employees
            SET name = ?1, monthly_salary = ?2, hire_date = ?3, status = ?4
            WHERE id = ?5 AND is_deleted = 0
            "#,
            params![
                employee.name,
                employee.monthly_salary,
                employee.hire_date,
                employee.status.to_db_str(),
                employee.id,
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: employee.id.clone(),
            });
        }
        Ok(())
    }

    /// 查询单个员工（含已删除行,调用方自行判断）
    pub fn get(&self, id: &str) -> RepositoryResult<Employee> {
        let conn = self.get_conn()?;
        conn.query_row(
            "SELECT id, name, monthly_salary, hire_date, status, created_at, is_deleted, deleted_at, deleted_by
             FROM employees WHERE id = ?1",
            params![id],
            Self::map_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: id.to_string(),
            },
            other => other.into(),
        })
    }

    /// 查询全部员工
    pub fn list(&self, include_deleted: bool) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;
        let sql = if include_deleted {
            "SELECT id, name, monthly_salary, hire_date, status, created_at, is_deleted, deleted_at, deleted_by
             FROM employees ORDER BY name"
        } else {
            "SELECT id, name, monthly_salary, hire_date, status, created_at, is_deleted, deleted_at, deleted_by
             FROM employees WHERE is_deleted = 0 ORDER BY name"
        };
        let mut stmt = conn.prepare(sql)?;
        let employees = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(employees)
    }

    /// 软删除员工
    pub fn soft_delete(&self, id: &str, deleted_by: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE employees
            SET is_deleted = 1, deleted_at = datetime('now'), deleted_by = ?1
            WHERE id = ?2 AND is_deleted = 0
            "#,
            params![deleted_by, id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 恢复已软删除的员工
    pub fn restore(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE employees
            SET is_deleted = 0, deleted_at = NULL, deleted_by = NULL
            WHERE id = ?1 AND is_deleted = 1
            "#,
            params![id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 在职员工月工资合计（无记录时为 0）
    pub fn sum_active_salaries(&self) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(monthly_salary), 0)
            FROM employees
            WHERE status = 'ACTIVE' AND is_deleted = 0
            "#,
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    // ===== 内部: 行映射 =====

    fn map_row(row: &Row) -> rusqlite::Result<Employee> {
        let status: String = row.get(4)?;
        Ok(Employee {
            id: row.get(0)?,
            name: row.get(1)?,
            monthly_salary: row.get(2)?,
            hire_date: row.get(3)?,
            status: EmployeeStatus::from_str(&status),
            created_at: row.get(5)?,
            is_deleted: row.get(6)?,
            deleted_at: row.get(7)?,
            deleted_by: row.get(8)?,
        })
    }
}
