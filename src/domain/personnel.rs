// ==========================================
// 纺织工厂管理系统 - 人员与往来单位领域模型
// ==========================================
// 对齐: employees / shareholders / clients 表
// ==========================================

use crate::domain::types::{Deletable, EmployeeStatus};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Employee - 员工
// ==========================================
// 红线: 只有 status=ACTIVE 且未删除的员工工资计入共同费用分摊
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    // ===== 主键 =====
    pub id: String, // 员工唯一标识（UUID）

    // ===== 业务字段 =====
    pub name: String,                  // 姓名
    pub monthly_salary: f64,           // 月工资
    pub hire_date: Option<NaiveDate>,  // 入职日期
    pub status: EmployeeStatus,        // 在职状态（ACTIVE/INACTIVE）

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime, // 记录创建时间

    // ===== 软删除 =====
    pub is_deleted: bool,                  // 软删除标记
    pub deleted_at: Option<NaiveDateTime>, // 删除时间
    pub deleted_by: Option<String>,        // 删除操作人
}

impl Employee {
    /// 创建新员工（默认在职）
    pub fn new(name: String, monthly_salary: f64, hire_date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            monthly_salary,
            hire_date,
            status: EmployeeStatus::Active,
            created_at: Utc::now().naive_utc(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

impl Deletable for Employee {
    fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

// ==========================================
// Shareholder - 股东
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shareholder {
    // ===== 主键 =====
    pub id: String, // 股东唯一标识（UUID）

    // ===== 业务字段 =====
    pub name: String,          // 名称
    pub phone: Option<String>, // 联系电话
    pub opening_balance: f64,  // 期初余额

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime, // 记录创建时间

    // ===== 软删除 =====
    pub is_deleted: bool,                  // 软删除标记
    pub deleted_at: Option<NaiveDateTime>, // 删除时间
    pub deleted_by: Option<String>,        // 删除操作人
}

impl Shareholder {
    /// 创建新股东
    pub fn new(name: String, phone: Option<String>, opening_balance: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            phone,
            opening_balance,
            created_at: Utc::now().naive_utc(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

impl Deletable for Shareholder {
    fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

// ==========================================
// Client - 客户
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    // ===== 主键 =====
    pub id: String, // 客户唯一标识（UUID）

    // ===== 业务字段 =====
    pub name: String,          // 名称
    pub phone: Option<String>, // 联系电话

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime, // 记录创建时间

    // ===== 软删除 =====
    pub is_deleted: bool,                  // 软删除标记
    pub deleted_at: Option<NaiveDateTime>, // 删除时间
    pub deleted_by: Option<String>,        // 删除操作人
}

impl Client {
    /// 创建新客户
    pub fn new(name: String, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            phone,
            created_at: Utc::now().naive_utc(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

impl Deletable for Client {
    fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
