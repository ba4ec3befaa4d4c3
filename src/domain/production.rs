// ==========================================
// 纺织工厂管理系统 - 生产与维修领域模型
// ==========================================
// 对齐: production_logs / maintenance / operations 表
// 说明: 生产记录与维修记录各自镜像一条财务流水（source_id 反向关联），
//       软删除/恢复沿该关联级联（见 ProductionApi / MaintenanceApi）
// ==========================================

use crate::domain::types::{Deletable, Unit};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// ProductionLog - 生产记录
// ==========================================
// total_amount 在创建时按 quantity × unit_price 计算落库
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionLog {
    // ===== 主键与关联 =====
    pub id: String,                 // 记录唯一标识（UUID）
    pub machine_id: String,         // 生产机台（FK）
    pub client_id: Option<String>,  // 委托客户（可空）

    // ===== 业务字段 =====
    pub product_name: String, // 产品名称
    pub quantity: f64,        // 数量
    pub unit: Unit,           // 计量单位（kg/ton）
    pub unit_price: f64,      // 单价
    pub total_amount: f64,    // 金额（quantity × unit_price）
    pub log_date: NaiveDate,  // 生产日期
    pub notes: Option<String>, // 备注

    // ===== 连接查询派生（不落库）=====
    pub machine_number: Option<String>, // 机台编号
    pub client_name: Option<String>,    // 客户名称

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime, // 记录创建时间

    // ===== 软删除 =====
    pub is_deleted: bool,                  // 软删除标记
    pub deleted_at: Option<NaiveDateTime>, // 删除时间
    pub deleted_by: Option<String>,        // 删除操作人
}

impl ProductionLog {
    /// 创建新生产记录（自动生成 UUID、计算金额）
    pub fn new(
        machine_id: String,
        client_id: Option<String>,
        product_name: String,
        quantity: f64,
        unit: Unit,
        unit_price: f64,
        log_date: NaiveDate,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            machine_id,
            client_id,
            product_name,
            quantity,
            unit,
            unit_price,
            total_amount: quantity * unit_price,
            log_date,
            notes,
            machine_number: None,
            client_name: None,
            created_at: Utc::now().naive_utc(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

impl Deletable for ProductionLog {
    fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

// ==========================================
// MaintenanceRecord - 维修记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    // ===== 主键与关联 =====
    pub id: String,         // 记录唯一标识（UUID）
    pub machine_id: String, // 维修机台（FK）

    // ===== 业务字段 =====
    pub maintenance_date: NaiveDate,        // 维修日期
    pub maintenance_type: Option<String>,   // 维修类型
    pub cost: f64,                          // 维修费用
    pub notes: Option<String>,              // 备注
    pub next_due_date: Option<NaiveDate>,   // 下次保养日期

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime, // 记录创建时间

    // ===== 软删除 =====
    pub is_deleted: bool,                  // 软删除标记
    pub deleted_at: Option<NaiveDateTime>, // 删除时间
    pub deleted_by: Option<String>,        // 删除操作人
}

impl MaintenanceRecord {
    /// 创建新维修记录
    pub fn new(
        machine_id: String,
        maintenance_date: NaiveDate,
        maintenance_type: Option<String>,
        cost: f64,
        notes: Option<String>,
        next_due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            machine_id,
            maintenance_date,
            maintenance_type,
            cost,
            notes,
            next_due_date,
            created_at: Utc::now().naive_utc(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

impl Deletable for MaintenanceRecord {
    fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

// ==========================================
// OperationRecord - 运转台账
// ==========================================
// 用途: 驾驶舱效率视图（工时/运转天数），不参与月度利润分摊
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRecord {
    // ===== 主键与关联 =====
    pub id: String,         // 记录唯一标识（UUID）
    pub machine_id: String, // 运转机台（FK）

    // ===== 业务字段 =====
    pub operation_date: NaiveDate, // 运转日期
    pub hours_worked: f64,         // 工作小时数
    pub notes: Option<String>,     // 备注

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime, // 记录创建时间

    // ===== 软删除 =====
    pub is_deleted: bool,                  // 软删除标记
    pub deleted_at: Option<NaiveDateTime>, // 删除时间
    pub deleted_by: Option<String>,        // 删除操作人
}

impl OperationRecord {
    /// 创建新运转台账
    pub fn new(
        machine_id: String,
        operation_date: NaiveDate,
        hours_worked: f64,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            machine_id,
            operation_date,
            hours_worked,
            notes,
            created_at: Utc::now().naive_utc(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

impl Deletable for OperationRecord {
    fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
