// ==========================================
// 纺织工厂管理系统 - 机台领域模型
// ==========================================
// 对齐: machines 表
// 红线: FACTORY 机台 factory_profit_percentage 恒为 100 且 shareholder_id 为 NULL,
//       该不变量在写入路径归一化（见 MachineApi）
// ==========================================

use crate::domain::types::{Deletable, MachineStatus, OwnerType};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Machine - 机台主数据
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    // ===== 主键 =====
    pub id: String, // 机台唯一标识（UUID）

    // ===== 基础信息 =====
    pub machine_number: String,        // 机台编号（展示与排序键）
    pub machine_type: String,          // 机台类型
    pub status: MachineStatus,         // 当前状态（与状态流水表同步更新）
    pub start_date: Option<NaiveDate>, // 投产日期

    // ===== 归属与分成 =====
    pub owner_type: OwnerType,             // 归属类型（FACTORY/SHAREHOLDER）
    pub shareholder_id: Option<String>,    // 所属股东（FACTORY 时为 NULL）
    pub shareholder_name: Option<String>,  // 股东名称（连接查询派生，不落库）
    pub factory_profit_percentage: f64,    // 工厂分成比例（0-100）

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime, // 记录创建时间

    // ===== 软删除 =====
    pub is_deleted: bool,                  // 软删除标记
    pub deleted_at: Option<NaiveDateTime>, // 删除时间
    pub deleted_by: Option<String>,        // 删除操作人
}

impl Machine {
    /// 创建新机台（自动生成 UUID 和时间戳，归一化 FACTORY 不变量）
    pub fn new(
        machine_number: String,
        machine_type: String,
        owner_type: OwnerType,
        shareholder_id: Option<String>,
        factory_profit_percentage: Option<f64>,
        start_date: Option<NaiveDate>,
    ) -> Self {
        let (shareholder_id, pct) = match owner_type {
            OwnerType::Factory => (None, 100.0),
            OwnerType::Shareholder => (shareholder_id, factory_profit_percentage.unwrap_or(50.0)),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            machine_number,
            machine_type,
            status: MachineStatus::Stopped,
            start_date,
            owner_type,
            shareholder_id,
            shareholder_name: None,
            factory_profit_percentage: pct,
            created_at: Utc::now().naive_utc(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

impl Deletable for Machine {
    fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
