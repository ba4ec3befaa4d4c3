// ==========================================
// 纺织工厂管理系统 - 财务领域模型
// ==========================================
// 对齐: transactions / machine_costs 表
// 说明: machine_id 与 shareholder_id 均为 NULL 的 EXPENSE 流水视为
//       共同费用（房租、水电等），由报表引擎按开机天数分摊
// ==========================================

use crate::domain::types::{CostType, Deletable, TransactionType};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// LedgerEntry - 财务流水
// ==========================================
// source_id: 由生产/维修记录镜像生成时指向来源记录,
//            人工录入的流水该字段为 NULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    // ===== 主键 =====
    pub id: String, // 流水唯一标识（UUID）

    // ===== 业务字段 =====
    pub transaction_type: TransactionType, // 流水类型（INCOME/EXPENSE）
    pub category: String,                  // 科目（Production/Maintenance/Rent/...）
    pub amount: f64,                       // 金额
    pub transaction_date: NaiveDate,       // 发生日期
    pub description: Option<String>,       // 摘要

    // ===== 关联维度（均可空）=====
    pub machine_id: Option<String>,     // 关联机台
    pub client_id: Option<String>,      // 关联客户
    pub shareholder_id: Option<String>, // 关联股东（分红、往来）
    pub source_id: Option<String>,      // 镜像来源记录（生产/维修）

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime, // 记录创建时间

    // ===== 软删除 =====
    pub is_deleted: bool,                  // 软删除标记
    pub deleted_at: Option<NaiveDateTime>, // 删除时间
    pub deleted_by: Option<String>,        // 删除操作人
}

impl LedgerEntry {
    /// 创建人工录入的流水（source_id 为 NULL）
    pub fn new(
        transaction_type: TransactionType,
        category: String,
        amount: f64,
        transaction_date: NaiveDate,
        machine_id: Option<String>,
        client_id: Option<String>,
        shareholder_id: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            transaction_type,
            category,
            amount,
            transaction_date,
            description,
            machine_id,
            client_id,
            shareholder_id,
            source_id: None,
            created_at: Utc::now().naive_utc(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// 创建由业务记录镜像生成的流水
    pub fn mirrored(
        transaction_type: TransactionType,
        category: String,
        amount: f64,
        transaction_date: NaiveDate,
        machine_id: Option<String>,
        client_id: Option<String>,
        description: Option<String>,
        source_id: String,
    ) -> Self {
        let mut entry = Self::new(
            transaction_type,
            category,
            amount,
            transaction_date,
            machine_id,
            client_id,
            None,
            description,
        );
        entry.source_id = Some(source_id);
        entry
    }

    /// 是否为共同费用（未关联机台且未关联股东的支出）
    pub fn is_shared_overhead(&self) -> bool {
        self.transaction_type == TransactionType::Expense
            && self.machine_id.is_none()
            && self.shareholder_id.is_none()
    }
}

impl Deletable for LedgerEntry {
    fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

// ==========================================
// MachineCost - 机台成本档案
// ==========================================
// FIXED 成本每月固定计入; VARIABLE 成本仅计入 billing_month 所在月份
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineCost {
    // ===== 主键与关联 =====
    pub id: String,         // 记录唯一标识（UUID）
    pub machine_id: String, // 关联机台（FK）

    // ===== 业务字段 =====
    pub cost_type: CostType,               // 成本类型（FIXED/VARIABLE）
    pub category: String,                  // 科目（折旧、保险、配件...）
    pub amount: f64,                       // 金额
    pub billing_month: Option<NaiveDate>,  // 计费月份（月首日；VARIABLE 必填）
    pub notes: Option<String>,             // 备注

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime, // 记录创建时间

    // ===== 软删除 =====
    pub is_deleted: bool,                  // 软删除标记
    pub deleted_at: Option<NaiveDateTime>, // 删除时间
    pub deleted_by: Option<String>,        // 删除操作人
}

impl MachineCost {
    /// 创建新成本档案
    pub fn new(
        machine_id: String,
        cost_type: CostType,
        category: String,
        amount: f64,
        billing_month: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            machine_id,
            cost_type,
            category,
            amount,
            billing_month,
            notes,
            created_at: Utc::now().naive_utc(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

impl Deletable for MachineCost {
    fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
