// ==========================================
// 纺织工厂管理系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 机台状态 (Machine Status)
// ==========================================
// 状态流水表与机台主表共用同一组值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineStatus {
    Active,      // 运转中
    Stopped,     // 停机
    Maintenance, // 维修中
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineStatus::Active => write!(f, "ACTIVE"),
            MachineStatus::Stopped => write!(f, "STOPPED"),
            MachineStatus::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

impl MachineStatus {
    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "ACTIVE" => MachineStatus::Active,
            "MAINTENANCE" => MachineStatus::Maintenance,
            _ => MachineStatus::Stopped, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MachineStatus::Active => "ACTIVE",
            MachineStatus::Stopped => "STOPPED",
            MachineStatus::Maintenance => "MAINTENANCE",
        }
    }
}

// ==========================================
// 机台归属 (Owner Type)
// ==========================================
// 红线: FACTORY 机台的利润分成比例恒为 100 且无股东关联
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnerType {
    Factory,     // 工厂自有
    Shareholder, // 股东所有
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerType::Factory => write!(f, "FACTORY"),
            OwnerType::Shareholder => write!(f, "SHAREHOLDER"),
        }
    }
}

impl OwnerType {
    /// 从字符串解析归属类型
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "SHAREHOLDER" => OwnerType::Shareholder,
            _ => OwnerType::Factory, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OwnerType::Factory => "FACTORY",
            OwnerType::Shareholder => "SHAREHOLDER",
        }
    }
}

// ==========================================
// 流水类型 (Transaction Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,  // 收入
    Expense, // 支出
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "INCOME"),
            TransactionType::Expense => write!(f, "EXPENSE"),
        }
    }
}

impl TransactionType {
    /// 从字符串解析流水类型
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "INCOME" => TransactionType::Income,
            _ => TransactionType::Expense, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

// ==========================================
// 机台成本类型 (Cost Type)
// ==========================================
// FIXED 每月固定发生; VARIABLE 只计入 billing_month 所在月份
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostType {
    Fixed,    // 固定成本
    Variable, // 变动成本
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostType::Fixed => write!(f, "FIXED"),
            CostType::Variable => write!(f, "VARIABLE"),
        }
    }
}

impl CostType {
    /// 从字符串解析成本类型
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "VARIABLE" => CostType::Variable,
            _ => CostType::Fixed, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            CostType::Fixed => "FIXED",
            CostType::Variable => "VARIABLE",
        }
    }
}

// ==========================================
// 员工状态 (Employee Status)
// ==========================================
// 只有 ACTIVE 且未删除的员工工资计入共同费用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    Active,   // 在职
    Inactive, // 离职
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeStatus::Active => write!(f, "ACTIVE"),
            EmployeeStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}

impl EmployeeStatus {
    /// 从字符串解析员工状态
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "ACTIVE" => EmployeeStatus::Active,
            _ => EmployeeStatus::Inactive, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "ACTIVE",
            EmployeeStatus::Inactive => "INACTIVE",
        }
    }
}

// ==========================================
// 计量单位 (Unit)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kg,  // 千克
    Ton, // 吨
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Kg => write!(f, "kg"),
            Unit::Ton => write!(f, "ton"),
        }
    }
}

impl Unit {
    /// 从字符串解析单位
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "ton" => Unit::Ton,
            _ => Unit::Kg, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Ton => "ton",
        }
    }
}

// ==========================================
// 软删除能力 (Deletable)
// ==========================================
// 所有业务表统一携带 is_deleted/deleted_at/deleted_by 三列,
// 聚合查询一律过滤 is_deleted = 0
pub trait Deletable {
    /// 行是否有效（未被软删除）
    fn is_active(&self) -> bool;
}
