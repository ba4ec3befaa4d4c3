// ==========================================
// 纺织工厂管理系统 - 月度报表结构
// ==========================================
// 职责: 报表引擎的输出 DTO（对外 JSON 形状）
// 说明: 报表是 (year, month, 数据快照) 的纯函数输出,不落库
// ==========================================

use crate::domain::finance::LedgerEntry;
use crate::domain::machine::Machine;
use crate::domain::production::{MaintenanceRecord, OperationRecord, ProductionLog};
use crate::domain::types::{CostType, MachineStatus, OwnerType};
use serde::{Deserialize, Serialize};

// ==========================================
// ActivityMetrics - 状态时间重建结果（引擎内部累加）
// ==========================================
// 天数为小数天（秒/86400）,未出现在流水中的机台三项均为 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    pub working_days: f64,     // 开机天数（ACTIVE）
    pub stopped_days: f64,     // 停机天数（STOPPED）
    pub maintenance_days: f64, // 维修天数（MAINTENANCE）
}

impl ActivityMetrics {
    /// 有状态记录覆盖的总天数
    pub fn logged_days(&self) -> f64 {
        self.working_days + self.stopped_days + self.maintenance_days
    }
}

// ==========================================
// MachineMetrics - 报表条目的运转指标
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineMetrics {
    pub working_days: f64,     // 开机天数
    pub stopped_days: f64,     // 停机天数
    pub maintenance_days: f64, // 维修天数
    pub utilization: f64,      // 利用率（working_days / 当月天数 × 100）
}

// ==========================================
// CostBreakdownItem - 机台成本明细行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdownItem {
    pub category: String, // 科目
    pub amount: f64,      // 金额
    #[serde(rename = "type")]
    pub cost_type: CostType, // 成本类型（FIXED/VARIABLE）
}

// ==========================================
// MachineFinancials - 单机台财务结果
// ==========================================
// 恒等式: net_profit = revenue - total_expenses,
//         total_expenses = maintenance_cost + direct_expenses
//                        + fixed_costs + variable_costs + allocated_expenses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineFinancials {
    pub revenue: f64,            // 生产收入
    pub maintenance_cost: f64,   // 维修费用
    pub direct_expenses: f64,    // 机台直接支出（人工录入流水）
    pub fixed_costs: f64,        // 固定成本
    pub variable_costs: f64,     // 变动成本
    pub cost_breakdown: Vec<CostBreakdownItem>, // 成本明细（展示用）
    pub allocated_expenses: f64, // 分摊的共同费用
    pub total_expenses: f64,     // 费用合计
    pub net_profit: f64,         // 净利润（可为负）
    pub factory_share: f64,      // 工厂分成
    pub shareholder_share: f64,  // 股东分成
}

// ==========================================
// MachineReportEntry - 单机台报表条目
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineReportEntry {
    pub machine_id: String,               // 机台ID
    pub machine_number: String,           // 机台编号
    pub machine_type: String,             // 机台类型
    pub owner_type: OwnerType,            // 归属类型
    pub shareholder_name: Option<String>, // 股东名称
    pub status: MachineStatus,            // 当前状态
    pub metrics: MachineMetrics,          // 运转指标
    pub financials: MachineFinancials,    // 财务结果
}

// ==========================================
// ReportSummary - 全厂汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_revenue: f64,           // 收入合计
    pub total_expenses: f64,          // 费用合计（含分摊）
    pub total_net_profit: f64,        // 净利润合计
    pub total_factory_share: f64,     // 工厂分成合计
    pub total_shareholder_share: f64, // 股东分成合计
    pub total_salaries: f64,          // 在职员工工资合计
    pub shared_expenses: f64,         // 共同费用（不含工资）
    pub total_working_days: f64,      // 全部机台开机天数合计
    pub active_machines_count: i64,   // 当前状态为 ACTIVE 的机台数
    pub total_days_in_month: u32,     // 当月日历天数
}

// ==========================================
// MonthlyReport - 月度利润分摊报表
// ==========================================
// 零机台时返回 error 标记 + 空 report,而非抛错（见引擎层）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>, // 空报表标记（如"未找到机台"）
    pub report: Vec<MachineReportEntry>, // 按机台编号排序的条目
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ReportSummary>, // 全厂汇总（空报表时为 None）
    pub year: i32,  // 目标年份
    pub month: u32, // 目标月份（1-12）
}

impl MonthlyReport {
    /// 构造空报表响应（零机台场景）
    pub fn empty(year: i32, month: u32, reason: &str) -> Self {
        Self {
            error: Some(reason.to_string()),
            report: Vec::new(),
            summary: None,
            year,
            month,
        }
    }

    /// 是否为空报表
    pub fn is_empty(&self) -> bool {
        self.error.is_some()
    }
}

// ==========================================
// MachineMonthlyDetail - 单机台月度明细（下钻视图）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineMonthlyDetail {
    pub machine: Machine,                      // 机台主数据
    pub operations: Vec<OperationRecord>,      // 当月运转台账
    pub maintenance: Vec<MaintenanceRecord>,   // 当月维修记录
    pub production: Vec<ProductionLog>,        // 当月生产记录
    pub expenses: Vec<LedgerEntry>,            // 当月机台直接支出流水
    pub year: i32,  // 目标年份
    pub month: u32, // 目标月份
}
