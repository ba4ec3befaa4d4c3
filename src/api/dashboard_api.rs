// ==========================================
// 纺织工厂管理系统 - 驾驶舱 API
// ==========================================
// 职责: 全厂概览（机台状态分布 + 当月收支）与机台效率视图
// 口径: 当月收入 = 生产记录合计; 当月支出 = EXPENSE 流水合计 + 在职工资
//       （概览口径,不做机台级分摊,分摊见 ReportApi）
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::month::MonthWindow;
use crate::domain::types::TransactionType;
use crate::repository::{
    EmployeeRepository, MachineRepository, OperationRepository, ProductionLogRepository,
    TransactionRepository,
};
use serde::{Deserialize, Serialize};

// ==========================================
// 响应结构
// ==========================================

/// 机台状态分布
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineCountSummary {
    pub total: i64,       // 机台总数
    pub active: i64,      // 运转中
    pub stopped: i64,     // 停机
    pub maintenance: i64, // 维修中
}

/// 当月收支概览
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceSummary {
    pub total_income: f64,   // 当月生产收入
    pub total_expenses: f64, // 当月支出（流水 + 在职工资）
    pub net_profit: f64,     // 当月净利润
}

/// 驾驶舱概览
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub machines: MachineCountSummary, // 机台状态分布
    pub finance: FinanceSummary,       // 当月收支
}

/// 机台效率行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineEfficiency {
    pub machine_number: String, // 机台编号
    pub machine_type: String,   // 机台类型
    pub total_hours: f64,       // 当月工作小时合计
    pub days_operated: i64,     // 当月有台账的天数
    pub avg_hours_per_day: f64, // 日均工作小时
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    /// 机台仓储
    machine_repo: Arc<MachineRepository>,
    /// 生产记录仓储
    production_repo: Arc<ProductionLogRepository>,
    /// 财务流水仓储
    transaction_repo: Arc<TransactionRepository>,
    /// 员工仓储
    employee_repo: Arc<EmployeeRepository>,
    /// 运转台账仓储
    operation_repo: Arc<OperationRepository>,
}

impl DashboardApi {
    /// 创建新的 DashboardApi 实例
    pub fn new(
        machine_repo: Arc<MachineRepository>,
        production_repo: Arc<ProductionLogRepository>,
        transaction_repo: Arc<TransactionRepository>,
        employee_repo: Arc<EmployeeRepository>,
        operation_repo: Arc<OperationRepository>,
    ) -> Self {
        Self {
            machine_repo,
            production_repo,
            transaction_repo,
            employee_repo,
            operation_repo,
        }
    }

    /// 驾驶舱概览（指定月份）
    pub fn get_summary(&self, year: i32, month: u32) -> ApiResult<DashboardSummary> {
        let window = Self::month_window(year, month)?;

        let counts = self.machine_repo.count_by_status()?;
        let total_income = self.production_repo.sum_month_revenue_all(&window)?;
        let month_expenses = self
            .transaction_repo
            .sum_month_by_type(TransactionType::Expense, &window)?;
        let total_salaries = self.employee_repo.sum_active_salaries()?;

        let total_expenses = month_expenses + total_salaries;

        Ok(DashboardSummary {
            machines: MachineCountSummary {
                total: counts.total,
                active: counts.active,
                stopped: counts.stopped,
                maintenance: counts.maintenance,
            },
            finance: FinanceSummary {
                total_income,
                total_expenses,
                net_profit: total_income - total_expenses,
            },
        })
    }

    /// 机台效率视图（指定月份,无台账机台计 0）
    pub fn get_machine_efficiency(
        &self,
        year: i32,
        month: u32,
    ) -> ApiResult<Vec<MachineEfficiency>> {
        let window = Self::month_window(year, month)?;

        let rows = self.operation_repo.efficiency_for_month(&window)?;
        let efficiency = rows
            .into_iter()
            .map(|row| {
                let avg = if row.days_operated > 0 {
                    row.total_hours / row.days_operated as f64
                } else {
                    0.0
                };
                MachineEfficiency {
                    machine_number: row.machine_number,
                    machine_type: row.machine_type,
                    total_hours: row.total_hours,
                    days_operated: row.days_operated,
                    avg_hours_per_day: avg,
                }
            })
            .collect();
        Ok(efficiency)
    }

    // ===== 内部: 校验 =====

    fn month_window(year: i32, month: u32) -> ApiResult<MonthWindow> {
        MonthWindow::new(year, month).ok_or_else(|| {
            ApiError::InvalidInput(format!("非法的年月: {}-{}", year, month))
        })
    }
}
