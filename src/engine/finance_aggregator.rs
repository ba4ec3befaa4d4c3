// ==========================================
// 纺织工厂管理系统 - 单机台财务聚合引擎
// ==========================================
// 职责: 汇总单机台在目标月份的收入与各类直接成本
// ==========================================
// 口径（与数据源契约的非重叠划分一致,勿改动）:
// - revenue: production_logs 当月合计
// - maintenance_cost: maintenance 表当月合计
// - direct_expenses: 人工录入的机台支出流水（排除镜像流水）
// - fixed_costs / variable_costs: 成本档案（FIXED 全月份 + 当月 VARIABLE）
// 四路查询两两不重叠,净利润恒等式依赖该划分
// ==========================================

use crate::domain::month::MonthWindow;
use crate::domain::report::CostBreakdownItem;
use crate::domain::types::CostType;
use crate::engine::data_source::ReportDataSource;
use crate::repository::error::RepositoryResult;

/// 单机台当月直接财务（分摊前）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectFinancials {
    pub revenue: f64,          // 生产收入
    pub maintenance_cost: f64, // 维修费用
    pub direct_expenses: f64,  // 机台直接支出
    pub fixed_costs: f64,      // 固定成本
    pub variable_costs: f64,   // 变动成本
    pub cost_breakdown: Vec<CostBreakdownItem>, // 成本明细（展示用）
}

impl DirectFinancials {
    /// 分摊前的直接费用合计
    pub fn direct_total(&self) -> f64 {
        self.maintenance_cost + self.direct_expenses + self.fixed_costs + self.variable_costs
    }
}

// ==========================================
// FinanceAggregator - 单机台财务聚合引擎
// ==========================================
pub struct FinanceAggregator {
    // 无状态引擎,数据访问经由 ReportDataSource 契约
}

impl FinanceAggregator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 聚合单机台当月财务
    ///
    /// 所有合计在无记录时为 0,不会出现 NULL/NaN
    pub fn aggregate(
        &self,
        data_source: &dyn ReportDataSource,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<DirectFinancials> {
        // 1. 三路金额合计
        let revenue = data_source.sum_production_revenue(machine_id, window)?;
        let maintenance_cost = data_source.sum_maintenance_cost(machine_id, window)?;
        let direct_expenses = data_source.sum_direct_expense(machine_id, window)?;

        // 2. 成本档案展开为明细 + 按类型小计
        let schedule = data_source.list_cost_schedule(machine_id, window)?;
        let cost_breakdown: Vec<CostBreakdownItem> = schedule
            .iter()
            .map(|c| CostBreakdownItem {
                category: c.category.clone(),
                amount: c.amount,
                cost_type: c.cost_type,
            })
            .collect();

        let fixed_costs = cost_breakdown
            .iter()
            .filter(|c| c.cost_type == CostType::Fixed)
            .map(|c| c.amount)
            .sum();
        let variable_costs = cost_breakdown
            .iter()
            .filter(|c| c.cost_type == CostType::Variable)
            .map(|c| c.amount)
            .sum();

        Ok(DirectFinancials {
            revenue,
            maintenance_cost,
            direct_expenses,
            fixed_costs,
            variable_costs,
            cost_breakdown,
        })
    }
}
