// ==========================================
// 纺织工厂管理系统 - 月度报表装配引擎
// ==========================================
// 职责: 串联时间线重建、财务聚合、费用分摊、利润分成,
//       产出单月全厂利润分摊报表
// 输入: ReportDataSource 数据快照 + (year, month, now)
// 输出: MonthlyReport（机台条目按编号排序 + 全厂汇总）
// ==========================================
// 约束:
// - 整个计算是 (year, month, now, 快照) 的纯函数,不写库,可重入
// - 零机台返回显式空报表标记,不抛错
// - 任一查询失败则整个报表失败,不返回部分结果
// ==========================================

use crate::domain::month::MonthWindow;
use crate::domain::report::{
    ActivityMetrics, MachineFinancials, MachineMetrics, MachineReportEntry, MonthlyReport,
    ReportSummary,
};
use crate::domain::types::MachineStatus;
use crate::engine::allocation::{MachineUsage, SharedCostAllocator};
use crate::engine::data_source::ReportDataSource;
use crate::engine::finance_aggregator::FinanceAggregator;
use crate::engine::profit::ProfitSplitter;
use crate::engine::status_timeline::StatusTimelineEngine;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;

// ==========================================
// MonthlyReportEngine - 月度报表装配引擎
// ==========================================
pub struct MonthlyReportEngine {
    timeline: StatusTimelineEngine,
    aggregator: FinanceAggregator,
    allocator: SharedCostAllocator,
    splitter: ProfitSplitter,
}

impl MonthlyReportEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            timeline: StatusTimelineEngine::new(),
            aggregator: FinanceAggregator::new(),
            allocator: SharedCostAllocator::new(),
            splitter: ProfitSplitter::new(),
        }
    }

    /// 生成月度利润分摊报表
    ///
    /// # 参数
    /// - `data_source`: 报表数据源（生产环境为仓储聚合,测试环境可为内存假实现）
    /// - `year` / `month`: 目标月份
    /// - `now`: 当前时刻（开放状态区间的截止口径）
    ///
    /// # 返回
    /// - Ok(MonthlyReport): 完整报表; 零机台时为带 error 标记的空报表
    /// - Err(RepositoryError): 月份非法或数据源查询失败
    pub fn generate(
        &self,
        data_source: &dyn ReportDataSource,
        year: i32,
        month: u32,
        now: NaiveDateTime,
    ) -> RepositoryResult<MonthlyReport> {
        // 1. 展开月份窗口
        let window = MonthWindow::new(year, month).ok_or_else(|| {
            RepositoryError::ValidationError(format!("非法的报表月份: {}-{}", year, month))
        })?;

        // 2. 机台快照（零机台 → 显式空报表）
        let machines = data_source.list_active_machines()?;
        if machines.is_empty() {
            tracing::info!(year, month, "无可用机台,返回空报表");
            return Ok(MonthlyReport::empty(year, month, "未找到机台"));
        }

        // 3. 重建状态时间线
        let logs = data_source.list_status_logs_overlapping(&window)?;
        let metrics_by_machine = self.timeline.reconstruct(&logs, &window, now);

        // 4. 共同费用总额（工资 + 未归属支出）
        let total_salaries = data_source.sum_active_salaries()?;
        let shared_expenses = data_source.sum_shared_overhead(&window)?;
        let total_shared = total_salaries + shared_expenses;

        // 5. 分摊共同费用
        let usages: Vec<MachineUsage> = machines
            .iter()
            .map(|m| MachineUsage {
                machine_id: m.id.clone(),
                working_days: metrics_by_machine
                    .get(&m.id)
                    .copied()
                    .unwrap_or_default()
                    .working_days,
                current_status: m.status,
            })
            .collect();
        let allocations = self.allocator.allocate(&usages, total_shared);

        let total_working_days: f64 = usages.iter().map(|u| u.working_days).sum();
        let active_machines_count = machines
            .iter()
            .filter(|m| m.status == MachineStatus::Active)
            .count() as i64;

        // 6. 逐机台装配条目
        let mut report = Vec::with_capacity(machines.len());
        for machine in &machines {
            let metrics: ActivityMetrics = metrics_by_machine
                .get(&machine.id)
                .copied()
                .unwrap_or_default();

            let direct = self.aggregator.aggregate(data_source, &machine.id, &window)?;
            let allocated_expenses = allocations.get(&machine.id).copied().unwrap_or(0.0);

            let total_expenses = direct.direct_total() + allocated_expenses;
            let net_profit = direct.revenue - total_expenses;
            let split = self.splitter.split(
                net_profit,
                machine.owner_type,
                machine.factory_profit_percentage,
            );

            report.push(MachineReportEntry {
                machine_id: machine.id.clone(),
                machine_number: machine.machine_number.clone(),
                machine_type: machine.machine_type.clone(),
                owner_type: machine.owner_type,
                shareholder_name: machine.shareholder_name.clone(),
                status: machine.status,
                metrics: MachineMetrics {
                    working_days: metrics.working_days,
                    stopped_days: metrics.stopped_days,
                    maintenance_days: metrics.maintenance_days,
                    utilization: StatusTimelineEngine::utilization(&metrics, &window),
                },
                financials: MachineFinancials {
                    revenue: direct.revenue,
                    maintenance_cost: direct.maintenance_cost,
                    direct_expenses: direct.direct_expenses,
                    fixed_costs: direct.fixed_costs,
                    variable_costs: direct.variable_costs,
                    cost_breakdown: direct.cost_breakdown,
                    allocated_expenses,
                    total_expenses,
                    net_profit,
                    factory_share: split.factory_share,
                    shareholder_share: split.shareholder_share,
                },
            });
        }

        // 7. 全厂汇总
        let summary = ReportSummary {
            total_revenue: report.iter().map(|m| m.financials.revenue).sum(),
            total_expenses: report.iter().map(|m| m.financials.total_expenses).sum(),
            total_net_profit: report.iter().map(|m| m.financials.net_profit).sum(),
            total_factory_share: report.iter().map(|m| m.financials.factory_share).sum(),
            total_shareholder_share: report
                .iter()
                .map(|m| m.financials.shareholder_share)
                .sum(),
            total_salaries,
            shared_expenses,
            total_working_days,
            active_machines_count,
            total_days_in_month: window.days_in_month,
        };

        tracing::info!(
            year,
            month,
            machines = report.len(),
            net_profit = summary.total_net_profit,
            "月度报表生成完成"
        );

        Ok(MonthlyReport {
            error: None,
            report,
            summary: Some(summary),
            year,
            month,
        })
    }
}
