// ==========================================
// 纺织工厂管理系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合报表引擎所需的全部 Repository,并实现 ReportDataSource 契约
// 目标: 减少 MonthlyReportEngine 调用方的装配负担,
//       生产环境用本聚合,测试环境用内存假实现
// ==========================================

use std::sync::Arc;

use crate::domain::finance::MachineCost;
use crate::domain::machine::Machine;
use crate::domain::month::MonthWindow;
use crate::domain::status_log::MachineStatusLog;
use crate::engine::data_source::ReportDataSource;
use crate::repository::{
    EmployeeRepository, MachineCostRepository, MachineRepository, MaintenanceRepository,
    ProductionLogRepository, RepositoryResult, StatusLogRepository, TransactionRepository,
};

/// 报表仓储集合
///
/// 聚合报表引擎依赖的 7 个 Repository,作为 ReportDataSource 的
/// 生产实现注入引擎。
#[derive(Clone)]
pub struct ReportRepositories {
    /// 机台仓储
    pub machine_repo: Arc<MachineRepository>,
    /// 状态流水仓储
    pub status_log_repo: Arc<StatusLogRepository>,
    /// 生产记录仓储
    pub production_repo: Arc<ProductionLogRepository>,
    /// 维修记录仓储
    pub maintenance_repo: Arc<MaintenanceRepository>,
    /// 财务流水仓储
    pub transaction_repo: Arc<TransactionRepository>,
    /// 机台成本档案仓储
    pub machine_cost_repo: Arc<MachineCostRepository>,
    /// 员工仓储
    pub employee_repo: Arc<EmployeeRepository>,
}

impl ReportRepositories {
    /// 创建新的仓储集合
    pub fn new(
        machine_repo: Arc<MachineRepository>,
        status_log_repo: Arc<StatusLogRepository>,
        production_repo: Arc<ProductionLogRepository>,
        maintenance_repo: Arc<MaintenanceRepository>,
        transaction_repo: Arc<TransactionRepository>,
        machine_cost_repo: Arc<MachineCostRepository>,
        employee_repo: Arc<EmployeeRepository>,
    ) -> Self {
        Self {
            machine_repo,
            status_log_repo,
            production_repo,
            maintenance_repo,
            transaction_repo,
            machine_cost_repo,
            employee_repo,
        }
    }
}

impl ReportDataSource for ReportRepositories {
    fn list_active_machines(&self) -> RepositoryResult<Vec<Machine>> {
        self.machine_repo.list(false)
    }

    fn list_status_logs_overlapping(
        &self,
        window: &MonthWindow,
    ) -> RepositoryResult<Vec<MachineStatusLog>> {
        self.status_log_repo.list_overlapping_window(window)
    }

    fn sum_production_revenue(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<f64> {
        self.production_repo.sum_month_revenue(machine_id, window)
    }

    fn sum_maintenance_cost(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<f64> {
        self.maintenance_repo.sum_month_cost(machine_id, window)
    }

    fn sum_direct_expense(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<f64> {
        self.transaction_repo.sum_direct_expense(machine_id, window)
    }

    fn list_cost_schedule(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<Vec<MachineCost>> {
        self.machine_cost_repo.list_applicable(machine_id, window)
    }

    fn sum_active_salaries(&self) -> RepositoryResult<f64> {
        self.employee_repo.sum_active_salaries()
    }

    fn sum_shared_overhead(&self, window: &MonthWindow) -> RepositoryResult<f64> {
        self.transaction_repo.sum_shared_overhead(window)
    }
}
