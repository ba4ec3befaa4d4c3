// ==========================================
// 纺织工厂管理系统 - 报表数据源契约
// ==========================================
// 职责: 定义报表引擎对数据层的全部依赖
// 目标: 引擎只面向本契约编程,可用内存假实现做单元测试,
//       不依赖进程级全局连接
// ==========================================

use crate::domain::finance::MachineCost;
use crate::domain::machine::Machine;
use crate::domain::month::MonthWindow;
use crate::domain::status_log::MachineStatusLog;
use crate::repository::error::RepositoryResult;

/// 报表数据源
///
/// 月度报表引擎需要的 8 个只读查询。全部查询遵循统一口径:
/// - 只统计未软删除的行
/// - 月份过滤使用半开区间 [当月首日, 次月首日)
/// - 聚合无命中时返回 0,而不是 NULL/错误
pub trait ReportDataSource {
    /// 全部未删除机台（按机台编号排序）
    fn list_active_machines(&self) -> RepositoryResult<Vec<Machine>>;

    /// 与月份窗口有交集的全部状态流水（只含未删除机台）
    fn list_status_logs_overlapping(
        &self,
        window: &MonthWindow,
    ) -> RepositoryResult<Vec<MachineStatusLog>>;

    /// 机台当月生产收入合计
    fn sum_production_revenue(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<f64>;

    /// 机台当月维修费用合计
    fn sum_maintenance_cost(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<f64>;

    /// 机台当月直接支出合计（人工录入流水,排除镜像流水）
    fn sum_direct_expense(&self, machine_id: &str, window: &MonthWindow)
        -> RepositoryResult<f64>;

    /// 机台在目标月份应计入的成本档案（FIXED 全部 + 当月 VARIABLE）
    fn list_cost_schedule(
        &self,
        machine_id: &str,
        window: &MonthWindow,
    ) -> RepositoryResult<Vec<MachineCost>>;

    /// 在职员工月工资合计（当前花名册,与月份无关）
    fn sum_active_salaries(&self) -> RepositoryResult<f64>;

    /// 当月共同费用合计（未关联机台且未关联股东的支出）
    fn sum_shared_overhead(&self, window: &MonthWindow) -> RepositoryResult<f64>;
}
