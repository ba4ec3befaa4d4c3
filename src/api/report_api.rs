// ==========================================
// 纺织工厂管理系统 - 报表 API
// ==========================================
// 职责: 月度利润分摊报表 + 单机台月度明细下钻
// 架构: API 层 → 报表引擎 (MonthlyReportEngine) → 数据源契约
// 说明: 报表为只读分析计算,零机台返回显式空报表标记,
//       数据源故障则整个请求失败,不返回部分结果
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::month::MonthWindow;
use crate::domain::report::{MachineMonthlyDetail, MonthlyReport};
use crate::engine::report::MonthlyReportEngine;
use crate::engine::repositories::ReportRepositories;
use crate::repository::OperationRepository;
use chrono::NaiveDateTime;

// ==========================================
// ReportApi - 报表 API
// ==========================================
pub struct ReportApi {
    /// 报表仓储聚合（兼作报表引擎的数据源）
    repositories: ReportRepositories,
    /// 运转台账仓储（仅下钻视图使用,不参与利润分摊）
    operation_repo: Arc<OperationRepository>,
    /// 月度报表引擎
    engine: MonthlyReportEngine,
}

impl ReportApi {
    /// 创建新的 ReportApi 实例
    pub fn new(repositories: ReportRepositories, operation_repo: Arc<OperationRepository>) -> Self {
        Self {
            repositories,
            operation_repo,
            engine: MonthlyReportEngine::new(),
        }
    }

    /// 生成月度利润分摊报表（以当前时刻为开放区间截止口径）
    pub fn get_monthly_report(&self, year: i32, month: u32) -> ApiResult<MonthlyReport> {
        self.get_monthly_report_at(year, month, chrono::Local::now().naive_local())
    }

    /// 生成月度利润分摊报表（指定当前时刻,供测试与回放使用）
    pub fn get_monthly_report_at(
        &self,
        year: i32,
        month: u32,
        now: NaiveDateTime,
    ) -> ApiResult<MonthlyReport> {
        Self::validate_month(year, month)?;

        let report = self.engine.generate(&self.repositories, year, month, now)?;
        Ok(report)
    }

    /// 单机台月度明细（机台主数据 + 当月运转/维修/生产/支出流水）
    pub fn get_machine_monthly_detail(
        &self,
        machine_id: &str,
        year: i32,
        month: u32,
    ) -> ApiResult<MachineMonthlyDetail> {
        if machine_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("机台ID不能为空".to_string()));
        }
        let window = Self::validate_month(year, month)?;

        // 下钻视图允许查看已删除机台（历史追溯）
        let machine = self.repositories.machine_repo.get(machine_id)?;

        Ok(MachineMonthlyDetail {
            operations: self
                .operation_repo
                .list_for_machine_month(machine_id, &window)?,
            maintenance: self
                .repositories
                .maintenance_repo
                .list_for_machine_month(machine_id, &window)?,
            production: self
                .repositories
                .production_repo
                .list_for_machine_month(machine_id, &window)?,
            expenses: self
                .repositories
                .transaction_repo
                .list_machine_expenses_month(machine_id, &window)?,
            machine,
            year,
            month,
        })
    }

    // ===== 内部: 校验 =====

    fn validate_month(year: i32, month: u32) -> ApiResult<MonthWindow> {
        MonthWindow::new(year, month).ok_or_else(|| {
            ApiError::InvalidInput(format!("非法的报表月份: {}-{}", year, month))
        })
    }
}
