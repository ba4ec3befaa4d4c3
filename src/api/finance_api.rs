// ==========================================
// 纺织工厂管理系统 - 财务 API
// ==========================================
// 职责: 人工流水的录入/查询/软删除,机台成本档案维护
// 红线: 镜像流水（source_id 非空）不允许在本 API 直接删除/恢复,
//       必须通过来源的生产/维修记录级联,否则两边状态会脱钩
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::finance::{LedgerEntry, MachineCost};
use crate::domain::month::MonthWindow;
use crate::domain::types::{CostType, TransactionType};
use crate::repository::{MachineCostRepository, TransactionRepository};
use chrono::{Datelike, NaiveDate};

// ==========================================
// FinanceApi - 财务 API
// ==========================================
pub struct FinanceApi {
    /// 财务流水仓储
    transaction_repo: Arc<TransactionRepository>,
    /// 机台成本档案仓储
    machine_cost_repo: Arc<MachineCostRepository>,
}

impl FinanceApi {
    /// 创建新的 FinanceApi 实例
    pub fn new(
        transaction_repo: Arc<TransactionRepository>,
        machine_cost_repo: Arc<MachineCostRepository>,
    ) -> Self {
        Self {
            transaction_repo,
            machine_cost_repo,
        }
    }

    // ==========================================
    // 财务流水
    // ==========================================

    /// 录入人工流水
    #[allow(clippy::too_many_arguments)]
    pub fn record_transaction(
        &self,
        transaction_type: TransactionType,
        category: &str,
        amount: f64,
        transaction_date: NaiveDate,
        machine_id: Option<String>,
        client_id: Option<String>,
        shareholder_id: Option<String>,
        description: Option<String>,
    ) -> ApiResult<LedgerEntry> {
        if category.trim().is_empty() {
            return Err(ApiError::InvalidInput("流水科目不能为空".to_string()));
        }
        if amount <= 0.0 {
            return Err(ApiError::InvalidInput(format!("金额必须大于 0: {}", amount)));
        }

        let entry = LedgerEntry::new(
            transaction_type,
            category.trim().to_string(),
            amount,
            transaction_date,
            machine_id,
            client_id,
            shareholder_id,
            description,
        );
        self.transaction_repo.insert(&entry)?;
        Ok(entry)
    }

    /// 查询指定月份的全部流水
    pub fn list_month_transactions(&self, year: i32, month: u32) -> ApiResult<Vec<LedgerEntry>> {
        let window = Self::month_window(year, month)?;
        Ok(self.transaction_repo.list_month(&window)?)
    }

    /// 软删除人工流水（镜像流水拒绝,见文件头红线）
    pub fn delete_transaction(&self, id: &str, operator: &str) -> ApiResult<()> {
        let entry = self.transaction_repo.get(id)?;
        if entry.source_id.is_some() {
            return Err(ApiError::BusinessRuleViolation(
                "镜像流水不能直接删除,请删除其来源的生产/维修记录".to_string(),
            ));
        }

        self.transaction_repo.soft_delete(id, operator)?;
        Ok(())
    }

    /// 恢复人工流水（镜像流水拒绝,随来源记录级联恢复）
    pub fn restore_transaction(&self, id: &str) -> ApiResult<()> {
        let entry = self.transaction_repo.get(id)?;
        if entry.source_id.is_some() {
            return Err(ApiError::BusinessRuleViolation(
                "镜像流水不能直接恢复,请恢复其来源的生产/维修记录".to_string(),
            ));
        }

        self.transaction_repo.restore(id)?;
        Ok(())
    }

    // ==========================================
    // 机台成本档案
    // ==========================================

    /// 新增成本档案
    ///
    /// VARIABLE 成本必须携带计费月份; billing_month 归一化为月首日
    pub fn add_machine_cost(
        &self,
        machine_id: &str,
        cost_type: CostType,
        category: &str,
        amount: f64,
        billing_month: Option<NaiveDate>,
        notes: Option<String>,
    ) -> ApiResult<MachineCost> {
        if category.trim().is_empty() {
            return Err(ApiError::InvalidInput("成本科目不能为空".to_string()));
        }
        if amount < 0.0 {
            return Err(ApiError::InvalidInput(format!("成本金额不能为负: {}", amount)));
        }
        if cost_type == CostType::Variable && billing_month.is_none() {
            return Err(ApiError::InvalidInput(
                "变动成本必须指定计费月份".to_string(),
            ));
        }

        let cost = MachineCost::new(
            machine_id.to_string(),
            cost_type,
            category.trim().to_string(),
            amount,
            billing_month.map(Self::normalize_to_month_first_day),
            notes,
        );
        self.machine_cost_repo.insert(&cost)?;
        Ok(cost)
    }

    /// 更新成本档案（科目/金额/计费月份/备注）
    pub fn update_machine_cost(
        &self,
        id: &str,
        category: &str,
        amount: f64,
        billing_month: Option<NaiveDate>,
        notes: Option<String>,
    ) -> ApiResult<MachineCost> {
        if category.trim().is_empty() {
            return Err(ApiError::InvalidInput("成本科目不能为空".to_string()));
        }
        if amount < 0.0 {
            return Err(ApiError::InvalidInput(format!("成本金额不能为负: {}", amount)));
        }

        let mut cost = self.machine_cost_repo.get(id)?;
        if cost.cost_type == CostType::Variable && billing_month.is_none() {
            return Err(ApiError::InvalidInput(
                "变动成本必须指定计费月份".to_string(),
            ));
        }
        cost.category = category.trim().to_string();
        cost.amount = amount;
        cost.billing_month = billing_month.map(Self::normalize_to_month_first_day);
        cost.notes = notes;

        self.machine_cost_repo.update(&cost)?;
        Ok(cost)
    }

    /// 查询机台全部成本档案
    pub fn list_machine_costs(
        &self,
        machine_id: &str,
        include_deleted: bool,
    ) -> ApiResult<Vec<MachineCost>> {
        Ok(self
            .machine_cost_repo
            .list_for_machine(machine_id, include_deleted)?)
    }

    /// 软删除成本档案
    pub fn delete_machine_cost(&self, id: &str, operator: &str) -> ApiResult<()> {
        self.machine_cost_repo.soft_delete(id, operator)?;
        Ok(())
    }

    /// 恢复已软删除的成本档案
    pub fn restore_machine_cost(&self, id: &str) -> ApiResult<()> {
        self.machine_cost_repo.restore(id)?;
        Ok(())
    }

    // ===== 内部: 辅助 =====

    fn month_window(year: i32, month: u32) -> ApiResult<MonthWindow> {
        MonthWindow::new(year, month).ok_or_else(|| {
            ApiError::InvalidInput(format!("非法的年月: {}-{}", year, month))
        })
    }

    fn normalize_to_month_first_day(date: NaiveDate) -> NaiveDate {
        NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
    }
}
