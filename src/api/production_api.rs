// ==========================================
// 纺织工厂管理系统 - 生产记录 API
// ==========================================
// 职责: 生产记录与运转台账的录入、查询、软删除/恢复
// 红线: 生产记录创建/软删除/恢复必须与其镜像 INCOME 流水同事务级联
//       （由 ProductionLogRepository 保证）
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::production::{OperationRecord, ProductionLog};
use crate::domain::types::{Deletable, Unit};
use crate::repository::{MachineRepository, OperationRepository, ProductionLogRepository};
use chrono::NaiveDate;

// ==========================================
// ProductionApi - 生产记录 API
// ==========================================
pub struct ProductionApi {
    /// 生产记录仓储
    production_repo: Arc<ProductionLogRepository>,
    /// 运转台账仓储
    operation_repo: Arc<OperationRepository>,
    /// 机台仓储（录入前校验机台存在且未删除）
    machine_repo: Arc<MachineRepository>,
}

impl ProductionApi {
    /// 创建新的 ProductionApi 实例
    pub fn new(
        production_repo: Arc<ProductionLogRepository>,
        operation_repo: Arc<OperationRepository>,
        machine_repo: Arc<MachineRepository>,
    ) -> Self {
        Self {
            production_repo,
            operation_repo,
            machine_repo,
        }
    }

    /// 录入生产记录（同事务镜像一条 INCOME 流水）
    #[allow(clippy::too_many_arguments)]
    pub fn record_production(
        &self,
        machine_id: &str,
        client_id: Option<String>,
        product_name: &str,
        quantity: f64,
        unit: Unit,
        unit_price: f64,
        log_date: NaiveDate,
        notes: Option<String>,
    ) -> ApiResult<ProductionLog> {
        if product_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("产品名称不能为空".to_string()));
        }
        if quantity <= 0.0 {
            return Err(ApiError::InvalidInput(format!("数量必须大于 0: {}", quantity)));
        }
        if unit_price < 0.0 {
            return Err(ApiError::InvalidInput(format!("单价不能为负: {}", unit_price)));
        }
        self.ensure_machine_usable(machine_id)?;

        let log = ProductionLog::new(
            machine_id.to_string(),
            client_id,
            product_name.trim().to_string(),
            quantity,
            unit,
            unit_price,
            log_date,
            notes,
        );
        self.production_repo.insert_with_mirror(&log)?;

        tracing::info!(
            machine_id,
            total_amount = log.total_amount,
            "生产记录录入完成（含镜像流水）"
        );
        Ok(log)
    }

    /// 查询全部生产记录
    pub fn list_production(&self, include_deleted: bool) -> ApiResult<Vec<ProductionLog>> {
        Ok(self.production_repo.list(include_deleted)?)
    }

    /// 软删除生产记录（级联镜像流水）
    pub fn delete_production(&self, id: &str, operator: &str) -> ApiResult<()> {
        self.production_repo.soft_delete_with_mirror(id, operator)?;
        tracing::info!(production_id = id, operator, "生产记录及镜像流水已软删除");
        Ok(())
    }

    /// 恢复生产记录（级联镜像流水）
    pub fn restore_production(&self, id: &str) -> ApiResult<()> {
        self.production_repo.restore_with_mirror(id)?;
        Ok(())
    }

    /// 录入运转台账
    pub fn record_operation(
        &self,
        machine_id: &str,
        operation_date: NaiveDate,
        hours_worked: f64,
        notes: Option<String>,
    ) -> ApiResult<OperationRecord> {
        if !(0.0..=24.0).contains(&hours_worked) {
            return Err(ApiError::InvalidInput(format!(
                "单日工作小时必须在 0-24 之间: {}",
                hours_worked
            )));
        }
        self.ensure_machine_usable(machine_id)?;

        let record = OperationRecord::new(
            machine_id.to_string(),
            operation_date,
            hours_worked,
            notes,
        );
        self.operation_repo.insert(&record)?;
        Ok(record)
    }

    // ===== 内部: 校验 =====

    fn ensure_machine_usable(&self, machine_id: &str) -> ApiResult<()> {
        let machine = self.machine_repo.get(machine_id)?;
        if !machine.is_active() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "机台已删除,不能录入业务记录: {}",
                machine.machine_number
            )));
        }
        Ok(())
    }
}
