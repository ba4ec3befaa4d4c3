// ==========================================
// 纺织工厂管理系统 - 维修记录 API
// ==========================================
// 职责: 维修记录的录入、更新、查询、软删除/恢复
// 红线: 维修记录与其镜像 EXPENSE 流水同事务级联
//       （由 MaintenanceRepository 保证）
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::production::MaintenanceRecord;
use crate::domain::types::Deletable;
use crate::repository::{MachineRepository, MaintenanceRepository};
use chrono::NaiveDate;

// ==========================================
// MaintenanceApi - 维修记录 API
// ==========================================
pub struct MaintenanceApi {
    /// 维修记录仓储
    maintenance_repo: Arc<MaintenanceRepository>,
    /// 机台仓储（录入前校验机台存在且未删除）
    machine_repo: Arc<MachineRepository>,
}

impl MaintenanceApi {
    /// 创建新的 MaintenanceApi 实例
    pub fn new(
        maintenance_repo: Arc<MaintenanceRepository>,
        machine_repo: Arc<MachineRepository>,
    ) -> Self {
        Self {
            maintenance_repo,
            machine_repo,
        }
    }

    /// 录入维修记录（同事务镜像一条 EXPENSE 流水）
    pub fn record_maintenance(
        &self,
        machine_id: &str,
        maintenance_date: NaiveDate,
        maintenance_type: Option<String>,
        cost: f64,
        notes: Option<String>,
        next_due_date: Option<NaiveDate>,
    ) -> ApiResult<MaintenanceRecord> {
        if cost < 0.0 {
            return Err(ApiError::InvalidInput(format!("维修费用不能为负: {}", cost)));
        }

        let machine = self.machine_repo.get(machine_id)?;
        if !machine.is_active() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "机台已删除,不能录入维修记录: {}",
                machine.machine_number
            )));
        }

        let record = MaintenanceRecord::new(
            machine_id.to_string(),
            maintenance_date,
            maintenance_type,
            cost,
            notes,
            next_due_date,
        );
        self.maintenance_repo.insert_with_mirror(&record)?;

        tracing::info!(machine_id, cost, "维修记录录入完成（含镜像流水）");
        Ok(record)
    }

    /// 更新维修记录（同事务同步镜像流水的金额/日期/摘要）
    pub fn update_maintenance(
        &self,
        id: &str,
        maintenance_date: NaiveDate,
        maintenance_type: Option<String>,
        cost: f64,
        notes: Option<String>,
        next_due_date: Option<NaiveDate>,
    ) -> ApiResult<MaintenanceRecord> {
        if cost < 0.0 {
            return Err(ApiError::InvalidInput(format!("维修费用不能为负: {}", cost)));
        }

        let mut record = self.maintenance_repo.get(id)?;
        record.maintenance_date = maintenance_date;
        record.maintenance_type = maintenance_type;
        record.cost = cost;
        record.notes = notes;
        record.next_due_date = next_due_date;

        self.maintenance_repo.update_with_mirror(&record)?;
        Ok(record)
    }

    /// 查询全部维修记录
    pub fn list_maintenance(&self, include_deleted: bool) -> ApiResult<Vec<MaintenanceRecord>> {
        Ok(self.maintenance_repo.list(include_deleted)?)
    }

    /// 软删除维修记录（级联镜像流水）
    pub fn delete_maintenance(&self, id: &str, operator: &str) -> ApiResult<()> {
        self.maintenance_repo.soft_delete_with_mirror(id, operator)?;
        tracing::info!(maintenance_id = id, operator, "维修记录及镜像流水已软删除");
        Ok(())
    }

    /// 恢复维修记录（级联镜像流水）
    pub fn restore_maintenance(&self, id: &str) -> ApiResult<()> {
        self.maintenance_repo.restore_with_mirror(id)?;
        Ok(())
    }
}
