// ==========================================
// 纺织工厂管理系统 - 机台管理 API
// ==========================================
// 职责: 机台 CRUD、软删除/恢复、状态切换
// 红线: FACTORY 机台写入时归一化（分成比例=100,无股东关联）;
//       状态切换必须走 StatusLogRepository 的单事务接口
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::domain::machine::Machine;
use crate::domain::types::{MachineStatus, OwnerType};
use crate::repository::{MachineRepository, StatusLogRepository};
use chrono::{NaiveDate, NaiveDateTime};

// ==========================================
// MachineApi - 机台管理 API
// ==========================================
pub struct MachineApi {
    /// 机台仓储
    machine_repo: Arc<MachineRepository>,
    /// 状态流水仓储
    status_log_repo: Arc<StatusLogRepository>,
    /// 配置管理器（股东机台默认分成比例）
    config: Arc<ConfigManager>,
}

impl MachineApi {
    /// 创建新的 MachineApi 实例
    pub fn new(
        machine_repo: Arc<MachineRepository>,
        status_log_repo: Arc<StatusLogRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            machine_repo,
            status_log_repo,
            config,
        }
    }

    /// 新增机台
    ///
    /// FACTORY 机台忽略传入的股东与比例（归一化为 100 / NULL）;
    /// SHAREHOLDER 机台未传比例时取配置默认值
    pub fn create_machine(
        &self,
        machine_number: &str,
        machine_type: &str,
        owner_type: OwnerType,
        shareholder_id: Option<String>,
        factory_profit_percentage: Option<f64>,
        start_date: Option<NaiveDate>,
    ) -> ApiResult<Machine> {
        if machine_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("机台编号不能为空".to_string()));
        }
        Self::validate_percentage(factory_profit_percentage)?;

        let pct = match owner_type {
            OwnerType::Factory => Some(100.0),
            OwnerType::Shareholder => {
                Some(factory_profit_percentage.unwrap_or_else(|| self.config.default_factory_share_pct()))
            }
        };

        let machine = Machine::new(
            machine_number.trim().to_string(),
            machine_type.trim().to_string(),
            owner_type,
            shareholder_id,
            pct,
            start_date,
        );
        self.machine_repo.insert(&machine)?;

        tracing::info!(machine_number, %owner_type, "机台创建完成");
        Ok(machine)
    }

    /// 更新机台基础信息
    #[allow(clippy::too_many_arguments)]
    pub fn update_machine(
        &self,
        id: &str,
        machine_number: &str,
        machine_type: &str,
        owner_type: OwnerType,
        shareholder_id: Option<String>,
        status: MachineStatus,
        start_date: Option<NaiveDate>,
        factory_profit_percentage: Option<f64>,
    ) -> ApiResult<Machine> {
        if machine_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("机台编号不能为空".to_string()));
        }
        Self::validate_percentage(factory_profit_percentage)?;

        let mut machine = self.machine_repo.get(id)?;
        machine.machine_number = machine_number.trim().to_string();
        machine.machine_type = machine_type.trim().to_string();
        machine.owner_type = owner_type;
        machine.status = status;
        machine.start_date = start_date;
        match owner_type {
            OwnerType::Factory => {
                machine.shareholder_id = None;
                machine.factory_profit_percentage = 100.0;
            }
            OwnerType::Shareholder => {
                machine.shareholder_id = shareholder_id;
                machine.factory_profit_percentage = factory_profit_percentage
                    .unwrap_or_else(|| self.config.default_factory_share_pct());
            }
        }

        self.machine_repo.update(&machine)?;
        Ok(machine)
    }

    /// 查询单台机台
    pub fn get_machine(&self, id: &str) -> ApiResult<Machine> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("机台ID不能为空".to_string()));
        }
        Ok(self.machine_repo.get(id)?)
    }

    /// 查询全部机台（按机台编号排序）
    pub fn list_machines(&self, include_deleted: bool) -> ApiResult<Vec<Machine>> {
        Ok(self.machine_repo.list(include_deleted)?)
    }

    /// 软删除机台
    pub fn delete_machine(&self, id: &str, operator: &str) -> ApiResult<()> {
        self.machine_repo.soft_delete(id, operator)?;
        tracing::info!(machine_id = id, operator, "机台已软删除");
        Ok(())
    }

    /// 恢复已软删除的机台
    pub fn restore_machine(&self, id: &str) -> ApiResult<()> {
        self.machine_repo.restore(id)?;
        tracing::info!(machine_id = id, "机台已恢复");
        Ok(())
    }

    /// 状态切换（以当前时刻为切换点）
    pub fn change_status(&self, id: &str, status: MachineStatus) -> ApiResult<()> {
        self.change_status_at(id, status, chrono::Local::now().naive_local())
    }

    /// 状态切换（指定切换时刻,供数据修补与测试使用）
    ///
    /// 单事务完成: 封口旧状态区间 + 开启新区间 + 回写 machines.status
    pub fn change_status_at(
        &self,
        id: &str,
        status: MachineStatus,
        at: NaiveDateTime,
    ) -> ApiResult<()> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("机台ID不能为空".to_string()));
        }

        self.status_log_repo.record_transition(id, status, at)?;
        tracing::info!(machine_id = id, %status, %at, "机台状态切换完成");
        Ok(())
    }

    // ===== 内部: 校验 =====

    fn validate_percentage(pct: Option<f64>) -> ApiResult<()> {
        if let Some(p) = pct {
            if !(0.0..=100.0).contains(&p) {
                return Err(ApiError::InvalidInput(format!(
                    "工厂分成比例必须在 0-100 之间: {}",
                    p
                )));
            }
        }
        Ok(())
    }
}
