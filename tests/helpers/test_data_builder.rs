// ==========================================
// 测试数据构建器 - 用于引擎单元测试
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, Utc};
use textile_erp::domain::machine::Machine;
use textile_erp::domain::status_log::MachineStatusLog;
use textile_erp::domain::types::{MachineStatus, OwnerType};
use uuid::Uuid;

// ==========================================
// Machine 构建器
// ==========================================

pub struct MachineBuilder {
    id: String,
    machine_number: String,
    machine_type: String,
    status: MachineStatus,
    owner_type: OwnerType,
    shareholder_id: Option<String>,
    shareholder_name: Option<String>,
    factory_profit_percentage: f64,
}

impl MachineBuilder {
    pub fn new(id: &str, machine_number: &str) -> Self {
        Self {
            id: id.to_string(),
            machine_number: machine_number.to_string(),
            machine_type: "剑杆织机".to_string(),
            status: MachineStatus::Stopped,
            owner_type: OwnerType::Factory,
            shareholder_id: None,
            shareholder_name: None,
            factory_profit_percentage: 100.0,
        }
    }

    pub fn machine_type(mut self, machine_type: &str) -> Self {
        self.machine_type = machine_type.to_string();
        self
    }

    pub fn status(mut self, status: MachineStatus) -> Self {
        self.status = status;
        self
    }

    pub fn shareholder_owned(mut self, shareholder_id: &str, name: &str, pct: f64) -> Self {
        self.owner_type = OwnerType::Shareholder;
        self.shareholder_id = Some(shareholder_id.to_string());
        self.shareholder_name = Some(name.to_string());
        self.factory_profit_percentage = pct;
        self
    }

    /// 直接设置比例（用于构造越界脏数据场景）
    pub fn raw_percentage(mut self, pct: f64) -> Self {
        self.factory_profit_percentage = pct;
        self
    }

    pub fn build(self) -> Machine {
        Machine {
            id: self.id,
            machine_number: self.machine_number,
            machine_type: self.machine_type,
            status: self.status,
            start_date: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            owner_type: self.owner_type,
            shareholder_id: self.shareholder_id,
            shareholder_name: self.shareholder_name,
            factory_profit_percentage: self.factory_profit_percentage,
            created_at: Utc::now().naive_utc(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

// ==========================================
// 状态流水构建器
// ==========================================

pub fn status_log(
    machine_id: &str,
    status: MachineStatus,
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
) -> MachineStatusLog {
    MachineStatusLog {
        id: Uuid::new_v4().to_string(),
        machine_id: machine_id.to_string(),
        status,
        start_date: start,
        end_date: end,
        created_at: start,
    }
}

/// 简写: 某日 0 点
pub fn at_midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}
