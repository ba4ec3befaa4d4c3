// ==========================================
// 纺织工厂管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、软删除能力接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod finance;
pub mod machine;
pub mod month;
pub mod personnel;
pub mod production;
pub mod report;
pub mod status_log;
pub mod types;

// 重导出核心类型
pub use finance::{LedgerEntry, MachineCost};
pub use machine::Machine;
pub use month::MonthWindow;
pub use personnel::{Client, Employee, Shareholder};
pub use production::{MaintenanceRecord, OperationRecord, ProductionLog};
pub use report::{
    ActivityMetrics, CostBreakdownItem, MachineFinancials, MachineMonthlyDetail,
    MachineReportEntry, MonthlyReport, ReportSummary,
};
pub use status_log::MachineStatusLog;
pub use types::{
    CostType, Deletable, EmployeeStatus, MachineStatus, OwnerType, TransactionType, Unit,
};
