// ==========================================
// 纺织工厂管理系统 - API 层
// ==========================================
// 职责: 业务接口封装,输入校验,错误转换
// 架构: API 层 → 引擎层 / 仓储层
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod finance_api;
pub mod machine_api;
pub mod maintenance_api;
pub mod production_api;
pub mod registry_api;
pub mod report_api;

// 重导出核心 API
pub use dashboard_api::{
    DashboardApi, DashboardSummary, FinanceSummary, MachineCountSummary, MachineEfficiency,
};
pub use error::{ApiError, ApiResult};
pub use finance_api::FinanceApi;
pub use machine_api::MachineApi;
pub use maintenance_api::MaintenanceApi;
pub use production_api::ProductionApi;
pub use registry_api::RegistryApi;
pub use report_api::ReportApi;
