// ==========================================
// 纺织工厂管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入;
//       聚合查询一律过滤 is_deleted = 0
// ==========================================

pub mod employee_repo;
pub mod error;
pub mod machine_cost_repo;
pub mod machine_repo;
pub mod maintenance_repo;
pub mod operation_repo;
pub mod partner_repo;
pub mod production_repo;
pub mod status_log_repo;
pub mod transaction_repo;

// 重导出核心仓储
pub use employee_repo::EmployeeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use machine_cost_repo::MachineCostRepository;
pub use machine_repo::{MachineCountByStatus, MachineRepository};
pub use maintenance_repo::MaintenanceRepository;
pub use operation_repo::{MachineEfficiencyRow, OperationRepository};
pub use partner_repo::{ClientRepository, ShareholderRepository};
pub use production_repo::ProductionLogRepository;
pub use status_log_repo::StatusLogRepository;
pub use transaction_repo::TransactionRepository;
