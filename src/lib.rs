// ==========================================
// 纺织工厂管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 工厂经营核算与月度利润分摊
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 报表计算规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配与入口
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CostType, EmployeeStatus, MachineStatus, OwnerType, TransactionType, Unit};

// 领域实体
pub use domain::{
    Client, Employee, LedgerEntry, Machine, MachineCost, MachineStatusLog, MaintenanceRecord,
    OperationRecord, ProductionLog, Shareholder,
};

// 报表结构
pub use domain::report::{
    ActivityMetrics, CostBreakdownItem, MachineFinancials, MachineReportEntry, MonthlyReport,
    ReportSummary,
};

// 引擎
pub use engine::{
    FinanceAggregator, MonthWindow, MonthlyReportEngine, ProfitSplitter, ReportDataSource,
    ReportRepositories, SharedCostAllocator, StatusTimelineEngine,
};

// API
pub use api::{
    DashboardApi, FinanceApi, MachineApi, MaintenanceApi, ProductionApi, RegistryApi, ReportApi,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "纺织工厂管理系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";
