// ==========================================
// 纺织工厂管理系统 - 引擎层
// ==========================================
// 职责: 实现报表计算规则,不拼 SQL
// 红线: Engine 不写库; 数据访问一律经由 ReportDataSource 契约
// ==========================================

pub mod allocation;
pub mod data_source;
pub mod finance_aggregator;
pub mod profit;
pub mod report;
pub mod repositories;
pub mod status_timeline;

// 重导出核心引擎
pub use allocation::{MachineUsage, SharedCostAllocator};
pub use data_source::ReportDataSource;
pub use finance_aggregator::{DirectFinancials, FinanceAggregator};
pub use profit::{ProfitSplit, ProfitSplitter};
pub use report::MonthlyReportEngine;
pub use repositories::ReportRepositories;
pub use status_timeline::StatusTimelineEngine;

// 月份窗口是引擎与仓储共用的值对象,从领域层透出
pub use crate::domain::month::MonthWindow;
