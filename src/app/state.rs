// ==========================================
// 纺织工厂管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 说明: 所有 Repository 共享同一个 SQLite 连接（Arc<Mutex>）,
//       多步写入的事务边界在 Repository 内部
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{
    DashboardApi, FinanceApi, MachineApi, MaintenanceApi, ProductionApi, RegistryApi, ReportApi,
};
use crate::config::config_manager::ConfigManager;
use crate::db::{open_sqlite_connection, stamp_schema_version};
use crate::engine::repositories::ReportRepositories;
use crate::repository::{
    ClientRepository, EmployeeRepository, MachineCostRepository, MachineRepository,
    MaintenanceRepository, OperationRepository, ProductionLogRepository, ShareholderRepository,
    StatusLogRepository, TransactionRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 机台管理API
    pub machine_api: Arc<MachineApi>,

    /// 基础档案API（员工/股东/客户）
    pub registry_api: Arc<RegistryApi>,

    /// 生产记录API
    pub production_api: Arc<ProductionApi>,

    /// 维修记录API
    pub maintenance_api: Arc<MaintenanceApi>,

    /// 财务API
    pub finance_api: Arc<FinanceApi>,

    /// 报表API
    pub report_api: Arc<ReportApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享数据库连接（统一 PRAGMA）
    /// 2. 按依赖顺序初始化所有 Repository（各自 ensure_table）
    /// 3. 创建所有 API 实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        if let Err(e) = stamp_schema_version(&conn) {
            tracing::warn!("schema_version 初始化失败(将继续启动): {}", e);
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层（被引用的表先建）
        // ==========================================

        let shareholder_repo = Arc::new(
            ShareholderRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ShareholderRepository: {}", e))?,
        );
        let client_repo = Arc::new(
            ClientRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ClientRepository: {}", e))?,
        );
        let employee_repo = Arc::new(
            EmployeeRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建EmployeeRepository: {}", e))?,
        );
        let machine_repo = Arc::new(
            MachineRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建MachineRepository: {}", e))?,
        );
        let status_log_repo = Arc::new(
            StatusLogRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建StatusLogRepository: {}", e))?,
        );
        let transaction_repo = Arc::new(
            TransactionRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建TransactionRepository: {}", e))?,
        );
        let production_repo = Arc::new(
            ProductionLogRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ProductionLogRepository: {}", e))?,
        );
        let maintenance_repo = Arc::new(
            MaintenanceRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建MaintenanceRepository: {}", e))?,
        );
        let operation_repo = Arc::new(
            OperationRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建OperationRepository: {}", e))?,
        );
        let machine_cost_repo = Arc::new(
            MachineCostRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建MachineCostRepository: {}", e))?,
        );

        // ==========================================
        // 配置管理器
        // ==========================================

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 报表仓储聚合（报表引擎数据源）
        // ==========================================

        let report_repositories = ReportRepositories::new(
            machine_repo.clone(),
            status_log_repo.clone(),
            production_repo.clone(),
            maintenance_repo.clone(),
            transaction_repo.clone(),
            machine_cost_repo.clone(),
            employee_repo.clone(),
        );

        // ==========================================
        // 创建API实例
        // ==========================================

        let machine_api = Arc::new(MachineApi::new(
            machine_repo.clone(),
            status_log_repo.clone(),
            config_manager.clone(),
        ));

        let registry_api = Arc::new(RegistryApi::new(
            employee_repo.clone(),
            shareholder_repo.clone(),
            client_repo.clone(),
        ));

        let production_api = Arc::new(ProductionApi::new(
            production_repo.clone(),
            operation_repo.clone(),
            machine_repo.clone(),
        ));

        let maintenance_api = Arc::new(MaintenanceApi::new(
            maintenance_repo.clone(),
            machine_repo.clone(),
        ));

        let finance_api = Arc::new(FinanceApi::new(
            transaction_repo.clone(),
            machine_cost_repo.clone(),
        ));

        let report_api = Arc::new(ReportApi::new(
            report_repositories,
            operation_repo.clone(),
        ));

        let dashboard_api = Arc::new(DashboardApi::new(
            machine_repo,
            production_repo,
            transaction_repo,
            employee_repo,
            operation_repo,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            machine_api,
            registry_api,
            production_api,
            maintenance_api,
            finance_api,
            report_api,
            dashboard_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("TEXTILE_ERP_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 使用用户数据目录,拿不到时回退到当前目录
    let mut path = PathBuf::from("./textile_erp.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("textile-erp-dev");
        }
        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("textile-erp");
        }

        if let Err(e) = std::fs::create_dir_all(&path) {
            tracing::warn!("无法创建数据目录 {:?}: {}", path, e);
            return "./textile_erp.db".to_string();
        }
        path = path.join("textile_erp.db");
    }

    path.to_string_lossy().to_string()
}
