// ==========================================
// 纺织工厂管理系统 - 配置层
// ==========================================
// 职责: 系统配置的存取（config_kv 表）
// ==========================================

pub mod config_manager;

// 重导出
pub use config_manager::{
    ConfigManager, FALLBACK_FACTORY_SHARE_PCT, KEY_DEFAULT_FACTORY_SHARE_PCT,
};
