// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库与 AppState 初始化
// ==========================================

use std::error::Error;
use tempfile::NamedTempFile;
use textile_erp::app::AppState;

/// 创建临时测试数据库
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径非 UTF-8")?
        .to_string();
    Ok((temp_file, db_path))
}

/// 创建临时测试数据库并完成 AppState 装配
///
/// 各仓储的 ensure_table 在装配过程中完成建表
pub fn create_test_app() -> Result<(NamedTempFile, AppState), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let app_state = AppState::new(db_path)?;
    Ok((temp_file, app_state))
}
