// ==========================================
// 纺织工厂管理系统 - 主入口
// ==========================================
// 用法: textile-erp [year] [month] [db_path]
// 行为: 装配 AppState,生成指定月份（默认当月）的利润分摊报表并输出 JSON
// ==========================================

use chrono::Datelike;

use textile_erp::app::{get_default_db_path, AppState};
use textile_erp::logging;

fn main() {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", textile_erp::APP_NAME);
    tracing::info!("系统版本: {}", textile_erp::VERSION);
    tracing::info!("==================================================");

    let today = chrono::Local::now().date_naive();
    let year = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or_else(|| today.year());
    let month = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or_else(|| today.month());
    let db_path = std::env::args().nth(3).unwrap_or_else(get_default_db_path);

    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("报表月份: {}-{:02}", year, month);

    // 创建AppState
    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    };

    // 生成月度报表
    match app_state.report_api.get_monthly_report(year, month) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!("报表序列化失败: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            tracing::error!("报表生成失败: {}", e);
            std::process::exit(1);
        }
    }
}
