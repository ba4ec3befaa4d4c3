// ==========================================
// 纺织工厂管理系统 - 演示库重置与造数工具
// ==========================================
// 用法: seed_demo_db [db_path]
// 行为: 备份并清空目标库,通过业务 API 造一套演示数据
//       （机台/股东/客户/员工/状态流水/生产/维修/流水/成本档案）,
//       最后打印上个月的利润分摊报表
// ==========================================

use chrono::{Datelike, Duration, Local, NaiveDate};
use std::error::Error;
use std::fs;
use std::path::Path;

use textile_erp::app::{get_default_db_path, AppState};
use textile_erp::domain::types::{CostType, MachineStatus, OwnerType, TransactionType, Unit};
use textile_erp::logging;

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    backup_and_reset_db(&db_path)?;

    let app_state = AppState::new(db_path).map_err(|e| format!("AppState 初始化失败: {}", e))?;
    seed_demo_scenario(&app_state)?;

    // 上个月的完整报表（演示数据集中在上个月）
    let today = Local::now().date_naive();
    let (year, month) = previous_month(today.year(), today.month());
    let report = app_state.report_api.get_monthly_report(year, month)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn seed_demo_scenario(app: &AppState) -> Result<(), Box<dyn Error>> {
    let today = Local::now().date_naive();
    let (year, month) = previous_month(today.year(), today.month());
    let month_first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or("非法的演示月份")?;
    let mid_month = month_first + Duration::days(14);

    // 基础档案
    let shareholder = app
        .registry_api
        .create_shareholder("华泰纺织投资", Some("13800000001".to_string()), 200_000.0)?;
    let client = app
        .registry_api
        .create_client("锦绣布业", Some("13900000002".to_string()))?;

    app.registry_api.create_employee("张伟", 6_000.0, Some(month_first - Duration::days(400)))?;
    app.registry_api.create_employee("李娜", 5_500.0, Some(month_first - Duration::days(200)))?;
    app.registry_api.create_employee("王强", 6_500.0, Some(month_first - Duration::days(90)))?;

    // 机台: 一台自有,一台股东 60/40
    let m1 = app.machine_api.create_machine(
        "TX-001",
        "剑杆织机",
        OwnerType::Factory,
        None,
        None,
        Some(month_first - Duration::days(365)),
    )?;
    let m2 = app.machine_api.create_machine(
        "TX-002",
        "喷气织机",
        OwnerType::Shareholder,
        Some(shareholder.id.clone()),
        Some(60.0),
        Some(month_first - Duration::days(180)),
    )?;

    // 状态流水: TX-001 整月运转; TX-002 前半月运转后半月维修
    let start = month_first.and_hms_opt(0, 0, 0).ok_or("非法时刻")?;
    app.machine_api
        .change_status_at(&m1.id, MachineStatus::Active, start)?;
    app.machine_api
        .change_status_at(&m2.id, MachineStatus::Active, start)?;
    app.machine_api.change_status_at(
        &m2.id,
        MachineStatus::Maintenance,
        mid_month.and_hms_opt(0, 0, 0).ok_or("非法时刻")?,
    )?;

    // 生产记录（自动镜像 INCOME 流水）
    app.production_api.record_production(
        &m1.id,
        Some(client.id.clone()),
        "涤纶坯布",
        1_200.0,
        Unit::Kg,
        18.0,
        month_first + Duration::days(9),
        None,
    )?;
    app.production_api.record_production(
        &m2.id,
        Some(client.id.clone()),
        "棉布",
        800.0,
        Unit::Kg,
        22.0,
        month_first + Duration::days(11),
        None,
    )?;

    // 运转台账（驾驶舱效率视图）
    for offset in 0..10 {
        app.production_api.record_operation(
            &m1.id,
            month_first + Duration::days(offset),
            8.0,
            None,
        )?;
    }

    // 维修记录（自动镜像 EXPENSE 流水）
    app.maintenance_api.record_maintenance(
        &m2.id,
        mid_month + Duration::days(1),
        Some("主轴更换".to_string()),
        2_400.0,
        None,
        Some(mid_month + Duration::days(90)),
    )?;

    // 人工流水: 共同费用（房租/电费,不关联机台与股东）+ 机台直接支出
    app.finance_api.record_transaction(
        TransactionType::Expense,
        "Rent",
        8_000.0,
        month_first + Duration::days(2),
        None,
        None,
        None,
        Some("厂房月租".to_string()),
    )?;
    app.finance_api.record_transaction(
        TransactionType::Expense,
        "Electricity",
        3_200.0,
        month_first + Duration::days(20),
        None,
        None,
        None,
        Some("生产用电".to_string()),
    )?;
    app.finance_api.record_transaction(
        TransactionType::Expense,
        "Parts",
        600.0,
        month_first + Duration::days(6),
        Some(m1.id.clone()),
        None,
        None,
        Some("综框配件".to_string()),
    )?;

    // 机台成本档案: 固定折旧 + 当月变动成本
    app.finance_api.add_machine_cost(
        &m1.id,
        CostType::Fixed,
        "Depreciation",
        1_500.0,
        None,
        None,
    )?;
    app.finance_api.add_machine_cost(
        &m2.id,
        CostType::Variable,
        "Insurance",
        900.0,
        Some(month_first),
        None,
    )?;

    tracing::info!(year, month, "演示数据造数完成");
    Ok(())
}
