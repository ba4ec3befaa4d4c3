// ==========================================
// 机台状态切换流程集成测试
// ==========================================
// 测试目标: 状态切换的单事务语义
// 不变量: 同一机台最多一条开放状态区间; machines.status 与流水同步
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use test_helpers::create_test_app;
use textile_erp::domain::types::{MachineStatus, OwnerType};

fn at(y: i32, m: u32, d: u32, h: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

#[test]
fn test_transition_closes_previous_interval() {
    let (_tmp, app) = create_test_app().unwrap();
    let machine = app
        .machine_api
        .create_machine("TX-001", "剑杆织机", OwnerType::Factory, None, None, None)
        .unwrap();

    app.machine_api
        .change_status_at(&machine.id, MachineStatus::Active, at(2025, 6, 1, 0))
        .unwrap();
    app.machine_api
        .change_status_at(&machine.id, MachineStatus::Stopped, at(2025, 6, 10, 8))
        .unwrap();
    app.machine_api
        .change_status_at(&machine.id, MachineStatus::Maintenance, at(2025, 6, 20, 8))
        .unwrap();

    // 机台当前状态同步
    let current = app.machine_api.get_machine(&machine.id).unwrap();
    assert_eq!(current.status, MachineStatus::Maintenance);

    // 报表时间线与切换点一致: 9 天 8 小时运转
    let report = app
        .report_api
        .get_monthly_report_at(2025, 6, at(2025, 7, 1, 0))
        .unwrap();
    let entry = &report.report[0];
    let expected_working = 9.0 + 8.0 / 24.0;
    assert!((entry.metrics.working_days - expected_working).abs() < 1e-6);

    // 三段状态完整覆盖整月（最后一段开放,被裁剪到月末）
    let logged = entry.metrics.working_days
        + entry.metrics.stopped_days
        + entry.metrics.maintenance_days;
    assert!((logged - 30.0).abs() < 1e-6);
}

#[test]
fn test_transition_on_unknown_machine_rolls_back() {
    let (_tmp, app) = create_test_app().unwrap();

    let err = app
        .machine_api
        .change_status_at("no-such-id", MachineStatus::Active, at(2025, 6, 1, 0))
        .unwrap_err();
    assert!(err.to_string().contains("不存在"));

    // 回滚后不应留下任何孤儿流水: 报表时间线为空
    let machine = app
        .machine_api
        .create_machine("TX-001", "剑杆织机", OwnerType::Factory, None, None, None)
        .unwrap();
    let report = app
        .report_api
        .get_monthly_report_at(2025, 6, at(2025, 7, 1, 0))
        .unwrap();
    let entry = report
        .report
        .iter()
        .find(|m| m.machine_id == machine.id)
        .unwrap();
    assert_eq!(entry.metrics.working_days, 0.0);
}

#[test]
fn test_transition_on_deleted_machine_rejected() {
    let (_tmp, app) = create_test_app().unwrap();
    let machine = app
        .machine_api
        .create_machine("TX-001", "剑杆织机", OwnerType::Factory, None, None, None)
        .unwrap();
    app.machine_api.delete_machine(&machine.id, "TEST").unwrap();

    let err = app
        .machine_api
        .change_status_at(&machine.id, MachineStatus::Active, at(2025, 6, 1, 0))
        .unwrap_err();
    assert!(err.to_string().contains("不存在"));
}

#[test]
fn test_deleted_machine_excluded_from_report() {
    let (_tmp, app) = create_test_app().unwrap();
    let m1 = app
        .machine_api
        .create_machine("TX-001", "剑杆织机", OwnerType::Factory, None, None, None)
        .unwrap();
    let m2 = app
        .machine_api
        .create_machine("TX-002", "喷气织机", OwnerType::Factory, None, None, None)
        .unwrap();
    app.machine_api
        .change_status_at(&m2.id, MachineStatus::Active, at(2025, 6, 1, 0))
        .unwrap();

    app.machine_api.delete_machine(&m2.id, "TEST").unwrap();

    let report = app
        .report_api
        .get_monthly_report_at(2025, 6, at(2025, 7, 1, 0))
        .unwrap();

    // 已删除机台不出现在报表中,其状态流水也不进入时间线
    assert_eq!(report.report.len(), 1);
    assert_eq!(report.report[0].machine_id, m1.id);
    assert_eq!(report.summary.as_ref().unwrap().total_working_days, 0.0);

    // 恢复后重新进入报表
    app.machine_api.restore_machine(&m2.id).unwrap();
    let report = app
        .report_api
        .get_monthly_report_at(2025, 6, at(2025, 7, 1, 0))
        .unwrap();
    assert_eq!(report.report.len(), 2);
}

#[test]
fn test_factory_machine_normalized_on_create() {
    let (_tmp, app) = create_test_app().unwrap();
    let shareholder = app
        .registry_api
        .create_shareholder("华泰纺织投资", None, 0.0)
        .unwrap();

    // FACTORY 机台: 传入的股东与比例被归一化
    let machine = app
        .machine_api
        .create_machine(
            "TX-001",
            "剑杆织机",
            OwnerType::Factory,
            Some(shareholder.id),
            Some(30.0),
            None,
        )
        .unwrap();
    assert_eq!(machine.factory_profit_percentage, 100.0);
    assert!(machine.shareholder_id.is_none());
}

#[test]
fn test_shareholder_machine_defaults_to_configured_pct() {
    let (_tmp, app) = create_test_app().unwrap();

    // 未配置时默认 50
    let machine = app
        .machine_api
        .create_machine("TX-001", "剑杆织机", OwnerType::Shareholder, None, None, None)
        .unwrap();
    assert_eq!(machine.factory_profit_percentage, 50.0);

    // 配置后取配置值
    app.config_manager
        .set_global_config_value(
            textile_erp::config::KEY_DEFAULT_FACTORY_SHARE_PCT,
            "70",
        )
        .unwrap();
    let machine = app
        .machine_api
        .create_machine("TX-002", "剑杆织机", OwnerType::Shareholder, None, None, None)
        .unwrap();
    assert_eq!(machine.factory_profit_percentage, 70.0);
}

#[test]
fn test_percentage_out_of_range_rejected() {
    let (_tmp, app) = create_test_app().unwrap();

    let err = app
        .machine_api
        .create_machine(
            "TX-001",
            "剑杆织机",
            OwnerType::Shareholder,
            None,
            Some(120.0),
            None,
        )
        .unwrap_err();
    assert!(err.to_string().contains("0-100"));
}
