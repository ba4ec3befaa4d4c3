// ==========================================
// 驾驶舱 API 集成测试
// ==========================================
// 测试目标: 全厂概览与机台效率视图的口径
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use test_helpers::create_test_app;
use textile_erp::domain::types::{MachineStatus, OwnerType, Unit};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    date(y, m, d).and_hms_opt(0, 0, 0).unwrap()
}

#[test]
fn test_dashboard_summary() {
    let (_tmp, app) = create_test_app().unwrap();

    let m1 = app
        .machine_api
        .create_machine("TX-001", "剑杆织机", OwnerType::Factory, None, None, None)
        .unwrap();
    let m2 = app
        .machine_api
        .create_machine("TX-002", "喷气织机", OwnerType::Factory, None, None, None)
        .unwrap();
    let m3 = app
        .machine_api
        .create_machine("TX-003", "喷气织机", OwnerType::Factory, None, None, None)
        .unwrap();
    app.machine_api
        .change_status_at(&m1.id, MachineStatus::Active, at(2025, 6, 1))
        .unwrap();
    app.machine_api
        .change_status_at(&m3.id, MachineStatus::Maintenance, at(2025, 6, 1))
        .unwrap();

    // 当月收入 2000（生产）; 支出 = 维修镜像 300 + 工资 6000
    app.production_api
        .record_production(
            &m1.id,
            None,
            "涤纶坯布",
            100.0,
            Unit::Kg,
            20.0,
            date(2025, 6, 10),
            None,
        )
        .unwrap();
    app.maintenance_api
        .record_maintenance(&m3.id, date(2025, 6, 8), None, 300.0, None, None)
        .unwrap();
    app.registry_api.create_employee("张伟", 6_000.0, None).unwrap();

    let summary = app.dashboard_api.get_summary(2025, 6).unwrap();

    assert_eq!(summary.machines.total, 3);
    assert_eq!(summary.machines.active, 1);
    assert_eq!(summary.machines.stopped, 1); // m2 保持默认 STOPPED
    assert_eq!(summary.machines.maintenance, 1);
    let _ = m2;

    assert!((summary.finance.total_income - 2_000.0).abs() < 1e-9);
    assert!((summary.finance.total_expenses - 6_300.0).abs() < 1e-9);
    assert!((summary.finance.net_profit - (2_000.0 - 6_300.0)).abs() < 1e-9);
}

#[test]
fn test_machine_efficiency_view() {
    let (_tmp, app) = create_test_app().unwrap();

    let m1 = app
        .machine_api
        .create_machine("TX-001", "剑杆织机", OwnerType::Factory, None, None, None)
        .unwrap();
    let m2 = app
        .machine_api
        .create_machine("TX-002", "喷气织机", OwnerType::Factory, None, None, None)
        .unwrap();

    // m1: 两天台账共 18 小时; m2: 无台账
    app.production_api
        .record_operation(&m1.id, date(2025, 6, 3), 10.0, None)
        .unwrap();
    app.production_api
        .record_operation(&m1.id, date(2025, 6, 4), 8.0, None)
        .unwrap();
    // 7 月的台账不计入 6 月
    app.production_api
        .record_operation(&m1.id, date(2025, 7, 1), 9.0, None)
        .unwrap();

    let efficiency = app.dashboard_api.get_machine_efficiency(2025, 6).unwrap();
    assert_eq!(efficiency.len(), 2);

    let e1 = &efficiency[0];
    assert_eq!(e1.machine_number, "TX-001");
    assert!((e1.total_hours - 18.0).abs() < 1e-9);
    assert_eq!(e1.days_operated, 2);
    assert!((e1.avg_hours_per_day - 9.0).abs() < 1e-9);

    let e2 = &efficiency[1];
    assert_eq!(e2.machine_number, "TX-002");
    assert_eq!(e2.total_hours, 0.0);
    assert_eq!(e2.days_operated, 0);
    assert_eq!(e2.avg_hours_per_day, 0.0);
    let _ = m2;
}

#[test]
fn test_dashboard_rejects_invalid_month() {
    let (_tmp, app) = create_test_app().unwrap();
    assert!(app.dashboard_api.get_summary(2025, 0).is_err());
    assert!(app.dashboard_api.get_machine_efficiency(2025, 13).is_err());
}
