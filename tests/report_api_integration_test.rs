// ==========================================
// 报表 API 端到端集成测试
// ==========================================
// 测试目标: 通过业务 API 造数,在真实 SQLite 上验证月度报表口径
// 场景: 2025-06（30 天）,两台机台,完整的收入/成本/分摊/分成链路
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use test_helpers::create_test_app;
use textile_erp::domain::types::{
    CostType, EmployeeStatus, MachineStatus, OwnerType, TransactionType, Unit,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    date(y, m, d).and_hms_opt(0, 0, 0).unwrap()
}

#[test]
fn test_full_monthly_report_flow() {
    let (_tmp, app) = create_test_app().unwrap();

    // ===== 基础档案 =====
    let shareholder = app
        .registry_api
        .create_shareholder("华泰纺织投资", None, 0.0)
        .unwrap();
    let client = app.registry_api.create_client("锦绣布业", None).unwrap();

    // 员工: 两名在职(6000+4000), 一名离职(9999), 一名在职但已删除(8888)
    app.registry_api.create_employee("张伟", 6_000.0, None).unwrap();
    app.registry_api.create_employee("李娜", 4_000.0, None).unwrap();
    let inactive = app
        .registry_api
        .create_employee("王强", 9_999.0, None)
        .unwrap();
    app.registry_api
        .update_employee(&inactive.id, "王强", 9_999.0, None, EmployeeStatus::Inactive)
        .unwrap();
    let removed = app
        .registry_api
        .create_employee("赵敏", 8_888.0, None)
        .unwrap();
    app.registry_api.delete_employee(&removed.id, "TEST").unwrap();

    // ===== 机台 =====
    let m1 = app
        .machine_api
        .create_machine("TX-001", "剑杆织机", OwnerType::Factory, None, None, None)
        .unwrap();
    let m2 = app
        .machine_api
        .create_machine(
            "TX-002",
            "喷气织机",
            OwnerType::Shareholder,
            Some(shareholder.id.clone()),
            Some(60.0),
            None,
        )
        .unwrap();

    // ===== 状态流水: M1 整月运转, M2 前半月运转后半月维修 =====
    app.machine_api
        .change_status_at(&m1.id, MachineStatus::Active, at(2025, 6, 1))
        .unwrap();
    app.machine_api
        .change_status_at(&m2.id, MachineStatus::Active, at(2025, 6, 1))
        .unwrap();
    app.machine_api
        .change_status_at(&m2.id, MachineStatus::Maintenance, at(2025, 6, 16))
        .unwrap();

    // ===== 生产记录（镜像 INCOME 流水）=====
    app.production_api
        .record_production(
            &m1.id,
            Some(client.id.clone()),
            "涤纶坯布",
            1_000.0,
            Unit::Kg,
            20.0,
            date(2025, 6, 10),
            None,
        )
        .unwrap();
    app.production_api
        .record_production(
            &m2.id,
            Some(client.id),
            "棉布",
            500.0,
            Unit::Kg,
            30.0,
            date(2025, 6, 12),
            None,
        )
        .unwrap();

    // ===== 维修记录（镜像 EXPENSE 流水）=====
    app.maintenance_api
        .record_maintenance(
            &m2.id,
            date(2025, 6, 17),
            Some("主轴更换".to_string()),
            2_400.0,
            None,
            None,
        )
        .unwrap();

    // ===== 人工流水 =====
    // 共同费用（不关联机台与股东）
    app.finance_api
        .record_transaction(
            TransactionType::Expense,
            "Rent",
            8_000.0,
            date(2025, 6, 2),
            None,
            None,
            None,
            None,
        )
        .unwrap();
    app.finance_api
        .record_transaction(
            TransactionType::Expense,
            "Electricity",
            2_000.0,
            date(2025, 6, 20),
            None,
            None,
            None,
            None,
        )
        .unwrap();
    // 股东往来支出: 关联股东 → 不进入共同费用
    app.finance_api
        .record_transaction(
            TransactionType::Expense,
            "Payout",
            5_000.0,
            date(2025, 6, 25),
            None,
            None,
            Some(shareholder.id),
            None,
        )
        .unwrap();
    // 机台直接支出
    app.finance_api
        .record_transaction(
            TransactionType::Expense,
            "Parts",
            600.0,
            date(2025, 6, 6),
            Some(m1.id.clone()),
            None,
            None,
            None,
        )
        .unwrap();

    // ===== 机台成本档案 =====
    app.finance_api
        .add_machine_cost(&m1.id, CostType::Fixed, "Depreciation", 1_500.0, None, None)
        .unwrap();
    app.finance_api
        .add_machine_cost(
            &m2.id,
            CostType::Variable,
            "Insurance",
            900.0,
            Some(date(2025, 6, 1)),
            None,
        )
        .unwrap();
    // 5 月的变动成本: 不计入 6 月报表
    app.finance_api
        .add_machine_cost(
            &m2.id,
            CostType::Variable,
            "Insurance",
            777.0,
            Some(date(2025, 5, 1)),
            None,
        )
        .unwrap();

    // ===== 生成报表 =====
    let report = app
        .report_api
        .get_monthly_report_at(2025, 6, at(2025, 7, 10))
        .unwrap();

    assert!(report.error.is_none());
    assert_eq!(report.report.len(), 2);
    let summary = report.summary.as_ref().unwrap();

    let r1 = &report.report[0];
    let r2 = &report.report[1];
    assert_eq!(r1.machine_number, "TX-001");
    assert_eq!(r2.machine_number, "TX-002");
    assert_eq!(r2.shareholder_name.as_deref(), Some("华泰纺织投资"));

    // 工资口径: 只计在职且未删除员工
    assert!((summary.total_salaries - 10_000.0).abs() < 1e-9);
    // 共同费用: 房租+电费,股东往来与镜像流水均排除
    assert!((summary.shared_expenses - 10_000.0).abs() < 1e-9);

    // 时间线: M1 整月 30 天, M2 15 运转 + 15 维修
    assert!((r1.metrics.working_days - 30.0).abs() < 1e-6);
    assert!((r2.metrics.working_days - 15.0).abs() < 1e-6);
    assert!((r2.metrics.maintenance_days - 15.0).abs() < 1e-6);
    assert!((summary.total_working_days - 45.0).abs() < 1e-6);

    // 分摊: 共同费用 20000 按 30:15
    let total_shared = 20_000.0;
    assert!((r1.financials.allocated_expenses - total_shared * 30.0 / 45.0).abs() < 1e-6);
    assert!((r2.financials.allocated_expenses - total_shared * 15.0 / 45.0).abs() < 1e-6);

    // M1 财务: 收入 20000, 直接支出 600, 固定成本 1500
    assert!((r1.financials.revenue - 20_000.0).abs() < 1e-9);
    assert!((r1.financials.direct_expenses - 600.0).abs() < 1e-9);
    assert!((r1.financials.fixed_costs - 1_500.0).abs() < 1e-9);
    assert_eq!(r1.financials.maintenance_cost, 0.0);
    assert_eq!(r1.financials.shareholder_share, 0.0);

    // M2 财务: 收入 15000, 维修 2400, 变动成本只计当月 900
    assert!((r2.financials.revenue - 15_000.0).abs() < 1e-9);
    assert!((r2.financials.maintenance_cost - 2_400.0).abs() < 1e-9);
    assert!((r2.financials.variable_costs - 900.0).abs() < 1e-9);
    assert_eq!(r2.financials.cost_breakdown.len(), 1);
    // 维修费用不在直接支出中重复计数（镜像流水被排除）
    assert_eq!(r2.financials.direct_expenses, 0.0);

    // 恒等式与 60/40 拆分
    for entry in &report.report {
        let f = &entry.financials;
        let reconstructed = f.revenue
            - (f.maintenance_cost
                + f.direct_expenses
                + f.fixed_costs
                + f.variable_costs
                + f.allocated_expenses);
        assert!((reconstructed - f.net_profit).abs() < 1e-9);
    }
    assert!((r2.financials.factory_share - r2.financials.net_profit * 0.6).abs() < 1e-6);
    assert!(
        (r2.financials.shareholder_share - r2.financials.net_profit * 0.4).abs() < 1e-6
    );

    // 汇总口径
    assert!((summary.total_revenue - 35_000.0).abs() < 1e-9);
    assert_eq!(summary.active_machines_count, 1); // M2 当前在维修
    assert_eq!(summary.total_days_in_month, 30);
    assert!(
        (summary.total_net_profit
            - (r1.financials.net_profit + r2.financials.net_profit))
            .abs()
            < 1e-9
    );
}

#[test]
fn test_empty_report_when_no_machines() {
    let (_tmp, app) = create_test_app().unwrap();

    let report = app
        .report_api
        .get_monthly_report_at(2025, 6, at(2025, 7, 1))
        .unwrap();

    assert!(report.is_empty());
    assert!(report.report.is_empty());
    assert!(report.summary.is_none());
}

#[test]
fn test_invalid_month_is_invalid_input() {
    let (_tmp, app) = create_test_app().unwrap();

    let err = app
        .report_api
        .get_monthly_report_at(2025, 13, at(2025, 7, 1))
        .unwrap_err();
    assert!(err.to_string().contains("无效输入"));
}

#[test]
fn test_machine_monthly_detail() {
    let (_tmp, app) = create_test_app().unwrap();

    let m = app
        .machine_api
        .create_machine("TX-001", "剑杆织机", OwnerType::Factory, None, None, None)
        .unwrap();
    app.production_api
        .record_production(
            &m.id,
            None,
            "涤纶坯布",
            100.0,
            Unit::Kg,
            10.0,
            date(2025, 6, 5),
            None,
        )
        .unwrap();
    app.maintenance_api
        .record_maintenance(&m.id, date(2025, 6, 8), None, 300.0, None, None)
        .unwrap();
    app.production_api
        .record_operation(&m.id, date(2025, 6, 5), 8.0, None)
        .unwrap();
    // 7 月的生产: 不出现在 6 月明细里
    app.production_api
        .record_production(
            &m.id,
            None,
            "涤纶坯布",
            50.0,
            Unit::Kg,
            10.0,
            date(2025, 7, 5),
            None,
        )
        .unwrap();

    let detail = app
        .report_api
        .get_machine_monthly_detail(&m.id, 2025, 6)
        .unwrap();

    assert_eq!(detail.machine.machine_number, "TX-001");
    assert_eq!(detail.production.len(), 1);
    assert_eq!(detail.maintenance.len(), 1);
    assert_eq!(detail.operations.len(), 1);
    // 支出流水（下钻）包含维修镜像流水
    assert_eq!(detail.expenses.len(), 1);
    assert_eq!(detail.expenses[0].category, "Maintenance");
}
