// ==========================================
// MonthlyReportEngine 引擎单元测试
// ==========================================
// 测试目标: 在内存假数据源上验证报表装配的口径与恒等式
// 覆盖范围: 恒等式、分摊守恒、空报表、利用率、脏数据比例
// ==========================================

mod helpers;

use chrono::{NaiveDate, Utc};
use helpers::test_data_builder::{at_midnight, status_log, MachineBuilder};
use std::collections::HashMap;
use textile_erp::domain::finance::MachineCost;
use textile_erp::domain::machine::Machine;
use textile_erp::domain::month::MonthWindow;
use textile_erp::domain::status_log::MachineStatusLog;
use textile_erp::domain::types::{CostType, MachineStatus};
use textile_erp::engine::data_source::ReportDataSource;
use textile_erp::engine::report::MonthlyReportEngine;
use textile_erp::repository::RepositoryResult;

// ==========================================
// 内存假数据源
// ==========================================

#[derive(Default)]
struct FakeDataSource {
    machines: Vec<Machine>,
    logs: Vec<MachineStatusLog>,
    revenue: HashMap<String, f64>,
    maintenance: HashMap<String, f64>,
    direct: HashMap<String, f64>,
    costs: HashMap<String, Vec<MachineCost>>,
    salaries: f64,
    shared: f64,
}

impl ReportDataSource for FakeDataSource {
    fn list_active_machines(&self) -> RepositoryResult<Vec<Machine>> {
        Ok(self.machines.clone())
    }

    fn list_status_logs_overlapping(
        &self,
        _window: &MonthWindow,
    ) -> RepositoryResult<Vec<MachineStatusLog>> {
        // 引擎自行裁剪,这里不做窗口过滤
        Ok(self.logs.clone())
    }

    fn sum_production_revenue(
        &self,
        machine_id: &str,
        _window: &MonthWindow,
    ) -> RepositoryResult<f64> {
        Ok(self.revenue.get(machine_id).copied().unwrap_or(0.0))
    }

    fn sum_maintenance_cost(
        &self,
        machine_id: &str,
        _window: &MonthWindow,
    ) -> RepositoryResult<f64> {
        Ok(self.maintenance.get(machine_id).copied().unwrap_or(0.0))
    }

    fn sum_direct_expense(
        &self,
        machine_id: &str,
        _window: &MonthWindow,
    ) -> RepositoryResult<f64> {
        Ok(self.direct.get(machine_id).copied().unwrap_or(0.0))
    }

    fn list_cost_schedule(
        &self,
        machine_id: &str,
        _window: &MonthWindow,
    ) -> RepositoryResult<Vec<MachineCost>> {
        Ok(self.costs.get(machine_id).cloned().unwrap_or_default())
    }

    fn sum_active_salaries(&self) -> RepositoryResult<f64> {
        Ok(self.salaries)
    }

    fn sum_shared_overhead(&self, _window: &MonthWindow) -> RepositoryResult<f64> {
        Ok(self.shared)
    }
}

fn cost(machine_id: &str, cost_type: CostType, category: &str, amount: f64) -> MachineCost {
    MachineCost {
        id: uuid::Uuid::new_v4().to_string(),
        machine_id: machine_id.to_string(),
        cost_type,
        category: category.to_string(),
        amount,
        billing_month: Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
        notes: None,
        created_at: Utc::now().naive_utc(),
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    }
}

/// 两机台标准场景: M1 自有整月运转, M2 股东 60% 半月运转半月维修
fn standard_scenario() -> FakeDataSource {
    let m1 = MachineBuilder::new("M1", "TX-001")
        .status(MachineStatus::Active)
        .build();
    let m2 = MachineBuilder::new("M2", "TX-002")
        .status(MachineStatus::Maintenance)
        .shareholder_owned("S1", "华泰纺织投资", 60.0)
        .build();

    let mut ds = FakeDataSource {
        machines: vec![m1, m2],
        logs: vec![
            status_log(
                "M1",
                MachineStatus::Active,
                at_midnight(2025, 6, 1),
                None,
            ),
            status_log(
                "M2",
                MachineStatus::Active,
                at_midnight(2025, 6, 1),
                Some(at_midnight(2025, 6, 16)),
            ),
            status_log(
                "M2",
                MachineStatus::Maintenance,
                at_midnight(2025, 6, 16),
                None,
            ),
        ],
        salaries: 10_000.0,
        shared: 10_000.0,
        ..Default::default()
    };
    ds.revenue.insert("M1".to_string(), 20_000.0);
    ds.revenue.insert("M2".to_string(), 15_000.0);
    ds.maintenance.insert("M2".to_string(), 2_400.0);
    ds.direct.insert("M1".to_string(), 600.0);
    ds.costs.insert(
        "M1".to_string(),
        vec![cost("M1", CostType::Fixed, "Depreciation", 1_500.0)],
    );
    ds.costs.insert(
        "M2".to_string(),
        vec![cost("M2", CostType::Variable, "Insurance", 900.0)],
    );
    ds
}

// ==========================================
// 测试用例
// ==========================================

#[test]
fn test_standard_scenario_numbers() {
    let engine = MonthlyReportEngine::new();
    let ds = standard_scenario();

    // now 在报表月份之后: 开放区间裁剪到月末
    let report = engine
        .generate(&ds, 2025, 6, at_midnight(2025, 7, 10))
        .unwrap();

    assert!(report.error.is_none());
    assert_eq!(report.report.len(), 2);
    let summary = report.summary.as_ref().unwrap();

    // 条目按机台编号排序
    let m1 = &report.report[0];
    let m2 = &report.report[1];
    assert_eq!(m1.machine_number, "TX-001");
    assert_eq!(m2.machine_number, "TX-002");

    // 运转指标
    assert!((m1.metrics.working_days - 30.0).abs() < 1e-6);
    assert!((m1.metrics.utilization - 100.0).abs() < 1e-6);
    assert!((m2.metrics.working_days - 15.0).abs() < 1e-6);
    assert!((m2.metrics.maintenance_days - 15.0).abs() < 1e-6);
    assert!((m2.metrics.utilization - 50.0).abs() < 1e-6);

    // 分摊: 共同费用 20000, 开机天数 30:15
    assert!((m1.financials.allocated_expenses - 20_000.0 * 30.0 / 45.0).abs() < 1e-6);
    assert!((m2.financials.allocated_expenses - 20_000.0 * 15.0 / 45.0).abs() < 1e-6);

    // M1: 600 直接支出 + 1500 固定成本 + 分摊
    let m1_expected_expenses = 600.0 + 1_500.0 + 20_000.0 * 30.0 / 45.0;
    assert!((m1.financials.total_expenses - m1_expected_expenses).abs() < 1e-6);
    assert!((m1.financials.net_profit - (20_000.0 - m1_expected_expenses)).abs() < 1e-6);
    // FACTORY 机台: 股东分成恒为 0
    assert_eq!(m1.financials.shareholder_share, 0.0);
    assert!((m1.financials.factory_share - m1.financials.net_profit).abs() < 1e-9);

    // M2: 2400 维修 + 900 变动成本 + 分摊, 60/40 拆分
    let m2_expected_expenses = 2_400.0 + 900.0 + 20_000.0 * 15.0 / 45.0;
    assert!((m2.financials.net_profit - (15_000.0 - m2_expected_expenses)).abs() < 1e-6);
    assert!(
        (m2.financials.factory_share - m2.financials.net_profit * 0.6).abs() < 1e-6
    );
    assert!(
        (m2.financials.shareholder_share - m2.financials.net_profit * 0.4).abs() < 1e-6
    );

    // 汇总
    assert!((summary.total_revenue - 35_000.0).abs() < 1e-6);
    assert!((summary.total_working_days - 45.0).abs() < 1e-6);
    assert_eq!(summary.active_machines_count, 1);
    assert_eq!(summary.total_days_in_month, 30);
    assert!((summary.total_salaries - 10_000.0).abs() < 1e-9);
    assert!((summary.shared_expenses - 10_000.0).abs() < 1e-9);
}

#[test]
fn test_net_profit_identity_for_every_machine() {
    let engine = MonthlyReportEngine::new();
    let ds = standard_scenario();
    let report = engine
        .generate(&ds, 2025, 6, at_midnight(2025, 7, 10))
        .unwrap();

    // 恒等式: revenue - (maintenance + direct + fixed + variable + allocated) == net_profit
    for entry in &report.report {
        let f = &entry.financials;
        let reconstructed = f.revenue
            - (f.maintenance_cost
                + f.direct_expenses
                + f.fixed_costs
                + f.variable_costs
                + f.allocated_expenses);
        assert!(
            (reconstructed - f.net_profit).abs() < 1e-9,
            "机台 {} 恒等式不成立",
            entry.machine_number
        );
        // 分成恒等式
        assert!(
            (f.factory_share + f.shareholder_share - f.net_profit).abs() < 1e-9,
            "机台 {} 分成之和不等于净利润",
            entry.machine_number
        );
    }
}

#[test]
fn test_allocation_conservation_in_report() {
    let engine = MonthlyReportEngine::new();
    let ds = standard_scenario();
    let report = engine
        .generate(&ds, 2025, 6, at_midnight(2025, 7, 10))
        .unwrap();

    let allocated: f64 = report
        .report
        .iter()
        .map(|m| m.financials.allocated_expenses)
        .sum();
    // 有开机天数时分摊总额守恒
    assert!((allocated - 20_000.0).abs() < 1e-6);
}

#[test]
fn test_zero_machines_returns_empty_marker() {
    let engine = MonthlyReportEngine::new();
    let ds = FakeDataSource::default();

    let report = engine
        .generate(&ds, 2025, 6, at_midnight(2025, 7, 1))
        .unwrap();

    assert!(report.is_empty());
    assert!(report.error.is_some());
    assert!(report.report.is_empty());
    assert!(report.summary.is_none());
    assert_eq!(report.year, 2025);
    assert_eq!(report.month, 6);
}

#[test]
fn test_machine_without_logs_has_zero_metrics() {
    let engine = MonthlyReportEngine::new();
    let mut ds = standard_scenario();
    // 追加一台无任何状态流水的机台
    ds.machines.push(
        MachineBuilder::new("M3", "TX-003")
            .status(MachineStatus::Stopped)
            .build(),
    );

    let report = engine
        .generate(&ds, 2025, 6, at_midnight(2025, 7, 10))
        .unwrap();

    let m3 = report
        .report
        .iter()
        .find(|m| m.machine_number == "TX-003")
        .unwrap();
    assert_eq!(m3.metrics.working_days, 0.0);
    assert_eq!(m3.metrics.stopped_days, 0.0);
    assert_eq!(m3.metrics.maintenance_days, 0.0);
    assert_eq!(m3.metrics.utilization, 0.0);
    // 零开机机台不承担分摊
    assert_eq!(m3.financials.allocated_expenses, 0.0);
}

#[test]
fn test_equal_split_fallback_when_no_logs_at_all() {
    let engine = MonthlyReportEngine::new();
    let m1 = MachineBuilder::new("M1", "TX-001")
        .status(MachineStatus::Active)
        .build();
    let m2 = MachineBuilder::new("M2", "TX-002")
        .status(MachineStatus::Active)
        .build();
    let ds = FakeDataSource {
        machines: vec![m1, m2],
        salaries: 1_000.0,
        shared: 0.0,
        ..Default::default()
    };

    let report = engine
        .generate(&ds, 2025, 6, at_midnight(2025, 7, 1))
        .unwrap();

    // 当月无开机记录: 两台 ACTIVE 机台均摊 500
    for entry in &report.report {
        assert!((entry.financials.allocated_expenses - 500.0).abs() < 1e-9);
    }
}

#[test]
fn test_loss_split_proportionally() {
    let engine = MonthlyReportEngine::new();
    // 股东机台 60%,只有费用没有收入 → 亏损按比例分担
    let m = MachineBuilder::new("M1", "TX-001")
        .status(MachineStatus::Active)
        .shareholder_owned("S1", "华泰纺织投资", 60.0)
        .build();
    let mut ds = FakeDataSource {
        machines: vec![m],
        logs: vec![status_log(
            "M1",
            MachineStatus::Active,
            at_midnight(2025, 6, 1),
            None,
        )],
        ..Default::default()
    };
    ds.maintenance.insert("M1".to_string(), 5_000.0);

    let report = engine
        .generate(&ds, 2025, 6, at_midnight(2025, 7, 1))
        .unwrap();
    let f = &report.report[0].financials;

    assert!(f.net_profit < 0.0);
    assert!((f.factory_share - f.net_profit * 0.6).abs() < 1e-9);
    assert!((f.shareholder_share - f.net_profit * 0.4).abs() < 1e-9);
}

#[test]
fn test_corrupted_percentage_clamped() {
    let engine = MonthlyReportEngine::new();
    // 脏数据: 比例 150（绕过写入校验直接构造）
    let m = MachineBuilder::new("M1", "TX-001")
        .status(MachineStatus::Active)
        .shareholder_owned("S1", "华泰纺织投资", 60.0)
        .raw_percentage(150.0)
        .build();
    let mut ds = FakeDataSource {
        machines: vec![m],
        logs: vec![status_log(
            "M1",
            MachineStatus::Active,
            at_midnight(2025, 6, 1),
            None,
        )],
        ..Default::default()
    };
    ds.revenue.insert("M1".to_string(), 1_000.0);

    let report = engine
        .generate(&ds, 2025, 6, at_midnight(2025, 7, 1))
        .unwrap();
    let f = &report.report[0].financials;

    // 钳制到 100%: 分成不会超出净利润幅度
    assert!((f.factory_share - f.net_profit).abs() < 1e-9);
    assert_eq!(f.shareholder_share, 0.0);
}

#[test]
fn test_invalid_month_rejected() {
    let engine = MonthlyReportEngine::new();
    let ds = standard_scenario();

    assert!(engine.generate(&ds, 2025, 13, at_midnight(2025, 7, 1)).is_err());
    assert!(engine.generate(&ds, 2025, 0, at_midnight(2025, 7, 1)).is_err());
}
