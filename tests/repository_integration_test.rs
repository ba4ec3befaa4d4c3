// ==========================================
// 仓储层集成测试
// ==========================================
// 测试目标: 在真实 SQLite 上验证各仓储的建表、CRUD、
//           软删除过滤与报表聚合口径
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use test_helpers::create_test_db;
use textile_erp::db::open_sqlite_connection;
use textile_erp::domain::finance::{LedgerEntry, MachineCost};
use textile_erp::domain::machine::Machine;
use textile_erp::domain::month::MonthWindow;
use textile_erp::domain::personnel::Employee;
use textile_erp::domain::status_log::MachineStatusLog;
use textile_erp::domain::types::{
    CostType, EmployeeStatus, MachineStatus, OwnerType, TransactionType,
};
use textile_erp::repository::{
    ClientRepository, EmployeeRepository, MachineCostRepository, MachineRepository,
    ShareholderRepository, StatusLogRepository, TransactionRepository,
};

struct Repos {
    shareholder_repo: ShareholderRepository,
    machine_repo: MachineRepository,
    status_log_repo: StatusLogRepository,
    employee_repo: EmployeeRepository,
    transaction_repo: TransactionRepository,
    machine_cost_repo: MachineCostRepository,
}

/// 按依赖顺序在共享连接上建表（transactions 的外键需要
/// shareholders/clients/machines 先存在）
fn setup_repos(db_path: &str) -> Repos {
    let conn = Arc::new(Mutex::new(open_sqlite_connection(db_path).unwrap()));
    let shareholder_repo = ShareholderRepository::from_connection(conn.clone()).unwrap();
    let _client_repo = ClientRepository::from_connection(conn.clone()).unwrap();
    Repos {
        shareholder_repo,
        machine_repo: MachineRepository::from_connection(conn.clone()).unwrap(),
        status_log_repo: StatusLogRepository::from_connection(conn.clone()).unwrap(),
        employee_repo: EmployeeRepository::from_connection(conn.clone()).unwrap(),
        transaction_repo: TransactionRepository::from_connection(conn.clone()).unwrap(),
        machine_cost_repo: MachineCostRepository::from_connection(conn).unwrap(),
    }
}

fn machine(number: &str) -> Machine {
    Machine::new(
        number.to_string(),
        "剑杆织机".to_string(),
        OwnerType::Factory,
        None,
        None,
        None,
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_machine_crud_and_soft_delete_filter() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repos = setup_repos(&db_path);

    let m1 = machine("TX-001");
    let m2 = machine("TX-002");
    repos.machine_repo.insert(&m1).unwrap();
    repos.machine_repo.insert(&m2).unwrap();

    assert_eq!(repos.machine_repo.list(false).unwrap().len(), 2);

    repos.machine_repo.soft_delete(&m1.id, "TEST").unwrap();
    let visible = repos.machine_repo.list(false).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, m2.id);
    // include_deleted 视图仍能看到
    assert_eq!(repos.machine_repo.list(true).unwrap().len(), 2);

    // 重复删除报 NotFound
    assert!(repos.machine_repo.soft_delete(&m1.id, "TEST").is_err());

    repos.machine_repo.restore(&m1.id).unwrap();
    assert_eq!(repos.machine_repo.list(false).unwrap().len(), 2);
}

#[test]
fn test_machine_number_unique_violation() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repos = setup_repos(&db_path);

    repos.machine_repo.insert(&machine("TX-001")).unwrap();
    assert!(repos.machine_repo.insert(&machine("TX-001")).is_err());
}

#[test]
fn test_employee_salary_sum_scope() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repos = setup_repos(&db_path);

    let active = Employee::new("张伟".to_string(), 6_000.0, None);
    repos.employee_repo.insert(&active).unwrap();

    let mut inactive = Employee::new("李娜".to_string(), 9_999.0, None);
    inactive.status = EmployeeStatus::Inactive;
    repos.employee_repo.insert(&inactive).unwrap();

    let deleted = Employee::new("王强".to_string(), 8_888.0, None);
    repos.employee_repo.insert(&deleted).unwrap();
    repos.employee_repo.soft_delete(&deleted.id, "TEST").unwrap();

    // 只计在职且未删除
    let total = repos.employee_repo.sum_active_salaries().unwrap();
    assert!((total - 6_000.0).abs() < 1e-9);
}

#[test]
fn test_status_log_window_overlap_query() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repos = setup_repos(&db_path);

    let m1 = machine("TX-001");
    let m2 = machine("TX-002");
    repos.machine_repo.insert(&m1).unwrap();
    repos.machine_repo.insert(&m2).unwrap();

    let june_start = date(2025, 6, 1).and_hms_opt(0, 0, 0).unwrap();
    // 与窗口相交
    repos
        .status_log_repo
        .insert(&MachineStatusLog::open(
            m1.id.clone(),
            MachineStatus::Active,
            june_start,
        ))
        .unwrap();
    // 整段在窗口前（5 月内闭合）
    let mut closed_may = MachineStatusLog::open(
        m1.id.clone(),
        MachineStatus::Stopped,
        date(2025, 5, 1).and_hms_opt(0, 0, 0).unwrap(),
    );
    closed_may.end_date = Some(date(2025, 5, 20).and_hms_opt(0, 0, 0).unwrap());
    repos.status_log_repo.insert(&closed_may).unwrap();
    // 已删除机台的流水
    repos
        .status_log_repo
        .insert(&MachineStatusLog::open(
            m2.id.clone(),
            MachineStatus::Active,
            june_start,
        ))
        .unwrap();
    repos.machine_repo.soft_delete(&m2.id, "TEST").unwrap();

    let window = MonthWindow::new(2025, 6).unwrap();
    let logs = repos.status_log_repo.list_overlapping_window(&window).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].machine_id, m1.id);
}

#[test]
fn test_transaction_aggregation_scopes() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repos = setup_repos(&db_path);

    let m1 = machine("TX-001");
    repos.machine_repo.insert(&m1).unwrap();
    let shareholder =
        textile_erp::domain::personnel::Shareholder::new("华泰纺织投资".to_string(), None, 0.0);
    repos.shareholder_repo.insert(&shareholder).unwrap();
    let window = MonthWindow::new(2025, 6).unwrap();

    // 机台直接支出（人工录入）
    repos
        .transaction_repo
        .insert(&LedgerEntry::new(
            TransactionType::Expense,
            "Parts".to_string(),
            600.0,
            date(2025, 6, 6),
            Some(m1.id.clone()),
            None,
            None,
            None,
        ))
        .unwrap();
    // 镜像支出（带 source_id）: 不计入直接支出
    repos
        .transaction_repo
        .insert(&LedgerEntry::mirrored(
            TransactionType::Expense,
            "Maintenance".to_string(),
            2_400.0,
            date(2025, 6, 8),
            Some(m1.id.clone()),
            None,
            None,
            "source-1".to_string(),
        ))
        .unwrap();
    // 共同费用
    repos
        .transaction_repo
        .insert(&LedgerEntry::new(
            TransactionType::Expense,
            "Rent".to_string(),
            8_000.0,
            date(2025, 6, 2),
            None,
            None,
            None,
            None,
        ))
        .unwrap();
    // 股东往来: 不计入共同费用
    repos
        .transaction_repo
        .insert(&LedgerEntry::new(
            TransactionType::Expense,
            "Payout".to_string(),
            5_000.0,
            date(2025, 6, 25),
            None,
            None,
            Some(shareholder.id.clone()),
            None,
        ))
        .unwrap();
    // 别的月份: 不计入
    repos
        .transaction_repo
        .insert(&LedgerEntry::new(
            TransactionType::Expense,
            "Rent".to_string(),
            7_000.0,
            date(2025, 5, 2),
            None,
            None,
            None,
            None,
        ))
        .unwrap();

    let direct = repos
        .transaction_repo
        .sum_direct_expense(&m1.id, &window)
        .unwrap();
    assert!((direct - 600.0).abs() < 1e-9);

    let shared = repos.transaction_repo.sum_shared_overhead(&window).unwrap();
    assert!((shared - 8_000.0).abs() < 1e-9);

    // 当月 EXPENSE 总计（驾驶舱口径,含镜像与股东往来）
    let month_expense = repos
        .transaction_repo
        .sum_month_by_type(TransactionType::Expense, &window)
        .unwrap();
    assert!((month_expense - 16_000.0).abs() < 1e-9);
}

#[test]
fn test_machine_cost_applicable_scope() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repos = setup_repos(&db_path);

    let m1 = machine("TX-001");
    repos.machine_repo.insert(&m1).unwrap();
    let window = MonthWindow::new(2025, 6).unwrap();

    // 固定成本: 任何月份都计入
    repos
        .machine_cost_repo
        .insert(&MachineCost::new(
            m1.id.clone(),
            CostType::Fixed,
            "Depreciation".to_string(),
            1_500.0,
            None,
            None,
        ))
        .unwrap();
    // 当月变动成本
    repos
        .machine_cost_repo
        .insert(&MachineCost::new(
            m1.id.clone(),
            CostType::Variable,
            "Insurance".to_string(),
            900.0,
            Some(date(2025, 6, 1)),
            None,
        ))
        .unwrap();
    // 上月变动成本: 不计入
    repos
        .machine_cost_repo
        .insert(&MachineCost::new(
            m1.id.clone(),
            CostType::Variable,
            "Insurance".to_string(),
            777.0,
            Some(date(2025, 5, 1)),
            None,
        ))
        .unwrap();
    // 已删除的固定成本: 不计入
    let deleted = MachineCost::new(
        m1.id.clone(),
        CostType::Fixed,
        "Scrapped".to_string(),
        123.0,
        None,
        None,
    );
    repos.machine_cost_repo.insert(&deleted).unwrap();
    repos
        .machine_cost_repo
        .soft_delete(&deleted.id, "TEST")
        .unwrap();

    let applicable = repos
        .machine_cost_repo
        .list_applicable(&m1.id, &window)
        .unwrap();
    assert_eq!(applicable.len(), 2);
    let total: f64 = applicable.iter().map(|c| c.amount).sum();
    assert!((total - 2_400.0).abs() < 1e-9);
}
