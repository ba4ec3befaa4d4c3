// ==========================================
// 纺织工厂管理系统 - 状态时间线重建引擎
// ==========================================
// 职责: 把机台状态流水重建为按状态分组的当月天数
// 输入: 与月份窗口有交集的状态流水 + 月份窗口 + 当前时刻
// 输出: machine_id -> ActivityMetrics (开机/停机/维修天数)
// ==========================================
// 规则:
// - 区间裁剪: effective_start = max(start, 窗口下界),
//             effective_end = min(end ?? now, 窗口上界)
// - 裁剪后为空或倒置的区间丢弃（整段落在窗口外）
// - 天数为小数天（秒/86400）
// - 当月无任何流水的机台不出现在结果中,由调用方取默认全零
// ==========================================

use crate::domain::month::MonthWindow;
use crate::domain::report::ActivityMetrics;
use crate::domain::status_log::MachineStatusLog;
use crate::domain::types::MachineStatus;
use chrono::NaiveDateTime;
use std::collections::HashMap;

const SECONDS_PER_DAY: f64 = 86_400.0;

// ==========================================
// StatusTimelineEngine - 状态时间线重建引擎
// ==========================================
pub struct StatusTimelineEngine {
    // 无状态引擎,不需要注入依赖
    // Repository 操作由调用方处理
}

impl StatusTimelineEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 重建当月状态时间线
    ///
    /// # 参数
    /// - `logs`: 与窗口有交集的状态流水（可包含窗口外溢出部分,由本引擎裁剪）
    /// - `window`: 月份窗口
    /// - `now`: 当前时刻（end_date 为 NULL 的区间视为持续到 now）
    ///
    /// # 返回
    /// machine_id -> ActivityMetrics
    pub fn reconstruct(
        &self,
        logs: &[MachineStatusLog],
        window: &MonthWindow,
        now: NaiveDateTime,
    ) -> HashMap<String, ActivityMetrics> {
        let mut metrics: HashMap<String, ActivityMetrics> = HashMap::new();

        for log in logs {
            // 1. 裁剪到月份窗口
            let effective_start = log.start_date.max(window.start);
            let effective_end = log.end_date.unwrap_or(now).min(window.end_exclusive);

            // 2. 丢弃空/倒置区间（整段在窗口外,或开放区间尚未开始）
            if effective_end <= effective_start {
                continue;
            }

            // 3. 按状态累加小数天
            let days =
                (effective_end - effective_start).num_seconds() as f64 / SECONDS_PER_DAY;
            let entry = metrics.entry(log.machine_id.clone()).or_default();
            match log.status {
                MachineStatus::Active => entry.working_days += days,
                MachineStatus::Stopped => entry.stopped_days += days,
                MachineStatus::Maintenance => entry.maintenance_days += days,
            }
        }

        metrics
    }

    /// 利用率（开机天数占当月日历天数的百分比）
    pub fn utilization(metrics: &ActivityMetrics, window: &MonthWindow) -> f64 {
        metrics.working_days / window.days_in_month as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn log(
        machine_id: &str,
        status: MachineStatus,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    ) -> MachineStatusLog {
        MachineStatusLog {
            id: Uuid::new_v4().to_string(),
            machine_id: machine_id.to_string(),
            status,
            start_date: start,
            end_date: end,
            created_at: start,
        }
    }

    #[test]
    fn test_full_month_single_status() {
        let engine = StatusTimelineEngine::new();
        let window = MonthWindow::new(2025, 6).unwrap();
        let logs = vec![log(
            "M1",
            MachineStatus::Active,
            dt(2025, 6, 1, 0),
            Some(dt(2025, 7, 1, 0)),
        )];

        let metrics = engine.reconstruct(&logs, &window, dt(2025, 8, 1, 0));
        let m1 = metrics.get("M1").unwrap();
        assert!((m1.working_days - 30.0).abs() < 1e-9);
        assert_eq!(m1.stopped_days, 0.0);
    }

    #[test]
    fn test_event_clipped_to_window() {
        let engine = StatusTimelineEngine::new();
        let window = MonthWindow::new(2025, 6).unwrap();
        // 5 月 20 日开始,6 月 10 日结束: 只计入 6 月的 9 天
        let logs = vec![log(
            "M1",
            MachineStatus::Stopped,
            dt(2025, 5, 20, 0),
            Some(dt(2025, 6, 10, 0)),
        )];

        let metrics = engine.reconstruct(&logs, &window, dt(2025, 8, 1, 0));
        assert!((metrics.get("M1").unwrap().stopped_days - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_open_event_runs_to_now_then_window_end() {
        let engine = StatusTimelineEngine::new();
        let window = MonthWindow::new(2025, 6).unwrap();
        let logs = vec![log("M1", MachineStatus::Active, dt(2025, 6, 16, 0), None)];

        // 月中查询: 截止到 now
        let metrics = engine.reconstruct(&logs, &window, dt(2025, 6, 21, 0));
        assert!((metrics.get("M1").unwrap().working_days - 5.0).abs() < 1e-9);

        // 月份已过: 截止到窗口上界
        let metrics = engine.reconstruct(&logs, &window, dt(2025, 9, 1, 0));
        assert!((metrics.get("M1").unwrap().working_days - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_event_outside_window_discarded() {
        let engine = StatusTimelineEngine::new();
        let window = MonthWindow::new(2025, 6).unwrap();
        let logs = vec![
            // 整段在窗口前
            log(
                "M1",
                MachineStatus::Active,
                dt(2025, 4, 1, 0),
                Some(dt(2025, 5, 1, 0)),
            ),
            // 开放区间但 now 还在窗口前（倒置,丢弃）
            log("M2", MachineStatus::Active, dt(2025, 7, 2, 0), None),
        ];

        let metrics = engine.reconstruct(&logs, &window, dt(2025, 5, 15, 0));
        assert!(metrics.is_empty());
    }

    #[test]
    fn test_mixed_statuses_bounded_by_days_in_month() {
        let engine = StatusTimelineEngine::new();
        let window = MonthWindow::new(2025, 6).unwrap();
        let logs = vec![
            log(
                "M1",
                MachineStatus::Active,
                dt(2025, 6, 1, 0),
                Some(dt(2025, 6, 11, 0)),
            ),
            log(
                "M1",
                MachineStatus::Maintenance,
                dt(2025, 6, 11, 0),
                Some(dt(2025, 6, 13, 12)),
            ),
            log("M1", MachineStatus::Stopped, dt(2025, 6, 13, 12), None),
        ];

        let metrics = engine.reconstruct(&logs, &window, dt(2025, 7, 15, 0));
        let m1 = metrics.get("M1").unwrap();
        assert!((m1.working_days - 10.0).abs() < 1e-9);
        assert!((m1.maintenance_days - 2.5).abs() < 1e-9);
        assert!((m1.stopped_days - 17.5).abs() < 1e-9);
        assert!(m1.logged_days() <= window.days_in_month as f64 + 1e-9);
    }

    #[test]
    fn test_utilization() {
        let window = MonthWindow::new(2025, 6).unwrap();
        let metrics = ActivityMetrics {
            working_days: 15.0,
            stopped_days: 0.0,
            maintenance_days: 0.0,
        };
        assert!((StatusTimelineEngine::utilization(&metrics, &window) - 50.0).abs() < 1e-9);
    }
}
