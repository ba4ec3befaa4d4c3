// ==========================================
// 纺织工厂管理系统 - 报表月份窗口
// ==========================================
// 职责: 把 (year, month) 展开为半开区间 [当月首日 00:00, 次月首日 00:00)
// 说明: 当月天数按日历计算（闰年 2 月为 29 天）
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// MonthWindow - 月份窗口
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthWindow {
    pub year: i32,  // 目标年份
    pub month: u32, // 目标月份（1-12）

    pub start: NaiveDateTime,         // 当月首日 00:00:00
    pub end_exclusive: NaiveDateTime, // 次月首日 00:00:00（半开上界）
    pub days_in_month: u32,           // 当月日历天数
}

impl MonthWindow {
    /// 构造月份窗口
    ///
    /// # 返回
    /// - Some(MonthWindow): 合法年月
    /// - None: 月份不在 1-12 或年份超出 chrono 可表示范围
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        let days_in_month = (next_first - first).num_days() as u32;

        Some(Self {
            year,
            month,
            start: first.and_hms_opt(0, 0, 0)?,
            end_exclusive: next_first.and_hms_opt(0, 0, 0)?,
            days_in_month,
        })
    }

    /// 当月首日
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// 次月首日（半开上界）
    pub fn next_month_first_day(&self) -> NaiveDate {
        self.end_exclusive.date()
    }

    /// 日期是否落在窗口内
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date < self.next_month_first_day()
    }
}
