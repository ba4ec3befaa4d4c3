// ==========================================
// 纺织工厂管理系统 - 共同费用分摊引擎
// ==========================================
// 职责: 把共同费用（工资 + 未归属支出）按开机天数分摊到机台
// ==========================================
// 规则:
// - 全厂开机天数 > 0: 按各机台开机天数占比分摊,
//   当月零开机的机台分摊为 0（闲置机台不为它没参与的产出买单）
// - 全厂开机天数 == 0: 退化为按"当前状态为 ACTIVE"的机台均摊,
//   非 ACTIVE 机台为 0; 除数取 max(ACTIVE 台数, 1) 防止除零
// - ACTIVE 台数也为 0 时: 所有机台分摊均为 0,
//   共同费用只体现在汇总字段中（见 DESIGN.md 决策 1）
// ==========================================

use crate::domain::types::MachineStatus;
use std::collections::HashMap;

/// 分摊输入（每台机台一行）
#[derive(Debug, Clone, PartialEq)]
pub struct MachineUsage {
    pub machine_id: String,            // 机台ID
    pub working_days: f64,             // 当月开机天数（时间线重建结果）
    pub current_status: MachineStatus, // 当前状态（退化分支用）
}

// ==========================================
// SharedCostAllocator - 共同费用分摊引擎
// ==========================================
pub struct SharedCostAllocator {
    // 无状态引擎,不需要注入依赖
}

impl SharedCostAllocator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 分摊共同费用
    ///
    /// # 参数
    /// - `usages`: 全部未删除机台的开机天数与当前状态
    /// - `total_shared`: 共同费用总额（工资 + 未归属支出）
    ///
    /// # 返回
    /// machine_id -> 分摊金额; 开机天数分支下各机台之和恒等于 total_shared
    pub fn allocate(
        &self,
        usages: &[MachineUsage],
        total_shared: f64,
    ) -> HashMap<String, f64> {
        let total_working_days: f64 = usages.iter().map(|u| u.working_days).sum();

        if total_working_days > 0.0 {
            // 1. 正常分支: 按开机天数占比
            return usages
                .iter()
                .map(|u| {
                    (
                        u.machine_id.clone(),
                        u.working_days / total_working_days * total_shared,
                    )
                })
                .collect();
        }

        // 2. 退化分支: 当月无任何开机记录,按当前 ACTIVE 机台均摊
        let active_count = usages
            .iter()
            .filter(|u| u.current_status == MachineStatus::Active)
            .count();
        let divisor = active_count.max(1) as f64;

        if active_count == 0 {
            tracing::warn!(
                total_shared,
                "当月无开机记录且无 ACTIVE 机台,共同费用不分摊到任何机台"
            );
        } else {
            tracing::debug!(
                active_count,
                "当月无开机记录,退化为按当前 ACTIVE 机台均摊"
            );
        }

        usages
            .iter()
            .map(|u| {
                let share = if u.current_status == MachineStatus::Active {
                    total_shared / divisor
                } else {
                    0.0
                };
                (u.machine_id.clone(), share)
            })
            .collect()
    }
}
