// ==========================================
// 纺织工厂管理系统 - 机台状态流水
// ==========================================
// 对齐: machine_status_logs 表
// 红线: 同一机台最多存在一条 end_date 为 NULL 的"当前"记录;
//       状态切换必须在单事务内"封口旧记录 + 开启新记录 + 回写机台状态"
// ==========================================

use crate::domain::types::MachineStatus;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// MachineStatusLog - 状态区间事件
// ==========================================
// 用途: 月度报表的开机/停机/维修天数全部由此表重建
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineStatusLog {
    // ===== 主键与关联 =====
    pub id: String,         // 流水唯一标识（UUID）
    pub machine_id: String, // 关联 machines（FK）

    // ===== 状态区间 =====
    pub status: MachineStatus,             // 区间内状态
    pub start_date: NaiveDateTime,         // 区间开始时刻
    pub end_date: Option<NaiveDateTime>,   // 区间结束时刻（NULL = 当前生效）

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime, // 记录创建时间
}

impl MachineStatusLog {
    /// 开启一条新的状态区间（end_date 为 NULL）
    pub fn open(machine_id: String, status: MachineStatus, start_date: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            machine_id,
            status,
            start_date,
            end_date: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// 区间是否仍在生效
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }
}
