// ==========================================
// 纺织工厂管理系统 - 利润分成引擎
// ==========================================
// 职责: 把机台净利润按归属类型拆分为工厂分成与股东分成
// ==========================================
// 规则:
// - FACTORY 机台: 工厂拿全部净利润,股东分成恒为 0
// - SHAREHOLDER 机台: 按 factory_profit_percentage 拆分
// - 净利润为负时按同比例分担亏损,不截断为 0
// - 读取到越界比例时钳制到 [0,100] 并告警
//   （写入路径已拒绝越界值,此处为脏数据防线,见 DESIGN.md 决策 3）
// ==========================================

use crate::domain::types::OwnerType;

/// 分成结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitSplit {
    pub factory_share: f64,     // 工厂分成
    pub shareholder_share: f64, // 股东分成
}

// ==========================================
// ProfitSplitter - 利润分成引擎
// ==========================================
pub struct ProfitSplitter {
    // 无状态引擎,不需要注入依赖
}

impl ProfitSplitter {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 拆分净利润
    ///
    /// # 参数
    /// - `net_profit`: 净利润（可为负）
    /// - `owner_type`: 机台归属
    /// - `factory_pct`: 工厂分成比例（0-100,越界时钳制）
    pub fn split(&self, net_profit: f64, owner_type: OwnerType, factory_pct: f64) -> ProfitSplit {
        match owner_type {
            OwnerType::Factory => ProfitSplit {
                factory_share: net_profit,
                shareholder_share: 0.0,
            },
            OwnerType::Shareholder => {
                let pct = if !(0.0..=100.0).contains(&factory_pct) {
                    tracing::warn!(
                        factory_pct,
                        "工厂分成比例越界,已钳制到 [0,100]"
                    );
                    factory_pct.clamp(0.0, 100.0)
                } else {
                    factory_pct
                };

                ProfitSplit {
                    factory_share: net_profit * (pct / 100.0),
                    shareholder_share: net_profit * ((100.0 - pct) / 100.0),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_machine_takes_all() {
        let splitter = ProfitSplitter::new();
        let split = splitter.split(8000.0, OwnerType::Factory, 100.0);
        assert_eq!(split.factory_share, 8000.0);
        assert_eq!(split.shareholder_share, 0.0);

        // 亏损时股东分成同样为 0
        let split = splitter.split(-500.0, OwnerType::Factory, 100.0);
        assert_eq!(split.factory_share, -500.0);
        assert_eq!(split.shareholder_share, 0.0);
    }

    #[test]
    fn test_shareholder_split_identity() {
        let splitter = ProfitSplitter::new();
        let split = splitter.split(10_000.0, OwnerType::Shareholder, 60.0);
        assert!((split.factory_share - 6000.0).abs() < 1e-9);
        assert!((split.shareholder_share - 4000.0).abs() < 1e-9);
        assert!((split.factory_share + split.shareholder_share - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_profit_shared_proportionally() {
        let splitter = ProfitSplitter::new();
        let split = splitter.split(-10_000.0, OwnerType::Shareholder, 60.0);
        assert!((split.factory_share - -6000.0).abs() < 1e-9);
        assert!((split.shareholder_share - -4000.0).abs() < 1e-9);
        assert!((split.factory_share + split.shareholder_share - -10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_percentage_clamped() {
        let splitter = ProfitSplitter::new();
        // 脏数据 150% 钳制为 100%
        let split = splitter.split(1000.0, OwnerType::Shareholder, 150.0);
        assert!((split.factory_share - 1000.0).abs() < 1e-9);
        assert!((split.shareholder_share - 0.0).abs() < 1e-9);

        // 脏数据 -20% 钳制为 0%
        let split = splitter.split(1000.0, OwnerType::Shareholder, -20.0);
        assert!((split.factory_share - 0.0).abs() < 1e-9);
        assert!((split.shareholder_share - 1000.0).abs() < 1e-9);
    }
}
