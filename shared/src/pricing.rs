//! 计价模块
//!
//! 预约报价与完工结算的纯函数实现。三个费率是刻意不对称的业务规则，
//! 不得合并统一：
//! - 预约服务费按小计的 5% 四舍五入
//! - 完工抽佣按总额的 15% 四舍五入
//! - 保险是固定 RM 6，不是费率

/// 预约服务费率（5%）
pub const SERVICE_FEE_RATE: f64 = 0.05;

/// 平台完工抽佣率（15%）
pub const COMMISSION_RATE: f64 = 0.15;

/// 可选保险的固定费用（RM）
pub const INSURANCE_FLAT_FEE: f64 = 6.0;

/// 预约费用明细
///
/// 不变式：`total = subtotal + insurance_fee + service_fee`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    pub subtotal: f64,
    pub service_fee: f64,
    pub insurance_fee: f64,
    pub total: f64,
}

/// 计算预约报价。纯函数：相同输入必然产出相同明细。
pub fn quote(hourly_rate: f64, hours: u32, insurance: bool) -> PriceBreakdown {
    let subtotal = hourly_rate * hours as f64;
    let service_fee = (subtotal * SERVICE_FEE_RATE).round();
    let insurance_fee = if insurance { INSURANCE_FLAT_FEE } else { 0.0 };

    PriceBreakdown {
        subtotal,
        service_fee,
        insurance_fee,
        total: subtotal + insurance_fee + service_fee,
    }
}

/// 完工结算明细
///
/// 不变式：`net = gross - commission`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub gross: f64,
    pub commission: f64,
    pub net: f64,
}

/// 按总额计算平台抽佣与护工净收入。
pub fn settle(gross: f64) -> Settlement {
    let commission = (gross * COMMISSION_RATE).round();
    Settlement {
        gross,
        commission,
        net: gross - commission,
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_reference_values() {
        // RM20/小时 × 3 小时 + 保险
        let price = quote(20.0, 3, true);
        assert_eq!(price.subtotal, 60.0);
        assert_eq!(price.service_fee, 3.0);
        assert_eq!(price.insurance_fee, 6.0);
        assert_eq!(price.total, 69.0);
    }

    #[test]
    fn test_quote_without_insurance() {
        let price = quote(20.0, 3, false);
        assert_eq!(price.insurance_fee, 0.0);
        assert_eq!(price.total, 63.0);
    }

    #[test]
    fn test_quote_total_invariant() {
        for rate in [15.0, 22.0, 35.0, 48.0] {
            for hours in 1..=8 {
                for insurance in [false, true] {
                    let p = quote(rate, hours, insurance);
                    assert_eq!(p.total, p.subtotal + p.insurance_fee + p.service_fee);
                    assert_eq!(p.service_fee, (p.subtotal * SERVICE_FEE_RATE).round());
                }
            }
        }
    }

    #[test]
    fn test_quote_is_referentially_transparent() {
        let first = quote(27.0, 5, true);
        for _ in 0..100 {
            assert_eq!(quote(27.0, 5, true), first);
        }
    }

    #[test]
    fn test_service_fee_rounds_to_nearest() {
        // 小计 RM 30 -> 5% = 1.5 -> 四舍五入到 2
        assert_eq!(quote(30.0, 1, false).service_fee, 2.0);
        // 小计 RM 28 -> 5% = 1.4 -> 1
        assert_eq!(quote(28.0, 1, false).service_fee, 1.0);
    }

    #[test]
    fn test_settlement_reference_values() {
        let s = settle(100.0);
        assert_eq!(s.commission, 15.0);
        assert_eq!(s.net, 85.0);
    }

    #[test]
    fn test_settlement_rounding() {
        // 110 × 15% = 16.5 -> 17
        let s = settle(110.0);
        assert_eq!(s.commission, 17.0);
        assert_eq!(s.net, 93.0);
    }

    #[test]
    fn test_rates_are_intentionally_distinct() {
        // 5% 服务费与 15% 抽佣是两条独立规则
        assert!(SERVICE_FEE_RATE != COMMISSION_RATE);
    }
}
