use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// internal precision kept on every money operation
const MONEY_DP: u32 = 8;

/// Money type in reais, carried with 8 decimal places so schedule walks don't drift
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(MONEY_DP))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money::from_decimal(Decimal::from_str(s)?))
    }

    /// create from integer amount of reais
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from centavos
    pub fn from_cents(amount: i64) -> Self {
        Money(Decimal::new(amount, 2))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// `None` when the sum leaves the representable range
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money::from_decimal)
    }

    /// `None` when the product leaves the representable range
    pub fn checked_mul(self, factor: Decimal) -> Option<Money> {
        self.0.checked_mul(factor).map(Money::from_decimal)
    }

    /// this amount expressed as a percentage of `base` (e.g. 350 of 1000 is 35)
    ///
    /// zero when `base` is zero, `None` when the ratio is too large to represent
    pub fn percentage_of(&self, base: Money) -> Option<Decimal> {
        if base.is_zero() {
            return Some(Decimal::ZERO);
        }
        self.0
            .checked_div(base.0)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.round_dp(2))
    }
}

// every operator lands back on the money precision
impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::from_decimal(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::from_decimal(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        *self = *self - other;
    }
}

/// scaling by a plain factor, e.g. a monthly rate or an installment count
impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, factor: Decimal) -> Money {
        Money::from_decimal(self.0 * factor)
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, divisor: Decimal) -> Money {
        Money::from_decimal(self.0 / divisor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + *x)
    }
}

/// rate type for interest rates and ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.12 for 12%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from whole percentage (e.g., 12 for 12%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::ONE_HUNDRED)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// monthly rate from annual rate (simple division by 12)
    pub fn monthly_rate(&self) -> Rate {
        Rate(self.0 / Decimal::from(12))
    }

    /// (1 + r)^periods, `None` once the factor overflows
    pub fn compound_factor(&self, periods: u32) -> Option<Decimal> {
        let base = Decimal::ONE.checked_add(self.0)?;
        (0..periods).try_fold(Decimal::ONE, |factor, _| factor.checked_mul(base))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("100.123456789").unwrap();
        assert_eq!(m.as_decimal(), dec!(100.12345679)); // rounded to 8 places
        assert_eq!(m.to_string(), "100.12");
    }

    #[test]
    fn test_money_from_cents() {
        assert_eq!(Money::from_cents(126_667), Money::from_str_exact("1266.67").unwrap());
    }

    #[test]
    fn test_percentage_of() {
        let payment = Money::from_major(350);
        let income = Money::from_major(1_000);
        assert_eq!(payment.percentage_of(income), Some(dec!(35)));
        assert_eq!(payment.percentage_of(Money::ZERO), Some(Decimal::ZERO));
    }

    #[test]
    fn test_out_of_range_arithmetic() {
        let huge = Money::from_decimal(dec!(10000000000000000000000000000));
        assert_eq!(huge.checked_mul(dec!(8.4)), None);
        let half_max = Money::from_decimal(dec!(50000000000000000000000000000));
        assert_eq!(half_max.checked_add(half_max), None);
        assert_eq!(
            huge.checked_mul(dec!(0.5)),
            Some(Money::from_decimal(dec!(5000000000000000000000000000)))
        );

        // very large payment against a near-zero income
        let payment = Money::from_decimal(dec!(1666666666666666666666.6666));
        let income = Money::from_decimal(dec!(0.00000001));
        assert_eq!(payment.percentage_of(income), None);
    }

    #[test]
    fn test_money_sum() {
        let amounts = vec![Money::from_major(1), Money::from_major(2), Money::from_major(3)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::from_major(6));
    }

    #[test]
    fn test_rate_conversions() {
        let rate = Rate::from_percentage(12);
        assert_eq!(rate.as_decimal(), dec!(0.12));
        assert_eq!(rate.monthly_rate().as_decimal(), dec!(0.01));
        assert_eq!(rate.to_string(), "12.00%");
    }

    #[test]
    fn test_compound_factor() {
        let monthly = Rate::from_percentage(12).monthly_rate();
        let factor = monthly.compound_factor(12).unwrap();
        // 1.01^12 = 1.126825030131969720661201
        assert!((factor - dec!(1.12682503013197)).abs() < dec!(0.0000000001));
        assert_eq!(Rate::ZERO.compound_factor(36), Some(Decimal::ONE));
        assert_eq!(Rate::from_percentage(12_000).monthly_rate().compound_factor(60), None);
    }
}
