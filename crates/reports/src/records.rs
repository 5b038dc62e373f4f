use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bistro_core::{DomainError, DomainResult, Entity, Money, RecordId};

/// Takings for one business day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySales {
    pub id: RecordId,
    pub date: NaiveDate,
    pub sales: Money,
    pub orders: i64,
}

impl DailySales {
    pub fn new(id: RecordId, date: NaiveDate, sales: Money, orders: i64) -> DomainResult<Self> {
        if sales.is_negative() || orders < 0 {
            return Err(DomainError::validation("sales and orders cannot be negative"));
        }
        Ok(Self { id, date, sales, orders })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSales {
    pub id: RecordId,
    pub name: String,
    pub orders: i64,
    pub revenue: Money,
}

/// Orders placed within one hour of the day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyOrders {
    pub id: RecordId,
    /// 0..=23
    pub hour: u8,
    pub orders: i64,
}

impl HourlyOrders {
    pub fn new(id: RecordId, hour: u8, orders: i64) -> DomainResult<Self> {
        if hour > 23 {
            return Err(DomainError::validation("hour must be between 0 and 23"));
        }
        if orders < 0 {
            return Err(DomainError::validation("orders cannot be negative"));
        }
        Ok(Self { id, hour, orders })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySales {
    pub id: RecordId,
    pub name: String,
    pub orders: i64,
}

macro_rules! impl_record_entity {
    ($($t:ty),*) => {
        $(
            impl Entity for $t {
                type Id = RecordId;

                fn id(&self) -> &Self::Id {
                    &self.id
                }
            }
        )*
    };
}

impl_record_entity!(DailySales, ItemSales, HourlyOrders, CategorySales);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_out_of_range_is_rejected() {
        assert!(HourlyOrders::new(RecordId::new(), 23, 1).is_ok());
        assert!(HourlyOrders::new(RecordId::new(), 24, 1).is_err());
    }

    #[test]
    fn negative_sales_are_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert!(DailySales::new(RecordId::new(), date, Money::from_minor(-1), 1).is_err());
        assert!(DailySales::new(RecordId::new(), date, Money::ZERO, -1).is_err());
    }
}
