use bon::Builder;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::PreBookingId;
use crate::error::{DomainError, DomainResult};

/// 预留可接受的最大晚数
pub const MAX_PRE_BOOKING_NIGHTS: u32 = 30;

/// 预留（pre-booking）
///
/// 正式预订之前的轻量报价记录：按房型推导每晚报价，总价 = 报价 × 晚数。
/// 不参与状态机与乐观并发控制，也不关联既有的房间与住客。
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreBooking {
    /// 由仓储分配；0 表示尚未保存
    #[builder(default)]
    id: PreBookingId,
    guest_name: String,
    room_type: String,
    number_of_nights: u32,
    nightly_rate: Decimal,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
}

impl PreBooking {
    pub const KIND: &'static str = "pre-booking";

    pub fn id(&self) -> PreBookingId {
        self.id
    }

    pub fn guest_name(&self) -> &str {
        &self.guest_name
    }

    pub fn room_type(&self) -> &str {
        &self.room_type
    }

    pub fn number_of_nights(&self) -> u32 {
        self.number_of_nights
    }

    pub fn nightly_rate(&self) -> Decimal {
        self.nightly_rate
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 由仓储在保存时调用，赋予标识
    pub fn with_id(mut self, id: PreBookingId) -> Self {
        self.id = id;
        self
    }
}

/// 新建预留的输入
///
/// 住客名与房型在校验时裁剪首尾空白。
#[derive(Builder, Debug, Clone, Serialize, Deserialize)]
pub struct NewPreBooking {
    pub guest_name: String,
    pub room_type: String,
    pub number_of_nights: u32,
}

impl NewPreBooking {
    pub fn validate(&self) -> DomainResult<()> {
        let guest_name = self.guest_name.trim();
        if !(3..=100).contains(&guest_name.chars().count()) {
            return Err(DomainError::InvalidValue {
                reason: "guest name must be between 3 and 100 characters".to_string(),
            });
        }

        let room_type = self.room_type.trim();
        if !(3..=50).contains(&room_type.chars().count()) {
            return Err(DomainError::InvalidValue {
                reason: "room type must be between 3 and 50 characters".to_string(),
            });
        }

        if self.number_of_nights < 1 {
            return Err(DomainError::InvalidValue {
                reason: "number of nights must be at least 1".to_string(),
            });
        }
        if self.number_of_nights > MAX_PRE_BOOKING_NIGHTS {
            return Err(DomainError::InvalidValue {
                reason: format!(
                    "pre-bookings longer than {MAX_PRE_BOOKING_NIGHTS} nights are not allowed"
                ),
            });
        }
        Ok(())
    }
}
