use std::fmt;
use std::str::FromStr;

use bon::Builder;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{BookingId, Entity, GuestId, RoomId};
use crate::error::{DomainError, DomainResult};
use crate::value_object::{DateRange, Version};

/// 预订状态
///
/// 状态机只定义两条迁移：确认（目标 CONFIRMED）与取消（目标 CANCELLED）。
/// 重复进入同一目标状态会被拒绝，而不是幂等地静默接受；确认的唯一前置
/// 条件是"当前不是 CONFIRMED"，取消同理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Created,
    Confirmed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Created => "CREATED",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CREATED" => Ok(BookingStatus::Created),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            other => Err(DomainError::InvalidValue {
                reason: format!("unknown booking status: {other}"),
            }),
        }
    }
}

/// 预订
///
/// 创建后 `room_id` 与 `guest_id` 不再变化；入住/退房日期为半开区间。
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    room_id: RoomId,
    guest_id: GuestId,
    stay: DateRange,
    total_price: Decimal,
    #[builder(default = BookingStatus::Created)]
    status: BookingStatus,
    #[builder(default)]
    version: Version,
}

impl Booking {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn guest_id(&self) -> GuestId {
        self.guest_id
    }

    pub fn stay(&self) -> DateRange {
        self.stay
    }

    pub fn check_in_date(&self) -> NaiveDate {
        self.stay.start()
    }

    pub fn check_out_date(&self) -> NaiveDate {
        self.stay.end()
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    /// 确认迁移：前置条件为当前状态不是 CONFIRMED
    ///
    /// 返回迁移前的状态，供结果快照使用。
    pub fn confirm(&mut self) -> DomainResult<BookingStatus> {
        if self.status == BookingStatus::Confirmed {
            return Err(DomainError::InvalidTransition {
                reason: format!("booking {} is already confirmed", self.id),
            });
        }
        let previous = self.status;
        self.status = BookingStatus::Confirmed;
        Ok(previous)
    }

    /// 取消迁移：前置条件为当前状态不是 CANCELLED
    ///
    /// 返回迁移前的状态，供结果快照使用。
    pub fn cancel(&mut self) -> DomainResult<BookingStatus> {
        if self.status == BookingStatus::Cancelled {
            return Err(DomainError::InvalidTransition {
                reason: format!("booking {} is already cancelled", self.id),
            });
        }
        let previous = self.status;
        self.status = BookingStatus::Cancelled;
        Ok(previous)
    }

    /// 由存储层在提交时调用，赋予新版本号
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }
}

impl Entity for Booking {
    type Id = BookingId;

    const KIND: &'static str = "booking";

    fn id(&self) -> BookingId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}
