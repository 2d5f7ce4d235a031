//! 数据传输对象（DTO）
//!
//! 应用层的输出载体，与领域模型解耦，面向接口层序列化友好。
//!
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hotelbook_domain::concurrency::Fingerprint;
use hotelbook_domain::entity::{BookingId, Entity, GuestId, PreBookingId, RoomId};
use hotelbook_domain::model::{BookingStatus, PreBooking, Room};

/// 数据传输对象标记 trait
pub trait Dto: Serialize + Send + Sync + 'static {}

/// 一次状态迁移的结果快照
///
/// 同时反映预订、住客与房间三方在该事务内的最终状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingTransition {
    pub booking_id: BookingId,
    pub previous_status: BookingStatus,
    pub new_status: BookingStatus,
    pub guest_id: GuestId,
    pub guest_email: String,
    pub guest_confirmed_bookings_count: u32,
    pub room_id: RoomId,
    pub room_code: String,
    pub room_last_booking_date: Option<NaiveDate>,
}

impl Dto for BookingTransition {}

/// 房间详情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetail {
    pub id: RoomId,
    pub code: String,
    pub name: String,
    pub capacity: u32,
    pub base_price_per_night: Decimal,
    pub active: bool,
    pub last_booking_date: Option<NaiveDate>,
}

impl Dto for RoomDetail {}

impl From<&Room> for RoomDetail {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id(),
            code: room.code().to_string(),
            name: room.name().to_string(),
            capacity: room.capacity(),
            base_price_per_night: room.base_price_per_night(),
            active: room.active(),
            last_booking_date: room.last_booking_date(),
        }
    }
}

/// 预留详情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreBookingDetail {
    pub id: PreBookingId,
    pub guest_name: String,
    pub room_type: String,
    pub number_of_nights: u32,
    pub nightly_rate: Decimal,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Dto for PreBookingDetail {}

impl From<&PreBooking> for PreBookingDetail {
    fn from(pre_booking: &PreBooking) -> Self {
        Self {
            id: pre_booking.id(),
            guest_name: pre_booking.guest_name().to_string(),
            room_type: pre_booking.room_type().to_string(),
            number_of_nights: pre_booking.number_of_nights(),
            nightly_rate: pre_booking.nightly_rate(),
            total_amount: pre_booking.total_amount(),
            created_at: pre_booking.created_at(),
        }
    }
}

/// 条件读取的结果：未变更时省略负载传输
#[derive(Debug, Clone, PartialEq)]
pub enum RoomRead {
    /// 调用方携带的指纹与当前一致，资源未变更
    Unchanged { fingerprint: Fingerprint },
    /// 完整负载与当前指纹
    Fresh {
        room: RoomDetail,
        fingerprint: Fingerprint,
    },
}

impl RoomRead {
    pub fn fingerprint(&self) -> &Fingerprint {
        match self {
            RoomRead::Unchanged { fingerprint } => fingerprint,
            RoomRead::Fresh { fingerprint, .. } => fingerprint,
        }
    }
}

/// 排序字段；未知或缺失的字段名回落为按 id 排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Id,
    Code,
    Name,
    Capacity,
    BasePricePerNight,
    Active,
}

impl SortKey {
    pub fn parse(sort: Option<&str>) -> Self {
        let Some(sort) = sort else {
            return SortKey::Id;
        };
        match sort.trim().to_lowercase().as_str() {
            "code" => SortKey::Code,
            "name" => SortKey::Name,
            "capacity" => SortKey::Capacity,
            "price" | "basepricepernight" => SortKey::BasePricePerNight,
            "active" => SortKey::Active,
            _ => SortKey::Id,
        }
    }
}

/// 排序方向；只有（忽略大小写的）"desc" 才是降序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(direction: Option<&str>) -> Self {
        match direction {
            Some(d) if d.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// 房间分页结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPage {
    pub content: Vec<RoomDetail>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
    pub first: bool,
    pub last: bool,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl Dto for RoomPage {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_parsing_falls_back_to_id() {
        assert_eq!(SortKey::parse(None), SortKey::Id);
        assert_eq!(SortKey::parse(Some("")), SortKey::Id);
        assert_eq!(SortKey::parse(Some("unknown")), SortKey::Id);
        assert_eq!(SortKey::parse(Some("  NAME ")), SortKey::Name);
        assert_eq!(SortKey::parse(Some("price")), SortKey::BasePricePerNight);
        assert_eq!(SortKey::parse(Some("basePricePerNight")), SortKey::BasePricePerNight);
    }

    #[test]
    fn test_sort_direction_parsing() {
        assert_eq!(SortDirection::parse(None), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("DESC")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("sideways")), SortDirection::Asc);
    }
}
