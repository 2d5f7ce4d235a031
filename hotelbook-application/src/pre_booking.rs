//! 预留服务
//!
//! 在正式预订之前登记一条轻量报价记录：按房型推导每晚报价
//! （固定价目表，未识别的房型使用默认报价），总价 = 报价 × 晚数。
//! 预留保存在独立的仓储中，不参与事务性实体存储。
//!
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use hotelbook_domain::entity::PreBookingId;
use hotelbook_domain::error::DomainError;
use hotelbook_domain::model::{NewPreBooking, PreBooking};
use hotelbook_domain::store::PreBookingRepository;

use crate::dto::PreBookingDetail;
use crate::error::AppError;

pub struct PreBookingService<R> {
    repository: Arc<R>,
}

impl<R> PreBookingService<R>
where
    R: PreBookingRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// 登记一条预留
    pub async fn create_pre_booking(
        &self,
        request: NewPreBooking,
    ) -> Result<PreBookingDetail, AppError> {
        info!(guest_name = %request.guest_name, "creating pre-booking");
        request.validate()?;

        let nightly_rate = nightly_rate_for(&request.room_type);
        let total_amount = nightly_rate * Decimal::from(request.number_of_nights);

        let pre_booking = PreBooking::builder()
            .guest_name(request.guest_name.trim().to_string())
            .room_type(request.room_type.trim().to_string())
            .number_of_nights(request.number_of_nights)
            .nightly_rate(nightly_rate)
            .total_amount(total_amount)
            .created_at(Utc::now())
            .build();
        let saved = self.repository.insert_pre_booking(pre_booking).await?;

        info!(pre_booking_id = saved.id(), "pre-booking created");
        Ok(PreBookingDetail::from(&saved))
    }

    /// 按标识读取预留
    pub async fn get_pre_booking(
        &self,
        id: PreBookingId,
    ) -> Result<PreBookingDetail, AppError> {
        let pre_booking = self
            .repository
            .find_pre_booking(id)
            .await?
            .ok_or_else(|| DomainError::not_found(PreBooking::KIND, id))?;
        Ok(PreBookingDetail::from(&pre_booking))
    }

    /// 所有已登记的预留
    pub async fn list_pre_bookings(&self) -> Result<Vec<PreBookingDetail>, AppError> {
        let pre_bookings = self.repository.all_pre_bookings().await?;
        Ok(pre_bookings.iter().map(PreBookingDetail::from).collect())
    }
}

/// 按房型推导每晚报价（忽略大小写与首尾空白）
///
/// 价目表是写死的业务规则；未识别的房型使用默认报价而不是报错。
fn nightly_rate_for(room_type: &str) -> Decimal {
    match room_type.trim().to_uppercase().as_str() {
        "STANDARD" => Decimal::from(1_000u32),
        "DOUBLE" => Decimal::from(1_500u32),
        "SUITE" => Decimal::from(2_500u32),
        other => {
            warn!(room_type = other, "unrecognized room type, using default rate");
            Decimal::from(1_200u32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_table() {
        assert_eq!(nightly_rate_for("STANDARD"), dec!(1000));
        assert_eq!(nightly_rate_for("  double "), dec!(1500));
        assert_eq!(nightly_rate_for("suite"), dec!(2500));
        assert_eq!(nightly_rate_for("IGLOO"), dec!(1200));
    }
}
