//! 预订生命周期服务
//!
//! 在单个工作单元内执行确认/取消迁移，并原子地应用跨实体副作用：
//! - 确认：预订状态 → CONFIRMED，住客确认计数加一，房间最近确认
//!   入住日更新为该预订的入住日；
//! - 取消：预订状态 → CANCELLED，若此前为 CONFIRMED 则住客计数
//!   减一（下限 0），房间不变。
//!
//! 三方变更按固定顺序（预订、住客、房间）暂存，随事务整体提交或
//! 整体回滚；前置条件失败发生在任何变更之前。
//!
use std::sync::Arc;

use tracing::{error, info};

use hotelbook_domain::entity::{BookingId, Entity};
use hotelbook_domain::error::{DomainError, DomainResult};
use hotelbook_domain::model::{Booking, BookingStatus, Guest, Room};
use hotelbook_domain::store::{EntityStore, UnitOfWork};

use crate::dto::BookingTransition;
use crate::error::AppError;

pub struct ReservationService<S> {
    store: Arc<S>,
}

impl<S> ReservationService<S>
where
    S: EntityStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// 确认一笔预订
    pub async fn confirm(&self, booking_id: BookingId) -> Result<BookingTransition, AppError> {
        self.do_confirm(booking_id, false).await
    }

    /// 确认变体：暂存全部变更后抛出致命错误，强制事务回滚
    ///
    /// 用于独立验证原子性契约——调用后任何变更都不可见。
    pub async fn confirm_with_simulated_failure(
        &self,
        booking_id: BookingId,
    ) -> Result<BookingTransition, AppError> {
        self.do_confirm(booking_id, true).await
    }

    /// 取消一笔预订
    pub async fn cancel(&self, booking_id: BookingId) -> Result<BookingTransition, AppError> {
        info!(booking_id, "cancelling booking");

        let transition = self
            .store
            .run_in_transaction(move |uow| {
                let mut booking = load_booking(uow, booking_id)?;
                let previous = booking.cancel()?;

                let mut guest = load_guest(uow, &booking)?;
                if previous == BookingStatus::Confirmed {
                    guest.revoke_confirmation();
                }

                // 取消不触碰房间，但结果快照需要其当前状态
                let room = load_room(uow, &booking)?;

                let transition = snapshot(&booking, previous, &guest, &room);
                uow.put_booking(booking);
                uow.put_guest(guest);
                Ok(transition)
            })
            .await?;

        info!(
            booking_id,
            previous_status = %transition.previous_status,
            new_status = %transition.new_status,
            "booking cancelled"
        );
        Ok(transition)
    }

    async fn do_confirm(
        &self,
        booking_id: BookingId,
        simulate_failure: bool,
    ) -> Result<BookingTransition, AppError> {
        info!(booking_id, simulate_failure, "confirming booking");

        let transition = self
            .store
            .run_in_transaction(move |uow| {
                let mut booking = load_booking(uow, booking_id)?;
                let previous = booking.confirm()?;

                let mut guest = load_guest(uow, &booking)?;
                guest.record_confirmation();

                let mut room = load_room(uow, &booking)?;
                room.record_confirmed_check_in(booking.check_in_date());

                let transition = snapshot(&booking, previous, &guest, &room);

                // 固定顺序暂存全部变更，再评估故障注入开关
                uow.put_booking(booking);
                uow.put_guest(guest);
                uow.put_room(room);

                if simulate_failure {
                    error!(booking_id, "raising intentional failure to force rollback");
                    return Err(DomainError::Fatal {
                        reason: format!(
                            "intentional failure after confirming booking {booking_id}"
                        ),
                    });
                }

                Ok(transition)
            })
            .await?;

        info!(
            booking_id,
            previous_status = %transition.previous_status,
            new_status = %transition.new_status,
            "booking confirmed"
        );
        Ok(transition)
    }
}

fn load_booking(uow: &impl UnitOfWork, booking_id: BookingId) -> DomainResult<Booking> {
    uow.booking(booking_id)?
        .ok_or_else(|| DomainError::not_found(Booking::KIND, booking_id))
}

fn load_guest(uow: &impl UnitOfWork, booking: &Booking) -> DomainResult<Guest> {
    uow.guest(booking.guest_id())?
        .ok_or_else(|| DomainError::not_found(Guest::KIND, booking.guest_id()))
}

fn load_room(uow: &impl UnitOfWork, booking: &Booking) -> DomainResult<Room> {
    uow.room(booking.room_id())?
        .ok_or_else(|| DomainError::not_found(Room::KIND, booking.room_id()))
}

fn snapshot(
    booking: &Booking,
    previous: BookingStatus,
    guest: &Guest,
    room: &Room,
) -> BookingTransition {
    BookingTransition {
        booking_id: booking.id(),
        previous_status: previous,
        new_status: booking.status(),
        guest_id: guest.id(),
        guest_email: guest.email().to_string(),
        guest_confirmed_bookings_count: guest.confirmed_bookings_count(),
        room_id: room.id(),
        room_code: room.code().to_string(),
        room_last_booking_date: room.last_booking_date(),
    }
}
