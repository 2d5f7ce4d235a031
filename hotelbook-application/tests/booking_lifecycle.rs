//! 预订生命周期的事务语义：跨实体副作用要么全部可见，要么全部不可见。
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use hotelbook_application::error::AppError;
use hotelbook_application::{MemoryStore, ReservationService};
use hotelbook_domain::entity::Entity;
use hotelbook_domain::error::DomainError;
use hotelbook_domain::model::{Booking, BookingStatus, Guest, Room};
use hotelbook_domain::store::EntityStore;
use hotelbook_domain::value_object::DateRange;

const ROOM_ID: u64 = 1;
const GUEST_ID: u64 = 9;
const BOOKING_ID: u64 = 11;

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn seeded_store(initial_status: BookingStatus) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .seed_room(
            Room::builder()
                .id(ROOM_ID)
                .code("STD-101".to_string())
                .name("Standard 101".to_string())
                .capacity(2)
                .base_price_per_night(dec!(120.50))
                .build(),
        )
        .unwrap();
    store
        .seed_guest(
            Guest::builder()
                .id(GUEST_ID)
                .first_name("Ana".to_string())
                .last_name("Torres".to_string())
                .email("ana@example.com".to_string())
                .build(),
        )
        .unwrap();
    store
        .seed_booking(
            Booking::builder()
                .id(BOOKING_ID)
                .room_id(ROOM_ID)
                .guest_id(GUEST_ID)
                .stay(DateRange::new(d("2025-03-10"), d("2025-03-20")).unwrap())
                .total_price(dec!(1205.00))
                .status(initial_status)
                .build(),
        )
        .unwrap();
    store
}

#[tokio::test]
async fn confirm_applies_all_three_changes_together() {
    let store = seeded_store(BookingStatus::Created);
    let service = ReservationService::new(store.clone());

    let transition = service.confirm(BOOKING_ID).await.unwrap();

    assert_eq!(transition.booking_id, BOOKING_ID);
    assert_eq!(transition.previous_status, BookingStatus::Created);
    assert_eq!(transition.new_status, BookingStatus::Confirmed);
    assert_eq!(transition.guest_id, GUEST_ID);
    assert_eq!(transition.guest_email, "ana@example.com");
    assert_eq!(transition.guest_confirmed_bookings_count, 1);
    assert_eq!(transition.room_id, ROOM_ID);
    assert_eq!(transition.room_code, "STD-101");
    assert_eq!(transition.room_last_booking_date, Some(d("2025-03-10")));

    // 三方变更一起提交
    let booking = store.find_booking(BOOKING_ID).await.unwrap().unwrap();
    let guest = store.find_guest(GUEST_ID).await.unwrap().unwrap();
    let room = store.find_room(ROOM_ID).await.unwrap().unwrap();
    assert_eq!(booking.status(), BookingStatus::Confirmed);
    assert_eq!(guest.confirmed_bookings_count(), 1);
    assert_eq!(room.last_booking_date(), Some(d("2025-03-10")));

    // 每个被持久化的实体版本恰好加一
    assert_eq!(booking.version().value(), 1);
    assert_eq!(guest.version().value(), 1);
    assert_eq!(room.version().value(), 1);
}

#[tokio::test]
async fn reconfirm_is_rejected_and_leaves_state_untouched() {
    let store = seeded_store(BookingStatus::Created);
    let service = ReservationService::new(store.clone());
    service.confirm(BOOKING_ID).await.unwrap();

    let booking_before = store.find_booking(BOOKING_ID).await.unwrap().unwrap();
    let guest_before = store.find_guest(GUEST_ID).await.unwrap().unwrap();
    let room_before = store.find_room(ROOM_ID).await.unwrap().unwrap();

    let err = service.confirm(BOOKING_ID).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::InvalidTransition { .. })
    ));

    assert_eq!(
        store.find_booking(BOOKING_ID).await.unwrap().unwrap(),
        booking_before
    );
    assert_eq!(store.find_guest(GUEST_ID).await.unwrap().unwrap(), guest_before);
    assert_eq!(store.find_room(ROOM_ID).await.unwrap().unwrap(), room_before);
}

#[tokio::test]
async fn simulated_failure_rolls_back_every_mutation() {
    let store = seeded_store(BookingStatus::Created);
    let service = ReservationService::new(store.clone());

    let err = service
        .confirm_with_simulated_failure(BOOKING_ID)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(DomainError::Fatal { .. })));

    // 致命错误发生在暂存之后、提交之前：任何变更都不可见
    let booking = store.find_booking(BOOKING_ID).await.unwrap().unwrap();
    let guest = store.find_guest(GUEST_ID).await.unwrap().unwrap();
    let room = store.find_room(ROOM_ID).await.unwrap().unwrap();
    assert_eq!(booking.status(), BookingStatus::Created);
    assert_eq!(guest.confirmed_bookings_count(), 0);
    assert_eq!(room.last_booking_date(), None);
    assert_eq!(booking.version().value(), 0);
    assert_eq!(guest.version().value(), 0);
    assert_eq!(room.version().value(), 0);

    // 回滚后同一笔预订仍可正常确认
    let transition = service.confirm(BOOKING_ID).await.unwrap();
    assert_eq!(transition.new_status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn cancel_confirmed_booking_decrements_counter() {
    let store = seeded_store(BookingStatus::Created);
    let service = ReservationService::new(store.clone());
    service.confirm(BOOKING_ID).await.unwrap();

    let transition = service.cancel(BOOKING_ID).await.unwrap();

    assert_eq!(transition.previous_status, BookingStatus::Confirmed);
    assert_eq!(transition.new_status, BookingStatus::Cancelled);
    assert_eq!(transition.guest_confirmed_bookings_count, 0);

    let guest = store.find_guest(GUEST_ID).await.unwrap().unwrap();
    assert_eq!(guest.confirmed_bookings_count(), 0);

    // 取消不触碰房间：最近确认入住日保持确认时的值，版本不变
    let room = store.find_room(ROOM_ID).await.unwrap().unwrap();
    assert_eq!(room.last_booking_date(), Some(d("2025-03-10")));
    assert_eq!(room.version().value(), 1);
}

#[tokio::test]
async fn cancel_created_booking_leaves_counter_alone() {
    let store = seeded_store(BookingStatus::Created);
    let service = ReservationService::new(store.clone());

    let transition = service.cancel(BOOKING_ID).await.unwrap();

    assert_eq!(transition.previous_status, BookingStatus::Created);
    assert_eq!(transition.new_status, BookingStatus::Cancelled);
    assert_eq!(transition.guest_confirmed_bookings_count, 0);
}

// 数据漂移场景：预订已是 CONFIRMED 而计数为 0，取消后计数不产生负数
#[tokio::test]
async fn cancel_with_zero_counter_stays_at_zero() {
    let store = seeded_store(BookingStatus::Confirmed);
    let service = ReservationService::new(store.clone());

    let transition = service.cancel(BOOKING_ID).await.unwrap();

    assert_eq!(transition.previous_status, BookingStatus::Confirmed);
    assert_eq!(transition.guest_confirmed_bookings_count, 0);
    let guest = store.find_guest(GUEST_ID).await.unwrap().unwrap();
    assert_eq!(guest.confirmed_bookings_count(), 0);
}

#[tokio::test]
async fn recancel_is_rejected() {
    let store = seeded_store(BookingStatus::Cancelled);
    let service = ReservationService::new(store);

    let err = service.cancel(BOOKING_ID).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn missing_booking_is_not_found() {
    let store = seeded_store(BookingStatus::Created);
    let service = ReservationService::new(store);

    let err = service.confirm(4040).await.unwrap_err();
    assert!(err.is_not_found());

    let err = service.cancel(4040).await.unwrap_err();
    assert!(err.is_not_found());
}

// 对入住日更早的预订做确认，缓存被无条件覆盖：该字段不是最大值，是最近确认值
#[tokio::test]
async fn last_booking_date_reflects_last_confirmed_not_maximum() {
    let store = seeded_store(BookingStatus::Created);
    store
        .seed_booking(
            Booking::builder()
                .id(12)
                .room_id(ROOM_ID)
                .guest_id(GUEST_ID)
                .stay(DateRange::new(d("2025-02-01"), d("2025-02-05")).unwrap())
                .total_price(dec!(480.00))
                .build(),
        )
        .unwrap();
    let service = ReservationService::new(store.clone());

    service.confirm(BOOKING_ID).await.unwrap();
    service.confirm(12).await.unwrap();

    let room = store.find_room(ROOM_ID).await.unwrap().unwrap();
    assert_eq!(room.last_booking_date(), Some(d("2025-02-01")));
}
