//! 房间检索（组合规约 + 排序 + 分页）与房间增删。
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use hotelbook_application::{MemoryStore, RoomService};
use hotelbook_domain::entity::Entity;
use hotelbook_domain::model::{Booking, BookingStatus, NewRoom, Room};
use hotelbook_domain::specification::RoomSearchCriteria;
use hotelbook_domain::store::EntityStore;
use hotelbook_domain::value_object::DateRange;

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn room(id: u64, code: &str, name: &str, capacity: u32, price: Decimal, active: bool) -> Room {
    Room::builder()
        .id(id)
        .code(code.to_string())
        .name(name.to_string())
        .capacity(capacity)
        .base_price_per_night(price)
        .active(active)
        .build()
}

fn seeded_service() -> (Arc<MemoryStore>, RoomService<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store
        .seed_room(room(1, "STD-101", "Standard Garden", 2, dec!(90), true))
        .unwrap();
    store
        .seed_room(room(2, "DLX-201", "Deluxe Ocean", 3, dec!(250), true))
        .unwrap();
    store
        .seed_room(room(3, "DLX-202", "deluxe garden", 4, dec!(220), true))
        .unwrap();
    store
        .seed_room(room(4, "PH-301", "Penthouse", 6, dec!(900), false))
        .unwrap();
    let service = RoomService::new(store.clone());
    (store, service)
}

fn seed_booking(store: &MemoryStore, id: u64, room_id: u64, from: &str, to: &str, status: BookingStatus) {
    store
        .seed_booking(
            Booking::builder()
                .id(id)
                .room_id(room_id)
                .guest_id(1)
                .stay(DateRange::new(d(from), d(to)).unwrap())
                .total_price(dec!(100))
                .status(status)
                .build(),
        )
        .unwrap();
}

#[tokio::test]
async fn empty_criteria_return_every_room_in_sort_order() {
    let (_store, service) = seeded_service();

    let page = service
        .search_rooms(&RoomSearchCriteria::default(), 0, 20, Some("price"), Some("desc"))
        .await
        .unwrap();

    assert_eq!(page.total_elements, 4);
    let ids: Vec<u64> = page.content.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![4, 2, 3, 1]);
}

#[tokio::test]
async fn name_filter_is_case_insensitive() {
    let (_store, service) = seeded_service();

    let criteria = RoomSearchCriteria::builder()
        .name_contains("DELUXE".to_string())
        .build();
    let page = service.search_rooms(&criteria, 0, 20, None, None).await.unwrap();

    let ids: Vec<u64> = page.content.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[tokio::test]
async fn combined_filters_are_anded() {
    let (_store, service) = seeded_service();

    let criteria = RoomSearchCriteria::builder()
        .name_contains("garden".to_string())
        .min_capacity(3)
        .min_base_price_per_night(dec!(100))
        .max_base_price_per_night(dec!(300))
        .only_active(true)
        .build();
    let page = service.search_rooms(&criteria, 0, 20, None, None).await.unwrap();

    let ids: Vec<u64> = page.content.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3]);
}

#[tokio::test]
async fn availability_excludes_rooms_with_overlapping_confirmed_bookings() {
    let (store, service) = seeded_service();
    seed_booking(&store, 1, 2, "2025-03-10", "2025-03-20", BookingStatus::Confirmed);
    seed_booking(&store, 2, 3, "2025-03-10", "2025-03-20", BookingStatus::Cancelled);

    let window = |from: &str, to: &str| {
        RoomSearchCriteria::builder()
            .available_from(d(from))
            .available_to(d(to))
            .build()
    };

    // 与 2 号房的 CONFIRMED 预订重叠：2 号被排除，被取消的预订不影响 3 号
    let page = service
        .search_rooms(&window("2025-03-15", "2025-03-25"), 0, 20, None, None)
        .await
        .unwrap();
    let ids: Vec<u64> = page.content.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);

    // 紧邻窗口不算重叠
    let page = service
        .search_rooms(&window("2025-03-20", "2025-03-25"), 0, 20, None, None)
        .await
        .unwrap();
    assert_eq!(page.total_elements, 4);

    // 零长度窗口不限制可用性
    let page = service
        .search_rooms(&window("2025-03-15", "2025-03-15"), 0, 20, None, None)
        .await
        .unwrap();
    assert_eq!(page.total_elements, 4);
}

#[tokio::test]
async fn paging_normalizes_page_and_size() {
    let (_store, service) = seeded_service();
    let criteria = RoomSearchCriteria::default();

    // 非正页大小回落为默认值 10
    let page = service.search_rooms(&criteria, 0, 0, None, None).await.unwrap();
    assert_eq!(page.size, 10);
    assert_eq!(page.content.len(), 4);

    // 负页码归零
    let page = service.search_rooms(&criteria, -3, 2, None, None).await.unwrap();
    assert_eq!(page.page, 0);
    assert_eq!(page.content.len(), 2);
    assert!(page.first);
    assert!(!page.last);

    // 越界页码收敛到最后一页
    let page = service.search_rooms(&criteria, 9, 3, None, None).await.unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.content.len(), 1);
    assert!(page.last);
}

#[tokio::test]
async fn create_room_assigns_id_and_starts_active_at_version_zero() {
    let (store, service) = seeded_service();

    let detail = service
        .create_room(
            NewRoom::builder()
                .code("  SUI-401 ".to_string())
                .name(" Suite 401 ".to_string())
                .capacity(4)
                .base_price_per_night(dec!(480))
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(detail.id, 5);
    assert_eq!(detail.code, "SUI-401");
    assert_eq!(detail.name, "Suite 401");
    assert!(detail.active);

    let room = store.find_room(detail.id).await.unwrap().unwrap();
    assert!(room.version().is_new());
}

#[tokio::test]
async fn create_room_rejects_duplicate_code_case_insensitively() {
    let (_store, service) = seeded_service();

    let err = service
        .create_room(
            NewRoom::builder()
                .code("std-101".to_string())
                .name("Clone".to_string())
                .capacity(2)
                .base_price_per_night(dec!(100))
                .build(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        hotelbook_application::error::AppError::Domain(
            hotelbook_domain::error::DomainError::InvalidValue { .. }
        )
    ));
}

// 存储层在同一把锁内兜底编码唯一性，不依赖服务层的预检查
#[tokio::test]
async fn insert_room_enforces_code_uniqueness_under_the_lock() {
    let (store, _service) = seeded_service();

    let err = store
        .insert_room(
            NewRoom::builder()
                .code("std-101".to_string())
                .name("Bypass".to_string())
                .capacity(2)
                .base_price_per_night(dec!(100))
                .build(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        hotelbook_domain::error::DomainError::InvalidValue { .. }
    ));
    assert_eq!(store.all_rooms().await.unwrap().len(), 4);
}

// 同编码的并发创建恰好一个胜出
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_with_same_code_yield_one_room() {
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(RoomService::new(store.clone()));

    let create = |service: Arc<RoomService<MemoryStore>>| async move {
        service
            .create_room(
                NewRoom::builder()
                    .code("DUP-0".to_string())
                    .name("Duplicate".to_string())
                    .capacity(2)
                    .base_price_per_night(dec!(100))
                    .build(),
            )
            .await
    };

    let left = tokio::spawn(create(service.clone()));
    let right = tokio::spawn(create(service));
    let outcomes = [left.await.unwrap(), right.await.unwrap()];

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let rooms = store.all_rooms().await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].code(), "DUP-0");
}

#[tokio::test]
async fn delete_room_removes_it_or_reports_not_found() {
    let (store, service) = seeded_service();

    service.delete_room(4).await.unwrap();
    assert!(store.find_room(4).await.unwrap().is_none());

    assert!(service.delete_room(4).await.unwrap_err().is_not_found());
}
