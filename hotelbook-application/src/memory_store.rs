//! `EntityStore` 与 `PreBookingRepository` 的内存实现
//!
//! 整个状态置于单把互斥锁之下：事务在持锁期间于状态快照上执行，
//! 闭包返回 Ok 后按"比较版本后递增"协议逐实体提交，任何一处版本
//! 不匹配都会以 `Conflict` 拒绝整个提交。持锁执行天然满足
//! 单写者契约——同一版本值至多有一个胜出的写入者。
//!
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use hotelbook_domain::concurrency::Fingerprint;
use hotelbook_domain::entity::{BookingId, Entity, GuestId, PreBookingId, RoomId};
use hotelbook_domain::error::{DomainError, DomainResult};
use hotelbook_domain::model::{Booking, Guest, NewRoom, PreBooking, Room};
use hotelbook_domain::specification::RoomSearchCriteria;
use hotelbook_domain::store::{EntityStore, PreBookingRepository, UnitOfWork};

#[derive(Debug, Clone, Default)]
struct State {
    rooms: BTreeMap<RoomId, Room>,
    guests: BTreeMap<GuestId, Guest>,
    bookings: BTreeMap<BookingId, Booking>,
    last_room_id: RoomId,
}

/// 内存实体存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> DomainResult<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| DomainError::Repository {
            reason: "store mutex poisoned".to_string(),
        })
    }

    /// 预置一间房（测试与外部创建路径用）
    pub fn seed_room(&self, room: Room) -> DomainResult<()> {
        let mut state = self.locked()?;
        state.last_room_id = state.last_room_id.max(room.id());
        state.rooms.insert(room.id(), room);
        Ok(())
    }

    /// 预置一位住客
    pub fn seed_guest(&self, guest: Guest) -> DomainResult<()> {
        let mut state = self.locked()?;
        state.guests.insert(guest.id(), guest);
        Ok(())
    }

    /// 预置一笔预订（预订的创建属于外部协作方）
    pub fn seed_booking(&self, booking: Booking) -> DomainResult<()> {
        let mut state = self.locked()?;
        state.bookings.insert(booking.id(), booking);
        Ok(())
    }
}

/// 内存工作单元：读取优先命中本事务内的暂存写入
pub struct MemoryUnitOfWork {
    snapshot: State,
    staged_bookings: BTreeMap<BookingId, Booking>,
    staged_guests: BTreeMap<GuestId, Guest>,
    staged_rooms: BTreeMap<RoomId, Room>,
}

impl MemoryUnitOfWork {
    fn from_snapshot(snapshot: State) -> Self {
        Self {
            snapshot,
            staged_bookings: BTreeMap::new(),
            staged_guests: BTreeMap::new(),
            staged_rooms: BTreeMap::new(),
        }
    }

    /// 比较版本后递增：先校验全部暂存实体，再统一落盘
    fn commit(self, state: &mut State) -> DomainResult<()> {
        for (id, booking) in &self.staged_bookings {
            if let Some(current) = state.bookings.get(id) {
                if current.version() != booking.version() {
                    return Err(DomainError::Conflict {
                        current: Fingerprint::new(Booking::KIND, *id, current.version()),
                    });
                }
            }
        }
        for (id, guest) in &self.staged_guests {
            if let Some(current) = state.guests.get(id) {
                if current.version() != guest.version() {
                    return Err(DomainError::Conflict {
                        current: Fingerprint::new(Guest::KIND, *id, current.version()),
                    });
                }
            }
        }
        for (id, room) in &self.staged_rooms {
            if let Some(current) = state.rooms.get(id) {
                if current.version() != room.version() {
                    return Err(DomainError::Conflict {
                        current: Fingerprint::room(*id, current.version()),
                    });
                }
            }
        }

        for (id, booking) in self.staged_bookings {
            let next = booking.version().next();
            state.bookings.insert(id, booking.with_version(next));
        }
        for (id, guest) in self.staged_guests {
            let next = guest.version().next();
            state.guests.insert(id, guest.with_version(next));
        }
        for (id, room) in self.staged_rooms {
            let next = room.version().next();
            state.rooms.insert(id, room.with_version(next));
        }
        Ok(())
    }
}

impl UnitOfWork for MemoryUnitOfWork {
    fn booking(&self, id: BookingId) -> DomainResult<Option<Booking>> {
        Ok(self
            .staged_bookings
            .get(&id)
            .or_else(|| self.snapshot.bookings.get(&id))
            .cloned())
    }

    fn guest(&self, id: GuestId) -> DomainResult<Option<Guest>> {
        Ok(self
            .staged_guests
            .get(&id)
            .or_else(|| self.snapshot.guests.get(&id))
            .cloned())
    }

    fn room(&self, id: RoomId) -> DomainResult<Option<Room>> {
        Ok(self
            .staged_rooms
            .get(&id)
            .or_else(|| self.snapshot.rooms.get(&id))
            .cloned())
    }

    fn put_booking(&mut self, booking: Booking) {
        self.staged_bookings.insert(booking.id(), booking);
    }

    fn put_guest(&mut self, guest: Guest) {
        self.staged_guests.insert(guest.id(), guest);
    }

    fn put_room(&mut self, room: Room) {
        self.staged_rooms.insert(room.id(), room);
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    type Uow = MemoryUnitOfWork;

    async fn run_in_transaction<R, F>(&self, work: F) -> DomainResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut Self::Uow) -> DomainResult<R> + Send,
    {
        let mut state = self.locked()?;
        let mut uow = MemoryUnitOfWork::from_snapshot(state.clone());

        // 闭包出错即回滚：未提交的暂存随工作单元一起丢弃
        let result = work(&mut uow)?;
        uow.commit(&mut state)?;
        Ok(result)
    }

    async fn find_booking(&self, id: BookingId) -> DomainResult<Option<Booking>> {
        Ok(self.locked()?.bookings.get(&id).cloned())
    }

    async fn find_guest(&self, id: GuestId) -> DomainResult<Option<Guest>> {
        Ok(self.locked()?.guests.get(&id).cloned())
    }

    async fn find_room(&self, id: RoomId) -> DomainResult<Option<Room>> {
        Ok(self.locked()?.rooms.get(&id).cloned())
    }

    async fn all_rooms(&self) -> DomainResult<Vec<Room>> {
        Ok(self.locked()?.rooms.values().cloned().collect())
    }

    async fn query_rooms(&self, criteria: &RoomSearchCriteria) -> DomainResult<Vec<Room>> {
        let state = self.locked()?;
        let bookings: Vec<Booking> = state.bookings.values().cloned().collect();
        let spec = criteria.to_specification(&bookings);

        Ok(state
            .rooms
            .values()
            .filter(|room| spec.is_satisfied_by(room))
            .cloned()
            .collect())
    }

    async fn insert_room(&self, new_room: NewRoom) -> DomainResult<Room> {
        let mut state = self.locked()?;

        // 编码唯一性（忽略大小写）在同一把锁内兜底：并发创建至多一个胜出
        let code = new_room.normalized_code()?;
        if state
            .rooms
            .values()
            .any(|room| room.code().trim().eq_ignore_ascii_case(code))
        {
            return Err(DomainError::InvalidValue {
                reason: format!("a room with code {code} already exists"),
            });
        }

        state.last_room_id += 1;
        let id = state.last_room_id;

        let room = Room::builder()
            .id(id)
            .code(new_room.code)
            .name(new_room.name)
            .capacity(new_room.capacity)
            .base_price_per_night(new_room.base_price_per_night)
            .build();
        state.rooms.insert(id, room.clone());
        Ok(room)
    }

    async fn remove_room(&self, id: RoomId) -> DomainResult<()> {
        let mut state = self.locked()?;
        state
            .rooms
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(Room::KIND, id))
    }
}

/// `PreBookingRepository` 的内存实现
///
/// 预留不参与工作单元，用自己的一把锁即可。
#[derive(Debug, Default)]
pub struct MemoryPreBookingRepository {
    state: Mutex<PreBookingState>,
}

#[derive(Debug, Default)]
struct PreBookingState {
    pre_bookings: BTreeMap<PreBookingId, PreBooking>,
    last_id: PreBookingId,
}

impl MemoryPreBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> DomainResult<MutexGuard<'_, PreBookingState>> {
        self.state.lock().map_err(|_| DomainError::Repository {
            reason: "pre-booking mutex poisoned".to_string(),
        })
    }
}

#[async_trait]
impl PreBookingRepository for MemoryPreBookingRepository {
    async fn insert_pre_booking(&self, pre_booking: PreBooking) -> DomainResult<PreBooking> {
        let mut state = self.locked()?;
        state.last_id += 1;
        let saved = pre_booking.with_id(state.last_id);
        state.pre_bookings.insert(saved.id(), saved.clone());
        Ok(saved)
    }

    async fn find_pre_booking(&self, id: PreBookingId) -> DomainResult<Option<PreBooking>> {
        Ok(self.locked()?.pre_bookings.get(&id).cloned())
    }

    async fn all_pre_bookings(&self) -> DomainResult<Vec<PreBooking>> {
        Ok(self.locked()?.pre_bookings.values().cloned().collect())
    }
}
