//! 存储接口（EntityStore / UnitOfWork）
//!
//! 定义实体存储与工作单元的抽象协议，本 crate 不提供具体实现：
//! - `UnitOfWork`：一次事务内的读取与变更暂存，读取可见本事务内
//!   已暂存的写入（read-your-writes）；
//! - `EntityStore::run_in_transaction`：闭包返回 Ok 时原子提交全部
//!   暂存变更，返回 Err 时全部丢弃——闭包内不需要任何补偿逻辑。
//!
//! 提交协议要求实现方对每个被暂存的实体执行"比较版本后递增"：
//! 暂存实体的版本必须等于存储中的当前版本，否则以 `Conflict` 拒绝
//! 整个提交；成功提交后版本恰好加一。该契约保证同一版本值至多有
//! 一个胜出的写入者。
//!
use async_trait::async_trait;

use crate::entity::{BookingId, GuestId, PreBookingId, RoomId};
use crate::error::DomainResult;
use crate::model::{Booking, Guest, NewRoom, PreBooking, Room};
use crate::specification::RoomSearchCriteria;

/// 工作单元：事务内的读取与变更暂存
pub trait UnitOfWork: Send {
    fn booking(&self, id: BookingId) -> DomainResult<Option<Booking>>;
    fn guest(&self, id: GuestId) -> DomainResult<Option<Guest>>;
    fn room(&self, id: RoomId) -> DomainResult<Option<Room>>;

    /// 暂存一笔预订变更（提交时生效）
    fn put_booking(&mut self, booking: Booking);
    /// 暂存一笔住客变更（提交时生效）
    fn put_guest(&mut self, guest: Guest);
    /// 暂存一笔房间变更（提交时生效）
    fn put_room(&mut self, room: Room);
}

/// 实体存储
///
/// 单机、单存储的事务边界；隔离性由实现方保证（至少保证并发事务
/// 观察不到半应用的迁移）。
#[async_trait]
pub trait EntityStore: Send + Sync {
    type Uow: UnitOfWork;

    /// 在一个事务内执行 `work`：Ok 则原子提交，Err 则整体回滚
    async fn run_in_transaction<R, F>(&self, work: F) -> DomainResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut Self::Uow) -> DomainResult<R> + Send;

    async fn find_booking(&self, id: BookingId) -> DomainResult<Option<Booking>>;
    async fn find_guest(&self, id: GuestId) -> DomainResult<Option<Guest>>;
    async fn find_room(&self, id: RoomId) -> DomainResult<Option<Room>>;

    /// 所有房间（不分页，用于编码唯一性校验与未过滤列表）
    async fn all_rooms(&self) -> DomainResult<Vec<Room>>;

    /// 以组合规约查询房间；可用性判定所需的预订快照由实现方提供
    async fn query_rooms(&self, criteria: &RoomSearchCriteria) -> DomainResult<Vec<Room>>;

    /// 新建房间：由存储分配标识，初始版本为 0
    async fn insert_room(&self, new_room: NewRoom) -> DomainResult<Room>;

    /// 删除房间；不存在时返回 NotFound
    async fn remove_room(&self, id: RoomId) -> DomainResult<()>;
}

/// 预留仓储
///
/// 独立于事务性实体存储的轻量仓储：预留不参与工作单元，
/// 保存即可见。
#[async_trait]
pub trait PreBookingRepository: Send + Sync {
    /// 保存预留：由仓储分配标识
    async fn insert_pre_booking(&self, pre_booking: PreBooking) -> DomainResult<PreBooking>;

    async fn find_pre_booking(&self, id: PreBookingId) -> DomainResult<Option<PreBooking>>;

    /// 所有已登记的预留
    async fn all_pre_bookings(&self) -> DomainResult<Vec<PreBooking>>;
}
