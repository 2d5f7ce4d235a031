//! 酒店预订应用层（hotelbook-application）
//!
//! 面向外部接口层（HTTP 控制器等，不在本 crate 范围内）编排领域操作：
//! - `reservation`：预订确认/取消的事务化生命周期服务；
//! - `room`：房间的条件读写（资源指纹）、增删与分页检索；
//! - `pre_booking`：正式预订之前的轻量报价登记；
//! - `memory_store`：`EntityStore` 与 `PreBookingRepository` 的内存实现；
//! - `dto`：对外输出的数据传输对象与排序/分页参数。
//!
pub mod dto;
pub mod error;
pub mod memory_store;
pub mod pre_booking;
pub mod reservation;
pub mod room;

pub use memory_store::{MemoryPreBookingRepository, MemoryStore};
pub use pre_booking::PreBookingService;
pub use reservation::ReservationService;
pub use room::RoomService;
