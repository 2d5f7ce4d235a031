//! 领域模型：房间（Room）、住客（Guest）与预订（Booking）
//!
//! - `Room` 持有乐观并发控制的版本号与最近确认入住日缓存；
//! - `Guest` 持有"已确认预订数"反规范化计数；
//! - `Booking` 承载状态机：CREATED → CONFIRMED / CANCELLED；
//! - `PreBooking` 是正式预订之前的轻量报价记录。
//!
mod booking;
mod guest;
mod pre_booking;
mod room;

pub use booking::{Booking, BookingStatus};
pub use guest::Guest;
pub use pre_booking::{NewPreBooking, PreBooking, MAX_PRE_BOOKING_NIGHTS};
pub use room::{NewRoom, Room, RoomPatch, MAX_CAPACITY};
