//! 实体（Entity）基础抽象
//!
//! 为领域实体提供统一的标识（Id）与版本（optimistic locking）能力。
//!
use std::{fmt::Display, str::FromStr};

use crate::value_object::Version;

/// 房间标识
pub type RoomId = u64;
/// 住客标识
pub type GuestId = u64;
/// 预订标识
pub type BookingId = u64;
/// 预留标识
pub type PreBookingId = u64;

/// 具备唯一标识与版本的实体抽象
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可解析、可显示与可克隆
    type Id: FromStr + Clone + Display;

    /// 实体类型名（用于错误信息与资源指纹前缀）
    const KIND: &'static str;

    /// 获取实体标识
    fn id(&self) -> Self::Id;

    /// 获取当前版本（用于乐观锁与并发控制）
    fn version(&self) -> Version;
}
