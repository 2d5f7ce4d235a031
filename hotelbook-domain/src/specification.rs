//! 房间检索规约（Specification）
//!
//! 用可组合的规约封装检索条件，使其可复用、可测试：
//! - 通用 `Specification<T>` trait 与 AND / OR / NOT 组合子；
//! - 一组全可选的房间筛选条件：参数缺失时该条件退化为恒真
//!   （中性元），组合始终是全部条件的逻辑 AND，而不是跳过某些条件；
//! - 日期区间可用性：房间在 `[from, to)` 可用当且仅当不存在与之
//!   重叠的 CONFIRMED 预订（半开区间重叠判定见 `value_object::DateRange`）。
//!
use std::collections::HashSet;

use bon::Builder;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, RoomId};
use crate::model::{Booking, BookingStatus, Room};
use crate::value_object::DateRange;

/// 规约模式的核心 trait
pub trait Specification<T> {
    /// 检查候选对象是否满足规约
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    /// 与另一个规约进行 AND 组合
    fn and<S>(self, other: S) -> AndSpecification<T>
    where
        Self: Sized + 'static,
        S: Specification<T> + 'static,
    {
        AndSpecification::new(Box::new(self), Box::new(other))
    }

    /// 与另一个规约进行 OR 组合
    fn or<S>(self, other: S) -> OrSpecification<T>
    where
        Self: Sized + 'static,
        S: Specification<T> + 'static,
    {
        OrSpecification::new(Box::new(self), Box::new(other))
    }

    /// 对规约进行 NOT 操作
    fn not(self) -> NotSpecification<T>
    where
        Self: Sized + 'static,
    {
        NotSpecification::new(Box::new(self))
    }
}

/// 为 Box<dyn Specification<T>> 实现 Specification trait
impl<T> Specification<T> for Box<dyn Specification<T>> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.as_ref().is_satisfied_by(candidate)
    }
}

/// AND 组合规约
pub struct AndSpecification<T> {
    left: Box<dyn Specification<T>>,
    right: Box<dyn Specification<T>>,
}

impl<T> AndSpecification<T> {
    pub fn new(left: Box<dyn Specification<T>>, right: Box<dyn Specification<T>>) -> Self {
        Self { left, right }
    }
}

impl<T> Specification<T> for AndSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) && self.right.is_satisfied_by(candidate)
    }
}

/// OR 组合规约
pub struct OrSpecification<T> {
    left: Box<dyn Specification<T>>,
    right: Box<dyn Specification<T>>,
}

impl<T> OrSpecification<T> {
    pub fn new(left: Box<dyn Specification<T>>, right: Box<dyn Specification<T>>) -> Self {
        Self { left, right }
    }
}

impl<T> Specification<T> for OrSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) || self.right.is_satisfied_by(candidate)
    }
}

/// NOT 规约
pub struct NotSpecification<T> {
    inner: Box<dyn Specification<T>>,
}

impl<T> NotSpecification<T> {
    pub fn new(inner: Box<dyn Specification<T>>) -> Self {
        Self { inner }
    }
}

impl<T> Specification<T> for NotSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        !self.inner.is_satisfied_by(candidate)
    }
}

/// 名称包含给定文本（忽略大小写），参数缺失或为空白时恒真
pub struct NameContains {
    needle: Option<String>,
}

impl NameContains {
    pub fn new(name_contains: Option<String>) -> Self {
        let needle = name_contains
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        Self { needle }
    }
}

impl Specification<Room> for NameContains {
    fn is_satisfied_by(&self, room: &Room) -> bool {
        match &self.needle {
            Some(needle) => room.name().to_lowercase().contains(needle),
            None => true,
        }
    }
}

/// 容量下限，参数缺失时恒真
pub struct CapacityAtLeast {
    min_capacity: Option<u32>,
}

impl CapacityAtLeast {
    pub fn new(min_capacity: Option<u32>) -> Self {
        Self { min_capacity }
    }
}

impl Specification<Room> for CapacityAtLeast {
    fn is_satisfied_by(&self, room: &Room) -> bool {
        match self.min_capacity {
            Some(min) => room.capacity() >= min,
            None => true,
        }
    }
}

/// 每晚基础价格下限（精确十进制比较），参数缺失时恒真
pub struct BasePriceAtLeast {
    min_price: Option<Decimal>,
}

impl BasePriceAtLeast {
    pub fn new(min_price: Option<Decimal>) -> Self {
        Self { min_price }
    }
}

impl Specification<Room> for BasePriceAtLeast {
    fn is_satisfied_by(&self, room: &Room) -> bool {
        match self.min_price {
            Some(min) => room.base_price_per_night() >= min,
            None => true,
        }
    }
}

/// 每晚基础价格上限（精确十进制比较），参数缺失时恒真
pub struct BasePriceAtMost {
    max_price: Option<Decimal>,
}

impl BasePriceAtMost {
    pub fn new(max_price: Option<Decimal>) -> Self {
        Self { max_price }
    }
}

impl Specification<Room> for BasePriceAtMost {
    fn is_satisfied_by(&self, room: &Room) -> bool {
        match self.max_price {
            Some(max) => room.base_price_per_night() <= max,
            None => true,
        }
    }
}

/// 仅保留激活房间；`Some(false)` 与缺失一样不做限制
pub struct OnlyActive {
    only_active: Option<bool>,
}

impl OnlyActive {
    pub fn new(only_active: Option<bool>) -> Self {
        Self { only_active }
    }
}

impl Specification<Room> for OnlyActive {
    fn is_satisfied_by(&self, room: &Room) -> bool {
        match self.only_active {
            Some(true) => room.active(),
            _ => true,
        }
    }
}

/// "存在与查询窗口重叠的 CONFIRMED 预订"——可用性是它的否定
///
/// 重叠房间集合在构造时由当次查询的预订快照一次性算出；
/// 窗口缺失（任一端为空）或为空区间时集合为空，整个可用性条件
/// 退化为恒真。
pub struct ConfirmedBookingOverlaps {
    occupied: HashSet<RoomId>,
}

impl ConfirmedBookingOverlaps {
    pub fn new(
        available_from: Option<NaiveDate>,
        available_to: Option<NaiveDate>,
        bookings: &[Booking],
    ) -> Self {
        let occupied = match (available_from, available_to) {
            (Some(from), Some(to)) => {
                let window = DateRange::raw(from, to);
                bookings
                    .iter()
                    .filter(|b| b.status() == BookingStatus::Confirmed)
                    .filter(|b| b.stay().overlaps(&window))
                    .map(|b| b.room_id())
                    .collect()
            }
            _ => HashSet::new(),
        };
        Self { occupied }
    }
}

impl Specification<Room> for ConfirmedBookingOverlaps {
    fn is_satisfied_by(&self, room: &Room) -> bool {
        self.occupied.contains(&room.id())
    }
}

/// 房间检索条件（全部可选）
///
/// 所有条件按逻辑 AND 组合为单一规约；缺失的条件以中性元参与组合。
#[derive(Builder, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomSearchCriteria {
    pub name_contains: Option<String>,
    pub min_capacity: Option<u32>,
    pub min_base_price_per_night: Option<Decimal>,
    pub max_base_price_per_night: Option<Decimal>,
    pub only_active: Option<bool>,
    /// 可用性窗口起始日（含）；必须与 `available_to` 同时给出才生效
    pub available_from: Option<NaiveDate>,
    /// 可用性窗口结束日（不含）
    pub available_to: Option<NaiveDate>,
}

impl RoomSearchCriteria {
    /// 将全部条件折叠为一个组合规约
    ///
    /// `bookings` 是当次查询可见的预订快照，用于可用性判定。
    pub fn to_specification(&self, bookings: &[Booking]) -> Box<dyn Specification<Room>> {
        let overlapping =
            ConfirmedBookingOverlaps::new(self.available_from, self.available_to, bookings);

        Box::new(
            NameContains::new(self.name_contains.clone())
                .and(CapacityAtLeast::new(self.min_capacity))
                .and(BasePriceAtLeast::new(self.min_base_price_per_night))
                .and(BasePriceAtMost::new(self.max_base_price_per_night))
                .and(OnlyActive::new(self.only_active))
                .and(overlapping.not()),
        )
    }
}
