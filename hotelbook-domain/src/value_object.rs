//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象，用于封装不可变的概念性值与校验逻辑。
//!
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 创建值对象时进行验证
    fn validate(&self) -> Result<(), Self::Error>;
}

/// 版本号（用于乐观锁和并发控制）
///
/// 提供类型安全的版本号操作，避免直接使用 u64 导致的语义不明确问题。
/// 每次成功持久化一次变更，版本号加一；资源指纹由版本号派生。
///
/// # 示例
///
/// ```
/// use hotelbook_domain::value_object::Version;
///
/// let v1 = Version::new();
/// assert_eq!(v1.value(), 0);
/// assert!(v1.is_new());
///
/// let v2 = v1.next();
/// assert_eq!(v2.value(), 1);
/// assert!(v2 > v1);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version(u64);

impl Version {
    /// 创建初始版本（版本号为 0）
    pub const fn new() -> Self {
        Self(0)
    }

    /// 从值创建版本号
    pub const fn from_value(value: u64) -> Self {
        Self(value)
    }

    /// 获取下一个版本号
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// 获取版本号的值
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// 检查是否为初始版本
    pub fn is_new(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(value: u64) -> Self {
        Self::from_value(value)
    }
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        version.value()
    }
}

/// 半开日期区间 `[start, end)`
///
/// 入住/退房与可用性查询统一使用半开区间语义：包含起始日，不包含结束日。
/// 两个半开区间重叠当且仅当 `a.start < b.end && b.start < a.end`，
/// 且两者均非空；空区间（`start == end`）不与任何区间重叠。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// 创建日期区间，要求 `start < end`
    ///
    /// 如需表达空区间（如可用性查询中的零长度区间），使用 [`DateRange::raw`]。
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        let range = Self::raw(start, end);
        range.validate()?;
        Ok(range)
    }

    /// 创建不做校验的日期区间（允许空区间）
    pub const fn raw(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 区间起始日（含）
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// 区间结束日（不含）
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// 是否为空区间
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// 半开区间重叠判定
    ///
    /// 零长度区间恒不重叠，因此不会限制任何可用性查询。
    pub fn overlaps(&self, other: &DateRange) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.start < other.end && other.start < self.end
    }
}

impl ValueObject for DateRange {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.start >= self.end {
            return Err(DomainError::InvalidValue {
                reason: format!("check-in date {} must be before check-out date {}", self.start, self.end),
            });
        }
        Ok(())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
