use bon::Builder;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, RoomId};
use crate::error::{DomainError, DomainResult};
use crate::value_object::Version;

/// 单间房的最大容量
pub const MAX_CAPACITY: u32 = 10;

/// 每晚基础价格上限
fn max_base_price_per_night() -> Decimal {
    Decimal::from(50_000u32)
}

/// 房间
///
/// `version` 在每次持久化变更时由存储层加一，是资源指纹的来源；
/// `last_booking_date` 是确认迁移维护的缓存字段：记录"最近一次被
/// 确认"的入住日，而非已确认预订中最大的入住日。
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    /// 业务编码，全局唯一（忽略大小写）
    code: String,
    name: String,
    capacity: u32,
    base_price_per_night: Decimal,
    #[builder(default = true)]
    active: bool,
    internal_notes: Option<String>,
    last_booking_date: Option<NaiveDate>,
    #[builder(default)]
    version: Version,
}

impl Room {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn base_price_per_night(&self) -> Decimal {
        self.base_price_per_night
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn internal_notes(&self) -> Option<&str> {
        self.internal_notes.as_deref()
    }

    pub fn last_booking_date(&self) -> Option<NaiveDate> {
        self.last_booking_date
    }

    /// 确认迁移的副作用：无条件覆盖最近确认入住日缓存
    pub fn record_confirmed_check_in(&mut self, check_in_date: NaiveDate) {
        self.last_booking_date = Some(check_in_date);
    }

    /// 应用一次房间编辑（名称做裁剪，规则校验先于任何字段变更）
    pub fn apply_patch(&mut self, patch: &RoomPatch) -> DomainResult<()> {
        validate_capacity_and_price(patch.capacity, patch.base_price_per_night)?;

        self.name = patch.name.trim().to_string();
        self.capacity = patch.capacity;
        self.base_price_per_night = patch.base_price_per_night;
        self.active = patch.active;
        Ok(())
    }

    /// 由存储层在提交时调用，赋予新版本号
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }
}

impl Entity for Room {
    type Id = RoomId;

    const KIND: &'static str = "room";

    fn id(&self) -> RoomId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}

/// 新建房间的输入
///
/// 编码与名称在校验时裁剪首尾空白；编码唯一性由服务层结合存储校验。
#[derive(Builder, Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub code: String,
    pub name: String,
    pub capacity: u32,
    pub base_price_per_night: Decimal,
}

impl NewRoom {
    /// 裁剪后的编码；空编码非法
    pub fn normalized_code(&self) -> DomainResult<&str> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(DomainError::InvalidValue {
                reason: "room code is mandatory".to_string(),
            });
        }
        Ok(code)
    }

    pub fn validate(&self) -> DomainResult<()> {
        self.normalized_code()?;
        validate_capacity_and_price(self.capacity, self.base_price_per_night)
    }
}

/// 房间编辑的输入（整体替换名称、容量、价格与激活标记）
#[derive(Builder, Debug, Clone, Serialize, Deserialize)]
pub struct RoomPatch {
    pub name: String,
    pub capacity: u32,
    pub base_price_per_night: Decimal,
    pub active: bool,
}

/// 容量与价格的公共业务规则
fn validate_capacity_and_price(capacity: u32, base_price_per_night: Decimal) -> DomainResult<()> {
    if capacity < 1 {
        return Err(DomainError::InvalidValue {
            reason: "room capacity must be at least 1".to_string(),
        });
    }
    if capacity > MAX_CAPACITY {
        return Err(DomainError::InvalidValue {
            reason: format!("room capacity must not exceed {MAX_CAPACITY}"),
        });
    }
    if base_price_per_night <= Decimal::ZERO {
        return Err(DomainError::InvalidValue {
            reason: "base price per night must be positive".to_string(),
        });
    }
    if base_price_per_night > max_base_price_per_night() {
        return Err(DomainError::InvalidValue {
            reason: format!(
                "base price per night must not exceed {}",
                max_base_price_per_night()
            ),
        });
    }
    Ok(())
}
