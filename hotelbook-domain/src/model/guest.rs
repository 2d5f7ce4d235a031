use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, GuestId};
use crate::value_object::Version;

/// 住客
///
/// `confirmed_bookings_count` 是随预订迁移在同一事务内维护的
/// 反规范化计数，等于该住客当前处于 CONFIRMED 状态的预订数量。
/// 若有绕过预订生命周期的写入路径，该缓存可能偏离真实值；
/// 反序列化时缺失按 0 处理。
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    id: GuestId,
    first_name: String,
    last_name: String,
    /// 全局唯一
    email: String,
    #[serde(default)]
    #[builder(default)]
    confirmed_bookings_count: u32,
    #[builder(default)]
    version: Version,
}

impl Guest {
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn confirmed_bookings_count(&self) -> u32 {
        self.confirmed_bookings_count
    }

    /// 确认迁移的副作用：计数加一
    pub fn record_confirmation(&mut self) {
        self.confirmed_bookings_count += 1;
    }

    /// 取消一笔已确认预订的副作用：计数减一，下限为 0
    pub fn revoke_confirmation(&mut self) {
        self.confirmed_bookings_count = self.confirmed_bookings_count.saturating_sub(1);
    }

    /// 由存储层在提交时调用，赋予新版本号
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }
}

impl Entity for Guest {
    type Id = GuestId;

    const KIND: &'static str = "guest";

    fn id(&self) -> GuestId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}
