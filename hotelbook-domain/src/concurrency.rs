//! 乐观并发控制（资源指纹）
//!
//! 由资源类型、标识与版本号派生出确定性的指纹字符串，作为条件读取
//! 与条件写入的比较依据：
//! - 条件读取：调用方携带上次读取的指纹，一致则短路返回"未变更"；
//! - 条件写入：调用方携带指纹且与当前不一致时拒绝写入，并回传当前
//!   指纹供其重试；未携带指纹则按 best effort 直接写入。
//!
//! 指纹的竞态安全依赖存储层的"比较版本后递增"提交协议：同一版本值
//! 至多允许一个写入者胜出。
//!
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, RoomId};
use crate::model::Room;
use crate::value_object::Version;

/// 资源指纹
///
/// 规范形式为 `"<resource-type>-<id>-v<version>"`，两个指纹相等
/// 当且仅当资源标识与版本号均相等。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// 由资源类型、标识与版本号构造指纹（纯函数）
    pub fn new(resource_type: &str, id: u64, version: Version) -> Self {
        Self(format!("{resource_type}-{id}-{version}"))
    }

    /// 房间资源的指纹
    pub fn room(id: RoomId, version: Version) -> Self {
        Self::new(Room::KIND, id, version)
    }

    /// 由外部（如 HTTP 头）传入的原始字符串构造指纹
    ///
    /// 不做格式校验：格式错误的指纹永远不等于任何当前指纹，
    /// 条件写入自然落入 Conflict 分支。
    pub fn from_supplied(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 条件读取的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadEvaluation {
    /// 资源自调用方上次读取后未变更，可省略负载传输
    Unchanged,
    /// 资源已变更（或调用方未携带指纹），需返回完整负载
    Changed,
}

/// 条件写入的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteEvaluation {
    /// 允许写入
    Proceed,
    /// 调用方持有过期指纹，写入必须被拒绝
    Conflict,
}

/// 条件读取判定：携带的指纹与当前一致则视为未变更
pub fn evaluate_conditional_read(
    current: &Fingerprint,
    supplied: Option<&Fingerprint>,
) -> ReadEvaluation {
    match supplied {
        Some(supplied) if supplied == current => ReadEvaluation::Unchanged,
        _ => ReadEvaluation::Changed,
    }
}

/// 条件写入判定：未携带指纹直接放行；携带且不一致则拒绝
pub fn evaluate_conditional_write(
    current: &Fingerprint,
    supplied: Option<&Fingerprint>,
) -> WriteEvaluation {
    match supplied {
        Some(supplied) if supplied != current => WriteEvaluation::Conflict,
        _ => WriteEvaluation::Proceed,
    }
}
