//! 领域层统一错误定义
//!
//! 覆盖预订状态机、乐观并发控制与存储接口的最小必要错误集合，
//! 便于在应用层统一转换与映射。
//!
use thiserror::Error;

use crate::concurrency::Fingerprint;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 领域规则/状态机 ---
    #[error("{entity} not found: id={id}")]
    NotFound { entity: &'static str, id: u64 },
    #[error("invalid transition: {reason}")]
    InvalidTransition { reason: String },
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },

    // --- 乐观并发控制 ---
    #[error("version conflict: current fingerprint={current}")]
    Conflict { current: Fingerprint },

    // --- 存储/事务 ---
    #[error("repository error: {reason}")]
    Repository { reason: String },

    // --- 致命错误（强制整个工作单元回滚） ---
    #[error("fatal: {reason}")]
    Fatal { reason: String },
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// 按实体类型构造 NotFound
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        DomainError::NotFound { entity, id }
    }

    /// 是否属于"尚未发生任何变更"即可返回的前置条件错误
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            DomainError::NotFound { .. }
                | DomainError::InvalidTransition { .. }
                | DomainError::InvalidValue { .. }
        )
    }
}
