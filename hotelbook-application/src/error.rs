use hotelbook_domain::concurrency::Fingerprint;
use hotelbook_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("validation: {0}")]
    Validation(String),
}

impl AppError {
    /// 冲突错误携带的当前指纹（供调用方重试）
    pub fn current_fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            AppError::Domain(DomainError::Conflict { current }) => Some(current),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::NotFound { .. }))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::Conflict { .. }))
    }
}
