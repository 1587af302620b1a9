use crate::domain::AppError;

/// Upper bound on Celery worker processes.
pub const MAX_CONCURRENCY: u32 = 8;

/// Derives worker concurrency from the host's processor count.
pub struct ConcurrencyResolver;

impl ConcurrencyResolver {
    /// `min(processor_count, 8)`; fails for counts below 1.
    pub fn resolve(processor_count: i64) -> Result<u32, AppError> {
        if processor_count < 1 {
            return Err(AppError::invalid_parameter(
                "facts.processor_count",
                format!("must be at least 1, got {}", processor_count),
            ));
        }
        Ok(processor_count.min(i64::from(MAX_CONCURRENCY)) as u32)
    }
}
