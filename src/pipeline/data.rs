use std::any::Any;
use std::fmt;

/// Status reported by a data source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStatus {
    Success,
    Invalid,
    Error,
    /// Any status code this crate does not know how to handle
    Unrecognized(i32),
}

impl From<i32> for DataStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => DataStatus::Success,
            1 => DataStatus::Invalid,
            2 => DataStatus::Error,
            other => DataStatus::Unrecognized(other),
        }
    }
}

/// What a data closure hands back to the pipeline
///
/// The payload is type-erased; the pipeline recovers it with the type the
/// caller asked for and treats a mismatch as "no payload".
pub struct DataResult {
    pub status: DataStatus,
    value: Option<Box<dyn Any + Send>>,
}

impl DataResult {
    pub fn new(status: DataStatus) -> Self {
        Self { status, value: None }
    }

    pub fn success<T: Any + Send>(value: T) -> Self {
        Self {
            status: DataStatus::Success,
            value: Some(Box::new(value)),
        }
    }

    pub fn success_empty() -> Self {
        Self::new(DataStatus::Success)
    }

    pub fn invalid() -> Self {
        Self::new(DataStatus::Invalid)
    }

    pub fn error() -> Self {
        Self::new(DataStatus::Error)
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// The payload as `T`, or `None` when absent or of another type
    pub fn into_value<T: Any>(self) -> Option<T> {
        self.value
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }
}

impl fmt::Debug for DataResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataResult")
            .field("status", &self.status)
            .field("has_value", &self.has_value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(DataStatus::from(0), DataStatus::Success);
        assert_eq!(DataStatus::from(1), DataStatus::Invalid);
        assert_eq!(DataStatus::from(2), DataStatus::Error);
        assert_eq!(DataStatus::from(42), DataStatus::Unrecognized(42));
    }

    #[test]
    fn test_payload_of_other_type_is_absent() {
        assert_eq!(DataResult::success(7_u32).into_value::<u32>(), Some(7));
        assert_eq!(DataResult::success(7_u32).into_value::<String>(), None);
        assert_eq!(DataResult::success_empty().into_value::<u32>(), None);
    }
}
