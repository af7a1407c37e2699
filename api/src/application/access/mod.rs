use crate::application::error::{ServiceError, ServiceResult};
use crate::domain::accounts::account::UserType;

/// Authenticated caller. The presentation layer builds it from verified token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub user_type: UserType,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, user_type: UserType) -> Self {
        Caller {
            user_id: user_id.into(),
            user_type,
        }
    }

    pub fn require(&self, min: UserType) -> ServiceResult<()> {
        if self.user_type.outranks_or_equals(min) {
            Ok(())
        } else {
            Err(ServiceError::forbidden(format!(
                "{} permission required",
                min.as_str()
            )))
        }
    }
}
