// ── Typed mutation payloads ──
//
// Drafts are validated client-side before any network call; a draft that
// fails validation never reaches the API (the request is blocked at the
// mutation boundary, shown inline, and nothing is sent).

use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::model::{EntityId, TaskStatus};

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationFailed {
            message: format!("{field} must not be empty"),
        });
    }
    Ok(())
}

/// Create/update payload for a role.
#[derive(Debug, Clone)]
pub struct RoleDraft {
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

impl RoleDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        require("role name", &self.name)
    }
}

/// Create/update payload for a store.
#[derive(Debug, Clone)]
pub struct StoreDraft {
    pub name: String,
    pub region_id: Option<EntityId>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub enabled: bool,
}

impl StoreDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        require("store name", &self.name)?;
        if let Some(phone) = &self.phone {
            let ok = phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'));
            if !ok {
                return Err(CoreError::ValidationFailed {
                    message: format!("invalid phone number: {phone}"),
                });
            }
        }
        Ok(())
    }
}

/// Create/update payload for a region.
#[derive(Debug, Clone)]
pub struct RegionDraft {
    pub name: String,
    pub code: Option<String>,
}

impl RegionDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        require("region name", &self.name)
    }
}

/// Create/update payload for a promotion.
#[derive(Debug, Clone)]
pub struct PromotionDraft {
    pub title: String,
    pub body: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl PromotionDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        require("promotion title", &self.title)?;
        if let (Some(start), Some(end)) = (self.starts_at, self.ends_at) {
            if end <= start {
                return Err(CoreError::ValidationFailed {
                    message: "promotion must end after it starts".into(),
                });
            }
        }
        Ok(())
    }
}

/// Partial task update. `due_date: Some(None)` clears the date;
/// `None` leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn set_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn set_due(due: Option<DateTime<Utc>>) -> Self {
        Self {
            due_date: Some(due),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            require("task name", name)?;
        }
        if self.name.is_none() && self.status.is_none() && self.due_date.is_none() {
            return Err(CoreError::ValidationFailed {
                message: "nothing to update".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_name_is_rejected_before_send() {
        let draft = StoreDraft {
            name: "  ".into(),
            region_id: None,
            address: None,
            phone: None,
            enabled: true,
        };
        assert!(matches!(
            draft.validate(),
            Err(CoreError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn bogus_phone_is_rejected() {
        let draft = StoreDraft {
            name: "Downtown".into(),
            region_id: None,
            address: None,
            phone: Some("call me".into()),
            enabled: true,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn inverted_promotion_window_is_rejected() {
        let now = Utc::now();
        let draft = PromotionDraft {
            title: "Sale".into(),
            body: None,
            starts_at: Some(now),
            ends_at: Some(now),
            active: true,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn empty_task_update_is_rejected() {
        assert!(TaskUpdate::default().validate().is_err());
        assert!(TaskUpdate::rename("x").validate().is_ok());
    }
}
