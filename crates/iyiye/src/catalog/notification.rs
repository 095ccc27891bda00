//! In-app notification statements (relational `notifdb` data source).
//!
//! The notification database holds one table, `in_app_notification`.
//! Timestamps are stored and returned as ISO-8601 UTC text with a `Z`
//! suffix; column aliases carry the camelCase field names of the API.

use iyiye_core::resolver::{ParamSpec, StatementTemplate};

/// SQL statement to create the notification schema.
pub const CREATE_TABLES: &str = r#"
-- In-app notifications table
CREATE TABLE IF NOT EXISTS in_app_notification (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL,
    receiver_username TEXT NOT NULL,
    body TEXT,
    is_read INTEGER NOT NULL DEFAULT 0,
    created_time TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    last_updated_time TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

-- Index for per-receiver listing in reverse chronological order
CREATE INDEX IF NOT EXISTS idx_in_app_notification_receiver_time
    ON in_app_notification(receiver_username, created_time);
"#;

/// Shared projection with API field aliases.
const SELECT_IN_APP_NOTIFICATION: &str = "\
Select
  id,
  type,
  receiver_username As receiverUsername,
  body,
  is_read As isRead,
  created_time As createdTime,
  last_updated_time As lastUpdatedTime
  From in_app_notification";

/// `Query.inAppNotificationList`: notifications for one receiver, newest
/// first, paginated with declared defaults.
pub fn list() -> StatementTemplate {
    StatementTemplate::new(format!(
        "{SELECT_IN_APP_NOTIFICATION}
  Where receiver_username = :USERNAME
  Order By created_time Desc
  Limit :LIMIT Offset :OFFSET"
    ))
    .param("USERNAME", ParamSpec::required("username"))
    .param("LIMIT", ParamSpec::with_default("limit", 10))
    .param("OFFSET", ParamSpec::with_default("offset", 0))
}

/// `Query.inAppNotification`: one notification by id.
pub fn get() -> StatementTemplate {
    StatementTemplate::new(format!(
        "{SELECT_IN_APP_NOTIFICATION}
  Where id = :ID
  Limit 1"
    ))
    .param("ID", ParamSpec::required("id"))
}

/// First statement of `Mutation.createInAppNotification`.
pub fn insert() -> StatementTemplate {
    StatementTemplate::new(
        "Insert Into in_app_notification (type, receiver_username, body)
  Values (:TYPE, :RECEIVER_USERNAME, :BODY)",
    )
    .param("TYPE", ParamSpec::required("input.type"))
    .param(
        "RECEIVER_USERNAME",
        ParamSpec::required("input.receiverUsername"),
    )
    .param("BODY", ParamSpec::required("input.body"))
}

/// Confirmatory select paired with [`insert`]: reads back the row the
/// insert just created.
pub fn select_created() -> StatementTemplate {
    StatementTemplate::new(format!(
        "{SELECT_IN_APP_NOTIFICATION}
  Where receiver_username = :RECEIVER_USERNAME
  Order By created_time Desc
  Limit 1"
    ))
    .param(
        "RECEIVER_USERNAME",
        ParamSpec::required("input.receiverUsername"),
    )
}

/// First statement of `Mutation.markInAppNotificationAsRead`.
pub fn mark_read() -> StatementTemplate {
    StatementTemplate::new(
        "Update in_app_notification
  Set is_read = 1,
      last_updated_time = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
  Where id = :ID",
    )
    .param("ID", ParamSpec::required("id"))
}

/// Confirmatory select paired with [`mark_read`].
pub fn select_by_id() -> StatementTemplate {
    StatementTemplate::new(format!(
        "{SELECT_IN_APP_NOTIFICATION}
  Where id = :ID
  Limit 1"
    ))
    .param("ID", ParamSpec::required("id"))
}
