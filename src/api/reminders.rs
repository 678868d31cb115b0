//! Reminder endpoints.

use reqwest::Method;

use super::{farm_child_item_path, farm_child_path};
use crate::client::ApiClient;
use crate::errors::ClientResult;
use crate::models::{ensure_valid, Reminder, ReminderList, ReminderRequest};

const REMINDERS: &str = "reminders";

impl ApiClient {
    /// GET /api/farms/:id/reminders - List a farm's reminders.
    pub async fn list_reminders(&self, farm_id: &str) -> ClientResult<Vec<Reminder>> {
        let list: ReminderList = self.get(&farm_child_path(farm_id, REMINDERS)).await?;
        Ok(list.data)
    }

    /// POST /api/farms/:id/reminders - Schedule a reminder.
    pub async fn create_reminder(&self, farm_id: &str, request: &ReminderRequest) -> ClientResult<()> {
        ensure_valid(request.validate())?;
        self.request_empty(
            Method::POST,
            &farm_child_path(farm_id, REMINDERS),
            Some(request),
        )
        .await
    }

    /// PATCH /api/farms/:id/reminders/:reminderId - Update a reminder.
    pub async fn update_reminder(
        &self,
        farm_id: &str,
        reminder_id: &str,
        request: &ReminderRequest,
    ) -> ClientResult<()> {
        ensure_valid(request.validate())?;
        self.request_empty(
            Method::PATCH,
            &farm_child_item_path(farm_id, REMINDERS, reminder_id),
            Some(request),
        )
        .await
    }

    /// Mark a reminder done, keeping its other fields.
    pub async fn complete_reminder(&self, farm_id: &str, reminder: &Reminder) -> ClientResult<()> {
        let request = ReminderRequest {
            is_completed: true,
            ..ReminderRequest::from(reminder)
        };
        self.update_reminder(farm_id, reminder.id(), &request).await
    }

    /// DELETE /api/farms/:id/reminders/:reminderId - Delete a reminder.
    pub async fn delete_reminder(&self, farm_id: &str, reminder_id: &str) -> ClientResult<()> {
        self.delete(&farm_child_item_path(farm_id, REMINDERS, reminder_id))
            .await
    }
}
