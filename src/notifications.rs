mod api_ext;
mod email;
mod notification_content_template;
mod reminder;

pub use self::{
    email::Email,
    notification_content_template::NotificationContentTemplate,
    reminder::{reminder_time, ReminderDecision},
};
