use crate::{
    api::Api,
    network::{EmailTransport, EmailTransportError},
    notifications::{Email, NotificationContentTemplate},
    tasks::{Task, TaskAssignee},
};
use anyhow::{bail, Context};
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    Message,
};
use time::OffsetDateTime;
use tracing::{debug, error};

/// Describes the API to deliver notifications.
pub struct NotificationsApi<'a, ET: EmailTransport> {
    api: &'a Api<ET>,
}

impl<'a, ET: EmailTransport> NotificationsApi<'a, ET>
where
    ET::Error: EmailTransportError,
{
    /// Creates Notifications API.
    pub fn new(api: &'a Api<ET>) -> Self {
        Self { api }
    }

    /// Sends the task assignment email to the assignee.
    pub async fn send_task_assigned_email(
        &self,
        task: &Task,
        assignee: &TaskAssignee,
        origin: &str,
        timestamp: OffsetDateTime,
    ) -> anyhow::Result<()> {
        let email = NotificationContentTemplate::TaskAssigned {
            task,
            assignee,
            origin,
        }
        .compile_to_email(self.api)?;
        self.send_email(&[assignee.email.as_str()], email, timestamp)
            .await
    }

    /// Sends the due date reminder email to the assignee.
    pub async fn send_task_reminder_email(
        &self,
        task: &Task,
        assignee: &TaskAssignee,
        origin: &str,
        timestamp: OffsetDateTime,
    ) -> anyhow::Result<()> {
        let email = NotificationContentTemplate::TaskReminder {
            task,
            assignee,
            origin,
        }
        .compile_to_email(self.api)?;
        self.send_email(&[assignee.email.as_str()], email, timestamp)
            .await
    }

    /// Sends email using the configured email transport. Email is re-routed to the catch-all
    /// recipient if its text matches the configured catch-all matcher.
    pub async fn send_email<T: AsRef<str>>(
        &self,
        to: &[T],
        email: Email,
        timestamp: OffsetDateTime,
    ) -> anyhow::Result<()> {
        let Some(ref smtp_config) = self.api.config.smtp else {
            error!("Email cannot be sent since SMTP isn't configured.");
            bail!("SMTP is not configured.");
        };

        let catch_all_recipient = smtp_config.catch_all.as_ref().and_then(|catch_all| {
            if catch_all.text_matcher.is_match(&email.text) {
                Some(catch_all.recipient.as_str())
            } else {
                None
            }
        });

        let mut message_builder = Message::builder()
            .from(smtp_config.username.parse()?)
            .reply_to(smtp_config.username.parse()?)
            .subject(&email.subject)
            .date(timestamp.into());

        if let Some(catch_all_recipient) = catch_all_recipient {
            message_builder = message_builder.to(catch_all_recipient
                .parse()
                .with_context(|| format!("Cannot parse catch-all TO address: {catch_all_recipient}"))?);
        } else {
            for to in to {
                let to: &str = to.as_ref();
                message_builder = message_builder.to(to
                    .parse()
                    .with_context(|| format!("Cannot parse TO address: {to}"))?);
            }
        }

        let message = match email.html {
            Some(html) => message_builder.multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )?,
            None => message_builder.body(email.text)?,
        };

        self.api.network.email_transport.send(message).await?;
        debug!(email.subject = %email.subject, "Email sent.");

        Ok(())
    }
}

impl<ET: EmailTransport> Api<ET>
where
    ET::Error: EmailTransportError,
{
    /// Returns an API to deliver notifications.
    pub fn notifications(&self) -> NotificationsApi<'_, ET> {
        NotificationsApi::new(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::{SmtpCatchAllConfig, SmtpConfig},
        notifications::Email,
        tasks::tests::mock_task,
        tests::{mock_api, mock_api_with_config, mock_api_with_network, mock_config},
        network::tests::mock_network_with_failing_smtp,
    };
    use insta::assert_debug_snapshot;
    use regex::Regex;
    use sqlx::PgPool;
    use time::OffsetDateTime;

    #[sqlx::test]
    async fn sends_text_and_html_emails(pool: PgPool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;

        api.notifications()
            .send_email(
                &["one@flowgrid.dev"],
                Email::text("subject", "text"),
                OffsetDateTime::from_unix_timestamp(946720800)?,
            )
            .await?;
        api.notifications()
            .send_email(
                &["one@flowgrid.dev", "two@flowgrid.dev"],
                Email::html("subject #2", "text #2", "<p>html #2</p>"),
                OffsetDateTime::from_unix_timestamp(946720900)?,
            )
            .await?;

        let messages = api.network.email_transport.messages().await;
        assert_eq!(messages.len(), 2);
        assert_debug_snapshot!(messages[0], @r###"
        (
            Envelope {
                forward_path: [
                    Address {
                        serialized: "one@flowgrid.dev",
                        at_start: 3,
                    },
                ],
                reverse_path: Some(
                    Address {
                        serialized: "notifications@flowgrid.dev",
                        at_start: 13,
                    },
                ),
            },
            "From: notifications@flowgrid.dev\r\nReply-To: notifications@flowgrid.dev\r\nSubject: subject\r\nDate: Sat, 01 Jan 2000 10:00:00 +0000\r\nTo: one@flowgrid.dev\r\nContent-Transfer-Encoding: 7bit\r\n\r\ntext",
        )
        "###);

        let (envelope, message) = &messages[1];
        assert_eq!(envelope.to().len(), 2);
        assert!(message.contains("Content-Type: multipart/alternative;"));
        assert!(message.contains("Content-Type: text/plain; charset=utf-8\r\nContent-Transfer-Encoding: 7bit\r\n\r\ntext #2"));
        assert!(message.contains("Content-Type: text/html; charset=utf-8\r\nContent-Transfer-Encoding: 7bit\r\n\r\n<p>html #2</p>"));

        Ok(())
    }

    #[sqlx::test]
    async fn sends_emails_respecting_catch_all_filter(pool: PgPool) -> anyhow::Result<()> {
        let mut config = mock_config()?;
        config.smtp = config.smtp.map(|smtp| SmtpConfig {
            catch_all: Some(SmtpCatchAllConfig {
                recipient: "qa@flowgrid.dev".to_string(),
                text_matcher: Regex::new("staging").unwrap(),
            }),
            ..smtp
        });
        let api = mock_api_with_config(pool, config).await?;

        let timestamp = OffsetDateTime::from_unix_timestamp(946720800)?;
        api.notifications()
            .send_email(
                &["one@flowgrid.dev"],
                Email::text("subject", "sent from staging"),
                timestamp,
            )
            .await?;
        api.notifications()
            .send_email(
                &["two@flowgrid.dev"],
                Email::text("subject", "sent from production"),
                timestamp,
            )
            .await?;

        let recipients = api
            .network
            .email_transport
            .messages()
            .await
            .into_iter()
            .map(|(envelope, _)| envelope.to().iter().map(|to| to.to_string()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        assert_eq!(
            recipients,
            vec![
                vec!["qa@flowgrid.dev".to_string()],
                vec!["two@flowgrid.dev".to_string()]
            ]
        );

        Ok(())
    }

    #[sqlx::test]
    async fn fails_if_smtp_is_not_configured(pool: PgPool) -> anyhow::Result<()> {
        let mut config = mock_config()?;
        config.smtp = None;
        let api = mock_api_with_config(pool, config).await?;

        let result = api
            .notifications()
            .send_email(
                &["one@flowgrid.dev"],
                Email::text("subject", "text"),
                OffsetDateTime::from_unix_timestamp(946720800)?,
            )
            .await;
        assert_eq!(
            result.map_err(|err| err.to_string()),
            Err("SMTP is not configured.".to_string())
        );
        assert!(api.network.email_transport.messages().await.is_empty());

        Ok(())
    }

    #[sqlx::test]
    async fn propagates_delivery_failures(pool: PgPool) -> anyhow::Result<()> {
        let api = mock_api_with_network(pool, mock_network_with_failing_smtp()).await?;

        let task = mock_task("task-1", None);
        let result = api
            .notifications()
            .send_task_assigned_email(
                &task,
                task.assignee.as_ref().unwrap(),
                "https://app.flowgrid.dev",
                OffsetDateTime::from_unix_timestamp(946720800)?,
            )
            .await;
        assert!(result.is_err());

        Ok(())
    }

    #[sqlx::test]
    async fn sends_assignment_and_reminder_emails_to_assignee(pool: PgPool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;

        let task = mock_task("task-1", None);
        let assignee = task.assignee.as_ref().unwrap();
        let timestamp = OffsetDateTime::from_unix_timestamp(946720800)?;
        api.notifications()
            .send_task_assigned_email(&task, assignee, "https://app.flowgrid.dev", timestamp)
            .await?;
        api.notifications()
            .send_task_reminder_email(&task, assignee, "https://app.flowgrid.dev", timestamp)
            .await?;

        let messages = api.network.email_transport.messages().await;
        assert_eq!(messages.len(), 2);
        for (envelope, _) in messages.iter() {
            assert_eq!(
                envelope.to().iter().map(|to| to.to_string()).collect::<Vec<_>>(),
                vec!["dev@flowgrid.dev".to_string()]
            );
        }
        assert!(messages[0]
            .1
            .contains("Subject: [Flowgrid] New task assigned: \"Migrate billing to v2\""));
        assert!(messages[1]
            .1
            .contains("Subject: [Flowgrid] Reminder: \"Migrate billing to v2\" is due soon"));

        Ok(())
    }
}
