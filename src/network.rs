use lettre::AsyncTransport;

/// Transport used to deliver emails (SMTP in production, stub transport in tests).
pub trait EmailTransport: AsyncTransport + Send + Sync + 'static {}
impl<T> EmailTransport for T where T: AsyncTransport + Send + Sync + 'static {}

/// Error returned by the email transport.
pub trait EmailTransportError: std::error::Error + Send + Sync + 'static {}
impl<T> EmailTransportError for T where T: std::error::Error + Send + Sync + 'static {}

/// Network utilities.
pub struct Network<ET: EmailTransport> {
    pub email_transport: ET,
}

impl<ET: EmailTransport> Network<ET> {
    pub fn new(email_transport: ET) -> Self {
        Self { email_transport }
    }
}
