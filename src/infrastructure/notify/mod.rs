//! Email and SMS transports.

pub mod mailer;
pub mod sms_gateway;

pub use mailer::{LogMailer, MailError, Mailer, OutgoingEmail, SmtpMailer};
pub use sms_gateway::{
    DisabledGateway, LogGateway, SmsError, SmsGateway, SmsReceipt, VonageGateway,
};

#[cfg(test)]
pub use mailer::MockMailer;
#[cfg(test)]
pub use sms_gateway::MockSmsGateway;
