//! # facet-mail
//!
//! Email delivery seam. The dispatcher only sees [`MailTransport`] and the
//! two-way [`DeliveryError`] classification; providers decide which of
//! their failures are worth retrying.

pub mod error;
pub mod http;
pub mod log;
pub mod message;
pub mod provider;
pub mod transport;

pub use error::DeliveryError;
pub use message::MailMessage;
pub use provider::build_transport;
pub use transport::MailTransport;
