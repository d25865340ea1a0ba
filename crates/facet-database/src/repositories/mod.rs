//! PostgreSQL implementations of the store traits.

pub mod assignment;
pub mod notification;
pub mod person;

pub use assignment::AssignmentRepository;
pub use notification::NotificationRepository;
pub use person::PersonRepository;
