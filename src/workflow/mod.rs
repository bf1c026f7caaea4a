pub mod controller;
pub mod session;

pub use controller::{Pending, WorkflowController};
pub use session::{RequestTicket, Session, SessionSnapshot, UploadTicket};
