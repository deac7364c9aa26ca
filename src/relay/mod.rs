pub mod event;
pub mod router;
