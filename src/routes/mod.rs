pub mod health;
pub mod webhook_handler;
