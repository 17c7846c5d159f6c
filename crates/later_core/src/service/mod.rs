//! Use-case services.
//!
//! # Responsibility
//! - Validate caller input before it reaches storage.
//! - Stamp `updated_at` on every content mutation.
//! - Keep controllers and the FFI layer decoupled from storage details.
//!
//! # Invariants
//! - Errors from repositories are returned unchanged.
//! - Mutation log events carry ids and error keys only.

pub mod auth_service;
pub mod list_service;
pub mod note_service;
pub mod preferences_service;
pub mod space_service;
pub mod todo_service;
pub mod validation;

use crate::error::AppResult;
use log::{info, warn};

/// Emits one `event=<event> module=service` record for a finished mutation.
pub(crate) fn log_outcome<T>(event: &'static str, target_id: &str, result: &AppResult<T>) {
    match result {
        Ok(_) => info!("event={event} module=service status=ok id={target_id}"),
        Err(err) => warn!(
            "event={event} module=service status=error id={target_id} error_code={}",
            err.message_key()
        ),
    }
}
