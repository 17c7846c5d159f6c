//! Flutter-facing bindings for `later_core`.

pub mod api;
