//! Infrastructure layer: concrete implementations of the domain interfaces
//! plus the wire-format DTOs.

pub mod dto;
pub mod event_pusher;
pub mod executor;
pub mod repository;
