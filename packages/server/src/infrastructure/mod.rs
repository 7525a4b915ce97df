//! Infrastructure layer: storage, token verification and wire DTOs.

pub mod dto;
pub mod identity;
pub mod repository;
