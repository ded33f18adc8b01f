//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - Where the entity is listed, a query struct of optional filters

pub mod article;
pub mod attach;
pub mod category;
pub mod comment;
pub mod tag;
pub mod user;
