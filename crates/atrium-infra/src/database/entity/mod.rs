//! SeaORM row models.

pub mod user;
