// Jobs and candidates: data access and CRUD endpoints.

pub mod handlers;
pub mod repository;
