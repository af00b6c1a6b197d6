pub mod error;
pub mod member_repo;
