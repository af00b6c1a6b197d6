pub mod member;

pub use member::{MemberStatus, Principal, UnknownStatus};
