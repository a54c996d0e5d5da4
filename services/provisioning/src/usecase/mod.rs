pub mod bulk;
pub mod conflict;
pub mod parent;
pub mod provision;
