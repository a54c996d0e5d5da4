//! sea-orm entities for the provisioning service's relational store.

pub mod children;
pub mod health_posts;
pub mod parent_children;
pub mod profiles;
