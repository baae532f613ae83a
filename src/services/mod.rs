pub mod query;
pub mod recommend;
