pub mod install;
pub mod plan;
