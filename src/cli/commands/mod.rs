pub mod analyze;
pub mod angular;
pub mod check;
pub mod config;
pub mod figma;
pub mod modernize;
