pub mod projection;
pub mod transition;
