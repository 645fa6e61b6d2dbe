//! Platform detection, one file per area

pub mod desktop;
pub mod hardware;
pub mod packages;
pub mod sensors;
pub mod system;
