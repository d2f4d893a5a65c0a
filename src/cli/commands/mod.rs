//! CLI command implementations.

mod doctor;
mod generate;
mod init;
mod serve;

pub use doctor::run_doctor;
pub use generate::run_generate;
pub use init::run_init;
pub use serve::run_serve;
