pub mod gap;
pub mod pid;

pub use gap::GapController;
pub use pid::Pid;
