pub mod session_timer;

pub use session_timer::SessionTimer;
