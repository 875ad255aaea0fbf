pub mod answer;
pub mod question;
pub mod user;
pub mod user_state;

pub use answer::*;
pub use question::*;
pub use user::*;
pub use user_state::*;
