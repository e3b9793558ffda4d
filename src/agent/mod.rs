pub use dispatch::dispatch;
pub use session::connect;
pub use validate::validate;

mod dispatch;
mod session;
mod validate;
