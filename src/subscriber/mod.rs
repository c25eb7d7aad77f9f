//! Subscriber identities and the tokens that remove them.

mod subscriber;
mod unsubscribe;

pub use subscriber::Subscriber;
pub use unsubscribe::Unsubscribe;
