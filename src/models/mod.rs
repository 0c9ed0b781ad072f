mod cursor;
mod filter;
mod predicate;
mod product;
mod user;

pub use cursor::*;
pub use filter::*;
pub use predicate::*;
pub use product::*;
pub use user::*;
