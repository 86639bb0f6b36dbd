mod fetch;
mod sync;
mod token;
mod upload;

pub use fetch::*;
pub use sync::*;
pub use token::*;
pub use upload::*;
