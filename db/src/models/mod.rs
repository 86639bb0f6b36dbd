pub mod cert;
pub mod record_id;

pub use cert::*;
pub use record_id::*;
