mod binding_cache;
mod clock;
mod record_store;

pub use binding_cache::{Allocation, BindingCache};
pub use clock::{Clock, SystemClock};
pub use record_store::RecordStore;
