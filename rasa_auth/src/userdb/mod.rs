mod errors;
mod storage;
mod types;

pub use errors::UserError;
pub use storage::AdminUserStore;
pub use types::{AdminUser, NewAdminUser};

pub(crate) use storage::MemoryUserTable;
