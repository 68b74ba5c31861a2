mod memory;
mod postgres;
mod sqlite;
mod store_type;

pub use store_type::AdminUserStore;

pub(crate) use memory::MemoryUserTable;
