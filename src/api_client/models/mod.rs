mod sucursal;
mod table;
mod task;

pub use sucursal::{Sucursal, SyncConfigUpdate};
pub use table::{DatabaseStatus, TableList, TableSnapshot};
pub use task::{TaskHandle, TaskState, TaskStatus};
