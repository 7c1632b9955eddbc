mod requests;
mod responses;

pub use requests::{DateRange, LoginRequest, RefreshRequest, TruncateRequest, UploadRequest};
pub use responses::{ApiResponse, LoginResponse, RefreshResponse, Reply, SucursalesEnvelope};
