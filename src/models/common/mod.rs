pub mod pagination;
pub mod response;
pub mod submission_status;

pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
pub use submission_status::SubmissionStatus;
