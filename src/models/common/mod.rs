pub mod error_code;
pub mod pagination;
pub mod response;
pub mod votes;

pub use error_code::ErrorCode;
pub use pagination::{MAX_PAGE_SIZE, PaginatedResponse, PaginationInfo, PaginationQuery, page_bounds};
pub use response::ApiResponse;
pub use votes::{VoteKind, VoteLedger, VoteRequest, VoteSummary};
