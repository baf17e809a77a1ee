//! Request and response DTOs for the Memwall API.

mod request;
mod response;

pub use request::{
    CommentRequest, CreateClassRequest, CreateMarketItemRequest, GenerateCodesRequest,
    LoginRequest, RegisterRequest, UpdateItemStatusRequest,
};
pub use response::{
    ApiResponse, ClassDetailResponse, CommentInfo, CreatedPostResponse, InviteCodeInfo,
    MarketItemInfo, MessageResponse, PostActionResponse, PostInfo, RegisterResponse, UserInfo,
};
