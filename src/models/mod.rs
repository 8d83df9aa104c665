pub mod grant;
pub mod room;
pub mod session;

pub use grant::{Claims, VideoGrant};
pub use room::{
    DeleteRoomResponse, DeleteRoomResult, ListRoomsResponse, PlatformRoom, RoomSummary,
    RoomsResponse,
};
pub use session::{LoginRequest, LoginResponse, SubmittedPassword, TokenQuery, TokenResponse};
