//! Rooms Module
//!
//! Idempotent room creation keyed by title.
//!
//! - **`resolver`** - find-or-create with elevated and anonymous chains
//! - **`handlers`** - POST /createRoom

/// Find-or-create flow
pub mod resolver;

/// HTTP handler
pub mod handlers;

pub use handlers::{create_room, CreateRoomRequest, CreateRoomResponse};
pub use resolver::{resolve_room, RoomResolution, RoomStep};
