/**
 * API Route Table
 *
 * All routes are `POST` with JSON bodies, mounted at the root.
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /preLogin` - Does an account exist for this identity?
 * - `POST /register` - Create an account and log it in
 * - `POST /login` - Exchange credentials for a session
 * - `POST /logout` - Drop the presented session (always succeeds)
 *
 * ## Rooms
 * - `POST /createRoom` - Find or create a room by title
 */

use axum::routing::post;
use axum::Router;

use crate::backend::auth::handlers::{login, logout, pre_login, register};
use crate::backend::rooms::handlers::create_room;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with the auth and room routes configured
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route("/preLogin", post(pre_login))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        // Rooms
        .route("/createRoom", post(create_room))
}
