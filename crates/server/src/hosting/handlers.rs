//! HTTP and WebSocket route handlers (§6 "HTTP surface"). Room creation
//! and listing are plain REST; `/ws` upgrades into the per-connection
//! [`bridge`](super::bridge).

use std::sync::Arc;

use actix_web::web;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use cardroom_room::RoomConfig;
use serde::Deserialize;

use super::Casino;

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub config: Option<RoomConfig>,
}

pub async fn create_room(casino: web::Data<Arc<Casino>>, body: web::Json<CreateRoomRequest>) -> impl Responder {
    let request = body.into_inner();
    let config = request.config.unwrap_or_default();
    match casino.create_room(request.name, request.private, config) {
        Ok(code) => HttpResponse::Ok().json(serde_json::json!({ "room_code": code })),
        Err(error) => HttpResponse::BadRequest().json(serde_json::json!({
            "code": error.code(),
            "message": error.to_string(),
        })),
    }
}

pub async fn list_rooms(casino: web::Data<Arc<Casino>>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "rooms": casino.room_codes() }))
}

pub async fn connect(
    casino: web::Data<Arc<Casino>>,
    req: HttpRequest,
    body: web::Payload,
) -> actix_web::Result<impl Responder> {
    let (response, session, stream) = actix_ws::handle(&req, body)?;
    let casino = casino.into_inner();
    actix_web::rt::spawn(super::bridge(casino, session, stream));
    Ok(response)
}
