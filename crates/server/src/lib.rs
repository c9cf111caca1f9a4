//! Unified backend server
//!
//! HTTP room administration and live game hosting behind a single
//! actix-web server.
//!
//! ## Submodules
//!
//! - [`hosting`] — the room-handle map and the WebSocket game-hosting bridge

pub mod hosting;

pub use hosting::Casino;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use cardroom_identity::Identity;
use cardroom_identity::Leaderboard;
use cardroom_identity::StatisticsSink;
use cardroom_identity::StubIdentity;
use cardroom_identity::StubLeaderboard;
use cardroom_identity::StubStatisticsSink;
use std::sync::Arc;

async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[rustfmt::skip]
pub async fn run() -> Result<(), std::io::Error> {
    let identity: Arc<dyn Identity> = Arc::new(StubIdentity::new());
    let statistics: Arc<dyn StatisticsSink> = Arc::new(StubStatisticsSink);
    let leaderboard: Arc<dyn Leaderboard> = Arc::new(StubLeaderboard);
    let casino = web::Data::new(Arc::new(Casino::new(identity, statistics, leaderboard)));
    log::info!("starting cardroom server");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(casino.clone())
            .route("/health", web::get().to(health))
            .service(
                web::scope("/room")
                    .route("", web::post().to(hosting::handlers::create_room))
                    .route("", web::get().to(hosting::handlers::list_rooms)),
            )
            .route("/ws", web::get().to(hosting::handlers::connect))
    })
    .workers(4)
    .bind(std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8888".to_string()))?
    .run()
    .await
}
