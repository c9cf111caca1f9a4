//! Cardroom Backend Binary
//!
//! Hosts the HTTP room-administration routes and the live WebSocket
//! game server on BIND_ADDR (e.g. 0.0.0.0:8888).

#[tokio::main]
async fn main() {
    cardroom_core::log();
    cardroom_core::kys();
    cardroom_core::brb();
    cardroom_server::run().await.unwrap();
}
