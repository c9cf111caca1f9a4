//! Per-connection WebSocket pump (§4.8 "Client Transport", §6 "Command
//! frames"/"Event frames"). A socket starts unauthenticated and
//! unseated; it must authenticate and join (or rejoin) a room before any
//! gameplay frame is accepted, then settles into two independent halves:
//! an [`Actor`] forwarding the room's events out, and this function's own
//! loop decoding inbound frames and routing them to the room's
//! [`Scheduler`] as [`Request`]s.

use std::sync::Arc;

use cardroom_transport::Actor;
use cardroom_transport::ClientFrame;
use cardroom_transport::OutboundSink;
use cardroom_transport::Protocol;
use cardroom_transport::Request;
use cardroom_transport::ServerMessage;
use futures::StreamExt;
use tokio::sync::mpsc::unbounded_channel;

use super::Casino;

/// Wraps an `actix_ws::Session` as the write half an [`Actor`] owns.
struct WsSink(actix_ws::Session);

#[async_trait::async_trait]
impl OutboundSink for WsSink {
    async fn send(&mut self, message: ServerMessage) -> bool {
        self.0.text(message.to_json()).await.is_ok()
    }
}

fn error_frame(code: &'static str, message: impl Into<String>) -> String {
    ServerMessage::Error { room: String::new(), at: now_millis(), code, message: message.into() }
        .to_json()
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Drives one accepted WebSocket upgrade end to end. Never returns an
/// error to its caller: every failure is reported to the client over the
/// socket itself and then the connection is closed (§7 "the connection is
/// never closed on an `EngineError`" governs *application* errors once
/// seated; handshake failures below are the one place a bad connection is
/// simply dropped).
pub async fn bridge(
    casino: Arc<Casino>,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    let (player, code, sender) = match handshake(&casino, &mut session, &mut stream).await {
        Some(seated) => seated,
        None => {
            let _ = session.close(None).await;
            return;
        }
    };

    let (event_tx, event_rx) = unbounded_channel();
    if sender.send(Request::Attach { player, sender: event_tx }).is_err() {
        let _ = session.close(None).await;
        return;
    }
    Actor::spawn(player, code, WsSink(session), event_rx);

    while let Some(frame) = stream.next().await {
        let request = match frame {
            Ok(actix_ws::Message::Text(text)) => match Protocol::decode(&text) {
                Ok(frame) => route(player, frame),
                Err(error) => {
                    log::warn!("[bridge {player}] {error}");
                    None
                }
            },
            Ok(actix_ws::Message::Close(_)) | Err(_) => break,
            Ok(actix_ws::Message::Ping(_)) | Ok(actix_ws::Message::Pong(_)) => None,
            _ => None,
        };
        if let Some(request) = request {
            if sender.send(request).is_err() {
                break;
            }
        }
    }

    let _ = sender.send(Request::Detach { player });
    let _ = sender.send(Request::Disconnected { player });
    casino.detach(player);
}

/// Waits for `Authenticate` then `JoinRoom`, resolving to a seated
/// `(player, room code, scheduler sender)` on success. A socket that sends
/// anything else first, or whose identity/room lookup fails, is rejected.
async fn handshake(
    casino: &Arc<Casino>,
    session: &mut actix_ws::Session,
    stream: &mut actix_ws::MessageStream,
) -> Option<(cardroom_core::PlayerId, String, tokio::sync::mpsc::UnboundedSender<Request>)> {
    let mut user = None;
    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(actix_ws::Message::Text(text)) => text,
            Ok(actix_ws::Message::Close(_)) | Err(_) => return None,
            _ => continue,
        };
        let frame = match Protocol::decode(&text) {
            Ok(frame) => frame,
            Err(error) => {
                let _ = session.text(error_frame("INVALID_FRAME", error.to_string())).await;
                continue;
            }
        };
        match frame {
            ClientFrame::Authenticate { token } => {
                match casino.identity().validate_token(&token).await {
                    Ok(authenticated) => user = Some(authenticated),
                    Err(error) => {
                        let _ = session.text(error_frame("INVALID_TOKEN", error.to_string())).await;
                    }
                }
            }
            ClientFrame::JoinRoom { code, nickname } => {
                let identity_user = user.as_ref().map(|u| u.user_id.clone());
                if let Some(identity_user) = identity_user.clone() {
                    if let Ok((player, sender)) = casino.rejoin(&code, &identity_user).await {
                        let _ = sender.send(Request::Reconnected { player });
                        return Some((player, code, sender));
                    }
                }
                let email = user
                    .as_ref()
                    .map(|u| u.email.clone())
                    .unwrap_or_else(|| format!("anonymous-{}@cardroom.local", uuid::Uuid::new_v4()));
                match casino.join(&code, nickname, identity_user, email).await {
                    Ok((player, sender)) => return Some((player, code, sender)),
                    Err(error) => {
                        let _ = session.text(error_frame(error.code(), error.to_string())).await;
                    }
                }
            }
            _ => {
                let _ = session.text(error_frame("AUTH_REQUIRED", "authenticate and join a room first")).await;
            }
        }
    }
    None
}

fn route(player: cardroom_core::PlayerId, frame: ClientFrame) -> Option<Request> {
    match frame {
        ClientFrame::Authenticate { .. } | ClientFrame::JoinRoom { .. } => None,
        ClientFrame::LeaveRoom => Some(Request::Leave { player }),
        ClientFrame::AddBot => Some(Request::AddBot { requester: player }),
        ClientFrame::RemoveBot { bot } => Some(Request::RemoveBot { requester: player, bot }),
        ClientFrame::Kick { player: target } => Some(Request::Kick { requester: player, target }),
        ClientFrame::StartGame => Some(Request::StartGame { requester: player }),
        ClientFrame::PlayCard { card, declared_color, call_one } => {
            Some(Request::Play { player, card, declared_color, call_one })
        }
        ClientFrame::DrawCard => Some(Request::Draw { player }),
        ClientFrame::CallOne => Some(Request::CallOne { player }),
        ClientFrame::CatchOne { target } => Some(Request::CatchOne { accuser: player, target }),
    }
}
