use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use std::time::Instant;
use uuid::Uuid;

use crate::game::{Scorekeeper, TickScheduler, Ticker, TICK_INTERVAL};
use crate::models::{AppState, ClientMessage, ServerMessage};
use crate::websocket::commands::dispatch;

/// One browser tab: owns its match and the handle of its tick task.
///
/// Commands and ticks both run on this actor, so they never interleave.
pub struct ClockWebSocket {
    pub id: String,
    pub app_state: web::Data<AppState>,
    pub keeper: Scorekeeper,
    pub ticker: Ticker<SpawnHandle>,
}

impl ClockWebSocket {
    pub fn new(app_state: web::Data<AppState>) -> Self {
        let keeper = Scorekeeper::new(app_state.config.default_match.clone());
        ClockWebSocket {
            id: Uuid::new_v4().to_string(),
            app_state,
            keeper,
            ticker: Ticker::new(),
        }
    }
}

impl Actor for ClockWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let total_sessions = self.app_state.register(self.id.clone());
        info!("WebSocket connection started: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        self.send(&ServerMessage::state(&self.keeper), ctx);
    }

    fn stopping(&mut self, ctx: &mut Self::Context) -> Running {
        self.ticker.stop(ctx);

        let total_sessions = self.app_state.unregister(&self.id);
        info!("WebSocket connection closed: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        Running::Stop
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ClockWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                info!("Received text message on {}: {}", self.id, text);
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => self.handle_message(client_msg, ctx),
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        self.send(&ServerMessage::error(format!("Invalid message format: {}", e)), ctx);
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.send(&ServerMessage::error("Binary messages are not supported"), ctx);
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl TickScheduler for ws::WebsocketContext<ClockWebSocket> {
    type Handle = SpawnHandle;

    fn schedule(&mut self) -> SpawnHandle {
        self.run_interval(TICK_INTERVAL, |act, ctx| act.on_tick(ctx))
    }

    fn cancel(&mut self, handle: SpawnHandle) {
        self.cancel_future(handle);
    }
}

impl ClockWebSocket {
    pub fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match dispatch(&mut self.keeper, &mut self.ticker, ctx, msg, Instant::now()) {
            Ok(_) => self.send(&ServerMessage::state(&self.keeper), ctx),
            Err(e) => {
                warn!("Rejected command on {}: {}", self.id, e);
                self.send(&ServerMessage::error(e), ctx);
            }
        }
    }

    fn on_tick(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let now = Instant::now();
        let elapsed = self.ticker.lap(now);
        match self.keeper.tick(elapsed) {
            Some(seat) => {
                info!("Session {}: {} flagged", self.id, seat);
                self.ticker.sync(self.keeper.is_running(), ctx, now);
                self.send(&ServerMessage::state(&self.keeper), ctx);
            }
            None => self.send(&ServerMessage::tick(&self.keeper), ctx),
        }
    }

    fn send(&self, message: &ServerMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(message) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                warn!("Failed to serialize response: {}", e);
                ctx.text("{\"message_type\": \"error\", \"error\": \"Internal server error\"}");
            }
        }
    }
}

// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = ClockWebSocket::new(app_state.clone());
    info!("New WebSocket connection: {}", session.id);
    ws::start(session, &req, stream)
}
