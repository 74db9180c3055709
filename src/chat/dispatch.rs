//! Command dispatch.
//!
//! One entry point per inbound line: parse, run the shared authentication
//! guard, then route the command to its handler. Every protocol error ends
//! as a fixed text reply to the offending session only.

use tracing::{error, info};

use crate::lookup::IpLookup;

use super::command::{self, Command, Input};
use super::delivery::{self, Outbox};
use super::messages;
use super::registry::{
    BlockOutcome, BroadcastOutcome, KickOutcome, LeaveOutcome, LoginOutcome, PmOutcome, Registry,
    UserId,
};

/// What the session's read loop should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Disconnect,
}

/// Shared context handed to every session.
pub struct Context {
    pub registry: Registry,
    pub lookup: IpLookup,
}

/// Handle one inbound line from `user`.
pub async fn handle_line(ctx: &Context, user: UserId, outbox: &Outbox, line: &str) -> Control {
    match command::parse(line) {
        Input::Empty => Control::Continue,
        Input::Chat(text) => {
            handle_chat(ctx, user, outbox, &text).await;
            Control::Continue
        }
        Input::Command(cmd) => handle_command(ctx, user, outbox, cmd).await,
    }
}

async fn handle_chat(ctx: &Context, user: UserId, outbox: &Outbox, text: &str) {
    match ctx.registry.broadcast(user, text).await {
        BroadcastOutcome::NotAuthenticated => {
            delivery::send_one(outbox, messages::NOT_AUTHENTICATED.to_string())
        }
        BroadcastOutcome::NoActiveRoom => {
            delivery::send_one(outbox, messages::CHAT_NO_ROOM.to_string())
        }
        BroadcastOutcome::Sent(deliveries) => delivery::send_all(deliveries),
    }
}

async fn handle_command(ctx: &Context, user: UserId, outbox: &Outbox, cmd: Command) -> Control {
    info!(
        "user {} sent command {}",
        ctx.registry.display_name(user).await,
        cmd.verb()
    );

    // Single authorization guard shared by all handlers.
    if cmd.requires_auth() && !ctx.registry.is_authenticated(user).await {
        delivery::send_one(outbox, messages::NOT_AUTHENTICATED.to_string());
        return Control::Continue;
    }

    let reply = |line: String| delivery::send_one(outbox, line);

    match cmd {
        Command::Exit => return Control::Disconnect,

        Command::Info => reply(messages::INFO.to_string()),

        Command::Login(None) => reply(messages::INVALID_LOGIN.to_string()),
        Command::Login(Some(name)) => match ctx.registry.login(user, &name).await {
            LoginOutcome::AlreadyLoggedIn => reply(messages::ALREADY_LOGGED_IN.to_string()),
            LoginOutcome::EmptyName => reply(messages::INVALID_LOGIN.to_string()),
            LoginOutcome::Taken(name) => reply(messages::username_taken(&name)),
            LoginOutcome::LoggedIn { name, rooms } => {
                reply(messages::logged_in(&name, &rooms))
            }
        },

        Command::Logout => {
            ctx.registry.logout(user).await;
            reply(messages::LOGGED_OUT.to_string());
        }

        Command::Join(None) => reply(messages::INVALID_CHATROOM_JOIN.to_string()),
        Command::Join(Some(room)) => {
            let joined = ctx.registry.join(user, &room).await;
            reply(messages::joined_room(&joined.room, joined.members));
        }

        Command::Leave(None) => reply(messages::INVALID_CHATROOM_LEAVE.to_string()),
        Command::Leave(Some(room)) => match ctx.registry.leave(user, &room).await {
            LeaveOutcome::NotInRoom(room) => reply(messages::not_in_that_room(&room)),
            LeaveOutcome::Left(room) => reply(messages::left_room(&room)),
        },

        Command::Kick {
            room: Some(room),
            name: Some(name),
        } => match ctx.registry.kick(user, &room, &name).await {
            // Failed authority checks stay silent on purpose.
            KickOutcome::RoomNotFound | KickOutcome::NotAdmin => {}
            KickOutcome::Kicked { notices, .. } => delivery::send_all(notices),
        },
        Command::Kick { .. } => reply(messages::INVALID_KICK.to_string()),

        Command::Block(None) => reply(messages::INVALID_IGNORE.to_string()),
        Command::Block(Some(name)) => match ctx.registry.block(user, &name).await {
            BlockOutcome::SelfBlock => reply(messages::BLOCK_SELF.to_string()),
            BlockOutcome::UnknownUser => reply(messages::USER_OFFLINE.to_string()),
            BlockOutcome::Blocked(name) => reply(messages::blocking(&name)),
        },

        Command::Blocked => {
            let names = ctx.registry.blocked_names(user).await;
            reply(messages::blocked_list(&names));
        }

        Command::Pm {
            to: Some(to),
            text: Some(text),
        } => match ctx.registry.private_message(user, &to, &text).await {
            PmOutcome::SelfTarget => reply(messages::PM_SELF.to_string()),
            PmOutcome::Offline => reply(messages::USER_OFFLINE.to_string()),
            PmOutcome::DroppedBlocked => reply(messages::PM_UNDELIVERED.to_string()),
            PmOutcome::Sent(d) => delivery::send_one(&d.to, d.line),
        },
        Command::Pm { .. } => reply(messages::INVALID_WHISPER.to_string()),

        Command::Channels => {
            let rooms = ctx.registry.rooms().await;
            if rooms.is_empty() {
                reply(messages::NO_CHATROOMS_EXIST.to_string());
            } else {
                reply(messages::room_listing(&rooms));
            }
        }

        Command::Channel => match ctx.registry.active_room(user).await {
            Some(room) => reply(messages::active_room(&room)),
            None => reply(messages::NOT_IN_ROOM.to_string()),
        },

        Command::Chatters(None) => reply(messages::INVALID_CHATROOM_MEMBERS.to_string()),
        Command::Chatters(Some(room)) => match ctx.registry.chatters(&room).await {
            Some(count) => reply(messages::chatters(&room, count)),
            None => reply(messages::not_active_room(&room)),
        },

        Command::Users => {
            let count = ctx.registry.user_count().await;
            reply(messages::connected_users(count));
        }

        Command::WhoAmI => {
            let name = ctx.registry.display_name(user).await;
            reply(messages::whoami(&name));
        }

        Command::MyIp => match ctx.lookup.my_ip().await {
            Ok(ip) => reply(messages::your_ip(&ip)),
            Err(e) => {
                error!("IP lookup failed: {}", e);
                reply(messages::LOOKUP_FAILED.to_string());
            }
        },

        Command::Unknown(_) => reply(messages::INVALID_COMMAND.to_string()),
    }

    Control::Continue
}
