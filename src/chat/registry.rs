//! Process-wide chat registry.
//!
//! The registry owns the canonical lists of connected users and chatrooms.
//! A single mutex guards every read-modify-write sequence (name-uniqueness
//! check + claim, find-or-create room, admin check + kick, block-set
//! mutation), so none of them can interleave across connections. Operations
//! that fan out return recipient snapshots as [`Delivery`] batches; the
//! actual queue handoff happens outside the lock.

use std::collections::HashSet;
use std::fmt;

use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use super::delivery::{self, Delivery, Outbox};
use super::messages;

/// Opaque user identity, assigned at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn placeholder_name(id: UserId) -> String {
    format!("User-{}", id.0)
}

/// One connected user.
struct UserEntry {
    id: UserId,
    name: String,
    authenticated: bool,
    blocked: HashSet<UserId>,
    active_room: Option<String>,
    outbox: Outbox,
}

/// One chatroom. The admin is the creator's identity and never changes;
/// admin authority is independent of the admin's own membership.
struct Room {
    name: String,
    admin: UserId,
    members: Vec<UserId>,
}

#[derive(Default)]
struct Inner {
    /// Connected users in connect order.
    users: Vec<UserEntry>,
    /// Rooms in creation order. Rooms are never reaped when they empty out.
    rooms: Vec<Room>,
}

impl Inner {
    fn user(&self, id: UserId) -> Option<&UserEntry> {
        self.users.iter().find(|u| u.id == id)
    }

    fn user_mut(&mut self, id: UserId) -> Option<&mut UserEntry> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    fn user_by_name(&self, name: &str) -> Option<&UserEntry> {
        self.users.iter().find(|u| u.name == name)
    }

    fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }

    fn room_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.name == name)
    }

    fn room_listing(&self) -> Vec<(String, usize)> {
        self.rooms
            .iter()
            .map(|r| (r.name.clone(), r.members.len()))
            .collect()
    }
}

/// Details of a freshly connected user.
pub struct ConnectInfo {
    pub id: UserId,
    pub name: String,
    pub online: usize,
}

/// Result of a login attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    AlreadyLoggedIn,
    EmptyName,
    Taken(String),
    LoggedIn {
        name: String,
        rooms: Vec<(String, usize)>,
    },
}

/// Result of joining a room.
#[derive(Debug, PartialEq, Eq)]
pub struct Joined {
    pub room: String,
    pub members: usize,
    pub created: bool,
}

/// Result of leaving a room.
#[derive(Debug, PartialEq, Eq)]
pub enum LeaveOutcome {
    NotInRoom(String),
    Left(String),
}

/// Result of a kick attempt. Failed authority checks are deliberately
/// silent: the dispatcher sends nothing for `RoomNotFound` and `NotAdmin`.
pub enum KickOutcome {
    RoomNotFound,
    NotAdmin,
    Kicked { count: usize, notices: Vec<Delivery> },
}

/// Result of a block request.
#[derive(Debug, PartialEq, Eq)]
pub enum BlockOutcome {
    SelfBlock,
    UnknownUser,
    Blocked(String),
}

/// Result of a room broadcast.
pub enum BroadcastOutcome {
    NotAuthenticated,
    NoActiveRoom,
    Sent(Vec<Delivery>),
}

/// Result of a private-message send.
pub enum PmOutcome {
    SelfTarget,
    Offline,
    DroppedBlocked,
    Sent(Delivery),
}

/// Shared registry of users and rooms.
#[derive(Default)]
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection. The user starts unauthenticated with an
    /// id-derived placeholder name.
    pub async fn connect(&self, outbox: Outbox) -> ConnectInfo {
        let mut inner = self.inner.lock().await;
        let id = UserId::new();
        let name = placeholder_name(id);
        inner.users.push(UserEntry {
            id,
            name: name.clone(),
            authenticated: false,
            blocked: HashSet::new(),
            active_room: None,
            outbox,
        });
        let online = inner.users.len();
        info!("user {} connected ({} online)", name, online);

        ConnectInfo { id, name, online }
    }

    /// Remove a disconnected user from the user list and from every room,
    /// and produce departure notices for every other connected user.
    pub async fn disconnect(&self, id: UserId) -> Vec<Delivery> {
        let mut inner = self.inner.lock().await;
        let Some(index) = inner.users.iter().position(|u| u.id == id) else {
            return Vec::new();
        };
        let user = inner.users.remove(index);

        for room in inner.rooms.iter_mut() {
            room.members.retain(|m| *m != id);
        }

        info!("user {} disconnected ({} online)", user.name, inner.users.len());

        let line = messages::user_left(&user.name, &delivery::timestamp());
        inner
            .users
            .iter()
            .map(|u| Delivery {
                to: u.outbox.clone(),
                line: line.clone(),
            })
            .collect()
    }

    pub async fn is_authenticated(&self, id: UserId) -> bool {
        let inner = self.inner.lock().await;
        inner.user(id).is_some_and(|u| u.authenticated)
    }

    pub async fn display_name(&self, id: UserId) -> String {
        let inner = self.inner.lock().await;
        inner.user(id).map(|u| u.name.clone()).unwrap_or_default()
    }

    /// Claim a display name. The uniqueness check only considers other
    /// currently-authenticated users and is case-sensitive.
    pub async fn login(&self, id: UserId, requested: &str) -> LoginOutcome {
        let mut inner = self.inner.lock().await;

        if inner.user(id).is_some_and(|u| u.authenticated) {
            return LoginOutcome::AlreadyLoggedIn;
        }
        if requested.is_empty() {
            return LoginOutcome::EmptyName;
        }
        if inner
            .users
            .iter()
            .any(|u| u.id != id && u.authenticated && u.name == requested)
        {
            return LoginOutcome::Taken(requested.to_string());
        }

        let rooms = inner.room_listing();
        if let Some(user) = inner.user_mut(id) {
            user.name = requested.to_string();
            user.authenticated = true;
        }
        info!("user {} logged in", requested);

        LoginOutcome::LoggedIn {
            name: requested.to_string(),
            rooms,
        }
    }

    /// Drop the claimed name, freeing it for others. Room memberships are
    /// kept; leaving still takes an explicit /leave.
    pub async fn logout(&self, id: UserId) {
        let mut inner = self.inner.lock().await;
        if let Some(user) = inner.user_mut(id) {
            let old = std::mem::replace(&mut user.name, placeholder_name(id));
            user.authenticated = false;
            info!("user {} logged out", old);
        }
    }

    /// Find-or-create-and-join. The creator of a new room becomes its
    /// admin. Joining a room the user is already a member of only moves
    /// the active-room reference.
    pub async fn join(&self, id: UserId, room_name: &str) -> Joined {
        let mut inner = self.inner.lock().await;

        let created = match inner.room_mut(room_name) {
            Some(room) => {
                if !room.members.contains(&id) {
                    room.members.push(id);
                }
                false
            }
            None => {
                inner.rooms.push(Room {
                    name: room_name.to_string(),
                    admin: id,
                    members: vec![id],
                });
                true
            }
        };

        let members = inner.room(room_name).map(|r| r.members.len()).unwrap_or(0);
        if let Some(user) = inner.user_mut(id) {
            user.active_room = Some(room_name.to_string());
        }
        if created {
            info!("chatroom {} created", room_name);
        }

        Joined {
            room: room_name.to_string(),
            members,
            created,
        }
    }

    /// Leave a room. Only valid when the named room is the user's active
    /// room.
    pub async fn leave(&self, id: UserId, room_name: &str) -> LeaveOutcome {
        let mut inner = self.inner.lock().await;

        let active = inner.user(id).and_then(|u| u.active_room.clone());
        if active.as_deref() != Some(room_name) {
            return LeaveOutcome::NotInRoom(room_name.to_string());
        }

        if let Some(room) = inner.room_mut(room_name) {
            room.members.retain(|m| *m != id);
        }
        if let Some(user) = inner.user_mut(id) {
            user.active_room = None;
        }

        LeaveOutcome::Left(room_name.to_string())
    }

    /// Kick every member of `room_name` whose display name is `target`.
    /// Authority is identity equality with the room's admin, so renaming
    /// the admin or the admin leaving the room changes nothing.
    pub async fn kick(&self, id: UserId, room_name: &str, target: &str) -> KickOutcome {
        let mut inner = self.inner.lock().await;

        let Some(room) = inner.room(room_name) else {
            return KickOutcome::RoomNotFound;
        };
        if room.admin != id {
            return KickOutcome::NotAdmin;
        }

        let kicked: Vec<UserId> = room
            .members
            .iter()
            .copied()
            .filter(|m| inner.user(*m).is_some_and(|u| u.name == target))
            .collect();

        if let Some(room) = inner.room_mut(room_name) {
            room.members.retain(|m| !kicked.contains(m));
        }

        let mut notices = Vec::new();
        for member in &kicked {
            if let Some(user) = inner.user_mut(*member) {
                if user.active_room.as_deref() == Some(room_name) {
                    user.active_room = None;
                }
                notices.push(Delivery {
                    to: user.outbox.clone(),
                    line: messages::you_were_kicked(room_name),
                });
            }
            if let Some(admin) = inner.user(id) {
                notices.push(Delivery {
                    to: admin.outbox.clone(),
                    line: messages::kicked_notice(target, room_name),
                });
            }
            info!("user {} kicked from chatroom {}", target, room_name);
        }

        KickOutcome::Kicked {
            count: kicked.len(),
            notices,
        }
    }

    /// Add the named user's identity to the requester's block set.
    pub async fn block(&self, id: UserId, target: &str) -> BlockOutcome {
        let mut inner = self.inner.lock().await;

        if inner.user(id).is_some_and(|u| u.name == target) {
            return BlockOutcome::SelfBlock;
        }
        let Some(target_id) = inner.user_by_name(target).map(|u| u.id) else {
            return BlockOutcome::UnknownUser;
        };

        if let Some(user) = inner.user_mut(id) {
            user.blocked.insert(target_id);
        }

        BlockOutcome::Blocked(target.to_string())
    }

    /// Display names of everyone in the requester's block set who is still
    /// connected.
    pub async fn blocked_names(&self, id: UserId) -> Vec<String> {
        let inner = self.inner.lock().await;
        let Some(user) = inner.user(id) else {
            return Vec::new();
        };
        inner
            .users
            .iter()
            .filter(|u| user.blocked.contains(&u.id))
            .map(|u| u.name.clone())
            .collect()
    }

    /// Fan a chat line out to the sender's active room. The sender never
    /// receives their own broadcast, and members whose block set contains
    /// the sender are skipped.
    pub async fn broadcast(&self, id: UserId, text: &str) -> BroadcastOutcome {
        let inner = self.inner.lock().await;

        let Some(sender) = inner.user(id) else {
            return BroadcastOutcome::NotAuthenticated;
        };
        if !sender.authenticated {
            return BroadcastOutcome::NotAuthenticated;
        }
        let Some(room) = sender.active_room.as_ref().and_then(|r| inner.room(r)) else {
            return BroadcastOutcome::NoActiveRoom;
        };

        let line = delivery::broadcast_line(&sender.name, text);
        info!("{}", line);

        let deliveries = room
            .members
            .iter()
            .filter(|m| **m != id)
            .filter_map(|m| inner.user(*m))
            .filter(|u| !u.blocked.contains(&id))
            .map(|u| Delivery {
                to: u.outbox.clone(),
                line: line.clone(),
            })
            .collect();

        BroadcastOutcome::Sent(deliveries)
    }

    /// Point-to-point message by exact display-name match. Fire-and-forget:
    /// nothing is queued for offline users, and a recipient who has blocked
    /// the sender silently loses the message (the sender is told delivery
    /// could not occur).
    pub async fn private_message(&self, id: UserId, to: &str, text: &str) -> PmOutcome {
        let inner = self.inner.lock().await;

        let Some(sender) = inner.user(id) else {
            return PmOutcome::Offline;
        };
        if sender.name == to {
            return PmOutcome::SelfTarget;
        }
        let Some(recipient) = inner.user_by_name(to) else {
            return PmOutcome::Offline;
        };
        if recipient.blocked.contains(&id) {
            return PmOutcome::DroppedBlocked;
        }

        let line = delivery::private_line(&sender.name, text);
        info!("{}", line);

        PmOutcome::Sent(Delivery {
            to: recipient.outbox.clone(),
            line,
        })
    }

    /// All rooms with member counts, in creation order.
    pub async fn rooms(&self) -> Vec<(String, usize)> {
        self.inner.lock().await.room_listing()
    }

    pub async fn active_room(&self, id: UserId) -> Option<String> {
        let inner = self.inner.lock().await;
        inner.user(id).and_then(|u| u.active_room.clone())
    }

    /// Member count of the named room, or `None` when no such room exists.
    pub async fn chatters(&self, room_name: &str) -> Option<usize> {
        let inner = self.inner.lock().await;
        inner.room(room_name).map(|r| r.members.len())
    }

    pub async fn user_count(&self) -> usize {
        self.inner.lock().await.users.len()
    }
}
