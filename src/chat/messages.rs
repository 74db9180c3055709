//! Fixed server reply texts.
//!
//! Every protocol-level user error is answered with one of these lines;
//! none of them is ever propagated as an `Err`.

pub const INVALID_COMMAND: &str = "Invalid command. Type /info for help.";
pub const NOT_AUTHENTICATED: &str = "You must log in first. Use /login <username>.";
pub const ALREADY_LOGGED_IN: &str = "You are already logged in.";
pub const LOGGED_OUT: &str = "You have been logged out.";
pub const INVALID_LOGIN: &str = "Please enter a valid username.";
pub const INVALID_WHISPER: &str =
    "Please enter a username and message to send a private message.";
pub const INVALID_IGNORE: &str = "Please enter the username for who you are wanting to ignore.";
pub const INVALID_CHATROOM_JOIN: &str = "Please enter the name of the chatroom to join.";
pub const INVALID_CHATROOM_LEAVE: &str = "Please enter the name of the chatroom to leave.";
pub const INVALID_CHATROOM_MEMBERS: &str = "Please enter the name of the chatroom to list.";
pub const INVALID_KICK: &str = "Please enter the chatroom name and the username to kick.";
pub const NO_CHATROOMS_EXIST: &str =
    "No chatrooms are open right now. Use /join <chatroom> to create one.";
pub const NOT_IN_ROOM: &str = "You are not currently in a chat room.";
pub const CHAT_NO_ROOM: &str = "Join a chatroom to start chatting. Use /join <chatroom>.";
pub const USER_OFFLINE: &str = "user is not online";
pub const PM_SELF: &str = "You cannot send a private message to yourself.";
pub const PM_UNDELIVERED: &str = "Your message could not be delivered.";
pub const BLOCK_SELF: &str = "You cannot block yourself.";
pub const LOOKUP_FAILED: &str = "An error occurred retrieving your IP, try again later.";

pub const INFO: &str = "\
**************************************************************************
# COMMANDS
#
# /CHANNEL - Show your active chatroom.
# /CHANNELS - List all open chatrooms.
# /CHATTERS <chatroom> - Show how many users a chatroom has.
# /JOIN <chatroom> - Join a chatroom, creating it if it doesn't exist.
# /LEAVE <chatroom> - Leave a chatroom.
# /KICK <chatroom> <username> - Kick a user from a chatroom you admin.
# /BLOCK <username> - Block a user to stop seeing their messages.
# /BLOCKED - List the users you have blocked.
# /PM <username> <message> - Send a private message.
# /LOGIN <username> - Authenticate with the server.
# /LOGOUT - Log out.
# /USERS - Show how many users are connected.
# /WHOAMI - Show your current username.
# /MYIP - Show your public IP address.
# /INFO - Show this help.
# /EXIT - Disconnect.
**************************************************************************";

/// Welcome banner shown once per connection.
pub fn welcome(name: &str, online: usize) -> String {
    let count_line = if online <= 1 {
        "You are the only user on the server.".to_string()
    } else {
        format!("There are currently {online} users on the server.")
    };

    format!(
        "**************************************************************************\n\
         *  Welcome to parley. Your current username is {name}.\n\
         *  Enter /login <username> to pick your own name and join a chatroom.\n\
         *  For the full command list, enter /info.\n\
         *  {count_line}\n\
         **************************************************************************"
    )
}

/// Announcement broadcast when a user disconnects.
pub fn user_left(name: &str, time: &str) -> String {
    format!(
        "**************** Server Announcement ****************\n\
         {name} left the server at {time}\n\
         *****************************************************"
    )
}

pub fn username_taken(name: &str) -> String {
    format!("Username: {name} is already in use.")
}

/// Login confirmation listing the rooms currently open.
pub fn logged_in(name: &str, rooms: &[(String, usize)]) -> String {
    if rooms.is_empty() {
        format!("You are now logged in as {name}. {NO_CHATROOMS_EXIST}")
    } else {
        let listing: Vec<String> = rooms
            .iter()
            .map(|(room, count)| format!("{room} ({count})"))
            .collect();
        format!(
            "You are now logged in as {name}. Open chatrooms: {}",
            listing.join(", ")
        )
    }
}

pub fn joined_room(room: &str, members: usize) -> String {
    format!("You joined chatroom: {room}. Users in chatroom: {members}.")
}

pub fn left_room(room: &str) -> String {
    format!("You have left chatroom: {room}.")
}

pub fn not_in_that_room(room: &str) -> String {
    format!("You are not in chatroom: {room}.")
}

pub fn kicked_notice(name: &str, room: &str) -> String {
    format!("User: {name} kicked from chatroom: {room}.")
}

pub fn you_were_kicked(room: &str) -> String {
    format!("You have been kicked from chatroom: {room}.")
}

pub fn blocking(name: &str) -> String {
    format!("{name} is being ignored.")
}

pub fn blocked_list(names: &[String]) -> String {
    if names.is_empty() {
        "You are not blocking anyone.".to_string()
    } else {
        format!("Blocked users: {}", names.join(", "))
    }
}

pub fn room_listing(rooms: &[(String, usize)]) -> String {
    let lines: Vec<String> = rooms
        .iter()
        .map(|(room, count)| format!("{room} - Users in chatroom: {count}"))
        .collect();
    lines.join("\n")
}

pub fn active_room(room: &str) -> String {
    format!("Your active chatroom is: {room}")
}

pub fn chatters(room: &str, count: usize) -> String {
    format!("Chatroom: {room} has {count} current users.")
}

pub fn not_active_room(room: &str) -> String {
    format!("Chatroom: {room} is not an active chat room.")
}

pub fn connected_users(count: usize) -> String {
    format!("Currently {count} users connected to server.")
}

pub fn whoami(name: &str) -> String {
    format!("You are: {name}")
}

pub fn your_ip(ip: &str) -> String {
    format!("Your IP: {ip}")
}
