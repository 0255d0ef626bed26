//! Per-session controller.
//!
//! [`Session`] owns every piece of client state and is the only thing that
//! mutates it. It is a pure state machine: user intents and inbound events
//! go in, [`SessionAction`]s come out, and the caller performs the I/O.

use std::collections::BTreeSet;

use roomlink_proto::{
    ClientEvent, ConversationSummary, PeerId, RoomName, ServerEvent, WireDirectMessage,
    WireMessage,
    server::{
        Conversations, DirectHistory, DirectMessageSent, ErrorReport, MarkReadConfirmed,
        MemberChange, MessageHistory, OlderMessages, RoomCreated, RoomMembers,
    },
};

use crate::{
    config::SessionConfig,
    error::SessionError,
    event::{SessionAction, SessionEvent},
    message::Message,
    render::{Notice, NoticeLevel, RenderInstruction},
    roster::PresenceRoster,
    router::{Discard, DirectRoute, EventRouter},
    unread::UnreadTracker,
    view::{ViewContext, ViewMode, ViewState},
    window::{AppendOutcome, MessageWindow},
};

/// Client state for one authenticated user.
///
/// Created once per login and kept across reconnects. Nothing cached here
/// is trusted after a disconnect: [`SessionEvent::Connected`] re-requests
/// every snapshot.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    connected: bool,
    view: ViewState,
    window: MessageWindow,
    unread: UnreadTracker,
    roster: PresenceRoster,
    rooms: Vec<RoomName>,
    conversations: Vec<ConversationSummary>,
    pending_mark_read: BTreeSet<PeerId>,
    // Peers whose messages arrived after the mark-read request went out.
    unread_since_mark_read: BTreeSet<PeerId>,
    peer_name: Option<String>,
}

impl Session {
    /// Disconnected session showing the configured default room.
    pub fn new(config: SessionConfig) -> Self {
        let room = config.default_room.clone();

        Self {
            view: ViewState::new(room.clone()),
            window: MessageWindow::new(ViewContext::Room(room.clone())),
            roster: PresenceRoster::new(room),
            unread: UnreadTracker::new(),
            rooms: Vec::new(),
            conversations: Vec::new(),
            pending_mark_read: BTreeSet::new(),
            unread_since_mark_read: BTreeSet::new(),
            peer_name: None,
            connected: false,
            config,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether the transport is connected.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// What is on screen.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Messages of the conversation on screen.
    pub fn window(&self) -> &MessageWindow {
        &self.window
    }

    /// Unread direct-message counters.
    pub fn unread(&self) -> &UnreadTracker {
        &self.unread
    }

    /// Members of the active room.
    pub fn roster(&self) -> &PresenceRoster {
        &self.roster
    }

    /// Last room list received.
    pub fn rooms(&self) -> &[RoomName] {
        &self.rooms
    }

    /// Last conversation list received.
    pub fn conversations(&self) -> &[ConversationSummary] {
        &self.conversations
    }

    /// Peers with a mark-read request awaiting confirmation.
    pub fn pending_mark_read(&self) -> &BTreeSet<PeerId> {
        &self.pending_mark_read
    }

    /// Display name of the direct-conversation peer on screen.
    pub fn peer_name(&self) -> Option<&str> {
        self.peer_name.as_deref()
    }

    /// Show `room`. A no-op if it is already on screen.
    ///
    /// Leaves the previously subscribed room if it differs.
    pub fn switch_to_room(&mut self, room: impl Into<RoomName>) -> Vec<SessionAction> {
        let room = room.into();
        if self.view.is_viewing_room(&room) {
            return Vec::new();
        }

        let transition = self.view.switch_to_room(room.clone());
        tracing::info!(from = %transition.from, %room, "switching room");

        let mut actions = Vec::new();
        if let Some(left) = transition.left_room {
            actions.push(SessionAction::Emit(ClientEvent::LeaveRoom { room: left }));
        }
        self.peer_name = None;
        self.enter_room(&room, true, &mut actions);
        actions
    }

    /// Open the direct conversation with `peer`.
    ///
    /// Requests the conversation history and marks the peer's messages read.
    /// The unread counter is cleared when the server confirms.
    pub fn start_direct_message(
        &mut self,
        peer: PeerId,
        peer_name: impl Into<String>,
    ) -> Result<Vec<SessionAction>, SessionError> {
        if peer == self.config.local_user.id {
            return Err(SessionError::SelfMessage { peer_id: peer });
        }
        if self.view.is_viewing_peer(peer) {
            return Ok(Vec::new());
        }

        let transition = self.view.start_direct_message(peer);
        tracing::info!(from = %transition.from, peer_id = peer, "opening direct conversation");

        self.peer_name = Some(peer_name.into());
        self.window.reset(transition.to.clone());

        let mut actions = vec![SessionAction::Render(RenderInstruction::ViewChanged {
            context: transition.to,
            title: self.peer_name.clone(),
        })];
        actions.push(SessionAction::Emit(ClientEvent::StartDirectMessage { recipient_id: peer }));
        self.request_mark_read(peer, &mut actions);
        Ok(actions)
    }

    /// Go back to the last room shown. A no-op in room mode.
    pub fn return_to_rooms(&mut self) -> Vec<SessionAction> {
        if self.view.mode() == ViewMode::Room {
            return Vec::new();
        }

        let transition = self.view.return_to_rooms();
        tracing::info!(from = %transition.from, to = %transition.to, "returning to rooms");

        let room = self.view.last_room().to_string();
        let mut actions = Vec::new();
        self.peer_name = None;
        // Still subscribed; the roster went stale while frozen.
        self.enter_room(&room, false, &mut actions);
        actions.push(SessionAction::Emit(ClientEvent::GetRoomMembers { room }));
        actions
    }

    /// Send `text` to the conversation on screen and echo it locally.
    pub fn send_message(&mut self, text: &str) -> Result<Vec<SessionAction>, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        let len = text.chars().count();
        if len > self.config.max_message_len {
            return Err(SessionError::MessageTooLong { len, max: self.config.max_message_len });
        }

        let context = self.view.context();
        let emit = match &context {
            ViewContext::Room(room) => {
                ClientEvent::SendMessage { message: text.to_string(), room: room.clone() }
            },
            ViewContext::Direct(peer) => {
                ClientEvent::SendDirectMessage { recipient_id: *peer, message: text.to_string() }
            },
        };

        let local = &self.config.local_user;
        let echo = Message::local_echo(context.clone(), local.id, local.username.clone(), text);

        let mut actions = vec![SessionAction::Emit(emit)];
        if self.window.append_live(echo.clone()) == AppendOutcome::Appended {
            actions.push(SessionAction::Render(RenderInstruction::MessageAppended {
                context,
                message: echo,
                autoscroll: true,
            }));
        }
        Ok(actions)
    }

    /// Ask the server to create a room. The name is trimmed first.
    pub fn create_room(&mut self, name: &str) -> Result<Vec<SessionAction>, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyRoomName);
        }

        let len = name.chars().count();
        if len < self.config.room_name_min {
            return Err(SessionError::RoomNameTooShort { len, min: self.config.room_name_min });
        }
        if len > self.config.room_name_max {
            return Err(SessionError::RoomNameTooLong { len, max: self.config.room_name_max });
        }

        Ok(vec![SessionAction::Emit(ClientEvent::CreateRoom { room_name: name.to_string() })])
    }

    /// Request the page of history preceding what is on screen.
    ///
    /// Does nothing while a request is in flight, when no older messages
    /// exist, or outside room mode.
    pub fn load_older(&mut self) -> Vec<SessionAction> {
        let Some(request) = self.window.begin_older(&self.view.context(), self.config.page_size)
        else {
            tracing::debug!(
                loading = self.window.is_loading_older(),
                has_more = self.window.has_more(),
                "older page not requested"
            );
            return Vec::new();
        };

        vec![
            SessionAction::Emit(ClientEvent::LoadOlderMessages {
                room: request.room,
                offset: request.offset,
                limit: request.limit,
            }),
            SessionAction::Render(RenderInstruction::LoadingOlder { active: true }),
        ]
    }

    /// Request a fresh conversation list.
    pub fn refresh_conversations(&self) -> Vec<SessionAction> {
        vec![SessionAction::Emit(ClientEvent::GetConversations)]
    }

    /// Request a fresh room list.
    pub fn refresh_rooms(&self) -> Vec<SessionAction> {
        vec![SessionAction::Emit(ClientEvent::GetRooms)]
    }

    /// Process an event and return the actions it produces.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        match event {
            SessionEvent::Connected => self.handle_connected(),
            SessionEvent::Disconnected => self.handle_disconnected(),
            SessionEvent::Server(event) => self.handle_server(event),
        }
    }

    fn handle_connected(&mut self) -> Vec<SessionAction> {
        self.connected = true;
        tracing::info!(context = %self.view.context(), "connected, resubscribing");

        let mut actions = vec![
            SessionAction::Render(RenderInstruction::ConnectionChanged { connected: true }),
            SessionAction::Emit(ClientEvent::GetRooms),
            SessionAction::Emit(ClientEvent::GetConversations),
        ];

        let room = self.view.last_room().to_string();
        match self.view.context() {
            ViewContext::Room(_) => {
                self.enter_room(&room, true, &mut actions);
                actions.push(SessionAction::Emit(ClientEvent::GetRoomMembers { room }));
            },
            ViewContext::Direct(peer) => {
                // Keep the room subscription alive for when the user returns.
                self.roster.reset(room.clone());
                actions.push(SessionAction::Emit(ClientEvent::JoinRoom { room }));

                let context = ViewContext::Direct(peer);
                self.window.reset(context.clone());
                actions.push(SessionAction::Render(RenderInstruction::ViewChanged {
                    context,
                    title: self.peer_name.clone(),
                }));
                actions.push(SessionAction::Emit(ClientEvent::StartDirectMessage {
                    recipient_id: peer,
                }));
                self.request_mark_read(peer, &mut actions);
            },
        }
        actions
    }

    fn handle_disconnected(&mut self) -> Vec<SessionAction> {
        self.connected = false;
        tracing::info!(
            pending_mark_read = self.pending_mark_read.len(),
            loading_older = self.window.is_loading_older(),
            "disconnected, abandoning pending requests"
        );

        let mut actions =
            vec![SessionAction::Render(RenderInstruction::ConnectionChanged { connected: false })];
        if self.window.is_loading_older() {
            actions.push(SessionAction::Render(RenderInstruction::LoadingOlder { active: false }));
        }
        self.window.abandon_pending();
        self.pending_mark_read.clear();
        self.unread_since_mark_read.clear();
        actions
    }

    fn handle_server(&mut self, event: ServerEvent) -> Vec<SessionAction> {
        match event {
            ServerEvent::RoomList(list) => {
                self.rooms = list.rooms;
                vec![SessionAction::Render(RenderInstruction::RoomListChanged {
                    rooms: self.rooms.clone(),
                    active: Some(self.view.last_room().to_string()),
                })]
            },
            ServerEvent::RoomMembers(members) => self.handle_room_members(members),
            ServerEvent::MemberJoined(change) => self.handle_member_change(change, true),
            ServerEvent::MemberLeft(change) => self.handle_member_change(change, false),
            ServerEvent::RoomCreated(created) => self.handle_room_created(created),
            ServerEvent::NewMessage(message) => self.handle_new_message(message),
            ServerEvent::MessageHistory(history) => self.handle_message_history(history),
            ServerEvent::OlderMessagesLoaded(page) => self.handle_older_messages(page),
            ServerEvent::LoadOlderFailed(report) => {
                let mut actions = Vec::new();
                if self.window.fail_older() {
                    actions.push(SessionAction::Render(RenderInstruction::LoadingOlder {
                        active: false,
                    }));
                }
                let fallback = "could not load older messages";
                actions.push(notice(NoticeLevel::Warning, &report, fallback));
                actions
            },
            ServerEvent::HistoryFailed(report) => {
                vec![notice(NoticeLevel::Error, &report, "could not load message history")]
            },
            ServerEvent::Conversations(conversations) => self.handle_conversations(conversations),
            ServerEvent::NewDirectMessage(message) => self.handle_direct_message(message),
            ServerEvent::DirectMessageHistory(history) => self.handle_direct_history(history),
            ServerEvent::DirectMessageSent(sent) => self.handle_direct_sent(sent),
            ServerEvent::MarkReadConfirmed(confirmed) => self.handle_mark_read(confirmed),
            ServerEvent::DirectMessageError(report) => {
                vec![notice(NoticeLevel::Error, &report, "direct message failed")]
            },
            ServerEvent::MessageError(report) => {
                vec![notice(NoticeLevel::Error, &report, "message failed")]
            },
            ServerEvent::RoomJoinError(report) => self.handle_room_join_error(&report),
            ServerEvent::UserStatus(status) => {
                vec![SessionAction::Render(RenderInstruction::PeerStatus {
                    user_id: status.user_id,
                    online: status.online,
                })]
            },
        }
    }

    fn handle_room_members(&mut self, members: RoomMembers) -> Vec<SessionAction> {
        if let Err(reason) = EventRouter::room_scoped(&self.view, &members.room) {
            discarded("current_users", reason, &members.room);
            return Vec::new();
        }
        if !self.roster.replace_snapshot(&members.room, members.members) {
            discarded("current_users", Discard::WrongRoom, &members.room);
            return Vec::new();
        }
        vec![self.roster_changed()]
    }

    fn handle_member_change(&mut self, change: MemberChange, joined: bool) -> Vec<SessionAction> {
        let event = if joined { "user_joined" } else { "user_left" };
        if let Err(reason) = EventRouter::room_scoped(&self.view, &change.room) {
            discarded(event, reason, &change.room);
            return Vec::new();
        }

        let changed = if joined {
            self.roster.add_member(&change.room, change.user_id, change.username)
        } else {
            self.roster.remove_member(&change.room, change.user_id)
        };

        if changed { vec![self.roster_changed()] } else { Vec::new() }
    }

    fn handle_room_created(&mut self, created: RoomCreated) -> Vec<SessionAction> {
        let Some(room) = created.room_name.filter(|_| created.success) else {
            let text = created.message.unwrap_or_else(|| "could not create room".to_string());
            return vec![SessionAction::Render(RenderInstruction::Notice(Notice::error(text)))];
        };

        tracing::info!(%room, auto_join = created.auto_join, "room created");
        let text = created.message.unwrap_or_else(|| format!("room {room} created"));
        let mut actions =
            vec![SessionAction::Render(RenderInstruction::Notice(Notice::info(text)))];
        if created.auto_join {
            actions.extend(self.switch_to_room(room));
        }
        actions
    }

    fn handle_new_message(&mut self, message: WireMessage) -> Vec<SessionAction> {
        let Some(room) = message.room.clone() else {
            return Vec::new();
        };
        if message.is_dm {
            tracing::debug!(%room, "ignoring direct message delivered as room message");
            return Vec::new();
        }
        if let Err(reason) = EventRouter::room_scoped(&self.view, &room) {
            discarded("new_message", reason, &room);
            return Vec::new();
        }

        self.append(Message::from_room(message, &room))
    }

    fn handle_message_history(&mut self, history: MessageHistory) -> Vec<SessionAction> {
        if let Err(reason) = EventRouter::room_scoped(&self.view, &history.room) {
            discarded("message_history", reason, &history.room);
            return Vec::new();
        }

        let context = ViewContext::Room(history.room.clone());
        let messages =
            history.messages.into_iter().map(|m| Message::from_room(m, &history.room)).collect();
        if !self.window.complete_initial(&context, messages, history.has_more) {
            discarded("message_history", Discard::WrongRoom, &history.room);
            return Vec::new();
        }

        vec![self.window_replaced()]
    }

    fn handle_older_messages(&mut self, page: OlderMessages) -> Vec<SessionAction> {
        if let Err(reason) = EventRouter::older_page(&self.view, &self.window, &page.room) {
            discarded("more_messages_loaded", reason, &page.room);
            return Vec::new();
        }

        let messages =
            page.messages.into_iter().map(|m| Message::from_room(m, &page.room)).collect();
        let Some(prepended) = self.window.complete_older(&page.room, messages, page.has_more)
        else {
            discarded("more_messages_loaded", Discard::NotLoading, &page.room);
            return Vec::new();
        };

        if page.offset != self.window.offset() {
            tracing::debug!(
                server = page.offset,
                local = self.window.offset(),
                "pagination offset diverged from server"
            );
        }

        let messages = self.window.messages()[..prepended.inserted].to_vec();
        vec![
            SessionAction::Render(RenderInstruction::OlderPrepended {
                context: self.window.context().clone(),
                messages,
                anchor: prepended.anchor,
                has_more: self.window.has_more(),
            }),
            SessionAction::Render(RenderInstruction::LoadingOlder { active: false }),
        ]
    }

    fn handle_conversations(&mut self, conversations: Conversations) -> Vec<SessionAction> {
        self.conversations = conversations.conversations;
        self.unread.recompute_from_snapshot(&self.conversations);

        let mut actions = vec![SessionAction::Render(RenderInstruction::ConversationsChanged {
            conversations: self.conversations.clone(),
        })];
        for conversation in &self.conversations {
            actions.push(SessionAction::Render(RenderInstruction::UnreadBadge {
                peer_id: conversation.peer_id,
                count: self.unread.count(conversation.peer_id),
            }));
        }
        actions.push(self.unread_total());
        actions
    }

    fn handle_direct_message(&mut self, message: WireDirectMessage) -> Vec<SessionAction> {
        let local_id = self.config.local_user.id;
        match EventRouter::direct_message(&self.view, local_id, &message) {
            Ok(DirectRoute::Active { peer }) => {
                let incoming = message.sender_id == peer;
                let mut actions = self.append(Message::from_direct(message, local_id));
                if incoming {
                    self.request_mark_read(peer, &mut actions);
                }
                actions
            },
            Ok(DirectRoute::Unread { peer }) => {
                let count = self.unread.increment_for(peer);
                tracing::debug!(peer_id = peer, count, "direct message counted as unread");
                if self.pending_mark_read.contains(&peer) {
                    self.unread_since_mark_read.insert(peer);
                }

                let mut actions = vec![
                    SessionAction::Render(RenderInstruction::UnreadBadge { peer_id: peer, count }),
                    self.unread_total(),
                    SessionAction::Render(RenderInstruction::Toast {
                        peer_id: peer,
                        sender_name: message.sender_username,
                        preview: message.content,
                    }),
                ];

                // Unknown peer: let the authoritative snapshot supersede the guess.
                if !self.conversations.iter().any(|c| c.peer_id == peer) {
                    actions.push(SessionAction::Emit(ClientEvent::GetConversations));
                }
                actions
            },
            Err(reason) => {
                tracing::debug!(
                    sender_id = message.sender_id,
                    recipient_id = message.recipient_id,
                    reason = reason.as_str(),
                    "discarding direct message"
                );
                Vec::new()
            },
        }
    }

    fn handle_direct_history(&mut self, history: DirectHistory) -> Vec<SessionAction> {
        let peer = history.peer_id;
        if let Err(reason) = EventRouter::direct_history(&self.view, peer) {
            tracing::debug!(peer_id = peer, reason = reason.as_str(), "discarding dm_history");
            return Vec::new();
        }

        let local_id = self.config.local_user.id;
        let messages =
            history.messages.into_iter().map(|m| Message::from_direct(m, local_id)).collect();
        if !self.window.complete_initial(&ViewContext::Direct(peer), messages, false) {
            return Vec::new();
        }
        if !history.peer_name.is_empty() {
            self.peer_name = Some(history.peer_name);
        }

        vec![self.window_replaced()]
    }

    fn handle_direct_sent(&mut self, sent: DirectMessageSent) -> Vec<SessionAction> {
        let Some(id) = sent.message_id else {
            return Vec::new();
        };
        if !self.view.is_viewing_peer(sent.recipient_id) {
            tracing::debug!(recipient_id = sent.recipient_id, "dm_sent for conversation offscreen");
            return Vec::new();
        }

        let Some(index) = self.window.confirm_oldest_echo(id) else {
            return Vec::new();
        };
        let Some(message) = self.window.messages().get(index).cloned() else {
            return Vec::new();
        };

        vec![SessionAction::Render(RenderInstruction::EchoConfirmed {
            context: self.window.context().clone(),
            index,
            message,
        })]
    }

    fn handle_mark_read(&mut self, confirmed: MarkReadConfirmed) -> Vec<SessionAction> {
        let peer = confirmed.sender_id;
        if !self.pending_mark_read.remove(&peer) {
            tracing::debug!(peer_id = peer, "ignoring unmatched mark-read confirmation");
            return Vec::new();
        }
        let raced = self.unread_since_mark_read.remove(&peer);
        if !confirmed.success {
            tracing::warn!(peer_id = peer, "server failed to mark messages read");
            return Vec::new();
        }
        if !self.unread.clear_for(peer) {
            return Vec::new();
        }

        let mut actions = vec![
            SessionAction::Render(RenderInstruction::UnreadBadge { peer_id: peer, count: 0 }),
            self.unread_total(),
        ];
        // The confirmation may not cover messages that crossed it in flight.
        if raced {
            tracing::debug!(peer_id = peer, "unread changed while marking read, refreshing");
            actions.push(SessionAction::Emit(ClientEvent::GetConversations));
        }
        actions
    }

    fn handle_room_join_error(&mut self, report: &ErrorReport) -> Vec<SessionAction> {
        let mut actions = vec![notice(NoticeLevel::Error, report, "could not join room")];

        let default_room = self.config.default_room.clone();
        if self.view.active_room().is_some_and(|room| room != default_room) {
            tracing::warn!(room = self.view.last_room(), "join failed, using default room");
            actions.extend(self.switch_to_room(default_room));
        }
        actions
    }

    /// Reset the window and roster for `room` and request its history.
    fn enter_room(&mut self, room: &str, join: bool, actions: &mut Vec<SessionAction>) {
        let context = ViewContext::Room(room.to_string());
        self.window.reset(context.clone());
        self.roster.reset(room);

        let view_changed = RenderInstruction::ViewChanged { context, title: None };
        actions.push(SessionAction::Render(view_changed));
        actions.push(self.roster_changed());
        if join {
            actions.push(SessionAction::Emit(ClientEvent::JoinRoom { room: room.to_string() }));
        }
        actions.push(SessionAction::Emit(ClientEvent::GetMessageHistory {
            room: room.to_string(),
            limit: self.config.page_size,
        }));
    }

    fn request_mark_read(&mut self, peer: PeerId, actions: &mut Vec<SessionAction>) {
        self.pending_mark_read.insert(peer);
        self.unread_since_mark_read.remove(&peer);
        actions.push(SessionAction::Emit(ClientEvent::MarkRead { sender_id: peer }));
    }

    fn append(&mut self, message: Message) -> Vec<SessionAction> {
        let context = message.context.clone();
        match self.window.append_live(message.clone()) {
            AppendOutcome::Appended => {
                vec![SessionAction::Render(RenderInstruction::MessageAppended {
                    context,
                    message,
                    autoscroll: true,
                })]
            },
            AppendOutcome::EchoConfirmed { index } => {
                vec![SessionAction::Render(RenderInstruction::EchoConfirmed {
                    context,
                    index,
                    message,
                })]
            },
            AppendOutcome::Duplicate => {
                tracing::debug!(id = ?message.id, %context, "dropping duplicate message");
                Vec::new()
            },
            AppendOutcome::WrongContext => {
                tracing::debug!(%context, window = %self.window.context(), "outside window");
                Vec::new()
            },
        }
    }

    fn roster_changed(&self) -> SessionAction {
        SessionAction::Render(RenderInstruction::RosterChanged {
            room: self.roster.room().to_string(),
            members: self.roster.members().clone(),
        })
    }

    fn window_replaced(&self) -> SessionAction {
        SessionAction::Render(RenderInstruction::WindowReplaced {
            context: self.window.context().clone(),
            messages: self.window.messages().to_vec(),
            has_more: self.window.has_more(),
        })
    }

    fn unread_total(&self) -> SessionAction {
        SessionAction::Render(RenderInstruction::UnreadTotal { total: self.unread.total() })
    }
}

fn notice(level: NoticeLevel, report: &ErrorReport, fallback: &str) -> SessionAction {
    let text = if report.error.is_empty() { fallback.to_string() } else { report.error.clone() };
    SessionAction::Render(RenderInstruction::Notice(Notice { level, text }))
}

fn discarded(event: &str, reason: Discard, room: &str) {
    tracing::debug!(event, room, reason = reason.as_str(), "discarding room event");
}
