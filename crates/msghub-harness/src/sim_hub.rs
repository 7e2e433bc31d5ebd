//! In-memory hub.
//!
//! Holds authoritative room state and one outgoing event queue per client.
//! Each poll pops at most one event, mirroring the real hub. Commands that
//! the hub rejects come back to the requester only, as an event of the same
//! kind with `Error` set; successful membership and message events are
//! delivered to every subscriber of the room.

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use msghub_app::Templates;
use msghub_client::TransportError;
use msghub_proto::{Command, CommandRequest, EventRecord, ProtocolError, TemplateAsset, endpoint};

use crate::SimTransport;

/// Identifies a client connected to a [`SimHub`].
pub type ClientId = u64;

/// Self-message template served by the hub.
pub const OWN_MESSAGE_TEMPLATE: &str =
    r#"<div class="msg msg-me"><b>name_placeholder</b> message_placeholder</div>"#;

/// Other-message template served by the hub.
pub const OTHER_MESSAGE_TEMPLATE: &str =
    r#"<div class="msg msg-other"><b>name_placeholder</b> message_placeholder</div>"#;

/// Room button template served by the hub.
pub const ROOM_BUTTON_TEMPLATE: &str =
    r#"<div class="well"><button class="room-btn">name_placeholder</button></div>"#;

/// The hub's templates, parsed.
pub fn sim_templates() -> Templates {
    Templates::parse(OWN_MESSAGE_TEMPLATE, OTHER_MESSAGE_TEMPLATE, ROOM_BUTTON_TEMPLATE)
}

const ROOM_MISSING: &str = "specified room does not exist";
const ALREADY_SUBSCRIBED: &str = "user is already subscribed to this room";
const NOT_SUBSCRIBED: &str = "user is not subscribed to this room.";
const ROOM_EXISTS: &str = "a room with that name already exists";
const UNRECOGNISED: &str = "request type not recognised";

/// Requests a client made, for assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientStats {
    /// `/refresh/` requests, including failed ones.
    pub polls: usize,
    /// Template fetches.
    pub template_fetches: usize,
    /// `/fetch/name/` requests.
    pub name_fetches: usize,
    /// `/fetch/exit/` requests.
    pub exits: usize,
    /// Every command posted, in order.
    pub commands: Vec<CommandRequest>,
}

impl ClientStats {
    /// Number of posted commands of the given wire kind.
    pub fn command_count(&self, kind: &str) -> usize {
        self.commands.iter().filter(|c| c.kind == kind).count()
    }
}

#[derive(Debug)]
struct Room {
    name: String,
    subscribers: BTreeSet<ClientId>,
}

#[derive(Debug)]
struct ClientState {
    name: String,
    connected: bool,
    queue: VecDeque<EventRecord>,
    stats: ClientStats,
}

#[derive(Debug, Default)]
struct HubState {
    /// Rooms in creation order.
    rooms: Vec<Room>,
    clients: BTreeMap<ClientId, ClientState>,
    next_client: ClientId,
    failing_polls: usize,
    failing_templates: BTreeSet<TemplateAsset>,
    poll_latency: Duration,
    request_latency: Duration,
    in_flight_polls: usize,
    max_in_flight_polls: usize,
}

/// Simulated hub shared by any number of [`SimTransport`]s.
#[derive(Debug, Default)]
pub struct SimHub {
    state: Mutex<HubState>,
}

impl SimHub {
    /// Hub with no rooms.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hub with rooms that nobody is subscribed to yet.
    pub fn with_rooms(names: &[&str]) -> Arc<Self> {
        let hub = Self::default();
        hub.lock().rooms.extend(
            names.iter().map(|name| Room { name: (*name).to_string(), subscribers: BTreeSet::new() }),
        );
        Arc::new(hub)
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a client called `name` and return its transport.
    pub fn connect(self: &Arc<Self>, name: &str) -> SimTransport {
        let mut state = self.lock();
        let id = state.next_client;
        state.next_client += 1;
        state.clients.insert(
            id,
            ClientState {
                name: name.to_string(),
                connected: true,
                queue: VecDeque::new(),
                stats: ClientStats::default(),
            },
        );
        tracing::debug!(client = id, name, "client connected to sim hub");
        SimTransport::new(Arc::clone(self), id)
    }

    /// Delay every poll response by `latency` of (virtual) time.
    pub fn set_poll_latency(&self, latency: Duration) {
        self.lock().poll_latency = latency;
    }

    /// Delay applying every posted command by `latency` of (virtual) time.
    ///
    /// The command is counted on arrival; a client that exits in the meantime
    /// never has it applied.
    pub fn set_request_latency(&self, latency: Duration) {
        self.lock().request_latency = latency;
    }

    /// Fail the next `count` polls from any client with a connection error.
    pub fn fail_next_polls(&self, count: usize) {
        self.lock().failing_polls = count;
    }

    /// Answer fetches of `asset` with a server error.
    pub fn fail_template(&self, asset: TemplateAsset) {
        self.lock().failing_templates.insert(asset);
    }

    /// Queue a raw record for `client`, bypassing hub logic.
    pub fn push_record(&self, client: ClientId, record: EventRecord) {
        if let Some(c) = self.lock().clients.get_mut(&client) {
            c.queue.push_back(record);
        }
    }

    /// Room names in creation order.
    pub fn room_names(&self) -> Vec<String> {
        self.lock().rooms.iter().map(|r| r.name.clone()).collect()
    }

    /// Names of the users subscribed to `room`, sorted.
    pub fn subscribers(&self, room: &str) -> Vec<String> {
        let state = self.lock();
        let Some(room) = state.rooms.iter().find(|r| r.name == room) else {
            return Vec::new();
        };
        let mut names: Vec<_> = room
            .subscribers
            .iter()
            .filter_map(|id| state.clients.get(id).map(|c| c.name.clone()))
            .collect();
        names.sort();
        names
    }

    /// Request counters for `client`.
    pub fn stats(&self, client: ClientId) -> ClientStats {
        self.lock().clients.get(&client).map(|c| c.stats.clone()).unwrap_or_default()
    }

    /// Events waiting to be polled by `client`.
    pub fn pending_events(&self, client: ClientId) -> usize {
        self.lock().clients.get(&client).map_or(0, |c| c.queue.len())
    }

    /// Whether `client` has not exited.
    pub fn is_connected(&self, client: ClientId) -> bool {
        self.lock().clients.get(&client).is_some_and(|c| c.connected)
    }

    /// Polls outstanding right now.
    pub fn in_flight_polls(&self) -> usize {
        self.lock().in_flight_polls
    }

    /// Most polls that were ever outstanding at once.
    pub fn max_in_flight_polls(&self) -> usize {
        self.lock().max_in_flight_polls
    }

    pub(crate) async fn poll(&self, client: ClientId) -> Result<String, TransportError> {
        let latency = {
            let mut state = self.lock();
            if let Some(c) = state.clients.get_mut(&client) {
                c.stats.polls += 1;
            }
            if state.failing_polls > 0 {
                state.failing_polls -= 1;
                return Err(TransportError::Connection("simulated poll failure".into()));
            }
            state.in_flight_polls += 1;
            state.max_in_flight_polls = state.max_in_flight_polls.max(state.in_flight_polls);
            state.poll_latency
        };
        let slot = InFlightPoll(self);

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        drop(slot);

        let mut state = self.lock();
        let record = state
            .clients
            .get_mut(&client)
            .filter(|c| c.connected)
            .and_then(|c| c.queue.pop_front());

        match record {
            Some(record) => {
                serde_json::to_string(&record).map_err(|e| TransportError::Body(e.to_string()))
            },
            None => Ok("\n".to_string()),
        }
    }

    pub(crate) fn fetch_template(
        &self,
        client: ClientId,
        asset: TemplateAsset,
    ) -> Result<String, TransportError> {
        let mut state = self.lock();
        if let Some(c) = state.clients.get_mut(&client) {
            c.stats.template_fetches += 1;
        }
        if state.failing_templates.contains(&asset) {
            return Err(TransportError::Status { path: asset.path().to_string(), status: 500 });
        }
        Ok(match asset {
            TemplateAsset::OwnMessage => OWN_MESSAGE_TEMPLATE,
            TemplateAsset::OtherMessage => OTHER_MESSAGE_TEMPLATE,
            TemplateAsset::RoomButton => ROOM_BUTTON_TEMPLATE,
        }
        .to_string())
    }

    pub(crate) fn fetch_name(&self, client: ClientId) -> Result<String, TransportError> {
        let mut state = self.lock();
        let c = state.clients.get_mut(&client).ok_or_else(|| TransportError::Status {
            path: endpoint::FETCH_NAME.to_string(),
            status: 404,
        })?;
        c.stats.name_fetches += 1;
        Ok(c.name.clone())
    }

    pub(crate) fn exit(&self, client: ClientId) {
        self.lock().exit(client);
    }

    pub(crate) async fn request(&self, client: ClientId, request: &CommandRequest) {
        let latency = {
            let mut state = self.lock();
            let Some(c) = state.clients.get_mut(&client) else {
                return;
            };
            c.stats.commands.push(request.clone());
            state.request_latency
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.lock();
        if state.clients.get(&client).is_some_and(|c| c.connected) {
            state.apply(client, request);
        }
    }
}

/// Holds one slot of `in_flight_polls`, released even if the poll is dropped.
struct InFlightPoll<'a>(&'a SimHub);

impl Drop for InFlightPoll<'_> {
    fn drop(&mut self) {
        self.0.lock().in_flight_polls -= 1;
    }
}

impl HubState {
    fn name_of(&self, client: ClientId) -> String {
        self.clients.get(&client).map(|c| c.name.clone()).unwrap_or_default()
    }

    fn room_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.name == name)
    }

    fn deliver(&mut self, client: ClientId, record: EventRecord) {
        if let Some(c) = self.clients.get_mut(&client)
            && c.connected
        {
            c.queue.push_back(record);
        }
    }

    fn broadcast(&mut self, subscribers: &BTreeSet<ClientId>, record: &EventRecord) {
        for &id in subscribers {
            self.deliver(id, record.clone());
        }
    }

    fn reject(&mut self, client: ClientId, request: &CommandRequest, error: &str) {
        let record = EventRecord {
            kind: request.kind.clone(),
            room: request.room.clone().unwrap_or_default(),
            username: self.name_of(client),
            text: String::new(),
            error: error.to_string(),
        };
        self.deliver(client, record);
    }

    fn apply(&mut self, client: ClientId, request: &CommandRequest) {
        let command = match Command::try_from(request.clone()) {
            Ok(command) => command,
            Err(ProtocolError::MissingRoom { .. }) => return self.reject(client, request, ROOM_MISSING),
            Err(_) => return self.reject(client, request, UNRECOGNISED),
        };
        let username = self.name_of(client);
        let record = |room: &str, text: String| EventRecord {
            kind: request.kind.clone(),
            room: room.to_string(),
            username: username.clone(),
            text,
            error: String::new(),
        };

        match command {
            Command::List => {
                let names: Vec<&str> = self.rooms.iter().map(|r| r.name.as_str()).collect();
                let list = EventRecord { text: names.join(", "), ..record("", String::new()) };
                self.deliver(client, list);
            },
            Command::Join { room } => {
                let Some(r) = self.room_mut(&room) else {
                    return self.reject(client, request, ROOM_MISSING);
                };
                if !r.subscribers.insert(client) {
                    return self.reject(client, request, ALREADY_SUBSCRIBED);
                }
                let subscribers = r.subscribers.clone();
                let text = format!("user '{username}' added to the '{room}' room");
                self.broadcast(&subscribers, &record(&room, text));
            },
            Command::Leave { room } => {
                let Some(r) = self.room_mut(&room) else {
                    return self.reject(client, request, ROOM_MISSING);
                };
                if !r.subscribers.contains(&client) {
                    return self.reject(client, request, NOT_SUBSCRIBED);
                }
                let subscribers = r.subscribers.clone();
                r.subscribers.remove(&client);
                let text = format!("user '{username}' removed from the '{room}' room");
                self.broadcast(&subscribers, &record(&room, text));
            },
            Command::Create { room } => {
                if self.room_mut(&room).is_some() {
                    return self.reject(client, request, ROOM_EXISTS);
                }
                let subscribers = BTreeSet::from([client]);
                self.rooms.push(Room { name: room.clone(), subscribers: subscribers.clone() });
                let text = format!("room '{room}' created by '{username}'");
                self.broadcast(&subscribers, &record(&room, text));
            },
            Command::Destroy { room } => {
                let Some(index) = self.rooms.iter().position(|r| r.name == room) else {
                    return self.reject(client, request, ROOM_MISSING);
                };
                let removed = self.rooms.remove(index);
                let text = format!("room '{room}' destroyed by '{username}'");
                self.broadcast(&removed.subscribers, &record(&room, text));
            },
            Command::NewMsg { room, text } => {
                let Some(r) = self.room_mut(&room) else {
                    return self.reject(client, request, ROOM_MISSING);
                };
                if !r.subscribers.contains(&client) {
                    return self.reject(client, request, NOT_SUBSCRIBED);
                }
                let subscribers = r.subscribers.clone();
                self.broadcast(&subscribers, &record(&room, text));
            },
        }
    }

    fn exit(&mut self, client: ClientId) {
        let username = self.name_of(client);
        let mut departures = Vec::new();
        for room in &mut self.rooms {
            if room.subscribers.remove(&client) {
                departures.push((room.name.clone(), room.subscribers.clone()));
            }
        }
        for (room, subscribers) in departures {
            let record = EventRecord {
                kind: "leave".to_string(),
                text: format!("user '{username}' removed from the '{room}' room"),
                room,
                username: username.clone(),
                error: String::new(),
            };
            self.broadcast(&subscribers, &record);
        }
        if let Some(c) = self.clients.get_mut(&client) {
            c.stats.exits += 1;
            c.connected = false;
            c.queue.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use msghub_proto::{SyncEvent, decode_poll_body};

    use super::*;

    async fn post(hub: &SimHub, client: ClientId, command: &Command) {
        hub.request(client, &command.to_request()).await;
    }

    async fn next_event(hub: &SimHub, client: ClientId) -> Option<SyncEvent> {
        let body = hub.poll(client).await.unwrap();
        decode_poll_body(&body).unwrap()
    }

    #[tokio::test]
    async fn list_reports_rooms_in_creation_order() {
        let hub = SimHub::with_rooms(&["beta", "alpha"]);
        let alice = hub.connect("alice").client_id();

        post(&hub, alice, &Command::List).await;

        assert_eq!(
            next_event(&hub, alice).await,
            Some(SyncEvent::RoomList { rooms: vec!["beta".into(), "alpha".into()], error: None })
        );
        assert_eq!(next_event(&hub, alice).await, None);
    }

    #[tokio::test]
    async fn join_is_broadcast_to_subscribers() {
        let hub = SimHub::with_rooms(&["lobby"]);
        let alice = hub.connect("alice").client_id();
        let bob = hub.connect("bob").client_id();

        post(&hub, alice, &Command::Join { room: "lobby".into() }).await;
        post(&hub, bob, &Command::Join { room: "lobby".into() }).await;

        assert_eq!(hub.pending_events(alice), 2);
        assert_eq!(hub.pending_events(bob), 1);
        assert_eq!(hub.subscribers("lobby"), ["alice", "bob"]);

        let Some(SyncEvent::Chat { event, .. }) = next_event(&hub, bob).await else {
            unreachable!("expected join event");
        };
        assert_eq!(event.text, "user 'bob' added to the 'lobby' room");
    }

    #[tokio::test]
    async fn rejections_go_to_requester_only() {
        let hub = SimHub::with_rooms(&["lobby"]);
        let alice = hub.connect("alice").client_id();
        let bob = hub.connect("bob").client_id();
        post(&hub, bob, &Command::Join { room: "lobby".into() }).await;
        let _ = next_event(&hub, bob).await;

        post(&hub, alice, &Command::NewMsg { room: "lobby".into(), text: "hi".into() }).await;
        post(&hub, alice, &Command::Join { room: "nowhere".into() }).await;

        assert_eq!(hub.pending_events(bob), 0);
        let errors: Vec<_> = [next_event(&hub, alice).await, next_event(&hub, alice).await]
            .into_iter()
            .filter_map(|e| match e {
                Some(SyncEvent::Chat { event, .. }) => event.error,
                _ => None,
            })
            .collect();
        assert_eq!(errors, [NOT_SUBSCRIBED, ROOM_MISSING]);
    }

    #[tokio::test]
    async fn unknown_request_kind_is_rejected() {
        let hub = SimHub::new();
        let alice = hub.connect("alice").client_id();

        hub.request(alice, &CommandRequest { kind: "set_name".into(), room: None, text: None })
            .await;

        assert_eq!(
            next_event(&hub, alice).await,
            Some(SyncEvent::Unrecognized { kind: "set_name".into() })
        );
    }

    #[tokio::test]
    async fn create_then_destroy() {
        let hub = SimHub::new();
        let alice = hub.connect("alice").client_id();

        post(&hub, alice, &Command::Create { room: "den".into() }).await;
        post(&hub, alice, &Command::Create { room: "den".into() }).await;
        assert_eq!(hub.room_names(), ["den"]);
        assert_eq!(hub.subscribers("den"), ["alice"]);

        post(&hub, alice, &Command::Destroy { room: "den".into() }).await;
        assert!(hub.room_names().is_empty());
        assert_eq!(hub.pending_events(alice), 3);
    }

    #[tokio::test]
    async fn exit_notifies_remaining_subscribers() {
        let hub = SimHub::with_rooms(&["lobby"]);
        let alice = hub.connect("alice").client_id();
        let bob = hub.connect("bob").client_id();
        post(&hub, alice, &Command::Join { room: "lobby".into() }).await;
        post(&hub, bob, &Command::Join { room: "lobby".into() }).await;
        let _ = next_event(&hub, bob).await;

        hub.exit(alice);

        assert!(!hub.is_connected(alice));
        assert_eq!(hub.subscribers("lobby"), ["bob"]);
        assert!(matches!(
            next_event(&hub, bob).await,
            Some(SyncEvent::Chat { event, .. }) if event.username == "alice"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_request_is_counted_before_it_lands() {
        let hub = SimHub::with_rooms(&["lobby"]);
        let alice = hub.connect("alice").client_id();
        hub.set_request_latency(Duration::from_secs(1));

        let request = Command::Join { room: "lobby".into() }.to_request();
        let task = tokio::spawn({
            let hub = Arc::clone(&hub);
            async move { hub.request(alice, &request).await }
        });
        tokio::task::yield_now().await;

        assert_eq!(hub.stats(alice).command_count("join"), 1);
        assert!(hub.subscribers("lobby").is_empty());

        task.await.unwrap();
        assert_eq!(hub.subscribers("lobby"), ["alice"]);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_poll_releases_its_slot() {
        let hub = SimHub::new();
        let alice = hub.connect("alice").client_id();
        hub.set_poll_latency(Duration::from_secs(1));

        let task = tokio::spawn({
            let hub = Arc::clone(&hub);
            async move { hub.poll(alice).await }
        });
        tokio::task::yield_now().await;
        assert_eq!(hub.in_flight_polls(), 1);

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        assert_eq!(hub.in_flight_polls(), 0);
        assert_eq!(hub.max_in_flight_polls(), 1);
        assert_eq!(hub.stats(alice).polls, 1);
    }

    #[tokio::test]
    async fn injected_poll_failures_are_counted() {
        let hub = SimHub::new();
        let alice = hub.connect("alice").client_id();
        hub.fail_next_polls(2);

        assert!(hub.poll(alice).await.is_err());
        assert!(hub.poll(alice).await.is_err());
        assert!(hub.poll(alice).await.is_ok());
        assert_eq!(hub.stats(alice).polls, 3);
    }
}
