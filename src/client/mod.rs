// src/client/mod.rs

//! The user-facing façade: one [`Client`] composes the dispatch table, the
//! gateway sockets, the optional command tree, and the REST executor.
//!
//! Typed event streams are exposed per event kind (generated alongside the
//! registration table in [`registry`]); entity convenience methods shape REST
//! requests and hand them to [`Http`](crate::http::Http).

mod processor;
pub mod registry;

pub use registry::{EventKind, build_dispatch_table};

use crate::commands::{CommandFailure, CommandRouter, CommandTree};
use crate::config::ClientConfig;
use crate::dispatch::{DispatchError, DispatchTable, EventKey};
use crate::errors::ParlanceError;
use crate::gateway::envelope::opcode;
use crate::gateway::{
    DisconnectEvent, GatewayConnection, GatewayHandle, GatewayItem, GatewayOptions, Resumed,
    Welcome,
};
use crate::http::{ApiRequest, Http};
use crate::model::{
    CalendarEntry, CreateCalendarEntry, CreateChannel, CreateDoc, CreateForumTopic, CreateListItem,
    CreateMessage, CreateWebhook, Doc, ForumTopic, ListItem, Member, MemberBan, Message, Reactible,
    ServerChannel, Webhook,
};
use processor::Processor;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::BroadcastStream;

/// Configures and builds a [`Client`].
pub struct ClientBuilder {
    config: ClientConfig,
    tree: Option<CommandTree>,
}

impl ClientBuilder {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(token),
            tree: None,
        }
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self { config, tree: None }
    }

    /// Overrides the command prefix (default `!`).
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.command_prefix = prefix.into();
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn gateway_url(mut self, url: impl Into<String>) -> Self {
        self.config.gateway_url = url.into();
        self
    }

    /// Installs a command tree; chat messages carrying the prefix will be
    /// routed through it.
    pub fn commands(mut self, tree: CommandTree) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Validates the configuration and builds the client, spawning its frame
    /// processor. Must be called within a tokio runtime.
    pub fn build(self) -> Result<Client, ParlanceError> {
        self.config.validate()?;

        let http = Http::new(&self.config)?;
        let table = Arc::new(build_dispatch_table(self.config.event_buffer));
        let router = self
            .tree
            .map(|tree| Arc::new(CommandRouter::new(self.config.command_prefix.clone(), tree)));

        let (feed_tx, feed_rx) = mpsc::channel(self.config.event_buffer);
        let (disconnects, _) = broadcast::channel(self.config.event_buffer);
        let processor = Processor::new(
            Arc::clone(&table),
            router.clone(),
            feed_rx,
            disconnects.clone(),
        );
        let processor = tokio::spawn(processor.run());

        Ok(Client {
            config: self.config,
            http,
            table,
            router,
            feed_tx,
            disconnects,
            processor,
        })
    }
}

/// A bot client for the Parlance platform.
///
/// Opened sockets feed one processor task, which handles frames strictly in
/// arrival order per socket. The client itself is cheap to share by
/// reference; all of its methods take `&self`.
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    http: Http,
    table: Arc<DispatchTable>,
    router: Option<Arc<CommandRouter>>,
    feed_tx: mpsc::Sender<GatewayItem>,
    disconnects: broadcast::Sender<DisconnectEvent>,
    processor: JoinHandle<()>,
}

impl Client {
    pub fn builder(token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(token)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &Http {
        &self.http
    }

    pub fn dispatch_table(&self) -> &DispatchTable {
        &self.table
    }

    /// The installed command tree, when one was configured.
    pub fn commands(&self) -> Option<&CommandTree> {
        self.router.as_deref().map(CommandRouter::tree)
    }

    /// Opens a gateway socket with default options.
    pub async fn connect(&self) -> Result<GatewayHandle, ParlanceError> {
        self.connect_with(GatewayOptions::default()).await
    }

    /// Opens a gateway socket, optionally resuming from a replay cursor or
    /// targeting an alternate URL. The returned handle owns the socket.
    pub async fn connect_with(
        &self,
        options: GatewayOptions,
    ) -> Result<GatewayHandle, ParlanceError> {
        GatewayConnection::open(&self.config, options, self.feed_tx.clone()).await
    }

    /// Stops the frame processor once every feeding socket has hung up.
    /// Close open [`GatewayHandle`]s first; their actors hold feed senders.
    pub async fn close(self) {
        drop(self.feed_tx);
        let _ = self.processor.await;
    }

    // --- Protocol and error streams ---

    /// WELCOME frames, as republished after the gateway retimes its
    /// heartbeat.
    pub fn welcome(&self) -> BroadcastStream<Welcome> {
        self.stream(&EventKey::opcode(opcode::WELCOME))
    }

    /// RESUME acknowledgements after a reconnect replay.
    pub fn resumed(&self) -> BroadcastStream<Resumed> {
        self.stream(&EventKey::opcode(opcode::RESUME))
    }

    /// Per-frame dispatch failures (undecodable envelopes, payloads that do
    /// not match their registered shape).
    pub fn dispatch_errors(&self) -> BroadcastStream<DispatchError> {
        BroadcastStream::new(self.table.errors())
    }

    /// Command resolution failures. `None` when no command tree is
    /// configured.
    pub fn command_failures(&self) -> Option<BroadcastStream<CommandFailure>> {
        self.router
            .as_ref()
            .map(|router| BroadcastStream::new(router.failures()))
    }

    /// Socket lifecycle endings, one per closed or abandoned socket.
    pub fn disconnects(&self) -> BroadcastStream<DisconnectEvent> {
        BroadcastStream::new(self.disconnects.subscribe())
    }

    pub(crate) fn stream<T>(&self, key: &EventKey) -> BroadcastStream<T>
    where
        T: Clone + Send + 'static,
    {
        let receiver = self
            .table
            .subscribe::<T>(key)
            .expect("Invariant violation: the registration table covers every generated stream");
        BroadcastStream::new(receiver)
    }

    // --- Messages ---

    /// Sends a message to a channel.
    pub async fn send_message(
        &self,
        channel_id: &str,
        create: &CreateMessage,
    ) -> Result<Message, ParlanceError> {
        let request = ApiRequest::post(format!("channels/{channel_id}/messages")).json(create)?;
        let response: MessageResponse = self.http.execute(request).await?;
        Ok(response.message)
    }

    pub async fn get_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<Message, ParlanceError> {
        let request = ApiRequest::get(format!("channels/{channel_id}/messages/{message_id}"));
        let response: MessageResponse = self.http.execute(request).await?;
        Ok(response.message)
    }

    /// Replaces a message's markdown body.
    pub async fn update_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<Message, ParlanceError> {
        let body = UpdateMessageRequest {
            content: content.to_string(),
        };
        let request =
            ApiRequest::put(format!("channels/{channel_id}/messages/{message_id}")).json(&body)?;
        let response: MessageResponse = self.http.execute(request).await?;
        Ok(response.message)
    }

    pub async fn delete_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<(), ParlanceError> {
        let request = ApiRequest::delete(format!("channels/{channel_id}/messages/{message_id}"));
        self.http.execute_empty(request).await
    }

    // --- Members and bans ---

    pub async fn get_member(
        &self,
        server_id: &str,
        user_id: &str,
    ) -> Result<Member, ParlanceError> {
        let request = ApiRequest::get(format!("servers/{server_id}/members/{user_id}"));
        let response: MemberResponse = self.http.execute(request).await?;
        Ok(response.member)
    }

    pub async fn kick_member(&self, server_id: &str, user_id: &str) -> Result<(), ParlanceError> {
        let request = ApiRequest::delete(format!("servers/{server_id}/members/{user_id}"));
        self.http.execute_empty(request).await
    }

    pub async fn ban_member(
        &self,
        server_id: &str,
        user_id: &str,
        reason: Option<&str>,
    ) -> Result<MemberBan, ParlanceError> {
        let body = BanRequest {
            reason: reason.map(str::to_string),
        };
        let request =
            ApiRequest::post(format!("servers/{server_id}/bans/{user_id}")).json(&body)?;
        let response: MemberBanResponse = self.http.execute(request).await?;
        Ok(response.server_member_ban)
    }

    pub async fn unban_member(&self, server_id: &str, user_id: &str) -> Result<(), ParlanceError> {
        let request = ApiRequest::delete(format!("servers/{server_id}/bans/{user_id}"));
        self.http.execute_empty(request).await
    }

    // --- Channels ---

    pub async fn create_channel(
        &self,
        create: &CreateChannel,
    ) -> Result<ServerChannel, ParlanceError> {
        let request = ApiRequest::post("channels").json(create)?;
        let response: ChannelResponse = self.http.execute(request).await?;
        Ok(response.channel)
    }

    pub async fn get_channel(&self, channel_id: &str) -> Result<ServerChannel, ParlanceError> {
        let request = ApiRequest::get(format!("channels/{channel_id}"));
        let response: ChannelResponse = self.http.execute(request).await?;
        Ok(response.channel)
    }

    pub async fn delete_channel(&self, channel_id: &str) -> Result<(), ParlanceError> {
        let request = ApiRequest::delete(format!("channels/{channel_id}"));
        self.http.execute_empty(request).await
    }

    // --- Reactions ---

    /// Adds an emote reaction to any entity that accepts them.
    pub async fn add_reaction<R>(&self, target: &R, emote_id: u64) -> Result<(), ParlanceError>
    where
        R: Reactible + Sync,
    {
        let request = ApiRequest::put(target.reaction_path(emote_id));
        self.http.execute_empty(request).await
    }

    pub async fn remove_reaction<R>(&self, target: &R, emote_id: u64) -> Result<(), ParlanceError>
    where
        R: Reactible + Sync,
    {
        let request = ApiRequest::delete(target.reaction_path(emote_id));
        self.http.execute_empty(request).await
    }

    // --- Content channels ---

    pub async fn create_forum_topic(
        &self,
        channel_id: &str,
        create: &CreateForumTopic,
    ) -> Result<ForumTopic, ParlanceError> {
        let request = ApiRequest::post(format!("channels/{channel_id}/topics")).json(create)?;
        let response: ForumTopicResponse = self.http.execute(request).await?;
        Ok(response.forum_topic)
    }

    pub async fn create_list_item(
        &self,
        channel_id: &str,
        create: &CreateListItem,
    ) -> Result<ListItem, ParlanceError> {
        let request = ApiRequest::post(format!("channels/{channel_id}/items")).json(create)?;
        let response: ListItemResponse = self.http.execute(request).await?;
        Ok(response.list_item)
    }

    pub async fn complete_list_item(
        &self,
        channel_id: &str,
        item_id: &str,
    ) -> Result<(), ParlanceError> {
        let request = ApiRequest::post(format!("channels/{channel_id}/items/{item_id}/complete"));
        self.http.execute_empty(request).await
    }

    pub async fn create_doc(
        &self,
        channel_id: &str,
        create: &CreateDoc,
    ) -> Result<Doc, ParlanceError> {
        let request = ApiRequest::post(format!("channels/{channel_id}/docs")).json(create)?;
        let response: DocResponse = self.http.execute(request).await?;
        Ok(response.doc)
    }

    pub async fn create_calendar_entry(
        &self,
        channel_id: &str,
        create: &CreateCalendarEntry,
    ) -> Result<CalendarEntry, ParlanceError> {
        let request = ApiRequest::post(format!("channels/{channel_id}/events")).json(create)?;
        let response: CalendarEntryResponse = self.http.execute(request).await?;
        Ok(response.calendar_event)
    }

    // --- Webhooks ---

    pub async fn create_webhook(
        &self,
        server_id: &str,
        create: &CreateWebhook,
    ) -> Result<Webhook, ParlanceError> {
        let request = ApiRequest::post(format!("servers/{server_id}/webhooks")).json(create)?;
        let response: WebhookResponse = self.http.execute(request).await?;
        Ok(response.webhook)
    }
}

// The REST API nests every entity under a response key named after it.

#[derive(Deserialize)]
struct MessageResponse {
    message: Message,
}

#[derive(Deserialize)]
struct MemberResponse {
    member: Member,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberBanResponse {
    server_member_ban: MemberBan,
}

#[derive(Deserialize)]
struct ChannelResponse {
    channel: ServerChannel,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForumTopicResponse {
    forum_topic: ForumTopic,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListItemResponse {
    list_item: ListItem,
}

#[derive(Deserialize)]
struct DocResponse {
    doc: Doc,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarEntryResponse {
    calendar_event: CalendarEntry,
}

#[derive(Deserialize)]
struct WebhookResponse {
    webhook: Webhook,
}

#[derive(serde::Serialize)]
struct UpdateMessageRequest {
    content: String,
}

#[derive(serde::Serialize)]
struct BanRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}
