//! Room actor: an isolated Tokio task that owns one duel.
//!
//! The actor holds both players, drives the Select/Execute cycle and
//! pushes [`ServerMessage`]s straight into each player's outbound
//! channel. Resolution is paced with sleeps, but the actor keeps
//! draining its command channel while it sleeps, so a disconnect can
//! land at any point. Every multi-step sequence remembers the epoch it
//! started in and gives up as soon as a disconnect bumps it.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use gridduel_protocol::{
    ActionActor, ActionCard, CardAction, CharacterType, PlayerId, RoomId, RoomSnapshot,
    ServerMessage,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, oneshot};

use crate::combat;
use crate::player::Player;
use crate::{RoomConfig, RoomError, RoomState};

/// A room seats exactly two players.
pub const SEATS: usize = 2;

/// Channel sender for delivering outbound messages to a player.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// In-match requests a seated player can make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectCards(Vec<String>),
    RerollCards,
}

/// Commands sent to a room actor through its channel.
///
/// Variants carrying a `oneshot::Sender` expect an answer; the rest are
/// fire-and-forget.
pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        name: String,
        character: CharacterType,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Replies with the number of players still seated.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<usize, RoomError>>,
    },

    Intent {
        player_id: PlayerId,
        intent: Intent,
    },

    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },

    Shutdown,
}

/// Room metadata, as opposed to the in-match snapshot.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub state: RoomState,
    /// Display names in seat order.
    pub players: Vec<String>,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.room_id.clone())
    }

    /// Seats a player. Fails without touching the room if the room is
    /// full, mid-match, or the name is rejected.
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: impl Into<String>,
        character: CharacterType,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                name: name.into(),
                character,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Removes a player and returns how many remain.
    pub async fn leave(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Forwards an intent. The room ignores it if it does not fit the
    /// current state.
    pub async fn send_intent(&self, player_id: PlayerId, intent: Intent) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Intent { player_id, intent })
            .await
            .map_err(|_| self.unavailable())
    }

    pub async fn select_cards(
        &self,
        player_id: PlayerId,
        cards: Vec<String>,
    ) -> Result<(), RoomError> {
        self.send_intent(player_id, Intent::SelectCards(cards)).await
    }

    pub async fn reroll_cards(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.send_intent(player_id, Intent::RerollCards).await
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| self.unavailable())
    }
}

/// Work queued by a command handler and run by the actor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    StartMatch,
    ExecuteRound,
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room_id: RoomId,
    config: RoomConfig,
    state: RoomState,
    /// Seat order. Index 0 joined first.
    players: Vec<Player>,
    senders: HashMap<PlayerId, PlayerSender>,
    round: u32,
    /// Seat that acts first this round.
    priority: Option<usize>,
    rng: StdRng,
    /// Bumped on every departure; stale sequences compare against it.
    epoch: u64,
    pending: VecDeque<Step>,
    stopped: bool,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, "room actor started");

        while !self.stopped {
            if let Some(step) = self.pending.pop_front() {
                let epoch = self.epoch;
                match step {
                    Step::StartMatch => self.start_match(epoch).await,
                    Step::ExecuteRound => self.execute_round(epoch).await,
                }
                continue;
            }

            match self.receiver.recv().await {
                Some(cmd) => self.handle_command(cmd),
                None => break,
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                player_id,
                name,
                character,
                sender,
                reply,
            } => {
                let result = self.handle_join(player_id, name, character, sender);
                let _ = reply.send(result);
            }
            RoomCommand::Leave { player_id, reply } => {
                let result = self.handle_leave(player_id);
                let _ = reply.send(result);
            }
            RoomCommand::Intent { player_id, intent } => {
                self.handle_intent(player_id, intent);
            }
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
            RoomCommand::Shutdown => {
                tracing::info!(room_id = %self.room_id, "room shutting down");
                self.stopped = true;
            }
        }
    }

    // -----------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        name: String,
        character: CharacterType,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if self.players.len() >= SEATS || !self.state.is_joinable() {
            return Err(RoomError::RoomFull(self.room_id.clone()));
        }
        if self.seat_of(player_id).is_some() {
            return Err(RoomError::AlreadyInRoom(player_id, self.room_id.clone()));
        }
        if name.chars().count() > self.config.max_name_len {
            return Err(RoomError::NameTooLong {
                name,
                max: self.config.max_name_len,
            });
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(RoomError::NameTaken(name));
        }

        let seat = self.players.len();
        let cell = self.config.start_cell(seat);
        self.players.push(Player::new(player_id, name, character, cell));
        self.senders.insert(player_id, sender);
        tracing::info!(
            room_id = %self.room_id,
            %player_id,
            %character,
            players = self.players.len(),
            "player joined"
        );

        if self.players.len() < SEATS {
            self.broadcast_snapshot();
            self.send_to(player_id, ServerMessage::Wait);
        } else {
            self.broadcast(ServerMessage::Unwait);
            self.state = RoomState::Select;
            self.pending.push_back(Step::StartMatch);
        }
        Ok(())
    }

    fn handle_leave(&mut self, player_id: PlayerId) -> Result<usize, RoomError> {
        let seat = self
            .seat_of(player_id)
            .ok_or_else(|| RoomError::NotInRoom(player_id, self.room_id.clone()))?;
        let departed = self.players.remove(seat);
        self.senders.remove(&player_id);

        self.epoch += 1;
        self.pending.clear();
        self.state = RoomState::Init;
        self.round = 0;
        self.priority = None;
        for (seat, player) in self.players.iter_mut().enumerate() {
            player.reset_stats();
            player.position = self.config.start_cell(seat);
        }

        tracing::info!(
            room_id = %self.room_id,
            %player_id,
            players = self.players.len(),
            "player left"
        );

        if !self.players.is_empty() {
            self.broadcast(ServerMessage::Announcement {
                message: format!("{} left the room", departed.name),
            });
            self.broadcast_snapshot();
            self.broadcast(ServerMessage::Wait);
        }
        Ok(self.players.len())
    }

    // -----------------------------------------------------------------
    // Select phase
    // -----------------------------------------------------------------

    fn handle_intent(&mut self, player_id: PlayerId, intent: Intent) {
        let Some(seat) = self.seat_of(player_id) else {
            tracing::warn!(
                room_id = %self.room_id,
                %player_id,
                "intent from non-member, ignoring"
            );
            return;
        };
        if self.state != RoomState::Select {
            tracing::debug!(
                room_id = %self.room_id,
                %player_id,
                state = %self.state,
                ?intent,
                "intent outside select phase, ignoring"
            );
            return;
        }

        match intent {
            Intent::SelectCards(cards) => self.handle_select(seat, cards),
            Intent::RerollCards => self.handle_reroll(seat),
        }
    }

    fn handle_select(&mut self, seat: usize, cards: Vec<String>) {
        let player = &mut self.players[seat];
        let player_id = player.id;
        if player.has_selected() || cards.len() != self.config.selection_size {
            tracing::debug!(room_id = %self.room_id, %player_id, "selection rejected");
            return;
        }
        let Some(chosen) = take_from_hand(&player.hand, &cards) else {
            tracing::debug!(
                room_id = %self.room_id,
                %player_id,
                ?cards,
                "selection not covered by hand"
            );
            return;
        };
        player.chosen = chosen.into();
        self.send_to(player_id, ServerMessage::CardsReceived);

        let ready = self.players.len() == SEATS && self.players.iter().all(Player::has_selected);
        if ready {
            tracing::debug!(room_id = %self.room_id, round = self.round, "both selections in");
            self.state = RoomState::Execute;
            // Hands are spent once the queues are locked in. Select and reroll
            // stay ignored until the next round deals.
            for player in &mut self.players {
                player.hand.clear();
            }
            self.broadcast(ServerMessage::Unwait);
            self.pending.push_back(Step::ExecuteRound);
        } else {
            self.send_to(player_id, ServerMessage::Wait);
        }
    }

    fn handle_reroll(&mut self, seat: usize) {
        let player = &mut self.players[seat];
        if player.has_selected() || player.reroll < 1.0 || player.hand.is_empty() {
            tracing::debug!(
                room_id = %self.room_id,
                player_id = %player.id,
                reroll = player.reroll,
                "reroll rejected"
            );
            return;
        }
        player.reroll -= 1.0;
        self.deal_hand(seat);
    }

    /// Draws a fresh hand without replacement and sends it privately.
    fn deal_hand(&mut self, seat: usize) {
        let player = &mut self.players[seat];
        let cards = player.template().cards;
        let count = self.config.hand_size.min(cards.len());
        player.hand = rand::seq::index::sample(&mut self.rng, cards.len(), count)
            .into_iter()
            .map(|i| cards[i].key)
            .collect();

        let message = ServerMessage::Hand {
            cards: player.hand.iter().map(|key| key.to_string()).collect(),
            reroll: player.reroll,
        };
        let player_id = player.id;
        self.send_to(player_id, message);
    }

    fn deal_hands(&mut self) {
        for seat in 0..self.players.len() {
            self.deal_hand(seat);
        }
    }

    // -----------------------------------------------------------------
    // Match flow
    // -----------------------------------------------------------------

    async fn start_match(&mut self, epoch: u64) {
        self.round = 1;
        for (seat, player) in self.players.iter_mut().enumerate() {
            player.reset_stats();
            player.position = self.config.start_cell(seat);
        }
        self.roll_priority();
        self.state = RoomState::Select;
        tracing::info!(room_id = %self.room_id, "match started");

        self.broadcast_snapshot();
        let message = {
            let names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
            format!("Game Start!\n\n{}", names.join(" vs "))
        };
        if !self.announce(message, epoch).await {
            return;
        }
        if !self.announce_round(epoch).await {
            return;
        }
        self.deal_hands();
    }

    async fn execute_round(&mut self, epoch: u64) {
        if !self.announce(format!("Round {} Start!", self.round), epoch).await {
            return;
        }
        let Some(mut actor) = self.priority else {
            tracing::error!(room_id = %self.room_id, "execute without a priority seat");
            return;
        };

        loop {
            if !self.is_current(epoch) || self.state != RoomState::Execute {
                return;
            }
            if self.players.iter().all(|p| p.chosen.is_empty()) {
                break;
            }

            if let Some(key) = self.players[actor].chosen.pop_front() {
                self.play_card(actor, key);
                self.pause(self.config.pacing.after_action).await;
                if !self.is_current(epoch) {
                    return;
                }
                self.broadcast_snapshot();
                self.pause(self.config.pacing.after_snapshot).await;
                if !self.is_current(epoch) {
                    return;
                }
                if self.players.iter().any(|p| !p.is_alive()) {
                    break;
                }
            }
            actor = 1 - actor;
        }

        self.finish_round(epoch).await;
    }

    fn play_card(&mut self, seat: usize, key: &'static str) {
        let (first, second) = self.players.split_at_mut(1);
        let (actor, opponent) = if seat == 0 {
            (&mut first[0], &mut second[0])
        } else {
            (&mut second[0], &mut first[0])
        };

        let Some(card) = actor.template().card(key) else {
            tracing::error!(
                room_id = %self.room_id,
                player_id = %actor.id,
                key,
                "queued card missing from catalog"
            );
            return;
        };

        let outcome = combat::resolve(actor, opponent, card, &self.config);
        tracing::debug!(
            room_id = %self.room_id,
            player_id = %actor.id,
            key,
            has_energy = outcome.has_energy,
            damage = outcome.damage,
            "card resolved"
        );

        let event = CardAction {
            player: ActionActor {
                name: actor.name.clone(),
                index: seat,
                has_energy: outcome.has_energy,
            },
            card: ActionCard {
                key: card.key.to_string(),
                name: card.name.to_string(),
                kind: card.kind,
            },
            hit_zone: outcome.hit_zone,
        };
        self.broadcast(ServerMessage::CardAction(event));
    }

    async fn finish_round(&mut self, epoch: u64) {
        let outcome = {
            let mut alive = self.players.iter().filter(|p| p.is_alive());
            match (alive.next(), alive.next()) {
                (Some(_), Some(_)) => None,
                (Some(winner), None) => Some(format!("Game Over!\n\nWinner: {}", winner.name)),
                (None, _) => Some("Game Over!\n\nDraw".to_string()),
            }
        };

        if let Some(message) = outcome {
            self.state = RoomState::End;
            tracing::info!(room_id = %self.room_id, round = self.round, "match over");

            if !self.announce(message, epoch).await {
                return;
            }
            self.start_match(epoch).await;
            return;
        }

        self.round += 1;
        for player in &mut self.players {
            player.regenerate(&self.config);
        }
        self.roll_priority();
        self.state = RoomState::Select;
        self.broadcast_snapshot();
        if !self.announce_round(epoch).await {
            return;
        }
        self.deal_hands();
    }

    fn roll_priority(&mut self) {
        let alive: Vec<usize> = (0..self.players.len())
            .filter(|&seat| self.players[seat].is_alive())
            .collect();
        self.priority = match alive.len() {
            0 => None,
            n => Some(alive[self.rng.random_range(0..n)]),
        };
    }

    async fn announce_round(&mut self, epoch: u64) -> bool {
        let holder = self
            .priority
            .and_then(|seat| self.players.get(seat))
            .map(|p| p.name.clone())
            .unwrap_or_default();
        let message = format!("Round {}\n\nPriority Player: {}", self.round, holder);
        self.announce(message, epoch).await
    }

    /// Broadcasts narration and pauses. Returns `false` if the sequence
    /// was interrupted.
    async fn announce(&mut self, message: String, epoch: u64) -> bool {
        self.broadcast(ServerMessage::Announcement { message });
        self.pause(self.config.pacing.after_announcement).await;
        self.is_current(epoch)
    }

    /// Sleeps for `duration` while still serving commands.
    async fn pause(&mut self, duration: Duration) {
        let sleep = tokio::time::sleep(duration);
        tokio::pin!(sleep);

        while !self.stopped {
            tokio::select! {
                () = &mut sleep => break,
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => self.stopped = true,
                },
            }
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch && !self.stopped
    }

    // -----------------------------------------------------------------
    // Outbound
    // -----------------------------------------------------------------

    fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.room_id.clone(),
            round: self.round,
            players: self
                .players
                .iter()
                .enumerate()
                .map(|(seat, p)| p.snapshot(self.priority == Some(seat)))
                .collect(),
        }
    }

    fn broadcast_snapshot(&self) {
        self.broadcast(ServerMessage::RoomData(self.snapshot()));
    }

    fn broadcast(&self, msg: ServerMessage) {
        for player in &self.players {
            self.send_to(player.id, msg.clone());
        }
    }

    /// Silently drops the message if the receiver is gone.
    fn send_to(&self, player_id: PlayerId, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(msg);
        }
    }

    fn seat_of(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id.clone(),
            state: self.state,
            players: self.players.iter().map(|p| p.name.clone()).collect(),
        }
    }
}

/// Matches submitted keys against a hand, consuming one hand slot per
/// key. Returns `None` if any key is missing.
fn take_from_hand(hand: &[&'static str], keys: &[String]) -> Option<Vec<&'static str>> {
    let mut remaining = hand.to_vec();
    keys.iter()
        .map(|key| {
            let slot = remaining.iter().position(|k| k == key)?;
            Some(remaining.swap_remove(slot))
        })
        .collect()
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(room_id: RoomId, config: RoomConfig, channel_size: usize) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let actor = RoomActor {
        room_id: room_id.clone(),
        config,
        state: RoomState::Init,
        players: Vec::with_capacity(SEATS),
        senders: HashMap::new(),
        round: 0,
        priority: None,
        rng,
        epoch: 0,
        pending: VecDeque::new(),
        stopped: false,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { room_id, sender: tx }
}
