//! The trade negotiation state machine.
//!
//! A [`Negotiation`] borrows the player's wallet and the trader for its whole
//! lifetime, so nothing else can touch either while offers are in flight.
//! Every transition is a method that returns the list of [`Effect`]s the
//! presentation layer should perform; the machine itself does no I/O.
//!
//! ```text
//! Idle -> OfferMade -> (CounterReceived <-> OfferMade)* -> Haggling (human only)
//!                                                      -> Completed | Rejected
//! ```
//!
//! Human negotiations are driven by explicit calls ([`Negotiation::increment`],
//! [`Negotiation::submit`], ...). AI negotiations are driven by feeding the
//! decision service's answers to [`Negotiation::apply_ai_action`], usually
//! through [`crate::driver::AiNegotiator`].
//!
//! Wallet and trader stock change exactly once, on the transition into
//! [`NegotiationState::Completed`]. Every other path leaves both untouched.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use wayfarer_trade::{
    CounterViolation, HaggleBar, HaggleConfig, HaggleResult, PolicyVerdict, ResourceLedger,
    TradeError, Trader, haggle_discount, respond, validate_acceptance, validate_counter,
};
use wayfarer_types::{
    ResourceKind, SessionId, TradeAction, TradeDecisionRequest, TradeOffer, TraderArchetype,
    TraderId,
};

use crate::config::GameConfig;

/// Rounds allowed before a negotiation is forced to Rejected.
pub const MAX_ROUNDS: u32 = 6;

// ---------------------------------------------------------------------------
// States, modes, errors
// ---------------------------------------------------------------------------

/// Where a negotiation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationState {
    /// Not started.
    Idle,
    /// The player's offer is on the table, being edited or awaited.
    OfferMade,
    /// The trader has countered and the player must respond.
    CounterReceived,
    /// The trader accepted; the human is playing the haggle minigame.
    Haggling,
    /// The trade settled. Terminal.
    Completed,
    /// The trade ended without settling. Terminal.
    Rejected,
}

impl NegotiationState {
    /// Whether no further transitions are possible.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// Lowercase name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::OfferMade => "offer_made",
            Self::CounterReceived => "counter_received",
            Self::Haggling => "haggling",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl core::fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who negotiates on the player's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerMode {
    /// A human edits and submits offers.
    Human,
    /// The remote decision service answers each round.
    Ai,
}

impl core::fmt::Display for PlayerMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Human => f.write_str("human"),
            Self::Ai => f.write_str("ai"),
        }
    }
}

/// Errors returned when an action is not allowed.
///
/// A refused action never changes the negotiation, the wallet, or the
/// trader.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NegotiationError {
    /// The action does not apply in the current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        /// The attempted action.
        action: &'static str,
        /// The state the negotiation is in.
        state: NegotiationState,
    },

    /// The action belongs to the other kind of player.
    #[error("{action} is only available to {expected} players")]
    WrongMode {
        /// The attempted action.
        action: &'static str,
        /// The mode that may perform it.
        expected: PlayerMode,
    },

    /// The offer does not give something to both sides.
    #[error("offer must give something to both sides")]
    NotSubmittable,

    /// Only gold, food and water can be put in an offer.
    #[error("{0:?} cannot be traded")]
    UnsupportedResource(ResourceKind),

    /// The player can no longer afford the counter they tried to accept.
    #[error("player can no longer afford the offer: {0}")]
    Unaffordable(CounterViolation),
}

// ---------------------------------------------------------------------------
// Outcomes and effects
// ---------------------------------------------------------------------------

/// Why a negotiation ended without a trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The human walked away.
    PlayerDeclined,
    /// The decision service answered REJECT, or failed and fell back to it.
    ServiceDeclined,
    /// The trader had no new two-sided counter to offer.
    NoCounter,
    /// The round limit was exceeded.
    RoundLimit,
    /// The decision service proposed an offer that failed validation.
    InvalidCounter(CounterViolation),
    /// The decision service accepted an offer the player cannot afford.
    Unaffordable(CounterViolation),
    /// The decision service accepted before any offer was on the table.
    NothingToAccept,
    /// Settlement failed validation; nothing was mutated.
    SettlementFailed(TradeError),
}

impl core::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PlayerDeclined => f.write_str("player declined"),
            Self::ServiceDeclined => f.write_str("decision service declined"),
            Self::NoCounter => f.write_str("trader has no counter"),
            Self::RoundLimit => f.write_str("round limit exceeded"),
            Self::InvalidCounter(violation) => write!(f, "invalid counter: {violation}"),
            Self::Unaffordable(violation) => write!(f, "unaffordable: {violation}"),
            Self::NothingToAccept => f.write_str("nothing to accept"),
            Self::SettlementFailed(error) => write!(f, "settlement failed: {error}"),
        }
    }
}

/// Record of a settled trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeReceipt {
    /// The negotiation that produced the trade.
    pub session_id: SessionId,
    /// The trader traded with.
    pub trader_id: TraderId,
    /// The trader's archetype.
    pub archetype: TraderArchetype,
    /// The offer as settled, after any haggle discount.
    pub offer: TradeOffer,
    /// Gold knocked off by haggling.
    pub discount: u32,
    /// Rounds played.
    pub rounds: u32,
    /// When the trade settled.
    pub settled_at: DateTime<Utc>,
}

/// How a negotiation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeOutcome {
    /// The trade settled.
    Completed(TradeReceipt),
    /// The trade was abandoned.
    Rejected(RejectReason),
}

impl TradeOutcome {
    /// The receipt, if the trade settled.
    pub const fn receipt(&self) -> Option<&TradeReceipt> {
        match self {
            Self::Completed(receipt) => Some(receipt),
            Self::Rejected(_) => None,
        }
    }

    /// Whether the trade settled.
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// A command for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show the player's current offer.
    ReflectOffer(TradeOffer),
    /// Show the trader's counter.
    ShowCounter(TradeOffer),
    /// Start the haggle minigame with this bar.
    StartHaggle(HaggleBar),
    /// Ask the decision service for the next trade action.
    RequestAiDecision(TradeDecisionRequest),
    /// Show how the negotiation ended.
    ShowResult(TradeOutcome),
    /// Close the trade screen after this delay.
    ScheduleAutoClose(Duration),
    /// The trade screen was dismissed.
    Closed,
}

// ---------------------------------------------------------------------------
// Rules and session
// ---------------------------------------------------------------------------

/// Limits and tunables a negotiation runs under.
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiationRules {
    /// Rounds allowed before forcing Rejected.
    pub max_rounds: u32,
    /// Delay before a successful AI trade closes itself.
    pub auto_close: Duration,
    /// Haggle bar tunables.
    pub haggle: HaggleConfig,
}

impl NegotiationRules {
    /// Rules taken from the game configuration.
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            max_rounds: config.negotiation.max_rounds,
            auto_close: config.negotiation.auto_close(),
            haggle: config.haggle.clone(),
        }
    }
}

impl Default for NegotiationRules {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// Negotiation bookkeeping that does not borrow anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationSession {
    id: SessionId,
    state: NegotiationState,
    mode: PlayerMode,
    current_offer: TradeOffer,
    offer_on_table: bool,
    round_count: u32,
}

impl NegotiationSession {
    /// A fresh, idle session.
    pub fn new(mode: PlayerMode) -> Self {
        Self {
            id: SessionId::new(),
            state: NegotiationState::Idle,
            mode,
            current_offer: TradeOffer::empty(),
            offer_on_table: false,
            round_count: 0,
        }
    }

    /// Identifier for log correlation.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Current state.
    pub const fn state(&self) -> NegotiationState {
        self.state
    }

    /// Who is negotiating.
    pub const fn mode(&self) -> PlayerMode {
        self.mode
    }

    /// The offer on the table.
    pub const fn current_offer(&self) -> TradeOffer {
        self.current_offer
    }

    /// Rounds played so far.
    pub const fn round_count(&self) -> u32 {
        self.round_count
    }
}

/// A live negotiation between the player and one trader.
#[derive(Debug)]
pub struct Negotiation<'a> {
    session: NegotiationSession,
    ledger: &'a mut ResourceLedger,
    trader: &'a mut Trader,
    rules: NegotiationRules,
    outcome: Option<TradeOutcome>,
}

impl<'a> Negotiation<'a> {
    /// Start trading with `trader`.
    ///
    /// Human negotiations open with a zeroed offer for the player to edit.
    /// AI negotiations open by asking the decision service, with no offer on
    /// the table.
    pub fn start(
        ledger: &'a mut ResourceLedger,
        trader: &'a mut Trader,
        mode: PlayerMode,
        rules: NegotiationRules,
    ) -> (Self, Vec<Effect>) {
        let mut negotiation = Self {
            session: NegotiationSession::new(mode),
            ledger,
            trader,
            rules,
            outcome: None,
        };
        negotiation.session.state = NegotiationState::OfferMade;

        info!(
            session_id = %negotiation.session.id,
            trader_id = %negotiation.trader.id(),
            archetype = %negotiation.trader.archetype(),
            mode = %mode,
            "Negotiation started"
        );

        let effects = match mode {
            PlayerMode::Human => vec![Effect::ReflectOffer(negotiation.session.current_offer)],
            PlayerMode::Ai => vec![Effect::RequestAiDecision(negotiation.decision_request())],
        };
        (negotiation, effects)
    }

    /// Session bookkeeping.
    pub const fn session(&self) -> &NegotiationSession {
        &self.session
    }

    /// Current state.
    pub const fn state(&self) -> NegotiationState {
        self.session.state
    }

    /// The offer on the table.
    pub const fn current_offer(&self) -> TradeOffer {
        self.session.current_offer
    }

    /// Rounds played so far.
    pub const fn round_count(&self) -> u32 {
        self.session.round_count
    }

    /// The trader being negotiated with.
    pub const fn trader(&self) -> &Trader {
        self.trader
    }

    /// The player's wallet.
    pub const fn ledger(&self) -> &ResourceLedger {
        self.ledger
    }

    /// How the negotiation ended, once it has.
    pub const fn outcome(&self) -> Option<&TradeOutcome> {
        self.outcome.as_ref()
    }

    /// The request to send to the decision service this round.
    ///
    /// The opening round carries no offer.
    pub fn decision_request(&self) -> TradeDecisionRequest {
        TradeDecisionRequest {
            player_stats: self.ledger.stats(),
            trader_info: self.trader.info(),
            current_offer: self.session.offer_on_table.then_some(self.session.current_offer),
            round: self.session.round_count,
        }
    }

    /// The request the AI driver should send next, if it is the AI's turn.
    pub fn pending_ai_request(&self) -> Option<TradeDecisionRequest> {
        let awaiting = matches!(
            self.session.state,
            NegotiationState::OfferMade | NegotiationState::CounterReceived
        );
        (self.session.mode == PlayerMode::Ai && awaiting).then(|| self.decision_request())
    }

    // -----------------------------------------------------------------------
    // Human flow
    // -----------------------------------------------------------------------

    /// Add one unit of `kind` to the offer.
    ///
    /// Gold stays below the player's gold. Food and water stay within trader
    /// stock and below the player's remaining capacity. At a bound the offer
    /// is unchanged and no effect is emitted.
    pub fn increment(&mut self, kind: ResourceKind) -> Result<Vec<Effect>, NegotiationError> {
        self.require_human("edit offer")?;
        self.require_state("edit offer", &[NegotiationState::OfferMade])?;

        let offer = self.session.current_offer;
        let allowed = match kind {
            ResourceKind::Gold => offer.gold_from_player < self.ledger.get(ResourceKind::Gold),
            ResourceKind::Food => {
                below_limits(offer.food_to_player, self.trader.food_stock(), self.ledger, kind)
            }
            ResourceKind::Water => {
                below_limits(offer.water_to_player, self.trader.water_stock(), self.ledger, kind)
            }
            ResourceKind::Energy => return Err(NegotiationError::UnsupportedResource(kind)),
        };
        if !allowed {
            return Ok(Vec::new());
        }
        let slot = offer_slot(&mut self.session.current_offer, kind)?;
        *slot = slot.saturating_add(1);
        Ok(vec![Effect::ReflectOffer(self.session.current_offer)])
    }

    /// Remove one unit of `kind` from the offer, flooring at zero.
    pub fn decrement(&mut self, kind: ResourceKind) -> Result<Vec<Effect>, NegotiationError> {
        self.require_human("edit offer")?;
        self.require_state("edit offer", &[NegotiationState::OfferMade])?;

        let slot = offer_slot(&mut self.session.current_offer, kind)?;
        if *slot == 0 {
            return Ok(Vec::new());
        }
        *slot = slot.saturating_sub(1);
        Ok(vec![Effect::ReflectOffer(self.session.current_offer)])
    }

    /// Submit the edited offer to the trader.
    ///
    /// Counts as a round. Accepted offers move to haggling; rejected offers
    /// come back as a counter or end the negotiation. An offer the player
    /// cannot afford is refused with nothing changed.
    pub fn submit(&mut self) -> Result<Vec<Effect>, NegotiationError> {
        self.require_human("submit offer")?;
        self.require_state("submit offer", &[NegotiationState::OfferMade])?;
        if !self.session.current_offer.is_two_sided() {
            return Err(NegotiationError::NotSubmittable);
        }
        validate_acceptance(&self.session.current_offer, self.ledger, self.trader)
            .map_err(NegotiationError::Unaffordable)?;

        self.session.offer_on_table = true;
        if let Some(effects) = self.next_round() {
            return Ok(effects);
        }

        let offer = self.session.current_offer;
        debug!(
            session_id = %self.session.id,
            round = self.session.round_count,
            %offer,
            "Human submitted offer"
        );

        Ok(match respond(self.trader, &offer) {
            PolicyVerdict::Accept => self.begin_haggle(),
            PolicyVerdict::Counter(counter) if counter.is_two_sided() => {
                self.session.current_offer = counter;
                self.session.state = NegotiationState::CounterReceived;
                vec![Effect::ShowCounter(counter)]
            }
            PolicyVerdict::Counter(_) | PolicyVerdict::NoCounter => self.reject(RejectReason::NoCounter),
        })
    }

    /// Accept the trader's counter and move to haggling.
    ///
    /// Refused, with nothing changed, if the player can no longer afford it.
    pub fn accept_counter(&mut self) -> Result<Vec<Effect>, NegotiationError> {
        self.require_human("accept counter")?;
        self.require_state("accept counter", &[NegotiationState::CounterReceived])?;

        validate_acceptance(&self.session.current_offer, self.ledger, self.trader)
            .map_err(NegotiationError::Unaffordable)?;
        Ok(self.begin_haggle())
    }

    /// Edit the trader's counter into a new offer.
    pub fn revise_counter(&mut self) -> Result<Vec<Effect>, NegotiationError> {
        self.require_human("revise counter")?;
        self.require_state("revise counter", &[NegotiationState::CounterReceived])?;

        self.session.state = NegotiationState::OfferMade;
        Ok(vec![Effect::ReflectOffer(self.session.current_offer)])
    }

    /// Walk away from the negotiation.
    pub fn decline(&mut self) -> Result<Vec<Effect>, NegotiationError> {
        self.require_human("decline")?;
        self.require_state(
            "decline",
            &[
                NegotiationState::OfferMade,
                NegotiationState::CounterReceived,
                NegotiationState::Haggling,
            ],
        )?;
        Ok(self.reject(RejectReason::PlayerDeclined))
    }

    /// Apply the haggle result and settle the trade.
    pub fn finish_haggle(&mut self, result: HaggleResult) -> Result<Vec<Effect>, NegotiationError> {
        self.require_human("finish haggle")?;
        self.require_state("finish haggle", &[NegotiationState::Haggling])?;

        let offer = self.session.current_offer;
        let discount = haggle_discount(self.trader.archetype(), result, offer.gold_from_player);
        let mut settled = offer;
        settled.gold_from_player = offer.gold_from_player.saturating_sub(discount);

        info!(
            session_id = %self.session.id,
            result = %result,
            discount,
            "Haggle finished"
        );
        Ok(self.end_trade(settled, discount))
    }

    /// Dismiss the result screen.
    pub fn acknowledge(&mut self) -> Result<Vec<Effect>, NegotiationError> {
        self.require_state(
            "acknowledge",
            &[NegotiationState::Completed, NegotiationState::Rejected],
        )?;
        Ok(vec![Effect::Closed])
    }

    // -----------------------------------------------------------------------
    // AI flow
    // -----------------------------------------------------------------------

    /// Apply the decision service's answer for this round.
    ///
    /// Counters are validated before the trader sees them; accepts are
    /// re-checked for affordability. Anything that fails ends the
    /// negotiation as Rejected. AI trades settle without haggling.
    pub fn apply_ai_action(&mut self, action: TradeAction) -> Result<Vec<Effect>, NegotiationError> {
        if self.session.mode != PlayerMode::Ai {
            return Err(NegotiationError::WrongMode {
                action: "apply ai action",
                expected: PlayerMode::Ai,
            });
        }
        self.require_state(
            "apply ai action",
            &[NegotiationState::OfferMade, NegotiationState::CounterReceived],
        )?;
        if let Some(effects) = self.next_round() {
            return Ok(effects);
        }

        debug!(
            session_id = %self.session.id,
            round = self.session.round_count,
            action = action.keyword(),
            "Decision service answered"
        );

        Ok(match action {
            TradeAction::Reject => self.reject(RejectReason::ServiceDeclined),
            TradeAction::Accept => self.ai_accept(),
            TradeAction::Counter(proposed) => {
                match validate_counter(&proposed, self.ledger, self.trader) {
                    Ok(offer) => self.ai_counter(offer),
                    Err(violation) => {
                        warn!(
                            session_id = %self.session.id,
                            %violation,
                            "Decision service proposed an invalid counter"
                        );
                        self.reject(RejectReason::InvalidCounter(violation))
                    }
                }
            }
        })
    }

    fn ai_accept(&mut self) -> Vec<Effect> {
        if !self.session.offer_on_table {
            return self.reject(RejectReason::NothingToAccept);
        }
        match validate_acceptance(&self.session.current_offer, self.ledger, self.trader) {
            Ok(()) => self.end_trade(self.session.current_offer, 0),
            Err(violation) => {
                warn!(
                    session_id = %self.session.id,
                    %violation,
                    "Decision service accepted an unaffordable offer"
                );
                self.reject(RejectReason::Unaffordable(violation))
            }
        }
    }

    fn ai_counter(&mut self, offer: TradeOffer) -> Vec<Effect> {
        self.session.current_offer = offer;
        self.session.offer_on_table = true;
        let mut effects = vec![Effect::ReflectOffer(offer)];

        match respond(self.trader, &offer) {
            PolicyVerdict::Accept => effects.extend(self.end_trade(offer, 0)),
            PolicyVerdict::Counter(counter) if counter.is_two_sided() => {
                self.session.current_offer = counter;
                self.session.state = NegotiationState::CounterReceived;
                effects.push(Effect::ShowCounter(counter));
                effects.push(Effect::RequestAiDecision(self.decision_request()));
            }
            PolicyVerdict::Counter(_) | PolicyVerdict::NoCounter => {
                effects.extend(self.reject(RejectReason::NoCounter));
            }
        }
        effects
    }

    // -----------------------------------------------------------------------
    // Shared transitions
    // -----------------------------------------------------------------------

    /// Count a round; ends the negotiation once the limit is exceeded.
    fn next_round(&mut self) -> Option<Vec<Effect>> {
        self.session.round_count = self.session.round_count.saturating_add(1);
        (self.session.round_count > self.rules.max_rounds).then(|| self.reject(RejectReason::RoundLimit))
    }

    fn begin_haggle(&mut self) -> Vec<Effect> {
        self.session.state = NegotiationState::Haggling;
        vec![Effect::StartHaggle(HaggleBar::new(
            &self.rules.haggle,
            self.trader.archetype(),
        ))]
    }

    /// Settle `offer` against both sides, all or nothing.
    fn end_trade(&mut self, offer: TradeOffer, discount: u32) -> Vec<Effect> {
        let mut ledger = self.ledger.clone();
        let mut trader = self.trader.clone();
        let settled = ledger
            .apply_trade(&offer)
            .map_err(TradeError::from)
            .and_then(|()| trader.modify_stock(&offer));
        if let Err(error) = settled {
            warn!(session_id = %self.session.id, %error, "Settlement refused");
            return self.reject(RejectReason::SettlementFailed(error));
        }
        *self.ledger = ledger;
        *self.trader = trader;

        let receipt = TradeReceipt {
            session_id: self.session.id,
            trader_id: self.trader.id(),
            archetype: self.trader.archetype(),
            offer,
            discount,
            rounds: self.session.round_count,
            settled_at: Utc::now(),
        };
        self.session.current_offer = offer;
        self.session.state = NegotiationState::Completed;

        info!(
            session_id = %self.session.id,
            trader_id = %receipt.trader_id,
            gold = offer.gold_from_player,
            food = offer.food_to_player,
            water = offer.water_to_player,
            rounds = receipt.rounds,
            "Trade completed"
        );

        let outcome = TradeOutcome::Completed(receipt);
        self.outcome = Some(outcome.clone());
        let mut effects = vec![Effect::ShowResult(outcome)];
        if self.session.mode == PlayerMode::Ai {
            effects.push(Effect::ScheduleAutoClose(self.rules.auto_close));
        }
        effects
    }

    fn reject(&mut self, reason: RejectReason) -> Vec<Effect> {
        self.session.state = NegotiationState::Rejected;
        info!(
            session_id = %self.session.id,
            round = self.session.round_count,
            reason = %reason,
            "Trade rejected"
        );
        let outcome = TradeOutcome::Rejected(reason);
        self.outcome = Some(outcome.clone());
        vec![Effect::ShowResult(outcome)]
    }

    fn require_human(&self, action: &'static str) -> Result<(), NegotiationError> {
        if self.session.mode == PlayerMode::Human {
            Ok(())
        } else {
            Err(NegotiationError::WrongMode {
                action,
                expected: PlayerMode::Human,
            })
        }
    }

    fn require_state(
        &self,
        action: &'static str,
        allowed: &[NegotiationState],
    ) -> Result<(), NegotiationError> {
        if allowed.contains(&self.session.state) {
            Ok(())
        } else {
            Err(NegotiationError::InvalidTransition {
                action,
                state: self.session.state,
            })
        }
    }
}

const fn offer_slot(offer: &mut TradeOffer, kind: ResourceKind) -> Result<&mut u32, NegotiationError> {
    match kind {
        ResourceKind::Gold => Ok(&mut offer.gold_from_player),
        ResourceKind::Food => Ok(&mut offer.food_to_player),
        ResourceKind::Water => Ok(&mut offer.water_to_player),
        ResourceKind::Energy => Err(NegotiationError::UnsupportedResource(kind)),
    }
}

/// Whether one more unit fits both the trader's stock and the wallet.
fn below_limits(offered: u32, stock: u32, ledger: &ResourceLedger, kind: ResourceKind) -> bool {
    offered < stock && offered < ledger.headroom(kind)
}
