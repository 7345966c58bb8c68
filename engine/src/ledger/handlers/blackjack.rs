use super::super::*;
use super::{check_stake, command_failed_vec, net_delta};

use crate::games::blackjack::{self, MoveOutcome};
use guildmint_types::event::WagerOutcome;
use guildmint_types::BlackjackAction;

impl<'a, S: Store> Ledger<'a, S> {
    pub(in crate::ledger) async fn handle_blackjack_deal(
        &mut self,
        envelope: &Envelope,
        stake: u64,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let mut account = self.account(user).await?;
        if let Some(events) = check_stake(user, account.balance, stake) {
            return Ok(events);
        }
        if let Some(open) = self.session_for_user(user).await? {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_SESSION_EXISTS,
                format!("Hand #{} is still in progress", open.id),
            ));
        }

        let session_id = self.sequences.next_session();
        let mut rng = self.rng(session_id, 0);

        match blackjack::deal(&mut rng) {
            MoveOutcome::Continue(state) => {
                // The stake moves into escrow until the hand settles or expires.
                account.balance = account.balance.saturating_sub(stake);
                let balance = account.balance;
                self.insert(Key::Account(user), Value::Account(account));

                let deadline_ms = self
                    .now_ms
                    .saturating_add(guildmint_types::economy::BLACKJACK_TURN_TIMEOUT_MS);
                let session = BlackjackSession {
                    id: session_id,
                    owner: user,
                    guild: envelope.guild,
                    stake,
                    deadline_ms,
                    move_count: 0,
                    state: state.serialize(),
                };
                self.insert(Key::Session(session_id), Value::Session(session));

                tracing::info!(
                    user = user.0,
                    session = session_id,
                    stake,
                    balance,
                    "blackjack hand dealt"
                );

                Ok(vec![Event::BlackjackStarted {
                    session_id,
                    user,
                    stake,
                    player: blackjack::hand_labels(&state.player),
                    dealer_up: state
                        .dealer
                        .first()
                        .map(|&card| blackjack::card_label(card))
                        .unwrap_or("?")
                        .to_string(),
                    player_total: blackjack::hand_total(&state.player),
                    deadline_ms,
                }])
            }
            MoveOutcome::Settled(settlement) => {
                // A two-card 21 settles on the spot; escrow and payout collapse
                // into one balance change.
                let payout = blackjack::payout_for(settlement.outcome, stake);
                account.balance = account.balance.saturating_sub(stake).saturating_add(payout);
                let balance = account.balance;
                self.insert(Key::Account(user), Value::Account(account));

                self.audit(
                    AuditKind::Blackjack,
                    user,
                    None,
                    net_delta(stake, payout),
                    None,
                    Some("Blackjack natural".to_string()),
                );

                tracing::info!(
                    user = user.0,
                    session = session_id,
                    stake,
                    payout,
                    balance,
                    "blackjack natural"
                );

                Ok(vec![Event::BlackjackSettled {
                    session_id,
                    user,
                    stake,
                    player: blackjack::hand_labels(&settlement.player),
                    dealer: blackjack::hand_labels(&settlement.dealer),
                    player_total: settlement.player_total,
                    dealer_total: settlement.dealer_total,
                    outcome: settlement.outcome,
                    payout,
                    balance,
                }])
            }
        }
    }

    pub(in crate::ledger) async fn handle_blackjack_move(
        &mut self,
        envelope: &Envelope,
        session_id: u64,
        action: BlackjackAction,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let Some(mut session) = self.session(session_id).await? else {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_SESSION_NOT_FOUND,
                "No such blackjack hand",
            ));
        };
        if session.owner != user {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_SESSION_NOT_OWNED,
                "That blackjack hand belongs to someone else",
            ));
        }
        if session.deadline_ms <= self.now_ms {
            // Too late: the hand is void and the stake comes back.
            return self.expire_session(session).await;
        }
        let Some(state) = blackjack::BlackjackState::parse(&session.state) else {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_INVALID_MOVE,
                "Hand state could not be read",
            ));
        };
        // Persisted hands are always mid-play; a terminal total means the blob
        // was written by something else. The expiry sweep will refund it.
        if blackjack::hand_total(&state.player) >= 21 {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_SESSION_COMPLETE,
                "That hand has already been played out",
            ));
        }

        session.move_count = session.move_count.saturating_add(1);
        let mut rng = self.rng(session_id, session.move_count);

        match blackjack::apply_move(state, action, &mut rng) {
            MoveOutcome::Continue(state) => {
                let deadline_ms = self
                    .now_ms
                    .saturating_add(guildmint_types::economy::BLACKJACK_TURN_TIMEOUT_MS);
                session.deadline_ms = deadline_ms;
                session.state = state.serialize();
                let move_number = session.move_count;
                self.insert(Key::Session(session_id), Value::Session(session));

                Ok(vec![Event::BlackjackMoved {
                    session_id,
                    action,
                    move_number,
                    player: blackjack::hand_labels(&state.player),
                    player_total: blackjack::hand_total(&state.player),
                    deadline_ms,
                }])
            }
            MoveOutcome::Settled(settlement) => {
                let payout = blackjack::payout_for(settlement.outcome, session.stake);
                let mut account = self.account(user).await?;
                // The stake is already escrowed; only the payout lands now.
                account.balance = account.balance.saturating_add(payout);
                let balance = account.balance;
                self.insert(Key::Account(user), Value::Account(account));
                self.remove(&Key::Session(session_id));

                let description = match settlement.outcome {
                    WagerOutcome::Won => "Won blackjack hand",
                    WagerOutcome::Lost => "Lost blackjack hand",
                    WagerOutcome::Draw => "Blackjack push",
                };
                self.audit(
                    AuditKind::Blackjack,
                    user,
                    None,
                    net_delta(session.stake, payout),
                    None,
                    Some(description.to_string()),
                );

                tracing::info!(
                    user = user.0,
                    session = session_id,
                    stake = session.stake,
                    payout,
                    balance,
                    "blackjack settled"
                );

                Ok(vec![Event::BlackjackSettled {
                    session_id,
                    user,
                    stake: session.stake,
                    player: blackjack::hand_labels(&settlement.player),
                    dealer: blackjack::hand_labels(&settlement.dealer),
                    player_total: settlement.player_total,
                    dealer_total: settlement.dealer_total,
                    outcome: settlement.outcome,
                    payout,
                    balance,
                }])
            }
        }
    }
}
