use super::super::*;
use super::{check_stake, command_failed_vec, net_delta};

use crate::games::{coinflip, lottery, rps, slots, wheel};
use guildmint_types::event::WagerOutcome;
use guildmint_types::{CoinSide, RpsHand, TicketTier};

impl<'a, S: Store> Ledger<'a, S> {
    pub(in crate::ledger) async fn handle_slots(
        &mut self,
        envelope: &Envelope,
        stake: u64,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let mut account = self.account(user).await?;
        if let Some(events) = check_stake(user, account.balance, stake) {
            return Ok(events);
        }

        let audit_id = self.sequences.next_audit();
        let mut rng = self.rng(audit_id, 0);
        let spin = slots::spin(stake, &mut rng);

        // Gross settlement: the stake leaves first; a winning grid returns it plus
        // the line winnings.
        let payout = if spin.winnings > 0 {
            stake.saturating_add(spin.winnings)
        } else {
            0
        };
        account.balance = account.balance.saturating_sub(stake).saturating_add(payout);
        let balance = account.balance;
        self.insert(Key::Account(user), Value::Account(account));

        self.audit_with_id(
            audit_id,
            AuditKind::Slots,
            user,
            None,
            net_delta(stake, payout),
            None,
            Some("Slot machine spin".to_string()),
        );

        tracing::info!(user = user.0, stake, payout, balance, "slots resolved");

        Ok(vec![Event::SlotsResolved {
            user,
            stake,
            grid: slots::grid_symbols(&spin.grid),
            payout,
            balance,
        }])
    }

    pub(in crate::ledger) async fn handle_flip_coin(
        &mut self,
        envelope: &Envelope,
        stake: u64,
        side: CoinSide,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let mut account = self.account(user).await?;
        if let Some(events) = check_stake(user, account.balance, stake) {
            return Ok(events);
        }

        let audit_id = self.sequences.next_audit();
        let mut rng = self.rng(audit_id, 0);
        let landed = coinflip::flip(&mut rng);

        let outcome = if landed == side {
            WagerOutcome::Won
        } else {
            WagerOutcome::Lost
        };
        let payout = match outcome {
            WagerOutcome::Won => stake.saturating_mul(2),
            _ => 0,
        };
        account.balance = account.balance.saturating_sub(stake).saturating_add(payout);
        let balance = account.balance;
        self.insert(Key::Account(user), Value::Account(account));

        self.audit_with_id(
            audit_id,
            AuditKind::CoinFlip,
            user,
            None,
            net_delta(stake, payout),
            None,
            Some("Coin flip".to_string()),
        );

        tracing::info!(user = user.0, stake, payout, balance, "coin flip resolved");

        Ok(vec![Event::CoinFlipResolved {
            user,
            stake,
            side,
            landed,
            outcome,
            payout,
            balance,
        }])
    }

    pub(in crate::ledger) async fn handle_rps(
        &mut self,
        envelope: &Envelope,
        stake: u64,
        hand: RpsHand,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let mut account = self.account(user).await?;
        if let Some(events) = check_stake(user, account.balance, stake) {
            return Ok(events);
        }

        let audit_id = self.sequences.next_audit();
        let mut rng = self.rng(audit_id, 0);
        let reply = rps::reply_hand(&mut rng);
        let outcome = rps::resolve(hand, reply);

        let payout = match outcome {
            WagerOutcome::Won => stake.saturating_mul(2),
            WagerOutcome::Draw => stake,
            WagerOutcome::Lost => 0,
        };
        account.balance = account.balance.saturating_sub(stake).saturating_add(payout);
        let balance = account.balance;
        self.insert(Key::Account(user), Value::Account(account));

        self.audit_with_id(
            audit_id,
            AuditKind::Rps,
            user,
            None,
            net_delta(stake, payout),
            None,
            Some("Rock-paper-scissors".to_string()),
        );

        tracing::info!(user = user.0, stake, payout, balance, "rps resolved");

        Ok(vec![Event::RpsResolved {
            user,
            stake,
            hand,
            reply,
            outcome,
            payout,
            balance,
        }])
    }

    pub(in crate::ledger) async fn handle_lottery(
        &mut self,
        envelope: &Envelope,
        tier: TicketTier,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let price = tier.price();
        let mut account = self.account(user).await?;
        if account.balance < price {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_INSUFFICIENT_FUNDS,
                "Insufficient balance for this ticket",
            ));
        }

        let audit_id = self.sequences.next_audit();
        let mut rng = self.rng(audit_id, 0);
        let prize = lottery::scratch(tier, &mut rng);

        account.balance = account.balance.saturating_sub(price).saturating_add(prize);
        let balance = account.balance;
        self.insert(Key::Account(user), Value::Account(account));

        self.audit_with_id(
            audit_id,
            AuditKind::Lottery,
            user,
            None,
            net_delta(price, prize),
            None,
            Some(format!("{tier:?} lottery ticket")),
        );

        tracing::info!(user = user.0, ?tier, price, prize, balance, "lottery resolved");

        Ok(vec![Event::LotteryResolved {
            user,
            tier,
            price,
            prize,
            balance,
        }])
    }

    pub(in crate::ledger) async fn handle_spin_wheel(
        &mut self,
        envelope: &Envelope,
        stake: u64,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let mut account = self.account(user).await?;
        if let Some(events) = check_stake(user, account.balance, stake) {
            return Ok(events);
        }

        let audit_id = self.sequences.next_audit();
        let mut rng = self.rng(audit_id, 0);
        let spin = wheel::spin(stake, &mut rng);

        account.balance = account
            .balance
            .saturating_sub(stake)
            .saturating_add(spin.payout);
        let balance = account.balance;
        self.insert(Key::Account(user), Value::Account(account));

        self.audit_with_id(
            audit_id,
            AuditKind::SpinWheel,
            user,
            None,
            net_delta(stake, spin.payout),
            None,
            Some("Wheel spin".to_string()),
        );

        tracing::info!(
            user = user.0,
            stake,
            segment = %spin.segment,
            payout = spin.payout,
            balance,
            "wheel resolved"
        );

        Ok(vec![Event::SpinWheelResolved {
            user,
            stake,
            segment: spin.segment,
            payout: spin.payout,
            balance,
        }])
    }
}
