use super::super::*;
use super::{command_failed_vec, credit_delta};

use crate::cooldown::check_cooldown;
use crate::games::work;

impl<'a, S: Store> Ledger<'a, S> {
    pub(in crate::ledger) async fn handle_daily(
        &mut self,
        envelope: &Envelope,
        settings: &GuildSettings,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let mut account = self.account(user).await?;

        let check = check_cooldown(
            account.last_daily_ms,
            guildmint_types::economy::DAILY_COOLDOWN_MS,
            self.now_ms,
        );
        if !check.eligible {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_COOLDOWN_ACTIVE,
                "Daily reward already claimed, try again later",
            ));
        }

        let amount = settings.daily_reward;
        account.balance = account.balance.saturating_add(amount);
        account.last_daily_ms = self.now_ms;
        let balance = account.balance;
        self.insert(Key::Account(user), Value::Account(account));

        self.audit(
            AuditKind::Daily,
            user,
            None,
            credit_delta(amount),
            None,
            Some("Claimed daily reward".to_string()),
        );

        tracing::info!(user = user.0, amount, balance, "daily reward claimed");

        Ok(vec![Event::DailyClaimed {
            user,
            amount,
            balance,
            next_claim_ms: self
                .now_ms
                .saturating_add(guildmint_types::economy::DAILY_COOLDOWN_MS),
        }])
    }

    pub(in crate::ledger) async fn handle_weekly(
        &mut self,
        envelope: &Envelope,
        settings: &GuildSettings,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let mut account = self.account(user).await?;

        let check = check_cooldown(
            account.last_weekly_ms,
            guildmint_types::economy::WEEKLY_COOLDOWN_MS,
            self.now_ms,
        );
        if !check.eligible {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_COOLDOWN_ACTIVE,
                "Weekly reward already claimed, try again later",
            ));
        }

        let amount = settings.weekly_reward;
        account.balance = account.balance.saturating_add(amount);
        account.last_weekly_ms = self.now_ms;
        let balance = account.balance;
        self.insert(Key::Account(user), Value::Account(account));

        self.audit(
            AuditKind::Weekly,
            user,
            None,
            credit_delta(amount),
            None,
            Some("Claimed weekly reward".to_string()),
        );

        tracing::info!(user = user.0, amount, balance, "weekly reward claimed");

        Ok(vec![Event::WeeklyClaimed {
            user,
            amount,
            balance,
            next_claim_ms: self
                .now_ms
                .saturating_add(guildmint_types::economy::WEEKLY_COOLDOWN_MS),
        }])
    }

    pub(in crate::ledger) async fn handle_work(&mut self, envelope: &Envelope) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let mut account = self.account(user).await?;

        let check = check_cooldown(
            account.last_work_ms,
            guildmint_types::economy::WORK_COOLDOWN_MS,
            self.now_ms,
        );
        if !check.eligible {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_COOLDOWN_ACTIVE,
                "You are still on shift, try again later",
            ));
        }

        let audit_id = self.sequences.next_audit();
        let mut rng = self.rng(audit_id, 0);
        let shift = work::pick_shift(&mut rng);

        account.balance = account.balance.saturating_add(shift.earnings);
        account.last_work_ms = self.now_ms;
        let balance = account.balance;
        self.insert(Key::Account(user), Value::Account(account));

        self.audit_with_id(
            audit_id,
            AuditKind::Work,
            user,
            None,
            credit_delta(shift.earnings),
            None,
            Some(format!("Worked as {}", shift.job)),
        );

        tracing::info!(
            user = user.0,
            job = shift.job,
            amount = shift.earnings,
            balance,
            "work shift paid out"
        );

        Ok(vec![Event::Worked {
            user,
            job: shift.job.to_string(),
            amount: shift.earnings,
            balance,
        }])
    }
}
