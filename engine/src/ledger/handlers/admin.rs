use super::super::*;
use super::{command_failed_vec, credit_delta, debit_delta};

impl<'a, S: Store> Ledger<'a, S> {
    pub(in crate::ledger) async fn handle_add_coins(
        &mut self,
        envelope: &Envelope,
        target: UserId,
        amount: u64,
    ) -> Result<Vec<Event>> {
        let admin = envelope.actor;
        if amount == 0 {
            return Ok(command_failed_vec(
                admin,
                guildmint_types::economy::ERROR_INVALID_AMOUNT,
                "Amount must be greater than zero",
            ));
        }

        let mut account = self.account(target).await?;
        account.balance = account.balance.saturating_add(amount);
        let balance = account.balance;
        self.insert(Key::Account(target), Value::Account(account));

        self.audit(
            AuditKind::AddCoins,
            admin,
            Some(target),
            credit_delta(amount),
            None,
            Some(format!("Granted {amount} coins")),
        );

        tracing::info!(admin = admin.0, target = target.0, amount, balance, "coins added");

        Ok(vec![Event::CoinsAdded {
            target,
            amount,
            balance,
        }])
    }

    pub(in crate::ledger) async fn handle_remove_coins(
        &mut self,
        envelope: &Envelope,
        target: UserId,
        amount: u64,
    ) -> Result<Vec<Event>> {
        let admin = envelope.actor;
        if amount == 0 {
            return Ok(command_failed_vec(
                admin,
                guildmint_types::economy::ERROR_INVALID_AMOUNT,
                "Amount must be greater than zero",
            ));
        }

        let mut account = self.account(target).await?;
        if account.balance < amount {
            return Ok(command_failed_vec(
                admin,
                guildmint_types::economy::ERROR_INSUFFICIENT_FUNDS,
                "That user does not have enough coins",
            ));
        }
        account.balance = account.balance.saturating_sub(amount);
        let balance = account.balance;
        self.insert(Key::Account(target), Value::Account(account));

        self.audit(
            AuditKind::RemoveCoins,
            admin,
            Some(target),
            debit_delta(amount),
            None,
            Some(format!("Removed {amount} coins")),
        );

        tracing::info!(admin = admin.0, target = target.0, amount, balance, "coins removed");

        Ok(vec![Event::CoinsRemoved {
            target,
            amount,
            balance,
        }])
    }

    pub(in crate::ledger) async fn handle_set_coins(
        &mut self,
        envelope: &Envelope,
        target: UserId,
        amount: u64,
    ) -> Result<Vec<Event>> {
        let admin = envelope.actor;

        let mut account = self.account(target).await?;
        // The audit row records the realized change, not the requested total.
        let delta = credit_delta(amount).saturating_sub(credit_delta(account.balance));
        account.balance = amount;
        self.insert(Key::Account(target), Value::Account(account));

        self.audit(
            AuditKind::SetCoins,
            admin,
            Some(target),
            delta,
            None,
            Some(format!("Set balance to {amount} coins")),
        );

        tracing::info!(admin = admin.0, target = target.0, balance = amount, "balance set");

        Ok(vec![Event::CoinsSet {
            target,
            balance: amount,
        }])
    }

    pub(in crate::ledger) async fn handle_reset_inventory(
        &mut self,
        envelope: &Envelope,
        target: UserId,
    ) -> Result<Vec<Event>> {
        let admin = envelope.actor;

        let mut account = self.account(target).await?;
        let lines_removed = account.inventory.len() as u32;
        account.inventory.clear();
        self.insert(Key::Account(target), Value::Account(account));

        self.audit(
            AuditKind::ResetInventory,
            admin,
            Some(target),
            0,
            None,
            Some(format!("Cleared {lines_removed} inventory lines")),
        );

        tracing::info!(admin = admin.0, target = target.0, lines_removed, "inventory reset");

        Ok(vec![Event::InventoryReset {
            target,
            lines_removed,
        }])
    }

    pub(in crate::ledger) async fn handle_setup(
        &mut self,
        envelope: &Envelope,
        daily_reward: u64,
        weekly_reward: u64,
        admin_role: Option<RoleId>,
        log_channel: Option<ChannelId>,
    ) -> Result<Vec<Event>> {
        let admin = envelope.actor;
        if daily_reward == 0 || weekly_reward == 0 {
            return Ok(command_failed_vec(
                admin,
                guildmint_types::economy::ERROR_INVALID_AMOUNT,
                "Reward amounts must be greater than zero",
            ));
        }

        // Rewrites the reward schedule and wiring but leaves the enabled flag
        // alone; toggling the economy is its own command.
        let mut settings = self.settings(envelope.guild).await?;
        settings.daily_reward = daily_reward;
        settings.weekly_reward = weekly_reward;
        settings.admin_role = admin_role;
        settings.log_channel = log_channel;
        self.insert(Key::Settings(envelope.guild), Value::Settings(settings));

        self.audit(
            AuditKind::Setup,
            admin,
            None,
            0,
            None,
            Some(format!(
                "Configured rewards: daily {daily_reward}, weekly {weekly_reward}"
            )),
        );

        tracing::info!(admin = admin.0, daily_reward, weekly_reward, "guild configured");

        Ok(vec![Event::SettingsUpdated {
            daily_reward,
            weekly_reward,
        }])
    }

    pub(in crate::ledger) async fn handle_set_economy_enabled(
        &mut self,
        envelope: &Envelope,
        enabled: bool,
    ) -> Result<Vec<Event>> {
        let admin = envelope.actor;

        let mut settings = self.settings(envelope.guild).await?;
        settings.economy_enabled = enabled;
        self.insert(Key::Settings(envelope.guild), Value::Settings(settings));

        let (kind, description, event) = if enabled {
            (
                AuditKind::EnableEconomy,
                "Enabled the economy",
                Event::EconomyEnabled,
            )
        } else {
            (
                AuditKind::DisableEconomy,
                "Disabled the economy",
                Event::EconomyDisabled,
            )
        };
        self.audit(kind, admin, None, 0, None, Some(description.to_string()));

        tracing::info!(admin = admin.0, enabled, "economy toggled");

        Ok(vec![event])
    }
}
