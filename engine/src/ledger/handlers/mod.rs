use super::*;

fn command_failed(user: UserId, code: u8, message: impl Into<String>) -> Event {
    Event::CommandFailed {
        user,
        code,
        message: message.into(),
    }
}

fn command_failed_vec(user: UserId, code: u8, message: impl Into<String>) -> Vec<Event> {
    vec![command_failed(user, code, message)]
}

/// Audit delta for an amount credited to the user.
fn credit_delta(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

/// Audit delta for an amount debited from the user.
fn debit_delta(amount: u64) -> i64 {
    credit_delta(amount).saturating_neg()
}

/// Net audit delta for a wager settled at `payout` against `stake`.
fn net_delta(stake: u64, payout: u64) -> i64 {
    credit_delta(payout).saturating_sub(credit_delta(stake))
}

/// Rejection events for an unplayable wager, `None` when the stake is fine.
fn check_stake(user: UserId, balance: u64, stake: u64) -> Option<Vec<Event>> {
    if stake == 0 {
        return Some(command_failed_vec(
            user,
            guildmint_types::economy::ERROR_INVALID_AMOUNT,
            "Stake must be greater than zero",
        ));
    }
    if balance < stake {
        return Some(command_failed_vec(
            user,
            guildmint_types::economy::ERROR_INSUFFICIENT_FUNDS,
            "Insufficient balance for this stake",
        ));
    }
    None
}

mod admin;
mod blackjack;
mod earnings;
mod shop;
mod wagers;
