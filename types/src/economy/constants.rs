/// Maximum length for shop item names.
pub const MAX_ITEM_NAME_LENGTH: usize = 64;

/// Maximum length for item descriptions.
pub const MAX_DESCRIPTION_LENGTH: usize = 512;

/// Maximum length for item image URLs.
pub const MAX_IMAGE_URL_LENGTH: usize = 512;

/// Maximum length for audit descriptions.
pub const MAX_AUDIT_DESCRIPTION_LENGTH: usize = 1_024;

/// Maximum number of distinct inventory lines per account.
pub const MAX_INVENTORY_LINES: usize = 256;

/// Cooldown between daily claims.
pub const DAILY_COOLDOWN_MS: u64 = 24 * 60 * 60 * 1_000;

/// Cooldown between weekly claims.
pub const WEEKLY_COOLDOWN_MS: u64 = 7 * 24 * 60 * 60 * 1_000;

/// Cooldown between work shifts.
pub const WORK_COOLDOWN_MS: u64 = 60 * 60 * 1_000;

/// Default daily reward for guilds that have not configured one.
pub const DEFAULT_DAILY_REWARD: u64 = 100;

/// Default weekly reward for guilds that have not configured one.
pub const DEFAULT_WEEKLY_REWARD: u64 = 500;

/// Inactivity window before a blackjack session is cancelled and refunded.
/// Refreshed on every move.
pub const BLACKJACK_TURN_TIMEOUT_MS: u64 = 60_000;

/// Dealer stands at or above this total.
pub const BLACKJACK_DEALER_STAND: u8 = 17;

/// Upper bound accepted for serialized blackjack state blobs.
pub const MAX_SESSION_STATE_LENGTH: usize = 256;

/// Error codes carried by `Event::CommandFailed`.
pub const ERROR_ECONOMY_DISABLED: u8 = 1;
pub const ERROR_PERMISSION_DENIED: u8 = 2;
pub const ERROR_INVALID_AMOUNT: u8 = 3;
pub const ERROR_INSUFFICIENT_FUNDS: u8 = 4;
pub const ERROR_COOLDOWN_ACTIVE: u8 = 5;
pub const ERROR_ITEM_NOT_FOUND: u8 = 6;
pub const ERROR_ITEM_EXISTS: u8 = 7;
pub const ERROR_OUT_OF_STOCK: u8 = 8;
pub const ERROR_USER_CAP_REACHED: u8 = 9;
pub const ERROR_SESSION_EXISTS: u8 = 10;
pub const ERROR_SESSION_NOT_FOUND: u8 = 11;
pub const ERROR_SESSION_NOT_OWNED: u8 = 12;
pub const ERROR_SESSION_COMPLETE: u8 = 13;
pub const ERROR_INVALID_MOVE: u8 = 14;
pub const ERROR_INVALID_ITEM: u8 = 15;
