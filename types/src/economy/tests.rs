use super::*;
use crate::ids::{ChannelId, GuildId, RoleId, UserId};
use commonware_codec::{Encode, EncodeSize, ReadExt};

fn sample_account() -> Account {
    Account {
        balance: 1_250,
        last_daily_ms: 1_700_000_000_000,
        last_weekly_ms: 1_699_500_000_000,
        last_work_ms: 1_700_003_600_000,
        inventory: vec![
            OwnedItem {
                item: "Sword".to_string(),
                quantity: 2,
            },
            OwnedItem {
                item: "Mystery Box".to_string(),
                quantity: 1,
            },
        ],
    }
}

#[test]
fn test_account_roundtrip() {
    let account = sample_account();
    account.validate_invariants().expect("valid invariants");
    let encoded = account.encode();
    assert_eq!(encoded.len(), account.encode_size());
    let decoded = Account::read(&mut &encoded[..]).unwrap();
    assert_eq!(account, decoded);
}

#[test]
fn test_account_default_has_no_claims() {
    let account = Account::default();
    assert_eq!(account.balance, 0);
    assert_eq!(account.last_daily_ms, 0);
    assert_eq!(account.last_weekly_ms, 0);
    assert_eq!(account.last_work_ms, 0);
    assert!(account.inventory.is_empty());
}

#[test]
fn test_account_grant_item_increments_existing_line() {
    let mut account = Account::default();
    account.grant_item("Sword");
    account.grant_item("Sword");
    account.grant_item("Shield");

    assert_eq!(account.quantity_of("Sword"), 2);
    assert_eq!(account.quantity_of("Shield"), 1);
    assert_eq!(account.quantity_of("Potion"), 0);
    assert_eq!(account.inventory.len(), 2);
}

#[test]
fn test_account_validate_rejects_zero_quantity_line() {
    let account = Account {
        inventory: vec![OwnedItem {
            item: "Sword".to_string(),
            quantity: 0,
        }],
        ..Default::default()
    };
    assert!(matches!(
        account.validate_invariants(),
        Err(AccountInvariantError::ZeroQuantityLine { .. })
    ));
}

#[test]
fn test_account_validate_rejects_duplicate_lines() {
    let line = OwnedItem {
        item: "Sword".to_string(),
        quantity: 1,
    };
    let account = Account {
        inventory: vec![line.clone(), line],
        ..Default::default()
    };
    assert!(matches!(
        account.validate_invariants(),
        Err(AccountInvariantError::DuplicateLine { .. })
    ));
}

#[test]
fn test_account_decode_rejects_oversized_inventory() {
    let account = Account {
        inventory: (0..=MAX_INVENTORY_LINES)
            .map(|i| OwnedItem {
                item: format!("item{i}"),
                quantity: 1,
            })
            .collect(),
        ..Default::default()
    };
    assert!(matches!(
        account.validate_invariants(),
        Err(AccountInvariantError::TooManyLines { .. })
    ));

    let encoded = account.encode();
    let err = Account::read(&mut &encoded[..]).expect_err("should reject oversized inventory");
    assert!(matches!(err, commonware_codec::Error::Invalid(_, _)));
}

fn sample_item() -> ShopItem {
    ShopItem {
        name: "Sword".to_string(),
        price: 100,
        description: Some("A pointy stick.".to_string()),
        image_url: Some("https://cdn.example.com/sword.png".to_string()),
        stock_cap: Some(10),
        user_cap: Some(1),
        role_reward: Some(RoleId(555)),
        sold: 3,
    }
}

#[test]
fn test_shop_item_roundtrip() {
    let item = sample_item();
    item.validate_invariants().expect("valid invariants");
    let encoded = item.encode();
    assert_eq!(encoded.len(), item.encode_size());
    let decoded = ShopItem::read(&mut &encoded[..]).unwrap();
    assert_eq!(item, decoded);
}

#[test]
fn test_shop_item_roundtrip_without_optionals() {
    let item = ShopItem {
        name: "Pebble".to_string(),
        price: 1,
        description: None,
        image_url: None,
        stock_cap: None,
        user_cap: None,
        role_reward: None,
        sold: 0,
    };
    item.validate_invariants().expect("valid invariants");
    let encoded = item.encode();
    let decoded = ShopItem::read(&mut &encoded[..]).unwrap();
    assert_eq!(item, decoded);
}

#[test]
fn test_shop_item_validate_rejects_zero_price() {
    let item = ShopItem {
        price: 0,
        ..sample_item()
    };
    assert!(matches!(
        item.validate_invariants(),
        Err(ShopItemInvariantError::ZeroPrice)
    ));
}

#[test]
fn test_shop_item_validate_rejects_zero_caps() {
    let item = ShopItem {
        stock_cap: Some(0),
        ..sample_item()
    };
    assert!(matches!(
        item.validate_invariants(),
        Err(ShopItemInvariantError::ZeroStockCap)
    ));

    let item = ShopItem {
        stock_cap: None,
        user_cap: Some(0),
        sold: 0,
        ..sample_item()
    };
    assert!(matches!(
        item.validate_invariants(),
        Err(ShopItemInvariantError::ZeroUserCap)
    ));
}

#[test]
fn test_shop_item_validate_rejects_oversold() {
    let item = ShopItem {
        stock_cap: Some(2),
        sold: 3,
        ..sample_item()
    };
    assert!(matches!(
        item.validate_invariants(),
        Err(ShopItemInvariantError::Oversold { sold: 3, cap: 2 })
    ));
}

#[test]
fn test_shop_item_remaining_stock() {
    let item = sample_item();
    assert_eq!(item.remaining_stock(), Some(7));

    let unlimited = ShopItem {
        stock_cap: None,
        ..sample_item()
    };
    assert_eq!(unlimited.remaining_stock(), None);
}

#[test]
fn test_settings_roundtrip() {
    let settings = GuildSettings {
        daily_reward: 250,
        weekly_reward: 1_000,
        admin_role: Some(RoleId(42)),
        log_channel: Some(ChannelId(999)),
        economy_enabled: false,
    };
    let encoded = settings.encode();
    assert_eq!(encoded.len(), settings.encode_size());
    let decoded = GuildSettings::read(&mut &encoded[..]).unwrap();
    assert_eq!(settings, decoded);
}

#[test]
fn test_settings_default() {
    let settings = GuildSettings::default();
    assert_eq!(settings.daily_reward, DEFAULT_DAILY_REWARD);
    assert_eq!(settings.weekly_reward, DEFAULT_WEEKLY_REWARD);
    assert!(settings.economy_enabled);
    assert!(settings.admin_role.is_none());
    assert!(settings.log_channel.is_none());
}

#[test]
fn test_settings_decode_without_toggle_defaults_enabled() {
    // Records written before the enable/disable toggle stop one byte short.
    let settings = GuildSettings {
        economy_enabled: false,
        ..Default::default()
    };
    let encoded = settings.encode();
    let truncated = &encoded[..encoded.len() - 1];
    let decoded = GuildSettings::read(&mut &truncated[..]).unwrap();
    assert!(decoded.economy_enabled);
    assert_eq!(decoded.daily_reward, settings.daily_reward);
}

#[test]
fn test_audit_kind_roundtrip() {
    for kind in [
        AuditKind::Daily,
        AuditKind::Weekly,
        AuditKind::Work,
        AuditKind::Slots,
        AuditKind::CoinFlip,
        AuditKind::Rps,
        AuditKind::Lottery,
        AuditKind::SpinWheel,
        AuditKind::Blackjack,
        AuditKind::Buy,
        AuditKind::AddItem,
        AuditKind::EditItem,
        AuditKind::RemoveItem,
        AuditKind::ClearShop,
        AuditKind::AddCoins,
        AuditKind::RemoveCoins,
        AuditKind::SetCoins,
        AuditKind::ResetInventory,
        AuditKind::Setup,
        AuditKind::EnableEconomy,
        AuditKind::DisableEconomy,
    ] {
        let encoded = kind.encode();
        let decoded = AuditKind::read(&mut &encoded[..]).unwrap();
        assert_eq!(kind, decoded);
        assert!(!kind.as_str().is_empty());
    }
}

#[test]
fn test_audit_kind_rejects_unknown_tag() {
    let buf = [21u8];
    let err = AuditKind::read(&mut &buf[..]).expect_err("should reject unknown tag");
    assert!(matches!(err, commonware_codec::Error::InvalidEnum(21)));
}

#[test]
fn test_audit_entry_roundtrip() {
    let entry = AuditEntry {
        id: 77,
        at_ms: 1_700_000_000_000,
        kind: AuditKind::RemoveCoins,
        user: UserId(12),
        target: Some(UserId(34)),
        delta: -250,
        item: None,
        description: Some("cheating".to_string()),
    };
    let encoded = entry.encode();
    assert_eq!(encoded.len(), entry.encode_size());
    let decoded = AuditEntry::read(&mut &encoded[..]).unwrap();
    assert_eq!(entry, decoded);
}

#[test]
fn test_session_roundtrip() {
    let session = BlackjackSession {
        id: 9,
        owner: UserId(12),
        guild: GuildId(7),
        stake: 50,
        deadline_ms: 1_700_000_060_000,
        move_count: 2,
        state: vec![1, 11, 2, 10, 5],
    };
    let encoded = session.encode();
    assert_eq!(encoded.len(), session.encode_size());
    let decoded = BlackjackSession::read(&mut &encoded[..]).unwrap();
    assert_eq!(session, decoded);
}

#[test]
fn test_session_decode_rejects_oversized_state() {
    let session = BlackjackSession {
        id: 9,
        owner: UserId(12),
        guild: GuildId(7),
        stake: 50,
        deadline_ms: 0,
        move_count: 0,
        state: vec![0u8; MAX_SESSION_STATE_LENGTH + 1],
    };
    let encoded = session.encode();
    let err = BlackjackSession::read(&mut &encoded[..]).expect_err("should reject oversized state");
    assert!(matches!(err, commonware_codec::Error::InvalidLength(_)));
}
