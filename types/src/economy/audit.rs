use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};

use super::{
    opt_string_encode_size, read_opt_string, write_opt_string, MAX_AUDIT_DESCRIPTION_LENGTH,
    MAX_ITEM_NAME_LENGTH,
};
use crate::ids::UserId;

/// What a ledger mutation was. Doubles as the action label in log-channel output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AuditKind {
    Daily = 0,
    Weekly = 1,
    Work = 2,
    Slots = 3,
    CoinFlip = 4,
    Rps = 5,
    Lottery = 6,
    SpinWheel = 7,
    Blackjack = 8,
    Buy = 9,
    AddItem = 10,
    EditItem = 11,
    RemoveItem = 12,
    ClearShop = 13,
    AddCoins = 14,
    RemoveCoins = 15,
    SetCoins = 16,
    ResetInventory = 17,
    Setup = 18,
    EnableEconomy = 19,
    DisableEconomy = 20,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Work => "work",
            Self::Slots => "slots",
            Self::CoinFlip => "coin_flip",
            Self::Rps => "rps",
            Self::Lottery => "lottery",
            Self::SpinWheel => "spin_wheel",
            Self::Blackjack => "blackjack",
            Self::Buy => "buy",
            Self::AddItem => "add_item",
            Self::EditItem => "edit_item",
            Self::RemoveItem => "remove_item",
            Self::ClearShop => "clear_shop",
            Self::AddCoins => "add_coins",
            Self::RemoveCoins => "remove_coins",
            Self::SetCoins => "set_coins",
            Self::ResetInventory => "reset_inventory",
            Self::Setup => "setup",
            Self::EnableEconomy => "enable_economy",
            Self::DisableEconomy => "disable_economy",
        }
    }
}

impl Write for AuditKind {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for AuditKind {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Daily),
            1 => Ok(Self::Weekly),
            2 => Ok(Self::Work),
            3 => Ok(Self::Slots),
            4 => Ok(Self::CoinFlip),
            5 => Ok(Self::Rps),
            6 => Ok(Self::Lottery),
            7 => Ok(Self::SpinWheel),
            8 => Ok(Self::Blackjack),
            9 => Ok(Self::Buy),
            10 => Ok(Self::AddItem),
            11 => Ok(Self::EditItem),
            12 => Ok(Self::RemoveItem),
            13 => Ok(Self::ClearShop),
            14 => Ok(Self::AddCoins),
            15 => Ok(Self::RemoveCoins),
            16 => Ok(Self::SetCoins),
            17 => Ok(Self::ResetInventory),
            18 => Ok(Self::Setup),
            19 => Ok(Self::EnableEconomy),
            20 => Ok(Self::DisableEconomy),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for AuditKind {
    const SIZE: usize = 1;
}

/// One append-only audit record.
///
/// `delta` is the signed balance change applied to `user` (zero for actions that
/// only touch the catalog or settings). `target` is set when an admin acted on
/// someone else's account. Ids are strictly increasing and double as the scan order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: u64,
    pub at_ms: u64,
    pub kind: AuditKind,
    pub user: UserId,
    pub target: Option<UserId>,
    pub delta: i64,
    pub item: Option<String>,
    pub description: Option<String>,
}

impl Write for AuditEntry {
    fn write(&self, writer: &mut impl BufMut) {
        self.id.write(writer);
        self.at_ms.write(writer);
        self.kind.write(writer);
        self.user.write(writer);
        self.target.as_ref().map(|t| t.0).write(writer);
        self.delta.write(writer);
        write_opt_string(&self.item, writer);
        write_opt_string(&self.description, writer);
    }
}

impl Read for AuditEntry {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            id: u64::read(reader)?,
            at_ms: u64::read(reader)?,
            kind: AuditKind::read(reader)?,
            user: UserId::read(reader)?,
            target: Option::<u64>::read(reader)?.map(UserId),
            delta: i64::read(reader)?,
            item: read_opt_string(reader, MAX_ITEM_NAME_LENGTH)?,
            description: read_opt_string(reader, MAX_AUDIT_DESCRIPTION_LENGTH)?,
        })
    }
}

impl EncodeSize for AuditEntry {
    fn encode_size(&self) -> usize {
        self.id.encode_size()
            + self.at_ms.encode_size()
            + AuditKind::SIZE
            + UserId::SIZE
            + self.target.as_ref().map(|t| t.0).encode_size()
            + self.delta.encode_size()
            + opt_string_encode_size(&self.item)
            + opt_string_encode_size(&self.description)
    }
}
