use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};
use thiserror::Error as ThisError;

use super::{
    read_string, string_encode_size, write_string, MAX_INVENTORY_LINES, MAX_ITEM_NAME_LENGTH,
};

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum AccountInvariantError {
    #[error("inventory line for {item:?} has zero quantity")]
    ZeroQuantityLine { item: String },
    #[error("duplicate inventory line for {item:?}")]
    DuplicateLine { item: String },
    #[error("too many inventory lines (len={len}, max={max})")]
    TooManyLines { len: usize, max: usize },
}

/// One owned shop item and how many copies the account holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedItem {
    pub item: String,
    pub quantity: u32,
}

impl Write for OwnedItem {
    fn write(&self, writer: &mut impl BufMut) {
        write_string(&self.item, writer);
        self.quantity.write(writer);
    }
}

impl Read for OwnedItem {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            item: read_string(reader, MAX_ITEM_NAME_LENGTH)?,
            quantity: u32::read(reader)?,
        })
    }
}

impl EncodeSize for OwnedItem {
    fn encode_size(&self) -> usize {
        string_encode_size(&self.item) + self.quantity.encode_size()
    }
}

/// Per-user economy state. Created on first reference with an empty balance; never deleted.
///
/// Claim timestamps are milliseconds since the epoch; zero means the claim has never
/// been made and is therefore always eligible.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Account {
    pub balance: u64,
    pub last_daily_ms: u64,
    pub last_weekly_ms: u64,
    pub last_work_ms: u64,
    pub inventory: Vec<OwnedItem>,
}

impl Account {
    /// How many copies of `item` the account holds.
    pub fn quantity_of(&self, item: &str) -> u32 {
        self.inventory
            .iter()
            .find(|line| line.item == item)
            .map_or(0, |line| line.quantity)
    }

    /// Increment the inventory line for `item`, creating it at quantity one if absent.
    pub fn grant_item(&mut self, item: &str) {
        match self.inventory.iter_mut().find(|line| line.item == item) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.inventory.push(OwnedItem {
                item: item.to_string(),
                quantity: 1,
            }),
        }
    }

    pub fn validate_invariants(&self) -> Result<(), AccountInvariantError> {
        if self.inventory.len() > MAX_INVENTORY_LINES {
            return Err(AccountInvariantError::TooManyLines {
                len: self.inventory.len(),
                max: MAX_INVENTORY_LINES,
            });
        }
        for (i, line) in self.inventory.iter().enumerate() {
            if line.quantity == 0 {
                return Err(AccountInvariantError::ZeroQuantityLine {
                    item: line.item.clone(),
                });
            }
            if self.inventory[..i].iter().any(|prev| prev.item == line.item) {
                return Err(AccountInvariantError::DuplicateLine {
                    item: line.item.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Write for Account {
    fn write(&self, writer: &mut impl BufMut) {
        self.balance.write(writer);
        self.last_daily_ms.write(writer);
        self.last_weekly_ms.write(writer);
        self.last_work_ms.write(writer);
        (self.inventory.len() as u32).write(writer);
        for line in &self.inventory {
            line.write(writer);
        }
    }
}

impl Read for Account {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let balance = u64::read(reader)?;
        let last_daily_ms = u64::read(reader)?;
        let last_weekly_ms = u64::read(reader)?;
        let last_work_ms = u64::read(reader)?;
        let len = u32::read(reader)? as usize;
        if len > MAX_INVENTORY_LINES {
            return Err(Error::Invalid("Account", "too many inventory lines"));
        }
        let mut inventory = Vec::with_capacity(len);
        for _ in 0..len {
            inventory.push(OwnedItem::read(reader)?);
        }

        Ok(Self {
            balance,
            last_daily_ms,
            last_weekly_ms,
            last_work_ms,
            inventory,
        })
    }
}

impl EncodeSize for Account {
    fn encode_size(&self) -> usize {
        self.balance.encode_size()
            + self.last_daily_ms.encode_size()
            + self.last_weekly_ms.encode_size()
            + self.last_work_ms.encode_size()
            + 4
            + self
                .inventory
                .iter()
                .map(|line| line.encode_size())
                .sum::<usize>()
    }
}
