use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};
use thiserror::Error as ThisError;

use super::{
    opt_string_encode_size, read_opt_string, read_string, string_encode_size, write_opt_string,
    write_string, MAX_DESCRIPTION_LENGTH, MAX_IMAGE_URL_LENGTH, MAX_ITEM_NAME_LENGTH,
};
use crate::ids::RoleId;

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum ShopItemInvariantError {
    #[error("price must be positive")]
    ZeroPrice,
    #[error("stock cap must be positive when set")]
    ZeroStockCap,
    #[error("per-user cap must be positive when set")]
    ZeroUserCap,
    #[error("sold count {sold} exceeds stock cap {cap}")]
    Oversold { sold: u32, cap: u32 },
}

/// A purchasable catalog entry. Items are keyed by name; `sold` counts lifetime
/// purchases and never decreases.
///
/// `None` caps mean unlimited. A `Some` cap is always positive; admin edits that
/// set a cap to zero are normalized to `None` before the item is stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShopItem {
    pub name: String,
    pub price: u64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub stock_cap: Option<u32>,
    pub user_cap: Option<u32>,
    pub role_reward: Option<RoleId>,
    pub sold: u32,
}

impl ShopItem {
    /// Copies still available for purchase, or `None` when stock is unlimited.
    pub fn remaining_stock(&self) -> Option<u32> {
        self.stock_cap.map(|cap| cap.saturating_sub(self.sold))
    }

    pub fn validate_invariants(&self) -> Result<(), ShopItemInvariantError> {
        if self.price == 0 {
            return Err(ShopItemInvariantError::ZeroPrice);
        }
        if self.stock_cap == Some(0) {
            return Err(ShopItemInvariantError::ZeroStockCap);
        }
        if self.user_cap == Some(0) {
            return Err(ShopItemInvariantError::ZeroUserCap);
        }
        if let Some(cap) = self.stock_cap {
            if self.sold > cap {
                return Err(ShopItemInvariantError::Oversold {
                    sold: self.sold,
                    cap,
                });
            }
        }
        Ok(())
    }
}

impl Write for ShopItem {
    fn write(&self, writer: &mut impl BufMut) {
        write_string(&self.name, writer);
        self.price.write(writer);
        write_opt_string(&self.description, writer);
        write_opt_string(&self.image_url, writer);
        self.stock_cap.write(writer);
        self.user_cap.write(writer);
        self.role_reward.as_ref().map(|r| r.0).write(writer);
        self.sold.write(writer);
    }
}

impl Read for ShopItem {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            name: read_string(reader, MAX_ITEM_NAME_LENGTH)?,
            price: u64::read(reader)?,
            description: read_opt_string(reader, MAX_DESCRIPTION_LENGTH)?,
            image_url: read_opt_string(reader, MAX_IMAGE_URL_LENGTH)?,
            stock_cap: Option::<u32>::read(reader)?,
            user_cap: Option::<u32>::read(reader)?,
            role_reward: Option::<u64>::read(reader)?.map(RoleId),
            sold: u32::read(reader)?,
        })
    }
}

impl EncodeSize for ShopItem {
    fn encode_size(&self) -> usize {
        string_encode_size(&self.name)
            + self.price.encode_size()
            + opt_string_encode_size(&self.description)
            + opt_string_encode_size(&self.image_url)
            + self.stock_cap.encode_size()
            + self.user_cap.encode_size()
            + self.role_reward.as_ref().map(|r| r.0).encode_size()
            + self.sold.encode_size()
    }
}
