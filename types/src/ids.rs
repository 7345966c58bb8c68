use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discord snowflake of a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Discord snowflake of a guild (server).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(pub u64);

/// Discord snowflake of a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub u64);

/// Discord snowflake of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u64);

macro_rules! snowflake_codec {
    ($name:ident) => {
        impl Write for $name {
            fn write(&self, writer: &mut impl BufMut) {
                self.0.write(writer);
            }
        }

        impl Read for $name {
            type Cfg = ();

            fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
                Ok(Self(u64::read(reader)?))
            }
        }

        impl FixedSize for $name {
            const SIZE: usize = u64::SIZE;
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

snowflake_codec!(UserId);
snowflake_codec!(GuildId);
snowflake_codec!(RoleId);
snowflake_codec!(ChannelId);
