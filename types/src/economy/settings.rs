use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, FixedSize, Read, ReadExt, Write};

use super::{DEFAULT_DAILY_REWARD, DEFAULT_WEEKLY_REWARD};
use crate::ids::{ChannelId, RoleId};

/// Per-guild configuration written by `/setup` and the admin toggles.
///
/// Guilds that never ran `/setup` behave as if this record held its defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuildSettings {
    pub daily_reward: u64,
    pub weekly_reward: u64,
    pub admin_role: Option<RoleId>,
    pub log_channel: Option<ChannelId>,
    pub economy_enabled: bool,
}

impl Default for GuildSettings {
    fn default() -> Self {
        Self {
            daily_reward: DEFAULT_DAILY_REWARD,
            weekly_reward: DEFAULT_WEEKLY_REWARD,
            admin_role: None,
            log_channel: None,
            economy_enabled: true,
        }
    }
}

impl Write for GuildSettings {
    fn write(&self, writer: &mut impl BufMut) {
        self.daily_reward.write(writer);
        self.weekly_reward.write(writer);
        self.admin_role.as_ref().map(|r| r.0).write(writer);
        self.log_channel.as_ref().map(|c| c.0).write(writer);
        self.economy_enabled.write(writer);
    }
}

impl Read for GuildSettings {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, commonware_codec::Error> {
        let daily_reward = u64::read(reader)?;
        let weekly_reward = u64::read(reader)?;
        let admin_role = Option::<u64>::read(reader)?.map(RoleId);
        let log_channel = Option::<u64>::read(reader)?.map(ChannelId);

        // Records written before the enable/disable toggle existed omit the flag.
        let economy_enabled = if reader.remaining() >= bool::SIZE {
            bool::read(reader)?
        } else {
            true
        };

        Ok(Self {
            daily_reward,
            weekly_reward,
            admin_role,
            log_channel,
            economy_enabled,
        })
    }
}

impl EncodeSize for GuildSettings {
    fn encode_size(&self) -> usize {
        self.daily_reward.encode_size()
            + self.weekly_reward.encode_size()
            + self.admin_role.as_ref().map(|r| r.0).encode_size()
            + self.log_channel.as_ref().map(|c| c.0).encode_size()
            + self.economy_enabled.encode_size()
    }
}
