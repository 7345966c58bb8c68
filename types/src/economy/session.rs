use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};

use super::MAX_SESSION_STATE_LENGTH;
use crate::ids::{GuildId, UserId};

/// An in-flight blackjack hand.
///
/// The stake is escrowed out of the owner's balance when the session is created
/// and returned through settlement (or refunded on expiry), so a session record
/// existing implies the balance deduction already happened. `state` is the
/// engine's serialized hand; the ledger treats it as opaque bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlackjackSession {
    pub id: u64,
    pub owner: UserId,
    pub guild: GuildId,
    pub stake: u64,
    pub deadline_ms: u64,
    pub move_count: u32,
    pub state: Vec<u8>,
}

impl Write for BlackjackSession {
    fn write(&self, writer: &mut impl BufMut) {
        self.id.write(writer);
        self.owner.write(writer);
        self.guild.write(writer);
        self.stake.write(writer);
        self.deadline_ms.write(writer);
        self.move_count.write(writer);
        self.state.write(writer);
    }
}

impl Read for BlackjackSession {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            id: u64::read(reader)?,
            owner: UserId::read(reader)?,
            guild: GuildId::read(reader)?,
            stake: u64::read(reader)?,
            deadline_ms: u64::read(reader)?,
            move_count: u32::read(reader)?,
            state: Vec::<u8>::read_range(reader, 0..=MAX_SESSION_STATE_LENGTH)?,
        })
    }
}

impl EncodeSize for BlackjackSession {
    fn encode_size(&self) -> usize {
        self.id.encode_size()
            + self.owner.encode_size()
            + self.guild.encode_size()
            + self.stake.encode_size()
            + self.deadline_ms.encode_size()
            + self.move_count.encode_size()
            + self.state.encode_size()
    }
}
