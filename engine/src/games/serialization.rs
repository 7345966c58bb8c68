//! Shared helpers for persisted session state blobs.

#[derive(Clone, Copy, Debug)]
pub(crate) struct StateReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> StateReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    pub(crate) fn read_u8(&mut self) -> Option<u8> {
        let value = *self.buf.get(self.offset)?;
        self.offset += 1;
        Some(value)
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.remaining() < len {
            return None;
        }
        let start = self.offset;
        self.offset += len;
        Some(&self.buf[start..self.offset])
    }

    pub(crate) fn read_vec(&mut self, len: usize) -> Option<Vec<u8>> {
        Some(self.read_bytes(len)?.to_vec())
    }
}

#[derive(Debug)]
pub(crate) struct StateWriter {
    buf: Vec<u8>,
}

impl StateWriter {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub(crate) fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
