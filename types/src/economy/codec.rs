use bytes::{Buf, BufMut};
use commonware_codec::{Error, ReadExt, Write};

/// Helper to write a string as length-prefixed UTF-8 bytes.
pub fn write_string(s: &str, writer: &mut impl BufMut) {
    let bytes = s.as_bytes();
    (bytes.len() as u32).write(writer);
    writer.put_slice(bytes);
}

/// Helper to read a string from length-prefixed UTF-8 bytes.
pub fn read_string(reader: &mut impl Buf, max_len: usize) -> Result<String, Error> {
    let len = u32::read(reader)? as usize;
    if len > max_len {
        return Err(Error::Invalid("String", "too long"));
    }
    if reader.remaining() < len {
        return Err(Error::EndOfBuffer);
    }
    if reader.chunk().len() >= len {
        let result = {
            let chunk = reader.chunk();
            match std::str::from_utf8(&chunk[..len]) {
                Ok(s) => Ok(s.to_owned()),
                Err(_) => Err(Error::Invalid("String", "invalid UTF-8")),
            }
        };
        reader.advance(len);
        return result;
    }
    let mut bytes = vec![0u8; len];
    reader.copy_to_slice(&mut bytes);
    String::from_utf8(bytes).map_err(|_| Error::Invalid("String", "invalid UTF-8"))
}

/// Helper to get encode size of a string.
pub fn string_encode_size(s: &str) -> usize {
    4 + s.len()
}

/// Helper to write an optional string as a flag byte plus length-prefixed UTF-8 bytes.
pub fn write_opt_string(s: &Option<String>, writer: &mut impl BufMut) {
    match s {
        Some(s) => {
            1u8.write(writer);
            write_string(s, writer);
        }
        None => 0u8.write(writer),
    }
}

/// Helper to read an optional string written by [`write_opt_string`].
pub fn read_opt_string(reader: &mut impl Buf, max_len: usize) -> Result<Option<String>, Error> {
    match u8::read(reader)? {
        0 => Ok(None),
        1 => Ok(Some(read_string(reader, max_len)?)),
        flag => Err(Error::InvalidEnum(flag)),
    }
}

/// Helper to get encode size of an optional string.
pub fn opt_string_encode_size(s: &Option<String>) -> usize {
    1 + s.as_ref().map_or(0, |s| string_encode_size(s))
}
