/// Incremental, lossy UTF-8 decoding for fixture bytes read in chunks.
///
/// Multi-byte characters split across chunk boundaries are carried over to the
/// next chunk. Invalid bytes each decode to U+FFFD, so a UTF-16 byte order mark
/// (`FF FE` or `FE FF`) surfaces as two replacement characters at the start of
/// the text. That is what BOM sniffing on decoded fixtures relies on.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    text: String,
    carry: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            carry: Vec::new(),
        }
    }

    /// Decode one chunk, holding back an incomplete trailing sequence.
    pub fn push(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        if self.carry.is_empty() {
            decode_bytes(&mut self.text, &mut self.carry, bytes);
            return;
        }

        // The carry is at most 3 bytes. Complete it with just enough bytes
        // from this chunk, then decode the remainder in place.
        let mut remaining = bytes;

        while !self.carry.is_empty() && !remaining.is_empty() {
            let expected_len = utf8_seq_len(self.carry[0]);
            if expected_len == 0 {
                self.text.push('\u{FFFD}');
                self.carry.clear();
                break;
            }

            let needed = expected_len.saturating_sub(self.carry.len());
            if needed == 0 {
                let pending = std::mem::take(&mut self.carry);
                decode_bytes(&mut self.text, &mut self.carry, &pending);
                continue;
            }

            if remaining.len() < needed {
                self.carry.extend_from_slice(remaining);
                return;
            }

            let mut scratch = [0u8; 8];
            let carry_len = self.carry.len();
            scratch[..carry_len].copy_from_slice(&self.carry);
            scratch[carry_len..carry_len + needed].copy_from_slice(&remaining[..needed]);
            self.carry.clear();

            decode_bytes(&mut self.text, &mut self.carry, &scratch[..carry_len + needed]);

            remaining = &remaining[needed..];
        }

        if !remaining.is_empty() {
            decode_bytes(&mut self.text, &mut self.carry, remaining);
        }
    }

    /// Flush the carry (lossy) and return the decoded text.
    pub fn finish(mut self) -> String {
        if !self.carry.is_empty() {
            self.text.push_str(&String::from_utf8_lossy(&self.carry));
        }
        self.text
    }
}

fn utf8_seq_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn decode_bytes(text: &mut String, carry: &mut Vec<u8>, mut bytes: &[u8]) {
    while !bytes.is_empty() {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                text.push_str(s);
                break;
            }
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                if valid_up_to > 0 {
                    let valid = &bytes[..valid_up_to];
                    text.push_str(std::str::from_utf8(valid).expect("valid UTF-8 prefix"));
                }

                match e.error_len() {
                    Some(len) => {
                        text.push('\u{FFFD}');
                        bytes = &bytes[valid_up_to + len..];
                    }
                    None => {
                        carry.extend_from_slice(&bytes[valid_up_to..]);
                        break;
                    }
                }
            }
        }
    }
}
