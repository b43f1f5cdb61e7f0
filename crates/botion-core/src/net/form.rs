//! `application/x-www-form-urlencoded` bodies.

use heapless::{String, Vec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    /// Body or decoded value is not UTF-8, or a `%` escape is broken.
    Encoding,
    /// Decoded value exceeds the target capacity.
    TooLong,
}

/// Iterator over the raw `(name, value)` pairs of a form body, still encoded.
pub struct FormFields<'a> {
    rest: &'a str,
}

impl<'a> FormFields<'a> {
    pub fn new(body: &'a str) -> Self {
        Self { rest: body }
    }
}

impl<'a> Iterator for FormFields<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.rest.is_empty() {
                return None;
            }
            let (pair, rest) = self.rest.split_once('&').unwrap_or((self.rest, ""));
            self.rest = rest;
            if pair.is_empty() {
                continue;
            }
            return Some(pair.split_once('=').unwrap_or((pair, "")));
        }
    }
}

/// Decode one form component: `+` becomes a space and `%XX` a byte.
pub fn decode_component<const N: usize>(raw: &str) -> Result<String<N>, FormError> {
    let mut bytes = Vec::<u8, N>::new();
    let mut input = raw.bytes();
    while let Some(byte) = input.next() {
        let decoded = match byte {
            b'+' => b' ',
            b'%' => {
                let high = input.next().and_then(hex_value).ok_or(FormError::Encoding)?;
                let low = input.next().and_then(hex_value).ok_or(FormError::Encoding)?;
                high << 4 | low
            }
            other => other,
        };
        bytes.push(decoded).map_err(|_| FormError::TooLong)?;
    }
    String::from_utf8(bytes).map_err(|_| FormError::Encoding)
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
