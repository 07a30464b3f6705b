use std::str::FromStr;
use std::str::Utf8Error;

use thiserror::Error;

/// Consumes the slice until a non-ascii whitespace character is reached.
pub fn take_ws(bytes: &[u8]) -> &[u8] {
    let mut i = bytes.len();
    for (j, b) in bytes.iter().enumerate() {
        if b.is_ascii_whitespace() {
            continue;
        }

        i = j;
        break;
    }

    &bytes[i..]
}

/// Takes the next byte from the slice. If none is left, the slice is left as-is.
pub const fn take_1(bytes: &[u8]) -> (Option<u8>, &[u8]) {
    let [b, bytes @ ..] = bytes else {
        return (None, bytes);
    };

    (Some(*b), bytes)
}

/// Advance the slice until byte `b` is found, without consuming it.
///
/// If `b` is never found, or no bytes precede it, `bytes` is left as-is.
pub fn take_until(b: u8, bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    let mut i = 0;
    for (j, &a) in bytes.iter().enumerate() {
        if a != b {
            continue;
        }

        i = j;
        break;
    }

    if i == 0 {
        (None, bytes)
    } else {
        let (res, bytes) = bytes.split_at(i);

        (Some(res), bytes)
    }
}

/// Takes the run of bytes up to the next ascii whitespace character, or to
/// the end of the slice. Returns `None` if nothing was consumed.
///
/// Unlike `take_until`, input lines carry no terminator, so running off the
/// end of the slice still yields the run.
pub fn take_until_ws(bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    let i = bytes
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(bytes.len());

    if i == 0 {
        (None, bytes)
    } else {
        let (res, bytes) = bytes.split_at(i);

        (Some(res), bytes)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Error parsing bytes from UTF-8: {0}")]
    InvalidUTF8(Utf8Error),

    #[error("Failed to convert \"{str}\"")]
    ParseError { str: String },
}

/// Converts `&[u8]` to `T` if `T: FromStr`.
pub fn convert<T: FromStr>(bytes: &[u8]) -> Result<T, ConvertError> {
    let str = str::from_utf8(bytes).map_err(ConvertError::InvalidUTF8)?;

    let Ok(res) = str.parse::<T>() else {
        return Err(ConvertError::ParseError {
            str: str.to_string(),
        });
    };

    Ok(res)
}

#[cfg(test)]
mod tests {
    #[test]
    fn take_ws_consumes_full_ws() {
        let bytes = b"  ";

        let res = super::take_ws(bytes);

        assert_eq!(res, b"");
    }

    #[test]
    fn take_until_ws_runs_to_end() {
        let (res, rest) = super::take_until_ws(b"23");

        assert_eq!(res, Some(b"23".as_slice()));
        assert_eq!(rest, b"");
    }

    #[test]
    fn take_until_ws_stops_at_space() {
        let (res, rest) = super::take_until_ws(b"12 34");

        assert_eq!(res, Some(b"12".as_slice()));
        assert_eq!(rest, b" 34");
    }

    #[test]
    fn convert_signed() {
        let n: i64 = super::convert(b"-42").unwrap();

        assert_eq!(n, -42);
    }
}
