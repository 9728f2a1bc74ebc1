//! NUMERIC wire format, converted to and from decimal text.
//!
//! Binary layout: `ndigits: i16`, `weight: i16`, `sign: u16`, `dscale: u16`,
//! then `ndigits` base-10000 digits (`i16`). The value is
//! `sum(digit[i] * 10000^(weight - i))`, printed with `dscale` fraction digits.

use super::BoxError;
use bytes::{BufMut, BytesMut};
use std::fmt::Write;

const SIGN_POS: u16 = 0x0000;
const SIGN_NEG: u16 = 0x4000;
const SIGN_NAN: u16 = 0xC000;
const SIGN_PINF: u16 = 0xD000;
const SIGN_NINF: u16 = 0xF000;

const DIGIT_WIDTH: usize = 4;

fn read_u16(raw: &[u8], at: usize) -> Result<u16, BoxError> {
    raw.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| "invalid numeric: truncated buffer".into())
}

/// Render a binary NUMERIC as decimal text, keeping the column's scale.
pub(super) fn to_text(raw: &[u8]) -> Result<String, BoxError> {
    let ndigits = read_u16(raw, 0)? as i16;
    let weight = read_u16(raw, 2)? as i16;
    let sign = read_u16(raw, 4)?;
    let dscale = read_u16(raw, 6)? as usize;

    if ndigits < 0 || raw.len() != 8 + 2 * ndigits as usize {
        return Err("invalid numeric: digit count does not match buffer".into());
    }
    let digits = (0..ndigits as usize)
        .map(|i| read_u16(raw, 8 + 2 * i).map(|d| d as i16))
        .collect::<Result<Vec<_>, _>>()?;
    let digit = |i: i32| -> i16 {
        usize::try_from(i)
            .ok()
            .and_then(|i| digits.get(i).copied())
            .unwrap_or(0)
    };

    let mut out = String::new();
    match sign {
        SIGN_POS => {}
        SIGN_NEG => out.push('-'),
        SIGN_NAN => return Ok("NaN".to_string()),
        SIGN_PINF => return Ok("Infinity".to_string()),
        SIGN_NINF => return Ok("-Infinity".to_string()),
        other => return Err(format!("invalid numeric sign: {other:#06x}").into()),
    }

    let weight = i32::from(weight);
    if weight < 0 {
        out.push('0');
    } else {
        for i in 0..=weight {
            if i == 0 {
                write!(out, "{}", digit(i))?;
            } else {
                write!(out, "{:04}", digit(i))?;
            }
        }
    }

    if dscale > 0 {
        let mut frac = String::with_capacity(dscale + DIGIT_WIDTH);
        let mut i = weight + 1;
        while frac.len() < dscale {
            write!(frac, "{:04}", digit(i))?;
            i += 1;
        }
        frac.truncate(dscale);
        out.push('.');
        out.push_str(&frac);
    }
    Ok(out)
}

/// Encode decimal text (`-12.340`, `NaN`, `Infinity`) as a binary NUMERIC.
pub(super) fn from_text(text: &str, out: &mut BytesMut) -> Result<(), BoxError> {
    let text = text.trim();
    let special = match text {
        "NaN" => Some(SIGN_NAN),
        "Infinity" | "+Infinity" => Some(SIGN_PINF),
        "-Infinity" => Some(SIGN_NINF),
        _ => None,
    };
    if let Some(sign) = special {
        write_header(out, 0, 0, sign, 0);
        return Ok(());
    }

    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let valid = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !valid(int_part) || !valid(frac_part) {
        return Err(format!("invalid numeric literal: {text:?}").into());
    }
    let dscale = u16::try_from(frac_part.len())?;

    // Align both halves on base-10000 group boundaries.
    let int_pad = (DIGIT_WIDTH - int_part.len() % DIGIT_WIDTH) % DIGIT_WIDTH;
    let frac_pad = (DIGIT_WIDTH - frac_part.len() % DIGIT_WIDTH) % DIGIT_WIDTH;
    let aligned: String = std::iter::repeat_n('0', int_pad)
        .chain(int_part.chars())
        .chain(frac_part.chars())
        .chain(std::iter::repeat_n('0', frac_pad))
        .collect();
    let mut weight = ((int_pad + int_part.len()) / DIGIT_WIDTH) as i32 - 1;
    let mut groups = aligned
        .as_bytes()
        .chunks(DIGIT_WIDTH)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0i16, |acc, b| acc * 10 + i16::from(b - b'0'))
        })
        .collect::<Vec<_>>();

    let leading = groups.iter().take_while(|&&g| g == 0).count();
    groups.drain(..leading);
    weight -= leading as i32;
    while groups.last() == Some(&0) {
        groups.pop();
    }

    if groups.is_empty() {
        write_header(out, 0, 0, SIGN_POS, dscale);
        return Ok(());
    }
    let sign = if negative { SIGN_NEG } else { SIGN_POS };
    write_header(
        out,
        u16::try_from(groups.len())?,
        i16::try_from(weight)?,
        sign,
        dscale,
    );
    for group in groups {
        out.put_i16(group);
    }
    Ok(())
}

fn write_header(out: &mut BytesMut, ndigits: u16, weight: i16, sign: u16, dscale: u16) {
    out.put_u16(ndigits);
    out.put_i16(weight);
    out.put_u16(sign);
    out.put_u16(dscale);
}
