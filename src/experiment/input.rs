//! Player input sequences for experiments.

use crate::{
    error::{Error, InvalidArgument, Result},
    types::Action,
};

/// Default minimum length of generated input sequences.
pub const DEFAULT_INPUT_LENGTH: usize = 200;

/// Parse a digit string such as `"0110"` into actions for an `actions`-way
/// game. Whitespace is ignored.
///
/// # Errors
///
/// Fails if the string has no symbols or contains a symbol that is not a
/// base-`n` digit below `actions`.
pub fn parse_actions(text: &str, actions: usize) -> Result<Vec<Action>> {
    let radix = u32::try_from(actions)
        .ok()
        .filter(|r| (2..=36).contains(r))
        .ok_or(InvalidArgument::ActionCount { actions })?;

    let parsed = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .map(|(position, symbol)| {
            symbol
                .to_digit(radix)
                .map(|digit| digit as Action)
                .ok_or_else(|| {
                    Error::from(InvalidArgument::InputSymbol {
                        symbol,
                        position,
                        actions,
                    })
                })
        })
        .collect::<Result<Vec<_>>>()?;

    if parsed.is_empty() {
        return Err(InvalidArgument::EmptyInput.into());
    }
    Ok(parsed)
}

/// Format actions as a digit string, the inverse of [`parse_actions`].
pub fn format_actions(actions: &[Action]) -> String {
    actions
        .iter()
        .map(|&a| char::from_digit(a as u32, 36).unwrap_or('?'))
        .collect()
}

/// Repeat a cyclic `pattern` until the sequence is at least `min_len` long.
///
/// Whole copies of the pattern are appended, so the result may overshoot
/// `min_len` by up to one period.
///
/// # Errors
///
/// Fails with [`InvalidArgument::EmptyInput`] for an empty pattern.
pub fn generate_pattern(pattern: &[Action], min_len: usize) -> Result<Vec<Action>> {
    if pattern.is_empty() {
        return Err(InvalidArgument::EmptyInput.into());
    }
    let copies = min_len.div_ceil(pattern.len()).max(1);
    Ok(pattern.repeat(copies))
}
