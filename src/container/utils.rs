/// Checks whether all bytes in the given slice are lowercase alphanumeric ASCII characters.
///
/// This function returns `true` if every byte in the input slice is either an ASCII
/// digit (`'0'..='9'`) or a lowercase ASCII letter (`'a'..='z'`). It returns `false`
/// if any byte falls outside of these ranges, including uppercase letters, symbols,
/// or non-ASCII characters.
pub(super) fn is_lowercase_alpha_numeric(src: &[u8]) -> bool {
    src.iter()
        .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
}
