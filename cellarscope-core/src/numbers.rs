/// Integer percentage of `part` in `whole`, halves rounded up.
///
/// Returns 0 for an empty whole.
pub fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part as u128;
    let whole = whole as u128;
    ((part * 200 + whole) / (whole * 2)) as u32
}
