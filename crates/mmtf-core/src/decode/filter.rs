//! Post-hoc row selection by insertion code and alternate location.
//!
//! Filtering runs as a separate pass over the already-populated columns:
//! the selection returned here is applied to every column, the coordinates,
//! and the bonds synchronously, rather than being threaded through each
//! field's construction. A single blank space is the sentinel for "no code
//! present"; callers normalize empty strings to it beforehand.

/// Computes the atom rows to keep.
///
/// By default atoms with no insertion code are kept, and only atoms whose
/// alternate location is absent or `"A"`. Requested `(residue id, code)`
/// pairs replace the default for their residue: its atoms are kept exactly
/// when their code matches any code requested for that residue. The two
/// criteria are combined with a logical AND.
///
/// All column slices must have equal length.
pub fn select_rows(
    res_ids: &[i32],
    ins_codes: &[String],
    alt_locs: &[String],
    requested_ins: &[(i32, String)],
    requested_alt: &[(i32, String)],
) -> Vec<usize> {
    let ins_mask = code_mask(res_ids, ins_codes, requested_ins, |code| code == " ");
    let alt_mask = code_mask(res_ids, alt_locs, requested_alt, |code| {
        code == " " || code == "A"
    });
    ins_mask
        .into_iter()
        .zip(alt_mask)
        .enumerate()
        .filter_map(|(row, (ins, alt))| (ins && alt).then_some(row))
        .collect()
}

fn code_mask(
    res_ids: &[i32],
    codes: &[String],
    requested: &[(i32, String)],
    default_keep: impl Fn(&str) -> bool,
) -> Vec<bool> {
    let mut mask: Vec<bool> = codes.iter().map(|code| default_keep(code)).collect();
    for row in 0..res_ids.len() {
        let mut for_residue = requested
            .iter()
            .filter(|(res_id, _)| *res_id == res_ids[row])
            .peekable();
        if for_residue.peek().is_some() {
            mask[row] = for_residue.any(|(_, code)| codes[row] == *code);
        }
    }
    mask
}
