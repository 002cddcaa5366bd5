/// One line of a user-supplied batch block: whitespace-trimmed and
/// space-delimited into up to three tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLine {
    pub url: String,
    pub custom_name: Option<String>,
    pub folder: Option<String>,
}

/// Split a multi-line batch block into discrete line records.
///
/// Lines are independent: blank or URL-less lines are skipped, never fatal to
/// the batch. Relative order of the surviving lines is preserved.
pub fn parse_batch(block: &str) -> Vec<BatchLine> {
    block.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<BatchLine> {
    let mut tokens = line.split_whitespace();
    let url = tokens.next()?.to_string();
    Some(BatchLine {
        url,
        custom_name: tokens.next().map(ToOwned::to_owned),
        folder: tokens.next().map(ToOwned::to_owned),
    })
}
