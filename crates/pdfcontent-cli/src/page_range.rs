/// Parse a 1-indexed page selection such as "1,3-5" into sorted, de-duplicated
/// 0-indexed page indices, checked against `page_count`.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (first, last) = match part.split_once('-') {
            Some((start, end)) => (page_number(start, page_count)?, page_number(end, page_count)?),
            None => {
                let page = page_number(part, page_count)?;
                (page, page)
            }
        };
        if first > last {
            return Err(format!("descending page range: '{part}'"));
        }
        pages.extend(first - 1..last);
    }

    if pages.is_empty() {
        return Err(format!("no pages selected by '{input}'"));
    }
    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn page_number(text: &str, page_count: usize) -> Result<usize, String> {
    let text = text.trim();
    let page: usize = text
        .parse()
        .map_err(|_| format!("invalid page number: '{text}'"))?;
    match page {
        0 => Err("page 0 is invalid (pages start at 1)".to_string()),
        p if p > page_count => Err(format!(
            "page {p} exceeds document page count ({page_count})"
        )),
        p => Ok(p),
    }
}
