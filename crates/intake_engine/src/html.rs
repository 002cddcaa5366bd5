use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use scraper::{Html, Selector};

/// Decode fetched page bytes and pull the trimmed `<title>` text, if any.
pub(crate) fn page_title(bytes: &[u8], content_type: Option<&str>) -> Option<String> {
    let html = decode_page(bytes, content_type);
    extract_title(&html)
}

/// Decode raw bytes into UTF-8 using: BOM -> Content-Type charset ->
/// chardetng fallback. Replacement characters are acceptable here; a mostly
/// readable title beats no title.
fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(extract_charset)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let part = part.trim();
            let head = part.get(..8)?;
            if head.eq_ignore_ascii_case("charset=") {
                part.get(8..)
                    .map(|value| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
            } else {
                None
            }
        })
        .next()
}

fn extract_title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    doc.select(&selector)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_plain_utf8() {
        let html = b"<html><head><title> Spec Video </title></head><body></body></html>";
        assert_eq!(
            page_title(html, Some("text/html; charset=utf-8")).as_deref(),
            Some("Spec Video")
        );
    }

    #[test]
    fn title_respects_charset_header() {
        let bytes = b"<html><head><title>caf\xe9</title></head></html>"; // iso-8859-1
        assert_eq!(
            page_title(bytes, Some("text/html; charset=ISO-8859-1")).as_deref(),
            Some("caf\u{e9}")
        );
    }

    #[test]
    fn missing_or_empty_title_is_none() {
        assert_eq!(page_title(b"<html><body>x</body></html>", None), None);
        assert_eq!(
            page_title(b"<html><head><title>  </title></head></html>", None),
            None
        );
    }

    #[test]
    fn bom_wins_over_header() {
        let bytes = b"\xEF\xBB\xBF<title>ok</title>";
        assert_eq!(
            page_title(bytes, Some("text/html; charset=ISO-8859-1")).as_deref(),
            Some("ok")
        );
    }
}
