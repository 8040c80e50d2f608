use super::types::LinkFacet;
use super::FacetOutput;

/// Walk `text` by byte offset, emitting verbatim runs and link
/// substitutions in order.
///
/// The output is rebuilt from slices: copy `[cursor, start)`, emit the
/// link over `[start, end)`, continue from `end`. Substring
/// search-and-replace is never used: the facet's label can occur again
/// elsewhere in the text, and replacing by value would corrupt those
/// occurrences.
///
/// Ranges that overlap an already-consumed range, are inverted or out of
/// bounds, or do not land on UTF-8 character boundaries are skipped.
pub fn process_link_facets<O: FacetOutput>(
    text: &str,
    facets: &[LinkFacet<'_>],
    output: &mut O,
) -> Result<(), O::Error> {
    let mut cursor = 0usize;

    for facet in facets {
        let start = facet.range.byte_start;
        let end = facet.range.byte_end.min(text.len());

        if start < cursor || start >= end {
            continue;
        }
        // Also rejects ranges that split a multi-byte code point.
        let Some(label) = text.get(start..end) else {
            continue;
        };

        if start > cursor {
            // cursor and start are both verified char boundaries.
            output.write_text(&text[cursor..start])?;
        }
        output.write_link(facet.uri, label)?;
        cursor = end;
    }

    if cursor < text.len() {
        output.write_text(&text[cursor..])?;
    }

    Ok(())
}
