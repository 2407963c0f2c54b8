use std::borrow::Cow;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;

/// Ordered rewrite table applied to the merged volume text.
///
/// The rules run sequentially; order is load-bearing. `<entryFree>` open
/// tags become `_____` separator lines (the entry delimiter the dictd
/// builder splits on), inline formatting becomes placeholders that survive
/// the dictd round trip (`HI_OPEN`, `FOREIGNOPEN`, the table placeholders),
/// and everything else of the TEI scaffolding is deleted. The tail of the
/// table normalizes whitespace, drops stray characters, and folds
/// "... see ..." cross-reference fragments into the preceding entry.
const REWRITE_RULES: &[(&str, &str)] = &[
    (r"<entryFree.*?[^<\n\r\f]*?>", "\n\n_____\n\n"),
    (r"</entryFree>", ""),
    (r"</orth>", "\n</orth>"),
    (r#"<\?xml version="1.0" encoding="UTF-8"\?>"#, ""),
    (r"<TEI.2>", ""),
    (r"<text>", ""),
    (r"<body>", ""),
    (r"<div1.*?[^<\n\r\f]>", ""),
    (r"<head.*?[^<\n\r\f]>", ""),
    (r"</head>", ""),
    (r"<div2.*?[^<\n\r\f]>", ""),
    (r"<form.*?[^<\n\r\f]*?>", ""),
    (r"</form>", ""),
    (r"<itype>.+?[^<\n\r\f]*?</itype>", ""),
    (r"<orth.*?[^<\n\r\f]*?>", ""),
    (r"</orth>", ""),
    (r"<hi.*?[^<\n\r\f]*?>", "HI_OPEN"),
    (r"</hi>", "HI_CLOSE"),
    (r"<foreign.*?[^<\n\r\f]*?>", "FOREIGNOPEN"),
    (r"</foreign>", "FOREIGNCLOSE"),
    (r"</div2>", ""),
    (r"<quote>", ""),
    (r"</quote>", ""),
    (r"<L>", ""),
    (r"</L>", ""),
    (r"<pb.*?[^<\n\r\f]*?>", ""),
    (r"<G/>", ""),
    (r"</div1>", ""),
    (r"</body>", ""),
    (r"</text>", ""),
    (r"</TEI.2>", ""),
    (r"<H>", ""),
    (r"</H>", ""),
    (r"<G>", ""),
    (r"</G>", ""),
    (r"<head>", ""),
    (r"<analytic/>", ""),
    (r"</author>", ""),
    (r"<author>", ""),
    (r"</authority>", ""),
    (r"<authority>", ""),
    (r"</availability>", ""),
    (r#"<availability status="free">"#, ""),
    (r"</biblStruct>", ""),
    (r"<biblStruct>", ""),
    (r"</date>", ""),
    (r"<date>", ""),
    (r"</fileDesc>", ""),
    (r"<fileDesc>", ""),
    (r"</imprint>", ""),
    (r"<imprint>", ""),
    (r"</item>", ""),
    (r"<item>", ""),
    (r"</list>", ""),
    (r"<list>", ""),
    (r"</listBibl>", ""),
    (r"<listBibl>", ""),
    (r"</monogr>", ""),
    (r"<monogr>", ""),
    (r"</note>", ""),
    (r#"<note anchored="yes" place="unspecified">"#, ""),
    (r"</notesStmt>", ""),
    (r"<notesStmt>", ""),
    (r"</p>", ""),
    (r"<p>", ""),
    (r"</publicationStmt>", ""),
    (r"<publicationStmt>", ""),
    (r"</publisher>", ""),
    (r"<publisher>", ""),
    (r"</pubPlace>", ""),
    (r"<pubPlace>", ""),
    (r"</sourceDesc>", ""),
    (r"<sourceDesc>", ""),
    (r"</teiHeader>", ""),
    (r#"<teiHeader type="text" status="new">"#, ""),
    (r"</title>", ""),
    (r"<title>", ""),
    (r"</titleStmt>", ""),
    (r"<titleStmt>", ""),
    (r"<H/>", ""),
    (r"<sense>", ""),
    (r"<dictScrap>", ""),
    (r"</dictScrap>", ""),
    (r"</sense>", ""),
    (r"<Table>", "OPENTABLE"),
    (r#"<row role="data">"#, "ROWROLDATA"),
    (r#"<cell role="data" rows="1" cols="1">"#, "CELLROLEROWSDATA"),
    (r"</cell>", "CLOSECELL"),
    (r"</row>", "CLOSEROW"),
    (r"</Table>", "CLOSETABLE"),
    (r"\n\n\n", "\n"),
    (r"\n\n", "\n"),
    (r"_____", "\n\n\n_____\n"),
    (r"(?m)^\s+", ""),
    ("\u{FFFD}", " "),
    (r"@", " "),
    (r"=", " "),
    (r"\r", "\n"),
    (r"foreignopen", ""),
    (r"_____\s*(.*?see)", "${1}"),
    (r"\f", "\n"),
];

static REWRITE: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    REWRITE_RULES
        .iter()
        .map(|&(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
        .collect()
});

/// Apply the rewrite table to the merged text.
pub fn strip_markup(text: &str) -> String {
    let mut content = text.to_string();
    for (re, replacement) in REWRITE.iter() {
        let rewritten = re.replace_all(&content, *replacement);
        if let Cow::Owned(rewritten) = rewritten {
            content = rewritten;
        }
    }
    content
}

/// Rewrite the merged file in place.
pub fn strip_markup_file(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)?;
    fs::write(path, strip_markup(&content))?;
    Ok(())
}
