//! Page references and hashtags as they appear in rendered widgets.

/// Page name prefix for tag pages.
pub const TAG_PREFIX: &str = "tag:";

/// A navigation target: a page plus an optional position or header in it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageRef {
    pub page: String,
    pub pos: Option<usize>,
    pub header: Option<String>,
}

impl PageRef {
    pub fn page(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            ..Self::default()
        }
    }

    /// Parse `page`, `page@123`, `page#Header` or any of these wrapped in
    /// `[[ ]]`.
    ///
    /// ```
    /// use smartmark::widget::PageRef;
    ///
    /// let r = PageRef::parse("[[notes/today@42]]");
    /// assert_eq!(r.page, "notes/today");
    /// assert_eq!(r.pos, Some(42));
    /// ```
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim();
        let reference = reference
            .strip_prefix("[[")
            .and_then(|r| r.strip_suffix("]]"))
            .unwrap_or(reference);

        if let Some((page, pos)) = reference.rsplit_once('@') {
            if !pos.is_empty() && pos.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(pos) = pos.parse() {
                    return Self {
                        page: page.to_string(),
                        pos: Some(pos),
                        header: None,
                    };
                }
            }
        }

        match reference.split_once('#') {
            Some((page, header)) => Self {
                page: page.to_string(),
                pos: None,
                header: Some(header.to_string()),
            },
            None => Self::page(reference),
        }
    }
}

/// The tag name of a rendered hashtag: `#foo` → `foo`, `#<foo bar>` →
/// `foo bar`.
pub fn extract_hashtag(text: &str) -> &str {
    let tag = text.strip_prefix('#').unwrap_or(text);
    match tag.strip_prefix('<') {
        Some(inner) => inner.strip_suffix('>').unwrap_or(inner),
        None => tag,
    }
}
