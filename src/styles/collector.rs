use tracing::debug;

use crate::error::{BuilderError, BuilderResult};

/// A style sheet loaded by the hosting document. Inline sheets carry no href.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleSheetRef {
    pub href: Option<String>,
}

impl StyleSheetRef {
    pub fn external(href: &str) -> Self {
        Self {
            href: Some(href.to_string()),
        }
    }

    pub fn inline() -> Self {
        Self { href: None }
    }
}

/// Anything that can list the style sheets of a document.
pub trait StyleSource {
    fn style_sheets(&self) -> Vec<StyleSheetRef>;
}

impl StyleSource for Vec<StyleSheetRef> {
    fn style_sheets(&self) -> Vec<StyleSheetRef> {
        self.clone()
    }
}

impl<const N: usize> StyleSource for [StyleSheetRef; N] {
    fn style_sheets(&self) -> Vec<StyleSheetRef> {
        self.to_vec()
    }
}

/// The live browser document.
pub struct DocumentStyles<'a>(pub &'a web_sys::Document);

impl StyleSource for DocumentStyles<'_> {
    fn style_sheets(&self) -> Vec<StyleSheetRef> {
        let list = self.0.style_sheets();
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|sheet| StyleSheetRef {
                href: sheet.href().ok().flatten(),
            })
            .collect()
    }
}

/// Hrefs of every external sheet, in document order, duplicates kept.
/// Reads only.
pub fn collect(source: &dyn StyleSource) -> Vec<String> {
    let hrefs: Vec<String> = source
        .style_sheets()
        .into_iter()
        .filter_map(|sheet| sheet.href)
        .collect();
    debug!(count = hrefs.len(), "collected canvas style sheets");
    hrefs
}

/// Adds a `<link rel="stylesheet">` to the document head unless one with the
/// same href is already there.
pub fn inject_stylesheet(document: &web_sys::Document, href: &str) -> BuilderResult<()> {
    let selector = format!("link[href=\"{href}\"]");
    if document.query_selector(&selector).map_err(BuilderError::dom)?.is_some() {
        return Ok(());
    }
    let head = document
        .head()
        .ok_or_else(|| BuilderError::Dom("document has no head".to_string()))?;
    let link = document.create_element("link").map_err(BuilderError::dom)?;
    link.set_attribute("rel", "stylesheet").map_err(BuilderError::dom)?;
    link.set_attribute("href", href).map_err(BuilderError::dom)?;
    head.append_child(&link).map_err(BuilderError::dom)?;
    debug!(href, "injected head stylesheet");
    Ok(())
}
