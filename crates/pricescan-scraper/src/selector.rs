/// An ordered list of CSS locators for one logical field.
///
/// Resolution tries each selector in order and stops at the first that
/// matches; later selectors are only fallbacks for older or alternate layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorChain {
    pub name: &'static str,
    pub selectors: &'static [&'static str],
    /// Attribute holding the authoritative value when present (e.g. `data-price`).
    pub data_attribute: Option<&'static str>,
}

impl SelectorChain {
    #[must_use]
    pub const fn new(name: &'static str, selectors: &'static [&'static str]) -> Self {
        Self {
            name,
            selectors,
            data_attribute: None,
        }
    }

    #[must_use]
    pub const fn with_data_attribute(mut self, attribute: &'static str) -> Self {
        self.data_attribute = Some(attribute);
        self
    }
}
