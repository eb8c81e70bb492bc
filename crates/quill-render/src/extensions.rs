//! Parser extensions.

use bitflags::bitflags;
use pulldown_cmark::Options;

bitflags! {
    /// Markdown syntax extensions enabled for a render pass.
    ///
    /// `TABLES`, `FOOTNOTES`, `STRIKETHROUGH`, `SUPERSCRIPT` and `MATH` switch on
    /// parser features. `AUTOLINK`, `UNDERLINE`, `HIGHLIGHT` and `QUOTE` are
    /// recognized by the dispatcher on top of what the parser reports.
    ///
    /// ```
    /// use quill_render::Extensions;
    ///
    /// let ext = Extensions::TABLES | Extensions::FOOTNOTES;
    /// assert!(ext.contains(Extensions::TABLES));
    /// assert_eq!(Extensions::from_config_name("strikethrough"), Some(Extensions::STRIKETHROUGH));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Extensions: u16 {
        /// Pipe tables.
        const TABLES        = 1 << 0;
        /// `[^label]` footnotes.
        const FOOTNOTES     = 1 << 1;
        /// Bare `http://`, `https://` and `www.` URLs become autolinks.
        const AUTOLINK      = 1 << 2;
        /// `~~text~~`.
        const STRIKETHROUGH = 1 << 3;
        /// `_text_` is underline instead of emphasis.
        const UNDERLINE     = 1 << 4;
        /// `==text==`.
        const HIGHLIGHT     = 1 << 5;
        /// `"text"` becomes a quote span.
        const QUOTE         = 1 << 6;
        /// `^text^`.
        const SUPERSCRIPT   = 1 << 7;
        /// `$inline$` and `$$display$$` math.
        const MATH          = 1 << 8;
    }
}

const NAMES: [(&str, Extensions); 9] = [
    ("tables", Extensions::TABLES),
    ("footnotes", Extensions::FOOTNOTES),
    ("autolink", Extensions::AUTOLINK),
    ("strikethrough", Extensions::STRIKETHROUGH),
    ("underline", Extensions::UNDERLINE),
    ("highlight", Extensions::HIGHLIGHT),
    ("quote", Extensions::QUOTE),
    ("superscript", Extensions::SUPERSCRIPT),
    ("math", Extensions::MATH),
];

impl Extensions {
    /// Look up an extension by its lowercase name.
    #[must_use]
    pub fn from_config_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, ext)| *ext)
    }

    /// Names of all known extensions.
    pub fn names() -> impl Iterator<Item = &'static str> {
        NAMES.iter().map(|(name, _)| *name)
    }

    /// Extensions handled inside text runs by the dispatcher.
    #[must_use]
    pub(crate) fn scans_text(self) -> bool {
        self.intersects(Self::AUTOLINK | Self::HIGHLIGHT | Self::QUOTE)
    }

    /// Parser options for these extensions.
    #[must_use]
    pub fn parser_options(self) -> Options {
        let mut options = Options::empty();
        if self.contains(Self::TABLES) {
            options |= Options::ENABLE_TABLES;
        }
        if self.contains(Self::FOOTNOTES) {
            options |= Options::ENABLE_FOOTNOTES;
        }
        if self.contains(Self::STRIKETHROUGH) {
            options |= Options::ENABLE_STRIKETHROUGH;
        }
        if self.contains(Self::SUPERSCRIPT) {
            options |= Options::ENABLE_SUPERSCRIPT;
        }
        if self.contains(Self::MATH) {
            options |= Options::ENABLE_MATH;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_options_empty() {
        assert_eq!(Extensions::empty().parser_options(), Options::empty());
    }

    #[test]
    fn test_parser_options_mapping() {
        let options = (Extensions::TABLES | Extensions::MATH | Extensions::HIGHLIGHT).parser_options();
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_MATH));
        assert!(!options.contains(Options::ENABLE_FOOTNOTES));
    }

    #[test]
    fn test_bridge_extensions_have_no_parser_option() {
        let bridge = Extensions::AUTOLINK | Extensions::UNDERLINE | Extensions::HIGHLIGHT | Extensions::QUOTE;
        assert_eq!(bridge.parser_options(), Options::empty());
        assert!(bridge.scans_text());
        assert!(!Extensions::UNDERLINE.scans_text());
    }

    #[test]
    fn test_from_config_name_is_lowercase() {
        assert_eq!(Extensions::from_config_name("math"), Some(Extensions::MATH));
        assert_eq!(Extensions::from_config_name("MATH"), None);
        assert_eq!(Extensions::from_config_name("wikilinks"), None);
    }

    #[test]
    fn test_config_names_differ_from_flag_names() {
        assert_eq!(Extensions::from_name("STRIKETHROUGH"), Some(Extensions::STRIKETHROUGH));
        assert_eq!(Extensions::from_config_name("STRIKETHROUGH"), None);
        assert_eq!(Extensions::from_name("strikethrough"), None);
    }

    #[test]
    fn test_names_cover_all_flags() {
        let all = Extensions::names()
            .filter_map(Extensions::from_config_name)
            .fold(Extensions::empty(), |acc, ext| acc | ext);
        assert_eq!(all, Extensions::all());
    }
}
