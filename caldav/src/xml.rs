// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! XML utilities for WebDAV/CalDAV processing.

use quick_xml::escape::{EscapeError, resolve_predefined_entity};
use quick_xml::events::Event;

/// XML namespaces used in `CalDAV`.
pub mod ns {
    /// `WebDAV` namespace.
    pub const DAV: &str = "DAV:";

    /// `CalDAV` namespace.
    pub const CALDAV: &str = "urn:ietf:params:xml:ns:caldav";

    /// ownCloud/Nextcloud extension namespace.
    pub const OWNCLOUD: &str = "http://owncloud.org/ns";
}

/// A namespace together with the prefix this crate writes it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// `DAV:`
    Dav,
    /// `urn:ietf:params:xml:ns:caldav`
    CalDav,
    /// `http://owncloud.org/ns`
    OwnCloud,
}

impl Namespace {
    /// Prefix used when writing elements.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Dav => "D",
            Self::CalDav => "C",
            Self::OwnCloud => "OC",
        }
    }

    /// Namespace URI.
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Dav => ns::DAV,
            Self::CalDav => ns::CALDAV,
            Self::OwnCloud => ns::OWNCLOUD,
        }
    }

    /// The `xmlns:<prefix>` attribute name.
    pub fn xmlns_attr(self) -> String {
        format!("xmlns:{}", self.prefix())
    }
}

/// Reads the text content of the element whose start tag was just consumed,
/// leaving the reader after its end tag.
///
/// Character references and the predefined entities (`&amp;`, `&lt;`, ...)
/// are resolved, and surrounding whitespace is trimmed from the whole text
/// rather than from each chunk between references.
///
/// # Errors
///
/// Returns an error if XML parsing fails or the text references an unknown
/// entity.
pub fn read_element_text<R: std::io::BufRead>(
    reader: &mut quick_xml::NsReader<R>,
) -> Result<String, quick_xml::Error> {
    let mut text = String::new();
    let mut depth = 1;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Text(e) => text.push_str(&e.decode()?),
            Event::GeneralRef(e) => {
                if let Some(ch) = e.resolve_char_ref()? {
                    text.push(ch);
                } else {
                    let name = e.decode()?;
                    let Some(value) = resolve_predefined_entity(&name) else {
                        let pos = usize::try_from(reader.buffer_position()).unwrap_or_default();
                        return Err(
                            EscapeError::UnrecognizedEntity(pos..pos, name.into_owned()).into(),
                        );
                    };
                    text.push_str(value);
                }
            }
            Event::CData(e) => text.push_str(&e.decode()?),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(xml: &str) -> Result<String, quick_xml::Error> {
        let mut reader = quick_xml::NsReader::from_str(xml);
        let mut buf = Vec::new();
        loop {
            if let Event::Start(_) = reader.read_event_into(&mut buf)? {
                return read_element_text(&mut reader);
            }
            buf.clear();
        }
    }

    #[test]
    fn element_text_resolves_references() {
        assert_eq!(text_of("<a>work&amp;play</a>").unwrap(), "work&play");
        assert_eq!(text_of("<a>&lt;&#38;&#x3E;</a>").unwrap(), "<&>");
        assert_eq!(text_of("<a>it&apos;s &quot;x&quot;</a>").unwrap(), "it's \"x\"");
    }

    #[test]
    fn element_text_keeps_spaces_around_references() {
        assert_eq!(text_of("<a>\n  alice &amp; bob\n</a>").unwrap(), "alice & bob");
    }

    #[test]
    fn element_text_rejects_unknown_entity() {
        assert!(text_of("<a>&nbsp;</a>").is_err());
    }
}
