//! Support for the Android `strings.xml` resource format.
//!
//! Only singular `<string>` elements are read. Other children of `<resources>`
//! (`<plurals>`, `<string-array>`, comments) are skipped and not written back.
//! Markup nested inside a `<string>` contributes its text only. Values are
//! kept verbatim, surrounding whitespace included.

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{BufRead, Write};

use crate::{
    error::Error,
    traits::Parser,
    types::{ResourceSet, StringResource},
};

const INDENT: &str = "\n    ";

impl Parser for ResourceSet {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut set = ResourceSet::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"string" => {
                    let (name, translatable) = parse_string_attributes(e)?;
                    let value = read_string_value(&mut xml_reader)?;
                    set.insert(StringResource {
                        name,
                        value,
                        translatable,
                    });
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"string" => {
                    let (name, translatable) = parse_string_attributes(e)?;
                    set.insert(StringResource {
                        name,
                        value: String::new(),
                        translatable,
                    });
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(set)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        xml_writer.write_event(Event::Start(BytesStart::new("resources")))?;

        for sr in self {
            xml_writer.write_event(Event::Text(BytesText::new(INDENT)))?;

            let mut elem = BytesStart::new("string");
            elem.push_attribute(("name", sr.name.as_str()));
            if !sr.translatable {
                elem.push_attribute(("translatable", "false"));
            }

            xml_writer.write_event(Event::Start(elem))?;
            xml_writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(
                sr.value.as_str(),
            ))))?;
            xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
        }

        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

fn parse_string_attributes(e: &BytesStart) -> Result<(String, bool), Error> {
    let mut name = None;
    let mut translatable = true;

    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::InvalidResource(e.to_string()))?;
        match attr.key.as_ref() {
            b"name" => name = Some(attr.unescape_value()?.to_string()),
            b"translatable" => {
                translatable = attr.unescape_value()?.trim() != "false";
            }
            _ => {}
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::InvalidResource("string tag missing 'name'".to_string()))?;
    Ok((name, translatable))
}

/// Collects the text of one `<string>` element up to its closing tag.
fn read_string_value<R: BufRead>(xml_reader: &mut Reader<R>) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut value = String::new();
    let mut depth = 0usize;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => value.push_str(&e.unescape().map_err(Error::XmlParse)?),
            Ok(Event::CData(e)) => {
                let raw: &[u8] = &e;
                value.push_str(&String::from_utf8_lossy(raw));
            }
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) if depth == 0 => break,
            Ok(Event::End(_)) => depth -= 1,
            Ok(Event::Eof) => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            Ok(_) => (),
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }

    Ok(value)
}
