mod builder;

use crate::{
    bpmn::ElementType,
    diagram::Diagram,
    error::{Error, NO_ROOT_ELEMENT, UNBALANCED_END, UNCLOSED_ELEMENT},
};
use builder::{Attributes, DataBuilder};
use quick_xml::{Reader, events::BytesStart, events::Event};
use std::io::BufRead;

pub(super) fn read_bpmn<R: BufRead>(mut reader: Reader<R>) -> Result<Diagram, Error> {
    reader.config_mut().trim_text(true);
    let mut builder = DataBuilder::default();
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(bs) => {
                seen_root = true;
                depth += 1;
                let element = classify(&bs);
                builder.start(element, read_attributes(&reader, &bs)?);
            }
            Event::Empty(bs) => {
                seen_root = true;
                let element = classify(&bs);
                builder.start(element, read_attributes(&reader, &bs)?);
                builder.end();
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::Parse(UNBALANCED_END.into()))?;
                builder.end();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(Error::Parse(NO_ROOT_ELEMENT.into()));
    }
    if depth > 0 {
        return Err(Error::Parse(UNCLOSED_ELEMENT.into()));
    }
    Ok(builder.into())
}

fn classify(bs: &BytesStart<'_>) -> Option<ElementType> {
    let name = bs.local_name();
    match ElementType::try_from(name.as_ref()) {
        Ok(element) => Some(element),
        Err(tag) => {
            log::trace!("ignore element {tag}");
            None
        }
    }
}

fn read_attributes<R>(reader: &Reader<R>, bs: &BytesStart<'_>) -> Result<Attributes, Error> {
    let mut attributes = Attributes::default();
    for attribute in bs.attributes() {
        let attribute = attribute?;
        let value = attribute
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();
        match attribute.key.local_name().as_ref() {
            b"id" => attributes.id = Some(value),
            b"name" => attributes.name = Some(value),
            b"sourceRef" => attributes.source_ref = Some(value),
            b"targetRef" => attributes.target_ref = Some(value),
            _ => {}
        }
    }
    Ok(attributes)
}
