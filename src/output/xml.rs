//! Sitemap XML documents
//!
//! Both document kinds carry an XML declaration, UTF-8 encoding, the Sitemaps
//! namespace on the root element, and two-space indentation. Text content is
//! escaped by the writer.

use crate::output::OutputError;
use crate::state::PageDescriptor;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Namespace of the Sitemaps protocol
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Writes a `urlset` document with one `url` entry per page
pub fn write_urlset<W: Write>(out: W, pages: &[&PageDescriptor]) -> Result<W, OutputError> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    open_document(&mut writer, "urlset")?;

    for page in pages {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", page.url())?;
        if let Some(lastmod) = page.lastmod() {
            write_text_element(&mut writer, "lastmod", &lastmod)?;
        }
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    close_document(writer, "urlset")
}

/// Writes a `sitemapindex` document referencing each sitemap location
pub fn write_sitemap_index<W: Write>(out: W, locations: &[String]) -> Result<W, OutputError> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    open_document(&mut writer, "sitemapindex")?;

    for loc in locations {
        writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
        write_text_element(&mut writer, "loc", loc)?;
        writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
    }

    close_document(writer, "sitemapindex")
}

fn open_document<W: Write>(writer: &mut Writer<W>, root: &str) -> Result<(), OutputError> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut start = BytesStart::new(root);
    start.push_attribute(("xmlns", SITEMAP_NS));
    writer.write_event(Event::Start(start))?;
    Ok(())
}

fn close_document<W: Write>(mut writer: Writer<W>, root: &str) -> Result<W, OutputError> {
    writer.write_event(Event::End(BytesEnd::new(root)))?;
    let mut out = writer.into_inner();
    out.write_all(b"\n")?;
    Ok(out)
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), OutputError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
