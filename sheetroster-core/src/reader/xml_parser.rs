//! XML parsing utilities for workbook metadata calamine does not expose

use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

/// Extract the active tab index (`workbookView/@activeTab`) from an XLSX file.
///
/// Returns `Ok(None)` when the package has no workbook part or the view does
/// not record an active tab.
pub fn extract_active_tab_from_xlsx(
    archive: &mut ZipArchive<impl Read + Seek>,
) -> Result<Option<usize>, quick_xml::Error> {
    let workbook_xml = match archive.by_name("xl/workbook.xml") {
        Ok(file) => file,
        Err(_) => return Ok(None),
    };

    let mut reader = Reader::from_reader(BufReader::new(workbook_xml));
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"workbookView" => {
                // Only the first view counts
                let active = e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.as_ref() == b"activeTab")
                    .and_then(|attr| String::from_utf8_lossy(&attr.value).parse().ok());
                return Ok(Some(active.unwrap_or(0)));
            }
            Event::Start(e) if e.local_name().as_ref() == b"sheets" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(None)
}
