// file: src/extractor/docx.rs
// description: DOCX text extraction from word/document.xml, paragraphs and table cells
// reference: https://docs.rs/quick-xml, https://docs.rs/zip

use crate::error::ExtractionError;
use crate::extractor::clean_text;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Cursor, Read};

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxExtractor;

impl DocxExtractor {
    pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(malformed)?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(malformed)?
            .read_to_string(&mut xml)
            .map_err(malformed)?;

        Self::extract_from_xml(&xml).map(|text| clean_text(&text))
    }

    /// Text runs (`w:t`) are concatenated; paragraph ends become newlines and
    /// table cells are separated by a space, rows by a newline.
    fn extract_from_xml(xml: &str) -> Result<String, ExtractionError> {
        let mut reader = Reader::from_str(xml);
        let mut text = String::new();
        let mut in_text = false;
        let mut table_depth = 0usize;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"t" => in_text = true,
                    b"tbl" => table_depth += 1,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"tab" => text.push('\t'),
                    b"br" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Text(e)) if in_text => {
                    let chunk = e.unescape().map_err(malformed)?;
                    text.push_str(&chunk);
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"p" if table_depth == 0 => text.push('\n'),
                    b"tc" => text.push(' '),
                    b"tr" => text.push('\n'),
                    b"tbl" => table_depth = table_depth.saturating_sub(1),
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(malformed(e)),
                _ => {}
            }
        }

        Ok(text)
    }
}

fn malformed(err: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::Malformed {
        kind: "DOCX".to_string(),
        message: format!(
            "{}. Note: Legacy .doc files are not supported. Please convert to .docx format.",
            err
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Senior </w:t></w:r><w:r><w:t>Engineer &amp; Lead</w:t></w:r></w:p>
    <w:tbl>
      <w:tr>
        <w:tc><w:p><w:r><w:t>Rust</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>8 years</w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
  </w:body>
</w:document>"#;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file(DOCUMENT_PART, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_extracts_paragraphs_and_tables() {
        let text = DocxExtractor::extract(&build_docx(BODY)).unwrap();

        assert!(text.starts_with("Jane Doe\nSenior Engineer & Lead"));
        assert!(text.contains("Rust 8 years"));
    }

    #[test]
    fn test_not_a_zip_is_malformed() {
        let err = DocxExtractor::extract(b"plain bytes").unwrap_err();
        assert!(err.to_string().contains("Legacy .doc files are not supported"));
    }

    #[test]
    fn test_missing_document_part_is_malformed() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("word/styles.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<styles/>").unwrap();
            writer.finish().unwrap();
        }

        let result = DocxExtractor::extract(&buffer.into_inner());
        assert!(matches!(result, Err(ExtractionError::Malformed { .. })));
    }
}
