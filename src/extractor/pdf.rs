// file: src/extractor/pdf.rs
// description: PDF text extraction
// reference: https://docs.rs/pdf-extract

use crate::error::ExtractionError;
use crate::extractor::clean_text;

pub struct PdfExtractor;

impl PdfExtractor {
    pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
        let text =
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Malformed {
                kind: "PDF".to_string(),
                message: e.to_string(),
            })?;

        Ok(clean_text(&text))
    }
}
