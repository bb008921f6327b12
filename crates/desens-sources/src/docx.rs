//! Word (.docx) reader
//!
//! A .docx file is a zip container; body text lives in
//! `word/document.xml`. Every `<w:p>` becomes one paragraph, including
//! paragraphs inside tables and text boxes.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::reader::DocumentReader;
use crate::{ReadError, Result};

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxReader;

#[async_trait]
impl DocumentReader for DocxReader {
    async fn read(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = tokio::fs::read(path).await?;

        let mut archive =
            zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ReadError::malformed(path, e))?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| ReadError::malformed(path, format!("{}: {}", DOCUMENT_PART, e)))?
            .read_to_string(&mut xml)?;

        parse_document_xml(&xml).map_err(|e| ReadError::malformed(path, e))
    }

    fn extensions(&self) -> &[&'static str] {
        &["docx"]
    }
}

/// Paragraph texts of a WordprocessingML body, in document order
pub fn parse_document_xml(xml: &str) -> std::result::Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    // Open paragraphs; text boxes nest a <w:p> inside another
    let mut open: Vec<String> = Vec::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" if in_run => push_char(&mut open, '\t'),
                b"br" | b"cr" if in_run => push_char(&mut open, '\n'),
                _ => {}
            },
            Event::Text(e) if in_text => {
                let text = e.unescape()?;
                if let Some(current) = open.last_mut() {
                    current.push_str(&text);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(done) = open.pop() {
                        paragraphs.push(done);
                    }
                }
                b"r" => in_run = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_char(open: &mut [String], ch: char) {
    if let Some(current) = open.last_mut() {
        current.push(ch);
    }
}
