use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};

use super::{DocumentError, DocumentFormat};

/// Joins the text of every body paragraph with `\n`, in document order.
///
/// Empty paragraphs are kept so blank lines survive. Tables and other
/// non-paragraph body children are not paragraphs and are skipped.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let docx = read_docx(bytes).map_err(|e| DocumentError::Extraction {
        format: DocumentFormat::Docx,
        message: e.to_string(),
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut out = String::new();
    push_children_text(&para.children, &mut out);
    out
}

/// Runs are concatenated with no separator; hyperlinks contribute the text of their runs.
fn push_children_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, out),
            _ => {}
        }
    }
}
