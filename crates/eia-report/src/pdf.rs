//! PDF report assembly
//!
//! Text-only A4 pages using the standard Helvetica fonts, so no font
//! embedding is needed. Content is laid out as a flat list of lines and
//! split into pages at a fixed line budget.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::{module_rows, module_title, ReportError, ReportInput};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const LEADING: i64 = 14;
/// Body lines per page, leaving room for the footer
pub const LINES_PER_PAGE: usize = 52;
/// Characters per line at body size before wrapping
const WRAP_WIDTH: usize = 90;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Style {
    Title,
    Heading,
    Body,
}

impl Style {
    fn font(&self) -> &'static [u8] {
        match self {
            Style::Title | Style::Heading => b"F2",
            Style::Body => b"F1",
        }
    }

    fn size(&self) -> i64 {
        match self {
            Style::Title => 16,
            Style::Heading => 12,
            Style::Body => 10,
        }
    }
}

#[derive(Debug, Clone)]
struct Line {
    style: Style,
    text: String,
}

fn push(lines: &mut Vec<Line>, style: Style, text: &str) {
    for chunk in wrap(text, WRAP_WIDTH) {
        lines.push(Line { style, text: chunk });
    }
}

fn blank(lines: &mut Vec<Line>) {
    lines.push(Line {
        style: Style::Body,
        text: String::new(),
    });
}

/// Greedy word wrap. Words longer than the width are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            out.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();

        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

/// Map text onto the WinAnsi range the standard fonts can show
fn pdf_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '²' => b'2',
            '³' => b'3',
            c if (c as u32) < 0x7f => c as u8,
            _ => b'?',
        })
        .collect()
}

fn layout(input: &ReportInput<'_>) -> Vec<Line> {
    let project = input.project;
    let summary = input.summary;
    let mut lines = Vec::new();

    push(&mut lines, Style::Title, "Environmental Impact Assessment Report");
    blank(&mut lines);
    push(&mut lines, Style::Body, &format!("Project: {}", project.name));
    push(&mut lines, Style::Body, &format!("Location: {}", project.location));
    push(&mut lines, Style::Body, &format!("Type: {}", project.project_type));
    push(&mut lines, Style::Body, &format!("Gross floor area: {} m2", project.size));
    push(&mut lines, Style::Body, &format!("Assessment ID: {}", input.assessment_id));
    push(
        &mut lines,
        Style::Body,
        &format!("Generated: {}", input.generated_at.format("%Y-%m-%d %H:%M UTC")),
    );
    blank(&mut lines);

    push(&mut lines, Style::Heading, "Executive Summary");
    push(&mut lines, Style::Body, &format!("Overall status: {}", summary.overall_status));
    push(
        &mut lines,
        Style::Body,
        &format!("Compliance score: {:.1} / 100", summary.compliance_score),
    );
    push(
        &mut lines,
        Style::Body,
        &format!("Impacts requiring attention: {}", summary.total_impacts),
    );
    blank(&mut lines);

    push(&mut lines, Style::Heading, "Critical Issues");
    if summary.critical_issues.is_empty() {
        push(&mut lines, Style::Body, "No critical issues identified.");
    }
    for issue in &summary.critical_issues {
        push(&mut lines, Style::Body, &format!("- {}", issue));
    }

    for (key, result) in summary.results.iter() {
        blank(&mut lines);
        push(&mut lines, Style::Heading, &module_title(key));
        for (label, value) in module_rows(result) {
            push(&mut lines, Style::Body, &format!("{}: {}", label, value));
        }
    }

    lines
}

fn page_content(lines: &[Line], page: usize, page_count: usize) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
    ];

    for line in lines {
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(line.style.font().to_vec()),
                line.style.size().into(),
            ],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(pdf_text(&line.text))],
        ));
        operations.push(Operation::new("Td", vec![0.into(), (-LEADING).into()]));
    }
    operations.push(Operation::new("ET", vec![]));

    // Footer
    operations.extend([
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), 8.into()]),
        Operation::new("Td", vec![(PAGE_WIDTH / 2 - 20).into(), (MARGIN / 2).into()]),
        Operation::new(
            "Tj",
            vec![Object::string_literal(format!("Page {} of {}", page, page_count))],
        ),
        Operation::new("ET", vec![]),
    ]);

    Content { operations }
}

pub fn render_pdf(input: &ReportInput<'_>) -> Result<Vec<u8>, ReportError> {
    let lines = layout(input);
    let pages: Vec<&[Line]> = lines.chunks(LINES_PER_PAGE).collect();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for (index, page_lines) in pages.iter().enumerate() {
        let content = page_content(page_lines, index + 1, pages.len());
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        });
        page_ids.push(page_id);
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        "Count" => page_ids.len() as i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(pdf_text(&format!("EIA Report - {}", input.project.name))),
        "Producer" => Object::string_literal("eia-report"),
    });
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;

    tracing::debug!(pages = page_ids.len(), bytes = buffer.len(), "PDF report assembled");
    Ok(buffer)
}
