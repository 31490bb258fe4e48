// Rendering of a composed report as a PDF document.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::f32::consts::PI;

use crate::report::*;

// Landscape pages of 12 x 8.27 inches.
const PAGE_WIDTH: f32 = 864.0;
const PAGE_HEIGHT: f32 = 595.44;

type Rgb = (f32, f32, f32);

const BLACK: Rgb = (0.0, 0.0, 0.0);
const MEDIAN_COLOR: Rgb = (1.0, 0.498, 0.055);
const PALETTE: [Rgb; 10] = [
    (0.122, 0.467, 0.706),
    (1.0, 0.498, 0.055),
    (0.173, 0.627, 0.173),
    (0.839, 0.153, 0.157),
    (0.580, 0.404, 0.741),
    (0.549, 0.337, 0.294),
    (0.890, 0.467, 0.761),
    (0.498, 0.498, 0.498),
    (0.737, 0.741, 0.133),
    (0.090, 0.745, 0.812),
];

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

fn real(v: f32) -> Object {
    Object::Real(v.into())
}

// Characters that WinAnsiEncoding places in 0x80..=0x9F instead of the C1 controls.
const WIN_ANSI_EXTRA: [(char, u8); 27] = [
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

// The standard fonts use WinAnsiEncoding, which matches Latin-1 outside of 0x80..=0x9F.
fn encode_text(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c as u32 {
            0x80..=0x9F => b'?',
            x if x < 256 => x as u8,
            _ => WIN_ANSI_EXTRA
                .iter()
                .find(|(w, _)| *w == c)
                .map(|(_, b)| *b)
                .unwrap_or(b'?'),
        })
        .collect()
}

// Average glyph width of Helvetica.
fn text_width(s: &str, size: f32) -> f32 {
    s.chars().count() as f32 * size * 0.52
}

/// The drawing operations of one page.
struct Canvas {
    operations: Vec<Operation>,
}

impl Canvas {
    fn new() -> Canvas {
        Canvas {
            operations: Vec::new(),
        }
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn text(&mut self, font: Font, size: f32, x: f32, y: f32, s: &str) {
        self.op("BT", vec![]);
        self.op("Tf", vec![font.resource().into(), real(size)]);
        self.op("Td", vec![real(x), real(y)]);
        self.op("Tj", vec![Object::string_literal(encode_text(s))]);
        self.op("ET", vec![]);
    }

    fn centered_text(&mut self, font: Font, size: f32, cx: f32, y: f32, s: &str) {
        self.text(font, size, cx - text_width(s, size) / 2.0, y, s);
    }

    fn right_text(&mut self, font: Font, size: f32, x: f32, y: f32, s: &str) {
        self.text(font, size, x - text_width(s, size), y, s);
    }

    fn fill_color(&mut self, c: Rgb) {
        self.op("rg", vec![real(c.0), real(c.1), real(c.2)]);
    }

    fn stroke_color(&mut self, c: Rgb) {
        self.op("RG", vec![real(c.0), real(c.1), real(c.2)]);
    }

    fn line_width(&mut self, w: f32) {
        self.op("w", vec![real(w)]);
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.op("m", vec![real(x1), real(y1)]);
        self.op("l", vec![real(x2), real(y2)]);
        self.op("S", vec![]);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.op("re", vec![real(x), real(y), real(w), real(h)]);
        self.op("S", vec![]);
    }

    /// Closes the path through the points and paints it with `paint` (f, S or B).
    fn polygon(&mut self, points: &[(f32, f32)], paint: &str) {
        let mut iter = points.iter();
        if let Some((x, y)) = iter.next() {
            self.op("m", vec![real(*x), real(*y)]);
            for (x, y) in iter {
                self.op("l", vec![real(*x), real(*y)]);
            }
            self.op("h", vec![]);
            self.op(paint, vec![]);
        }
    }

    fn encode(self) -> RpResult<Vec<u8>> {
        let content = Content {
            operations: self.operations,
        };
        match content.encode() {
            Ok(bytes) => Ok(bytes),
            Err(e) => whatever!("Failed to encode a page: {}", e),
        }
    }
}

// ******** Pages *********

fn draw_cover(c: &mut Canvas, text: &str) {
    let lines: Vec<&str> = text.lines().collect();
    let leading = 28.0;
    let mut y = PAGE_HEIGHT / 2.0 + (lines.len() as f32 - 1.0) * leading / 2.0;
    c.fill_color(BLACK);
    for line in lines {
        c.centered_text(Font::Regular, 20.0, PAGE_WIDTH / 2.0, y, line);
        y -= leading;
    }
}

fn draw_pie(c: &mut Canvas, title: &str, slices: &[PieSlice]) {
    c.fill_color(BLACK);
    c.centered_text(Font::Bold, 16.0, PAGE_WIDTH / 2.0, PAGE_HEIGHT - 50.0, title);
    let (cx, cy) = (PAGE_WIDTH / 2.0, PAGE_HEIGHT / 2.0 - 20.0);
    let radius = PAGE_HEIGHT * 0.33;
    if slices.is_empty() {
        c.centered_text(Font::Regular, 14.0, cx, cy, "No answers");
        return;
    }

    // Slices go counter-clockwise, starting at the top.
    let mut start = PI / 2.0;
    let mut labels: Vec<(f32, &PieSlice)> = Vec::new();
    for (idx, slice) in slices.iter().enumerate() {
        let sweep = 2.0 * PI * slice.percent as f32 / 100.0;
        let steps = ((sweep / (PI / 90.0)).ceil() as usize).max(2);
        let mut points: Vec<(f32, f32)> = vec![(cx, cy)];
        for s in 0..=steps {
            let a = start + sweep * s as f32 / steps as f32;
            points.push((cx + radius * a.cos(), cy + radius * a.sin()));
        }
        c.fill_color(PALETTE[idx % PALETTE.len()]);
        c.polygon(&points, "f");
        labels.push((start + sweep / 2.0, slice));
        start += sweep;
    }

    c.fill_color(BLACK);
    for (mid, slice) in labels {
        let (dx, dy) = (mid.cos(), mid.sin());
        let pct = format!("{:.1}%", slice.percent);
        c.centered_text(
            Font::Regular,
            11.0,
            cx + 0.6 * radius * dx,
            cy + 0.6 * radius * dy - 4.0,
            &pct,
        );
        let (lx, ly) = (cx + 1.1 * radius * dx, cy + 1.1 * radius * dy - 4.0);
        if dx >= 0.0 {
            c.text(Font::Regular, 12.0, lx, ly, &slice.label);
        } else {
            c.right_text(Font::Regular, 12.0, lx, ly, &slice.label);
        }
    }
}

fn draw_explanatory(c: &mut Canvas, text: &WrappedText) {
    let size = 14.0;
    let x = PAGE_WIDTH * 0.05;
    let mut y = PAGE_HEIGHT * 0.95 - size;
    c.fill_color(BLACK);
    for line in text.display_lines() {
        if !line.is_empty() {
            c.text(Font::Regular, size, x, y, line);
        }
        y -= size * 1.3;
    }
}

// The range of the vertical axis, with some margin around the data.
fn value_range(stats: &[Option<BoxStats>]) -> (f32, f32) {
    let mut values = stats.iter().flatten().flat_map(|b| {
        let mut v = vec![b.whisker_low, b.whisker_high];
        v.extend(b.outliers.iter().cloned());
        v
    });
    let first = match values.next() {
        Some(x) => x,
        None => return (0.0, 1.0),
    };
    let (lo, hi) = values.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x)));
    (lo as f32 - 0.5, hi as f32 + 0.5)
}

fn draw_distribution(
    c: &mut Canvas,
    title: &str,
    columns: &RankedColumnSet,
    label_width: usize,
) {
    let (left, right) = (70.0, PAGE_WIDTH - 30.0);
    let (bottom, top) = (140.0, PAGE_HEIGHT - 70.0);

    c.fill_color(BLACK);
    c.stroke_color(BLACK);
    c.line_width(0.8);
    c.centered_text(Font::Bold, 14.0, PAGE_WIDTH / 2.0, PAGE_HEIGHT - 45.0, title);
    c.stroke_rect(left, bottom, right - left, top - bottom);

    let stats: Vec<Option<BoxStats>> = columns
        .columns()
        .iter()
        .map(|rc| BoxStats::from_column(rc.column))
        .collect();
    let (lo, hi) = value_range(&stats);
    let y = |v: f64| bottom + (v as f32 - lo) / (hi - lo) * (top - bottom);

    let step = ((hi - lo) / 10.0).ceil().max(1.0);
    let mut tick = lo.ceil();
    while tick <= hi {
        let ty = y(tick as f64);
        c.line(left - 4.0, ty, left, ty);
        c.right_text(Font::Regular, 10.0, left - 6.0, ty - 3.5, &format!("{}", tick));
        tick += step;
    }

    if columns.is_empty() {
        return;
    }
    let slot = (right - left) / columns.len() as f32;
    let half = (slot * 0.25).min(30.0);
    for (idx, (rc, b)) in columns.columns().iter().zip(stats.iter()).enumerate() {
        let cx = left + slot * (idx as f32 + 0.5);
        if let Some(b) = b {
            c.line_width(1.0);
            c.stroke_rect(cx - half, y(b.q1), 2.0 * half, y(b.q3) - y(b.q1));
            c.line(cx, y(b.q1), cx, y(b.whisker_low));
            c.line(cx, y(b.q3), cx, y(b.whisker_high));
            c.line(cx - half / 2.0, y(b.whisker_low), cx + half / 2.0, y(b.whisker_low));
            c.line(cx - half / 2.0, y(b.whisker_high), cx + half / 2.0, y(b.whisker_high));
            for o in b.outliers.iter() {
                let oy = y(*o);
                c.polygon(
                    &[(cx, oy + 3.0), (cx + 3.0, oy), (cx, oy - 3.0), (cx - 3.0, oy)],
                    "S",
                );
            }
            c.stroke_color(MEDIAN_COLOR);
            c.line_width(1.5);
            c.line(cx - half, y(b.median), cx + half, y(b.median));
            c.stroke_color(BLACK);
        }
        for (j, line) in wrap_words(&rc.column.label, label_width).iter().enumerate() {
            c.centered_text(Font::Regular, 9.0, cx, bottom - 16.0 - 11.0 * j as f32, line);
        }
    }
}

fn draw_page(page: &Page, label_width: usize) -> Canvas {
    let mut c = Canvas::new();
    match page {
        Page::Cover { text } => draw_cover(&mut c, text),
        Page::PieChart { title, slices } => draw_pie(&mut c, title, slices),
        Page::Explanatory { text } => draw_explanatory(&mut c, text),
        Page::Distribution { title, columns } => {
            draw_distribution(&mut c, title, columns, label_width)
        }
    }
    c
}

/// Writes each page of a report on its own landscape page.
pub struct PdfRenderer {
    path: PathBuf,
    label_width: usize,
}

impl PdfRenderer {
    pub fn new(path: PathBuf, label_width: usize) -> PdfRenderer {
        PdfRenderer { path, label_width }
    }

    pub fn build_document(&self, report: &Report) -> RpResult<Document> {
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
                Font::Regular.resource() => regular_id,
                Font::Bold.resource() => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for (idx, page) in report.pages.iter().enumerate() {
            debug!("build_document: page {}: {}", idx + 1, page.kind());
            let content = draw_page(page, self.label_width).encode()?;
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(report.pages.len() as i64),
            "Resources" => resources_id,
            "MediaBox" => vec![real(0.0), real(0.0), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();
        Ok(doc)
    }
}

impl ReportRenderer for PdfRenderer {
    fn render(&self, report: &Report) -> RpResult<()> {
        let mut doc = self.build_document(report)?;
        let mut buffer: Vec<u8> = Vec::new();
        if let Err(e) = doc.save_to(&mut buffer) {
            whatever!("Failed to serialize the report: {}", e)
        }
        fs::write(&self.path, buffer).context(WritingPdfSnafu {
            path: self.path.display().to_string(),
        })?;
        info!(
            "render: wrote {} pages to {:?}",
            report.pages.len(),
            self.path.display()
        );
        Ok(())
    }
}
