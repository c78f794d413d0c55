//! DOCX (WordprocessingML) rendering for report documents.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{
    Alignment, Block, Document, InlineContent, Metadata, Paragraph, Resource, Table, TextRun,
};

use super::options::RenderOptions;
use super::package::{CompressionMethod, PackageWriter};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>";

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

/// English Metric Units per point (914400 per inch / 72).
const EMU_PER_POINT: f64 = 12700.0;
/// EMU per pixel at the 96 dpi screen convention (914400 / 96).
const EMU_PER_PIXEL: i64 = 9525;

/// Convert a document to DOCX bytes.
pub fn to_docx(doc: &Document, options: &RenderOptions) -> Result<Vec<u8>> {
    let renderer = DocxRenderer::new(options.clone());
    renderer.render(doc)
}

/// Render a document and write the DOCX file in one step.
///
/// Rendering happens fully in memory; the filesystem is only touched by the
/// final write, so earlier failures leave no output file behind.
pub fn write_docx<P: AsRef<Path>>(doc: &Document, options: &RenderOptions, path: P) -> Result<()> {
    let bytes = to_docx(doc, options)?;
    fs::write(path.as_ref(), bytes)?;
    log::debug!("wrote {}", path.as_ref().display());
    Ok(())
}

/// An embedded image scheduled for packaging, with its relationship id and
/// media part file name.
struct MediaPart<'a> {
    resource_id: &'a str,
    rel_id: String,
    file_name: String,
    resource: &'a Resource,
}

/// DOCX renderer.
pub struct DocxRenderer {
    options: RenderOptions,
    drawing_count: u32,
}

impl DocxRenderer {
    /// Create a new DOCX renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            drawing_count: 0,
        }
    }

    /// Render a document to DOCX package bytes.
    pub fn render(mut self, doc: &Document) -> Result<Vec<u8>> {
        let media = media_parts(doc);

        let document_xml = self.render_document(doc, &media)?;
        let styles_xml = self.render_styles(doc);
        let content_types = self.render_content_types(&media);
        let root_rels = self.render_root_rels();
        let document_rels = self.render_document_rels(&media);
        let core_props = self.render_core_props(&doc.metadata);
        let app_props = self.render_app_props(&doc.metadata);

        let mut package = PackageWriter::new();
        package.add_part(
            "[Content_Types].xml",
            content_types.into_bytes(),
            CompressionMethod::Deflated,
        );
        package.add_part(
            "_rels/.rels",
            root_rels.into_bytes(),
            CompressionMethod::Deflated,
        );
        package.add_part(
            "docProps/app.xml",
            app_props.into_bytes(),
            CompressionMethod::Deflated,
        );
        package.add_part(
            "docProps/core.xml",
            core_props.into_bytes(),
            CompressionMethod::Deflated,
        );
        package.add_part(
            "word/_rels/document.xml.rels",
            document_rels.into_bytes(),
            CompressionMethod::Deflated,
        );
        package.add_part(
            "word/document.xml",
            document_xml.into_bytes(),
            CompressionMethod::Deflated,
        );
        package.add_part(
            "word/styles.xml",
            styles_xml.into_bytes(),
            CompressionMethod::Deflated,
        );
        for part in &media {
            // Raster formats are already compressed; storing avoids
            // double-compression
            package.add_part(
                format!("word/media/{}", part.file_name),
                part.resource.data.clone(),
                CompressionMethod::Stored,
            );
        }

        log::debug!(
            "packaging {} parts for {} blocks",
            package.part_count(),
            doc.block_count()
        );
        package.finish()
    }

    fn render_document(&mut self, doc: &Document, media: &[MediaPart]) -> Result<String> {
        let mut xml = String::new();
        xml.push_str(XML_DECLARATION);
        xml.push_str(&format!(
            "<w:document xmlns:w=\"{}\" xmlns:r=\"{}\" xmlns:wp=\"{}\">",
            NS_W, NS_R, NS_WP
        ));
        xml.push_str("<w:body>");
        for block in &doc.body {
            self.render_block(&mut xml, block, media)?;
        }
        self.render_section_properties(&mut xml);
        xml.push_str("</w:body></w:document>");
        Ok(xml)
    }

    fn render_block(&mut self, xml: &mut String, block: &Block, media: &[MediaPart]) -> Result<()> {
        match block {
            Block::Paragraph(p) => self.render_paragraph(xml, p, None),
            Block::Table(t) => self.render_table(xml, t),
            Block::Image {
                resource_id,
                width,
                height,
            } => self.render_image(xml, resource_id, *width, *height, media)?,
        }
        Ok(())
    }

    fn render_paragraph(&self, xml: &mut String, para: &Paragraph, alignment: Option<Alignment>) {
        let alignment = alignment.unwrap_or(para.style.alignment);
        let style_id = para.style.heading_level.map(heading_style_id);

        xml.push_str("<w:p>");
        if style_id.is_some() || alignment != Alignment::Left {
            xml.push_str("<w:pPr>");
            if let Some(ref id) = style_id {
                xml.push_str(&format!("<w:pStyle w:val=\"{}\"/>", id));
            }
            if alignment != Alignment::Left {
                xml.push_str(&format!("<w:jc w:val=\"{}\"/>", alignment_value(alignment)));
            }
            xml.push_str("</w:pPr>");
        }
        for item in &para.content {
            match item {
                InlineContent::Text(run) => self.render_text_run(xml, run),
                InlineContent::LineBreak => xml.push_str("<w:r><w:br/></w:r>"),
            }
        }
        xml.push_str("</w:p>");
    }

    fn render_text_run(&self, xml: &mut String, run: &TextRun) {
        xml.push_str("<w:r>");
        if run.style.has_styling() {
            xml.push_str("<w:rPr>");
            if run.style.bold {
                xml.push_str("<w:b/>");
            }
            if run.style.italic {
                xml.push_str("<w:i/>");
            }
            if run.style.underline {
                xml.push_str("<w:u w:val=\"single\"/>");
            }
            xml.push_str("</w:rPr>");
        }
        // Newlines in cell or paragraph text become explicit line breaks
        let normalized = run.text.replace("\r\n", "\n").replace('\r', "\n");
        for (i, segment) in normalized.split('\n').enumerate() {
            if i > 0 {
                xml.push_str("<w:br/>");
            }
            if !segment.is_empty() {
                self.render_text(xml, segment);
            }
        }
        xml.push_str("</w:r>");
    }

    fn render_text(&self, xml: &mut String, text: &str) {
        if text.trim() != text {
            // Word drops unprotected leading/trailing whitespace
            xml.push_str("<w:t xml:space=\"preserve\">");
        } else {
            xml.push_str("<w:t>");
        }
        xml.push_str(&escape_xml(text));
        xml.push_str("</w:t>");
    }

    fn render_table(&self, xml: &mut String, table: &Table) {
        if table.is_empty() {
            return;
        }
        let widths = column_widths(self.options.text_width_twips(), table.column_count());

        xml.push_str("<w:tbl>");
        xml.push_str(
            "<w:tblPr><w:tblStyle w:val=\"TableGrid\"/>\
             <w:tblW w:w=\"0\" w:type=\"auto\"/></w:tblPr>",
        );
        xml.push_str("<w:tblGrid>");
        for width in &widths {
            xml.push_str(&format!("<w:gridCol w:w=\"{}\"/>", width));
        }
        xml.push_str("</w:tblGrid>");

        for row in &table.rows {
            xml.push_str("<w:tr>");
            if row.is_header {
                xml.push_str("<w:trPr><w:tblHeader/></w:trPr>");
            }
            for (i, cell) in row.cells.iter().enumerate() {
                let width = widths.get(i).copied().unwrap_or(0);
                xml.push_str(&format!(
                    "<w:tc><w:tcPr><w:tcW w:w=\"{}\" w:type=\"dxa\"/></w:tcPr>",
                    width
                ));
                if cell.content.is_empty() {
                    // A cell must hold at least one paragraph
                    xml.push_str("<w:p/>");
                } else {
                    let alignment = (cell.alignment != Alignment::Left).then_some(cell.alignment);
                    for para in &cell.content {
                        self.render_paragraph(xml, para, alignment);
                    }
                }
                xml.push_str("</w:tc>");
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");
    }

    fn render_image(
        &mut self,
        xml: &mut String,
        resource_id: &str,
        width: Option<f32>,
        height: Option<f32>,
        media: &[MediaPart],
    ) -> Result<()> {
        let part = media
            .iter()
            .find(|m| m.resource_id == resource_id)
            .ok_or_else(|| Error::ResourceNotFound(resource_id.to_string()))?;

        let info = part.resource.info;
        let width_emu = match width {
            Some(pt) => (pt as f64 * EMU_PER_POINT).round() as i64,
            None => info.width as i64 * EMU_PER_PIXEL,
        };
        let height_emu = match height {
            Some(pt) => (pt as f64 * EMU_PER_POINT).round() as i64,
            None => (width_emu as f64 * info.aspect()).round() as i64,
        };

        self.drawing_count += 1;
        let id = self.drawing_count;
        let name = format!("Picture {}", id);

        xml.push_str("<w:p><w:r><w:drawing>");
        xml.push_str(&format!(
            "<wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">\
             <wp:extent cx=\"{cx}\" cy=\"{cy}\"/>\
             <wp:docPr id=\"{id}\" name=\"{name}\"/>",
            cx = width_emu,
            cy = height_emu,
            id = id,
            name = name
        ));
        xml.push_str(&format!(
            "<a:graphic xmlns:a=\"{}\"><a:graphicData uri=\"{}\">",
            NS_A, NS_PIC
        ));
        xml.push_str(&format!("<pic:pic xmlns:pic=\"{}\">", NS_PIC));
        xml.push_str(&format!(
            "<pic:nvPicPr><pic:cNvPr id=\"{id}\" name=\"{name}\"/><pic:cNvPicPr/></pic:nvPicPr>",
            id = id,
            name = name
        ));
        xml.push_str(&format!(
            "<pic:blipFill><a:blip r:embed=\"{}\"/>\
             <a:stretch><a:fillRect/></a:stretch></pic:blipFill>",
            part.rel_id
        ));
        xml.push_str(&format!(
            "<pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
             <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>",
            cx = width_emu,
            cy = height_emu
        ));
        xml.push_str("</pic:pic></a:graphicData></a:graphic></wp:inline>");
        xml.push_str("</w:drawing></w:r></w:p>");
        Ok(())
    }

    fn render_section_properties(&self, xml: &mut String) {
        let (width, height) = self.options.page_size.dimensions_twips();
        xml.push_str(&format!(
            "<w:sectPr><w:pgSz w:w=\"{}\" w:h=\"{}\"/>\
             <w:pgMar w:top=\"{m}\" w:right=\"{m}\" w:bottom=\"{m}\" w:left=\"{m}\" \
             w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/></w:sectPr>",
            width,
            height,
            m = self.options.margin_twips
        ));
    }

    /// Emit style definitions for the styles the body actually uses.
    fn render_styles(&self, doc: &Document) -> String {
        let mut title = false;
        let mut headings = [false; 6];
        let mut table = false;

        let mut mark = |p: &Paragraph| match p.style.heading_level {
            Some(0) => title = true,
            Some(level) => headings[(level.min(6) - 1) as usize] = true,
            None => {}
        };
        for block in &doc.body {
            match block {
                Block::Paragraph(p) => mark(p),
                Block::Table(t) => {
                    if !t.is_empty() {
                        table = true;
                    }
                    for row in &t.rows {
                        for cell in &row.cells {
                            for p in &cell.content {
                                mark(p);
                            }
                        }
                    }
                }
                Block::Image { .. } => {}
            }
        }

        let mut xml = String::new();
        xml.push_str(XML_DECLARATION);
        xml.push_str(&format!("<w:styles xmlns:w=\"{}\">", NS_W));
        xml.push_str(
            "<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\">\
             <w:name w:val=\"Normal\"/><w:qFormat/></w:style>",
        );
        if title {
            xml.push_str(
                "<w:style w:type=\"paragraph\" w:styleId=\"Title\">\
                 <w:name w:val=\"Title\"/><w:basedOn w:val=\"Normal\"/><w:qFormat/>\
                 <w:pPr><w:spacing w:after=\"300\"/><w:contextualSpacing/></w:pPr>\
                 <w:rPr><w:sz w:val=\"56\"/><w:szCs w:val=\"56\"/></w:rPr></w:style>",
            );
        }
        for (i, used) in headings.iter().enumerate() {
            if !used {
                continue;
            }
            let level = i + 1;
            let size = heading_size_half_points(level);
            xml.push_str(&format!(
                "<w:style w:type=\"paragraph\" w:styleId=\"Heading{level}\">\
                 <w:name w:val=\"heading {level}\"/><w:basedOn w:val=\"Normal\"/><w:qFormat/>\
                 <w:pPr><w:keepNext/><w:spacing w:before=\"240\" w:after=\"120\"/>\
                 <w:outlineLvl w:val=\"{outline}\"/></w:pPr>\
                 <w:rPr><w:b/><w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/></w:rPr>\
                 </w:style>",
                level = level,
                outline = level - 1,
                size = size
            ));
        }
        if table {
            xml.push_str(
                "<w:style w:type=\"table\" w:styleId=\"TableGrid\">\
                 <w:name w:val=\"Table Grid\"/>\
                 <w:tblPr><w:tblBorders>\
                 <w:top w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
                 <w:left w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
                 <w:bottom w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
                 <w:right w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
                 <w:insideH w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
                 <w:insideV w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
                 </w:tblBorders></w:tblPr></w:style>",
            );
        }
        xml.push_str("</w:styles>");
        xml
    }

    fn render_content_types(&self, media: &[MediaPart]) -> String {
        let mut extensions: BTreeSet<(&str, &str)> = BTreeSet::new();
        for part in media {
            extensions.insert((part.resource.extension(), part.resource.content_type()));
        }

        let mut xml = String::new();
        xml.push_str(XML_DECLARATION);
        xml.push_str(
            "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
        );
        xml.push_str(
            "<Default Extension=\"rels\" \
             ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
        );
        xml.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>");
        for (extension, content_type) in extensions {
            xml.push_str(&format!(
                "<Default Extension=\"{}\" ContentType=\"{}\"/>",
                extension, content_type
            ));
        }
        xml.push_str(
            "<Override PartName=\"/word/document.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.\
             wordprocessingml.document.main+xml\"/>",
        );
        xml.push_str(
            "<Override PartName=\"/word/styles.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.\
             wordprocessingml.styles+xml\"/>",
        );
        xml.push_str(
            "<Override PartName=\"/docProps/core.xml\" \
             ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>",
        );
        xml.push_str(
            "<Override PartName=\"/docProps/app.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.\
             extended-properties+xml\"/>",
        );
        xml.push_str("</Types>");
        xml
    }

    fn render_root_rels(&self) -> String {
        let mut xml = String::new();
        xml.push_str(XML_DECLARATION);
        xml.push_str(
            "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
        );
        xml.push_str(
            "<Relationship Id=\"rId1\" \
             Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" \
             Target=\"word/document.xml\"/>",
        );
        xml.push_str(
            "<Relationship Id=\"rId2\" \
             Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" \
             Target=\"docProps/core.xml\"/>",
        );
        xml.push_str(
            "<Relationship Id=\"rId3\" \
             Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties\" \
             Target=\"docProps/app.xml\"/>",
        );
        xml.push_str("</Relationships>");
        xml
    }

    fn render_document_rels(&self, media: &[MediaPart]) -> String {
        let mut xml = String::new();
        xml.push_str(XML_DECLARATION);
        xml.push_str(
            "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
        );
        xml.push_str(
            "<Relationship Id=\"rId1\" \
             Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" \
             Target=\"styles.xml\"/>",
        );
        for part in media {
            xml.push_str(&format!(
                "<Relationship Id=\"{}\" \
                 Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/image\" \
                 Target=\"media/{}\"/>",
                part.rel_id, part.file_name
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }

    fn render_core_props(&self, metadata: &Metadata) -> String {
        let mut xml = String::new();
        xml.push_str(XML_DECLARATION);
        xml.push_str(
            "<cp:coreProperties \
             xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
             xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
             xmlns:dcterms=\"http://purl.org/dc/terms/\" \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
        );
        if let Some(ref title) = metadata.title {
            xml.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(title)));
        }
        if let Some(ref subject) = metadata.subject {
            xml.push_str(&format!("<dc:subject>{}</dc:subject>", escape_xml(subject)));
        }
        if let Some(ref author) = metadata.author {
            xml.push_str(&format!("<dc:creator>{}</dc:creator>", escape_xml(author)));
        }
        if let Some(ref keywords) = metadata.keywords {
            xml.push_str(&format!(
                "<cp:keywords>{}</cp:keywords>",
                escape_xml(keywords)
            ));
        }
        if let Some(ref description) = metadata.description {
            xml.push_str(&format!(
                "<dc:description>{}</dc:description>",
                escape_xml(description)
            ));
        }
        if let Some(created) = metadata.created {
            xml.push_str(&format!(
                "<dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>",
                created.format("%Y-%m-%dT%H:%M:%SZ")
            ));
        }
        if let Some(modified) = metadata.modified {
            xml.push_str(&format!(
                "<dcterms:modified xsi:type=\"dcterms:W3CDTF\">{}</dcterms:modified>",
                modified.format("%Y-%m-%dT%H:%M:%SZ")
            ));
        }
        xml.push_str("</cp:coreProperties>");
        xml
    }

    fn render_app_props(&self, metadata: &Metadata) -> String {
        let application = metadata.application.as_deref().unwrap_or("statdoc");
        format!(
            "{}<Properties \
             xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\">\
             <Application>{}</Application></Properties>",
            XML_DECLARATION,
            escape_xml(application)
        )
    }
}

/// Map embedded resources to relationship ids and media file names, in
/// resource order. Image relationships start at rId2; rId1 is styles.
fn media_parts(doc: &Document) -> Vec<MediaPart<'_>> {
    doc.resources
        .iter()
        .enumerate()
        .map(|(i, (id, resource))| MediaPart {
            resource_id: id.as_str(),
            rel_id: format!("rId{}", i + 2),
            file_name: format!("image{}.{}", i + 1, resource.extension()),
            resource,
        })
        .collect()
}

/// Style id for a heading level: 0 is the title, 1-6 the heading ladder.
fn heading_style_id(level: u8) -> String {
    if level == 0 {
        "Title".to_string()
    } else {
        format!("Heading{}", level.min(6))
    }
}

fn heading_size_half_points(level: usize) -> u32 {
    match level {
        1 => 32,
        2 => 28,
        3 => 26,
        _ => 24,
    }
}

fn alignment_value(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "both",
    }
}

/// Evenly split the text column across `count` columns, keeping the sum
/// exact by giving the remainder to the leading columns.
fn column_widths(total: u32, count: usize) -> Vec<u32> {
    if count == 0 {
        return Vec::new();
    }
    let base = total / count as u32;
    let remainder = (total % count as u32) as usize;
    (0..count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Escape XML special characters for text nodes and attribute values.
fn escape_xml(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}
