/// Table types and implementation for DOCX documents.
use crate::ooxml::docx::enums::WdStyleType;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::rel::Relationships;
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;
use std::ops::Deref;

pub use super::super::format::TableAlignment;
use super::paragraph::ParagraphMut;
use super::story::{Block, Story, StoryContext, StoryMut};
use super::style::StyleRegistry;

/// Usable width of a letter page with one-inch margins, in twips.
const DEFAULT_TABLE_WIDTH: u32 = 9360;

/// Horizontal merge state of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HorizontalMerge {
    #[default]
    Normal,
    /// First cell of a merged range, spanning `span` grid columns
    Origin { span: usize },
    /// Absorbed by the origin to its left; never written
    Continuation,
}

/// Vertical merge state of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalMerge {
    #[default]
    Normal,
    /// Top cell of a merged range
    Restart,
    /// Written as an empty cell that continues the range above
    Continue,
}

/// A mutable table.
#[derive(Debug, Clone)]
pub struct MutableTable {
    pub(crate) rows: Vec<MutableRow>,
    cols: usize,
    /// Table style name
    pub(crate) style: Option<String>,
    /// Grid column widths in twips
    column_widths: Option<Vec<u32>>,
    alignment: Option<TableAlignment>,
    /// Preferred table width in twips; automatic when unset
    width: Option<u32>,
}

impl MutableTable {
    pub(crate) fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: (0..rows).map(|_| MutableRow::new(cols)).collect(),
            cols,
            style: None,
            column_widths: None,
            alignment: None,
            width: None,
        }
    }

    /// Get the number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of grid columns.
    #[inline]
    pub fn col_count(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn rows(&self) -> &[MutableRow] {
        &self.rows
    }

    /// Get a cell by row and column index, merged-away cells included.
    pub fn cell_ref(&self, row: usize, col: usize) -> Option<&MutableCell> {
        self.rows.get(row)?.cells.get(col)
    }

    /// Width of every grid column in twips.
    pub fn grid(&self) -> Vec<u32> {
        match self.column_widths {
            Some(ref widths) => widths.clone(),
            None => {
                let total = self.width.unwrap_or(DEFAULT_TABLE_WIDTH);
                let each = total / u32::try_from(self.cols.max(1)).unwrap_or(u32::MAX);
                vec![each; self.cols]
            },
        }
    }

    fn merge_error(message: String) -> OoxmlError {
        OoxmlError::InvalidMerge(message)
    }

    /// Merged-away content is discarded along with the relationships it
    /// holds in `rels`.
    fn merge_horizontal(
        &mut self,
        row: usize,
        col_start: usize,
        col_end: usize,
        rels: &mut Relationships,
    ) -> Result<()> {
        if col_start >= col_end {
            return Err(Self::merge_error(format!(
                "column range {col_start}..={col_end} is empty"
            )));
        }
        if row >= self.rows.len() || col_end >= self.cols {
            return Err(Self::merge_error(format!(
                "cells ({row}, {col_start})..=({row}, {col_end}) outside a {}x{} table",
                self.rows.len(),
                self.cols
            )));
        }
        let cells = &mut self.rows[row].cells[col_start..=col_end];
        if let Some(offset) = cells.iter().position(MutableCell::is_merged) {
            return Err(Self::merge_error(format!(
                "cell ({row}, {}) is already merged",
                col_start + offset
            )));
        }

        cells[0].h_merge = HorizontalMerge::Origin {
            span: col_end - col_start + 1,
        };
        for cell in &mut cells[1..] {
            cell.h_merge = HorizontalMerge::Continuation;
            cell.story.discard(rels);
        }
        Ok(())
    }

    fn merge_vertical(
        &mut self,
        col: usize,
        row_start: usize,
        row_end: usize,
        rels: &mut Relationships,
    ) -> Result<()> {
        if row_start >= row_end {
            return Err(Self::merge_error(format!(
                "row range {row_start}..={row_end} is empty"
            )));
        }
        if col >= self.cols || row_end >= self.rows.len() {
            return Err(Self::merge_error(format!(
                "cells ({row_start}, {col})..=({row_end}, {col}) outside a {}x{} table",
                self.rows.len(),
                self.cols
            )));
        }
        if let Some(row) =
            (row_start..=row_end).find(|&row| self.rows[row].cells[col].is_merged())
        {
            return Err(Self::merge_error(format!(
                "cell ({row}, {col}) is already merged"
            )));
        }

        self.rows[row_start].cells[col].v_merge = VerticalMerge::Restart;
        for row in &mut self.rows[row_start + 1..=row_end] {
            let cell = &mut row.cells[col];
            cell.v_merge = VerticalMerge::Continue;
            cell.story.discard(rels);
        }
        Ok(())
    }

    pub(crate) fn validate(
        &self,
        styles: &StyleRegistry,
        rels: &Relationships,
        location: &str,
    ) -> Result<()> {
        if let Some(ref name) = self.style
            && !styles.contains(name, WdStyleType::Table)
        {
            return Err(OoxmlError::UnknownStyle {
                name: name.clone(),
                kind: Some(WdStyleType::Table),
                location: Some(location.to_string()),
            });
        }
        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.cells.iter().enumerate() {
                cell.story
                    .validate(styles, rels, &format!("{location}, cell ({r}, {c})"))?;
            }
        }
        Ok(())
    }

    pub(crate) fn style_references(&self, name: &str, kind: WdStyleType) -> usize {
        let own = usize::from(kind == WdStyleType::Table && self.style.as_deref() == Some(name));
        let nested: usize = self
            .rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .map(|cell| cell.story.style_references(name, kind))
            .sum();
        own + nested
    }

    pub(crate) fn write_xml(&self, xml: &mut String, styles: &StyleRegistry) -> Result<()> {
        xml.push_str("<w:tbl>");

        xml.push_str("<w:tblPr>");
        if let Some(ref name) = self.style {
            let style = styles.resolve_kind(name, WdStyleType::Table)?;
            write!(xml, r#"<w:tblStyle w:val="{}"/>"#, escape(style.style_id()))?;
        }
        match self.width {
            Some(width) => write!(xml, r#"<w:tblW w:w="{}" w:type="dxa"/>"#, width)?,
            None => xml.push_str(r#"<w:tblW w:w="0" w:type="auto"/>"#),
        }
        if let Some(alignment) = self.alignment {
            write!(xml, r#"<w:jc w:val="{}"/>"#, alignment.as_str())?;
        }
        xml.push_str("</w:tblPr>");

        let grid = self.grid();
        xml.push_str("<w:tblGrid>");
        for width in &grid {
            write!(xml, r#"<w:gridCol w:w="{}"/>"#, width)?;
        }
        xml.push_str("</w:tblGrid>");

        for row in &self.rows {
            row.write_xml(xml, styles, &grid)?;
        }

        xml.push_str("</w:tbl>");
        Ok(())
    }
}

/// A mutable table row.
#[derive(Debug, Clone)]
pub struct MutableRow {
    pub(crate) cells: Vec<MutableCell>,
}

impl MutableRow {
    pub(crate) fn new(cols: usize) -> Self {
        Self {
            cells: (0..cols).map(|_| MutableCell::default()).collect(),
        }
    }

    pub fn cells(&self) -> &[MutableCell] {
        &self.cells
    }

    /// Get the number of cells, merged-away cells included.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn write_xml(&self, xml: &mut String, styles: &StyleRegistry, grid: &[u32]) -> Result<()> {
        xml.push_str("<w:tr>");
        for (col, cell) in self.cells.iter().enumerate() {
            let span = match cell.h_merge {
                HorizontalMerge::Continuation => continue,
                HorizontalMerge::Origin { span } => span,
                HorizontalMerge::Normal => 1,
            };
            let width = cell.width.unwrap_or_else(|| {
                grid.iter()
                    .skip(col)
                    .take(span)
                    .fold(0u32, |sum, w| sum.saturating_add(*w))
            });
            cell.write_xml(xml, styles, width, span)?;
        }
        xml.push_str("</w:tr>");
        Ok(())
    }
}

/// A mutable table cell.
#[derive(Debug, Clone, Default)]
pub struct MutableCell {
    pub(crate) story: Story,
    pub(crate) h_merge: HorizontalMerge,
    pub(crate) v_merge: VerticalMerge,
    /// Preferred width in twips
    width: Option<u32>,
    /// Background fill as hex RGB
    shading: Option<String>,
}

impl MutableCell {
    #[inline]
    pub fn story(&self) -> &Story {
        &self.story
    }

    #[inline]
    pub fn horizontal_merge(&self) -> HorizontalMerge {
        self.h_merge
    }

    #[inline]
    pub fn vertical_merge(&self) -> VerticalMerge {
        self.v_merge
    }

    /// Whether the cell takes part in a merge of either direction.
    pub fn is_merged(&self) -> bool {
        self.h_merge != HorizontalMerge::Normal || self.v_merge != VerticalMerge::Normal
    }

    /// Text of the cell's paragraphs, one line each.
    pub fn text(&self) -> String {
        self.story
            .paragraphs()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn write_xml(
        &self,
        xml: &mut String,
        styles: &StyleRegistry,
        width: u32,
        span: usize,
    ) -> Result<()> {
        xml.push_str("<w:tc><w:tcPr>");
        write!(xml, r#"<w:tcW w:w="{}" w:type="dxa"/>"#, width)?;
        if span > 1 {
            write!(xml, r#"<w:gridSpan w:val="{}"/>"#, span)?;
        }
        match self.v_merge {
            VerticalMerge::Restart => xml.push_str(r#"<w:vMerge w:val="restart"/>"#),
            VerticalMerge::Continue => xml.push_str("<w:vMerge/>"),
            VerticalMerge::Normal => {},
        }
        if let Some(ref fill) = self.shading {
            write!(
                xml,
                r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#,
                escape(fill.as_str())
            )?;
        }
        xml.push_str("</w:tcPr>");

        self.story.write_xml(xml, styles)?;
        // A cell must end with a paragraph
        if matches!(self.story.blocks.last(), None | Some(Block::Table(_))) {
            xml.push_str("<w:p/>");
        }

        xml.push_str("</w:tc>");
        Ok(())
    }
}

/// Mutable access to a table inside a story.
#[derive(Debug)]
pub struct TableMut<'a> {
    table: &'a mut MutableTable,
    ctx: StoryContext<'a>,
}

impl<'a> TableMut<'a> {
    pub(crate) fn new(table: &'a mut MutableTable, ctx: StoryContext<'a>) -> Self {
        Self { table, ctx }
    }

    /// Get a cell by row and column index.
    ///
    /// Returns `None` out of bounds and for cells absorbed by a merge.
    pub fn cell(&mut self, row: usize, col: usize) -> Option<CellMut<'_>> {
        let cell = self.table.rows.get_mut(row)?.cells.get_mut(col)?;
        if cell.h_merge == HorizontalMerge::Continuation || cell.v_merge == VerticalMerge::Continue
        {
            return None;
        }
        Some(CellMut {
            cell,
            ctx: self.ctx.reborrow(),
        })
    }

    /// Merge cells `col_start..=col_end` of `row` into one.
    ///
    /// The first cell keeps its content; the content of the others is
    /// discarded. Fails with [`OoxmlError::InvalidMerge`] when the range is
    /// empty, out of bounds or touches a cell that is already merged.
    pub fn merge_cells(&mut self, row: usize, col_start: usize, col_end: usize) -> Result<()> {
        self.table
            .merge_horizontal(row, col_start, col_end, self.ctx.rels)
    }

    /// Merge cells `row_start..=row_end` of column `col` into one, under the
    /// same rules as [`merge_cells`](Self::merge_cells).
    pub fn merge_cells_vertical(
        &mut self,
        col: usize,
        row_start: usize,
        row_end: usize,
    ) -> Result<()> {
        self.table
            .merge_vertical(col, row_start, row_end, self.ctx.rels)
    }

    /// Append a row of empty cells.
    pub fn add_row(&mut self) -> usize {
        self.table.rows.push(MutableRow::new(self.table.cols));
        self.table.rows.len() - 1
    }

    /// Set every grid column width, in twips.
    ///
    /// Fails with [`OoxmlError::InvalidFormat`] unless there is one width
    /// per column and the widths add up to at most `u32::MAX` twips.
    pub fn set_column_widths(&mut self, widths: &[u32]) -> Result<()> {
        if widths.len() != self.table.cols {
            return Err(OoxmlError::InvalidFormat(format!(
                "Expected {} column widths, got {}",
                self.table.cols,
                widths.len()
            )));
        }
        if widths
            .iter()
            .try_fold(0u32, |sum, &w| sum.checked_add(w))
            .is_none()
        {
            return Err(OoxmlError::InvalidFormat(
                "Column widths overflow the table width".to_string(),
            ));
        }
        self.table.column_widths = Some(widths.to_vec());
        Ok(())
    }

    pub fn set_alignment(&mut self, alignment: TableAlignment) {
        self.table.alignment = Some(alignment);
    }

    /// Set the preferred table width, in twips.
    pub fn set_width(&mut self, twips: u32) {
        self.table.width = Some(twips);
    }

    /// Change the table style.
    pub fn set_style(&mut self, name: &str) -> Result<()> {
        self.ctx.check_style(Some(name), WdStyleType::Table)?;
        self.table.style = Some(name.to_string());
        Ok(())
    }
}

impl Deref for TableMut<'_> {
    type Target = MutableTable;

    fn deref(&self) -> &MutableTable {
        self.table
    }
}

/// Mutable access to a table cell.
#[derive(Debug)]
pub struct CellMut<'a> {
    cell: &'a mut MutableCell,
    ctx: StoryContext<'a>,
}

impl CellMut<'_> {
    /// The cell's block content.
    pub fn content(&mut self) -> StoryMut<'_> {
        StoryMut::new(&mut self.cell.story, self.ctx.reborrow())
    }

    /// Append a paragraph to the cell.
    pub fn add_paragraph(&mut self, text: &str, style: Option<&str>) -> Result<ParagraphMut<'_>> {
        self.content().into_paragraph(text, style)
    }

    /// Replace the cell content with a single unstyled paragraph.
    ///
    /// Hyperlinks and pictures in the old content lose their relationships.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.cell.story.discard(self.ctx.rels);
        self.add_paragraph(text, None)?;
        Ok(())
    }

    /// Set the background fill as hex RGB, e.g. `"D9E2F3"`.
    pub fn set_shading(&mut self, fill: &str) {
        self.cell.shading = Some(fill.to_string());
    }

    /// Set the preferred cell width, in twips.
    pub fn set_width(&mut self, twips: u32) {
        self.cell.width = Some(twips);
    }
}

impl Deref for CellMut<'_> {
    type Target = MutableCell;

    fn deref(&self) -> &MutableCell {
        self.cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::writer::media::tests::png;
    use crate::ooxml::docx::writer::story::tests::Fixture;

    fn with_table(rows: usize, cols: usize, f: impl FnOnce(&mut TableMut<'_>)) -> Fixture {
        let mut fx = Fixture::new();
        {
            let mut story = fx.story_mut();
            let mut table = story.add_table(rows, cols, None).unwrap();
            f(&mut table);
        }
        fx
    }

    fn table(fx: &Fixture) -> &MutableTable {
        match fx.story.blocks.first() {
            Some(Block::Table(t)) => t,
            _ => panic!("no table"),
        }
    }

    #[test]
    fn test_horizontal_merge_keeps_origin_text() {
        let fx = with_table(2, 3, |t| {
            t.cell(0, 0).unwrap().set_text("origin").unwrap();
            t.cell(0, 1).unwrap().set_text("gone").unwrap();
            t.merge_cells(0, 0, 1).unwrap();
            assert!(t.cell(0, 1).is_none());
            assert!(t.cell(0, 2).is_some());
        });

        let tbl = table(&fx);
        assert_eq!(
            tbl.cell_ref(0, 0).unwrap().horizontal_merge(),
            HorizontalMerge::Origin { span: 2 }
        );
        assert_eq!(tbl.cell_ref(0, 0).unwrap().text(), "origin");
        assert!(tbl.cell_ref(0, 1).unwrap().story().is_empty());

        let xml = fx.render();
        assert_eq!(xml.matches("<w:tc>").count(), 5);
        assert!(xml.contains(
            r#"<w:tc><w:tcPr><w:tcW w:w="6240" w:type="dxa"/><w:gridSpan w:val="2"/></w:tcPr>"#
        ));
        assert!(!xml.contains("gone"));
    }

    #[test]
    fn test_vertical_merge() {
        let fx = with_table(3, 2, |t| {
            t.merge_cells_vertical(1, 0, 2).unwrap();
            assert!(t.cell(1, 1).is_none());
        });
        let xml = fx.render();
        assert_eq!(xml.matches(r#"<w:vMerge w:val="restart"/>"#).count(), 1);
        assert_eq!(xml.matches("<w:vMerge/>").count(), 2);
        // Every cell still ends with a paragraph
        assert_eq!(xml.matches("<w:tc>").count(), xml.matches("<w:p/></w:tc>").count());
    }

    #[test]
    fn test_invalid_merges() {
        with_table(2, 3, |t| {
            assert!(matches!(t.merge_cells(0, 1, 1), Err(OoxmlError::InvalidMerge(_))));
            assert!(matches!(t.merge_cells(0, 2, 1), Err(OoxmlError::InvalidMerge(_))));
            assert!(matches!(t.merge_cells(0, 1, 3), Err(OoxmlError::InvalidMerge(_))));
            assert!(matches!(t.merge_cells(2, 0, 1), Err(OoxmlError::InvalidMerge(_))));
            assert!(matches!(
                t.merge_cells_vertical(3, 0, 1),
                Err(OoxmlError::InvalidMerge(_))
            ));

            t.merge_cells(0, 0, 1).unwrap();
            assert!(t.merge_cells(0, 1, 2).is_err());
            assert!(t.merge_cells_vertical(0, 0, 1).is_err());
            t.merge_cells_vertical(2, 0, 1).unwrap();
        });
    }

    #[test]
    fn test_table_properties() {
        let fx = with_table(1, 2, |t| {
            t.set_style("Table Grid").unwrap();
            assert!(t.set_style("Normal").is_err());
            t.set_column_widths(&[2000, 3000]).unwrap();
            assert!(t.set_column_widths(&[1]).is_err());
            t.set_alignment(TableAlignment::Center);
            t.set_width(5000);
            let mut cell = t.cell(0, 1).unwrap();
            cell.set_shading("D9E2F3");
            cell.set_width(3100);
        });
        assert_eq!(
            fx.render(),
            concat!(
                r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/>"#,
                r#"<w:tblW w:w="5000" w:type="dxa"/><w:jc w:val="center"/></w:tblPr>"#,
                r#"<w:tblGrid><w:gridCol w:w="2000"/><w:gridCol w:w="3000"/></w:tblGrid>"#,
                r#"<w:tr><w:tc><w:tcPr><w:tcW w:w="2000" w:type="dxa"/></w:tcPr><w:p/></w:tc>"#,
                r#"<w:tc><w:tcPr><w:tcW w:w="3100" w:type="dxa"/>"#,
                r#"<w:shd w:val="clear" w:color="auto" w:fill="D9E2F3"/></w:tcPr><w:p/></w:tc></w:tr></w:tbl>"#
            )
        );
    }

    #[test]
    fn test_column_widths_must_fit_u32() {
        let fx = with_table(1, 2, |t| {
            assert!(matches!(
                t.set_column_widths(&[u32::MAX, 10]),
                Err(OoxmlError::InvalidFormat(_))
            ));
            t.set_column_widths(&[u32::MAX - 10, 10]).unwrap();
            t.merge_cells(0, 0, 1).unwrap();
        });
        assert!(fx.render().contains(&format!(
            r#"<w:tcW w:w="{}" w:type="dxa"/><w:gridSpan w:val="2"/>"#,
            u32::MAX
        )));
    }

    #[test]
    fn test_discarded_content_releases_relationships() {
        let mut fx = Fixture::new();
        {
            let mut story = fx.story_mut();
            let mut t = story.add_table(2, 2, None).unwrap();
            t.cell(0, 1)
                .unwrap()
                .add_paragraph("", None)
                .unwrap()
                .add_picture(png(4, 4), None, None)
                .unwrap();
            t.cell(1, 0)
                .unwrap()
                .add_paragraph("", None)
                .unwrap()
                .insert_hyperlink("dropped", "https://example.org", None)
                .unwrap();
            t.cell(1, 1)
                .unwrap()
                .add_paragraph("", None)
                .unwrap()
                .insert_hyperlink("kept", "https://example.com", None)
                .unwrap();

            t.merge_cells(0, 0, 1).unwrap();
            t.cell(1, 0).unwrap().set_text("plain").unwrap();
        }

        assert_eq!(fx.rels.len(), 1);
        assert_eq!(
            fx.rels.get("rId3").unwrap().target_ref(),
            "https://example.com"
        );
        let mut pictures = Vec::new();
        fx.story.collect_pictures(&mut pictures);
        assert!(pictures.is_empty());
    }

    #[test]
    fn test_vertical_merge_releases_relationships() {
        let mut fx = Fixture::new();
        {
            let mut story = fx.story_mut();
            let mut t = story.add_table(2, 1, None).unwrap();
            t.cell(1, 0)
                .unwrap()
                .add_paragraph("", None)
                .unwrap()
                .insert_hyperlink("below", "https://example.org", None)
                .unwrap();
            t.merge_cells_vertical(0, 0, 1).unwrap();
        }
        assert!(fx.rels.is_empty());
    }

    #[test]
    fn test_nested_table_gets_trailing_paragraph() {
        let fx = with_table(1, 1, |t| {
            let mut cell = t.cell(0, 0).unwrap();
            cell.content().add_table(1, 1, None).unwrap();
        });
        assert!(fx.render().ends_with("</w:tbl><w:p/></w:tc></w:tr></w:tbl>"));
    }

    #[test]
    fn test_add_row_and_cell_paragraphs() {
        let fx = with_table(1, 2, |t| {
            assert_eq!(t.add_row(), 1);
            let mut cell = t.cell(1, 0).unwrap();
            cell.add_paragraph("first", None).unwrap();
            cell.add_paragraph("second", Some("List Paragraph")).unwrap();
            assert!(cell.add_paragraph("x", Some("Nope")).is_err());
            assert_eq!(cell.text(), "first\nsecond");
        });
        assert_eq!(table(&fx).row_count(), 2);
        assert_eq!(
            fx.story
                .style_references("List Paragraph", WdStyleType::Paragraph),
            1
        );
    }

    mod property_tests {
        use super::*;
        use crate::ooxml::opc::packuri::PackURI;
        use proptest::prelude::*;

        fn merge_case() -> impl Strategy<Value = (usize, usize, usize, usize, usize)> {
            (1usize..5, 2usize..8)
                .prop_flat_map(|(rows, cols)| (Just(rows), Just(cols), 0..rows, 0..cols - 1))
                .prop_flat_map(|(rows, cols, row, c0)| {
                    (Just(rows), Just(cols), Just(row), Just(c0), c0 + 1..cols)
                })
        }

        proptest! {
            #[test]
            fn merge_yields_one_origin_and_continuations((rows, cols, row, c0, c1) in merge_case()) {
                let mut table = MutableTable::new(rows, cols);
                let mut rels = Relationships::new(PackURI::trusted("/word/document.xml"));
                table.merge_horizontal(row, c0, c1, &mut rels).unwrap();

                let cells = &table.rows[row].cells;
                let origins: Vec<_> = cells
                    .iter()
                    .filter_map(|c| match c.h_merge {
                        HorizontalMerge::Origin { span } => Some(span),
                        _ => None,
                    })
                    .collect();
                prop_assert_eq!(origins, vec![c1 - c0 + 1]);
                let continuations = cells
                    .iter()
                    .filter(|c| c.h_merge == HorizontalMerge::Continuation)
                    .count();
                prop_assert_eq!(continuations, c1 - c0);
            }

            #[test]
            fn overlapping_merge_fails(
                (rows, cols, row, c0, c1) in merge_case(),
                a in 0usize..8,
                b in 0usize..8,
            ) {
                let mut table = MutableTable::new(rows, cols);
                let mut rels = Relationships::new(PackURI::trusted("/word/document.xml"));
                table.merge_horizontal(row, c0, c1, &mut rels).unwrap();

                let (lo, hi) = (a % cols, b % cols);
                prop_assume!(lo < hi && lo <= c1 && hi >= c0);
                let err = table.merge_horizontal(row, lo, hi, &mut rels).unwrap_err();
                prop_assert!(matches!(err, OoxmlError::InvalidMerge(_)));
            }
        }
    }
}
