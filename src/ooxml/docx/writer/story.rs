//! Block containers: section bodies, headers, footers and table cells.
//!
//! A [`Story`] owns an ordered list of blocks. It is edited through
//! [`StoryMut`], a handle that also borrows the document's style registry,
//! the relationships of the part the story is written to and the media
//! store, so every insertion is validated and registered as it happens.

use crate::ooxml::docx::enums::WdStyleType;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::rel::{RelationshipId, Relationships};

use super::image::InlineImage;
use super::media::MediaStore;
use super::paragraph::{MutableParagraph, ParagraphMut};
use super::run::{BreakType, RunProperties};
use super::style::StyleRegistry;
use super::table::{MutableTable, TableMut};

/// A block-level element.
#[derive(Debug, Clone)]
pub enum Block {
    Paragraph(MutableParagraph),
    Table(MutableTable),
}

/// An ordered sequence of blocks.
#[derive(Debug, Clone, Default)]
pub struct Story {
    pub(crate) blocks: Vec<Block>,
}

impl Story {
    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate the paragraphs directly in this story (not inside tables).
    pub fn paragraphs(&self) -> impl Iterator<Item = &MutableParagraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    /// Drop every block, removing the relationships they hold from `rels`.
    pub(crate) fn discard(&mut self, rels: &mut Relationships) {
        let mut r_ids = Vec::new();
        self.collect_relationship_ids(&mut r_ids);
        for r_id in r_ids {
            rels.remove(r_id.as_str());
        }
        self.blocks.clear();
    }

    fn collect_relationship_ids<'s>(&'s self, out: &mut Vec<&'s RelationshipId>) {
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => out.extend(p.relationship_ids()),
                Block::Table(t) => {
                    for cell in t.rows.iter().flat_map(|row| row.cells.iter()) {
                        cell.story.collect_relationship_ids(out);
                    }
                },
            }
        }
    }

    /// Every picture in the story, nested content included.
    pub(crate) fn collect_pictures<'s>(&'s self, out: &mut Vec<&'s InlineImage>) {
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => out.extend(p.pictures()),
                Block::Table(t) => {
                    for cell in t.rows.iter().flat_map(|row| row.cells.iter()) {
                        cell.story.collect_pictures(out);
                    }
                },
            }
        }
    }

    /// Check that every style and relationship the story references exists.
    ///
    /// `location` prefixes the element path reported in errors.
    pub(crate) fn validate(
        &self,
        styles: &StyleRegistry,
        rels: &Relationships,
        location: &str,
    ) -> Result<()> {
        for (idx, block) in self.blocks.iter().enumerate() {
            let at = format!("{location}, block {idx}");
            match block {
                Block::Paragraph(p) => p.validate(styles, rels, &at)?,
                Block::Table(t) => t.validate(styles, rels, &at)?,
            }
        }
        Ok(())
    }

    /// Count references to the style `name` of `kind`, nested content
    /// included.
    pub(crate) fn style_references(&self, name: &str, kind: WdStyleType) -> usize {
        self.blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(p) => p.style_references(name, kind),
                Block::Table(t) => t.style_references(name, kind),
            })
            .sum()
    }

    pub(crate) fn write_xml(&self, xml: &mut String, styles: &StyleRegistry) -> Result<()> {
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => p.write_xml(xml, styles)?,
                Block::Table(t) => t.write_xml(xml, styles)?,
            }
        }
        Ok(())
    }
}

/// What a story handle borrows besides the story itself.
#[derive(Debug)]
pub(crate) struct StoryContext<'a> {
    pub(crate) styles: &'a StyleRegistry,
    /// Relationships of the part the story is written to
    pub(crate) rels: &'a mut Relationships,
    pub(crate) media: &'a mut MediaStore,
}

impl StoryContext<'_> {
    pub(crate) fn reborrow(&mut self) -> StoryContext<'_> {
        StoryContext {
            styles: self.styles,
            rels: &mut *self.rels,
            media: &mut *self.media,
        }
    }

    /// Fail with [`OoxmlError::UnknownStyle`] unless `name` is registered
    /// for `kind`.
    pub(crate) fn check_style(&self, name: Option<&str>, kind: WdStyleType) -> Result<()> {
        if let Some(name) = name {
            self.styles.resolve_kind(name, kind)?;
        }
        Ok(())
    }
}

/// Mutable access to a story.
#[derive(Debug)]
pub struct StoryMut<'a> {
    story: &'a mut Story,
    ctx: StoryContext<'a>,
}

impl<'a> StoryMut<'a> {
    pub(crate) fn new(story: &'a mut Story, ctx: StoryContext<'a>) -> Self {
        Self { story, ctx }
    }

    /// Append a paragraph holding `text` in one run.
    ///
    /// An unknown paragraph style fails with [`OoxmlError::UnknownStyle`]
    /// and leaves the story untouched.
    pub fn add_paragraph(&mut self, text: &str, style: Option<&str>) -> Result<ParagraphMut<'_>> {
        StoryMut::new(&mut *self.story, self.ctx.reborrow()).into_paragraph(text, style)
    }

    /// Like [`add_paragraph`](Self::add_paragraph), but consumes the handle
    /// so the paragraph handle can outlive it.
    pub fn into_paragraph(self, text: &str, style: Option<&str>) -> Result<ParagraphMut<'a>> {
        self.ctx.check_style(style, WdStyleType::Paragraph)?;

        let mut paragraph = MutableParagraph::new();
        paragraph.style = style.map(str::to_string);
        if !text.is_empty() {
            paragraph.push_text(text, RunProperties::default());
        }
        Ok(self.into_pushed(paragraph))
    }

    /// Append a `rows` x `cols` table of empty cells.
    pub fn add_table(
        &mut self,
        rows: usize,
        cols: usize,
        style: Option<&str>,
    ) -> Result<TableMut<'_>> {
        if rows == 0 || cols == 0 {
            return Err(OoxmlError::InvalidFormat(format!(
                "Table needs at least one row and one column, got {rows}x{cols}"
            )));
        }
        self.ctx.check_style(style, WdStyleType::Table)?;

        let mut table = MutableTable::new(rows, cols);
        table.style = style.map(str::to_string);
        self.story.blocks.push(Block::Table(table));
        match self.story.blocks.last_mut() {
            Some(Block::Table(table)) => Ok(TableMut::new(table, self.ctx.reborrow())),
            _ => unreachable!(),
        }
    }

    /// Append a paragraph holding only a page break.
    pub fn add_page_break(&mut self) -> ParagraphMut<'_> {
        let mut paragraph = MutableParagraph::new();
        paragraph.push_break(BreakType::Page);
        self.push_paragraph(paragraph)
    }

    fn push_paragraph(&mut self, paragraph: MutableParagraph) -> ParagraphMut<'_> {
        StoryMut::new(&mut *self.story, self.ctx.reborrow()).into_pushed(paragraph)
    }

    fn into_pushed(self, paragraph: MutableParagraph) -> ParagraphMut<'a> {
        let Self { story, ctx } = self;
        story.blocks.push(Block::Paragraph(paragraph));
        match story.blocks.last_mut() {
            Some(Block::Paragraph(p)) => ParagraphMut::new(p, ctx),
            _ => unreachable!(),
        }
    }

    /// The paragraph at block index `idx`, or `None` if that block is a table
    /// or does not exist.
    pub fn paragraph(&mut self, idx: usize) -> Option<ParagraphMut<'_>> {
        match self.story.blocks.get_mut(idx)? {
            Block::Paragraph(p) => Some(ParagraphMut::new(p, self.ctx.reborrow())),
            Block::Table(_) => None,
        }
    }

    /// The table at block index `idx`, or `None` if that block is a paragraph
    /// or does not exist.
    pub fn table(&mut self, idx: usize) -> Option<TableMut<'_>> {
        match self.story.blocks.get_mut(idx)? {
            Block::Table(t) => Some(TableMut::new(t, self.ctx.reborrow())),
            Block::Paragraph(_) => None,
        }
    }

    #[inline]
    pub fn story(&self) -> &Story {
        self.story
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.story.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.story.is_empty()
    }
}
