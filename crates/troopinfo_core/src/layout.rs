use crate::error::FormatError;
use crate::troopinfo::types::{
    FIELD_LABELS, FILE_LEN, HEADER_LEN, RECORD_LEN, TRAILER_LEN, TROOP_COUNT, WORD_LEN,
    troop_name,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        (self.start..self.end).contains(&offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    Header,
    Troop(usize),
    Trailer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    pub id: SectionId,
    pub range: ByteRange,
}

/// Where a byte offset lands in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub section: SectionId,
    /// Field label for header and troop bytes, `None` inside the trailer.
    pub field: Option<&'static str>,
    pub offset_in_section: usize,
}

impl Location {
    pub fn describe(&self) -> String {
        match (self.section, self.field) {
            (SectionId::Header, Some(field)) => format!("header.{field}"),
            (SectionId::Troop(i), Some(field)) => {
                format!("troop {i} ({}) {field}", troop_name(i))
            }
            (SectionId::Trailer, _) => format!("trailer byte {}", self.offset_in_section),
            (section, None) => format!("{section:?} +{}", self.offset_in_section),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileLayout {
    pub file_len: usize,
    pub sections: Vec<SectionLayout>,
}

impl FileLayout {
    pub fn troop_info() -> Self {
        let mut sections = Vec::with_capacity(TROOP_COUNT + 2);
        sections.push(SectionLayout {
            id: SectionId::Header,
            range: ByteRange {
                start: 0,
                end: HEADER_LEN,
            },
        });
        for index in 0..TROOP_COUNT {
            let start = HEADER_LEN + index * RECORD_LEN;
            sections.push(SectionLayout {
                id: SectionId::Troop(index),
                range: ByteRange {
                    start,
                    end: start + RECORD_LEN,
                },
            });
        }
        let trailer_start = HEADER_LEN + TROOP_COUNT * RECORD_LEN;
        sections.push(SectionLayout {
            id: SectionId::Trailer,
            range: ByteRange {
                start: trailer_start,
                end: trailer_start + TRAILER_LEN,
            },
        });

        Self {
            file_len: FILE_LEN,
            sections,
        }
    }

    pub fn section(&self, id: SectionId) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn locate(&self, offset: usize) -> Option<Location> {
        let section = self.sections.iter().find(|s| s.range.contains(offset))?;
        let offset_in_section = offset - section.range.start;
        let field = match section.id {
            SectionId::Header => ["version", "count"].get(offset_in_section / WORD_LEN).copied(),
            SectionId::Troop(_) => FIELD_LABELS.get(offset_in_section / WORD_LEN).copied(),
            SectionId::Trailer => None,
        };
        Some(Location {
            section: section.id,
            field,
            offset_in_section,
        })
    }

    /// Sections must tile `0..file_len` in order with no gaps or overlaps.
    pub fn validate(&self) -> Result<(), FormatError> {
        let covered = self.sections.iter().try_fold(0, |next, section| {
            let ByteRange { start, end } = section.range;
            if start != next || end < start {
                Err(FormatError::Layout(format!(
                    "{:?} spans {start}..{end}, expected it to start at {next}",
                    section.id
                )))
            } else {
                Ok(end)
            }
        })?;

        if covered != self.file_len {
            return Err(FormatError::Layout(format!(
                "sections cover {covered} of {} bytes",
                self.file_len
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn troop_info_layout_is_contiguous() {
        let layout = FileLayout::troop_info();
        layout.validate().expect("layout should validate");
        assert_eq!(layout.sections.len(), TROOP_COUNT + 2);
        assert_eq!(layout.file_len, 6436);
        assert_eq!(
            layout.section(SectionId::Troop(1)).unwrap().range,
            ByteRange {
                start: 8 + 148,
                end: 8 + 2 * 148
            }
        );
    }

    #[test]
    fn validate_rejects_gaps() {
        let mut layout = FileLayout::troop_info();
        layout.sections.remove(3);
        assert!(matches!(layout.validate(), Err(FormatError::Layout(_))));
    }

    #[test]
    fn validate_rejects_short_cover() {
        let mut layout = FileLayout::troop_info();
        layout.sections.pop();
        assert_eq!(
            layout.validate(),
            Err(FormatError::Layout("sections cover 6372 of 6436 bytes".to_string()))
        );

        layout.sections.clear();
        assert!(layout.validate().is_err());
    }

    #[test]
    fn locate_maps_offsets_to_fields() {
        let layout = FileLayout::troop_info();

        let loc = layout.locate(4).unwrap();
        assert_eq!(loc.section, SectionId::Header);
        assert_eq!(loc.field, Some("count"));

        // Troop 5, third word.
        let loc = layout.locate(HEADER_LEN + 5 * RECORD_LEN + 2 * WORD_LEN + 1).unwrap();
        assert_eq!(loc.section, SectionId::Troop(5));
        assert_eq!(loc.field, Some("move_speed"));
        assert_eq!(loc.describe(), "troop 5 (Knight) move_speed");

        let loc = layout.locate(FILE_LEN - 1).unwrap();
        assert_eq!(loc.section, SectionId::Trailer);
        assert_eq!(loc.describe(), "trailer byte 63");

        assert!(layout.locate(FILE_LEN).is_none());
    }
}
