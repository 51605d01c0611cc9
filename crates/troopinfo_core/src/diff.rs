use crate::layout::{FileLayout, Location};
use crate::troopinfo::types::troop_name;
use crate::troopinfo::{Container, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDifference {
    pub field: &'static str,
    pub current: i32,
    pub proposed: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDifference {
    pub troop_index: usize,
    pub troop_name: &'static str,
    pub field: &'static str,
    pub current: FieldValue,
    pub proposed: FieldValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteSummary {
    pub differing_bytes: usize,
    pub first_offset: Option<usize>,
    pub first_location: Option<Location>,
}

/// What writing `proposed` over `current` would change.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDiff {
    pub header: Vec<HeaderDifference>,
    pub fields: Vec<FieldDifference>,
    pub trailer_changed: bool,
    pub bytes: ByteSummary,
}

impl ContainerDiff {
    pub fn is_empty(&self) -> bool {
        self.bytes.differing_bytes == 0
    }
}

pub fn diff(current: &Container, proposed: &Container) -> ContainerDiff {
    let mut header = Vec::new();
    if current.version != proposed.version {
        header.push(HeaderDifference {
            field: "version",
            current: current.version,
            proposed: proposed.version,
        });
    }
    if current.count != proposed.count {
        header.push(HeaderDifference {
            field: "count",
            current: current.count,
            proposed: proposed.count,
        });
    }

    let mut fields = Vec::new();
    for (troop_index, (before, after)) in current
        .troop_infos
        .iter()
        .zip(proposed.troop_infos.iter())
        .enumerate()
    {
        for (a, b) in before.fields().iter().zip(after.fields().iter()) {
            if !a.value.same_bits(&b.value) {
                fields.push(FieldDifference {
                    troop_index,
                    troop_name: troop_name(troop_index),
                    field: a.label,
                    current: a.value,
                    proposed: b.value,
                });
            }
        }
    }

    ContainerDiff {
        header,
        fields,
        trailer_changed: current.trailer != proposed.trailer,
        bytes: byte_summary(&current.encode(), &proposed.encode()),
    }
}

fn byte_summary(current: &[u8], proposed: &[u8]) -> ByteSummary {
    let mut summary = ByteSummary::default();
    for (offset, (a, b)) in current.iter().zip(proposed.iter()).enumerate() {
        if a == b {
            continue;
        }
        summary.differing_bytes += 1;
        if summary.first_offset.is_none() {
            summary.first_offset = Some(offset);
            summary.first_location = FileLayout::troop_info().locate(offset);
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SectionId;

    #[test]
    fn identical_containers_have_empty_diff() {
        let c = Container::default();
        let d = diff(&c, &c.clone());
        assert!(d.is_empty());
        assert!(d.header.is_empty());
        assert!(d.fields.is_empty());
        assert!(!d.trailer_changed);
        assert_eq!(d.bytes.first_offset, None);
    }

    #[test]
    fn reports_changed_fields_and_first_byte() {
        let current = Container::default();
        let mut proposed = current.clone();
        proposed.troop_infos[5].move_speed = 2.5;
        proposed.troop_infos[42].level_up_data[1].skill_id = 7;

        let d = diff(&current, &proposed);
        assert_eq!(d.fields.len(), 2);
        assert_eq!(d.fields[0].troop_index, 5);
        assert_eq!(d.fields[0].troop_name, "Knight");
        assert_eq!(d.fields[0].field, "move_speed");
        assert_eq!(d.fields[0].proposed, FieldValue::Float(2.5));
        assert_eq!(d.fields[1].field, "level_up_data[1].skill_id");
        assert_eq!(d.fields[1].current, FieldValue::Int(0));

        let location = d.bytes.first_location.expect("location");
        assert_eq!(location.section, SectionId::Troop(5));
        assert_eq!(location.field, Some("move_speed"));
        assert!(!d.is_empty());
    }

    #[test]
    fn compares_floats_by_bits() {
        let mut current = Container::default();
        current.troop_infos[0].defense = f32::NAN;
        let mut proposed = current.clone();
        assert!(diff(&current, &proposed).fields.is_empty());

        proposed.troop_infos[0].sight_range = -0.0;
        let d = diff(&current, &proposed);
        assert_eq!(d.fields.len(), 1);
        assert_eq!(d.fields[0].field, "sight_range");
    }

    #[test]
    fn trailer_only_change_is_not_a_field_change() {
        let current = Container::default();
        let mut proposed = current.clone();
        proposed.trailer[10] = 0xFF;

        let d = diff(&current, &proposed);
        assert!(d.fields.is_empty());
        assert!(d.trailer_changed);
        assert_eq!(d.bytes.differing_bytes, 1);
        assert_eq!(
            d.bytes.first_location.map(|l| l.section),
            Some(SectionId::Trailer)
        );
    }
}
