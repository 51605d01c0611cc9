use std::fmt::Write as _;

use serde_json::{Map as JsonMap, Value as JsonValue};
use troopinfo_core::Container;
use troopinfo_core::diff::{ContainerDiff, FieldDifference};
use troopinfo_core::layout::{FileLayout, Location, SectionId};
use troopinfo_core::troopinfo::FieldValue;
use troopinfo_core::troopinfo::types::{FIELD_LABELS, RECORD_LEN, troop_name};

const LABEL_WIDTH: usize = 34;
const HEX_ROW: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

pub fn render_debug_dump(container: &Container) -> String {
    let layout = FileLayout::troop_info();
    let mut out = String::new();

    writeln!(
        &mut out,
        "TroopInfo version={} count={} ({} bytes)",
        container.version, container.count, layout.file_len
    )
    .expect("writing to String cannot fail");

    for (index, troop) in container.troop_infos.iter().enumerate() {
        writeln!(&mut out).expect("writing to String cannot fail");
        let start = layout
            .section(SectionId::Troop(index))
            .map(|s| s.range.start)
            .unwrap_or_default();
        writeln!(
            &mut out,
            "[{index:02}] {} @ 0x{start:04x}",
            troop_name(index)
        )
        .expect("writing to String cannot fail");
        for field in troop.fields() {
            writeln!(
                &mut out,
                "  {:<width$}= {}",
                field.label,
                field.value,
                width = LABEL_WIDTH
            )
            .expect("writing to String cannot fail");
        }
    }

    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(&mut out, "trailer:").expect("writing to String cannot fail");
    for (row, chunk) in container.trailer.chunks(HEX_ROW).enumerate() {
        writeln!(&mut out, "  {:04x}  {}", row * HEX_ROW, hex(chunk, " "))
            .expect("writing to String cannot fail");
    }

    out
}

pub fn render_json(container: &Container, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(container_json(container)),
    }
}

pub fn render_diff_text(diff: &ContainerDiff) -> String {
    let mut out = String::new();
    if diff.is_empty() {
        writeln!(&mut out, "no differences").expect("writing to String cannot fail");
        return out;
    }

    for h in &diff.header {
        writeln!(&mut out, "header.{}: {} -> {}", h.field, h.current, h.proposed)
            .expect("writing to String cannot fail");
    }
    for d in &diff.fields {
        writeln!(
            &mut out,
            "troop {} ({}) {}: {} -> {}",
            d.troop_index, d.troop_name, d.field, d.current, d.proposed
        )
        .expect("writing to String cannot fail");
    }
    if diff.trailer_changed {
        writeln!(&mut out, "trailer: changed").expect("writing to String cannot fail");
    }

    let bytes = &diff.bytes;
    let summary = match (bytes.first_offset, bytes.first_location) {
        (Some(offset), Some(location)) => writeln!(
            &mut out,
            "{} bytes differ, first at 0x{offset:04x} ({})",
            bytes.differing_bytes,
            location.describe()
        ),
        (Some(offset), None) => writeln!(
            &mut out,
            "{} bytes differ, first at 0x{offset:04x}",
            bytes.differing_bytes
        ),
        _ => writeln!(&mut out, "{} bytes differ", bytes.differing_bytes),
    };
    summary.expect("writing to String cannot fail");

    out
}

pub fn render_diff_json(diff: &ContainerDiff) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("identical".to_string(), JsonValue::Bool(diff.is_empty()));
    out.insert(
        "header_differences".to_string(),
        JsonValue::Array(
            diff.header
                .iter()
                .map(|h| {
                    let mut m = JsonMap::new();
                    m.insert("field".to_string(), JsonValue::String(h.field.to_string()));
                    m.insert("current".to_string(), JsonValue::from(h.current));
                    m.insert("proposed".to_string(), JsonValue::from(h.proposed));
                    JsonValue::Object(m)
                })
                .collect(),
        ),
    );
    out.insert(
        "field_differences".to_string(),
        JsonValue::Array(diff.fields.iter().map(field_difference_to_json).collect()),
    );
    out.insert(
        "trailer_changed".to_string(),
        JsonValue::Bool(diff.trailer_changed),
    );
    out.insert(
        "differing_bytes".to_string(),
        JsonValue::from(diff.bytes.differing_bytes),
    );
    out.insert(
        "first_differing_offset".to_string(),
        match diff.bytes.first_offset {
            Some(v) => JsonValue::from(v),
            None => JsonValue::Null,
        },
    );
    out.insert(
        "first_differing_location".to_string(),
        match diff.bytes.first_location {
            Some(location) => location_to_json(&location),
            None => JsonValue::Null,
        },
    );
    JsonValue::Object(out)
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

fn container_json(container: &Container) -> JsonMap<String, JsonValue> {
    let layout = FileLayout::troop_info();
    let mut out = JsonMap::new();

    out.insert("version".to_string(), JsonValue::from(container.version));
    out.insert("count".to_string(), JsonValue::from(container.count));

    let mut layout_json = JsonMap::new();
    layout_json.insert("file_len".to_string(), JsonValue::from(layout.file_len));
    layout_json.insert("record_len".to_string(), JsonValue::from(RECORD_LEN));
    layout_json.insert(
        "section_count".to_string(),
        JsonValue::from(layout.sections.len()),
    );
    layout_json.insert(
        "validation_ok".to_string(),
        JsonValue::Bool(layout.validate().is_ok()),
    );
    out.insert("layout".to_string(), JsonValue::Object(layout_json));

    out.insert(
        "troop_infos".to_string(),
        JsonValue::Array(
            container
                .troop_infos
                .iter()
                .enumerate()
                .map(|(index, troop)| {
                    let mut m = JsonMap::new();
                    m.insert("index".to_string(), JsonValue::from(index));
                    m.insert(
                        "name".to_string(),
                        JsonValue::String(troop_name(index).to_string()),
                    );
                    let mut fields = JsonMap::with_capacity(FIELD_LABELS.len());
                    for field in troop.fields() {
                        fields.insert(field.label.to_string(), value_to_json(field.value));
                    }
                    m.insert("fields".to_string(), JsonValue::Object(fields));
                    JsonValue::Object(m)
                })
                .collect(),
        ),
    );
    out.insert(
        "trailer".to_string(),
        JsonValue::String(hex(&container.trailer, "")),
    );
    out
}

fn field_difference_to_json(d: &FieldDifference) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("troop_index".to_string(), JsonValue::from(d.troop_index));
    m.insert(
        "troop_name".to_string(),
        JsonValue::String(d.troop_name.to_string()),
    );
    m.insert("field".to_string(), JsonValue::String(d.field.to_string()));
    m.insert("current".to_string(), value_to_json(d.current));
    m.insert("proposed".to_string(), value_to_json(d.proposed));
    JsonValue::Object(m)
}

fn location_to_json(location: &Location) -> JsonValue {
    let mut m = JsonMap::new();
    let section = match location.section {
        SectionId::Header => "header".to_string(),
        SectionId::Troop(i) => format!("troop_{i}"),
        SectionId::Trailer => "trailer".to_string(),
    };
    m.insert("section".to_string(), JsonValue::String(section));
    m.insert(
        "field".to_string(),
        match location.field {
            Some(field) => JsonValue::String(field.to_string()),
            None => JsonValue::Null,
        },
    );
    m.insert(
        "description".to_string(),
        JsonValue::String(location.describe()),
    );
    JsonValue::Object(m)
}

/// Non-finite floats have no JSON number form and render as strings.
fn value_to_json(value: FieldValue) -> JsonValue {
    match value {
        FieldValue::Int(v) => JsonValue::from(v),
        FieldValue::Float(v) if v.is_finite() => JsonValue::from(value.to_f64()),
        FieldValue::Float(v) => JsonValue::String(format!("{v}")),
    }
}

fn hex(bytes: &[u8], sep: &str) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(sep)
}
