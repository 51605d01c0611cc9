use troopinfo_core::Container;
use troopinfo_core::diff::diff;
use troopinfo_render::{
    JsonStyle, render_debug_dump, render_diff_json, render_diff_text, render_json,
};

fn sample_container() -> Container {
    let mut container = Container::default();
    for (i, troop) in container.troop_infos.iter_mut().enumerate() {
        troop.job = i as i32;
        troop.move_speed = 1.25 * i as f32;
        troop.level_up_data[2].skill_id = 40 + i as i32;
    }
    container.trailer[0] = 0xAB;
    container.trailer[63] = 0x01;
    container
}

#[test]
fn debug_dump_lists_every_troop_and_field() {
    let dump = render_debug_dump(&sample_container());

    assert!(dump.starts_with("TroopInfo version=100 count=43 (6436 bytes)"));
    assert!(dump.contains("[00] Archer @ 0x0008"));
    assert!(dump.contains("[42] Encablossa Main @ 0x"));
    assert!(dump.contains("move_speed"));
    assert!(dump.contains("= 2.5"));
    assert!(dump.contains("level_up_data[2].skill_id"));
    assert!(dump.contains("trailer:"));
    assert!(dump.contains("  0000  ab 00"));
    assert!(dump.contains("  0030  00"));

    let field_lines = dump
        .lines()
        .filter(|line| line.starts_with("  ") && line.contains("= "))
        .count();
    assert_eq!(field_lines, 43 * 37);
}

#[test]
fn json_uses_canonical_top_level_order() {
    let value = render_json(&sample_container(), JsonStyle::CanonicalV1);
    let keys: Vec<&str> = value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["version", "count", "layout", "troop_infos", "trailer"]);

    assert_eq!(value["layout"]["file_len"], 6436);
    assert_eq!(value["layout"]["section_count"], 45);
    assert_eq!(value["layout"]["validation_ok"], true);
}

#[test]
fn json_troops_carry_all_fields_in_order() {
    let value = render_json(&sample_container(), JsonStyle::CanonicalV1);
    let troops = value["troop_infos"].as_array().expect("troop_infos array");
    assert_eq!(troops.len(), 43);

    let knight = &troops[5];
    assert_eq!(knight["name"], "Knight");
    assert_eq!(knight["fields"]["job"], 5);
    assert_eq!(knight["fields"]["move_speed"], 6.25);
    assert_eq!(knight["fields"]["level_up_data[2].skill_id"], 45);

    let fields = knight["fields"].as_object().expect("fields object");
    assert_eq!(fields.len(), 37);
    assert_eq!(fields.keys().next().map(String::as_str), Some("job"));
    assert_eq!(
        fields.keys().last().map(String::as_str),
        Some("damage_distribution")
    );

    let trailer = value["trailer"].as_str().expect("trailer hex");
    assert_eq!(trailer.len(), 128);
    assert!(trailer.starts_with("ab00"));
    assert!(trailer.ends_with("01"));
}

#[test]
fn json_renders_non_finite_floats_as_strings() {
    let mut container = Container::default();
    container.troop_infos[0].defense = f32::INFINITY;
    let value = render_json(&container, JsonStyle::CanonicalV1);
    assert_eq!(value["troop_infos"][0]["fields"]["defense"], "inf");
}

#[test]
fn diff_text_reports_no_differences() {
    let c = sample_container();
    assert_eq!(render_diff_text(&diff(&c, &c)), "no differences\n");
}

#[test]
fn diff_text_lists_changes() {
    let current = sample_container();
    let mut proposed = current.clone();
    proposed.troop_infos[5].move_speed = 9.5;
    proposed.trailer = [0; 64];

    let text = render_diff_text(&diff(&current, &proposed));
    assert!(text.contains("troop 5 (Knight) move_speed: 6.25 -> 9.5"));
    assert!(text.contains("trailer: changed"));
    assert!(text.contains("first at 0x"));
    assert!(text.contains("(troop 5 (Knight) move_speed)"));
}

#[test]
fn diff_json_reports_field_differences() {
    let current = sample_container();
    let mut proposed = current.clone();
    proposed.troop_infos[0].job = 99;

    let value = render_diff_json(&diff(&current, &proposed));
    assert_eq!(value["identical"], false);
    assert_eq!(value["trailer_changed"], false);
    assert_eq!(value["first_differing_offset"], 8);
    assert_eq!(value["first_differing_location"]["section"], "troop_0");
    assert_eq!(value["first_differing_location"]["field"], "job");

    let field_diffs = value["field_differences"]
        .as_array()
        .expect("field_differences should be an array");
    assert_eq!(field_diffs.len(), 1);
    assert_eq!(field_diffs[0]["troop_name"], "Archer");
    assert_eq!(field_diffs[0]["current"], 0);
    assert_eq!(field_diffs[0]["proposed"], 99);
}
