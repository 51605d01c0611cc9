use std::ops::Range;

// SOX file constants
pub const EXPECTED_VERSION: i32 = 100;
pub const TROOP_COUNT: usize = 43;
pub const LEVEL_UP_SLOTS: usize = 3;
pub const TRAILER_LEN: usize = 64;

pub const WORD_LEN: usize = 4;
pub const HEADER_LEN: usize = 2 * WORD_LEN;
pub const FIELD_COUNT: usize = 37;
pub const RECORD_LEN: usize = FIELD_COUNT * WORD_LEN;
pub const FILE_LEN: usize = HEADER_LEN + TROOP_COUNT * RECORD_LEN + TRAILER_LEN;

/// Positions of the `level_up_data` words inside a record's field list.
pub const LEVEL_UP_FIELDS: Range<usize> = 30..30 + LEVEL_UP_SLOTS * 2;

// --- Display tables ---

/// Labels in on-disk order. Also the key names of the text form.
pub const FIELD_LABELS: [&str; FIELD_COUNT] = [
    "job",
    "type_id",
    "move_speed",
    "rotate_rate",
    "move_acceleration",
    "move_deceleration",
    "sight_range",
    "attack_range_max",
    "attack_range_min",
    "attack_front_range",
    "direct_attack",
    "indirect_attack",
    "defense",
    "base_width",
    "resist_melee",
    "resist_ranged",
    "resist_frontal",
    "resist_explosion",
    "resist_fire",
    "resist_ice",
    "resist_lightning",
    "resist_holy",
    "resist_curse",
    "resist_poison",
    "max_unit_speed_multiplier",
    "default_unit_hp",
    "formation_random",
    "default_unit_num_x",
    "default_unit_num_y",
    "unit_hp_lev_up",
    "level_up_data[0].skill_id",
    "level_up_data[0].skill_per_level",
    "level_up_data[1].skill_id",
    "level_up_data[1].skill_per_level",
    "level_up_data[2].skill_id",
    "level_up_data[2].skill_per_level",
    "damage_distribution",
];

pub const TROOP_NAMES: [&str; TROOP_COUNT] = [
    "Archer",
    "Longbows",
    "Infantry",
    "Spearman",
    "Heavy Infantry",
    "Knight",
    "Paladin",
    "Calvary",
    "Heavy Calvary",
    "Storm Riders",
    "Sappers",
    "Pyro Techs",
    "Bomber Wings",
    "Mortar",
    "Ballista",
    "Harpoon",
    "Catapult",
    "Battaloon",
    "Dark Elves Archer",
    "Dark Elves Calvary Archers",
    "Dark Elves Infantry",
    "Dark Elves Knights",
    "Dark Elves Calvary",
    "Orc Infantry",
    "Orc Riders",
    "Orc Heavy Riders",
    "Orc Axe Man",
    "Orc Heavy Infantry",
    "Orc Sappers",
    "Orc Scorpion",
    "Orc Swamp Mammoth",
    "Orc Dirigible",
    "Orc Black Wyverns",
    "Orc Ghouls",
    "Orc Bone Dragon",
    "Wall Archers (Humans)",
    "Scouts",
    "Ghoul Selfdestruct",
    "Encablossa Monster (Melee)",
    "Encablossa Flying Monster",
    "Encablossa Monster (Ranged)",
    "Wall Archers (Elves)",
    "Encablossa Main",
];

pub fn troop_name(index: usize) -> &'static str {
    TROOP_NAMES.get(index).copied().unwrap_or("Unknown")
}
