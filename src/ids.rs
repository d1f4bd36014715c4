//! Display names for external character and stage ids.

/// Character names indexed by external character id.
pub const CHARACTER_NAMES: [&str; 34] = [
    "Captain Falcon",
    "Donkey Kong",
    "Fox",
    "Mr. Game & Watch",
    "Kirby",
    "Bowser",
    "Link",
    "Luigi",
    "Mario",
    "Marth",
    "Mewtwo",
    "Ness",
    "Peach",
    "Pikachu",
    "Ice Climbers",
    "Jigglypuff",
    "Samus",
    "Yoshi",
    "Zelda",
    "Sheik",
    "Falco",
    "Young Link",
    "Dr. Mario",
    "Roy",
    "Pichu",
    "Ganondorf",
    "Master Hand",
    "Wireframe Male",
    "Wireframe Female",
    "Giga Bowser",
    "Crazy Hand",
    "Sandbag",
    "Popo",
    "None",
];

/// Stage names indexed by stage id.
pub const STAGE_NAMES: [&str; 33] = [
    "Dummy",
    "TEST",
    "Fountain of Dreams",
    "Pokemon Stadium",
    "Princess Peach's Castle",
    "Kongo Jungle",
    "Brinstar",
    "Corneria",
    "Yoshi's Story",
    "Onett",
    "Mute City",
    "Rainbow Cruise",
    "Jungle Japes",
    "Great Bay",
    "Hyrule Temple",
    "Brinstar Depths",
    "Yoshi's Island",
    "Green Greens",
    "Fourside",
    "Mushroom Kingdom I",
    "Mushroom Kingdom II",
    "Akaneia",
    "Venom",
    "Poke Floats",
    "Big Blue",
    "Icicle Mountain",
    "Icetop",
    "Flat Zone",
    "Dream Land N64",
    "Yoshi's Island N64",
    "Kongo Jungle N64",
    "Battlefield",
    "Final Destination",
];

/// Returns the name of an external character id.
///
/// ```
/// assert_eq!(melee_stats::ids::character_name(9), Some("Marth"));
/// assert_eq!(melee_stats::ids::character_name(200), None);
/// ```
#[must_use]
pub fn character_name(id: u8) -> Option<&'static str> {
    CHARACTER_NAMES.get(usize::from(id)).copied()
}

/// Returns the name of a stage id.
#[must_use]
pub fn stage_name(id: u16) -> Option<&'static str> {
    STAGE_NAMES.get(usize::from(id)).copied()
}
