use constellation::reader::sdn::{
    ABSTRACT, CREATION_DATE, EAST_BOUND, KEYWORD, NORTH_BOUND, RESPONSIBLE_PARTY, SOUTH_BOUND,
    TITLE, WEST_BOUND,
};
use constellation::reader::MemoryVariableSource;

pub const MED: &str = "med-1";
pub const NORTH_SEA: &str = "north-1";
pub const BALTIC: &str = "baltic-1";
pub const GLOBAL: &str = "nobox-1";

/// West, east, south, north.
pub fn add_box(source: &mut MemoryVariableSource, id: &str, [w, e, s, n]: [&str; 4]) {
    source.insert(id, WEST_BOUND, w);
    source.insert(id, EAST_BOUND, e);
    source.insert(id, SOUTH_BOUND, s);
    source.insert(id, NORTH_BOUND, n);
}

/// Four records; identifiers sort as baltic, med, nobox, north, which is
/// also their index order after a rebuild.
pub fn sample_source() -> MemoryVariableSource {
    let mut source = MemoryVariableSource::new()
        .with_value(MED, TITLE, "Mediterranean salinity profiles")
        .with_value(MED, ABSTRACT, "Salinity profiles in the western Mediterranean")
        .with_value(MED, KEYWORD, "salinity")
        .with_value(MED, CREATION_DATE, "1990-06-09")
        .with_value(MED, RESPONSIBLE_PARTY, "486")
        .with_value(NORTH_SEA, TITLE, "North Sea temperature")
        .with_value(NORTH_SEA, KEYWORD, "temperature")
        .with_value(NORTH_SEA, CREATION_DATE, "2001-03-15")
        .with_value(BALTIC, TITLE, "Baltic oxygen and temperature")
        .with_value(BALTIC, KEYWORD, "oxygen")
        .with_value(BALTIC, KEYWORD, "temperature")
        .with_value(BALTIC, CREATION_DATE, "1985-01-01")
        .with_value(GLOBAL, TITLE, "Global chlorophyll")
        .with_value(GLOBAL, KEYWORD, "chlorophyll");

    add_box(&mut source, MED, ["1", "5", "36", "40"]);
    add_box(&mut source, NORTH_SEA, ["0", "8", "51", "58"]);
    add_box(&mut source, BALTIC, ["12", "30", "53", "66"]);
    source
}
