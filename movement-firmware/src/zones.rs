//! Time zones offered by the settings
//!
//! Fixed UTC offsets, no daylight saving. The index is what the settings
//! record stores.

use movement_core::traits::FixedZones;

pub static ZONES: FixedZones = FixedZones::new(&[
    ("UTC", 0),
    ("CET", 60),
    ("SAST", 120),
    ("AST", 180),
    ("GST", 240),
    ("AFT", 270),
    ("PKT", 300),
    ("IST", 330),
    ("NPT", 345),
    ("BST", 360),
    ("MMT", 390),
    ("ICT", 420),
    ("CST", 480),
    ("ACWT", 525),
    ("JST", 540),
    ("ACST", 570),
    ("AEST", 600),
    ("LHST", 630),
    ("SBT", 660),
    ("NZST", 720),
    ("CHST", 765),
    ("TOT", 780),
    ("LINT", 840),
    ("BIT", -720),
    ("SST", -660),
    ("HST", -600),
    ("MART", -570),
    ("AKST", -540),
    ("PST", -480),
    ("MST", -420),
    ("CST", -360),
    ("EST", -300),
    ("AST", -240),
    ("NST", -210),
    ("BRT", -180),
    ("GST", -120),
    ("CVT", -60),
]);
