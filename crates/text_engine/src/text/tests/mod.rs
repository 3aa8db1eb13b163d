//! Scenario tests spanning fonts, layout and the glyph atlas

mod layout_scenarios;
