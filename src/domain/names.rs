//! Fixed persona-indexed name pools and relative-time buckets.
//!
//! These lists are part of the seeded output: reordering or editing them
//! changes which value every post resolves to.

use simfeed_types::PersonaType;

pub const DEFAULT_USER_NAME: &str = "User";
pub const DEFAULT_SPONSOR_NAME: &str = "Sponsored";
pub const DEFAULT_TIME_LABEL: &str = "Just now";

pub const TIME_BUCKETS: [&str; 6] = ["2h", "3h", "6h", "12h", "1d", "2d"];

pub const FEMALE_NAMES: [&str; 50] = [
    "Emma Johnson",
    "Olivia Smith",
    "Ava Williams",
    "Sophia Brown",
    "Isabella Jones",
    "Mia Garcia",
    "Charlotte Miller",
    "Amelia Davis",
    "Harper Rodriguez",
    "Evelyn Martinez",
    "Abigail Hernandez",
    "Emily Lopez",
    "Elizabeth Gonzalez",
    "Sofia Wilson",
    "Avery Anderson",
    "Ella Thomas",
    "Scarlett Taylor",
    "Grace Moore",
    "Chloe Jackson",
    "Victoria Martin",
    "Riley Lee",
    "Aria Perez",
    "Lily Thompson",
    "Aubrey White",
    "Zoey Harris",
    "Penelope Sanchez",
    "Layla Clark",
    "Nora Ramirez",
    "Hannah Lewis",
    "Addison Robinson",
    "Eleanor Walker",
    "Natalie Young",
    "Luna Allen",
    "Savannah King",
    "Brooklyn Wright",
    "Leah Scott",
    "Zoe Torres",
    "Stella Nguyen",
    "Hazel Hill",
    "Ellie Flores",
    "Paisley Green",
    "Audrey Adams",
    "Skylar Nelson",
    "Violet Baker",
    "Claire Hall",
    "Bella Rivera",
    "Lucy Campbell",
    "Anna Mitchell",
    "Samantha Carter",
    "Caroline Roberts",
];

pub const MALE_NAMES: [&str; 50] = [
    "Liam Johnson",
    "Noah Smith",
    "William Williams",
    "James Brown",
    "Oliver Jones",
    "Benjamin Garcia",
    "Elijah Miller",
    "Lucas Davis",
    "Mason Rodriguez",
    "Logan Martinez",
    "Alexander Hernandez",
    "Ethan Lopez",
    "Jacob Gonzalez",
    "Michael Wilson",
    "Daniel Anderson",
    "Henry Thomas",
    "Jackson Taylor",
    "Sebastian Moore",
    "Aiden Jackson",
    "Matthew Martin",
    "Samuel Lee",
    "David Perez",
    "Joseph Thompson",
    "Carter White",
    "Owen Harris",
    "Wyatt Sanchez",
    "John Clark",
    "Jack Ramirez",
    "Luke Lewis",
    "Jayden Robinson",
    "Dylan Walker",
    "Grayson Young",
    "Levi Allen",
    "Isaac King",
    "Gabriel Wright",
    "Julian Scott",
    "Mateo Torres",
    "Anthony Nguyen",
    "Jaxon Hill",
    "Lincoln Flores",
    "Joshua Green",
    "Christopher Adams",
    "Andrew Nelson",
    "Theodore Baker",
    "Caleb Hall",
    "Ryan Rivera",
    "Asher Campbell",
    "Nathan Mitchell",
    "Thomas Carter",
    "Leo Roberts",
];

pub const COMPANY_NAMES: [&str; 20] = [
    "Northwind Outfitters",
    "Bluepeak Coffee",
    "Lumen Home",
    "Cedar & Pine Co.",
    "Brightside Travel",
    "Harbor Fitness",
    "Maple Street Bakery",
    "Vertex Mobile",
    "Evergreen Market",
    "Summit Gear",
    "Silverline Studios",
    "Juniper Skincare",
    "Atlas Books",
    "Riverbend Foods",
    "Copperleaf Design",
    "Nimbus Cloud",
    "Golden Hour Optics",
    "Tidewater Apparel",
    "Ironwood Tools",
    "Starlight Pets",
];

/// Name pool for a persona; unknown personas have none.
pub fn names_for(persona: PersonaType) -> &'static [&'static str] {
    match persona {
        PersonaType::Female => &FEMALE_NAMES,
        PersonaType::Male => &MALE_NAMES,
        PersonaType::Company => &COMPANY_NAMES,
        PersonaType::Unknown => &[],
    }
}

/// Last-resort display name when neither a pool pick nor an authored name exists.
pub fn default_name_for(persona: PersonaType) -> &'static str {
    match persona {
        PersonaType::Company => DEFAULT_SPONSOR_NAME,
        _ => DEFAULT_USER_NAME,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn persona_pools_have_expected_sizes() {
        assert_eq!(names_for(PersonaType::Female).len(), 50);
        assert_eq!(names_for(PersonaType::Male).len(), 50);
        assert_eq!(names_for(PersonaType::Company).len(), 20);
        assert!(names_for(PersonaType::Unknown).is_empty());
    }

    #[test]
    fn persona_pools_have_no_duplicates() {
        for persona in [PersonaType::Female, PersonaType::Male, PersonaType::Company] {
            let pool = names_for(persona);
            let unique: HashSet<_> = pool.iter().collect();
            assert_eq!(unique.len(), pool.len(), "duplicate names for {persona}");
        }
    }

    #[test]
    fn company_default_is_sponsored() {
        assert_eq!(default_name_for(PersonaType::Company), "Sponsored");
        assert_eq!(default_name_for(PersonaType::Female), "User");
        assert_eq!(default_name_for(PersonaType::Unknown), "User");
    }
}
