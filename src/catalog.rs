use serde::Serialize;

pub const DEFAULT_CITY: &str = "Астана";
pub const ALLOWED_PAGES: [&str; 3] = ["home", "analytics", "reports"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct School {
    pub id: u32,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct City {
    pub name: &'static str,
    pub schools: &'static [School],
}

const fn entry(id: u32, name: &'static str) -> School {
    School { id, name }
}

pub static CITIES: [City; 5] = [
    City {
        name: "Алматы",
        schools: &[
            entry(1, "Школа №15"),
            entry(2, "Школа №27"),
            entry(3, "Школа №42"),
            entry(4, "Школа №58"),
            entry(5, "Школа №73"),
            entry(24, "Школа №89"),
            entry(25, "Школа №104"),
            entry(26, "Школа №125"),
            entry(27, "Школа №137"),
            entry(28, "Школа №156"),
        ],
    },
    City {
        name: "Астана",
        schools: &[
            entry(6, "Школа №12"),
            entry(7, "Школа №23"),
            entry(8, "Школа №35"),
            entry(9, "Школа №47"),
            entry(10, "Школа №61"),
        ],
    },
    City {
        name: "Шымкент",
        schools: &[
            entry(11, "Школа №8"),
            entry(12, "Школа №19"),
            entry(13, "Школа №31"),
            entry(14, "Школа №44"),
        ],
    },
    City {
        name: "Караганда",
        schools: &[
            entry(15, "Школа №5"),
            entry(16, "Школа №17"),
            entry(17, "Школа №29"),
            entry(18, "Школа №38"),
            entry(19, "Школа №52"),
        ],
    },
    City {
        name: "Атырау",
        schools: &[
            entry(20, "Школа №9"),
            entry(21, "Школа №14"),
            entry(22, "Школа №26"),
            entry(23, "Школа №33"),
        ],
    },
];

pub fn city(name: &str) -> Option<&'static City> {
    CITIES.iter().find(|city| city.name == name)
}

/// Known city name, or the default city for anything else.
pub fn validate_city(name: &str) -> &'static str {
    city(name.trim()).map_or(DEFAULT_CITY, |city| city.name)
}

pub fn validate_page(name: &str) -> &'static str {
    ALLOWED_PAGES
        .iter()
        .copied()
        .find(|page| *page == name)
        .unwrap_or("home")
}

pub fn schools_for(city_name: &str) -> &'static [School] {
    city(city_name).map(|city| city.schools).unwrap_or_default()
}

pub fn school(id: u32) -> Option<&'static School> {
    CITIES
        .iter()
        .flat_map(|city| city.schools.iter())
        .find(|school| school.id == id)
}

/// A positive id of a catalogued school.
pub fn validate_school_id(raw: i64) -> Option<u32> {
    let id = u32::try_from(raw).ok().filter(|id| *id > 0)?;
    school(id).map(|school| school.id)
}

/// Keeps valid ids, in order, without repeats.
pub fn sanitize_ids(ids: &[i64]) -> Vec<u32> {
    let mut clean: Vec<u32> = Vec::with_capacity(ids.len());
    for id in ids.iter().copied().filter_map(validate_school_id) {
        if !clean.contains(&id) {
            clean.push(id);
        }
    }
    clean
}

/// Selected schools in catalog order.
pub fn schools_by_ids(ids: &[u32]) -> Vec<School> {
    CITIES
        .iter()
        .flat_map(|city| city.schools.iter())
        .filter(|school| ids.contains(&school.id))
        .copied()
        .collect()
}
