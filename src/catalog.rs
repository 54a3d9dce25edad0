//! Department and position dictionaries.
//!
//! The department/position pair is a constrained categorical: position options
//! depend on the department. Clients read these via the dictionary routes and
//! patches are validated against them.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub value: &'static str,
    pub label: &'static str,
}

pub const DEPARTMENTS: [&str; 7] = [
    "Gambling",
    "Sweeps",
    "Search",
    "Vitehi",
    "Tech",
    "TechaDeals",
    "Admin",
];

pub fn positions_for(department: &str) -> &'static [CatalogEntry] {
    const GAMBLING: &[CatalogEntry] = &[
        CatalogEntry { value: "Head", label: "Head" },
        CatalogEntry { value: "TeamLead", label: "Team Lead" },
        CatalogEntry { value: "Buyer", label: "Buyer" },
        CatalogEntry { value: "Designer", label: "Designer" },
        CatalogEntry { value: "FarmerTech", label: "Farmer's Tech" },
    ];
    const SWEEPS_SEARCH: &[CatalogEntry] = &[
        CatalogEntry { value: "Head", label: "Head" },
        CatalogEntry { value: "TeamLead", label: "Team Lead" },
        CatalogEntry { value: "Buyer", label: "Buyer" },
        CatalogEntry { value: "Designer", label: "Designer" },
    ];
    const TECH: &[CatalogEntry] = &[
        CatalogEntry { value: "CTO", label: "CTO" },
        CatalogEntry { value: "Translator", label: "Translator" },
        CatalogEntry { value: "Frontend", label: "Frontend" },
    ];
    const ADMIN: &[CatalogEntry] = &[
        CatalogEntry { value: "Accountant", label: "Accountant" },
        CatalogEntry { value: "Administrator", label: "Administrator" },
    ];

    match department {
        "Gambling" => GAMBLING,
        "Sweeps" | "Search" => SWEEPS_SEARCH,
        "Tech" => TECH,
        "Admin" => ADMIN,
        _ => &[],
    }
}

pub fn is_department(value: &str) -> bool {
    DEPARTMENTS.contains(&value)
}

/// A position is valid for a department when it appears in that department's
/// option list. Departments with no configured positions accept none.
pub fn is_position_for(department: &str, position: &str) -> bool {
    positions_for(department).iter().any(|p| p.value == position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_depends_on_department() {
        assert!(is_position_for("Gambling", "FarmerTech"));
        assert!(is_position_for("Admin", "Accountant"));
        assert!(!is_position_for("Admin", "Buyer"));
        assert!(!is_position_for("Vitehi", "Head"));
    }

    #[test]
    fn unknown_department_has_no_positions() {
        assert!(positions_for("Marketing").is_empty());
        assert!(!is_department("Marketing"));
    }
}
