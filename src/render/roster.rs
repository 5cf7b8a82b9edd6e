//! Plain-text unit roster: who is where, per side

use crate::simulation::ForceUnit;

/// Tabulate every subordinate's id and position, forces in the given order
pub fn roster_table(forces: &[&ForceUnit]) -> String {
    let id_width = forces
        .iter()
        .flat_map(|f| f.units().iter().map(|u| u.id().len()))
        .max()
        .unwrap_or(0)
        .max("Unit".len());

    let mut s = format!("{:<5} {:<id_width$} Position\n", "Side", "Unit");
    for force in forces {
        for (id, position) in force.positions() {
            s.push_str(&format!(
                "{:<5} {:<id_width$} {}\n",
                force.side().name(),
                id,
                position
            ));
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Side;

    #[test]
    fn test_roster_lists_all_units_in_order() {
        let red = ForceUnit::new(Side::Red, 2, "Engage Blue", 1);
        let blue = ForceUnit::new(Side::Blue, 1, "Defend Position", 2);
        let table = roster_table(&[&red, &blue]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Side"));
        assert!(lines[1].starts_with("Red   Red_Squad_1 "));
        assert!(lines[2].starts_with("Red   Red_Squad_2 "));
        assert!(lines[3].starts_with("Blue  Blue_Squad_1"));
        assert!(lines[1].ends_with(&red.units()[0].position().to_string()));
    }

    #[test]
    fn test_empty_roster_has_header_only() {
        let red = ForceUnit::new(Side::Red, 0, "Engage Blue", 1);
        assert_eq!(roster_table(&[&red]).lines().count(), 1);
    }
}
