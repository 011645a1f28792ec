use crate::models::{Attendance, Badge, Enrollment, Nutrition, RowView, SchoolRow, Totals};
use crate::sample::safe_percent;

pub fn attendance_badge(percentage: f64) -> Badge {
    if percentage < 90.0 {
        Badge::Red
    } else if percentage < 95.0 {
        Badge::Yellow
    } else {
        Badge::Green
    }
}

pub fn nutrition_badge(percentage: f64) -> Badge {
    if percentage < 80.0 {
        Badge::Red
    } else if percentage < 90.0 {
        Badge::Yellow
    } else {
        Badge::Green
    }
}

/// Case-insensitive match on the school name, or a substring of its id.
pub fn search(rows: Vec<SchoolRow>, term: &str) -> Vec<SchoolRow> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| row.name.to_lowercase().contains(&term) || row.id.to_string().contains(&term))
        .collect()
}

/// Sums over every row, not just the visible page.
pub fn totals(rows: &[SchoolRow]) -> Totals {
    let mut system = Enrollment::default();
    let mut attended = Attendance::default();
    let mut nutrition14 = Nutrition::default();
    let mut nutrition511 = Nutrition::default();

    for row in rows {
        system.students14 += row.system.students14;
        system.students511 += row.system.students511;
        system.total_students += row.system.total_students;
        system.staff += row.system.staff;
        attended.students14 += row.attended.students14;
        attended.students511 += row.attended.students511;
        attended.staff += row.attended.staff;
        nutrition14.received += row.nutrition14.received;
        nutrition14.not_received += row.nutrition14.not_received;
        nutrition511.received += row.nutrition511.received;
        nutrition511.not_received += row.nutrition511.not_received;
    }

    attended.percentage = safe_percent(
        attended.students14 + attended.students511,
        system.total_students,
    );
    nutrition14.percentage = safe_percent(nutrition14.received, attended.students14);
    nutrition511.percentage = safe_percent(nutrition511.received, attended.students511);

    Totals {
        system,
        attended,
        nutrition14,
        nutrition511,
    }
}

pub fn row_view(row: SchoolRow) -> RowView {
    RowView {
        attendance_badge: attendance_badge(row.attended.percentage),
        nutrition14_badge: nutrition_badge(row.nutrition14.percentage),
        nutrition511_badge: nutrition_badge(row.nutrition511.percentage),
        row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u32, name: &str, students: u64, attended: u64) -> SchoolRow {
        SchoolRow {
            id,
            name: name.to_string(),
            system: Enrollment {
                students14: students,
                students511: 0,
                total_students: students,
                staff: 10,
            },
            attended: Attendance {
                students14: attended,
                students511: 0,
                staff: 9,
                percentage: safe_percent(attended, students),
            },
            nutrition14: Nutrition {
                received: attended / 2,
                not_received: attended - attended / 2,
                percentage: safe_percent(attended / 2, attended),
            },
            nutrition511: Nutrition::default(),
        }
    }

    #[test]
    fn badge_thresholds() {
        assert_eq!(attendance_badge(95.0), Badge::Green);
        assert_eq!(attendance_badge(94.9), Badge::Yellow);
        assert_eq!(attendance_badge(89.9), Badge::Red);
        assert_eq!(nutrition_badge(90.0), Badge::Green);
        assert_eq!(nutrition_badge(80.0), Badge::Yellow);
        assert_eq!(nutrition_badge(79.9), Badge::Red);
    }

    #[test]
    fn search_matches_name_or_id() {
        let rows = vec![row(6, "Школа №12", 100, 90), row(21, "Школа №14", 100, 90)];
        assert_eq!(search(rows.clone(), "школа №12").len(), 1);
        assert_eq!(search(rows.clone(), "21")[0].id, 21);
        assert_eq!(search(rows.clone(), "  ").len(), 2);
        assert!(search(rows, "гимназия").is_empty());
    }

    #[test]
    fn totals_cover_all_rows() {
        let rows = vec![row(1, "a", 100, 90), row(2, "b", 300, 270)];
        let totals = totals(&rows);
        assert_eq!(totals.system.total_students, 400);
        assert_eq!(totals.attended.students14, 360);
        assert_eq!(totals.attended.percentage, 90.0);
        assert_eq!(totals.nutrition14.received, 45 + 135);
        assert_eq!(totals.nutrition511.percentage, 0.0);
    }

    #[test]
    fn empty_totals_are_zero() {
        assert_eq!(totals(&[]), Totals::default());
    }
}
