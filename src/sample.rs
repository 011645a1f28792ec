//! Randomized sample figures used when no upstream backend is configured.

use crate::catalog::School;
use crate::models::{
    Attendance, BarSeries, ChartData, ChartSection, Enrollment, MonthlySavings, Nutrition, Period,
    PieSlice, SchoolRow, Summary,
};
use rand::Rng;

const GRADES_1_4: &str = "1-4 классы";
const GRADES_5_11: &str = "5-11 классы";
const STAFF: &str = "Персонал";

const BLUE: &str = "#60a5fa";
const GREEN: &str = "#34d399";
const AMBER: &str = "#fbbf24";

pub fn city_multiplier(city: &str) -> f64 {
    match city {
        "Алматы" => 1.2,
        "Шымкент" => 0.9,
        "Караганда" | "Атырау" => 0.8,
        _ => 1.0,
    }
}

/// Percentage with one decimal, zero when the denominator is zero.
pub fn safe_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let raw = numerator as f64 * 100.0 / denominator as f64;
    (raw * 10.0).round() / 10.0
}

fn jitter(rng: &mut impl Rng) -> f64 {
    rng.gen_range(0.85..1.15)
}

fn scaled(base: f64, scale: f64, rng: &mut impl Rng) -> u64 {
    (base * scale * jitter(rng)).round().max(0.0) as u64
}

fn share(total: u64, low: f64, high: f64, rng: &mut impl Rng) -> u64 {
    (total as f64 * rng.gen_range(low..high)).floor() as u64
}

fn slice(name: &str, value: u64, color: &str) -> PieSlice {
    PieSlice {
        name: name.to_string(),
        value,
        color: color.to_string(),
    }
}

fn bars(
    categories: &[&str],
    positive_label: &str,
    positive: &[f64],
    negative_label: &str,
    negative: &[f64],
    rng: &mut impl Rng,
) -> BarSeries {
    BarSeries {
        categories: categories.iter().map(|c| c.to_string()).collect(),
        positive_label: positive_label.to_string(),
        positive: positive.iter().map(|base| scaled(*base, 1.0, rng)).collect(),
        negative_label: negative_label.to_string(),
        negative: negative.iter().map(|base| scaled(*base, 1.0, rng)).collect(),
    }
}

pub fn chart_data(city: &str, period: Period, rng: &mut impl Rng) -> ChartData {
    let scale = city_multiplier(city) * period.chart_multiplier();
    let everyone = [GRADES_1_4, GRADES_5_11, STAFF];

    let attendance = ChartSection {
        pie: vec![
            slice(GRADES_1_4, scaled(450.0, scale, rng), BLUE),
            slice(GRADES_5_11, scaled(595.0, scale, rng), GREEN),
            slice(STAFF, scaled(189.0, scale, rng), AMBER),
        ],
        bar: bars(
            &everyone,
            "Посещение",
            &[69.0, 56.0, 63.0],
            "Не посетили",
            &[31.0, 44.0, 37.0],
            rng,
        ),
    };

    let nutrition = ChartSection {
        pie: vec![
            slice(GRADES_1_4, scaled(456.0, scale, rng), BLUE),
            slice(GRADES_5_11, scaled(531.0, scale, rng), GREEN),
        ],
        bar: bars(
            &[GRADES_1_4, GRADES_5_11],
            "Получили питание",
            &[75.0, 62.0],
            "Не получили",
            &[25.0, 38.0],
            rng,
        ),
    };

    let library = ChartSection {
        pie: vec![
            slice(GRADES_1_4, scaled(234.0, scale, rng), BLUE),
            slice(GRADES_5_11, scaled(289.0, scale, rng), GREEN),
            slice(STAFF, scaled(156.0, scale, rng), AMBER),
        ],
        bar: bars(
            &everyone,
            "Посетили",
            &[65.0, 58.0, 52.0],
            "Не посетили",
            &[35.0, 42.0, 48.0],
            rng,
        ),
    };

    let summary = Summary {
        total: scaled(1234.0, scale, rng),
        attended: scaled(1045.0, scale, rng),
        nutrition: scaled(987.0, scale, rng),
        nutrition14: scaled(456.0, scale, rng),
        nutrition511: scaled(531.0, scale, rng),
        savings: scaled(124_567.0, scale, rng),
    };

    ChartData {
        attendance,
        nutrition,
        library,
        summary,
    }
}

pub fn school_row(school: &School, rng: &mut impl Rng) -> SchoolRow {
    let students14 = rng.gen_range(280..380);
    let students511 = rng.gen_range(400..550);
    let total_students = students14 + students511;
    let staff = rng.gen_range(35..55);

    let attended14 = share(students14, 0.92, 0.98, rng);
    let attended511 = share(students511, 0.92, 0.98, rng);
    let attended_staff = share(staff, 0.90, 0.98, rng);

    let received14 = share(attended14, 0.85, 0.97, rng);
    let received511 = share(attended511, 0.80, 0.95, rng);

    SchoolRow {
        id: school.id,
        name: school.name.to_string(),
        system: Enrollment {
            students14,
            students511,
            total_students,
            staff,
        },
        attended: Attendance {
            students14: attended14,
            students511: attended511,
            staff: attended_staff,
            percentage: safe_percent(attended14 + attended511, total_students),
        },
        nutrition14: Nutrition {
            received: received14,
            not_received: attended14 - received14,
            percentage: safe_percent(received14, attended14),
        },
        nutrition511: Nutrition {
            received: received511,
            not_received: attended511 - received511,
            percentage: safe_percent(received511, attended511),
        },
    }
}

pub fn school_rows(schools: &[School], rng: &mut impl Rng) -> Vec<SchoolRow> {
    schools.iter().map(|school| school_row(school, rng)).collect()
}

/// Scales head counts for a reporting period. Percentages are kept as is.
pub fn scale_for_period(rows: Vec<SchoolRow>, period: Period) -> Vec<SchoolRow> {
    let factor = period.report_multiplier();
    let scale = |value: u64| (value as f64 * factor).floor() as u64;
    rows.into_iter()
        .map(|mut row| {
            row.system.students14 = scale(row.system.students14);
            row.system.students511 = scale(row.system.students511);
            row.system.total_students = scale(row.system.total_students);
            row.system.staff = scale(row.system.staff);
            row.attended.students14 = scale(row.attended.students14);
            row.attended.students511 = scale(row.attended.students511);
            row.attended.staff = scale(row.attended.staff);
            row.nutrition14.received = scale(row.nutrition14.received);
            row.nutrition14.not_received = scale(row.nutrition14.not_received);
            row.nutrition511.received = scale(row.nutrition511.received);
            row.nutrition511.not_received = scale(row.nutrition511.not_received);
            row
        })
        .collect()
}

pub const MONTH_LABELS: [&str; 12] = [
    "Янв", "Фев", "Мар", "Апр", "Май", "Июн", "Июл", "Авг", "Сен", "Окт", "Ноя", "Дек",
];

pub const SAVINGS_YEARS: [i32; 4] = [2025, 2024, 2023, 2022];
pub const LATEST_SAVINGS_YEAR: i32 = SAVINGS_YEARS[0];

// Each earlier year runs 1000 ₸ per month below the next.
const SAVINGS_2025: [u64; 12] = [
    12_000, 19_000, 15_000, 17_000, 14_000, 15_000, 16_000, 11_000, 15_000, 20_000, 16_000, 13_000,
];

/// Monthly savings in tenge. Years without figures fall back to the latest.
pub fn monthly_savings(year: i32) -> MonthlySavings {
    let year = if SAVINGS_YEARS.contains(&year) {
        year
    } else {
        LATEST_SAVINGS_YEAR
    };
    let offset = (LATEST_SAVINGS_YEAR - year) as u64 * 1_000;
    let values: Vec<u64> = SAVINGS_2025.iter().map(|value| value - offset).collect();
    MonthlySavings {
        year,
        years: SAVINGS_YEARS.to_vec(),
        labels: MONTH_LABELS.to_vec(),
        total: values.iter().sum(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schools_for;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn rows_stay_within_generated_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for row in school_rows(schools_for("Алматы"), &mut rng) {
            assert!((280..380).contains(&row.system.students14));
            assert!((400..550).contains(&row.system.students511));
            assert_eq!(
                row.system.total_students,
                row.system.students14 + row.system.students511
            );
            assert!(row.attended.students14 <= row.system.students14);
            assert_eq!(
                row.nutrition14.received + row.nutrition14.not_received,
                row.attended.students14
            );
            assert!((90.0..=100.0).contains(&row.attended.percentage));
        }
    }

    #[test]
    fn percent_handles_zero_denominator() {
        assert_eq!(safe_percent(5, 0), 0.0);
        assert_eq!(safe_percent(1, 3), 33.3);
        assert_eq!(safe_percent(2, 3), 66.7);
    }

    #[test]
    fn month_scales_volumes() {
        let mut day_rng = StdRng::seed_from_u64(1);
        let mut month_rng = StdRng::seed_from_u64(1);
        let day = chart_data("Астана", Period::Day, &mut day_rng);
        let month = chart_data("Астана", Period::Month, &mut month_rng);
        assert_eq!(day.attendance.pie.len(), 3);
        assert_eq!(day.nutrition.bar.categories.len(), 2);
        assert!(month.summary.total > day.summary.total * 20);
    }

    #[test]
    fn period_scaling_floors_counts() {
        let mut rng = StdRng::seed_from_u64(3);
        let rows = school_rows(schools_for("Атырау"), &mut rng);
        let original = rows[0].clone();
        let scaled = scale_for_period(rows, Period::Month);
        assert_eq!(
            scaled[0].system.staff,
            (original.system.staff as f64 * 1.3).floor() as u64
        );
        assert_eq!(scaled[0].attended.percentage, original.attended.percentage);
    }

    #[test]
    fn savings_follow_the_yearly_table() {
        let latest = monthly_savings(2025);
        assert_eq!(latest.labels.len(), 12);
        assert_eq!(latest.values[1], 19_000);
        assert_eq!(latest.total, 183_000);

        let oldest = monthly_savings(2022);
        assert_eq!(oldest.values[0], 9_000);
        assert_eq!(oldest.values[7], 8_000);
        assert_eq!(oldest.values[9], 17_000);
    }

    #[test]
    fn unknown_savings_year_uses_latest() {
        let fallback = monthly_savings(1999);
        assert_eq!(fallback.year, 2025);
        assert_eq!(fallback.values, monthly_savings(2025).values);
    }
}
